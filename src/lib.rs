//! Scratch Server - HTTP/1.1 over raw sockets
//!
//! Core library: request parsing, routing, handlers and response writing.

pub mod config;
pub mod handlers;
pub mod http;
pub mod routing;
pub mod server;
pub mod storage;
