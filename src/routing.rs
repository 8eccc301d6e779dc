//! Maps a method and path to exactly one [`Route`].

use crate::http::request::Method;

const FILES_PREFIX: &str = "/files/";
const ECHO_PREFIX: &str = "/echo/";

/// The behavior selected for a request.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Route {
    Root,
    Echo(String),
    UserAgent,
    FileGet(String),
    FilePost(String),
    NotFound,
}

impl Route {
    /// First match wins. The order matters because the routes overlap by
    /// prefix: a POST to `/files/...` must be seen before the generic
    /// `/files/` read route.
    ///
    /// ```
    /// # use scratch_server::http::request::Method;
    /// # use scratch_server::routing::Route;
    /// assert_eq!(Route::resolve(&Method::GET, "/echo/hi"), Route::Echo("hi".into()));
    /// assert_eq!(Route::resolve(&Method::POST, "/files/a"), Route::FilePost("a".into()));
    /// assert_eq!(Route::resolve(&Method::GET, "/nope"), Route::NotFound);
    /// ```
    pub fn resolve(method: &Method, path: &str) -> Route {
        if *method == Method::POST {
            if let Some(name) = path.strip_prefix(FILES_PREFIX) {
                return Route::FilePost(name.to_string());
            }
        }

        if path == "/user-agent" {
            return Route::UserAgent;
        }

        if let Some(name) = path.strip_prefix(FILES_PREFIX) {
            return Route::FileGet(name.to_string());
        }

        if let Some(text) = path.strip_prefix(ECHO_PREFIX) {
            return Route::Echo(text.to_string());
        }

        if path == "/" {
            return Route::Root;
        }

        Route::NotFound
    }

    /// Short label for logs.
    pub fn name(&self) -> &'static str {
        match self {
            Route::Root => "root",
            Route::Echo(_) => "echo",
            Route::UserAgent => "user-agent",
            Route::FileGet(_) => "file-get",
            Route::FilePost(_) => "file-post",
            Route::NotFound => "not-found",
        }
    }
}
