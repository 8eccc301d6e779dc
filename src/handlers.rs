//! One handler per [`Route`].
//!
//! Handlers never fail: every outcome, including I/O trouble, becomes a
//! status code on the response.

use tokio::io::AsyncRead;
use tracing::{error, warn};

use crate::http::parser::{ParseError, RequestReader};
use crate::http::request::Request;
use crate::http::response::{Response, StatusCode};
use crate::routing::Route;
use crate::storage::{FileStore, StoreError};

/// Runs the handler for `route`.
///
/// `reader` is only touched by routes that consume a body.
pub async fn dispatch<S: AsyncRead + Unpin>(
    route: Route,
    request: &Request,
    reader: &mut RequestReader<S>,
    store: &FileStore,
) -> Response {
    match route {
        Route::Root => root(),
        Route::Echo(text) => echo(&text),
        Route::UserAgent => user_agent(request),
        Route::FileGet(name) => file_get(&name, store).await,
        Route::FilePost(name) => file_post(&name, request, reader, store).await,
        Route::NotFound => Response::not_found(),
    }
}

pub fn root() -> Response {
    Response::empty(StatusCode::Ok)
}

/// The path segment is echoed verbatim, without percent-decoding.
pub fn echo(text: &str) -> Response {
    Response::text(text)
}

pub fn user_agent(request: &Request) -> Response {
    Response::text(request.user_agent())
}

pub async fn file_get(name: &str, store: &FileStore) -> Response {
    match store.read(name).await {
        Ok(contents) => Response::octet_stream(contents),
        Err(StoreError::NotFound) => Response::not_found(),
        Err(e) => {
            warn!(file = name, error = %e, "Serving file failed, answering 404");
            Response::not_found()
        }
    }
}

pub async fn file_post<S: AsyncRead + Unpin>(
    name: &str,
    request: &Request,
    reader: &mut RequestReader<S>,
    store: &FileStore,
) -> Response {
    let len = match request.content_length() {
        Ok(Some(len)) => len,
        Ok(None) => {
            warn!(file = name, "Upload without Content-Length");
            return Response::empty(StatusCode::LengthRequired);
        }
        Err(e) => {
            warn!(file = name, error = %e, "Upload with unusable Content-Length");
            return Response::empty(StatusCode::BadRequest);
        }
    };

    let body = match reader.read_body(len).await {
        Ok(body) => body,
        Err(e @ ParseError::TruncatedBody { .. }) => {
            warn!(file = name, error = %e, "Upload body cut short");
            return Response::empty(StatusCode::BadRequest);
        }
        // Socket errors mid-body; the peer is unlikely to see this reply
        Err(e) => {
            warn!(file = name, error = %e, "Reading upload body failed");
            return Response::empty(StatusCode::BadRequest);
        }
    };

    match store.write(name, &body).await {
        Ok(()) => Response::empty(StatusCode::Created),
        Err(e @ StoreError::InvalidPath(_)) => {
            warn!(file = name, error = %e, "Rejected upload file name");
            Response::internal_error()
        }
        Err(e) => {
            error!(file = name, error = %e, "Writing upload failed");
            Response::internal_error()
        }
    }
}
