//! End-to-end tests over real TCP connections.

mod common;

use common::{ScratchDir, send_raw, start_server};

#[tokio::test]
async fn test_root() {
    let dir = ScratchDir::new();
    let addr = start_server(dir.path()).await;

    let response = send_raw(addr, b"GET / HTTP/1.1\r\nHost: localhost\r\n\r\n").await;

    assert_eq!(response, b"HTTP/1.1 200 OK\r\n\r\n");
}

#[tokio::test]
async fn test_echo() {
    let dir = ScratchDir::new();
    let addr = start_server(dir.path()).await;

    let response = send_raw(addr, b"GET /echo/hello HTTP/1.1\r\nHost: localhost\r\n\r\n").await;

    assert_eq!(
        response,
        b"HTTP/1.1 200 OK\r\nContent-Type: text/plain\r\nContent-Length: 5\r\n\r\nhello"
    );
}

#[tokio::test]
async fn test_user_agent() {
    let dir = ScratchDir::new();
    let addr = start_server(dir.path()).await;

    let response = send_raw(
        addr,
        b"GET /user-agent HTTP/1.1\r\nHost: localhost\r\nUser-Agent: test-client/1.0\r\n\r\n",
    )
    .await;

    assert_eq!(
        response,
        b"HTTP/1.1 200 OK\r\nContent-Type: text/plain\r\nContent-Length: 15\r\n\r\ntest-client/1.0"
    );
}

#[tokio::test]
async fn test_user_agent_absent() {
    let dir = ScratchDir::new();
    let addr = start_server(dir.path()).await;

    let response = send_raw(addr, b"GET /user-agent HTTP/1.1\r\n\r\n").await;

    assert_eq!(
        response,
        b"HTTP/1.1 200 OK\r\nContent-Type: text/plain\r\nContent-Length: 0\r\n\r\n"
    );
}

#[tokio::test]
async fn test_upload_then_download() {
    let dir = ScratchDir::new();
    let addr = start_server(dir.path()).await;

    let created = send_raw(
        addr,
        b"POST /files/foo.txt HTTP/1.1\r\nContent-Length: 4\r\n\r\nabcd",
    )
    .await;
    assert_eq!(created, b"HTTP/1.1 201 Created\r\n\r\n");

    let fetched = send_raw(addr, b"GET /files/foo.txt HTTP/1.1\r\n\r\n").await;
    assert_eq!(
        fetched,
        b"HTTP/1.1 200 OK\r\nContent-Type: application/octet-stream\r\nContent-Length: 4\r\n\r\nabcd"
    );
}

#[tokio::test]
async fn test_upload_twice_same_content() {
    let dir = ScratchDir::new();
    let addr = start_server(dir.path()).await;
    let request = b"POST /files/twice.txt HTTP/1.1\r\nContent-Length: 3\r\n\r\nxyz";

    assert_eq!(send_raw(addr, request).await, b"HTTP/1.1 201 Created\r\n\r\n");
    assert_eq!(send_raw(addr, request).await, b"HTTP/1.1 201 Created\r\n\r\n");

    assert_eq!(std::fs::read(dir.path().join("twice.txt")).unwrap(), b"xyz");
}

#[tokio::test]
async fn test_upload_zero_length() {
    let dir = ScratchDir::new();
    let addr = start_server(dir.path()).await;

    let response = send_raw(addr, b"POST /files/empty.txt HTTP/1.1\r\nContent-Length: 0\r\n\r\n").await;

    assert_eq!(response, b"HTTP/1.1 201 Created\r\n\r\n");
    assert_eq!(std::fs::read(dir.path().join("empty.txt")).unwrap(), b"");
}

#[tokio::test]
async fn test_upload_without_content_length() {
    let dir = ScratchDir::new();
    let addr = start_server(dir.path()).await;

    let response = send_raw(addr, b"POST /files/x HTTP/1.1\r\n\r\n").await;

    assert_eq!(response, b"HTTP/1.1 411 Length Required\r\n\r\n");
    assert!(!dir.path().join("x").exists());
}

#[tokio::test]
async fn test_upload_invalid_content_length() {
    let dir = ScratchDir::new();
    let addr = start_server(dir.path()).await;

    let response = send_raw(addr, b"POST /files/x HTTP/1.1\r\nContent-Length: lots\r\n\r\n").await;

    assert_eq!(response, b"HTTP/1.1 400 Bad Request\r\n\r\n");
}

#[tokio::test]
async fn test_upload_truncated_body() {
    let dir = ScratchDir::new();
    let addr = start_server(dir.path()).await;

    let response = send_raw(addr, b"POST /files/x HTTP/1.1\r\nContent-Length: 10\r\n\r\nshort").await;

    assert_eq!(response, b"HTTP/1.1 400 Bad Request\r\n\r\n");
    assert!(!dir.path().join("x").exists());
}

#[tokio::test]
async fn test_upload_escape_rejected() {
    let dir = ScratchDir::new();
    let addr = start_server(dir.path()).await;

    let response = send_raw(addr, b"POST /files/../evil.txt HTTP/1.1\r\nContent-Length: 1\r\n\r\nx").await;

    assert_eq!(response, b"HTTP/1.1 500 Internal Server Error\r\n\r\n");
    assert!(!dir.path().parent().unwrap().join("evil.txt").exists());
}

#[tokio::test]
async fn test_upload_without_name() {
    let dir = ScratchDir::new();
    let addr = start_server(dir.path()).await;

    for path in ["/files/", "/files/."] {
        let request = format!("POST {path} HTTP/1.1\r\nContent-Length: 1\r\n\r\nx");
        let response = send_raw(addr, request.as_bytes()).await;

        assert_eq!(response, b"HTTP/1.1 500 Internal Server Error\r\n\r\n", "{path}");
    }
}

#[tokio::test]
async fn test_upload_onto_directory() {
    let dir = ScratchDir::new();
    std::fs::create_dir(dir.path().join("sub")).unwrap();
    let addr = start_server(dir.path()).await;

    let response = send_raw(addr, b"POST /files/sub HTTP/1.1\r\nContent-Length: 1\r\n\r\nx").await;

    assert_eq!(response, b"HTTP/1.1 500 Internal Server Error\r\n\r\n");
}

#[tokio::test]
async fn test_upload_write_failure_is_500() {
    let dir = ScratchDir::new();
    let addr = start_server(dir.path()).await;

    let response = send_raw(addr, b"POST /files/no/such/dir HTTP/1.1\r\nContent-Length: 1\r\n\r\nx").await;

    assert_eq!(response, b"HTTP/1.1 500 Internal Server Error\r\n\r\n");
}

#[tokio::test]
async fn test_missing_file() {
    let dir = ScratchDir::new();
    let addr = start_server(dir.path()).await;

    let response = send_raw(addr, b"GET /files/missing.txt HTTP/1.1\r\n\r\n").await;

    assert_eq!(response, b"HTTP/1.1 404 Not Found\r\n\r\n");
}

#[tokio::test]
async fn test_files_without_name() {
    let dir = ScratchDir::new();
    let addr = start_server(dir.path()).await;

    let response = send_raw(addr, b"GET /files/ HTTP/1.1\r\n\r\n").await;

    assert_eq!(response, b"HTTP/1.1 404 Not Found\r\n\r\n");
}

#[tokio::test]
async fn test_file_get_escape_is_not_found() {
    let dir = ScratchDir::new();
    let addr = start_server(dir.path()).await;

    let response = send_raw(addr, b"GET /files/../../etc/passwd HTTP/1.1\r\n\r\n").await;

    assert_eq!(response, b"HTTP/1.1 404 Not Found\r\n\r\n");
}

#[tokio::test]
async fn test_unknown_path() {
    let dir = ScratchDir::new();
    let addr = start_server(dir.path()).await;

    let response = send_raw(addr, b"GET /nonexistent HTTP/1.1\r\n\r\n").await;

    assert_eq!(response, b"HTTP/1.1 404 Not Found\r\n\r\n");
}

#[tokio::test]
async fn test_ignored_body_does_not_cut_off_response() {
    let dir = ScratchDir::new();
    let addr = start_server(dir.path()).await;

    let body = "z".repeat(64 * 1024);
    let request = format!(
        "GET /echo/ok HTTP/1.1\r\nContent-Length: {}\r\n\r\n{body}",
        body.len()
    );
    let response = send_raw(addr, request.as_bytes()).await;

    assert_eq!(
        response,
        b"HTTP/1.1 200 OK\r\nContent-Type: text/plain\r\nContent-Length: 2\r\n\r\nok"
    );
}

#[tokio::test]
async fn test_malformed_request_gets_no_response() {
    let dir = ScratchDir::new();
    let addr = start_server(dir.path()).await;

    let response = send_raw(addr, b"GARBAGE\r\n\r\n").await;

    assert!(response.is_empty());
}

#[tokio::test]
async fn test_concurrent_connections() {
    let dir = ScratchDir::new();
    let addr = start_server(dir.path()).await;

    let tasks: Vec<_> = (0..16)
        .map(|i| {
            tokio::spawn(async move {
                let request = format!("GET /echo/n{i} HTTP/1.1\r\n\r\n");
                (i, send_raw(addr, request.as_bytes()).await)
            })
        })
        .collect();

    for task in tasks {
        let (i, response) = task.await.unwrap();
        let body = format!("n{i}");
        assert!(response.ends_with(body.as_bytes()));
    }
}
