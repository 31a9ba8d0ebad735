use crate::api::{AuthApi, HttpApi, ProductFetch, ProductSearch};
use crate::config::StorefrontConfig;
use crate::error::ApiError;
use crate::models::{LoginRequest, ProductId, RegisterRequest};
use crate::search::{SearchController, SearchSettings};
use std::sync::Arc;
use tokio::io::{AsyncReadExt, AsyncWriteExt};
use tokio::net::{TcpListener, TcpStream};
use tokio::task::JoinHandle;

/// Serves exactly one canned response and hands back the raw request text
async fn serve_once(status: &'static str, body: &'static str) -> (String, JoinHandle<String>) {
    let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
    let addr = listener.local_addr().unwrap();

    let handle = tokio::spawn(async move {
        let (mut socket, _) = listener.accept().await.unwrap();
        let request = read_request(&mut socket).await;
        let response = format!(
            "HTTP/1.1 {}\r\ncontent-type: application/json\r\ncontent-length: {}\r\nconnection: close\r\n\r\n{}",
            status,
            body.len(),
            body
        );
        socket.write_all(response.as_bytes()).await.unwrap();
        let _ = socket.shutdown().await;
        request
    });

    (format!("http://{}", addr), handle)
}

async fn read_request(socket: &mut TcpStream) -> String {
    let mut buf = Vec::new();
    let mut chunk = [0u8; 1024];
    loop {
        let n = socket.read(&mut chunk).await.unwrap();
        if n == 0 {
            break;
        }
        buf.extend_from_slice(&chunk[..n]);

        let text = String::from_utf8_lossy(&buf);
        if let Some(header_end) = text.find("\r\n\r\n") {
            let content_length = text[..header_end]
                .lines()
                .find_map(|line| {
                    let line = line.to_ascii_lowercase();
                    line.strip_prefix("content-length:")
                        .map(|v| v.trim().parse::<usize>().unwrap_or(0))
                })
                .unwrap_or(0);
            if buf.len() >= header_end + 4 + content_length {
                break;
            }
        }
    }
    String::from_utf8_lossy(&buf).into_owned()
}

/// Accepts connections and holds them open without ever answering
async fn serve_silently() -> (String, JoinHandle<()>) {
    let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
    let addr = listener.local_addr().unwrap();

    let handle = tokio::spawn(async move {
        let mut held = Vec::new();
        while let Ok((socket, _)) = listener.accept().await {
            held.push(socket);
        }
    });

    (format!("http://{}", addr), handle)
}

fn api_for(base_url: &str) -> HttpApi {
    HttpApi::new(&StorefrontConfig::new(base_url)).unwrap()
}

#[tokio::test]
async fn test_search_posts_query_and_count() {
    let (base, server) = serve_once(
        "200 OK",
        r#"{"items": [{"id": 1, "name": "Phone"}, {"id": 2, "name": "Phone case"}]}"#,
    )
    .await;

    let products = api_for(&base).search("phone", 10).await.unwrap();
    assert_eq!(products.len(), 2);
    assert_eq!(products[1].display_name(), "Phone case");

    let request = server.await.unwrap();
    assert!(request.starts_with("POST /products/search "));
    assert!(request.contains(r#"{"query":"phone","cnt":10}"#));
}

#[tokio::test]
async fn test_fetch_uses_id_path() {
    let (base, server) = serve_once("200 OK", r#"{"id": "a b", "dataRow": {"name": "Desk"}}"#).await;

    let product = api_for(&base)
        .fetch(&ProductId::from("a b"))
        .await
        .unwrap()
        .unwrap();
    assert_eq!(product.display_name(), "Desk");

    let request = server.await.unwrap();
    assert!(request.starts_with("GET /products/a%20b "));
}

#[tokio::test]
async fn test_fetch_non_success_is_error() {
    let (base, _server) = serve_once("500 Internal Server Error", "boom").await;

    let err = api_for(&base).fetch(&ProductId::Number(3)).await.unwrap_err();
    assert!(matches!(err, ApiError::Status { status: 500, .. }));
}

#[tokio::test]
async fn test_register_duplicate_status() {
    let (base, server) = serve_once("409 Conflict", "").await;

    let request = RegisterRequest {
        username: "mira".to_string(),
        email: "mira@example.com".to_string(),
        password: "secret1".to_string(),
    };
    let err = api_for(&base).register(&request).await.unwrap_err();
    assert_eq!(err.status(), Some(409));

    let raw = server.await.unwrap();
    assert!(raw.starts_with("POST /auth/register "));
    assert!(raw.contains(r#""email":"mira@example.com""#));
}

#[tokio::test]
async fn test_login_decodes_token() {
    let (base, _server) = serve_once("200 OK", r#"{"token": "t-123"}"#).await;

    let request = LoginRequest {
        username: "mira".to_string(),
        password: "secret1".to_string(),
    };
    let response = api_for(&base).login(&request).await.unwrap();
    assert_eq!(response.token, "t-123");
}

#[test]
fn test_base_path_is_kept() {
    let api = api_for("http://shop.test/api/");
    let url = api.product_url(&ProductId::Number(12)).unwrap();
    assert_eq!(url.as_str(), "http://shop.test/api/products/12");
}

#[tokio::test]
async fn test_unanswered_search_is_a_timeout() {
    let (base, server) = serve_silently().await;
    let mut config = StorefrontConfig::new(&base);
    config.request_timeout_secs = 1;

    let err = HttpApi::new(&config)
        .unwrap()
        .search("phone", 10)
        .await
        .unwrap_err();
    assert!(matches!(err, ApiError::Timeout(_)));
    server.abort();
}

#[tokio::test]
async fn test_controller_reports_timeout_against_silent_server() {
    let (base, server) = serve_silently().await;
    let mut config = StorefrontConfig::new(&base);
    config.request_timeout_secs = 1;
    config.debounce_ms = 10;

    let api = Arc::new(HttpApi::new(&config).unwrap());
    let handle = SearchController::spawn(api, SearchSettings::from_config(&config));

    for query in ["phone", "phones"] {
        handle.set_query(query);
        let snapshot = handle.settled().await;
        assert!(snapshot.timed_out, "no timeout reported for {}", query);
        assert!(!snapshot.loading);
    }

    handle.shutdown();
    server.abort();
}
