use std::path::Path;

use tempfile::TempDir;
use tokio::io::AsyncReadExt;

use liteserve::config::ServerConfig;
use liteserve::http::request::Method;
use liteserve::http::response::{Body, Response, StatusCode};
use liteserve::serve::error_docs::ErrorDocs;
use liteserve::serve::resolver::resolve;

fn config_for(root: &Path) -> ServerConfig {
    ServerConfig {
        listen_addr: "127.0.0.1:0".to_string(),
        root_dir: root.to_path_buf(),
        root_file: "/index.html".to_string(),
        accept_only_get: true,
        use_index_html: true,
        serve_index: false,
        error_docs: ErrorDocs::default_docs(),
    }
}

async fn body_bytes(response: Response) -> Vec<u8> {
    match response.body {
        Body::Bytes(bytes) => bytes,
        Body::File(mut file, _) => {
            let mut bytes = Vec::new();
            file.read_to_end(&mut bytes).await.unwrap();
            bytes
        }
    }
}

#[tokio::test]
async fn test_root_serves_root_file() {
    let root = TempDir::new().unwrap();
    std::fs::write(root.path().join("index.html"), "<h1>home</h1>").unwrap();

    let config = config_for(root.path());
    let response = resolve(&config, Method::GET, "/").await;

    assert_eq!(response.status, StatusCode::Ok);
    assert_eq!(response.headers.get("Content-Type").unwrap(), "text/html");
    assert_eq!(response.headers.get("Content-Length").unwrap(), "13");
    assert_eq!(body_bytes(response).await, b"<h1>home</h1>");
}

#[tokio::test]
async fn test_custom_root_file() {
    let root = TempDir::new().unwrap();
    std::fs::write(root.path().join("home.html"), "custom home").unwrap();

    let mut config = config_for(root.path());
    config.root_file = "/home.html".to_string();
    let response = resolve(&config, Method::GET, "/").await;

    assert_eq!(response.status, StatusCode::Ok);
    assert_eq!(body_bytes(response).await, b"custom home");
}

#[tokio::test]
async fn test_plain_file_with_content_type() {
    let root = TempDir::new().unwrap();
    std::fs::write(root.path().join("style.css"), "body{}").unwrap();

    let config = config_for(root.path());
    let response = resolve(&config, Method::GET, "/style.css").await;

    assert_eq!(response.status, StatusCode::Ok);
    assert_eq!(response.headers.get("Content-Type").unwrap(), "text/css");
}

#[tokio::test]
async fn test_unknown_extension_defaults_to_text_plain() {
    let root = TempDir::new().unwrap();
    std::fs::write(root.path().join("data.xyz"), "payload").unwrap();

    let config = config_for(root.path());
    let response = resolve(&config, Method::GET, "/data.xyz").await;

    assert_eq!(response.status, StatusCode::Ok);
    assert_eq!(response.headers.get("Content-Type").unwrap(), "text/plain");
}

#[tokio::test]
async fn test_missing_path_returns_404_with_requested_url() {
    let root = TempDir::new().unwrap();

    let config = config_for(root.path());
    let response = resolve(&config, Method::GET, "/missing.txt").await;

    assert_eq!(response.status, StatusCode::NotFound);
    assert_eq!(response.headers.get("Content-Type").unwrap(), "text/html");
    let body = String::from_utf8(body_bytes(response).await).unwrap();
    assert!(body.contains("/missing.txt"));
}

#[tokio::test]
async fn test_404_body_escapes_requested_url() {
    let root = TempDir::new().unwrap();

    let config = config_for(root.path());
    let response = resolve(&config, Method::GET, "/%3Cscript%3E").await;

    assert_eq!(response.status, StatusCode::NotFound);
    let body = String::from_utf8(body_bytes(response).await).unwrap();
    assert!(body.contains("&lt;script&gt;"));
    assert!(!body.contains("<script>"));
}

#[tokio::test]
async fn test_directory_without_slash_redirects() {
    let root = TempDir::new().unwrap();
    std::fs::create_dir(root.path().join("docs")).unwrap();

    let config = config_for(root.path());
    let response = resolve(&config, Method::GET, "/docs").await;

    assert_eq!(response.status, StatusCode::Found);
    assert_eq!(response.headers.get("Location").unwrap(), "/docs/");
    assert!(response.body.is_empty());
}

#[tokio::test]
async fn test_directory_redirects_even_when_listing_disabled() {
    let root = TempDir::new().unwrap();
    std::fs::create_dir(root.path().join("docs")).unwrap();

    let mut config = config_for(root.path());
    config.serve_index = false;
    let response = resolve(&config, Method::GET, "/docs").await;

    assert_eq!(response.status, StatusCode::Found);
}

#[tokio::test]
async fn test_directory_with_index_html_serves_it() {
    let root = TempDir::new().unwrap();
    std::fs::create_dir(root.path().join("docs")).unwrap();
    std::fs::write(root.path().join("docs/index.html"), "docs index").unwrap();

    let config = config_for(root.path());
    let response = resolve(&config, Method::GET, "/docs/").await;

    assert_eq!(response.status, StatusCode::Ok);
    assert_eq!(body_bytes(response).await, b"docs index");
}

#[tokio::test]
async fn test_directory_listing_when_enabled() {
    let root = TempDir::new().unwrap();
    let docs = root.path().join("docs");
    std::fs::create_dir(&docs).unwrap();
    std::fs::write(docs.join("alpha.txt"), "a").unwrap();
    std::fs::write(docs.join("Beta.txt"), "b").unwrap();
    std::fs::create_dir(docs.join("sub")).unwrap();
    std::fs::write(docs.join(".hidden"), "x").unwrap();

    let mut config = config_for(root.path());
    config.serve_index = true;
    config.use_index_html = false;
    let response = resolve(&config, Method::GET, "/docs/").await;

    assert_eq!(response.status, StatusCode::Ok);
    assert_eq!(
        response.headers.get("Content-Type").unwrap(),
        "text/html; charset=utf-8"
    );
    assert_eq!(
        response.headers.get("X-Content-Type-Options").unwrap(),
        "nosniff"
    );
    assert!(response.headers.contains("Content-Length"));

    let body = String::from_utf8(body_bytes(response).await).unwrap();
    assert!(body.contains("alpha.txt"));
    assert!(body.contains("Beta.txt"));
    assert!(body.contains("sub"));
    assert!(!body.contains(".hidden"));

    // directories first, then case-insensitive lexical order
    let sub = body.find(">sub<").unwrap();
    let alpha = body.find(">alpha.txt<").unwrap();
    let beta = body.find(">Beta.txt<").unwrap();
    assert!(sub < alpha);
    assert!(alpha < beta);
}

#[tokio::test]
async fn test_directory_listing_disabled_returns_404() {
    let root = TempDir::new().unwrap();
    std::fs::create_dir(root.path().join("docs")).unwrap();

    let config = config_for(root.path());
    let response = resolve(&config, Method::GET, "/docs/").await;

    assert_eq!(response.status, StatusCode::NotFound);
}

#[tokio::test]
async fn test_listing_is_idempotent() {
    let root = TempDir::new().unwrap();
    let docs = root.path().join("docs");
    std::fs::create_dir(&docs).unwrap();
    std::fs::write(docs.join("a.txt"), "a").unwrap();

    let mut config = config_for(root.path());
    config.serve_index = true;

    let first = body_bytes(resolve(&config, Method::GET, "/docs/").await).await;
    let second = body_bytes(resolve(&config, Method::GET, "/docs/").await).await;
    assert_eq!(first, second);
}

#[tokio::test]
async fn test_post_rejected_when_get_only() {
    let root = TempDir::new().unwrap();
    std::fs::write(root.path().join("index.html"), "home").unwrap();

    let config = config_for(root.path());
    let response = resolve(&config, Method::POST, "/index.html").await;

    assert_eq!(response.status, StatusCode::MethodNotAllowed);
    assert_eq!(response.headers.get("Content-Type").unwrap(), "text/html");
    let body = String::from_utf8(body_bytes(response).await).unwrap();
    assert!(body.contains("405 Method Not Allowed"));
}

#[tokio::test]
async fn test_post_allowed_when_not_restricted() {
    let root = TempDir::new().unwrap();
    std::fs::write(root.path().join("index.html"), "home").unwrap();

    let mut config = config_for(root.path());
    config.accept_only_get = false;
    let response = resolve(&config, Method::POST, "/index.html").await;

    assert_eq!(response.status, StatusCode::Ok);
}

#[tokio::test]
async fn test_traversal_is_confined_to_root() {
    let root = TempDir::new().unwrap();
    std::fs::write(root.path().join("index.html"), "home").unwrap();

    let config = config_for(root.path());
    // resolves to /etc/passwd under the served root, which does not exist
    let response = resolve(&config, Method::GET, "/../../../etc/passwd").await;

    assert_eq!(response.status, StatusCode::NotFound);
}

#[tokio::test]
async fn test_invalid_percent_encoding_yields_404() {
    let root = TempDir::new().unwrap();

    let config = config_for(root.path());
    let response = resolve(&config, Method::GET, "/%ff%fe").await;

    assert_eq!(response.status, StatusCode::NotFound);
}

#[tokio::test]
async fn test_root_listing_when_root_file_missing() {
    let root = TempDir::new().unwrap();
    std::fs::write(root.path().join("readme.txt"), "hi").unwrap();

    let mut config = config_for(root.path());
    config.serve_index = true;
    let response = resolve(&config, Method::GET, "/").await;

    assert_eq!(response.status, StatusCode::Ok);
    let body = String::from_utf8(body_bytes(response).await).unwrap();
    assert!(body.contains("readme.txt"));
}
