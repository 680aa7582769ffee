use liteserve::http::response::{Body, Headers, Response, ResponseBuilder, StatusCode};
use liteserve::http::writer::serialize_head;

#[test]
fn test_status_code_as_u16() {
    assert_eq!(StatusCode::Ok.as_u16(), 200);
    assert_eq!(StatusCode::Found.as_u16(), 302);
    assert_eq!(StatusCode::NotFound.as_u16(), 404);
    assert_eq!(StatusCode::MethodNotAllowed.as_u16(), 405);
    assert_eq!(StatusCode::InternalServerError.as_u16(), 500);
}

#[test]
fn test_status_code_reason_phrase() {
    assert_eq!(StatusCode::Ok.reason_phrase(), "OK");
    assert_eq!(StatusCode::Found.reason_phrase(), "Found");
    assert_eq!(StatusCode::NotFound.reason_phrase(), "Not Found");
    assert_eq!(
        StatusCode::MethodNotAllowed.reason_phrase(),
        "Method Not Allowed"
    );
    assert_eq!(
        StatusCode::InternalServerError.reason_phrase(),
        "Internal Server Error"
    );
}

#[test]
fn test_response_builder_basic() {
    let response = ResponseBuilder::new(StatusCode::Ok)
        .body(b"Hello, World!".to_vec())
        .build();

    assert_eq!(response.status, StatusCode::Ok);
    match response.body {
        Body::Bytes(bytes) => assert_eq!(bytes, b"Hello, World!".to_vec()),
        Body::File(..) => panic!("expected a materialized body"),
    }
}

#[test]
fn test_response_builder_with_headers() {
    let response = ResponseBuilder::new(StatusCode::Ok)
        .header("Content-Type", "text/plain")
        .header("X-Custom", "value")
        .body(b"test".to_vec())
        .build();

    assert_eq!(response.headers.get("Content-Type").unwrap(), "text/plain");
    assert_eq!(response.headers.get("X-Custom").unwrap(), "value");
}

#[test]
fn test_response_builder_auto_content_length() {
    let body = b"This is the body".to_vec();
    let response = ResponseBuilder::new(StatusCode::Ok)
        .body(body.clone())
        .build();

    let content_length = response.headers.get("Content-Length").unwrap();
    assert_eq!(content_length, body.len().to_string());
}

#[test]
fn test_response_builder_preserves_custom_content_length() {
    let response = ResponseBuilder::new(StatusCode::Ok)
        .header("Content-Length", "999")
        .body(b"test".to_vec())
        .build();

    // Should keep the custom value
    assert_eq!(response.headers.get("Content-Length").unwrap(), "999");
}

#[test]
fn test_response_builder_empty_body() {
    let response = ResponseBuilder::new(StatusCode::Found).build();

    assert!(response.body.is_empty());
    assert_eq!(response.headers.get("Content-Length").unwrap(), "0");
}

#[test]
fn test_headers_replace_case_insensitive() {
    let mut headers = Headers::new();
    headers.set("Content-Type", "text/plain");
    headers.set("content-type", "text/html");

    // One entry, last value wins, original position kept
    assert_eq!(headers.len(), 1);
    assert_eq!(headers.get("CONTENT-TYPE").unwrap(), "text/html");
}

#[test]
fn test_headers_preserve_insertion_order() {
    let mut headers = Headers::new();
    headers.set("Content-Type", "text/html");
    headers.set("X-Content-Type-Options", "nosniff");
    headers.set("Content-Length", "12");

    let names: Vec<&str> = headers.iter().map(|(name, _)| name).collect();
    assert_eq!(
        names,
        vec!["Content-Type", "X-Content-Type-Options", "Content-Length"]
    );
}

#[test]
fn test_response_redirect_helper() {
    let response = Response::redirect("/docs/");

    assert_eq!(response.status, StatusCode::Found);
    assert_eq!(response.headers.get("Location").unwrap(), "/docs/");
    assert!(response.body.is_empty());
}

#[test]
fn test_response_internal_error_helper() {
    let response = Response::internal_error();

    assert_eq!(response.status, StatusCode::InternalServerError);
    assert_eq!(response.headers.get("Content-Type").unwrap(), "text/html");
    match response.body {
        Body::Bytes(bytes) => assert!(
            String::from_utf8(bytes)
                .unwrap()
                .contains("Internal Server Error")
        ),
        Body::File(..) => panic!("expected a materialized body"),
    }
}

#[test]
fn test_serialize_head_status_line_and_order() {
    let response = ResponseBuilder::new(StatusCode::Found)
        .header("Location", "/docs/")
        .build();

    let head = String::from_utf8(serialize_head(&response)).unwrap();

    assert!(head.starts_with("HTTP/1.1 302 Found\r\n"));
    // Headers appear in insertion order, then the auto Content-Length
    let location = head.find("Location: /docs/\r\n").unwrap();
    let length = head.find("Content-Length: 0\r\n").unwrap();
    assert!(location < length);
    assert!(head.ends_with("\r\n\r\n"));
}
