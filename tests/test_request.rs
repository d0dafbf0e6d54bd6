use mediaserve::http::connection::Route;
use mediaserve::http::parser::parse_http_request;
use mediaserve::http::request::{Method, Request};

fn request(method: &str, target: &str, headers: &[(&str, &str)]) -> Request {
    Request {
        method: method.to_string(),
        target: target.to_string(),
        version: "HTTP/1.1".to_string(),
        headers: headers
            .iter()
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect(),
    }
}

#[test]
fn test_request_header_retrieval() {
    let req = request("GET", "/", &[("host:", "example.com"), ("range:", "bytes=10-")]);

    assert_eq!(req.header("host"), Some("example.com"));
    assert_eq!(req.header("Host:"), Some("example.com"));
    assert_eq!(req.header("RANGE"), Some("bytes=10-"));
    assert_eq!(req.header("missing"), None);
}

#[test]
fn test_request_range_header() {
    let req = request("GET", "/0", &[("range:", "bytes=500-")]);
    assert_eq!(req.range(), Some("bytes=500-"));

    let req = request("GET", "/0", &[]);
    assert_eq!(req.range(), None);
}

#[test]
fn test_request_index_parsing() {
    assert_eq!(request("GET", "/3", &[]).index(), Some(3));
    assert_eq!(request("GET", "/-1", &[]).index(), Some(-1));
    assert_eq!(request("GET", "/", &[]).index(), None);
    assert_eq!(request("GET", "/movie.mp4", &[]).index(), None);
}

#[test]
fn test_request_malformed() {
    assert!(Request::default().is_malformed());
    assert!(!request("GET", "/", &[]).is_malformed());
}

#[test]
fn test_request_method_from_string() {
    assert_eq!(Method::from_str("GET"), Some(Method::GET));
    assert_eq!(Method::from_str("get"), Some(Method::GET));
    assert_eq!(Method::from_str("Head"), Some(Method::HEAD));
    assert_eq!(Method::from_str("POST"), None);
    assert_eq!(Method::from_str(""), None);
}

#[test]
fn test_route_listing_for_root_and_non_numeric() {
    assert_eq!(
        Route::of(&request("GET", "/", &[])),
        Route::Listing { head_only: false }
    );
    assert_eq!(
        Route::of(&request("GET", "/not-a-number", &[])),
        Route::Listing { head_only: false }
    );
    assert_eq!(
        Route::of(&request("HEAD", "/", &[])),
        Route::Listing { head_only: true }
    );
}

#[test]
fn test_route_numeric_targets() {
    assert_eq!(Route::of(&request("GET", "/0", &[])), Route::Media(0));
    assert_eq!(Route::of(&request("get", "/7", &[])), Route::Media(7));
    assert_eq!(Route::of(&request("HEAD", "/2", &[])), Route::Head(2));
    assert_eq!(Route::of(&request("GET", "/-4", &[])), Route::Media(-4));
}

#[test]
fn test_route_ignores_favicon_bad_methods_and_malformed() {
    assert_eq!(Route::of(&request("GET", "/favicon.ico", &[])), Route::Ignore);
    assert_eq!(Route::of(&request("HEAD", "/x/favicon.ico", &[])), Route::Ignore);
    assert_eq!(Route::of(&request("POST", "/0", &[])), Route::Ignore);
    assert_eq!(Route::of(&request("DELETE", "/", &[])), Route::Ignore);
    assert_eq!(Route::of(&parse_http_request(b"GET\r\n\r\n")), Route::Ignore);
}
