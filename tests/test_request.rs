use webserve::http::request::{Method, Request};

#[test]
fn test_method_parse_known() {
    assert_eq!(Method::parse("GET"), Method::GET);
    assert_eq!(Method::parse("HEAD"), Method::HEAD);
    assert_eq!(Method::parse("POST"), Method::POST);
    assert_eq!(Method::parse("PUT"), Method::PUT);
    assert_eq!(Method::parse("DELETE"), Method::DELETE);
}

#[test]
fn test_method_parse_is_case_sensitive() {
    assert_eq!(Method::parse("get"), Method::Extension("get".to_string()));
}

#[test]
fn test_method_as_str() {
    assert_eq!(Method::GET.as_str(), "GET");
    assert_eq!(Method::Extension("PATCH".to_string()).as_str(), "PATCH");
}

#[test]
fn test_request_display() {
    let req = Request {
        method: Method::HEAD,
        path: "/style.css".to_string(),
        version: "HTTP/1.1".to_string(),
    };

    assert_eq!(req.to_string(), "HEAD /style.css HTTP/1.1");
}
