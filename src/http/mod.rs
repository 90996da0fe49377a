//! HTTP protocol layer module
//!
//! Response builders and header decoration shared by the router and the
//! API handlers.

pub mod response;

use http_body_util::Full;
use hyper::body::Bytes;
use hyper::header::{HeaderValue, ACCESS_CONTROL_ALLOW_ORIGIN, SERVER};
use hyper::Response;

use crate::config::HttpConfig;

// Re-export commonly used builders
pub use response::{
    build_404_response, build_405_response, build_413_response, build_health_response,
    build_options_response, build_preflight_response, json_response,
};

/// Add the headers every response carries: `Server`, and the CORS origin
/// header when cross-origin access is enabled.
pub fn decorate(resp: &mut Response<Full<Bytes>>, http: &HttpConfig) {
    let headers = resp.headers_mut();
    if let Ok(name) = HeaderValue::from_str(&http.server_name) {
        headers.insert(SERVER, name);
    }
    if http.enable_cors {
        headers.insert(ACCESS_CONTROL_ALLOW_ORIGIN, HeaderValue::from_static("*"));
    }
}

/// Whether a `Content-Type` header value names the given media type,
/// ignoring parameters such as `charset`
pub fn is_media_type(content_type: Option<&str>, expected: &str) -> bool {
    content_type
        .and_then(|ct| ct.split(';').next())
        .is_some_and(|essence| essence.trim().eq_ignore_ascii_case(expected))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_is_media_type() {
        assert!(is_media_type(Some("application/json"), "application/json"));
        assert!(is_media_type(
            Some("Application/JSON; charset=utf-8"),
            "application/json"
        ));
        assert!(!is_media_type(Some("text/plain"), "application/json"));
        assert!(!is_media_type(None, "application/json"));
    }

    #[test]
    fn test_decorate_adds_cors_and_server() {
        let mut http = HttpConfig::default();
        let mut resp = build_404_response();
        decorate(&mut resp, &http);
        assert_eq!(resp.headers()["access-control-allow-origin"], "*");
        assert_eq!(resp.headers()["server"], http.server_name.as_str());

        http.enable_cors = false;
        let mut resp = build_404_response();
        decorate(&mut resp, &http);
        assert!(resp.headers().get("access-control-allow-origin").is_none());
    }
}
