// Response builders for the shifts API
// Every response, success or error, carries the permissive CORS headers.

use crate::logger;
use http_body_util::Full;
use hyper::body::Bytes;
use hyper::{Response, StatusCode};
use serde::Serialize;

const ALLOW_METHODS: &str = "GET, POST, PUT, DELETE, OPTIONS";

fn cors_builder(status: StatusCode) -> hyper::http::response::Builder {
    Response::builder()
        .status(status)
        .header("Access-Control-Allow-Origin", "*")
        .header("Access-Control-Allow-Methods", ALLOW_METHODS)
        .header("Access-Control-Allow-Headers", "Content-Type")
}

fn fallback(err: hyper::http::Error) -> Response<Full<Bytes>> {
    logger::log_error(&format!("Failed to build response: {err}"));
    Response::new(Full::new(Bytes::from("Error")))
}

/// Build JSON response
pub fn json_response<T: Serialize>(status: StatusCode, body: &T) -> Response<Full<Bytes>> {
    let json = match serde_json::to_string(body) {
        Ok(j) => j,
        Err(e) => {
            logger::log_error(&format!("Failed to serialize response: {e}"));
            return internal_error("Internal server error");
        }
    };

    cors_builder(status)
        .header("Content-Type", "application/json")
        .body(Full::new(Bytes::from(json)))
        .unwrap_or_else(fallback)
}

/// 204 No Content (successful DELETE and CORS preflight)
pub fn no_content() -> Response<Full<Bytes>> {
    cors_builder(StatusCode::NO_CONTENT)
        .body(Full::new(Bytes::new()))
        .unwrap_or_else(fallback)
}

/// 404 Not Found. Shared by missing records and unknown routes; callers
/// cannot tell the two apart.
pub fn not_found() -> Response<Full<Bytes>> {
    cors_builder(StatusCode::NOT_FOUND)
        .header("Content-Type", "text/plain")
        .body(Full::new(Bytes::from("Not found")))
        .unwrap_or_else(fallback)
}

/// 400 Bad Request with a JSON error body
pub fn bad_request(message: &str) -> Response<Full<Bytes>> {
    let body = serde_json::json!({ "error": message });
    cors_builder(StatusCode::BAD_REQUEST)
        .header("Content-Type", "application/json")
        .body(Full::new(Bytes::from(body.to_string())))
        .unwrap_or_else(fallback)
}

/// 500 Internal Server Error with a JSON error body
pub fn internal_error(message: &str) -> Response<Full<Bytes>> {
    let body = serde_json::json!({ "error": message });
    cors_builder(StatusCode::INTERNAL_SERVER_ERROR)
        .header("Content-Type", "application/json")
        .body(Full::new(Bytes::from(body.to_string())))
        .unwrap_or_else(fallback)
}
