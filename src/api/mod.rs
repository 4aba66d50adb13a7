// Shifts API module
// REST-style CRUD over the flat-file shift store

mod handlers;
mod response;
mod types;

use http_body_util::{BodyExt, Full};
use hyper::body::Bytes;
use hyper::{Method, Request, Response};
use std::convert::Infallible;
use std::sync::Arc;

use crate::config::AppState;
use crate::logger;

/// API route handler
///
/// Dispatches to handler functions based on request method and path. Generic
/// over the body type so tests can drive it with pre-built bodies.
pub async fn handle_request<B>(
    req: Request<B>,
    state: Arc<AppState>,
) -> Result<Response<Full<Bytes>>, Infallible>
where
    B: hyper::body::Body,
    B::Error: std::fmt::Display,
{
    let method = req.method().clone();
    let path = req.uri().path().to_string();

    if state.config.logging.access_log {
        logger::log_request(req.method(), req.uri(), req.version());
    }
    logger::log_headers_count(req.headers().len(), state.config.logging.show_headers);

    // CORS preflight, any path
    if method == Method::OPTIONS {
        logger::log_api_request("OPTIONS", &path, 204);
        return Ok(response::no_content());
    }

    match (method, path.as_str()) {
        (Method::GET, "/api/shifts") => Ok(handlers::list_shifts(state).await),
        (Method::POST, "/api/shifts") => match read_json_body(req).await {
            Ok(payload) => Ok(handlers::create_shift(state, payload).await),
            Err(resp) => {
                logger::log_api_request("POST", &path, 400);
                Ok(resp)
            }
        },
        (method @ (Method::PUT | Method::DELETE), p) if p.starts_with("/api/shifts/") => {
            // A non-numeric trailing segment is a guaranteed lookup miss,
            // indistinguishable from a missing record.
            let Some(id) = id_segment(p) else {
                logger::log_api_request(method.as_str(), &path, 404);
                return Ok(response::not_found());
            };
            if method == Method::PUT {
                match read_json_body(req).await {
                    Ok(payload) => Ok(handlers::update_shift(state, id, payload).await),
                    Err(resp) => {
                        logger::log_api_request("PUT", &path, 400);
                        Ok(resp)
                    }
                }
            } else {
                Ok(handlers::delete_shift(state, id).await)
            }
        }
        (method, _) => {
            logger::log_api_request(method.as_str(), &path, 404);
            Ok(response::not_found())
        }
    }
}

/// Extract the numeric id from the final path segment
fn id_segment(path: &str) -> Option<u64> {
    path.rsplit('/').next().and_then(|s| s.parse().ok())
}

/// Buffer the whole request body, then decode it as JSON. Either failure
/// becomes a 400 response for the caller to return as-is.
async fn read_json_body<T, B>(req: Request<B>) -> Result<T, Response<Full<Bytes>>>
where
    T: serde::de::DeserializeOwned,
    B: hyper::body::Body,
    B::Error: std::fmt::Display,
{
    let body = match req.into_body().collect().await {
        Ok(collected) => collected.to_bytes(),
        Err(e) => {
            logger::log_error(&format!("Failed to read request body: {e}"));
            return Err(response::bad_request("Failed to read request body"));
        }
    };

    serde_json::from_slice(&body).map_err(|e| response::bad_request(&format!("Invalid JSON: {e}")))
}
