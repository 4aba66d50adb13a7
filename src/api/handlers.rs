// CRUD handlers for the shift collection
//
// Each mutating handler holds `store_lock` across its read-mutate-write
// sequence so two concurrent writers cannot lose an update.

use http_body_util::Full;
use hyper::body::Bytes;
use hyper::{Response, StatusCode};
use std::sync::Arc;

use super::response::{internal_error, json_response, no_content, not_found};
use super::types::ShiftPayload;
use crate::config::AppState;
use crate::logger;
use crate::store::{next_id, StoreError};

const BASE_PATH: &str = "/api/shifts";

fn store_failure(context: &str, err: &StoreError) -> Response<Full<Bytes>> {
    logger::log_error(&format!("{context}: {err}"));
    internal_error("storage failure")
}

/// GET /api/shifts - full collection as a JSON array
pub async fn list_shifts(state: Arc<AppState>) -> Response<Full<Bytes>> {
    match state.store.read_all().await {
        Ok(shifts) => {
            logger::log_api_request("GET", BASE_PATH, 200);
            json_response(StatusCode::OK, &shifts)
        }
        Err(e) => {
            logger::log_api_request("GET", BASE_PATH, 500);
            store_failure("Failed to read shifts", &e)
        }
    }
}

/// POST /api/shifts - assign a new id, append, persist
pub async fn create_shift(state: Arc<AppState>, payload: ShiftPayload) -> Response<Full<Bytes>> {
    let _guard = state.store_lock.lock().await;

    let mut shifts = match state.store.read_all().await {
        Ok(shifts) => shifts,
        Err(e) => {
            logger::log_api_request("POST", BASE_PATH, 500);
            return store_failure("Failed to read shifts", &e);
        }
    };

    let shift = payload.into_shift(next_id(&shifts));
    shifts.push(shift.clone());

    match state.store.write_all(&shifts).await {
        Ok(()) => {
            logger::log_api_request("POST", BASE_PATH, 200);
            json_response(StatusCode::OK, &shift)
        }
        Err(e) => {
            logger::log_api_request("POST", BASE_PATH, 500);
            store_failure("Failed to persist new shift", &e)
        }
    }
}

/// PUT /api/shifts/{id} - replace the record in place, keeping the path id
pub async fn update_shift(
    state: Arc<AppState>,
    id: u64,
    payload: ShiftPayload,
) -> Response<Full<Bytes>> {
    let path = format!("{BASE_PATH}/{id}");
    let _guard = state.store_lock.lock().await;

    let mut shifts = match state.store.read_all().await {
        Ok(shifts) => shifts,
        Err(e) => {
            logger::log_api_request("PUT", &path, 500);
            return store_failure("Failed to read shifts", &e);
        }
    };

    let Some(idx) = shifts.iter().position(|s| s.id == id) else {
        logger::log_api_request("PUT", &path, 404);
        return not_found();
    };

    shifts[idx] = payload.into_shift(id);

    match state.store.write_all(&shifts).await {
        Ok(()) => {
            logger::log_api_request("PUT", &path, 200);
            json_response(StatusCode::OK, &shifts[idx])
        }
        Err(e) => {
            logger::log_api_request("PUT", &path, 500);
            store_failure("Failed to persist updated shift", &e)
        }
    }
}

/// DELETE /api/shifts/{id} - remove the record, persist, 204
pub async fn delete_shift(state: Arc<AppState>, id: u64) -> Response<Full<Bytes>> {
    let path = format!("{BASE_PATH}/{id}");
    let _guard = state.store_lock.lock().await;

    let mut shifts = match state.store.read_all().await {
        Ok(shifts) => shifts,
        Err(e) => {
            logger::log_api_request("DELETE", &path, 500);
            return store_failure("Failed to read shifts", &e);
        }
    };

    let Some(idx) = shifts.iter().position(|s| s.id == id) else {
        logger::log_api_request("DELETE", &path, 404);
        return not_found();
    };

    shifts.remove(idx);

    match state.store.write_all(&shifts).await {
        Ok(()) => {
            logger::log_api_request("DELETE", &path, 204);
            no_content()
        }
        Err(e) => {
            logger::log_api_request("DELETE", &path, 500);
            store_failure("Failed to persist shift deletion", &e)
        }
    }
}
