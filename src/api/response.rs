use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use axum::Json;
use chrono::Utc;
use serde::Serialize;

/// Envelope returned by every JSON route: `{ "data": ..., "meta": {...} }`.
#[derive(Serialize)]
pub struct ApiResponse<T> {
    pub data: Option<T>,
    pub meta: ResponseMeta,
}

#[derive(Serialize)]
pub struct ResponseMeta {
    pub status: &'static str,
    pub status_code: u16,
    pub timestamp: String,
    pub message: Option<String>,
}

impl ResponseMeta {
    fn new(status: StatusCode, message: Option<String>) -> Self {
        ResponseMeta {
            status: if status.is_success() { "success" } else { "error" },
            status_code: status.as_u16(),
            timestamp: Utc::now().to_rfc3339(),
            message,
        }
    }
}

pub fn success<T: Serialize>(data: T) -> Response {
    let body = ApiResponse {
        data: Some(data),
        meta: ResponseMeta::new(StatusCode::OK, None),
    };
    (StatusCode::OK, Json(body)).into_response()
}

pub fn error(status: StatusCode, message: String) -> Response {
    let body: ApiResponse<()> = ApiResponse {
        data: None,
        meta: ResponseMeta::new(status, Some(message)),
    };
    (status, Json(body)).into_response()
}
