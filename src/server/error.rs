use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use axum::Json;
use serde_json::json;

use crate::api::StoreError;

/// Error returned by a handler, rendered as `{ "error": <message> }`.
#[derive(Debug)]
pub enum ApiError {
    Store(StoreError),
    BadRequest(String),
}

impl From<StoreError> for ApiError {
    fn from(e: StoreError) -> Self {
        ApiError::Store(e)
    }
}

impl ApiError {
    fn status(&self) -> StatusCode {
        match self {
            ApiError::BadRequest(_) => StatusCode::BAD_REQUEST,
            ApiError::Store(StoreError::NotFound { .. }) => StatusCode::NOT_FOUND,
            ApiError::Store(StoreError::InvalidTarget(_)) => StatusCode::BAD_REQUEST,
            ApiError::Store(StoreError::Validation(_)) => StatusCode::UNPROCESSABLE_ENTITY,
            ApiError::Store(_) => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let status = self.status();
        let message = match self {
            ApiError::BadRequest(msg) => msg,
            ApiError::Store(StoreError::NotFound { kind, .. }) => format!("{} not found", kind),
            ApiError::Store(StoreError::InvalidTarget(msg)) => msg,
            ApiError::Store(StoreError::Validation(msg)) => msg,
            ApiError::Store(e) => {
                tracing::error!(error = %e, "request failed");
                "Internal Server Error".to_string()
            }
        };
        (status, Json(json!({ "error": message }))).into_response()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn maps_store_errors_to_statuses() {
        let cases = [
            (StoreError::prompt_not_found("x"), StatusCode::NOT_FOUND),
            (
                StoreError::InvalidTarget("same".into()),
                StatusCode::BAD_REQUEST,
            ),
            (
                StoreError::Validation("empty".into()),
                StatusCode::UNPROCESSABLE_ENTITY,
            ),
            (
                StoreError::Backend("disk".into()),
                StatusCode::INTERNAL_SERVER_ERROR,
            ),
        ];
        for (err, status) in cases {
            assert_eq!(ApiError::from(err).into_response().status(), status);
        }
    }
}
