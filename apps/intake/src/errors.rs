use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use serde_json::json;
use thiserror::Error;

use crate::sheets::SheetsError;

/// Application-level error type.
/// Implements `IntoResponse` so Axum handlers can return `Result<T, AppError>`.
#[derive(Debug, Error)]
pub enum AppError {
    #[error("Validation error: {0}")]
    Validation(String),

    #[error("Spreadsheet error: {0}")]
    Sheets(#[from] SheetsError),
}

impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        let (status, code, message) = match &self {
            AppError::Validation(msg) => (StatusCode::BAD_REQUEST, "VALIDATION_ERROR", msg.clone()),
            AppError::Sheets(e) => {
                tracing::error!("Spreadsheet error: {e}");
                (
                    StatusCode::BAD_GATEWAY,
                    "SHEETS_ERROR",
                    "A storage error occurred".to_string(),
                )
            }
        };

        let body = Json(json!({
            "error": {
                "code": code,
                "message": message
            }
        }));

        (status, body).into_response()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_validation_maps_to_bad_request() {
        let response = AppError::Validation("missing sender".to_string()).into_response();
        assert_eq!(response.status(), StatusCode::BAD_REQUEST);
    }

    #[test]
    fn test_sheets_error_maps_to_bad_gateway() {
        let err = AppError::from(SheetsError::Api {
            status: 403,
            message: "The caller does not have permission".to_string(),
        });
        assert_eq!(
            err.to_string(),
            "Spreadsheet error: Sheets API error (status 403): The caller does not have permission"
        );
        assert_eq!(err.into_response().status(), StatusCode::BAD_GATEWAY);
    }
}
