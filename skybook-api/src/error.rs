use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use serde_json::json;
use skybook_core::DomainError;

#[derive(Debug, thiserror::Error)]
pub enum AppError {
    #[error(transparent)]
    Domain(#[from] DomainError),
    #[error(transparent)]
    Internal(#[from] anyhow::Error),
}

impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        let (status, error_message) = match self {
            AppError::Domain(err) => {
                let status = match &err {
                    DomainError::MissingField(_) | DomainError::InvalidField { .. } => {
                        StatusCode::BAD_REQUEST
                    }
                    DomainError::Conflict(_) => StatusCode::CONFLICT,
                    DomainError::Reference(_) => StatusCode::UNPROCESSABLE_ENTITY,
                    DomainError::NotFound(_) => StatusCode::NOT_FOUND,
                };
                (status, err.to_string())
            }
            AppError::Internal(err) => {
                tracing::error!("Internal Server Error: {}", err);
                (
                    StatusCode::INTERNAL_SERVER_ERROR,
                    "Internal Server Error".to_string(),
                )
            }
        };

        let body = Json(json!({
            "error": error_message,
        }));

        (status, body).into_response()
    }
}
