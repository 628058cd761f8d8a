use actix_web::{HttpResponse, ResponseError, http::StatusCode};
use sea_orm::{DbErr, SqlErr};
use thiserror::Error as ThisError;
use validator::ValidationErrors;

#[derive(ThisError, Debug)]
pub enum AppError {
    /// Données invalides ou règle métier violée
    #[error("{0}")]
    BadRequest(String),

    /// Formulaire rejeté par validator
    #[error("Invalid form data")]
    Validation(#[from] ValidationErrors),

    #[error("{0}")]
    Unauthorized(String),

    #[error("{0}")]
    NotFound(String),

    #[error("{0}")]
    Conflict(String),

    /// Erreur interne (détail loggé, jamais renvoyé au client)
    #[error("Failed to {0}")]
    Internal(String),

    #[error(transparent)]
    Database(#[from] DbErr),
}

impl AppError {
    pub fn internal(operation: impl std::fmt::Display) -> Self {
        AppError::Internal(operation.to_string())
    }

    /// Violation de contrainte UNIQUE -> 409, le reste reste une erreur base
    /// Couvre la course entre la vérification préalable et l'INSERT/UPDATE
    pub fn conflict_on_unique(err: DbErr, message: &str) -> Self {
        match err.sql_err() {
            Some(SqlErr::UniqueConstraintViolation(_)) => AppError::Conflict(message.to_string()),
            _ => AppError::Database(err),
        }
    }

    /// Message renvoyé au client, sans fuite des détails d'implémentation
    pub fn user_message(&self) -> String {
        match self {
            AppError::Internal(_) | AppError::Database(_) => "Internal server error".to_string(),
            other => other.to_string(),
        }
    }
}

impl ResponseError for AppError {
    fn status_code(&self) -> StatusCode {
        match self {
            AppError::BadRequest(_) | AppError::Validation(_) => StatusCode::BAD_REQUEST,
            AppError::Unauthorized(_) => StatusCode::UNAUTHORIZED,
            AppError::NotFound(_) => StatusCode::NOT_FOUND,
            AppError::Conflict(_) => StatusCode::CONFLICT,
            AppError::Internal(_) | AppError::Database(_) => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }

    fn error_response(&self) -> HttpResponse {
        let status = self.status_code();
        if status.is_server_error() {
            tracing::error!(error = %self, "request failed");
        }

        match self {
            AppError::Validation(errors) => HttpResponse::build(status).json(serde_json::json!({
                "error": self.user_message(),
                "fields": errors,
            })),
            _ => HttpResponse::build(status).json(serde_json::json!({
                "error": self.user_message()
            })),
        }
    }
}
