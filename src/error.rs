// ============================================================================
// ERREURS DE L'APPLICATION
// ============================================================================
//
// Description:
//   Ensemble fermé des erreurs retournées par les services et les routes.
//   Chaque variante est convertie en réponse HTTP par ResponseError.
//
// Points d'attention:
//   - TokenNotFound et TokenExpired donnent la MÊME réponse (404, même message)
//     pour ne pas révéler si un token a existé
//   - ContractViolation = bug entre les deux requêtes produits → 500
//   - Les détails internes (DB, hash, SMTP) sont loggés, jamais renvoyés
//
// ============================================================================

use actix_web::{HttpResponse, ResponseError, http::StatusCode};
use sea_orm::DbErr;
use thiserror::Error;
use validator::ValidationErrors;

pub type AppResult<T> = Result<T, AppError>;

#[derive(Debug, Error)]
pub enum AppError {
    #[error("Database error: {0}")]
    Database(#[from] DbErr),

    #[error("Validation error: {0}")]
    Validation(#[from] ValidationErrors),

    #[error("Bad request: {0}")]
    BadRequest(String),

    /// Token inconnu, déjà consommé ou fabriqué
    #[error("Recover token not found")]
    TokenNotFound,

    /// Token connu mais la date d'expiration est passée
    #[error("Recover token expired")]
    TokenExpired,

    /// Les deux requêtes (projection / entités complètes) ne décrivent pas les mêmes ids
    #[error("Projection contract violated (missing: {missing:?}, unexpected: {unexpected:?})")]
    ContractViolation {
        missing: Vec<String>,
        unexpected: Vec<String>,
    },

    #[error("Notifier error: {0}")]
    Notifier(String),

    #[error("Password hashing error: {0}")]
    Hashing(String),

    #[error("Configuration error: {0}")]
    Config(String),
}

impl ResponseError for AppError {
    fn status_code(&self) -> StatusCode {
        match self {
            AppError::Validation(_) | AppError::BadRequest(_) => StatusCode::BAD_REQUEST,
            AppError::TokenNotFound | AppError::TokenExpired => StatusCode::NOT_FOUND,
            AppError::Database(_)
            | AppError::ContractViolation { .. }
            | AppError::Notifier(_)
            | AppError::Hashing(_)
            | AppError::Config(_) => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }

    fn error_response(&self) -> HttpResponse {
        let status = self.status_code();

        match self {
            AppError::Validation(errors) => HttpResponse::build(status).json(serde_json::json!({
                "error": "Invalid request body",
                "details": errors
            })),
            AppError::BadRequest(message) => HttpResponse::build(status).json(serde_json::json!({
                "error": message
            })),
            AppError::TokenNotFound | AppError::TokenExpired => {
                HttpResponse::build(status).json(serde_json::json!({
                    "error": "Invalid or expired token"
                }))
            }
            _ => {
                tracing::error!(error = %self, "request aborted with internal error");
                HttpResponse::build(status).json(serde_json::json!({
                    "error": "Internal server error"
                }))
            }
        }
    }
}
