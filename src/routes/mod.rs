// Route exports
pub mod anketas;
pub mod auth;

use actix_web::{error, http::StatusCode, web, HttpRequest, HttpResponse};
use std::sync::Arc;

use crate::models::ErrorResponse;
use crate::services::{AnketaService, AuthError, ServiceError, TokenVerifier};

/// Application state shared across all handlers
#[derive(Clone)]
pub struct AppState {
    pub service: Arc<AnketaService>,
    pub tokens: Arc<TokenVerifier>,
}

pub fn configure_routes(cfg: &mut web::ServiceConfig) {
    cfg.service(
        web::scope("/api/v1")
            .configure(anketas::configure)
            .configure(auth::configure),
    );
}

fn error_body(status: StatusCode, error: &str, message: String) -> HttpResponse {
    HttpResponse::build(status).json(ErrorResponse {
        error: error.to_string(),
        message,
        status_code: status.as_u16(),
    })
}

impl error::ResponseError for ServiceError {
    fn status_code(&self) -> StatusCode {
        match self {
            ServiceError::Validation(_) => StatusCode::BAD_REQUEST,
            ServiceError::NotFound(_) => StatusCode::NOT_FOUND,
            ServiceError::Conflict(_) => StatusCode::CONFLICT,
            ServiceError::Storage(_) => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }

    fn error_response(&self) -> HttpResponse {
        let error = match self {
            ServiceError::Validation(_) => "validation_failed",
            ServiceError::NotFound(_) => "not_found",
            ServiceError::Conflict(_) => "conflict",
            ServiceError::Storage(e) => {
                tracing::error!("Storage failure: {}", e);
                "storage_error"
            }
        };
        error_body(self.status_code(), error, self.to_string())
    }
}

impl error::ResponseError for AuthError {
    fn status_code(&self) -> StatusCode {
        match self {
            AuthError::Blacklist(_) => StatusCode::INTERNAL_SERVER_ERROR,
            _ => StatusCode::UNAUTHORIZED,
        }
    }

    fn error_response(&self) -> HttpResponse {
        let error = match self {
            AuthError::Blacklist(e) => {
                tracing::error!("Blacklist failure: {}", e);
                "blacklist_error"
            }
            _ => "unauthorized",
        };
        error_body(self.status_code(), error, self.to_string())
    }
}

/// Handle JSON payload errors
pub fn handle_json_payload_error(err: error::JsonPayloadError, req: &HttpRequest) -> actix_web::Error {
    tracing::info!("JSON payload error on {}: {}", req.path(), err);
    let response = error_body(
        StatusCode::BAD_REQUEST,
        "invalid_json",
        format!("Invalid JSON: {}", err),
    );
    error::InternalError::from_response(err, response).into()
}

/// Handle query payload errors
pub fn handle_query_payload_error(err: error::QueryPayloadError, _req: &HttpRequest) -> actix_web::Error {
    let response = error_body(
        StatusCode::BAD_REQUEST,
        "invalid_query",
        format!("Invalid query: {}", err),
    );
    error::InternalError::from_response(err, response).into()
}

/// Render `validator` failures the same way as domain validation failures
pub(crate) fn validation_failed(errors: validator::ValidationErrors) -> HttpResponse {
    tracing::info!("Request validation failed: {:?}", errors);
    error_body(StatusCode::BAD_REQUEST, "validation_failed", errors.to_string())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::ValidationError;
    use actix_web::ResponseError;
    use uuid::Uuid;

    #[test]
    fn test_service_error_status_mapping() {
        let id = Uuid::new_v4();

        assert_eq!(ServiceError::NotFound(id).status_code(), StatusCode::NOT_FOUND);
        assert_eq!(ServiceError::Conflict(id).status_code(), StatusCode::CONFLICT);
        assert_eq!(
            ServiceError::Validation(ValidationError::EmptyUpdate).status_code(),
            StatusCode::BAD_REQUEST
        );
    }

    #[test]
    fn test_auth_error_is_unauthorized() {
        assert_eq!(AuthError::MissingToken.status_code(), StatusCode::UNAUTHORIZED);
        assert_eq!(AuthError::Revoked.status_code(), StatusCode::UNAUTHORIZED);
    }
}
