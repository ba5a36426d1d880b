use actix_web::{http::header, web, HttpRequest, HttpResponse};

use crate::models::TokenStatusResponse;
use crate::routes::AppState;
use crate::services::{AuthError, TokenVerifier};

pub fn configure(cfg: &mut web::ServiceConfig) {
    cfg
        .route("/auth/verify", web::get().to(verify_token))
        .route("/auth/revoke", web::post().to(revoke_token));
}

fn bearer(req: &HttpRequest) -> Result<&str, AuthError> {
    let value = req
        .headers()
        .get(header::AUTHORIZATION)
        .and_then(|v| v.to_str().ok());
    TokenVerifier::bearer(value)
}

async fn verify_token(
    state: web::Data<AppState>,
    req: HttpRequest,
) -> Result<HttpResponse, AuthError> {
    let claims = state.tokens.verify(bearer(&req)?).await?;

    Ok(HttpResponse::Ok().json(TokenStatusResponse {
        status: "valid".to_string(),
        subject: claims.sub,
        expires_at: claims.exp,
    }))
}

/// Revoke the presented bearer token until it expires
async fn revoke_token(
    state: web::Data<AppState>,
    req: HttpRequest,
) -> Result<HttpResponse, AuthError> {
    let claims = state.tokens.revoke(bearer(&req)?).await?;

    Ok(HttpResponse::Ok().json(TokenStatusResponse {
        status: "revoked".to_string(),
        subject: claims.sub,
        expires_at: claims.exp,
    }))
}
