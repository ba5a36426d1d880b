use actix_web::{web, HttpResponse};
use serde_json::{Map, Value};
use validator::Validate;

use crate::models::{
    domain::parse_profile_id, CandidatesResponse, CreateProfileRequest, CreatedResponse,
    FindCandidatesQuery, HealthResponse, LikeOutcome, LikeRequest, LikeResponse,
    MessageResponse, PreferredGender, TagsResponse,
};
use crate::routes::{validation_failed, AppState};
use crate::services::{AnketaService, ServiceError};

/// Configure all profile-related routes
pub fn configure(cfg: &mut web::ServiceConfig) {
    cfg
        .route("/health", web::get().to(health_check))
        .route("/tags", web::get().to(list_tags))
        .route("/anketas", web::post().to(create_anketa))
        // Registered before `/anketas/{id}` so "match" is not taken for an id
        .route("/anketas/match", web::get().to(find_candidates))
        .route("/anketas/{id}", web::get().to(get_anketa))
        .route("/anketas/{id}", web::patch().to(update_anketa))
        .route("/anketas/{id}", web::delete().to(delete_anketa))
        .route("/anketas/{id}/like", web::post().to(like_anketa));
}

/// Health check endpoint
async fn health_check(state: web::Data<AppState>) -> HttpResponse {
    let healthy = state.service.health_check().await.unwrap_or(false);

    let status = if healthy { "healthy" } else { "degraded" };

    HttpResponse::Ok().json(HealthResponse {
        status: status.to_string(),
        version: env!("CARGO_PKG_VERSION").to_string(),
        timestamp: chrono::Utc::now(),
    })
}

async fn list_tags() -> HttpResponse {
    HttpResponse::Ok().json(TagsResponse {
        tags: AnketaService::tags().to_vec(),
    })
}

/// Create a profile
///
/// POST /api/v1/anketas
///
/// Request body:
/// ```json
/// {
///   "username": "alice_01",
///   "age": 24,
///   "gender": "Woman",
///   "preferredGender": "Men",
///   "description": "string",
///   "tags": ["Sport", "Books"],
///   "photos": ["https://..."]
/// }
/// ```
async fn create_anketa(
    state: web::Data<AppState>,
    req: web::Json<CreateProfileRequest>,
) -> Result<HttpResponse, ServiceError> {
    if let Err(errors) = req.validate() {
        return Ok(validation_failed(errors));
    }

    let profile = state.service.create(req.into_inner()).await?;

    Ok(HttpResponse::Created().json(CreatedResponse {
        message: "Anketa created".to_string(),
        anketa_id: profile.id.to_string(),
    }))
}

async fn get_anketa(
    state: web::Data<AppState>,
    path: web::Path<String>,
) -> Result<HttpResponse, ServiceError> {
    let id = parse_profile_id(&path).map_err(ServiceError::from)?;
    let profile = state.service.get(id).await?;

    Ok(HttpResponse::Ok().json(profile))
}

/// Partially update a profile
///
/// PATCH /api/v1/anketas/{id}
///
/// The body is a JSON object holding only the fields to overwrite.
async fn update_anketa(
    state: web::Data<AppState>,
    path: web::Path<String>,
    fields: web::Json<Map<String, Value>>,
) -> Result<HttpResponse, ServiceError> {
    let id = parse_profile_id(&path).map_err(ServiceError::from)?;
    state.service.update(id, &fields).await?;

    Ok(HttpResponse::Ok().json(MessageResponse {
        message: "Anketa updated".to_string(),
    }))
}

async fn delete_anketa(
    state: web::Data<AppState>,
    path: web::Path<String>,
) -> Result<HttpResponse, ServiceError> {
    let id = parse_profile_id(&path).map_err(ServiceError::from)?;
    state.service.delete(id).await?;

    Ok(HttpResponse::Ok().json(MessageResponse {
        message: "Anketa deleted".to_string(),
    }))
}

/// Record a like
///
/// POST /api/v1/anketas/{id}/like
///
/// Request body:
/// ```json
/// { "likerId": "uuid" }
/// ```
async fn like_anketa(
    state: web::Data<AppState>,
    path: web::Path<String>,
    req: web::Json<LikeRequest>,
) -> Result<HttpResponse, ServiceError> {
    if let Err(errors) = req.validate() {
        return Ok(validation_failed(errors));
    }

    let target = parse_profile_id(&path).map_err(ServiceError::from)?;
    let liker = parse_profile_id(&req.liker_id).map_err(ServiceError::from)?;

    let outcome = state.service.like(target, liker).await?;
    let already_liked = outcome == LikeOutcome::AlreadyLiked;
    let message = if already_liked { "Already liked" } else { "Like recorded" };

    Ok(HttpResponse::Ok().json(LikeResponse {
        message: message.to_string(),
        already_liked,
    }))
}

/// Ranked candidates for a viewer
///
/// GET /api/v1/anketas/match?id={viewerId}&pref={Men|Women|Both}
async fn find_candidates(
    state: web::Data<AppState>,
    query: web::Query<FindCandidatesQuery>,
) -> Result<HttpResponse, ServiceError> {
    if let Err(errors) = query.validate() {
        return Ok(validation_failed(errors));
    }

    let viewer_id = parse_profile_id(&query.id).map_err(ServiceError::from)?;
    let preference: PreferredGender = query.pref.parse().map_err(ServiceError::from)?;

    tracing::info!("Finding candidates for {} (pref {})", viewer_id, preference);

    let anketas = state.service.find_candidates(viewer_id, preference).await?;

    tracing::info!("Returning {} candidates for {}", anketas.len(), viewer_id);

    Ok(HttpResponse::Ok().json(CandidatesResponse { anketas }))
}
