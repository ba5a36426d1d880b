use serde::{Deserialize, Serialize};

use crate::models::domain::{Profile, Tag};

/// Response for the candidate retrieval endpoint
///
/// `anketas` is always present; an empty pool serializes as `[]`.
#[derive(Debug, Clone, Serialize)]
pub struct CandidatesResponse {
    pub anketas: Vec<Profile>,
}

/// Response for profile creation
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CreatedResponse {
    pub message: String,
    #[serde(rename = "anketaId")]
    pub anketa_id: String,
}

/// Response for like mutations
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LikeResponse {
    pub message: String,
    #[serde(rename = "alreadyLiked")]
    pub already_liked: bool,
}

/// Generic acknowledgement
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct MessageResponse {
    pub message: String,
}

/// Closed tag vocabulary
#[derive(Debug, Clone, Serialize)]
pub struct TagsResponse {
    pub tags: Vec<Tag>,
}

/// Health check response
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct HealthResponse {
    pub status: String,
    pub version: String,
    pub timestamp: chrono::DateTime<chrono::Utc>,
}

/// Token verification response
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TokenStatusResponse {
    pub status: String,
    pub subject: Option<String>,
    #[serde(rename = "expiresAt")]
    pub expires_at: i64,
}

/// Error response
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ErrorResponse {
    pub error: String,
    pub message: String,
    #[serde(rename = "statusCode")]
    pub status_code: u16,
}
