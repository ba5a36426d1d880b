use serde::{Deserialize, Serialize};
use validator::Validate;

/// Request to create a profile
#[derive(Debug, Clone, Serialize, Deserialize, Validate)]
pub struct CreateProfileRequest {
    #[validate(length(min = 4))]
    pub username: String,
    pub age: i64,
    pub gender: String,
    #[serde(alias = "preferred_gender", rename = "preferredGender")]
    pub preferred_gender: String,
    #[serde(default)]
    pub description: String,
    #[serde(default)]
    pub tags: Vec<String>,
    #[serde(default)]
    pub photos: Vec<String>,
}

/// Request to record a like on a profile
#[derive(Debug, Clone, Serialize, Deserialize, Validate)]
pub struct LikeRequest {
    #[validate(length(min = 1))]
    #[serde(alias = "liker_id", alias = "current_user_anketa_id", rename = "likerId")]
    pub liker_id: String,
}

/// Query parameters for candidate retrieval
///
/// `GET /api/v1/anketas/match?id={viewerId}&pref={Men|Women|Both}`
#[derive(Debug, Clone, Serialize, Deserialize, Validate)]
pub struct FindCandidatesQuery {
    #[validate(length(min = 1))]
    pub id: String,
    #[validate(length(min = 1))]
    pub pref: String,
}
