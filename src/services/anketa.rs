use serde_json::{Map, Value};
use std::sync::Arc;
use thiserror::Error;
use uuid::Uuid;

use crate::core::Matcher;
use crate::models::{
    domain::{parse_photos, parse_tags},
    Age, CreateProfileRequest, LikeOutcome, PreferredGender, Profile, ProfileId, ProfileUpdate, Tag,
    Username, ValidationError,
};
use crate::services::repository::{ProfileBackend, RepositoryError};

/// Errors surfaced to callers of [`AnketaService`]
#[derive(Debug, Error)]
pub enum ServiceError {
    #[error("Validation failed: {0}")]
    Validation(#[from] ValidationError),

    #[error("Profile not found: {0}")]
    NotFound(ProfileId),

    #[error("Profile already exists: {0}")]
    Conflict(ProfileId),

    #[error("Storage error: {0}")]
    Storage(RepositoryError),
}

impl From<RepositoryError> for ServiceError {
    fn from(err: RepositoryError) -> Self {
        match err {
            RepositoryError::NotFound(id) => ServiceError::NotFound(id),
            RepositoryError::Conflict(id) => ServiceError::Conflict(id),
            other => ServiceError::Storage(other),
        }
    }
}

/// Profile lifecycle and candidate retrieval
///
/// Owns no state besides its collaborators: a storage backend and the
/// ranking engine. Collaborator errors propagate unchanged, without retries.
pub struct AnketaService {
    backend: Arc<dyn ProfileBackend>,
    matcher: Matcher,
}

impl AnketaService {
    pub fn new(backend: Arc<dyn ProfileBackend>, matcher: Matcher) -> Self {
        Self { backend, matcher }
    }

    pub fn matcher(&self) -> &Matcher {
        &self.matcher
    }

    /// Closed tag vocabulary
    pub fn tags() -> &'static [Tag] {
        &Tag::ALL
    }

    pub async fn health_check(&self) -> Result<bool, ServiceError> {
        Ok(self.backend.health_check().await?)
    }

    /// Validate every field, then persist under a fresh id
    ///
    /// Nothing is stored if any value is invalid.
    pub async fn create(&self, request: CreateProfileRequest) -> Result<Profile, ServiceError> {
        let profile = Profile {
            id: Uuid::new_v4(),
            username: Username::new(&request.username)?,
            age: Age::new(request.age)?,
            gender: request.gender.parse()?,
            preferred_gender: request.preferred_gender.parse()?,
            description: request.description,
            tags: parse_tags(&request.tags)?,
            photos: parse_photos(&request.photos)?,
            liked_by: Default::default(),
        };

        self.backend.create(&profile).await?;

        tracing::info!("Created profile {} ({})", profile.id, profile.username);
        Ok(profile)
    }

    /// Fetch and validate a profile
    pub async fn get(&self, id: ProfileId) -> Result<Profile, ServiceError> {
        let record = self
            .backend
            .find_by_id(id)
            .await?
            .ok_or(ServiceError::NotFound(id))?;

        Ok(Profile::try_from(record)?)
    }

    /// Apply a partial update given as a field map
    pub async fn update(
        &self,
        id: ProfileId,
        fields: &Map<String, Value>,
    ) -> Result<(), ServiceError> {
        let update = ProfileUpdate::from_fields(fields)?;
        update.check_for(id)?;

        self.backend.apply_partial_update(id, &update).await?;

        tracing::info!("Updated profile {} ({} fields)", id, fields.len());
        Ok(())
    }

    /// Record that `liker` likes `target`; repeated likes are no-ops
    pub async fn like(
        &self,
        target: ProfileId,
        liker: ProfileId,
    ) -> Result<LikeOutcome, ServiceError> {
        if target == liker {
            return Err(ValidationError::SelfLike(target).into());
        }

        if self.backend.find_by_id(liker).await?.is_none() {
            return Err(ServiceError::NotFound(liker));
        }

        let outcome = self.backend.apply_like(target, liker).await?;

        tracing::info!("Like {} -> {}: {:?}", liker, target, outcome);
        Ok(outcome)
    }

    pub async fn delete(&self, id: ProfileId) -> Result<(), ServiceError> {
        self.backend.delete(id).await?;
        tracing::info!("Deleted profile {}", id);
        Ok(())
    }

    /// Ranked candidates for `viewer_id` looking for `preference`
    ///
    /// A missing viewer is an error; an empty result is not. The first
    /// candidate record that fails validation aborts the call.
    pub async fn find_candidates(
        &self,
        viewer_id: ProfileId,
        preference: PreferredGender,
    ) -> Result<Vec<Profile>, ServiceError> {
        let viewer = self.get(viewer_id).await?;

        let records = self
            .backend
            .load_pool(preference, viewer.gender, viewer.id)
            .await?;

        let pool = records
            .into_iter()
            .map(Profile::try_from)
            .collect::<Result<Vec<_>, _>>()
            .map_err(|e| {
                tracing::warn!("Rejected candidate pool for {}: {}", viewer_id, e);
                e
            })?;

        let result = self.matcher.find_matches(&viewer, pool);

        tracing::debug!(
            "Matched {} of {} candidates for {} ({} left after exclusion)",
            result.matches.len(),
            result.total_candidates,
            viewer_id,
            result.after_exclusion
        );

        Ok(result.matches)
    }
}
