use async_trait::async_trait;
use thiserror::Error;

use crate::models::{Gender, LikeOutcome, PreferredGender, Profile, ProfileId, ProfileRecord, ProfileUpdate};

/// Errors raised by profile storage adapters
#[derive(Debug, Error)]
pub enum RepositoryError {
    #[error("Profile not found: {0}")]
    NotFound(ProfileId),

    #[error("Profile already exists: {0}")]
    Conflict(ProfileId),

    #[error("SQLx error: {0}")]
    SqlxError(#[from] sqlx::Error),

    #[error("Migration error: {0}")]
    MigrateError(#[from] sqlx::migrate::MigrateError),
}

/// Basic profile persistence
#[async_trait]
pub trait ProfileStore: Send + Sync {
    /// Persist a new profile; an existing id is a conflict
    async fn create(&self, profile: &Profile) -> Result<(), RepositoryError>;

    /// Fetch the raw record for `id`
    async fn find_by_id(&self, id: ProfileId) -> Result<Option<ProfileRecord>, RepositoryError>;

    /// Delete immediately and irreversibly
    async fn delete(&self, id: ProfileId) -> Result<(), RepositoryError>;

    /// Verify the backing store is reachable
    async fn health_check(&self) -> Result<bool, RepositoryError> {
        Ok(true)
    }
}

/// Source of unranked candidate records
#[async_trait]
pub trait CandidatePoolLoader: Send + Sync {
    /// Load candidates for a requester of `requester_gender` looking for
    /// `preference`
    ///
    /// `Both` returns the whole population. Any other preference returns
    /// records of the targeted gender whose own preference accepts the
    /// requester's gender. The record with id `exclude_self` is never
    /// returned.
    async fn load_pool(
        &self,
        preference: PreferredGender,
        requester_gender: Gender,
        exclude_self: ProfileId,
    ) -> Result<Vec<ProfileRecord>, RepositoryError>;
}

/// Partial updates to persisted profiles
///
/// Implementations must serialize concurrent likes on the same target so
/// that no like is lost.
#[async_trait]
pub trait ProfileMutationGateway: Send + Sync {
    /// Append `liker` to the target's liked-by set unless already present
    async fn apply_like(
        &self,
        target: ProfileId,
        liker: ProfileId,
    ) -> Result<LikeOutcome, RepositoryError>;

    /// Overwrite the fields present in `update`
    async fn apply_partial_update(
        &self,
        id: ProfileId,
        update: &ProfileUpdate,
    ) -> Result<(), RepositoryError>;
}

/// Everything the anketa service needs from a storage adapter
pub trait ProfileBackend: ProfileStore + CandidatePoolLoader + ProfileMutationGateway {}

impl<T> ProfileBackend for T where T: ProfileStore + CandidatePoolLoader + ProfileMutationGateway {}
