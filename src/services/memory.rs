use async_trait::async_trait;
use tokio::sync::RwLock;

use crate::core::matches_pool_preference;
use crate::models::{
    Gender, LikeOutcome, PreferredGender, Profile, ProfileId, ProfileRecord, ProfileUpdate,
};
use crate::services::repository::{
    CandidatePoolLoader, ProfileMutationGateway, ProfileStore, RepositoryError,
};

/// In-process profile store
///
/// Keeps profiles in insertion order behind a single `RwLock`. Every
/// mutation takes the write lock, so likes on the same target are applied
/// one at a time.
#[derive(Default)]
pub struct InMemoryProfileStore {
    profiles: RwLock<Vec<Profile>>,
}

impl InMemoryProfileStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Seed the store, e.g. for tests or local development
    pub fn with_profiles(profiles: Vec<Profile>) -> Self {
        Self {
            profiles: RwLock::new(profiles),
        }
    }

    pub async fn len(&self) -> usize {
        self.profiles.read().await.len()
    }

    pub async fn is_empty(&self) -> bool {
        self.profiles.read().await.is_empty()
    }
}

#[async_trait]
impl ProfileStore for InMemoryProfileStore {
    async fn create(&self, profile: &Profile) -> Result<(), RepositoryError> {
        let mut profiles = self.profiles.write().await;

        if profiles.iter().any(|p| p.id == profile.id) {
            return Err(RepositoryError::Conflict(profile.id));
        }

        profiles.push(profile.clone());
        tracing::debug!("Stored profile {} ({} total)", profile.id, profiles.len());
        Ok(())
    }

    async fn find_by_id(&self, id: ProfileId) -> Result<Option<ProfileRecord>, RepositoryError> {
        let profiles = self.profiles.read().await;
        Ok(profiles.iter().find(|p| p.id == id).map(ProfileRecord::from))
    }

    async fn delete(&self, id: ProfileId) -> Result<(), RepositoryError> {
        let mut profiles = self.profiles.write().await;
        let before = profiles.len();
        profiles.retain(|p| p.id != id);

        if profiles.len() == before {
            return Err(RepositoryError::NotFound(id));
        }
        Ok(())
    }
}

#[async_trait]
impl CandidatePoolLoader for InMemoryProfileStore {
    async fn load_pool(
        &self,
        preference: PreferredGender,
        requester_gender: Gender,
        exclude_self: ProfileId,
    ) -> Result<Vec<ProfileRecord>, RepositoryError> {
        let profiles = self.profiles.read().await;

        Ok(profiles
            .iter()
            .filter(|p| p.id != exclude_self)
            .filter(|p| matches_pool_preference(p, preference, requester_gender))
            .map(ProfileRecord::from)
            .collect())
    }
}

#[async_trait]
impl ProfileMutationGateway for InMemoryProfileStore {
    async fn apply_like(
        &self,
        target: ProfileId,
        liker: ProfileId,
    ) -> Result<LikeOutcome, RepositoryError> {
        let mut profiles = self.profiles.write().await;
        let profile = profiles
            .iter_mut()
            .find(|p| p.id == target)
            .ok_or(RepositoryError::NotFound(target))?;

        if profile.liked_by.insert(liker) {
            Ok(LikeOutcome::Added)
        } else {
            Ok(LikeOutcome::AlreadyLiked)
        }
    }

    async fn apply_partial_update(
        &self,
        id: ProfileId,
        update: &ProfileUpdate,
    ) -> Result<(), RepositoryError> {
        let mut profiles = self.profiles.write().await;
        let profile = profiles
            .iter_mut()
            .find(|p| p.id == id)
            .ok_or(RepositoryError::NotFound(id))?;

        update.apply_to(profile);
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::{Age, Username};
    use std::sync::Arc;
    use uuid::Uuid;

    fn create_test_profile(gender: Gender, preferred_gender: PreferredGender) -> Profile {
        Profile {
            id: Uuid::new_v4(),
            username: Username::new("memory").unwrap(),
            age: Age::new(22).unwrap(),
            gender,
            preferred_gender,
            description: String::new(),
            tags: Default::default(),
            photos: vec![],
            liked_by: Default::default(),
        }
    }

    #[tokio::test]
    async fn test_create_conflict() {
        let store = InMemoryProfileStore::new();
        let profile = create_test_profile(Gender::Man, PreferredGender::Women);

        store.create(&profile).await.unwrap();
        let err = store.create(&profile).await.unwrap_err();

        assert!(matches!(err, RepositoryError::Conflict(id) if id == profile.id));
        assert_eq!(store.len().await, 1);
    }

    #[tokio::test]
    async fn test_delete_missing() {
        let store = InMemoryProfileStore::new();
        let err = store.delete(Uuid::new_v4()).await.unwrap_err();
        assert!(matches!(err, RepositoryError::NotFound(_)));
    }

    #[tokio::test]
    async fn test_load_pool_mutual_compatibility() {
        let requester = create_test_profile(Gender::Man, PreferredGender::Women);
        let match_ = create_test_profile(Gender::Woman, PreferredGender::Men);
        let wrong_pref = create_test_profile(Gender::Woman, PreferredGender::Women);
        let wrong_gender = create_test_profile(Gender::Man, PreferredGender::Men);
        let store = InMemoryProfileStore::with_profiles(vec![
            requester.clone(),
            match_.clone(),
            wrong_pref,
            wrong_gender,
        ]);

        let pool = store
            .load_pool(PreferredGender::Women, requester.gender, requester.id)
            .await
            .unwrap();

        assert_eq!(pool.len(), 1);
        assert_eq!(pool[0].id, match_.id.to_string());

        let everyone = store
            .load_pool(PreferredGender::Both, requester.gender, requester.id)
            .await
            .unwrap();
        assert_eq!(everyone.len(), 3);
    }

    #[tokio::test]
    async fn test_concurrent_likes_are_not_lost() {
        let target = create_test_profile(Gender::Woman, PreferredGender::Both);
        let target_id = target.id;
        let store = Arc::new(InMemoryProfileStore::with_profiles(vec![target]));

        let handles: Vec<_> = (0..32)
            .map(|_| {
                let store = Arc::clone(&store);
                tokio::spawn(async move { store.apply_like(target_id, Uuid::new_v4()).await })
            })
            .collect();

        for handle in handles {
            assert_eq!(handle.await.unwrap().unwrap(), LikeOutcome::Added);
        }

        let record = store.find_by_id(target_id).await.unwrap().unwrap();
        assert_eq!(record.liked_by.len(), 32);
    }
}
