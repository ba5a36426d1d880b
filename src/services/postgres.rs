use async_trait::async_trait;
use sqlx::postgres::{PgPoolOptions, PgRow};
use sqlx::{PgPool, Postgres, QueryBuilder, Row};
use std::time::Duration;
use uuid::Uuid;

use crate::models::{
    Gender, LikeOutcome, PreferredGender, Profile, ProfileId, ProfileRecord, ProfileUpdate, Tag,
};
use crate::services::repository::{
    CandidatePoolLoader, ProfileMutationGateway, ProfileStore, RepositoryError,
};

const PROFILE_COLUMNS: &str =
    "id, username, age, gender, preferred_gender, description, tags, photos, liked_by";

/// PostgreSQL-backed profile store
///
/// Likes are applied with a single conditional `array_append`, so
/// concurrent likes on one profile never overwrite each other.
pub struct PostgresProfileStore {
    pool: PgPool,
}

impl PostgresProfileStore {
    /// Connect and run the embedded migrations
    pub async fn new(
        database_url: &str,
        max_connections: u32,
        min_connections: u32,
        acquire_timeout: Duration,
        idle_timeout: Duration,
    ) -> Result<Self, RepositoryError> {
        let pool = PgPoolOptions::new()
            .max_connections(max_connections)
            .min_connections(min_connections)
            .acquire_timeout(acquire_timeout)
            .idle_timeout(idle_timeout)
            .test_before_acquire(true)
            .connect(database_url)
            .await?;

        sqlx::migrate!("./migrations").run(&pool).await?;

        Ok(Self { pool })
    }

    /// Create a store from configuration values
    pub async fn from_settings(
        url: &str,
        max_connections: Option<u32>,
        min_connections: Option<u32>,
        acquire_timeout_secs: Option<u64>,
        idle_timeout_secs: Option<u64>,
    ) -> Result<Self, RepositoryError> {
        tracing::info!("Connecting to PostgreSQL profile store");

        Self::new(
            url,
            max_connections.unwrap_or(10),
            min_connections.unwrap_or(1),
            Duration::from_secs(acquire_timeout_secs.unwrap_or(5)),
            Duration::from_secs(idle_timeout_secs.unwrap_or(600)),
        )
        .await
    }

    /// Wrap an existing pool; migrations are the caller's concern
    pub fn from_pool(pool: PgPool) -> Self {
        Self { pool }
    }

    async fn exists(&self, id: ProfileId) -> Result<bool, RepositoryError> {
        let (exists,): (bool,) =
            sqlx::query_as("SELECT EXISTS(SELECT 1 FROM anketas WHERE id = $1)")
                .bind(id)
                .fetch_one(&self.pool)
                .await?;
        Ok(exists)
    }
}

fn record_from_row(row: &PgRow) -> Result<ProfileRecord, sqlx::Error> {
    let id: Uuid = row.try_get("id")?;
    let age: i32 = row.try_get("age")?;
    let liked_by: Vec<Uuid> = row.try_get("liked_by")?;

    Ok(ProfileRecord {
        id: id.to_string(),
        username: row.try_get("username")?,
        age: age as i64,
        gender: row.try_get("gender")?,
        preferred_gender: row.try_get("preferred_gender")?,
        description: row.try_get("description")?,
        tags: row.try_get("tags")?,
        photos: row.try_get("photos")?,
        liked_by: liked_by.iter().map(Uuid::to_string).collect(),
    })
}

fn tag_values(tags: impl IntoIterator<Item = Tag>) -> Vec<String> {
    tags.into_iter().map(|t| t.as_str().to_string()).collect()
}

#[async_trait]
impl ProfileStore for PostgresProfileStore {
    async fn create(&self, profile: &Profile) -> Result<(), RepositoryError> {
        let query = r#"
            INSERT INTO anketas
                (id, username, age, gender, preferred_gender, description, tags, photos, liked_by)
            VALUES ($1, $2, $3, $4, $5, $6, $7, $8, $9)
            ON CONFLICT (id) DO NOTHING
        "#;

        let photos: Vec<String> = profile.photos.iter().map(|p| p.url().to_string()).collect();
        let liked_by: Vec<Uuid> = profile.liked_by.iter().copied().collect();

        let result = sqlx::query(query)
            .bind(profile.id)
            .bind(profile.username.as_str())
            .bind(profile.age.years() as i32)
            .bind(profile.gender.as_str())
            .bind(profile.preferred_gender.as_str())
            .bind(&profile.description)
            .bind(tag_values(profile.tags.iter().copied()))
            .bind(photos)
            .bind(liked_by)
            .execute(&self.pool)
            .await?;

        if result.rows_affected() == 0 {
            return Err(RepositoryError::Conflict(profile.id));
        }

        tracing::debug!("Inserted profile {}", profile.id);
        Ok(())
    }

    async fn find_by_id(&self, id: ProfileId) -> Result<Option<ProfileRecord>, RepositoryError> {
        let query = format!("SELECT {} FROM anketas WHERE id = $1", PROFILE_COLUMNS);

        let row = sqlx::query(&query)
            .bind(id)
            .fetch_optional(&self.pool)
            .await?;

        row.as_ref()
            .map(record_from_row)
            .transpose()
            .map_err(RepositoryError::from)
    }

    async fn delete(&self, id: ProfileId) -> Result<(), RepositoryError> {
        let result = sqlx::query("DELETE FROM anketas WHERE id = $1")
            .bind(id)
            .execute(&self.pool)
            .await?;

        if result.rows_affected() == 0 {
            return Err(RepositoryError::NotFound(id));
        }

        tracing::debug!("Deleted profile {}", id);
        Ok(())
    }

    async fn health_check(&self) -> Result<bool, RepositoryError> {
        let result: (i32,) = sqlx::query_as("SELECT 1").fetch_one(&self.pool).await?;
        Ok(result.0 == 1)
    }
}

#[async_trait]
impl CandidatePoolLoader for PostgresProfileStore {
    async fn load_pool(
        &self,
        preference: PreferredGender,
        requester_gender: Gender,
        exclude_self: ProfileId,
    ) -> Result<Vec<ProfileRecord>, RepositoryError> {
        let rows = match preference.target_gender() {
            None => {
                let query = format!(
                    "SELECT {} FROM anketas WHERE id <> $1 ORDER BY created_at, id",
                    PROFILE_COLUMNS
                );
                sqlx::query(&query)
                    .bind(exclude_self)
                    .fetch_all(&self.pool)
                    .await?
            }
            Some(target) => {
                // Candidates seeking the requester's gender, or anyone
                let accepted = vec![
                    requester_gender.as_preference().as_str().to_string(),
                    PreferredGender::Both.as_str().to_string(),
                ];
                let query = format!(
                    "SELECT {} FROM anketas \
                     WHERE id <> $1 AND gender = $2 AND preferred_gender = ANY($3) \
                     ORDER BY created_at, id",
                    PROFILE_COLUMNS
                );
                sqlx::query(&query)
                    .bind(exclude_self)
                    .bind(target.as_str())
                    .bind(accepted)
                    .fetch_all(&self.pool)
                    .await?
            }
        };

        let records = rows
            .iter()
            .map(record_from_row)
            .collect::<Result<Vec<_>, _>>()?;

        tracing::debug!(
            "Loaded {} candidate records for preference {}",
            records.len(),
            preference
        );

        Ok(records)
    }
}

#[async_trait]
impl ProfileMutationGateway for PostgresProfileStore {
    async fn apply_like(
        &self,
        target: ProfileId,
        liker: ProfileId,
    ) -> Result<LikeOutcome, RepositoryError> {
        let query = r#"
            UPDATE anketas
            SET liked_by = array_append(liked_by, $2), updated_at = NOW()
            WHERE id = $1 AND NOT ($2 = ANY(liked_by))
        "#;

        let result = sqlx::query(query)
            .bind(target)
            .bind(liker)
            .execute(&self.pool)
            .await?;

        if result.rows_affected() == 1 {
            return Ok(LikeOutcome::Added);
        }

        if self.exists(target).await? {
            Ok(LikeOutcome::AlreadyLiked)
        } else {
            Err(RepositoryError::NotFound(target))
        }
    }

    async fn apply_partial_update(
        &self,
        id: ProfileId,
        update: &ProfileUpdate,
    ) -> Result<(), RepositoryError> {
        let mut builder = QueryBuilder::<Postgres>::new("UPDATE anketas SET ");
        let mut set = builder.separated(", ");

        set.push("updated_at = NOW()");
        if let Some(username) = &update.username {
            set.push("username = ");
            set.push_bind_unseparated(username.as_str().to_string());
        }
        if let Some(gender) = update.gender {
            set.push("gender = ");
            set.push_bind_unseparated(gender.as_str());
        }
        if let Some(preferred_gender) = update.preferred_gender {
            set.push("preferred_gender = ");
            set.push_bind_unseparated(preferred_gender.as_str());
        }
        if let Some(description) = &update.description {
            set.push("description = ");
            set.push_bind_unseparated(description.clone());
        }
        if let Some(tags) = &update.tags {
            set.push("tags = ");
            set.push_bind_unseparated(tag_values(tags.iter().copied()));
        }
        if let Some(photos) = &update.photos {
            set.push("photos = ");
            set.push_bind_unseparated(
                photos.iter().map(|p| p.url().to_string()).collect::<Vec<_>>(),
            );
        }
        if let Some(liked_by) = &update.liked_by {
            set.push("liked_by = ");
            set.push_bind_unseparated(liked_by.iter().copied().collect::<Vec<Uuid>>());
        }

        builder.push(" WHERE id = ");
        builder.push_bind(id);

        let result = builder.build().execute(&self.pool).await?;

        if result.rows_affected() == 0 {
            return Err(RepositoryError::NotFound(id));
        }

        tracing::debug!("Applied partial update to profile {}", id);
        Ok(())
    }
}
