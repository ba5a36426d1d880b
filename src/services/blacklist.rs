use async_trait::async_trait;
use moka::Expiry;
use redis::aio::ConnectionManager;
use std::sync::Arc;
use std::time::{Duration, Instant};
use thiserror::Error;

/// Errors that can occur with blacklist operations
#[derive(Debug, Error)]
pub enum BlacklistError {
    #[error("Redis error: {0}")]
    RedisError(#[from] redis::RedisError),
}

/// Store of revoked tokens; entries disappear once their TTL elapses
#[async_trait]
pub trait TokenBlacklist: Send + Sync {
    async fn revoke(&self, token: &str, ttl: Duration) -> Result<(), BlacklistError>;

    async fn is_revoked(&self, token: &str) -> Result<bool, BlacklistError>;
}

/// Blacklist key builder
pub struct BlacklistKey;

impl BlacklistKey {
    /// Build a key for a revoked token
    pub fn revoked(token: &str) -> String {
        format!("revoked:{}", token)
    }
}

/// Each entry lives for the TTL stored as its value
struct RevocationExpiry;

impl Expiry<String, Duration> for RevocationExpiry {
    fn expire_after_create(&self, _key: &String, ttl: &Duration, _created_at: Instant) -> Option<Duration> {
        Some(*ttl)
    }
}

/// In-process blacklist backed by a moka cache
///
/// Unbounded: an entry leaves only when its TTL elapses. `capacity` only
/// pre-sizes the table.
pub struct MemoryBlacklist {
    entries: moka::future::Cache<String, Duration>,
}

impl MemoryBlacklist {
    pub fn new(capacity: u64) -> Self {
        let entries = moka::future::Cache::builder()
            .initial_capacity(capacity as usize)
            .expire_after(RevocationExpiry)
            .build();

        Self { entries }
    }

    pub fn entry_count(&self) -> u64 {
        self.entries.entry_count()
    }
}

#[async_trait]
impl TokenBlacklist for MemoryBlacklist {
    async fn revoke(&self, token: &str, ttl: Duration) -> Result<(), BlacklistError> {
        self.entries.insert(BlacklistKey::revoked(token), ttl).await;
        tracing::trace!("Token revoked for {:?}", ttl);
        Ok(())
    }

    async fn is_revoked(&self, token: &str) -> Result<bool, BlacklistError> {
        Ok(self.entries.get(&BlacklistKey::revoked(token)).await.is_some())
    }
}

/// Blacklist shared across instances through Redis
pub struct RedisBlacklist {
    // Store ConnectionManager in a Mutex for interior mutability
    redis: Arc<tokio::sync::Mutex<ConnectionManager>>,
}

impl RedisBlacklist {
    pub async fn new(redis_url: &str) -> Result<Self, BlacklistError> {
        let client = redis::Client::open(redis_url)?;
        let redis = ConnectionManager::new(client).await?;

        Ok(Self {
            redis: Arc::new(tokio::sync::Mutex::new(redis)),
        })
    }
}

#[async_trait]
impl TokenBlacklist for RedisBlacklist {
    async fn revoke(&self, token: &str, ttl: Duration) -> Result<(), BlacklistError> {
        // Redis rejects EX 0
        let secs = ttl.as_secs().max(1);

        let mut conn = self.redis.lock().await;
        redis::cmd("SET")
            .arg(BlacklistKey::revoked(token))
            .arg(1)
            .arg("EX")
            .arg(secs)
            .query_async::<()>(&mut *conn)
            .await?;

        tracing::trace!("Token revoked in Redis for {}s", secs);
        Ok(())
    }

    async fn is_revoked(&self, token: &str) -> Result<bool, BlacklistError> {
        let mut conn = self.redis.lock().await;
        let exists: bool = redis::cmd("EXISTS")
            .arg(BlacklistKey::revoked(token))
            .query_async(&mut *conn)
            .await?;
        Ok(exists)
    }
}
