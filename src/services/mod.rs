// Service exports
pub mod anketa;
pub mod auth;
pub mod blacklist;
pub mod memory;
pub mod postgres;
pub mod repository;

pub use anketa::{AnketaService, ServiceError};
pub use auth::{AuthError, Claims, TokenVerifier};
pub use blacklist::{BlacklistError, BlacklistKey, MemoryBlacklist, RedisBlacklist, TokenBlacklist};
pub use memory::InMemoryProfileStore;
pub use postgres::PostgresProfileStore;
pub use repository::{
    CandidatePoolLoader, ProfileBackend, ProfileMutationGateway, ProfileStore, RepositoryError,
};
