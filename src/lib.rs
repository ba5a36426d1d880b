//! Anketa Match - candidate matching service for dating profiles (anketas)
//!
//! This library provides profile storage, like tracking and the ranking
//! pipeline that turns a viewer's candidate pool into an ordered list:
//! relationship exclusion, an age window, then tag-overlap scoring.

pub mod config;
pub mod core;
pub mod models;
pub mod routes;
pub mod services;

// Re-export commonly used types
pub use core::{exclude_related, MatchResult, Matcher};
pub use models::{Gender, PreferredGender, Profile, ProfileId, ProfileRecord, Tag};
pub use services::{AnketaService, InMemoryProfileStore, ServiceError, TokenVerifier};

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_library_exports() {
        // Verify that the library exports work correctly
        let matcher = Matcher::default();
        assert_eq!(matcher.max_age_gap(), 2);
        assert_eq!(Gender::Man.as_preference(), PreferredGender::Men);
    }
}
