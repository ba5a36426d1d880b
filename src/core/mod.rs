// Core algorithm exports
pub mod filters;
pub mod matcher;
pub mod scoring;

pub use filters::{exclude_related, is_excluded, matches_pool_preference};
pub use matcher::{MatchResult, Matcher};
pub use scoring::{tag_overlap, within_age_window, MAX_AGE_GAP};
