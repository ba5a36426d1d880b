// Model exports
pub mod domain;
pub mod requests;
pub mod responses;
pub mod update;

pub use domain::{
    Age, Gender, LikeOutcome, Photo, PreferredGender, Profile, ProfileId, ProfileRecord,
    ScoredCandidate, Tag, Username, ValidationError,
};
pub use requests::{CreateProfileRequest, FindCandidatesQuery, LikeRequest};
pub use responses::{
    CandidatesResponse, CreatedResponse, ErrorResponse, HealthResponse, LikeResponse,
    MessageResponse, TagsResponse, TokenStatusResponse,
};
pub use update::ProfileUpdate;
