use serde::{Deserialize, Serialize};
use std::collections::BTreeSet;
use std::fmt;
use std::str::FromStr;
use thiserror::Error;
use uuid::Uuid;

/// Opaque 128-bit profile identifier
pub type ProfileId = Uuid;

/// Marker prepended to every stored username
pub const USERNAME_PREFIX: char = '@';
pub const MIN_USERNAME_LEN: usize = 4;
pub const MAX_AGE: u8 = 119;

/// Errors raised by value-object constructors
///
/// Invalid values are always rejected, never coerced.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ValidationError {
    #[error("invalid username {0:?}: expected at least 4 characters of [A-Za-z0-9_]")]
    Username(String),

    #[error("age {0} is outside the allowed range 1..=119")]
    Age(i64),

    #[error("unknown gender {0:?}")]
    Gender(String),

    #[error("unknown preferred gender {0:?}")]
    PreferredGender(String),

    #[error("unknown tag {0:?}")]
    Tag(String),

    #[error("photo url {0:?} must be an https:// location")]
    Photo(String),

    #[error("malformed profile id {0:?}")]
    Id(String),

    #[error("profile {0} cannot like itself")]
    SelfLike(ProfileId),

    #[error("field {0:?} cannot be updated")]
    UnknownField(String),

    #[error("field {field:?} must be {expected}")]
    FieldType { field: String, expected: &'static str },

    #[error("update contains no fields")]
    EmptyUpdate,
}

/// Validated handle, kept in its stored form (`@handle`)
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize)]
#[serde(transparent)]
pub struct Username(String);

impl Username {
    /// Validate a bare handle and attach the prefix marker
    pub fn new(handle: &str) -> Result<Self, ValidationError> {
        let valid = handle.len() >= MIN_USERNAME_LEN
            && handle.chars().all(|c| c.is_ascii_alphanumeric() || c == '_');

        if !valid {
            return Err(ValidationError::Username(handle.to_string()));
        }

        Ok(Self(format!("{}{}", USERNAME_PREFIX, handle)))
    }

    /// Decode a username as persisted, with or without the prefix marker
    pub fn from_stored(stored: &str) -> Result<Self, ValidationError> {
        Self::new(stored.strip_prefix(USERNAME_PREFIX).unwrap_or(stored))
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }

    /// Handle without the prefix marker
    pub fn handle(&self) -> &str {
        &self.0[USERNAME_PREFIX.len_utf8()..]
    }
}

impl fmt::Display for Username {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

/// Age in years, 1..=119
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize)]
#[serde(transparent)]
pub struct Age(u8);

impl Age {
    pub fn new(value: i64) -> Result<Self, ValidationError> {
        if value <= 0 || value > MAX_AGE as i64 {
            return Err(ValidationError::Age(value));
        }
        Ok(Self(value as u8))
    }

    pub fn years(self) -> u8 {
        self.0
    }

    /// Absolute difference in years
    pub fn gap(self, other: Age) -> u8 {
        self.0.abs_diff(other.0)
    }
}

/// A profile's own gender
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Gender {
    Man,
    Woman,
}

impl Gender {
    pub const ALL: [Gender; 2] = [Gender::Man, Gender::Woman];

    pub fn as_str(self) -> &'static str {
        match self {
            Gender::Man => "Man",
            Gender::Woman => "Woman",
        }
    }

    /// Preference token that seeks this gender
    pub const fn as_preference(self) -> PreferredGender {
        match self {
            Gender::Man => PreferredGender::Men,
            Gender::Woman => PreferredGender::Women,
        }
    }
}

impl FromStr for Gender {
    type Err = ValidationError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "Man" => Ok(Gender::Man),
            "Woman" => Ok(Gender::Woman),
            other => Err(ValidationError::Gender(other.to_string())),
        }
    }
}

impl fmt::Display for Gender {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// The gender(s) a profile is looking for
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum PreferredGender {
    Men,
    Women,
    Both,
}

impl PreferredGender {
    pub const ALL: [PreferredGender; 3] =
        [PreferredGender::Men, PreferredGender::Women, PreferredGender::Both];

    pub fn as_str(self) -> &'static str {
        match self {
            PreferredGender::Men => "Men",
            PreferredGender::Women => "Women",
            PreferredGender::Both => "Both",
        }
    }

    /// Single gender this preference targets; `Both` targets none in particular
    pub const fn target_gender(self) -> Option<Gender> {
        match self {
            PreferredGender::Men => Some(Gender::Man),
            PreferredGender::Women => Some(Gender::Woman),
            PreferredGender::Both => None,
        }
    }

    /// Whether someone of `gender` satisfies this preference
    pub fn accepts(self, gender: Gender) -> bool {
        match self.target_gender() {
            Some(target) => target == gender,
            None => true,
        }
    }
}

impl FromStr for PreferredGender {
    type Err = ValidationError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "Men" => Ok(PreferredGender::Men),
            "Women" => Ok(PreferredGender::Women),
            "Both" => Ok(PreferredGender::Both),
            other => Err(ValidationError::PreferredGender(other.to_string())),
        }
    }
}

impl fmt::Display for PreferredGender {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Closed vocabulary of interest labels
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub enum Tag {
    Sport,
    Music,
    EarlyRising,
    NightOwl,
    EarlyBird,
    Movies,
    Games,
    Series,
    Anime,
    ActiveLeisure,
    Drawing,
    Travel,
    Career,
    Books,
    CulturalLeisure,
    Study,
    SelfDevelopment,
}

impl Tag {
    pub const ALL: [Tag; 17] = [
        Tag::Sport,
        Tag::Music,
        Tag::EarlyRising,
        Tag::NightOwl,
        Tag::EarlyBird,
        Tag::Movies,
        Tag::Games,
        Tag::Series,
        Tag::Anime,
        Tag::ActiveLeisure,
        Tag::Drawing,
        Tag::Travel,
        Tag::Career,
        Tag::Books,
        Tag::CulturalLeisure,
        Tag::Study,
        Tag::SelfDevelopment,
    ];

    pub fn as_str(self) -> &'static str {
        match self {
            Tag::Sport => "Sport",
            Tag::Music => "Music",
            Tag::EarlyRising => "EarlyRising",
            Tag::NightOwl => "NightOwl",
            Tag::EarlyBird => "EarlyBird",
            Tag::Movies => "Movies",
            Tag::Games => "Games",
            Tag::Series => "Series",
            Tag::Anime => "Anime",
            Tag::ActiveLeisure => "ActiveLeisure",
            Tag::Drawing => "Drawing",
            Tag::Travel => "Travel",
            Tag::Career => "Career",
            Tag::Books => "Books",
            Tag::CulturalLeisure => "CulturalLeisure",
            Tag::Study => "Study",
            Tag::SelfDevelopment => "SelfDevelopment",
        }
    }
}

impl FromStr for Tag {
    type Err = ValidationError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Tag::ALL
            .iter()
            .copied()
            .find(|tag| tag.as_str() == s)
            .ok_or_else(|| ValidationError::Tag(s.to_string()))
    }
}

impl fmt::Display for Tag {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Photo location; only https URLs with a host are accepted
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize)]
#[serde(transparent)]
pub struct Photo(String);

impl Photo {
    pub fn new(url: &str) -> Result<Self, ValidationError> {
        let host = url
            .strip_prefix("https://")
            .and_then(|rest| rest.split(['/', '?', '#']).next())
            .unwrap_or_default();

        if host.is_empty() || url.chars().any(char::is_whitespace) {
            return Err(ValidationError::Photo(url.to_string()));
        }

        Ok(Self(url.to_string()))
    }

    pub fn url(&self) -> &str {
        &self.0
    }
}

/// Parse every tag, collapsing duplicates
pub fn parse_tags<S: AsRef<str>>(values: &[S]) -> Result<BTreeSet<Tag>, ValidationError> {
    values.iter().map(|v| v.as_ref().parse()).collect()
}

pub fn parse_photos<S: AsRef<str>>(values: &[S]) -> Result<Vec<Photo>, ValidationError> {
    values.iter().map(|v| Photo::new(v.as_ref())).collect()
}

pub fn parse_profile_id(value: &str) -> Result<ProfileId, ValidationError> {
    Uuid::parse_str(value).map_err(|_| ValidationError::Id(value.to_string()))
}

pub fn parse_profile_ids<S: AsRef<str>>(
    values: &[S],
) -> Result<BTreeSet<ProfileId>, ValidationError> {
    values.iter().map(|v| parse_profile_id(v.as_ref())).collect()
}

/// A validated dating profile (anketa)
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct Profile {
    pub id: ProfileId,
    pub username: Username,
    pub age: Age,
    pub gender: Gender,
    pub preferred_gender: PreferredGender,
    pub description: String,
    pub tags: BTreeSet<Tag>,
    pub photos: Vec<Photo>,
    pub liked_by: BTreeSet<ProfileId>,
}

impl Profile {
    /// Whether `other` appears in this profile's liked-by set
    #[inline]
    pub fn is_liked_by(&self, other: ProfileId) -> bool {
        self.liked_by.contains(&other)
    }
}

/// Raw profile record in the canonical wire/storage schema
///
/// Everything is kept as plain strings so that a bad value surfaces as a
/// [`ValidationError`] when converted into a [`Profile`].
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ProfileRecord {
    pub id: String,
    pub username: String,
    pub age: i64,
    pub gender: String,
    #[serde(alias = "preferred_gender")]
    pub preferred_gender: String,
    #[serde(default)]
    pub description: String,
    #[serde(default)]
    pub tags: Vec<String>,
    #[serde(default)]
    pub photos: Vec<String>,
    #[serde(default, alias = "liked_by")]
    pub liked_by: Vec<String>,
}

impl TryFrom<ProfileRecord> for Profile {
    type Error = ValidationError;

    fn try_from(record: ProfileRecord) -> Result<Self, Self::Error> {
        let id = parse_profile_id(&record.id)?;
        let liked_by = parse_profile_ids(&record.liked_by)?;

        if liked_by.contains(&id) {
            return Err(ValidationError::SelfLike(id));
        }

        Ok(Profile {
            id,
            username: Username::from_stored(&record.username)?,
            age: Age::new(record.age)?,
            gender: record.gender.parse()?,
            preferred_gender: record.preferred_gender.parse()?,
            description: record.description,
            tags: parse_tags(&record.tags)?,
            photos: parse_photos(&record.photos)?,
            liked_by,
        })
    }
}

impl From<&Profile> for ProfileRecord {
    fn from(profile: &Profile) -> Self {
        ProfileRecord {
            id: profile.id.to_string(),
            username: profile.username.as_str().to_string(),
            age: profile.age.years() as i64,
            gender: profile.gender.as_str().to_string(),
            preferred_gender: profile.preferred_gender.as_str().to_string(),
            description: profile.description.clone(),
            tags: profile.tags.iter().map(|t| t.as_str().to_string()).collect(),
            photos: profile.photos.iter().map(|p| p.url().to_string()).collect(),
            liked_by: profile.liked_by.iter().map(|id| id.to_string()).collect(),
        }
    }
}

/// Candidate that survived the age gate, with its tag-overlap score
#[derive(Debug, Clone, PartialEq)]
pub struct ScoredCandidate {
    pub profile: Profile,
    pub score: usize,
}

/// Result of a like mutation
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum LikeOutcome {
    Added,
    AlreadyLiked,
}
