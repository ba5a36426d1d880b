use serde_json::{Map, Value};
use std::collections::BTreeSet;

use crate::models::domain::{
    parse_photos, parse_profile_ids, parse_tags, Gender, Photo, PreferredGender, Profile,
    ProfileId, Tag, Username, ValidationError,
};

/// Validated partial update over the allow-listed profile fields
///
/// `age` and `id` are deliberately absent: they are fixed at creation.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct ProfileUpdate {
    pub username: Option<Username>,
    pub gender: Option<Gender>,
    pub preferred_gender: Option<PreferredGender>,
    pub description: Option<String>,
    pub tags: Option<BTreeSet<Tag>>,
    pub photos: Option<Vec<Photo>>,
    pub liked_by: Option<BTreeSet<ProfileId>>,
}

impl ProfileUpdate {
    /// Field names accepted by [`ProfileUpdate::from_fields`]
    pub const FIELDS: [&'static str; 7] = [
        "username",
        "gender",
        "preferredGender",
        "description",
        "tags",
        "photos",
        "likedBy",
    ];

    /// Build an update from a field map, validating every value
    ///
    /// Snake-case aliases (`preferred_gender`, `liked_by`) are accepted.
    /// Any other key is rejected.
    pub fn from_fields(fields: &Map<String, Value>) -> Result<Self, ValidationError> {
        let mut update = ProfileUpdate::default();

        for (key, value) in fields {
            match key.as_str() {
                "username" => {
                    update.username = Some(Username::new(expect_str(key, value)?)?);
                }
                "gender" => {
                    update.gender = Some(expect_str(key, value)?.parse()?);
                }
                "preferredGender" | "preferred_gender" => {
                    update.preferred_gender = Some(expect_str(key, value)?.parse()?);
                }
                "description" => {
                    update.description = Some(expect_str(key, value)?.to_string());
                }
                "tags" => {
                    update.tags = Some(parse_tags(&expect_str_array(key, value)?)?);
                }
                "photos" => {
                    update.photos = Some(parse_photos(&expect_str_array(key, value)?)?);
                }
                "likedBy" | "liked_by" => {
                    update.liked_by = Some(parse_profile_ids(&expect_str_array(key, value)?)?);
                }
                other => return Err(ValidationError::UnknownField(other.to_string())),
            }
        }

        if update.is_empty() {
            return Err(ValidationError::EmptyUpdate);
        }

        Ok(update)
    }

    pub fn is_empty(&self) -> bool {
        self.username.is_none()
            && self.gender.is_none()
            && self.preferred_gender.is_none()
            && self.description.is_none()
            && self.tags.is_none()
            && self.photos.is_none()
            && self.liked_by.is_none()
    }

    /// Reject updates that would break invariants of the profile `id`
    pub fn check_for(&self, id: ProfileId) -> Result<(), ValidationError> {
        match &self.liked_by {
            Some(liked_by) if liked_by.contains(&id) => Err(ValidationError::SelfLike(id)),
            _ => Ok(()),
        }
    }

    /// Overwrite the present fields on `profile`
    pub fn apply_to(&self, profile: &mut Profile) {
        if let Some(username) = &self.username {
            profile.username = username.clone();
        }
        if let Some(gender) = self.gender {
            profile.gender = gender;
        }
        if let Some(preferred_gender) = self.preferred_gender {
            profile.preferred_gender = preferred_gender;
        }
        if let Some(description) = &self.description {
            profile.description = description.clone();
        }
        if let Some(tags) = &self.tags {
            profile.tags = tags.clone();
        }
        if let Some(photos) = &self.photos {
            profile.photos = photos.clone();
        }
        if let Some(liked_by) = &self.liked_by {
            profile.liked_by = liked_by.clone();
        }
    }
}

fn expect_str<'a>(field: &str, value: &'a Value) -> Result<&'a str, ValidationError> {
    value.as_str().ok_or_else(|| ValidationError::FieldType {
        field: field.to_string(),
        expected: "a string",
    })
}

fn expect_str_array<'a>(field: &str, value: &'a Value) -> Result<Vec<&'a str>, ValidationError> {
    let type_error = || ValidationError::FieldType {
        field: field.to_string(),
        expected: "an array of strings",
    };

    value
        .as_array()
        .ok_or_else(type_error)?
        .iter()
        .map(|item| item.as_str().ok_or_else(type_error))
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;
    use uuid::Uuid;

    fn fields(value: Value) -> Map<String, Value> {
        value.as_object().cloned().unwrap()
    }

    #[test]
    fn test_accepts_allow_listed_fields() {
        let update = ProfileUpdate::from_fields(&fields(json!({
            "username": "new_name",
            "preferredGender": "Both",
            "tags": ["Books", "Anime"],
        })))
        .unwrap();

        assert_eq!(update.username.unwrap().as_str(), "@new_name");
        assert_eq!(update.preferred_gender, Some(PreferredGender::Both));
        assert_eq!(update.tags.unwrap().len(), 2);
        assert!(update.gender.is_none());
    }

    #[test]
    fn test_snake_case_aliases() {
        let liker = Uuid::new_v4();
        let update = ProfileUpdate::from_fields(&fields(json!({
            "preferred_gender": "Men",
            "liked_by": [liker.to_string()],
        })))
        .unwrap();

        assert_eq!(update.preferred_gender, Some(PreferredGender::Men));
        assert!(update.liked_by.unwrap().contains(&liker));
    }

    #[test]
    fn test_rejects_unknown_field() {
        let err = ProfileUpdate::from_fields(&fields(json!({"age": 40}))).unwrap_err();
        assert_eq!(err, ValidationError::UnknownField("age".into()));
    }

    #[test]
    fn test_rejects_wrong_types() {
        let err = ProfileUpdate::from_fields(&fields(json!({"tags": "Sport"}))).unwrap_err();
        assert!(matches!(err, ValidationError::FieldType { .. }));

        let err = ProfileUpdate::from_fields(&fields(json!({"photos": [1, 2]}))).unwrap_err();
        assert!(matches!(err, ValidationError::FieldType { .. }));
    }

    #[test]
    fn test_rejects_invalid_values() {
        let err = ProfileUpdate::from_fields(&fields(json!({"gender": "Other"}))).unwrap_err();
        assert!(matches!(err, ValidationError::Gender(_)));

        let err =
            ProfileUpdate::from_fields(&fields(json!({"photos": ["http://x.io"]}))).unwrap_err();
        assert!(matches!(err, ValidationError::Photo(_)));
    }

    #[test]
    fn test_rejects_prefixed_username() {
        let err = ProfileUpdate::from_fields(&fields(json!({"username": "@alice"}))).unwrap_err();
        assert_eq!(err, ValidationError::Username("@alice".into()));
    }

    #[test]
    fn test_rejects_empty_update() {
        let err = ProfileUpdate::from_fields(&Map::new()).unwrap_err();
        assert_eq!(err, ValidationError::EmptyUpdate);
    }

    #[test]
    fn test_check_for_self_like() {
        let id = Uuid::new_v4();
        let update = ProfileUpdate {
            liked_by: Some([id].into_iter().collect()),
            ..Default::default()
        };
        assert_eq!(update.check_for(id), Err(ValidationError::SelfLike(id)));
        assert!(update.check_for(Uuid::new_v4()).is_ok());
    }
}
