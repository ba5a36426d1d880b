use std::collections::BTreeSet;

use crate::models::{Profile, Tag};

/// Largest allowed age difference between viewer and candidate, inclusive
pub const MAX_AGE_GAP: u8 = 2;

/// Hard age cutoff
///
/// Candidates outside the window are dropped, whatever their tag overlap.
#[inline]
pub fn within_age_window(viewer: &Profile, candidate: &Profile, max_age_gap: u8) -> bool {
    viewer.age.gap(candidate.age) <= max_age_gap
}

/// Count of the candidate's tags the viewer also holds
#[inline]
pub fn tag_overlap(viewer_tags: &BTreeSet<Tag>, candidate: &Profile) -> usize {
    candidate
        .tags
        .iter()
        .filter(|tag| viewer_tags.contains(*tag))
        .count()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::{Age, Gender, PreferredGender, Username};
    use uuid::Uuid;

    fn create_test_profile(age: i64, tags: &[Tag]) -> Profile {
        Profile {
            id: Uuid::new_v4(),
            username: Username::new("scorer").unwrap(),
            age: Age::new(age).unwrap(),
            gender: Gender::Woman,
            preferred_gender: PreferredGender::Men,
            description: String::new(),
            tags: tags.iter().copied().collect(),
            photos: vec![],
            liked_by: Default::default(),
        }
    }

    #[test]
    fn test_age_window_inclusive() {
        let viewer = create_test_profile(30, &[]);

        assert!(within_age_window(&viewer, &create_test_profile(28, &[]), MAX_AGE_GAP));
        assert!(within_age_window(&viewer, &create_test_profile(32, &[]), MAX_AGE_GAP));
        assert!(within_age_window(&viewer, &create_test_profile(30, &[]), MAX_AGE_GAP));
        assert!(!within_age_window(&viewer, &create_test_profile(27, &[]), MAX_AGE_GAP));
        assert!(!within_age_window(&viewer, &create_test_profile(33, &[]), MAX_AGE_GAP));
    }

    #[test]
    fn test_tag_overlap() {
        let viewer = create_test_profile(30, &[Tag::Sport, Tag::Music, Tag::Travel]);

        let both = create_test_profile(30, &[Tag::Sport, Tag::Music]);
        let one = create_test_profile(30, &[Tag::Sport, Tag::Anime]);
        let none = create_test_profile(30, &[Tag::Books]);

        assert_eq!(tag_overlap(&viewer.tags, &both), 2);
        assert_eq!(tag_overlap(&viewer.tags, &one), 1);
        assert_eq!(tag_overlap(&viewer.tags, &none), 0);
    }

    #[test]
    fn test_tag_overlap_empty_viewer() {
        let viewer = create_test_profile(30, &[]);
        let candidate = create_test_profile(30, &[Tag::Sport]);

        assert_eq!(tag_overlap(&viewer.tags, &candidate), 0);
    }
}
