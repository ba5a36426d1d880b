use crate::models::{Gender, PreferredGender, Profile};

/// Check whether a candidate has a like relationship with the viewer,
/// or is the viewer itself
///
/// A candidate is excluded when:
/// - its id is the viewer's id
/// - its id is in the viewer's liked-by set
/// - the viewer's id is in the candidate's liked-by set
#[inline]
pub fn is_excluded(viewer: &Profile, candidate: &Profile) -> bool {
    candidate.id == viewer.id
        || viewer.is_liked_by(candidate.id)
        || candidate.is_liked_by(viewer.id)
}

/// Remove self and already-related profiles from a candidate pool
///
/// Pure set difference; surviving candidates keep their input order.
pub fn exclude_related(viewer: &Profile, candidates: Vec<Profile>) -> Vec<Profile> {
    candidates
        .into_iter()
        .filter(|candidate| !is_excluded(viewer, candidate))
        .collect()
}

/// Load-time mutual gender compatibility check
///
/// With `Both` every profile qualifies. Otherwise the candidate must be of
/// the gender `preference` targets, and the candidate's own preference must
/// accept the requester's gender.
#[inline]
pub fn matches_pool_preference(
    candidate: &Profile,
    preference: PreferredGender,
    requester_gender: Gender,
) -> bool {
    match preference.target_gender() {
        None => true,
        Some(target) => {
            candidate.gender == target && candidate.preferred_gender.accepts(requester_gender)
        }
    }
}
