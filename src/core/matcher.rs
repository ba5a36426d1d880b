use crate::core::{
    filters::exclude_related,
    scoring::{tag_overlap, within_age_window, MAX_AGE_GAP},
};
use crate::models::{Profile, ScoredCandidate};

/// Result of the matching process
#[derive(Debug)]
pub struct MatchResult {
    pub matches: Vec<Profile>,
    pub total_candidates: usize,
    pub after_exclusion: usize,
}

/// Candidate ranking engine
///
/// # Pipeline Stages
/// 1. Exclusion of self and like relationships
/// 2. Age gate (hard cutoff)
/// 3. Tag-overlap scoring
/// 4. Stable descending sort by score
///
/// Stateless and synchronous; safe to share between requests.
#[derive(Debug, Clone, Copy)]
pub struct Matcher {
    max_age_gap: u8,
}

impl Matcher {
    pub fn new(max_age_gap: u8) -> Self {
        Self { max_age_gap }
    }

    pub fn max_age_gap(&self) -> u8 {
        self.max_age_gap
    }

    /// Run the full pipeline over a raw candidate pool
    pub fn find_matches(&self, viewer: &Profile, candidates: Vec<Profile>) -> MatchResult {
        let total_candidates = candidates.len();

        let remaining = exclude_related(viewer, candidates);
        let after_exclusion = remaining.len();

        MatchResult {
            matches: self.rank(viewer, remaining),
            total_candidates,
            after_exclusion,
        }
    }

    /// Rank exclusion-filtered candidates, most affine first
    pub fn rank(&self, viewer: &Profile, candidates: Vec<Profile>) -> Vec<Profile> {
        self.score(viewer, candidates)
            .into_iter()
            .map(|scored| scored.profile)
            .collect()
    }

    /// Age-gate and score candidates, sorted by score descending
    ///
    /// Zero-overlap candidates are kept and rank last. Ties keep their
    /// relative input order.
    pub fn score(&self, viewer: &Profile, candidates: Vec<Profile>) -> Vec<ScoredCandidate> {
        let viewer_tags = &viewer.tags;

        let mut scored: Vec<ScoredCandidate> = candidates
            .into_iter()
            .filter(|candidate| within_age_window(viewer, candidate, self.max_age_gap))
            .map(|candidate| {
                let score = tag_overlap(viewer_tags, &candidate);
                ScoredCandidate {
                    profile: candidate,
                    score,
                }
            })
            .collect();

        // sort_by is stable
        scored.sort_by(|a, b| b.score.cmp(&a.score));

        scored
    }
}

impl Default for Matcher {
    fn default() -> Self {
        Self::new(MAX_AGE_GAP)
    }
}
