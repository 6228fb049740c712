//! Sample recommendation scorer.
//!
//! Weighted sum over a handful of profile/sample matches. Pure: the same
//! catalog, profile and processed set always produce the same ranking.

use std::collections::HashSet;

use crate::ids::SampleId;
use crate::samples::model::{Difficulty, SampleFile, UserProfile};

pub const USE_CASE_POINTS: i32 = 40;
pub const DIFFICULTY_POINTS: i32 = 30;
pub const ADJACENT_DIFFICULTY_POINTS: i32 = 15;
pub const FILE_TYPE_POINTS: i32 = 20;
pub const GOAL_POINTS: i32 = 10;
pub const INDUSTRY_POINTS: i32 = 5;
pub const UNPROCESSED_BONUS: i32 = 5;
pub const PROCESSED_PENALTY: i32 = -10;

/// Minimum score for a sample to be recommended on its own merit.
pub const MIN_RELEVANCE_SCORE: i32 = 30;

/// Below this many qualifying samples the result is backfilled.
pub const MIN_RECOMMENDATIONS: usize = 3;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ScoredSample<'a> {
    pub sample: &'a SampleFile,
    pub score: i32,
}

pub fn score(sample: &SampleFile, profile: &UserProfile, processed: &HashSet<SampleId>) -> i32 {
    let mut total = 0;
    let target = Difficulty::for_technical_level(&profile.technical_level);

    let use_case = profile.use_case.to_lowercase();
    if sample
        .use_cases
        .iter()
        .any(|candidate| candidate.to_lowercase() == use_case)
    {
        total += USE_CASE_POINTS;
    }

    if sample.difficulty == target {
        total += DIFFICULTY_POINTS;
    } else if sample.difficulty.is_adjacent_to(target) {
        total += ADJACENT_DIFFICULTY_POINTS;
    }

    let file_type = sample.file_type.to_lowercase();
    if profile.file_types.iter().any(|preferred| {
        let preferred = preferred.to_lowercase();
        preferred == file_type || sample.tags.iter().any(|tag| tag.to_lowercase() == preferred)
    }) {
        total += FILE_TYPE_POINTS;
    }

    if profile.goals.iter().any(|goal| {
        let goal = goal.to_lowercase();
        !goal.is_empty()
            && sample
                .learning_points
                .iter()
                .chain(sample.common_uses.iter())
                .any(|text| text.to_lowercase().contains(&goal))
    }) {
        total += GOAL_POINTS;
    }

    if let Some(industry) = profile.industry.as_deref() {
        let industry = industry.to_lowercase();
        if !industry.is_empty()
            && sample
                .tags
                .iter()
                .any(|tag| tag.to_lowercase().contains(&industry))
        {
            total += INDUSTRY_POINTS;
        }
    }

    if processed.contains(&sample.id) {
        total += PROCESSED_PENALTY;
    } else {
        total += UNPROCESSED_BONUS;
    }

    total
}

/// Score every sample and order by descending score; ties keep catalog order.
pub fn rank<'a>(
    catalog: &'a [SampleFile],
    profile: &UserProfile,
    processed: &HashSet<SampleId>,
) -> Vec<ScoredSample<'a>> {
    let mut scored: Vec<ScoredSample<'a>> = catalog
        .iter()
        .map(|sample| ScoredSample {
            sample,
            score: score(sample, profile, processed),
        })
        .collect();
    // `sort_by` is stable, which keeps catalog order for equal scores.
    scored.sort_by(|a, b| b.score.cmp(&a.score));
    scored
}

pub fn recommend<'a>(
    catalog: &'a [SampleFile],
    profile: &UserProfile,
    processed: &HashSet<SampleId>,
    limit: usize,
) -> Vec<&'a SampleFile> {
    let ranked = rank(catalog, profile, processed);

    let mut selected: Vec<&'a SampleFile> = ranked
        .iter()
        .filter(|scored| scored.score >= MIN_RELEVANCE_SCORE)
        .map(|scored| scored.sample)
        .collect();

    if selected.len() < MIN_RECOMMENDATIONS {
        let target = Difficulty::for_technical_level(&profile.technical_level);
        let same_tier = catalog.iter().filter(|sample| sample.difficulty == target);
        let rest = ranked.iter().map(|scored| scored.sample);

        for candidate in same_tier.chain(rest) {
            if selected.len() >= MIN_RECOMMENDATIONS {
                break;
            }
            if !selected.iter().any(|chosen| chosen.id == candidate.id) {
                selected.push(candidate);
            }
        }

        #[cfg(feature = "tracing")]
        tracing::debug!(
            selected = selected.len(),
            target = ?target,
            "sample recommendations backfilled"
        );
    }

    selected.truncate(limit);
    selected
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::samples::catalog::sample_catalog;
    use crate::samples::model::{Importance, MetadataHighlight};

    fn sample(id: &str, difficulty: Difficulty, use_case: &str, file_type: &str) -> SampleFile {
        SampleFile {
            id: SampleId::from(id),
            name: id.to_string(),
            description: String::new(),
            file_type: file_type.to_string(),
            difficulty,
            use_cases: vec![use_case.to_string()],
            tags: vec![file_type.to_string()],
            highlights: vec![MetadataHighlight {
                field: "Field".to_string(),
                value: "Value".to_string(),
                explanation: String::new(),
                importance: Importance::Low,
            }],
            learning_points: Vec::new(),
            common_uses: Vec::new(),
        }
    }

    fn profile(use_case: &str, level: &str) -> UserProfile {
        UserProfile {
            use_case: use_case.to_string(),
            technical_level: level.to_string(),
            ..Default::default()
        }
    }

    #[test]
    fn test_score_sums_matching_factors() {
        let sample = &sample_catalog()[0]; // smartphone-photo, basic, personal
        let mut profile = profile("personal", "beginner");
        profile.file_types = vec!["GPS".to_string()];
        profile.goals = vec!["where a photo was taken".to_string()];
        profile.industry = Some("travel".to_string());

        let total = score(sample, &profile, &HashSet::new());
        assert_eq!(total, 40 + 30 + 20 + 10 + 5 + 5);
    }

    #[test]
    fn test_adjacent_difficulty_excludes_exact_match() {
        let sample = sample("a", Difficulty::Intermediate, "x", "pdf");
        assert_eq!(score(&sample, &profile("y", "beginner"), &HashSet::new()), 15 + 5);
        assert_eq!(score(&sample, &profile("y", "intermediate"), &HashSet::new()), 30 + 5);
        assert_eq!(score(&sample, &profile("y", "advanced"), &HashSet::new()), 15 + 5);
    }

    #[test]
    fn test_processed_samples_are_penalised() {
        let sample = sample("a", Difficulty::Basic, "personal", "jpg");
        let processed: HashSet<SampleId> = [SampleId::from("a")].into_iter().collect();

        let fresh = score(&sample, &profile("personal", "beginner"), &HashSet::new());
        let seen = score(&sample, &profile("personal", "beginner"), &processed);
        assert_eq!(fresh - seen, 15);
    }

    #[test]
    fn test_rank_breaks_ties_by_catalog_order() {
        let catalog = vec![
            sample("first", Difficulty::Advanced, "x", "a"),
            sample("second", Difficulty::Advanced, "x", "b"),
            sample("best", Difficulty::Basic, "personal", "c"),
        ];
        let ranked = rank(&catalog, &profile("personal", "beginner"), &HashSet::new());
        let ids: Vec<_> = ranked.iter().map(|s| s.sample.id.as_str()).collect();
        assert_eq!(ids, vec!["best", "first", "second"]);
    }

    #[test]
    fn test_recommend_is_deterministic() {
        let mut profile = profile("forensics", "intermediate");
        profile.goals = vec!["authenticity".to_string()];
        let processed: HashSet<SampleId> = [SampleId::from("dslr-raw")].into_iter().collect();

        let first = recommend(sample_catalog(), &profile, &processed, 5);
        let second = recommend(sample_catalog(), &profile, &processed, 5);
        assert_eq!(first, second);
        assert_eq!(first[0].id, "edited-news-image");
    }

    #[test]
    fn test_recommend_returns_three_when_use_case_matches_nothing() {
        let profile = profile("astronomy", "advanced");
        let result = recommend(sample_catalog(), &profile, &HashSet::new(), 5);

        assert!(result.len() >= MIN_RECOMMENDATIONS);
        assert!(result.iter().all(|s| s.difficulty == Difficulty::Advanced));
    }

    #[test]
    fn test_recommend_backfill_falls_through_to_ranked_samples() {
        let catalog = vec![
            sample("a", Difficulty::Advanced, "x", "a"),
            sample("b", Difficulty::Advanced, "x", "b"),
            sample("c", Difficulty::Basic, "x", "c"),
            sample("d", Difficulty::Intermediate, "x", "d"),
        ];
        // Only "c" clears the bar; the rest comes from the ranked list.
        let result = recommend(&catalog, &profile("none", "unknown-level"), &HashSet::new(), 5);
        let ids: Vec<_> = result.iter().map(|s| s.id.as_str()).collect();
        assert_eq!(ids, vec!["c", "d", "a"]);
    }

    #[test]
    fn test_recommend_keeps_every_equally_strong_match() {
        let catalog: Vec<_> = ["a", "b", "c", "d", "e"]
            .into_iter()
            .map(|id| sample(id, Difficulty::Basic, "personal", id))
            .collect();
        let profile = profile("personal", "beginner");

        let scores: Vec<_> = rank(&catalog, &profile, &HashSet::new())
            .iter()
            .map(|scored| scored.score)
            .collect();
        assert!(scores.windows(2).all(|w| w[0] == w[1]));

        let result = recommend(&catalog, &profile, &HashSet::new(), 10);
        let ids: Vec<_> = result.iter().map(|s| s.id.as_str()).collect();
        assert_eq!(ids, vec!["a", "b", "c", "d", "e"]);
    }

    #[test]
    fn test_recommend_backfills_when_all_score_equally_low() {
        let catalog = vec![
            sample("a", Difficulty::Advanced, "x", "a"),
            sample("b", Difficulty::Advanced, "x", "b"),
            sample("c", Difficulty::Advanced, "x", "c"),
            sample("d", Difficulty::Advanced, "x", "d"),
        ];
        let result = recommend(&catalog, &profile("none", "beginner"), &HashSet::new(), 10);
        let ids: Vec<_> = result.iter().map(|s| s.id.as_str()).collect();
        assert_eq!(ids, vec!["a", "b", "c"]);
    }

    #[test]
    fn test_limit_caps_result_length() {
        let profile = profile("personal", "beginner");
        let result = recommend(sample_catalog(), &profile, &HashSet::new(), 2);
        assert_eq!(result.len(), 2);

        assert!(recommend(sample_catalog(), &profile, &HashSet::new(), 0).is_empty());
    }
}
