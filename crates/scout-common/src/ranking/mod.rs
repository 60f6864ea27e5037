pub mod normalize;
pub mod weights;

use std::cmp::Ordering;

use self::normalize::SignalRange;
use self::weights::{MAX_SCORE, SCOUT_WEIGHTS};

/// How many candidates a run persists at most.
pub const SHORTLIST_LIMIT: usize = 10;

/// Raw per-user signals gathered from the store. A user enters the candidate
/// pool by having at least one winning submission matching a target
/// sub-skill; the portfolio signal is merged on afterwards.
#[derive(Debug, Clone, PartialEq)]
pub struct CandidateSignals {
    pub user_id: String,
    pub dollars_earned: f64,
    pub matched_skill_count: i64,
    pub matched_skills: Vec<String>,
    /// `None` when the user has no portfolio entries matching any target
    /// sub-skill.
    pub portfolio_matches: Option<i64>,
    pub recommended: bool,
}

#[derive(Debug, Clone, PartialEq)]
pub struct RankedCandidate {
    pub user_id: String,
    pub dollars_earned: f64,
    pub score: f64,
    pub matched_skills: Vec<String>,
}

/// Normalize each signal over the pool, combine with [`SCOUT_WEIGHTS`], and
/// return the top [`SHORTLIST_LIMIT`] candidates by descending score.
///
/// Range conventions:
/// - dollars and matched-skill-count ranges span the whole pool;
/// - the portfolio range spans pool members with at least one qualifying
///   portfolio entry and nonzero dollars earned;
/// - a candidate with no qualifying portfolio entries scores 0.0 on that
///   signal (not the 0.1 floor the other signals have);
/// - a fully tied signal normalizes to 1.0 for everyone (see
///   [`SignalRange::normalize`]).
pub fn rank_candidates(pool: &[CandidateSignals]) -> Vec<RankedCandidate> {
    if pool.is_empty() {
        return Vec::new();
    }

    let dollars_range = SignalRange::from_values(pool.iter().map(|c| c.dollars_earned));
    let skills_range = SignalRange::from_values(pool.iter().map(|c| c.matched_skill_count as f64));
    let portfolio_range = SignalRange::from_values(
        pool.iter()
            .filter(|c| c.portfolio_matches.is_some() && c.dollars_earned > 0.0)
            .filter_map(|c| c.portfolio_matches.map(|v| v as f64)),
    );

    let mut ranked: Vec<RankedCandidate> = pool
        .iter()
        .map(|candidate| {
            let normalized_dollars = dollars_range
                .map(|range| range.normalize(candidate.dollars_earned))
                .unwrap_or(0.0);
            let normalized_skills = skills_range
                .map(|range| range.normalize(candidate.matched_skill_count as f64))
                .unwrap_or(0.0);
            let normalized_portfolio = match (candidate.portfolio_matches, portfolio_range) {
                (Some(matches), Some(range)) => range.normalize(matches as f64),
                _ => 0.0,
            };
            let recommended = if candidate.recommended { 1.0 } else { 0.0 };

            let score = MAX_SCORE
                * (SCOUT_WEIGHTS.dollars * normalized_dollars
                    + SCOUT_WEIGHTS.matched_skills * normalized_skills
                    + SCOUT_WEIGHTS.portfolio * normalized_portfolio
                    + SCOUT_WEIGHTS.recommended * recommended);

            RankedCandidate {
                user_id: candidate.user_id.clone(),
                dollars_earned: candidate.dollars_earned,
                score,
                matched_skills: candidate.matched_skills.clone(),
            }
        })
        .collect();

    ranked.sort_by(|a, b| {
        b.score
            .partial_cmp(&a.score)
            .unwrap_or(Ordering::Equal)
            .then_with(|| b.dollars_earned.partial_cmp(&a.dollars_earned).unwrap_or(Ordering::Equal))
    });
    ranked.truncate(SHORTLIST_LIMIT);

    ranked
}

#[cfg(test)]
mod tests {
    use super::*;

    fn candidate(user_id: &str, dollars: f64, skills: i64) -> CandidateSignals {
        CandidateSignals {
            user_id: user_id.into(),
            dollars_earned: dollars,
            matched_skill_count: skills,
            matched_skills: vec![],
            portfolio_matches: None,
            recommended: false,
        }
    }

    #[test]
    fn empty_pool_yields_no_candidates() {
        assert!(rank_candidates(&[]).is_empty());
    }

    #[test]
    fn scores_stay_within_bounds() {
        let pool: Vec<_> = (0..25)
            .map(|i| CandidateSignals {
                user_id: format!("user-{i}"),
                dollars_earned: (i * 137) as f64,
                matched_skill_count: i % 5,
                matched_skills: vec![],
                portfolio_matches: if i % 3 == 0 { Some(i % 7) } else { None },
                recommended: i % 2 == 0,
            })
            .collect();

        for ranked in rank_candidates(&pool) {
            assert!(ranked.score >= 0.0, "score below zero: {}", ranked.score);
            assert!(ranked.score <= 10.0, "score above ten: {}", ranked.score);
        }
    }

    #[test]
    fn caps_output_at_shortlist_limit() {
        let pool: Vec<_> = (0..40)
            .map(|i| candidate(&format!("user-{i}"), (i * 100) as f64, 1))
            .collect();

        assert_eq!(rank_candidates(&pool).len(), SHORTLIST_LIMIT);

        let small_pool: Vec<_> = (0..3)
            .map(|i| candidate(&format!("user-{i}"), (i * 100) as f64, 1))
            .collect();
        assert_eq!(rank_candidates(&small_pool).len(), 3);
    }

    #[test]
    fn output_is_sorted_by_descending_score() {
        let pool: Vec<_> = (0..15)
            .map(|i| CandidateSignals {
                user_id: format!("user-{i}"),
                dollars_earned: ((i * 31) % 11) as f64 * 200.0,
                matched_skill_count: (i % 4) + 1,
                matched_skills: vec![],
                portfolio_matches: None,
                recommended: i % 3 == 0,
            })
            .collect();

        let ranked = rank_candidates(&pool);
        for pair in ranked.windows(2) {
            assert!(pair[0].score >= pair[1].score);
        }
    }

    #[test]
    fn more_dollars_never_lowers_the_score() {
        // Fix the range with two sentinels, then move a middle candidate up.
        let base = vec![
            candidate("low", 0.0, 1),
            candidate("high", 10_000.0, 1),
            candidate("subject", 2_000.0, 1),
        ];
        let mut raised = base.clone();
        raised[2].dollars_earned = 6_000.0;

        let score_of = |pool: &[CandidateSignals]| {
            rank_candidates(pool)
                .into_iter()
                .find(|r| r.user_id == "subject")
                .unwrap()
                .score
        };

        assert!(score_of(&raised) >= score_of(&base));
    }

    #[test]
    fn recommended_flag_breaks_an_otherwise_exact_tie() {
        let mut pool = vec![candidate("plain", 500.0, 1), candidate("curated", 500.0, 1)];
        pool[1].recommended = true;

        let ranked = rank_candidates(&pool);
        assert_eq!(ranked[0].user_id, "curated");
        assert!((ranked[0].score - ranked[1].score - 2.5).abs() < 1e-9);
    }

    // Listing requires {React, Solidity}. User A: one $500 winning
    // submission matching React, one portfolio entry mentioning Solidity.
    // User B: one $2000 winning submission matching both, recommended, no
    // portfolio. B must rank above A.
    #[test]
    fn two_user_scenario_ranks_the_stronger_profile_first() {
        let pool = vec![
            CandidateSignals {
                user_id: "user-a".into(),
                dollars_earned: 500.0,
                matched_skill_count: 1,
                matched_skills: vec!["React".into()],
                portfolio_matches: Some(1),
                recommended: false,
            },
            CandidateSignals {
                user_id: "user-b".into(),
                dollars_earned: 2000.0,
                matched_skill_count: 2,
                matched_skills: vec!["React".into(), "Solidity".into()],
                portfolio_matches: None,
                recommended: true,
            },
        ];

        let ranked = rank_candidates(&pool);
        assert_eq!(ranked.len(), 2);
        assert_eq!(ranked[0].user_id, "user-b");
        assert_eq!(ranked[1].user_id, "user-a");

        // A's portfolio range collapses to a single value, so A gets full
        // portfolio credit; B still wins on dollars, skills and the flag.
        assert!((ranked[0].score - 7.5).abs() < 1e-9);
        assert!((ranked[1].score - 3.0).abs() < 1e-9);
    }

    #[test]
    fn portfolio_signal_is_zero_without_qualifying_entries() {
        let pool = vec![
            candidate("no-portfolio", 1000.0, 2),
            CandidateSignals {
                portfolio_matches: Some(3),
                ..candidate("with-portfolio", 1000.0, 2)
            },
        ];

        let ranked = rank_candidates(&pool);
        let with = ranked.iter().find(|r| r.user_id == "with-portfolio").unwrap();
        let without = ranked.iter().find(|r| r.user_id == "no-portfolio").unwrap();
        assert!((with.score - without.score - 2.5).abs() < 1e-9);
    }
}
