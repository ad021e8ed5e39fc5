//! Learning-path recommendation
//!
//! A pure two-threshold classifier over a user's aggregate stats. Tiers are
//! checked in ascending order and the last satisfied rule wins, so the
//! Advanced rule shadows Intermediate whenever both hold.

use crate::db::schemas::ModuleLevel;
use crate::services::stats::UserStats;

/// Recommendation tiers reuse the module difficulty scale.
pub type Tier = ModuleLevel;

/// Classify a user's stats into a recommended tier.
///
/// Beginner unless at least 5 completions at 50%+, Advanced from 10
/// completions at 80%+.
pub fn recommend(stats: UserStats) -> Tier {
    let mut tier = Tier::Beginner;

    if stats.completed_modules >= 5 && stats.score >= 50 {
        tier = Tier::Intermediate;
    }

    if stats.completed_modules >= 10 && stats.score >= 80 {
        tier = Tier::Advanced;
    }

    tier
}

/// Suggested next actions for a tier, shown alongside the recommendation.
pub fn next_steps(tier: Tier) -> Vec<&'static str> {
    match tier {
        Tier::Beginner => vec![
            "Complete basics of FinTech",
            "Finish at least 5 modules",
            "Target 50%+ score",
        ],
        Tier::Intermediate => vec![
            "Take quizzes",
            "Start intermediate case studies",
            "Aim for 80%+",
        ],
        Tier::Advanced => vec![
            "Build a project",
            "Mentor others",
            "Take certification tests",
        ],
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn stats(completed_modules: u32, score: u32) -> UserStats {
        UserStats {
            completed_modules,
            score,
        }
    }

    #[test]
    fn fresh_user_is_beginner() {
        assert_eq!(recommend(stats(0, 0)), Tier::Beginner);
    }

    #[test]
    fn intermediate_boundary_is_inclusive() {
        assert_eq!(recommend(stats(5, 50)), Tier::Intermediate);
        assert_eq!(recommend(stats(4, 50)), Tier::Beginner);
        assert_eq!(recommend(stats(5, 49)), Tier::Beginner);
    }

    #[test]
    fn high_score_alone_does_not_promote() {
        assert_eq!(recommend(stats(4, 99)), Tier::Beginner);
        assert_eq!(recommend(stats(9, 100)), Tier::Intermediate);
    }

    #[test]
    fn advanced_requires_both_thresholds() {
        assert_eq!(recommend(stats(10, 80)), Tier::Advanced);
        assert_eq!(recommend(stats(10, 79)), Tier::Intermediate);
        assert_eq!(recommend(stats(9, 80)), Tier::Intermediate);
    }

    #[test]
    fn every_tier_has_three_next_steps() {
        for tier in [Tier::Beginner, Tier::Intermediate, Tier::Advanced] {
            assert_eq!(next_steps(tier).len(), 3);
        }
    }
}
