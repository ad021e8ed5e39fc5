//! Achievement evaluation
//!
//! Unlocks are evaluated on read against the full catalog; nothing is stored
//! per user. An unlock is the conjunction of both thresholds, so raising
//! either stat can only grow the unlocked set.

use crate::db::schemas::AchievementDoc;
use crate::services::stats::UserStats;

/// Filter the catalog down to the achievements this user has unlocked,
/// preserving catalog order.
pub fn unlocked_for<'a>(stats: UserStats, catalog: &'a [AchievementDoc]) -> Vec<&'a AchievementDoc> {
    catalog
        .iter()
        .filter(|a| {
            stats.completed_modules >= a.criteria.min_completed_modules
                && stats.score >= a.criteria.min_score
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    fn catalog() -> Vec<AchievementDoc> {
        vec![
            AchievementDoc::new("First Steps", "Complete your first module", 1, 0),
            AchievementDoc::new("Quiz Master", "Score at least 80% on a quiz", 0, 80),
            AchievementDoc::new("Dedicated Learner", "Complete five modules with 70%+", 5, 70),
        ]
    }

    fn titles<'a>(unlocked: &[&'a AchievementDoc]) -> Vec<&'a str> {
        unlocked.iter().map(|a| a.title.as_str()).collect()
    }

    #[test]
    fn both_thresholds_must_hold() {
        let catalog = catalog();

        // Five completions but a weak score: the conjunctive badge stays locked.
        let unlocked = unlocked_for(
            UserStats {
                completed_modules: 5,
                score: 60,
            },
            &catalog,
        );
        assert_eq!(titles(&unlocked), vec!["First Steps"]);
    }

    #[test]
    fn zero_threshold_is_trivially_met() {
        let catalog = catalog();

        let unlocked = unlocked_for(
            UserStats {
                completed_modules: 0,
                score: 80,
            },
            &catalog,
        );
        assert_eq!(titles(&unlocked), vec!["Quiz Master"]);
    }

    #[test]
    fn fresh_user_unlocks_nothing_with_nonzero_thresholds() {
        let catalog = catalog();
        let unlocked = unlocked_for(UserStats::default(), &catalog);
        assert!(unlocked.is_empty());
    }

    #[test]
    fn unlocked_set_grows_monotonically_with_stats() {
        let catalog = catalog();

        let low = unlocked_for(
            UserStats {
                completed_modules: 2,
                score: 75,
            },
            &catalog,
        );
        let high = unlocked_for(
            UserStats {
                completed_modules: 6,
                score: 90,
            },
            &catalog,
        );

        for a in &low {
            assert!(high.iter().any(|b| b.title == a.title));
        }
        assert_eq!(titles(&high).len(), 3);
    }

    #[test]
    fn exact_boundary_unlocks() {
        let catalog = catalog();
        let unlocked = unlocked_for(
            UserStats {
                completed_modules: 5,
                score: 70,
            },
            &catalog,
        );
        assert!(titles(&unlocked).contains(&"Dedicated Learner"));
    }
}
