//! Day-based handout recommendations.

use super::library::MaterialKey;

/// Up to three handouts suited to the given post-operative day.
///
/// Day ranges are `0..=3`, `4..=7`, `8..=14` and `15..`. Negative days
/// (surgery date in the future) are treated as day 0.
pub fn recommend_materials(post_op_day: i64) -> [MaterialKey; 3] {
    use MaterialKey::*;
    match post_op_day.max(0) {
        0..=3 => [BreathingExercise, PainManagement, EarlyAmbulation],
        4..=7 => [WoundCare, HomeCare, WarningSigns],
        8..=14 => [PhysicalActivity, Nutrition, FollowUp],
        _ => [EmotionalSupport, SmokingCessation, PhysicalActivity],
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn early_recovery_focuses_on_breathing() {
        assert_eq!(
            recommend_materials(0),
            [
                MaterialKey::BreathingExercise,
                MaterialKey::PainManagement,
                MaterialKey::EarlyAmbulation
            ]
        );
        assert_eq!(recommend_materials(3), recommend_materials(0));
    }

    #[test]
    fn tier_changes_at_day_four() {
        assert_ne!(recommend_materials(3), recommend_materials(4));
        assert_eq!(recommend_materials(4)[0], MaterialKey::WoundCare);
        assert_eq!(recommend_materials(7), recommend_materials(4));
    }

    #[test]
    fn later_boundaries() {
        assert_eq!(recommend_materials(8)[0], MaterialKey::PhysicalActivity);
        assert_eq!(recommend_materials(14), recommend_materials(8));
        assert_eq!(recommend_materials(15)[0], MaterialKey::EmotionalSupport);
        assert_eq!(recommend_materials(365), recommend_materials(15));
    }

    #[test]
    fn negative_day_behaves_as_day_zero() {
        assert_eq!(recommend_materials(-5), recommend_materials(0));
    }
}
