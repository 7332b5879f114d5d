//! Rules that push handouts without staff involvement.

use super::library::MaterialKey;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PushTrigger {
    /// Exact post-operative day.
    PostOpDay(i64),
    /// Substring of any reported symptom.
    Symptom(&'static str),
    /// Case-insensitive substring of the treatment plan.
    Treatment(&'static str),
}

#[derive(Debug, Clone, Copy)]
pub struct AutoPushRule {
    pub id: &'static str,
    pub name: &'static str,
    pub trigger: PushTrigger,
    pub materials: &'static [MaterialKey],
}

use MaterialKey::*;

pub static AUTO_PUSH_RULES: [AutoPushRule; 14] = [
    AutoPushRule {
        id: "RULE001",
        name: "術後第 1 天",
        trigger: PushTrigger::PostOpDay(1),
        materials: &[BreathingExercise, EarlyAmbulation, PainManagement],
    },
    AutoPushRule {
        id: "RULE002",
        name: "術後第 2 天",
        trigger: PushTrigger::PostOpDay(2),
        materials: &[WoundCare, Nutrition],
    },
    AutoPushRule {
        id: "RULE003",
        name: "術後第 3 天",
        trigger: PushTrigger::PostOpDay(3),
        materials: &[PostOpCare],
    },
    AutoPushRule {
        id: "RULE004",
        name: "出院前（術後第 5 天）",
        trigger: PushTrigger::PostOpDay(5),
        materials: &[HomeCare, WarningSigns],
    },
    AutoPushRule {
        id: "RULE005",
        name: "術後第 7 天",
        trigger: PushTrigger::PostOpDay(7),
        materials: &[PhysicalActivity, EmotionalSupport],
    },
    AutoPushRule {
        id: "RULE006",
        name: "術後第 14 天",
        trigger: PushTrigger::PostOpDay(14),
        materials: &[FollowUp],
    },
    AutoPushRule {
        id: "RULE007",
        name: "術後第 30 天",
        trigger: PushTrigger::PostOpDay(30),
        materials: &[SmokingCessation],
    },
    AutoPushRule {
        id: "RULE101",
        name: "呼吸困難症狀",
        trigger: PushTrigger::Symptom("呼吸困難"),
        materials: &[BreathingExercise, WarningSigns],
    },
    AutoPushRule {
        id: "RULE102",
        name: "疼痛症狀",
        trigger: PushTrigger::Symptom("疼痛"),
        materials: &[PainManagement],
    },
    AutoPushRule {
        id: "RULE103",
        name: "睡眠問題",
        trigger: PushTrigger::Symptom("睡眠"),
        materials: &[SleepGuide],
    },
    AutoPushRule {
        id: "RULE104",
        name: "情緒困擾",
        trigger: PushTrigger::Symptom("焦慮"),
        materials: &[EmotionalSupport],
    },
    AutoPushRule {
        id: "RULE105",
        name: "傷口問題",
        trigger: PushTrigger::Symptom("傷口"),
        materials: &[WoundCare, WarningSigns],
    },
    AutoPushRule {
        id: "RULE201",
        name: "開始化療",
        trigger: PushTrigger::Treatment("chemotherapy"),
        materials: &[AdjuvantChemo],
    },
    AutoPushRule {
        id: "RULE202",
        name: "開始標靶治療",
        trigger: PushTrigger::Treatment("targeted"),
        materials: &[TargetedTherapy],
    },
];

/// Facts about a patient the rules are matched against.
#[derive(Debug, Clone, Default)]
pub struct PushContext {
    pub post_op_day: i64,
    /// Symptom labels or free-text concerns, e.g. "呼吸困難" or "傷口".
    pub symptoms: Vec<String>,
    pub treatment: Option<String>,
}

impl AutoPushRule {
    pub fn matches(&self, ctx: &PushContext) -> bool {
        match self.trigger {
            PushTrigger::PostOpDay(day) => ctx.post_op_day == day,
            PushTrigger::Symptom(needle) => ctx.symptoms.iter().any(|s| s.contains(needle)),
            PushTrigger::Treatment(needle) => ctx
                .treatment
                .as_deref()
                .is_some_and(|t| t.to_lowercase().contains(needle)),
        }
    }
}

/// Handouts due under every matching rule, in rule order, without repeats.
pub fn due_materials(ctx: &PushContext) -> Vec<MaterialKey> {
    let mut due = Vec::new();
    for rule in AUTO_PUSH_RULES.iter().filter(|r| r.matches(ctx)) {
        for key in rule.materials {
            if !due.contains(key) {
                due.push(*key);
            }
        }
    }
    due
}

#[cfg(test)]
mod tests {
    use super::*;

    fn ctx(day: i64, symptoms: &[&str], treatment: Option<&str>) -> PushContext {
        PushContext {
            post_op_day: day,
            symptoms: symptoms.iter().map(|s| s.to_string()).collect(),
            treatment: treatment.map(str::to_string),
        }
    }

    #[test]
    fn day_one_materials() {
        assert_eq!(
            due_materials(&ctx(1, &[], None)),
            vec![BreathingExercise, EarlyAmbulation, PainManagement]
        );
    }

    #[test]
    fn days_without_rule_push_nothing() {
        assert!(due_materials(&ctx(4, &[], None)).is_empty());
        assert!(due_materials(&ctx(-1, &[], None)).is_empty());
    }

    #[test]
    fn symptom_label_substring_matches() {
        assert_eq!(due_materials(&ctx(9, &["睡眠問題"], None)), vec![SleepGuide]);
        assert_eq!(
            due_materials(&ctx(9, &["傷口"], None)),
            vec![WoundCare, WarningSigns]
        );
    }

    #[test]
    fn overlapping_rules_do_not_repeat() {
        let due = due_materials(&ctx(1, &["呼吸困難"], None));
        assert_eq!(
            due,
            vec![BreathingExercise, EarlyAmbulation, PainManagement, WarningSigns]
        );
    }

    #[test]
    fn treatment_match_is_case_insensitive() {
        assert_eq!(
            due_materials(&ctx(40, &[], Some("Adjuvant Chemotherapy"))),
            vec![AdjuvantChemo]
        );
        assert_eq!(
            due_materials(&ctx(40, &[], Some("EGFR targeted therapy"))),
            vec![TargetedTherapy]
        );
    }

    #[test]
    fn every_rule_has_materials() {
        for rule in AUTO_PUSH_RULES.iter() {
            assert!(!rule.materials.is_empty(), "{} pushes nothing", rule.id);
        }
    }
}
