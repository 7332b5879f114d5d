use serde::{Deserialize, Serialize};

use crate::models::enums::str_enum;
use crate::models::ModelError;

str_enum!(MaterialKey {
    PostOpCare => "POST_OP_CARE",
    BreathingExercise => "BREATHING_EXERCISE",
    PainManagement => "PAIN_MANAGEMENT",
    EarlyAmbulation => "EARLY_AMBULATION",
    WoundCare => "WOUND_CARE",
    HomeCare => "HOME_CARE",
    WarningSigns => "WARNING_SIGNS",
    Nutrition => "NUTRITION",
    SmokingCessation => "SMOKING_CESSATION",
    FollowUp => "FOLLOW_UP",
    AdjuvantChemo => "ADJUVANT_CHEMO",
    TargetedTherapy => "TARGETED_THERAPY",
    EmotionalSupport => "EMOTIONAL_SUPPORT",
    PhysicalActivity => "PHYSICAL_ACTIVITY",
    SleepGuide => "SLEEP_GUIDE",
});

/// One handout. `content` is markdown.
#[derive(Debug, Clone, Serialize)]
pub struct Material {
    pub key: MaterialKey,
    pub id: &'static str,
    pub category: &'static str,
    pub title: &'static str,
    pub description: &'static str,
    pub content: &'static str,
    pub icon: &'static str,
    /// 1 is most important.
    pub priority: u8,
}

macro_rules! handout {
    ($file:literal) => {
        include_str!(concat!("../../content/handouts/", $file))
    };
}

static MATERIALS: [Material; 15] = [
    Material {
        key: MaterialKey::PostOpCare,
        id: "EDU001",
        category: "術後照護",
        title: "肺癌術後基礎照護指南",
        description: "傷口照護、活動注意事項、飲食建議",
        content: handout!("post_op_care.md"),
        icon: "🏥",
        priority: 1,
    },
    Material {
        key: MaterialKey::BreathingExercise,
        id: "EDU002",
        category: "呼吸訓練",
        title: "呼吸運動訓練指南",
        description: "深呼吸、噘嘴式呼吸、腹式呼吸練習",
        content: handout!("breathing_exercise.md"),
        icon: "🌬️",
        priority: 1,
    },
    Material {
        key: MaterialKey::PainManagement,
        id: "EDU003",
        category: "疼痛控制",
        title: "術後疼痛控制指南",
        description: "疼痛評估、用藥指導、非藥物緩解",
        content: handout!("pain_management.md"),
        icon: "💊",
        priority: 2,
    },
    Material {
        key: MaterialKey::EarlyAmbulation,
        id: "EDU004",
        category: "活動指導",
        title: "術後早期下床活動指南",
        description: "下床步驟、活動量建議、注意事項",
        content: handout!("early_ambulation.md"),
        icon: "🚶",
        priority: 1,
    },
    Material {
        key: MaterialKey::WoundCare,
        id: "EDU005",
        category: "傷口照護",
        title: "傷口照護指南",
        description: "傷口觀察、換藥、沐浴注意事項",
        content: handout!("wound_care.md"),
        icon: "🩹",
        priority: 2,
    },
    Material {
        key: MaterialKey::HomeCare,
        id: "EDU006",
        category: "居家照護",
        title: "出院居家照護指南",
        description: "居家注意事項、生活調整、回診提醒",
        content: handout!("home_care.md"),
        icon: "🏠",
        priority: 1,
    },
    Material {
        key: MaterialKey::WarningSigns,
        id: "EDU007",
        category: "警示徵象",
        title: "術後警示徵象",
        description: "需要立即就醫的危險徵象",
        content: handout!("warning_signs.md"),
        icon: "🚨",
        priority: 1,
    },
    Material {
        key: MaterialKey::Nutrition,
        id: "EDU008",
        category: "營養指導",
        title: "術後營養指南",
        description: "促進恢復的飲食建議",
        content: handout!("nutrition.md"),
        icon: "🍎",
        priority: 2,
    },
    Material {
        key: MaterialKey::SmokingCessation,
        id: "EDU009",
        category: "戒菸衛教",
        title: "戒菸指南",
        description: "戒菸的重要性與方法",
        content: handout!("smoking_cessation.md"),
        icon: "🚭",
        priority: 2,
    },
    Material {
        key: MaterialKey::FollowUp,
        id: "EDU010",
        category: "追蹤檢查",
        title: "術後追蹤檢查指南",
        description: "追蹤時程與檢查項目說明",
        content: handout!("follow_up.md"),
        icon: "📋",
        priority: 2,
    },
    Material {
        key: MaterialKey::AdjuvantChemo,
        id: "EDU011",
        category: "輔助治療",
        title: "術後輔助化學治療說明",
        description: "化療目的、流程、副作用處理",
        content: handout!("adjuvant_chemo.md"),
        icon: "💉",
        priority: 3,
    },
    Material {
        key: MaterialKey::TargetedTherapy,
        id: "EDU012",
        category: "輔助治療",
        title: "標靶治療說明",
        description: "EGFR-TKI 標靶藥物使用指南",
        content: handout!("targeted_therapy.md"),
        icon: "🎯",
        priority: 3,
    },
    Material {
        key: MaterialKey::EmotionalSupport,
        id: "EDU013",
        category: "心理支持",
        title: "術後心理調適指南",
        description: "情緒處理、心理支持資源",
        content: handout!("emotional_support.md"),
        icon: "💚",
        priority: 2,
    },
    Material {
        key: MaterialKey::PhysicalActivity,
        id: "EDU014",
        category: "復健運動",
        title: "術後運動指南",
        description: "漸進式運動建議",
        content: handout!("physical_activity.md"),
        icon: "🏃",
        priority: 2,
    },
    Material {
        key: MaterialKey::SleepGuide,
        id: "EDU015",
        category: "生活照護",
        title: "術後睡眠指南",
        description: "改善睡眠品質的方法",
        content: handout!("sleep_guide.md"),
        icon: "😴",
        priority: 3,
    },
];

/// All handouts in library order.
pub fn materials() -> &'static [Material] {
    &MATERIALS
}

pub fn material(key: MaterialKey) -> &'static Material {
    // Table rows are in variant declaration order.
    &MATERIALS[key as usize]
}

#[derive(Debug, Clone, Serialize)]
pub struct MaterialCategory {
    pub category: &'static str,
    pub materials: Vec<&'static Material>,
}

/// Handouts grouped by category, categories in order of first appearance.
pub fn materials_by_category() -> Vec<MaterialCategory> {
    let mut groups: Vec<MaterialCategory> = Vec::new();
    for m in MATERIALS.iter() {
        match groups.iter_mut().find(|g| g.category == m.category) {
            Some(group) => group.materials.push(m),
            None => groups.push(MaterialCategory {
                category: m.category,
                materials: vec![m],
            }),
        }
    }
    groups
}
