use serde::{Deserialize, Serialize};

use super::enums::str_enum;
use super::ModelError;

// Serialized as the Chinese display label, which is what reports and
// alerts have always stored.
str_enum!(SymptomTag {
    RespiratoryDistress => "呼吸困難",
    Pain => "疼痛",
    Cough => "咳嗽",
    Fatigue => "疲勞",
    SleepIssue => "睡眠問題",
    AppetiteLoss => "食慾不振",
});

impl SymptomTag {
    pub const ALL: [SymptomTag; 6] = [
        SymptomTag::RespiratoryDistress,
        SymptomTag::Pain,
        SymptomTag::Cough,
        SymptomTag::Fatigue,
        SymptomTag::SleepIssue,
        SymptomTag::AppetiteLoss,
    ];

    /// Display label shown to patients and staff.
    pub fn label(&self) -> &'static str {
        self.as_str()
    }
}
