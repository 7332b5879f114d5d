use chrono::NaiveDateTime;
use serde::{Deserialize, Serialize};

use super::enums::{AlertLevel, AlertStatus};
use super::symptom::SymptomTag;

/// Staff follow-up flag raised by a high severity score.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Alert {
    pub id: String,
    pub patient_id: String,
    #[serde(default)]
    pub patient_name: String,
    pub level: AlertLevel,
    pub score: u8,
    #[serde(default)]
    pub symptoms: Vec<SymptomTag>,
    pub timestamp: NaiveDateTime,
    #[serde(default)]
    pub time_display: String,
    #[serde(default)]
    pub status: AlertStatus,
    #[serde(default)]
    pub handled_by: Option<String>,
    #[serde(default)]
    pub handled_at: Option<NaiveDateTime>,
    #[serde(default)]
    pub notes: String,
}
