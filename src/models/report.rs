use chrono::{NaiveDate, NaiveDateTime};
use serde::{Deserialize, Serialize};

use super::conversation::ChatMessage;
use super::enums::ReportStatus;
use super::symptom::SymptomTag;

/// A completed daily symptom report.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SymptomReport {
    pub id: String,
    pub patient_id: String,
    pub timestamp: NaiveDateTime,
    pub date: NaiveDate,
    #[serde(default)]
    pub time: String,
    #[serde(default)]
    pub symptoms: Vec<SymptomTag>,
    #[serde(default)]
    pub overall_score: u8,
    #[serde(default)]
    pub conversation: Vec<ChatMessage>,
    #[serde(default)]
    pub status: ReportStatus,
}

/// What the intake flow hands to the store when a session completes.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ReportDraft {
    pub symptoms: Vec<SymptomTag>,
    pub overall_score: u8,
    pub conversation: Vec<ChatMessage>,
}
