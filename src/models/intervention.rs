use chrono::{NaiveDate, NaiveDateTime};
use serde::{Deserialize, Serialize};

pub const DEFAULT_INTERVENTION_TYPE: &str = "電話";

fn default_kind() -> String {
    DEFAULT_INTERVENTION_TYPE.to_string()
}

/// Staff contact with a patient (phone call, visit, referral).
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Intervention {
    pub id: String,
    pub patient_id: String,
    pub timestamp: NaiveDateTime,
    pub date: NaiveDate,
    #[serde(default)]
    pub time: String,
    #[serde(rename = "type", default = "default_kind")]
    pub kind: String,
    #[serde(default)]
    pub content: String,
    #[serde(default)]
    pub duration: String,
    #[serde(default)]
    pub referral: Option<String>,
    #[serde(default)]
    pub nurse: String,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct InterventionDraft {
    #[serde(rename = "type", default)]
    pub kind: Option<String>,
    #[serde(default)]
    pub content: String,
    #[serde(default)]
    pub duration: String,
    #[serde(default)]
    pub referral: Option<String>,
    #[serde(default)]
    pub nurse: String,
}
