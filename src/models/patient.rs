use chrono::{NaiveDate, NaiveDateTime};
use serde::{Deserialize, Serialize};

use super::enums::PatientStatus;

pub const DEFAULT_AGE: u32 = 65;
pub const DEFAULT_SURGERY: &str = "肺葉切除術";
pub const PENDING_SURGERY: &str = "待設定";
pub const DEFAULT_DIAGNOSIS: &str = "肺癌";

fn default_age() -> u32 {
    DEFAULT_AGE
}

/// Stored patient record.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Patient {
    pub id: String,
    pub name: String,
    #[serde(default)]
    pub phone: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub password: Option<String>,
    #[serde(default = "default_age")]
    pub age: u32,
    #[serde(default)]
    pub surgery: String,
    #[serde(default)]
    pub surgery_date: Option<NaiveDate>,
    #[serde(default)]
    pub diagnosis: String,
    #[serde(default)]
    pub consent_agreed: bool,
    #[serde(default)]
    pub consent_time: Option<NaiveDateTime>,
    #[serde(default)]
    pub status: PatientStatus,
    #[serde(default)]
    pub created_at: Option<NaiveDateTime>,
    #[serde(default)]
    pub last_report: Option<NaiveDateTime>,
    #[serde(default)]
    pub total_reports: u32,
    #[serde(default)]
    pub compliance_rate: f64,
}

impl Patient {
    /// Days since surgery, never negative. Zero when no surgery date is set.
    pub fn post_op_day(&self, today: NaiveDate) -> i64 {
        self.surgery_date
            .map(|date| (today - date).num_days().max(0))
            .unwrap_or(0)
    }

    /// Patient data safe to hand to clients.
    pub fn profile(&self, today: NaiveDate) -> PatientProfile {
        PatientProfile {
            id: self.id.clone(),
            name: self.name.clone(),
            phone: self.phone.clone(),
            age: self.age,
            surgery: self.surgery.clone(),
            surgery_date: self.surgery_date,
            diagnosis: self.diagnosis.clone(),
            status: self.status,
            post_op_day: self.post_op_day(today),
        }
    }
}

/// Optional overrides when a patient record is created implicitly.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct NewPatient {
    pub name: Option<String>,
    pub phone: Option<String>,
    pub password: Option<String>,
    pub age: Option<u32>,
    pub surgery: Option<String>,
    pub surgery_date: Option<NaiveDate>,
    pub diagnosis: Option<String>,
    pub consent_agreed: bool,
    pub status: Option<PatientStatus>,
}

/// Client-facing patient view (no password).
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PatientProfile {
    pub id: String,
    pub name: String,
    pub phone: String,
    pub age: u32,
    pub surgery: String,
    pub surgery_date: Option<NaiveDate>,
    pub diagnosis: String,
    pub status: PatientStatus,
    pub post_op_day: i64,
}
