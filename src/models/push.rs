use chrono::NaiveDateTime;
use serde::{Deserialize, Serialize};

use super::enums::{PushStatus, PushType};
use crate::education::MaterialKey;

/// Record of a handout sent to a patient.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct MaterialPush {
    pub id: String,
    pub patient_id: String,
    #[serde(default)]
    pub patient_name: String,
    pub material_id: MaterialKey,
    pub material_title: String,
    pub category: String,
    pub push_type: PushType,
    pub pushed_by: String,
    pub pushed_at: NaiveDateTime,
    #[serde(default)]
    pub read_at: Option<NaiveDateTime>,
    pub status: PushStatus,
}
