use std::cmp::Reverse;

use super::{now, patient_name, JsonStore, RecordDocument, StoreError};
use crate::education::{self, MaterialKey, PushContext};
use crate::models::{short_id, MaterialPush, PushStatus, PushType};

/// Sender recorded on rule-triggered pushes.
const SYSTEM_SENDER: &str = "system";

fn new_push(
    doc: &RecordDocument,
    patient_id: &str,
    key: MaterialKey,
    push_type: PushType,
    pushed_by: &str,
) -> MaterialPush {
    let material = education::material(key);
    MaterialPush {
        id: format!("PUSH{}", short_id()),
        patient_id: patient_id.to_string(),
        patient_name: patient_name(doc, patient_id),
        material_id: key,
        material_title: material.title.to_string(),
        category: material.category.to_string(),
        push_type,
        pushed_by: pushed_by.to_string(),
        pushed_at: now(),
        read_at: None,
        status: PushStatus::Sent,
    }
}

impl JsonStore {
    /// Staff sends a handout to a patient.
    pub fn push_material(
        &self,
        patient_id: &str,
        key: MaterialKey,
        pushed_by: &str,
    ) -> Result<MaterialPush, StoreError> {
        self.write(|doc| {
            let push = new_push(doc, patient_id, key, PushType::Manual, pushed_by);
            doc.pushes.push(push.clone());
            Ok(push)
        })
    }

    /// Push every handout the auto rules call for, skipping handouts this
    /// patient already received through an auto push.
    pub fn check_auto_push(
        &self,
        patient_id: &str,
        ctx: &PushContext,
    ) -> Result<Vec<MaterialPush>, StoreError> {
        let due = education::due_materials(ctx);
        if due.is_empty() {
            return Ok(Vec::new());
        }
        self.write(|doc| {
            let mut pushed = Vec::new();
            for key in due {
                let already = doc.pushes.iter().any(|p| {
                    p.patient_id == patient_id
                        && p.material_id == key
                        && p.push_type == PushType::Auto
                });
                if already {
                    continue;
                }
                let push = new_push(doc, patient_id, key, PushType::Auto, SYSTEM_SENDER);
                doc.pushes.push(push.clone());
                pushed.push(push);
            }
            if !pushed.is_empty() {
                tracing::info!(patient_id, count = pushed.len(), "Handouts auto-pushed");
            }
            Ok(pushed)
        })
    }

    /// Pushes received by one patient, newest first.
    pub fn patient_pushes(&self, patient_id: &str) -> Result<Vec<MaterialPush>, StoreError> {
        self.read(|doc| {
            let mut list: Vec<_> = doc
                .pushes
                .iter()
                .filter(|p| p.patient_id == patient_id)
                .cloned()
                .collect();
            list.sort_by_key(|p| Reverse(p.pushed_at));
            list
        })
    }

    /// Every push, newest first.
    pub fn all_pushes(&self) -> Result<Vec<MaterialPush>, StoreError> {
        self.read(|doc| {
            let mut list = doc.pushes.clone();
            list.sort_by_key(|p| Reverse(p.pushed_at));
            list
        })
    }

    /// Mark a push as read. Reading twice keeps the first read time.
    pub fn mark_as_read(&self, push_id: &str) -> Result<MaterialPush, StoreError> {
        self.write(|doc| {
            let push = doc
                .pushes
                .iter_mut()
                .find(|p| p.id == push_id)
                .ok_or_else(|| StoreError::PushNotFound(push_id.to_string()))?;
            if push.status != PushStatus::Read {
                push.status = PushStatus::Read;
                push.read_at = Some(now());
            }
            Ok(push.clone())
        })
    }
}
