use std::cmp::Reverse;

use serde::Serialize;

use super::{now, patient_name, today, JsonStore, StoreError};
use crate::models::{
    short_id, Alert, AlertLevel, AlertStatus, Intervention, InterventionDraft, ReportDraft,
    ReportStatus, SymptomReport, SymptomTag, DEFAULT_INTERVENTION_TYPE,
};

/// Dashboard counters.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct Statistics {
    pub total_patients: usize,
    pub total_reports: usize,
    pub today_reports: usize,
    pub today_alerts: usize,
    pub pending_alerts: usize,
    pub red_alerts: usize,
    pub yellow_alerts: usize,
}

impl JsonStore {
    /// Append a completed report and refresh the patient's report counters.
    ///
    /// Alerts are not derived here; the intake flow decides those.
    pub fn save_report(&self, patient_id: &str, draft: ReportDraft) -> Result<SymptomReport, StoreError> {
        self.write(|doc| {
            let timestamp = now();
            let report = SymptomReport {
                id: short_id(),
                patient_id: patient_id.to_string(),
                timestamp,
                date: timestamp.date(),
                time: timestamp.format("%H:%M").to_string(),
                symptoms: draft.symptoms,
                overall_score: draft.overall_score,
                conversation: draft.conversation,
                status: ReportStatus::Completed,
            };
            doc.reports.push(report.clone());

            let total = doc.reports.iter().filter(|r| r.patient_id == patient_id).count();
            if let Some(patient) = doc.patients.get_mut(patient_id) {
                patient.last_report = Some(timestamp);
                patient.total_reports = u32::try_from(total).unwrap_or(u32::MAX);
            }
            Ok(report)
        })
    }

    /// Newest first, at most `limit`.
    pub fn patient_reports(&self, patient_id: &str, limit: usize) -> Result<Vec<SymptomReport>, StoreError> {
        self.read(|doc| {
            let mut reports: Vec<_> = doc
                .reports
                .iter()
                .filter(|r| r.patient_id == patient_id)
                .cloned()
                .collect();
            reports.sort_by_key(|r| Reverse(r.timestamp));
            reports.truncate(limit);
            reports
        })
    }

    pub fn create_alert(
        &self,
        patient_id: &str,
        level: AlertLevel,
        score: u8,
        symptoms: &[SymptomTag],
    ) -> Result<Alert, StoreError> {
        self.write(|doc| {
            let timestamp = now();
            let patient_name = patient_name(doc, patient_id);
            let alert = Alert {
                id: short_id(),
                patient_id: patient_id.to_string(),
                patient_name,
                level,
                score,
                symptoms: symptoms.to_vec(),
                timestamp,
                time_display: timestamp.format("%m/%d %H:%M").to_string(),
                status: AlertStatus::Pending,
                handled_by: None,
                handled_at: None,
                notes: String::new(),
            };
            doc.alerts.push(alert.clone());
            Ok(alert)
        })
    }

    /// Pending alerts, red before yellow, newest first within a level.
    pub fn pending_alerts(&self) -> Result<Vec<Alert>, StoreError> {
        self.read(|doc| {
            let mut alerts: Vec<_> = doc
                .alerts
                .iter()
                .filter(|a| a.status == AlertStatus::Pending)
                .cloned()
                .collect();
            // AlertLevel orders Red before Yellow.
            alerts.sort_by_key(|a| (a.level, Reverse(a.timestamp)));
            alerts
        })
    }

    /// All alerts, newest first, at most `limit`.
    pub fn all_alerts(&self, limit: usize) -> Result<Vec<Alert>, StoreError> {
        self.read(|doc| {
            let mut alerts = doc.alerts.clone();
            alerts.sort_by_key(|a| Reverse(a.timestamp));
            alerts.truncate(limit);
            alerts
        })
    }

    pub fn update_alert_status(
        &self,
        alert_id: &str,
        status: AlertStatus,
        handled_by: &str,
        notes: Option<&str>,
    ) -> Result<Alert, StoreError> {
        self.write(|doc| {
            let alert = doc
                .alerts
                .iter_mut()
                .find(|a| a.id == alert_id)
                .ok_or_else(|| StoreError::AlertNotFound(alert_id.to_string()))?;
            alert.status = status;
            alert.handled_by = Some(handled_by.to_string());
            alert.handled_at = Some(now());
            if let Some(notes) = notes {
                alert.notes = notes.to_string();
            }
            Ok(alert.clone())
        })
    }

    pub fn save_intervention(
        &self,
        patient_id: &str,
        draft: InterventionDraft,
    ) -> Result<Intervention, StoreError> {
        self.write(|doc| {
            let timestamp = now();
            let intervention = Intervention {
                id: short_id(),
                patient_id: patient_id.to_string(),
                timestamp,
                date: timestamp.date(),
                time: timestamp.format("%H:%M").to_string(),
                kind: draft
                    .kind
                    .filter(|k| !k.trim().is_empty())
                    .unwrap_or_else(|| DEFAULT_INTERVENTION_TYPE.to_string()),
                content: draft.content,
                duration: draft.duration,
                referral: draft.referral,
                nurse: draft.nurse,
            };
            doc.interventions.push(intervention.clone());
            Ok(intervention)
        })
    }

    /// Interventions, optionally for one patient, newest first.
    pub fn interventions(&self, patient_id: Option<&str>, limit: usize) -> Result<Vec<Intervention>, StoreError> {
        self.read(|doc| {
            let mut list: Vec<_> = doc
                .interventions
                .iter()
                .filter(|i| patient_id.map_or(true, |id| i.patient_id == id))
                .cloned()
                .collect();
            list.sort_by_key(|i| Reverse(i.timestamp));
            list.truncate(limit);
            list
        })
    }

    pub fn statistics(&self) -> Result<Statistics, StoreError> {
        let today = today();
        self.read(|doc| {
            let pending = doc.alerts.iter().filter(|a| a.status == AlertStatus::Pending);
            Statistics {
                total_patients: doc.patients.len(),
                total_reports: doc.reports.len(),
                today_reports: doc.reports.iter().filter(|r| r.date == today).count(),
                today_alerts: doc
                    .alerts
                    .iter()
                    .filter(|a| a.timestamp.date() == today)
                    .count(),
                pending_alerts: pending.clone().count(),
                red_alerts: pending.clone().filter(|a| a.level == AlertLevel::Red).count(),
                yellow_alerts: pending.filter(|a| a.level == AlertLevel::Yellow).count(),
            }
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::ChatMessage;
    use crate::store::test_support::temp_store;

    fn draft(score: u8) -> ReportDraft {
        ReportDraft {
            symptoms: vec![SymptomTag::Pain],
            overall_score: score,
            conversation: vec![ChatMessage::user("有點痛"), ChatMessage::assistant("了解")],
        }
    }

    #[test]
    fn report_updates_patient_counters() {
        let (_dir, store) = temp_store();
        store.get_or_create_patient("P1", None).unwrap();
        let report = store.save_report("P1", draft(5)).unwrap();
        store.save_report("P1", draft(2)).unwrap();

        assert_eq!(report.id.len(), 8);
        assert_eq!(report.status, ReportStatus::Completed);
        let patient = store.patient("P1").unwrap().unwrap();
        assert_eq!(patient.total_reports, 2);
        assert!(patient.last_report.is_some());
    }

    #[test]
    fn report_does_not_create_alerts() {
        let (_dir, store) = temp_store();
        store.save_report("P1", draft(9)).unwrap();
        assert!(store.pending_alerts().unwrap().is_empty());
    }

    #[test]
    fn report_for_unknown_patient_is_kept() {
        let (_dir, store) = temp_store();
        store.save_report("GHOST", draft(3)).unwrap();
        assert_eq!(store.patient_reports("GHOST", 10).unwrap().len(), 1);
        assert!(store.patient("GHOST").unwrap().is_none());
    }

    #[test]
    fn patient_reports_respects_limit() {
        let (_dir, store) = temp_store();
        for score in 0..5 {
            store.save_report("P1", draft(score)).unwrap();
        }
        store.save_report("P2", draft(1)).unwrap();
        let reports = store.patient_reports("P1", 3).unwrap();
        assert_eq!(reports.len(), 3);
        assert!(reports.iter().all(|r| r.patient_id == "P1"));
        assert!(reports.windows(2).all(|w| w[0].timestamp >= w[1].timestamp));
    }

    #[test]
    fn alert_snapshots_patient_name() {
        let (_dir, store) = temp_store();
        store.get_or_create_patient("P1", None).unwrap();
        let alert = store
            .create_alert("P1", AlertLevel::Red, 8, &[SymptomTag::RespiratoryDistress])
            .unwrap();
        assert_eq!(alert.patient_name, "病人P1");
        assert_eq!(alert.status, AlertStatus::Pending);
        assert!(alert.handled_by.is_none());

        let orphan = store.create_alert("NOPE", AlertLevel::Yellow, 5, &[]).unwrap();
        assert_eq!(orphan.patient_name, "未知");
    }

    #[test]
    fn pending_alerts_put_red_first() {
        let (_dir, store) = temp_store();
        store.create_alert("A", AlertLevel::Yellow, 5, &[]).unwrap();
        store.create_alert("B", AlertLevel::Red, 9, &[]).unwrap();
        store.create_alert("C", AlertLevel::Yellow, 4, &[]).unwrap();
        let pending = store.pending_alerts().unwrap();
        let levels: Vec<_> = pending.iter().map(|a| a.level).collect();
        assert_eq!(levels, vec![AlertLevel::Red, AlertLevel::Yellow, AlertLevel::Yellow]);
        assert!(pending[1].timestamp >= pending[2].timestamp);
    }

    #[test]
    fn alert_status_update() {
        let (_dir, store) = temp_store();
        let alert = store.create_alert("A", AlertLevel::Red, 8, &[]).unwrap();
        let updated = store
            .update_alert_status(&alert.id, AlertStatus::Contacted, "nurse01", Some("已電話聯繫"))
            .unwrap();
        assert_eq!(updated.status, AlertStatus::Contacted);
        assert_eq!(updated.handled_by.as_deref(), Some("nurse01"));
        assert!(updated.handled_at.is_some());
        assert_eq!(updated.notes, "已電話聯繫");
        assert!(store.pending_alerts().unwrap().is_empty());

        assert!(matches!(
            store.update_alert_status("missing", AlertStatus::Resolved, "admin", None),
            Err(StoreError::AlertNotFound(_))
        ));
    }

    #[test]
    fn interventions_default_type_and_filter() {
        let (_dir, store) = temp_store();
        let first = store
            .save_intervention(
                "P1",
                InterventionDraft {
                    content: "電話關懷，症狀改善".into(),
                    duration: "10分鐘".into(),
                    nurse: "nurse01".into(),
                    ..InterventionDraft::default()
                },
            )
            .unwrap();
        assert_eq!(first.kind, "電話");
        store
            .save_intervention(
                "P2",
                InterventionDraft {
                    kind: Some("門診".into()),
                    ..InterventionDraft::default()
                },
            )
            .unwrap();

        assert_eq!(store.interventions(Some("P1"), 10).unwrap().len(), 1);
        assert_eq!(store.interventions(None, 10).unwrap().len(), 2);
        assert_eq!(store.interventions(None, 1).unwrap().len(), 1);
    }

    #[test]
    fn statistics_count_today_and_pending() {
        let (_dir, store) = temp_store();
        store.get_or_create_patient("P1", None).unwrap();
        store.save_report("P1", draft(8)).unwrap();
        store.create_alert("P1", AlertLevel::Red, 8, &[]).unwrap();
        let yellow = store.create_alert("P1", AlertLevel::Yellow, 5, &[]).unwrap();
        store
            .update_alert_status(&yellow.id, AlertStatus::Resolved, "admin", None)
            .unwrap();

        let stats = store.statistics().unwrap();
        assert_eq!(
            stats,
            Statistics {
                total_patients: 1,
                total_reports: 1,
                today_reports: 1,
                today_alerts: 2,
                pending_alerts: 1,
                red_alerts: 1,
                yellow_alerts: 0,
            }
        );
    }
}
