use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

use super::{now, today, JsonStore, RegistrationError, StoreError};
use crate::models::{
    NewPatient, Patient, PatientProfile, PatientStatus, RiskStatus, DEFAULT_AGE,
    DEFAULT_DIAGNOSIS, DEFAULT_SURGERY, PENDING_SURGERY,
};

const MIN_PHONE_CHARS: usize = 10;
const MIN_PASSWORD_CHARS: usize = 4;

/// Self-registration form.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct Registration {
    pub name: String,
    pub phone: String,
    pub password: String,
    pub password_confirm: String,
    #[serde(default)]
    pub consent_agreed: bool,
}

impl Registration {
    fn validate(&self) -> Result<(), RegistrationError> {
        if self.name.trim().is_empty() {
            return Err(RegistrationError::MissingName);
        }
        if self.phone.trim().chars().count() < MIN_PHONE_CHARS {
            return Err(RegistrationError::PhoneTooShort(MIN_PHONE_CHARS));
        }
        if self.password.chars().count() < MIN_PASSWORD_CHARS {
            return Err(RegistrationError::PasswordTooShort(MIN_PASSWORD_CHARS));
        }
        if self.password != self.password_confirm {
            return Err(RegistrationError::PasswordMismatch);
        }
        if !self.consent_agreed {
            return Err(RegistrationError::ConsentRequired);
        }
        Ok(())
    }
}

#[derive(Debug, Clone, Serialize)]
pub struct LoginResult {
    pub patient: PatientProfile,
    pub post_op_day: i64,
}

/// Row of the staff patient list.
#[derive(Debug, Clone, Serialize)]
pub struct PatientSummary {
    #[serde(flatten)]
    pub profile: PatientProfile,
    pub risk_status: RiskStatus,
    pub latest_score: Option<u8>,
    pub last_report: Option<chrono::NaiveDateTime>,
    pub total_reports: u32,
}

fn last_chars(s: &str, n: usize) -> String {
    let chars: Vec<char> = s.chars().collect();
    chars[chars.len().saturating_sub(n)..].iter().collect()
}

/// `P` + last four phone digits + registration month and day.
fn registration_id(phone: &str, date: NaiveDate) -> String {
    format!("P{}{}", last_chars(phone, 4), date.format("%m%d"))
}

impl JsonStore {
    pub fn patient(&self, patient_id: &str) -> Result<Option<Patient>, StoreError> {
        self.read(|doc| doc.patients.get(patient_id).cloned())
    }

    /// Existing patient, or a new one filled with defaults and `info`.
    pub fn get_or_create_patient(
        &self,
        patient_id: &str,
        info: Option<NewPatient>,
    ) -> Result<Patient, StoreError> {
        if let Some(existing) = self.patient(patient_id)? {
            return Ok(existing);
        }
        self.write(|doc| {
            let patient = doc
                .patients
                .entry(patient_id.to_string())
                .or_insert_with(|| default_patient(patient_id, info.unwrap_or_default()));
            Ok(patient.clone())
        })
    }

    /// Create an account from the registration form.
    ///
    /// The surgery is left for staff to fill in, so the patient starts in
    /// `pending_setup`.
    pub fn register_patient(&self, form: Registration) -> Result<Patient, StoreError> {
        form.validate()?;
        let phone = form.phone.trim().to_string();
        self.write(|doc| {
            if doc.patients.values().any(|p| p.phone == phone) {
                return Err(RegistrationError::PhoneTaken.into());
            }
            let base = registration_id(&phone, today());
            let mut id = base.clone();
            let mut n = 2;
            while doc.patients.contains_key(&id) {
                id = format!("{base}-{n}");
                n += 1;
            }
            let created = now();
            let patient = Patient {
                id: id.clone(),
                name: form.name.trim().to_string(),
                phone,
                password: Some(form.password),
                age: DEFAULT_AGE,
                surgery: PENDING_SURGERY.to_string(),
                surgery_date: None,
                diagnosis: DEFAULT_DIAGNOSIS.to_string(),
                consent_agreed: true,
                consent_time: Some(created),
                status: PatientStatus::PendingSetup,
                created_at: Some(created),
                last_report: None,
                total_reports: 0,
                compliance_rate: 0.0,
            };
            doc.patients.insert(id, patient.clone());
            tracing::info!(patient_id = %patient.id, "Patient registered");
            Ok(patient)
        })
    }

    /// Plaintext phone + password check.
    pub fn login(&self, phone: &str, password: &str) -> Result<LoginResult, StoreError> {
        let phone = phone.trim();
        let patient = self
            .read(|doc| doc.patients.values().find(|p| p.phone == phone).cloned())?
            .ok_or(StoreError::UnknownAccount)?;
        if patient.password.as_deref() != Some(password) {
            return Err(StoreError::WrongPassword);
        }
        let today = today();
        Ok(LoginResult {
            post_op_day: patient.post_op_day(today),
            patient: patient.profile(today),
        })
    }

    /// Staff completes a registration with the surgery details.
    pub fn setup_surgery(
        &self,
        patient_id: &str,
        surgery: &str,
        surgery_date: NaiveDate,
    ) -> Result<Patient, StoreError> {
        self.write(|doc| {
            let patient = doc
                .patients
                .get_mut(patient_id)
                .ok_or_else(|| StoreError::PatientNotFound(patient_id.to_string()))?;
            if !surgery.trim().is_empty() {
                patient.surgery = surgery.trim().to_string();
            }
            patient.surgery_date = Some(surgery_date);
            patient.status = PatientStatus::Active;
            Ok(patient.clone())
        })
    }

    /// Every patient with a risk status from their latest report.
    pub fn all_patients(&self) -> Result<Vec<PatientSummary>, StoreError> {
        let today = today();
        self.read(|doc| {
            doc.patients
                .values()
                .map(|p| {
                    let latest_score = doc
                        .reports
                        .iter()
                        .filter(|r| r.patient_id == p.id)
                        .max_by_key(|r| r.timestamp)
                        .map(|r| r.overall_score);
                    PatientSummary {
                        profile: p.profile(today),
                        risk_status: RiskStatus::from_latest_score(latest_score),
                        latest_score,
                        last_report: p.last_report,
                        total_reports: p.total_reports,
                    }
                })
                .collect()
        })
    }
}

fn default_patient(patient_id: &str, info: NewPatient) -> Patient {
    let created = now();
    Patient {
        id: patient_id.to_string(),
        name: info
            .name
            .unwrap_or_else(|| format!("病人{}", last_chars(patient_id, 4))),
        phone: info.phone.unwrap_or_default(),
        password: info.password,
        age: info.age.unwrap_or(DEFAULT_AGE),
        surgery: info.surgery.unwrap_or_else(|| DEFAULT_SURGERY.to_string()),
        surgery_date: Some(info.surgery_date.unwrap_or_else(today)),
        diagnosis: info.diagnosis.unwrap_or_else(|| DEFAULT_DIAGNOSIS.to_string()),
        consent_agreed: info.consent_agreed,
        consent_time: info.consent_agreed.then_some(created),
        status: info.status.unwrap_or_default(),
        created_at: Some(created),
        last_report: None,
        total_reports: 0,
        compliance_rate: 0.0,
    }
}
