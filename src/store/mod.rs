//! JSON-file record store: patients, reports, alerts, interventions and
//! handout pushes in one document.
//!
//! The document is loaded once at open and kept behind a mutex. Every
//! mutation is applied to a copy, written to disk, and only then swapped in,
//! so a failed write leaves memory and disk in agreement.

pub mod document;
mod patients;
mod pushes;
mod records;

pub use document::RecordDocument;
pub use patients::{LoginResult, PatientSummary, Registration};
pub use records::Statistics;

use std::path::{Path, PathBuf};
use std::sync::Mutex;

use chrono::{Local, NaiveDate, NaiveDateTime};
use thiserror::Error;

#[derive(Error, Debug)]
pub enum StoreError {
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Serialization error: {0}")]
    Serialization(#[from] serde_json::Error),

    #[error("Patient not found: {0}")]
    PatientNotFound(String),

    #[error("Alert not found: {0}")]
    AlertNotFound(String),

    #[error("Push record not found: {0}")]
    PushNotFound(String),

    #[error("Registration rejected: {0}")]
    Registration(#[from] RegistrationError),

    #[error("No account registered for this phone number")]
    UnknownAccount,

    #[error("Wrong password")]
    WrongPassword,

    #[error("Record store lock poisoned")]
    LockPoisoned,
}

#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum RegistrationError {
    #[error("Name is required")]
    MissingName,

    #[error("Phone number must have at least {0} characters")]
    PhoneTooShort(usize),

    #[error("Password must have at least {0} characters")]
    PasswordTooShort(usize),

    #[error("Passwords do not match")]
    PasswordMismatch,

    #[error("Consent to the terms is required")]
    ConsentRequired,

    #[error("Phone number already registered")]
    PhoneTaken,
}

/// Name recorded for patients without a record.
const UNKNOWN_PATIENT_NAME: &str = "未知";

pub struct JsonStore {
    path: PathBuf,
    doc: Mutex<RecordDocument>,
}

impl JsonStore {
    /// Open (or create) the record file at `path`.
    pub fn open(path: impl Into<PathBuf>) -> Result<Self, StoreError> {
        let path = path.into();
        if let Some(dir) = path.parent().filter(|d| !d.as_os_str().is_empty()) {
            std::fs::create_dir_all(dir)?;
        }
        let doc = document::load_document(&path);
        if !path.exists() {
            document::save_document(&path, &doc)?;
        }
        tracing::info!(
            path = %path.display(),
            patients = doc.patients.len(),
            reports = doc.reports.len(),
            "Record store opened"
        );
        Ok(Self {
            path,
            doc: Mutex::new(doc),
        })
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    fn read<T>(&self, f: impl FnOnce(&RecordDocument) -> T) -> Result<T, StoreError> {
        let guard = self.doc.lock().map_err(|_| StoreError::LockPoisoned)?;
        Ok(f(&guard))
    }

    fn write<T>(
        &self,
        f: impl FnOnce(&mut RecordDocument) -> Result<T, StoreError>,
    ) -> Result<T, StoreError> {
        let mut guard = self.doc.lock().map_err(|_| StoreError::LockPoisoned)?;
        let mut draft = guard.clone();
        let value = f(&mut draft)?;
        document::save_document(&self.path, &draft)?;
        *guard = draft;
        Ok(value)
    }

    /// Copy of the whole document.
    pub fn snapshot(&self) -> Result<RecordDocument, StoreError> {
        self.read(Clone::clone)
    }
}

fn now() -> NaiveDateTime {
    Local::now().naive_local()
}

fn today() -> NaiveDate {
    Local::now().date_naive()
}

fn patient_name(doc: &RecordDocument, patient_id: &str) -> String {
    doc.patients
        .get(patient_id)
        .map(|p| p.name.clone())
        .unwrap_or_else(|| UNKNOWN_PATIENT_NAME.to_string())
}
