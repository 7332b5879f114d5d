//! On-disk layout of the record file and its load/save helpers.

use std::collections::BTreeMap;
use std::io::Write;
use std::path::Path;

use serde::{Deserialize, Serialize};

use super::StoreError;
use crate::models::{Alert, Intervention, MaterialPush, Patient, SymptomReport};

/// The whole record file. Missing keys load as empty so older files work.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct RecordDocument {
    #[serde(default)]
    pub patients: BTreeMap<String, Patient>,
    #[serde(default)]
    pub reports: Vec<SymptomReport>,
    #[serde(default)]
    pub alerts: Vec<Alert>,
    #[serde(default)]
    pub interventions: Vec<Intervention>,
    #[serde(default)]
    pub pushes: Vec<MaterialPush>,
}

/// Read the record file.
///
/// A missing file is an empty document. An unreadable or corrupt file is
/// also treated as empty (with a warning) so intake keeps working.
pub fn load_document(path: &Path) -> RecordDocument {
    let raw = match std::fs::read_to_string(path) {
        Ok(raw) => raw,
        Err(e) if e.kind() == std::io::ErrorKind::NotFound => return RecordDocument::default(),
        Err(e) => {
            tracing::warn!(path = %path.display(), error = %e, "Cannot read record file, starting empty");
            return RecordDocument::default();
        }
    };
    if raw.trim().is_empty() {
        return RecordDocument::default();
    }
    serde_json::from_str(&raw).unwrap_or_else(|e| {
        tracing::warn!(path = %path.display(), error = %e, "Corrupt record file, starting empty");
        RecordDocument::default()
    })
}

/// Write the record file through a temp file in the same directory, then
/// rename it over the target.
pub fn save_document(path: &Path, doc: &RecordDocument) -> Result<(), StoreError> {
    let dir = match path.parent() {
        Some(dir) if !dir.as_os_str().is_empty() => dir,
        _ => Path::new("."),
    };
    std::fs::create_dir_all(dir)?;

    let json = serde_json::to_string_pretty(doc)?;
    let mut tmp = tempfile::NamedTempFile::new_in(dir)?;
    tmp.write_all(json.as_bytes())?;
    tmp.as_file().sync_all()?;
    tmp.persist(path).map_err(|e| StoreError::Io(e.error))?;
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn missing_file_is_empty() {
        let dir = tempfile::tempdir().unwrap();
        let doc = load_document(&dir.path().join("none.json"));
        assert_eq!(doc, RecordDocument::default());
    }

    #[test]
    fn corrupt_file_is_empty() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("records.json");
        std::fs::write(&path, "{ not json").unwrap();
        assert_eq!(load_document(&path), RecordDocument::default());
    }

    #[test]
    fn legacy_file_without_pushes_loads() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("records.json");
        std::fs::write(
            &path,
            r#"{"patients": {}, "reports": [], "alerts": [], "interventions": []}"#,
        )
        .unwrap();
        let doc = load_document(&path);
        assert!(doc.pushes.is_empty());
    }

    #[test]
    fn save_creates_parent_and_keeps_utf8() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("nested").join("records.json");
        save_document(&path, &RecordDocument::default()).unwrap();
        let raw = std::fs::read_to_string(&path).unwrap();
        assert!(raw.contains("\"patients\""));
        assert_eq!(load_document(&path), RecordDocument::default());

        let leftovers: Vec<_> = std::fs::read_dir(path.parent().unwrap())
            .unwrap()
            .filter_map(|e| e.ok())
            .filter(|e| e.path() != path)
            .collect();
        assert!(leftovers.is_empty(), "temp file should be renamed away");
    }
}
