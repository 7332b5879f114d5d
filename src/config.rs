//! Application constants and the startup-resolved runtime configuration.
//!
//! `AppConfig` is built once in `run()` from the process environment and then
//! handed to the store, the engine and the API. Nothing reads environment
//! variables while a request is being handled.

use std::net::SocketAddr;
use std::path::PathBuf;

/// Application-level constants
pub const APP_NAME: &str = "AICareLung";
pub const APP_VERSION: &str = env!("CARGO_PKG_VERSION");

pub const SYSTEM_NAME: &str = "AI-CARE Lung";
pub const HOSPITAL_NAME: &str = "三軍總醫院";
pub const DEPARTMENT_NAME: &str = "數位醫學中心";

/// Red alert threshold (score ≥ 7).
pub const ALERT_THRESHOLD_RED: u8 = 7;
/// Yellow alert threshold (score ≥ 4).
pub const ALERT_THRESHOLD_YELLOW: u8 = 4;

pub const DEFAULT_MODEL: &str = "gpt-4o-mini";
pub const DEFAULT_LLM_BASE_URL: &str = "https://api.openai.com/v1";
/// Upper bound for the remote completion call. Longer waits count as failure.
pub const DEFAULT_LLM_TIMEOUT_SECS: u64 = 10;
/// Number of prior messages sent to the remote model.
pub const HISTORY_WINDOW: usize = 16;
/// Longest patient message accepted by the API.
pub const MAX_MESSAGE_CHARS: usize = 2000;

pub const DEFAULT_BIND_ADDR: &str = "127.0.0.1:8501";
const DEFAULT_STAFF_CREDENTIALS: &str = "admin:aicare2024,nurse01:nurse2024,nurse02:nurse2024";

/// Get the application data directory
/// ~/AICareLung/ on all platforms
pub fn app_data_dir() -> PathBuf {
    dirs::home_dir()
        .unwrap_or_else(std::env::temp_dir)
        .join(APP_NAME)
}

/// Default location of the JSON record file.
pub fn default_data_file() -> PathBuf {
    app_data_dir().join("data").join("patient_records.json")
}

/// Log filter used when `RUST_LOG` is not set.
pub fn default_log_filter() -> &'static str {
    if cfg!(debug_assertions) {
        "info,aicare_lung_lib=debug"
    } else {
        "info"
    }
}

/// A staff login (plaintext, compared by equality).
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct StaffCredential {
    pub username: String,
    pub password: String,
}

/// Runtime configuration resolved at startup.
#[derive(Debug, Clone)]
pub struct AppConfig {
    pub openai_api_key: String,
    pub model: String,
    pub llm_base_url: String,
    pub llm_timeout_secs: u64,
    pub data_file: PathBuf,
    pub bind_addr: SocketAddr,
    pub staff_credentials: Vec<StaffCredential>,
}

impl Default for AppConfig {
    fn default() -> Self {
        Self {
            openai_api_key: String::new(),
            model: DEFAULT_MODEL.to_string(),
            llm_base_url: DEFAULT_LLM_BASE_URL.to_string(),
            llm_timeout_secs: DEFAULT_LLM_TIMEOUT_SECS,
            data_file: default_data_file(),
            bind_addr: default_bind_addr(),
            staff_credentials: parse_staff_credentials(DEFAULT_STAFF_CREDENTIALS),
        }
    }
}

impl AppConfig {
    /// Resolve the configuration from the process environment.
    pub fn from_env() -> Self {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    /// Resolve the configuration from an arbitrary key lookup.
    ///
    /// Empty values count as unset. Unparseable values fall back to the
    /// default and are logged.
    pub fn from_lookup<F>(lookup: F) -> Self
    where
        F: Fn(&str) -> Option<String>,
    {
        let get = |key: &str| {
            lookup(key)
                .map(|v| v.trim().to_string())
                .filter(|v| !v.is_empty())
        };
        let defaults = Self::default();

        let llm_timeout_secs = match get("AICARE_LLM_TIMEOUT_SECS") {
            Some(raw) => match raw.parse::<u64>() {
                Ok(secs) => secs.clamp(1, DEFAULT_LLM_TIMEOUT_SECS),
                Err(_) => {
                    tracing::warn!(value = %raw, "Invalid AICARE_LLM_TIMEOUT_SECS, using default");
                    defaults.llm_timeout_secs
                }
            },
            None => defaults.llm_timeout_secs,
        };

        let bind_addr = match get("AICARE_BIND_ADDR") {
            Some(raw) => raw.parse::<SocketAddr>().unwrap_or_else(|_| {
                tracing::warn!(value = %raw, "Invalid AICARE_BIND_ADDR, using default");
                defaults.bind_addr
            }),
            None => defaults.bind_addr,
        };

        let staff_credentials = get("AICARE_STAFF_CREDENTIALS")
            .map(|raw| parse_staff_credentials(&raw))
            .filter(|creds| !creds.is_empty())
            .unwrap_or(defaults.staff_credentials);

        Self {
            openai_api_key: get("OPENAI_API_KEY").unwrap_or_default(),
            model: get("AICARE_MODEL").unwrap_or(defaults.model),
            llm_base_url: get("AICARE_LLM_BASE_URL").unwrap_or(defaults.llm_base_url),
            llm_timeout_secs,
            data_file: get("AICARE_DATA_FILE")
                .map(PathBuf::from)
                .unwrap_or(defaults.data_file),
            bind_addr,
            staff_credentials,
        }
    }

    /// Whether the remote generative collaborator should be attempted.
    pub fn use_external_model(&self) -> bool {
        !self.openai_api_key.is_empty()
    }

    /// Plaintext equality check against the configured staff logins.
    pub fn check_staff(&self, username: &str, password: &str) -> bool {
        self.staff_credentials
            .iter()
            .any(|c| c.username == username && c.password == password)
    }
}

fn default_bind_addr() -> SocketAddr {
    SocketAddr::from(([127, 0, 0, 1], 8501))
}

/// Parse `user:pass,user:pass`. Malformed entries are skipped.
pub fn parse_staff_credentials(raw: &str) -> Vec<StaffCredential> {
    raw.split(',')
        .filter_map(|entry| {
            let (user, pass) = entry.trim().split_once(':')?;
            if user.is_empty() || pass.is_empty() {
                return None;
            }
            Some(StaffCredential {
                username: user.to_string(),
                password: pass.to_string(),
            })
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashMap;

    fn lookup(pairs: &[(&str, &str)]) -> impl Fn(&str) -> Option<String> {
        let map: HashMap<String, String> = pairs
            .iter()
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect();
        move |key| map.get(key).cloned()
    }

    #[test]
    fn app_data_dir_ends_with_app_name() {
        assert!(app_data_dir().ends_with(APP_NAME));
    }

    #[test]
    fn default_data_file_under_app_data() {
        let file = default_data_file();
        assert!(file.starts_with(app_data_dir()));
        assert!(file.ends_with("patient_records.json"));
    }

    #[test]
    fn defaults_without_environment() {
        let config = AppConfig::from_lookup(lookup(&[]));
        assert_eq!(config.model, DEFAULT_MODEL);
        assert_eq!(config.llm_timeout_secs, DEFAULT_LLM_TIMEOUT_SECS);
        assert_eq!(config.bind_addr.to_string(), DEFAULT_BIND_ADDR);
        assert!(!config.use_external_model());
        assert_eq!(config.staff_credentials.len(), 3);
    }

    #[test]
    fn api_key_enables_external_model() {
        let config = AppConfig::from_lookup(lookup(&[("OPENAI_API_KEY", "sk-test")]));
        assert!(config.use_external_model());
    }

    #[test]
    fn blank_api_key_counts_as_unset() {
        let config = AppConfig::from_lookup(lookup(&[("OPENAI_API_KEY", "   ")]));
        assert!(!config.use_external_model());
    }

    #[test]
    fn timeout_is_clamped_to_ten_seconds() {
        let config = AppConfig::from_lookup(lookup(&[("AICARE_LLM_TIMEOUT_SECS", "60")]));
        assert_eq!(config.llm_timeout_secs, 10);
        let config = AppConfig::from_lookup(lookup(&[("AICARE_LLM_TIMEOUT_SECS", "0")]));
        assert_eq!(config.llm_timeout_secs, 1);
    }

    #[test]
    fn invalid_values_fall_back() {
        let config = AppConfig::from_lookup(lookup(&[
            ("AICARE_LLM_TIMEOUT_SECS", "soon"),
            ("AICARE_BIND_ADDR", "not-an-addr"),
        ]));
        assert_eq!(config.llm_timeout_secs, DEFAULT_LLM_TIMEOUT_SECS);
        assert_eq!(config.bind_addr.to_string(), DEFAULT_BIND_ADDR);
    }

    #[test]
    fn data_file_override() {
        let config = AppConfig::from_lookup(lookup(&[("AICARE_DATA_FILE", "/tmp/x.json")]));
        assert_eq!(config.data_file, PathBuf::from("/tmp/x.json"));
    }

    #[test]
    fn staff_credentials_parse_and_check() {
        let creds = parse_staff_credentials("alice:pw1, bob:pw2,broken,:nouser");
        assert_eq!(creds.len(), 2);
        let config = AppConfig {
            staff_credentials: creds,
            ..AppConfig::default()
        };
        assert!(config.check_staff("alice", "pw1"));
        assert!(!config.check_staff("alice", "pw2"));
        assert!(!config.check_staff("carol", "pw1"));
    }
}
