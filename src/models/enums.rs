use serde::{Deserialize, Serialize};

use super::ModelError;

/// Macro to generate enum with as_str + std::str::FromStr pattern.
/// The serde representation is the same string as `as_str`.
macro_rules! str_enum {
    ($name:ident { $($variant:ident => $s:literal),+ $(,)? }) => {
        #[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
        pub enum $name {
            $(#[serde(rename = $s)] $variant),+
        }

        impl $name {
            pub fn as_str(&self) -> &'static str {
                match self {
                    $(Self::$variant => $s),+
                }
            }
        }

        impl std::str::FromStr for $name {
            type Err = ModelError;

            fn from_str(s: &str) -> Result<Self, Self::Err> {
                match s {
                    $($s => Ok(Self::$variant)),+,
                    _ => Err(ModelError::InvalidEnum {
                        field: stringify!($name).into(),
                        value: s.into(),
                    }),
                }
            }
        }

        impl std::fmt::Display for $name {
            fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
                f.write_str(self.as_str())
            }
        }
    };
}

pub(crate) use str_enum;

str_enum!(MessageRole {
    User => "user",
    Assistant => "assistant",
});

str_enum!(AlertLevel {
    Red => "red",
    Yellow => "yellow",
});

str_enum!(AlertStatus {
    Pending => "pending",
    Contacted => "contacted",
    Resolved => "resolved",
});

str_enum!(PatientStatus {
    PendingSetup => "pending_setup",
    Active => "active",
});

str_enum!(RiskStatus {
    Alert => "alert",
    Warning => "warning",
    Normal => "normal",
    NoReport => "no_report",
});

str_enum!(ReportStatus {
    Completed => "completed",
});

str_enum!(PushType {
    Manual => "manual",
    Auto => "auto",
});

str_enum!(PushStatus {
    Sent => "sent",
    Read => "read",
});

impl AlertLevel {
    /// Alert level warranted by a 0-10 score, if any.
    pub fn for_score(score: u8) -> Option<Self> {
        if score >= crate::config::ALERT_THRESHOLD_RED {
            Some(Self::Red)
        } else if score >= crate::config::ALERT_THRESHOLD_YELLOW {
            Some(Self::Yellow)
        } else {
            None
        }
    }
}

impl RiskStatus {
    /// Patient list status derived from the latest report score.
    pub fn from_latest_score(score: Option<u8>) -> Self {
        match score.and_then(AlertLevel::for_score) {
            Some(AlertLevel::Red) => Self::Alert,
            Some(AlertLevel::Yellow) => Self::Warning,
            None if score.is_some() => Self::Normal,
            None => Self::NoReport,
        }
    }
}

impl Default for PatientStatus {
    fn default() -> Self {
        Self::Active
    }
}

impl Default for ReportStatus {
    fn default() -> Self {
        Self::Completed
    }
}

impl Default for AlertStatus {
    fn default() -> Self {
        Self::Pending
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::str::FromStr;

    #[test]
    fn alert_status_round_trip() {
        for (variant, s) in [
            (AlertStatus::Pending, "pending"),
            (AlertStatus::Contacted, "contacted"),
            (AlertStatus::Resolved, "resolved"),
        ] {
            assert_eq!(variant.as_str(), s);
            assert_eq!(AlertStatus::from_str(s).unwrap(), variant);
        }
    }

    #[test]
    fn serde_uses_string_form() {
        let json = serde_json::to_string(&PatientStatus::PendingSetup).unwrap();
        assert_eq!(json, "\"pending_setup\"");
        let level: AlertLevel = serde_json::from_str("\"yellow\"").unwrap();
        assert_eq!(level, AlertLevel::Yellow);
    }

    #[test]
    fn alert_level_thresholds() {
        assert_eq!(AlertLevel::for_score(3), None);
        assert_eq!(AlertLevel::for_score(4), Some(AlertLevel::Yellow));
        assert_eq!(AlertLevel::for_score(6), Some(AlertLevel::Yellow));
        assert_eq!(AlertLevel::for_score(7), Some(AlertLevel::Red));
        assert_eq!(AlertLevel::for_score(10), Some(AlertLevel::Red));
    }

    #[test]
    fn risk_status_from_score() {
        assert_eq!(RiskStatus::from_latest_score(None), RiskStatus::NoReport);
        assert_eq!(RiskStatus::from_latest_score(Some(0)), RiskStatus::Normal);
        assert_eq!(RiskStatus::from_latest_score(Some(5)), RiskStatus::Warning);
        assert_eq!(RiskStatus::from_latest_score(Some(8)), RiskStatus::Alert);
    }

    #[test]
    fn invalid_enum_returns_error() {
        assert!(AlertStatus::from_str("done").is_err());
        assert!(MessageRole::from_str("").is_err());
    }
}
