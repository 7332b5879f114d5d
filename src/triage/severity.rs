//! Severity interpreter: pull a 0-10 score out of free text and bucket it.

use std::sync::LazyLock;

use regex::Regex;
use serde::Serialize;

/// Highest score in the mild tier.
pub const MILD_MAX: u8 = 3;
/// Highest score in the moderate tier.
pub const MODERATE_MAX: u8 = 6;
pub const MAX_SCORE: u8 = 10;

// ASCII or full-width digits, with an optional minus sign directly before.
static SCORE_PATTERN: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"([-－])?([0-9０-９]+)").unwrap());

// A number the patient clearly gave as a rating: "8分", "8/10" or the bare number alone.
static MARKED_SCORE_PATTERN: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"[0-9０-９]+\s*(分|[/／]\s*(10|１０))|^\s*[-－]?[0-9０-９]+\s*$").unwrap()
});

#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum SeverityTier {
    Mild,
    Moderate,
    Severe,
}

impl SeverityTier {
    pub fn from_score(score: u8) -> Self {
        if score <= MILD_MAX {
            Self::Mild
        } else if score <= MODERATE_MAX {
            Self::Moderate
        } else {
            Self::Severe
        }
    }
}

/// First digit run in `text` as a score clamped to `0..=10`.
///
/// Returns `None` when the text has no digits. A run directly preceded by a
/// minus sign counts as 0.
pub fn interpret(text: &str) -> Option<u8> {
    let caps = SCORE_PATTERN.captures(text)?;
    if caps.get(1).is_some() {
        return Some(0);
    }
    let digits = caps.get(2)?.as_str();
    let value = digits
        .chars()
        .filter_map(digit_value)
        .fold(0u32, |acc, d| acc.saturating_mul(10).saturating_add(d));
    Some(value.min(u32::from(MAX_SCORE)) as u8)
}

/// Whether the text carries a number phrased as a rating rather than a date,
/// a day count or similar.
pub fn is_marked(text: &str) -> bool {
    MARKED_SCORE_PATTERN.is_match(text)
}

fn digit_value(c: char) -> Option<u32> {
    match c {
        '0'..='9' => c.to_digit(10),
        '０'..='９' => Some(c as u32 - '０' as u32),
        _ => None,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn in_range_scores_pass_through() {
        for n in 0..=10u8 {
            assert_eq!(interpret(&format!("大概 {n} 分")), Some(n));
        }
    }

    #[test]
    fn ratings_are_told_apart_from_other_numbers() {
        for text in ["8分", "喘到 9 分", "pain 7/10", "７／１０", "5", " -2 ", "我的整體不適程度是 6 分"] {
            assert!(is_marked(text), "{text}");
        }
        for text in ["術後第3天傷口很痛", "2026年1月", "咳了 3 次", "", "很痛"] {
            assert!(!is_marked(text), "{text}");
        }
    }

    #[test]
    fn scores_above_ten_clamp() {
        assert_eq!(interpret("痛到 15 分"), Some(10));
        assert_eq!(interpret("100"), Some(10));
        assert_eq!(interpret("99999999999999999999999"), Some(10));
    }

    #[test]
    fn no_digits_is_absence_not_zero() {
        assert_eq!(interpret(""), None);
        assert_eq!(interpret("還好"), None);
        assert_eq!(interpret("十分"), None);
    }

    #[test]
    fn first_run_wins() {
        assert_eq!(interpret("早上 3 分，現在 8 分"), Some(3));
        assert_eq!(interpret("7-8分"), Some(7));
    }

    #[test]
    fn full_width_digits() {
        assert_eq!(interpret("大概５分"), Some(5));
        assert_eq!(interpret("１２"), Some(10));
    }

    #[test]
    fn negative_numbers_clamp_to_zero() {
        assert_eq!(interpret("-5"), Some(0));
        assert_eq!(interpret("大約－3分"), Some(0));
    }

    #[test]
    fn tier_boundaries_are_inclusive() {
        assert_eq!(SeverityTier::from_score(0), SeverityTier::Mild);
        assert_eq!(SeverityTier::from_score(3), SeverityTier::Mild);
        assert_eq!(SeverityTier::from_score(4), SeverityTier::Moderate);
        assert_eq!(SeverityTier::from_score(6), SeverityTier::Moderate);
        assert_eq!(SeverityTier::from_score(7), SeverityTier::Severe);
        assert_eq!(SeverityTier::from_score(10), SeverityTier::Severe);
    }
}
