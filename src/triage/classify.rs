//! Symptom classifier: keyword substring matching over patient text.

use std::collections::BTreeSet;

use crate::models::SymptomTag;

/// Trigger keywords per symptom. Matching is on the lowercased input, so
/// the English entries must be lowercase.
pub fn keywords(tag: SymptomTag) -> &'static [&'static str] {
    match tag {
        SymptomTag::RespiratoryDistress => &[
            "喘", "呼吸", "悶", "吸不到氣", "breath", "wheez",
        ],
        SymptomTag::Pain => &["痛", "疼", "刺", "pain", "hurt", "ache"],
        SymptomTag::Cough => &["咳", "痰", "cough", "phlegm", "sputum"],
        SymptomTag::Fatigue => &[
            "累", "疲", "沒力", "虛弱", "tired", "fatigue", "exhausted", "weak",
        ],
        SymptomTag::SleepIssue => &["睡", "失眠", "sleep", "insomnia"],
        SymptomTag::AppetiteLoss => &["吃", "食", "胃口", "appetite", "eating"],
    }
}

/// Case-normalize once so every matcher sees the same text.
pub(crate) fn normalize(text: &str) -> String {
    text.to_lowercase()
}

pub(crate) fn contains_any(normalized: &str, words: &[&str]) -> bool {
    words.iter().any(|w| normalized.contains(w))
}

/// Whether `tag` is mentioned in already-normalized text.
pub(crate) fn mentions(normalized: &str, tag: SymptomTag) -> bool {
    contains_any(normalized, keywords(tag))
}

/// All symptom tags whose keywords occur in `text`.
///
/// Tags are not exclusive. Empty or unrelated text yields an empty set.
pub fn classify(text: &str) -> BTreeSet<SymptomTag> {
    let normalized = normalize(text);
    SymptomTag::ALL
        .into_iter()
        .filter(|tag| mentions(&normalized, *tag))
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn every_keyword_selects_its_tag() {
        for tag in SymptomTag::ALL {
            for word in keywords(tag) {
                let text = format!("今天{word}了一下");
                assert!(
                    classify(&text).contains(&tag),
                    "keyword {word} should classify as {tag}"
                );
            }
        }
    }

    #[test]
    fn english_keywords_are_lowercase() {
        for tag in SymptomTag::ALL {
            for word in keywords(tag) {
                assert_eq!(*word, word.to_lowercase());
            }
        }
    }

    #[test]
    fn matching_is_case_insensitive() {
        assert!(classify("Sharp PAIN in the chest").contains(&SymptomTag::Pain));
        assert!(classify("Short of Breath").contains(&SymptomTag::RespiratoryDistress));
    }

    #[test]
    fn multiple_tags_from_one_message() {
        let tags = classify("咳嗽有痰，晚上睡不好，而且很累");
        assert_eq!(
            tags,
            BTreeSet::from([SymptomTag::Cough, SymptomTag::Fatigue, SymptomTag::SleepIssue])
        );
    }

    #[test]
    fn empty_and_unrelated_text_yield_nothing() {
        assert!(classify("").is_empty());
        assert!(classify("   ").is_empty());
        assert!(classify("今天天氣晴朗").is_empty());
        assert!(classify("沒有了，結束").is_empty());
    }

    #[test]
    fn pain_with_score_classifies_pain_only() {
        assert_eq!(classify("我很痛，大概8分"), BTreeSet::from([SymptomTag::Pain]));
    }
}
