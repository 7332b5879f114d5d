//! Local rule-based dialogue policy.
//!
//! Rules are an ordered table of `(predicate, handler)` pairs and the first
//! predicate that holds decides the reply. Keyword groups overlap ("還好"
//! next to "痛", a score next to "就這樣"), so the order is part of the
//! contract and is exposed through [`rule_order`].

use std::collections::BTreeSet;

use serde::Serialize;

use super::classify::{self, contains_any};
use super::severity::{self, SeverityTier};
use super::templates;
use crate::models::SymptomTag;

/// Symptoms that get a clarifying question, in the order they are asked about.
const FOLLOW_UP_PRIORITY: [SymptomTag; 4] = [
    SymptomTag::RespiratoryDistress,
    SymptomTag::Pain,
    SymptomTag::Cough,
    SymptomTag::Fatigue,
];

const AFFIRMATION_KEYWORDS: &[&str] = &["不錯", "還好", "好", "正常", "沒事", "很好", "fine", "good"];
/// Negations that would otherwise match an affirmation keyword.
const AFFIRMATION_NEGATIONS: &[&str] = &["不好", "不太好", "not good", "not fine"];
const COMPLETION_KEYWORDS: &[&str] = &[
    "沒有", "沒了", "就這樣", "結束", "完成", "都沒", "done", "finished", "that's all",
];

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum RuleKind {
    SymptomFollowUp,
    Affirmation,
    Severity,
    Completion,
    OpenPrompt,
}

/// What one turn looks like to the rules.
#[derive(Debug, Clone)]
pub struct TurnInput {
    normalized: String,
    pub tags: BTreeSet<SymptomTag>,
    pub score: Option<u8>,
    /// The number was phrased as a rating ("8分", "8/10", a bare "8").
    pub score_marked: bool,
}

impl TurnInput {
    pub fn new(text: &str) -> Self {
        Self {
            normalized: classify::normalize(text),
            tags: classify::classify(text),
            score: severity::interpret(text),
            score_marked: severity::is_marked(text),
        }
    }

    fn follow_up_symptom(&self) -> Option<SymptomTag> {
        FOLLOW_UP_PRIORITY
            .into_iter()
            .find(|tag| self.tags.contains(tag))
    }
}

/// The policy's verdict for one turn.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PolicyDecision {
    pub rule: RuleKind,
    pub reply: String,
    pub escalate: bool,
    pub completed: bool,
    /// Score to fold into the session maximum.
    pub score: Option<u8>,
    pub tier: Option<SeverityTier>,
}

impl PolicyDecision {
    fn reply(rule: RuleKind, reply: impl Into<String>) -> Self {
        Self {
            rule,
            reply: reply.into(),
            escalate: false,
            completed: false,
            score: None,
            tier: None,
        }
    }
}

struct Rule {
    kind: RuleKind,
    applies: fn(&TurnInput) -> bool,
    respond: fn(&TurnInput) -> PolicyDecision,
}

static RULES: [Rule; 5] = [
    Rule {
        kind: RuleKind::SymptomFollowUp,
        applies: |t| !t.score_marked && t.follow_up_symptom().is_some(),
        respond: symptom_follow_up,
    },
    Rule {
        kind: RuleKind::Affirmation,
        applies: |t| {
            contains_any(&t.normalized, AFFIRMATION_KEYWORDS)
                && !contains_any(&t.normalized, AFFIRMATION_NEGATIONS)
        },
        respond: |_| PolicyDecision::reply(RuleKind::Affirmation, templates::CONFIRMATION),
    },
    Rule {
        kind: RuleKind::Severity,
        applies: |t| t.score.is_some(),
        respond: severity_guidance,
    },
    Rule {
        kind: RuleKind::Completion,
        applies: |t| contains_any(&t.normalized, COMPLETION_KEYWORDS),
        respond: |_| PolicyDecision {
            completed: true,
            ..PolicyDecision::reply(RuleKind::Completion, templates::CLOSING)
        },
    },
    Rule {
        kind: RuleKind::OpenPrompt,
        applies: |_| true,
        respond: |_| PolicyDecision::reply(RuleKind::OpenPrompt, templates::OPEN_PROMPT),
    },
];

fn symptom_follow_up(input: &TurnInput) -> PolicyDecision {
    match input
        .follow_up_symptom()
        .and_then(templates::symptom_follow_up)
    {
        Some(question) => PolicyDecision::reply(RuleKind::SymptomFollowUp, question),
        None => PolicyDecision::reply(RuleKind::OpenPrompt, templates::OPEN_PROMPT),
    }
}

fn severity_guidance(input: &TurnInput) -> PolicyDecision {
    let Some(score) = input.score else {
        return PolicyDecision::reply(RuleKind::OpenPrompt, templates::OPEN_PROMPT);
    };
    let tier = SeverityTier::from_score(score);
    let reply = match tier {
        SeverityTier::Severe => templates::severe_guidance(score),
        SeverityTier::Moderate => templates::moderate_guidance(score),
        SeverityTier::Mild => templates::mild_guidance(score),
    };
    PolicyDecision {
        rule: RuleKind::Severity,
        reply,
        escalate: tier == SeverityTier::Severe,
        completed: false,
        score: Some(score),
        tier: Some(tier),
    }
}

/// Priority order the rules are tried in.
pub fn rule_order() -> Vec<RuleKind> {
    RULES.iter().map(|r| r.kind).collect()
}

/// Run the rule table against one turn. Always produces a reply.
pub fn evaluate(input: &TurnInput) -> PolicyDecision {
    RULES
        .iter()
        .find(|rule| (rule.applies)(input))
        .map(|rule| (rule.respond)(input))
        .unwrap_or_else(|| PolicyDecision::reply(RuleKind::OpenPrompt, templates::OPEN_PROMPT))
}
