//! Rule-based symptom triage: classify, score, pick a reply, flag escalation.

pub mod classify;
pub mod engine;
pub mod policy;
pub mod session;
pub mod severity;
pub mod templates;

pub use classify::classify;
pub use engine::{RemoteOutcome, ReplySource, TriageEngine, TurnOutcome};
pub use policy::{rule_order, RuleKind};
pub use session::SessionRecord;
pub use severity::{interpret, SeverityTier};
