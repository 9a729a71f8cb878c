//! Bounded rule-based healing loop: classify, mutate, re-verify (spec.md
//! §4.15).

pub mod engine;
pub mod errors;
pub mod log;
pub mod rules;

pub use engine::{heal, HealAttempt, HealResult, VerifyOutcome};
pub use errors::HealError;
pub use log::HealLog;
pub use rules::{FixRule, HealContext, RULES};
