//! Pipeline state machine shape, persisted between CLI invocations.

use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum PipelineStage {
    Initial,
    Analyzed,
    Planned,
    Tested,
    Refining,
    Completed,
    Blocked,
}

impl PipelineStage {
    /// `canProceedTo(from, to)` — true iff `to` is `from`'s successor in the
    /// state graph, plus `Blocked` absorbing from any state (spec.md §4.13,
    /// §8 invariant).
    #[must_use]
    pub fn can_proceed_to(self, to: PipelineStage) -> bool {
        use PipelineStage::{Analyzed, Blocked, Completed, Initial, Planned, Refining, Tested};

        if to == Blocked {
            return true;
        }

        matches!(
            (self, to),
            (Initial, Analyzed)
                | (Analyzed, Planned)
                | (Planned, Tested)
                | (Tested, Refining)
                | (Tested, Completed)
                | (Refining, Tested)
        )
    }
}

/// `{stage, isBlocked, blockedReason?, lastCommand, lastUpdated, artifacts}`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PipelineState {
    pub stage: PipelineStage,
    #[serde(default)]
    pub is_blocked: bool,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub blocked_reason: Option<String>,
    pub last_command: String,
    /// Unix epoch seconds.
    pub last_updated: i64,
    #[serde(default)]
    pub artifacts: Vec<String>,
}

impl PipelineState {
    #[must_use]
    pub fn new(last_command: impl Into<String>, now: i64) -> Self {
        Self {
            stage: PipelineStage::Initial,
            is_blocked: false,
            blocked_reason: None,
            last_command: last_command.into(),
            last_updated: now,
            artifacts: Vec::new(),
        }
    }

    /// Attempt a transition, returning `false` (state unchanged) if illegal.
    /// `force` bypasses the gate but is always audited by the caller.
    #[must_use]
    pub fn transition(&mut self, to: PipelineStage, now: i64, force: bool) -> bool {
        if !force && !self.stage.can_proceed_to(to) {
            return false;
        }
        self.stage = to;
        self.is_blocked = to == PipelineStage::Blocked;
        self.last_updated = now;
        true
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use PipelineStage::{Analyzed, Blocked, Completed, Initial, Planned, Refining, Tested};

    #[test]
    fn initial_can_only_proceed_to_analyzed_or_blocked() {
        assert!(Initial.can_proceed_to(Analyzed));
        assert!(Initial.can_proceed_to(Blocked));
        assert!(!Initial.can_proceed_to(Tested));
        assert!(!Initial.can_proceed_to(Completed));
    }

    #[test]
    fn tested_can_branch_to_refining_or_completed() {
        assert!(Tested.can_proceed_to(Refining));
        assert!(Tested.can_proceed_to(Completed));
        assert!(!Tested.can_proceed_to(Planned));
    }

    #[test]
    fn refining_returns_to_tested_or_blocked_only() {
        assert!(Refining.can_proceed_to(Tested));
        assert!(Refining.can_proceed_to(Blocked));
        assert!(!Refining.can_proceed_to(Completed));
    }

    #[test]
    fn blocked_is_absorbing_from_any_state() {
        for stage in [Initial, Analyzed, Planned, Tested, Refining, Completed] {
            assert!(stage.can_proceed_to(Blocked));
        }
    }

    #[test]
    fn illegal_transition_is_rejected_without_force() {
        let mut state = PipelineState::new("compile", 0);
        assert!(!state.transition(Completed, 1, false));
        assert_eq!(state.stage, Initial);
    }

    #[test]
    fn force_bypasses_gate() {
        let mut state = PipelineState::new("compile", 0);
        assert!(state.transition(Completed, 1, true));
        assert_eq!(state.stage, Completed);
    }
}
