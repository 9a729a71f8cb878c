//! Pipeline-state file persistence (spec.md §6's "Pipeline-state file").
//!
//! Wraps [`waymark_types::PipelineState`] with disk IO and force-bypass
//! auditing: every transition attempted with `force=true` that the state
//! graph itself would have rejected is logged, matching spec.md §7's "force
//! can bypass pipeline-state gates but never validator or classifier
//! verdicts" and §4.13's "force-bypass is permitted but audited."

use std::path::{Path, PathBuf};
use std::time::{SystemTime, UNIX_EPOCH};

use anyhow::Context as _;
use waymark_types::{PipelineStage, PipelineState};
use waymark_utils::atomic_write::atomic_write;

const DEFAULT_STATE_RELATIVE_PATH: &str = ".waymark/pipeline-state.json";

#[must_use]
pub fn default_state_path(root: &Path) -> PathBuf {
    root.join(DEFAULT_STATE_RELATIVE_PATH)
}

fn now_epoch_secs() -> i64 {
    SystemTime::now()
        .duration_since(UNIX_EPOCH)
        .map(|d| d.as_secs() as i64)
        .unwrap_or(0)
}

/// Reads the pipeline-state file at `path`, or returns a fresh `initial`
/// state if none exists yet.
pub fn load_or_init(path: &Path, command: &str) -> anyhow::Result<PipelineState> {
    if !path.exists() {
        return Ok(PipelineState::new(command, now_epoch_secs()));
    }
    let raw = std::fs::read_to_string(path)
        .with_context(|| format!("reading pipeline state at {}", path.display()))?;
    serde_json::from_str(&raw).with_context(|| format!("parsing pipeline state at {}", path.display()))
}

pub fn save(path: &Path, state: &PipelineState) -> anyhow::Result<()> {
    let bytes = serde_json::to_vec_pretty(state).context("serializing pipeline state")?;
    if let Some(parent) = path.parent() {
        std::fs::create_dir_all(parent)
            .with_context(|| format!("creating pipeline state directory {}", parent.display()))?;
    }
    atomic_write(path, &bytes).with_context(|| format!("writing pipeline state to {}", path.display()))
}

/// Attempts one transition, records `command` as the new `lastCommand`, and
/// persists the result regardless of outcome so the on-disk state always
/// reflects the last attempted command. `force=true` bypassing an illegal
/// transition is logged at `warn` with both the rejected and applied stage.
pub fn transition(
    path: &Path,
    state: &mut PipelineState,
    to: PipelineStage,
    command: &str,
    force: bool,
) -> anyhow::Result<bool> {
    let would_be_legal = state.stage.can_proceed_to(to);
    state.last_command = command.to_string();

    let applied = state.transition(to, now_epoch_secs(), force);
    if applied && force && !would_be_legal {
        tracing::warn!(from = ?state.stage, to = ?to, command, "force-bypassed an illegal pipeline transition");
    }

    save(path, state)?;
    Ok(applied)
}

/// Blocks the pipeline with a reason. Blocking is always legal from any
/// stage (spec.md §4.13), so this never needs `force`.
pub fn block(path: &Path, state: &mut PipelineState, reason: impl Into<String>, command: &str) -> anyhow::Result<()> {
    state.blocked_reason = Some(reason.into());
    transition(path, state, PipelineStage::Blocked, command, false)?;
    Ok(())
}

pub fn record_artifact(path: &Path, state: &mut PipelineState, artifact: impl Into<String>) -> anyhow::Result<()> {
    state.artifacts.push(artifact.into());
    save(path, state)
}

#[cfg(test)]
mod tests {
    use super::*;
    use PipelineStage::{Analyzed, Completed, Initial};

    #[test]
    fn load_or_init_creates_a_fresh_initial_state() {
        let dir = tempfile::tempdir().unwrap();
        let path = default_state_path(dir.path());
        let state = load_or_init(&path, "analyze").unwrap();
        assert_eq!(state.stage, Initial);
    }

    #[test]
    fn legal_transition_persists_to_disk() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("state.json");
        let mut state = PipelineState::new("analyze", 0);

        let applied = transition(&path, &mut state, Analyzed, "analyze", false).unwrap();
        assert!(applied);

        let reloaded = load_or_init(&path, "x").unwrap();
        assert_eq!(reloaded.stage, Analyzed);
    }

    #[test]
    fn illegal_transition_without_force_is_rejected_and_state_unchanged() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("state.json");
        let mut state = PipelineState::new("complete", 0);

        let applied = transition(&path, &mut state, Completed, "complete", false).unwrap();
        assert!(!applied);
        assert_eq!(state.stage, Initial);
    }

    #[test]
    fn forced_illegal_transition_applies_and_is_auditable() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("state.json");
        let mut state = PipelineState::new("complete", 0);

        let applied = transition(&path, &mut state, Completed, "complete --force", true).unwrap();
        assert!(applied);
        assert_eq!(state.stage, Completed);
    }

    #[test]
    fn block_sets_reason_and_is_blocked() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("state.json");
        let mut state = PipelineState::new("verify", 0);

        block(&path, &mut state, "3 unhealable failures", "verify").unwrap();
        assert!(state.is_blocked);
        assert_eq!(state.blocked_reason.as_deref(), Some("3 unhealable failures"));
    }
}
