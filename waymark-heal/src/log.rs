//! Per-journey heal log persistence (spec.md §4.15): every heal attempt,
//! appended then rewritten whole-file atomically, mirroring the LLKB
//! store's write path (`waymark_llkb::store`).

use serde::{Deserialize, Serialize};
use waymark_utils::atomic_write::atomic_write;

use crate::engine::{HealAttempt, HealResult, VerifyOutcome};
use crate::errors::HealError;

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
struct HealLogAttempt {
    attempt_number: u32,
    fix_type: String,
    description: String,
    result: String,
    evidence: Option<String>,
}

/// `{journeyId, attempts, success, appliedFix, recommendation}` (spec.md §4.15
/// "attempt number, fix type, duration, result, evidence pointers, and a
/// final recommendation").
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct HealLog {
    pub journey_id: String,
    pub success: bool,
    pub applied_fix: Option<String>,
    pub recommendation: String,
    attempts: Vec<HealLogAttempt>,
}

impl HealLog {
    #[must_use]
    pub fn from_result(journey_id: impl Into<String>, result: &HealResult) -> Self {
        Self {
            journey_id: journey_id.into(),
            success: result.success,
            applied_fix: result.applied_fix.map(ToString::to_string),
            recommendation: result.recommendation.clone(),
            attempts: result.log.iter().map(attempt_to_entry).collect(),
        }
    }

    pub fn write(&self, path: impl AsRef<std::path::Path>) -> Result<(), HealError> {
        let path = path.as_ref();
        let bytes = serde_json::to_vec_pretty(self)
            .map_err(|e| HealError::log_io(path.display().to_string(), e.to_string()))?;
        atomic_write(path, &bytes).map_err(|e| HealError::log_io(path.display().to_string(), e.to_string()))
    }
}

fn attempt_to_entry(attempt: &HealAttempt) -> HealLogAttempt {
    let (result, evidence) = match &attempt.result {
        VerifyOutcome::Passed => ("pass".to_string(), None),
        VerifyOutcome::Failed(message) => ("fail".to_string(), Some(message.clone())),
    };
    HealLogAttempt {
        attempt_number: attempt.attempt_number,
        fix_type: attempt.fix_type.to_string(),
        description: attempt.description.clone(),
        result,
        evidence,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::engine::heal;

    #[test]
    fn successful_heal_writes_a_log_with_one_pass_attempt() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("heal-log.json");

        let code = "await page.getByRole('button').click();";
        let result = heal(code, "strict mode violation: locator resolved to 2 elements", 3, &[], |_| {
            VerifyOutcome::Passed
        });

        let log = HealLog::from_result("JRN-0001", &result);
        log.write(&path).unwrap();

        let raw = std::fs::read_to_string(&path).unwrap();
        let parsed: HealLog = serde_json::from_str(&raw).unwrap();
        assert!(parsed.success);
        assert_eq!(parsed.attempts.len(), 1);
        assert_eq!(parsed.attempts[0].result, "pass");
    }
}
