//! The bounded healing loop (spec.md §4.15, §8 scenario 6).
//!
//! Grounded on the reference workspace's own bounded-iteration shape
//! (`engine::tool_loop`'s `max_tool_iterations_per_user_turn` gate), reduced
//! here to a synchronous loop since healing runs inline within one
//! compilation rather than across an async tool-execution queue.

use waymark_verify::{classify_failure, Classification};

use crate::rules::{FixRule, HealContext, RULES};

/// Outcome of one `verifyFn` invocation (spec.md §4.15): the runner either
/// passed or failed with a raw error message to re-classify.
#[derive(Debug, Clone, PartialEq)]
pub enum VerifyOutcome {
    Passed,
    Failed(String),
}

/// One entry in the per-journey heal log.
#[derive(Debug, Clone, PartialEq)]
pub struct HealAttempt {
    pub attempt_number: u32,
    pub fix_type: &'static str,
    pub description: String,
    pub result: VerifyOutcome,
}

/// Final outcome of a [`heal`] run.
#[derive(Debug, Clone, PartialEq)]
pub struct HealResult {
    pub success: bool,
    pub applied_fix: Option<&'static str>,
    pub attempts: u32,
    pub final_code: String,
    pub log: Vec<HealAttempt>,
    pub recommendation: String,
}

/// Why the loop stopped without success.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum StopReason {
    Exhausted,
    MaxAttempts,
}

/// Runs the bounded rule-based healing loop over `code`, starting from the
/// classification of `initial_failure`. `verify` is called after every
/// mutation and typically spawns the test runner; the loop exits on the
/// first passing verify, once every applicable rule has been attempted, or
/// once `max_attempts` is reached, whichever comes first.
pub fn heal(
    code: &str,
    initial_failure: &str,
    max_attempts: u32,
    skip_patterns: &[String],
    mut verify: impl FnMut(&str) -> VerifyOutcome,
) -> HealResult {
    let mut classification = classify_failure(initial_failure);
    let mut current_code = code.to_string();
    let mut tried: Vec<&'static str> = Vec::new();
    let mut log = Vec::new();
    let mut attempt_number = 0u32;

    let stop_reason = loop {
        if attempt_number >= max_attempts {
            break StopReason::MaxAttempts;
        }

        let Some(rule) = next_applicable_rule(&classification, &tried, skip_patterns) else {
            break StopReason::Exhausted;
        };
        tried.push(rule.name);

        let ctx = HealContext {
            category: classification.category,
            explanation: classification.explanation,
            attempt: attempt_number + 1,
        };
        let fix = (rule.apply)(&current_code, ctx);
        if !fix.applied {
            continue;
        }

        attempt_number += 1;
        current_code = fix.code;
        let outcome = verify(&current_code);
        let passed = matches!(outcome, VerifyOutcome::Passed);

        log.push(HealAttempt {
            attempt_number,
            fix_type: rule.name,
            description: fix.description,
            result: outcome.clone(),
        });

        if passed {
            tracing::info!(fix = rule.name, attempts = attempt_number, "heal loop succeeded");
            return HealResult {
                success: true,
                applied_fix: Some(rule.name),
                attempts: attempt_number,
                final_code: current_code,
                log,
                recommendation: format!("healed via `{}`", rule.name),
            };
        }
        tracing::debug!(fix = rule.name, attempt = attempt_number, "heal attempt did not resolve the failure");

        if let VerifyOutcome::Failed(message) = outcome {
            classification = classify_failure(&message);
        }
    };

    let recommendation = match stop_reason {
        StopReason::Exhausted => final_recommendation(&classification, "no applicable rule remained"),
        StopReason::MaxAttempts => final_recommendation(&classification, "maximum heal attempts reached"),
    };
    tracing::warn!(attempts = attempt_number, reason = ?stop_reason, "heal loop gave up without success");

    HealResult {
        success: false,
        applied_fix: None,
        attempts: attempt_number,
        final_code: current_code,
        log,
        recommendation,
    }
}

fn final_recommendation(classification: &Classification, reason: &str) -> String {
    format!("{reason}; last classification was `{}`: {}", classification.category.as_str(), classification.suggestion)
}

fn next_applicable_rule<'a>(
    classification: &Classification,
    tried: &[&'static str],
    skip_patterns: &[String],
) -> Option<&'a FixRule> {
    RULES
        .iter()
        .find(|rule| {
            (rule.applies)(classification.category)
                && !tried.contains(&rule.name)
                && !skip_patterns.iter().any(|skip| skip == rule.name)
        })
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn heal_selector_failure_succeeds_on_first_verify() {
        let code = "await page.getByRole('button').click();";
        let result = heal(code, "strict mode violation: locator resolved to 2 elements", 3, &[], |_code| {
            VerifyOutcome::Passed
        });

        assert!(result.success);
        assert_eq!(result.applied_fix, Some("selector-refine"));
        assert_eq!(result.attempts, 1);
        assert_eq!(result.log.len(), 1);
        assert!(matches!(result.log[0].result, VerifyOutcome::Passed));
    }

    #[test]
    fn heal_exhausts_rules_when_nothing_fixes_it() {
        let code = "some unrelated line";
        let result = heal(code, "401 unauthorized", 3, &[], |_| VerifyOutcome::Failed("still broken".to_string()));

        assert!(!result.success);
        assert_eq!(result.attempts, 0);
        assert!(result.recommendation.contains("no applicable rule remained"));
    }

    #[test]
    fn heal_stops_at_max_attempts() {
        let code = "await page.goto('https://example.com');";
        let mut calls = 0;
        let result = heal(code, "net::err_connection_refused at navigation", 1, &[], |_| {
            calls += 1;
            VerifyOutcome::Failed("net::err_connection_refused again".to_string())
        });

        assert!(!result.success);
        assert_eq!(calls, 1);
        assert_eq!(result.attempts, 1);
    }

    #[test]
    fn skip_patterns_remove_a_rule_from_consideration() {
        let code = "await page.getByRole('button').click();";
        let skip = vec!["selector-refine".to_string()];
        let result = heal(code, "strict mode violation", 3, &skip, |_| VerifyOutcome::Passed);

        assert!(!result.success);
        assert_eq!(result.attempts, 0);
    }
}
