//! Per-AC coverage computation (spec.md §4.12): mapped vs. blocked
//! primitives, percent covered, and the unmapped-step list.

use waymark_types::Journey;

#[derive(Debug, Clone, PartialEq)]
pub struct AcCoverage {
    pub step_id: u32,
    pub description: String,
    pub total_primitives: usize,
    pub blocked_primitives: usize,
    pub percent_covered: f64,
}

#[derive(Debug, Clone, Default, PartialEq)]
pub struct CoverageReport {
    pub per_ac: Vec<AcCoverage>,
    pub unmapped: Vec<String>,
}

impl CoverageReport {
    #[must_use]
    pub fn overall_percent(&self) -> f64 {
        let total: usize = self.per_ac.iter().map(|ac| ac.total_primitives).sum();
        if total == 0 {
            return 100.0;
        }
        let blocked: usize = self.per_ac.iter().map(|ac| ac.blocked_primitives).sum();
        100.0 * (total - blocked) as f64 / total as f64
    }
}

/// Computes coverage per IR step (one step per AC when the journey was
/// normalized from acceptance criteria, per spec.md §4.8's one-AC-to-one-step
/// mapping).
#[must_use]
pub fn compute_ac_coverage(journey: &Journey) -> CoverageReport {
    let mut per_ac = Vec::new();
    let mut unmapped = Vec::new();

    for step in &journey.steps {
        let all = step.actions.iter().chain(step.assertions.iter());
        let total = step.actions.len() + step.assertions.len();
        let blocked = all.clone().filter(|p| p.is_blocked()).count();

        for primitive in all.filter(|p| p.is_blocked()) {
            if let waymark_types::Primitive::Blocked { source_text, .. } = primitive {
                unmapped.push(source_text.clone());
            }
        }

        let percent_covered = if total == 0 {
            100.0
        } else {
            100.0 * (total - blocked) as f64 / total as f64
        };

        per_ac.push(AcCoverage {
            step_id: step.id.value(),
            description: step.description.clone(),
            total_primitives: total,
            blocked_primitives: blocked,
            percent_covered,
        });
    }

    CoverageReport { per_ac, unmapped }
}
