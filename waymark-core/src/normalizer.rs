//! Parsed journey → IR `Journey` lowering (spec.md §4.8).
//!
//! Acceptance criteria are preferred over procedural steps whenever present
//! (spec.md §4.1's "ACs are the contract, steps are prose"); each bullet or
//! procedural line is compiled independently through the step-mapper
//! waterfall, and anything the waterfall cannot compile becomes a
//! `Primitive::Blocked` rather than dropping the line silently.

use waymark_types::{
    CleanupPolicy, CompletionSignal, CompletionSignalType, DataPolicy, DataStrategy, ElementState,
    Journey, JourneyId, Primitive, Step, StepId, ToastType,
};

use crate::errors::ParseError;
use crate::glossary::Glossary;
use crate::journey_parser::{AcceptanceCriterion, ParsedJourney, ProceduralStep};
use crate::pattern_catalog::PatternRecord;
use crate::step_mapper::{map_step, LlkbLookup};

const COMPLETION_STEP_DESCRIPTION: &str = "Journey completion signals";

/// Lowers a validated [`ParsedJourney`] to the canonical IR.
pub fn normalize_journey(
    parsed: &ParsedJourney,
    glossary: &Glossary,
    records: &[PatternRecord],
    llkb: Option<&dyn LlkbLookup>,
) -> Result<Journey, ParseError> {
    let fm = &parsed.frontmatter;
    let id =
        JourneyId::new(fm.id.clone()).map_err(|_| ParseError::invalid_journey_id(&fm.id))?;

    let data = fm.data.clone().unwrap_or(DataPolicy {
        strategy: DataStrategy::Reuse,
        cleanup: CleanupPolicy::None,
    });

    let mut steps = if parsed.acceptance_criteria.is_empty() {
        compile_procedural_steps(&parsed.procedural_steps, glossary, records, llkb)
    } else {
        compile_acceptance_criteria(&parsed.acceptance_criteria, glossary, records, llkb)
    };

    if !fm.completion.is_empty() {
        steps.push(compile_completion_step(&fm.completion, steps.len() as u32 + 1));
    }

    let prerequisites = fm
        .prerequisites
        .iter()
        .filter_map(|raw| JourneyId::new(raw.clone()).ok())
        .collect();

    Ok(Journey {
        id,
        title: fm.title.clone(),
        tier: fm.tier,
        scope: fm.scope.clone(),
        actor: fm.actor.clone(),
        revision: fm.revision,
        tags: fm.tags.clone(),
        module_dependencies: fm.module_dependencies.clone(),
        data,
        completion: fm.completion.clone(),
        steps,
        setup: Vec::new(),
        cleanup: Vec::new(),
        prerequisites,
        negative_paths: Vec::new(),
        test_data: fm.test_data.clone(),
        visual_regression: fm.visual_regression,
        accessibility: fm.accessibility,
        performance: fm.performance.clone(),
    })
}

fn compile_acceptance_criteria(
    criteria: &[AcceptanceCriterion],
    glossary: &Glossary,
    records: &[PatternRecord],
    llkb: Option<&dyn LlkbLookup>,
) -> Vec<Step> {
    criteria
        .iter()
        .map(|ac| {
            let description = ac
                .title
                .clone()
                .unwrap_or_else(|| format!("AC-{}", ac.number));
            let mut step = Step::new(StepId::new(ac.number), description);
            step.source_text = Some(ac.bullets.join("\n"));
            for bullet in &ac.bullets {
                place_compiled_primitive(&mut step, bullet, glossary, records, llkb);
            }
            step
        })
        .collect()
}

fn compile_procedural_steps(
    procedural_steps: &[ProceduralStep],
    glossary: &Glossary,
    records: &[PatternRecord],
    llkb: Option<&dyn LlkbLookup>,
) -> Vec<Step> {
    procedural_steps
        .iter()
        .map(|ps| {
            let mut step = Step::new(StepId::new(ps.number), ps.text.clone());
            step.source_text = Some(ps.text.clone());
            place_compiled_primitive(&mut step, &ps.text, glossary, records, llkb);
            step
        })
        .collect()
}

fn place_compiled_primitive(
    step: &mut Step,
    source_text: &str,
    glossary: &Glossary,
    records: &[PatternRecord],
    llkb: Option<&dyn LlkbLookup>,
) {
    let result = map_step(source_text, glossary, records, llkb);
    let primitive = result.primitive.unwrap_or_else(|| Primitive::Blocked {
        reason: result
            .message
            .unwrap_or_else(|| "no mapping strategy matched".to_string()),
        source_text: source_text.to_string(),
    });
    if result.is_assertion {
        step.assertions.push(primitive);
    } else {
        step.actions.push(primitive);
    }
}

fn compile_completion_step(signals: &[CompletionSignal], number: u32) -> Step {
    let mut step = Step::new(StepId::new(number), COMPLETION_STEP_DESCRIPTION.to_string());
    for signal in signals {
        step.assertions.push(completion_signal_to_assertion(signal));
    }
    step
}

fn completion_signal_to_assertion(signal: &CompletionSignal) -> Primitive {
    use waymark_types::{LocatorSpec, LocatorStrategy};

    match signal.signal_type {
        CompletionSignalType::Url => Primitive::ExpectUrl {
            pattern: signal.value.clone(),
        },
        CompletionSignalType::Title => Primitive::ExpectTitle {
            title: signal.value.clone(),
        },
        CompletionSignalType::Toast => Primitive::ExpectToast {
            toast_type: infer_toast_type(&signal.value),
            message: Some(signal.value.clone()),
        },
        CompletionSignalType::Element | CompletionSignalType::Text => {
            let locator = LocatorSpec::new(LocatorStrategy::Text, signal.value.clone());
            let hidden = signal
                .options
                .as_ref()
                .is_some_and(|o| o.state == ElementState::Hidden);
            if hidden {
                Primitive::ExpectHidden { locator }
            } else {
                Primitive::ExpectVisible { locator }
            }
        }
        CompletionSignalType::Api => Primitive::WaitForResponse {
            url_pattern: signal.value.clone(),
        },
    }
}

fn infer_toast_type(message: &str) -> ToastType {
    let lower = message.to_ascii_lowercase();
    if lower.contains("error") || lower.contains("fail") {
        ToastType::Error
    } else if lower.contains("warn") {
        ToastType::Warning
    } else if lower.contains("info") {
        ToastType::Info
    } else {
        ToastType::Success
    }
}
