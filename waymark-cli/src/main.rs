//! Thin CLI dispatcher over `waymark-pipeline` (spec.md §1's explicit
//! Non-goal: "the thin CLI subcommand dispatcher, argument parsing, and
//! pretty-printing"). No compiler logic lives here — every subcommand is a
//! few lines of glue around a `waymark-pipeline` call.

mod runner;

use std::path::PathBuf;

use anyhow::Context as _;
use clap::{Parser, Subcommand};
use tracing_subscriber::EnvFilter;
use waymark_pipeline::{
    block, compile_journey, default_state_path, detect_variant, load_or_init, record_artifact,
    should_fail_on_flaky, transition, verify as run_verify, RunOptions, WaymarkContext,
};
use waymark_types::PipelineStage;

use crate::runner::PlaywrightRunner;

#[derive(Parser)]
#[command(name = "waymark", about = "Compile and run Journey-driven Playwright tests")]
struct Cli {
    /// Project root; defaults to the current directory.
    #[arg(long, global = true, default_value = ".")]
    root: PathBuf,

    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand)]
enum Command {
    /// Parse and normalize a Journey file into its IR, reporting blocked
    /// steps and warnings. Advances pipeline state to `analyzed`.
    Analyze {
        journey: PathBuf,
    },
    /// Compile a Journey into a test spec and page-object module, run the
    /// forbidden-pattern/tag/coverage validators, and write both files to
    /// disk. Advances pipeline state to `planned`.
    Plan {
        journey: PathBuf,
        #[arg(long, default_value = "playwright 1.48.0")]
        runner_variant: String,
        #[arg(long, default_value = "../src/modules")]
        module_import_base: String,
    },
    /// Runs the generated spec through Playwright and summarizes the
    /// result. Advances pipeline state to `tested` (clean) or `refining`
    /// (failures present).
    Test {
        spec: PathBuf,
        #[arg(long, default_value_t = 30_000)]
        timeout_ms: u64,
        #[arg(long, default_value_t = 0)]
        retries: u32,
        #[arg(long)]
        headed: bool,
        #[arg(long)]
        fail_on_flaky: bool,
    },
    /// Runs the bounded healing loop against a spec that's currently
    /// failing, re-verifying after every mutation via Playwright.
    Heal {
        spec: PathBuf,
        #[arg(long)]
        failure_message: String,
        #[arg(long, default_value_t = 3)]
        max_attempts: u32,
    },
    /// Prints the on-disk pipeline state as JSON.
    Status,
}

fn init_tracing() {
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"));
    tracing_subscriber::fmt().with_env_filter(filter).with_writer(std::io::stderr).init();
}

fn main() -> anyhow::Result<()> {
    init_tracing();
    let cli = Cli::parse();

    match cli.command {
        Command::Analyze { journey } => cmd_analyze(&cli.root, &journey),
        Command::Plan { journey, runner_variant, module_import_base } => {
            cmd_plan(&cli.root, &journey, &runner_variant, &module_import_base)
        }
        Command::Test { spec, timeout_ms, retries, headed, fail_on_flaky } => {
            cmd_test(&cli.root, &spec, timeout_ms, retries, headed, fail_on_flaky)
        }
        Command::Heal { spec, failure_message, max_attempts } => {
            cmd_heal(&cli.root, &spec, &failure_message, max_attempts)
        }
        Command::Status => cmd_status(&cli.root),
    }
}

fn cmd_analyze(root: &PathBuf, journey_path: &PathBuf) -> anyhow::Result<()> {
    let ctx = WaymarkContext::load(root).context("loading waymark config")?;
    let parsed = waymark_core::parse(journey_path).context("parsing journey")?;
    let llkb: Option<&dyn waymark_core::step_mapper::LlkbLookup> =
        ctx.llkb().map(|store| store as &dyn waymark_core::step_mapper::LlkbLookup);
    let journey =
        waymark_core::normalize_journey(&parsed, ctx.glossary(), ctx.pattern_records(), llkb)
            .context("normalizing journey")?;

    let blocked = journey.steps.iter().flat_map(|s| s.actions.iter().chain(&s.assertions)).filter(|p| p.is_blocked()).count();
    println!(
        "{} {} — {} steps, {} blocked, tags: {}",
        journey.id.as_str(),
        journey.title,
        journey.steps.len(),
        blocked,
        journey.tags.join(", ")
    );

    let state_path = default_state_path(root);
    let mut state = load_or_init(&state_path, "analyze")?;
    transition(&state_path, &mut state, PipelineStage::Analyzed, "analyze", false)?;
    Ok(())
}

fn cmd_plan(
    root: &PathBuf,
    journey_path: &PathBuf,
    runner_variant: &str,
    module_import_base: &str,
) -> anyhow::Result<()> {
    let ctx = WaymarkContext::load(root).context("loading waymark config")?;
    let variant = detect_variant(runner_variant);
    let compiled = compile_journey(&ctx, journey_path, &variant, module_import_base)?;

    let tests_dir = root.join(&ctx.config().paths.tests);
    let modules_dir = root.join(&ctx.config().paths.modules);
    std::fs::create_dir_all(&tests_dir).context("creating tests directory")?;
    std::fs::create_dir_all(&modules_dir).context("creating modules directory")?;

    let stem = compiled.journey.id.as_str().to_lowercase();
    let test_path = tests_dir.join(format!("{stem}.spec.ts"));
    let module_path = modules_dir.join(format!("{stem}.page.ts"));
    std::fs::write(&test_path, &compiled.test_file.content)
        .with_context(|| format!("writing {}", test_path.display()))?;
    std::fs::write(&module_path, &compiled.module_file.content)
        .with_context(|| format!("writing {}", module_path.display()))?;

    for warning in compiled.test_file.warnings.iter().chain(&compiled.module_file.warnings) {
        tracing::warn!("{warning}");
    }

    println!(
        "wrote {} and {} ({} forbidden issues, {} tag issues, {:.0}% AC coverage)",
        test_path.display(),
        module_path.display(),
        compiled.validation.forbidden.len(),
        compiled.validation.tags.len(),
        compiled.validation.coverage.overall_percent()
    );

    let state_path = default_state_path(root);
    let mut state = load_or_init(&state_path, "plan")?;
    transition(&state_path, &mut state, PipelineStage::Planned, "plan", false)?;
    record_artifact(&state_path, &mut state, test_path.display().to_string())?;
    record_artifact(&state_path, &mut state, module_path.display().to_string())?;

    if compiled.validation.has_errors() {
        anyhow::bail!("validation found {} error-severity issue(s)", compiled.validation.errors().len());
    }
    Ok(())
}

fn cmd_test(
    root: &PathBuf,
    spec: &PathBuf,
    timeout_ms: u64,
    retries: u32,
    headed: bool,
    fail_on_flaky: bool,
) -> anyhow::Result<()> {
    let options = RunOptions { timeout_ms, retries, headed, fail_on_flaky, ..RunOptions::default() };
    let playwright = PlaywrightRunner { working_dir: root.clone() };
    let summary = run_verify(&playwright, spec, &options)?;

    println!(
        "{:?}: {} passed, {} failed, {} flaky (of {})",
        summary.status, summary.passed, summary.failed, summary.flaky, summary.total
    );
    for failed in &summary.failed_tests {
        println!(
            "  FAIL {} [{:?}] {}",
            failed.title_path.join(" > "),
            failed.classification.category,
            failed.classification.explanation
        );
    }

    let state_path = default_state_path(root);
    let mut state = load_or_init(&state_path, "test")?;
    let next = if summary.failed == 0 && !should_fail_on_flaky(&summary, &options) {
        PipelineStage::Completed
    } else {
        PipelineStage::Refining
    };
    transition(&state_path, &mut state, PipelineStage::Tested, "test", false)?;
    transition(&state_path, &mut state, next, "test", false)?;

    if summary.failed > 0 || should_fail_on_flaky(&summary, &options) {
        anyhow::bail!("{} test(s) failed", summary.failed.max(summary.flaky));
    }
    Ok(())
}

fn cmd_heal(root: &PathBuf, spec: &PathBuf, failure_message: &str, max_attempts: u32) -> anyhow::Result<()> {
    let config = waymark_config::load_config(root).context("loading waymark config")?;
    if !config.heal.enabled {
        anyhow::bail!("healing is disabled in waymark config");
    }

    let code = std::fs::read_to_string(spec).with_context(|| format!("reading {}", spec.display()))?;
    let playwright = PlaywrightRunner { working_dir: root.clone() };

    let result = waymark_heal::heal(&code, failure_message, max_attempts.min(config.heal.max_suggestions), &config.heal.skip_patterns, |candidate| {
        if let Err(e) = std::fs::write(spec, candidate) {
            return waymark_heal::VerifyOutcome::Failed(format!("failed to write candidate: {e}"));
        }
        let summary = run_verify(&playwright, spec, &RunOptions::default());
        match summary {
            Ok(summary) if summary.failed == 0 => waymark_heal::VerifyOutcome::Passed,
            Ok(summary) => waymark_heal::VerifyOutcome::Failed(
                summary.failed_tests.first().map(|t| t.classification.explanation.to_string()).unwrap_or_default(),
            ),
            Err(e) => waymark_heal::VerifyOutcome::Failed(e.to_string()),
        }
    });

    std::fs::write(spec, &result.final_code).with_context(|| format!("writing healed {}", spec.display()))?;

    let journey_id = spec.file_stem().and_then(|s| s.to_str()).unwrap_or("unknown").to_string();
    let heal_log_path = root.join(".waymark/heal-log.json");
    if let Some(parent) = heal_log_path.parent() {
        std::fs::create_dir_all(parent)?;
    }
    waymark_heal::HealLog::from_result(journey_id, &result)
        .write(&heal_log_path)
        .with_context(|| format!("writing heal log to {}", heal_log_path.display()))?;

    let state_path = default_state_path(root);
    let mut state = load_or_init(&state_path, "heal")?;
    if result.success {
        println!("healed after {} attempt(s) via {:?}", result.attempts, result.applied_fix);
        transition(&state_path, &mut state, PipelineStage::Tested, "heal", false)?;
    } else {
        println!("heal did not recover: {}", result.recommendation);
        block(&state_path, &mut state, result.recommendation.clone(), "heal")?;
    }
    Ok(())
}

fn cmd_status(root: &PathBuf) -> anyhow::Result<()> {
    let state_path = default_state_path(root);
    let state = load_or_init(&state_path, "status")?;
    println!("{}", serde_json::to_string_pretty(&state)?);
    Ok(())
}
