//! The external Playwright process invocation (spec.md §1's explicit
//! Non-goal: "Playwright process invocation"). This is the one place in the
//! workspace that spawns a child process; `waymark-pipeline`'s
//! [`waymark_pipeline::TestRunner`] trait keeps the rest of the core
//! ignorant of how the report was produced.

use std::path::{Path, PathBuf};
use std::process::Command;

use anyhow::Context as _;
use waymark_pipeline::{RunOptions, TestRunner};
use waymark_types::RunnerReport;

/// Shells out to `npx playwright test`, reading the JSON reporter's output
/// back from a temp file. Playwright's own exit code is ignored: a failing
/// suite is a normal, fully-reported outcome, not a process error.
pub struct PlaywrightRunner {
    pub working_dir: PathBuf,
}

impl TestRunner for PlaywrightRunner {
    fn run(&self, spec_path: &Path, options: &RunOptions) -> anyhow::Result<RunnerReport> {
        let report_path = self.working_dir.join(".waymark/last-report.json");
        if let Some(parent) = report_path.parent() {
            std::fs::create_dir_all(parent)
                .with_context(|| format!("creating report directory {}", parent.display()))?;
        }

        let mut command = Command::new("npx");
        command
            .current_dir(&self.working_dir)
            .arg("playwright")
            .arg("test")
            .arg(spec_path)
            .arg("--reporter=json")
            .arg(format!("--timeout={}", options.timeout_ms))
            .arg(format!("--retries={}", options.retries))
            .arg(format!("--repeat-each={}", options.repeat_each));

        if options.headed {
            command.arg("--headed");
        }
        if options.debug {
            command.arg("--debug");
        }
        if let Some(grep) = &options.grep {
            command.arg("--grep").arg(grep);
        }
        if let Some(project) = &options.project {
            command.arg("--project").arg(project);
        }

        let output = command
            .output()
            .with_context(|| "spawning `npx playwright test` (is Node.js on PATH?)".to_string())?;

        let raw = if output.stdout.is_empty() {
            std::fs::read_to_string(&report_path)
                .with_context(|| format!("reading playwright report at {}", report_path.display()))?
        } else {
            String::from_utf8_lossy(&output.stdout).into_owned()
        };

        serde_json::from_str(&raw).context("parsing playwright JSON reporter output")
    }
}
