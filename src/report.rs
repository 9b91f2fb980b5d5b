//! Console rendering for flow runs, inspections, and dry runs.
//!
//! Human output goes to stdout except launch errors, which go to stderr.
//! JSON output is a single object per invocation.
use crate::runner::{FlowRun, RunOutcome};
use anyhow::{Context, Result};
use serde::Serialize;
use std::path::Path;

pub const SUCCESS_MARK: &str = "✅ Success";
pub const FAILURE_MARK: &str = "❌ Failure";

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum OutputFormat {
    Human,
    Json,
}

impl OutputFormat {
    pub fn from_json_flag(json: bool) -> Self {
        if json {
            OutputFormat::Json
        } else {
            OutputFormat::Human
        }
    }

    /// JSON reports embed tool output, so it has to be captured.
    pub fn captures_inspect(self) -> bool {
        self == OutputFormat::Json
    }
}

#[derive(Serialize, Debug, PartialEq, Eq)]
#[serde(rename_all = "snake_case")]
pub enum ReportStatus {
    Passed,
    Failed,
    ToolMissing,
    DryRun,
}

#[derive(Serialize, Debug)]
pub struct RunReport {
    pub command: String,
    pub status: ReportStatus,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub exit_code: Option<i32>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub flow_path: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub flow: Option<String>,
    pub stdout: String,
    pub stderr: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub message: Option<String>,
}

impl RunReport {
    fn from_outcome(command: &str, outcome: &RunOutcome, flow_path: Option<&Path>) -> Self {
        let flow_path = flow_path.map(|path| path.display().to_string());
        match outcome {
            RunOutcome::Completed(exit) => Self {
                command: command.to_string(),
                status: if exit.success() {
                    ReportStatus::Passed
                } else {
                    ReportStatus::Failed
                },
                exit_code: exit.code,
                flow_path,
                flow: None,
                stdout: exit.stdout.clone(),
                stderr: exit.stderr.clone(),
                message: None,
            },
            RunOutcome::ToolMissing { program } => Self {
                command: command.to_string(),
                status: ReportStatus::ToolMissing,
                exit_code: None,
                flow_path,
                flow: None,
                stdout: String::new(),
                stderr: String::new(),
                message: Some(missing_tool_message(program)),
            },
        }
    }
}

pub fn missing_tool_message(program: &str) -> String {
    format!("Error: '{program}' executable not found. Is it installed and in your PATH?")
}

pub fn flow_started(path: &Path, format: OutputFormat) {
    if format == OutputFormat::Human {
        println!("Executing Maestro Flow ({})...", path.display());
    }
}

pub fn inspect_started(format: OutputFormat) {
    if format == OutputFormat::Human {
        println!("Running hierarchy dump...");
    }
}

pub fn render_flow_run(command: &str, run: &FlowRun, format: OutputFormat) -> Result<()> {
    match format {
        OutputFormat::Human => {
            render_human(&run.outcome, true);
            Ok(())
        }
        OutputFormat::Json => print_json(&RunReport::from_outcome(
            command,
            &run.outcome,
            Some(&run.flow_path),
        )),
    }
}

pub fn render_inspect(outcome: &RunOutcome, format: OutputFormat) -> Result<()> {
    match format {
        OutputFormat::Human => {
            render_human(outcome, false);
            Ok(())
        }
        OutputFormat::Json => print_json(&RunReport::from_outcome("inspect", outcome, None)),
    }
}

pub fn render_dry_run(command: &str, flow: &str, format: OutputFormat) -> Result<()> {
    match format {
        OutputFormat::Human => {
            print!("{flow}");
            Ok(())
        }
        OutputFormat::Json => print_json(&RunReport {
            command: command.to_string(),
            status: ReportStatus::DryRun,
            exit_code: None,
            flow_path: None,
            flow: Some(flow.to_string()),
            stdout: String::new(),
            stderr: String::new(),
            message: None,
        }),
    }
}

fn render_human(outcome: &RunOutcome, relay_output: bool) {
    match outcome {
        RunOutcome::Completed(_) => {
            if let Some(text) = human_stdout(outcome, relay_output) {
                println!("{text}");
            }
        }
        RunOutcome::ToolMissing { program } => eprintln!("{}", missing_tool_message(program)),
    }
}

/// Flow runs relay captured output with a status mark. Inspect output was
/// already streamed and its exit code is relayed, so nothing is added.
fn human_stdout(outcome: &RunOutcome, relay_output: bool) -> Option<String> {
    match outcome {
        RunOutcome::Completed(exit) if relay_output => Some(if exit.success() {
            format!("{SUCCESS_MARK}\n{}", exit.stdout)
        } else {
            format!("{FAILURE_MARK}\n{}", exit.stderr)
        }),
        _ => None,
    }
}

fn print_json<T: Serialize>(value: &T) -> Result<()> {
    let text = serde_json::to_string_pretty(value).context("serialize report")?;
    println!("{text}");
    Ok(())
}
