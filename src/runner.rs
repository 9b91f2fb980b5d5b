//! Flow execution against the external Maestro CLI.
//!
//! A flow is written to a uniquely named `.yaml` temp file that lives only
//! as long as the run. The file is removed on every return path, including
//! errors and a missing tool.
use anyhow::{anyhow, Context, Result};
use std::io::{self, Write};
use std::path::{Path, PathBuf};
use std::process::{Command, ExitStatus, Output, Stdio};
use std::time::Instant;
use tempfile::TempPath;

/// External tool command: program plus any words that precede subcommands.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Tool {
    program: String,
    prefix_args: Vec<String>,
}

impl Tool {
    pub fn new(program: impl Into<String>) -> Self {
        Self {
            program: program.into(),
            prefix_args: Vec::new(),
        }
    }

    /// Parse a shell-style command line such as `maestro --device x`.
    pub fn from_command_line(raw: &str) -> Result<Self> {
        let mut words = shell_words::split(raw)
            .with_context(|| format!("parse tool command {raw:?}"))?;
        if words.is_empty() {
            return Err(anyhow!("tool command is empty"));
        }
        let program = words.remove(0);
        Ok(Self {
            program,
            prefix_args: words,
        })
    }

    pub fn program(&self) -> &str {
        &self.program
    }

    pub fn prefix_args(&self) -> &[String] {
        &self.prefix_args
    }

    fn locate(&self) -> Option<PathBuf> {
        match which::which(&self.program) {
            Ok(path) => Some(path),
            Err(err) => {
                tracing::debug!(program = %self.program, error = %err, "tool not found");
                None
            }
        }
    }

    fn command(&self, resolved: &Path) -> Command {
        let mut command = Command::new(resolved);
        command.args(self.prefix_args());
        command
    }
}

/// Exit status and captured streams from one tool invocation.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ToolExit {
    pub code: Option<i32>,
    pub stdout: String,
    pub stderr: String,
}

impl ToolExit {
    pub fn success(&self) -> bool {
        self.code == Some(0)
    }

    fn from_output(output: Output) -> Self {
        Self {
            code: output.status.code(),
            stdout: String::from_utf8_lossy(&output.stdout).into_owned(),
            stderr: String::from_utf8_lossy(&output.stderr).into_owned(),
        }
    }

    fn from_status(status: ExitStatus) -> Self {
        Self {
            code: status.code(),
            stdout: String::new(),
            stderr: String::new(),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum RunOutcome {
    Completed(ToolExit),
    ToolMissing { program: String },
}

impl RunOutcome {
    /// Process exit code to relay: the tool's own code, 1 when it died
    /// without one, 127 when it could not be launched.
    pub fn exit_code(&self) -> u8 {
        match self {
            RunOutcome::Completed(exit) => match exit.code {
                Some(code) => u8::try_from(code).unwrap_or(1),
                None => 1,
            },
            RunOutcome::ToolMissing { .. } => 127,
        }
    }
}

/// Result of a flow run. `flow_path` no longer exists once this is returned.
#[derive(Debug, Clone)]
pub struct FlowRun {
    pub flow_path: PathBuf,
    pub outcome: RunOutcome,
}

/// Generated flow persisted to a temp file; deleted on drop.
pub struct FlowFile {
    path: TempPath,
}

impl FlowFile {
    pub fn create(text: &str) -> Result<Self> {
        let mut file = tempfile::Builder::new()
            .prefix("maestro-flow-")
            .suffix(".yaml")
            .tempfile()
            .context("create flow temp file")?;
        file.write_all(text.as_bytes()).context("write flow temp file")?;
        file.flush().context("flush flow temp file")?;
        let path = file.into_temp_path();
        tracing::debug!(path = %path.display(), bytes = text.len(), "flow file written");
        Ok(Self { path })
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Remove the file now. A file already gone counts as removed; other
    /// removal errors are logged and never override the run's outcome.
    pub fn remove(self) -> PathBuf {
        let path = self.path.to_path_buf();
        match self.path.close() {
            Ok(()) => tracing::debug!(path = %path.display(), "flow file removed"),
            Err(err) if err.kind() == io::ErrorKind::NotFound => {
                tracing::debug!(path = %path.display(), "flow file already gone");
            }
            Err(err) => {
                tracing::warn!(path = %path.display(), error = %err, "remove flow file failed");
            }
        }
        path
    }
}

/// Write `text` to a temp flow file and run `maestro test <file> --format json`.
///
/// `announce` is called with the temp path right before the tool starts.
pub fn run_flow<F>(tool: &Tool, text: &str, announce: F) -> Result<FlowRun>
where
    F: FnOnce(&Path),
{
    let flow = FlowFile::create(text)?;
    announce(flow.path());
    let outcome = execute_flow(tool, flow.path())?;
    let flow_path = flow.remove();
    Ok(FlowRun { flow_path, outcome })
}

fn execute_flow(tool: &Tool, flow_path: &Path) -> Result<RunOutcome> {
    let Some(resolved) = tool.locate() else {
        return Ok(missing(tool));
    };
    let mut command = tool.command(&resolved);
    command
        .arg("test")
        .arg(flow_path)
        .args(["--format", "json"])
        .stdin(Stdio::null());

    let start = Instant::now();
    let output = match command.output() {
        Ok(output) => output,
        Err(err) if err.kind() == io::ErrorKind::NotFound => return Ok(missing(tool)),
        Err(err) => {
            return Err(err).with_context(|| format!("run {} test", tool.program()));
        }
    };
    let exit = ToolExit::from_output(output);
    tracing::info!(
        elapsed_ms = start.elapsed().as_millis() as u64,
        exit_code = ?exit.code,
        stdout_bytes = exit.stdout.len(),
        stderr_bytes = exit.stderr.len(),
        "maestro test complete"
    );
    Ok(RunOutcome::Completed(exit))
}

/// Run `maestro hierarchy` directly; no flow file is involved.
///
/// With `capture` unset the tool writes straight to the terminal.
pub fn run_inspect(tool: &Tool, capture: bool) -> Result<RunOutcome> {
    let Some(resolved) = tool.locate() else {
        return Ok(missing(tool));
    };
    let mut command = tool.command(&resolved);
    command.arg("hierarchy");

    let start = Instant::now();
    let result = if capture {
        command.output().map(ToolExit::from_output)
    } else {
        command.status().map(ToolExit::from_status)
    };
    let exit = match result {
        Ok(exit) => exit,
        Err(err) if err.kind() == io::ErrorKind::NotFound => return Ok(missing(tool)),
        Err(err) => {
            return Err(err).with_context(|| format!("run {} hierarchy", tool.program()));
        }
    };
    tracing::info!(
        elapsed_ms = start.elapsed().as_millis() as u64,
        exit_code = ?exit.code,
        captured = capture,
        "maestro hierarchy complete"
    );
    Ok(RunOutcome::Completed(exit))
}

fn missing(tool: &Tool) -> RunOutcome {
    RunOutcome::ToolMissing {
        program: tool.program().to_string(),
    }
}
