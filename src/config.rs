//! Run configuration assembled from CLI options and the environment.
use crate::cli::{GlobalArgs, Target};
use crate::runner::Tool;
use anyhow::Result;
use std::env;
use std::path::{Path, PathBuf};

pub const DEFAULT_APP_ID: &str = "com.example.app";
pub const DEFAULT_WEB_URL: &str = "http://localhost:8081";
pub const DEFAULT_TOOL: &str = "maestro";
/// Overrides the external tool command, e.g. `maestro --device emulator-5554`.
pub const TOOL_ENV: &str = "MAESTRO_BRIDGE_TOOL";
pub const TEMPLATE_RELATIVE_PATH: &str = "templates/action.yaml";

/// Everything a single invocation needs, fixed for the run's duration.
#[derive(Debug, Clone)]
pub struct BridgeConfig {
    pub target: Target,
    pub app_id: String,
    pub url: String,
    pub template_path: PathBuf,
    pub tool: Tool,
}

impl BridgeConfig {
    pub fn from_args(args: &GlobalArgs) -> Result<Self> {
        let template_path = match &args.template {
            Some(path) => path.clone(),
            None => default_template_path(),
        };
        let tool = resolve_tool(env::var(TOOL_ENV).ok().as_deref())?;
        tracing::debug!(
            target_env = ?args.target,
            app_id = %args.app_id,
            template = %template_path.display(),
            tool = tool.program(),
            "configuration resolved"
        );
        Ok(Self {
            target: args.target,
            app_id: args.app_id.clone(),
            url: args.url.clone(),
            template_path,
            tool,
        })
    }
}

/// Pick the tool command from an optional override value.
pub fn resolve_tool(raw: Option<&str>) -> Result<Tool> {
    match raw {
        Some(raw) if !raw.trim().is_empty() => Tool::from_command_line(raw),
        _ => Ok(Tool::new(DEFAULT_TOOL)),
    }
}

/// Template beside the running binary, else the one shipped in the source tree.
pub fn default_template_path() -> PathBuf {
    let beside_exe = env::current_exe()
        .ok()
        .and_then(|exe| exe.parent().map(|dir| dir.join(TEMPLATE_RELATIVE_PATH)));
    template_candidate(beside_exe.as_deref())
}

fn template_candidate(beside_exe: Option<&Path>) -> PathBuf {
    if let Some(candidate) = beside_exe.filter(|path| path.is_file()) {
        return candidate.to_path_buf();
    }
    PathBuf::from(env!("CARGO_MANIFEST_DIR")).join(TEMPLATE_RELATIVE_PATH)
}
