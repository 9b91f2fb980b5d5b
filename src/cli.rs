//! CLI argument parsing for single-step Maestro flows.
//!
//! Global options apply to every subcommand; the subcommand only picks the
//! action and its value.
use clap::{Args, Parser, Subcommand, ValueEnum};
use std::path::PathBuf;

use crate::config::{DEFAULT_APP_ID, DEFAULT_WEB_URL};

/// Root CLI entrypoint.
///
/// `command` stays optional so a bare invocation can print usage and exit 1
/// instead of clap's missing-subcommand error.
#[derive(Parser, Debug)]
#[command(
    name = "maestro-bridge",
    version,
    about = "Maestro Bridge: run one-step Maestro flows from the command line",
    after_help = "Examples:\n  maestro-bridge tap \"Login\"\n  maestro-bridge type \"hello@example.com\" --app-id com.acme.app\n  maestro-bridge --target web --url http://localhost:3000 tap \"Sign in\"\n  maestro-bridge inspect\n\nEnvironment:\n  MAESTRO_BRIDGE_TOOL  Command used in place of `maestro` (shell words)\n  RUST_LOG             Log filter for diagnostics on stderr"
)]
pub struct RootArgs {
    #[command(flatten)]
    pub global: GlobalArgs,

    #[command(subcommand)]
    pub command: Option<Command>,
}

/// Options shared by all subcommands.
#[derive(Args, Debug, Clone)]
pub struct GlobalArgs {
    /// Target environment
    #[arg(long, value_enum, default_value = "native", global = true)]
    pub target: Target,

    /// Android package or iOS bundle ID
    #[arg(long, value_name = "ID", default_value = DEFAULT_APP_ID, global = true)]
    pub app_id: String,

    /// URL for web target
    #[arg(long, value_name = "URL", default_value = DEFAULT_WEB_URL, global = true)]
    pub url: String,

    /// Flow template (defaults to templates/action.yaml beside the binary)
    #[arg(long, value_name = "PATH", global = true)]
    pub template: Option<PathBuf>,

    /// Print the generated flow instead of running it
    #[arg(long, global = true)]
    pub dry_run: bool,

    /// Emit a machine-readable JSON report
    #[arg(long, global = true)]
    pub json: bool,

    /// Enable debug diagnostics on stderr
    #[arg(short, long, global = true)]
    pub verbose: bool,
}

#[derive(Subcommand, Debug)]
pub enum Command {
    /// Tap on an element (text or ID)
    Tap(ActionArgs),
    /// Input text
    Type(ActionArgs),
    /// Dump UI hierarchy
    Inspect,
}

impl Command {
    /// Verb handed to the flow generator.
    pub fn verb(&self) -> &'static str {
        match self {
            Command::Tap(_) => "tap",
            Command::Type(_) => "type",
            Command::Inspect => "inspect",
        }
    }
}

#[derive(Args, Debug)]
pub struct ActionArgs {
    /// Text or ID the action applies to
    pub value: String,
}

/// Execution environment for the flow.
#[derive(ValueEnum, Clone, Copy, Debug, PartialEq, Eq)]
pub enum Target {
    Native,
    Web,
}

#[cfg(test)]
mod tests {
    use super::*;
    use clap::CommandFactory;

    #[test]
    fn cli_definition_is_consistent() {
        RootArgs::command().debug_assert();
    }

    #[test]
    fn defaults_apply_without_options() {
        let args = RootArgs::try_parse_from(["maestro-bridge", "tap", "Login"]).expect("parse");
        assert_eq!(args.global.target, Target::Native);
        assert_eq!(args.global.app_id, DEFAULT_APP_ID);
        assert_eq!(args.global.url, DEFAULT_WEB_URL);
        match args.command {
            Some(Command::Tap(action)) => assert_eq!(action.value, "Login"),
            other => panic!("unexpected command {other:?}"),
        }
    }

    #[test]
    fn global_options_are_accepted_after_subcommand() {
        let args = RootArgs::try_parse_from([
            "maestro-bridge",
            "type",
            "hello",
            "--target",
            "web",
            "--url",
            "http://127.0.0.1:3000",
        ])
        .expect("parse");
        assert_eq!(args.global.target, Target::Web);
        assert_eq!(args.global.url, "http://127.0.0.1:3000");
        assert_eq!(args.command.map(|c| c.verb()), Some("type"));
    }

    #[test]
    fn action_requires_value() {
        assert!(RootArgs::try_parse_from(["maestro-bridge", "tap"]).is_err());
    }

    #[test]
    fn unknown_target_is_rejected() {
        assert!(
            RootArgs::try_parse_from(["maestro-bridge", "--target", "desktop", "inspect"])
                .is_err()
        );
    }

    #[test]
    fn subcommand_is_optional() {
        let args = RootArgs::try_parse_from(["maestro-bridge"]).expect("parse");
        assert!(args.command.is_none());
    }
}
