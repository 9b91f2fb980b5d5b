use anyhow::{Context, Result};
use clap::{CommandFactory, Parser};
use std::process::ExitCode;
use tracing_subscriber::EnvFilter;

mod cli;
mod config;
mod flow;
mod report;
mod runner;

use cli::{Command, RootArgs};
use config::BridgeConfig;
use flow::{FlowParams, Template};
use report::OutputFormat;

fn main() -> ExitCode {
    let args = RootArgs::parse();
    init_tracing(args.global.verbose);

    match run(args) {
        Ok(code) => code,
        Err(err) => {
            eprintln!("Error: {err:#}");
            ExitCode::FAILURE
        }
    }
}

fn init_tracing(verbose: bool) {
    let fallback = if verbose { "debug" } else { "warn" };
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(fallback));
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .with_target(false)
        .init();
}

fn run(args: RootArgs) -> Result<ExitCode> {
    let Some(command) = args.command else {
        RootArgs::command().print_help().context("print usage")?;
        println!();
        return Ok(ExitCode::FAILURE);
    };

    let config = BridgeConfig::from_args(&args.global)?;
    let format = OutputFormat::from_json_flag(args.global.json);
    let verb = command.verb();

    match command {
        Command::Inspect => {
            report::inspect_started(format);
            let outcome = runner::run_inspect(&config.tool, format.captures_inspect())?;
            report::render_inspect(&outcome, format)?;
            Ok(ExitCode::from(outcome.exit_code()))
        }
        Command::Tap(action) | Command::Type(action) => {
            let template = Template::load(&config.template_path)?;
            let text = flow::generate_flow(
                &template,
                &FlowParams {
                    command: verb,
                    value: &action.value,
                    target: config.target,
                    app_id: &config.app_id,
                    url: &config.url,
                },
            );

            if args.global.dry_run {
                report::render_dry_run(verb, &text, format)?;
                return Ok(ExitCode::SUCCESS);
            }

            let run = runner::run_flow(&config.tool, &text, |path| {
                report::flow_started(path, format)
            })?;
            report::render_flow_run(verb, &run, format)?;
            Ok(ExitCode::from(run.outcome.exit_code()))
        }
    }
}
