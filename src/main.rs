use clap::{CommandFactory, Parser};
use std::io::IsTerminal;
use std::path::Path;
use std::process::ExitCode;

mod cli;
mod error;
mod paths;
mod process;
mod progress;
mod properties;
mod workflow;

use cli::RootArgs;
use error::TarchiaError;
use process::SystemRunner;
use progress::ConsoleProgress;
use workflow::{Step, Workflow, WorkflowContext};

fn main() -> ExitCode {
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new("warn")),
        )
        .with_writer(std::io::stderr)
        .init();

    if std::env::args_os().len() < 2 {
        let _ = RootArgs::command().print_help();
        return ExitCode::SUCCESS;
    }

    let args = RootArgs::parse();
    match run(&args) {
        Ok(message) => {
            eprintln!("{message}");
            ExitCode::SUCCESS
        }
        Err(err) => {
            eprintln!("{}", err.report(std::io::stderr().is_terminal()));
            exit_code(err.exit_code())
        }
    }
}

fn run(args: &RootArgs) -> Result<String, TarchiaError> {
    let start_dir = std::env::current_dir()
        .map_err(|err| TarchiaError::io(err, "read current directory", Path::new(".")))?;
    let ctx = WorkflowContext::from_args(args)?;
    let mut runner = SystemRunner;
    let mut progress = ConsoleProgress::new(Step::ALL.len());
    let report = Workflow::new(&ctx, &mut runner, &mut progress, start_dir).run()?;
    tracing::info!(
        tag = %report.tag,
        instance_built = report.instance_built,
        steps = report.steps.len(),
        "pipeline finished"
    );
    Ok(report.success_message())
}

fn exit_code(code: i32) -> ExitCode {
    // Exit statuses outside 1..=255 cannot be forwarded as-is.
    match u8::try_from(code) {
        Ok(code) if code != 0 => ExitCode::from(code),
        _ => ExitCode::FAILURE,
    }
}
