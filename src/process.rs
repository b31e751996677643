//! Synchronous invocation of external tools (git, ant, gradlew).
//!
//! Every call goes through [`CommandRunner`] so the pipeline can be driven by
//! a fake that records invocations instead of spawning processes.
use crate::error::{Result, TarchiaError};
use regex::Regex;
use std::fmt;
use std::io;
use std::path::{Path, PathBuf};
use std::process::Command;
use std::sync::OnceLock;
use std::time::Instant;

const BUILD_WRAPPER_MARKER: &str = "gradlew";

/// One external command: program, arguments, and the directory it runs in.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CommandSpec {
    pub program: String,
    pub args: Vec<String>,
    pub cwd: PathBuf,
}

impl CommandSpec {
    pub fn new<I, S>(program: impl Into<String>, args: I, cwd: &Path) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        Self {
            program: program.into(),
            args: args.into_iter().map(Into::into).collect(),
            cwd: cwd.to_path_buf(),
        }
    }

    pub fn command_line(&self) -> String {
        join_command_line(&self.program, &self.args)
    }
}

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct CommandOutput {
    /// `None` when the process was terminated by a signal.
    pub code: Option<i32>,
    pub stdout: String,
    pub stderr: String,
}

impl CommandOutput {
    pub fn success(&self) -> bool {
        self.code == Some(0)
    }
}

pub trait CommandRunner {
    /// Run `cmd` to completion and capture its output. Only failure to
    /// launch is an error here; a non-zero exit is reported in the output.
    fn run(&mut self, cmd: &CommandSpec) -> Result<CommandOutput>;

    /// Run `cmd` and turn a non-zero exit into [`TarchiaError::ProcessFailure`].
    fn run_checked(&mut self, cmd: &CommandSpec) -> Result<CommandOutput> {
        let output = self.run(cmd)?;
        if output.success() {
            return Ok(output);
        }
        Err(ProcessFailure::from_output(cmd, output).into())
    }
}

/// Spawns real processes. No timeout: a hung tool blocks the run.
#[derive(Debug, Default)]
pub struct SystemRunner;

impl CommandRunner for SystemRunner {
    fn run(&mut self, cmd: &CommandSpec) -> Result<CommandOutput> {
        let start = Instant::now();
        let output = match Command::new(&cmd.program)
            .args(&cmd.args)
            .current_dir(&cmd.cwd)
            .output()
        {
            Ok(output) => output,
            Err(err) if err.kind() == io::ErrorKind::NotFound => {
                return Err(TarchiaError::not_found(format!(
                    "`{}` could not be started from {}: {err}",
                    cmd.program,
                    cmd.cwd.display()
                )));
            }
            Err(err) => {
                return Err(anyhow::Error::new(err)
                    .context(format!("spawn {}", cmd.command_line()))
                    .into());
            }
        };
        let elapsed_ms = start.elapsed().as_millis();

        tracing::info!(
            command = %cmd.command_line(),
            elapsed_ms,
            exit_code = output.status.code(),
            stdout_bytes = output.stdout.len(),
            stderr_bytes = output.stderr.len(),
            "command complete"
        );

        Ok(CommandOutput {
            code: output.status.code(),
            stdout: String::from_utf8_lossy(&output.stdout).into_owned(),
            stderr: String::from_utf8_lossy(&output.stderr).into_owned(),
        })
    }
}

/// A command that exited non-zero, with everything needed to report it.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ProcessFailure {
    pub program: String,
    pub args: Vec<String>,
    pub code: Option<i32>,
    pub stdout: String,
    pub stderr: String,
}

impl ProcessFailure {
    pub fn from_output(cmd: &CommandSpec, output: CommandOutput) -> Self {
        Self {
            program: cmd.program.clone(),
            args: cmd.args.clone(),
            code: output.code,
            stdout: output.stdout,
            stderr: output.stderr,
        }
    }

    pub fn command_line(&self) -> String {
        join_command_line(&self.program, &self.args)
    }

    /// Gradle wrapper failed because a cached distribution or dependency
    /// file is gone; rerunning after `ant all` usually fixes it.
    pub fn is_stale_dependency_cache(&self) -> bool {
        self.command_line().contains(BUILD_WRAPPER_MARKER)
            && file_not_found_pattern().is_match(&self.stderr)
    }

    /// Text to embed in a bug report: stderr, or stdout when stderr is empty.
    pub fn diagnostic_output(&self) -> &str {
        if self.stderr.trim().is_empty() {
            &self.stdout
        } else {
            &self.stderr
        }
    }
}

impl fmt::Display for ProcessFailure {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self.code {
            Some(code) => write!(f, "`{}` exited with status {code}", self.command_line()),
            None => write!(f, "`{}` was terminated by a signal", self.command_line()),
        }
    }
}

fn file_not_found_pattern() -> &'static Regex {
    static PATTERN: OnceLock<Regex> = OnceLock::new();
    PATTERN.get_or_init(|| {
        Regex::new(r"java\.io\.FileNotFoundException")
            .expect("regex for java FileNotFoundException")
    })
}

fn join_command_line(program: &str, args: &[String]) -> String {
    shell_words::join(std::iter::once(program).chain(args.iter().map(String::as_str)))
}
