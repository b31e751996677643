//! Error taxonomy for a pipeline run and the single place that turns an
//! error into an exit code plus a user-facing message.
use crate::process::ProcessFailure;
use std::io;
use std::path::{Path, PathBuf};

pub const ISSUES_URL: &str = "https://github.com/jairmedeiros/tarchia/issues/new";

#[derive(Debug, thiserror::Error)]
pub enum TarchiaError {
    /// A path, file, or executable the run depends on does not exist.
    #[error("{0}")]
    NotFound(String),

    /// A required property is absent or empty.
    #[error("missing value for `{key}` in {}", .path.display())]
    MissingKey { path: PathBuf, key: String },

    #[error("{0}")]
    ProcessFailure(Box<ProcessFailure>),

    #[error(transparent)]
    Unclassified(#[from] anyhow::Error),
}

pub type Result<T, E = TarchiaError> = std::result::Result<T, E>;

impl TarchiaError {
    pub fn not_found(message: impl Into<String>) -> Self {
        Self::NotFound(message.into())
    }

    /// Classify an I/O error raised while touching `path`.
    pub fn io(err: io::Error, action: &str, path: &Path) -> Self {
        if err.kind() == io::ErrorKind::NotFound {
            return Self::NotFound(format!("{action} {}: {err}", path.display()));
        }
        let context = format!("{action} {}", path.display());
        Self::Unclassified(anyhow::Error::new(err).context(context))
    }

    pub fn exit_code(&self) -> i32 {
        match self {
            Self::NotFound(_) | Self::MissingKey { .. } => 1,
            Self::ProcessFailure(failure) => match failure.code {
                Some(code) if code != 0 => code,
                _ => 1,
            },
            Self::Unclassified(_) => 2,
        }
    }

    /// Render the message printed before exiting. `styled` enables ANSI bold.
    pub fn report(&self, styled: bool) -> String {
        let label = bold("error:", styled);
        match self {
            Self::NotFound(_) | Self::MissingKey { .. } => format!("\n{label} {self}"),
            Self::ProcessFailure(failure) => {
                if failure.is_stale_dependency_cache() {
                    format!(
                        "\n{label} gradlew update file wasn't found, maybe dependencies are missing or there is an update since last ant all.\n\nPlease try to run again."
                    )
                } else {
                    bug_report(failure, styled)
                }
            }
            Self::Unclassified(err) => format!(
                "\n{label} unknown error, please create an issue in: {ISSUES_URL}.\n\n{err:#}"
            ),
        }
    }
}

impl From<ProcessFailure> for TarchiaError {
    fn from(failure: ProcessFailure) -> Self {
        Self::ProcessFailure(Box::new(failure))
    }
}

fn bug_report(failure: &ProcessFailure, styled: bool) -> String {
    let command = failure.command_line();
    let mut trace = failure.diagnostic_output().to_string();
    if !trace.ends_with('\n') {
        trace.push('\n');
    }
    format!(
        "\n{} unknown error, please create an issue with the follow pattern in: {ISSUES_URL}.\n\n{}\nCalledProcessError during {command}\n\n{}\n#### cmd\n{command}\n\n#### stacktrace\n```\n{trace}```",
        bold("error:", styled),
        bold("[Title]", styled),
        bold("[Description]", styled),
    )
}

fn bold(text: &str, styled: bool) -> String {
    if styled {
        format!("\x1b[1m{text}\x1b[0m")
    } else {
        text.to_string()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn failure(program: &str, args: &[&str], code: Option<i32>, stderr: &str) -> ProcessFailure {
        ProcessFailure {
            program: program.to_string(),
            args: args.iter().map(|arg| arg.to_string()).collect(),
            code,
            stdout: String::new(),
            stderr: stderr.to_string(),
        }
    }

    #[test]
    fn lookup_errors_exit_with_one_and_raw_message() {
        let err = TarchiaError::not_found("no modules segment in /tmp/app");
        assert_eq!(err.exit_code(), 1);
        assert_eq!(err.report(false), "\nerror: no modules segment in /tmp/app");

        let err = TarchiaError::MissingKey {
            path: PathBuf::from("/repo/app.server.me.properties"),
            key: "app.server.parent.dir".to_string(),
        };
        assert_eq!(err.exit_code(), 1);
        assert!(err.report(false).contains("app.server.parent.dir"));
    }

    #[test]
    fn process_failure_forwards_exit_code() {
        let err = TarchiaError::from(failure(
            "git",
            &["fetch", "upstream", "master"],
            Some(128),
            "",
        ));
        assert_eq!(err.exit_code(), 128);
    }

    #[test]
    fn process_failure_without_code_exits_with_one() {
        let err = TarchiaError::from(failure("ant", &["all", "-S"], None, ""));
        assert_eq!(err.exit_code(), 1);
    }

    #[test]
    fn stale_gradle_cache_gets_targeted_diagnostic() {
        let err = TarchiaError::from(failure(
            "gradlew",
            &["build"],
            Some(1),
            "Exception in thread \"main\" java.io.FileNotFoundException: /home/u/.gradle/x.zip",
        ));
        let message = err.report(false);
        assert!(message.contains("gradlew update file wasn't found"));
        assert!(!message.contains("[Title]"));
    }

    #[test]
    fn other_failures_get_bug_report_template() {
        let err = TarchiaError::from(failure(
            "git",
            &["checkout", "7.4.3.81-ga81"],
            Some(1),
            "error: pathspec '7.4.3.81-ga81' did not match",
        ));
        let message = err.report(false);
        assert!(message.contains(ISSUES_URL));
        assert!(message.contains("CalledProcessError during git checkout 7.4.3.81-ga81"));
        assert!(message.contains("#### cmd\ngit checkout 7.4.3.81-ga81"));
        assert!(message.contains("did not match\n```"));
    }

    #[test]
    fn file_not_found_outside_gradlew_is_generic() {
        let err = TarchiaError::from(failure(
            "ant",
            &["all", "-S"],
            Some(1),
            "java.io.FileNotFoundException: build.xml",
        ));
        assert!(err.report(false).contains("[Title]"));
    }

    #[test]
    fn unclassified_exits_with_two() {
        let err = TarchiaError::from(anyhow::anyhow!("disk on fire"));
        assert_eq!(err.exit_code(), 2);
        assert!(err.report(false).contains("disk on fire"));
    }

    #[test]
    fn styled_report_uses_bold_labels() {
        let err = TarchiaError::not_found("gone");
        assert!(err.report(true).starts_with("\n\x1b[1merror:\x1b[0m gone"));
    }

    #[test]
    fn io_not_found_maps_to_not_found() {
        let err = TarchiaError::io(
            io::Error::new(io::ErrorKind::NotFound, "missing"),
            "read",
            Path::new("/x"),
        );
        assert!(matches!(err, TarchiaError::NotFound(_)));
        let err = TarchiaError::io(
            io::Error::new(io::ErrorKind::PermissionDenied, "denied"),
            "remove",
            Path::new("/x"),
        );
        assert_eq!(err.exit_code(), 2);
    }
}
