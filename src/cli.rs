//! CLI argument parsing.
//!
//! The CLI only gathers inputs; every decision about what to run lives in
//! the workflow module.
use clap::Parser;
use std::path::PathBuf;

pub const DEFAULT_ORIGIN: &str = "upstream";
pub const ORIGIN_ENV: &str = "TARCHIA_ORIGIN";

#[derive(Parser, Debug)]
#[command(
    name = "tarchia",
    version,
    about = "Rebuild a Liferay instance at a release tag and build a Site Initializer against it",
    after_help = "Examples:\n  tarchia build modules/custom/my-site-initializer -t 7.4.3.81-ga81\n  tarchia deploy ~/liferay-portal/modules/apps/acme-site-initializer -t 7.4.3.81-ga81 -o origin --no-dxp"
)]
pub struct RootArgs {
    /// Gradle task used to build the Site Initializer project
    pub command: String,

    /// Site Initializer project module path
    pub module: PathBuf,

    /// Ignore prompts during execution
    #[arg(short, long)]
    pub force: bool,

    /// Ignore master reset process (rebase the current branch instead)
    #[arg(short, long)]
    pub ignore: bool,

    /// Git remote to fetch master and the tag from [env: TARCHIA_ORIGIN] [default: upstream]
    #[arg(short, long, value_name = "REMOTE")]
    pub origin: Option<String>,

    /// Liferay release tag (eg. 7.4.3.81-ga81)
    #[arg(short, long)]
    pub tag: String,

    /// Disable DXP profile setup before building the Liferay instance
    #[arg(long)]
    pub no_dxp: bool,
}

impl RootArgs {
    pub fn resolved_origin(&self) -> String {
        resolve_origin(self.origin.as_deref(), std::env::var(ORIGIN_ENV).ok())
    }
}

/// Explicit flag > environment > default.
pub fn resolve_origin(explicit: Option<&str>, from_env: Option<String>) -> String {
    explicit
        .map(str::to_string)
        .or(from_env.filter(|value| !value.trim().is_empty()))
        .unwrap_or_else(|| DEFAULT_ORIGIN.to_string())
}
