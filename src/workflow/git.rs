//! Git operations run against the Liferay checkout.
use crate::error::Result;
use crate::paths::INSTANCE_PROPERTIES_FILE;
use crate::process::{CommandRunner, CommandSpec};
use std::path::Path;

pub const MAINLINE: &str = "master";

fn git<const N: usize>(args: [&str; N], cwd: &Path) -> CommandSpec {
    CommandSpec::new("git", args, cwd)
}

/// Bring the checkout up to date with `origin/master` and drop every
/// untracked or ignored file except the developer's instance properties.
pub fn clean_master_repo(
    runner: &mut dyn CommandRunner,
    cwd: &Path,
    origin: &str,
    ignore_master_reset: bool,
) -> Result<()> {
    let remote_mainline = format!("{origin}/{MAINLINE}");
    if !ignore_master_reset {
        let switched = runner.run(&git(["checkout", MAINLINE], cwd))?;
        if !switched.success() {
            tracing::debug!(stderr = %switched.stderr.trim(), "creating local {MAINLINE} branch");
            runner.run_checked(&git(["checkout", "-b", MAINLINE], cwd))?;
        }
    }

    runner.run_checked(&git(["fetch", origin, MAINLINE], cwd))?;

    if ignore_master_reset {
        runner.run_checked(&git(["rebase", remote_mainline.as_str()], cwd))?;
    } else {
        runner.run_checked(&git(["reset", "--hard", remote_mainline.as_str()], cwd))?;
    }

    runner.run_checked(&git(["clean", ".", "-dfx", "-e", INSTANCE_PROPERTIES_FILE], cwd))?;
    Ok(())
}

/// Fetch only `tag` from `origin` and detach onto it.
pub fn checkout_tag(
    runner: &mut dyn CommandRunner,
    cwd: &Path,
    origin: &str,
    tag: &str,
) -> Result<()> {
    runner.run_checked(&git(["fetch", origin, "tag", tag, "--no-tags"], cwd))?;
    runner.run_checked(&git(["checkout", tag], cwd))?;
    Ok(())
}

pub fn checkout_previous(runner: &mut dyn CommandRunner, cwd: &Path) -> Result<()> {
    runner.run_checked(&git(["checkout", "-"], cwd))?;
    Ok(())
}

/// Discard working tree changes under `cwd` and forget the local tag.
pub fn restore(runner: &mut dyn CommandRunner, cwd: &Path, tag: &str) -> Result<()> {
    runner.run_checked(&git(["restore", "."], cwd))?;
    runner.run_checked(&git(["tag", "-d", tag], cwd))?;
    Ok(())
}
