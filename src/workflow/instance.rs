//! The bundled Liferay instance: its home directory and the ant build.
use crate::error::{Result, TarchiaError};
use crate::process::{CommandRunner, CommandSpec};
use std::fs;
use std::path::Path;

pub const PROFILE_SETUP_TASK: [&str; 2] = ["setup-profile-dxp", "-S"];
pub const FULL_BUILD_TASK: [&str; 2] = ["all", "-S"];

/// Remove everything in `home` except the entry named `preserve`. Returns
/// how many entries were removed.
pub fn clean_home_dir(home: &Path, preserve: &str) -> Result<usize> {
    let entries = fs::read_dir(home).map_err(|err| TarchiaError::io(err, "read", home))?;
    let mut removed = 0;
    for entry in entries {
        let entry = entry.map_err(|err| TarchiaError::io(err, "read", home))?;
        let path = entry.path();
        if entry.file_name() == preserve {
            tracing::debug!(path = %path.display(), "preserved");
            continue;
        }
        // Symlinks are removed as links; their targets are left alone.
        let file_type = entry
            .file_type()
            .map_err(|err| TarchiaError::io(err, "inspect", &path))?;
        if file_type.is_dir() {
            fs::remove_dir_all(&path).map_err(|err| TarchiaError::io(err, "remove", &path))?;
        } else {
            fs::remove_file(&path).map_err(|err| TarchiaError::io(err, "remove", &path))?;
        }
        removed += 1;
    }
    tracing::info!(home = %home.display(), removed, "instance home cleaned");
    Ok(removed)
}

/// Run the ant profile setup (unless disabled) and the full build.
pub fn build_instance(
    runner: &mut dyn CommandRunner,
    repo_root: &Path,
    setup_profile: bool,
) -> Result<()> {
    if setup_profile {
        runner.run_checked(&CommandSpec::new("ant", PROFILE_SETUP_TASK, repo_root))?;
    }
    runner.run_checked(&CommandSpec::new("ant", FULL_BUILD_TASK, repo_root))?;
    Ok(())
}
