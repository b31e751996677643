//! Site Initializer module build.
use crate::error::{Result, TarchiaError};
use crate::paths::{locate_build_tool, site_initializer_resources};
use crate::process::{CommandRunner, CommandSpec};
use std::fs;
use std::io;
use std::path::{Path, PathBuf};

/// File name fragments of generated sample data that must not ship.
pub const SAMPLE_DATA_MARKERS: [&str; 2] = ["account", "user"];

/// Delete sample account/user files from the module's site initializer
/// resources. Hidden files and directories are left in place.
pub fn strip_sample_data(module_dir: &Path) -> Result<Vec<PathBuf>> {
    let resources = site_initializer_resources(module_dir);
    let entries = match fs::read_dir(&resources) {
        Ok(entries) => entries,
        Err(err) if err.kind() == io::ErrorKind::NotFound => {
            tracing::debug!(path = %resources.display(), "no site initializer resources");
            return Ok(Vec::new());
        }
        Err(err) => return Err(TarchiaError::io(err, "read", &resources)),
    };

    let mut removed = Vec::new();
    for entry in entries {
        let entry = entry.map_err(|err| TarchiaError::io(err, "read", &resources))?;
        let name = entry.file_name();
        let name = name.to_string_lossy();
        if name.starts_with('.') || !SAMPLE_DATA_MARKERS.iter().any(|m| name.contains(m)) {
            continue;
        }
        let path = entry.path();
        if path.is_dir() {
            tracing::debug!(path = %path.display(), "skipping sample data directory");
            continue;
        }
        match fs::remove_file(&path) {
            Ok(()) => removed.push(path),
            Err(err) if err.kind() == io::ErrorKind::NotFound => {}
            Err(err) => return Err(TarchiaError::io(err, "remove", &path)),
        }
    }
    removed.sort();
    tracing::info!(removed = removed.len(), "sample data stripped");
    Ok(removed)
}

/// Strip sample data, then run the gradle wrapper with `command`.
pub fn build_module(
    runner: &mut dyn CommandRunner,
    module_dir: &Path,
    command: &str,
) -> Result<()> {
    strip_sample_data(module_dir)?;
    let wrapper = locate_build_tool(module_dir)?;
    let program = module_dir.join(wrapper);
    runner.run_checked(&CommandSpec::new(
        program.to_string_lossy(),
        [command],
        module_dir,
    ))?;
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    fn resources_dir(module: &Path) -> PathBuf {
        let dir = site_initializer_resources(module);
        fs::create_dir_all(&dir).expect("create resources");
        dir
    }

    #[test]
    fn strips_account_and_user_files_only() {
        let module = tempfile::tempdir().expect("tempdir");
        let dir = resources_dir(module.path());
        for name in [
            "accounts.json",
            "user-accounts.json",
            "user-roles.json",
            "layouts.json",
            "site-navigation-menus.json",
            ".user-cache",
        ] {
            fs::write(dir.join(name), "[]").expect("write resource");
        }
        fs::create_dir_all(dir.join("user-groups")).expect("create dir");

        let removed = strip_sample_data(module.path()).expect("strip");
        let names: Vec<String> = removed
            .iter()
            .map(|path| path.file_name().expect("name").to_string_lossy().into_owned())
            .collect();
        assert_eq!(names, vec!["accounts.json", "user-accounts.json", "user-roles.json"]);
        assert!(dir.join("layouts.json").is_file());
        assert!(dir.join(".user-cache").is_file());
        assert!(dir.join("user-groups").is_dir());
    }

    #[test]
    fn missing_resources_dir_strips_nothing() {
        let module = tempfile::tempdir().expect("tempdir");
        assert!(strip_sample_data(module.path()).expect("strip").is_empty());
    }
}
