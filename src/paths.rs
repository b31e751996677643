//! Fixed locations inside a Liferay checkout and helpers to find them.
use crate::error::{Result, TarchiaError};
use std::ffi::OsStr;
use std::path::{Component, Path, PathBuf};

/// Path segment separating the repository root from module trees.
pub const MODULES_SEGMENT: &str = "modules";
/// Developer overrides for the bundled instance; read-only for us.
pub const INSTANCE_PROPERTIES_FILE: &str = "app.server.me.properties";
/// Records which tag the bundled instance was last built from.
pub const BUILD_MARKER_FILE: &str = "app.server.version.properties";
pub const HOME_DIR_KEY: &str = "app.server.parent.dir";
pub const BUILD_MARKER_KEY: &str = "app.server.version.tag";
/// Survives instance home cleanup.
pub const PRESERVED_HOME_FILE: &str = "portal-setup-wizard.properties";
pub const BUILD_WRAPPER: &str = "gradlew";
pub const MAX_WRAPPER_DEPTH: usize = 8;

pub fn site_initializer_resources(module_path: &Path) -> PathBuf {
    module_path
        .join("src")
        .join("main")
        .join("resources")
        .join("site-initializer")
}

/// Everything in `module_path` before the first `modules` component.
pub fn resolve_repo_root(module_path: &Path) -> Result<PathBuf> {
    let marker = Component::Normal(OsStr::new(MODULES_SEGMENT));
    let mut root = PathBuf::new();
    for component in module_path.components() {
        if component == marker {
            return Ok(root);
        }
        root.push(component);
    }
    Err(TarchiaError::not_found(format!(
        "{} is not inside a `{MODULES_SEGMENT}` directory of a Liferay repository",
        module_path.display()
    )))
}

/// Walk up from `start_dir` looking for the gradle wrapper. The returned
/// path is relative to `start_dir` (`gradlew`, `../gradlew`, ...).
pub fn locate_build_tool(start_dir: &Path) -> Result<PathBuf> {
    let mut relative = PathBuf::from(BUILD_WRAPPER);
    for _ in 0..MAX_WRAPPER_DEPTH {
        if start_dir.join(&relative).is_file() {
            return Ok(relative);
        }
        relative = Path::new("..").join(relative);
    }
    Err(TarchiaError::not_found(format!(
        "{BUILD_WRAPPER} not found within {MAX_WRAPPER_DEPTH} levels above {}",
        start_dir.display()
    )))
}

/// Expand `${project.dir}` and a leading `~` in an instance home value and
/// anchor relative results at `repo_root`.
pub fn expand_home_dir(raw: &str, repo_root: &Path) -> PathBuf {
    let root = repo_root.to_string_lossy();
    let root = root.trim_end_matches('/');
    let expanded = raw.replace("${project.dir}", root);
    let path = match expanded.strip_prefix('~') {
        Some(rest) if rest.is_empty() || rest.starts_with('/') => match dirs::home_dir() {
            Some(home) => home.join(rest.trim_start_matches('/')),
            None => PathBuf::from(&expanded),
        },
        _ => PathBuf::from(&expanded),
    };
    if path.is_absolute() {
        path
    } else {
        repo_root.join(path)
    }
}
