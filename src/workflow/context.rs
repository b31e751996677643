use crate::cli::{RootArgs, DEFAULT_ORIGIN};
use crate::error::{Result, TarchiaError};
use crate::paths::resolve_repo_root;
use std::path::{Path, PathBuf};

/// Inputs for one pipeline run. `module_path` is absolute and always lies
/// under `repo_root`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct WorkflowContext {
    pub module_path: PathBuf,
    pub repo_root: PathBuf,
    pub tag: String,
    pub origin: String,
    pub build_command: String,
    pub force: bool,
    pub ignore_master_reset: bool,
    pub disable_profile_setup: bool,
}

impl WorkflowContext {
    pub fn new(module_path: &Path, tag: &str, build_command: &str) -> Result<Self> {
        let module_path = std::path::absolute(module_path)
            .map_err(|err| TarchiaError::io(err, "resolve module path", module_path))?;
        let repo_root = resolve_repo_root(&module_path)?;
        Ok(Self {
            module_path,
            repo_root,
            tag: tag.to_string(),
            origin: DEFAULT_ORIGIN.to_string(),
            build_command: build_command.to_string(),
            force: false,
            ignore_master_reset: false,
            disable_profile_setup: false,
        })
    }

    pub fn from_args(args: &RootArgs) -> Result<Self> {
        let mut ctx = Self::new(&args.module, &args.tag, &args.command)?;
        ctx.origin = args.resolved_origin();
        ctx.force = args.force;
        ctx.ignore_master_reset = args.ignore;
        ctx.disable_profile_setup = args.no_dxp;
        Ok(ctx)
    }

    pub fn instance_properties_path(&self) -> PathBuf {
        self.repo_root.join(crate::paths::INSTANCE_PROPERTIES_FILE)
    }

    pub fn build_marker_path(&self) -> PathBuf {
        self.repo_root.join(crate::paths::BUILD_MARKER_FILE)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use clap::Parser;

    #[test]
    fn context_from_args_carries_flags() {
        let args = RootArgs::try_parse_from([
            "tarchia",
            "build",
            "/work/liferay/modules/custom/app",
            "--tag",
            "7.4.3.81-ga81",
            "--origin",
            "origin",
            "-f",
            "-i",
            "--no-dxp",
        ])
        .expect("parse");
        let ctx = WorkflowContext::from_args(&args).expect("context");
        assert_eq!(ctx.repo_root, PathBuf::from("/work/liferay"));
        assert_eq!(ctx.module_path, PathBuf::from("/work/liferay/modules/custom/app"));
        assert_eq!(ctx.origin, "origin");
        assert_eq!(ctx.build_command, "build");
        assert!(ctx.force && ctx.ignore_master_reset && ctx.disable_profile_setup);
        assert_eq!(
            ctx.build_marker_path(),
            PathBuf::from("/work/liferay/app.server.version.properties")
        );
    }

    #[test]
    fn relative_module_path_is_made_absolute() {
        let ctx = WorkflowContext::new(Path::new("modules/custom/app"), "t", "build")
            .expect("context");
        assert!(ctx.module_path.is_absolute());
        assert!(ctx.module_path.starts_with(&ctx.repo_root));
    }

    #[test]
    fn module_outside_repository_is_rejected() {
        let err = WorkflowContext::new(Path::new("/tmp/site-initializer"), "t", "build")
            .expect_err("outside");
        assert!(matches!(err, TarchiaError::NotFound(_)));
    }
}
