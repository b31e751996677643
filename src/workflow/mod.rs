//! The release-testing pipeline.
//!
//! Steps run strictly in order and the first failure ends the run. The
//! working directory is an explicit cursor on [`Workflow`] that is handed to
//! every command; the process-wide current directory is never changed.
mod context;
mod git;
mod instance;
mod module;
mod steps;

pub use context::WorkflowContext;
pub use steps::Step;

use crate::error::{Result, TarchiaError};
use crate::paths::{expand_home_dir, BUILD_MARKER_KEY, HOME_DIR_KEY, PRESERVED_HOME_FILE};
use crate::process::CommandRunner;
use crate::progress::Progress;
use crate::properties::{is_tag_built, read_property, write_property};
use std::path::{Path, PathBuf};

/// What a successful run did.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct WorkflowReport {
    pub tag: String,
    /// False when the marker already recorded the tag and the ant build was skipped.
    pub instance_built: bool,
    pub steps: Vec<Step>,
}

impl WorkflowReport {
    pub fn success_message(&self) -> String {
        format!(
            "Project built successfully to be used with {} Liferay instance",
            self.tag
        )
    }
}

pub struct Workflow<'a> {
    ctx: &'a WorkflowContext,
    runner: &'a mut dyn CommandRunner,
    progress: &'a mut dyn Progress,
    cwd: PathBuf,
    current: Option<Step>,
    completed: Vec<Step>,
}

impl<'a> Workflow<'a> {
    /// `cwd` is where the run starts; the first step moves to the repo root.
    pub fn new(
        ctx: &'a WorkflowContext,
        runner: &'a mut dyn CommandRunner,
        progress: &'a mut dyn Progress,
        cwd: PathBuf,
    ) -> Self {
        Self {
            ctx,
            runner,
            progress,
            cwd,
            current: None,
            completed: Vec::new(),
        }
    }

    pub fn run(mut self) -> Result<WorkflowReport> {
        tracing::info!(
            tag = %self.ctx.tag,
            origin = %self.ctx.origin,
            module = %self.ctx.module_path.display(),
            force = self.ctx.force,
            ignore_master_reset = self.ctx.ignore_master_reset,
            disable_profile_setup = self.ctx.disable_profile_setup,
            "pipeline started"
        );
        match self.run_steps() {
            Ok(report) => Ok(report),
            Err(err) => {
                if let Some(step) = self.current {
                    tracing::error!(
                        step = step.as_str(),
                        cwd = %self.cwd.display(),
                        exit_code = err.exit_code(),
                        "step failed"
                    );
                }
                Err(err)
            }
        }
    }

    fn run_steps(&mut self) -> Result<WorkflowReport> {
        let ctx = self.ctx;

        self.begin(Step::ResolveRepoRoot);
        self.progress.note(&format!(
            "Repo path found successfully: {}",
            ctx.repo_root.display()
        ));
        self.finish();

        self.change_dir(Step::EnterRepoRoot, &ctx.repo_root)?;

        self.begin(Step::ReadInstanceHome);
        let home_value = read_property(&ctx.instance_properties_path(), HOME_DIR_KEY)?;
        let home_dir = expand_home_dir(&home_value, &ctx.repo_root);
        self.progress.note(&format!(
            "Liferay home found successfully: {}",
            home_dir.display()
        ));
        self.finish();

        self.begin(Step::CheckBuildMarker);
        let is_built = is_tag_built(&ctx.tag, &ctx.build_marker_path());
        self.progress.note(if is_built {
            "Tag was already built"
        } else {
            "Tag reference not found"
        });
        self.finish();

        self.begin(Step::CleanRepository);
        git::clean_master_repo(
            &mut *self.runner,
            &self.cwd,
            &ctx.origin,
            ctx.ignore_master_reset,
        )?;
        self.progress
            .note("repo cleaned and updated successfully and master branch updated");
        self.finish();

        self.change_dir(Step::EnterInstanceHome, &home_dir)?;

        self.begin(Step::CleanInstanceHome);
        instance::clean_home_dir(&self.cwd, PRESERVED_HOME_FILE)?;
        self.progress.note("Liferay home cleaned successfully");
        self.finish();

        self.change_dir(Step::ReturnToRepoRoot, &ctx.repo_root)?;

        self.begin(Step::CheckoutTag);
        git::checkout_tag(&mut *self.runner, &self.cwd, &ctx.origin, &ctx.tag)?;
        self.progress
            .note(&format!("Changed from master branch to {} tag", ctx.tag));
        self.finish();

        self.begin(Step::BuildInstance);
        if is_built {
            tracing::info!(tag = %ctx.tag, "tag already built; skipping instance build");
            self.progress.note("Instance build skipped, tag was already built");
        } else {
            instance::build_instance(&mut *self.runner, &self.cwd, !ctx.disable_profile_setup)?;
            write_property(&ctx.build_marker_path(), BUILD_MARKER_KEY, &ctx.tag)?;
            self.progress.note("Instance built successfully");
        }
        self.finish();

        self.begin(Step::CheckoutPrevious);
        git::checkout_previous(&mut *self.runner, &self.cwd)?;
        self.progress
            .note(&format!("Changed {} tag to master branch", ctx.tag));
        self.finish();

        self.change_dir(Step::EnterModule, &ctx.module_path)?;

        self.begin(Step::BuildModule);
        module::build_module(&mut *self.runner, &self.cwd, &ctx.build_command)?;
        self.progress
            .note("Project built successfully without accounts and users assets");
        self.finish();

        self.begin(Step::RestoreRepository);
        git::restore(&mut *self.runner, &self.cwd, &ctx.tag)?;
        self.progress.note("Changes restored to master branch");
        self.finish();

        Ok(WorkflowReport {
            tag: ctx.tag.clone(),
            instance_built: !is_built,
            steps: std::mem::take(&mut self.completed),
        })
    }

    fn begin(&mut self, step: Step) {
        tracing::info!(
            step = step.as_str(),
            cwd = %self.cwd.display(),
            "step started"
        );
        self.current = Some(step);
        self.progress.title(&step.title(&self.ctx.tag));
    }

    fn finish(&mut self) {
        if let Some(step) = self.current.take() {
            self.completed.push(step);
        }
        self.progress.advance();
    }

    /// The only place the cursor moves.
    fn change_dir(&mut self, step: Step, target: &Path) -> Result<()> {
        self.begin(step);
        let next = self.cwd.join(target);
        if !next.is_dir() {
            return Err(TarchiaError::not_found(format!(
                "cannot change directory to {}: not a directory",
                next.display()
            )));
        }
        self.cwd = next;
        self.finish();
        Ok(())
    }
}

#[cfg(test)]
#[path = "pipeline_tests.rs"]
mod tests;
