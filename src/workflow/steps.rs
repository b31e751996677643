/// Pipeline steps in execution order.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Step {
    ResolveRepoRoot,
    EnterRepoRoot,
    ReadInstanceHome,
    CheckBuildMarker,
    CleanRepository,
    EnterInstanceHome,
    CleanInstanceHome,
    ReturnToRepoRoot,
    CheckoutTag,
    BuildInstance,
    CheckoutPrevious,
    EnterModule,
    BuildModule,
    RestoreRepository,
}

impl Step {
    pub const ALL: [Step; 14] = [
        Step::ResolveRepoRoot,
        Step::EnterRepoRoot,
        Step::ReadInstanceHome,
        Step::CheckBuildMarker,
        Step::CleanRepository,
        Step::EnterInstanceHome,
        Step::CleanInstanceHome,
        Step::ReturnToRepoRoot,
        Step::CheckoutTag,
        Step::BuildInstance,
        Step::CheckoutPrevious,
        Step::EnterModule,
        Step::BuildModule,
        Step::RestoreRepository,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            Step::ResolveRepoRoot => "resolve_repo_root",
            Step::EnterRepoRoot => "enter_repo_root",
            Step::ReadInstanceHome => "read_instance_home",
            Step::CheckBuildMarker => "check_build_marker",
            Step::CleanRepository => "clean_repository",
            Step::EnterInstanceHome => "enter_instance_home",
            Step::CleanInstanceHome => "clean_instance_home",
            Step::ReturnToRepoRoot => "return_to_repo_root",
            Step::CheckoutTag => "checkout_tag",
            Step::BuildInstance => "build_instance",
            Step::CheckoutPrevious => "checkout_previous",
            Step::EnterModule => "enter_module",
            Step::BuildModule => "build_module",
            Step::RestoreRepository => "restore_repository",
        }
    }

    /// Progress title shown while the step runs.
    pub fn title(&self, tag: &str) -> String {
        match self {
            Step::ResolveRepoRoot => "Getting repo path from provided module path".to_string(),
            Step::EnterRepoRoot | Step::ReturnToRepoRoot => "Changing to repo path".to_string(),
            Step::ReadInstanceHome => format!(
                "Getting {} value from {}",
                crate::paths::HOME_DIR_KEY,
                crate::paths::INSTANCE_PROPERTIES_FILE
            ),
            Step::CheckBuildMarker => format!("Checking if {tag} tag was already built"),
            Step::CleanRepository => "Cleaning and updating repo".to_string(),
            Step::EnterInstanceHome => "Changing to Liferay home".to_string(),
            Step::CleanInstanceHome => "Cleaning Liferay home".to_string(),
            Step::CheckoutTag => format!("Checking out {tag} tag"),
            Step::BuildInstance => format!("Building Liferay instance in {tag}"),
            Step::CheckoutPrevious => "Returning to previous branch".to_string(),
            Step::EnterModule => "Changing to module path".to_string(),
            Step::BuildModule => "Building project".to_string(),
            Step::RestoreRepository => "Cleaning up".to_string(),
        }
    }
}
