//! Default values for structure-builder.
//!
//! This module provides centralized default values used across the library
//! and the commands, ensuring consistency and avoiding duplication.

use std::path::PathBuf;

/// Spec file read when neither `--spec` nor `--base64` is given.
pub const DEFAULT_SPEC_FILE: &str = "project-structure.json";

/// Workspace manifest read when `--workspace` is not given.
pub const DEFAULT_WORKSPACE_FILE: &str = "workspace.json";

/// Directory new projects are created under when the manifest names none.
pub const DEFAULT_NEW_PROJECT_ROOT: &str = "projects";

/// Collection whose operations create missing projects.
pub const DEFAULT_CONTAINER_COLLECTION: &str = "@schematics/angular";

/// Collection that owns the package bookkeeping operations.
pub const TOOL_COLLECTION: &str = "structure-builder";

/// Operation that installs the collections a spec needs.
pub const CHECK_PACKAGES_OPERATION: &str = "check-packages";

/// Operation that registers the collections in the workspace manifest.
pub const REGISTER_COLLECTIONS_OPERATION: &str = "register-collections";

/// Operation that removes the collections once the build is done.
pub const UNINSTALL_PACKAGES_OPERATION: &str = "uninstall-packages";

/// Returns the default spec path, relative to the working directory.
pub fn default_spec_path() -> PathBuf {
    PathBuf::from(DEFAULT_SPEC_FILE)
}

/// Returns the default workspace manifest path, relative to the working directory.
pub fn default_workspace_path() -> PathBuf {
    PathBuf::from(DEFAULT_WORKSPACE_FILE)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_paths_are_relative() {
        assert!(default_spec_path().is_relative());
        assert!(default_workspace_path().ends_with("workspace.json"));
    }
}
