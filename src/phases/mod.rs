//! Implementation of the 5 phases of a structure build.
//!
//! ## Overview
//!
//! A build declares its tasks in 5 phases:
//! 1. Package Installation - Check and register the collections the spec uses
//! 2. Container Creation - Create every project the workspace does not have yet
//! 3. Root Expansion - Expand the root-level tree at `/`
//! 4. Container Expansion - Expand each project's tree at its root
//! 5. Package Removal - Uninstall the collections once everything else ran
//!
//! Each phase hands the task ids it produced to the next phase, which makes
//! them the dependencies of the tasks it declares. Phases 3 and 4 both depend
//! on the output of phase 2 and are independent of each other. Phase 5
//! depends on the union of everything phases 3 and 4 produced.
//!
//! Phases never run generators. They only declare tasks through a
//! [`TaskGraphBuilder`](crate::task::TaskGraphBuilder).

use serde::Serialize;

use crate::defaults::{DEFAULT_CONTAINER_COLLECTION, TOOL_COLLECTION};
use crate::settings::SettingsLayer;

pub mod cleanup;
pub mod containers;
pub mod expand;
pub mod install;
pub mod orchestrator;
pub mod root;

// Re-export phase modules with descriptive names for easier access
pub use cleanup as phase5;
pub use containers as phase2;
pub use expand as phase4;
pub use install as phase1;
pub use root as phase3;

/// Switches and names that shape a build.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct BuildOptions {
    /// Declare the `check-packages` task (phase 1)
    pub install_collections: bool,
    /// Declare the `register-collections` task (phase 1)
    pub register_collections: bool,
    /// Declare the `uninstall-packages` task (phase 5)
    pub uninstall_collections: bool,
    /// Collection whose operations create missing projects
    pub container_collection: String,
    /// Collection owning the package bookkeeping operations
    pub tool_collection: String,
    /// Collections that are never installed or uninstalled
    pub ignored_packages: Vec<String>,
    /// Project handed to root-level generators as `project`
    pub project_name: Option<String>,
}

impl Default for BuildOptions {
    fn default() -> Self {
        Self {
            install_collections: false,
            register_collections: false,
            uninstall_collections: false,
            container_collection: DEFAULT_CONTAINER_COLLECTION.to_string(),
            tool_collection: TOOL_COLLECTION.to_string(),
            ignored_packages: vec![DEFAULT_CONTAINER_COLLECTION.to_string()],
            project_name: None,
        }
    }
}

/// A collection the build needs installed.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct Package {
    pub package_name: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub version: Option<String>,
}

/// Collections of the global settings layer, minus the ignored ones.
pub fn packages(settings: &SettingsLayer, options: &BuildOptions) -> Vec<Package> {
    settings
        .collections()
        .filter(|(name, _)| !options.ignored_packages.iter().any(|ignored| ignored.as_str() == *name))
        .map(|(name, collection)| Package {
            package_name: name.to_string(),
            version: collection.version().map(str::to_string),
        })
        .collect()
}
