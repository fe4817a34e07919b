//! Phase 5: Package Removal
//!
//! Declares a single `uninstall-packages` task that removes the collections
//! installed in phase 1. It depends on every task the expansion phases
//! produced, so nothing is removed while a generator may still need it.

use log::{debug, info};

use super::{packages, BuildOptions};
use crate::defaults::UNINSTALL_PACKAGES_OPERATION;
use crate::dispatcher::TaskId;
use crate::error::Result;
use crate::settings::ConfigMap;
use crate::spec::WorkspaceSpec;
use crate::task::{dedupe, TaskGraphBuilder};

/// Execute Phase 5.
pub fn execute(
    spec: &WorkspaceSpec,
    options: &BuildOptions,
    builder: &mut TaskGraphBuilder<'_>,
    upstream: &[TaskId],
) -> Result<Option<TaskId>> {
    if !options.uninstall_collections {
        return Ok(None);
    }

    let packages = packages(&spec.settings, options);
    if packages.is_empty() {
        debug!("No collections to uninstall");
        return Ok(None);
    }

    let mut config = ConfigMap::new();
    config.insert("packages".to_string(), serde_json::to_value(&packages)?);
    info!("{} collection(s) will be uninstalled", packages.len());
    builder
        .create_task(
            &options.tool_collection,
            UNINSTALL_PACKAGES_OPERATION,
            "/",
            config,
            &dedupe(upstream),
        )
        .map(Some)
}
