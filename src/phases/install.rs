//! Phase 1: Package Installation
//!
//! Declares the bookkeeping tasks that must run before any generator:
//!
//! - **`check-packages`** installs every collection of the global settings
//!   layer that is not present yet. Presence is checked when the task runs,
//!   so a single task carries the whole list.
//! - **`register-collections`** records the collections in the workspace
//!   manifest so the generators can be found by name.
//!
//! Both are optional and both run at `/` with no dependencies. Ignored
//! packages (the container collection by default) are left out.

use log::{debug, info};
use serde_json::Value;

use super::{packages, BuildOptions};
use crate::defaults::{CHECK_PACKAGES_OPERATION, REGISTER_COLLECTIONS_OPERATION};
use crate::dispatcher::TaskId;
use crate::error::Result;
use crate::settings::ConfigMap;
use crate::spec::WorkspaceSpec;
use crate::task::TaskGraphBuilder;

/// Execute Phase 1; returns the ids of the declared tasks.
pub fn execute(
    spec: &WorkspaceSpec,
    options: &BuildOptions,
    builder: &mut TaskGraphBuilder<'_>,
) -> Result<Vec<TaskId>> {
    let mut ids = Vec::new();
    let packages = packages(&spec.settings, options);
    if packages.is_empty() {
        debug!("No collections to install or register");
        return Ok(ids);
    }

    if options.install_collections {
        let mut config = ConfigMap::new();
        config.insert("packages".to_string(), serde_json::to_value(&packages)?);
        info!("{} collection(s) will be checked", packages.len());
        ids.push(builder.create_task(
            &options.tool_collection,
            CHECK_PACKAGES_OPERATION,
            "/",
            config,
            &[],
        )?);
    }

    if options.register_collections {
        let names = packages
            .iter()
            .map(|package| Value::String(package.package_name.clone()))
            .collect();
        let mut config = ConfigMap::new();
        config.insert("packages".to_string(), Value::Array(names));
        ids.push(builder.create_task(
            &options.tool_collection,
            REGISTER_COLLECTIONS_OPERATION,
            "/",
            config,
            &[],
        )?);
    }

    Ok(ids)
}
