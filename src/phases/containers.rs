//! Phase 2: Container Creation
//!
//! Every project the spec declares but the dispatcher does not know yet is
//! created by one task of the container collection. The project's `type`
//! names the creation operation (`application`, `library`, ...). A project
//! that must be created but has no `type` stops the build.
//!
//! Creation tasks run at `/` and depend on every task of phase 1. The phase
//! returns those phase 1 ids followed by the creation ids, which is what the
//! expansion phases depend on.

use log::{debug, info};
use serde_json::Value;

use super::BuildOptions;
use crate::dispatcher::TaskId;
use crate::error::{Error, Result};
use crate::settings::ConfigMap;
use crate::spec::WorkspaceSpec;
use crate::task::TaskGraphBuilder;

/// Execute Phase 2.
pub fn execute(
    spec: &WorkspaceSpec,
    options: &BuildOptions,
    builder: &mut TaskGraphBuilder<'_>,
    parents: &[TaskId],
) -> Result<Vec<TaskId>> {
    let mut ids = parents.to_vec();

    for (name, project) in &spec.projects {
        if builder.container_exists(name) {
            debug!("Project `{}` already exists", name);
            continue;
        }

        let kind = project
            .kind
            .as_deref()
            .ok_or_else(|| Error::MissingOperationType {
                container: name.clone(),
            })?;

        let mut config = ConfigMap::new();
        config.insert("name".to_string(), Value::String(name.clone()));
        config.insert("skipPackageJson".to_string(), Value::Bool(true));

        info!("Project `{}` will be created as `{}`", name, kind);
        ids.push(builder.create_task(&options.container_collection, kind, "/", config, parents)?);
    }

    Ok(ids)
}
