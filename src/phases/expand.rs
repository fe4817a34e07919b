//! Phase 4: Container Expansion
//!
//! Walks each project's tree at the project's root. The root comes from the
//! workspace manifest, or `<newProjectRoot>/<name>` for projects created in
//! phase 2. An empty root is the workspace root and is walked at `/`. The project's own settings layer is consulted before the global
//! one and every generated configuration carries `project: <name>`.
//!
//! Every project depends on the output of phase 2, never on the trees of the
//! projects expanded before it.

use log::{debug, warn};

use crate::dispatcher::TaskId;
use crate::error::Result;
use crate::settings::SettingsResolver;
use crate::spec::WorkspaceSpec;
use crate::task::{dedupe, TaskGraphBuilder};
use crate::walker::{Layers, StructureWalker};
use crate::workspace::WorkspaceManifest;

/// Execute Phase 4; returns the deduplicated ids of every walk.
pub fn execute(
    spec: &WorkspaceSpec,
    workspace: &WorkspaceManifest,
    resolver: &mut SettingsResolver,
    builder: &mut TaskGraphBuilder<'_>,
    parents: &[TaskId],
) -> Result<Vec<TaskId>> {
    let mut ids = Vec::new();

    for (name, project) in &spec.projects {
        if project.structure.is_empty() {
            warn!("Project `{}` declares no structure", name);
            continue;
        }

        let mut root = workspace.project_root(name);
        if root.is_empty() {
            root.push('/');
        }
        debug!("Expanding project `{}` at `{}`", name, root);
        let layers = Layers::container(&spec.settings, name, &project.settings);
        ids.extend(
            StructureWalker::new(&mut *resolver, &mut *builder, layers).walk(
                &root,
                &project.structure,
                parents,
            )?,
        );
    }

    Ok(dedupe(&ids))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::dispatcher::PlanDispatcher;
    use crate::settings::ConfigMap;
    use crate::spec;
    use serde_json::json;

    #[test]
    fn test_projects_expand_independently() {
        let spec = spec::from_value(&json!({
            "$schema": "s",
            "settings": { "lib": { "gen": { "alias": "g" } } },
            "projects": {
                "shell": {
                    "home": { "type": "generator", "name": "g" },
                    "src": { "type": "folder", "nav": { "type": "generator", "name": "g" } }
                },
                "admin": { "users": { "type": "generator", "name": "g" } },
                "empty": { "type": "library" }
            }
        }))
        .unwrap();
        let workspace = WorkspaceManifest::parse(
            r#"{ "projects": { "shell": { "root": "" }, "admin": { "root": "apps/admin" } } }"#,
        )
        .unwrap();

        let mut dispatcher = PlanDispatcher::for_workspace(&workspace);
        let mut builder = TaskGraphBuilder::new(&mut dispatcher);
        let parent = builder
            .create_task("lib", "setup", "/", ConfigMap::new(), &[])
            .unwrap();
        let mut resolver = SettingsResolver::new();
        let ids = execute(&spec, &workspace, &mut resolver, &mut builder, &[parent]).unwrap();

        let tasks = dispatcher.tasks();
        assert_eq!(tasks.len(), 4);
        // A project at the workspace root expands under `/`
        assert_eq!(tasks[1].path, "/");
        assert_eq!(tasks[1].config.get("project"), Some(&json!("shell")));
        assert_eq!(tasks[2].path, "/src");
        assert_eq!(tasks[2].depends_on, vec![parent, tasks[1].id]);
        assert_eq!(tasks[3].path, "apps/admin");
        assert_eq!(tasks[3].config.get("project"), Some(&json!("admin")));
        // The second project does not wait for the first one
        assert_eq!(tasks[3].depends_on, vec![parent]);
        assert_eq!(ids, vec![parent, tasks[1].id, tasks[2].id, tasks[3].id]);
    }
}
