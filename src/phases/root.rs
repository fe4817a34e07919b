//! Phase 3: Root Expansion
//!
//! Walks the root-level tree of the spec at `/`. Only the global settings
//! layer is visible here. When the build names a project, its name is
//! written under `project` in every generated configuration.

use super::BuildOptions;
use crate::dispatcher::TaskId;
use crate::error::Result;
use crate::settings::SettingsResolver;
use crate::spec::WorkspaceSpec;
use crate::task::TaskGraphBuilder;
use crate::walker::{Layers, StructureWalker};

/// Execute Phase 3; returns `parents` followed by the ids of the root tree.
pub fn execute(
    spec: &WorkspaceSpec,
    options: &BuildOptions,
    resolver: &mut SettingsResolver,
    builder: &mut TaskGraphBuilder<'_>,
    parents: &[TaskId],
) -> Result<Vec<TaskId>> {
    let layers = Layers::global(&spec.settings).with_project(options.project_name.as_deref());
    StructureWalker::new(resolver, builder, layers).walk("/", &spec.root, parents)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::dispatcher::PlanDispatcher;
    use crate::settings::ConfigMap;
    use crate::spec;
    use serde_json::json;

    #[test]
    fn test_root_nodes_expand_at_slash() {
        let spec = spec::from_value(&json!({
            "$schema": "s",
            "settings": { "lib": { "env": { "alias": "env", "production": false } } },
            "environment": { "type": "generator", "name": "env" },
            "config": {
                "type": "folder",
                "lint": { "type": "generator", "name": "lib:lint" }
            }
        }))
        .unwrap();

        let mut dispatcher = PlanDispatcher::new();
        let mut builder = TaskGraphBuilder::new(&mut dispatcher);
        let mut resolver = SettingsResolver::new();
        let ids = execute(&spec, &BuildOptions::default(), &mut resolver, &mut builder, &[]).unwrap();

        let tasks = dispatcher.tasks();
        assert_eq!(ids.len(), 2);
        assert_eq!(tasks[0].path, "/");
        assert_eq!(tasks[0].config.get("production"), Some(&json!(false)));
        assert!(tasks[0].config.get("project").is_none());
        assert_eq!(tasks[1].path, "/config");
        assert_eq!(tasks[1].depends_on, vec![tasks[0].id]);
    }

    #[test]
    fn test_named_project_reaches_root_generators() {
        let spec = spec::from_value(&json!({
            "$schema": "s",
            "environment": { "type": "generator", "name": "lib:env" },
            "lint": {
                "type": "generator",
                "name": "lib:lint",
                "settings": { "project": "tools" }
            }
        }))
        .unwrap();
        let options = BuildOptions {
            project_name: Some("shell".to_string()),
            ..BuildOptions::default()
        };

        let mut dispatcher = PlanDispatcher::new();
        let mut builder = TaskGraphBuilder::new(&mut dispatcher);
        let mut resolver = SettingsResolver::new();
        execute(&spec, &options, &mut resolver, &mut builder, &[]).unwrap();

        let tasks = dispatcher.tasks();
        assert_eq!(tasks[0].config.get("project"), Some(&json!("shell")));
        // A node's own setting wins over the build's project
        assert_eq!(tasks[1].config.get("project"), Some(&json!("tools")));
    }

    #[test]
    fn test_empty_root_passes_parents_through() {
        let spec = spec::from_value(&json!({ "$schema": "s" })).unwrap();
        let mut dispatcher = PlanDispatcher::new();
        let mut builder = TaskGraphBuilder::new(&mut dispatcher);
        let parent = builder
            .create_task("lib", "setup", "/", ConfigMap::new(), &[])
            .unwrap();
        let mut resolver = SettingsResolver::new();
        let ids = execute(&spec, &BuildOptions::default(), &mut resolver, &mut builder, &[parent])
            .unwrap();
        assert_eq!(ids, vec![parent]);
    }
}
