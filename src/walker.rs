//! # Structure Walker
//!
//! Expands a folder tree into tasks. At every level:
//!
//! 1. each generator child is resolved against the settings layers and
//!    declared as one task (or one task per instance), depending only on the
//!    ids inherited into the level;
//! 2. each folder child is walked with its name appended to the path, and
//!    inherits the level's generator ids, the ids inherited into the level,
//!    and the ids accumulated by the sibling folders walked before it.
//!
//! Walking returns the inherited ids followed by every id created below, so
//! callers combine results explicitly instead of sharing a mutable list.

use std::sync::Arc;

use log::debug;

use crate::dispatcher::TaskId;
use crate::error::{Error, Result};
use crate::merge;
use crate::path;
use crate::settings::{ConfigMap, LayerScope, ResolvedSettings, Selector, SettingsLayer, SettingsResolver};
use crate::spec::{Folder, GeneratorNode};
use crate::task::{dedupe, TaskGraphBuilder};

/// The settings layers visible to one walk.
#[derive(Debug, Clone, Copy)]
pub struct Layers<'s> {
    pub global: &'s SettingsLayer,
    /// The container being expanded and its own layer
    pub container: Option<(&'s str, &'s SettingsLayer)>,
    /// Written under `project` unless a node sets it itself
    pub project: Option<&'s str>,
}

impl<'s> Layers<'s> {
    pub fn global(global: &'s SettingsLayer) -> Self {
        Self {
            global,
            container: None,
            project: None,
        }
    }

    pub fn container(global: &'s SettingsLayer, name: &'s str, layer: &'s SettingsLayer) -> Self {
        Self {
            global,
            container: Some((name, layer)),
            project: Some(name),
        }
    }

    /// Name the project generated configuration belongs to.
    pub fn with_project(mut self, project: Option<&'s str>) -> Self {
        self.project = project;
        self
    }
}

/// A generator node after resolution, before any task is declared.
#[derive(Debug, Clone, PartialEq)]
pub struct ResolvedGenerator {
    pub collection: String,
    pub operation: String,
    pub path: String,
    /// Merged node, container and global configuration
    pub config: ConfigMap,
}

/// Walks folder trees, declaring tasks as it goes.
pub struct StructureWalker<'w, 'd> {
    resolver: &'w mut SettingsResolver,
    builder: &'w mut TaskGraphBuilder<'d>,
    layers: Layers<'w>,
}

impl<'w, 'd> StructureWalker<'w, 'd> {
    pub fn new(
        resolver: &'w mut SettingsResolver,
        builder: &'w mut TaskGraphBuilder<'d>,
        layers: Layers<'w>,
    ) -> Self {
        Self {
            resolver,
            builder,
            layers,
        }
    }

    /// Expand `folder` at `path`.
    ///
    /// Returns `inherited` followed by every id created in the subtree.
    pub fn walk(&mut self, path: &str, folder: &Folder, inherited: &[TaskId]) -> Result<Vec<TaskId>> {
        let mut branch = Vec::new();
        for (key, node) in folder.generators() {
            branch.extend(self.expand_generator(path, key, node, inherited)?);
        }

        let mut visible = dedupe(&[inherited, branch.as_slice()].concat());
        for (key, child) in folder.folders() {
            let child_path = path::join(path, key);
            visible = self.walk(&child_path, child, &visible)?;
        }

        Ok(visible)
    }

    /// Declare the task(s) of one generator node; returns only the new ids.
    pub fn expand_generator(
        &mut self,
        path: &str,
        key: &str,
        node: &GeneratorNode,
        depends_on: &[TaskId],
    ) -> Result<Vec<TaskId>> {
        let resolved = self.resolve_generator(path, key, node)?;

        match &node.instances {
            None => {
                let id = self.builder.create_task(
                    &resolved.collection,
                    &resolved.operation,
                    &resolved.path,
                    resolved.config,
                    depends_on,
                )?;
                Ok(vec![id])
            }
            Some(instances) => instances
                .iter()
                .map(|(instance, overrides)| {
                    self.builder.create_task(
                        &resolved.collection,
                        &resolved.operation,
                        &resolved.path,
                        merge::merge_instance(&resolved.config, instance, overrides),
                        depends_on,
                    )
                })
                .collect(),
        }
    }

    /// Work out the collection, operation, path and configuration of a node.
    ///
    /// The container layer is consulted first. A container match is then
    /// looked up in the global layer by its collection and operation, so a
    /// project-level alias still picks up global defaults. Without a
    /// container match the global layer is searched with the node's own
    /// selector.
    pub fn resolve_generator(
        &mut self,
        path: &str,
        key: &str,
        node: &GeneratorNode,
    ) -> Result<ResolvedGenerator> {
        let (path, name) = path::parse_name(path, node.name.as_deref().unwrap_or(key));
        let explicit = split_explicit(&name);
        let selector = match explicit {
            Some((collection, operation)) => Selector::explicit(collection, operation),
            None => Selector::alias(name.as_str()),
        };

        let container_match: Option<Arc<ResolvedSettings>> =
            self.layers.container.and_then(|(container, layer)| {
                self.resolver.resolve(
                    &LayerScope::Container(container.to_string()),
                    Some(layer),
                    &selector,
                )
            });
        let global_selector = match &container_match {
            Some(found) => Selector::explicit(found.collection.as_str(), found.operation.as_str()),
            None => selector,
        };
        let global_match =
            self.resolver
                .resolve(&LayerScope::Global, Some(self.layers.global), &global_selector);

        let (collection, operation) = match (explicit, &global_match, &container_match) {
            (Some((collection, operation)), _, _) => (collection.to_string(), operation.to_string()),
            (None, Some(found), _) | (None, None, Some(found)) => {
                (found.collection.clone(), found.operation.clone())
            }
            (None, None, None) => return Err(Error::UnresolvedAlias { name: name.clone() }),
        };

        let mut node_local = node.settings.clone();
        if let Some(project) = self.layers.project {
            node_local
                .entry("project")
                .or_insert_with(|| serde_json::Value::String(project.to_string()));
        }
        let config = merge::merge(&node_local, container_match.as_deref(), global_match.as_deref());

        debug!("Node `{}` at {} resolved to {}:{}", key, path, collection, operation);
        Ok(ResolvedGenerator {
            collection,
            operation,
            path,
            config,
        })
    }
}

/// Split `collection:operation`; both halves must be non-empty.
fn split_explicit(name: &str) -> Option<(&str, &str)> {
    name.split_once(':')
        .filter(|(collection, operation)| !collection.is_empty() && !operation.is_empty())
}
