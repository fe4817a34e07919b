//! # Spec Schema and Parsing
//!
//! This module defines the typed form of a project-structure spec and the
//! single validation pass that produces it. Everything downstream works on
//! the typed tree and never re-checks the shape of the input.
//!
//! ## Input Shape
//!
//! ```json
//! {
//!   "$schema": "./node_modules/structure-builder/schema.json",
//!   "settings": { "@lib/ui": { "component": { "alias": "cmp" } } },
//!   "projects": {
//!     "app1": {
//!       "type": "application",
//!       "settings": { "@lib/ui": { "component": { "flat": true } } },
//!       "src": {
//!         "type": "folder",
//!         "header": { "type": "generator", "name": "cmp" }
//!       }
//!     }
//!   },
//!   "environment": { "type": "generator", "name": "@lib/ui:env" }
//! }
//! ```
//!
//! - **`$schema`**: required, non-empty.
//! - **`settings`**: the global settings layer.
//! - **`projects`**: containers, each with an optional `type` (used to create
//!   it), an optional per-project settings layer, and a folder tree.
//! - Every other top-level key is a root-level node.
//!
//! Nodes are tagged with `"type": "folder"` or `"type": "generator"` (the
//! older `"schematic"` tag is accepted too).
//!
//! ## Sources
//!
//! [`parse`] reads JSON, or YAML when the document does not start with `{`.
//! [`parse_base64`] reads base64-encoded JSON, and [`from_file`] picks the
//! format from the file extension.

use std::path::Path;

use base64::Engine;
use log::warn;
use serde_json::Value;

use crate::error::{Error, Result};
use crate::settings::{ConfigMap, SettingsLayer};

/// A generator invocation
#[derive(Debug, Clone, Default, PartialEq)]
pub struct GeneratorNode {
    /// Alias or `collection:operation`; the node's key is used when absent
    pub name: Option<String>,
    /// Inline configuration, lowest precedence
    pub settings: ConfigMap,
    /// One task per named instance, each with its own override
    pub instances: Option<Vec<(String, ConfigMap)>>,
}

impl GeneratorNode {
    /// Number of tasks this node expands to.
    pub fn task_count(&self) -> usize {
        match &self.instances {
            Some(instances) => instances.len(),
            None => 1,
        }
    }
}

/// Ordered children of a folder
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Folder {
    pub children: Vec<(String, SpecNode)>,
}

impl Folder {
    /// Generator children, in declaration order.
    pub fn generators(&self) -> impl Iterator<Item = (&str, &GeneratorNode)> {
        self.children.iter().filter_map(|(key, node)| match node {
            SpecNode::Generator(generator) => Some((key.as_str(), generator)),
            SpecNode::Folder(_) => None,
        })
    }

    /// Folder children, in declaration order.
    pub fn folders(&self) -> impl Iterator<Item = (&str, &Folder)> {
        self.children.iter().filter_map(|(key, node)| match node {
            SpecNode::Folder(folder) => Some((key.as_str(), folder)),
            SpecNode::Generator(_) => None,
        })
    }

    /// Number of tasks the whole subtree expands to.
    pub fn task_count(&self) -> usize {
        self.children
            .iter()
            .map(|(_, node)| match node {
                SpecNode::Folder(folder) => folder.task_count(),
                SpecNode::Generator(generator) => generator.task_count(),
            })
            .sum()
    }

    pub fn is_empty(&self) -> bool {
        self.children.is_empty()
    }
}

/// A node of the structure tree
#[derive(Debug, Clone, PartialEq)]
pub enum SpecNode {
    Folder(Folder),
    Generator(GeneratorNode),
}

/// A project declared under `projects`
#[derive(Debug, Clone, Default, PartialEq)]
pub struct ContainerSpec {
    /// Operation used to create the project when it does not exist
    pub kind: Option<String>,
    /// Per-project settings layer
    pub settings: SettingsLayer,
    pub structure: Folder,
}

/// A validated spec document
#[derive(Debug, Clone, Default, PartialEq)]
pub struct WorkspaceSpec {
    pub schema: String,
    /// Global settings layer
    pub settings: SettingsLayer,
    pub projects: Vec<(String, ContainerSpec)>,
    /// Root-level nodes, expanded at `/`
    pub root: Folder,
}

impl WorkspaceSpec {
    /// Number of generator tasks the spec expands to (instances counted individually).
    pub fn generator_task_count(&self) -> usize {
        self.root.task_count()
            + self
                .projects
                .iter()
                .map(|(_, project)| project.structure.task_count())
                .sum::<usize>()
    }
}

/// Parse a spec document from JSON or YAML text.
pub fn parse(content: &str) -> Result<WorkspaceSpec> {
    let value: Value = if content.trim_start().starts_with('{') {
        serde_json::from_str(content)?
    } else {
        serde_yaml::from_str(content)?
    };
    from_value(&value)
}

/// Parse a spec document from base64-encoded JSON.
pub fn parse_base64(encoded: &str) -> Result<WorkspaceSpec> {
    let bytes = base64::engine::general_purpose::STANDARD.decode(encoded.trim())?;
    let value: Value = serde_json::from_slice(&bytes)?;
    from_value(&value)
}

/// Load a spec from disk; `.yaml` and `.yml` files are read as YAML.
pub fn from_file<P: AsRef<Path>>(path: P) -> Result<WorkspaceSpec> {
    let path = path.as_ref();
    let content = std::fs::read_to_string(path)?;
    let is_yaml = matches!(
        path.extension().and_then(|ext| ext.to_str()),
        Some("yaml") | Some("yml")
    );
    let value: Value = if is_yaml {
        serde_yaml::from_str(&content)?
    } else {
        serde_json::from_str(&content)?
    };
    from_value(&value)
}

/// Validate an already-decoded document into a [`WorkspaceSpec`].
pub fn from_value(value: &Value) -> Result<WorkspaceSpec> {
    let document = value.as_object().ok_or_else(|| Error::SpecParse {
        message: "Spec must be an object".to_string(),
        hint: None,
    })?;

    let schema = match document.get("$schema") {
        Some(Value::String(marker)) if !marker.trim().is_empty() => marker.clone(),
        _ => return Err(Error::MissingSchemaMarker),
    };

    let settings = match document.get("settings") {
        Some(value) if !value.is_null() => SettingsLayer::from_json(value, "settings")?,
        _ => SettingsLayer::new(),
    };

    let projects = match document.get("projects") {
        Some(Value::Object(projects)) => projects
            .iter()
            .map(|(name, value)| Ok((name.clone(), parse_container(name, value)?)))
            .collect::<Result<Vec<_>>>()?,
        Some(Value::Null) | None => Vec::new(),
        Some(_) => {
            return Err(Error::SpecParse {
                message: "`projects` must be an object keyed by project name".to_string(),
                hint: None,
            })
        }
    };

    let root = parse_children(
        document
            .iter()
            .filter(|(key, _)| !matches!(key.as_str(), "$schema" | "settings" | "projects")),
        "",
    )?;

    Ok(WorkspaceSpec {
        schema,
        settings,
        projects,
        root,
    })
}

fn parse_container(name: &str, value: &Value) -> Result<ContainerSpec> {
    let context = format!("projects.{}", name);
    let fields = value.as_object().ok_or_else(|| Error::SpecParse {
        message: format!("`{}` must be an object", context),
        hint: None,
    })?;

    let kind = match fields.get("type") {
        Some(Value::String(kind)) if !kind.is_empty() => Some(kind.clone()),
        Some(Value::String(_)) | Some(Value::Null) | None => None,
        Some(other) => {
            return Err(Error::SpecParse {
                message: format!("`{}.type` must be a string, found {}", context, other),
                hint: Some("Use the creation operation, e.g. \"application\" or \"library\"".to_string()),
            })
        }
    };

    let settings = match fields.get("settings") {
        Some(value) if !value.is_null() => {
            SettingsLayer::from_json(value, &format!("{}.settings", context))?
        }
        _ => SettingsLayer::new(),
    };

    let structure = parse_children(
        fields
            .iter()
            .filter(|(key, _)| !matches!(key.as_str(), "type" | "settings")),
        &context,
    )?;

    Ok(ContainerSpec {
        kind,
        settings,
        structure,
    })
}

fn parse_children<'a, I>(entries: I, context: &str) -> Result<Folder>
where
    I: Iterator<Item = (&'a String, &'a Value)>,
{
    let children = entries
        .map(|(key, value)| {
            let child_context = if context.is_empty() {
                key.clone()
            } else {
                format!("{}.{}", context, key)
            };
            Ok((key.clone(), parse_node(value, &child_context)?))
        })
        .collect::<Result<Vec<_>>>()?;
    Ok(Folder { children })
}

fn parse_node(value: &Value, context: &str) -> Result<SpecNode> {
    let fields = value.as_object().ok_or_else(|| Error::SpecParse {
        message: format!("`{}` must be an object node", context),
        hint: Some("Every node needs \"type\": \"folder\" or \"type\": \"generator\"".to_string()),
    })?;

    match fields.get("type").and_then(Value::as_str) {
        Some("folder") => parse_children(
            fields.iter().filter(|(key, _)| key.as_str() != "type"),
            context,
        )
        .map(SpecNode::Folder),
        Some("generator") | Some("schematic") => parse_generator(fields, context).map(SpecNode::Generator),
        Some(other) => Err(Error::SpecParse {
            message: format!("`{}` has unknown node type `{}`", context, other),
            hint: Some("Use \"folder\" or \"generator\"".to_string()),
        }),
        None => Err(Error::SpecParse {
            message: format!("`{}` does not declare a node type", context),
            hint: Some("Add \"type\": \"folder\" or \"type\": \"generator\"".to_string()),
        }),
    }
}

fn parse_generator(fields: &ConfigMap, context: &str) -> Result<GeneratorNode> {
    let mut node = GeneratorNode::default();

    for (key, value) in fields {
        match (key.as_str(), value) {
            ("type", _) => {}
            ("name", Value::String(name)) if !name.is_empty() => node.name = Some(name.clone()),
            ("settings", Value::Object(settings)) => node.settings = settings.clone(),
            ("settings", Value::Null) => {}
            ("instances", Value::Object(instances)) => {
                let instances = instances
                    .iter()
                    .map(|(name, config)| match config {
                        Value::Object(config) => Ok((name.clone(), config.clone())),
                        Value::Null => Ok((name.clone(), ConfigMap::new())),
                        _ => Err(Error::SpecParse {
                            message: format!("`{}.instances.{}` must be an object", context, name),
                            hint: None,
                        }),
                    })
                    .collect::<Result<Vec<_>>>()?;
                node.instances = Some(instances);
            }
            ("name" | "settings" | "instances", other) => {
                return Err(Error::SpecParse {
                    message: format!("`{}.{}` has an invalid value: {}", context, key, other),
                    hint: None,
                })
            }
            (unknown, _) => warn!("Ignoring unknown key `{}` on generator `{}`", unknown, context),
        }
    }

    Ok(node)
}
