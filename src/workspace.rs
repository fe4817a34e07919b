//! # Workspace Manifest
//!
//! The workspace manifest lists the projects that already exist and where
//! new ones are created:
//!
//! ```json
//! {
//!   "newProjectRoot": "projects",
//!   "projects": {
//!     "shell": { "root": "" },
//!     "admin": { "root": "projects/admin" }
//!   }
//! }
//! ```
//!
//! A project's root is its declared `root`. A project that is not listed
//! yet will be created under `<newProjectRoot>/<name>`. A missing manifest
//! file is treated as an empty workspace.

use std::collections::BTreeMap;
use std::path::Path;

use log::debug;
use serde::Deserialize;

use crate::defaults::DEFAULT_NEW_PROJECT_ROOT;
use crate::error::{Error, Result};

/// One project entry of the manifest. Keys other than `root` are ignored.
#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ProjectEntry {
    #[serde(default)]
    pub root: Option<String>,
}

/// The parts of the workspace manifest graph construction cares about.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct WorkspaceManifest {
    #[serde(default = "default_new_project_root")]
    pub new_project_root: String,
    #[serde(default)]
    pub projects: BTreeMap<String, ProjectEntry>,
}

fn default_new_project_root() -> String {
    DEFAULT_NEW_PROJECT_ROOT.to_string()
}

impl Default for WorkspaceManifest {
    fn default() -> Self {
        Self {
            new_project_root: default_new_project_root(),
            projects: BTreeMap::new(),
        }
    }
}

impl WorkspaceManifest {
    /// Parse a manifest from JSON.
    pub fn parse(content: &str) -> Result<Self> {
        serde_json::from_str(content).map_err(|e| Error::Workspace {
            message: e.to_string(),
        })
    }

    /// Load a manifest from disk, or an empty workspace if the file is absent.
    pub fn load<P: AsRef<Path>>(path: P) -> Result<Self> {
        let path = path.as_ref();
        if !path.exists() {
            debug!(
                "No workspace manifest at {}, assuming an empty workspace",
                path.display()
            );
            return Ok(Self::default());
        }
        let content = std::fs::read_to_string(path)?;
        Self::parse(&content)
    }

    pub fn contains(&self, name: &str) -> bool {
        self.projects.contains_key(name)
    }

    pub fn project_names(&self) -> impl Iterator<Item = &str> {
        self.projects.keys().map(String::as_str)
    }

    /// Where the tree of project `name` is expanded.
    pub fn project_root(&self, name: &str) -> String {
        match self.projects.get(name).and_then(|p| p.root.as_ref()) {
            Some(root) => root.clone(),
            None => format!("{}/{}", self.new_project_root.trim_end_matches('/'), name),
        }
    }
}
