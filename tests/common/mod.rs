//! Shared test utilities for integration and E2E tests.
//!
//! ## Usage
//!
//! Add `mod common;` to your test file, then use the helpers:
//!
//! ```rust,ignore
//! mod common;
//! use common::prelude::*;
//!
//! #[test]
//! fn test_example() {
//!     let fixture = TestFixture::new().with_spec(specs::SINGLE_PROJECT);
//!     fixture.command().arg("plan").assert().success();
//! }
//! ```

use assert_fs::prelude::*;
use std::path::{Path, PathBuf};

/// Re-export commonly used test dependencies for convenience.
pub mod prelude {
    #[allow(unused_imports)]
    pub use assert_cmd::cargo::cargo_bin_cmd;
    pub use assert_fs::prelude::*;
    pub use predicates::prelude::*;

    #[allow(unused_imports)]
    pub use super::specs;
    pub use super::TestFixture;
}

/// Spec documents shared by the tests.
#[allow(dead_code)]
pub mod specs {
    /// One project to create, with one aliased generator in a folder.
    pub const SINGLE_PROJECT: &str = r#"{
  "$schema": "./node_modules/structure-builder/schema.json",
  "settings": { "lib1": { "gen": { "alias": "g", "version": "1.0" } } },
  "projects": {
    "app1": {
      "type": "application",
      "folderA": { "type": "folder", "x": { "type": "generator", "name": "g" } }
    }
  }
}"#;

    /// Global and project layers, instances and a root-level generator.
    pub const LAYERED: &str = r#"{
  "$schema": "./node_modules/structure-builder/schema.json",
  "settings": {
    "@schematics/angular": { "component": { "alias": "c", "style": "scss" } },
    "@lib/ui": { "version": "2.0.0", "button": { "alias": "btn" } }
  },
  "environment": { "type": "generator", "name": "@lib/ui:env" },
  "projects": {
    "shell": {
      "settings": { "@schematics/angular": { "component": { "alias": "pc", "flat": true } } },
      "src": {
        "type": "folder",
        "header": { "type": "generator", "name": "pc" },
        "widgets": {
          "type": "folder",
          "buttons": { "type": "generator", "name": "btn", "instances": { "ok": {}, "cancel": { "danger": true } } }
        }
      }
    }
  }
}"#;

    /// Same shape as `SINGLE_PROJECT`, as YAML.
    pub const SINGLE_PROJECT_YAML: &str = r#"
$schema: ./node_modules/structure-builder/schema.json
settings:
  lib1:
    gen:
      alias: g
      version: "1.0"
projects:
  app1:
    type: application
    folderA:
      type: folder
      x:
        type: generator
        name: g
"#;

    /// A manifest where `shell` already exists at the workspace root.
    pub const SHELL_WORKSPACE: &str = r#"{ "newProjectRoot": "projects", "projects": { "shell": { "root": "" } } }"#;

    /// Missing `$schema`.
    pub const NO_SCHEMA: &str = r#"{ "settings": {} }"#;

    /// A generator whose name is close to, but not, a declared alias.
    pub const TYPO_ALIAS: &str = r#"{
  "$schema": "s",
  "settings": { "lib": { "component": { "alias": "cmp" } } },
  "header": { "type": "generator", "name": "cmpp" }
}"#;

    /// A project that does not exist and cannot be created.
    pub const UNTYPED_PROJECT: &str = r#"{
  "$schema": "s",
  "projects": { "app2": { "x": { "type": "generator", "name": "lib:gen" } } }
}"#;
}

/// A temporary workspace with an optional spec and manifest.
#[allow(dead_code)]
pub struct TestFixture {
    temp_dir: assert_fs::TempDir,
}

#[allow(dead_code)]
impl TestFixture {
    /// Create a new test fixture with an empty temporary directory.
    pub fn new() -> Self {
        Self {
            temp_dir: assert_fs::TempDir::new().expect("Failed to create temp directory"),
        }
    }

    /// Write `project-structure.json` with the given content.
    pub fn with_spec(self, content: &str) -> Self {
        self.with_file("project-structure.json", content)
    }

    /// Write `workspace.json` with the given content.
    pub fn with_workspace(self, content: &str) -> Self {
        self.with_file("workspace.json", content)
    }

    /// Add a file with the given path and content.
    pub fn with_file(self, path: &str, content: &str) -> Self {
        self.temp_dir
            .child(path)
            .write_str(content)
            .expect("Failed to write file");
        self
    }

    /// Get the path to the temporary directory.
    pub fn path(&self) -> &Path {
        self.temp_dir.path()
    }

    pub fn spec_path(&self) -> PathBuf {
        self.temp_dir.path().join("project-structure.json")
    }

    /// Create a command running in this fixture's directory.
    ///
    /// Environment variables that would redirect the inputs are cleared.
    pub fn command(&self) -> assert_cmd::Command {
        let mut cmd = assert_cmd::cargo::cargo_bin_cmd!("structure-builder");
        cmd.current_dir(self.path())
            .env_remove("STRUCTURE_BUILDER_SPEC")
            .env_remove("STRUCTURE_BUILDER_WORKSPACE")
            .env_remove("RUST_LOG");
        cmd
    }
}

impl Default for TestFixture {
    fn default() -> Self {
        Self::new()
    }
}
