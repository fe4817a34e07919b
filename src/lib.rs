//! # Structure Builder Library
//!
//! This library turns a declarative project-structure spec into a dependency
//! graph of generator tasks. It is designed to be used by the
//! `structure-builder` command-line tool but can be embedded by any program
//! that can run the tasks, through the [`dispatcher::Dispatcher`] trait.
//!
//! ## Quick Example
//!
//! ```
//! use structure_builder::dispatcher::PlanDispatcher;
//! use structure_builder::phases::{orchestrator, BuildOptions};
//! use structure_builder::spec;
//! use structure_builder::workspace::WorkspaceManifest;
//!
//! let spec = spec::parse(r#"{
//!     "$schema": "schema.json",
//!     "settings": { "lib1": { "gen": { "alias": "g", "version": "1.0" } } },
//!     "projects": {
//!         "app1": {
//!             "type": "application",
//!             "folderA": { "type": "folder", "x": { "type": "generator", "name": "g" } }
//!         }
//!     }
//! }"#).unwrap();
//!
//! let workspace = WorkspaceManifest::default();
//! let mut dispatcher = PlanDispatcher::for_workspace(&workspace);
//! orchestrator::execute_build(&spec, &workspace, &BuildOptions::default(), &mut dispatcher).unwrap();
//!
//! let tasks = dispatcher.tasks();
//! assert_eq!(tasks.len(), 2);
//! assert_eq!(tasks[1].path, "projects/app1/folderA");
//! assert_eq!(tasks[1].depends_on, vec![tasks[0].id]);
//! ```
//!
//! ## Core Concepts
//!
//! - **Spec (`spec`)**: The typed project-structure document: global
//!   settings, projects with their own settings and folder trees, and a
//!   root-level tree.
//! - **Settings (`settings`)**: Layers of per-operation defaults with short
//!   aliases, and the memoizing [`settings::SettingsResolver`].
//! - **Merging (`merge`)**: How node, project, global and instance
//!   configuration combine into one task configuration.
//! - **Walking (`walker`)**: Expanding a folder tree into tasks and their
//!   dependencies.
//! - **Tasks (`task`, `dispatcher`)**: Declaring validated tasks through a
//!   dispatcher that hands back opaque task ids.
//! - **Phases (`phases`)**: The 5-phase build pipeline.
//!
//! ## Execution Flow
//!
//! The main entry point is `phases::orchestrator::execute_build`:
//!
//! 1.  **Installation**: Check and register the collections in use.
//! 2.  **Creation**: Create the projects the workspace does not have yet.
//! 3.  **Root Expansion**: Expand the root-level tree at `/`.
//! 4.  **Project Expansion**: Expand every project tree at its root.
//! 5.  **Removal**: Uninstall the collections after everything else.

pub mod defaults;
pub mod dispatcher;
pub mod error;
pub mod merge;
pub mod output;
pub mod path;
pub mod phases;
pub mod settings;
pub mod spec;
pub mod suggestions;
pub mod task;
pub mod walker;
pub mod workspace;
