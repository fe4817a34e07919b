//! Orchestrator for a complete structure build
//!
//! This module runs the 5 phases in order against one dispatcher and
//! reports which tasks each phase declared.

use log::info;
use serde::Serialize;

use super::{phase1, phase2, phase3, phase4, phase5, BuildOptions};
use crate::dispatcher::{Dispatcher, TaskId};
use crate::error::Result;
use crate::settings::SettingsResolver;
use crate::spec::WorkspaceSpec;
use crate::task::TaskGraphBuilder;
use crate::workspace::WorkspaceManifest;

/// What each phase declared.
///
/// `containers` and `root` include the ids they inherited, so they can be
/// handed on as dependencies unchanged.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct BuildReport {
    pub install: Vec<TaskId>,
    pub containers: Vec<TaskId>,
    pub root: Vec<TaskId>,
    pub expansion: Vec<TaskId>,
    pub cleanup: Option<TaskId>,
    /// Total number of tasks submitted by the build
    pub tasks_declared: usize,
}

/// Execute a complete build (Phases 1-5)
///
/// 1. Declare package installation and registration
/// 2. Declare creation of missing projects, after phase 1
/// 3. Expand the root tree at `/`, after phase 2
/// 4. Expand every project tree at its root, after phase 2
/// 5. Declare package removal, after phases 3 and 4
///
/// Settings lookups are memoized for the duration of this call only. The
/// first error aborts the build; tasks already submitted stay submitted.
pub fn execute_build(
    spec: &WorkspaceSpec,
    workspace: &WorkspaceManifest,
    options: &BuildOptions,
    dispatcher: &mut dyn Dispatcher,
) -> Result<BuildReport> {
    let mut builder = TaskGraphBuilder::new(dispatcher);
    let mut resolver = SettingsResolver::new();

    // Phase 1: Package Installation
    let install = phase1::execute(spec, options, &mut builder)?;
    info!("Phase 1 declared {} package task(s)", install.len());

    // Phase 2: Container Creation
    let containers = phase2::execute(spec, options, &mut builder, &install)?;
    info!(
        "Phase 2 declared {} project creation task(s)",
        containers.len() - install.len()
    );

    // Phase 3: Root Expansion
    let root = phase3::execute(spec, options, &mut resolver, &mut builder, &containers)?;
    info!(
        "Phase 3 declared {} root task(s)",
        root.len() - containers.len()
    );

    // Phase 4: Container Expansion
    let expansion = phase4::execute(spec, workspace, &mut resolver, &mut builder, &containers)?;
    info!("Phase 4 expanded {} project(s)", spec.projects.len());

    // Phase 5: Package Removal
    let upstream = [root.as_slice(), expansion.as_slice()].concat();
    let cleanup = phase5::execute(spec, options, &mut builder, &upstream)?;

    info!(
        "Build declared {} task(s) with {} settings scan(s)",
        builder.created(),
        resolver.scan_count()
    );

    Ok(BuildReport {
        install,
        containers,
        root,
        expansion,
        cleanup,
        tasks_declared: builder.created(),
    })
}
