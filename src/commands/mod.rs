//! # CLI Command Implementations
//!
//! This module contains the implementation for each subcommand of the
//! `structure-builder` command-line tool. Each subcommand is defined in its
//! own file.
//!
//! ## Structure
//!
//! Each command module contains:
//! - An `Args` struct that defines the command-specific arguments and options,
//!   derived using `clap`. Shared inputs are flattened in from [`SpecArgs`]
//!   and [`BuildFlags`].
//! - An `execute` function that takes the parsed `Args` and the global
//!   `--color` flag.
//!
//! The helpers below load the inputs every command needs and run a build
//! against the in-memory [`PlanDispatcher`].

use std::path::PathBuf;

use anyhow::{Context, Result};
use clap::Args;
use dialoguer::{theme::ColorfulTheme, Confirm, MultiSelect};
use log::debug;

use structure_builder::defaults::{
    DEFAULT_CONTAINER_COLLECTION, DEFAULT_SPEC_FILE, DEFAULT_WORKSPACE_FILE,
};
use structure_builder::dispatcher::PlanDispatcher;
use structure_builder::phases::orchestrator::{self, BuildReport};
use structure_builder::phases::{self, BuildOptions};
use structure_builder::spec::{self, WorkspaceSpec};
use structure_builder::suggestions;
use structure_builder::workspace::WorkspaceManifest;

pub mod plan;
pub mod tree;
pub mod validate;

/// Where the spec and the workspace manifest come from.
#[derive(Args, Debug, Clone)]
pub struct SpecArgs {
    /// Path to the spec file (JSON, or YAML for `.yaml`/`.yml`).
    #[arg(
        short,
        long,
        value_name = "FILE",
        env = "STRUCTURE_BUILDER_SPEC",
        default_value = DEFAULT_SPEC_FILE
    )]
    pub spec: PathBuf,

    /// Base64-encoded JSON spec. When given, `--spec` is ignored.
    #[arg(long, value_name = "DATA")]
    pub base64: Option<String>,

    /// Path to the workspace manifest listing the existing projects.
    ///
    /// A missing manifest is treated as an empty workspace.
    #[arg(
        short,
        long,
        value_name = "FILE",
        env = "STRUCTURE_BUILDER_WORKSPACE",
        default_value = DEFAULT_WORKSPACE_FILE
    )]
    pub workspace: PathBuf,
}

/// Switches for the optional bookkeeping phases.
#[derive(Args, Debug, Clone)]
pub struct BuildFlags {
    /// Declare a task installing the collections the spec uses.
    #[arg(long)]
    pub install: bool,

    /// Declare a task registering the collections in the workspace.
    #[arg(long)]
    pub register: bool,

    /// Declare a final task uninstalling the collections.
    #[arg(long)]
    pub uninstall: bool,

    /// Ask which collections to install and whether to remove them afterwards.
    #[arg(short, long)]
    pub interactive: bool,

    /// Collection used to create missing projects. It is never installed.
    #[arg(long, value_name = "COLLECTION", default_value = DEFAULT_CONTAINER_COLLECTION)]
    pub container_collection: String,

    /// Project passed to root-level generators.
    #[arg(long, value_name = "NAME")]
    pub project: Option<String>,
}

impl Default for BuildFlags {
    fn default() -> Self {
        Self {
            install: false,
            register: false,
            uninstall: false,
            interactive: false,
            container_collection: DEFAULT_CONTAINER_COLLECTION.to_string(),
            project: None,
        }
    }
}

/// Load the spec from `--base64` or from the spec file.
pub fn load_spec(args: &SpecArgs) -> Result<WorkspaceSpec> {
    if let Some(encoded) = &args.base64 {
        debug!("Reading the spec from --base64");
        return spec::parse_base64(encoded).context("Failed to decode the --base64 spec");
    }

    if !args.spec.exists() {
        return Err(suggestions::spec_not_found(&args.spec));
    }
    spec::from_file(&args.spec)
        .with_context(|| format!("Failed to load spec from {}", args.spec.display()))
}

pub fn load_workspace(args: &SpecArgs) -> Result<WorkspaceManifest> {
    WorkspaceManifest::load(&args.workspace).with_context(|| {
        format!(
            "Failed to load workspace manifest from {}",
            args.workspace.display()
        )
    })
}

/// Turn the flags into [`BuildOptions`], prompting when `--interactive`.
pub fn build_options(flags: &BuildFlags, spec: &WorkspaceSpec) -> Result<BuildOptions> {
    let mut options = BuildOptions {
        install_collections: flags.install,
        register_collections: flags.register,
        uninstall_collections: flags.uninstall,
        container_collection: flags.container_collection.clone(),
        ignored_packages: vec![flags.container_collection.clone()],
        project_name: flags.project.clone(),
        ..BuildOptions::default()
    };

    if flags.interactive {
        prompt_options(&mut options, spec)?;
    }
    Ok(options)
}

fn prompt_options(options: &mut BuildOptions, spec: &WorkspaceSpec) -> Result<()> {
    let names: Vec<String> = phases::packages(&spec.settings, options)
        .into_iter()
        .map(|package| package.package_name)
        .collect();
    if names.is_empty() {
        return Ok(());
    }

    let theme = ColorfulTheme::default();
    options.install_collections = Confirm::with_theme(&theme)
        .with_prompt("Install the collections used by this spec?")
        .default(true)
        .interact()?;
    if !options.install_collections {
        return Ok(());
    }

    let chosen = MultiSelect::with_theme(&theme)
        .with_prompt("Which collections should be installed?")
        .items(&names)
        .defaults(&vec![true; names.len()])
        .interact()?;
    options.ignored_packages.extend(
        names
            .iter()
            .enumerate()
            .filter(|(index, _)| !chosen.contains(index))
            .map(|(_, name)| name.clone()),
    );
    options.register_collections = true;

    options.uninstall_collections = Confirm::with_theme(&theme)
        .with_prompt("Uninstall them once the structure is generated?")
        .default(false)
        .interact()?;
    Ok(())
}

/// Run a complete build into a fresh [`PlanDispatcher`].
pub fn run_build(
    spec: &WorkspaceSpec,
    workspace: &WorkspaceManifest,
    options: &BuildOptions,
) -> Result<(PlanDispatcher, BuildReport)> {
    let mut dispatcher = PlanDispatcher::for_workspace(workspace);
    let report = orchestrator::execute_build(spec, workspace, options, &mut dispatcher)
        .map_err(|e| suggestions::explain(e, spec))?;
    Ok((dispatcher, report))
}
