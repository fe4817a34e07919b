//! # Validate Command Implementation
//!
//! This module implements the `validate` subcommand, which checks a spec
//! without printing a plan.
//!
//! ## Functionality
//!
//! - **Spec Validation**: Parses the spec and checks its shape, including the
//!   `$schema` marker and node types.
//! - **Resolution Check**: Runs a complete build against the in-memory
//!   dispatcher, which resolves every alias and checks that every project
//!   to be created declares a type.
//! - **Warnings**: Projects without any structure are reported; `--strict`
//!   turns them into a failure.
//!
//! This command is a safe, read-only operation that does not modify any files.

use anyhow::Result;
use clap::Args;

use structure_builder::output::{OutputConfig, Status};
use structure_builder::phases::BuildOptions;

use super::SpecArgs;

/// Validate a project-structure spec
#[derive(Args, Debug)]
pub struct ValidateArgs {
    #[command(flatten)]
    pub input: SpecArgs,

    /// Use strict validation (fail on warnings).
    #[arg(long)]
    pub strict: bool,
}

/// Execute the `validate` command.
pub fn execute(args: ValidateArgs, color_flag: &str) -> Result<()> {
    let out = OutputConfig::from_env_and_flag(color_flag);
    let source = match &args.input.base64 {
        Some(_) => "--base64".to_string(),
        None => args.input.spec.display().to_string(),
    };
    println!("{} Validating spec: {}", out.marker(Status::Scan), source);

    let spec = match super::load_spec(&args.input) {
        Ok(spec) => {
            println!("{} Spec parsed successfully", out.marker(Status::Ok));
            spec
        }
        Err(e) => {
            println!("{} Spec parsing failed: {:#}", out.marker(Status::Err), e);
            return Err(e.context("Spec validation failed"));
        }
    };
    let workspace = super::load_workspace(&args.input)?;

    println!("\n{} Spec Summary:", out.marker(Status::Info));
    println!("   Settings collections: {}", spec.settings.len());
    println!("   Projects: {}", spec.projects.len());
    println!("   Generator tasks: {}", spec.generator_task_count());

    let mut has_warnings = false;
    for (name, project) in &spec.projects {
        if project.structure.is_empty() {
            println!(
                "{} Project `{}` declares no structure",
                out.marker(Status::Warn),
                name
            );
            has_warnings = true;
        }
    }

    println!(
        "\n{} Resolving generators...",
        out.marker(Status::Scan)
    );
    match super::run_build(&spec, &workspace, &BuildOptions::default()) {
        Ok((_, report)) => println!(
            "{} All generators resolved ({} task(s))",
            out.marker(Status::Ok),
            report.tasks_declared
        ),
        Err(e) => {
            println!("{} {}", out.marker(Status::Err), e);
            return Err(e.context("Spec validation failed"));
        }
    }

    if has_warnings && args.strict {
        println!(
            "{} Spec has warnings (strict mode enabled)",
            out.marker(Status::Err)
        );
        return Err(anyhow::anyhow!("Spec validation failed in strict mode"));
    }

    if has_warnings {
        println!("{} Spec is valid but has warnings", out.marker(Status::Warn));
    } else {
        println!("{} Spec is valid", out.marker(Status::Ok));
    }

    Ok(())
}
