//! # Plan Command Implementation
//!
//! Builds the task graph for a spec against the in-memory dispatcher and
//! prints every declared task in submission order, either as text or as
//! JSON for other tools to execute.
//!
//! This command never runs a generator and never writes to the workspace.

use anyhow::Result;
use clap::{Args, ValueEnum};
use serde::Serialize;

use structure_builder::dispatcher::TaskDescriptor;
use structure_builder::output::{OutputConfig, Status};
use structure_builder::phases::orchestrator::BuildReport;

use super::{BuildFlags, SpecArgs};

/// Print the tasks a spec expands to
#[derive(Args, Debug)]
pub struct PlanArgs {
    #[command(flatten)]
    pub input: SpecArgs,

    #[command(flatten)]
    pub build: BuildFlags,

    /// Output format.
    #[arg(long, value_enum, default_value_t = PlanFormat::Text)]
    pub format: PlanFormat,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
pub enum PlanFormat {
    Text,
    Json,
}

/// JSON document printed by `--format json`.
#[derive(Serialize)]
struct PlanDocument<'a> {
    tasks: &'a [TaskDescriptor],
    report: &'a BuildReport,
}

/// Execute the `plan` command.
pub fn execute(args: PlanArgs, color_flag: &str) -> Result<()> {
    let spec = super::load_spec(&args.input)?;
    let workspace = super::load_workspace(&args.input)?;
    let options = super::build_options(&args.build, &spec)?;
    let (dispatcher, report) = super::run_build(&spec, &workspace, &options)?;

    match args.format {
        PlanFormat::Json => {
            let document = PlanDocument {
                tasks: dispatcher.tasks(),
                report: &report,
            };
            println!("{}", serde_json::to_string_pretty(&document)?);
        }
        PlanFormat::Text => {
            let out = OutputConfig::from_env_and_flag(color_flag);
            print!("{}", render_text(&out, dispatcher.tasks()));
            println!(
                "\n{} {} task(s) declared",
                out.marker(Status::Ok),
                report.tasks_declared
            );
        }
    }

    Ok(())
}

/// One line per task: id, `collection:operation`, path, dependencies.
pub fn render_text(out: &OutputConfig, tasks: &[TaskDescriptor]) -> String {
    let mut text = String::new();
    for task in tasks {
        text.push_str(&render_task(out, task));
        text.push('\n');
    }
    text
}

pub fn render_task(out: &OutputConfig, task: &TaskDescriptor) -> String {
    let mut line = format!(
        "{} {} @ {}",
        task.id,
        out.name(&format!("{}:{}", task.collection, task.operation)),
        task.path
    );
    if !task.depends_on.is_empty() {
        let deps: Vec<String> = task.depends_on.iter().map(ToString::to_string).collect();
        line.push(' ');
        line.push_str(&out.dim(&format!("<- [{}]", deps.join(", "))));
    }
    line
}
