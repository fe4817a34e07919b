//! # Tree Command Implementation
//!
//! This module implements the `tree` subcommand, which displays the task
//! plan of a spec grouped by build phase, with project tasks grouped per
//! project.
//!
//! This command is a safe, read-only operation that does not modify any files.

use std::borrow::Cow;
use std::collections::HashSet;

use anyhow::Result;
use clap::Args;
use ptree::{print_tree, TreeItem};

use structure_builder::dispatcher::{PlanDispatcher, TaskId};
use structure_builder::output::OutputConfig;
use structure_builder::phases::orchestrator::BuildReport;

use super::{BuildFlags, SpecArgs};

/// Display the task plan as a tree
#[derive(Args, Debug)]
pub struct TreeArgs {
    #[command(flatten)]
    pub input: SpecArgs,

    #[command(flatten)]
    pub build: BuildFlags,

    /// Maximum depth to display in the tree.
    ///
    /// Use 0 to show only the root, 1 to show the phases, etc.
    #[arg(long, value_name = "NUM")]
    pub depth: Option<usize>,
}

/// Execute the `tree` command.
pub fn execute(args: TreeArgs, color_flag: &str) -> Result<()> {
    let out = OutputConfig::from_env_and_flag(color_flag);
    let spec = super::load_spec(&args.input)?;
    let workspace = super::load_workspace(&args.input)?;
    let options = super::build_options(&args.build, &spec)?;
    let (dispatcher, report) = super::run_build(&spec, &workspace, &options)?;

    let tree = build_tree(&out, &dispatcher, &report);
    let tree = prune(tree, args.depth.unwrap_or(usize::MAX));
    print_tree(&tree).map_err(|e| anyhow::anyhow!("Failed to display tree: {}", e))?;

    Ok(())
}

/// Group the declared tasks by the phase that declared them.
fn build_tree(out: &OutputConfig, dispatcher: &PlanDispatcher, report: &BuildReport) -> TreeNode {
    let install: HashSet<&TaskId> = report.install.iter().collect();
    let containers: HashSet<&TaskId> = report.containers.iter().collect();

    let mut projects: Vec<(String, Vec<TreeNode>)> = Vec::new();
    for id in report.expansion.iter().filter(|id| !containers.contains(id)) {
        let Some(task) = dispatcher.task(*id) else {
            continue;
        };
        let project = task
            .config
            .get("project")
            .and_then(|value| value.as_str())
            .unwrap_or("?")
            .to_string();
        let leaf = TreeNode::leaf(super::plan::render_task(out, task));
        match projects.iter_mut().find(|(name, _)| *name == project) {
            Some((_, tasks)) => tasks.push(leaf),
            None => projects.push((project, vec![leaf])),
        }
    }

    let phases = vec![
        TreeNode::branch("install", leaves(out, dispatcher, report.install.iter())),
        TreeNode::branch(
            "create projects",
            leaves(
                out,
                dispatcher,
                report.containers.iter().filter(|id| !install.contains(id)),
            ),
        ),
        TreeNode::branch(
            "root",
            leaves(
                out,
                dispatcher,
                report.root.iter().filter(|id| !containers.contains(id)),
            ),
        ),
        TreeNode::branch(
            "projects",
            projects
                .into_iter()
                .map(|(name, tasks)| TreeNode::branch(&out.name(&name), tasks))
                .collect(),
        ),
        TreeNode::branch("cleanup", leaves(out, dispatcher, report.cleanup.iter())),
    ];

    TreeNode::branch(
        &format!("{} task(s)", report.tasks_declared),
        phases.into_iter().filter(|phase| !phase.children.is_empty()).collect(),
    )
}

fn leaves<'a>(
    out: &OutputConfig,
    dispatcher: &PlanDispatcher,
    ids: impl Iterator<Item = &'a TaskId>,
) -> Vec<TreeNode> {
    ids.filter_map(|id| dispatcher.task(*id))
        .map(|task| TreeNode::leaf(super::plan::render_task(out, task)))
        .collect()
}

/// Cut the tree below `max_depth`.
fn prune(node: TreeNode, max_depth: usize) -> TreeNode {
    if max_depth == 0 {
        return TreeNode::leaf(node.label);
    }
    TreeNode {
        label: node.label,
        children: node
            .children
            .into_iter()
            .map(|child| prune(child, max_depth - 1))
            .collect(),
    }
}

/// Tree node structure for ptree visualization
#[derive(Clone, Debug, PartialEq)]
struct TreeNode {
    label: String,
    children: Vec<TreeNode>,
}

impl TreeNode {
    fn leaf(label: String) -> Self {
        Self {
            label,
            children: vec![],
        }
    }

    fn branch(label: &str, children: Vec<TreeNode>) -> Self {
        Self {
            label: label.to_string(),
            children,
        }
    }
}

impl TreeItem for TreeNode {
    type Child = TreeNode;

    fn write_self<W: std::io::Write>(&self, f: &mut W, _style: &ptree::Style) -> std::io::Result<()> {
        write!(f, "{}", self.label)
    }

    fn children(&self) -> Cow<'_, [Self::Child]> {
        Cow::Borrowed(&self.children)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use structure_builder::phases::BuildOptions;
    use structure_builder::spec;
    use structure_builder::workspace::WorkspaceManifest;

    fn labels(node: &TreeNode) -> Vec<String> {
        node.children.iter().map(|child| child.label.clone()).collect()
    }

    #[test]
    fn test_tree_groups_by_phase_and_project() {
        let spec = spec::parse(
            r#"{
                "$schema": "s",
                "settings": { "lib": { "gen": { "alias": "g" } } },
                "env": { "type": "generator", "name": "g" },
                "projects": {
                    "app1": { "type": "application", "a": { "type": "generator", "name": "g" } },
                    "app2": { "type": "application", "b": { "type": "generator", "name": "g" } }
                }
            }"#,
        )
        .unwrap();
        let workspace = WorkspaceManifest::default();
        let (dispatcher, report) =
            crate::commands::run_build(&spec, &workspace, &BuildOptions::default()).unwrap();

        let out = OutputConfig::from_env_and_flag("never");
        let tree = build_tree(&out, &dispatcher, &report);
        assert_eq!(tree.label, "5 task(s)");
        assert_eq!(labels(&tree), vec!["create projects", "root", "projects"]);
        assert_eq!(
            labels(&tree.children[1]),
            vec!["#3 lib:gen @ / <- [#1, #2]"]
        );

        let projects = &tree.children[2];
        assert_eq!(labels(projects), vec!["app1", "app2"]);
        assert_eq!(
            labels(&projects.children[0]),
            vec!["#4 lib:gen @ projects/app1 <- [#1, #2]"]
        );
    }

    #[test]
    fn test_prune_depth() {
        let tree = TreeNode::branch(
            "root",
            vec![TreeNode::branch("phase", vec![TreeNode::leaf("task".to_string())])],
        );
        let pruned = prune(tree.clone(), 1);
        assert_eq!(labels(&pruned), vec!["phase"]);
        assert!(pruned.children[0].children.is_empty());
        assert!(prune(tree.clone(), 0).children.is_empty());
        assert_eq!(prune(tree.clone(), usize::MAX), tree);
    }
}
