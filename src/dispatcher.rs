//! # Dispatcher Interface
//!
//! The dispatcher is the only door between graph construction and the world
//! that actually runs generators. It offers exactly two capabilities:
//!
//! - `submit` accepts a fully resolved task and hands back an opaque
//!   [`TaskId`]
//! - `container_exists` answers whether a project is already present
//!
//! Any scheduler can stand behind the trait (a thread pool, an actor system,
//! an external queue). [`PlanDispatcher`] is the in-memory implementation used
//! by the CLI and the tests. It records every task in submission order and
//! refuses dependencies on ids it never issued.

use std::collections::HashSet;
use std::fmt;

use serde::Serialize;

use crate::error::{Error, Result};
use crate::settings::ConfigMap;
use crate::workspace::WorkspaceManifest;

/// Opaque identifier issued by a dispatcher.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize)]
#[serde(transparent)]
pub struct TaskId(u64);

impl TaskId {
    /// For dispatcher implementations only; the builder never mints ids.
    pub fn new(raw: u64) -> Self {
        Self(raw)
    }

    pub fn get(self) -> u64 {
        self.0
    }
}

impl fmt::Display for TaskId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "#{}", self.0)
    }
}

/// A fully resolved task, before the dispatcher has assigned it an id.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct TaskRequest {
    pub collection: String,
    pub operation: String,
    pub path: String,
    pub config: ConfigMap,
    pub depends_on: Vec<TaskId>,
}

/// A submitted task.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct TaskDescriptor {
    pub id: TaskId,
    pub collection: String,
    pub operation: String,
    pub path: String,
    pub config: ConfigMap,
    pub depends_on: Vec<TaskId>,
}

impl TaskDescriptor {
    fn from_request(id: TaskId, request: TaskRequest) -> Self {
        Self {
            id,
            collection: request.collection,
            operation: request.operation,
            path: request.path,
            config: request.config,
            depends_on: request.depends_on,
        }
    }
}

impl fmt::Display for TaskDescriptor {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "{} {}:{} @ {}",
            self.id, self.collection, self.operation, self.path
        )?;
        if !self.depends_on.is_empty() {
            let deps: Vec<String> = self.depends_on.iter().map(TaskId::to_string).collect();
            write!(f, " <- [{}]", deps.join(", "))?;
        }
        Ok(())
    }
}

/// What graph construction needs from the execution environment.
pub trait Dispatcher {
    /// Accept a task and return the id later tasks may depend on.
    fn submit(&mut self, request: TaskRequest) -> Result<TaskId>;

    /// Whether a project named `name` already exists.
    fn container_exists(&self, name: &str) -> bool;
}

/// In-memory dispatcher that records the declared plan.
#[derive(Debug, Default)]
pub struct PlanDispatcher {
    existing: HashSet<String>,
    tasks: Vec<TaskDescriptor>,
}

impl PlanDispatcher {
    pub fn new() -> Self {
        Self::default()
    }

    /// A dispatcher whose existing projects are the ones in `manifest`.
    pub fn for_workspace(manifest: &WorkspaceManifest) -> Self {
        Self {
            existing: manifest.project_names().map(str::to_string).collect(),
            tasks: Vec::new(),
        }
    }

    /// Mark a project as already present.
    pub fn with_existing(mut self, name: impl Into<String>) -> Self {
        self.existing.insert(name.into());
        self
    }

    /// Tasks in submission order
    pub fn tasks(&self) -> &[TaskDescriptor] {
        &self.tasks
    }

    pub fn task(&self, id: TaskId) -> Option<&TaskDescriptor> {
        self.tasks.iter().find(|task| task.id == id)
    }

    pub fn into_tasks(self) -> Vec<TaskDescriptor> {
        self.tasks
    }
}

impl Dispatcher for PlanDispatcher {
    fn submit(&mut self, request: TaskRequest) -> Result<TaskId> {
        let next = TaskId::new(self.tasks.len() as u64 + 1);
        if let Some(unknown) = request
            .depends_on
            .iter()
            .find(|dep| dep.get() == 0 || **dep >= next)
        {
            return Err(Error::Dispatch {
                message: format!(
                    "{}:{} depends on {}, which was never issued",
                    request.collection, request.operation, unknown
                ),
            });
        }
        self.tasks.push(TaskDescriptor::from_request(next, request));
        Ok(next)
    }

    fn container_exists(&self, name: &str) -> bool {
        self.existing.contains(name)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn request(depends_on: Vec<TaskId>) -> TaskRequest {
        TaskRequest {
            collection: "lib".to_string(),
            operation: "gen".to_string(),
            path: "/".to_string(),
            config: ConfigMap::new(),
            depends_on,
        }
    }

    #[test]
    fn test_ids_are_sequential() {
        let mut dispatcher = PlanDispatcher::new();
        let first = dispatcher.submit(request(vec![])).unwrap();
        let second = dispatcher.submit(request(vec![first])).unwrap();
        assert_eq!(first.get(), 1);
        assert_eq!(second.get(), 2);
        assert_eq!(dispatcher.tasks().len(), 2);
        assert_eq!(dispatcher.task(second).unwrap().depends_on, vec![first]);
    }

    #[test]
    fn test_forward_reference_rejected() {
        let mut dispatcher = PlanDispatcher::new();
        let result = dispatcher.submit(request(vec![TaskId::new(1)]));
        assert!(matches!(result, Err(Error::Dispatch { .. })));
        assert!(dispatcher.tasks().is_empty());
    }

    #[test]
    fn test_unissued_id_rejected() {
        let mut dispatcher = PlanDispatcher::new();
        let first = dispatcher.submit(request(vec![])).unwrap();
        let result = dispatcher.submit(request(vec![first, TaskId::new(0)]));
        assert!(matches!(result, Err(Error::Dispatch { .. })));
        assert_eq!(dispatcher.tasks().len(), 1);
    }

    #[test]
    fn test_container_exists() {
        let dispatcher = PlanDispatcher::new().with_existing("app1");
        assert!(dispatcher.container_exists("app1"));
        assert!(!dispatcher.container_exists("app2"));
    }

    #[test]
    fn test_descriptor_display() {
        let mut dispatcher = PlanDispatcher::new();
        let first = dispatcher.submit(request(vec![])).unwrap();
        dispatcher.submit(request(vec![first])).unwrap();
        let rendered: Vec<String> = dispatcher.tasks().iter().map(ToString::to_string).collect();
        assert_eq!(rendered[0], "#1 lib:gen @ /");
        assert_eq!(rendered[1], "#2 lib:gen @ / <- [#1]");
    }
}
