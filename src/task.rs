//! Task declaration on top of a [`Dispatcher`].
//!
//! [`TaskGraphBuilder`] validates a resolved task and submits it. Because a
//! task can only depend on ids the dispatcher already returned, the graph is
//! acyclic by construction order alone.

use std::collections::HashSet;
use std::hash::Hash;

use log::debug;

use crate::dispatcher::{Dispatcher, TaskId, TaskRequest};
use crate::error::{Error, Result};
use crate::settings::ConfigMap;

/// Declares tasks through a borrowed dispatcher.
pub struct TaskGraphBuilder<'d> {
    dispatcher: &'d mut dyn Dispatcher,
    created: usize,
}

impl<'d> TaskGraphBuilder<'d> {
    pub fn new(dispatcher: &'d mut dyn Dispatcher) -> Self {
        Self {
            dispatcher,
            created: 0,
        }
    }

    /// Validate and submit one task.
    ///
    /// Fails with [`Error::Configuration`] when the collection or the
    /// operation is empty.
    pub fn create_task(
        &mut self,
        collection: &str,
        operation: &str,
        path: &str,
        config: ConfigMap,
        depends_on: &[TaskId],
    ) -> Result<TaskId> {
        if collection.is_empty() {
            return Err(Error::Configuration {
                field: "collection".to_string(),
                message: format!("Collection is not defined for the task at `{}`", path),
            });
        }
        if operation.is_empty() {
            return Err(Error::Configuration {
                field: "operation".to_string(),
                message: format!(
                    "Operation name is not defined for collection `{}` at `{}`",
                    collection, path
                ),
            });
        }

        let id = self.dispatcher.submit(TaskRequest {
            collection: collection.to_string(),
            operation: operation.to_string(),
            path: path.to_string(),
            config,
            depends_on: depends_on.to_vec(),
        })?;
        self.created += 1;
        debug!(
            "Declared {} {}:{} at {} ({} dependencies)",
            id,
            collection,
            operation,
            path,
            depends_on.len()
        );
        Ok(id)
    }

    pub fn container_exists(&self, name: &str) -> bool {
        self.dispatcher.container_exists(name)
    }

    /// Number of tasks submitted through this builder
    pub fn created(&self) -> usize {
        self.created
    }
}

/// Drop repeated ids, keeping the first occurrence of each.
///
/// ```
/// use structure_builder::task::dedupe;
///
/// assert_eq!(dedupe(&[1, 2, 1, 3]), vec![1, 2, 3]);
/// ```
pub fn dedupe<T: Eq + Hash + Clone>(ids: &[T]) -> Vec<T> {
    let mut seen = HashSet::with_capacity(ids.len());
    ids.iter()
        .filter(|id| seen.insert((*id).clone()))
        .cloned()
        .collect()
}
