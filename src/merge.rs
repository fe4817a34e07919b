//! Configuration merging for generator tasks.
//!
//! A generator task's configuration is assembled from up to four sources.
//! Keys from later sources replace keys from earlier ones:
//!
//! 1. the node's own inline `settings`
//! 2. the entry resolved from the container's settings layer
//! 3. the entry resolved from the global settings layer
//! 4. the per-instance override, when the node declares `instances`
//!
//! The global layer deliberately beats the container layer, which beats the
//! node. Instance overrides beat everything.

use serde_json::Value;

use crate::settings::{ConfigMap, ResolvedSettings};

/// Merge node-local, container-scope and global-scope configuration.
pub fn merge(
    node_local: &ConfigMap,
    scope: Option<&ResolvedSettings>,
    global: Option<&ResolvedSettings>,
) -> ConfigMap {
    let mut merged = node_local.clone();
    for layer in [scope, global].into_iter().flatten() {
        overlay(&mut merged, &layer.config);
    }
    merged
}

/// Apply a named instance on top of an already merged configuration.
///
/// The instance name is written under `name` first, so the instance's own
/// configuration can still replace it.
pub fn merge_instance(base: &ConfigMap, instance_name: &str, instance: &ConfigMap) -> ConfigMap {
    let mut merged = base.clone();
    merged.insert("name".to_string(), Value::String(instance_name.to_string()));
    overlay(&mut merged, instance);
    merged
}

/// Shallow key-wise overlay; values from `top` replace values in `base`.
fn overlay(base: &mut ConfigMap, top: &ConfigMap) {
    for (key, value) in top {
        base.insert(key.clone(), value.clone());
    }
}
