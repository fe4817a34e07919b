//! # Settings Layers and Resolution
//!
//! A settings layer maps collection names to the operations they expose,
//! each with an optional short alias and a block of default configuration:
//!
//! ```json
//! {
//!   "@my/collection": {
//!     "version": "1.2.0",
//!     "component": { "alias": "cmp", "standalone": true }
//!   }
//! }
//! ```
//!
//! Non-object values next to the operations (such as `version`) are
//! collection metadata. They never resolve as operations.
//!
//! Every build has one global layer and one layer per container. The
//! [`SettingsResolver`] maps a node's [`Selector`] to a [`ResolvedSettings`]
//! against either layer and memoizes the answer in a [`ResolverCache`] that
//! lives exactly as long as the resolver, i.e. one build.

use std::collections::{HashMap, HashSet};
use std::fmt;
use std::sync::Arc;

use log::debug;
use serde_json::Value;

use crate::error::{Error, Result};

/// Key/value configuration passed to a generator.
pub type ConfigMap = serde_json::Map<String, Value>;

/// One operation entry of a collection
#[derive(Debug, Clone, Default, PartialEq)]
pub struct OperationSettings {
    /// Short name the operation can be referenced by
    pub alias: Option<String>,
    /// Default configuration for the operation
    pub config: ConfigMap,
}

/// Operations and metadata declared for one collection
#[derive(Debug, Clone, Default, PartialEq)]
pub struct CollectionSettings {
    /// Non-object values declared on the collection (e.g. `version`)
    pub metadata: ConfigMap,
    /// Operations in declaration order
    pub operations: Vec<(String, OperationSettings)>,
}

impl CollectionSettings {
    /// The package version pinned for this collection, if any.
    pub fn version(&self) -> Option<&str> {
        self.metadata.get("version").and_then(Value::as_str)
    }
}

/// A scope of collection → operation settings, in declaration order.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct SettingsLayer {
    collections: Vec<(String, CollectionSettings)>,
}

impl SettingsLayer {
    pub fn new() -> Self {
        Self::default()
    }

    /// Parse a layer from its JSON form.
    ///
    /// `context` names the location of the layer in the spec and is only
    /// used in error messages.
    pub fn from_json(value: &Value, context: &str) -> Result<Self> {
        let collections = value.as_object().ok_or_else(|| Error::SpecParse {
            message: format!("`{}` must be an object of collections", context),
            hint: None,
        })?;

        let mut layer = SettingsLayer::new();
        for (collection_name, collection_value) in collections {
            let entries = collection_value
                .as_object()
                .ok_or_else(|| Error::SpecParse {
                    message: format!(
                        "`{}.{}` must be an object of operations",
                        context, collection_name
                    ),
                    hint: Some("Declare operations as { \"operation\": { \"alias\": \"...\" } }".to_string()),
                })?;

            let mut collection = CollectionSettings::default();
            for (key, entry) in entries {
                match entry {
                    Value::Object(fields) => {
                        let mut config = fields.clone();
                        let alias = match config.shift_remove("alias") {
                            None | Some(Value::Null) => None,
                            Some(Value::String(alias)) => Some(alias),
                            Some(other) => {
                                return Err(Error::SpecParse {
                                    message: format!(
                                        "`{}.{}.{}.alias` must be a string, found {}",
                                        context, collection_name, key, other
                                    ),
                                    hint: None,
                                })
                            }
                        };
                        collection
                            .operations
                            .push((key.clone(), OperationSettings { alias, config }));
                    }
                    other => {
                        collection.metadata.insert(key.clone(), other.clone());
                    }
                }
            }
            layer.push_collection(collection_name.clone(), collection);
        }

        Ok(layer)
    }

    /// Append a collection, replacing an earlier one with the same name.
    pub fn push_collection(&mut self, name: impl Into<String>, collection: CollectionSettings) {
        let name = name.into();
        self.collections.retain(|(existing, _)| *existing != name);
        self.collections.push((name, collection));
    }

    /// Append one operation to a collection, creating the collection if needed.
    pub fn push_operation(
        &mut self,
        collection: &str,
        operation: &str,
        alias: Option<&str>,
        config: ConfigMap,
    ) {
        let entry = OperationSettings {
            alias: alias.map(str::to_string),
            config,
        };
        match self.collections.iter_mut().find(|(name, _)| name == collection) {
            Some((_, existing)) => {
                existing.operations.retain(|(name, _)| name != operation);
                existing.operations.push((operation.to_string(), entry));
            }
            None => self.collections.push((
                collection.to_string(),
                CollectionSettings {
                    metadata: ConfigMap::new(),
                    operations: vec![(operation.to_string(), entry)],
                },
            )),
        }
    }

    /// Collections in declaration order.
    pub fn collections(&self) -> impl DoubleEndedIterator<Item = (&str, &CollectionSettings)> {
        self.collections
            .iter()
            .map(|(name, collection)| (name.as_str(), collection))
    }

    pub fn is_empty(&self) -> bool {
        self.collections.is_empty()
    }

    pub fn len(&self) -> usize {
        self.collections.len()
    }
}

/// Which layer a resolution ran against.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub enum LayerScope {
    Global,
    Container(String),
}

impl fmt::Display for LayerScope {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            LayerScope::Global => write!(f, "global"),
            LayerScope::Container(name) => write!(f, "project `{}`", name),
        }
    }
}

/// What a node asks the resolver for
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Selector {
    pub alias: Option<String>,
    pub name: Option<String>,
    pub collection: Option<String>,
}

impl Selector {
    /// Select by short alias.
    pub fn alias(alias: impl Into<String>) -> Self {
        Self {
            alias: Some(alias.into()),
            ..Self::default()
        }
    }

    /// Select by explicit collection and operation name.
    pub fn explicit(collection: impl Into<String>, name: impl Into<String>) -> Self {
        Self {
            collection: Some(collection.into()),
            name: Some(name.into()),
            alias: None,
        }
    }

    pub fn is_empty(&self) -> bool {
        self.alias.is_none() && self.name.is_none() && self.collection.is_none()
    }

    fn explicit_key(&self) -> Option<CacheKey> {
        match (&self.collection, &self.name) {
            (Some(collection), Some(name)) => Some(CacheKey::explicit(collection, name)),
            _ => None,
        }
    }
}

/// The effective collection, operation and defaults for a node.
#[derive(Debug, Clone, PartialEq)]
pub struct ResolvedSettings {
    pub collection: String,
    pub operation: String,
    pub config: ConfigMap,
}

/// Lookup key within one layer's cache
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub enum CacheKey {
    /// `collection:operation`
    Explicit(String),
    Alias(String),
}

impl CacheKey {
    pub fn explicit(collection: &str, operation: &str) -> Self {
        CacheKey::Explicit(format!("{}:{}", collection, operation))
    }
}

/// Memoized resolutions, per layer scope.
#[derive(Debug, Default)]
pub struct ResolverCache {
    layers: HashMap<LayerScope, HashMap<CacheKey, Arc<ResolvedSettings>>>,
}

impl ResolverCache {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn get(&self, scope: &LayerScope, key: &CacheKey) -> Option<Arc<ResolvedSettings>> {
        self.layers.get(scope)?.get(key).cloned()
    }

    pub fn insert(&mut self, scope: &LayerScope, key: CacheKey, value: Arc<ResolvedSettings>) {
        self.layers
            .entry(scope.clone())
            .or_default()
            .insert(key, value);
    }

    /// Number of cached keys across all layers
    pub fn len(&self) -> usize {
        self.layers.values().map(HashMap::len).sum()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

/// Resolves selectors against settings layers, memoizing every answer.
///
/// Create one resolver per build and pass it down by `&mut`. Reusing a
/// resolver for an unrelated build would serve that build stale answers.
#[derive(Debug, Default)]
pub struct SettingsResolver {
    cache: ResolverCache,
    scans: usize,
}

impl SettingsResolver {
    pub fn new() -> Self {
        Self::default()
    }

    /// Resolve `selector` against `layer`.
    ///
    /// Later declarations win: collections are scanned last to first, and
    /// operations within a collection last to first. An explicit
    /// `collection:name` cache entry is consulted before an alias entry.
    pub fn resolve(
        &mut self,
        scope: &LayerScope,
        layer: Option<&SettingsLayer>,
        selector: &Selector,
    ) -> Option<Arc<ResolvedSettings>> {
        let layer = layer.filter(|layer| !layer.is_empty())?;
        if selector.is_empty() {
            return None;
        }

        if let Some(hit) = selector
            .explicit_key()
            .and_then(|key| self.cache.get(scope, &key))
        {
            return Some(hit);
        }
        if let Some(hit) = selector
            .alias
            .as_ref()
            .and_then(|alias| self.cache.get(scope, &CacheKey::Alias(alias.clone())))
        {
            return Some(hit);
        }

        self.scans += 1;
        // Aliases declared after the entry under inspection. An entry whose
        // alias is shadowed must not be cached under that alias.
        let mut shadowed: HashSet<&str> = HashSet::new();

        for (collection, settings) in layer.collections().rev() {
            for (operation, entry) in settings.operations.iter().rev() {
                let alias_match = selector.alias.is_some() && entry.alias == selector.alias;
                let explicit_match = matches!(
                    (&selector.collection, &selector.name),
                    (Some(c), Some(n)) if c == collection && n == operation
                );

                if alias_match || explicit_match {
                    let resolved = Arc::new(ResolvedSettings {
                        collection: collection.to_string(),
                        operation: operation.clone(),
                        config: entry.config.clone(),
                    });
                    debug!(
                        "Resolved {:?} in {} settings to {}:{}",
                        selector, scope, collection, operation
                    );

                    self.cache.insert(
                        scope,
                        CacheKey::explicit(collection, operation),
                        Arc::clone(&resolved),
                    );
                    if let Some(alias) = entry.alias.as_deref().filter(|a| !a.is_empty()) {
                        if !shadowed.contains(alias) {
                            self.cache.insert(
                                scope,
                                CacheKey::Alias(alias.to_string()),
                                Arc::clone(&resolved),
                            );
                        }
                    }
                    return Some(resolved);
                }

                if let Some(alias) = entry.alias.as_deref() {
                    shadowed.insert(alias);
                }
            }
        }

        None
    }

    /// Number of full layer scans performed (cache misses).
    pub fn scan_count(&self) -> usize {
        self.scans
    }

    pub fn cache(&self) -> &ResolverCache {
        &self.cache
    }
}
