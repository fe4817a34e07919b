//! # Error Suggestions
//!
//! Helpers that turn library errors into CLI errors carrying a `hint:` on
//! how to fix them.
//!
//! ## Usage
//!
//! ```rust,ignore
//! use structure_builder::suggestions;
//!
//! return Err(suggestions::spec_not_found(path));
//! ```

use std::path::Path;

use crate::error::Error;
use crate::settings::SettingsLayer;
use crate::spec::WorkspaceSpec;

/// Generate an error for when the spec file is not found.
pub fn spec_not_found(path: &Path) -> anyhow::Error {
    anyhow::anyhow!(
        "Spec file not found: {path}\n\n\
         hint: Create a project-structure.json file in the workspace root\n\
         hint: Use -s/--spec to specify a different path, or --base64 to pass the spec inline\n\
         hint: Set the STRUCTURE_BUILDER_SPEC environment variable",
        path = path.display()
    )
}

/// Generate an error for a generator name that matches no alias.
///
/// Suggests the closest alias declared anywhere in the spec.
pub fn unresolved_alias(name: &str, spec: &WorkspaceSpec) -> anyhow::Error {
    let aliases = declared_aliases(spec);
    let candidates: Vec<&str> = aliases.iter().map(String::as_str).collect();
    let did_you_mean = find_similar(name, &candidates)
        .map(|s| format!("\nhint: Did you mean '{s}'?"))
        .unwrap_or_default();

    anyhow::anyhow!(
        "Alias not found for `{name}`{did_you_mean}\n\n\
         hint: Declare the alias under `settings.<collection>.<operation>.alias`\n\
         hint: Or name the generator explicitly as <collection>:<operation>"
    )
}

/// Generate an error for a project that must be created but has no type.
pub fn missing_project_type(container: &str) -> anyhow::Error {
    anyhow::anyhow!(
        "Project `{container}` does not exist and declares no type\n\n\
         hint: Add \"type\": \"application\" or \"type\": \"library\" to projects.{container}\n\
         hint: Or add the project to the workspace manifest if it already exists"
    )
}

/// Convert a build error, attaching hints where one is known.
pub fn explain(error: Error, spec: &WorkspaceSpec) -> anyhow::Error {
    match error {
        Error::UnresolvedAlias { name } => unresolved_alias(&name, spec),
        Error::MissingOperationType { container } => missing_project_type(&container),
        other => other.into(),
    }
}

/// Every alias of the global layer and of each project layer, deduplicated.
fn declared_aliases(spec: &WorkspaceSpec) -> Vec<String> {
    let layers = std::iter::once(&spec.settings).chain(spec.projects.iter().map(|(_, p)| &p.settings));
    let mut aliases: Vec<String> = layers
        .flat_map(|layer: &SettingsLayer| {
            layer
                .collections()
                .flat_map(|(_, collection)| collection.operations.iter())
                .filter_map(|(_, operation)| operation.alias.clone())
                .collect::<Vec<_>>()
        })
        .collect();
    aliases.sort();
    aliases.dedup();
    aliases
}

/// Find a similar string from a list of candidates (edit distance <= 2).
fn find_similar<'a>(input: &str, candidates: &[&'a str]) -> Option<&'a str> {
    candidates
        .iter()
        .map(|&candidate| (candidate, edit_distance(input, candidate)))
        .filter(|&(_, distance)| distance <= 2 && distance < input.len())
        .min_by_key(|&(_, distance)| distance)
        .map(|(candidate, _)| candidate)
}

/// Levenshtein distance, computed one row at a time.
fn edit_distance(a: &str, b: &str) -> usize {
    let b_chars: Vec<char> = b.chars().collect();
    let mut previous: Vec<usize> = (0..=b_chars.len()).collect();

    for (i, a_char) in a.chars().enumerate() {
        let mut current = vec![i + 1; b_chars.len() + 1];
        for (j, b_char) in b_chars.iter().enumerate() {
            let substitution = previous[j] + usize::from(a_char != *b_char);
            current[j + 1] = substitution.min(previous[j + 1] + 1).min(current[j] + 1);
        }
        previous = current;
    }

    previous[b_chars.len()]
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::spec;
    use serde_json::json;

    fn spec_with_aliases() -> WorkspaceSpec {
        spec::from_value(&json!({
            "$schema": "s",
            "settings": { "@lib/ui": { "component": { "alias": "cmp" }, "service": { "alias": "svc" } } },
            "projects": {
                "app1": { "settings": { "@lib/ui": { "guard": { "alias": "guard" } } } }
            }
        }))
        .unwrap()
    }

    #[test]
    fn test_spec_not_found_includes_hints() {
        let message = spec_not_found(Path::new("/ws/project-structure.json")).to_string();
        assert!(message.contains("Spec file not found: /ws/project-structure.json"));
        assert!(message.contains("--base64"));
        assert!(message.contains("STRUCTURE_BUILDER_SPEC"));
    }

    #[test]
    fn test_unresolved_alias_suggests_similar() {
        let message = unresolved_alias("cmpp", &spec_with_aliases()).to_string();
        assert!(message.contains("Alias not found for `cmpp`"));
        assert!(message.contains("Did you mean 'cmp'?"));
    }

    #[test]
    fn test_unresolved_alias_searches_project_layers() {
        let message = unresolved_alias("gaurd", &spec_with_aliases()).to_string();
        assert!(message.contains("Did you mean 'guard'?"));
    }

    #[test]
    fn test_unresolved_alias_no_suggestion_for_very_different() {
        let message = unresolved_alias("pipeline", &spec_with_aliases()).to_string();
        assert!(!message.contains("Did you mean"));
        assert!(message.contains("<collection>:<operation>"));
    }

    #[test]
    fn test_explain_keeps_other_errors() {
        let error = explain(Error::MissingSchemaMarker, &spec_with_aliases());
        assert!(error.to_string().contains("$schema"));

        let error = explain(
            Error::MissingOperationType {
                container: "app2".to_string(),
            },
            &spec_with_aliases(),
        );
        assert!(error.to_string().contains("projects.app2"));
    }

    #[test]
    fn test_edit_distance() {
        assert_eq!(edit_distance("cmp", "cmp"), 0);
        assert_eq!(edit_distance("cmpp", "cmp"), 1);
        assert_eq!(edit_distance("gaurd", "guard"), 2);
        assert_eq!(edit_distance("", "svc"), 3);
        assert_eq!(edit_distance("kitten", "sitting"), 3);
    }
}
