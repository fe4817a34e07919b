//! # Error Handling
//!
//! This module defines the centralized error type for `structure-builder`.
//! It uses the `thiserror` library to build a single `Error` enum covering
//! every failure a build can hit, from loading the spec to declaring tasks.
//!
//! ## Key Components
//!
//! - **`Error`**: The enum of all failure modes. Variants carry the context
//!   needed to act on them (container name, alias, missing field).
//!
//! - **`Result<T>`**: A type alias for `std::result::Result<T, Error>`.
//!
//! Every error is fatal to the current build. Construction stops at the
//! first error and tasks that were already submitted to the dispatcher are
//! not retracted; the dispatcher decides what happens to them.

use thiserror::Error;

/// Main error type for structure-builder operations
#[derive(Error, Debug)]
pub enum Error {
    /// The spec document does not declare its `$schema` marker.
    #[error("Spec is missing its required `$schema` marker")]
    MissingSchemaMarker,

    /// A container has to be created but declares no `type` to create it with.
    #[error("Project `{container}` does not exist and declares no `type` to create it with")]
    MissingOperationType { container: String },

    /// A generator node matched neither settings layer and is not an explicit
    /// `collection:operation` pair.
    #[error("Alias not found for `{name}`, and it does not follow the pattern [COLLECTION]:[OPERATION]")]
    UnresolvedAlias { name: String },

    /// Post-resolution validation found an empty collection or operation.
    #[error("Configuration error: {field} - {message}")]
    Configuration { field: String, message: String },

    /// The spec document is malformed.
    ///
    /// Includes an optional hint describing how to fix it.
    #[error("Spec parsing error: {message}{}", hint.as_ref().map(|h| format!("\n  hint: {}", h)).unwrap_or_default())]
    SpecParse {
        message: String,
        /// Optional hint for how to fix the spec
        hint: Option<String>,
    },

    /// The workspace manifest is malformed.
    #[error("Workspace manifest error: {message}")]
    Workspace { message: String },

    /// The dispatcher refused a task.
    #[error("Dispatch error: {message}")]
    Dispatch { message: String },

    /// An I/O error, wrapped from `std::io::Error`.
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    /// A JSON parsing error, wrapped from `serde_json::Error`.
    #[error("JSON parsing error: {0}")]
    Json(#[from] serde_json::Error),

    /// A YAML parsing error, wrapped from `serde_yaml::Error`.
    #[error("YAML parsing error: {0}")]
    Yaml(#[from] serde_yaml::Error),

    /// A base64 decoding error, wrapped from `base64::DecodeError`.
    #[error("Base64 decoding error: {0}")]
    Base64(#[from] base64::DecodeError),
}

/// A convenient type alias for `Result<T, Error>`.
pub type Result<T> = std::result::Result<T, Error>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_error_display_missing_schema_marker() {
        let display = format!("{}", Error::MissingSchemaMarker);
        assert!(display.contains("$schema"));
    }

    #[test]
    fn test_error_display_missing_operation_type() {
        let error = Error::MissingOperationType {
            container: "app1".to_string(),
        };
        let display = format!("{}", error);
        assert!(display.contains("app1"));
        assert!(display.contains("type"));
    }

    #[test]
    fn test_error_display_unresolved_alias() {
        let error = Error::UnresolvedAlias {
            name: "cmp".to_string(),
        };
        let display = format!("{}", error);
        assert!(display.contains("Alias not found for `cmp`"));
        assert!(display.contains("[COLLECTION]:[OPERATION]"));
    }

    #[test]
    fn test_error_display_configuration() {
        let error = Error::Configuration {
            field: "collection".to_string(),
            message: "Collection is not defined".to_string(),
        };
        let display = format!("{}", error);
        assert!(display.contains("Configuration error"));
        assert!(display.contains("collection"));
    }

    #[test]
    fn test_error_display_spec_parse() {
        let error = Error::SpecParse {
            message: "Expected an object".to_string(),
            hint: None,
        };
        let display = format!("{}", error);
        assert!(display.contains("Spec parsing error"));
        assert!(!display.contains("hint:"));
    }

    #[test]
    fn test_error_display_spec_parse_with_hint() {
        let error = Error::SpecParse {
            message: "Unknown node type `folders`".to_string(),
            hint: Some("Use \"folder\" or \"generator\"".to_string()),
        };
        let display = format!("{}", error);
        assert!(display.contains("Unknown node type"));
        assert!(display.contains("hint:"));
        assert!(display.contains("\"generator\""));
    }

    #[test]
    fn test_error_from_io_error() {
        let io_error = std::io::Error::new(std::io::ErrorKind::NotFound, "File not found");
        let error: Error = io_error.into();
        let display = format!("{}", error);
        assert!(display.contains("I/O error"));
        assert!(display.contains("File not found"));
    }

    #[test]
    fn test_error_from_json_error() {
        let json_error = serde_json::from_str::<serde_json::Value>("{unclosed").unwrap_err();
        let error: Error = json_error.into();
        assert!(format!("{}", error).contains("JSON parsing error"));
    }

    #[test]
    fn test_error_from_yaml_error() {
        let yaml_error = serde_yaml::from_str::<serde_yaml::Value>("invalid: [unclosed").unwrap_err();
        let error: Error = yaml_error.into();
        assert!(format!("{}", error).contains("YAML parsing error"));
    }
}
