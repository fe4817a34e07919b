//! # Output Configuration
//!
//! Controls whether CLI output uses colors and emoji markers.
//!
//! ## Respecting User Preferences
//!
//! - `--color=never|always|auto` - CLI flag for color control
//! - `NO_COLOR` - Disables colors when set (per https://no-color.org/)
//! - `CLICOLOR=0` - Disables colors
//! - `CLICOLOR_FORCE=1` - Forces colors even in non-TTY
//! - `TERM=dumb` - Disables colors for dumb terminals
//!
//! ## Usage
//!
//! ```rust,ignore
//! use structure_builder::output::{OutputConfig, Status};
//!
//! let out = OutputConfig::from_env_and_flag("auto");
//! println!("{} Spec parsed", out.marker(Status::Ok));
//! ```

use std::env;

use console::style;

/// Output configuration for controlling colors and emojis.
#[derive(Debug, Clone)]
pub struct OutputConfig {
    /// Whether colors and emojis should be used in output.
    pub use_color: bool,
}

/// The kinds of status line the commands print.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Status {
    Scan,
    Ok,
    Warn,
    Err,
    Info,
    Tip,
}

impl Status {
    fn markers(self) -> (&'static str, &'static str) {
        match self {
            Status::Scan => ("🔍", "[SCAN]"),
            Status::Ok => ("✅", "[OK]"),
            Status::Warn => ("⚠️", "[WARN]"),
            Status::Err => ("❌", "[ERR]"),
            Status::Info => ("📊", "[INFO]"),
            Status::Tip => ("💡", "[TIP]"),
        }
    }
}

impl OutputConfig {
    /// Create an output configuration from environment and CLI flag.
    ///
    /// `always` forces colors on (overriding `NO_COLOR`), `never` forces them
    /// off, anything else detects support from the environment.
    pub fn from_env_and_flag(color_flag: &str) -> Self {
        let use_color = match color_flag.to_lowercase().as_str() {
            "always" => true,
            "never" => false,
            _ => Self::detect_color_support(),
        };

        Self { use_color }
    }

    fn detect_color_support() -> bool {
        // The presence of NO_COLOR (even if empty) disables colors
        if env::var_os("NO_COLOR").is_some() {
            return false;
        }
        if env::var("CLICOLOR").is_ok_and(|v| v == "0") {
            return false;
        }
        if env::var("CLICOLOR_FORCE").is_ok_and(|v| v != "0" && !v.is_empty()) {
            return true;
        }
        if env::var("TERM").is_ok_and(|v| v == "dumb") {
            return false;
        }

        console::Term::stdout().features().colors_supported()
    }

    /// Create a configuration with colors always enabled.
    #[cfg(test)]
    pub fn with_color() -> Self {
        Self { use_color: true }
    }

    /// Create a configuration with colors always disabled.
    #[cfg(test)]
    pub fn without_color() -> Self {
        Self { use_color: false }
    }

    /// The emoji for `status`, or its bracketed text without colors.
    pub fn marker(&self, status: Status) -> &'static str {
        let (emoji, plain) = status.markers();
        emoji_or(self, emoji, plain)
    }

    /// Highlight a name (collection, operation, project) when colors are on.
    pub fn name(&self, text: &str) -> String {
        if self.use_color {
            style(text).cyan().bold().force_styling(true).to_string()
        } else {
            text.to_string()
        }
    }

    /// Render secondary text (paths, dependency lists) dimmed.
    pub fn dim(&self, text: &str) -> String {
        if self.use_color {
            style(text).dim().force_styling(true).to_string()
        } else {
            text.to_string()
        }
    }
}

impl Default for OutputConfig {
    fn default() -> Self {
        Self::from_env_and_flag("auto")
    }
}

/// Returns `emoji_str` when colors are enabled, `plain` otherwise.
pub fn emoji_or<'a>(config: &OutputConfig, emoji_str: &'a str, plain: &'a str) -> &'a str {
    if config.use_color {
        emoji_str
    } else {
        plain
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_color_always() {
        let config = OutputConfig::from_env_and_flag("always");
        assert!(config.use_color);
    }

    #[test]
    fn test_color_never() {
        let config = OutputConfig::from_env_and_flag("NEVER");
        assert!(!config.use_color);
    }

    #[test]
    fn test_markers_follow_color() {
        assert_eq!(OutputConfig::with_color().marker(Status::Ok), "✅");
        assert_eq!(OutputConfig::without_color().marker(Status::Err), "[ERR]");
        assert_eq!(OutputConfig::without_color().marker(Status::Tip), "[TIP]");
    }

    #[test]
    fn test_plain_names_are_unstyled() {
        let out = OutputConfig::without_color();
        assert_eq!(out.name("@lib/ui"), "@lib/ui");
        assert_eq!(out.dim("<- [#1]"), "<- [#1]");
    }

    #[test]
    fn test_colored_names_are_styled() {
        let out = OutputConfig::with_color();
        let styled = out.name("@lib/ui");
        assert!(styled.contains("@lib/ui"));
        assert_ne!(styled, "@lib/ui");
    }
}
