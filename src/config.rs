//! Traversal configuration.
//!
//! Controls the sentinel labels used while simulating answers, the names
//! of the synthetic sink nodes, and an optional depth limit. Every field has a
//! default, so a config file only needs the values it overrides.

use serde::Deserialize;
use std::fs;
use std::path::Path;

/// Errors that can occur while loading a configuration file.
#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    /// Failed to read the file from disk.
    #[error("Failed to read config: {0}")]
    Io(#[from] std::io::Error),

    /// Failed to parse TOML content.
    #[error("Failed to parse config: {0}")]
    Toml(#[from] toml::de::Error),

    /// A value is out of range.
    #[error("Invalid config: {0}")]
    Invalid(String),
}

/// Settings for building an interview graph.
///
/// # Example
///
/// ```rust
/// use interview_graph::config::TraversalConfig;
///
/// let config = TraversalConfig::from_toml_str("max_depth = 16").unwrap();
/// assert_eq!(config.max_depth, Some(16));
/// assert_eq!(config.done_label, "Done");
/// ```
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct TraversalConfig {
    /// Name written after `digraph`.
    pub graph_name: String,
    /// Label of the sink reached when no question follows.
    pub done_label: String,
    /// Label of the sink reached when a resolver terminates the interview.
    pub terminated_label: String,
    /// Simulated free-text answer, also used as its edge label.
    pub text_input: String,
    /// Edge label for message-only continuations.
    pub message_accepted: String,
    /// Maximum question depth before the build is aborted. Unlimited when
    /// unset; cycles are detected either way.
    pub max_depth: Option<usize>,
}

impl Default for TraversalConfig {
    fn default() -> Self {
        Self {
            graph_name: "interview".to_string(),
            done_label: "Done".to_string(),
            terminated_label: "<EXIT WITH NO RESULT>".to_string(),
            text_input: "<TEXT INPUT>".to_string(),
            message_accepted: "<MESSAGE ACCEPTED>".to_string(),
            max_depth: None,
        }
    }
}

impl TraversalConfig {
    /// Parses and validates a configuration from TOML text.
    pub fn from_toml_str(content: &str) -> Result<Self, ConfigError> {
        let config: TraversalConfig = toml::from_str(content)?;
        config.validate()?;
        Ok(config)
    }

    /// Reads, parses and validates a configuration file.
    pub fn load(path: &Path) -> Result<Self, ConfigError> {
        let content = fs::read_to_string(path)?;
        Self::from_toml_str(&content)
    }

    /// Checks that every label is non-empty and the depth limit, if set, is usable.
    pub fn validate(&self) -> Result<(), ConfigError> {
        let labels = [
            ("graph_name", &self.graph_name),
            ("done_label", &self.done_label),
            ("terminated_label", &self.terminated_label),
            ("text_input", &self.text_input),
            ("message_accepted", &self.message_accepted),
        ];
        if let Some((field, _)) = labels.iter().find(|(_, value)| value.is_empty()) {
            return Err(ConfigError::Invalid(format!("{} must not be empty", field)));
        }
        if self.max_depth == Some(0) {
            return Err(ConfigError::Invalid(
                "max_depth must be at least 1".to_string(),
            ));
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;

    #[test]
    fn test_default_config_is_valid() {
        let config = TraversalConfig::default();
        assert!(config.validate().is_ok());
        assert_eq!(config.graph_name, "interview");
        assert_eq!(config.text_input, "<TEXT INPUT>");
        assert_eq!(config.message_accepted, "<MESSAGE ACCEPTED>");
        assert_eq!(config.max_depth, None);
    }

    #[test]
    fn test_empty_toml_uses_defaults() {
        let config = TraversalConfig::from_toml_str("").unwrap();
        assert_eq!(config, TraversalConfig::default());
    }

    #[test]
    fn test_partial_override() {
        let config = TraversalConfig::from_toml_str(
            r#"
            graph_name = "signup"
            text_input = "<typed>"
            "#,
        )
        .unwrap();
        assert_eq!(config.graph_name, "signup");
        assert_eq!(config.text_input, "<typed>");
        assert_eq!(config.done_label, "Done");
    }

    #[test]
    fn test_rejects_zero_depth() {
        let err = TraversalConfig::from_toml_str("max_depth = 0").unwrap_err();
        assert!(matches!(err, ConfigError::Invalid(_)));
    }

    #[test]
    fn test_rejects_empty_label() {
        let err = TraversalConfig::from_toml_str("done_label = \"\"").unwrap_err();
        assert!(err.to_string().contains("done_label"));
    }

    #[test]
    fn test_rejects_unknown_field() {
        let err = TraversalConfig::from_toml_str("colour = \"red\"").unwrap_err();
        assert!(matches!(err, ConfigError::Toml(_)));
    }

    #[test]
    fn test_load_from_file() {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        writeln!(file, "max_depth = 8").unwrap();

        let config = TraversalConfig::load(file.path()).unwrap();
        assert_eq!(config.max_depth, Some(8));
    }

    #[test]
    fn test_load_missing_file() {
        let err = TraversalConfig::load(Path::new("/nonexistent/interview.toml")).unwrap_err();
        assert!(matches!(err, ConfigError::Io(_)));
    }
}
