//! Playground configuration.

use serde::{Deserialize, Serialize};

/// Program preloaded into the stdin pane on first load, written in the toy
/// language the bundled engine understands.
pub const SAMPLE_STDIN: &str = r#"// Print the alphabet

let letters = "abcdefghijklmnopqrstuvwxyz";

for let i = 0; i < 26; i += 1 {
    print_char!(letters[i]);
}
print!("\n");
"#;

/// Top-level configuration for the session bridge.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PlaygroundConfig {
    /// Name of the file-like resource the stdin text is published under on
    /// every run, for engines that read input via file access.
    #[serde(default = "default_input_resource")]
    pub input_resource: String,

    /// Sample program offered to the UI for initial population of the
    /// stdin pane.
    #[serde(default = "default_sample_stdin")]
    pub sample_stdin: String,
}

fn default_input_resource() -> String {
    "/input.txt".to_string()
}

fn default_sample_stdin() -> String {
    SAMPLE_STDIN.to_string()
}

impl Default for PlaygroundConfig {
    fn default() -> Self {
        Self {
            input_resource: default_input_resource(),
            sample_stdin: default_sample_stdin(),
        }
    }
}

impl PlaygroundConfig {
    pub fn from_json(json: &str) -> Result<Self, ConfigError> {
        serde_json::from_str(json).map_err(|e| ConfigError::ParseError(e.to_string()))
    }

    pub fn to_json(&self) -> Result<String, ConfigError> {
        serde_json::to_string_pretty(self).map_err(|e| ConfigError::SerializeError(e.to_string()))
    }

    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.input_resource.is_empty() {
            return Err(ConfigError::ValidationError(
                "input_resource must not be empty".to_string(),
            ));
        }
        if !self.input_resource.starts_with('/') {
            return Err(ConfigError::ValidationError(
                "input_resource must be an absolute path".to_string(),
            ));
        }
        Ok(())
    }
}

/// Errors from loading or validating configuration.
#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    #[error("config parse error: {0}")]
    ParseError(String),

    #[error("config serialize error: {0}")]
    SerializeError(String),

    #[error("config validation error: {0}")]
    ValidationError(String),
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_empty_json_yields_defaults() {
        let config = PlaygroundConfig::from_json("{}").unwrap();
        assert_eq!(config.input_resource, "/input.txt");
        assert_eq!(config.sample_stdin, SAMPLE_STDIN);
        config.validate().unwrap();
    }

    #[test]
    fn test_overrides_are_honored() {
        let config =
            PlaygroundConfig::from_json(r#"{"input_resource": "/run/stdin.dat"}"#).unwrap();
        assert_eq!(config.input_resource, "/run/stdin.dat");
    }

    #[test]
    fn test_invalid_json_is_a_parse_error() {
        let err = PlaygroundConfig::from_json("not json").unwrap_err();
        assert!(matches!(err, ConfigError::ParseError(_)));
    }

    #[test]
    fn test_empty_input_resource_fails_validation() {
        let config = PlaygroundConfig::from_json(r#"{"input_resource": ""}"#).unwrap();
        assert!(config.validate().is_err());
    }

    #[test]
    fn test_relative_input_resource_fails_validation() {
        let config = PlaygroundConfig::from_json(r#"{"input_resource": "input.txt"}"#).unwrap();
        assert!(config.validate().is_err());
    }

    #[test]
    fn test_round_trip() {
        let config = PlaygroundConfig::default();
        let json = config.to_json().unwrap();
        let parsed = PlaygroundConfig::from_json(&json).unwrap();
        assert_eq!(parsed.input_resource, config.input_resource);
        assert_eq!(parsed.sample_stdin, config.sample_stdin);
    }
}
