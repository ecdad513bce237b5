//! Configuration types for cdsn

use serde::{Deserialize, Serialize};
use std::path::Path;

use crate::error::NotationError;
use crate::notation::formatter::{FormatOptions, Formatter};
use crate::notation::parser::Parser;
use crate::notation::scanner::DEFAULT_QUEUE_CAPACITY;
use crate::result::Result;
use crate::semantic::analyzer::{Analyzer, DEFAULT_DELIMITER_NAME};

/// Scanner configuration
#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "camelCase")]
pub struct ScannerConfiguration {
    /// Slots in the channel between scanner and parser
    pub queue_capacity: Option<usize>,
}

/// Formatter configuration
#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "camelCase")]
pub struct FormatterConfiguration {
    /// Spaces per indentation level of multiline rules
    pub indent_size: Option<usize>,
}

/// Analyzer configuration
#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "camelCase")]
pub struct AnalyzerConfiguration {
    /// Name of the expression synthesized from rule literals
    pub delimiter_name: Option<String>,
}

/// Top-level configuration
///
/// ```toml
/// [scanner]
/// queueCapacity = 32
///
/// [formatter]
/// indentSize = 4
///
/// [analyzer]
/// delimiterName = "punctuation"
/// ```
#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "camelCase")]
pub struct CdsnConfig {
    pub scanner: Option<ScannerConfiguration>,
    pub formatter: Option<FormatterConfiguration>,
    pub analyzer: Option<AnalyzerConfiguration>,
}

impl CdsnConfig {
    /// Parse a configuration file, choosing the format by extension
    ///
    /// Supports TOML (.toml), YAML (.yaml, .yml) and JSON (.json).
    pub fn load(path: &Path) -> Result<Self> {
        let content =
            std::fs::read_to_string(path).map_err(|e| NotationError::io_error(path, e))?;
        let file_name = path.file_name().and_then(|name| name.to_str()).unwrap_or("");
        let extension = path.extension().and_then(|e| e.to_str());

        let parsed = match extension {
            Some("toml") => toml::from_str(&content).map_err(|e| e.to_string()),
            Some("yaml") | Some("yml") => serde_yaml::from_str(&content).map_err(|e| e.to_string()),
            Some("json") => serde_json::from_str(&content).map_err(|e| e.to_string()),
            _ => Err(format!(
                "Unsupported file extension for '{file_name}' (expected .toml, .yaml, .yml, or .json)"
            )),
        };
        let config: Self = parsed.map_err(NotationError::config_error)?;
        config.validate()?;
        Ok(config)
    }

    /// Reject settings no component can work with
    pub fn validate(&self) -> Result<()> {
        if self.queue_capacity() == 0 {
            return Err(NotationError::config_error(
                "scanner.queueCapacity must be at least 1",
            ));
        }
        if self.delimiter_name().is_empty() {
            return Err(NotationError::config_error(
                "analyzer.delimiterName must not be empty",
            ));
        }
        Ok(())
    }

    pub fn queue_capacity(&self) -> usize {
        self.scanner
            .as_ref()
            .and_then(|scanner| scanner.queue_capacity)
            .unwrap_or(DEFAULT_QUEUE_CAPACITY)
    }

    pub fn indent_size(&self) -> usize {
        self.formatter
            .as_ref()
            .and_then(|formatter| formatter.indent_size)
            .unwrap_or(FormatOptions::default().indent_size)
    }

    pub fn delimiter_name(&self) -> &str {
        self.analyzer
            .as_ref()
            .and_then(|analyzer| analyzer.delimiter_name.as_deref())
            .unwrap_or(DEFAULT_DELIMITER_NAME)
    }

    pub fn format_options(&self) -> FormatOptions {
        FormatOptions {
            indent_size: self.indent_size(),
        }
    }

    pub fn parser(&self) -> Parser {
        Parser::with_queue_capacity(self.queue_capacity())
    }

    pub fn formatter(&self) -> Formatter {
        Formatter::with_options(self.format_options())
    }

    pub fn analyzer(&self) -> Analyzer {
        Analyzer::with_delimiter_name(self.delimiter_name())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn defaults_apply_to_missing_sections() {
        let config = CdsnConfig::default();
        assert_eq!(config.queue_capacity(), 16);
        assert_eq!(config.indent_size(), 2);
        assert_eq!(config.delimiter_name(), "delimiter");
        assert!(config.validate().is_ok());
    }

    #[test]
    fn keys_are_camel_case() {
        let config: CdsnConfig = toml::from_str(
            "[scanner]\nqueueCapacity = 4\n\n[formatter]\nindentSize = 4\n\n[analyzer]\ndelimiterName = \"punctuation\"\n",
        )
        .unwrap();
        assert_eq!(config.queue_capacity(), 4);
        assert_eq!(config.parser().queue_capacity(), 4);
        assert_eq!(config.format_options().indent_size, 4);
        assert_eq!(config.delimiter_name(), "punctuation");
    }

    #[test]
    fn zero_capacity_is_rejected() {
        let config: CdsnConfig = serde_json::from_str(r#"{"scanner": {"queueCapacity": 0}}"#).unwrap();
        assert!(config.validate().is_err());
    }
}
