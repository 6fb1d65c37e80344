//! TOML configuration for the command-line front end

use anyhow::Context;
use doc_extract::PdfConfig;
use risk_annotate::AnnotateConfig;
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::Path;
use version_compare::CompareConfig;

/// Every table is optional; missing keys take their defaults
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct AppConfig {
    pub extract: PdfConfig,
    pub compare: CompareConfig,
    pub annotate: AnnotateConfig,
}

impl AppConfig {
    pub fn from_file<P: AsRef<Path>>(path: P) -> anyhow::Result<Self> {
        let path = path.as_ref();
        let content = fs::read_to_string(path)
            .with_context(|| format!("Failed to read config file: {}", path.display()))?;
        Self::from_str(&content)
    }

    pub fn from_str(s: &str) -> anyhow::Result<Self> {
        toml::from_str(s).context("Failed to parse TOML configuration")
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use doc_extract::PdfStrategy;
    use pretty_assertions::assert_eq;

    #[test]
    fn test_empty_config_uses_defaults() {
        let config = AppConfig::from_str("").unwrap();
        assert_eq!(config.compare, CompareConfig::default());
        assert_eq!(config.annotate, AnnotateConfig::default());
        assert_eq!(config.extract.strategy, PdfStrategy::Auto);
    }

    #[test]
    fn test_partial_tables() {
        let config = AppConfig::from_str(
            r#"
            [extract]
            strategy = "native"

            [compare]
            max_text_chars = 500000
            diff_timeout_ms = 0

            [compare.diff]
            hide_page_markers = true

            [annotate]
            max_snippets = 10
            "#,
        )
        .unwrap();

        assert_eq!(config.extract.strategy, PdfStrategy::Native);
        assert!(config.extract.validate_output);
        assert_eq!(config.compare.max_text_chars, Some(500_000));
        assert_eq!(config.compare.diff_timeout(), None);
        assert_eq!(config.compare.identical_threshold, 99.9);
        assert!(config.compare.diff.hide_page_markers);
        assert_eq!(config.annotate.max_snippets, 10);
        assert_eq!(config.annotate.context_before, 160);
    }

    #[test]
    fn test_malformed_toml_is_an_error() {
        let err = AppConfig::from_str("[compare\nmax_text_chars = ").unwrap_err();
        assert!(err.to_string().contains("Failed to parse TOML"));
    }

    #[test]
    fn test_missing_file_names_path() {
        let err = AppConfig::from_file("/nonexistent/convenio.toml").unwrap_err();
        assert!(err.to_string().contains("/nonexistent/convenio.toml"));
    }
}
