//! Import configuration with builder pattern
//!
//! Every marker, limit and default the pipeline relies on lives here so a
//! deployment can adjust them from a TOML file instead of code.

use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};

use crate::import::ImportError;

/// Full configuration for one import
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct ImportConfig {
    pub sheets: SheetConfig,
    pub header: HeaderConfig,
    pub assessments: AssessmentConfig,
    pub trial: TrialConfig,
}

/// Which sheets count as data sheets
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct SheetConfig {
    /// Case-insensitive substrings that exclude a sheet by name
    pub excluded_patterns: Vec<String>,
}

/// Header detection and row markers
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct HeaderConfig {
    /// How many leading rows to search for the header
    pub scan_rows: usize,
    pub block_marker: String,
    pub plot_marker: String,
    pub treatment_marker: String,
    /// Extra word that turns a treatment header into the treatment-name column
    pub treatment_name_marker: String,
    /// First-cell value marking a deliberately blank plot row
    pub blank_plot_marker: String,
}

/// Defaults attached to every assessment type
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct AssessmentConfig {
    pub default_min: f64,
    pub default_max: f64,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct TrialConfig {
    /// Name used when no sheet carries a trial name
    pub default_name: String,
    /// Prefix for generated treatment display names ("Treatment 3")
    pub treatment_name_prefix: String,
}

impl Default for SheetConfig {
    fn default() -> Self {
        Self {
            excluded_patterns: vec![
                "sheet1".to_string(),
                "trial plan".to_string(),
                "spare".to_string(),
                "empty".to_string(),
            ],
        }
    }
}

impl Default for HeaderConfig {
    fn default() -> Self {
        Self {
            scan_rows: 20,
            block_marker: "block!".to_string(),
            plot_marker: "plot!".to_string(),
            treatment_marker: "treat".to_string(),
            treatment_name_marker: "name".to_string(),
            blank_plot_marker: "X".to_string(),
        }
    }
}

impl Default for AssessmentConfig {
    fn default() -> Self {
        Self {
            default_min: 0.0,
            default_max: 100.0,
        }
    }
}

impl Default for TrialConfig {
    fn default() -> Self {
        Self {
            default_name: "Imported Trial".to_string(),
            treatment_name_prefix: "Treatment".to_string(),
        }
    }
}

impl ImportConfig {
    /// Create a new builder for ImportConfig
    pub fn builder() -> ImportConfigBuilder {
        ImportConfigBuilder::new()
    }

    /// Parse a configuration from TOML; missing keys keep their defaults
    pub fn from_toml_str(content: &str) -> Result<Self, ImportError> {
        let config: ImportConfig =
            toml::from_str(content).map_err(|e| ImportError::Config(e.to_string()))?;
        config.validate()?;
        Ok(config)
    }

    /// Load a configuration file
    pub fn load(path: &Path) -> Result<Self, ImportError> {
        let content = std::fs::read_to_string(path)
            .map_err(|e| ImportError::Config(format!("{}: {}", path.display(), e)))?;
        Self::from_toml_str(&content)
    }

    /// Location of the per-user configuration file
    pub fn default_path() -> Option<PathBuf> {
        dirs::config_dir().map(|dir| dir.join("trial-import").join("config.toml"))
    }

    /// Load the per-user configuration if it exists, otherwise defaults
    pub fn load_or_default() -> Result<Self, ImportError> {
        match Self::default_path() {
            Some(path) if path.exists() => {
                log::debug!("Loading import config from {}", path.display());
                Self::load(&path)
            }
            _ => Ok(Self::default()),
        }
    }

    fn validate(&self) -> Result<(), ImportError> {
        if self.header.scan_rows == 0 {
            return Err(ImportError::Config("header.scan_rows must be at least 1".to_string()));
        }
        if self.sheets.excluded_patterns.iter().any(|p| p.trim().is_empty()) {
            return Err(ImportError::Config(
                "sheets.excluded_patterns must not contain empty patterns".to_string(),
            ));
        }
        for (key, marker) in [
            ("header.block_marker", &self.header.block_marker),
            ("header.plot_marker", &self.header.plot_marker),
            ("header.treatment_marker", &self.header.treatment_marker),
        ] {
            if marker.trim().is_empty() {
                return Err(ImportError::Config(format!("{} must not be empty", key)));
            }
        }
        if self.assessments.default_min > self.assessments.default_max {
            return Err(ImportError::Config(
                "assessments.default_min is greater than assessments.default_max".to_string(),
            ));
        }
        Ok(())
    }
}

/// Builder for ImportConfig
#[derive(Debug)]
pub struct ImportConfigBuilder {
    config: ImportConfig,
}

impl ImportConfigBuilder {
    pub fn new() -> Self {
        Self {
            config: ImportConfig::default(),
        }
    }

    /// Set how many rows are searched for the header
    pub fn header_scan_rows(mut self, rows: usize) -> Self {
        self.config.header.scan_rows = rows;
        self
    }

    /// Add a sheet-name pattern to exclude
    pub fn exclude_sheet(mut self, pattern: &str) -> Self {
        self.config.sheets.excluded_patterns.push(pattern.to_lowercase());
        self
    }

    /// Replace the excluded sheet-name patterns
    pub fn excluded_sheets(mut self, patterns: Vec<String>) -> Self {
        self.config.sheets.excluded_patterns = patterns;
        self
    }

    /// Set the default assessment bounds
    pub fn default_bounds(mut self, min: f64, max: f64) -> Self {
        self.config.assessments.default_min = min;
        self.config.assessments.default_max = max;
        self
    }

    /// Set the name used when the workbook has none
    pub fn default_trial_name(mut self, name: &str) -> Self {
        self.config.trial.default_name = name.to_string();
        self
    }

    /// Build the final configuration, applying the same checks as a loaded file
    pub fn build(self) -> Result<ImportConfig, ImportError> {
        self.config.validate()?;
        Ok(self.config)
    }
}

impl Default for ImportConfigBuilder {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_config() {
        let config = ImportConfig::default();

        assert_eq!(config.header.scan_rows, 20);
        assert_eq!(config.header.block_marker, "block!");
        assert_eq!(config.sheets.excluded_patterns.len(), 4);
        assert_eq!(config.assessments.default_max, 100.0);
        assert_eq!(config.trial.default_name, "Imported Trial");
    }

    #[test]
    fn test_partial_toml_keeps_defaults() {
        let config = ImportConfig::from_toml_str(
            r#"
            [header]
            scan_rows = 40

            [trial]
            default_name = "Untitled"
            "#,
        )
        .unwrap();

        assert_eq!(config.header.scan_rows, 40);
        assert_eq!(config.header.plot_marker, "plot!");
        assert_eq!(config.trial.default_name, "Untitled");
        assert_eq!(config.trial.treatment_name_prefix, "Treatment");
    }

    #[test]
    fn test_invalid_toml_is_config_error() {
        let err = ImportConfig::from_toml_str("[header]\nscan_rows = 0\n").unwrap_err();
        assert!(matches!(err, ImportError::Config(_)));

        let err = ImportConfig::from_toml_str("[header\n").unwrap_err();
        assert!(matches!(err, ImportError::Config(_)));
    }

    #[test]
    fn test_builder_pattern() {
        let config = ImportConfig::builder()
            .header_scan_rows(10)
            .exclude_sheet("Summary")
            .default_bounds(0.0, 10.0)
            .default_trial_name("Greens 2024")
            .build()
            .unwrap();

        assert_eq!(config.header.scan_rows, 10);
        assert!(config.sheets.excluded_patterns.contains(&"summary".to_string()));
        assert_eq!(config.assessments.default_max, 10.0);
        assert_eq!(config.trial.default_name, "Greens 2024");
    }

    #[test]
    fn test_load_from_file() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("config.toml");
        std::fs::write(&path, "[assessments]\ndefault_max = 9.0\n").unwrap();

        let config = ImportConfig::load(&path).unwrap();
        assert_eq!(config.assessments.default_max, 9.0);
        assert_eq!(config.assessments.default_min, 0.0);
    }

    #[test]
    fn test_builder_rejects_unusable_config() {
        let err = ImportConfig::builder().header_scan_rows(0).build().unwrap_err();
        assert!(matches!(err, ImportError::Config(_)));

        let err = ImportConfig::builder()
            .excluded_sheets(vec!["".to_string()])
            .build()
            .unwrap_err();
        assert!(matches!(err, ImportError::Config(_)));

        let err = ImportConfig::builder().default_bounds(10.0, 0.0).build().unwrap_err();
        assert!(matches!(err, ImportError::Config(_)));
    }
}
