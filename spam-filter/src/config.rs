//! Configuration for spam-filter

use serde::{Deserialize, Serialize};
use std::path::Path;

use crate::error::{FilterError, Result};

/// Main filter configuration
#[derive(Debug, Clone, Default, Deserialize, Serialize)]
pub struct FilterConfig {
    #[serde(default)]
    pub training: TrainingConfig,
    #[serde(default)]
    pub corpus: CorpusConfig,
    #[serde(default)]
    pub subject: SubjectConfig,
    #[serde(default)]
    pub logging: LoggingConfig,
}

/// Threshold search parameters
#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct TrainingConfig {
    /// Number of hill-climb iterations
    #[serde(default = "default_iterations")]
    pub iterations: usize,
    /// Largest per-feature perturbation applied on accept
    #[serde(default = "default_max_step")]
    pub max_step: u32,
    /// Seed for the perturbation generator (entropy when absent)
    #[serde(default)]
    pub seed: Option<u64>,
}

/// Reserved file names inside a corpus directory
#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct CorpusConfig {
    #[serde(default = "default_truth_file")]
    pub truth_file: String,
    #[serde(default = "default_prediction_file")]
    pub prediction_file: String,
    /// Files starting with this prefix are never treated as messages
    #[serde(default = "default_reserved_prefix")]
    pub reserved_prefix: String,
}

/// Fixed subject heuristics
#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct SubjectConfig {
    #[serde(default = "default_keywords")]
    pub keywords: Vec<String>,
    #[serde(default = "default_phrases")]
    pub phrases: Vec<String>,
}

#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct LoggingConfig {
    #[serde(default = "default_level")]
    pub level: String,
    /// "pretty" or "json"
    #[serde(default = "default_format")]
    pub format: String,
}

fn default_iterations() -> usize {
    150
}

fn default_max_step() -> u32 {
    3
}

fn default_truth_file() -> String {
    "!truth.txt".to_string()
}

fn default_prediction_file() -> String {
    "!prediction.txt".to_string()
}

fn default_reserved_prefix() -> String {
    "!".to_string()
}

fn default_keywords() -> Vec<String> {
    [
        "fortune",
        "hiring",
        "home",
        "income",
        "wealth",
        "free",
        "lottery",
        "winner",
        "urgent",
        "offer",
        "cash",
        "prize",
        "credit",
        "loan",
        "investment",
        "money",
        "deal",
        "guarantee",
        "cheap",
        "discount",
        "limited",
        "exclusive",
    ]
    .iter()
    .map(|s| s.to_string())
    .collect()
}

fn default_phrases() -> Vec<String> {
    [
        "act now",
        "don’t miss out",
        "urgent response needed",
        "risk-free",
        "no cost",
    ]
    .iter()
    .map(|s| s.to_string())
    .collect()
}

fn default_level() -> String {
    "info".to_string()
}

fn default_format() -> String {
    "pretty".to_string()
}

impl Default for TrainingConfig {
    fn default() -> Self {
        Self {
            iterations: default_iterations(),
            max_step: default_max_step(),
            seed: None,
        }
    }
}

impl Default for CorpusConfig {
    fn default() -> Self {
        Self {
            truth_file: default_truth_file(),
            prediction_file: default_prediction_file(),
            reserved_prefix: default_reserved_prefix(),
        }
    }
}

impl Default for SubjectConfig {
    fn default() -> Self {
        Self {
            keywords: default_keywords(),
            phrases: default_phrases(),
        }
    }
}

impl Default for LoggingConfig {
    fn default() -> Self {
        Self {
            level: default_level(),
            format: default_format(),
        }
    }
}

impl FilterConfig {
    /// Load configuration from a TOML file
    pub fn from_file<P: AsRef<Path>>(path: P) -> Result<Self> {
        let content = std::fs::read_to_string(path)
            .map_err(|e| FilterError::Config(format!("Failed to read config file: {}", e)))?;

        let config: Self = toml::from_str(&content)
            .map_err(|e| FilterError::Config(format!("Failed to parse config: {}", e)))?;

        config.validate()?;
        Ok(config)
    }

    /// Validate configuration
    pub fn validate(&self) -> Result<()> {
        if self.training.iterations == 0 {
            return Err(FilterError::Config(
                "training.iterations must be at least 1".to_string(),
            ));
        }

        if self.corpus.truth_file.is_empty() || self.corpus.prediction_file.is_empty() {
            return Err(FilterError::Config(
                "Truth and prediction file names must not be empty".to_string(),
            ));
        }

        if self.corpus.truth_file == self.corpus.prediction_file {
            return Err(FilterError::Config(format!(
                "Truth and prediction files must differ (both '{}')",
                self.corpus.truth_file
            )));
        }

        Ok(())
    }
}
