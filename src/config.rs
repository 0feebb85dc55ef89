//! Configuration management for the action classifier and its driver

use crate::{
    classifier::{create_rule, ActionClassifier, Sensitivity},
    constants::{DEFAULT_CONFIDENCE_THRESHOLD, DEFAULT_MAJORITY_WINDOW, DEFAULT_RAISE_MARGIN, DEFAULT_RULE_ORDER},
    smoothing::{create_smoother, parse_smoother_spec, LabelSmoother},
    Error, Result,
};
use serde::{Deserialize, Serialize};
use std::path::Path;

/// Application configuration
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Config {
    /// Classifier configuration
    pub classifier: ClassifierConfig,

    /// Label smoothing configuration
    pub smoothing: SmoothingConfig,
}

/// Classifier gates and rule order
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ClassifierConfig {
    /// Minimum landmark confidence (0.0-1.0, inclusive)
    pub confidence_threshold: f32,

    /// Vertical distance a wrist must clear above its shoulder
    pub raise_margin: f32,

    /// Rule names in priority order
    pub rules: Vec<String>,
}

/// Smoothing configuration
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct SmoothingConfig {
    /// Smoother type: none, majority or debounce
    pub method: String,

    /// Window size (majority) or consecutive frames (debounce)
    pub window: usize,
}

impl Default for ClassifierConfig {
    fn default() -> Self {
        Self {
            confidence_threshold: DEFAULT_CONFIDENCE_THRESHOLD,
            raise_margin: DEFAULT_RAISE_MARGIN,
            rules: DEFAULT_RULE_ORDER.iter().map(ToString::to_string).collect(),
        }
    }
}

impl Default for SmoothingConfig {
    fn default() -> Self {
        Self {
            method: "none".to_string(),
            window: DEFAULT_MAJORITY_WINDOW,
        }
    }
}

impl ClassifierConfig {
    /// Gates as seen by the rules
    #[must_use]
    pub fn sensitivity(&self) -> Sensitivity {
        Sensitivity {
            confidence_threshold: self.confidence_threshold,
            raise_margin: self.raise_margin,
        }
    }
}

impl SmoothingConfig {
    /// Smoother spec string understood by [`create_smoother`]
    #[must_use]
    pub fn spec(&self) -> String {
        match parse_smoother_spec(&self.method) {
            Ok(parsed) if !parsed.kind.takes_window() => self.method.clone(),
            _ => format!("{}:{}", self.method, self.window),
        }
    }
}

impl Config {
    /// Load configuration from a YAML file
    ///
    /// # Errors
    ///
    /// Returns an error if the file cannot be read or is not valid YAML
    pub fn from_file<P: AsRef<Path>>(path: P) -> Result<Self> {
        let content = std::fs::read_to_string(path)?;
        Self::from_yaml(&content)
    }

    /// Parse configuration from YAML text
    ///
    /// # Errors
    ///
    /// Returns an error if the text is not valid configuration YAML
    pub fn from_yaml(content: &str) -> Result<Self> {
        serde_yaml::from_str(content).map_err(|e| Error::ConfigError(format!("Failed to parse config: {e}")))
    }

    /// Save configuration to a YAML file
    ///
    /// # Errors
    ///
    /// Returns an error if serialization or the write fails
    pub fn to_file<P: AsRef<Path>>(&self, path: P) -> Result<()> {
        let content = serde_yaml::to_string(self)
            .map_err(|e| Error::ConfigError(format!("Failed to serialize config: {e}")))?;

        std::fs::write(path, content)?;

        Ok(())
    }

    /// Apply command-line overrides on top of the loaded configuration.
    ///
    /// `smoothing` uses the smoother spec syntax (`majority:7`); a spec
    /// without a window keeps the configured one.
    ///
    /// # Errors
    ///
    /// Returns an error if the smoothing spec does not parse
    pub fn apply_overrides(&mut self, threshold: Option<f32>, margin: Option<f32>, smoothing: Option<&str>) -> Result<()> {
        if let Some(threshold) = threshold {
            self.classifier.confidence_threshold = threshold;
        }
        if let Some(margin) = margin {
            self.classifier.raise_margin = margin;
        }
        if let Some(spec) = smoothing {
            let parsed = parse_smoother_spec(spec)?;
            self.smoothing.method = parsed.kind.name().to_string();
            if let Some(window) = parsed.window {
                self.smoothing.window = window;
            }
        }
        Ok(())
    }

    /// Build the classifier described by this configuration
    ///
    /// # Errors
    ///
    /// Returns an error if a rule name is unknown
    pub fn create_classifier(&self) -> Result<ActionClassifier> {
        let rules = self
            .classifier
            .rules
            .iter()
            .map(|name| create_rule(name))
            .collect::<Result<Vec<_>>>()?;

        Ok(ActionClassifier::with_rules(self.classifier.sensitivity(), rules))
    }

    /// Build the smoother described by this configuration
    ///
    /// # Errors
    ///
    /// Returns an error if the method is unknown or the window is zero
    pub fn create_smoother(&self) -> Result<Box<dyn LabelSmoother>> {
        create_smoother(&self.smoothing.spec())
    }

    /// Validate configuration
    ///
    /// # Errors
    ///
    /// Returns a `ConfigError` describing the first invalid setting
    pub fn validate(&self) -> Result<()> {
        if !(0.0..=1.0).contains(&self.classifier.confidence_threshold) {
            return Err(Error::ConfigError(
                "Confidence threshold must be between 0.0 and 1.0".to_string(),
            ));
        }
        if !self.classifier.raise_margin.is_finite() || self.classifier.raise_margin < 0.0 {
            return Err(Error::ConfigError(
                "Raise margin must be a finite, non-negative number".to_string(),
            ));
        }

        if self.classifier.rules.is_empty() {
            return Err(Error::ConfigError("At least one rule must be configured".to_string()));
        }
        for name in &self.classifier.rules {
            create_rule(name).map_err(|e| Error::ConfigError(e.to_string()))?;
        }

        let smoothing = parse_smoother_spec(&self.smoothing.method).map_err(|e| Error::ConfigError(e.to_string()))?;
        if smoothing.kind.takes_window() && self.smoothing.window == 0 {
            return Err(Error::ConfigError(
                "Smoothing window must be greater than 0".to_string(),
            ));
        }
        self.create_smoother().map_err(|e| Error::ConfigError(e.to_string()))?;

        Ok(())
    }
}

/// Example configuration file content
pub const EXAMPLE_CONFIG: &str = r#"# Landmark Action Configuration

# Classifier settings
classifier:
  # Landmarks below this visibility are ignored (inclusive gate)
  confidence_threshold: 0.5
  # Wrist must be this far above the shoulder (normalized image units)
  raise_margin: 0.0
  # Rules are tried in this order; the first match wins
  rules:
    - raise_left_hand
    - raise_right_hand
    - standing

# Label smoothing applied after classification (none, majority, debounce)
smoothing:
  method: "none"
  window: 5
"#;
