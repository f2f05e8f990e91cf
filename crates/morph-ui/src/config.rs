//! Navigation view configuration
//!
//! Every field has a default, so a configuration file only needs the values
//! it overrides:
//!
//! ```rust
//! use morph_ui::config::NavigationConfig;
//!
//! let config = NavigationConfig::from_json(r#"{ "backLabel": "Назад" }"#).unwrap();
//! assert_eq!(config.back_label, "Назад");
//! assert_eq!(config.regular_bar_height, 48.0);
//! ```

use crate::theme::Color;
use crate::tokens;
use crate::view::SizeClass;
use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Configuration errors
#[derive(Debug, Error)]
pub enum ConfigError {
    /// The document is not valid configuration JSON
    #[error("Failed to parse navigation config: {0}")]
    Parse(#[from] serde_json::Error),

    /// A value is out of range
    #[error("Invalid navigation config: {0}")]
    Invalid(String),
}

/// Configuration of a navigation host
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct NavigationConfig {
    /// Bar height in the regular vertical size class
    pub regular_bar_height: f32,

    /// Bar height in the compact vertical size class
    pub compact_bar_height: f32,

    /// Back button label used when there is no previous title
    pub back_label: String,

    /// Tint used until a page declares one
    pub default_tint: Color,

    /// Whether navigation changes are animated
    pub animated: bool,

    /// Transition duration in milliseconds
    pub animation_duration_ms: u32,

    /// Transition easing curve
    pub easing: String,
}

impl Default for NavigationConfig {
    fn default() -> Self {
        Self {
            regular_bar_height: tokens::bar::REGULAR_HEIGHT,
            compact_bar_height: tokens::bar::COMPACT_HEIGHT,
            back_label: "Back".to_string(),
            default_tint: Color::WHITE,
            animated: true,
            animation_duration_ms: tokens::duration::SLOW,
            easing: tokens::easing::DEFAULT.to_string(),
        }
    }
}

impl NavigationConfig {
    /// Parse and validate a JSON configuration document
    pub fn from_json(json: &str) -> Result<Self, ConfigError> {
        let config: Self = serde_json::from_str(json)?;
        config.validate()?;
        Ok(config)
    }

    /// Serialize to pretty JSON
    pub fn to_json(&self) -> Result<String, ConfigError> {
        Ok(serde_json::to_string_pretty(self)?)
    }

    /// Check value ranges
    pub fn validate(&self) -> Result<(), ConfigError> {
        for (name, height) in [
            ("regularBarHeight", self.regular_bar_height),
            ("compactBarHeight", self.compact_bar_height),
        ] {
            if !height.is_finite() || height <= 0.0 {
                return Err(ConfigError::Invalid(format!(
                    "{name} must be positive, got {height}"
                )));
            }
        }
        if self.back_label.trim().is_empty() {
            return Err(ConfigError::Invalid("backLabel must not be empty".into()));
        }
        Ok(())
    }

    /// Bar height for a vertical size class
    pub fn bar_height(&self, size_class: SizeClass) -> f32 {
        match size_class {
            SizeClass::Regular => self.regular_bar_height,
            SizeClass::Compact => self.compact_bar_height,
        }
    }
}
