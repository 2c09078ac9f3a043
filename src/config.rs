//! Runtime configuration for the stores.
//!
//! Every field has a default, so an empty document is a valid config:
//!
//! ```
//! use valuer_state::Config;
//!
//! let config = Config::from_toml_str(
//!     r#"
//!     [wizard]
//!     reference_prefix = "VAL-"
//!     "#,
//! )
//! .unwrap();
//!
//! assert_eq!(config.wizard.reference_prefix, "VAL-");
//! assert_eq!(config.wizard.recommended_completeness, 80);
//! assert_eq!(config.ui.notification_duration_ms, 5000);
//! ```

use serde::{Deserialize, Serialize};

use crate::error::Result;

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct Config {
    pub wizard: WizardConfig,
    pub ui: UiConfig,
}

impl Config {
    pub fn from_toml_str(source: &str) -> Result<Self> {
        Ok(toml::from_str(source)?)
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct WizardConfig {
    /// Prepended to the creation timestamp to form a draft's reference number.
    pub reference_prefix: String,
    /// Completeness percentage below which the review step recommends more work.
    pub recommended_completeness: u8,
}

impl Default for WizardConfig {
    fn default() -> Self {
        Self {
            reference_prefix: "VPR-".to_string(),
            recommended_completeness: 80,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct UiConfig {
    /// Lifetime of a notification that doesn't specify one. Zero keeps
    /// notifications until they are dismissed.
    pub notification_duration_ms: u64,
}

impl Default for UiConfig {
    fn default() -> Self {
        Self {
            notification_duration_ms: 5000,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::Error;

    #[test]
    fn empty_document_uses_defaults() {
        assert_eq!(Config::from_toml_str("").unwrap(), Config::default());
    }

    #[test]
    fn partial_sections_fill_in() {
        let config = Config::from_toml_str(
            r#"
            [ui]
            notification_duration_ms = 0
            "#,
        )
        .unwrap();
        assert_eq!(config.ui.notification_duration_ms, 0);
        assert_eq!(config.wizard, WizardConfig::default());
    }

    #[test]
    fn wrong_type_is_a_config_error() {
        let err = Config::from_toml_str("[wizard]\nrecommended_completeness = \"high\"").unwrap_err();
        assert!(matches!(err, Error::Config(_)));
    }
}
