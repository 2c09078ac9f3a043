//! Error types shared by the stores, the wizard and configuration loading.

use thiserror::Error;

/// Convenience alias used throughout the crate.
pub type Result<T> = std::result::Result<T, Error>;

#[derive(Debug, Error)]
pub enum Error {
    /// A [`StoreApi`](crate::store::StoreApi) was used before its store finished
    /// construction or after every owning handle was dropped.
    #[error("store is not attached (still initializing or already dropped)")]
    Detached,

    /// A checked navigation target fell outside the wizard.
    #[error("step {step} is out of range (wizard has {count} steps)")]
    StepOutOfRange { step: usize, count: usize },

    /// A section patch did not fit the section's shape.
    #[error("invalid data for section `{section}`: {source}")]
    SectionData {
        section: &'static str,
        #[source]
        source: serde_json::Error,
    },

    #[error("failed to serialize report data: {0}")]
    Serialization(#[from] serde_json::Error),

    #[error("invalid configuration: {0}")]
    Config(#[from] toml::de::Error),
}
