//! # valuer-state
//!
//! Client-side state for the ValuerPro report-authoring front-end.
//!
//! ## Store (the primitive)
//!
//! [`Store<S>`] holds one state value and applies [`Update`]s to it:
//! - `Replace` swaps in a whole new value (the same `Arc` is a no-op)
//! - `Merge` lays a partial [`Merge::Patch`] over the current value
//! - `Compute` derives either of the above from the current value
//!
//! Every effective update notifies subscribers synchronously, in registration
//! order, before `set` returns. [`StoreHook`] ties a subscription to a
//! consumer's mount/unmount lifecycle.
//!
//! ## Stores built on it
//!
//! - [`wizard::ReportWizard`]: the multi-step valuation report wizard with
//!   per-step validation and gated navigation
//! - [`ui::UiStore`]: sidebar, loading flag and notifications
//!
//! Each store is an explicitly constructed value; share it by cloning the
//! handle rather than through a global.

pub mod config;
pub mod error;
pub mod store;
pub mod ui;
pub mod wizard;

// Re-export main types for convenience
pub use config::{Config, UiConfig, WizardConfig};
pub use error::{Error, Result};
pub use store::{Merge, Store, StoreApi, StoreHook, Subscription, Update};
pub use ui::UiStore;
pub use wizard::{ReportWizard, WizardState};
