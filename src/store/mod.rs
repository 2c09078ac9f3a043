//! Observable state containers.
//!
//! A [`Store`] owns one state value, applies [`Update`]s to it and
//! synchronously notifies subscribers. [`StoreHook`] binds a store to a
//! consumer's mount/unmount lifecycle.

mod hook;
mod store;
mod update;

pub use hook::StoreHook;
pub use store::{Store, StoreApi, Subscription};
pub use update::{Compute, Merge, Update};
