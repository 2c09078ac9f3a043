use std::sync::Arc;

/// A state shape that can absorb a partial update.
///
/// `merge` must return a fresh value built from `self` with the patch's fields
/// laid over it; fields the patch leaves out keep their current value.
pub trait Merge: Sized {
    /// The partial form of the state.
    type Patch;

    fn merge(&self, patch: Self::Patch) -> Self;
}

macro_rules! merge_by_replacement {
    ($($ty:ty),* $(,)?) => {
        $(
            impl Merge for $ty {
                type Patch = $ty;

                fn merge(&self, patch: $ty) -> $ty {
                    patch
                }
            }
        )*
    };
}

// Non-record states have no fields to merge, so a patch replaces them outright.
merge_by_replacement!(
    bool, char, i8, i16, i32, i64, i128, isize, u8, u16, u32, u64, u128, usize, f32, f64,
    String,
);

impl<T> Merge for Vec<T> {
    type Patch = Vec<T>;

    fn merge(&self, patch: Vec<T>) -> Vec<T> {
        patch
    }
}

impl<T> Merge for Option<T> {
    type Patch = Option<T>;

    fn merge(&self, patch: Option<T>) -> Option<T> {
        patch
    }
}

/// Updater run against the current state to decide the next one.
pub type Compute<S> = Box<dyn FnOnce(&S) -> Update<S> + Send>;

/// One mutation request for a [`Store`](crate::Store).
pub enum Update<S: Merge> {
    /// Swap in a whole new state. Handing back the current `Arc` is a no-op.
    Replace(Arc<S>),
    /// Shallow-merge a patch over the current state.
    Merge(S::Patch),
    /// Compute the update from the current state.
    Compute(Compute<S>),
}

impl<S: Merge> Update<S> {
    pub fn replace(state: S) -> Self {
        Update::Replace(Arc::new(state))
    }

    pub fn merge(patch: S::Patch) -> Self {
        Update::Merge(patch)
    }

    pub fn compute<F>(f: F) -> Self
    where
        F: FnOnce(&S) -> Update<S> + Send + 'static,
    {
        Update::Compute(Box::new(f))
    }

    /// Resolve this update against `current`.
    ///
    /// Returns `None` when the result is the very same `Arc` as `current`.
    pub(crate) fn resolve(self, current: &Arc<S>) -> Option<Arc<S>> {
        match self {
            Update::Replace(next) if Arc::ptr_eq(&next, current) => None,
            Update::Replace(next) => Some(next),
            Update::Merge(patch) => Some(Arc::new(current.merge(patch))),
            Update::Compute(f) => f(current.as_ref()).resolve(current),
        }
    }
}

impl<S: Merge> std::fmt::Debug for Update<S> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Update::Replace(_) => f.write_str("Update::Replace"),
            Update::Merge(_) => f.write_str("Update::Merge"),
            Update::Compute(_) => f.write_str("Update::Compute"),
        }
    }
}
