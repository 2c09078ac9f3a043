use std::sync::Arc;

use tracing::trace;

use super::store::{Store, Subscription};
use super::update::Merge;

/// A store bound to one consumer, such as a mounted view.
///
/// The first [`use_state`](StoreHook::use_state) call subscribes; later calls
/// reuse that subscription. Every effective change calls `rerender`. Dropping
/// the hook (or calling [`unmount`](StoreHook::unmount)) ends the subscription,
/// so each mount is paired with exactly one unsubscribe.
///
/// ```
/// use std::sync::atomic::{AtomicUsize, Ordering};
/// use std::sync::Arc;
/// use valuer_state::{Store, Update};
///
/// let store = Store::new(0u32);
/// let renders = Arc::new(AtomicUsize::new(0));
///
/// let mut hook = store.hook({
///     let renders = renders.clone();
///     move || {
///         renders.fetch_add(1, Ordering::SeqCst);
///     }
/// });
/// assert_eq!(*hook.use_state(), 0);
///
/// store.set(Update::replace(3));
/// assert_eq!(renders.load(Ordering::SeqCst), 1);
/// assert_eq!(*hook.use_state(), 3);
///
/// hook.unmount();
/// assert_eq!(store.listener_count(), 0);
/// ```
pub struct StoreHook<S> {
    store: Store<S>,
    rerender: Arc<dyn Fn() + Send + Sync>,
    subscription: Option<Subscription>,
}

impl<S> StoreHook<S>
where
    S: Merge + Send + Sync + 'static,
{
    pub(crate) fn new<R>(store: Store<S>, rerender: R) -> Self
    where
        R: Fn() + Send + Sync + 'static,
    {
        Self {
            store,
            rerender: Arc::new(rerender),
            subscription: None,
        }
    }

    /// Latest snapshot, subscribing on first use.
    pub fn use_state(&mut self) -> Arc<S> {
        if self.subscription.is_none() {
            let rerender = Arc::clone(&self.rerender);
            self.subscription = Some(self.store.subscribe(move |_| rerender()));
            trace!("store hook mounted");
        }
        self.store.get()
    }

    pub fn is_mounted(&self) -> bool {
        self.subscription.is_some()
    }

    /// The store this hook reads from.
    pub fn store(&self) -> &Store<S> {
        &self.store
    }

    pub fn unmount(mut self) {
        self.release();
    }

    fn release(&mut self) {
        if let Some(subscription) = self.subscription.take() {
            subscription.unsubscribe();
            trace!("store hook unmounted");
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::store::Update;
    use std::sync::atomic::{AtomicUsize, Ordering};

    fn render_counter() -> (Arc<AtomicUsize>, impl Fn() + Send + Sync + 'static) {
        let renders = Arc::new(AtomicUsize::new(0));
        let renders_clone = renders.clone();
        (renders, move || {
            renders_clone.fetch_add(1, Ordering::SeqCst);
        })
    }

    #[test]
    fn subscribes_once_across_renders() {
        let store = Store::new(0i32);
        let (renders, rerender) = render_counter();
        let mut hook = store.hook(rerender);

        assert!(!hook.is_mounted());
        hook.use_state();
        hook.use_state();
        hook.use_state();
        assert_eq!(store.listener_count(), 1);

        store.set(Update::replace(1));
        assert_eq!(renders.load(Ordering::SeqCst), 1);
    }

    #[test]
    fn drop_pairs_with_mount() {
        let store = Store::new(0i32);
        let (renders, rerender) = render_counter();
        {
            let mut hook = store.hook(rerender);
            hook.use_state();
            assert_eq!(store.listener_count(), 1);
        }
        assert_eq!(store.listener_count(), 0);

        store.set(Update::replace(1));
        assert_eq!(renders.load(Ordering::SeqCst), 0);
    }

    #[test]
    fn unmounted_hook_never_subscribed() {
        let store = Store::new(0i32);
        let (_, rerender) = render_counter();
        let hook = store.hook(rerender);
        hook.unmount();
        assert_eq!(store.listener_count(), 0);
    }
}
