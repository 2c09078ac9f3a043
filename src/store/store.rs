use std::convert::Infallible;
use std::sync::atomic::{AtomicBool, AtomicUsize, Ordering};
use std::sync::{Arc, Mutex, PoisonError, RwLock, RwLockReadGuard, RwLockWriteGuard, Weak};

use tracing::{debug, trace};

use super::hook::StoreHook;
use super::update::{Merge, Update};
use crate::error::{Error, Result};

type Listener<S> = Arc<dyn Fn(&S) + Send + Sync>;

struct Entry<S> {
    id: usize,
    live: AtomicBool,
    listener: Listener<S>,
}

struct Inner<S> {
    state: RwLock<Arc<S>>,
    // Held from snapshot to swap so concurrent writers never resolve
    // against the same state. Released before listeners run.
    writer: Mutex<()>,
    listeners: RwLock<Vec<Arc<Entry<S>>>>,
    next_id: AtomicUsize,
}

// A listener that panicked mid-dispatch must not brick the store.
fn read<T>(lock: &RwLock<T>) -> RwLockReadGuard<'_, T> {
    lock.read().unwrap_or_else(PoisonError::into_inner)
}

fn write<T>(lock: &RwLock<T>) -> RwLockWriteGuard<'_, T> {
    lock.write().unwrap_or_else(PoisonError::into_inner)
}

impl<S> Inner<S>
where
    S: Merge + Send + Sync + 'static,
{
    fn new(initial: S) -> Self {
        Self {
            state: RwLock::new(Arc::new(initial)),
            writer: Mutex::new(()),
            listeners: RwLock::new(Vec::new()),
            next_id: AtomicUsize::new(0),
        }
    }

    fn snapshot(&self) -> Arc<S> {
        Arc::clone(&read(&self.state))
    }

    fn apply(&self, update: Update<S>) -> bool {
        match self.transact(|_| Ok::<_, Infallible>(update)) {
            Ok(notified) => notified,
            Err(never) => match never {},
        }
    }

    /// Resolve and commit one update atomically with respect to other
    /// writers, then notify.
    fn transact<F, E>(&self, f: F) -> std::result::Result<bool, E>
    where
        F: FnOnce(&Arc<S>) -> std::result::Result<Update<S>, E>,
    {
        let writer = self.writer.lock().unwrap_or_else(PoisonError::into_inner);
        let current = self.snapshot();
        let Some(next) = f(&current)?.resolve(&current) else {
            trace!("set resolved to the current state; skipping notification");
            return Ok(false);
        };
        *write(&self.state) = next;
        drop(writer);
        debug!("store state committed");
        self.notify();
        Ok(true)
    }

    /// Call every listener registered at the moment of the call.
    ///
    /// No lock is held while a listener runs, so listeners may subscribe,
    /// unsubscribe or set again.
    fn notify(&self) {
        let entries: Vec<Arc<Entry<S>>> = read(&self.listeners).clone();
        trace!(listeners = entries.len(), "dispatching state change");
        for entry in entries {
            if !entry.live.load(Ordering::SeqCst) {
                continue;
            }
            let state = self.snapshot();
            (entry.listener)(state.as_ref());
        }
    }

    fn subscribe(&self, listener: Listener<S>) -> usize {
        let id = self.next_id.fetch_add(1, Ordering::SeqCst);
        write(&self.listeners).push(Arc::new(Entry {
            id,
            live: AtomicBool::new(true),
            listener,
        }));
        debug!(listener = id, "listener subscribed");
        id
    }

    fn unsubscribe(&self, id: usize) {
        let mut listeners = write(&self.listeners);
        listeners.retain(|entry| {
            if entry.id == id {
                entry.live.store(false, Ordering::SeqCst);
                false
            } else {
                true
            }
        });
        debug!(listener = id, "listener unsubscribed");
    }
}

/// An observable state container.
///
/// The state is held behind an `Arc` and is never mutated in place: every
/// effective [`set`](Store::set) swaps in a new value and then synchronously
/// calls each listener, in registration order, before returning.
///
/// Cloning a `Store` yields another handle to the same state and listeners.
///
/// # Examples
///
/// ```
/// use valuer_state::{Store, Update};
///
/// let store = Store::new(1);
/// let _sub = store.subscribe(|n: &i32| println!("now {n}"));
///
/// store.set(Update::replace(2));
/// assert_eq!(*store.get(), 2);
/// ```
pub struct Store<S> {
    inner: Arc<Inner<S>>,
}

impl<S> Store<S>
where
    S: Merge + Send + Sync + 'static,
{
    /// Create a new store with the given initial state.
    pub fn new(initial: S) -> Self {
        Self {
            inner: Arc::new(Inner::new(initial)),
        }
    }

    /// Create a store whose initial state is produced by `initializer`.
    ///
    /// The initializer receives a [`StoreApi`] it can hand to closures that
    /// need to read or write the store later. The api is inert until this
    /// function returns.
    ///
    /// ```
    /// use valuer_state::{Store, Update};
    ///
    /// let mut api = None;
    /// let store = Store::create(|handle| {
    ///     api = Some(handle.clone());
    ///     0u32
    /// });
    ///
    /// let api = api.unwrap();
    /// api.set(Update::replace(7)).unwrap();
    /// assert_eq!(*store.get(), 7);
    /// ```
    pub fn create<F>(initializer: F) -> Self
    where
        F: FnOnce(&StoreApi<S>) -> S,
    {
        let inner = Arc::new_cyclic(|weak| {
            let api = StoreApi {
                inner: Weak::clone(weak),
            };
            Inner::new(initializer(&api))
        });
        Self { inner }
    }

    /// Current state. Never stale relative to the last completed `set`.
    pub fn get(&self) -> Arc<S> {
        self.inner.snapshot()
    }

    /// Apply an update, returning whether listeners were notified.
    ///
    /// Writers are serialized: a `Compute` update always sees the state left
    /// by the previous `set`, even across threads. An updater must not call
    /// `set` on the same store; listeners may.
    pub fn set(&self, update: Update<S>) -> bool {
        self.inner.apply(update)
    }

    /// Apply the update produced by a fallible updater.
    ///
    /// If the updater fails the error is handed back and the state is left
    /// exactly as it was; no listener runs.
    pub fn try_set<F, E>(&self, f: F) -> std::result::Result<bool, E>
    where
        F: FnOnce(&S) -> std::result::Result<Update<S>, E>,
    {
        self.inner.transact(|current| f(current.as_ref()))
    }

    /// Replace the whole state.
    pub fn replace(&self, state: S) -> bool {
        self.set(Update::replace(state))
    }

    /// Shallow-merge a patch over the current state.
    pub fn merge(&self, patch: S::Patch) -> bool {
        self.set(Update::Merge(patch))
    }

    /// Read state without cloning it.
    pub fn read<F, R>(&self, f: F) -> R
    where
        F: FnOnce(&S) -> R,
    {
        f(self.inner.snapshot().as_ref())
    }

    /// Register a listener for every effective state change.
    ///
    /// The listener stays registered until the returned [`Subscription`] is
    /// dropped or explicitly unsubscribed.
    pub fn subscribe<F>(&self, listener: F) -> Subscription
    where
        F: Fn(&S) + Send + Sync + 'static,
    {
        let id = self.inner.subscribe(Arc::new(listener));
        let weak = Arc::downgrade(&self.inner);
        Subscription::new(move || {
            if let Some(inner) = weak.upgrade() {
                inner.unsubscribe(id);
            }
        })
    }

    /// Number of listeners currently registered.
    pub fn listener_count(&self) -> usize {
        read(&self.inner.listeners).len()
    }

    /// Bind this store to a consumer that re-renders on change.
    pub fn hook<R>(&self, rerender: R) -> StoreHook<S>
    where
        R: Fn() + Send + Sync + 'static,
    {
        StoreHook::new(self.clone(), rerender)
    }

    /// A weak handle to this store.
    pub fn api(&self) -> StoreApi<S> {
        StoreApi {
            inner: Arc::downgrade(&self.inner),
        }
    }
}

impl<S> Store<S>
where
    S: Merge + Clone + Send + Sync + 'static,
{
    /// Update the state using a function over a private copy.
    pub fn update<F>(&self, f: F) -> bool
    where
        F: FnOnce(&mut S),
    {
        self.inner.transact(|current| {
            let mut next = S::clone(current.as_ref());
            f(&mut next);
            Ok::<_, Infallible>(Update::replace(next))
        })
        .unwrap_or_else(|never| match never {})
    }
}

impl<S> Clone for Store<S> {
    fn clone(&self) -> Self {
        Self {
            inner: Arc::clone(&self.inner),
        }
    }
}

/// Weak `get`/`set` handle to a store.
///
/// Action closures capture this rather than the store itself so they don't
/// keep it alive.
pub struct StoreApi<S> {
    inner: Weak<Inner<S>>,
}

impl<S> StoreApi<S>
where
    S: Merge + Send + Sync + 'static,
{
    /// Current state, or `None` while the store is initializing or gone.
    pub fn get(&self) -> Option<Arc<S>> {
        self.inner.upgrade().map(|inner| inner.snapshot())
    }

    pub fn set(&self, update: Update<S>) -> Result<bool> {
        let inner = self.inner.upgrade().ok_or(Error::Detached)?;
        Ok(inner.apply(update))
    }
}

impl<S> Clone for StoreApi<S> {
    fn clone(&self) -> Self {
        Self {
            inner: Weak::clone(&self.inner),
        }
    }
}

/// RAII guard for a store listener.
#[must_use = "dropping a Subscription unsubscribes its listener"]
pub struct Subscription {
    unsubscribe: Option<Box<dyn FnOnce() + Send + Sync>>,
}

impl Subscription {
    fn new<F>(unsubscribe: F) -> Self
    where
        F: FnOnce() + Send + Sync + 'static,
    {
        Self {
            unsubscribe: Some(Box::new(unsubscribe)),
        }
    }

    pub fn unsubscribe(mut self) {
        if let Some(unsubscribe) = self.unsubscribe.take() {
            unsubscribe();
        }
    }

    /// Keep the listener registered for as long as the store lives.
    pub fn detach(mut self) {
        self.unsubscribe = None;
    }
}

impl Drop for Subscription {
    fn drop(&mut self) {
        if let Some(unsubscribe) = self.unsubscribe.take() {
            unsubscribe();
        }
    }
}

impl std::fmt::Debug for Subscription {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Subscription")
            .field("active", &self.unsubscribe.is_some())
            .finish()
    }
}
