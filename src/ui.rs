//! Application chrome state: sidebar, global loading flag and toast
//! notifications.

use std::sync::Arc;

use chrono::{DateTime, Duration, Utc};
use serde::Serialize;
use tracing::debug;
use uuid::Uuid;

use crate::config::UiConfig;
use crate::store::{Merge, Store, Subscription, Update};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum NotificationKind {
    Success,
    Error,
    Warning,
    Info,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Notification {
    pub id: Uuid,
    pub kind: NotificationKind,
    pub message: String,
    pub created_at: DateTime<Utc>,
    /// `None` keeps the notification until it is dismissed.
    pub expires_at: Option<DateTime<Utc>>,
}

impl Notification {
    pub fn is_expired(&self, now: DateTime<Utc>) -> bool {
        self.expires_at.is_some_and(|at| at <= now)
    }
}

/// A notification to be shown.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NewNotification {
    pub kind: NotificationKind,
    pub message: String,
    /// Milliseconds on screen. `None` uses the configured default and zero
    /// never expires.
    pub duration_ms: Option<u64>,
}

impl NewNotification {
    pub fn new(kind: NotificationKind, message: impl Into<String>) -> Self {
        Self {
            kind,
            message: message.into(),
            duration_ms: None,
        }
    }

    pub fn with_duration_ms(mut self, duration_ms: u64) -> Self {
        self.duration_ms = Some(duration_ms);
        self
    }
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct UiState {
    pub sidebar_open: bool,
    pub loading: bool,
    pub notifications: Vec<Notification>,
}

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct UiPatch {
    pub sidebar_open: Option<bool>,
    pub loading: Option<bool>,
    pub notifications: Option<Vec<Notification>>,
}

impl Merge for UiState {
    type Patch = UiPatch;

    fn merge(&self, patch: UiPatch) -> Self {
        Self {
            sidebar_open: patch.sidebar_open.unwrap_or(self.sidebar_open),
            loading: patch.loading.unwrap_or(self.loading),
            notifications: patch
                .notifications
                .unwrap_or_else(|| self.notifications.clone()),
        }
    }
}

/// Store of [`UiState`] with its actions.
///
/// Notifications don't dismiss themselves; whoever owns the event loop calls
/// [`expire_notifications`](UiStore::expire_notifications) on a tick.
#[derive(Clone)]
pub struct UiStore {
    store: Store<UiState>,
    config: UiConfig,
}

impl UiStore {
    pub fn new(config: UiConfig) -> Self {
        Self {
            store: Store::new(UiState::default()),
            config,
        }
    }

    pub fn store(&self) -> &Store<UiState> {
        &self.store
    }

    pub fn state(&self) -> Arc<UiState> {
        self.store.get()
    }

    pub fn subscribe<F>(&self, listener: F) -> Subscription
    where
        F: Fn(&UiState) + Send + Sync + 'static,
    {
        self.store.subscribe(listener)
    }

    pub fn set_sidebar_open(&self, open: bool) {
        self.store.merge(UiPatch {
            sidebar_open: Some(open),
            ..Default::default()
        });
    }

    pub fn set_loading(&self, loading: bool) {
        self.store.merge(UiPatch {
            loading: Some(loading),
            ..Default::default()
        });
    }

    /// Show a notification created now.
    pub fn notify(&self, kind: NotificationKind, message: impl Into<String>) -> Uuid {
        self.add_notification(NewNotification::new(kind, message), Utc::now())
    }

    pub fn add_notification(&self, notification: NewNotification, now: DateTime<Utc>) -> Uuid {
        let duration_ms = notification
            .duration_ms
            .unwrap_or(self.config.notification_duration_ms);
        let expires_at = match duration_ms {
            0 => None,
            ms => i64::try_from(ms)
                .ok()
                .and_then(Duration::try_milliseconds)
                .and_then(|lifetime| now.checked_add_signed(lifetime)),
        };
        let id = Uuid::new_v4();
        let entry = Notification {
            id,
            kind: notification.kind,
            message: notification.message,
            created_at: now,
            expires_at,
        };
        debug!(%id, kind = ?entry.kind, "notification added");
        self.store.set(Update::compute(move |state: &UiState| {
            let mut notifications = state.notifications.clone();
            notifications.push(entry);
            Update::merge(UiPatch {
                notifications: Some(notifications),
                ..Default::default()
            })
        }));
        id
    }

    pub fn remove_notification(&self, id: Uuid) {
        self.retain_notifications(|n| n.id != id);
    }

    /// Drop every notification whose time is up. Returns how many went.
    pub fn expire_notifications(&self, now: DateTime<Utc>) -> usize {
        self.retain_notifications(|n| !n.is_expired(now))
    }

    pub fn clear_notifications(&self) {
        self.store.merge(UiPatch {
            notifications: Some(Vec::new()),
            ..Default::default()
        });
    }

    fn retain_notifications<F>(&self, keep: F) -> usize
    where
        F: Fn(&Notification) -> bool,
    {
        let current = self.store.read(|state| state.notifications.clone());
        let before = current.len();
        let kept: Vec<Notification> = current.into_iter().filter(|n| keep(n)).collect();
        let removed = before - kept.len();
        if removed > 0 {
            self.store.merge(UiPatch {
                notifications: Some(kept),
                ..Default::default()
            });
        }
        removed
    }
}

impl Default for UiStore {
    fn default() -> Self {
        Self::new(UiConfig::default())
    }
}
