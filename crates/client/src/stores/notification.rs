//! Notification inbox.

use std::sync::Arc;

use glamora_core::NotificationId;
use parking_lot::RwLock;
use tracing::debug;

use crate::clock::Clock;
use crate::models::{Notification, NotificationPreferences, PreferencesUpdate, PushPayload};

/// Notifications newest first, with a running unread count.
///
/// Local only: nothing here talks to the backend. Preferences are stored but
/// do not filter incoming notifications.
#[derive(Debug)]
pub struct NotificationStore {
    state: RwLock<Inbox>,
    clock: Arc<dyn Clock>,
}

#[derive(Debug, Default)]
struct Inbox {
    notifications: Vec<Notification>,
    unread_count: usize,
    preferences: NotificationPreferences,
}

impl NotificationStore {
    #[must_use]
    pub fn new(clock: Arc<dyn Clock>) -> Self {
        Self {
            state: RwLock::new(Inbox::default()),
            clock,
        }
    }

    /// Put a notification at the head of the inbox.
    pub fn add(&self, notification: Notification) {
        let mut inbox = self.state.write();
        if !notification.read {
            inbox.unread_count += 1;
        }
        inbox.notifications.insert(0, notification);
    }

    /// Convert an inbound push and add it.
    pub fn receive_push(&self, payload: PushPayload) -> NotificationId {
        let notification = Notification::from_push(payload, self.clock.now());
        let id = notification.id.clone();
        debug!(notification_id = %id, kind = ?notification.kind, "Push received");
        self.add(notification);
        id
    }

    /// Mark one notification read. Repeated calls change nothing.
    pub fn mark_as_read(&self, id: &NotificationId) {
        let mut inbox = self.state.write();
        let Some(notification) = inbox
            .notifications
            .iter_mut()
            .find(|n| &n.id == id && !n.read)
        else {
            return;
        };
        notification.read = true;
        inbox.unread_count = inbox.unread_count.saturating_sub(1);
    }

    pub fn mark_all_as_read(&self) {
        let mut inbox = self.state.write();
        for n in &mut inbox.notifications {
            n.read = true;
        }
        inbox.unread_count = 0;
    }

    /// Merge a partial preference change.
    pub fn update_preferences(&self, update: PreferencesUpdate) {
        let mut inbox = self.state.write();
        inbox.preferences = inbox.preferences.merged(update);
    }

    #[must_use]
    pub fn preferences(&self) -> NotificationPreferences {
        self.state.read().preferences
    }

    #[must_use]
    pub fn unread_count(&self) -> usize {
        self.state.read().unread_count
    }

    #[must_use]
    pub fn notifications(&self) -> Vec<Notification> {
        self.state.read().notifications.clone()
    }
}
