//! In-app notifications and channel preferences.

use chrono::{DateTime, Utc};
use glamora_core::{NotificationId, NotificationType};
use serde::{Deserialize, Serialize};

/// Title used when a push arrives without one.
const DEFAULT_PUSH_TITLE: &str = "Notification";

/// A notification shown in the in-app inbox.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Notification {
    pub id: NotificationId,
    #[serde(rename = "type")]
    pub kind: NotificationType,
    pub title: String,
    pub message: String,
    #[serde(default)]
    pub read: bool,
    pub timestamp: DateTime<Utc>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub image_url: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub action_url: Option<String>,
}

/// Content of an inbound push notification.
///
/// Every field is optional on the wire; [`Notification::from_push`] fills in
/// the gaps.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct PushPayload {
    pub title: Option<String>,
    pub body: Option<String>,
    #[serde(default)]
    pub data: Option<PushData>,
}

/// Custom data attached to a push.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct PushData {
    #[serde(rename = "type")]
    pub kind: Option<String>,
    #[serde(rename = "imageUrl")]
    pub image_url: Option<String>,
    #[serde(rename = "actionUrl")]
    pub action_url: Option<String>,
}

impl Notification {
    /// Build an unread inbox record from a push received at `at`.
    ///
    /// A missing or unrecognised `data.type` falls back to
    /// [`NotificationType::System`].
    #[must_use]
    pub fn from_push(payload: PushPayload, at: DateTime<Utc>) -> Self {
        let data = payload.data.unwrap_or_default();
        let kind = data
            .kind
            .as_deref()
            .and_then(|k| k.parse().ok())
            .unwrap_or_default();

        Self {
            id: NotificationId::from_timestamp(at),
            kind,
            title: payload
                .title
                .unwrap_or_else(|| DEFAULT_PUSH_TITLE.to_string()),
            message: payload.body.unwrap_or_default(),
            read: false,
            timestamp: at,
            image_url: data.image_url,
            action_url: data.action_url,
        }
    }
}

/// Per-channel notification toggles. All channels start enabled.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct NotificationPreferences {
    pub system: bool,
    pub transactional: bool,
    pub social: bool,
    pub reminders: bool,
}

impl Default for NotificationPreferences {
    fn default() -> Self {
        Self {
            system: true,
            transactional: true,
            social: true,
            reminders: true,
        }
    }
}

/// Partial preference change. `None` leaves the channel as it is.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Deserialize)]
pub struct PreferencesUpdate {
    pub system: Option<bool>,
    pub transactional: Option<bool>,
    pub social: Option<bool>,
    pub reminders: Option<bool>,
}

impl NotificationPreferences {
    /// Merge `update` into these preferences.
    #[must_use]
    pub fn merged(self, update: PreferencesUpdate) -> Self {
        Self {
            system: update.system.unwrap_or(self.system),
            transactional: update.transactional.unwrap_or(self.transactional),
            social: update.social.unwrap_or(self.social),
            reminders: update.reminders.unwrap_or(self.reminders),
        }
    }
}
