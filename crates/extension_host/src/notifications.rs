//! Host notification contracts mirroring the WebExtensions notification shape.

use std::{cell::RefCell, collections::BTreeMap, future::Future, pin::Pin, rc::Rc};

use serde::{Deserialize, Serialize};

/// Packaged icon shown when a notification supplies no icon of its own.
pub const DEFAULT_NOTIFICATION_ICON: &str = "src/assets/icons/icon48.png";

/// Object-safe boxed future used by [`NotificationService`] async methods.
pub type NotificationFuture<'a, T> = Pin<Box<dyn Future<Output = T> + 'a>>;

/// Visual template of a host notification.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum NotificationKind {
    /// Icon, title, and message.
    Basic,
    /// Basic plus a preview image.
    Image,
    /// Basic plus an item list.
    List,
    /// Basic plus a progress indicator.
    Progress,
}

/// Payload for [`NotificationService::create`], serialized in the host's
/// `{type, iconUrl, title, message}` shape.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct NotificationOptions {
    /// Template selector, serialized as `type`.
    #[serde(rename = "type")]
    pub kind: NotificationKind,
    /// Extension-relative icon path.
    pub icon_url: String,
    /// Notification title line.
    pub title: String,
    /// Notification body text.
    pub message: String,
}

impl NotificationOptions {
    /// Creates a basic notification with the packaged default icon.
    pub fn basic(title: impl Into<String>, message: impl Into<String>) -> Self {
        Self {
            kind: NotificationKind::Basic,
            icon_url: DEFAULT_NOTIFICATION_ICON.to_string(),
            title: title.into(),
            message: message.into(),
        }
    }
}

/// Notification delivery service.
pub trait NotificationService {
    /// Creates or replaces the notification stored under `id`.
    ///
    /// Re-creating with an id already on screen replaces that notification;
    /// replacement is host behavior and is passed through, not re-implemented.
    /// Resolves with the id actually used by the host.
    ///
    /// # Errors
    ///
    /// Returns an error when the host reports a delivery failure, for example
    /// a missing notification permission.
    fn create<'a>(
        &'a self,
        id: &'a str,
        options: &'a NotificationOptions,
    ) -> NotificationFuture<'a, Result<String, String>>;
}

#[derive(Debug, Clone, Copy, Default)]
/// Inert notification service for hosts without a notification namespace.
pub struct NoopNotificationService;

impl NotificationService for NoopNotificationService {
    fn create<'a>(
        &'a self,
        id: &'a str,
        _options: &'a NotificationOptions,
    ) -> NotificationFuture<'a, Result<String, String>> {
        Box::pin(async move { Ok(id.to_string()) })
    }
}

#[derive(Debug, Clone)]
/// In-memory notification service recording what would have been shown.
pub struct MemoryNotificationService {
    shown: Rc<RefCell<BTreeMap<String, NotificationOptions>>>,
}

impl Default for MemoryNotificationService {
    fn default() -> Self {
        Self {
            shown: Rc::new(RefCell::new(BTreeMap::new())),
        }
    }
}

impl MemoryNotificationService {
    /// Creates an empty recording service.
    pub fn new() -> Self {
        Self::default()
    }

    /// Returns the currently shown notifications keyed by id.
    pub fn shown(&self) -> BTreeMap<String, NotificationOptions> {
        self.shown.borrow().clone()
    }
}

impl NotificationService for MemoryNotificationService {
    fn create<'a>(
        &'a self,
        id: &'a str,
        options: &'a NotificationOptions,
    ) -> NotificationFuture<'a, Result<String, String>> {
        Box::pin(async move {
            self.shown
                .borrow_mut()
                .insert(id.to_string(), options.clone());
            Ok(id.to_string())
        })
    }
}

#[cfg(test)]
mod tests {
    use futures::executor::block_on;
    use pretty_assertions::assert_eq;
    use serde_json::json;

    use super::*;

    #[test]
    fn options_serialize_in_host_shape() {
        let options = NotificationOptions::basic("New orders", "3 unread orders");
        let value = serde_json::to_value(&options).expect("serialize options");
        assert_eq!(
            value,
            json!({
                "type": "basic",
                "iconUrl": "src/assets/icons/icon48.png",
                "title": "New orders",
                "message": "3 unread orders",
            })
        );
    }

    #[test]
    fn memory_create_returns_the_requested_id() {
        let service = MemoryNotificationService::new();
        let options = NotificationOptions::basic("t", "m");
        let id = block_on(service.create("order-summary-notification", &options)).expect("create");
        assert_eq!(id, "order-summary-notification");
    }

    #[test]
    fn memory_create_with_duplicate_id_replaces_prior_notification() {
        let service = MemoryNotificationService::new();
        let first = NotificationOptions::basic("first", "old body");
        let second = NotificationOptions::basic("second", "new body");

        block_on(service.create("order-notification-1", &first)).expect("create");
        block_on(service.create("order-notification-1", &second)).expect("create");

        let shown = service.shown();
        assert_eq!(shown.len(), 1);
        assert_eq!(shown.get("order-notification-1"), Some(&second));
    }

    #[test]
    fn noop_create_resolves_with_the_requested_id() {
        let service = NoopNotificationService;
        let options = NotificationOptions::basic("t", "m");
        let id = block_on(service.create("anything", &options)).expect("create");
        assert_eq!(id, "anything");
    }
}
