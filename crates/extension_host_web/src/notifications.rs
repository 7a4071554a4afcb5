//! Extension notification adapters reached over the browser bridge.

use extension_host::{HostKind, NotificationFuture, NotificationOptions, NotificationService};

#[derive(Debug, Clone, Copy, Default)]
/// Notification service for the callback-shaped `chrome.notifications` namespace.
pub struct ChromiumNotificationService;

impl NotificationService for ChromiumNotificationService {
    fn create<'a>(
        &'a self,
        id: &'a str,
        options: &'a NotificationOptions,
    ) -> NotificationFuture<'a, Result<String, String>> {
        Box::pin(async move {
            crate::bridge::notification_create(HostKind::Chromium, id, options).await
        })
    }
}

#[derive(Debug, Clone, Copy, Default)]
/// Notification service for the promise-shaped `browser.notifications` namespace.
pub struct WebExtNotificationService;

impl NotificationService for WebExtNotificationService {
    fn create<'a>(
        &'a self,
        id: &'a str,
        options: &'a NotificationOptions,
    ) -> NotificationFuture<'a, Result<String, String>> {
        Box::pin(async move {
            crate::bridge::notification_create(HostKind::WebExt, id, options).await
        })
    }
}
