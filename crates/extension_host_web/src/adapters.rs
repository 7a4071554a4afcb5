use std::cell::Cell;
use std::rc::Rc;

use extension_host::{
    AlarmListener, AlarmService, BadgeService, CapabilityStatus, HostCompatibility, HostKind,
    HostServices, JsonMap, MessageBus, MessageFuture, MessageHandler, NoopAlarmService,
    NoopMessageBus, NoopNotificationService, NoopStorageArea, NotificationFuture,
    NotificationOptions, NotificationService, StorageArea, StorageFuture, WindowService,
};
use serde_json::Value;

use crate::{
    ChromiumAlarmService, ChromiumBadgeService, ChromiumMessageBus, ChromiumNotificationService,
    ChromiumStorageArea, ChromiumWindowService, WebExtAlarmService, WebExtBadgeService,
    WebExtMessageBus, WebExtNotificationService, WebExtStorageArea, WebExtWindowService,
    WebTaskSpawner,
};

thread_local! {
    static DETECTED_KIND: Cell<Option<HostKind>> = const { Cell::new(None) };
}

/// Returns the runtime shape detected for this context.
///
/// Detection probes the `chrome` namespace first, then `browser`, and lands
/// on [`HostKind::Fallback`] when neither exposes an extension runtime. The
/// probe runs once per context; later calls reuse the first answer.
pub fn detected_host_kind() -> HostKind {
    DETECTED_KIND.with(|cell| match cell.get() {
        Some(kind) => kind,
        None => {
            let kind = crate::bridge::detect_host_kind();
            cell.set(Some(kind));
            kind
        }
    })
}

/// Detected kind when `namespace` is present on the detected host, otherwise
/// the fallback kind. A missing namespace degrades one capability, never the
/// whole host.
fn host_with_namespace(namespace: &str) -> HostKind {
    let kind = detected_host_kind();
    if kind != HostKind::Fallback && crate::bridge::probe_namespace(kind, namespace) {
        kind
    } else {
        HostKind::Fallback
    }
}

/// Adapter enum that erases the probed storage backend behind [`StorageArea`].
#[derive(Debug, Clone, Copy)]
pub enum StorageAreaAdapter {
    /// Callback-shaped `chrome.storage.local` bridged into futures.
    Chromium(ChromiumStorageArea),
    /// Promise-shaped `browser.storage.local` awaited directly.
    WebExt(WebExtStorageArea),
    /// Inert fallback for contexts without the capability.
    Inert(NoopStorageArea),
}

impl StorageArea for StorageAreaAdapter {
    fn get<'a>(&'a self, keys: &'a [&'a str]) -> StorageFuture<'a, Result<JsonMap, String>> {
        match self {
            Self::Chromium(area) => area.get(keys),
            Self::WebExt(area) => area.get(keys),
            Self::Inert(area) => area.get(keys),
        }
    }

    fn set<'a>(&'a self, items: JsonMap) -> StorageFuture<'a, Result<(), String>> {
        match self {
            Self::Chromium(area) => area.set(items),
            Self::WebExt(area) => area.set(items),
            Self::Inert(area) => area.set(items),
        }
    }

    fn remove<'a>(&'a self, keys: &'a [&'a str]) -> StorageFuture<'a, Result<(), String>> {
        match self {
            Self::Chromium(area) => area.remove(keys),
            Self::WebExt(area) => area.remove(keys),
            Self::Inert(area) => area.remove(keys),
        }
    }
}

/// Adapter enum that erases the probed notification backend behind
/// [`NotificationService`].
#[derive(Debug, Clone, Copy)]
pub enum NotificationServiceAdapter {
    /// Callback-shaped `chrome.notifications` bridged into futures.
    Chromium(ChromiumNotificationService),
    /// Promise-shaped `browser.notifications` awaited directly.
    WebExt(WebExtNotificationService),
    /// Inert fallback for contexts without the capability.
    Inert(NoopNotificationService),
}

impl NotificationService for NotificationServiceAdapter {
    fn create<'a>(
        &'a self,
        id: &'a str,
        options: &'a NotificationOptions,
    ) -> NotificationFuture<'a, Result<String, String>> {
        match self {
            Self::Chromium(service) => service.create(id, options),
            Self::WebExt(service) => service.create(id, options),
            Self::Inert(service) => service.create(id, options),
        }
    }
}

/// Adapter enum that erases the probed alarm backend behind [`AlarmService`].
#[derive(Debug, Clone, Copy)]
pub enum AlarmServiceAdapter {
    /// `chrome.alarms` scheduling.
    Chromium(ChromiumAlarmService),
    /// `browser.alarms` scheduling.
    WebExt(WebExtAlarmService),
    /// Inert fallback for contexts without the capability.
    Inert(NoopAlarmService),
}

impl AlarmService for AlarmServiceAdapter {
    fn schedule(&self, name: &str, period_minutes: f64) {
        match self {
            Self::Chromium(service) => service.schedule(name, period_minutes),
            Self::WebExt(service) => service.schedule(name, period_minutes),
            Self::Inert(service) => service.schedule(name, period_minutes),
        }
    }

    fn on_alarm(&self, listener: AlarmListener) {
        match self {
            Self::Chromium(service) => service.on_alarm(listener),
            Self::WebExt(service) => service.on_alarm(listener),
            Self::Inert(service) => service.on_alarm(listener),
        }
    }
}

/// Adapter enum that erases the probed message transport behind [`MessageBus`].
#[derive(Debug, Clone, Copy)]
pub enum MessageBusAdapter {
    /// Callback-shaped `chrome.runtime` messaging bridged into futures.
    Chromium(ChromiumMessageBus),
    /// Promise-shaped `browser.runtime` messaging awaited directly.
    WebExt(WebExtMessageBus),
    /// Inert fallback for contexts without the capability.
    Inert(NoopMessageBus),
}

impl MessageBus for MessageBusAdapter {
    fn on_message(&self, handler: MessageHandler) {
        match self {
            Self::Chromium(bus) => bus.on_message(handler),
            Self::WebExt(bus) => bus.on_message(handler),
            Self::Inert(bus) => bus.on_message(handler),
        }
    }

    fn send<'a>(&'a self, message: &'a Value) -> MessageFuture<'a, Result<Option<Value>, String>> {
        match self {
            Self::Chromium(bus) => bus.send(message),
            Self::WebExt(bus) => bus.send(message),
            Self::Inert(bus) => bus.send(message),
        }
    }
}

/// Selects the storage adapter for the detected host.
pub fn storage_area() -> StorageAreaAdapter {
    match host_with_namespace("storage") {
        HostKind::Chromium => StorageAreaAdapter::Chromium(ChromiumStorageArea),
        HostKind::WebExt => StorageAreaAdapter::WebExt(WebExtStorageArea),
        HostKind::Fallback => StorageAreaAdapter::Inert(NoopStorageArea),
    }
}

/// Selects the notification adapter for the detected host.
pub fn notification_service() -> NotificationServiceAdapter {
    match host_with_namespace("notifications") {
        HostKind::Chromium => NotificationServiceAdapter::Chromium(ChromiumNotificationService),
        HostKind::WebExt => NotificationServiceAdapter::WebExt(WebExtNotificationService),
        HostKind::Fallback => NotificationServiceAdapter::Inert(NoopNotificationService),
    }
}

/// Selects the alarm adapter for the detected host.
pub fn alarm_service() -> AlarmServiceAdapter {
    match host_with_namespace("alarms") {
        HostKind::Chromium => AlarmServiceAdapter::Chromium(ChromiumAlarmService),
        HostKind::WebExt => AlarmServiceAdapter::WebExt(WebExtAlarmService),
        HostKind::Fallback => AlarmServiceAdapter::Inert(NoopAlarmService),
    }
}

/// Selects the message transport for the detected host.
pub fn message_bus() -> MessageBusAdapter {
    match host_with_namespace("runtime") {
        HostKind::Chromium => MessageBusAdapter::Chromium(ChromiumMessageBus),
        HostKind::WebExt => MessageBusAdapter::WebExt(WebExtMessageBus),
        HostKind::Fallback => MessageBusAdapter::Inert(NoopMessageBus),
    }
}

/// Probes every capability namespace and snapshots availability.
pub fn probe_host_compatibility() -> HostCompatibility {
    let kind = detected_host_kind();
    if kind == HostKind::Fallback {
        return HostCompatibility::inert();
    }
    let present =
        |name: &str| CapabilityStatus::from_present(crate::bridge::probe_namespace(kind, name));
    HostCompatibility {
        kind,
        storage: present("storage"),
        notifications: present("notifications"),
        alarms: present("alarms"),
        messaging: present("runtime"),
        badge: present("action"),
        windows: present("windows"),
        manifest_version: crate::bridge::manifest_version(kind),
    }
}

/// Builds the full host bundle for the current context.
///
/// The four required capabilities degrade to inert adapters on fallback
/// hosts; the badge and window surfaces are omitted entirely when their
/// namespaces are missing.
pub fn build_host_services() -> HostServices {
    let compatibility = probe_host_compatibility();
    HostServices {
        storage: Rc::new(storage_area()),
        notifications: Rc::new(notification_service()),
        alarms: Rc::new(alarm_service()),
        messaging: Rc::new(message_bus()),
        badge: compatibility.badge.is_available().then(|| match compatibility.kind {
            HostKind::WebExt => Rc::new(WebExtBadgeService) as Rc<dyn BadgeService>,
            _ => Rc::new(ChromiumBadgeService) as Rc<dyn BadgeService>,
        }),
        windows: compatibility.windows.is_available().then(|| match compatibility.kind {
            HostKind::WebExt => Rc::new(WebExtWindowService) as Rc<dyn WindowService>,
            _ => Rc::new(ChromiumWindowService) as Rc<dyn WindowService>,
        }),
        spawner: Rc::new(WebTaskSpawner),
        compatibility,
        kind: compatibility.kind,
    }
}
