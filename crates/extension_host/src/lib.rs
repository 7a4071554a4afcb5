//! Typed host-capability contracts and shared models for the extension console.
//!
//! This crate is the API-first boundary between console code and whatever
//! WebExtensions host the process actually runs inside. It exposes the storage,
//! notification, alarm, messaging, badge, and window service traits together
//! with inert and in-memory implementations, while concrete browser adapters
//! live in `extension_host_web`.

#![warn(missing_docs, rustdoc::broken_intra_doc_links)]

pub mod alarms;
pub mod badge;
pub mod host;
pub mod messaging;
pub mod notifications;
pub mod spawn;
pub mod storage;
pub mod time;
pub mod windows;

pub use alarms::{
    AlarmEvent, AlarmListener, AlarmService, MemoryAlarmService, NoopAlarmService,
};
pub use badge::{BadgeFuture, BadgeService, MemoryBadgeService, NoopBadgeService};
pub use host::{CapabilityStatus, HostCompatibility, HostKind, HostServices};
pub use messaging::{
    MemoryMessageBus, MessageBus, MessageDisposition, MessageFuture, MessageHandler,
    MessageResponder, MessageSender, NoopMessageBus,
};
pub use notifications::{
    MemoryNotificationService, NoopNotificationService, NotificationFuture, NotificationKind,
    NotificationOptions, NotificationService, DEFAULT_NOTIFICATION_ICON,
};
pub use spawn::TaskSpawner;
pub use storage::{JsonMap, MemoryStorageArea, NoopStorageArea, StorageArea, StorageFuture};
pub use time::unix_time_ms_now;
pub use windows::{
    MemoryWindowService, NoopWindowService, PopupWindowRequest, WindowFuture, WindowService,
};
