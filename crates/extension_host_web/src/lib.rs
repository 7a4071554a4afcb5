//! Browser (`wasm32`) adapters for the [`extension_host`] capability contracts.
//!
//! This crate wires the console's capability traits to the live extension
//! namespaces and degrades to inert adapters on plain-page contexts. Each
//! capability ships one adapter per host shape: a Chromium adapter that
//! bridges callback-style APIs into futures and a WebExtensions adapter that
//! awaits promise-style APIs directly. Transport glue lives under `bridge/`
//! with a wasm/non-wasm split so callers keep one API on both targets.

#![warn(missing_docs, rustdoc::broken_intra_doc_links)]

/// Runtime host detection and concrete adapter factories for console wiring.
pub mod adapters;
pub mod alarms;
pub mod badge;
mod bridge;
pub mod messaging;
pub mod notifications;
pub mod spawn;
pub mod storage;
pub mod windows;

pub use adapters::{
    alarm_service, build_host_services, detected_host_kind, message_bus, notification_service,
    probe_host_compatibility, storage_area, AlarmServiceAdapter, MessageBusAdapter,
    NotificationServiceAdapter, StorageAreaAdapter,
};
pub use alarms::{ChromiumAlarmService, WebExtAlarmService};
pub use badge::{ChromiumBadgeService, WebExtBadgeService};
pub use messaging::{ChromiumMessageBus, WebExtMessageBus};
pub use notifications::{ChromiumNotificationService, WebExtNotificationService};
pub use spawn::WebTaskSpawner;
pub use storage::{ChromiumStorageArea, WebExtStorageArea};
pub use windows::{ChromiumWindowService, WebExtWindowService};
