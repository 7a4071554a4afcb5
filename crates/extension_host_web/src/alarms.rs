//! Extension alarm adapters reached over the browser bridge.
//!
//! Re-registering a name relies on the host's own replace-on-create rule, so
//! repeated wiring of the same alarm never stacks timers.

use extension_host::{AlarmListener, AlarmService, HostKind};

#[derive(Debug, Clone, Copy, Default)]
/// Alarm service for the `chrome.alarms` namespace.
pub struct ChromiumAlarmService;

impl AlarmService for ChromiumAlarmService {
    fn schedule(&self, name: &str, period_minutes: f64) {
        crate::bridge::alarm_create(HostKind::Chromium, name, period_minutes);
    }

    fn on_alarm(&self, listener: AlarmListener) {
        crate::bridge::alarm_add_listener(HostKind::Chromium, listener);
    }
}

#[derive(Debug, Clone, Copy, Default)]
/// Alarm service for the `browser.alarms` namespace.
pub struct WebExtAlarmService;

impl AlarmService for WebExtAlarmService {
    fn schedule(&self, name: &str, period_minutes: f64) {
        crate::bridge::alarm_create(HostKind::WebExt, name, period_minutes);
    }

    fn on_alarm(&self, listener: AlarmListener) {
        crate::bridge::alarm_add_listener(HostKind::WebExt, listener);
    }
}
