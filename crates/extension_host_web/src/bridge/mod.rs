//! Browser transport glue for `extension_host_web` adapters.
//!
//! Every operation takes the host shape it should speak: the Chromium shape
//! bridges callback-style APIs into futures, the WebExtensions shape awaits
//! returned promises directly. Calls route to target-specific modules while
//! preserving a uniform API for the adapter structs: the wasm build reaches
//! the live extension namespaces, the non-wasm build answers with the same
//! inert behavior the fallback host guarantees.

use extension_host::{
    AlarmListener, HostKind, JsonMap, MessageHandler, NotificationOptions, PopupWindowRequest,
};
use serde_json::Value;

#[cfg(not(target_arch = "wasm32"))]
mod non_wasm;
#[cfg(target_arch = "wasm32")]
mod wasm;

#[cfg(not(target_arch = "wasm32"))]
use non_wasm as imp;
#[cfg(target_arch = "wasm32")]
use wasm as imp;

pub(crate) fn detect_host_kind() -> HostKind {
    imp::detect_host_kind()
}

pub(crate) fn probe_namespace(kind: HostKind, name: &str) -> bool {
    imp::probe_namespace(kind, name)
}

pub(crate) fn manifest_version(kind: HostKind) -> u32 {
    imp::manifest_version(kind)
}

pub(crate) async fn storage_get(kind: HostKind, keys: &[&str]) -> Result<JsonMap, String> {
    imp::storage_get(kind, keys).await
}

pub(crate) async fn storage_set(kind: HostKind, items: &JsonMap) -> Result<(), String> {
    imp::storage_set(kind, items).await
}

pub(crate) async fn storage_remove(kind: HostKind, keys: &[&str]) -> Result<(), String> {
    imp::storage_remove(kind, keys).await
}

pub(crate) async fn notification_create(
    kind: HostKind,
    id: &str,
    options: &NotificationOptions,
) -> Result<String, String> {
    imp::notification_create(kind, id, options).await
}

pub(crate) fn alarm_create(kind: HostKind, name: &str, period_minutes: f64) {
    imp::alarm_create(kind, name, period_minutes);
}

pub(crate) fn alarm_add_listener(kind: HostKind, listener: AlarmListener) {
    imp::alarm_add_listener(kind, listener);
}

pub(crate) async fn send_runtime_message(
    kind: HostKind,
    message: &Value,
) -> Result<Option<Value>, String> {
    imp::send_runtime_message(kind, message).await
}

pub(crate) fn add_runtime_message_listener(kind: HostKind, handler: MessageHandler) {
    imp::add_runtime_message_listener(kind, handler);
}

pub(crate) async fn set_badge_text(kind: HostKind, text: &str) -> Result<(), String> {
    imp::set_badge_text(kind, text).await
}

pub(crate) async fn set_badge_background_color(kind: HostKind, color: &str) -> Result<(), String> {
    imp::set_badge_background_color(kind, color).await
}

pub(crate) async fn open_popup_window(
    kind: HostKind,
    request: &PopupWindowRequest,
) -> Result<(), String> {
    imp::open_popup_window(kind, request).await
}

#[cfg(test)]
mod tests {
    use futures::executor::block_on;
    use serde_json::json;

    use super::*;

    #[cfg(not(target_arch = "wasm32"))]
    #[test]
    fn probing_off_wasm_reports_a_fallback_host() {
        assert_eq!(detect_host_kind(), HostKind::Fallback);
        assert!(!probe_namespace(HostKind::Chromium, "storage"));
        assert!(!probe_namespace(HostKind::WebExt, "action"));
        assert_eq!(manifest_version(HostKind::Chromium), 0);
    }

    #[cfg(not(target_arch = "wasm32"))]
    #[test]
    fn core_capabilities_are_inert_off_wasm() {
        assert_eq!(
            block_on(storage_get(HostKind::Chromium, &["woolite-app-state"])).expect("get"),
            JsonMap::new()
        );
        block_on(storage_set(HostKind::WebExt, &JsonMap::new())).expect("set");
        block_on(storage_remove(HostKind::Chromium, &["woolite-app-state"])).expect("remove");
        assert_eq!(
            block_on(notification_create(
                HostKind::WebExt,
                "order-summary-notification",
                &NotificationOptions::basic("t", "m"),
            ))
            .expect("create"),
            "order-summary-notification"
        );
        alarm_create(HostKind::Chromium, "orderNotificationCheck", 15.0);
        assert_eq!(
            block_on(send_runtime_message(
                HostKind::Chromium,
                &json!({"action": "getOrderData"}),
            ))
            .expect("send"),
            None
        );
    }

    #[cfg(not(target_arch = "wasm32"))]
    #[test]
    fn optional_surfaces_report_unsupported_off_wasm() {
        let expected =
            "Extension host APIs are only available when compiled for wasm32".to_string();

        assert_eq!(
            block_on(set_badge_text(HostKind::Chromium, "3"))
                .expect_err("badge text should fail"),
            expected
        );
        assert_eq!(
            block_on(set_badge_background_color(HostKind::WebExt, "#ff0000"))
                .expect_err("badge color should fail"),
            expected
        );
        assert_eq!(
            block_on(open_popup_window(
                HostKind::Chromium,
                &PopupWindowRequest::new("src/maximized/index.html", 1200, 800),
            ))
            .expect_err("window open should fail"),
            expected
        );
    }
}
