use super::*;

fn unsupported() -> String {
    "Extension host APIs are only available when compiled for wasm32".to_string()
}

pub(crate) fn detect_host_kind() -> HostKind {
    HostKind::Fallback
}

pub(crate) fn probe_namespace(_kind: HostKind, _name: &str) -> bool {
    false
}

pub(crate) fn manifest_version(_kind: HostKind) -> u32 {
    0
}

pub(crate) async fn storage_get(_kind: HostKind, _keys: &[&str]) -> Result<JsonMap, String> {
    Ok(JsonMap::new())
}

pub(crate) async fn storage_set(_kind: HostKind, _items: &JsonMap) -> Result<(), String> {
    Ok(())
}

pub(crate) async fn storage_remove(_kind: HostKind, _keys: &[&str]) -> Result<(), String> {
    Ok(())
}

pub(crate) async fn notification_create(
    _kind: HostKind,
    id: &str,
    _options: &NotificationOptions,
) -> Result<String, String> {
    Ok(id.to_string())
}

pub(crate) fn alarm_create(_kind: HostKind, _name: &str, _period_minutes: f64) {}

pub(crate) fn alarm_add_listener(_kind: HostKind, _listener: AlarmListener) {}

pub(crate) async fn send_runtime_message(
    _kind: HostKind,
    _message: &Value,
) -> Result<Option<Value>, String> {
    Ok(None)
}

pub(crate) fn add_runtime_message_listener(_kind: HostKind, _handler: MessageHandler) {}

pub(crate) async fn set_badge_text(_kind: HostKind, _text: &str) -> Result<(), String> {
    Err(unsupported())
}

pub(crate) async fn set_badge_background_color(
    _kind: HostKind,
    _color: &str,
) -> Result<(), String> {
    Err(unsupported())
}

pub(crate) async fn open_popup_window(
    _kind: HostKind,
    _request: &PopupWindowRequest,
) -> Result<(), String> {
    Err(unsupported())
}
