use extension_host::{
    AlarmEvent, AlarmListener, HostKind, JsonMap, MessageDisposition, MessageHandler,
    MessageResponder, MessageSender, NotificationOptions, PopupWindowRequest,
};
use futures::channel::oneshot;
use js_sys::{Array, Function, Object, Promise, Reflect};
use serde::Serialize;
use serde_json::Value;
use wasm_bindgen::prelude::*;
use wasm_bindgen::JsCast;
use wasm_bindgen_futures::JsFuture;

const NO_RUNTIME: &str = "no extension runtime namespace is present";

// Chromium rejects sendMessage with this marker when no context listens;
// the contract maps that case to an absent reply instead of an error.
const NO_RECEIVER_MARKER: &str = "Receiving end does not exist";

fn js_error_string(err: JsValue) -> String {
    match err.dyn_ref::<js_sys::Error>() {
        Some(error) => String::from(error.message()),
        None => format!("{err:?}"),
    }
}

fn to_js(value: &impl Serialize) -> Result<JsValue, String> {
    let serializer = serde_wasm_bindgen::Serializer::json_compatible();
    value.serialize(&serializer).map_err(|e| e.to_string())
}

fn from_js<T: serde::de::DeserializeOwned>(value: JsValue) -> Result<T, String> {
    serde_wasm_bindgen::from_value(value).map_err(|e| e.to_string())
}

fn global_namespace(name: &str) -> Option<Object> {
    Reflect::get(&js_sys::global(), &JsValue::from_str(name))
        .ok()
        .and_then(|value| value.dyn_into::<Object>().ok())
}

fn has_extension_runtime(root: &Object) -> bool {
    Reflect::get(root, &JsValue::from_str("runtime"))
        .map(|value| value.is_object())
        .unwrap_or(false)
}

pub(crate) fn detect_host_kind() -> HostKind {
    if global_namespace("chrome").is_some_and(|root| has_extension_runtime(&root)) {
        HostKind::Chromium
    } else if global_namespace("browser").is_some_and(|root| has_extension_runtime(&root)) {
        HostKind::WebExt
    } else {
        HostKind::Fallback
    }
}

fn namespace_root(kind: HostKind) -> Result<Object, String> {
    let name = match kind {
        HostKind::Chromium => "chrome",
        HostKind::WebExt => "browser",
        HostKind::Fallback => return Err(NO_RUNTIME.to_string()),
    };
    global_namespace(name).ok_or_else(|| NO_RUNTIME.to_string())
}

fn api_object(root: &Object, path: &[&str]) -> Result<Object, String> {
    let mut current = root.clone();
    for segment in path {
        current = Reflect::get(&current, &JsValue::from_str(segment))
            .map_err(js_error_string)?
            .dyn_into::<Object>()
            .map_err(|_| format!("host namespace `{segment}` is unavailable"))?;
    }
    Ok(current)
}

fn api_function(target: &Object, method: &str) -> Result<Function, String> {
    Reflect::get(target, &JsValue::from_str(method))
        .map_err(js_error_string)?
        .dyn_into::<Function>()
        .map_err(|_| format!("host method `{method}` is unavailable"))
}

// Chromium leaves callback-path failures in `runtime.lastError`, valid only
// for the duration of the callback itself.
fn last_error_message(root: &Object) -> Option<String> {
    let last_error = Reflect::get(root, &JsValue::from_str("runtime"))
        .ok()
        .and_then(|runtime| Reflect::get(&runtime, &JsValue::from_str("lastError")).ok())?;
    if last_error.is_undefined() || last_error.is_null() {
        return None;
    }
    Some(
        Reflect::get(&last_error, &JsValue::from_str("message"))
            .ok()
            .and_then(|message| message.as_string())
            .unwrap_or_else(|| "unspecified host error".to_string()),
    )
}

fn call_sync(kind: HostKind, path: &[&str], method: &str, args: &Array) -> Result<JsValue, String> {
    let target = api_object(&namespace_root(kind)?, path)?;
    api_function(&target, method)?
        .apply(&target, args)
        .map_err(js_error_string)
}

/// Callback-shape call path: appends a completion callback to the argument
/// list and resolves once the host fires it, reading `runtime.lastError` as
/// the failure channel.
async fn call_with_callback(
    root: &Object,
    path: &[&str],
    method: &str,
    args: Array,
) -> Result<JsValue, String> {
    let target = api_object(root, path)?;
    let function = api_function(&target, method)?;

    let (sender, receiver) = oneshot::channel::<Result<JsValue, String>>();
    let mut sender = Some(sender);
    let error_root = root.clone();
    let callback = Closure::<dyn FnMut(JsValue)>::new(move |value: JsValue| {
        let outcome = match last_error_message(&error_root) {
            Some(message) => Err(message),
            None => Ok(value),
        };
        if let Some(sender) = sender.take() {
            let _ = sender.send(outcome);
        }
    });
    args.push(callback.as_ref());
    function.apply(&target, &args).map_err(js_error_string)?;

    // `callback` stays owned by this frame, so the closure outlives the
    // suspension until the host answers.
    receiver
        .await
        .unwrap_or_else(|_| Err("host dropped the completion callback".to_string()))
}

/// Promise-shape call path: the host returns a promise to await directly.
/// `Promise::resolve` is identity on promises and lifts the occasional
/// synchronous return, so immediate answers still resolve.
async fn call_awaiting_promise(
    root: &Object,
    path: &[&str],
    method: &str,
    args: Array,
) -> Result<JsValue, String> {
    let target = api_object(root, path)?;
    let outcome = api_function(&target, method)?
        .apply(&target, &args)
        .map_err(js_error_string)?;
    JsFuture::from(Promise::resolve(&outcome))
        .await
        .map_err(js_error_string)
}

async fn call_api(
    kind: HostKind,
    path: &[&str],
    method: &str,
    args: Array,
) -> Result<JsValue, String> {
    match kind {
        HostKind::Chromium => call_with_callback(&namespace_root(kind)?, path, method, args).await,
        HostKind::WebExt => call_awaiting_promise(&namespace_root(kind)?, path, method, args).await,
        HostKind::Fallback => Err(NO_RUNTIME.to_string()),
    }
}

fn add_event_listener(
    kind: HostKind,
    path: &[&str],
    event: &str,
    callback: &Function,
) -> Result<(), String> {
    let target = api_object(&namespace_root(kind)?, path)?;
    let event_object = Reflect::get(&target, &JsValue::from_str(event))
        .map_err(js_error_string)?
        .dyn_into::<Object>()
        .map_err(|_| format!("host event `{event}` is unavailable"))?;
    api_function(&event_object, "addListener")?
        .call1(&event_object, callback)
        .map_err(js_error_string)?;
    Ok(())
}

fn key_array(keys: &[&str]) -> Array {
    let wanted = Array::new();
    for key in keys {
        wanted.push(&JsValue::from_str(key));
    }
    wanted
}

pub(crate) fn probe_namespace(kind: HostKind, name: &str) -> bool {
    namespace_root(kind)
        .ok()
        .and_then(|root| Reflect::get(&root, &JsValue::from_str(name)).ok())
        .map(|value| value.is_object())
        .unwrap_or(false)
}

pub(crate) fn manifest_version(kind: HostKind) -> u32 {
    let manifest = match call_sync(kind, &["runtime"], "getManifest", &Array::new()) {
        Ok(manifest) => manifest,
        Err(_) => return 0,
    };
    Reflect::get(&manifest, &JsValue::from_str("manifest_version"))
        .ok()
        .and_then(|value| value.as_f64())
        .map(|version| version.max(0.0) as u32)
        .unwrap_or(0)
}

pub(crate) async fn storage_get(kind: HostKind, keys: &[&str]) -> Result<JsonMap, String> {
    let args = Array::of1(&key_array(keys));
    let found = call_api(kind, &["storage", "local"], "get", args).await?;
    if found.is_undefined() || found.is_null() {
        return Ok(JsonMap::new());
    }
    from_js(found)
}

pub(crate) async fn storage_set(kind: HostKind, items: &JsonMap) -> Result<(), String> {
    let args = Array::of1(&to_js(items)?);
    call_api(kind, &["storage", "local"], "set", args)
        .await
        .map(|_| ())
}

pub(crate) async fn storage_remove(kind: HostKind, keys: &[&str]) -> Result<(), String> {
    let args = Array::of1(&key_array(keys));
    call_api(kind, &["storage", "local"], "remove", args)
        .await
        .map(|_| ())
}

pub(crate) async fn notification_create(
    kind: HostKind,
    id: &str,
    options: &NotificationOptions,
) -> Result<String, String> {
    let args = Array::of2(&JsValue::from_str(id), &to_js(options)?);
    let created = call_api(kind, &["notifications"], "create", args).await?;
    Ok(created.as_string().unwrap_or_else(|| id.to_string()))
}

pub(crate) fn alarm_create(kind: HostKind, name: &str, period_minutes: f64) {
    let info = Object::new();
    if Reflect::set(
        &info,
        &JsValue::from_str("periodInMinutes"),
        &JsValue::from_f64(period_minutes),
    )
    .is_err()
    {
        return;
    }
    let args = Array::of2(&JsValue::from_str(name), &info);
    let _ = call_sync(kind, &["alarms"], "create", &args);
}

pub(crate) fn alarm_add_listener(kind: HostKind, listener: AlarmListener) {
    let callback = Closure::<dyn FnMut(JsValue)>::new(move |alarm: JsValue| {
        let name = Reflect::get(&alarm, &JsValue::from_str("name"))
            .ok()
            .and_then(|value| value.as_string())
            .unwrap_or_default();
        let scheduled = Reflect::get(&alarm, &JsValue::from_str("scheduledTime"))
            .ok()
            .and_then(|value| value.as_f64())
            .unwrap_or(0.0);
        listener(&AlarmEvent {
            name,
            scheduled_time_unix_ms: scheduled.max(0.0) as u64,
        });
    });
    match add_event_listener(kind, &["alarms"], "onAlarm", callback.as_ref().unchecked_ref()) {
        // The host owns the listener for the rest of the context's life.
        Ok(()) => callback.forget(),
        Err(err) => log::warn!("alarm listener install failed: {err}"),
    }
}

pub(crate) async fn send_runtime_message(
    kind: HostKind,
    message: &Value,
) -> Result<Option<Value>, String> {
    let args = Array::of1(&to_js(message)?);
    match call_api(kind, &["runtime"], "sendMessage", args).await {
        Ok(reply) if reply.is_undefined() || reply.is_null() => Ok(None),
        Ok(reply) => from_js(reply).map(Some),
        Err(err) if err.contains(NO_RECEIVER_MARKER) => Ok(None),
        Err(err) => Err(err),
    }
}

pub(crate) fn add_runtime_message_listener(kind: HostKind, handler: MessageHandler) {
    let callback = Closure::<dyn FnMut(JsValue, JsValue, Function) -> JsValue>::new(
        move |message: JsValue, sender: JsValue, send_response: Function| {
            let message: Value = from_js(message).unwrap_or(Value::Null);
            let sender = MessageSender {
                id: Reflect::get(&sender, &JsValue::from_str("id"))
                    .ok()
                    .and_then(|value| value.as_string()),
                url: Reflect::get(&sender, &JsValue::from_str("url"))
                    .ok()
                    .and_then(|value| value.as_string()),
            };
            let responder = MessageResponder::new(move |value: Value| {
                let reply = to_js(&value).unwrap_or(JsValue::UNDEFINED);
                let _ = send_response.call1(&JsValue::UNDEFINED, &reply);
            });
            let disposition = handler(&message, &sender, responder);
            // Returning true tells the host to keep the reply channel open.
            JsValue::from_bool(disposition == MessageDisposition::WillRespond)
        },
    );
    if add_event_listener(
        kind,
        &["runtime"],
        "onMessage",
        callback.as_ref().unchecked_ref(),
    )
    .is_ok()
    {
        callback.forget();
    }
}

pub(crate) async fn set_badge_text(kind: HostKind, text: &str) -> Result<(), String> {
    let details = Object::new();
    Reflect::set(&details, &JsValue::from_str("text"), &JsValue::from_str(text))
        .map_err(js_error_string)?;
    call_api(kind, &["action"], "setBadgeText", Array::of1(&details))
        .await
        .map(|_| ())
}

pub(crate) async fn set_badge_background_color(kind: HostKind, color: &str) -> Result<(), String> {
    let details = Object::new();
    Reflect::set(&details, &JsValue::from_str("color"), &JsValue::from_str(color))
        .map_err(js_error_string)?;
    call_api(kind, &["action"], "setBadgeBackgroundColor", Array::of1(&details))
        .await
        .map(|_| ())
}

pub(crate) async fn open_popup_window(
    kind: HostKind,
    request: &PopupWindowRequest,
) -> Result<(), String> {
    let url = call_sync(
        kind,
        &["runtime"],
        "getURL",
        &Array::of1(&JsValue::from_str(&request.path)),
    )?
    .as_string()
    .unwrap_or_else(|| request.path.clone());

    let info = Object::new();
    Reflect::set(&info, &JsValue::from_str("url"), &JsValue::from_str(&url))
        .map_err(js_error_string)?;
    Reflect::set(&info, &JsValue::from_str("type"), &JsValue::from_str("popup"))
        .map_err(js_error_string)?;
    Reflect::set(
        &info,
        &JsValue::from_str("width"),
        &JsValue::from_f64(f64::from(request.width)),
    )
    .map_err(js_error_string)?;
    Reflect::set(
        &info,
        &JsValue::from_str("height"),
        &JsValue::from_f64(f64::from(request.height)),
    )
    .map_err(js_error_string)?;
    call_api(kind, &["windows"], "create", Array::of1(&info))
        .await
        .map(|_| ())
}
