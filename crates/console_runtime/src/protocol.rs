//! Background message protocol: wire shapes, the background dispatcher, and
//! typed client helpers for UI contexts.
//!
//! Requests travel as `{"action": <tag>, ...}` objects and answers as
//! `{success, data?, message?}` envelopes, byte-compatible with the messages
//! the extension's pages already exchange.

use std::rc::Rc;

use extension_host::{
    HostServices, MessageBus, MessageDisposition, MessageResponder, PopupWindowRequest,
};
use serde::{Deserialize, Serialize};
use serde_json::Value;

use crate::gateway::CommerceGateway;
use crate::model::{OrderDigest, ORDER_DATA_SLOT};
use crate::watcher;

pub const MAXIMIZED_PAGE_PATH: &str = "src/maximized/index.html";

const MAXIMIZED_WINDOW_WIDTH: u32 = 1200;
const MAXIMIZED_WINDOW_HEIGHT: u32 = 800;
const UNKNOWN_ACTION_MESSAGE: &str = "Unknown action";

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "action", rename_all = "camelCase")]
/// Requests the background context accepts over the runtime message channel.
pub enum ConsoleRequest {
    /// Run an order check now; sent when the popup enables alerts.
    EnableOrderNotification,
    /// Clear alert artifacts; sent when the popup disables alerts.
    DisableOrderNotification,
    /// Run one order check on demand.
    CheckOrderNotifications,
    /// Read the stored order digest.
    GetOrderData,
    /// Open the maximized console page in a standalone window.
    OpenMaximizedWindow,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
/// Response envelope for every console request.
pub struct ConsoleResponse {
    /// Whether the request was accepted.
    pub success: bool,
    /// Payload for data-bearing requests.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub data: Option<Value>,
    /// Failure description when `success` is false.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub message: Option<String>,
}

impl ConsoleResponse {
    /// Plain acceptance.
    pub fn ok() -> Self {
        Self {
            success: true,
            data: None,
            message: None,
        }
    }

    /// Acceptance carrying a payload.
    pub fn ok_with_data(data: Value) -> Self {
        Self {
            success: true,
            data: Some(data),
            message: None,
        }
    }

    /// Rejection with a description.
    pub fn fail(message: impl Into<String>) -> Self {
        Self {
            success: false,
            data: None,
            message: Some(message.into()),
        }
    }
}

fn respond_with(responder: &MessageResponder, response: ConsoleResponse) {
    match serde_json::to_value(&response) {
        Ok(value) => {
            responder.respond(value);
        }
        Err(err) => log::warn!("console response serialization failed: {err}"),
    }
}

/// Registers the background message handler for console requests.
///
/// Undecodable messages answer `success: false` immediately. Every action
/// except `getOrderData` answers synchronously and runs its side effects as
/// spawned tasks; `getOrderData` keeps the reply channel open and answers
/// once the order-data slot has been read.
pub fn install_dispatcher(services: &HostServices, gateway: Rc<dyn CommerceGateway>) {
    let captured = services.clone();
    services.messaging.on_message(Rc::new(move |message, _sender, responder| {
        let request = match serde_json::from_value::<ConsoleRequest>(message.clone()) {
            Ok(request) => request,
            Err(_) => {
                respond_with(&responder, ConsoleResponse::fail(UNKNOWN_ACTION_MESSAGE));
                return MessageDisposition::Complete;
            }
        };
        dispatch_request(&captured, &gateway, request, responder)
    }));
}

fn dispatch_request(
    services: &HostServices,
    gateway: &Rc<dyn CommerceGateway>,
    request: ConsoleRequest,
    responder: MessageResponder,
) -> MessageDisposition {
    match request {
        ConsoleRequest::EnableOrderNotification | ConsoleRequest::CheckOrderNotifications => {
            let check_services = services.clone();
            let gateway = Rc::clone(gateway);
            services.spawner.spawn_local(Box::pin(async move {
                if let Err(err) = watcher::check_orders(&check_services, &*gateway).await {
                    log::warn!("requested order check failed: {err}");
                }
            }));
            respond_with(&responder, ConsoleResponse::ok());
            MessageDisposition::Complete
        }
        ConsoleRequest::DisableOrderNotification => {
            let clear_services = services.clone();
            services.spawner.spawn_local(Box::pin(async move {
                if let Err(err) = watcher::clear_order_artifacts(&clear_services).await {
                    log::warn!("order artifact cleanup failed: {err}");
                }
            }));
            respond_with(&responder, ConsoleResponse::ok());
            MessageDisposition::Complete
        }
        ConsoleRequest::GetOrderData => {
            let storage = Rc::clone(&services.storage);
            services.spawner.spawn_local(Box::pin(async move {
                let keys = [ORDER_DATA_SLOT];
                let response = match storage.get(&keys).await {
                    Ok(mut found) => ConsoleResponse::ok_with_data(
                        found.remove(ORDER_DATA_SLOT).unwrap_or(Value::Null),
                    ),
                    Err(err) => ConsoleResponse::fail(format!("order data read failed: {err}")),
                };
                respond_with(&responder, response);
            }));
            MessageDisposition::WillRespond
        }
        ConsoleRequest::OpenMaximizedWindow => {
            match &services.windows {
                Some(windows) => {
                    let windows = Rc::clone(windows);
                    services.spawner.spawn_local(Box::pin(async move {
                        let request = PopupWindowRequest::new(
                            MAXIMIZED_PAGE_PATH,
                            MAXIMIZED_WINDOW_WIDTH,
                            MAXIMIZED_WINDOW_HEIGHT,
                        );
                        if let Err(err) = windows.open_popup(&request).await {
                            log::warn!("opening the maximized console failed: {err}");
                        }
                    }));
                    respond_with(&responder, ConsoleResponse::ok());
                }
                None => respond_with(
                    &responder,
                    ConsoleResponse::fail("window capability unavailable"),
                ),
            }
            MessageDisposition::Complete
        }
    }
}

/// Sends a typed console request and decodes the response envelope.
///
/// # Errors
///
/// Returns an error when the transport fails, when no context responded, or
/// when the reply is not a response envelope.
pub async fn send_console_request(
    bus: &dyn MessageBus,
    request: &ConsoleRequest,
) -> Result<ConsoleResponse, String> {
    let message = serde_json::to_value(request).map_err(|e| e.to_string())?;
    match bus.send(&message).await? {
        Some(reply) => serde_json::from_value(reply).map_err(|e| e.to_string()),
        None => Err("console request got no response".to_string()),
    }
}

fn expect_success(response: ConsoleResponse) -> Result<(), String> {
    if response.success {
        Ok(())
    } else {
        Err(response
            .message
            .unwrap_or_else(|| "console request failed".to_string()))
    }
}

/// Asks the background context to start order alert processing.
///
/// # Errors
///
/// Returns the background's failure message when the request is rejected.
pub async fn request_order_alerts_enabled(bus: &dyn MessageBus) -> Result<(), String> {
    expect_success(send_console_request(bus, &ConsoleRequest::EnableOrderNotification).await?)
}

/// Asks the background context to stop alerts and clear their artifacts.
///
/// # Errors
///
/// Returns the background's failure message when the request is rejected.
pub async fn request_order_alerts_disabled(bus: &dyn MessageBus) -> Result<(), String> {
    expect_success(send_console_request(bus, &ConsoleRequest::DisableOrderNotification).await?)
}

/// Asks the background context for one immediate order check.
///
/// # Errors
///
/// Returns the background's failure message when the request is rejected.
pub async fn request_order_check(bus: &dyn MessageBus) -> Result<(), String> {
    expect_success(send_console_request(bus, &ConsoleRequest::CheckOrderNotifications).await?)
}

/// Reads the stored order digest; `None` when no check has completed yet.
///
/// # Errors
///
/// Returns an error when the transport or the background read fails, or when
/// the stored payload does not decode as a digest.
pub async fn request_order_data(bus: &dyn MessageBus) -> Result<Option<OrderDigest>, String> {
    let response = send_console_request(bus, &ConsoleRequest::GetOrderData).await?;
    if !response.success {
        return Err(response
            .message
            .unwrap_or_else(|| "console request failed".to_string()));
    }
    match response.data {
        None | Some(Value::Null) => Ok(None),
        Some(value) => serde_json::from_value(value).map(Some).map_err(|e| e.to_string()),
    }
}

/// Asks the background context to open the maximized console window.
///
/// # Errors
///
/// Returns the background's failure message, for example when the host has
/// no window capability.
pub async fn request_maximized_window(bus: &dyn MessageBus) -> Result<(), String> {
    expect_success(send_console_request(bus, &ConsoleRequest::OpenMaximizedWindow).await?)
}
