//! Runtime message transport adapters reached over the browser bridge.
//!
//! An absent receiver resolves to `Ok(None)`; the host rejection it raises
//! for that case is absorbed by the bridge, not surfaced as an error.

use extension_host::{HostKind, MessageBus, MessageFuture, MessageHandler};
use serde_json::Value;

#[derive(Debug, Clone, Copy, Default)]
/// Message bus for the callback-shaped `chrome.runtime` messaging namespace.
pub struct ChromiumMessageBus;

impl MessageBus for ChromiumMessageBus {
    fn on_message(&self, handler: MessageHandler) {
        crate::bridge::add_runtime_message_listener(HostKind::Chromium, handler);
    }

    fn send<'a>(&'a self, message: &'a Value) -> MessageFuture<'a, Result<Option<Value>, String>> {
        Box::pin(async move {
            crate::bridge::send_runtime_message(HostKind::Chromium, message).await
        })
    }
}

#[derive(Debug, Clone, Copy, Default)]
/// Message bus for the promise-shaped `browser.runtime` messaging namespace.
pub struct WebExtMessageBus;

impl MessageBus for WebExtMessageBus {
    fn on_message(&self, handler: MessageHandler) {
        crate::bridge::add_runtime_message_listener(HostKind::WebExt, handler);
    }

    fn send<'a>(&'a self, message: &'a Value) -> MessageFuture<'a, Result<Option<Value>, String>> {
        Box::pin(
            async move { crate::bridge::send_runtime_message(HostKind::WebExt, message).await },
        )
    }
}
