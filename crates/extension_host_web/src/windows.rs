//! Extension window adapters reached over the browser bridge.

use extension_host::{HostKind, PopupWindowRequest, WindowFuture, WindowService};

#[derive(Debug, Clone, Copy, Default)]
/// Window surface for the `chrome.windows` namespace.
pub struct ChromiumWindowService;

impl WindowService for ChromiumWindowService {
    fn open_popup<'a>(
        &'a self,
        request: &'a PopupWindowRequest,
    ) -> WindowFuture<'a, Result<(), String>> {
        Box::pin(async move {
            crate::bridge::open_popup_window(HostKind::Chromium, request).await
        })
    }
}

#[derive(Debug, Clone, Copy, Default)]
/// Window surface for the `browser.windows` namespace.
pub struct WebExtWindowService;

impl WindowService for WebExtWindowService {
    fn open_popup<'a>(
        &'a self,
        request: &'a PopupWindowRequest,
    ) -> WindowFuture<'a, Result<(), String>> {
        Box::pin(async move { crate::bridge::open_popup_window(HostKind::WebExt, request).await })
    }
}
