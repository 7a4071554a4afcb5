//! Action-badge adapters reached over the browser bridge.

use extension_host::{BadgeFuture, BadgeService, HostKind};

#[derive(Debug, Clone, Copy, Default)]
/// Badge surface for the `chrome.action` namespace.
pub struct ChromiumBadgeService;

impl BadgeService for ChromiumBadgeService {
    fn set_text<'a>(&'a self, text: &'a str) -> BadgeFuture<'a, Result<(), String>> {
        Box::pin(async move { crate::bridge::set_badge_text(HostKind::Chromium, text).await })
    }

    fn set_background_color<'a>(&'a self, color: &'a str) -> BadgeFuture<'a, Result<(), String>> {
        Box::pin(async move {
            crate::bridge::set_badge_background_color(HostKind::Chromium, color).await
        })
    }

    fn clear<'a>(&'a self) -> BadgeFuture<'a, Result<(), String>> {
        // The hosts treat empty text as "no badge"; there is no remove call.
        Box::pin(async move { crate::bridge::set_badge_text(HostKind::Chromium, "").await })
    }
}

#[derive(Debug, Clone, Copy, Default)]
/// Badge surface for the `browser.action` namespace.
pub struct WebExtBadgeService;

impl BadgeService for WebExtBadgeService {
    fn set_text<'a>(&'a self, text: &'a str) -> BadgeFuture<'a, Result<(), String>> {
        Box::pin(async move { crate::bridge::set_badge_text(HostKind::WebExt, text).await })
    }

    fn set_background_color<'a>(&'a self, color: &'a str) -> BadgeFuture<'a, Result<(), String>> {
        Box::pin(async move {
            crate::bridge::set_badge_background_color(HostKind::WebExt, color).await
        })
    }

    fn clear<'a>(&'a self) -> BadgeFuture<'a, Result<(), String>> {
        Box::pin(async move { crate::bridge::set_badge_text(HostKind::WebExt, "").await })
    }
}
