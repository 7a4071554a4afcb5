//! Extension `storage.local` adapters reached over the browser bridge.

use extension_host::{HostKind, JsonMap, StorageArea, StorageFuture};

#[derive(Debug, Clone, Copy, Default)]
/// Storage area for the callback-shaped `chrome.storage.local` namespace.
pub struct ChromiumStorageArea;

impl StorageArea for ChromiumStorageArea {
    fn get<'a>(&'a self, keys: &'a [&'a str]) -> StorageFuture<'a, Result<JsonMap, String>> {
        Box::pin(async move { crate::bridge::storage_get(HostKind::Chromium, keys).await })
    }

    fn set<'a>(&'a self, items: JsonMap) -> StorageFuture<'a, Result<(), String>> {
        Box::pin(async move { crate::bridge::storage_set(HostKind::Chromium, &items).await })
    }

    fn remove<'a>(&'a self, keys: &'a [&'a str]) -> StorageFuture<'a, Result<(), String>> {
        Box::pin(async move { crate::bridge::storage_remove(HostKind::Chromium, keys).await })
    }
}

#[derive(Debug, Clone, Copy, Default)]
/// Storage area for the promise-shaped `browser.storage.local` namespace.
pub struct WebExtStorageArea;

impl StorageArea for WebExtStorageArea {
    fn get<'a>(&'a self, keys: &'a [&'a str]) -> StorageFuture<'a, Result<JsonMap, String>> {
        Box::pin(async move { crate::bridge::storage_get(HostKind::WebExt, keys).await })
    }

    fn set<'a>(&'a self, items: JsonMap) -> StorageFuture<'a, Result<(), String>> {
        Box::pin(async move { crate::bridge::storage_set(HostKind::WebExt, &items).await })
    }

    fn remove<'a>(&'a self, keys: &'a [&'a str]) -> StorageFuture<'a, Result<(), String>> {
        Box::pin(async move { crate::bridge::storage_remove(HostKind::WebExt, keys).await })
    }
}
