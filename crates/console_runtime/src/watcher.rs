//! Alarm-driven order watcher running in the background context.
//!
//! The watcher owns the badge and the order-data slot. It reads the console
//! snapshot to learn which stores to poll but never writes the app-state
//! slot; that slot's only writer is the console's persisted store.

use std::rc::Rc;

use console_store::{load_slot, remove_slot, save_slot};
use extension_host::{
    unix_time_ms_now, AlarmService, BadgeService, HostServices, NotificationOptions,
    NotificationService, TaskSpawner,
};

use crate::gateway::CommerceGateway;
use crate::model::{ConsoleSnapshot, OrderDigest, OrderSummary, APP_STATE_SLOT, ORDER_DATA_SLOT};

pub const ORDER_CHECK_ALARM: &str = "orderNotificationCheck";
pub const ORDER_CHECK_PERIOD_MINUTES: f64 = 15.0;
pub const SUMMARY_NOTIFICATION_ID: &str = "order-summary-notification";
pub const PER_STORE_NOTIFICATION_PREFIX: &str = "order-notification-";

const BADGE_BACKGROUND_COLOR: &str = "#ff0000";
const BADGE_OVERFLOW_TEXT: &str = "99+";
const BADGE_OVERFLOW_THRESHOLD: u32 = 99;

/// Schedules the recurring order check and registers its alarm listener.
///
/// Scheduling is idempotent: re-running the background context replaces the
/// existing schedule instead of stacking a second timer.
pub fn install_order_watcher(services: &HostServices, gateway: Rc<dyn CommerceGateway>) {
    services
        .alarms
        .schedule(ORDER_CHECK_ALARM, ORDER_CHECK_PERIOD_MINUTES);

    let spawner = Rc::clone(&services.spawner);
    let captured = services.clone();
    services.alarms.on_alarm(Rc::new(move |event| {
        if event.name != ORDER_CHECK_ALARM {
            return;
        }
        let services = captured.clone();
        let gateway = Rc::clone(&gateway);
        spawner.spawn_local(Box::pin(async move {
            if let Err(err) = check_orders(&services, &*gateway).await {
                log::warn!("scheduled order check failed: {err}");
            }
        }));
    }));
}

/// Runs one order check across every configured store.
///
/// Ends quietly when the console snapshot is absent or unreadable, when
/// alerts are disabled, or when no store is configured. A store whose fetch
/// fails is logged and skipped; the check continues with the remaining
/// stores, updates the badge, and writes the order digest.
///
/// # Errors
///
/// Returns an error only when the final digest write fails.
pub async fn check_orders(
    services: &HostServices,
    gateway: &dyn CommerceGateway,
) -> Result<(), String> {
    let snapshot = match load_slot::<ConsoleSnapshot>(&*services.storage, APP_STATE_SLOT).await {
        Ok(Some(snapshot)) => snapshot,
        Ok(None) => return Ok(()),
        Err(err) => {
            log::warn!("console snapshot unreadable, skipping order check: {err}");
            return Ok(());
        }
    };
    if !snapshot.is_order_notification_enabled || snapshot.stores.is_empty() {
        return Ok(());
    }

    let mut total_unread: u32 = 0;
    let mut all_orders: Vec<OrderSummary> = Vec::new();

    for store in &snapshot.stores {
        let notification = match gateway.fetch_order_notification(store).await {
            Ok(notification) => notification,
            Err(err) => {
                log::warn!("order check for store `{}` failed: {err}", store.id);
                continue;
            }
        };
        total_unread = total_unread.saturating_add(notification.unread_count);

        if !notification.orders.is_empty() {
            all_orders.extend(notification.orders.iter().cloned());

            let id = format!("{PER_STORE_NOTIFICATION_PREFIX}{}", store.id);
            let options = NotificationOptions::basic(
                "新订单提醒",
                format!("店铺 {} 有 {} 个新订单", store.name, notification.unread_count),
            );
            if let Err(err) = services.notifications.create(&id, &options).await {
                log::warn!("store notification for `{}` failed: {err}", store.id);
            }
        }
    }

    if !all_orders.is_empty() {
        let options = NotificationOptions::basic(
            "新订单汇总",
            format!("您有 {} 个新订单需要处理", all_orders.len()),
        );
        if let Err(err) = services
            .notifications
            .create(SUMMARY_NOTIFICATION_ID, &options)
            .await
        {
            log::warn!("summary notification failed: {err}");
        }
    }

    if let Some(badge) = &services.badge {
        let result = if total_unread > 0 {
            let text = if total_unread > BADGE_OVERFLOW_THRESHOLD {
                BADGE_OVERFLOW_TEXT.to_string()
            } else {
                total_unread.to_string()
            };
            match badge.set_text(&text).await {
                Ok(()) => badge.set_background_color(BADGE_BACKGROUND_COLOR).await,
                Err(err) => Err(err),
            }
        } else {
            badge.clear().await
        };
        if let Err(err) = result {
            log::warn!("badge update failed: {err}");
        }
    }

    let digest = OrderDigest {
        orders: all_orders,
        last_checked_unix_ms: unix_time_ms_now(),
        total_count: total_unread,
    };
    save_slot(&*services.storage, ORDER_DATA_SLOT, &digest)
        .await
        .map_err(|err| format!("order digest write failed: {err}"))
}

/// Clears the badge and removes the stored order digest.
///
/// # Errors
///
/// Returns an error when the host rejects either the badge update or the
/// slot removal.
pub async fn clear_order_artifacts(services: &HostServices) -> Result<(), String> {
    if let Some(badge) = &services.badge {
        badge
            .clear()
            .await
            .map_err(|err| format!("badge clear failed: {err}"))?;
    }
    remove_slot(&*services.storage, ORDER_DATA_SLOT)
        .await
        .map_err(|err| format!("order data removal failed: {err}"))
}

#[cfg(test)]
mod tests {
    use futures::executor::{block_on, LocalPool};
    use pretty_assertions::assert_eq;
    use serde_json::json;

    use super::*;
    use crate::gateway::MemoryCommerceGateway;
    use crate::model::{ConsoleSnapshot, Language, StoreId};
    use crate::testing::{order_notification, woo_store, TestHost};

    fn snapshot(store_ids: &[&str], enabled: bool) -> ConsoleSnapshot {
        ConsoleSnapshot {
            stores: store_ids.iter().map(|id| woo_store(id, id)).collect(),
            active_store_id: store_ids.first().map(|id| StoreId::new(*id)),
            language: Language::default(),
            is_order_notification_enabled: enabled,
        }
    }

    fn stored_digest(host: &TestHost) -> Option<OrderDigest> {
        host.storage
            .snapshot()
            .remove(ORDER_DATA_SLOT)
            .map(|value| serde_json::from_value(value).expect("decode digest"))
    }

    #[test]
    fn check_raises_notifications_updates_badge_and_writes_digest() {
        let host = TestHost::new();
        let pool = LocalPool::new();
        let services = host.services(Rc::new(pool.spawner()));
        let gateway = MemoryCommerceGateway::new();
        host.seed_snapshot(&snapshot(&["store-a", "store-b"], true));
        gateway.set_order_notification(order_notification(&StoreId::new("store-a"), 2, 2));
        gateway.set_order_notification(order_notification(&StoreId::new("store-b"), 0, 0));

        block_on(check_orders(&services, &gateway)).expect("check");

        let shown = host.notifications.shown();
        let store_note = shown
            .get("order-notification-store-a")
            .expect("per-store notification");
        assert_eq!(store_note.title, "新订单提醒");
        assert_eq!(store_note.message, "店铺 store-a 有 2 个新订单");
        assert_eq!(
            serde_json::to_value(store_note).expect("options"),
            json!({
                "type": "basic",
                "iconUrl": "src/assets/icons/icon48.png",
                "title": "新订单提醒",
                "message": "店铺 store-a 有 2 个新订单"
            })
        );
        assert!(!shown.contains_key("order-notification-store-b"));

        let summary = shown.get(SUMMARY_NOTIFICATION_ID).expect("summary");
        assert_eq!(summary.message, "您有 2 个新订单需要处理");

        assert_eq!(host.badge.text(), Some("2".to_string()));
        assert_eq!(host.badge.background_color(), Some("#ff0000".to_string()));

        let digest = stored_digest(&host).expect("digest written");
        assert_eq!(digest.total_count, 2);
        assert_eq!(digest.orders.len(), 2);
    }

    #[test]
    fn a_failing_store_is_skipped_and_the_rest_still_report() {
        let host = TestHost::new();
        let pool = LocalPool::new();
        let services = host.services(Rc::new(pool.spawner()));
        let gateway = MemoryCommerceGateway::new();
        host.seed_snapshot(&snapshot(&["store-a", "store-b"], true));
        gateway.fail_store(StoreId::new("store-a"), "connection refused");
        gateway.set_order_notification(order_notification(&StoreId::new("store-b"), 1, 1));

        block_on(check_orders(&services, &gateway)).expect("check");

        assert_eq!(gateway.fetch_calls(), 2, "the failing store does not end the loop");
        let shown = host.notifications.shown();
        assert!(!shown.contains_key("order-notification-store-a"));
        assert!(shown.contains_key("order-notification-store-b"));
        assert_eq!(stored_digest(&host).expect("digest").total_count, 1);
    }

    #[test]
    fn disabled_alerts_short_circuit_before_any_fetch() {
        let host = TestHost::new();
        let pool = LocalPool::new();
        let services = host.services(Rc::new(pool.spawner()));
        let gateway = MemoryCommerceGateway::new();
        host.seed_snapshot(&snapshot(&["store-a"], false));

        block_on(check_orders(&services, &gateway)).expect("check");

        assert_eq!(gateway.fetch_calls(), 0);
        assert_eq!(stored_digest(&host), None);
        assert!(host.notifications.shown().is_empty());
    }

    #[test]
    fn an_absent_snapshot_short_circuits() {
        let host = TestHost::new();
        let pool = LocalPool::new();
        let services = host.services(Rc::new(pool.spawner()));
        let gateway = MemoryCommerceGateway::new();

        block_on(check_orders(&services, &gateway)).expect("check");

        assert_eq!(gateway.fetch_calls(), 0);
        assert_eq!(stored_digest(&host), None);
    }

    #[test]
    fn the_badge_caps_at_ninety_nine_plus() {
        let host = TestHost::new();
        let pool = LocalPool::new();
        let services = host.services(Rc::new(pool.spawner()));
        let gateway = MemoryCommerceGateway::new();
        host.seed_snapshot(&snapshot(&["store-a"], true));
        gateway.set_order_notification(order_notification(&StoreId::new("store-a"), 150, 1));

        block_on(check_orders(&services, &gateway)).expect("check");

        assert_eq!(host.badge.text(), Some("99+".to_string()));
        assert_eq!(stored_digest(&host).expect("digest").total_count, 150);
    }

    #[test]
    fn zero_unread_clears_the_badge_and_still_writes_the_digest() {
        let host = TestHost::new();
        let pool = LocalPool::new();
        let services = host.services(Rc::new(pool.spawner()));
        let gateway = MemoryCommerceGateway::new();
        host.seed_snapshot(&snapshot(&["store-a"], true));
        block_on(host.badge.set_text("5")).expect("preset badge");

        block_on(check_orders(&services, &gateway)).expect("check");

        assert_eq!(host.badge.text(), None);
        let digest = stored_digest(&host).expect("digest");
        assert_eq!(digest.total_count, 0);
        assert!(digest.orders.is_empty());
    }

    #[test]
    fn clear_order_artifacts_resets_badge_and_slot() {
        let host = TestHost::new();
        let pool = LocalPool::new();
        let services = host.services(Rc::new(pool.spawner()));
        block_on(host.badge.set_text("7")).expect("preset badge");
        host.storage.insert(ORDER_DATA_SLOT, json!({"totalCount": 7}));

        block_on(clear_order_artifacts(&services)).expect("clear");

        assert_eq!(host.badge.text(), None);
        assert!(!host.storage.snapshot().contains_key(ORDER_DATA_SLOT));
    }

    #[test]
    fn installed_watcher_checks_on_its_own_alarm_only() {
        let host = TestHost::new();
        let mut pool = LocalPool::new();
        let services = host.services(Rc::new(pool.spawner()));
        let gateway = MemoryCommerceGateway::new();
        host.seed_snapshot(&snapshot(&["store-a"], true));
        gateway.set_order_notification(order_notification(&StoreId::new("store-a"), 1, 1));

        install_order_watcher(&services, Rc::new(gateway.clone()));
        assert_eq!(
            host.alarms.schedules().get(ORDER_CHECK_ALARM),
            Some(&ORDER_CHECK_PERIOD_MINUTES)
        );

        host.alarms.fire("unrelated-alarm");
        pool.run_until_stalled();
        assert_eq!(gateway.fetch_calls(), 0);

        host.alarms.fire(ORDER_CHECK_ALARM);
        pool.run_until_stalled();
        assert_eq!(gateway.fetch_calls(), 1);
        assert!(stored_digest(&host).is_some());
    }
}
