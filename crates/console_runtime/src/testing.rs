//! Shared fixtures for runtime tests: an in-memory host bundle and sample
//! domain values.

use std::rc::Rc;

use extension_host::{
    BadgeService, HostCompatibility, HostKind, HostServices, MemoryAlarmService,
    MemoryBadgeService, MemoryMessageBus, MemoryNotificationService, MemoryStorageArea,
    MemoryWindowService, TaskSpawner, WindowService,
};

use crate::model::{
    ConsoleSnapshot, OrderNotification, OrderStatus, OrderSummary, Product, ProductKind,
    ProductStatus, StockStatus, StoreAuth, StoreConfig, StoreId, APP_STATE_SLOT,
};

pub(crate) struct TestHost {
    pub storage: Rc<MemoryStorageArea>,
    pub notifications: Rc<MemoryNotificationService>,
    pub alarms: Rc<MemoryAlarmService>,
    pub bus: Rc<MemoryMessageBus>,
    pub badge: Rc<MemoryBadgeService>,
    pub windows: Rc<MemoryWindowService>,
}

impl TestHost {
    pub fn new() -> Self {
        Self {
            storage: Rc::new(MemoryStorageArea::new()),
            notifications: Rc::new(MemoryNotificationService::new()),
            alarms: Rc::new(MemoryAlarmService::new()),
            bus: Rc::new(MemoryMessageBus::new()),
            badge: Rc::new(MemoryBadgeService::new()),
            windows: Rc::new(MemoryWindowService::new()),
        }
    }

    pub fn services(&self, spawner: Rc<dyn TaskSpawner>) -> HostServices {
        HostServices {
            storage: self.storage.clone(),
            notifications: self.notifications.clone(),
            alarms: self.alarms.clone(),
            messaging: self.bus.clone(),
            badge: Some(Rc::clone(&self.badge) as Rc<dyn BadgeService>),
            windows: Some(Rc::clone(&self.windows) as Rc<dyn WindowService>),
            spawner,
            compatibility: HostCompatibility::full(HostKind::Chromium),
            kind: HostKind::Chromium,
        }
    }

    pub fn services_without_windows(&self, spawner: Rc<dyn TaskSpawner>) -> HostServices {
        let mut services = self.services(spawner);
        services.windows = None;
        services
    }

    pub fn seed_snapshot(&self, snapshot: &ConsoleSnapshot) {
        let value = serde_json::to_value(snapshot).expect("serialize snapshot");
        self.storage.insert(APP_STATE_SLOT, value);
    }
}

pub(crate) fn woo_store(id: &str, name: &str) -> StoreConfig {
    StoreConfig {
        id: StoreId::new(id),
        name: name.to_string(),
        url: format!("https://{id}.example"),
        auth: StoreAuth::Woocommerce {
            consumer_key: "ck_test".to_string(),
            consumer_secret: "cs_test".to_string(),
        },
        is_active: true,
    }
}

pub(crate) fn sample_product(id: u64, name: &str) -> Product {
    Product {
        id,
        name: name.to_string(),
        sku: format!("SKU-{id}"),
        price: "10.00".to_string(),
        regular_price: "10.00".to_string(),
        sale_price: String::new(),
        kind: ProductKind::Simple,
        status: ProductStatus::Publish,
        stock_status: StockStatus::Instock,
        stock_quantity: Some(5),
        categories: Vec::new(),
        tags: Vec::new(),
        images: Vec::new(),
        permalink: format!("https://shop.example/product/{id}"),
    }
}

pub(crate) fn sample_order(id: u64) -> OrderSummary {
    OrderSummary {
        id,
        number: format!("10{id:02}"),
        status: OrderStatus::Processing,
        total: "42.00".to_string(),
        currency: "CNY".to_string(),
        date_created: "2024-05-01T08:00:00".to_string(),
    }
}

pub(crate) fn order_notification(
    store_id: &StoreId,
    unread_count: u32,
    order_count: u64,
) -> OrderNotification {
    OrderNotification {
        store_id: store_id.clone(),
        unread_count,
        last_checked_unix_ms: 0,
        orders: (1..=order_count).map(sample_order).collect(),
    }
}
