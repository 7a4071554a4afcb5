use std::fmt;

use serde::{Deserialize, Serialize};

pub const APP_STATE_SLOT: &str = "woolite-app-state";
pub const ORDER_DATA_SLOT: &str = "woolite-order-data";

#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub struct StoreId(pub String);

impl StoreId {
    pub fn new(id: impl Into<String>) -> Self {
        Self(id.into())
    }
}

impl fmt::Display for StoreId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "authType", content = "credentials", rename_all = "lowercase")]
pub enum StoreAuth {
    Wordpress {
        username: String,
        password: String,
    },
    #[serde(rename_all = "camelCase")]
    Woocommerce {
        consumer_key: String,
        consumer_secret: String,
    },
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct StoreConfig {
    pub id: StoreId,
    pub name: String,
    pub url: String,
    #[serde(flatten)]
    pub auth: StoreAuth,
    pub is_active: bool,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ProductKind {
    Simple,
    Variable,
    Grouped,
    External,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ProductStatus {
    Publish,
    Draft,
    Pending,
    Private,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum StockStatus {
    Instock,
    Outofstock,
    Onbackorder,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ProductCategory {
    pub id: u64,
    pub name: String,
    pub slug: String,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ProductTag {
    pub id: u64,
    pub name: String,
    pub slug: String,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ProductImage {
    pub id: u64,
    pub src: String,
    pub name: String,
    pub alt: String,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Product {
    pub id: u64,
    pub name: String,
    pub sku: String,
    pub price: String,
    pub regular_price: String,
    pub sale_price: String,
    #[serde(rename = "type")]
    pub kind: ProductKind,
    pub status: ProductStatus,
    pub stock_status: StockStatus,
    pub stock_quantity: Option<i64>,
    pub categories: Vec<ProductCategory>,
    pub tags: Vec<ProductTag>,
    pub images: Vec<ProductImage>,
    pub permalink: String,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ProductDraft {
    pub name: String,
    pub sku: String,
    pub regular_price: String,
    #[serde(rename = "type")]
    pub kind: ProductKind,
    pub status: ProductStatus,
}

impl ProductDraft {
    pub fn to_product(&self, id: u64) -> Product {
        Product {
            id,
            name: self.name.clone(),
            sku: self.sku.clone(),
            price: self.regular_price.clone(),
            regular_price: self.regular_price.clone(),
            sale_price: String::new(),
            kind: self.kind,
            status: self.status,
            stock_status: StockStatus::Instock,
            stock_quantity: None,
            categories: Vec::new(),
            tags: Vec::new(),
            images: Vec::new(),
            permalink: String::new(),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum OrderStatus {
    Pending,
    Processing,
    OnHold,
    Completed,
    Cancelled,
    Refunded,
    Failed,
    Trash,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct OrderSummary {
    pub id: u64,
    pub number: String,
    pub status: OrderStatus,
    pub total: String,
    pub currency: String,
    pub date_created: String,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct OrderNotification {
    pub store_id: StoreId,
    pub unread_count: u32,
    pub last_checked_unix_ms: u64,
    pub orders: Vec<OrderSummary>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct OrderDigest {
    pub orders: Vec<OrderSummary>,
    pub last_checked_unix_ms: u64,
    pub total_count: u32,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum Language {
    #[serde(rename = "zh-CN")]
    ZhCn,
    #[serde(rename = "zh-TW")]
    ZhTw,
    #[serde(rename = "en-US")]
    EnUs,
}

impl Default for Language {
    fn default() -> Self {
        Self::ZhCn
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct ConsoleState {
    pub stores: Vec<StoreConfig>,
    pub active_store_id: Option<StoreId>,
    pub products: Vec<Product>,
    pub selected_product_ids: Vec<u64>,
    pub order_notifications: Vec<OrderNotification>,
    pub order_alerts_enabled: bool,
    pub busy: bool,
    pub language: Language,
}

impl Default for ConsoleState {
    fn default() -> Self {
        Self {
            stores: Vec::new(),
            active_store_id: None,
            products: Vec::new(),
            selected_product_ids: Vec::new(),
            order_notifications: Vec::new(),
            order_alerts_enabled: false,
            busy: false,
            language: Language::default(),
        }
    }
}

impl ConsoleState {
    pub fn active_store(&self) -> Option<&StoreConfig> {
        let active = self.active_store_id.as_ref()?;
        self.stores.iter().find(|s| &s.id == active)
    }

    pub fn snapshot(&self) -> ConsoleSnapshot {
        ConsoleSnapshot {
            stores: self.stores.clone(),
            active_store_id: self.active_store_id.clone(),
            language: self.language,
            is_order_notification_enabled: self.order_alerts_enabled,
        }
    }

    pub fn apply_snapshot(&mut self, snapshot: ConsoleSnapshot) {
        self.stores = snapshot.stores;
        self.active_store_id = snapshot
            .active_store_id
            .filter(|id| self.stores.iter().any(|s| &s.id == id));
        self.language = snapshot.language;
        self.order_alerts_enabled = snapshot.is_order_notification_enabled;
    }
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ConsoleSnapshot {
    pub stores: Vec<StoreConfig>,
    pub active_store_id: Option<StoreId>,
    pub language: Language,
    pub is_order_notification_enabled: bool,
}
