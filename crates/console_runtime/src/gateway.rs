//! REST-surface seam between console operations and a WooCommerce backend.
//!
//! The production HTTP client lives outside this workspace; consumers depend
//! on [`CommerceGateway`] so catalog operations and the order watcher run
//! unchanged against the in-memory implementation.

use std::{
    cell::{Cell, RefCell},
    collections::BTreeMap,
    future::Future,
    pin::Pin,
    rc::Rc,
};

use crate::model::{
    OrderNotification, Product, ProductDraft, ProductStatus, StoreConfig, StoreId,
};

/// Boxed future type for [`CommerceGateway`] operations.
pub type CommerceGatewayFuture<'a, T> = Pin<Box<dyn Future<Output = T> + 'a>>;

/// Storefront operations the console needs from a WooCommerce backend.
pub trait CommerceGateway {
    /// Verifies the store's credentials against its endpoint.
    fn test_connection<'a>(
        &'a self,
        store: &'a StoreConfig,
    ) -> CommerceGatewayFuture<'a, Result<(), String>>;

    /// Fetches the store's product catalog.
    fn list_products<'a>(
        &'a self,
        store: &'a StoreConfig,
    ) -> CommerceGatewayFuture<'a, Result<Vec<Product>, String>>;

    /// Creates a product from a draft and returns the stored product.
    fn create_product<'a>(
        &'a self,
        store: &'a StoreConfig,
        draft: &'a ProductDraft,
    ) -> CommerceGatewayFuture<'a, Result<Product, String>>;

    /// Replaces a product and returns the stored version.
    fn update_product<'a>(
        &'a self,
        store: &'a StoreConfig,
        product: &'a Product,
    ) -> CommerceGatewayFuture<'a, Result<Product, String>>;

    /// Deletes a product by id.
    fn delete_product<'a>(
        &'a self,
        store: &'a StoreConfig,
        product_id: u64,
    ) -> CommerceGatewayFuture<'a, Result<(), String>>;

    /// Sets the status of every listed product; returns how many changed.
    fn bulk_update_status<'a>(
        &'a self,
        store: &'a StoreConfig,
        product_ids: &'a [u64],
        status: ProductStatus,
    ) -> CommerceGatewayFuture<'a, Result<usize, String>>;

    /// Fetches the store's current unread-order notification.
    fn fetch_order_notification<'a>(
        &'a self,
        store: &'a StoreConfig,
    ) -> CommerceGatewayFuture<'a, Result<OrderNotification, String>>;
}

#[derive(Debug, Clone, Copy, Default)]
/// Inert gateway: every operation resolves an empty default.
pub struct NoopCommerceGateway;

impl CommerceGateway for NoopCommerceGateway {
    fn test_connection<'a>(
        &'a self,
        _store: &'a StoreConfig,
    ) -> CommerceGatewayFuture<'a, Result<(), String>> {
        Box::pin(async { Ok(()) })
    }

    fn list_products<'a>(
        &'a self,
        _store: &'a StoreConfig,
    ) -> CommerceGatewayFuture<'a, Result<Vec<Product>, String>> {
        Box::pin(async { Ok(Vec::new()) })
    }

    fn create_product<'a>(
        &'a self,
        _store: &'a StoreConfig,
        draft: &'a ProductDraft,
    ) -> CommerceGatewayFuture<'a, Result<Product, String>> {
        Box::pin(async { Ok(draft.to_product(0)) })
    }

    fn update_product<'a>(
        &'a self,
        _store: &'a StoreConfig,
        product: &'a Product,
    ) -> CommerceGatewayFuture<'a, Result<Product, String>> {
        Box::pin(async { Ok(product.clone()) })
    }

    fn delete_product<'a>(
        &'a self,
        _store: &'a StoreConfig,
        _product_id: u64,
    ) -> CommerceGatewayFuture<'a, Result<(), String>> {
        Box::pin(async { Ok(()) })
    }

    fn bulk_update_status<'a>(
        &'a self,
        _store: &'a StoreConfig,
        _product_ids: &'a [u64],
        _status: ProductStatus,
    ) -> CommerceGatewayFuture<'a, Result<usize, String>> {
        Box::pin(async { Ok(0) })
    }

    fn fetch_order_notification<'a>(
        &'a self,
        store: &'a StoreConfig,
    ) -> CommerceGatewayFuture<'a, Result<OrderNotification, String>> {
        Box::pin(async {
            Ok(OrderNotification {
                store_id: store.id.clone(),
                unread_count: 0,
                last_checked_unix_ms: 0,
                orders: Vec::new(),
            })
        })
    }
}

#[derive(Clone, Default)]
/// Scripted in-memory gateway for tests and demos.
///
/// Clones share one catalog. Per-store failures injected with
/// [`fail_store`](Self::fail_store) apply to every operation targeting that
/// store, which is how a dead endpoint behaves.
pub struct MemoryCommerceGateway {
    inner: Rc<GatewayInner>,
}

#[derive(Default)]
struct GatewayInner {
    products: RefCell<Vec<Product>>,
    notifications: RefCell<BTreeMap<StoreId, OrderNotification>>,
    failures: RefCell<BTreeMap<StoreId, String>>,
    list_calls: Cell<usize>,
    fetch_calls: Cell<usize>,
}

impl MemoryCommerceGateway {
    /// Creates an empty gateway.
    pub fn new() -> Self {
        Self::default()
    }

    /// Replaces the shared catalog.
    pub fn seed_products(&self, products: Vec<Product>) {
        *self.inner.products.borrow_mut() = products;
    }

    /// Scripts the notification returned for the notification's store.
    pub fn set_order_notification(&self, notification: OrderNotification) {
        self.inner
            .notifications
            .borrow_mut()
            .insert(notification.store_id.clone(), notification);
    }

    /// Makes every operation against `store_id` fail with `message`.
    pub fn fail_store(&self, store_id: StoreId, message: impl Into<String>) {
        self.inner.failures.borrow_mut().insert(store_id, message.into());
    }

    /// Current catalog contents.
    pub fn products(&self) -> Vec<Product> {
        self.inner.products.borrow().clone()
    }

    /// Number of `list_products` calls made.
    pub fn list_calls(&self) -> usize {
        self.inner.list_calls.get()
    }

    /// Number of `fetch_order_notification` calls made.
    pub fn fetch_calls(&self) -> usize {
        self.inner.fetch_calls.get()
    }

    fn check_store(&self, store: &StoreConfig) -> Result<(), String> {
        match self.inner.failures.borrow().get(&store.id) {
            Some(message) => Err(message.clone()),
            None => Ok(()),
        }
    }

    fn next_product_id(&self) -> u64 {
        self.inner
            .products
            .borrow()
            .iter()
            .map(|p| p.id)
            .max()
            .unwrap_or(0)
            + 1
    }
}

impl CommerceGateway for MemoryCommerceGateway {
    fn test_connection<'a>(
        &'a self,
        store: &'a StoreConfig,
    ) -> CommerceGatewayFuture<'a, Result<(), String>> {
        let result = self.check_store(store);
        Box::pin(async move { result })
    }

    fn list_products<'a>(
        &'a self,
        store: &'a StoreConfig,
    ) -> CommerceGatewayFuture<'a, Result<Vec<Product>, String>> {
        self.inner.list_calls.set(self.inner.list_calls.get() + 1);
        let result = self.check_store(store).map(|()| self.products());
        Box::pin(async move { result })
    }

    fn create_product<'a>(
        &'a self,
        store: &'a StoreConfig,
        draft: &'a ProductDraft,
    ) -> CommerceGatewayFuture<'a, Result<Product, String>> {
        let result = self.check_store(store).map(|()| {
            let product = draft.to_product(self.next_product_id());
            self.inner.products.borrow_mut().push(product.clone());
            product
        });
        Box::pin(async move { result })
    }

    fn update_product<'a>(
        &'a self,
        store: &'a StoreConfig,
        product: &'a Product,
    ) -> CommerceGatewayFuture<'a, Result<Product, String>> {
        let result = self.check_store(store).and_then(|()| {
            let mut products = self.inner.products.borrow_mut();
            match products.iter_mut().find(|p| p.id == product.id) {
                Some(slot) => {
                    *slot = product.clone();
                    Ok(product.clone())
                }
                None => Err(format!("product {} not found", product.id)),
            }
        });
        Box::pin(async move { result })
    }

    fn delete_product<'a>(
        &'a self,
        store: &'a StoreConfig,
        product_id: u64,
    ) -> CommerceGatewayFuture<'a, Result<(), String>> {
        let result = self.check_store(store).and_then(|()| {
            let mut products = self.inner.products.borrow_mut();
            let before_len = products.len();
            products.retain(|p| p.id != product_id);
            if products.len() == before_len {
                Err(format!("product {product_id} not found"))
            } else {
                Ok(())
            }
        });
        Box::pin(async move { result })
    }

    fn bulk_update_status<'a>(
        &'a self,
        store: &'a StoreConfig,
        product_ids: &'a [u64],
        status: ProductStatus,
    ) -> CommerceGatewayFuture<'a, Result<usize, String>> {
        let result = self.check_store(store).map(|()| {
            let mut updated = 0;
            for product in self.inner.products.borrow_mut().iter_mut() {
                if product_ids.contains(&product.id) {
                    product.status = status;
                    updated += 1;
                }
            }
            updated
        });
        Box::pin(async move { result })
    }

    fn fetch_order_notification<'a>(
        &'a self,
        store: &'a StoreConfig,
    ) -> CommerceGatewayFuture<'a, Result<OrderNotification, String>> {
        self.inner.fetch_calls.set(self.inner.fetch_calls.get() + 1);
        let result = self.check_store(store).map(|()| {
            self.inner
                .notifications
                .borrow()
                .get(&store.id)
                .cloned()
                .unwrap_or(OrderNotification {
                    store_id: store.id.clone(),
                    unread_count: 0,
                    last_checked_unix_ms: 0,
                    orders: Vec::new(),
                })
        });
        Box::pin(async move { result })
    }
}
