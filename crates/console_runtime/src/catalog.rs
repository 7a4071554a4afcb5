//! Product catalog workflows for the console pages.
//!
//! Every workflow resolves the active store, calls the commerce gateway, and
//! applies the confirmed result back to live state through the reducer, so
//! the catalog a page renders always reflects what the remote store accepted.

use crate::gateway::CommerceGateway;
use crate::host::ConsoleHostContext;
use crate::model::{Product, ProductDraft, ProductStatus, StoreConfig};
use crate::reducer::ConsoleAction;

fn active_store(ctx: &ConsoleHostContext) -> Result<StoreConfig, String> {
    ctx.store()
        .with(|state| state.active_store().cloned())
        .ok_or_else(|| "no active store selected".to_string())
}

fn set_busy(ctx: &ConsoleHostContext, busy: bool) {
    let _ = ctx.dispatch(ConsoleAction::SetBusy { busy });
}

/// Reloads the active store's catalog and returns how many products it holds.
///
/// # Errors
///
/// Returns an error when no store is active or the gateway listing fails;
/// live state keeps the previous catalog in that case.
pub async fn refresh_products(ctx: &ConsoleHostContext) -> Result<usize, String> {
    let store = active_store(ctx)?;
    set_busy(ctx, true);
    let listed = ctx.gateway().list_products(&store).await;
    set_busy(ctx, false);
    let products = listed?;
    let count = products.len();
    let _ = ctx.dispatch(ConsoleAction::SetProducts { products });
    Ok(count)
}

/// Creates a product on the active store and appends the stored version to
/// the live catalog.
///
/// # Errors
///
/// Returns an error when no store is active or the gateway rejects the draft.
pub async fn create_product(
    ctx: &ConsoleHostContext,
    draft: &ProductDraft,
) -> Result<Product, String> {
    let store = active_store(ctx)?;
    let created = ctx.gateway().create_product(&store, draft).await?;
    let mut products = ctx.store().with(|state| state.products.clone());
    products.push(created.clone());
    let _ = ctx.dispatch(ConsoleAction::SetProducts { products });
    Ok(created)
}

/// Pushes an edited product to the active store and replaces the matching
/// catalog entry with whatever the store echoed back.
///
/// # Errors
///
/// Returns an error when no store is active or the gateway rejects the edit.
pub async fn update_product(
    ctx: &ConsoleHostContext,
    product: &Product,
) -> Result<Product, String> {
    let store = active_store(ctx)?;
    let updated = ctx.gateway().update_product(&store, product).await?;
    let products = ctx.store().with(|state| {
        state
            .products
            .iter()
            .map(|existing| {
                if existing.id == updated.id {
                    updated.clone()
                } else {
                    existing.clone()
                }
            })
            .collect()
    });
    let _ = ctx.dispatch(ConsoleAction::SetProducts { products });
    Ok(updated)
}

/// Deletes every selected product on the active store and prunes the
/// successes from live state. Returns how many were deleted.
///
/// Individual failures are logged and skipped so one stubborn product does
/// not strand the rest of the selection.
///
/// # Errors
///
/// Returns an error when no store is active, or the first gateway error when
/// every delete failed; live state is untouched in both cases.
pub async fn delete_selected_products(ctx: &ConsoleHostContext) -> Result<usize, String> {
    let selected = ctx.store().with(|state| state.selected_product_ids.clone());
    if selected.is_empty() {
        return Ok(0);
    }
    let store = active_store(ctx)?;
    let mut removed = Vec::new();
    let mut first_error = None;
    for product_id in selected {
        match ctx.gateway().delete_product(&store, product_id).await {
            Ok(()) => removed.push(product_id),
            Err(err) => {
                log::warn!("deleting product {product_id} failed: {err}");
                if first_error.is_none() {
                    first_error = Some(err);
                }
            }
        }
    }
    if removed.is_empty() {
        if let Some(err) = first_error {
            return Err(err);
        }
    }
    let remaining = ctx.store().with(|state| {
        state
            .products
            .iter()
            .filter(|product| !removed.contains(&product.id))
            .cloned()
            .collect::<Vec<_>>()
    });
    let count = removed.len();
    let _ = ctx.dispatch(ConsoleAction::SetProducts {
        products: remaining,
    });
    Ok(count)
}

/// Sets the status of every selected product on the active store, mirrors
/// the change locally, and clears the selection. Returns how many products
/// the store reported as changed.
///
/// # Errors
///
/// Returns an error when no store is active or the gateway call fails; the
/// selection survives a failure so the operation can be retried.
pub async fn set_selected_status(
    ctx: &ConsoleHostContext,
    status: ProductStatus,
) -> Result<usize, String> {
    let selected = ctx.store().with(|state| state.selected_product_ids.clone());
    if selected.is_empty() {
        return Ok(0);
    }
    let store = active_store(ctx)?;
    let changed = ctx
        .gateway()
        .bulk_update_status(&store, &selected, status)
        .await?;
    let products = ctx.store().with(|state| {
        state
            .products
            .iter()
            .map(|product| {
                let mut product = product.clone();
                if selected.contains(&product.id) {
                    product.status = status;
                }
                product
            })
            .collect()
    });
    let _ = ctx.dispatch(ConsoleAction::SetProducts { products });
    let _ = ctx.dispatch(ConsoleAction::ClearProductSelection);
    Ok(changed)
}

/// Checks a store's credentials without touching live state, so a store can
/// be validated before it is added.
///
/// # Errors
///
/// Returns the gateway's failure description when the store is unreachable
/// or rejects the credentials.
pub async fn test_store_connection(
    ctx: &ConsoleHostContext,
    store: &StoreConfig,
) -> Result<(), String> {
    ctx.gateway().test_connection(store).await
}
