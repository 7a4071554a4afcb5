//! Reducer actions, side-effect intents, and transition logic for the console runtime.

use std::collections::BTreeSet;

use thiserror::Error;

use crate::model::{
    ConsoleState, Language, OrderNotification, Product, StoreConfig, StoreId,
};

#[derive(Debug, Clone, PartialEq)]
/// Actions accepted by [`reduce_console`] to mutate [`ConsoleState`].
pub enum ConsoleAction {
    /// Register a new store configuration.
    AddStore(StoreConfig),
    /// Remove a store by id.
    RemoveStore {
        /// Store to remove.
        store_id: StoreId,
    },
    /// Select the store that catalog operations target.
    SetActiveStore {
        /// Store to activate, or `None` to clear the selection.
        store_id: Option<StoreId>,
    },
    /// Replace the loaded product list.
    SetProducts {
        /// New product list.
        products: Vec<Product>,
    },
    /// Toggle one product in or out of the bulk-operation selection.
    ToggleProductSelection {
        /// Product being toggled.
        product_id: u64,
    },
    /// Empty the bulk-operation selection.
    ClearProductSelection,
    /// Turn background order alerts on or off.
    SetOrderAlertsEnabled {
        /// New flag value.
        enabled: bool,
    },
    /// Record the latest order notification for a store.
    UpdateOrderNotification {
        /// Notification to record; replaces any prior one for its store.
        notification: OrderNotification,
    },
    /// Mark the console busy or idle while a gateway call is in flight.
    SetBusy {
        /// New busy flag.
        busy: bool,
    },
    /// Switch the console display language.
    SetLanguage {
        /// New language.
        language: Language,
    },
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
/// Side-effect intents emitted by [`reduce_console`] for the host context to execute.
pub enum ConsoleEffect {
    /// Ask the background context to run an order check now.
    TriggerOrderCheck,
    /// Ask the background context to clear the badge and stored order data.
    ClearOrderArtifacts,
}

#[derive(Debug, Error, Clone, PartialEq, Eq)]
/// Reducer errors for invalid actions (for example, referencing a missing store).
pub enum ReducerError {
    /// The referenced store id is not configured.
    #[error("store not found")]
    StoreNotFound,
    /// A store with this id is already configured.
    #[error("store id already configured")]
    DuplicateStore,
}

/// Applies a [`ConsoleAction`] to the console state and collects resulting side effects.
///
/// This function is the authoritative state transition engine for store
/// management, catalog selection, and alert preferences. State is unchanged
/// whenever an error is returned.
///
/// # Errors
///
/// Returns [`ReducerError::StoreNotFound`] when an action references a store
/// that is not configured, and [`ReducerError::DuplicateStore`] when adding a
/// store under an id that is already taken.
pub fn reduce_console(
    state: &mut ConsoleState,
    action: ConsoleAction,
) -> Result<Vec<ConsoleEffect>, ReducerError> {
    let mut effects = Vec::new();
    match action {
        ConsoleAction::AddStore(store) => {
            if state.stores.iter().any(|s| s.id == store.id) {
                return Err(ReducerError::DuplicateStore);
            }
            let store_id = store.id.clone();
            state.stores.push(store);
            if state.active_store_id.is_none() {
                state.active_store_id = Some(store_id);
            }
        }
        ConsoleAction::RemoveStore { store_id } => {
            let before_len = state.stores.len();
            state.stores.retain(|s| s.id != store_id);
            if state.stores.len() == before_len {
                return Err(ReducerError::StoreNotFound);
            }
            if state.active_store_id.as_ref() == Some(&store_id) {
                state.active_store_id = None;
            }
            state.order_notifications.retain(|n| n.store_id != store_id);
        }
        ConsoleAction::SetActiveStore { store_id } => {
            if let Some(id) = &store_id {
                if !state.stores.iter().any(|s| &s.id == id) {
                    return Err(ReducerError::StoreNotFound);
                }
            }
            state.active_store_id = store_id;
        }
        ConsoleAction::SetProducts { products } => {
            state.products = products;
            let present: BTreeSet<u64> = state.products.iter().map(|p| p.id).collect();
            state.selected_product_ids.retain(|id| present.contains(id));
        }
        ConsoleAction::ToggleProductSelection { product_id } => {
            match state
                .selected_product_ids
                .iter()
                .position(|id| *id == product_id)
            {
                Some(index) => {
                    state.selected_product_ids.remove(index);
                }
                None => state.selected_product_ids.push(product_id),
            }
        }
        ConsoleAction::ClearProductSelection => {
            state.selected_product_ids.clear();
        }
        ConsoleAction::SetOrderAlertsEnabled { enabled } => {
            if state.order_alerts_enabled != enabled {
                effects.push(if enabled {
                    ConsoleEffect::TriggerOrderCheck
                } else {
                    ConsoleEffect::ClearOrderArtifacts
                });
            }
            state.order_alerts_enabled = enabled;
        }
        ConsoleAction::UpdateOrderNotification { notification } => {
            match state
                .order_notifications
                .iter_mut()
                .find(|n| n.store_id == notification.store_id)
            {
                Some(existing) => *existing = notification,
                None => state.order_notifications.push(notification),
            }
        }
        ConsoleAction::SetBusy { busy } => {
            state.busy = busy;
        }
        ConsoleAction::SetLanguage { language } => {
            state.language = language;
        }
    }

    Ok(effects)
}
