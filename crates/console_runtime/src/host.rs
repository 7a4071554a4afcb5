//! Popup-side service bundle wiring the persisted console store, the
//! commerce gateway, and reducer effect execution together.

use std::rc::Rc;

use console_store::{PersistOptions, PersistedStore};
use extension_host::{HostServices, TaskSpawner};
use serde_json::Value;

use crate::gateway::CommerceGateway;
use crate::model::{ConsoleSnapshot, ConsoleState, APP_STATE_SLOT};
use crate::protocol::{send_console_request, ConsoleRequest};
use crate::reducer::{reduce_console, ConsoleAction, ConsoleEffect, ReducerError};

/// Persistence wiring for the console state: only the durable snapshot is
/// projected into the app-state slot, and loads overlay that snapshot onto
/// whatever the session has already mutated.
pub fn console_persist_options() -> PersistOptions<ConsoleState> {
    PersistOptions::new(
        APP_STATE_SLOT,
        |state: &ConsoleState| serde_json::to_value(state.snapshot()).map_err(|e| e.to_string()),
        |loaded: &Value, current: &ConsoleState| {
            let snapshot: ConsoleSnapshot =
                serde_json::from_value(loaded.clone()).map_err(|e| e.to_string())?;
            let mut next = current.clone();
            next.apply_snapshot(snapshot);
            Ok(next)
        },
    )
}

/// Everything a console page needs: host capabilities, the commerce
/// gateway, and the persisted state store.
#[derive(Clone)]
pub struct ConsoleHostContext {
    services: HostServices,
    gateway: Rc<dyn CommerceGateway>,
    store: Rc<PersistedStore<ConsoleState>>,
}

impl ConsoleHostContext {
    /// Opens the console store on the host's storage and bundles it with the
    /// given gateway. State is usable immediately; the slot load completes in
    /// the background.
    pub fn open(services: HostServices, gateway: Rc<dyn CommerceGateway>) -> Self {
        let store = PersistedStore::open(
            Rc::clone(&services.storage),
            Rc::clone(&services.spawner),
            ConsoleState::default,
            console_persist_options(),
        );
        Self {
            services,
            gateway,
            store,
        }
    }

    /// Host capability bundle this context was opened on.
    pub fn services(&self) -> &HostServices {
        &self.services
    }

    /// Commerce gateway used for store API calls.
    pub fn gateway(&self) -> &Rc<dyn CommerceGateway> {
        &self.gateway
    }

    /// Persisted console state store.
    pub fn store(&self) -> &Rc<PersistedStore<ConsoleState>> {
        &self.store
    }

    /// Applies a reducer action to live state and runs any side-effect
    /// intents it emits. The state change and its persistence enqueue are
    /// synchronous; effects run as spawned tasks.
    ///
    /// # Errors
    ///
    /// Returns the reducer's rejection; state is unchanged in that case.
    pub fn dispatch(&self, action: ConsoleAction) -> Result<(), ReducerError> {
        let mut outcome = Ok(Vec::new());
        self.store
            .update(|state| outcome = reduce_console(state, action));
        for effect in outcome? {
            self.run_effect(effect);
        }
        Ok(())
    }

    fn run_effect(&self, effect: ConsoleEffect) {
        let request = match effect {
            ConsoleEffect::TriggerOrderCheck => ConsoleRequest::EnableOrderNotification,
            ConsoleEffect::ClearOrderArtifacts => ConsoleRequest::DisableOrderNotification,
        };
        let bus = Rc::clone(&self.services.messaging);
        self.services.spawner.spawn_local(Box::pin(async move {
            match send_console_request(&*bus, &request).await {
                Ok(response) if !response.success => log::warn!(
                    "console effect rejected: {}",
                    response.message.unwrap_or_default()
                ),
                Ok(_) => {}
                Err(err) => log::warn!("console effect delivery failed: {err}"),
            }
        }));
    }
}

#[cfg(test)]
mod tests {
    use std::cell::RefCell;

    use console_store::LoadPhase;
    use extension_host::{MessageBus, MessageDisposition, MessageResponder};
    use futures::executor::LocalPool;
    use pretty_assertions::assert_eq;
    use serde_json::json;

    use super::*;
    use crate::model::{Language, StoreId};
    use crate::testing::{woo_store, TestHost};

    fn open_context(host: &TestHost, pool: &LocalPool) -> ConsoleHostContext {
        let services = host.services(Rc::new(pool.spawner()));
        ConsoleHostContext::open(
            services,
            Rc::new(crate::gateway::MemoryCommerceGateway::new()),
        )
    }

    #[test]
    fn dispatch_persists_the_camel_case_snapshot() {
        let host = TestHost::new();
        let mut pool = LocalPool::new();
        let ctx = open_context(&host, &pool);
        pool.run_until_stalled();

        ctx.dispatch(ConsoleAction::AddStore(woo_store("store-a", "Shop A")))
            .expect("add store");
        pool.run_until_stalled();

        let stored = host
            .storage
            .snapshot()
            .remove(APP_STATE_SLOT)
            .expect("app state persisted");
        assert_eq!(
            stored,
            json!({
                "stores": [{
                    "id": "store-a",
                    "name": "Shop A",
                    "url": "https://store-a.example",
                    "authType": "woocommerce",
                    "credentials": {"consumerKey": "ck_test", "consumerSecret": "cs_test"},
                    "isActive": true,
                }],
                "activeStoreId": "store-a",
                "language": "zh-CN",
                "isOrderNotificationEnabled": false,
            })
        );
    }

    #[test]
    fn a_rejected_action_leaves_state_and_storage_alone() {
        let host = TestHost::new();
        let mut pool = LocalPool::new();
        let ctx = open_context(&host, &pool);
        pool.run_until_stalled();
        ctx.dispatch(ConsoleAction::AddStore(woo_store("store-a", "Shop A")))
            .expect("add store");
        pool.run_until_stalled();
        let before = host.storage.snapshot();

        let err = ctx
            .dispatch(ConsoleAction::AddStore(woo_store("store-a", "Shop A")))
            .unwrap_err();
        pool.run_until_stalled();

        assert_eq!(err, ReducerError::DuplicateStore);
        assert_eq!(ctx.store().with(|state| state.stores.len()), 1);
        assert_eq!(host.storage.snapshot(), before);
    }

    #[test]
    fn toggling_alerts_messages_the_background() {
        let host = TestHost::new();
        let mut pool = LocalPool::new();
        let ctx = open_context(&host, &pool);
        let seen = Rc::new(RefCell::new(Vec::new()));
        let log = Rc::clone(&seen);
        host.bus.on_message(Rc::new(
            move |message, _sender, responder: MessageResponder| {
                log.borrow_mut().push(message["action"].clone());
                responder.respond(json!({"success": true}));
                MessageDisposition::Complete
            },
        ));
        pool.run_until_stalled();

        ctx.dispatch(ConsoleAction::SetOrderAlertsEnabled { enabled: true })
            .expect("enable");
        ctx.dispatch(ConsoleAction::SetOrderAlertsEnabled { enabled: false })
            .expect("disable");
        pool.run_until_stalled();

        assert_eq!(
            *seen.borrow(),
            vec![
                json!("enableOrderNotification"),
                json!("disableOrderNotification"),
            ]
        );
    }

    #[test]
    fn a_seeded_slot_hydrates_the_context() {
        let host = TestHost::new();
        host.seed_snapshot(&crate::model::ConsoleSnapshot {
            stores: vec![woo_store("store-a", "Shop A"), woo_store("store-b", "Shop B")],
            active_store_id: Some(StoreId::new("store-b")),
            language: Language::EnUs,
            is_order_notification_enabled: true,
        });
        let mut pool = LocalPool::new();
        let ctx = open_context(&host, &pool);

        assert_eq!(ctx.store().with(|state| state.stores.len()), 0);
        pool.run_until_stalled();

        assert_eq!(ctx.store().phase(), LoadPhase::LoadedAndMerged);
        ctx.store().with(|state| {
            assert_eq!(state.stores.len(), 2);
            assert_eq!(state.active_store_id, Some(StoreId::new("store-b")));
            assert_eq!(state.language, Language::EnUs);
            assert!(state.order_alerts_enabled);
        });
    }
}
