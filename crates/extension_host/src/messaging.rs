//! Inter-context messaging contracts with faithful async-reply semantics.
//!
//! The one behavior that must survive every transport is the open reply
//! channel: a handler that returns [`MessageDisposition::WillRespond`] keeps
//! the channel alive so a [`MessageResponder::respond`] call arriving after
//! the handler returned still reaches the sender. Closing the channel early
//! silently drops the reply on real hosts, so the memory bus reproduces the
//! same rules.

use std::{cell::RefCell, future::Future, pin::Pin, rc::Rc};

use futures::channel::oneshot;
use serde_json::Value;

/// Object-safe boxed future used by [`MessageBus`] async methods.
pub type MessageFuture<'a, T> = Pin<Box<dyn Future<Output = T> + 'a>>;

/// Identity of the context that sent a message, as reported by the host.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct MessageSender {
    /// Host-assigned extension id of the sending context.
    pub id: Option<String>,
    /// URL of the sending page, when the host exposes it.
    pub url: Option<String>,
}

/// One-shot reply channel handed to message handlers.
///
/// Clones share the channel; the first [`respond`](Self::respond) wins and
/// every later call is ignored. Dropping all clones without responding closes
/// the channel, which the sender observes as an absent reply.
#[derive(Clone)]
pub struct MessageResponder {
    reply: Rc<RefCell<Option<Box<dyn FnOnce(Value)>>>>,
}

impl MessageResponder {
    /// Wraps the transport-specific reply callback.
    pub fn new(reply: impl FnOnce(Value) + 'static) -> Self {
        Self {
            reply: Rc::new(RefCell::new(Some(Box::new(reply)))),
        }
    }

    /// Sends `value` back to the message sender.
    ///
    /// Returns `false` when the channel was already consumed by an earlier
    /// call on this responder or any of its clones.
    pub fn respond(&self, value: Value) -> bool {
        match self.reply.borrow_mut().take() {
            Some(reply) => {
                reply(value);
                true
            }
            None => false,
        }
    }
}

/// Handler outcome controlling the lifetime of the reply channel.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MessageDisposition {
    /// The handler is done with this message; the channel closes on return.
    Complete,
    /// The handler kept a [`MessageResponder`] clone and will reply later;
    /// the channel stays open after the handler returns.
    WillRespond,
}

/// Listener invoked for every message delivered to this context.
pub type MessageHandler = Rc<dyn Fn(&Value, &MessageSender, MessageResponder) -> MessageDisposition>;

/// Runtime message transport between extension contexts.
pub trait MessageBus {
    /// Adds a listener for messages arriving in this context.
    fn on_message(&self, handler: MessageHandler);

    /// Sends `message` and resolves with the remote reply.
    ///
    /// Resolves `Ok(None)` when no handler replied; an absent responder is
    /// host-defined behavior, not an error.
    ///
    /// # Errors
    ///
    /// Returns an error only when the host reports a transport failure.
    fn send<'a>(&'a self, message: &'a Value) -> MessageFuture<'a, Result<Option<Value>, String>>;
}

#[derive(Debug, Clone, Copy, Default)]
/// Inert bus for hosts without a runtime messaging namespace.
pub struct NoopMessageBus;

impl MessageBus for NoopMessageBus {
    fn on_message(&self, _handler: MessageHandler) {}

    fn send<'a>(&'a self, _message: &'a Value) -> MessageFuture<'a, Result<Option<Value>, String>> {
        Box::pin(async { Ok(None) })
    }
}

#[derive(Clone, Default)]
/// In-memory loopback bus delivering sends to handlers registered on the same
/// instance, with real open-channel semantics.
pub struct MemoryMessageBus {
    handlers: Rc<RefCell<Vec<MessageHandler>>>,
}

impl MemoryMessageBus {
    /// Creates a bus with no handlers.
    pub fn new() -> Self {
        Self::default()
    }
}

impl MessageBus for MemoryMessageBus {
    fn on_message(&self, handler: MessageHandler) {
        self.handlers.borrow_mut().push(handler);
    }

    fn send<'a>(&'a self, message: &'a Value) -> MessageFuture<'a, Result<Option<Value>, String>> {
        Box::pin(async move {
            let handlers: Vec<MessageHandler> = self.handlers.borrow().clone();
            if handlers.is_empty() {
                return Ok(None);
            }

            let (tx, mut rx) = oneshot::channel::<Value>();
            let slot = Rc::new(RefCell::new(Some(tx)));
            let responder = MessageResponder::new(move |value| {
                if let Some(tx) = slot.borrow_mut().take() {
                    let _ = tx.send(value);
                }
            });

            let sender = MessageSender::default();
            let mut channel_open = false;
            for handler in handlers {
                if handler(message, &sender, responder.clone()) == MessageDisposition::WillRespond
                {
                    channel_open = true;
                }
            }

            // A handler may have replied synchronously during the loop.
            if let Ok(Some(value)) = rx.try_recv() {
                return Ok(Some(value));
            }
            if !channel_open {
                return Ok(None);
            }

            // Drop our responder so the channel closes once the handlers'
            // clones are gone, instead of waiting forever on a forgotten
            // reply.
            drop(responder);
            match rx.await {
                Ok(value) => Ok(Some(value)),
                Err(_) => Ok(None),
            }
        })
    }
}
