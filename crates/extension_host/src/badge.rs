//! Action-button badge contracts.
//!
//! The badge namespace is optional: [`crate::HostServices`] carries it as an
//! `Option`, and hosts without an action button simply omit it.

use std::{cell::RefCell, future::Future, pin::Pin, rc::Rc};

/// Object-safe boxed future used by [`BadgeService`] async methods.
pub type BadgeFuture<'a, T> = Pin<Box<dyn Future<Output = T> + 'a>>;

/// Badge text on the extension's action button.
pub trait BadgeService {
    /// Shows `text` on the action button.
    ///
    /// # Errors
    ///
    /// Returns an error when the host reports a failure.
    fn set_text<'a>(&'a self, text: &'a str) -> BadgeFuture<'a, Result<(), String>>;

    /// Sets the badge background color (CSS color string).
    ///
    /// # Errors
    ///
    /// Returns an error when the host reports a failure.
    fn set_background_color<'a>(&'a self, color: &'a str) -> BadgeFuture<'a, Result<(), String>>;

    /// Removes any badge text.
    ///
    /// # Errors
    ///
    /// Returns an error when the host reports a failure.
    fn clear<'a>(&'a self) -> BadgeFuture<'a, Result<(), String>>;
}

#[derive(Debug, Clone, Copy, Default)]
/// Inert badge service.
pub struct NoopBadgeService;

impl BadgeService for NoopBadgeService {
    fn set_text<'a>(&'a self, _text: &'a str) -> BadgeFuture<'a, Result<(), String>> {
        Box::pin(async { Ok(()) })
    }

    fn set_background_color<'a>(&'a self, _color: &'a str) -> BadgeFuture<'a, Result<(), String>> {
        Box::pin(async { Ok(()) })
    }

    fn clear<'a>(&'a self) -> BadgeFuture<'a, Result<(), String>> {
        Box::pin(async { Ok(()) })
    }
}

#[derive(Debug, Clone)]
/// In-memory badge recording the currently shown text and color.
pub struct MemoryBadgeService {
    text: Rc<RefCell<Option<String>>>,
    background_color: Rc<RefCell<Option<String>>>,
}

impl Default for MemoryBadgeService {
    fn default() -> Self {
        Self {
            text: Rc::new(RefCell::new(None)),
            background_color: Rc::new(RefCell::new(None)),
        }
    }
}

impl MemoryBadgeService {
    /// Creates a badge with no text shown.
    pub fn new() -> Self {
        Self::default()
    }

    /// Returns the currently shown badge text, if any.
    pub fn text(&self) -> Option<String> {
        self.text.borrow().clone()
    }

    /// Returns the last applied background color, if any.
    pub fn background_color(&self) -> Option<String> {
        self.background_color.borrow().clone()
    }
}

impl BadgeService for MemoryBadgeService {
    fn set_text<'a>(&'a self, text: &'a str) -> BadgeFuture<'a, Result<(), String>> {
        Box::pin(async move {
            *self.text.borrow_mut() = Some(text.to_string());
            Ok(())
        })
    }

    fn set_background_color<'a>(&'a self, color: &'a str) -> BadgeFuture<'a, Result<(), String>> {
        Box::pin(async move {
            *self.background_color.borrow_mut() = Some(color.to_string());
            Ok(())
        })
    }

    fn clear<'a>(&'a self) -> BadgeFuture<'a, Result<(), String>> {
        Box::pin(async move {
            *self.text.borrow_mut() = None;
            Ok(())
        })
    }
}
