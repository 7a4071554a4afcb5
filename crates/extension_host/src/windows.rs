//! Extension window contracts for opening standalone console pages.
//!
//! Like the badge, the window namespace is optional in [`crate::HostServices`];
//! contexts without window management omit it.

use std::{cell::RefCell, future::Future, pin::Pin, rc::Rc};

/// Object-safe boxed future used by [`WindowService`] async methods.
pub type WindowFuture<'a, T> = Pin<Box<dyn Future<Output = T> + 'a>>;

/// Request to open an extension page in a standalone popup window.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PopupWindowRequest {
    /// Extension-relative page path; the adapter expands it to a full URL.
    pub path: String,
    /// Outer window width in pixels.
    pub width: u32,
    /// Outer window height in pixels.
    pub height: u32,
}

impl PopupWindowRequest {
    /// Creates a request for `path` at the given outer size.
    pub fn new(path: impl Into<String>, width: u32, height: u32) -> Self {
        Self {
            path: path.into(),
            width,
            height,
        }
    }
}

/// Window management service.
pub trait WindowService {
    /// Opens an extension page in a new popup window.
    ///
    /// # Errors
    ///
    /// Returns an error when the host reports a failure.
    fn open_popup<'a>(
        &'a self,
        request: &'a PopupWindowRequest,
    ) -> WindowFuture<'a, Result<(), String>>;
}

#[derive(Debug, Clone, Copy, Default)]
/// Inert window service.
pub struct NoopWindowService;

impl WindowService for NoopWindowService {
    fn open_popup<'a>(
        &'a self,
        _request: &'a PopupWindowRequest,
    ) -> WindowFuture<'a, Result<(), String>> {
        Box::pin(async { Ok(()) })
    }
}

#[derive(Debug, Clone)]
/// In-memory window service recording opened popups.
pub struct MemoryWindowService {
    opened: Rc<RefCell<Vec<PopupWindowRequest>>>,
}

impl Default for MemoryWindowService {
    fn default() -> Self {
        Self {
            opened: Rc::new(RefCell::new(Vec::new())),
        }
    }
}

impl MemoryWindowService {
    /// Creates a service with no opened windows.
    pub fn new() -> Self {
        Self::default()
    }

    /// Returns every popup opened so far, in open order.
    pub fn opened(&self) -> Vec<PopupWindowRequest> {
        self.opened.borrow().clone()
    }
}

impl WindowService for MemoryWindowService {
    fn open_popup<'a>(
        &'a self,
        request: &'a PopupWindowRequest,
    ) -> WindowFuture<'a, Result<(), String>> {
        Box::pin(async move {
            self.opened.borrow_mut().push(request.clone());
            Ok(())
        })
    }
}
