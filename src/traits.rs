//! Core traits that decouple fgwm from the concrete window system and from
//! the transport that delivers one-shot commands.
//!
//! Every concrete backend (the wmutils tools, a Unix-socket listener, a
//! test harness, …) implements one of these traits.  The
//! [`GridManager`](crate::manager::GridManager) only depends on these
//! abstractions.

use crate::command::{Colour, LifecycleEvent, Request, Response, WindowId};
use crate::geometry::{Rectangle, Size};
use std::sync::{mpsc, Arc};

/// Abstraction over the X11 window system.
///
/// An implementation might shell out to the wmutils tools, or it might be a
/// recording stub used in tests.
///
/// # Latency contract
///
/// Window-level calls are made while the manager's state lock is held, so
/// they must return promptly (a short-lived process or a single round trip,
/// in the order of milliseconds).  Only
/// [`watch_events`](WindowSystem::watch_events) may block for long, and it
/// does so on its own thread.
pub trait WindowSystem: Send + Sync {
    /// The error type produced by this window system.
    type Error: std::error::Error + Send + 'static;

    /// Size of the root window.  Queried once at startup.
    fn screen_size(&self) -> Result<Size, Self::Error>;

    /// Current pixel geometry of `window`.
    fn window_rectangle(&self, window: WindowId) -> Result<Rectangle, Self::Error>;

    /// Move and resize `window` to `rect`.
    fn place_window(&self, window: WindowId, rect: Rectangle) -> Result<(), Self::Error>;

    fn set_border_width(&self, window: WindowId, width: i32) -> Result<(), Self::Error>;

    fn set_border_colour(&self, window: WindowId, colour: Colour) -> Result<(), Self::Error>;

    fn map_window(&self, window: WindowId) -> Result<(), Self::Error>;

    fn unmap_window(&self, window: WindowId) -> Result<(), Self::Error>;

    /// Give `window` keyboard focus.
    fn focus_window(&self, window: WindowId) -> Result<(), Self::Error>;

    /// Raise `window` to the top of the stacking order.
    fn raise_window(&self, window: WindowId) -> Result<(), Self::Error>;

    /// The window holding input focus, or `None` when it is the root.
    fn focused_window(&self) -> Result<Option<WindowId>, Self::Error>;

    /// Visible, managed children of the root window.
    fn list_windows(&self) -> Result<Vec<WindowId>, Self::Error>;

    /// Whether `window` still exists.
    ///
    /// Used to tell a vanished window (recoverable) apart from a broken
    /// connection to the window system.
    fn window_exists(&self, window: WindowId) -> Result<bool, Self::Error>;

    /// Whether `window` asked not to be managed (`override_redirect`).
    fn is_ignored(&self, _window: WindowId) -> Result<bool, Self::Error> {
        Ok(false)
    }

    /// Start watching window lifecycle notifications.
    ///
    /// Notifications arrive in delivery order.  The receiver disconnecting
    /// means the stream has ended and cannot be restarted.
    fn watch_events(&self) -> Result<mpsc::Receiver<LifecycleEvent>, Self::Error>;
}

//  Command Source

/// Something that executes [`Request`]s and reports the outcome.
///
/// Implemented by [`GridManager`](crate::manager::GridManager).  Handlers
/// are shared between threads, so any number of callers may submit
/// requests concurrently; the handler serializes them internally.
pub trait RequestHandler: Send + Sync {
    fn handle(&self, request: Request) -> Response;
}

/// A source of one-shot [`Request`]s.
///
/// Implementations listen on some transport (a Unix socket, a test
/// harness, …) and hand every parsed request to the handler, sending the
/// [`Response`] back over the same transport.
///
/// # Contract
///
/// * [`run`](CommandSource::run) **blocks** until the source is exhausted or
///   an unrecoverable error occurs.
/// * Each received request is handled exactly once.
/// * Implementations must be [`Send`] so they can run on a dedicated thread.
pub trait CommandSource: Send {
    /// The error type produced by this source.
    type Error: std::error::Error + Send + 'static;

    /// Start listening and hand every incoming [`Request`] to `handler`.
    ///
    /// This method blocks the calling thread.  To run multiple sources
    /// concurrently, spawn each one on its own thread.
    fn run<H: RequestHandler + 'static>(&mut self, handler: Arc<H>) -> Result<(), Self::Error>;
}
