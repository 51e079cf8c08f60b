//! Lifecycle event dispatcher.
//!
//! Consumes the window system's create/destroy/map/unmap notifications in
//! delivery order and keeps the focus tracker and the views in step with
//! them.  Each notification takes the manager's lock for the duration of
//! its update, so it never interleaves with a one-shot command.
//!
//! A notification about a window that has vanished in the meantime is
//! logged and skipped.  Any other window-system failure stops the loop, as
//! does the end of the notification stream.

use crate::command::{EventKind, LifecycleEvent};
use crate::manager::{tolerate, GridManager, WmError};
use crate::traits::WindowSystem;
use log::{debug, error, info, warn};

/// Why the dispatcher stopped.
#[derive(Debug, thiserror::Error)]
pub enum DispatchError {
    /// The lifecycle stream ended.  It cannot be restarted.
    #[error("lifecycle event stream closed")]
    ChannelClosed,

    #[error(transparent)]
    Wm(#[from] WmError),
}

/// Subscribe to the window system's lifecycle notifications and dispatch
/// them until a fatal error.  Never returns `Ok`.
pub fn watch_and_dispatch<W: WindowSystem + 'static>(
    manager: &GridManager<W>,
) -> Result<(), DispatchError> {
    let events = manager
        .ws()
        .watch_events()
        .map_err(|e| WmError::WindowSystem(format!("failed to watch events: {}", e)))?;
    info!("watching window lifecycle events");
    dispatch(manager, events)
}

/// Dispatch every event from `events`, in order.
///
/// Returns [`DispatchError::ChannelClosed`] once the events run out, or the
/// first fatal error.
pub fn dispatch<W, I>(manager: &GridManager<W>, events: I) -> Result<(), DispatchError>
where
    W: WindowSystem + 'static,
    I: IntoIterator<Item = LifecycleEvent>,
{
    for event in events {
        match handle_event(manager, event) {
            Ok(()) => {}
            Err(e) if e.is_transient() => {
                warn!("{:?} {}: {}", event.kind, event.window, e);
            }
            Err(e) => {
                error!("{:?} {}: {}", event.kind, event.window, e);
                return Err(e.into());
            }
        }
    }
    Err(DispatchError::ChannelClosed)
}

/// Apply a single lifecycle event.
pub fn handle_event<W: WindowSystem + 'static>(
    manager: &GridManager<W>,
    event: LifecycleEvent,
) -> Result<(), WmError> {
    let window = event.window;
    debug!("{:?} {}", event.kind, window);
    match event.kind {
        EventKind::Created => {
            if manager.ignored(window)? {
                return Ok(());
            }
            // Let the client settle on its own size before we look at it.
            std::thread::sleep(manager.settle_delay());
            let state = manager.lock()?;
            manager.place_created(&state, window)
        }
        EventKind::Destroyed => {
            let mut state = manager.lock()?;
            let next = state.focus.unregister(window);
            state.views.unregister_all(window);
            if let Some(next) = next {
                debug!("focus falls back to {}", next);
                state.focus.register(next);
                tolerate(manager.call(next, |ws| ws.focus_window(next)))?;
            }
            Ok(())
        }
        EventKind::Unmapped => {
            manager.lock()?.focus.unset(window);
            Ok(())
        }
        EventKind::Mapped => {
            if manager.ignored(window)? {
                return Ok(());
            }
            let mut state = manager.lock()?;
            state.focus.register(window);
            state.views.register(window);
            manager.call(window, |ws| ws.focus_window(window))
        }
    }
}

//  Tests
