//! Recording [`WindowSystem`] used by the unit tests.

use crate::command::{Colour, LifecycleEvent, WindowId};
use crate::geometry::{Rectangle, Size};
use crate::traits::WindowSystem;
use std::collections::{HashMap, HashSet};
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::{mpsc, Mutex};

/// Record-keeping mock window system.
///
/// Windows live in `windows`; calls naming an unknown window fail the way a
/// vanished X window would.  Setting `broken` makes every call fail,
/// including `window_exists`, which models a lost connection.
#[derive(Debug, Default)]
pub(crate) struct MockWs {
    pub screen: Size,
    pub windows: Mutex<HashMap<WindowId, Rectangle>>,
    pub placements: Mutex<Vec<(WindowId, Rectangle)>>,
    pub borders: Mutex<Vec<(WindowId, i32)>>,
    pub colours: Mutex<Vec<(WindowId, Colour)>>,
    pub mapped: Mutex<Vec<WindowId>>,
    pub unmapped: Mutex<Vec<WindowId>>,
    pub focused: Mutex<Vec<WindowId>>,
    pub raised: Mutex<Vec<WindowId>>,
    /// Answer for `focused_window`.
    pub current: Mutex<Option<WindowId>>,
    pub ignored: Mutex<HashSet<WindowId>>,
    /// Handed out once by `watch_events`.
    pub events: Mutex<Option<Vec<LifecycleEvent>>>,
    pub broken: AtomicBool,
}

#[derive(Debug, thiserror::Error)]
#[error("mock window system: {0}")]
pub(crate) struct MockError(pub String);

impl MockWs {
    pub fn full_hd() -> Self {
        Self {
            screen: Size::new(1920, 1080),
            ..Self::default()
        }
    }

    pub fn add_window(&self, window: WindowId, rect: Rectangle) {
        self.windows.lock().unwrap().insert(window, rect);
    }

    pub fn remove_window(&self, window: WindowId) {
        self.windows.lock().unwrap().remove(&window);
    }

    pub fn rect(&self, window: WindowId) -> Option<Rectangle> {
        self.windows.lock().unwrap().get(&window).copied()
    }

    pub fn set_events(&self, events: Vec<LifecycleEvent>) {
        *self.events.lock().unwrap() = Some(events);
    }

    pub fn break_connection(&self) {
        self.broken.store(true, Ordering::SeqCst);
    }

    fn check(&self, window: WindowId) -> Result<(), MockError> {
        if self.broken.load(Ordering::SeqCst) {
            return Err(MockError("connection lost".into()));
        }
        if !self.windows.lock().unwrap().contains_key(&window) {
            return Err(MockError(format!("no window {}", window)));
        }
        Ok(())
    }
}

impl WindowSystem for MockWs {
    type Error = MockError;

    fn screen_size(&self) -> Result<Size, MockError> {
        if self.broken.load(Ordering::SeqCst) {
            return Err(MockError("connection lost".into()));
        }
        Ok(self.screen)
    }

    fn window_rectangle(&self, window: WindowId) -> Result<Rectangle, MockError> {
        self.check(window)?;
        self.rect(window)
            .ok_or_else(|| MockError(format!("no window {}", window)))
    }

    fn place_window(&self, window: WindowId, rect: Rectangle) -> Result<(), MockError> {
        self.check(window)?;
        self.windows.lock().unwrap().insert(window, rect);
        self.placements.lock().unwrap().push((window, rect));
        Ok(())
    }

    fn set_border_width(&self, window: WindowId, width: i32) -> Result<(), MockError> {
        self.check(window)?;
        self.borders.lock().unwrap().push((window, width));
        Ok(())
    }

    fn set_border_colour(&self, window: WindowId, colour: Colour) -> Result<(), MockError> {
        self.check(window)?;
        self.colours.lock().unwrap().push((window, colour));
        Ok(())
    }

    fn map_window(&self, window: WindowId) -> Result<(), MockError> {
        self.check(window)?;
        self.mapped.lock().unwrap().push(window);
        Ok(())
    }

    fn unmap_window(&self, window: WindowId) -> Result<(), MockError> {
        self.check(window)?;
        self.unmapped.lock().unwrap().push(window);
        Ok(())
    }

    fn focus_window(&self, window: WindowId) -> Result<(), MockError> {
        self.check(window)?;
        self.focused.lock().unwrap().push(window);
        *self.current.lock().unwrap() = Some(window);
        Ok(())
    }

    fn raise_window(&self, window: WindowId) -> Result<(), MockError> {
        self.check(window)?;
        self.raised.lock().unwrap().push(window);
        Ok(())
    }

    fn focused_window(&self) -> Result<Option<WindowId>, MockError> {
        Ok(*self.current.lock().unwrap())
    }

    fn list_windows(&self) -> Result<Vec<WindowId>, MockError> {
        let mut list: Vec<WindowId> = self.windows.lock().unwrap().keys().copied().collect();
        list.sort();
        Ok(list)
    }

    fn window_exists(&self, window: WindowId) -> Result<bool, MockError> {
        if self.broken.load(Ordering::SeqCst) {
            return Err(MockError("connection lost".into()));
        }
        Ok(self.windows.lock().unwrap().contains_key(&window))
    }

    fn is_ignored(&self, window: WindowId) -> Result<bool, MockError> {
        Ok(self.ignored.lock().unwrap().contains(&window))
    }

    fn watch_events(&self) -> Result<mpsc::Receiver<LifecycleEvent>, MockError> {
        let events = self
            .events
            .lock()
            .unwrap()
            .take()
            .ok_or_else(|| MockError("event stream already taken".into()))?;
        let (tx, rx) = mpsc::channel();
        for ev in events {
            let _ = tx.send(ev);
        }
        Ok(rx)
    }
}
