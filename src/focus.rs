//! Focus tracking.
//!
//! [`FocusTracker`] remembers which window has focus and keeps a
//! most-recent-first history of known windows for next/previous cycling.
//!
//! Changing the focus colours a window's border, and focus can churn quickly
//! when it follows the pointer.  Every change is therefore routed through a
//! debouncer: a single background thread that waits until no new focus
//! change has arrived for the configured timeout and only then asks its
//! [`FocusIndicator`] to repaint, once, for the last window focused.  Each
//! new change restarts the wait; nothing accumulates.

use crate::command::{Colour, FocusStrategy, WindowId};
use crate::traits::WindowSystem;
use log::{debug, warn};
use std::sync::mpsc::{self, RecvTimeoutError};
use std::sync::Arc;
use std::time::Duration;

/// Receives the committed focus after a burst of changes has settled.
pub trait FocusIndicator: Send + 'static {
    /// `previous` is the window of the last commit (if any), `current` the
    /// window that now has focus (if any).  Never called with equal values.
    fn indicate(&mut self, previous: Option<WindowId>, current: Option<WindowId>);
}

/// Paints window borders through the window system.
pub struct BorderIndicator<W: WindowSystem> {
    ws: Arc<W>,
    focused: Colour,
    unfocused: Colour,
}

impl<W: WindowSystem> BorderIndicator<W> {
    pub fn new(ws: Arc<W>, focused: Colour, unfocused: Colour) -> Self {
        Self {
            ws,
            focused,
            unfocused,
        }
    }
}

impl<W: WindowSystem + 'static> FocusIndicator for BorderIndicator<W> {
    fn indicate(&mut self, previous: Option<WindowId>, current: Option<WindowId>) {
        // Either window may be gone by the time the burst settles.
        if let Some(prev) = previous {
            if let Err(e) = self.ws.set_border_colour(prev, self.unfocused) {
                debug!("unfocused colour for {}: {}", prev, e);
            }
        }
        if let Some(cur) = current {
            if let Err(e) = self.ws.set_border_colour(cur, self.focused) {
                warn!("focused colour for {}: {}", cur, e);
            }
        }
    }
}

/// Handle on the debounce thread.  Dropping it stops the thread.
struct Debouncer {
    tx: mpsc::Sender<Option<WindowId>>,
}

impl Debouncer {
    fn spawn<I: FocusIndicator>(timeout: Duration, indicator: I) -> Self {
        let (tx, rx) = mpsc::channel();
        std::thread::spawn(move || debounce(rx, timeout, indicator));
        Self { tx }
    }

    fn submit(&self, window: Option<WindowId>) {
        if self.tx.send(window).is_err() {
            warn!("focus indicator thread has stopped");
        }
    }
}

fn debounce<I: FocusIndicator>(
    rx: mpsc::Receiver<Option<WindowId>>,
    timeout: Duration,
    mut indicator: I,
) {
    let mut committed: Option<WindowId> = None;
    while let Ok(mut pending) = rx.recv() {
        loop {
            match rx.recv_timeout(timeout) {
                Ok(next) => pending = next,
                Err(RecvTimeoutError::Timeout) => break,
                Err(RecvTimeoutError::Disconnected) => return,
            }
        }
        if pending != committed {
            debug!(
                "focus settled on {}",
                pending.map_or_else(|| "nothing".to_string(), |w| w.to_string())
            );
            indicator.indicate(committed, pending);
            committed = pending;
        }
    }
}

/// Tracks the focused window and the focus history.
pub struct FocusTracker {
    focused: Option<WindowId>,
    /// Known windows, most recently registered first.
    history: Vec<WindowId>,
    debouncer: Debouncer,
}

impl FocusTracker {
    /// Create a tracker whose indication commits go to `indicator` after
    /// `timeout` of quiet.
    pub fn new<I: FocusIndicator>(timeout: Duration, indicator: I) -> Self {
        Self {
            focused: None,
            history: Vec::new(),
            debouncer: Debouncer::spawn(timeout, indicator),
        }
    }

    pub fn focused(&self) -> Option<WindowId> {
        self.focused
    }

    /// Known windows, most recent first.
    pub fn history(&self) -> &[WindowId] {
        &self.history
    }

    pub fn contains(&self, window: WindowId) -> bool {
        self.history.contains(&window)
    }

    /// Start tracking `window` (if new) and focus it.
    pub fn register(&mut self, window: WindowId) {
        if !self.contains(window) {
            self.history.insert(0, window);
        }
        self.set_focus(Some(window));
    }

    /// Track `window` as the oldest history entry without focusing it.
    pub fn adopt(&mut self, window: WindowId) {
        if !self.contains(window) {
            self.history.push(window);
        }
    }

    /// Forget `window`.
    ///
    /// If it had focus the focus is cleared and the most recent remaining
    /// window is returned as the candidate to focus next.
    pub fn unregister(&mut self, window: WindowId) -> Option<WindowId> {
        self.history.retain(|w| *w != window);
        if self.focused == Some(window) {
            self.set_focus(None);
            return self.history.first().copied();
        }
        None
    }

    /// `window` was hidden: drop focus if it had it, keep it in history.
    pub fn unset(&mut self, window: WindowId) {
        if self.focused == Some(window) {
            self.set_focus(None);
        }
    }

    /// The neighbour of the focused window in the history, wrapping at
    /// either end, or `None` when there is nothing to cycle through.
    pub fn cycle_target(&self, strategy: FocusStrategy) -> Option<WindowId> {
        let n = self.history.len();
        if n <= 1 {
            return None;
        }
        let current = self
            .focused
            .and_then(|f| self.history.iter().position(|w| *w == f));
        let next = match (strategy, current) {
            (FocusStrategy::Next, Some(i)) => (i + 1) % n,
            (FocusStrategy::Next, None) => 0,
            (FocusStrategy::Prev, Some(i)) => (i + n - 1) % n,
            (FocusStrategy::Prev, None) => n - 1,
        };
        Some(self.history[next])
    }

    /// Focus [`cycle_target`](Self::cycle_target) and return it.
    pub fn cycle(&mut self, strategy: FocusStrategy) -> Option<WindowId> {
        let window = self.cycle_target(strategy)?;
        self.set_focus(Some(window));
        Some(window)
    }

    fn set_focus(&mut self, window: Option<WindowId>) {
        if self.focused != window {
            self.focused = window;
            self.debouncer.submit(window);
        }
    }
}

//  Tests

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::Mutex;
    use std::thread::sleep;

    type Commits = Arc<Mutex<Vec<(Option<WindowId>, Option<WindowId>)>>>;

    /// Records every commit.
    struct Recording(Commits);

    impl FocusIndicator for Recording {
        fn indicate(&mut self, previous: Option<WindowId>, current: Option<WindowId>) {
            self.0.lock().unwrap().push((previous, current));
        }
    }

    fn tracker(timeout_ms: u64) -> (FocusTracker, Commits) {
        let commits = Commits::default();
        let t = FocusTracker::new(
            Duration::from_millis(timeout_ms),
            Recording(Arc::clone(&commits)),
        );
        (t, commits)
    }

    const A: WindowId = WindowId(0xa);
    const B: WindowId = WindowId(0xb);
    const C: WindowId = WindowId(0xc);

    #[test]
    fn register_puts_window_first_and_focuses_it() {
        let (mut t, _) = tracker(10);
        t.register(A);
        t.register(B);
        assert_eq!(t.history(), &[B, A]);
        assert_eq!(t.focused(), Some(B));
    }

    #[test]
    fn register_known_window_does_not_duplicate() {
        let (mut t, _) = tracker(10);
        t.register(A);
        t.register(B);
        t.register(A);
        assert_eq!(t.history(), &[B, A]);
        assert_eq!(t.focused(), Some(A));
    }

    #[test]
    fn unregister_focused_window_offers_next_candidate() {
        let (mut t, _) = tracker(10);
        t.register(A);
        t.register(B);
        t.register(C);
        assert_eq!(t.unregister(C), Some(B));
        assert_eq!(t.focused(), None);
        assert_eq!(t.history(), &[B, A]);
    }

    #[test]
    fn unregister_unfocused_window_keeps_focus() {
        let (mut t, _) = tracker(10);
        t.register(A);
        t.register(B);
        assert_eq!(t.unregister(A), None);
        assert_eq!(t.focused(), Some(B));
        assert!(!t.contains(A));
    }

    #[test]
    fn unregister_last_window_has_no_candidate() {
        let (mut t, _) = tracker(10);
        t.register(A);
        assert_eq!(t.unregister(A), None);
        assert_eq!(t.focused(), None);
        assert!(t.history().is_empty());
    }

    #[test]
    fn unset_clears_focus_but_keeps_history() {
        let (mut t, _) = tracker(10);
        t.register(A);
        t.register(B);
        t.unset(A);
        assert_eq!(t.focused(), Some(B));
        t.unset(B);
        assert_eq!(t.focused(), None);
        assert_eq!(t.history(), &[B, A]);
    }

    #[test]
    fn cycle_wraps_in_both_directions() {
        let (mut t, _) = tracker(10);
        t.register(A);
        t.register(B);
        t.register(C);
        // history is [C, B, A] with C focused
        assert_eq!(t.cycle(FocusStrategy::Next), Some(B));
        assert_eq!(t.cycle(FocusStrategy::Next), Some(A));
        assert_eq!(t.cycle(FocusStrategy::Next), Some(C));
        assert_eq!(t.cycle(FocusStrategy::Prev), Some(A));
        assert_eq!(t.history(), &[C, B, A], "cycling must not reorder");
    }

    #[test]
    fn cycle_without_focus_starts_at_an_end() {
        let (mut t, _) = tracker(10);
        t.register(A);
        t.register(B);
        t.unset(B);
        assert_eq!(t.cycle(FocusStrategy::Prev), Some(A));
        t.unset(A);
        assert_eq!(t.cycle(FocusStrategy::Next), Some(B));
    }

    #[test]
    fn cycle_with_one_window_is_noop() {
        let (mut t, _) = tracker(10);
        assert_eq!(t.cycle(FocusStrategy::Next), None);
        t.register(A);
        t.unset(A);
        assert_eq!(t.cycle(FocusStrategy::Next), None);
        assert_eq!(t.focused(), None);
    }

    #[test]
    fn adopt_appends_without_focusing() {
        let (mut t, _) = tracker(10);
        t.register(A);
        t.adopt(B);
        t.adopt(A);
        assert_eq!(t.history(), &[A, B]);
        assert_eq!(t.focused(), Some(A));
    }

    #[test]
    fn burst_of_focus_changes_commits_once_for_last_window() {
        let (mut t, commits) = tracker(100);
        t.register(A);
        t.register(B);
        t.register(C);
        sleep(Duration::from_millis(400));
        assert_eq!(*commits.lock().unwrap(), vec![(None, Some(C))]);
    }

    #[test]
    fn separate_bursts_commit_separately() {
        let (mut t, commits) = tracker(50);
        t.register(A);
        sleep(Duration::from_millis(300));
        t.register(B);
        sleep(Duration::from_millis(300));
        assert_eq!(
            *commits.lock().unwrap(),
            vec![(None, Some(A)), (Some(A), Some(B))]
        );
    }

    #[test]
    fn each_change_restarts_the_timeout() {
        let (mut t, commits) = tracker(300);
        t.register(A);
        sleep(Duration::from_millis(100));
        t.register(B);
        sleep(Duration::from_millis(100));
        assert!(commits.lock().unwrap().is_empty());
        sleep(Duration::from_millis(600));
        assert_eq!(*commits.lock().unwrap(), vec![(None, Some(B))]);
    }

    #[test]
    fn burst_ending_on_committed_window_commits_nothing() {
        let (mut t, commits) = tracker(50);
        t.register(A);
        sleep(Duration::from_millis(300));
        t.register(B);
        t.register(A);
        sleep(Duration::from_millis(300));
        assert_eq!(*commits.lock().unwrap(), vec![(None, Some(A))]);
    }
}
