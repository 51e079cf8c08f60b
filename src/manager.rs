//! Core grid manager.
//!
//! [`GridManager`] owns the only mutable state in the daemon: the [`Grid`],
//! the [`FocusTracker`] and the [`ViewSet`], all behind one mutex.  Both the
//! lifecycle [dispatcher](crate::dispatch) and the one-shot command path
//! (the socket listener) go through it, so every mutation (and every call
//! it makes to the window system) is serialized.
//!
//! Placement commands follow the same steps: read the window's pixel
//! rectangle, reverse-map it to the span it occupies, apply the command's
//! span rule, convert back to pixels and hand the rectangle to the window
//! system.  Any failure before the last step leaves the window untouched.

use crate::command::{Command, Direction, FocusStrategy, Request, Response, WindowId};
use crate::config::Config;
use crate::focus::{BorderIndicator, FocusTracker};
use crate::geometry::{Cell, GridSize, Rectangle, Span};
use crate::grid::{Grid, GridError};
use crate::traits::{RequestHandler, WindowSystem};
use crate::view::ViewSet;
use log::{debug, info, warn};
use std::sync::{Arc, Mutex, MutexGuard};
use std::time::Duration;

/// Errors that can occur while executing a command or lifecycle event.
#[derive(Debug, thiserror::Error)]
pub enum WmError {
    /// The screen size could not be queried at startup.
    #[error("failed to query screen size: {0}")]
    Screen(String),

    #[error(transparent)]
    Grid(#[from] GridError),

    /// The window disappeared while we were working on it.
    #[error("window {0} no longer exists")]
    WindowGone(WindowId),

    /// The window system failed for a window that still exists, or could
    /// not be reached at all.
    #[error("window system error: {0}")]
    WindowSystem(String),

    /// No window was given and none has focus.
    #[error("no target window")]
    NoTarget,

    #[error("manager state lock poisoned")]
    Poisoned,
}

impl WmError {
    /// Whether the error only concerns a vanished window.
    pub fn is_transient(&self) -> bool {
        matches!(self, WmError::WindowGone(_))
    }
}

/// Everything guarded by the manager's lock.
pub struct GridState {
    pub grid: Grid,
    pub focus: FocusTracker,
    pub views: ViewSet,
}

/// Shared layout state plus the window system it drives.
pub struct GridManager<W: WindowSystem> {
    ws: Arc<W>,
    state: Mutex<GridState>,
    settle_delay: Duration,
}

impl<W: WindowSystem + 'static> GridManager<W> {
    /// Build the grid for the current screen and start the focus indicator.
    ///
    /// Fails when the screen cannot be queried or the grid configuration
    /// does not fit it.
    pub fn new(ws: Arc<W>, config: &Config) -> Result<Self, WmError> {
        let screen = ws
            .screen_size()
            .map_err(|e| WmError::Screen(e.to_string()))?;
        let grid = Grid::new(&config.grid.options(), screen)?;
        info!(
            "{}x{} grid on {}x{} screen, cell {}x{}, margin {}x{}",
            grid.dimensions().w,
            grid.dimensions().h,
            screen.w,
            screen.h,
            grid.cell().w,
            grid.cell().h,
            grid.margin().w,
            grid.margin().h
        );

        let indicator = BorderIndicator::new(
            Arc::clone(&ws),
            config.focus.focused_colour,
            config.focus.unfocused_colour,
        );
        let state = GridState {
            grid,
            focus: FocusTracker::new(config.focus.timeout(), indicator),
            views: ViewSet::new(config.initial_view),
        };

        Ok(Self {
            ws,
            state: Mutex::new(state),
            settle_delay: config.settle_delay(),
        })
    }

    /// Handle on the window system.
    pub fn ws(&self) -> &Arc<W> {
        &self.ws
    }

    /// How long a created window is left alone before it is placed.
    pub fn settle_delay(&self) -> Duration {
        self.settle_delay
    }

    /// Acquire the state lock.
    pub fn lock(&self) -> Result<MutexGuard<'_, GridState>, WmError> {
        self.state.lock().map_err(|_| WmError::Poisoned)
    }

    //  One-shot commands

    /// Execute `request`, resolving its target window first when the
    /// command needs one.
    pub fn execute(&self, request: Request) -> Result<(), WmError> {
        let mut state = self.lock()?;
        match request.command {
            Command::Focus(strategy) => self.cycle_in(&mut state, strategy),
            Command::SwitchView(view) => self.switch_in(&mut state, view),
            command => {
                let window = self.target(&state, request.window)?;
                self.apply(&mut state, window, command)
            }
        }
    }

    pub fn snap(&self, window: WindowId) -> Result<(), WmError> {
        self.execute(Request::new(Some(window), Command::Snap))
    }

    pub fn move_window(&self, window: WindowId, direction: Direction) -> Result<(), WmError> {
        self.execute(Request::new(Some(window), Command::Move(direction)))
    }

    pub fn move_by(&self, window: WindowId, delta: GridSize) -> Result<(), WmError> {
        self.execute(Request::new(Some(window), Command::MoveBy(delta)))
    }

    pub fn grow(&self, window: WindowId, delta: GridSize) -> Result<(), WmError> {
        self.execute(Request::new(Some(window), Command::Grow(delta)))
    }

    pub fn center(&self, window: WindowId) -> Result<(), WmError> {
        self.execute(Request::new(Some(window), Command::Center))
    }

    pub fn throw(&self, window: WindowId, direction: Direction) -> Result<(), WmError> {
        self.execute(Request::new(Some(window), Command::Throw(direction)))
    }

    pub fn spread(&self, window: WindowId, direction: Direction) -> Result<(), WmError> {
        self.execute(Request::new(Some(window), Command::Spread(direction)))
    }

    pub fn teleport(
        &self,
        window: WindowId,
        top_left: Cell,
        bottom_right: Cell,
    ) -> Result<(), WmError> {
        self.execute(Request::new(
            Some(window),
            Command::Teleport {
                top_left,
                bottom_right,
            },
        ))
    }

    pub fn cycle_focus(&self, strategy: FocusStrategy) -> Result<(), WmError> {
        self.execute(Request::new(None, Command::Focus(strategy)))
    }

    pub fn switch_view(&self, view: usize) -> Result<(), WmError> {
        self.execute(Request::new(None, Command::SwitchView(view)))
    }

    pub fn add_to_view(&self, window: WindowId, view: usize) -> Result<(), WmError> {
        self.execute(Request::new(Some(window), Command::AddToView(view)))
    }

    pub fn send_to_view(&self, window: WindowId, view: usize) -> Result<(), WmError> {
        self.execute(Request::new(Some(window), Command::SendToView(view)))
    }

    /// Take over the windows that already exist when the daemon starts.
    ///
    /// Each listed window joins the active view and the focus history, and
    /// the window the system reports as focused becomes the tracked focus.
    /// Returns the number of adopted windows.
    pub fn adopt_existing(&self) -> Result<usize, WmError> {
        let mut state = self.lock()?;
        let windows = self
            .ws
            .list_windows()
            .map_err(|e| WmError::WindowSystem(e.to_string()))?;
        let mut adopted = 0;
        for window in windows {
            if self.ignored(window)? {
                continue;
            }
            state.views.register(window);
            state.focus.adopt(window);
            adopted += 1;
        }
        let focused = self
            .ws
            .focused_window()
            .map_err(|e| WmError::WindowSystem(e.to_string()))?;
        if let Some(window) = focused.filter(|w| state.focus.contains(*w)) {
            state.focus.register(window);
        }
        info!("adopted {} existing windows", adopted);
        Ok(adopted)
    }

    //  Building blocks shared with the dispatcher

    /// Run a window-system call on `window`, classifying a failure as
    /// [`WmError::WindowGone`] when the window no longer exists.
    pub(crate) fn call<T>(
        &self,
        window: WindowId,
        f: impl FnOnce(&W) -> Result<T, W::Error>,
    ) -> Result<T, WmError> {
        f(&self.ws).map_err(|err| match self.ws.window_exists(window) {
            Ok(false) => WmError::WindowGone(window),
            Ok(true) => WmError::WindowSystem(err.to_string()),
            Err(e) => WmError::WindowSystem(format!("{} (existence check: {})", err, e)),
        })
    }

    pub(crate) fn ignored(&self, window: WindowId) -> Result<bool, WmError> {
        self.call(window, |ws| ws.is_ignored(window))
    }

    /// Initial placement for a freshly created window: its current size in
    /// cells, centred in the grid, plus the configured border width.
    pub(crate) fn place_created(&self, state: &GridState, window: WindowId) -> Result<(), WmError> {
        let rect = self.call(window, |ws| ws.window_rectangle(window))?;
        let span = match state.grid.span_of(&rect) {
            Some(current) => state.grid.centered_span(current.size()),
            None => state.grid.default_span(),
        };
        self.place_span(state, window, span)?;
        let border = state.grid.border();
        self.call(window, |ws| ws.set_border_width(window, border))
    }

    //  Internals

    /// Explicit window, else the tracked focus, else what the window system
    /// reports as focused.
    fn target(&self, state: &GridState, window: Option<WindowId>) -> Result<WindowId, WmError> {
        if let Some(window) = window.or_else(|| state.focus.focused()) {
            return Ok(window);
        }
        self.ws
            .focused_window()
            .map_err(|e| WmError::WindowSystem(e.to_string()))?
            .ok_or(WmError::NoTarget)
    }

    fn apply(&self, state: &mut GridState, window: WindowId, command: Command) -> Result<(), WmError> {
        match command {
            Command::Snap => self.reposition(state, window, |g, r| Ok(g.snap_span(Some(r)))),
            Command::Move(direction) => self.reposition(state, window, |g, r| {
                Ok(g.move_span(&occupied(g, r), direction.unit()))
            }),
            Command::MoveBy(delta) => {
                self.reposition(state, window, |g, r| Ok(g.move_span(&occupied(g, r), delta)))
            }
            Command::Grow(delta) => {
                self.reposition(state, window, |g, r| g.grow_span(&occupied(g, r), delta))
            }
            Command::Center => self.reposition(state, window, |g, r| Ok(occupied(g, r))),
            Command::Throw(direction) => self.reposition(state, window, |g, r| {
                Ok(g.throw_span(&occupied(g, r), direction))
            }),
            Command::Spread(direction) => self.reposition(state, window, |g, r| {
                Ok(g.spread_span(&occupied(g, r), direction))
            }),
            Command::Teleport {
                top_left,
                bottom_right,
            } => {
                let span = state.grid.teleport_span(top_left, bottom_right)?;
                self.place_span(state, window, span)
            }
            Command::AddToView(view) => {
                let was_visible = state.views.is_visible(window);
                state.views.add(window, view);
                if !was_visible && state.views.is_visible(window) {
                    self.call(window, |ws| ws.map_window(window))?;
                }
                Ok(())
            }
            Command::SendToView(view) => {
                let was_visible = state.views.is_visible(window);
                let visible = state.views.send(window, view);
                match (was_visible, visible) {
                    (true, false) => self.call(window, |ws| ws.unmap_window(window)),
                    (false, true) => self.call(window, |ws| ws.map_window(window)),
                    _ => Ok(()),
                }
            }
            // Not window-targeted; `execute` handles these.
            Command::Focus(_) | Command::SwitchView(_) => Ok(()),
        }
    }

    fn reposition<F>(&self, state: &GridState, window: WindowId, rule: F) -> Result<(), WmError>
    where
        F: FnOnce(&Grid, &Rectangle) -> Result<Span, GridError>,
    {
        let rect = self.call(window, |ws| ws.window_rectangle(window))?;
        let span = rule(&state.grid, &rect)?;
        self.place_span(state, window, span)
    }

    fn place_span(&self, state: &GridState, window: WindowId, span: Span) -> Result<(), WmError> {
        let rect = state.grid.rectangle(&span)?;
        debug!("placing {} on {} at {}", window, span, rect);
        self.call(window, |ws| ws.place_window(window, rect))
    }

    fn cycle_in(&self, state: &mut GridState, strategy: FocusStrategy) -> Result<(), WmError> {
        let Some(window) = state.focus.cycle_target(strategy) else {
            debug!("nothing to cycle focus to");
            return Ok(());
        };
        self.call(window, |ws| ws.focus_window(window))?;
        self.call(window, |ws| ws.raise_window(window))?;
        state.focus.register(window);
        Ok(())
    }

    fn switch_in(&self, state: &mut GridState, view: usize) -> Result<(), WmError> {
        info!("switching to view {}", view);
        let switch = state.views.switch_to(view);
        for window in switch.unmap {
            tolerate(self.call(window, |ws| ws.unmap_window(window)))?;
        }
        for window in switch.map {
            tolerate(self.call(window, |ws| ws.map_window(window)))?;
        }
        Ok(())
    }
}

/// The span `rect` occupies, or the default span when it is off the grid.
fn occupied(grid: &Grid, rect: &Rectangle) -> Span {
    grid.span_of(rect).unwrap_or_else(|| grid.default_span())
}

/// Log and swallow a vanished-window error, pass everything else through.
pub(crate) fn tolerate(result: Result<(), WmError>) -> Result<(), WmError> {
    match result {
        Err(WmError::WindowGone(window)) => {
            warn!("window {} vanished, skipping", window);
            Ok(())
        }
        other => other,
    }
}

impl<W: WindowSystem + 'static> RequestHandler for GridManager<W> {
    fn handle(&self, request: Request) -> Response {
        debug!("handling {:?}", request);
        match tolerate(self.execute(request)) {
            Ok(()) => Response::Ok,
            Err(e) => {
                warn!("command failed: {}", e);
                Response::Error(e.to_string())
            }
        }
    }
}

//  Tests

#[cfg(test)]
mod tests {
    use super::*;
    use crate::geometry::{Position, Size};
    use crate::mock::MockWs;

    const W: WindowId = WindowId(0x0040_0001);
    const V: WindowId = WindowId(0x0040_0002);

    fn make_manager() -> (Arc<MockWs>, GridManager<MockWs>) {
        let ws = Arc::new(MockWs::full_hd());
        let mgr = GridManager::new(Arc::clone(&ws), &Config::default()).unwrap();
        (ws, mgr)
    }

    fn span(x1: i32, y1: i32, x2: i32, y2: i32) -> Span {
        Span::new(Cell::new(x1, y1), Cell::new(x2, y2))
    }

    fn rect_of(mgr: &GridManager<MockWs>, s: Span) -> Rectangle {
        mgr.lock().unwrap().grid.rectangle(&s).unwrap()
    }

    /// A manager with `W` already sitting on `s`.
    fn placed(s: Span) -> (Arc<MockWs>, GridManager<MockWs>) {
        let (ws, mgr) = make_manager();
        ws.add_window(W, rect_of(&mgr, s));
        (ws, mgr)
    }

    #[test]
    fn construction_fails_when_screen_query_fails() {
        let ws = Arc::new(MockWs::full_hd());
        ws.break_connection();
        assert!(matches!(
            GridManager::new(ws, &Config::default()),
            Err(WmError::Screen(_))
        ));
    }

    #[test]
    fn construction_fails_on_invalid_grid() {
        let ws = Arc::new(MockWs::full_hd());
        let mut cfg = Config::default();
        cfg.grid.columns = 0;
        assert!(matches!(
            GridManager::new(ws, &cfg),
            Err(WmError::Grid(GridError::InvalidConfig(_)))
        ));
    }

    #[test]
    fn snap_unplaced_window_gives_centre_cell() {
        let (ws, mgr) = make_manager();
        ws.add_window(
            W,
            Rectangle::from_origin(Position::new(-500, -500), Size::new(100, 100)),
        );
        mgr.snap(W).unwrap();
        let rect = ws.rect(W).unwrap();
        assert_eq!(rect.top_left, Position::new(975, 555));
        assert_eq!(rect.bottom_right, Position::new(1024, 569));
        assert_eq!(rect.size(), Size::new(79 - 30, 44 - 30));
    }

    #[test]
    fn center_twice_gives_the_same_rectangle() {
        let (ws, mgr) = make_manager();
        // Dragged a few pixels off span (3,3)-(6,5).
        ws.add_window(W, rect_of(&mgr, span(3, 3, 6, 5)).offset(Size::new(3, 2)));
        mgr.center(W).unwrap();
        let first = ws.rect(W).unwrap();
        mgr.center(W).unwrap();
        assert_eq!(ws.rect(W).unwrap(), first);
        assert_eq!(first, rect_of(&mgr, span(3, 3, 6, 5)));
    }

    #[test]
    fn move_left_at_column_zero_leaves_window_in_place() {
        let (ws, mgr) = placed(span(0, 2, 3, 4));
        let before = ws.rect(W).unwrap();
        mgr.move_window(W, Direction::Left).unwrap();
        assert_eq!(ws.rect(W).unwrap(), before);
    }

    #[test]
    fn move_right_shifts_by_one_cell() {
        let (ws, mgr) = placed(span(0, 2, 3, 4));
        mgr.move_window(W, Direction::Right).unwrap();
        assert_eq!(ws.rect(W).unwrap(), rect_of(&mgr, span(1, 2, 4, 4)));
    }

    #[test]
    fn move_by_stops_at_the_edge() {
        let (ws, mgr) = placed(span(20, 20, 22, 22));
        mgr.move_by(W, GridSize::new(10, -3)).unwrap();
        assert_eq!(ws.rect(W).unwrap(), rect_of(&mgr, span(22, 17, 24, 19)));
    }

    #[test]
    fn grow_below_one_cell_is_rejected_and_window_unmoved() {
        let (ws, mgr) = placed(span(5, 5, 6, 6));
        let before = ws.rect(W).unwrap();
        let err = mgr.grow(W, GridSize::new(-1, -1)).unwrap_err();
        assert!(matches!(err, WmError::Grid(GridError::SpanTooSmall(_))));
        assert_eq!(ws.rect(W).unwrap(), before);
        assert!(ws.placements.lock().unwrap().is_empty());
    }

    #[test]
    fn huge_grow_fills_the_row_and_keeps_the_manager_usable() {
        let (ws, mgr) = placed(span(5, 5, 6, 6));
        mgr.grow(W, GridSize::new(i32::MAX, 0)).unwrap();
        assert_eq!(ws.rect(W).unwrap(), rect_of(&mgr, span(0, 5, 24, 6)));

        let err = mgr.grow(W, GridSize::new(i32::MIN, 0)).unwrap_err();
        assert!(matches!(err, WmError::Grid(GridError::SpanTooSmall(_))));

        mgr.snap(W).unwrap();
        assert!(mgr.lock().is_ok());
    }

    #[test]
    fn grow_expands_symmetrically() {
        let (ws, mgr) = placed(span(5, 5, 6, 6));
        mgr.grow(W, GridSize::new(1, 2)).unwrap();
        assert_eq!(ws.rect(W).unwrap(), rect_of(&mgr, span(4, 3, 7, 8)));
    }

    #[test]
    fn throw_down_keeps_size() {
        let (ws, mgr) = placed(span(2, 2, 5, 4));
        mgr.throw(W, Direction::Down).unwrap();
        assert_eq!(ws.rect(W).unwrap(), rect_of(&mgr, span(2, 22, 5, 24)));
    }

    #[test]
    fn spread_right_pins_right_edge() {
        let (ws, mgr) = placed(span(0, 0, 5, 5));
        mgr.spread(W, Direction::Right).unwrap();
        assert_eq!(ws.rect(W).unwrap(), rect_of(&mgr, span(0, 0, 24, 5)));
    }

    #[test]
    fn zero_width_teleport_is_rejected_and_window_unchanged() {
        let (ws, mgr) = placed(span(1, 1, 3, 3));
        let before = ws.rect(W).unwrap();
        let err = mgr
            .teleport(W, Cell::new(0, 0), Cell::new(0, 5))
            .unwrap_err();
        assert!(matches!(err, WmError::Grid(GridError::InvalidSpan(_))));
        assert_eq!(ws.rect(W).unwrap(), before);
        assert!(ws.placements.lock().unwrap().is_empty());
    }

    #[test]
    fn teleport_places_explicit_span() {
        let (ws, mgr) = placed(span(1, 1, 3, 3));
        mgr.teleport(W, Cell::new(12, 0), Cell::new(24, 24)).unwrap();
        assert_eq!(ws.rect(W).unwrap(), rect_of(&mgr, span(12, 0, 24, 24)));
    }

    #[test]
    fn vanished_window_is_transient() {
        let (ws, mgr) = make_manager();
        let err = mgr.snap(W).unwrap_err();
        assert!(matches!(err, WmError::WindowGone(w) if w == W));
        assert!(err.is_transient());
        let resp = mgr.handle(Request::new(Some(W), Command::Center));
        assert_eq!(resp, Response::Ok);
        assert!(ws.placements.lock().unwrap().is_empty());
    }

    #[test]
    fn broken_connection_is_reported_to_the_caller() {
        let (ws, mgr) = placed(span(1, 1, 3, 3));
        ws.break_connection();
        let err = mgr.snap(W).unwrap_err();
        assert!(matches!(err, WmError::WindowSystem(_)));
        let resp = mgr.handle(Request::new(Some(W), Command::Snap));
        assert!(matches!(resp, Response::Error(_)));
    }

    #[test]
    fn untargeted_request_uses_tracked_focus_first() {
        let (ws, mgr) = placed(span(0, 0, 2, 2));
        ws.add_window(V, rect_of(&mgr, span(0, 0, 2, 2)));
        *ws.current.lock().unwrap() = Some(V);
        mgr.lock().unwrap().focus.register(W);
        assert_eq!(
            mgr.handle(Request::new(None, Command::Throw(Direction::Right))),
            Response::Ok
        );
        assert_eq!(ws.rect(W).unwrap(), rect_of(&mgr, span(22, 0, 24, 2)));
        assert_eq!(ws.rect(V).unwrap(), rect_of(&mgr, span(0, 0, 2, 2)));
    }

    #[test]
    fn untargeted_request_falls_back_to_window_system_focus() {
        let (ws, mgr) = placed(span(0, 0, 2, 2));
        *ws.current.lock().unwrap() = Some(W);
        mgr.execute(Request::new(None, Command::Throw(Direction::Down)))
            .unwrap();
        assert_eq!(ws.rect(W).unwrap(), rect_of(&mgr, span(0, 22, 2, 24)));
    }

    #[test]
    fn untargeted_request_without_focus_fails() {
        let (_ws, mgr) = make_manager();
        assert!(matches!(
            mgr.execute(Request::new(None, Command::Snap)),
            Err(WmError::NoTarget)
        ));
    }

    #[test]
    fn cycle_focus_focuses_and_raises() {
        let (ws, mgr) = placed(span(0, 0, 2, 2));
        ws.add_window(V, rect_of(&mgr, span(4, 4, 6, 6)));
        {
            let mut state = mgr.lock().unwrap();
            state.focus.register(W);
            state.focus.register(V);
        }
        mgr.cycle_focus(FocusStrategy::Next).unwrap();
        assert_eq!(mgr.lock().unwrap().focus.focused(), Some(W));
        assert_eq!(*ws.focused.lock().unwrap(), vec![W]);
        assert_eq!(*ws.raised.lock().unwrap(), vec![W]);
    }

    #[test]
    fn failed_cycle_leaves_focus_where_it_was() {
        let (ws, mgr) = placed(span(0, 0, 2, 2));
        ws.add_window(V, rect_of(&mgr, span(4, 4, 6, 6)));
        {
            let mut state = mgr.lock().unwrap();
            state.focus.register(W);
            state.focus.register(V);
        }
        ws.break_connection();
        let err = mgr.cycle_focus(FocusStrategy::Next).unwrap_err();
        assert!(matches!(err, WmError::WindowSystem(_)));
        assert_eq!(mgr.lock().unwrap().focus.focused(), Some(V));
        assert_eq!(mgr.lock().unwrap().focus.history(), &[V, W]);
    }

    #[test]
    fn cycle_focus_with_single_window_does_nothing() {
        let (ws, mgr) = placed(span(0, 0, 2, 2));
        mgr.lock().unwrap().focus.register(W);
        mgr.cycle_focus(FocusStrategy::Prev).unwrap();
        assert!(ws.focused.lock().unwrap().is_empty());
    }

    #[test]
    fn switch_view_unmaps_and_maps() {
        let (ws, mgr) = placed(span(0, 0, 2, 2));
        ws.add_window(V, rect_of(&mgr, span(4, 4, 6, 6)));
        {
            let mut state = mgr.lock().unwrap();
            state.views.register(W);
            state.views.add(V, 1);
        }
        mgr.switch_view(1).unwrap();
        assert_eq!(mgr.lock().unwrap().views.active(), 1);
        assert_eq!(*ws.unmapped.lock().unwrap(), vec![W]);
        assert_eq!(*ws.mapped.lock().unwrap(), vec![V]);
    }

    #[test]
    fn switch_view_skips_vanished_windows() {
        let (ws, mgr) = placed(span(0, 0, 2, 2));
        {
            let mut state = mgr.lock().unwrap();
            state.views.register(W);
            state.views.register(V);
        }
        mgr.switch_view(3).unwrap();
        assert_eq!(*ws.unmapped.lock().unwrap(), vec![W]);
    }

    #[test]
    fn send_to_inactive_view_hides_window() {
        let (ws, mgr) = placed(span(0, 0, 2, 2));
        mgr.lock().unwrap().views.register(W);
        mgr.send_to_view(W, 2).unwrap();
        assert_eq!(*ws.unmapped.lock().unwrap(), vec![W]);
        assert_eq!(mgr.lock().unwrap().views.views_of(W), vec![2]);
    }

    #[test]
    fn add_to_view_keeps_window_visible() {
        let (ws, mgr) = placed(span(0, 0, 2, 2));
        mgr.lock().unwrap().views.register(W);
        mgr.add_to_view(W, 2).unwrap();
        assert!(ws.unmapped.lock().unwrap().is_empty());
        assert_eq!(mgr.lock().unwrap().views.views_of(W), vec![0, 2]);
    }

    #[test]
    fn add_to_active_view_maps_hidden_window() {
        let (ws, mgr) = placed(span(0, 0, 2, 2));
        mgr.lock().unwrap().views.add(W, 5);
        mgr.add_to_view(W, 0).unwrap();
        assert_eq!(*ws.mapped.lock().unwrap(), vec![W]);
    }

    #[test]
    fn adopt_existing_registers_listed_windows() {
        let (ws, mgr) = placed(span(0, 0, 2, 2));
        ws.add_window(V, rect_of(&mgr, span(4, 4, 6, 6)));
        let menu = WindowId(0x0040_0003);
        ws.add_window(menu, rect_of(&mgr, span(8, 8, 9, 9)));
        ws.ignored.lock().unwrap().insert(menu);
        *ws.current.lock().unwrap() = Some(V);

        assert_eq!(mgr.adopt_existing().unwrap(), 2);
        let state = mgr.lock().unwrap();
        assert_eq!(state.views.members(0), vec![W, V]);
        assert!(!state.focus.contains(menu));
        assert_eq!(state.focus.focused(), Some(V));
    }

    #[test]
    fn created_window_is_centred_at_its_own_size() {
        let (ws, mgr) = make_manager();
        ws.add_window(
            W,
            Rectangle::from_origin(Position::new(0, 0), Size::new(640, 480)),
        );
        {
            let state = mgr.lock().unwrap();
            mgr.place_created(&state, W).unwrap();
        }
        // 640x480 at the origin covers 8x11 cells.
        assert_eq!(ws.rect(W).unwrap(), rect_of(&mgr, span(8, 6, 16, 17)));
        assert_eq!(*ws.borders.lock().unwrap(), vec![(W, 5)]);
    }
}
