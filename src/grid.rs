//! Grid layout model.
//!
//! The [`Grid`] splits the screen into a fixed `columns × rows` lattice of
//! cells and converts between grid space ([`Span`]) and pixel space
//! ([`Rectangle`]).  It is derived once from the screen size and the
//! configured margin/pad/border and is read-only afterwards.
//!
//! The sizes that make up one row of the layout (`bd` is border; the Y
//! direction is the same):
//!
//! ```text
//! | <------------------------------ screen ------------------------------> |
//! | margin | pad | bd |    | bd | pad | pad | bd |    | bd | pad | margin |
//! |        | <-------- cell --------> | <-------- cell --------> |        |
//! ```
//!
//! Besides the conversions, this module holds the pure span rules behind
//! every placement command (snap, move, grow, throw, spread, teleport).  The
//! [`GridManager`](crate::manager::GridManager) feeds them the window's
//! current span and hands the resulting rectangle to the window system.

use crate::command::Direction;
use crate::geometry::{Cell, GridSize, Position, Rectangle, Size, Span};
use std::collections::HashMap;

/// Errors raised by the grid model.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum GridError {
    /// Columns/rows must be positive and margin/pad/border non-negative.
    #[error("invalid grid configuration: {0}")]
    InvalidConfig(String),

    /// The screen cannot fit a single padded cell per grid step.
    #[error("screen {}x{} is too small for a {}x{} grid", .screen.w, .screen.h, .dimensions.w, .dimensions.h)]
    ScreenTooSmall { screen: Size, dimensions: GridSize },

    /// The span is empty or reaches outside the grid.
    #[error("span {0} is empty or outside the grid")]
    InvalidSpan(Span),

    /// Shrinking would leave less than one cell on some axis.
    #[error("span {0} would be smaller than one cell")]
    SpanTooSmall(Span),

    /// A computed rectangle has no area.
    #[error("computed rectangle {0} is invalid")]
    InvalidGeometry(Rectangle),
}

/// Configuration-derived inputs for [`Grid::new`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct GridOptions {
    /// Window border width in pixels.
    pub border: i32,
    /// Smallest margin left free at the screen edges.
    pub min_margin: Size,
    /// Padding between a cell boundary and the window border.
    pub pad: Size,
    /// Number of columns (`w`) and rows (`h`).
    pub dimensions: GridSize,
}

/// A fixed grid over the screen.
#[derive(Debug, Clone)]
pub struct Grid {
    /// Size of the screen.
    screen: Size,
    /// Margin at the screen edges, re-centred so rounding is symmetric.
    margin: Size,
    /// Padding inside each cell.
    pad: Size,
    /// Border width drawn around each window.
    border: i32,
    /// Pitch between consecutive cell origins (pad and border included).
    cell: Size,
    /// Number of columns and rows.
    dimensions: GridSize,
    /// Pixel position of every cell boundary `(0..=cols, 0..=rows)`.
    points: HashMap<Cell, Position>,
}

impl Grid {
    /// Derive the grid for a screen of size `screen`.
    ///
    /// Fails when the dimensions are not positive, when any spacing is
    /// negative, or when the screen is too small for one padded window per
    /// cell.
    pub fn new(options: &GridOptions, screen: Size) -> Result<Self, GridError> {
        let GridOptions {
            border,
            min_margin,
            pad,
            dimensions,
        } = *options;

        if dimensions.w <= 0 || dimensions.h <= 0 {
            return Err(GridError::InvalidConfig(format!(
                "grid must have at least one column and row, got {}x{}",
                dimensions.w, dimensions.h
            )));
        }
        if border < 0 || min_margin.w < 0 || min_margin.h < 0 || pad.w < 0 || pad.h < 0 {
            return Err(GridError::InvalidConfig(
                "border, margin and pad must not be negative".into(),
            ));
        }

        let cell = Size::new(
            (screen.w - 2 * min_margin.w) / dimensions.w,
            (screen.h - 2 * min_margin.h) / dimensions.h,
        );
        let inset = pad.add(Size::new(border, border));
        if cell.w <= 2 * inset.w || cell.h <= 2 * inset.h {
            return Err(GridError::ScreenTooSmall { screen, dimensions });
        }
        let margin = Size::new(
            (screen.w - dimensions.w * cell.w) / 2,
            (screen.h - dimensions.h * cell.h) / 2,
        );

        let origin = Position::new(margin.w, margin.h);
        let mut points = HashMap::with_capacity(((dimensions.w + 1) * (dimensions.h + 1)) as usize);
        for x in 0..=dimensions.w {
            for y in 0..=dimensions.h {
                points.insert(
                    Cell::new(x, y),
                    origin.offset(Size::new(cell.w * x, cell.h * y)),
                );
            }
        }

        Ok(Self {
            screen,
            margin,
            pad,
            border,
            cell,
            dimensions,
            points,
        })
    }

    //  Accessors

    pub fn screen(&self) -> Size {
        self.screen
    }

    pub fn margin(&self) -> Size {
        self.margin
    }

    pub fn cell(&self) -> Size {
        self.cell
    }

    pub fn border(&self) -> i32 {
        self.border
    }

    /// Grid dimensions as `(columns, rows)`.
    pub fn dimensions(&self) -> GridSize {
        self.dimensions
    }

    /// Pixel position of the boundary at `cell`, if it lies on the grid.
    pub fn point(&self, cell: Cell) -> Option<Position> {
        self.points.get(&cell).copied()
    }

    /// Distance between a cell boundary and the window inside it.
    pub fn inset(&self) -> Size {
        self.pad.add(Size::new(self.border, self.border))
    }

    /// Whether `span` is non-empty and lies entirely inside the grid.
    pub fn contains(&self, span: &Span) -> bool {
        span.valid()
            && span.top_left.x >= 0
            && span.top_left.y >= 0
            && span.bottom_right.x <= self.dimensions.w
            && span.bottom_right.y <= self.dimensions.h
    }

    //  Conversions

    /// Pixel rectangle for the window occupying `span`.
    pub fn rectangle(&self, span: &Span) -> Result<Rectangle, GridError> {
        if !self.contains(span) {
            return Err(GridError::InvalidSpan(*span));
        }
        let corners = (self.point(span.top_left), self.point(span.bottom_right));
        let (top_left, bottom_right) = match corners {
            (Some(tl), Some(br)) => (tl, br),
            _ => return Err(GridError::InvalidSpan(*span)),
        };
        let rect = Rectangle::new(top_left, bottom_right).grow(self.inset().scale(-1));
        if !rect.valid() {
            return Err(GridError::InvalidGeometry(rect));
        }
        Ok(rect)
    }

    /// Best-effort reverse of [`rectangle`](Self::rectangle): the smallest
    /// span enclosing `rect`, clipped to the grid.
    ///
    /// Edges that fall between boundaries are pushed outwards (top-left
    /// rounds down, bottom-right rounds up).  Returns `None` when `rect`
    /// does not overlap the grid area at all, e.g. it sits on another
    /// monitor.
    pub fn span_of(&self, rect: &Rectangle) -> Option<Span> {
        let area = Rectangle::new(
            Position::new(self.margin.w, self.margin.h),
            Position::new(
                self.margin.w + self.dimensions.w * self.cell.w,
                self.margin.h + self.dimensions.h * self.cell.h,
            ),
        );
        if !rect.valid()
            || rect.bottom_right.x <= area.top_left.x
            || rect.bottom_right.y <= area.top_left.y
            || rect.top_left.x >= area.bottom_right.x
            || rect.top_left.y >= area.bottom_right.y
        {
            return None;
        }

        let left = (rect.top_left.x - self.margin.w)
            .div_euclid(self.cell.w)
            .clamp(0, self.dimensions.w - 1);
        let top = (rect.top_left.y - self.margin.h)
            .div_euclid(self.cell.h)
            .clamp(0, self.dimensions.h - 1);
        let right = ceil_div(rect.bottom_right.x - self.margin.w, self.cell.w)
            .clamp(left + 1, self.dimensions.w);
        let bottom = ceil_div(rect.bottom_right.y - self.margin.h, self.cell.h)
            .clamp(top + 1, self.dimensions.h);

        Some(Span::new(Cell::new(left, top), Cell::new(right, bottom)))
    }

    /// The cell containing `pos`, clamped onto the grid.
    pub fn cell_at(&self, pos: Position) -> Cell {
        Cell::new(
            (pos.x - self.margin.w)
                .div_euclid(self.cell.w)
                .clamp(0, self.dimensions.w - 1),
            (pos.y - self.margin.h)
                .div_euclid(self.cell.h)
                .clamp(0, self.dimensions.h - 1),
        )
    }

    //  Span rules

    /// Single cell in the middle of the grid.
    pub fn default_span(&self) -> Span {
        Span::from_origin(
            Cell::new(self.dimensions.w / 2, self.dimensions.h / 2),
            GridSize::new(1, 1),
        )
    }

    /// Span for `snap`: the cell under the centre of a placed window, or the
    /// default span when the window is not on the grid.
    pub fn snap_span(&self, current: Option<&Rectangle>) -> Span {
        match current {
            Some(rect) if self.span_of(rect).is_some() => {
                Span::from_origin(self.cell_at(rect.center()), GridSize::new(1, 1))
            }
            _ => self.default_span(),
        }
    }

    /// A span of `size` cells centred in the grid.  The size is clamped to
    /// at least one cell and at most the whole grid.
    pub fn centered_span(&self, size: GridSize) -> Span {
        let size = GridSize::new(
            size.w.clamp(1, self.dimensions.w),
            size.h.clamp(1, self.dimensions.h),
        );
        Span::from_origin(
            Cell::new(
                (self.dimensions.w - size.w) / 2,
                (self.dimensions.h - size.h) / 2,
            ),
            size,
        )
    }

    /// Shift `span` by `delta`, stopping at the grid edges.
    pub fn move_span(&self, span: &Span, delta: GridSize) -> Span {
        let dw = delta
            .w
            .clamp(-span.top_left.x, self.dimensions.w - span.bottom_right.x);
        let dh = delta
            .h
            .clamp(-span.top_left.y, self.dimensions.h - span.bottom_right.y);
        span.offset(GridSize::new(dw, dh))
    }

    /// Grow `span` by `delta` on every side (negative shrinks), clipped to
    /// the grid.
    pub fn grow_span(&self, span: &Span, delta: GridSize) -> Result<Span, GridError> {
        // Past the grid size every delta fills or empties the axis.
        let delta = GridSize::new(
            delta.w.clamp(-self.dimensions.w, self.dimensions.w),
            delta.h.clamp(-self.dimensions.h, self.dimensions.h),
        );
        let grown = span.grow(delta);
        if !grown.valid() {
            return Err(GridError::SpanTooSmall(grown));
        }
        Ok(Span::new(
            Cell::new(grown.top_left.x.max(0), grown.top_left.y.max(0)),
            Cell::new(
                grown.bottom_right.x.min(self.dimensions.w),
                grown.bottom_right.y.min(self.dimensions.h),
            ),
        ))
    }

    /// Move `span` as far as it goes in `direction`, keeping its size.
    pub fn throw_span(&self, span: &Span, direction: Direction) -> Span {
        let delta = match direction {
            Direction::Left => GridSize::new(-span.top_left.x, 0),
            Direction::Right => GridSize::new(self.dimensions.w - span.bottom_right.x, 0),
            Direction::Up => GridSize::new(0, -span.top_left.y),
            Direction::Down => GridSize::new(0, self.dimensions.h - span.bottom_right.y),
        };
        span.offset(delta)
    }

    /// Extend the edge of `span` facing `direction` to the grid boundary.
    pub fn spread_span(&self, span: &Span, direction: Direction) -> Span {
        let mut spread = *span;
        match direction {
            Direction::Left => spread.top_left.x = 0,
            Direction::Right => spread.bottom_right.x = self.dimensions.w,
            Direction::Up => spread.top_left.y = 0,
            Direction::Down => spread.bottom_right.y = self.dimensions.h,
        }
        spread
    }

    /// An explicit span; rejected unless it is non-empty and on the grid.
    pub fn teleport_span(&self, top_left: Cell, bottom_right: Cell) -> Result<Span, GridError> {
        let span = Span::new(top_left, bottom_right);
        if !self.contains(&span) {
            return Err(GridError::InvalidSpan(span));
        }
        Ok(span)
    }
}

fn ceil_div(n: i32, d: i32) -> i32 {
    -((-n).div_euclid(d))
}

//  Tests
