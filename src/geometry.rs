//! Pixel and grid-space geometry.
//!
//! Two coordinate systems live side by side:
//!
//! * **pixel space**: [`Position`], [`Size`] and [`Rectangle`], origin at
//!   the top-left of the screen, `x` growing right and `y` growing down;
//! * **grid space**: [`Cell`], [`GridSize`] and [`Span`], measured in whole
//!   grid cells.
//!
//! The two never convert implicitly; only [`Grid`](crate::grid::Grid) maps
//! between them.

use serde::{Deserialize, Serialize};
use std::fmt;

//  Pixel space

/// A point on the screen, in pixels.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Position {
    pub x: i32,
    pub y: i32,
}

/// A pixel extent.
///
/// May be negative while doing arithmetic (e.g. a negated inset), but any
/// size describing a window or a cell is non-negative.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Size {
    pub w: i32,
    pub h: i32,
}

/// An axis-aligned pixel rectangle.
///
/// `bottom_right` is exclusive.  Only rectangles that pass [`valid`](Self::valid)
/// may be handed to the window system.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Rectangle {
    pub top_left: Position,
    pub bottom_right: Position,
}

impl Position {
    pub fn new(x: i32, y: i32) -> Self {
        Self { x, y }
    }

    /// Translate this point by `size`.
    pub fn offset(self, size: Size) -> Position {
        Position::new(self.x + size.w, self.y + size.h)
    }

    /// The vector from `other` to `self`.
    pub fn diff(self, other: Position) -> Size {
        Size::new(self.x - other.x, self.y - other.y)
    }
}

impl Size {
    pub fn new(w: i32, h: i32) -> Self {
        Self { w, h }
    }

    pub fn add(self, other: Size) -> Size {
        Size::new(self.w + other.w, self.h + other.h)
    }

    pub fn scale(self, k: i32) -> Size {
        Size::new(k * self.w, k * self.h)
    }
}

impl Rectangle {
    pub fn new(top_left: Position, bottom_right: Position) -> Self {
        Self {
            top_left,
            bottom_right,
        }
    }

    /// Build a rectangle from its top-left corner and its size.
    pub fn from_origin(top_left: Position, size: Size) -> Self {
        Self::new(top_left, top_left.offset(size))
    }

    pub fn size(&self) -> Size {
        self.bottom_right.diff(self.top_left)
    }

    /// Translate both corners by `size`.
    pub fn offset(&self, size: Size) -> Rectangle {
        Rectangle::new(self.top_left.offset(size), self.bottom_right.offset(size))
    }

    /// Move the top-left corner out by `size` and the bottom-right corner
    /// out by the same amount, keeping the centre fixed.  A negative size
    /// insets the rectangle.
    pub fn grow(&self, size: Size) -> Rectangle {
        Rectangle::new(
            self.top_left.offset(size.scale(-1)),
            self.bottom_right.offset(size),
        )
    }

    /// Centre point, rounded towards the top-left.
    pub fn center(&self) -> Position {
        Position::new(
            self.top_left.x + (self.bottom_right.x - self.top_left.x) / 2,
            self.top_left.y + (self.bottom_right.y - self.top_left.y) / 2,
        )
    }

    /// Whether the rectangle has a strictly positive area.
    pub fn valid(&self) -> bool {
        self.top_left.x < self.bottom_right.x && self.top_left.y < self.bottom_right.y
    }
}

impl fmt::Display for Rectangle {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let size = self.size();
        write!(
            f,
            "{}x{}+{}+{}",
            size.w, size.h, self.top_left.x, self.top_left.y
        )
    }
}

//  Grid space

/// A grid coordinate (column, row).
///
/// Cell indices inside the grid satisfy `0 <= x < columns` and
/// `0 <= y < rows`; the far boundaries `x == columns` / `y == rows` are
/// valid as the exclusive corner of a [`Span`].
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Cell {
    pub x: i32,
    pub y: i32,
}

/// A width/height measured in cells.  Used both for grid dimensions and for
/// move/grow deltas, so it may be negative.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct GridSize {
    pub w: i32,
    pub h: i32,
}

/// A rectangular range of cells, `bottom_right` exclusive.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Span {
    pub top_left: Cell,
    pub bottom_right: Cell,
}

impl Cell {
    pub fn new(x: i32, y: i32) -> Self {
        Self { x, y }
    }

    pub fn offset(self, size: GridSize) -> Cell {
        Cell::new(self.x + size.w, self.y + size.h)
    }
}

impl GridSize {
    pub fn new(w: i32, h: i32) -> Self {
        Self { w, h }
    }

    pub fn scale(self, k: i32) -> GridSize {
        GridSize::new(k * self.w, k * self.h)
    }
}

impl Span {
    pub fn new(top_left: Cell, bottom_right: Cell) -> Self {
        Self {
            top_left,
            bottom_right,
        }
    }

    /// A span of `size` cells whose top-left cell is `top_left`.
    pub fn from_origin(top_left: Cell, size: GridSize) -> Self {
        Self::new(top_left, top_left.offset(size))
    }

    pub fn size(&self) -> GridSize {
        GridSize::new(
            self.bottom_right.x - self.top_left.x,
            self.bottom_right.y - self.top_left.y,
        )
    }

    pub fn offset(&self, size: GridSize) -> Span {
        Span::new(self.top_left.offset(size), self.bottom_right.offset(size))
    }

    pub fn grow(&self, size: GridSize) -> Span {
        Span::new(
            self.top_left.offset(size.scale(-1)),
            self.bottom_right.offset(size),
        )
    }

    /// Whether the span covers at least one cell.
    pub fn valid(&self) -> bool {
        self.top_left.x < self.bottom_right.x && self.top_left.y < self.bottom_right.y
    }
}

impl fmt::Display for Span {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "({},{})-({},{})",
            self.top_left.x, self.top_left.y, self.bottom_right.x, self.bottom_right.y
        )
    }
}

//  Tests
