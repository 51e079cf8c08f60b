//! Commands and types used throughout fgwm.
//!
//! This module defines the vocabulary that all components share:
//! [`Command`] describes every one-shot action the daemon can perform,
//! [`Request`] / [`Response`] wrap it for the socket, and [`WindowId`],
//! [`Colour`], [`Direction`] and [`LifecycleEvent`] are the supporting
//! types.
//!
//! The client forwards raw arguments via [`Command::from_args`]; direction
//! strings accept the compass aliases the wmutils scripts traditionally use
//! (`l`, `west`, `w`, …).

use crate::geometry::{Cell, GridSize};
use serde::de::Error as DeError;
use serde::{Deserialize, Deserializer, Serialize, Serializer};
use std::fmt;
use std::str::FromStr;

//  Window ids and colours

/// Opaque X11 window id.
///
/// Serialized as a plain number; deserializes from a number or a
/// `"0x…"` / decimal string (the format printed by `pfw` and `lsw`).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct WindowId(pub u32);

impl fmt::Display for WindowId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "0x{:08x}", self.0)
    }
}

impl FromStr for WindowId {
    type Err = std::num::ParseIntError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let s = s.trim();
        match s.strip_prefix("0x").or_else(|| s.strip_prefix("0X")) {
            Some(hex) => u32::from_str_radix(hex, 16).map(WindowId),
            None => s.parse().map(WindowId),
        }
    }
}

impl Serialize for WindowId {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.serialize_u32(self.0)
    }
}

impl<'de> Deserialize<'de> for WindowId {
    fn deserialize<D>(deserializer: D) -> Result<Self, D::Error>
    where
        D: Deserializer<'de>,
    {
        use serde::de::Visitor;
        struct V;
        impl<'de> Visitor<'de> for V {
            type Value = WindowId;
            fn expecting(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
                write!(f, "window id as a number or \"0x…\" string")
            }
            fn visit_u64<E>(self, n: u64) -> Result<WindowId, E>
            where
                E: DeError,
            {
                u32::try_from(n)
                    .map(WindowId)
                    .map_err(|_| DeError::custom(format!("window id {} out of range", n)))
            }
            fn visit_str<E>(self, s: &str) -> Result<WindowId, E>
            where
                E: DeError,
            {
                s.parse()
                    .map_err(|_| DeError::custom(format!("invalid window id: {:?}", s)))
            }
        }
        deserializer.deserialize_any(V)
    }
}

/// A 24-bit RGB border colour.
///
/// Deserializes from a number or a `"#rrggbb"` / `"0xrrggbb"` string.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct Colour(pub u32);

impl fmt::Display for Colour {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "0x{:06x}", self.0)
    }
}

impl Serialize for Colour {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.serialize_str(&format!("#{:06x}", self.0))
    }
}

impl<'de> Deserialize<'de> for Colour {
    fn deserialize<D>(deserializer: D) -> Result<Self, D::Error>
    where
        D: Deserializer<'de>,
    {
        use serde::de::Visitor;
        struct V;
        impl<'de> Visitor<'de> for V {
            type Value = Colour;
            fn expecting(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
                write!(f, "colour as a number or \"#rrggbb\" string")
            }
            fn visit_u64<E>(self, n: u64) -> Result<Colour, E>
            where
                E: DeError,
            {
                if n > 0xff_ffff {
                    return Err(DeError::custom(format!("colour {:#x} is not 24-bit", n)));
                }
                Ok(Colour(n as u32))
            }
            fn visit_str<E>(self, s: &str) -> Result<Colour, E>
            where
                E: DeError,
            {
                let t = s.trim();
                let hex = t
                    .strip_prefix('#')
                    .or_else(|| t.strip_prefix("0x"))
                    .ok_or_else(|| DeError::custom(format!("invalid colour: {:?}", s)))?;
                let n = u32::from_str_radix(hex, 16)
                    .map_err(|_| DeError::custom(format!("invalid colour: {:?}", s)))?;
                self.visit_u64(n as u64)
            }
        }
        deserializer.deserialize_any(V)
    }
}

//  Directions

/// Cardinal direction for grid commands.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
pub enum Direction {
    Left,
    Right,
    Up,
    Down,
}

impl Direction {
    /// One-cell step in this direction.
    pub fn unit(self) -> GridSize {
        match self {
            Direction::Left => GridSize::new(-1, 0),
            Direction::Right => GridSize::new(1, 0),
            Direction::Up => GridSize::new(0, -1),
            Direction::Down => GridSize::new(0, 1),
        }
    }
}

impl fmt::Display for Direction {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Direction::Left => write!(f, "left"),
            Direction::Right => write!(f, "right"),
            Direction::Up => write!(f, "up"),
            Direction::Down => write!(f, "down"),
        }
    }
}

/// Parse a direction string (case-insensitive; accepts compass aliases).
fn parse_direction(s: &str) -> Option<Direction> {
    match s.trim().to_lowercase().as_str() {
        "left" | "l" | "west" | "w" => Some(Direction::Left),
        "right" | "r" | "east" | "e" => Some(Direction::Right),
        "up" | "u" | "north" | "n" => Some(Direction::Up),
        "down" | "d" | "south" | "s" => Some(Direction::Down),
        _ => None,
    }
}

impl<'de> Deserialize<'de> for Direction {
    fn deserialize<D>(deserializer: D) -> Result<Self, D::Error>
    where
        D: Deserializer<'de>,
    {
        let s = String::deserialize(deserializer)?;
        parse_direction(&s).ok_or_else(|| DeError::custom(format!("invalid direction: {:?}", s)))
    }
}

/// Which neighbour in the focus history to move to.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum FocusStrategy {
    Next,
    Prev,
}

impl fmt::Display for FocusStrategy {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            FocusStrategy::Next => write!(f, "next"),
            FocusStrategy::Prev => write!(f, "prev"),
        }
    }
}

//  Commands

/// Every one-shot action the daemon can perform.
///
/// Grid commands act on the request's target window; focus and view
/// commands act on the daemon's own state.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub enum Command {
    /// Place the window in a single cell: the one under its centre, or the
    /// middle of the grid when it is not on the grid yet.
    Snap,

    /// Shift the window's span one cell in the given direction.
    Move(Direction),

    /// Shift the window's span by an arbitrary number of cells.
    MoveBy(GridSize),

    /// Grow (or with negative values shrink) the span on every side.
    Grow(GridSize),

    /// Re-align the window to the span it currently occupies.
    Center,

    /// Push the span against the grid edge in the given direction.
    Throw(Direction),

    /// Extend one edge of the span to the grid edge.
    Spread(Direction),

    /// Place the window on an explicit span.
    Teleport { top_left: Cell, bottom_right: Cell },

    /// Focus the next/previous window in the focus history.
    Focus(FocusStrategy),

    /// Make another view active, hiding every window not on it.
    SwitchView(usize),

    /// Also show the window on another view.
    AddToView(usize),

    /// Move the window to exactly one view.
    SendToView(usize),
}

impl Command {
    /// Whether the command needs a target window.
    pub fn targets_window(&self) -> bool {
        !matches!(self, Command::Focus(_) | Command::SwitchView(_))
    }

    /// Parse command-line arguments (`move left`, `grow 1 -1`, …).
    pub fn from_args<S: AsRef<str>>(args: &[S]) -> Result<Command, ParseError> {
        let (name, rest) = match args.split_first() {
            Some((name, rest)) => (name.as_ref().to_lowercase(), rest),
            None => return Err(ParseError::MissingCommand),
        };
        let rest: Vec<&str> = rest.iter().map(|a| a.as_ref()).collect();
        let bad = |message: &str| ParseError::BadArguments {
            command: name.clone(),
            message: message.to_string(),
        };
        let int = |s: &str| s.parse::<i32>().map_err(|_| bad("expected an integer"));
        let index = |s: &str| s.parse::<usize>().map_err(|_| bad("expected a view index"));
        let direction = |s: &str| parse_direction(s).ok_or_else(|| bad("expected a direction"));

        match (name.as_str(), rest.as_slice()) {
            ("snap", []) => Ok(Command::Snap),
            ("center" | "centre", []) => Ok(Command::Center),
            ("move", [dir]) => Ok(Command::Move(direction(*dir)?)),
            ("move", [w, h]) => Ok(Command::MoveBy(GridSize::new(int(*w)?, int(*h)?))),
            ("grow", [w, h]) => Ok(Command::Grow(GridSize::new(int(*w)?, int(*h)?))),
            ("throw", [dir]) => Ok(Command::Throw(direction(*dir)?)),
            ("spread", [dir]) => Ok(Command::Spread(direction(*dir)?)),
            ("teleport", [x1, y1, x2, y2]) => Ok(Command::Teleport {
                top_left: Cell::new(int(*x1)?, int(*y1)?),
                bottom_right: Cell::new(int(*x2)?, int(*y2)?),
            }),
            ("focus", [strategy]) => match strategy.to_lowercase().as_str() {
                "next" | "n" => Ok(Command::Focus(FocusStrategy::Next)),
                "prev" | "previous" | "p" => Ok(Command::Focus(FocusStrategy::Prev)),
                _ => Err(bad("expected next or prev")),
            },
            ("view", [n]) => Ok(Command::SwitchView(index(*n)?)),
            ("stick", [n]) => Ok(Command::AddToView(index(*n)?)),
            ("send", [n]) => Ok(Command::SendToView(index(*n)?)),
            (
                "snap" | "center" | "centre" | "move" | "grow" | "throw" | "spread" | "teleport"
                | "focus" | "view" | "stick" | "send",
                _,
            ) => Err(bad("wrong number of arguments")),
            _ => Err(ParseError::UnknownCommand(name.clone())),
        }
    }
}

/// Error from [`Command::from_args`].
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum ParseError {
    #[error("no command given")]
    MissingCommand,
    #[error("unknown command: {0}")]
    UnknownCommand(String),
    #[error("{command}: {message}")]
    BadArguments { command: String, message: String },
}

/// A command together with the window it targets.
///
/// When `window` is `None` the daemon targets the focused window.
///
/// ```json
/// {"window":"0x00a00003","command":{"Throw":"Left"}}
/// {"command":"Snap"}
/// ```
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Request {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub window: Option<WindowId>,
    pub command: Command,
}

impl Request {
    pub fn new(window: Option<WindowId>, command: Command) -> Self {
        Self { window, command }
    }
}

/// The daemon's answer to a [`Request`].
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub enum Response {
    Ok,
    Error(String),
}

//  Lifecycle notifications

/// Kind of window lifecycle notification.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum EventKind {
    Created,
    Destroyed,
    Mapped,
    Unmapped,
}

/// A lifecycle notification from the window system.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct LifecycleEvent {
    pub kind: EventKind,
    pub window: WindowId,
}

impl LifecycleEvent {
    pub fn new(kind: EventKind, window: WindowId) -> Self {
        Self { kind, window }
    }
}
