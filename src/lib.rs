//! **fgwm**: a grid-snapping layout engine for wmutils-based X11 setups.
//!
//! The screen is split into a fixed `columns × rows` grid of cells.  Every
//! placement command (snap, move, grow, center, throw, spread, teleport)
//! works on the span of cells a window occupies and is turned into an exact
//! pixel rectangle by the [`grid`] model.  Alongside the layout, the daemon
//! tracks focus (with a debounced border-colour indication) and view
//! (virtual desktop) membership from the window system's lifecycle
//! notifications.
//!
//! # Architecture
//!
//! The crate is organised around two core traits:
//!
//! * [`traits::WindowSystem`] abstracts querying and manipulating windows,
//!   so the layout logic is not coupled to any particular toolset.
//! * [`traits::CommandSource`] abstracts the transport that delivers
//!   one-shot requests to a [`traits::RequestHandler`].
//!
//! [`manager::GridManager`] owns the shared state behind a single lock and
//! is driven from two sides: the [`dispatch`] loop feeds it lifecycle
//! events, and the [`ipc`] listener feeds it requests.  The concrete window
//! system lives in [`wmutils`].

pub mod command;
pub mod config;
pub mod dispatch;
pub mod focus;
pub mod geometry;
pub mod grid;
pub mod ipc;
pub mod manager;
pub mod traits;
pub mod view;
pub mod wmutils;

#[cfg(test)]
mod mock;
