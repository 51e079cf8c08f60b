//! wmutils-specific implementations.
//!
//! This module provides the concrete
//! [`WindowSystem`](crate::traits::WindowSystem) backend, powered by the
//! [wmutils](https://github.com/wmutils) command-line tools.
//!
//! Nothing outside this module should run a wmutils tool directly.

pub mod events;
pub mod wm;
