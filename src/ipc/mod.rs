//! IPC between the `fgwm` client and the daemon.
//!
//! The daemon listens on a Unix socket; the client (or any script) connects
//! and sends newline-delimited JSON requests, getting one response line per
//! request.

pub mod listener;
