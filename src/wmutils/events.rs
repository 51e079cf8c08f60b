//! Lifecycle events from `wew`.
//!
//! `wew` prints one line per X event in the form `NUM:WID`, where `NUM` is
//! the X event number and `WID` the window id in hex:
//!
//! ```text
//! 16:0x00a00003
//! 19:0x00a00003
//! ```
//!
//! Only the four lifecycle events are kept; everything else is dropped.

use crate::command::{EventKind, LifecycleEvent};
use log::{debug, error, warn};
use std::io::{BufRead, BufReader, Read};
use std::process::Child;
use std::sync::mpsc;

const CREATE_NOTIFY: u32 = 16;
const DESTROY_NOTIFY: u32 = 17;
const UNMAP_NOTIFY: u32 = 18;
const MAP_NOTIFY: u32 = 19;

/// Parse a single `wew` line.
pub(crate) fn parse_event_line(line: &str) -> Option<LifecycleEvent> {
    let (num, wid) = line.trim().split_once(':')?;
    let kind = match num.parse::<u32>().ok()? {
        CREATE_NOTIFY => EventKind::Created,
        DESTROY_NOTIFY => EventKind::Destroyed,
        UNMAP_NOTIFY => EventKind::Unmapped,
        MAP_NOTIFY => EventKind::Mapped,
        _ => return None,
    };
    let window = wid.parse().ok()?;
    Some(LifecycleEvent::new(kind, window))
}

/// Forward parsed lines from `reader` into `sink` until the reader ends,
/// a read fails or the receiver goes away.
pub(crate) fn forward<R: BufRead>(reader: R, sink: &mpsc::Sender<LifecycleEvent>) {
    for line in reader.lines() {
        match line {
            Ok(line) if line.is_empty() => continue,
            Ok(line) => match parse_event_line(&line) {
                Some(event) => {
                    if sink.send(event).is_err() {
                        debug!("event receiver dropped");
                        return;
                    }
                }
                None => debug!("ignoring wew line {:?}", line),
            },
            Err(e) => {
                error!("wew read error: {}", e);
                return;
            }
        }
    }
}

/// Read `stdout` of the `wew` process on a background thread.
///
/// The returned receiver disconnects once `wew` exits.
pub(crate) fn spawn_reader<R: Read + Send + 'static>(
    stdout: R,
    mut child: Child,
) -> mpsc::Receiver<LifecycleEvent> {
    let (tx, rx) = mpsc::channel();
    std::thread::spawn(move || {
        forward(BufReader::new(stdout), &tx);
        let _ = child.kill();
        match child.wait() {
            Ok(status) => warn!("wew exited: {}", status),
            Err(e) => warn!("wew: {}", e),
        }
    });
    rx
}

//  Tests
