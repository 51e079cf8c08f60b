//! [`WindowSystem`] implementation backed by the wmutils tools.
//!
//! Every call runs one short-lived wmutils process (`wattr`, `wtp`, `chwb`,
//! …) and waits for it, which keeps each call well inside the manager's
//! latency contract.  Lifecycle events come from a long-running `wew`
//! process read on its own thread (see [`events`](super::events)).

use super::events;
use crate::command::{Colour, LifecycleEvent, WindowId};
use crate::geometry::{Position, Rectangle, Size};
use crate::traits::WindowSystem;
use log::debug;
use std::process::{Command, Stdio};
use std::sync::mpsc;

/// X event mask for `wew`: SubstructureNotify on the root window, which
/// yields create/destroy/map/unmap notifications for its children.
const SUBSTRUCTURE_NOTIFY: u32 = 1 << 19;

/// wmutils-backed window system.
///
/// Stateless: no connection is held between calls.
#[derive(Debug, Default)]
pub struct WmutilsWs;

/// Errors that can occur when running a wmutils tool.
#[derive(Debug, thiserror::Error)]
#[error("wmutils error: {0}")]
pub struct WmutilsError(pub(crate) String);

impl WmutilsWs {
    pub fn new() -> Self {
        Self
    }
}

//  Process helpers

/// Run `program args…` and return its stdout, failing on a non-zero exit.
fn output(program: &str, args: &[&str]) -> Result<String, WmutilsError> {
    let out = Command::new(program)
        .args(args)
        .stdin(Stdio::null())
        .output()
        .map_err(|e| WmutilsError(format!("spawn {}: {}", program, e)))?;
    if !out.status.success() {
        let stderr = String::from_utf8_lossy(&out.stderr);
        return Err(WmutilsError(format!(
            "{} {} failed ({}): {}",
            program,
            args.join(" "),
            out.status,
            stderr.trim()
        )));
    }
    String::from_utf8(out.stdout).map_err(|e| WmutilsError(format!("utf-8: {}", e)))
}

/// Like [`output`], but a non-zero exit yields `None` instead of an error.
/// Only a failure to start the tool is an error.
fn output_if_ok(program: &str, args: &[&str]) -> Result<Option<String>, WmutilsError> {
    let out = Command::new(program)
        .args(args)
        .stdin(Stdio::null())
        .stderr(Stdio::null())
        .output()
        .map_err(|e| WmutilsError(format!("spawn {}: {}", program, e)))?;
    if !out.status.success() {
        return Ok(None);
    }
    String::from_utf8(out.stdout)
        .map(Some)
        .map_err(|e| WmutilsError(format!("utf-8: {}", e)))
}

fn run(program: &str, args: &[&str]) -> Result<(), WmutilsError> {
    debug!("{} {}", program, args.join(" "));
    output(program, args).map(|_| ())
}

/// Run a predicate tool: exit status 0 means yes, any other status no.
/// Only a failure to start the tool is an error.
fn status_ok(program: &str, args: &[&str]) -> Result<bool, WmutilsError> {
    let status = Command::new(program)
        .args(args)
        .stdin(Stdio::null())
        .stdout(Stdio::null())
        .stderr(Stdio::null())
        .status()
        .map_err(|e| WmutilsError(format!("spawn {}: {}", program, e)))?;
    Ok(status.success())
}

pub(crate) fn parse_wid(text: &str) -> Result<WindowId, WmutilsError> {
    text.trim()
        .parse::<WindowId>()
        .map_err(|e| WmutilsError(format!("bad window id {:?}: {}", text.trim(), e)))
}

/// Parse the `x y w h` line printed by `wattr xywh`.
pub(crate) fn parse_geometry(text: &str) -> Result<Rectangle, WmutilsError> {
    let fields: Vec<i32> = text
        .split_whitespace()
        .map(str::parse::<i32>)
        .collect::<Result<Vec<i32>, _>>()
        .map_err(|e| WmutilsError(format!("bad geometry {:?}: {}", text.trim(), e)))?;
    match fields.as_slice() {
        [x, y, w, h] => Ok(Rectangle::from_origin(
            Position::new(*x, *y),
            Size::new(*w, *h),
        )),
        _ => Err(WmutilsError(format!(
            "bad geometry {:?}: expected 4 fields",
            text.trim()
        ))),
    }
}

fn root() -> Result<WindowId, WmutilsError> {
    parse_wid(&output("lsw", &["-r"])?)
}

//  WindowSystem implementation

impl WindowSystem for WmutilsWs {
    type Error = WmutilsError;

    fn screen_size(&self) -> Result<Size, Self::Error> {
        let root = root()?.to_string();
        let text = output("wattr", &["wh", &root])?;
        let fields: Vec<i32> = text
            .split_whitespace()
            .map(str::parse::<i32>)
            .collect::<Result<Vec<i32>, _>>()
            .map_err(|e| WmutilsError(format!("bad root size {:?}: {}", text.trim(), e)))?;
        match fields.as_slice() {
            [w, h] => Ok(Size::new(*w, *h)),
            _ => Err(WmutilsError(format!("bad root size {:?}", text.trim()))),
        }
    }

    fn window_rectangle(&self, window: WindowId) -> Result<Rectangle, Self::Error> {
        parse_geometry(&output("wattr", &["xywh", &window.to_string()])?)
    }

    fn place_window(&self, window: WindowId, rect: Rectangle) -> Result<(), Self::Error> {
        let size = rect.size();
        run(
            "wtp",
            &[
                &rect.top_left.x.to_string(),
                &rect.top_left.y.to_string(),
                &size.w.to_string(),
                &size.h.to_string(),
                &window.to_string(),
            ],
        )
    }

    fn set_border_width(&self, window: WindowId, width: i32) -> Result<(), Self::Error> {
        run("chwb", &["-s", &width.to_string(), &window.to_string()])
    }

    fn set_border_colour(&self, window: WindowId, colour: Colour) -> Result<(), Self::Error> {
        run("chwb", &["-c", &colour.to_string(), &window.to_string()])
    }

    fn map_window(&self, window: WindowId) -> Result<(), Self::Error> {
        run("mapw", &["-m", &window.to_string()])
    }

    fn unmap_window(&self, window: WindowId) -> Result<(), Self::Error> {
        run("mapw", &["-u", &window.to_string()])
    }

    fn focus_window(&self, window: WindowId) -> Result<(), Self::Error> {
        run("wtf", &[&window.to_string()])
    }

    fn raise_window(&self, window: WindowId) -> Result<(), Self::Error> {
        run("chwso", &["-r", &window.to_string()])
    }

    fn focused_window(&self) -> Result<Option<WindowId>, Self::Error> {
        // pfw exits non-zero when nothing has focus.
        let Some(text) = output_if_ok("pfw", &[])? else {
            return Ok(None);
        };
        let window = parse_wid(&text)?;
        if window == root()? {
            return Ok(None);
        }
        Ok(Some(window))
    }

    fn list_windows(&self) -> Result<Vec<WindowId>, Self::Error> {
        output("lsw", &[])?
            .lines()
            .filter(|l| !l.trim().is_empty())
            .map(parse_wid)
            .collect()
    }

    fn window_exists(&self, window: WindowId) -> Result<bool, Self::Error> {
        status_ok("wattr", &[&window.to_string()])
    }

    fn is_ignored(&self, window: WindowId) -> Result<bool, Self::Error> {
        status_ok("wattr", &["o", &window.to_string()])
    }

    fn watch_events(&self) -> Result<mpsc::Receiver<LifecycleEvent>, Self::Error> {
        let mask = SUBSTRUCTURE_NOTIFY.to_string();
        let mut child = Command::new("wew")
            .args(["-m", mask.as_str()])
            .stdin(Stdio::null())
            .stdout(Stdio::piped())
            .spawn()
            .map_err(|e| WmutilsError(format!("spawn wew: {}", e)))?;
        let stdout = child
            .stdout
            .take()
            .ok_or_else(|| WmutilsError("wew has no stdout".into()))?;
        Ok(events::spawn_reader(stdout, child))
    }
}

//  Tests
