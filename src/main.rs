//! Entry point for **fgwm**.
//!
//! `fgwm daemon` builds the grid, adopts the existing windows, serves
//! requests on the Unix socket from a background thread and runs the
//! lifecycle dispatcher on the main thread.  It exits non-zero when the
//! dispatcher stops.
//!
//! Any other invocation is a client: the arguments are parsed into a
//! [`Command`], sent to the daemon, and the exit status reflects the
//! daemon's answer.

use fgwm::command::{Command, Request, Response, WindowId};
use fgwm::config::Config;
use fgwm::dispatch::watch_and_dispatch;
use fgwm::ipc::listener::{send, UnixSocketListener};
use fgwm::manager::GridManager;
use fgwm::traits::{CommandSource, WindowSystem};
use fgwm::wmutils::wm::WmutilsWs;
use log::{error, info, warn};
use std::path::PathBuf;
use std::process::exit;
use std::sync::Arc;

const USAGE: &str = "\
usage: fgwm [--window <id>] <command> [args]

commands:
  daemon                      run the layout daemon
  snap                        place the window in a single cell
  center                      re-align the window to its cells
  move <dir> | move <dx> <dy> shift the window by cells
  grow <dw> <dh>              grow (or shrink) the window on every side
  throw <dir>                 push the window against a screen edge
  spread <dir>                stretch one edge to the screen edge
  teleport <x1> <y1> <x2> <y2> place the window on an explicit span
  focus next|prev             cycle focus through the history
  view <n>                    switch to view n
  stick <n>                   also show the window on view n
  send <n>                    move the window to view n
  help                        show this message

directions: left|l|west|w, right|r|east|e, up|u|north|n, down|d|south|s";

fn main() {
    env_logger::init();

    let args: Vec<String> = std::env::args().skip(1).collect();
    match args.first().map(String::as_str) {
        Some("daemon") => run_daemon(),
        Some("help" | "-h" | "--help") => println!("{}", USAGE),
        None => {
            eprintln!("{}", USAGE);
            exit(2);
        }
        Some(_) => run_client(&args),
    }
}

fn load_config() -> Config {
    match Config::load_default() {
        Ok(cfg) => cfg,
        Err(e) => {
            error!("{}", e);
            exit(1);
        }
    }
}

//  Daemon

fn run_daemon() {
    let config = load_config();

    let ws = Arc::new(WmutilsWs::new());
    let manager = match GridManager::new(ws, &config) {
        Ok(m) => Arc::new(m),
        Err(e) => {
            error!("failed to start: {}", e);
            exit(1);
        }
    };

    if let Err(e) = manager.adopt_existing() {
        error!("failed to adopt existing windows: {}", e);
        exit(1);
    }

    spawn_command_source(config.socket(), Arc::clone(&manager));

    info!("fgwm running");
    if let Err(e) = watch_and_dispatch(&manager) {
        error!("dispatcher stopped: {}", e);
    }
    exit(1);
}

fn spawn_command_source<W: WindowSystem + 'static>(path: PathBuf, manager: Arc<GridManager<W>>) {
    std::thread::spawn(move || {
        let mut source = UnixSocketListener::new(&path);
        if let Err(e) = source.run(manager) {
            error!("socket listener error: {}", e);
        }
    });
}

//  Client

fn run_client(args: &[String]) {
    let (window, rest) = match split_window_flag(args) {
        Ok(split) => split,
        Err(msg) => {
            error!("{}", msg);
            exit(2);
        }
    };
    let command = match Command::from_args(&rest) {
        Ok(cmd) => cmd,
        Err(e) => {
            error!("{}", e);
            eprintln!("{}", USAGE);
            exit(2);
        }
    };

    if window.is_some() && !command.targets_window() {
        warn!("--window has no effect on {:?}", command);
    }

    let config = load_config();
    match send(config.socket(), &Request::new(window, command)) {
        Ok(Response::Ok) => {}
        Ok(Response::Error(msg)) => {
            error!("{}", msg);
            exit(1);
        }
        Err(e) => {
            error!("cannot reach the daemon: {}", e);
            exit(1);
        }
    }
}

/// Pull `--window <id>` out of the argument list.
fn split_window_flag(args: &[String]) -> Result<(Option<WindowId>, Vec<String>), String> {
    let mut window = None;
    let mut rest = Vec::with_capacity(args.len());
    let mut iter = args.iter();
    while let Some(arg) = iter.next() {
        if arg == "--window" || arg == "-w" {
            let id = iter
                .next()
                .ok_or_else(|| format!("{} needs a window id", arg))?;
            let parsed = id
                .parse::<WindowId>()
                .map_err(|e| format!("bad window id {:?}: {}", id, e))?;
            window = Some(parsed);
        } else {
            rest.push(arg.clone());
        }
    }
    Ok((window, rest))
}
