//! Unix-socket [`CommandSource`] implementation.
//!
//! Binds a Unix stream socket and accepts one connection at a time.
//! Each line received is parsed as a JSON-encoded [`Request`] and answered
//! with one JSON-encoded [`Response`] line.
//!
//! # Wire format
//!
//! ```json
//! {"command":"Snap"}
//! {"window":"0x00a00003","command":{"Move":"Left"}}
//! {"command":{"Teleport":{"top_left":{"x":0,"y":0},"bottom_right":{"x":12,"y":24}}}}
//! {"command":{"SwitchView":2}}
//! ```
//!
//! Replies are `"Ok"` or `{"Error":"…"}`.

use crate::command::{Request, Response};
use crate::traits::{CommandSource, RequestHandler};
use log::{debug, error, info, warn};
use std::io::{BufRead, BufReader, Write};
use std::os::unix::net::{UnixListener, UnixStream};
use std::path::{Path, PathBuf};
use std::sync::Arc;

/// A [`CommandSource`] that listens on a Unix stream socket for
/// JSON-encoded requests.
///
/// Each accepted connection can send multiple newline-delimited requests.
/// When the connection closes, the listener waits for the next one.
pub struct UnixSocketListener {
    path: PathBuf,
}

/// Errors produced by the Unix socket listener and client.
#[derive(Debug, thiserror::Error)]
pub enum UnixSocketError {
    #[error("io error: {0}")]
    Io(#[from] std::io::Error),
    #[error("json parse error: {0}")]
    Json(#[from] serde_json::Error),
    #[error("daemon closed the connection without replying")]
    NoReply,
}

impl UnixSocketListener {
    /// Create a new listener bound to `path`.
    ///
    /// The socket file is created when [`run`](CommandSource::run) is called
    /// and removed when the source shuts down.
    pub fn new(path: impl AsRef<Path>) -> Self {
        Self {
            path: path.as_ref().to_path_buf(),
        }
    }

    /// The filesystem path of the socket.
    pub fn path(&self) -> &Path {
        &self.path
    }
}

impl CommandSource for UnixSocketListener {
    type Error = UnixSocketError;

    /// Bind the socket and start accepting connections.
    ///
    /// This method **blocks** indefinitely.  Run it on a dedicated thread.
    fn run<H: RequestHandler + 'static>(&mut self, handler: Arc<H>) -> Result<(), Self::Error> {
        // Remove stale socket if present.
        let _ = std::fs::remove_file(&self.path);

        let listener = UnixListener::bind(&self.path)?;
        info!("listening on {}", self.path.display());

        for stream in listener.incoming() {
            match stream {
                Ok(stream) => {
                    debug!("client connected");
                    if let Err(e) = serve(stream, handler.as_ref()) {
                        warn!("client connection: {}", e);
                    }
                    debug!("client disconnected");
                }
                Err(e) => {
                    error!("accept error: {}", e);
                }
            }
        }
        let _ = std::fs::remove_file(&self.path);
        Ok(())
    }
}

/// Answer every request line on `stream` until the client hangs up.
fn serve<H: RequestHandler + ?Sized>(stream: UnixStream, handler: &H) -> Result<(), UnixSocketError> {
    let mut writer = stream.try_clone()?;
    let reader = BufReader::new(stream);
    for line in reader.lines() {
        let text = line?;
        if text.trim().is_empty() {
            continue;
        }
        let response = match serde_json::from_str::<Request>(&text) {
            Ok(request) => {
                debug!("received {:?}", request);
                handler.handle(request)
            }
            Err(e) => {
                error!("bad request: {}: {}", text, e);
                Response::Error(format!("bad request: {}", e))
            }
        };
        let mut reply = serde_json::to_string(&response)?;
        reply.push('\n');
        writer.write_all(reply.as_bytes())?;
    }
    Ok(())
}

/// Send one request to the daemon at `path` and wait for its response.
pub fn send(path: impl AsRef<Path>, request: &Request) -> Result<Response, UnixSocketError> {
    let mut stream = UnixStream::connect(path.as_ref())?;
    let mut line = serde_json::to_string(request)?;
    line.push('\n');
    stream.write_all(line.as_bytes())?;
    stream.shutdown(std::net::Shutdown::Write)?;

    let mut reply = String::new();
    BufReader::new(stream).read_line(&mut reply)?;
    if reply.trim().is_empty() {
        return Err(UnixSocketError::NoReply);
    }
    Ok(serde_json::from_str(&reply)?)
}

//  Tests
