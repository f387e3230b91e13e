//! Background decoding of overlay images.
//!
//! A slot is keyed by its source path. Changing the path starts a decode on
//! a short-lived worker thread; the render loop polls the slot once per
//! frame and never waits on it. Dropping or replacing the receiver discards
//! whatever the worker eventually produces.

use std::path::{Path, PathBuf};
use std::sync::mpsc::{self, Receiver, RecvTimeoutError, TryRecvError};
use std::thread;
use std::time::Duration;

use tiny_skia::Pixmap;

use super::AssetError;
use crate::render::pixmap_from_rgba8;

/// Decoder run on the worker thread.
pub type DecodeFn<T> = fn(&Path) -> Result<T, AssetError>;

/// Observable state of one asset.
#[derive(Debug)]
pub enum AssetState<T> {
    /// No source configured.
    Empty,
    Pending,
    Ready(T),
    Failed,
}

/// One overlay asset and its in-flight decode, if any.
#[derive(Debug)]
pub struct AssetSlot<T> {
    name: &'static str,
    source: Option<PathBuf>,
    state: AssetState<T>,
    rx: Option<Receiver<Result<T, AssetError>>>,
}

impl<T: Send + 'static> AssetSlot<T> {
    pub fn new(name: &'static str) -> Self {
        Self {
            name,
            source: None,
            state: AssetState::Empty,
            rx: None,
        }
    }

    pub fn source(&self) -> Option<&Path> {
        self.source.as_deref()
    }

    pub fn state(&self) -> &AssetState<T> {
        &self.state
    }

    pub fn ready(&self) -> Option<&T> {
        match &self.state {
            AssetState::Ready(value) => Some(value),
            _ => None,
        }
    }

    pub fn is_pending(&self) -> bool {
        matches!(self.state, AssetState::Pending)
    }

    pub fn is_failed(&self) -> bool {
        matches!(self.state, AssetState::Failed)
    }

    /// Point the slot at `path`. The same path is a no-op; a new one
    /// abandons any in-flight decode and starts another.
    pub fn sync(&mut self, path: Option<&Path>, decode: DecodeFn<T>) {
        if self.source.as_deref() == path {
            return;
        }
        self.dispose();
        let Some(path) = path else {
            return;
        };

        self.source = Some(path.to_path_buf());
        let (tx, rx) = mpsc::channel();
        let owned = path.to_path_buf();
        let spawned = thread::Builder::new()
            .name(format!("{}-decode", self.name))
            .spawn(move || {
                // The receiver may already be gone; the result is then dropped.
                let _ = tx.send(decode(&owned));
            });

        match spawned {
            Ok(_) => {
                log::debug!("{}: decoding {}", self.name, path.display());
                self.state = AssetState::Pending;
                self.rx = Some(rx);
            }
            Err(err) => {
                log::warn!("{}: could not start decoder: {err}", self.name);
                self.state = AssetState::Failed;
            }
        }
    }

    /// Collect a finished decode without blocking.
    pub fn poll(&mut self) {
        let Some(rx) = &self.rx else {
            return;
        };
        let result = match rx.try_recv() {
            Ok(result) => result,
            Err(TryRecvError::Empty) => return,
            Err(TryRecvError::Disconnected) => Err(AssetError::WorkerGone),
        };
        self.finish(result);
    }

    /// Block until the pending decode finishes or `timeout` elapses.
    /// Returns `true` when the slot is no longer pending.
    pub fn wait(&mut self, timeout: Duration) -> bool {
        let Some(rx) = &self.rx else {
            return true;
        };
        let result = match rx.recv_timeout(timeout) {
            Ok(result) => result,
            Err(RecvTimeoutError::Timeout) => return false,
            Err(RecvTimeoutError::Disconnected) => Err(AssetError::WorkerGone),
        };
        self.finish(result);
        true
    }

    fn finish(&mut self, result: Result<T, AssetError>) {
        self.rx = None;
        match result {
            Ok(value) => {
                log::debug!("{}: ready", self.name);
                self.state = AssetState::Ready(value);
            }
            Err(err) if err.is_expected() => {
                log::debug!("{}: {err}", self.name);
                self.state = AssetState::Failed;
            }
            Err(err) => {
                log::warn!("{}: {err}", self.name);
                self.state = AssetState::Failed;
            }
        }
    }

    /// Forget the source, release any decoded value and abandon in-flight work.
    pub fn dispose(&mut self) {
        self.source = None;
        self.rx = None;
        self.state = AssetState::Empty;
    }
}

/// Decode a still image file into a premultiplied pixmap.
pub fn decode_image(path: &Path) -> Result<Pixmap, AssetError> {
    let rgba = image::open(path)?.to_rgba8();
    let (w, h) = rgba.dimensions();
    Ok(pixmap_from_rgba8(w, h, rgba.as_raw())?)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn double_len(path: &Path) -> Result<usize, AssetError> {
        Ok(path.as_os_str().len() * 2)
    }

    fn always_fails(_: &Path) -> Result<usize, AssetError> {
        Err(AssetError::NotAnimated)
    }

    #[test]
    fn test_slot_becomes_ready() {
        let mut slot = AssetSlot::new("test");
        slot.sync(Some(Path::new("abc")), double_len);
        assert!(slot.is_pending());
        assert!(slot.wait(Duration::from_secs(5)));
        assert_eq!(slot.ready(), Some(&6));
    }

    #[test]
    fn test_same_path_is_noop() {
        let mut slot = AssetSlot::new("test");
        slot.sync(Some(Path::new("abc")), double_len);
        slot.wait(Duration::from_secs(5));
        slot.sync(Some(Path::new("abc")), always_fails);
        assert_eq!(slot.ready(), Some(&6));
    }

    #[test]
    fn test_failure_is_soft() {
        let mut slot = AssetSlot::new("test");
        slot.sync(Some(Path::new("abc")), always_fails);
        slot.wait(Duration::from_secs(5));
        assert!(slot.is_failed());
        assert!(slot.ready().is_none());
    }

    #[test]
    fn test_only_still_animations_are_expected_failures() {
        assert!(AssetError::NotAnimated.is_expected());
        assert!(!AssetError::ZeroDuration.is_expected());
        assert!(!AssetError::WorkerGone.is_expected());
        let io = std::io::Error::new(std::io::ErrorKind::NotFound, "missing");
        assert!(!AssetError::Io(io).is_expected());
    }

    #[test]
    fn test_clearing_source_disposes() {
        let mut slot = AssetSlot::new("test");
        slot.sync(Some(Path::new("abc")), double_len);
        slot.sync(None, double_len);
        assert!(matches!(slot.state(), AssetState::Empty));
        assert!(slot.source().is_none());
        // Nothing left to wait on.
        assert!(slot.wait(Duration::from_millis(1)));
    }

    #[test]
    fn test_missing_file_fails() {
        let err = decode_image(Path::new("/definitely/not/here.png")).unwrap_err();
        assert!(matches!(err, AssetError::Image(_)));
    }
}
