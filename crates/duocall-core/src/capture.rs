use std::sync::Arc;
use std::sync::atomic::{AtomicU64, Ordering};

use futures_util::future::BoxFuture;
use tokio::sync::Mutex;
use uuid::Uuid;

use crate::errors::CallError;
use crate::events::{EventEmitter, SessionEvent};
use crate::session::SessionState;

/// Encoding requested from the capture collaborator.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CaptureFormat {
    Jpeg,
    Png,
}

/// Options for a full-surface snapshot.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct CaptureOptions {
    pub format: CaptureFormat,
    /// Encoder quality in `0.0..=1.0`. Ignored for lossless formats.
    pub quality: f32,
}

impl Default for CaptureOptions {
    fn default() -> Self {
        Self {
            format: CaptureFormat::Jpeg,
            quality: 0.8,
        }
    }
}

/// Reference to a stored captured frame.
///
/// The session never holds pixel data, only this handle. The URI points at
/// whatever store the platform capturer wrote the image to.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CaptureRef {
    pub id: Uuid,
    pub uri: String,
}

/// Platform capture collaborator (view snapshotter, compositor readback).
pub trait FrameCapturer: Send + Sync {
    /// Capture the full call surface. Resolves to a URI for the stored
    /// image.
    fn request_full_screen_capture(
        &self,
        options: CaptureOptions,
    ) -> BoxFuture<'static, Result<String, CallError>>;
}

/// Issues capture requests and parks the newest result on the session.
///
/// Requests are fire-and-forget: they never block call commands, a failed
/// capture is logged and forgotten, and when completions race only the most
/// recently requested one may land. Staleness is decided by a monotonic
/// per-request sequence number.
pub(crate) struct CaptureCoordinator {
    capturer: Arc<dyn FrameCapturer>,
    state: Arc<Mutex<SessionState>>,
    emitter: EventEmitter,
    next_seq: Arc<AtomicU64>,
}

impl CaptureCoordinator {
    pub(crate) fn new(
        capturer: Arc<dyn FrameCapturer>,
        state: Arc<Mutex<SessionState>>,
        emitter: EventEmitter,
    ) -> Self {
        Self {
            capturer,
            state,
            emitter,
            next_seq: Arc::new(AtomicU64::new(0)),
        }
    }

    /// Kick off one capture. Must run inside a tokio runtime.
    pub(crate) fn request(&self, options: CaptureOptions) {
        let seq = self.next_seq.fetch_add(1, Ordering::SeqCst);
        let fut = self.capturer.request_full_screen_capture(options);
        let state = self.state.clone();
        let emitter = self.emitter.clone();
        let next_seq = self.next_seq.clone();

        tokio::spawn(async move {
            let uri = match fut.await {
                Ok(uri) => uri,
                Err(e) => {
                    tracing::warn!("frame capture {seq} failed: {e}");
                    return;
                }
            };

            let stored = {
                let mut state = state.lock().await;
                // Stale if any newer request was issued while this one ran.
                let latest = next_seq.load(Ordering::SeqCst) - 1;
                if seq < latest {
                    tracing::debug!("discarding stale capture {seq} (latest request {latest})");
                    None
                } else {
                    let capture = CaptureRef {
                        id: Uuid::new_v4(),
                        uri,
                    };
                    state.pending_capture = Some(capture.clone());
                    Some(capture)
                }
            };

            if let Some(capture) = stored {
                tracing::info!("frame captured: {}", capture.uri);
                emitter.emit(SessionEvent::CaptureStored(capture));
            }
        });
    }
}
