use std::sync::Arc;

use crate::capture::CaptureRef;

/// Events emitted by the session to native UI listeners.
#[derive(Debug, Clone)]
pub enum SessionEvent {
    ConnectionStateChanged(ConnectionState),
    RemoteJoined(RemoteParticipant),
    RemoteLeft(u32), // remote uid
    RemoteVideoMuteChanged { uid: u32, muted: bool },
    LocalMediaChanged(LocalMediaState),
    PanelsChanged(PanelState),
    AppActiveChanged(bool),
    CaptureStored(CaptureRef),
}

/// Call lifecycle. Transitions are driven by session commands and by
/// engine events, never directly by the UI.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ConnectionState {
    /// No engine yet.
    Uninitialized,
    /// Bring-up in flight (or stalled on a rejected bring-up).
    Initializing,
    /// Engine up, not in the channel.
    Ready,
    /// Join command issued, confirmation pending.
    Joining,
    /// In the channel.
    Joined,
    /// Leave command in flight.
    Leaving,
}

impl ConnectionState {
    /// True while the local user is in the channel.
    pub fn is_joined(self) -> bool {
        self == ConnectionState::Joined
    }
}

/// The single remote party of a 1:1 call.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RemoteParticipant {
    /// Engine-assigned identity, never 0.
    pub uid: u32,
    /// Their video is muted; the UI shows a placeholder tile instead.
    pub video_muted: bool,
}

/// Locally requested media state.
///
/// Optimistic: flags flip the moment the user toggles, before (and
/// regardless of whether) the engine confirms anything.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct LocalMediaState {
    pub video_enabled: bool,
    pub audio_enabled: bool,
}

/// Side-panel visibility. Local-only, never sent to the engine.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct PanelState {
    pub messages_open: bool,
    pub files_open: bool,
}

/// Trait for receiving events from the session.
/// Implementations must be Send + Sync (called from tokio tasks).
pub trait SessionEventListener: Send + Sync {
    fn on_event(&self, event: SessionEvent);
}

/// Internal event emitter that dispatches to registered listeners.
#[derive(Clone)]
pub struct EventEmitter {
    listeners: Arc<std::sync::RwLock<Vec<Arc<dyn SessionEventListener>>>>,
}

impl EventEmitter {
    pub fn new() -> Self {
        Self {
            listeners: Arc::new(std::sync::RwLock::new(Vec::new())),
        }
    }

    pub fn add_listener(&self, listener: Arc<dyn SessionEventListener>) {
        self.listeners.write().unwrap().push(listener);
    }

    pub fn emit(&self, event: SessionEvent) {
        let listeners = self.listeners.read().unwrap();
        for listener in listeners.iter() {
            listener.on_event(event.clone());
        }
    }
}
