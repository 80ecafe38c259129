use std::sync::Arc;

use tokio::sync::Mutex;

use crate::bridge::EngineEventBridge;
use crate::capture::{CaptureCoordinator, CaptureOptions, CaptureRef, FrameCapturer};
use crate::config::{CallConfig, MuteCommandStyle};
use crate::engine::{ChannelProfile, ClientRole, EngineSetup, RtcEngine};
use crate::errors::CallError;
use crate::events::{
    ConnectionState, EventEmitter, LocalMediaState, PanelState, RemoteParticipant, SessionEvent,
    SessionEventListener,
};
use crate::permissions::PermissionProvider;

/// Placeholder auth token; the engine runs in token-free mode.
const JOIN_TOKEN: &str = "";
/// Local identity sent on join; 0 asks the engine to assign one.
const LOCAL_UID: u32 = 0;

/// Mutable call state behind the session's single lock.
///
/// Shared with the event bridge and the capture coordinator; every mutation
/// happens under this lock, so UI commands and engine events never
/// interleave.
#[derive(Debug)]
pub(crate) struct SessionState {
    pub(crate) connection: ConnectionState,
    pub(crate) local_media: LocalMediaState,
    pub(crate) remote: Option<RemoteParticipant>,
    pub(crate) panels: PanelState,
    pub(crate) app_active: bool,
    pub(crate) pending_capture: Option<CaptureRef>,
}

impl SessionState {
    pub(crate) fn new(config: &CallConfig) -> Self {
        Self {
            connection: ConnectionState::Uninitialized,
            local_media: LocalMediaState {
                video_enabled: config.video_enabled_on_start,
                audio_enabled: config.audio_enabled_on_start,
            },
            remote: None,
            panels: PanelState::default(),
            app_active: true,
            pending_capture: None,
        }
    }
}

/// Owned copy of the call state at one instant.
#[derive(Debug, Clone, PartialEq)]
pub struct CallSnapshot {
    pub connection: ConnectionState,
    pub local_media: LocalMediaState,
    pub remote: Option<RemoteParticipant>,
    pub panels: PanelState,
    pub app_active: bool,
    pub pending_capture: Option<CaptureRef>,
}

/// Coordinator for a one-to-one video call.
///
/// Owns the engine handle for its whole lifetime and is the only component
/// that issues engine commands. Commands are best-effort: failures are
/// logged, state stays put or rolls back, and nothing is raised to the
/// caller. UI shells observe the session through registered listeners and
/// [`CallSession::snapshot`].
pub struct CallSession {
    config: CallConfig,
    engine: Arc<dyn RtcEngine>,
    state: Arc<Mutex<SessionState>>,
    emitter: EventEmitter,
    permissions: Arc<dyn PermissionProvider>,
    capture: CaptureCoordinator,
}

impl CallSession {
    /// Create a session with injected collaborators. No engine traffic
    /// happens yet; call [`CallSession::initialize`] to bring the engine
    /// up.
    pub fn new(
        config: CallConfig,
        engine: Arc<dyn RtcEngine>,
        capturer: Arc<dyn FrameCapturer>,
        permissions: Arc<dyn PermissionProvider>,
    ) -> Self {
        let state = Arc::new(Mutex::new(SessionState::new(&config)));
        let emitter = EventEmitter::new();
        let capture = CaptureCoordinator::new(capturer, state.clone(), emitter.clone());
        Self {
            config,
            engine,
            state,
            emitter,
            permissions,
            capture,
        }
    }

    /// Register a listener for session events.
    pub fn add_listener(&self, listener: Arc<dyn SessionEventListener>) {
        self.emitter.add_listener(listener);
    }

    /// The configuration this session was built with.
    pub fn config(&self) -> &CallConfig {
        &self.config
    }

    /// Get current connection state.
    pub async fn connection_state(&self) -> ConnectionState {
        self.state.lock().await.connection
    }

    /// Get an owned copy of the full call state.
    pub async fn snapshot(&self) -> CallSnapshot {
        let state = self.state.lock().await;
        CallSnapshot {
            connection: state.connection,
            local_media: state.local_media,
            remote: state.remote,
            panels: state.panels,
            app_active: state.app_active,
            pending_capture: state.pending_capture.clone(),
        }
    }

    /// Bring the engine up and, on success, join the configured channel.
    ///
    /// Device grants are requested first; denial is logged and bring-up
    /// proceeds anyway, the engine just publishes a black or silent feed.
    /// Any call after the first is ignored. A bring-up rejected with a
    /// non-zero status leaves the session stalled in `Initializing`; a
    /// bring-up that raises rolls back to `Uninitialized` so the shell may
    /// retry.
    pub async fn initialize(&self) {
        if !self.begin_initializing().await {
            return;
        }

        // Awaited outside the state lock: the platform prompt can stay open
        // arbitrarily long and must not block snapshot reads.
        match self.permissions.request_device_grants().await {
            Ok(grants) if grants.all_granted() => {}
            Ok(grants) => {
                tracing::warn!(
                    "device grants partially denied (camera={} microphone={}), continuing",
                    grants.camera,
                    grants.microphone
                );
            }
            Err(e) => {
                tracing::warn!("device grant request failed, continuing: {e}");
            }
        }

        // Sink goes in before bring-up so no early callback is lost.
        // Re-registering after a failed attempt replaces the previous sink;
        // the orphaned bridge task ends when its channel closes.
        let sink = EngineEventBridge::spawn(self.state.clone(), self.emitter.clone());
        self.engine.register_event_sink(sink);

        let setup = EngineSetup {
            app_id: self.config.app_id.clone(),
            channel_profile: ChannelProfile::Communication,
        };
        let outcome = {
            let mut state = self.state.lock().await;
            match self.engine.bring_up(setup) {
                Ok(0) => {
                    if let Err(e) = self.engine.enable_local_video() {
                        tracing::warn!("enable_local_video failed: {e}");
                    }
                    state.connection = ConnectionState::Ready;
                    Some(ConnectionState::Ready)
                }
                Ok(status) => {
                    tracing::warn!("engine bring-up rejected with status {status}");
                    None
                }
                Err(e) => {
                    tracing::error!("engine bring-up failed: {e}");
                    state.connection = ConnectionState::Uninitialized;
                    Some(ConnectionState::Uninitialized)
                }
            }
        };

        if let Some(next) = outcome {
            self.emitter.emit(SessionEvent::ConnectionStateChanged(next));
        }
        if outcome == Some(ConnectionState::Ready) {
            // The reference client joins as soon as bring-up reports 0.
            self.join().await;
        }
    }

    /// Join the configured channel. Ignored unless the session is `Ready`;
    /// a join already in flight is never doubled.
    pub async fn join(&self) {
        let issued = {
            let mut state = self.state.lock().await;
            match state.connection {
                ConnectionState::Ready => {
                    state.connection = ConnectionState::Joining;
                    match self.issue_join_commands() {
                        Ok(()) => true,
                        Err(e) => {
                            tracing::error!("join rejected by engine, staying ready: {e}");
                            state.connection = ConnectionState::Ready;
                            false
                        }
                    }
                }
                other => {
                    tracing::debug!("join ignored in state {other:?}");
                    false
                }
            }
        };

        if issued {
            self.emitter
                .emit(SessionEvent::ConnectionStateChanged(ConnectionState::Joining));
        }
    }

    /// Leave the channel. Ignored unless currently `Joined`. The remote
    /// participant is cleared; local media flags keep their values for the
    /// next join.
    pub async fn leave(&self) {
        let left = {
            let mut state = self.state.lock().await;
            if state.connection != ConnectionState::Joined {
                tracing::debug!("leave ignored in state {:?}", state.connection);
                false
            } else {
                state.connection = ConnectionState::Leaving;
                match self.engine.leave() {
                    Ok(()) => {
                        state.connection = ConnectionState::Ready;
                        state.remote = None;
                        true
                    }
                    Err(e) => {
                        tracing::error!("leave rejected by engine, staying joined: {e}");
                        state.connection = ConnectionState::Joined;
                        false
                    }
                }
            }
        };

        if left {
            self.emitter
                .emit(SessionEvent::ConnectionStateChanged(ConnectionState::Ready));
        }
    }

    /// Flip the local camera flag and tell the engine.
    ///
    /// Optimistic in both directions: the flag flips even when the engine
    /// refuses the command, and no engine confirmation is awaited.
    pub async fn toggle_local_video(&self) {
        let media = {
            let mut state = self.state.lock().await;
            let muted = self.mute_command_value(state.local_media.video_enabled);
            if let Err(e) = self.engine.mute_local_video(muted) {
                tracing::warn!("mute_local_video({muted}) rejected: {e}");
            }
            state.local_media.video_enabled = !state.local_media.video_enabled;
            state.local_media
        };
        self.emitter.emit(SessionEvent::LocalMediaChanged(media));
    }

    /// Flip the local microphone flag and tell the engine.
    pub async fn toggle_local_audio(&self) {
        let media = {
            let mut state = self.state.lock().await;
            let muted = self.mute_command_value(state.local_media.audio_enabled);
            if let Err(e) = self.engine.mute_local_audio(muted) {
                tracing::warn!("mute_local_audio({muted}) rejected: {e}");
            }
            state.local_media.audio_enabled = !state.local_media.audio_enabled;
            state.local_media
        };
        self.emitter.emit(SessionEvent::LocalMediaChanged(media));
    }

    /// Show or hide the messages side panel. Local-only.
    pub async fn toggle_messages_panel(&self) {
        let panels = {
            let mut state = self.state.lock().await;
            state.panels.messages_open = !state.panels.messages_open;
            state.panels
        };
        self.emitter.emit(SessionEvent::PanelsChanged(panels));
    }

    /// Show or hide the files side panel (captured frames land there).
    pub async fn toggle_files_panel(&self) {
        let panels = {
            let mut state = self.state.lock().await;
            state.panels.files_open = !state.panels.files_open;
            state.panels
        };
        self.emitter.emit(SessionEvent::PanelsChanged(panels));
    }

    /// Record whether the app is foregrounded. Backgrounding while joined
    /// switches the projection to picture-in-picture.
    pub async fn set_app_active(&self, active: bool) {
        let changed = {
            let mut state = self.state.lock().await;
            if state.app_active == active {
                false
            } else {
                state.app_active = active;
                true
            }
        };
        if changed {
            self.emitter.emit(SessionEvent::AppActiveChanged(active));
        }
    }

    /// Request a full-surface snapshot with default options (JPEG, 0.8).
    ///
    /// Fire-and-forget: returns immediately. The result lands in the
    /// snapshot's `pending_capture` and is announced via
    /// [`SessionEvent::CaptureStored`]. Must be called from within the
    /// shell's tokio runtime.
    pub fn capture_frame(&self) {
        self.capture.request(CaptureOptions::default());
    }

    /// Request a full-surface snapshot with explicit options.
    pub fn capture_frame_with(&self, options: CaptureOptions) {
        self.capture.request(options);
    }

    /// Move `Uninitialized` to `Initializing`; false if already past that.
    async fn begin_initializing(&self) -> bool {
        let begun = {
            let mut state = self.state.lock().await;
            if state.connection != ConnectionState::Uninitialized {
                tracing::info!(
                    "initialize ignored, engine already set up (state {:?})",
                    state.connection
                );
                false
            } else {
                state.connection = ConnectionState::Initializing;
                true
            }
        };
        if begun {
            self.emitter.emit(SessionEvent::ConnectionStateChanged(
                ConnectionState::Initializing,
            ));
        }
        begun
    }

    /// The engine command bundle for joining. Any failure aborts the rest
    /// and is handed back for rollback.
    fn issue_join_commands(&self) -> Result<(), CallError> {
        self.engine.set_channel_profile(ChannelProfile::Communication)?;
        self.engine.start_local_preview()?;
        self.engine.join(
            JOIN_TOKEN,
            &self.config.channel_name,
            LOCAL_UID,
            ClientRole::Broadcaster,
        )
    }

    /// Which mute value a toggle reports to the engine, given the flag
    /// before the flip.
    fn mute_command_value(&self, was_enabled: bool) -> bool {
        match self.config.mute_command_style {
            // Wire-compatible with the reference client: report the state
            // the stream was already in, one toggle behind the flag.
            MuteCommandStyle::PreToggle => !was_enabled,
            MuteCommandStyle::PostToggle => was_enabled,
        }
    }
}
