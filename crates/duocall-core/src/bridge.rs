use std::sync::Arc;

use tokio::sync::{Mutex, mpsc};

use crate::engine::EngineEventSink;
use crate::events::{ConnectionState, EventEmitter, RemoteParticipant, SessionEvent};
use crate::session::SessionState;

/// Engine callback, demultiplexed onto the bridge channel.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) enum EngineEvent {
    JoinSuccess,
    RemoteJoined(u32),
    RemoteLeft(u32),
    RemoteVideoMuteChanged { uid: u32, muted: bool },
}

/// Sink handed to the engine. Runs on whatever thread the engine calls
/// from and only forwards into the bridge channel; sending on an unbounded
/// channel never blocks. Send failures mean the bridge task is gone, which
/// only happens during teardown.
struct ChannelSink {
    tx: mpsc::UnboundedSender<EngineEvent>,
}

impl EngineEventSink for ChannelSink {
    fn on_join_success(&self) {
        let _ = self.tx.send(EngineEvent::JoinSuccess);
    }

    fn on_remote_joined(&self, uid: u32) {
        let _ = self.tx.send(EngineEvent::RemoteJoined(uid));
    }

    fn on_remote_left(&self, uid: u32) {
        let _ = self.tx.send(EngineEvent::RemoteLeft(uid));
    }

    fn on_remote_video_mute_changed(&self, uid: u32, muted: bool) {
        let _ = self.tx.send(EngineEvent::RemoteVideoMuteChanged { uid, muted });
    }
}

/// Sole consumer of engine events.
///
/// Each event maps to at most one session mutation, applied under the same
/// lock the command side uses, so commands and engine events serialize and
/// every listener emission reflects a state that actually existed.
pub(crate) struct EngineEventBridge {
    state: Arc<Mutex<SessionState>>,
    emitter: EventEmitter,
}

impl EngineEventBridge {
    /// Spawn the dispatch task and return the sink to register with the
    /// engine. Dropping the sink (engine replaced or torn down) closes the
    /// channel and ends the task.
    pub(crate) fn spawn(
        state: Arc<Mutex<SessionState>>,
        emitter: EventEmitter,
    ) -> Arc<dyn EngineEventSink> {
        let (tx, rx) = mpsc::unbounded_channel();
        let bridge = EngineEventBridge { state, emitter };
        tokio::spawn(bridge.run(rx));
        Arc::new(ChannelSink { tx })
    }

    async fn run(self, mut rx: mpsc::UnboundedReceiver<EngineEvent>) {
        while let Some(event) = rx.recv().await {
            self.apply(event).await;
        }
        tracing::debug!("engine event channel closed, bridge task ending");
    }

    /// Apply one engine event to the session state.
    ///
    /// Events whose precondition does not hold (unknown remote identity,
    /// the unassigned id 0) are logged and dropped: engines replay network
    /// history in whatever order it arrived, and a remote can leave while
    /// its mute notification is still in flight.
    pub(crate) async fn apply(&self, event: EngineEvent) {
        let emitted = {
            let mut state = self.state.lock().await;
            match event {
                EngineEvent::JoinSuccess => {
                    state.connection = ConnectionState::Joined;
                    Some(SessionEvent::ConnectionStateChanged(ConnectionState::Joined))
                }

                EngineEvent::RemoteJoined(0) => {
                    tracing::debug!("remote join with unassigned uid 0, ignoring");
                    None
                }

                EngineEvent::RemoteJoined(uid) => match state.remote {
                    Some(existing) if existing.uid == uid => {
                        tracing::debug!("duplicate join for remote {uid}, ignoring");
                        None
                    }
                    _ => {
                        let participant = RemoteParticipant {
                            uid,
                            video_muted: false,
                        };
                        state.remote = Some(participant);
                        Some(SessionEvent::RemoteJoined(participant))
                    }
                },

                EngineEvent::RemoteLeft(uid) => match state.remote {
                    Some(existing) if existing.uid == uid => {
                        state.remote = None;
                        Some(SessionEvent::RemoteLeft(uid))
                    }
                    _ => {
                        tracing::debug!("offline event for unknown remote {uid}, ignoring");
                        None
                    }
                },

                EngineEvent::RemoteVideoMuteChanged { uid, muted } => {
                    match state.remote.as_mut() {
                        Some(existing) if existing.uid == uid => {
                            existing.video_muted = muted;
                            Some(SessionEvent::RemoteVideoMuteChanged { uid, muted })
                        }
                        _ => {
                            tracing::debug!(
                                "mute change for unknown remote {uid} (muted={muted}), ignoring"
                            );
                            None
                        }
                    }
                }
            }
        };

        if let Some(event) = emitted {
            self.emitter.emit(event);
        }
    }
}
