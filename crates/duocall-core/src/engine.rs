use std::sync::Arc;

use crate::errors::CallError;

/// Channel profile requested from the engine.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ChannelProfile {
    /// Two-way call; every joiner publishes and subscribes.
    Communication,
    /// One-to-many streaming. Unused by the 1:1 call flow but part of the
    /// engine contract.
    LiveBroadcast,
}

/// Role requested when joining a channel.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ClientRole {
    /// May publish local media.
    Broadcaster,
    /// Receive-only.
    Audience,
}

/// Identity handed to the engine at bring-up.
#[derive(Debug, Clone, PartialEq)]
pub struct EngineSetup {
    pub app_id: String,
    pub channel_profile: ChannelProfile,
}

/// Commands the session issues to the media engine.
///
/// Implementations wrap whatever vendor SDK actually moves media; this crate
/// never touches frames or network transport itself. Commands return
/// synchronously and a `Result` only says whether the engine accepted the
/// command. Completion (joined, remote present) arrives later through
/// [`EngineEventSink`] callbacks.
pub trait RtcEngine: Send + Sync {
    /// Bring the engine up for the given identity. `Ok(0)` means success;
    /// any other status is a vendor-specific rejection code.
    fn bring_up(&self, setup: EngineSetup) -> Result<i32, CallError>;

    /// Enable local camera capture.
    fn enable_local_video(&self) -> Result<(), CallError>;

    fn set_channel_profile(&self, profile: ChannelProfile) -> Result<(), CallError>;

    /// Start rendering the local camera preview.
    fn start_local_preview(&self) -> Result<(), CallError>;

    /// Join `channel_name`. A `local_uid` of 0 asks the engine to assign
    /// one.
    fn join(
        &self,
        token: &str,
        channel_name: &str,
        local_uid: u32,
        role: ClientRole,
    ) -> Result<(), CallError>;

    fn leave(&self) -> Result<(), CallError>;

    /// `muted == true` suspends the outgoing video stream.
    fn mute_local_video(&self, muted: bool) -> Result<(), CallError>;

    /// `muted == true` suspends the outgoing audio stream.
    fn mute_local_audio(&self, muted: bool) -> Result<(), CallError>;

    /// Install the receiver for engine callbacks, replacing any previous
    /// one. Called during session initialization, before `bring_up`.
    fn register_event_sink(&self, sink: Arc<dyn EngineEventSink>);
}

/// Callbacks delivered by the engine.
///
/// The engine may invoke these from any thread at any time, so
/// implementations must not block. The crate's own sink only forwards each
/// callback into a channel.
pub trait EngineEventSink: Send + Sync {
    /// The local user entered the channel.
    fn on_join_success(&self);
    /// A remote user with the given engine-assigned id entered the channel.
    fn on_remote_joined(&self, uid: u32);
    /// The remote user left or timed out.
    fn on_remote_left(&self, uid: u32);
    /// The remote user muted or unmuted their video stream.
    fn on_remote_video_mute_changed(&self, uid: u32, muted: bool);
}
