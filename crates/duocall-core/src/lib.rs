//! Duocall core call-session logic.
//!
//! Pure Rust crate with no platform dependencies. The media engine, the
//! permission prompt, and frame capture are injected through narrow traits;
//! native UI shells drive a [`CallSession`] and re-render from [`UiState`]
//! projections after each [`SessionEvent`].

mod bridge;
pub mod capture;
pub mod config;
pub mod engine;
pub mod errors;
pub mod events;
pub mod logging;
pub mod permissions;
pub mod session;
pub mod ui_state;

pub use capture::{CaptureFormat, CaptureOptions, CaptureRef, FrameCapturer};
pub use config::{CallConfig, MuteCommandStyle};
pub use engine::{ChannelProfile, ClientRole, EngineEventSink, EngineSetup, RtcEngine};
pub use errors::CallError;
pub use events::{
    ConnectionState, LocalMediaState, PanelState, RemoteParticipant, SessionEvent,
    SessionEventListener,
};
pub use logging::init_logging;
pub use permissions::{AlwaysGranted, DeviceGrants, PermissionProvider};
pub use session::{CallSession, CallSnapshot};
pub use ui_state::UiState;
