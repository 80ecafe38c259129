use serde::Serialize;

use crate::session::CallSnapshot;

/// Renderable flags derived from a [`CallSnapshot`].
///
/// A pure projection: it owns no state, and equal snapshots always produce
/// equal output. Shells re-project after every session event and render the
/// result; the `Serialize` derive lets desktop shells ship it over their
/// webview bridge as JSON.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct UiState {
    /// Render the local camera feed tile.
    pub show_local_video: bool,
    /// Render the "camera off" placeholder for the local tile.
    pub show_local_placeholder: bool,
    /// Render the remote feed tile.
    pub show_remote_video: bool,
    /// Render the "camera off" placeholder for the remote tile.
    pub show_remote_placeholder: bool,
    /// Render the in-call control row (mute, hang up, panels).
    pub show_call_controls: bool,
    pub show_capture_button: bool,
    /// Microphone icon state; meaningful in every connection state.
    pub microphone_on: bool,
    /// Camera icon state; meaningful in every connection state.
    pub camera_on: bool,
    pub show_messages_panel: bool,
    pub show_files_panel: bool,
    /// URI of the newest captured frame, for the files panel.
    pub captured_frame_uri: Option<String>,
    /// Shrink the call into the picture-in-picture presentation.
    pub picture_in_picture: bool,
}

impl UiState {
    /// Derive the renderable flags for one snapshot.
    pub fn project(snapshot: &CallSnapshot) -> Self {
        let joined = snapshot.connection.is_joined();
        let remote = snapshot.remote;
        Self {
            show_local_video: joined && snapshot.local_media.video_enabled,
            show_local_placeholder: joined && !snapshot.local_media.video_enabled,
            show_remote_video: joined && remote.is_some_and(|r| !r.video_muted),
            show_remote_placeholder: joined && remote.is_some_and(|r| r.video_muted),
            show_call_controls: joined,
            show_capture_button: joined,
            microphone_on: snapshot.local_media.audio_enabled,
            camera_on: snapshot.local_media.video_enabled,
            show_messages_panel: snapshot.panels.messages_open,
            show_files_panel: snapshot.panels.files_open,
            captured_frame_uri: snapshot.pending_capture.as_ref().map(|c| c.uri.clone()),
            picture_in_picture: joined && !snapshot.app_active,
        }
    }
}

#[cfg(test)]
mod tests {
    use uuid::Uuid;

    use super::*;
    use crate::capture::CaptureRef;
    use crate::events::{ConnectionState, LocalMediaState, PanelState, RemoteParticipant};

    fn make_snapshot(connection: ConnectionState) -> CallSnapshot {
        CallSnapshot {
            connection,
            local_media: LocalMediaState {
                video_enabled: true,
                audio_enabled: true,
            },
            remote: None,
            panels: PanelState::default(),
            app_active: true,
            pending_capture: None,
        }
    }

    #[test]
    fn no_tiles_or_controls_before_join() {
        for state in [
            ConnectionState::Uninitialized,
            ConnectionState::Initializing,
            ConnectionState::Ready,
            ConnectionState::Joining,
        ] {
            let ui = UiState::project(&make_snapshot(state));
            assert!(!ui.show_local_video, "local video shown in {state:?}");
            assert!(!ui.show_local_placeholder);
            assert!(!ui.show_remote_video);
            assert!(!ui.show_remote_placeholder);
            assert!(!ui.show_call_controls, "controls shown in {state:?}");
            assert!(!ui.show_capture_button);
        }
    }

    #[test]
    fn icon_states_track_media_flags_in_any_state() {
        let mut snapshot = make_snapshot(ConnectionState::Ready);
        snapshot.local_media.audio_enabled = false;

        let ui = UiState::project(&snapshot);
        assert!(!ui.microphone_on);
        assert!(ui.camera_on);
    }

    #[test]
    fn local_tile_follows_video_flag_once_joined() {
        let mut snapshot = make_snapshot(ConnectionState::Joined);

        let ui = UiState::project(&snapshot);
        assert!(ui.show_local_video);
        assert!(!ui.show_local_placeholder);
        assert!(ui.show_call_controls);
        assert!(ui.show_capture_button);

        snapshot.local_media.video_enabled = false;
        let ui = UiState::project(&snapshot);
        assert!(!ui.show_local_video);
        assert!(ui.show_local_placeholder);
    }

    #[test]
    fn remote_tile_follows_their_mute_state() {
        let mut snapshot = make_snapshot(ConnectionState::Joined);

        let ui = UiState::project(&snapshot);
        assert!(!ui.show_remote_video);
        assert!(!ui.show_remote_placeholder);

        snapshot.remote = Some(RemoteParticipant {
            uid: 42,
            video_muted: false,
        });
        let ui = UiState::project(&snapshot);
        assert!(ui.show_remote_video);
        assert!(!ui.show_remote_placeholder);

        snapshot.remote = Some(RemoteParticipant {
            uid: 42,
            video_muted: true,
        });
        let ui = UiState::project(&snapshot);
        assert!(!ui.show_remote_video);
        assert!(ui.show_remote_placeholder);
    }

    #[test]
    fn panels_project_in_any_connection_state() {
        let mut snapshot = make_snapshot(ConnectionState::Uninitialized);
        snapshot.panels.messages_open = true;

        let ui = UiState::project(&snapshot);
        assert!(ui.show_messages_panel);
        assert!(!ui.show_files_panel);
    }

    #[test]
    fn pip_requires_joined_and_backgrounded() {
        let mut snapshot = make_snapshot(ConnectionState::Joined);
        snapshot.app_active = false;
        assert!(UiState::project(&snapshot).picture_in_picture);

        snapshot.app_active = true;
        assert!(!UiState::project(&snapshot).picture_in_picture);

        let mut snapshot = make_snapshot(ConnectionState::Ready);
        snapshot.app_active = false;
        assert!(!UiState::project(&snapshot).picture_in_picture);
    }

    #[test]
    fn captured_frame_uri_surfaces() {
        let mut snapshot = make_snapshot(ConnectionState::Joined);
        snapshot.pending_capture = Some(CaptureRef {
            id: Uuid::new_v4(),
            uri: "file:///tmp/frame.jpg".to_string(),
        });

        let ui = UiState::project(&snapshot);
        assert_eq!(ui.captured_frame_uri.as_deref(), Some("file:///tmp/frame.jpg"));
    }

    #[test]
    fn projection_is_deterministic() {
        let mut snapshot = make_snapshot(ConnectionState::Joined);
        snapshot.remote = Some(RemoteParticipant {
            uid: 42,
            video_muted: true,
        });
        snapshot.panels.files_open = true;

        assert_eq!(UiState::project(&snapshot), UiState::project(&snapshot));
    }

    #[test]
    fn serializes_for_webview_transport() {
        let ui = UiState::project(&make_snapshot(ConnectionState::Joined));
        let json = serde_json::to_value(&ui).unwrap();

        assert_eq!(json["show_local_video"], true);
        assert_eq!(json["picture_in_picture"], false);
        assert!(json["captured_frame_uri"].is_null());
    }
}
