use serde::{Deserialize, Serialize};

use crate::errors::CallError;

/// Which mute value a local toggle reports to the engine.
///
/// The reference mobile client reads the mute flag before flipping it and
/// hands that stale value to the engine, so the engine trails the local flag
/// by one toggle. `PreToggle` reproduces that wire behavior for
/// compatibility with existing deployments; `PostToggle` sends the value
/// implied by the new flag.
#[derive(Serialize, Deserialize, Clone, Copy, Debug, PartialEq, Eq, Default)]
pub enum MuteCommandStyle {
    #[default]
    PreToggle,
    PostToggle,
}

/// Immutable call configuration, fixed for the lifetime of a session.
#[derive(Serialize, Deserialize, Clone, Debug, PartialEq)]
pub struct CallConfig {
    /// Application identifier registered with the engine vendor.
    pub app_id: String,
    /// Channel both parties join.
    pub channel_name: String,
    /// Whether the local camera starts enabled.
    #[serde(default = "default_true")]
    pub video_enabled_on_start: bool,
    /// Whether the local microphone starts enabled.
    #[serde(default = "default_true")]
    pub audio_enabled_on_start: bool,
    #[serde(default)]
    pub mute_command_style: MuteCommandStyle,
}

fn default_true() -> bool {
    true
}

impl CallConfig {
    /// Build a validated config. `app_id` and `channel_name` must be
    /// non-empty; everything else starts from defaults.
    pub fn new(app_id: &str, channel_name: &str) -> Result<Self, CallError> {
        if app_id.trim().is_empty() {
            return Err(CallError::Config("app_id must not be empty".into()));
        }
        if channel_name.trim().is_empty() {
            return Err(CallError::Config("channel_name must not be empty".into()));
        }
        Ok(Self {
            app_id: app_id.to_string(),
            channel_name: channel_name.to_string(),
            video_enabled_on_start: true,
            audio_enabled_on_start: true,
            mute_command_style: MuteCommandStyle::default(),
        })
    }

    pub fn with_mute_command_style(mut self, style: MuteCommandStyle) -> Self {
        self.mute_command_style = style;
        self
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_new_rejects_empty_app_id() {
        assert!(CallConfig::new("", "test").is_err());
        assert!(CallConfig::new("   ", "test").is_err());
    }

    #[test]
    fn test_new_rejects_empty_channel_name() {
        assert!(CallConfig::new("app", "").is_err());
        assert!(CallConfig::new("app", "  ").is_err());
    }

    #[test]
    fn test_new_defaults_enable_both_streams() {
        let config = CallConfig::new("app", "test").unwrap();
        assert!(config.video_enabled_on_start);
        assert!(config.audio_enabled_on_start);
        assert_eq!(config.mute_command_style, MuteCommandStyle::PreToggle);
    }

    #[test]
    fn test_with_mute_command_style() {
        let config = CallConfig::new("app", "test")
            .unwrap()
            .with_mute_command_style(MuteCommandStyle::PostToggle);
        assert_eq!(config.mute_command_style, MuteCommandStyle::PostToggle);
    }

    #[test]
    fn test_partial_json_uses_serde_defaults() {
        let config: CallConfig =
            serde_json::from_str(r#"{"app_id":"app","channel_name":"test"}"#).unwrap();
        assert!(config.video_enabled_on_start);
        assert!(config.audio_enabled_on_start);
        assert_eq!(config.mute_command_style, MuteCommandStyle::PreToggle);
    }

    #[test]
    fn test_json_round_trip() {
        let config = CallConfig::new("app", "test")
            .unwrap()
            .with_mute_command_style(MuteCommandStyle::PostToggle);
        let json = serde_json::to_string(&config).unwrap();
        let back: CallConfig = serde_json::from_str(&json).unwrap();
        assert_eq!(back, config);
    }
}
