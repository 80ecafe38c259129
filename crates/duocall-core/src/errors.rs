use thiserror::Error;

#[derive(Debug, Error)]
pub enum CallError {
    #[error("engine command failed: {0}")]
    Engine(String),
    #[error("frame capture failed: {0}")]
    Capture(String),
    #[error("permission request failed: {0}")]
    Permission(String),
    #[error("invalid configuration: {0}")]
    Config(String),
}
