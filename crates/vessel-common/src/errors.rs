use std::path::PathBuf;

use crate::channel::Channel;

#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    #[error("config file not found: {0}")]
    FileNotFound(PathBuf),

    #[error("config parse error: {0}")]
    ParseError(String),

    #[error("config validation error: {0}")]
    ValidationError(String),
}

#[derive(Debug, thiserror::Error)]
pub enum PlatformError {
    #[error("path error: {0}")]
    PathError(String),

    #[error("notification error: {0}")]
    NotificationError(String),

    #[error("failed to open external url: {0}")]
    OpenError(String),
}

/// Violations of the bridge contract and transport failures.
#[derive(Debug, thiserror::Error)]
pub enum BridgeError {
    #[error("unknown channel: {0}")]
    UnknownChannel(String),

    #[error("arguments on {channel} are not transport-safe: {reason}")]
    NotTransportSafe { channel: Channel, reason: String },

    #[error("malformed frame: {0}")]
    MalformedFrame(String),

    #[error("transport closed")]
    TransportClosed,

    #[error("transport error: {0}")]
    Transport(String),

    #[error("handler on {channel} failed: {reason}")]
    Handler { channel: Channel, reason: String },
}

#[derive(Debug, thiserror::Error)]
pub enum WindowError {
    #[error("window creation failed: {0}")]
    Create(String),

    #[error("window operation failed: {0}")]
    Operation(String),
}

#[derive(Debug, thiserror::Error)]
pub enum LifecycleError {
    /// The window slot was empty at a point where a window must exist.
    #[error("main window is not defined ({during})")]
    WindowMissing { during: &'static str },

    #[error(transparent)]
    Window(#[from] WindowError),

    #[error("signal '{signal}' is not valid in state {state}")]
    InvalidTransition {
        state: &'static str,
        signal: &'static str,
    },
}

#[derive(Debug, thiserror::Error)]
pub enum UpdateError {
    #[error("update request failed: {0}")]
    Network(String),

    #[error("unexpected update response: {0}")]
    BadResponse(String),

    #[error("no update is pending")]
    NothingToInstall,

    #[error("update install failed: {0}")]
    Install(String),
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn config_error_display() {
        let err = ConfigError::FileNotFound(PathBuf::from("/tmp/missing.toml"));
        assert_eq!(err.to_string(), "config file not found: /tmp/missing.toml");

        let err = ConfigError::ParseError("unexpected token".into());
        assert_eq!(err.to_string(), "config parse error: unexpected token");

        let err = ConfigError::ValidationError("window.width must be > 0".into());
        assert_eq!(
            err.to_string(),
            "config validation error: window.width must be > 0"
        );
    }

    #[test]
    fn bridge_error_display() {
        let err = BridgeError::UnknownChannel("open-shell".into());
        assert_eq!(err.to_string(), "unknown channel: open-shell");

        let err = BridgeError::NotTransportSafe {
            channel: Channel::IpcExample,
            reason: "key must be a string".into(),
        };
        assert_eq!(
            err.to_string(),
            "arguments on ipc-example are not transport-safe: key must be a string"
        );

        assert_eq!(BridgeError::TransportClosed.to_string(), "transport closed");
    }

    #[test]
    fn lifecycle_error_display() {
        let err = LifecycleError::WindowMissing {
            during: "ready-to-show",
        };
        assert_eq!(
            err.to_string(),
            "main window is not defined (ready-to-show)"
        );

        let err: LifecycleError = WindowError::Create("no display".into()).into();
        assert_eq!(err.to_string(), "window creation failed: no display");
    }
}
