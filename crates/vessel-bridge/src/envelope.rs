//! Wire format for bridge messages.
//!
//! A frame is a JSON object `{"channel": "<name>", "args": [..]}`. Arguments
//! are plain JSON values, so everything that crosses the boundary is a
//! structural copy; no handle or reference can be encoded.

use serde::{Deserialize, Serialize};
use serde_json::Value;
use vessel_common::{BridgeError, Channel};

/// A decoded bridge message.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Envelope {
    pub channel: Channel,
    pub args: Vec<Value>,
}

/// Frame as read off the wire, before the channel name is checked.
#[derive(Deserialize)]
struct RawEnvelope {
    channel: String,
    #[serde(default)]
    args: Vec<Value>,
}

impl Envelope {
    pub fn new(channel: Channel, args: Vec<Value>) -> Self {
        Self { channel, args }
    }

    /// Encode to a wire frame.
    pub fn encode(&self) -> Result<String, BridgeError> {
        serde_json::to_string(self).map_err(|e| BridgeError::MalformedFrame(e.to_string()))
    }

    /// Decode a wire frame, rejecting channel names outside the closed set.
    pub fn decode(frame: &str) -> Result<Self, BridgeError> {
        let raw: RawEnvelope =
            serde_json::from_str(frame).map_err(|e| BridgeError::MalformedFrame(e.to_string()))?;
        let channel = raw.channel.parse::<Channel>()?;
        Ok(Self {
            channel,
            args: raw.args,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn encode_shape() {
        let env = Envelope::new(Channel::IpcExample, vec![json!("ping")]);
        assert_eq!(
            env.encode().unwrap(),
            r#"{"channel":"ipc-example","args":["ping"]}"#
        );
    }

    #[test]
    fn decode_known_channel() {
        let env = Envelope::decode(r#"{"channel":"ipc-example","args":["ping", 2]}"#).unwrap();
        assert_eq!(env.channel, Channel::IpcExample);
        assert_eq!(env.args, vec![json!("ping"), json!(2)]);
    }

    #[test]
    fn decode_missing_args_is_empty() {
        let env = Envelope::decode(r#"{"channel":"ipc-example"}"#).unwrap();
        assert!(env.args.is_empty());
    }

    #[test]
    fn decode_rejects_unknown_channel() {
        let err = Envelope::decode(r#"{"channel":"shell-exec","args":["rm -rf /"]}"#).unwrap_err();
        assert!(matches!(err, BridgeError::UnknownChannel(ref c) if c == "shell-exec"));
    }

    #[test]
    fn decode_rejects_garbage() {
        for frame in ["", "not json", "[]", r#"{"args":[]}"#, r#"{"channel":7}"#] {
            let err = Envelope::decode(frame).unwrap_err();
            assert!(
                matches!(err, BridgeError::MalformedFrame(_)),
                "expected malformed frame for {frame:?}, got {err:?}"
            );
        }
    }
}
