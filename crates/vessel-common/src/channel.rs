//! The closed set of channel names shared by both ends of the bridge.
//!
//! The renderer init script is generated from [`Channel::ALL`], so adding a
//! variant here is the only way to widen what may cross the boundary.

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use crate::errors::BridgeError;

/// A named route for messages crossing the trust boundary.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub enum Channel {
    /// Ping/pong round trip used to verify the bridge. Carries one string.
    IpcExample,
}

impl Channel {
    /// Every recognized channel, in declaration order.
    pub const ALL: &'static [Channel] = &[Channel::IpcExample];

    /// The wire name of this channel.
    pub const fn as_str(self) -> &'static str {
        match self {
            Channel::IpcExample => "ipc-example",
        }
    }
}

impl fmt::Display for Channel {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for Channel {
    type Err = BridgeError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Channel::ALL
            .iter()
            .copied()
            .find(|c| c.as_str() == s)
            .ok_or_else(|| BridgeError::UnknownChannel(s.to_string()))
    }
}

impl TryFrom<String> for Channel {
    type Error = BridgeError;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        value.parse()
    }
}

impl From<Channel> for String {
    fn from(channel: Channel) -> Self {
        channel.as_str().to_string()
    }
}
