//! Transport primitives.
//!
//! A [`FrameSink`] accepts encoded frames and returns immediately; delivery
//! happens on a later turn of the receiving side's loop. The loopback pair
//! connects two in-process endpoints with unbounded FIFO queues.

use tokio::sync::mpsc;
use vessel_common::BridgeError;

/// Destination for encoded frames. `post` never blocks.
pub trait FrameSink {
    fn post(&self, frame: String) -> Result<(), BridgeError>;
}

/// Sending half of a loopback endpoint.
#[derive(Debug, Clone)]
pub struct LoopbackSink {
    tx: mpsc::UnboundedSender<String>,
}

impl FrameSink for LoopbackSink {
    fn post(&self, frame: String) -> Result<(), BridgeError> {
        self.tx.send(frame).map_err(|_| BridgeError::TransportClosed)
    }
}

/// One side of a loopback connection: where to post, and where frames
/// from the peer arrive.
#[derive(Debug)]
pub struct Endpoint {
    pub sink: LoopbackSink,
    pub source: mpsc::UnboundedReceiver<String>,
}

/// Create a connected pair of endpoints `(privileged, renderer)`.
pub fn loopback() -> (Endpoint, Endpoint) {
    let (to_renderer, from_main) = mpsc::unbounded_channel();
    let (to_main, from_renderer) = mpsc::unbounded_channel();
    (
        Endpoint {
            sink: LoopbackSink { tx: to_renderer },
            source: from_renderer,
        },
        Endpoint {
            sink: LoopbackSink { tx: to_main },
            source: from_main,
        },
    )
}
