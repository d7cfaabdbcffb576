//! Privileged side of the bridge.
//!
//! The gateway holds the handlers registered per channel and dispatches each
//! inbound frame to them in registration order. Every handler call is
//! isolated: an `Err` or a panic is logged and the remaining handlers still
//! run.

use std::collections::HashMap;
use std::panic::{catch_unwind, AssertUnwindSafe};

use serde_json::Value;
use tracing::{debug, error, warn};
use vessel_common::{BridgeError, Channel};

use crate::args::{to_args, BridgeArgs};
use crate::envelope::Envelope;
use crate::transport::FrameSink;

type Handler = Box<dyn Fn(&IpcEvent<'_>, &[Value]) -> Result<(), BridgeError>>;

/// Context handed to a gateway handler for one inbound message.
pub struct IpcEvent<'a> {
    channel: Channel,
    sender: &'a dyn FrameSink,
}

impl IpcEvent<'_> {
    /// Channel the message arrived on.
    pub fn channel(&self) -> Channel {
        self.channel
    }

    /// Send a message back to the renderer that sent this one.
    pub fn reply<A: BridgeArgs + ?Sized>(&self, channel: Channel, args: &A) -> Result<(), BridgeError> {
        let frame = Envelope::new(channel, to_args(channel, args)?).encode()?;
        self.sender.post(frame)
    }
}

/// Dispatches inbound bridge messages to registered handlers.
#[derive(Default)]
pub struct BridgeGateway {
    handlers: HashMap<Channel, Vec<Handler>>,
}

impl BridgeGateway {
    pub fn new() -> Self {
        Self::default()
    }

    /// Register a handler for `channel`. Handlers for the same channel run
    /// in the order they were registered.
    pub fn on<F>(&mut self, channel: Channel, handler: F)
    where
        F: Fn(&IpcEvent<'_>, &[Value]) -> Result<(), BridgeError> + 'static,
    {
        self.handlers
            .entry(channel)
            .or_default()
            .push(Box::new(handler));
    }

    /// Channels that have at least one handler.
    pub fn channels(&self) -> Vec<Channel> {
        Channel::ALL
            .iter()
            .copied()
            .filter(|c| self.handlers.contains_key(c))
            .collect()
    }

    /// Decode `frame` and dispatch it. Replies go to `sender`.
    ///
    /// Returns how many handlers completed successfully. Frames that fail
    /// the wire or channel check are rejected with an error and reach no
    /// handler.
    pub fn handle_frame(&self, frame: &str, sender: &dyn FrameSink) -> Result<usize, BridgeError> {
        let envelope = Envelope::decode(frame).inspect_err(|e| {
            warn!(frame_len = frame.len(), error = %e, "bridge frame rejected");
        })?;
        Ok(self.dispatch(&envelope, sender))
    }

    /// Dispatch an already decoded message.
    pub fn dispatch(&self, envelope: &Envelope, sender: &dyn FrameSink) -> usize {
        let channel = envelope.channel;
        let Some(handlers) = self.handlers.get(&channel) else {
            debug!(%channel, "no handler registered");
            return 0;
        };

        let event = IpcEvent { channel, sender };
        let mut completed = 0;
        for (index, handler) in handlers.iter().enumerate() {
            match catch_unwind(AssertUnwindSafe(|| handler(&event, &envelope.args))) {
                Ok(Ok(())) => completed += 1,
                Ok(Err(e)) => {
                    warn!(%channel, handler = index, error = %e, "bridge handler failed");
                }
                Err(payload) => {
                    error!(
                        %channel,
                        handler = index,
                        panic = %panic_message(payload.as_ref()),
                        "bridge handler panicked"
                    );
                }
            }
        }
        completed
    }

    /// Push an event to a renderer outside of any request.
    pub fn send<A: BridgeArgs + ?Sized>(
        &self,
        sink: &dyn FrameSink,
        channel: Channel,
        args: &A,
    ) -> Result<(), BridgeError> {
        let frame = Envelope::new(channel, to_args(channel, args)?).encode()?;
        sink.post(frame)
    }
}

pub(crate) fn panic_message(payload: &(dyn std::any::Any + Send)) -> String {
    if let Some(s) = payload.downcast_ref::<&str>() {
        (*s).to_string()
    } else if let Some(s) = payload.downcast_ref::<String>() {
        s.clone()
    } else {
        "unknown panic payload".to_string()
    }
}
