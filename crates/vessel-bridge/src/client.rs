//! Untrusted side of the bridge.
//!
//! [`RendererBridge`] is the whole capability a renderer gets: send a
//! message, subscribe, subscribe once. [`BridgeClient`] implements it over a
//! [`FrameSink`] and a listener registry that is fed by [`BridgeClient::deliver`]
//! or by pumping a frame source.

use std::collections::HashMap;
use std::panic::{catch_unwind, AssertUnwindSafe};
use std::sync::{Arc, Mutex, Weak};

use serde_json::Value;
use tokio::sync::mpsc;
use tracing::{debug, error, warn};
use vessel_common::{BridgeError, Channel};

use crate::args::{to_args, BridgeArgs};
use crate::envelope::Envelope;
use crate::gateway::panic_message;
use crate::transport::FrameSink;

/// Callback invoked with the positional arguments of a message. It never
/// sees the envelope.
pub type Listener = Arc<dyn Fn(&[Value]) + Send + Sync>;

/// The capability object exposed to renderer code.
pub trait RendererBridge {
    /// Fire-and-forget send. No acknowledgement.
    fn send_message(&self, channel: Channel, args: Vec<Value>) -> Result<(), BridgeError>;

    /// Invoke `listener` for every message on `channel` until the returned
    /// subscription is unsubscribed.
    fn on(&self, channel: Channel, listener: Listener) -> Subscription;

    /// Invoke `listener` for the next message on `channel` only.
    fn once(&self, channel: Channel, listener: Listener);
}

struct Entry {
    id: u64,
    once: bool,
    listener: Listener,
}

#[derive(Default)]
struct Registry {
    next_id: u64,
    channels: HashMap<Channel, Vec<Entry>>,
}

impl Registry {
    fn insert(&mut self, channel: Channel, listener: Listener, once: bool) -> u64 {
        self.next_id += 1;
        let id = self.next_id;
        self.channels
            .entry(channel)
            .or_default()
            .push(Entry { id, once, listener });
        id
    }

    fn remove(&mut self, channel: Channel, id: u64) -> bool {
        let Some(entries) = self.channels.get_mut(&channel) else {
            return false;
        };
        let before = entries.len();
        entries.retain(|e| e.id != id);
        let removed = entries.len() != before;
        if entries.is_empty() {
            self.channels.remove(&channel);
        }
        removed
    }

    /// Listeners to call for one message, in registration order. `once`
    /// entries are taken out here so they can never fire twice.
    fn take_for_delivery(&mut self, channel: Channel) -> Vec<Listener> {
        let Some(entries) = self.channels.get_mut(&channel) else {
            return Vec::new();
        };
        let listeners = entries.iter().map(|e| Arc::clone(&e.listener)).collect();
        entries.retain(|e| !e.once);
        if entries.is_empty() {
            self.channels.remove(&channel);
        }
        listeners
    }

    fn count(&self, channel: Channel) -> usize {
        self.channels.get(&channel).map_or(0, Vec::len)
    }
}

/// Disposer returned by [`RendererBridge::on`].
///
/// Dropping it does not unsubscribe; call [`Subscription::unsubscribe`].
#[derive(Debug, Clone)]
pub struct Subscription {
    channel: Channel,
    id: u64,
    registry: Weak<Mutex<Registry>>,
}

impl Subscription {
    /// Remove exactly this registration. Calling it again does nothing.
    pub fn unsubscribe(&self) {
        let Some(registry) = self.registry.upgrade() else {
            return;
        };
        let removed = match registry.lock() {
            Ok(mut reg) => reg.remove(self.channel, self.id),
            Err(poisoned) => poisoned.into_inner().remove(self.channel, self.id),
        };
        if removed {
            debug!(channel = %self.channel, id = self.id, "listener removed");
        }
    }

    pub fn channel(&self) -> Channel {
        self.channel
    }
}

impl std::fmt::Debug for Registry {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Registry")
            .field("next_id", &self.next_id)
            .field("channels", &self.channels.keys().collect::<Vec<_>>())
            .finish()
    }
}

/// Renderer-side bridge endpoint.
pub struct BridgeClient {
    sink: Box<dyn FrameSink + Send + Sync>,
    registry: Arc<Mutex<Registry>>,
}

impl BridgeClient {
    pub fn new(sink: impl FrameSink + Send + Sync + 'static) -> Self {
        Self {
            sink: Box::new(sink),
            registry: Arc::new(Mutex::new(Registry::default())),
        }
    }

    /// Typed convenience over [`RendererBridge::send_message`]; see
    /// [`to_args`] for how `args` is spread.
    pub fn send<A: BridgeArgs + ?Sized>(&self, channel: Channel, args: &A) -> Result<(), BridgeError> {
        self.send_message(channel, to_args(channel, args)?)
    }

    /// Deliver one decoded message to the listeners on its channel.
    ///
    /// Returns how many listeners were invoked, including ones that panicked.
    pub fn deliver(&self, envelope: &Envelope) -> usize {
        let channel = envelope.channel;
        let listeners = match self.registry.lock() {
            Ok(mut reg) => reg.take_for_delivery(channel),
            Err(poisoned) => poisoned.into_inner().take_for_delivery(channel),
        };

        // The lock is released here so listeners may subscribe or unsubscribe.
        for listener in &listeners {
            if let Err(payload) = catch_unwind(AssertUnwindSafe(|| listener(&envelope.args))) {
                error!(
                    %channel,
                    panic = %panic_message(payload.as_ref()),
                    "bridge listener panicked"
                );
            }
        }
        listeners.len()
    }

    /// Decode and deliver one frame. Frames that fail the channel check are
    /// dropped with a warning.
    pub fn deliver_frame(&self, frame: &str) -> Result<usize, BridgeError> {
        let envelope = Envelope::decode(frame).inspect_err(|e| {
            warn!(frame_len = frame.len(), error = %e, "bridge frame rejected");
        })?;
        Ok(self.deliver(&envelope))
    }

    /// Deliver every frame already queued on `source`, without waiting.
    pub fn drain(&self, source: &mut mpsc::UnboundedReceiver<String>) -> usize {
        let mut delivered = 0;
        while let Ok(frame) = source.try_recv() {
            if self.deliver_frame(&frame).is_ok() {
                delivered += 1;
            }
        }
        delivered
    }

    /// Deliver frames from `source` until the peer goes away.
    pub async fn run(&self, mut source: mpsc::UnboundedReceiver<String>) {
        while let Some(frame) = source.recv().await {
            let _ = self.deliver_frame(&frame);
        }
        debug!("bridge source closed");
    }

    /// Number of live listeners on `channel`.
    pub fn listener_count(&self, channel: Channel) -> usize {
        match self.registry.lock() {
            Ok(reg) => reg.count(channel),
            Err(poisoned) => poisoned.into_inner().count(channel),
        }
    }

    fn register(&self, channel: Channel, listener: Listener, once: bool) -> u64 {
        match self.registry.lock() {
            Ok(mut reg) => reg.insert(channel, listener, once),
            Err(poisoned) => poisoned.into_inner().insert(channel, listener, once),
        }
    }
}

impl RendererBridge for BridgeClient {
    fn send_message(&self, channel: Channel, args: Vec<Value>) -> Result<(), BridgeError> {
        let frame = Envelope::new(channel, args).encode()?;
        self.sink.post(frame)
    }

    fn on(&self, channel: Channel, listener: Listener) -> Subscription {
        let id = self.register(channel, listener, false);
        Subscription {
            channel,
            id,
            registry: Arc::downgrade(&self.registry),
        }
    }

    fn once(&self, channel: Channel, listener: Listener) {
        self.register(channel, listener, true);
    }
}
