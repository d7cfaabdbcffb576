//! Typed message bridge between the privileged process and the renderer.
//!
//! - [`args`]: transport-safe packing of positional arguments
//! - [`envelope`]: the `(channel, args)` wire frame
//! - [`transport`]: frame sinks and the in-process loopback pair
//! - [`gateway`]: privileged side, dispatches inbound frames to handlers
//! - [`client`]: untrusted side, the `send` / `on` / `once` capability
//! - [`script`]: the same capability as JavaScript for webview renderers

pub mod args;
pub mod client;
pub mod envelope;
pub mod gateway;
pub mod script;
pub mod transport;

pub use client::{BridgeClient, Listener, RendererBridge, Subscription};
pub use args::{to_arg, to_args, BridgeArgs};
pub use envelope::Envelope;
pub use gateway::{BridgeGateway, IpcEvent};
pub use script::{js_dispatch_frame, renderer_init_script};
pub use transport::{loopback, Endpoint, FrameSink, LoopbackSink};
