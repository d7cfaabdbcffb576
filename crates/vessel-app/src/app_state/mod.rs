//! Top-level application state.
//!
//! Implements `winit::application::ApplicationHandler` to drive the main
//! event loop. Platform signals go to the lifecycle controller; bridge
//! frames from the renderer go to the gateway.

mod core;
mod event_handler;
mod shutdown;
mod types;
mod window;

pub use core::{LaunchOptions, VesselApp};
pub use types::UserEvent;
