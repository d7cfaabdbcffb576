//! Lifecycle controller: platform signals in, window and update actions out.
//!
//! The controller is backend-agnostic. The winit event loop feeds it
//! signals and supplies a [`WindowFactory`] when a window may be created;
//! tests drive it with fakes.

mod controller;
mod state;
mod window;


pub use controller::{LifecycleController, LifecycleOptions};
pub use state::{AllClosedOutcome, LifecycleState, ShutdownPolicy};
pub use window::{AppWindow, WindowFactory, WindowSpec};
