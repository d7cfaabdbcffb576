pub mod channel;
pub mod errors;
pub mod id;

pub use channel::Channel;
pub use errors::{BridgeError, ConfigError, LifecycleError, PlatformError, UpdateError, WindowError};
pub use id::new_correlation_id;
