//! Production crash symbolication: a panic hook that writes a JSON report
//! with a captured backtrace, secrets redacted.

mod report;
mod sanitize;

pub use report::{install_panic_hook, CrashReport, PanicLocation};
pub use sanitize::sanitize_secrets;
