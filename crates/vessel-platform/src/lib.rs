//! OS integration for the privileged process: platform directories, bundled
//! asset resolution, crash reports, native notifications and handing URLs to
//! the system browser.

pub mod assets;
pub mod crash_report;
pub mod external;
pub mod notifications;
pub mod paths;

pub use assets::AssetResolver;
pub use external::{ExternalOpener, SystemOpener};
pub use notifications::notify;
pub use paths::{crash_report_dir, ensure_dirs, extensions_dir, AppDir};
