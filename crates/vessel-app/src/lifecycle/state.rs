//! Lifecycle states and the platform shutdown policy.

/// Where the application is in its lifecycle.
///
/// `Starting → Ready → WindowOpen ⇄ WindowClosed → Quitting`. `Quitting` is
/// terminal.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LifecycleState {
    Starting,
    Ready,
    WindowOpen,
    WindowClosed,
    Quitting,
}

impl LifecycleState {
    pub fn as_str(self) -> &'static str {
        match self {
            Self::Starting => "Starting",
            Self::Ready => "Ready",
            Self::WindowOpen => "WindowOpen",
            Self::WindowClosed => "WindowClosed",
            Self::Quitting => "Quitting",
        }
    }
}

impl std::fmt::Display for LifecycleState {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// What happens when the last window closes.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ShutdownPolicy {
    /// Quit the process.
    QuitOnLastWindowClosed,
    /// Keep running with no window until the user activates the app again.
    StayResident,
}

impl ShutdownPolicy {
    /// macOS apps stay resident; everything else quits.
    pub fn for_current_platform() -> Self {
        if cfg!(target_os = "macos") {
            Self::StayResident
        } else {
            Self::QuitOnLastWindowClosed
        }
    }
}

/// Result of the "all windows closed" signal.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AllClosedOutcome {
    Quit,
    StayResident,
}
