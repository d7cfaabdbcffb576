use clap::Parser;

/// Vessel: a desktop shell hosting a web UI behind a typed message bridge.
#[derive(Parser, Debug)]
#[command(name = "vessel", version, about)]
pub struct Args {
    /// Config file path override.
    #[arg(long)]
    pub config: Option<String>,

    /// Log level override (trace, debug, info, warn, error) or a full
    /// filter directive.
    #[arg(long)]
    pub log_level: Option<String>,

    /// Minimize the window instead of showing it once it is ready.
    #[arg(long)]
    pub start_minimized: bool,

    /// Run a ping/pong round trip over the in-process bridge and exit.
    #[arg(long)]
    pub bridge_self_test: bool,
}

pub fn parse() -> Args {
    Args::parse()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn defaults() {
        let args = Args::parse_from(["vessel"]);
        assert!(args.config.is_none());
        assert!(args.log_level.is_none());
        assert!(!args.start_minimized);
        assert!(!args.bridge_self_test);
    }

    #[test]
    fn all_flags() {
        let args = Args::parse_from([
            "vessel",
            "--config",
            "/tmp/vessel.toml",
            "--log-level",
            "debug",
            "--start-minimized",
            "--bridge-self-test",
        ]);
        assert_eq!(args.config.as_deref(), Some("/tmp/vessel.toml"));
        assert_eq!(args.log_level.as_deref(), Some("debug"));
        assert!(args.start_minimized);
        assert!(args.bridge_self_test);
    }
}
