mod app_state;
mod cli;
mod extensions;
mod handlers;
mod icon;
mod lifecycle;
mod logging;
mod updater;

use std::process::ExitCode;

use winit::event_loop::EventLoop;

use vessel_config::{EnvFlags, RunMode, VesselConfig};
use vessel_platform::{AppDir, AssetResolver};

use app_state::{LaunchOptions, UserEvent, VesselApp};
use extensions::{ExtensionCache, ExtensionInstaller};

/// Load environment variables from a .env file (KEY=VALUE lines).
fn load_dotenv() {
    let manifest_dir = std::path::PathBuf::from(env!("CARGO_MANIFEST_DIR"));
    let candidates = [
        // Workspace root, two levels up from crates/vessel-app/
        manifest_dir.join("..").join("..").join(".env"),
        // Current directory
        std::path::PathBuf::from(".env"),
    ];

    for path in &candidates {
        if let Ok(contents) = std::fs::read_to_string(path) {
            for (key, value) in parse_dotenv(&contents) {
                if std::env::var(key).is_err() {
                    std::env::set_var(key, value);
                }
            }
            return;
        }
    }
}

fn parse_dotenv(contents: &str) -> Vec<(&str, &str)> {
    contents
        .lines()
        .map(str::trim)
        .filter(|line| !line.is_empty() && !line.starts_with('#'))
        .filter_map(|line| line.split_once('='))
        .map(|(key, value)| {
            (
                key.trim(),
                value.trim().trim_matches('"').trim_matches('\''),
            )
        })
        .filter(|(key, _)| !key.is_empty())
        .collect()
}

/// Development builds load the UI from the dev server: `PORT` if set, else
/// the configured port.
fn dev_server_port(
    flags: &EnvFlags,
    config: &VesselConfig,
    port_env: Option<String>,
) -> Option<u16> {
    if flags.mode != RunMode::Development {
        return None;
    }
    let port = port_env
        .and_then(|p| p.trim().parse::<u16>().ok())
        .filter(|p| *p != 0)
        .unwrap_or(config.window.dev_server_port);
    Some(port)
}

fn load_config(args: &cli::Args) -> Result<VesselConfig, vessel_common::ConfigError> {
    match &args.config {
        Some(path) => vessel_config::load_config_from(std::path::Path::new(path)),
        None => vessel_config::load_config(),
    }
}

fn main() -> ExitCode {
    // Load .env file before anything else
    load_dotenv();

    let args = cli::parse();
    let flags = EnvFlags::from_env();

    // Production builds write crash reports
    if flags.is_production() {
        vessel_platform::crash_report::install_panic_hook();
    }

    let loaded = load_config(&args);
    let configured_level = loaded
        .as_ref()
        .map(|c| c.logging.level)
        .unwrap_or_default();
    let log_dir = AppDir::Logs.path().ok();
    let _log_guard = logging::init(
        &logging::log_directive(args.log_level.as_deref(), configured_level, flags.is_debug()),
        log_dir.as_deref(),
    );

    tracing::info!("Vessel v{} starting...", env!("CARGO_PKG_VERSION"));
    tracing::debug!(?flags, "Environment flags");

    if let Some(ref path) = args.config {
        tracing::info!("Using config override: {path}");
    }
    let config = loaded.unwrap_or_else(|e| {
        tracing::warn!("Config load failed, using defaults: {e}");
        VesselConfig::default()
    });
    tracing::debug!(config = %vessel_config::config_to_json(&config), "Config loaded");

    let runtime = match tokio::runtime::Builder::new_multi_thread()
        .enable_all()
        .build()
    {
        Ok(rt) => rt,
        Err(e) => {
            tracing::error!("Failed to start async runtime: {e}");
            return ExitCode::FAILURE;
        }
    };

    if args.bridge_self_test {
        return match runtime.block_on(self_test::run_bridge_self_test()) {
            Ok(reply) => {
                println!("{reply}");
                ExitCode::SUCCESS
            }
            Err(e) => {
                tracing::error!("Bridge self-test failed: {e}");
                ExitCode::FAILURE
            }
        };
    }

    // Ensure platform directories exist
    if let Err(e) = vessel_platform::ensure_dirs() {
        tracing::warn!("Failed to create directories: {e}");
    }

    let assets = AssetResolver::detect();
    tracing::info!(
        resources = %assets.resources_path().display(),
        packaged = assets.is_packaged(),
        "Assets resolved"
    );

    let installer: Box<dyn ExtensionInstaller> = match ExtensionCache::platform_default() {
        Ok(cache) => {
            tracing::debug!(path = %cache.root().display(), "Extension cache");
            Box::new(cache)
        }
        Err(e) => {
            tracing::warn!("No platform extension dir ({e}), using temp dir");
            Box::new(ExtensionCache::new(
                std::env::temp_dir().join("vessel-extensions"),
            ))
        }
    };

    let event_loop = match EventLoop::<UserEvent>::with_user_event().build() {
        Ok(el) => el,
        Err(e) => {
            tracing::error!("Failed to create event loop: {e}");
            return ExitCode::FAILURE;
        }
    };

    let launch = LaunchOptions {
        dev_server_port: dev_server_port(&flags, &config, std::env::var("PORT").ok()),
        start_minimized: args.start_minimized,
        config,
        flags,
        assets,
    };
    let mut app = VesselApp::new(launch, event_loop.create_proxy(), installer, runtime);

    tracing::info!("Entering event loop");
    if let Err(e) = event_loop.run_app(&mut app) {
        tracing::error!("Event loop error: {e}");
        return ExitCode::FAILURE;
    }

    if app.failed() {
        tracing::error!("Exited after a fatal error");
        return ExitCode::FAILURE;
    }
    tracing::info!("Shutdown complete");
    ExitCode::SUCCESS
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn dotenv_lines() {
        let parsed = parse_dotenv(
            "# comment\n\nVESSEL_ENV=development\nPORT = \"3000\"\nSTART_MINIMIZED='1'\nnot a pair\n=x\n",
        );
        assert_eq!(
            parsed,
            vec![
                ("VESSEL_ENV", "development"),
                ("PORT", "3000"),
                ("START_MINIMIZED", "1"),
            ]
        );
    }

    #[test]
    fn dev_server_port_only_in_development() {
        let config = VesselConfig::default();
        let prod = EnvFlags {
            mode: RunMode::Production,
            ..EnvFlags::default()
        };
        assert_eq!(dev_server_port(&prod, &config, Some("3000".into())), None);

        let dev = EnvFlags {
            mode: RunMode::Development,
            ..EnvFlags::default()
        };
        assert_eq!(dev_server_port(&dev, &config, None), Some(1212));
        assert_eq!(dev_server_port(&dev, &config, Some("3000".into())), Some(3000));
        assert_eq!(dev_server_port(&dev, &config, Some("nope".into())), Some(1212));
    }
}
