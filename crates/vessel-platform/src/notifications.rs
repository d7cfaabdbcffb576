//! Native desktop notifications through the platform's command-line
//! notifier. Platforms without one only log.

use std::process::Command;

use tracing::{debug, info};
use vessel_common::PlatformError;

/// Show `title`/`body` as a native notification.
///
/// A missing notifier (no `notify-send`, headless session) is logged and
/// treated as delivered. A notifier that runs and fails is an error on macOS
/// only, where `osascript` is always present.
pub fn notify(title: &str, body: &str) -> Result<(), PlatformError> {
    let Some(mut command) = notifier_command(title, body) else {
        info!(%title, "notification: {body}");
        return Ok(());
    };

    match command.output() {
        Ok(out) if out.status.success() => {
            debug!(%title, "native notification sent");
            Ok(())
        }
        Ok(out) if cfg!(target_os = "macos") => Err(PlatformError::NotificationError(
            String::from_utf8_lossy(&out.stderr).trim().to_owned(),
        )),
        Ok(_) | Err(_) => {
            info!(%title, "notification (no notifier): {body}");
            Ok(())
        }
    }
}

#[cfg(target_os = "macos")]
fn notifier_command(title: &str, body: &str) -> Option<Command> {
    let mut command = Command::new("osascript");
    command.arg("-e").arg(format!(
        "display notification \"{}\" with title \"{}\"",
        applescript_quote(body),
        applescript_quote(title)
    ));
    Some(command)
}

#[cfg(target_os = "linux")]
fn notifier_command(title: &str, body: &str) -> Option<Command> {
    let mut command = Command::new("notify-send");
    command.args(["--app-name=Vessel", title, body]);
    Some(command)
}

#[cfg(not(any(target_os = "macos", target_os = "linux")))]
fn notifier_command(_title: &str, _body: &str) -> Option<Command> {
    None
}

#[cfg_attr(not(any(target_os = "macos", test)), allow(dead_code))]
fn applescript_quote(s: &str) -> String {
    s.replace('\\', "\\\\").replace('"', "\\\"")
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn applescript_strings_are_escaped() {
        assert_eq!(applescript_quote(r#"say "hi" \o/"#), r#"say \"hi\" \\o/"#);
    }

    #[cfg(target_os = "linux")]
    #[test]
    fn linux_uses_notify_send() {
        let command = notifier_command("Update available", "0.2.0").unwrap();
        assert_eq!(command.get_program(), "notify-send");
        let args: Vec<_> = command.get_args().collect();
        assert_eq!(args, ["--app-name=Vessel", "Update available", "0.2.0"]);
    }

    #[cfg(not(target_os = "macos"))]
    #[test]
    fn missing_notifier_is_not_an_error() {
        assert!(notify("Update available", "Vessel 0.2.0 is ready").is_ok());
    }
}
