//! Privileged-side bridge handlers.

use serde_json::Value;
use vessel_bridge::BridgeGateway;
use vessel_common::Channel;

/// Format used for both the log line and the reply on `ipc-example`.
fn ipc_test_message(ping_pong: &str) -> String {
    format!("IPC test: {ping_pong}")
}

/// Strings print bare; anything else prints as JSON.
fn display_arg(arg: Option<&Value>) -> String {
    match arg {
        Some(Value::String(s)) => s.clone(),
        Some(other) => other.to_string(),
        None => String::new(),
    }
}

/// Register every handler the application serves.
pub fn register_handlers(gateway: &mut BridgeGateway) {
    gateway.on(Channel::IpcExample, |event, args| {
        tracing::info!("{}", ipc_test_message(&display_arg(args.first())));
        event.reply(Channel::IpcExample, &ipc_test_message("pong"))
    });
}
