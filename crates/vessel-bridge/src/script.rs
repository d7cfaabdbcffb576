//! JavaScript side of the bridge for webview renderers.
//!
//! The init script installs `window.vessel.ipcRenderer` with `sendMessage`,
//! `on` (returns a disposer) and `once`. The channel list is rendered from
//! [`Channel::ALL`], so the JS and Rust ends share one closed set. Outbound
//! messages are posted as JSON frames through `window.ipc.postMessage`;
//! inbound frames arrive through [`js_dispatch_frame`].

use vessel_common::Channel;

const INIT_TEMPLATE: &str = r#"
(function() {
    'use strict';
    var CHANNELS = __CHANNELS__;
    var listeners = {};

    function check(channel) {
        if (CHANNELS.indexOf(channel) === -1) {
            throw new Error('unknown channel: ' + channel);
        }
    }

    // Functions, symbols and bigints cannot be copied across the bridge.
    function transportSafe(_key, value) {
        var t = typeof value;
        if (t === 'function' || t === 'symbol' || t === 'bigint') {
            throw new TypeError('value of type ' + t + ' is not transport-safe');
        }
        return value;
    }

    function remove(channel, entry) {
        var list = listeners[channel];
        if (!list) return;
        var i = list.indexOf(entry);
        if (i !== -1) list.splice(i, 1);
    }

    var ipcRenderer = {
        sendMessage: function(channel) {
            check(channel);
            var args = Array.prototype.slice.call(arguments, 1);
            window.ipc.postMessage(JSON.stringify({ channel: channel, args: args }, transportSafe));
        },
        on: function(channel, func) {
            check(channel);
            var entry = { func: func, once: false };
            (listeners[channel] = listeners[channel] || []).push(entry);
            return function() { remove(channel, entry); };
        },
        once: function(channel, func) {
            check(channel);
            (listeners[channel] = listeners[channel] || []).push({ func: func, once: true });
        }
    };

    function dispatch(frame) {
        var msg = JSON.parse(frame);
        if (CHANNELS.indexOf(msg.channel) === -1) return;
        var list = (listeners[msg.channel] || []).slice();
        listeners[msg.channel] = (listeners[msg.channel] || []).filter(function(e) { return !e.once; });
        var args = Array.isArray(msg.args) ? msg.args : [];
        list.forEach(function(entry) {
            try {
                entry.func.apply(null, args);
            } catch (e) {
                console.error('[vessel] listener on ' + msg.channel + ' failed:', e);
            }
        });
    }

    Object.defineProperty(window, 'vessel', {
        value: Object.freeze({ ipcRenderer: Object.freeze(ipcRenderer) }),
        writable: false,
        configurable: false
    });
    Object.defineProperty(window, '__vesselDispatch', {
        value: dispatch,
        writable: false,
        configurable: false
    });
})();
"#;

/// Build the init script injected into every renderer webview.
pub fn renderer_init_script() -> String {
    let names: Vec<&str> = Channel::ALL.iter().map(|c| c.as_str()).collect();
    let channels = serde_json::to_string(&names).unwrap_or_else(|_| "[]".to_string());
    INIT_TEMPLATE.replace("__CHANNELS__", &channels)
}

/// JS snippet that hands one encoded frame to the renderer's listeners.
pub fn js_dispatch_frame(frame: &str) -> String {
    let literal = serde_json::to_string(frame).unwrap_or_else(|_| "\"{}\"".to_string());
    format!("window.__vesselDispatch({literal});")
}
