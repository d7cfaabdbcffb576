/// Written on first run. Every key is commented out so the file documents
/// the defaults without pinning them.
pub(crate) const DEFAULT_CONFIG_TOML: &str = r##"# Vessel Configuration
# Schema version 1
# Only override what you want to change -- missing fields use defaults.

[window]
# title = "Vessel"
# width = 1024            # 200-8192
# height = 728            # 200-8192
# icon = "icon.png"       # relative to the assets directory
# entry = "index.html"
# dev_server_port = 1212  # used when VESSEL_ENV=development and PORT is unset

[updates]
# check_automatically = true
# repository = "vessel-app/vessel"
# timeout_secs = 10       # 1-120

[logging]
# level = "info"          # trace, debug, info, warn, error

[devtools]
# Only used in debug mode (VESSEL_ENV=development or DEBUG_PROD=true).
# extensions = ["react-developer-tools"]
# open_inspector = false
"##;
