// src/config/consts.rs

// Config file
pub const DEFAULT_CONFIG_FILE: &str = "addon_sync.toml";

// Portal
pub const DEFAULT_PORTAL_URL: &str = "https://vendor.elitewherego.com";

// Browser
pub const DEFAULT_WEBDRIVER_URL: &str = "http://localhost:9515";
pub const PAGE_TIMEOUT_MS: u64 = 15_000;
pub const POLL_INTERVAL_MS: u64 = 100;
// Deliveroo asks for a delivery location before it shows the menu;
// the operator picks it by hand inside this window.
pub const STOREFRONT_READY_TIMEOUT_MS: u64 = 60_000;

// Local files
pub const STORE_DIR: &str = ".store";
pub const LOG_FILE: &str = "debug.log";
pub const DATA_SUBDIR: &str = "addons";
