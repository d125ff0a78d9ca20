// src/config/options.rs
//
// Run settings: credentials, portal, browser, data directory.
// Loaded once from a TOML file; nothing is read from the environment.
//
//   [credentials]
//   email = "owner@example.com"
//   password = "..."
//   vendor_name = "Burger Barn"
//   vendor_url = "https://www.talabat.com/uae/restaurant/..."
//
//   [portal]
//   base_url = "https://vendor.elitewherego.com"
//
//   [browser]
//   webdriver_url = "http://localhost:9515"
//   browser = "chrome"
//   headless = false

use std::fmt;
use std::path::{Path, PathBuf};
use std::time::Duration;

use serde::Deserialize;

use super::consts::*;
use crate::browser::wait::WaitPolicy;
use crate::browser::webdriver::{BrowserKind, SessionOptions};
use crate::error::{Error, Result};

#[derive(Clone, Deserialize)]
pub struct Credentials {
    pub email: String,
    pub password: String,
    /// Names the per-vendor folder the spreadsheets live in.
    pub vendor_name: String,
    /// Storefront menu page the scrapers start from.
    #[serde(default)]
    pub vendor_url: Option<String>,
}

impl fmt::Debug for Credentials {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Credentials")
            .field("email", &self.email)
            .field("password", &"***")
            .field("vendor_name", &self.vendor_name)
            .field("vendor_url", &self.vendor_url)
            .finish()
    }
}

#[derive(Clone, Debug, Deserialize)]
#[serde(default)]
pub struct PortalSettings {
    pub base_url: String,
}

impl Default for PortalSettings {
    fn default() -> Self {
        Self { base_url: s!(DEFAULT_PORTAL_URL) }
    }
}

#[derive(Clone, Debug, Deserialize)]
#[serde(default)]
pub struct BrowserSettings {
    pub webdriver_url: String,
    pub browser: BrowserKind,
    pub headless: bool,
    pub page_timeout_ms: u64,
    pub poll_interval_ms: u64,
    pub storefront_ready_timeout_ms: u64,
}

impl Default for BrowserSettings {
    fn default() -> Self {
        Self {
            webdriver_url: s!(DEFAULT_WEBDRIVER_URL),
            browser: BrowserKind::Chrome,
            headless: false,
            page_timeout_ms: PAGE_TIMEOUT_MS,
            poll_interval_ms: POLL_INTERVAL_MS,
            storefront_ready_timeout_ms: STOREFRONT_READY_TIMEOUT_MS,
        }
    }
}

#[derive(Clone, Debug, Deserialize)]
pub struct Settings {
    pub credentials: Credentials,
    #[serde(default)]
    pub portal: PortalSettings,
    #[serde(default)]
    pub browser: BrowserSettings,
    /// Overrides `<desktop>/<vendor_name>/addons`.
    #[serde(default)]
    pub data_dir: Option<PathBuf>,
}

impl Settings {
    pub fn load(path: &Path) -> Result<Self> {
        let text = std::fs::read_to_string(path)
            .map_err(|e| Error::Config(format!("cannot read {}: {e}", path.display())))?;
        Self::from_toml_str(&text)
    }

    pub fn from_toml_str(text: &str) -> Result<Self> {
        let settings: Settings = toml::from_str(text).map_err(|e| Error::Config(e.to_string()))?;
        settings.validate()?;
        Ok(settings)
    }

    fn validate(&self) -> Result<()> {
        let c = &self.credentials;
        for (field, value) in [("email", &c.email), ("password", &c.password), ("vendor_name", &c.vendor_name)] {
            if value.trim().is_empty() {
                return Err(Error::Config(format!("credentials.{field} is empty")));
            }
        }
        if self.browser.poll_interval_ms == 0 {
            return Err(Error::Config(s!("browser.poll_interval_ms must be > 0")));
        }
        Ok(())
    }

    /// Folder holding addon_cat.xlsx, addons.xlsx and items_addons.xlsx.
    pub fn data_dir(&self) -> Result<PathBuf> {
        if let Some(dir) = &self.data_dir {
            return Ok(dir.clone());
        }
        let desktop = dirs::desktop_dir()
            .or_else(|| dirs::home_dir().map(|h| h.join("Desktop")))
            .ok_or_else(|| Error::Config(s!("no desktop directory; set data_dir")))?;
        Ok(desktop.join(self.credentials.vendor_name.trim()).join(DATA_SUBDIR))
    }

    pub fn wait_policy(&self) -> WaitPolicy {
        WaitPolicy::new(
            Duration::from_millis(self.browser.page_timeout_ms),
            Duration::from_millis(self.browser.poll_interval_ms),
        )
    }

    pub fn storefront_ready_timeout(&self) -> Duration {
        Duration::from_millis(self.browser.storefront_ready_timeout_ms)
    }

    pub fn session_options(&self) -> SessionOptions {
        SessionOptions {
            browser: self.browser.browser,
            headless: self.browser.headless,
            page_timeout: Duration::from_millis(self.browser.page_timeout_ms),
        }
    }
}
