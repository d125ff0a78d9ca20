// src/cli.rs
use std::path::{Path, PathBuf};
use std::time::Duration;

use clap::{Parser, Subcommand};

use crate::{
    browser::{Browser, WebDriver},
    config::{consts::DEFAULT_CONFIG_FILE, Settings},
    error::{Error, Result},
    file::read_records,
    portal::VendorPortal,
    progress::Progress,
    records::{AddonCategoryRecord, AddonRecord, ItemAddonAssociation},
    runner::{link_items, upload_addons, upload_categories},
    scrape::{save_collected, scrape_storefront},
    specs::{deliveroo, talabat, StorefrontSpec},
};

#[derive(Parser, Debug)]
#[command(name = "addon_sync")]
#[command(about = "Scrape menu addons from storefronts and replay them into the vendor portal")]
#[command(version)]
pub struct Cli {
    /// Configuration file path
    #[arg(short, long, default_value = DEFAULT_CONFIG_FILE, global = true)]
    pub config: PathBuf,

    #[command(subcommand)]
    pub command: Command,
}

#[derive(Subcommand, Debug)]
pub enum Command {
    /// Scrape addons from a Talabat menu into the data folder
    ScrapeTalabat {
        /// Menu URL (default: credentials.vendor_url)
        #[arg(long)]
        url: Option<String>,
    },
    /// Scrape addons from a Deliveroo menu into the data folder
    ScrapeDeliveroo {
        /// Menu URL (default: credentials.vendor_url)
        #[arg(long)]
        url: Option<String>,
    },
    /// Create the addon categories from addon_cat.xlsx on the portal
    CreateCategories,
    /// Create the addons from addons.xlsx on the portal
    UploadAddons,
    /// Attach addons to items per items_addons.xlsx
    LinkItems,
}

/// Prints one line per finished unit.
#[derive(Default)]
struct ConsoleProgress {
    total: usize,
    seen: usize,
}

impl Progress for ConsoleProgress {
    fn begin(&mut self, total: usize) {
        self.total = total;
        self.seen = 0;
    }

    fn log(&mut self, msg: &str) {
        println!("{msg}");
    }

    fn item_done(&mut self, subject: &str) {
        self.seen += 1;
        println!("[{}/{}] {subject}", self.seen, self.total);
    }

    fn item_failed(&mut self, subject: &str, reason: &str) {
        self.seen += 1;
        println!("[{}/{}] {subject} FAILED: {reason}", self.seen, self.total);
    }
}

fn open_browser(settings: &Settings) -> Result<WebDriver> {
    Ok(WebDriver::connect(&settings.browser.webdriver_url, &settings.session_options())?)
}

fn open_portal(settings: &Settings) -> Result<VendorPortal<WebDriver>> {
    let browser = open_browser(settings)?;
    let mut portal = VendorPortal::new(browser, &settings.portal.base_url, settings.wait_policy());
    portal.login(&settings.credentials.email, &settings.credentials.password)?;
    Ok(portal)
}

fn scrape(
    settings: &Settings,
    spec: &StorefrontSpec,
    url: Option<String>,
    data_dir: &Path,
    ready_timeout: Duration,
) -> Result<String> {
    let url = url
        .or_else(|| settings.credentials.vendor_url.clone())
        .ok_or_else(|| Error::Config(s!("no storefront url: pass --url or set credentials.vendor_url")))?;

    let mut browser = open_browser(settings)?;
    let mut console = ConsoleProgress::default();
    let collected = scrape_storefront(
        &mut browser,
        spec,
        &url,
        settings.wait_policy(),
        ready_timeout,
        Some(&mut console as &mut dyn Progress),
    )?;
    browser.quit()?;

    let written = save_collected(&collected, data_dir)?;
    for path in &written {
        console.log(&format!("saved {}", path.display()));
    }
    Ok(format!(
        "{}: {} categories, {} addons, {} item links",
        spec.site,
        collected.categories.len(),
        collected.addons.len(),
        collected.associations.len()
    ))
}

/// Run one command; returns the summary line.
pub fn run(cli: Cli) -> Result<String> {
    let settings = Settings::load(&cli.config)?;
    let data_dir = settings.data_dir()?;
    let mut console = ConsoleProgress::default();

    match cli.command {
        Command::ScrapeTalabat { url } => {
            scrape(&settings, &talabat::SPEC, url, &data_dir, settings.wait_policy().timeout)
        }
        Command::ScrapeDeliveroo { url } => {
            scrape(&settings, &deliveroo::SPEC, url, &data_dir, settings.storefront_ready_timeout())
        }
        Command::CreateCategories => {
            let records = read_records::<AddonCategoryRecord>(&data_dir)?;
            let mut portal = open_portal(&settings)?;
            let summary = upload_categories(&mut portal, &records, Some(&mut console))?;
            Ok(format!("categories: {summary}"))
        }
        Command::UploadAddons => {
            let records = read_records::<AddonRecord>(&data_dir)?;
            let mut portal = open_portal(&settings)?;
            let summary = upload_addons(&mut portal, &records, Some(&mut console))?;
            Ok(format!("addons: {summary}"))
        }
        Command::LinkItems => {
            let records = read_records::<ItemAddonAssociation>(&data_dir)?;
            let mut portal = open_portal(&settings)?;
            let summary = link_items(&mut portal, &records, Some(&mut console))?;
            Ok(summary.to_string())
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parses_commands_and_global_config() {
        let cli = Cli::try_parse_from(["addon_sync", "scrape-talabat", "--url", "https://x", "-c", "my.toml"]).unwrap();
        assert_eq!(cli.config, PathBuf::from("my.toml"));
        assert!(matches!(cli.command, Command::ScrapeTalabat { url: Some(u) } if u == "https://x"));

        let cli = Cli::try_parse_from(["addon_sync", "link-items"]).unwrap();
        assert_eq!(cli.config, PathBuf::from(DEFAULT_CONFIG_FILE));
        assert!(matches!(cli.command, Command::LinkItems));
    }

    #[test]
    fn command_is_required() {
        assert!(Cli::try_parse_from(["addon_sync"]).is_err());
    }
}
