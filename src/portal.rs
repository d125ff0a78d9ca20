// src/portal.rs
//! Vendor portal seam.
//!
//! [`Portal`] is everything the upload and link loops need from the back
//! office: search the item listing, open an item and read its addon rows,
//! follow an activation link, fill the two create forms, and get back to a
//! section listing. [`VendorPortal`] does it by driving a [`Browser`]; the
//! integration tests substitute an in-memory portal.
//!
//! Every method leaves the browser on a page whose readiness was waited for,
//! so the caller never sleeps.

use thiserror::Error;
use tracing::{debug, info};

use crate::browser::{wait, wait::WaitPolicy, Browser, BrowserError, ElementRef};
use crate::core::sanitize::format_number;
use crate::records::{AddonCategoryRecord, AddonRecord, PortalAddonRow, PortalItemRow};
use crate::specs::portal::{self as page, PortalPages, Section};

pub type PortalResult<T> = Result<T, PortalError>;

#[derive(Debug, Error)]
pub enum PortalError {
    #[error(transparent)]
    Browser(#[from] BrowserError),

    #[error("login failed: {0}")]
    Login(String),

    /// A record that cannot be typed into the form as is.
    #[error("invalid record: {0}")]
    InvalidRecord(String),
}

pub trait Portal {
    /// Filter the item listing by `query` and read the visible rows.
    /// Expects the browser on the item listing.
    fn search_items(&mut self, query: &str) -> PortalResult<Vec<PortalItemRow>>;

    /// Open the item's edit page and snapshot its rendered addon rows.
    fn open_item(&mut self, item: &PortalItemRow) -> PortalResult<Vec<PortalAddonRow>>;

    /// Follow one addon row's activation link.
    fn activate(&mut self, activation_link: &str) -> PortalResult<()>;

    /// Navigate to a section listing and wait for its table.
    fn return_to_section(&mut self, section: Section) -> PortalResult<()>;

    fn return_to_listing(&mut self) -> PortalResult<()> {
        self.return_to_section(Section::Items)
    }

    /// Fill and submit the addon-category form. Expects the browser on the
    /// addon-category listing; leaves it there.
    fn create_addon_category(&mut self, record: &AddonCategoryRecord) -> PortalResult<()>;

    /// Fill and submit the addon form. Expects the browser on the addon
    /// listing; leaves it there.
    fn create_addon(&mut self, record: &AddonRecord) -> PortalResult<()>;
}

/// [`Portal`] over a live browser session.
pub struct VendorPortal<B: Browser> {
    browser: B,
    pages: PortalPages,
    policy: WaitPolicy,
}

impl<B: Browser> VendorPortal<B> {
    pub fn new(browser: B, base_url: &str, policy: WaitPolicy) -> Self {
        Self { browser, pages: PortalPages::new(base_url), policy }
    }

    pub fn pages(&self) -> &PortalPages { &self.pages }

    pub fn into_browser(self) -> B { self.browser }

    /// Sign in and wait for the post-login redirect.
    pub fn login(&mut self, email: &str, password: &str) -> PortalResult<()> {
        let b = &mut self.browser;
        b.goto(&self.pages.login_url())?;
        wait::wait_for_selector(b, page::EMAIL_FIELD, self.policy)?;
        b.fill(page::EMAIL_FIELD, email)?;
        b.fill(page::PASSWORD_FIELD, password)?;
        b.click_selector(page::SUBMIT)?;

        match wait::wait_for_url(b, &self.pages.home_url(), self.policy) {
            Ok(()) => {
                info!(email, "logged in");
                Ok(())
            }
            Err(BrowserError::Timeout(_)) => {
                let at = b.current_url().unwrap_or_default();
                Err(PortalError::Login(format!("still on {at} after submit; check the credentials")))
            }
            Err(e) => Err(e.into()),
        }
    }

    /// Trimmed text of a table cell; a missing cell is `ElementNotFound`.
    fn cell(&mut self, row: &ElementRef, selector: &str) -> PortalResult<String> {
        let td = self.browser.expect(Some(row), selector)?;
        Ok(self.browser.text(&td)?.trim().to_string())
    }

    fn href(&mut self, row: &ElementRef, selector: &str) -> PortalResult<Option<String>> {
        match self.browser.query(Some(row), selector)? {
            Some(a) => Ok(self.browser.attribute(&a, "href")?),
            None => Ok(None),
        }
    }

    fn submit_and_wait(&mut self) -> PortalResult<()> {
        self.browser.click_selector(page::SUBMIT)?;
        wait::wait_for_selector(&mut self.browser, page::TABLE, self.policy)?;
        Ok(())
    }
}

impl<B: Browser> Portal for VendorPortal<B> {
    fn search_items(&mut self, query: &str) -> PortalResult<Vec<PortalItemRow>> {
        self.browser.fill(page::SEARCH_FIELD, query)?;
        wait::wait_for_idle(&mut self.browser, self.policy)?;

        let Some(table) = self.browser.query(None, page::TABLE)? else {
            debug!(query, "no listing table");
            return Ok(Vec::new());
        };

        let edit_link = self.pages.item_edit_link();
        let mut out = Vec::new();
        for row in self.browser.query_all(Some(&table), page::LISTING_ROW)? {
            // Header and "no results" rows carry no edit link.
            let Some(link) = self.href(&row, &edit_link)? else { continue };
            out.push(PortalItemRow {
                edit_link: link,
                category: self.cell(&row, page::ITEM_CATEGORY)?,
                title: self.cell(&row, page::ITEM_TITLE)?,
                price: self.cell(&row, page::ITEM_PRICE)?,
            });
        }
        debug!(query, rows = out.len(), "listing rows");
        Ok(out)
    }

    fn open_item(&mut self, item: &PortalItemRow) -> PortalResult<Vec<PortalAddonRow>> {
        self.browser.goto(&item.edit_link)?;
        wait::wait_for_selector(&mut self.browser, page::ADDON_ROW, self.policy)?;

        let activation = self.pages.activation_link();
        let mut out = Vec::new();
        for row in self.browser.query_all(None, page::ADDON_ROW)? {
            out.push(PortalAddonRow {
                category: self.cell(&row, page::ADDON_CATEGORY)?,
                status: self.cell(&row, page::ADDON_STATUS)?,
                name: self.cell(&row, page::ADDON_NAME)?,
                price: self.cell(&row, page::ADDON_PRICE)?,
                activation_link: self.href(&row, &activation)?,
            });
        }
        Ok(out)
    }

    fn activate(&mut self, activation_link: &str) -> PortalResult<()> {
        self.browser.goto(activation_link)?;
        wait::wait_for_document(&mut self.browser, self.policy)?;
        wait::wait_for_idle(&mut self.browser, self.policy)?;
        Ok(())
    }

    fn return_to_section(&mut self, section: Section) -> PortalResult<()> {
        self.browser.goto(&self.pages.section_url(section))?;
        wait::wait_for_selector(&mut self.browser, page::TABLE, self.policy)?;
        Ok(())
    }

    fn create_addon_category(&mut self, record: &AddonCategoryRecord) -> PortalResult<()> {
        let count = match (record.is_required, record.option_count) {
            (true, _) => None,
            (false, Some(n)) => Some(n.to_string()),
            (false, None) => {
                return Err(PortalError::InvalidRecord(format!(
                    "optional category {:?} has no option count",
                    record.category_name
                )));
            }
        };

        self.browser.click_selector(&self.pages.create_link(Section::AddonCategories))?;
        wait::wait_for_selector(&mut self.browser, page::FORM_PANEL, self.policy)?;

        let b = &mut self.browser;
        b.fill(page::NAME_FIELD, &record.category_name)?;
        b.select_option(page::STATUS_SELECT, page::STATUS_ACTIVE)?;
        b.select_option(page::REQUIRED_SELECT, record.status_label())?;
        if let Some(count) = count {
            b.fill(page::COUNT_FIELD, &count)?;
        }
        self.submit_and_wait()
    }

    fn create_addon(&mut self, record: &AddonRecord) -> PortalResult<()> {
        let price = format_number(record.price).map_err(|e| PortalError::InvalidRecord(e.to_string()))?;

        self.browser.click_selector(&self.pages.create_link(Section::Addons))?;
        for field in [page::NAME_FIELD, page::PRICE_FIELD, page::STATUS_SELECT, page::CATEGORY_SELECT] {
            wait::wait_for_selector(&mut self.browser, field, self.policy)?;
        }

        let b = &mut self.browser;
        b.fill(page::NAME_FIELD, &record.addon_name)?;
        b.fill(page::PRICE_FIELD, &price)?;
        b.select_option(page::CATEGORY_SELECT, &record.category_name)?;
        b.select_option(page::STATUS_SELECT, page::STATUS_ACTIVE)?;
        self.submit_and_wait()
    }
}

#[cfg(test)]
mod tests {
    use std::collections::HashSet;
    use std::time::Duration;

    use serde_json::Value;

    use super::*;
    use crate::browser::BrowserResult;

    const BASE: &str = "https://portal.test";

    /// Records every interaction; elements exist when their selector is in
    /// `present` (document-wide) or `cells` (inside any element).
    #[derive(Default)]
    struct Recording {
        url: String,
        present: HashSet<String>,
        cells: HashSet<String>,
        accept_login: bool,
        log: Vec<String>,
    }

    impl Browser for Recording {
        fn goto(&mut self, url: &str) -> BrowserResult<()> {
            self.log.push(format!("goto {url}"));
            self.url = url.to_string();
            Ok(())
        }
        fn current_url(&mut self) -> BrowserResult<String> { Ok(self.url.clone()) }
        fn query(&mut self, scope: Option<&ElementRef>, selector: &str) -> BrowserResult<Option<ElementRef>> {
            let hit = match scope {
                None => self.present.contains(selector),
                Some(_) => self.cells.contains(selector),
            };
            Ok(hit.then(|| ElementRef(selector.to_string())))
        }
        fn query_all(&mut self, scope: Option<&ElementRef>, selector: &str) -> BrowserResult<Vec<ElementRef>> {
            Ok(self.query(scope, selector)?.into_iter().collect())
        }
        fn text(&mut self, el: &ElementRef) -> BrowserResult<String> { Ok(format!(" text of {} ", el.0)) }
        fn attribute(&mut self, _el: &ElementRef, _name: &str) -> BrowserResult<Option<String>> { Ok(None) }
        fn click(&mut self, el: &ElementRef) -> BrowserResult<()> {
            self.log.push(format!("click {}", el.0));
            if el.0 == page::SUBMIT && self.url.ends_with("/login") && self.accept_login {
                self.url = format!("{BASE}/");
            }
            Ok(())
        }
        fn fill(&mut self, selector: &str, value: &str) -> BrowserResult<()> {
            self.log.push(format!("fill {selector}={value}"));
            Ok(())
        }
        fn select_option(&mut self, selector: &str, value: &str) -> BrowserResult<()> {
            self.log.push(format!("select {selector}={value}"));
            Ok(())
        }
        fn evaluate(&mut self, script: &str) -> BrowserResult<Value> {
            Ok(Value::Bool(script.contains("readyState")))
        }
        fn quit(&mut self) -> BrowserResult<()> { Ok(()) }
    }

    fn portal(present: &[&str]) -> VendorPortal<Recording> {
        let browser = Recording {
            present: present.iter().map(|s| s.to_string()).collect(),
            accept_login: true,
            ..Default::default()
        };
        let policy = WaitPolicy::new(Duration::from_millis(30), Duration::from_millis(1));
        VendorPortal::new(browser, BASE, policy)
    }

    fn item() -> PortalItemRow {
        PortalItemRow {
            edit_link: format!("{BASE}/items/1/edit"),
            category: s!("Mains"),
            title: s!("Burger"),
            price: s!("25"),
        }
    }

    #[test]
    fn login_fills_form_and_waits_for_home() {
        let mut p = portal(&[page::EMAIL_FIELD, page::SUBMIT]);
        p.login("owner@example.com", "pw").unwrap();
        let b = p.into_browser();
        assert_eq!(b.url, "https://portal.test/");
        assert_eq!(b.log, vec![
            "goto https://portal.test/login",
            "fill #email=owner@example.com",
            "fill input[type='password']=pw",
            "click button[type='submit']",
        ]);
    }

    #[test]
    fn rejected_login_is_a_login_error() {
        let mut p = portal(&[page::EMAIL_FIELD, page::SUBMIT]);
        p.browser.accept_login = false;
        assert!(matches!(p.login("owner@example.com", "bad"), Err(PortalError::Login(_))));
    }

    #[test]
    fn optional_category_form() {
        let create = PortalPages::new(BASE).create_link(Section::AddonCategories);
        let mut p = portal(&[create.as_str(), page::FORM_PANEL, page::SUBMIT, page::TABLE]);
        p.create_addon_category(&AddonCategoryRecord::new("Extra Toppings", false, Some(3))).unwrap();
        assert_eq!(p.browser.log, vec![
            format!("click {create}"),
            s!("fill #name=Extra Toppings"),
            s!("select #status=Active"),
            s!("select #is_required=No"),
            s!("fill #count=3"),
            s!("click button[type='submit']"),
        ]);
    }

    #[test]
    fn optional_category_without_count_is_refused_up_front() {
        let mut p = portal(&[]);
        let rec = AddonCategoryRecord { category_name: "Sauces".into(), is_required: false, option_count: None };
        assert!(matches!(p.create_addon_category(&rec), Err(PortalError::InvalidRecord(_))));
        assert!(p.browser.log.is_empty());
    }

    #[test]
    fn addon_form_prints_price_like_the_portal() {
        let create = PortalPages::new(BASE).create_link(Section::Addons);
        let fields = [page::NAME_FIELD, page::PRICE_FIELD, page::STATUS_SELECT, page::CATEGORY_SELECT];
        let mut present = vec![create.as_str(), page::SUBMIT, page::TABLE];
        present.extend(fields);
        let mut p = portal(&present);

        let rec = AddonRecord { category_name: "Toppings".into(), addon_name: "Cheese".into(), price: 5.0, is_required: false };
        p.create_addon(&rec).unwrap();
        assert!(p.browser.log.contains(&s!("fill #price=5")));
        assert!(p.browser.log.contains(&s!("select #addon_category_id=Toppings")));
    }

    #[test]
    fn edit_page_rows_are_read_cell_by_cell() {
        let mut p = portal(&[page::ADDON_ROW]);
        p.browser.cells = [page::ADDON_CATEGORY, page::ADDON_STATUS, page::ADDON_NAME, page::ADDON_PRICE]
            .iter()
            .map(|s| s.to_string())
            .collect();
        let rows = p.open_item(&item()).unwrap();
        assert_eq!(rows, vec![PortalAddonRow {
            category: s!("text of td:nth-child(1)"),
            status: s!("text of td:nth-child(2)"),
            name: s!("text of td:nth-child(3)"),
            price: s!("text of td:nth-child(4)"),
            activation_link: None,
        }]);
    }

    #[test]
    fn addon_row_missing_a_cell_is_an_error() {
        let mut p = portal(&[page::ADDON_ROW]);
        p.browser.cells = [page::ADDON_CATEGORY, page::ADDON_STATUS, page::ADDON_PRICE]
            .iter()
            .map(|s| s.to_string())
            .collect();
        let err = p.open_item(&item()).unwrap_err();
        assert!(matches!(err, PortalError::Browser(BrowserError::ElementNotFound(sel)) if sel == page::ADDON_NAME));
    }

    #[test]
    fn missing_form_times_out() {
        let create = PortalPages::new(BASE).create_link(Section::AddonCategories);
        let mut p = portal(&[create.as_str()]);
        let err = p.create_addon_category(&AddonCategoryRecord::new("Bread", true, None)).unwrap_err();
        assert!(matches!(err, PortalError::Browser(BrowserError::Timeout(_))));
    }
}
