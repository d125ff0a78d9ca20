// tests/common/mod.rs
#![allow(dead_code)]

use std::collections::HashSet;

use addon_sync::browser::BrowserError;
use addon_sync::core::normalize;
use addon_sync::portal::{Portal, PortalError, PortalResult};
use addon_sync::progress::Progress;
use addon_sync::records::{AddonCategoryRecord, AddonRecord, ItemAddonAssociation, PortalAddonRow, PortalItemRow};
use addon_sync::specs::portal::Section;

/// An item in the fake back office: its listing row and its edit page.
pub struct FakeItem {
    pub row: PortalItemRow,
    pub addons: Vec<PortalAddonRow>,
}

/// In-memory portal recording every call.
#[derive(Default)]
pub struct FakePortal {
    pub items: Vec<FakeItem>,
    /// Edit links whose page fails to load.
    pub broken_items: HashSet<String>,
    /// Activation links that fail to load.
    pub broken_links: HashSet<String>,
    /// Record names whose create form fails.
    pub broken_records: HashSet<String>,
    /// Make the next `return_to_section` calls fail.
    pub listing_down: bool,

    pub searches: Vec<String>,
    pub opened: Vec<String>,
    pub activated: Vec<String>,
    pub returns: Vec<Section>,
    pub categories: Vec<AddonCategoryRecord>,
    pub addons: Vec<AddonRecord>,
}

fn timeout(what: &str) -> PortalError {
    PortalError::Browser(BrowserError::Timeout(what.to_string()))
}

impl Portal for FakePortal {
    fn search_items(&mut self, query: &str) -> PortalResult<Vec<PortalItemRow>> {
        self.searches.push(query.to_string());
        let q = normalize(query);
        Ok(self.items.iter().filter(|i| normalize(&i.row.title).contains(&q)).map(|i| i.row.clone()).collect())
    }

    fn open_item(&mut self, item: &PortalItemRow) -> PortalResult<Vec<PortalAddonRow>> {
        if self.broken_items.contains(&item.edit_link) {
            return Err(timeout("waiting for addon rows"));
        }
        self.opened.push(item.edit_link.clone());
        self.items
            .iter()
            .find(|i| i.row.edit_link == item.edit_link)
            .map(|i| i.addons.clone())
            .ok_or_else(|| PortalError::Browser(BrowserError::ElementNotFound(item.edit_link.clone())))
    }

    fn activate(&mut self, activation_link: &str) -> PortalResult<()> {
        if self.broken_links.contains(activation_link) {
            return Err(timeout("waiting for page after activation"));
        }
        self.activated.push(activation_link.to_string());
        Ok(())
    }

    fn return_to_section(&mut self, section: Section) -> PortalResult<()> {
        if self.listing_down {
            return Err(timeout("waiting for listing table"));
        }
        self.returns.push(section);
        Ok(())
    }

    fn create_addon_category(&mut self, record: &AddonCategoryRecord) -> PortalResult<()> {
        if self.broken_records.contains(&record.category_name) {
            return Err(timeout("waiting for form"));
        }
        self.categories.push(record.clone());
        Ok(())
    }

    fn create_addon(&mut self, record: &AddonRecord) -> PortalResult<()> {
        if self.broken_records.contains(&record.addon_name) {
            return Err(timeout("waiting for form"));
        }
        self.addons.push(record.clone());
        Ok(())
    }
}

pub fn listing_row(id: u32, title: &str, category: &str) -> PortalItemRow {
    PortalItemRow {
        edit_link: format!("https://portal.test/items/{id}/edit"),
        category: category.into(),
        title: title.into(),
        price: "25".into(),
    }
}

pub fn addon_row(category: &str, name: &str, price: &str, status: &str) -> PortalAddonRow {
    PortalAddonRow {
        category: category.into(),
        status: status.into(),
        name: name.into(),
        price: price.into(),
        activation_link: Some(format!("https://portal.test/addaddon/{}", name.to_lowercase())),
    }
}

pub fn assoc(category: &str, item: &str, addon_category: &str, addon: &str, price: f64, required: bool) -> ItemAddonAssociation {
    ItemAddonAssociation {
        category_name: category.into(),
        item_name: item.into(),
        addon_category: addon_category.into(),
        addon_name: addon.into(),
        price,
        is_required: required,
    }
}

/// Progress sink that remembers what it was told.
#[derive(Default)]
pub struct Recorder {
    pub total: Option<usize>,
    pub done: Vec<String>,
    pub failed: Vec<String>,
    pub finished: bool,
}

impl Progress for Recorder {
    fn begin(&mut self, total: usize) { self.total = Some(total); }
    fn item_done(&mut self, subject: &str) { self.done.push(subject.to_string()); }
    fn item_failed(&mut self, subject: &str, _reason: &str) { self.failed.push(subject.to_string()); }
    fn finish(&mut self) { self.finished = true; }
}
