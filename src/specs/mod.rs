// src/specs/mod.rs
//! # Scraping “specs” module
//!
//! This module hosts the **page-specific selector specifications** for every
//! site the crate drives. Each spec encodes *where the ground truth lives in
//! the DOM* and nothing else.
//!
//! ## What lives here
//! - **Storefront specs** (`talabat`, `deliveroo`): one [`StorefrontSpec`] per
//!   site, describing menu sections, item cards, the addon modal and how a
//!   group says whether it is required.
//! - **Portal pages** (`portal`): URLs, form fields and table selectors of the
//!   vendor back office, with the base URL spliced in.
//!
//! ## What does **not** live here
//! - **Browser driving** – `scrape::storefront` and `portal::VendorPortal` walk
//!   the pages using these selectors.
//! - **Record shaping and dedup** – `scrape::collect_item` and `store`.
//! - **Persistence** – `file`.
//!
//! ## Typical call chain
//! ```text
//! CLI → scrape::scrape_storefront(browser, &specs::talabat::SPEC, url, …)
//!                ↘ RawItem per menu item → scrape::collect_item → Collected
//!     → scrape::save_collected → file::append_records
//! ```
//!
//! ## Conventions & invariants
//! - Selectors are CSS, static, and scoped: group/line selectors are always
//!   queried inside their parent element, never against the whole document.
//! - Fallback lists are tried in order; the first selector that matches wins.
//! - Storefront class names are build hashes and change without notice; when a
//!   site redesigns, only its spec file changes.
//!
//! In short: **`specs` knows where things are on the pages.** Other layers
//! decide when to look and what to do with what they find.
pub mod deliveroo;
pub mod portal;
pub mod talabat;

/// How an addon group tells whether the customer must pick from it.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum RequiredProbe {
    /// Group is optional when this selector matches inside it.
    OptionalWhenPresent(&'static str),
    /// Group is required when this selector matches inside it.
    RequiredWhenPresent(&'static str),
}

impl RequiredProbe {
    pub fn selector(&self) -> &'static str {
        match self {
            RequiredProbe::OptionalWhenPresent(s) | RequiredProbe::RequiredWhenPresent(s) => s,
        }
    }

    /// Interpret whether the probe selector matched.
    pub fn is_required(&self, matched: bool) -> bool {
        match self {
            RequiredProbe::OptionalWhenPresent(_) => !matched,
            RequiredProbe::RequiredWhenPresent(_) => matched,
        }
    }
}

/// Selector set for one storefront's menu page.
#[derive(Clone, Debug)]
pub struct StorefrontSpec {
    pub site: &'static str,
    /// Menu sections in page order.
    pub section: &'static str,
    /// Section heading, inside a section; becomes the item category.
    pub section_title: &'static str,
    /// Leading sections that are not menu categories (e.g. "Popular").
    pub skip_sections: usize,
    /// Item card selectors, each queried inside a section.
    pub item_cards: &'static [&'static str],
    /// Item name, inside a card.
    pub item_name: &'static str,
    /// Addon modal, document-wide.
    pub modal: &'static str,
    /// Addon group, inside the modal.
    pub group: &'static str,
    /// Group title, inside a group.
    pub group_title: &'static str,
    pub required_probe: RequiredProbe,
    /// "Choose up to N" text, inside a group.
    pub count_text: &'static str,
    /// One addon line, inside a group.
    pub addon_line: &'static str,
    /// Addon name fallbacks, inside a line.
    pub addon_name: &'static [&'static str],
    /// Addon price fallbacks, inside a line. No match means free.
    pub addon_price: &'static [&'static str],
    /// Modal close control, inside the modal.
    pub close: &'static str,
    /// Drop a trailing "(...)" note from addon names.
    pub cut_name_at_paren: bool,
}
