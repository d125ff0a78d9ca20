// src/specs/portal.rs
//! Vendor back office pages.
//!
//! Links on the portal are absolute, so every link selector carries the base
//! URL (`a[href^='https://…/items/']`). [`PortalPages`] builds those once for a
//! given base.
//!
//! Layout:
//! - `/login` – `#email`, password input, submit button; redirects to `/`.
//! - `/items` – `#search` filters the listing table live (progress bar while loading).
//!   Columns: 2 title, 3 price, 4 category; edit link `/items/<id>/edit`.
//! - item edit page – one table row per addon. Columns: 1 category, 2 status,
//!   3 name, 4 price; unattached addons carry an `/addaddon/<…>` link.
//! - `/addoncategories/create`, `/addons/create` – plain forms.

pub const EMAIL_FIELD: &str = "#email";
pub const PASSWORD_FIELD: &str = "input[type='password']";
pub const SUBMIT: &str = "button[type='submit']";
pub const SEARCH_FIELD: &str = "#search";
pub const TABLE: &str = "table.w-full.whitespace-nowrap";
pub const LISTING_ROW: &str = r"tr.hover\:bg-gray-100.focus-within\:bg-gray-100";
pub const ADDON_ROW: &str = r"tr.hover\:bg-gray-100";

pub const ITEM_TITLE: &str = "td:nth-child(2)";
pub const ITEM_PRICE: &str = "td:nth-child(3)";
pub const ITEM_CATEGORY: &str = "td:nth-child(4)";

pub const ADDON_CATEGORY: &str = "td:nth-child(1)";
pub const ADDON_STATUS: &str = "td:nth-child(2)";
pub const ADDON_NAME: &str = "td:nth-child(3)";
pub const ADDON_PRICE: &str = "td:nth-child(4)";

// Create forms
pub const FORM_PANEL: &str = "div.max-w-3xl.overflow-hidden.bg-white.rounded.shadow";
pub const NAME_FIELD: &str = "#name";
pub const STATUS_SELECT: &str = "#status";
pub const REQUIRED_SELECT: &str = "#is_required";
pub const COUNT_FIELD: &str = "#count";
pub const PRICE_FIELD: &str = "#price";
pub const CATEGORY_SELECT: &str = "#addon_category_id";
pub const STATUS_ACTIVE: &str = "Active";

/// Portal section whose listing a run returns to after each record.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Section {
    Items,
    AddonCategories,
    Addons,
}

impl Section {
    pub fn path(self) -> &'static str {
        match self {
            Section::Items => "items",
            Section::AddonCategories => "addoncategories",
            Section::Addons => "addons",
        }
    }
}

/// URLs and base-dependent selectors for one portal installation.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct PortalPages {
    base: String,
}

impl PortalPages {
    pub fn new(base_url: &str) -> Self {
        Self { base: base_url.trim_end_matches('/').to_string() }
    }

    pub fn base(&self) -> &str { &self.base }

    pub fn login_url(&self) -> String { format!("{}/login", self.base) }

    /// Where a successful login lands.
    pub fn home_url(&self) -> String { format!("{}/", self.base) }

    pub fn section_url(&self, section: Section) -> String {
        format!("{}/{}", self.base, section.path())
    }

    pub fn create_link(&self, section: Section) -> String {
        format!("a[href='{}/{}/create']", self.base, section.path())
    }

    pub fn item_edit_link(&self) -> String { sel!("a[href^='{}/items/']", self.base) }

    pub fn activation_link(&self) -> String { sel!("a[href^='{}/addaddon/']", self.base) }
}
