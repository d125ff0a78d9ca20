// src/records.rs
//
// Record shapes shared by the scrapers, the spreadsheets and the portal.
//
// Scraped records (categories, addons, item-to-addon associations) are
// persisted positionally: `SheetRow::HEADERS` fixes the column order and
// `from_cells` reads fixed column indices, never header names.
// Portal rows are read off the live page and never persisted.

use crate::core::sanitize::{format_number, parse_number};
use crate::error::{Error, Result};

/// Status label used by both the storefront sheets and the portal forms.
pub const STATUS_REQUIRED: &str = "Yes";
pub const STATUS_OPTIONAL: &str = "No";

pub fn status_label(is_required: bool) -> &'static str {
    if is_required { STATUS_REQUIRED } else { STATUS_OPTIONAL }
}

fn parse_status(text: &str) -> Result<bool> {
    match text.trim() {
        STATUS_REQUIRED => Ok(true),
        STATUS_OPTIONAL => Ok(false),
        other => Err(Error::InvalidArgument(format!("status must be Yes/No, got {other:?}"))),
    }
}

/// One spreadsheet cell as far as this crate cares.
#[derive(Clone, Debug, PartialEq)]
pub enum Cell {
    Empty,
    Text(String),
    Number(f64),
}

impl Cell {
    pub fn text(s: impl Into<String>) -> Self { Cell::Text(s.into()) }

    /// Text view of the cell; numbers are rendered through `format_number`.
    pub fn as_text(&self) -> String {
        match self {
            Cell::Empty => s!(),
            Cell::Text(s) => s.trim().to_string(),
            Cell::Number(n) => format_number(*n).unwrap_or_default(),
        }
    }

    pub fn as_number(&self) -> Result<f64> {
        match self {
            Cell::Number(n) => Ok(*n),
            Cell::Text(s) => parse_number(s),
            Cell::Empty => Err(Error::InvalidArgument(s!("empty cell where a number was expected"))),
        }
    }

    pub fn is_empty(&self) -> bool {
        match self {
            Cell::Empty => true,
            Cell::Text(s) => s.trim().is_empty(),
            Cell::Number(_) => false,
        }
    }
}

/// A record that lives in one positional spreadsheet table.
pub trait SheetRow: Sized {
    const FILE_NAME: &'static str;
    const HEADERS: &'static [&'static str];

    fn to_cells(&self) -> Vec<Cell>;
    fn from_cells(cells: &[Cell]) -> Result<Self>;
}

/// Identity key used for first-write-wins dedup.
pub trait Keyed {
    type Key: Eq + std::hash::Hash + Clone + std::fmt::Debug;
    fn key(&self) -> Self::Key;
}

fn cell(cells: &[Cell], ix: usize) -> &Cell {
    cells.get(ix).unwrap_or(&Cell::Empty)
}

fn price_key(price: f64) -> String {
    format_number(price).unwrap_or_else(|_| price.to_string())
}

/* ---------------- Addon category ---------------- */

#[derive(Clone, Debug, PartialEq)]
pub struct AddonCategoryRecord {
    pub category_name: String,
    pub is_required: bool,
    /// Maximum selections; only optional categories carry one.
    pub option_count: Option<u32>,
}

impl AddonCategoryRecord {
    pub fn new(category_name: impl Into<String>, is_required: bool, option_count: Option<u32>) -> Self {
        Self {
            category_name: category_name.into(),
            is_required,
            option_count: if is_required { None } else { option_count },
        }
    }

    pub fn status_label(&self) -> &'static str { status_label(self.is_required) }
}

impl Keyed for AddonCategoryRecord {
    type Key = (String, bool, Option<u32>);
    fn key(&self) -> Self::Key {
        (self.category_name.clone(), self.is_required, self.option_count)
    }
}

impl SheetRow for AddonCategoryRecord {
    const FILE_NAME: &'static str = "addon_cat.xlsx";
    const HEADERS: &'static [&'static str] = &["addon_category", "category_status", "addon_count_line"];

    fn to_cells(&self) -> Vec<Cell> {
        vec![
            Cell::text(&self.category_name),
            Cell::text(self.status_label()),
            match self.option_count {
                Some(n) => Cell::Number(n as f64),
                None => Cell::Empty,
            },
        ]
    }

    fn from_cells(cells: &[Cell]) -> Result<Self> {
        let is_required = parse_status(&cell(cells, 1).as_text())?;
        let count = cell(cells, 2);
        let option_count = if is_required || count.is_empty() {
            None
        } else {
            Some(count.as_number()? as u32)
        };
        Ok(Self::new(cell(cells, 0).as_text(), is_required, option_count))
    }
}

/* ---------------- Addon ---------------- */

#[derive(Clone, Debug, PartialEq)]
pub struct AddonRecord {
    pub category_name: String,
    pub addon_name: String,
    pub price: f64,
    pub is_required: bool,
}

impl Keyed for AddonRecord {
    type Key = (String, String, String, bool);
    fn key(&self) -> Self::Key {
        (self.category_name.clone(), self.addon_name.clone(), price_key(self.price), self.is_required)
    }
}

impl SheetRow for AddonRecord {
    const FILE_NAME: &'static str = "addons.xlsx";
    const HEADERS: &'static [&'static str] = &["addon_category", "addon_name", "addon_price", "category_status"];

    fn to_cells(&self) -> Vec<Cell> {
        vec![
            Cell::text(&self.category_name),
            Cell::text(&self.addon_name),
            Cell::Number(self.price),
            Cell::text(status_label(self.is_required)),
        ]
    }

    fn from_cells(cells: &[Cell]) -> Result<Self> {
        Ok(Self {
            category_name: cell(cells, 0).as_text(),
            addon_name: cell(cells, 1).as_text(),
            price: price_cell(cell(cells, 2))?,
            is_required: parse_status(&cell(cells, 3).as_text())?,
        })
    }
}

/// Blank price cells are free addons.
fn price_cell(c: &Cell) -> Result<f64> {
    if c.is_empty() { Ok(0.0) } else { c.as_number() }
}

/* ---------------- Item <-> addon association ---------------- */

#[derive(Clone, Debug, PartialEq)]
pub struct ItemAddonAssociation {
    /// The item's menu section on the storefront.
    pub category_name: String,
    pub item_name: String,
    pub addon_category: String,
    pub addon_name: String,
    pub price: f64,
    pub is_required: bool,
}

impl ItemAddonAssociation {
    pub fn is_required_label(&self) -> &'static str { status_label(self.is_required) }
}

impl Keyed for ItemAddonAssociation {
    type Key = (String, String, String, String, String, bool);
    fn key(&self) -> Self::Key {
        (
            self.category_name.clone(),
            self.item_name.clone(),
            self.addon_category.clone(),
            self.addon_name.clone(),
            price_key(self.price),
            self.is_required,
        )
    }
}

impl SheetRow for ItemAddonAssociation {
    const FILE_NAME: &'static str = "items_addons.xlsx";
    const HEADERS: &'static [&'static str] = &[
        "item_category", "item_name", "addon_category", "addon_name", "addon_price", "category_status",
    ];

    fn to_cells(&self) -> Vec<Cell> {
        vec![
            Cell::text(&self.category_name),
            Cell::text(&self.item_name),
            Cell::text(&self.addon_category),
            Cell::text(&self.addon_name),
            Cell::Number(self.price),
            Cell::text(self.is_required_label()),
        ]
    }

    fn from_cells(cells: &[Cell]) -> Result<Self> {
        Ok(Self {
            category_name: cell(cells, 0).as_text(),
            item_name: cell(cells, 1).as_text(),
            addon_category: cell(cells, 2).as_text(),
            addon_name: cell(cells, 3).as_text(),
            price: price_cell(cell(cells, 4))?,
            is_required: parse_status(&cell(cells, 5).as_text())?,
        })
    }
}

/* ---------------- Live portal rows ---------------- */

/// One row of the portal's item listing.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct PortalItemRow {
    pub edit_link: String,
    pub category: String,
    pub title: String,
    pub price: String,
}

/// One addon row rendered on an item's edit page.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct PortalAddonRow {
    pub category: String,
    pub status: String,
    pub name: String,
    pub price: String,
    /// `None` when the addon is already attached to the item.
    pub activation_link: Option<String>,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn required_category_drops_count() {
        let c = AddonCategoryRecord::new("Sauces", true, Some(3));
        assert_eq!(c.option_count, None);
        let o = AddonCategoryRecord::new("Toppings", false, Some(3));
        assert_eq!(o.option_count, Some(3));
    }

    #[test]
    fn category_reads_positional_cells() {
        let cells = vec![Cell::text("Toppings"), Cell::text("No"), Cell::Number(2.0)];
        let rec = AddonCategoryRecord::from_cells(&cells).unwrap();
        assert_eq!(rec, AddonCategoryRecord::new("Toppings", false, Some(2)));

        let cells = vec![Cell::text("Bread"), Cell::text("Yes"), Cell::Empty];
        assert!(AddonCategoryRecord::from_cells(&cells).unwrap().is_required);
    }

    #[test]
    fn bad_status_is_rejected() {
        let cells = vec![Cell::text("Bread"), Cell::text("maybe")];
        assert!(matches!(AddonCategoryRecord::from_cells(&cells), Err(Error::InvalidArgument(_))));
    }

    #[test]
    fn price_text_and_float_share_a_key() {
        let a = AddonRecord { category_name: "T".into(), addon_name: "Cheese".into(), price: 5.0, is_required: false };
        let cells = vec![Cell::text("T"), Cell::text("Cheese"), Cell::text("5"), Cell::text("No")];
        let b = AddonRecord::from_cells(&cells).unwrap();
        assert_eq!(a.key(), b.key());
    }

    #[test]
    fn blank_price_is_free() {
        let cells = vec![
            Cell::text("Mains"), Cell::text("Burger"), Cell::text("Sauces"),
            Cell::text("Ketchup"), Cell::Empty, Cell::text("Yes"),
        ];
        let a = ItemAddonAssociation::from_cells(&cells).unwrap();
        assert_eq!(a.price, 0.0);
        assert_eq!(a.is_required_label(), "Yes");
    }
}
