// src/scrape/collect.rs
//
// Shaping of one scraped menu item into records. No browser here: the
// storefront walker fills a `RawItem` with page text, this turns it into
// categories, addons and associations and dedups them into `Collected`.

use crate::core::sanitize::{capitalize_words, first_number, normalize_ws, parse_price};
use crate::records::{AddonCategoryRecord, AddonRecord, ItemAddonAssociation};
use crate::store::Collected;

/// Page text of one addon line.
#[derive(Clone, Debug, Default, PartialEq)]
pub struct RawLine {
    pub name: String,
    /// Raw price text ("AED 5.00", "+ 3", ""); empty when the line shows none.
    pub price_text: String,
}

/// Page text of one addon group in the item modal.
#[derive(Clone, Debug, Default, PartialEq)]
pub struct RawGroup {
    pub title: String,
    pub is_required: bool,
    pub count_text: Option<String>,
    pub lines: Vec<RawLine>,
}

/// Everything read off one item's modal.
#[derive(Clone, Debug, Default, PartialEq)]
pub struct RawItem {
    /// Menu section the card sits in.
    pub section: String,
    pub name: String,
    pub groups: Vec<RawGroup>,
}

/// Maximum selections of an optional group: the number in its count text,
/// else how many lines it shows.
fn option_count(group: &RawGroup) -> u32 {
    group
        .count_text
        .as_deref()
        .and_then(first_number)
        .map(|n| n as u32)
        .unwrap_or(group.lines.len() as u32)
}

/// Add one item's records to `collected`. Returns how many associations were new.
pub fn collect_item(raw: &RawItem, collected: &mut Collected) -> usize {
    let section = normalize_ws(&raw.section);
    let item = normalize_ws(&raw.name);
    let mut added = 0;

    for group in &raw.groups {
        let category = capitalize_words(&group.title);
        if category.is_empty() { continue; }

        let count = if group.is_required { None } else { Some(option_count(group)) };
        collected.categories.insert(AddonCategoryRecord::new(category.clone(), group.is_required, count));

        for line in &group.lines {
            let name = normalize_ws(&line.name);
            if name.is_empty() { continue; }
            let price = parse_price(&line.price_text);

            collected.addons.insert(AddonRecord {
                category_name: category.clone(),
                addon_name: name.clone(),
                price,
                is_required: group.is_required,
            });
            if collected.associations.insert(ItemAddonAssociation {
                category_name: section.clone(),
                item_name: item.clone(),
                addon_category: category.clone(),
                addon_name: name,
                price,
                is_required: group.is_required,
            }) {
                added += 1;
            }
        }
    }
    added
}
