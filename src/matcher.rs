// src/matcher.rs
//
// Record matching between spreadsheet targets and live portal rows.
//
// Pure functions over already-fetched rows: equality after normalization,
// first match in listing order wins. No scoring, no partial matches.
//
//   item:  normalize(title)    == normalize(target name)
//          normalize(category) == normalize(target category)
//   addon: normalize(category) == normalize(addon_category)
//          normalize(name)     == normalize(addon_name)
//          price               == format_number(target price)
//          status              == "Yes"/"No" label (verbatim, case-sensitive)

use crate::core::sanitize::{format_number, normalize};
use crate::records::{ItemAddonAssociation, PortalAddonRow, PortalItemRow};

/// First listing row whose title and category both match.
pub fn find_item<'a>(
    target_name: &str,
    target_category: &str,
    rows: &'a [PortalItemRow],
) -> Option<&'a PortalItemRow> {
    let name = normalize(target_name);
    let category = normalize(target_category);
    rows.iter()
        .find(|r| normalize(&r.title) == name && normalize(&r.category) == category)
}

pub fn addon_matches(row: &PortalAddonRow, target: &ItemAddonAssociation) -> bool {
    // An unformattable price can never equal rendered text.
    let Ok(price) = format_number(target.price) else { return false };
    normalize(&row.category) == normalize(&target.addon_category)
        && normalize(&row.name) == normalize(&target.addon_name)
        && row.price == price
        && row.status == target.is_required_label()
}

/// First rendered addon row matching all four fields.
pub fn find_addon<'a>(target: &ItemAddonAssociation, rows: &'a [PortalAddonRow]) -> Option<&'a PortalAddonRow> {
    rows.iter().find(|r| addon_matches(r, target))
}

/// Result of claiming a rendered addon row for one association.
#[derive(Debug, PartialEq, Eq)]
pub enum Claim<'a> {
    /// Fresh match; the row is now consumed.
    Matched(&'a PortalAddonRow),
    /// Only matching rows were already consumed by an earlier association.
    AlreadyClaimed,
    Missing,
}

/// Rendered addon rows of one item visit, each activatable at most once.
///
/// Duplicate associations for the same addon would otherwise bind to the same
/// row twice; here the second one reports `AlreadyClaimed` instead.
pub struct AddonSlots<'a> {
    rows: &'a [PortalAddonRow],
    used: Vec<bool>,
}

impl<'a> AddonSlots<'a> {
    pub fn new(rows: &'a [PortalAddonRow]) -> Self {
        Self { rows, used: vec![false; rows.len()] }
    }

    pub fn claim(&mut self, target: &ItemAddonAssociation) -> Claim<'a> {
        let mut seen_used = false;
        for (i, row) in self.rows.iter().enumerate() {
            if !addon_matches(row, target) { continue; }
            if self.used[i] { seen_used = true; continue; }
            self.used[i] = true;
            return Claim::Matched(row);
        }
        if seen_used { Claim::AlreadyClaimed } else { Claim::Missing }
    }

    pub fn claimed(&self) -> usize { self.used.iter().filter(|u| **u).count() }
}
