// src/runner.rs
//
// Run loops that replay spreadsheet records into the portal.
//
// Every loop handles one unit at a time (a category, an addon, a portal
// item). The per-unit step returns `Result<_, RecoverableFault>`; the loop
// logs a fault, steers the portal back to the section listing and moves on.
// The abandoned unit is not retried. Faults while getting back to the
// listing, and before the first unit, end the run.

use std::fmt;

use indexmap::IndexMap;
use thiserror::Error;
use tracing::{error, info, warn};

use crate::{
    core::sanitize::normalize,
    error::Result,
    matcher::{find_item, AddonSlots, Claim},
    portal::{Portal, PortalError, PortalResult},
    progress::Progress,
    records::{AddonCategoryRecord, AddonRecord, ItemAddonAssociation, Keyed},
    specs::portal::Section,
    store::RecordSet,
};

/// A fault inside one unit of work: the unit is abandoned, the run goes on.
#[derive(Debug, Error)]
#[error("{subject}: {source}")]
pub struct RecoverableFault {
    /// Human name of the unit, e.g. `"Mains / Burger"`.
    pub subject: String,
    pub source: PortalError,
}

/* ---------------- Items-to-addons linker ---------------- */

/// Associations of one portal item, in spreadsheet order.
#[derive(Debug)]
pub struct ItemGroup<'a> {
    pub category: &'a str,
    pub item: &'a str,
    pub associations: Vec<&'a ItemAddonAssociation>,
}

impl ItemGroup<'_> {
    pub fn subject(&self) -> String { format!("{} / {}", self.category, self.item) }
}

/// Group associations by (item category, item name), compared normalized.
/// Groups keep first-seen order and first-seen spelling.
pub fn group_by_item(associations: &[ItemAddonAssociation]) -> Vec<ItemGroup<'_>> {
    let mut groups: IndexMap<(String, String), ItemGroup<'_>> = IndexMap::new();
    for a in associations {
        groups
            .entry((normalize(&a.category_name), normalize(&a.item_name)))
            .or_insert_with(|| ItemGroup { category: &a.category_name, item: &a.item_name, associations: Vec::new() })
            .associations
            .push(a);
    }
    groups.into_values().collect()
}

/// Addon-level counts for one resolved item.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct AddonTally {
    pub activated: usize,
    /// Matched a row that has no activation link: the addon is on the item already.
    pub already_attached: usize,
    pub not_found: usize,
    /// Matched only rows an earlier association of the same item consumed.
    pub duplicates: usize,
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Outcome {
    ItemNotFound,
    Linked(AddonTally),
}

#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct LinkSummary {
    pub items: usize,
    pub items_linked: usize,
    pub items_not_found: usize,
    pub items_faulted: usize,
    pub addons: AddonTally,
}

impl LinkSummary {
    /// Lookup misses of any kind.
    pub fn skipped(&self) -> usize {
        self.items_not_found + self.addons.not_found + self.addons.duplicates
    }

    fn record(&mut self, outcome: Outcome) {
        match outcome {
            Outcome::ItemNotFound => self.items_not_found += 1,
            Outcome::Linked(t) => {
                self.items_linked += 1;
                self.addons.activated += t.activated;
                self.addons.already_attached += t.already_attached;
                self.addons.not_found += t.not_found;
                self.addons.duplicates += t.duplicates;
            }
        }
    }
}

impl fmt::Display for LinkSummary {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "items: {} linked, {} not found, {} faulted | addons: {} activated, {} already attached, {} skipped",
            self.items_linked,
            self.items_not_found,
            self.items_faulted,
            self.addons.activated,
            self.addons.already_attached,
            self.addons.not_found + self.addons.duplicates,
        )
    }
}

fn link_item_step(portal: &mut dyn Portal, group: &ItemGroup<'_>) -> PortalResult<Outcome> {
    let rows = portal.search_items(group.item)?;
    let Some(item) = find_item(group.item, group.category, &rows) else {
        warn!(item = group.item, category = group.category, candidates = rows.len(), "item not found");
        return Ok(Outcome::ItemNotFound);
    };
    info!(item = group.item, link = %item.edit_link, "item found");

    let addon_rows = portal.open_item(item)?;
    let mut slots = AddonSlots::new(&addon_rows);
    let mut tally = AddonTally::default();

    for target in &group.associations {
        match slots.claim(target) {
            Claim::Matched(row) => match &row.activation_link {
                Some(link) => {
                    portal.activate(link)?;
                    tally.activated += 1;
                    info!(item = group.item, addon = %target.addon_name, "addon activated");
                }
                None => {
                    tally.already_attached += 1;
                    info!(item = group.item, addon = %target.addon_name, "addon already added");
                }
            },
            Claim::AlreadyClaimed => {
                tally.duplicates += 1;
                warn!(item = group.item, addon = %target.addon_name, "duplicate association; row already used");
            }
            Claim::Missing => {
                tally.not_found += 1;
                warn!(
                    item = group.item,
                    addon_category = %target.addon_category,
                    addon = %target.addon_name,
                    price = target.price,
                    status = target.is_required_label(),
                    "addon not found"
                );
            }
        }
    }

    portal.return_to_listing()?;
    Ok(Outcome::Linked(tally))
}

/// Resolve one item and activate its addons.
pub fn link_item(portal: &mut dyn Portal, group: &ItemGroup<'_>) -> std::result::Result<Outcome, RecoverableFault> {
    link_item_step(portal, group).map_err(|source| RecoverableFault { subject: group.subject(), source })
}

/// Link every item in `associations` to its addons on the portal.
pub fn link_items(
    portal: &mut dyn Portal,
    associations: &[ItemAddonAssociation],
    mut progress: Option<&mut dyn Progress>,
) -> Result<LinkSummary> {
    let groups = group_by_item(associations);
    let mut summary = LinkSummary { items: groups.len(), ..Default::default() };

    if let Some(p) = progress.as_deref_mut() {
        p.begin(groups.len());
    }
    portal.return_to_listing()?;

    for group in &groups {
        match link_item(portal, group) {
            Ok(outcome) => {
                summary.record(outcome);
                if let Some(p) = progress.as_deref_mut() {
                    p.item_done(&group.subject());
                }
            }
            Err(fault) => {
                error!(subject = %fault.subject, error = %fault.source, "error processing item");
                summary.items_faulted += 1;
                if let Some(p) = progress.as_deref_mut() {
                    p.item_failed(&fault.subject, &fault.source.to_string());
                }
                portal.return_to_listing()?;
            }
        }
    }

    if let Some(p) = progress.as_deref_mut() {
        p.finish();
    }
    info!(%summary, "link run finished");
    Ok(summary)
}

/* ---------------- Category / addon uploaders ---------------- */

#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct UploadSummary {
    pub created: usize,
    pub faulted: usize,
    /// Rows dropped because an identical row came earlier in the sheet.
    pub duplicates: usize,
}

impl fmt::Display for UploadSummary {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} created, {} faulted, {} duplicate rows ignored", self.created, self.faulted, self.duplicates)
    }
}

fn upload_each<T, F>(
    portal: &mut dyn Portal,
    section: Section,
    records: &[T],
    subject: fn(&T) -> String,
    mut create: F,
    mut progress: Option<&mut dyn Progress>,
) -> Result<UploadSummary>
where
    T: Keyed + Clone,
    F: FnMut(&mut dyn Portal, &T) -> PortalResult<()>,
{
    let unique: RecordSet<T> = records.iter().cloned().collect();
    let mut summary = UploadSummary { duplicates: records.len() - unique.len(), ..Default::default() };
    if summary.duplicates > 0 {
        warn!(?section, duplicates = summary.duplicates, "duplicate rows ignored");
    }

    if let Some(p) = progress.as_deref_mut() {
        p.begin(unique.len());
    }
    portal.return_to_section(section)?;

    for record in unique.iter() {
        let name = subject(record);
        let step = create(&mut *portal, record).map_err(|source| RecoverableFault { subject: name.clone(), source });
        match step {
            Ok(()) => {
                summary.created += 1;
                info!(?section, record = %name, "created");
                if let Some(p) = progress.as_deref_mut() {
                    p.item_done(&name);
                }
            }
            Err(fault) => {
                error!(?section, subject = %fault.subject, error = %fault.source, "error creating record");
                summary.faulted += 1;
                if let Some(p) = progress.as_deref_mut() {
                    p.item_failed(&fault.subject, &fault.source.to_string());
                }
                portal.return_to_section(section)?;
            }
        }
    }

    if let Some(p) = progress.as_deref_mut() {
        p.finish();
    }
    info!(?section, %summary, "upload finished");
    Ok(summary)
}

/// Create every addon category on the portal.
pub fn upload_categories(
    portal: &mut dyn Portal,
    records: &[AddonCategoryRecord],
    progress: Option<&mut dyn Progress>,
) -> Result<UploadSummary> {
    upload_each(
        portal,
        Section::AddonCategories,
        records,
        |r| r.category_name.clone(),
        |p, r| p.create_addon_category(r),
        progress,
    )
}

/// Create every addon on the portal.
pub fn upload_addons(
    portal: &mut dyn Portal,
    records: &[AddonRecord],
    progress: Option<&mut dyn Progress>,
) -> Result<UploadSummary> {
    upload_each(
        portal,
        Section::Addons,
        records,
        |r| format!("{} / {}", r.category_name, r.addon_name),
        |p, r| p.create_addon(r),
        progress,
    )
}
