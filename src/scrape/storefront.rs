// src/scrape/storefront.rs
//
// Walks a storefront menu page with a `StorefrontSpec`: every item card is
// opened, its addon modal read into a `RawItem`, and the modal closed again.
// One browser tab, one card at a time.

use std::path::{Path, PathBuf};
use std::time::Duration;

use tracing::{debug, error, info, warn};

use super::collect::{collect_item, RawGroup, RawItem, RawLine};
use crate::{
    browser::{wait, Browser, BrowserError, BrowserResult, ElementRef},
    browser::wait::WaitPolicy,
    core::sanitize::cut_at_paren,
    error::Result,
    file::append_records,
    progress::Progress,
    specs::StorefrontSpec,
    store::Collected,
};

/// Text of the first fallback selector that matches inside `scope`.
fn first_text(
    browser: &mut dyn Browser,
    scope: &ElementRef,
    selectors: &[&str],
) -> BrowserResult<Option<String>> {
    for sel in selectors {
        if let Some(text) = browser.text_of(Some(scope), sel)? {
            return Ok(Some(text));
        }
    }
    Ok(None)
}

fn read_line(browser: &mut dyn Browser, spec: &StorefrontSpec, line: &ElementRef) -> BrowserResult<RawLine> {
    let name = first_text(browser, line, spec.addon_name)?.unwrap_or_default();
    let name = if spec.cut_name_at_paren { cut_at_paren(&name) } else { name };
    let price_text = first_text(browser, line, spec.addon_price)?.unwrap_or_default();
    Ok(RawLine { name, price_text })
}

fn read_group(browser: &mut dyn Browser, spec: &StorefrontSpec, group: &ElementRef) -> BrowserResult<RawGroup> {
    let title = browser.text_of(Some(group), spec.group_title)?.unwrap_or_default();
    let matched = browser.query(Some(group), spec.required_probe.selector())?.is_some();
    let is_required = spec.required_probe.is_required(matched);
    let count_text = if is_required { None } else { browser.text_of(Some(group), spec.count_text)? };

    let mut lines = Vec::new();
    for line in browser.query_all(Some(group), spec.addon_line)? {
        lines.push(read_line(browser, spec, &line)?);
    }
    Ok(RawGroup { title, is_required, count_text, lines })
}

fn card_name(browser: &mut dyn Browser, spec: &StorefrontSpec, card: &ElementRef) -> BrowserResult<String> {
    browser
        .text_of(Some(card), spec.item_name)?
        .ok_or_else(|| BrowserError::ElementNotFound(spec.item_name.to_string()))
}

/// Open one card's modal, read its groups, close it.
fn read_modal(
    browser: &mut dyn Browser,
    spec: &StorefrontSpec,
    card: &ElementRef,
    policy: WaitPolicy,
) -> BrowserResult<Vec<RawGroup>> {
    browser.click(card)?;
    let modal = wait::wait_for_selector(browser, spec.modal, policy)?;

    let mut groups = Vec::new();
    for group in browser.query_all(Some(&modal), spec.group)? {
        groups.push(read_group(browser, spec, &group)?);
    }

    let close = browser.expect(Some(&modal), spec.close)?;
    browser.click(&close)?;
    wait::until(policy, "addon modal to close", || Ok(browser.query(None, spec.modal)?.is_none()))?;
    Ok(groups)
}

/// Best effort: get the page back to the plain menu after a failed item.
fn dismiss_modal(browser: &mut dyn Browser, spec: &StorefrontSpec) {
    let Ok(Some(modal)) = browser.query(None, spec.modal) else { return };
    if let Ok(Some(close)) = browser.query(Some(&modal), spec.close) {
        if let Err(e) = browser.click(&close) {
            debug!(error = %e, "modal close failed");
        }
    }
}

/// Item cards in page order, tagged with their section title.
fn list_cards(browser: &mut dyn Browser, spec: &StorefrontSpec) -> BrowserResult<Vec<(String, ElementRef)>> {
    let sections = browser.query_all(None, spec.section)?;
    let mut cards = Vec::new();
    for section in sections.iter().skip(spec.skip_sections) {
        let title = browser.text_of(Some(section), spec.section_title)?.unwrap_or_default();
        if title.is_empty() {
            warn!(site = spec.site, "menu section without a title");
        }
        for sel in spec.item_cards {
            for card in browser.query_all(Some(section), sel)? {
                cards.push((title.clone(), card));
            }
        }
    }
    Ok(cards)
}

/// Scrape every item's addons from the menu page at `url`.
///
/// `ready_timeout` bounds the wait for the first menu section; everything
/// else uses `policy`. A failure on one item is logged and the item skipped.
pub fn scrape_storefront(
    browser: &mut dyn Browser,
    spec: &StorefrontSpec,
    url: &str,
    policy: WaitPolicy,
    ready_timeout: Duration,
    mut progress: Option<&mut dyn Progress>,
) -> Result<Collected> {
    info!(site = spec.site, url, "opening menu");
    browser.goto(url)?;
    wait::wait_for_selector(browser, spec.section, policy.with_timeout(ready_timeout))?;

    let cards = list_cards(browser, spec)?;
    info!(site = spec.site, items = cards.len(), "menu items found");
    if let Some(p) = progress.as_deref_mut() {
        p.begin(cards.len());
    }

    let mut collected = Collected::new();
    for (section, card) in &cards {
        // Failures before the name is read are reported under the section.
        let mut subject = section.clone();
        let read = card_name(browser, spec, card).and_then(|name| {
            subject = format!("{section} / {name}");
            let groups = read_modal(browser, spec, card, policy)?;
            Ok(RawItem { section: section.clone(), name, groups })
        });

        match read {
            Ok(raw) => {
                let added = collect_item(&raw, &mut collected);
                debug!(item = %raw.name, groups = raw.groups.len(), added, "item scraped");
                if let Some(p) = progress.as_deref_mut() {
                    p.item_done(&subject);
                }
            }
            Err(e) => {
                error!(site = spec.site, subject = %subject, error = %e, "error processing item");
                dismiss_modal(browser, spec);
                if let Some(p) = progress.as_deref_mut() {
                    p.item_failed(&subject, &e.to_string());
                }
            }
        }
    }

    if let Some(p) = progress.as_deref_mut() {
        p.finish();
    }
    info!(
        categories = collected.categories.len(),
        addons = collected.addons.len(),
        associations = collected.associations.len(),
        "scrape complete"
    );
    Ok(collected)
}

/// Append the three record sets to their workbooks in `dir`. Empty sets
/// leave their workbook untouched.
pub fn save_collected(collected: &Collected, dir: &Path) -> Result<Vec<PathBuf>> {
    let mut written = Vec::new();
    if !collected.categories.is_empty() {
        written.push(append_records(dir, collected.categories.iter())?);
    }
    if !collected.addons.is_empty() {
        written.push(append_records(dir, collected.addons.iter())?);
    }
    if !collected.associations.is_empty() {
        written.push(append_records(dir, collected.associations.iter())?);
    }
    Ok(written)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::records::{AddonCategoryRecord, ItemAddonAssociation};

    #[test]
    fn save_skips_empty_sets() {
        let dir = tempfile::tempdir().unwrap();
        let mut c = Collected::new();
        c.categories.insert(AddonCategoryRecord::new("Sauces", true, None));

        let written = save_collected(&c, dir.path()).unwrap();
        assert_eq!(written, vec![dir.path().join("addon_cat.xlsx")]);
        assert!(!dir.path().join(<ItemAddonAssociation as crate::records::SheetRow>::FILE_NAME).exists());
    }
}
