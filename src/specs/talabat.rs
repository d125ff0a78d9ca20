// src/specs/talabat.rs
//! Talabat restaurant menu page.
//!
//! - The first `menu-category` block is the promoted "Picks" carousel and is skipped.
//! - Item cards come in two styled variants; both are walked.
//! - Optional groups render a checkbox component, required groups a radio list.
//! - Addon names may carry a "(...)" note that is not part of the name.

use super::{RequiredProbe, StorefrontSpec};

pub const SPEC: StorefrontSpec = StorefrontSpec {
    site: "talabat",
    section: "div[data-testid='menu-category']",
    section_title: "h4",
    skip_sections: 1,
    item_cards: &[
        "div.sc-a31f9fb2-0.dyJtfK.d-flex.justify-content-between.py-2.clickable",
        "div.sc-a31f9fb2-0.eQGrrN.d-flex.justify-content-between.py-2.clickable",
    ],
    item_name: "div.f-15",
    modal: "div.modal-content",
    group: "div.sc-1bf12ad-0.ilBSTs",
    group_title: "strong[data-test='sectionName']",
    required_probe: RequiredProbe::OptionalWhenPresent("div[data-testid='choices-checkboxes-component']"),
    count_text: "span.dark-gray.align-middle",
    addon_line: "div.col-lg-5.col-md-5.col-sm-16.col-16",
    addon_name: &["label.control-label > span:nth-of-type(2)", "span.text span"],
    addon_price: &["label[data-testid=\"radio\"] span.currency", "label.control-label span.currency"],
    close: "span.clickable.close-span",
    cut_name_at_paren: true,
};
