// src/specs/deliveroo.rs
//! Deliveroo restaurant menu page.
//!
//! The menu only renders after a delivery location is chosen, so callers give
//! the first section a long ready timeout. The first two layout blocks are
//! the header and the "Popular" strip.
//!
//! Class names are `ccl-*` build hashes.

use super::{RequiredProbe, StorefrontSpec};

const TITLE: &str = "p.ccl-649204f2a8e630fd.ccl-a396bc55704a9c8a.ccl-0956b2f88e605eb8.ccl-ff5caa8a6f2b96d0.ccl-40ad99f7b47f3781";

pub const SPEC: StorefrontSpec = StorefrontSpec {
    site: "deliveroo",
    section: "div.Layout-4549ebf43c78c99a",
    section_title: "h2",
    skip_sections: 2,
    item_cards: &["div.MenuItemCard-a927b3314fc88b17"],
    item_name: TITLE,
    modal: "div.ccl-e2683e5cd3d2680f",
    group: "div.MenuItemModifiers-60c359b419ec39f6",
    group_title: TITLE,
    required_probe: RequiredProbe::RequiredWhenPresent(
        "p.ccl-649204f2a8e630fd.ccl-6f43f9bb8ff2d712.ccl-08c109442f3e666d.ccl-40ad99f7b47f3781",
    ),
    count_text: "span.ccl-649204f2a8e630fd.ccl-6f43f9bb8ff2d712",
    addon_line: "div.ccl-a5e1512b87ef2079",
    addon_name: &["p.ccl-649204f2a8e630fd.ccl-a396bc55704a9c8a.ccl-0956b2f88e605eb8.ccl-40ad99f7b47f3781"],
    addon_price: &["div.ccl-a206e125970432e3"],
    close: "button.ccl-4704108cacc54616.ccl-4f99b5950ce94015",
    cut_name_at_paren: false,
};
