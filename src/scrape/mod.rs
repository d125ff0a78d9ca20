// src/scrape/mod.rs
mod collect;
mod storefront;

pub use collect::{collect_item, RawGroup, RawItem, RawLine};
pub use storefront::{save_collected, scrape_storefront};
