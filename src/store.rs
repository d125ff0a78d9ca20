// src/store.rs
//
// In-memory accumulation for one scrape run.
//
// A `RecordSet` is an ordered set keyed by the record's identity key:
// the first record with a given key is kept, later ones are dropped.
// `Collected` bundles the three sets a storefront scrape produces and is
// passed explicitly through the scraper.

use indexmap::IndexMap;

use crate::records::{AddonCategoryRecord, AddonRecord, ItemAddonAssociation, Keyed};

#[derive(Clone, Debug)]
pub struct RecordSet<T: Keyed> {
    by_key: IndexMap<T::Key, T>,
}

impl<T: Keyed> Default for RecordSet<T> {
    fn default() -> Self { Self { by_key: IndexMap::new() } }
}

impl<T: Keyed> RecordSet<T> {
    pub fn new() -> Self { Self::default() }

    /// Insert unless a record with the same identity key is already stored.
    /// Returns `true` when the record was new.
    pub fn insert(&mut self, record: T) -> bool {
        let key = record.key();
        if self.by_key.contains_key(&key) {
            return false;
        }
        self.by_key.insert(key, record);
        true
    }

    pub fn len(&self) -> usize { self.by_key.len() }
    pub fn is_empty(&self) -> bool { self.by_key.is_empty() }

    /// Records in insertion order.
    pub fn iter(&self) -> impl Iterator<Item = &T> { self.by_key.values() }
}

impl<T: Keyed> FromIterator<T> for RecordSet<T> {
    fn from_iter<I: IntoIterator<Item = T>>(iter: I) -> Self {
        let mut set = Self::new();
        for r in iter { set.insert(r); }
        set
    }
}

/// Everything one storefront scrape produced.
#[derive(Clone, Debug, Default)]
pub struct Collected {
    pub categories: RecordSet<AddonCategoryRecord>,
    pub addons: RecordSet<AddonRecord>,
    pub associations: RecordSet<ItemAddonAssociation>,
}

impl Collected {
    pub fn new() -> Self { Self::default() }

    pub fn is_empty(&self) -> bool {
        self.categories.is_empty() && self.addons.is_empty() && self.associations.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn same_category_key_is_stored_once() {
        let mut set = RecordSet::new();
        assert!(set.insert(AddonCategoryRecord::new("Toppings", false, Some(3))));
        assert!(!set.insert(AddonCategoryRecord::new("Toppings", false, Some(3))));
        assert_eq!(set.len(), 1);
    }

    #[test]
    fn differing_count_is_a_different_key() {
        let mut set = RecordSet::new();
        set.insert(AddonCategoryRecord::new("Toppings", false, Some(3)));
        set.insert(AddonCategoryRecord::new("Toppings", false, Some(2)));
        set.insert(AddonCategoryRecord::new("Toppings", true, None));
        assert_eq!(set.len(), 3);
    }

    #[test]
    fn first_write_wins_and_order_is_kept() {
        let addon = |name: &str, price: f64| AddonRecord {
            category_name: "Extras".into(),
            addon_name: name.into(),
            price,
            is_required: false,
        };
        let set: RecordSet<AddonRecord> =
            [addon("Bacon", 7.0), addon("Cheese", 5.0), addon("Bacon", 7.0), addon("Egg", 2.5)]
                .into_iter()
                .collect();
        let names: Vec<&str> = set.iter().map(|a| a.addon_name.as_str()).collect();
        assert_eq!(names, ["Bacon", "Cheese", "Egg"]);
    }
}
