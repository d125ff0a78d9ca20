// benches/matcher.rs
use criterion::{criterion_group, criterion_main, Criterion, black_box};

use addon_sync::{
    core::normalize,
    matcher::{find_addon, find_item, AddonSlots},
    records::{ItemAddonAssociation, PortalAddonRow, PortalItemRow},
};

fn listing(n: usize) -> Vec<PortalItemRow> {
    (0..n)
        .map(|i| PortalItemRow {
            edit_link: format!("https://portal.test/items/{i}/edit"),
            category: format!("Section {}", i % 12),
            title: format!("Chicken Shawarma ({i}) Large"),
            price: format!("{}", 20 + i % 7),
        })
        .collect()
}

fn addon_rows(n: usize) -> Vec<PortalAddonRow> {
    (0..n)
        .map(|i| PortalAddonRow {
            category: format!("Extra Toppings {}", i % 5),
            status: if i % 3 == 0 { "Yes" } else { "No" }.to_string(),
            name: format!("Topping #{i} (Full)"),
            price: format!("{}", i % 9),
            activation_link: Some(format!("https://portal.test/addaddon/{i}")),
        })
        .collect()
}

fn target(i: usize) -> ItemAddonAssociation {
    ItemAddonAssociation {
        category_name: "Mains".into(),
        item_name: "Chicken Shawarma".into(),
        addon_category: format!("extra toppings {}", i % 5),
        addon_name: format!("TOPPING {i} full"),
        price: (i % 9) as f64,
        is_required: i % 3 == 0,
    }
}

fn bench_matcher(c: &mut Criterion) {
    let items = listing(200);
    let rows = addon_rows(120);
    let targets: Vec<_> = (0..120).step_by(7).map(target).collect();

    c.bench_function("normalize", |b| {
        b.iter(|| normalize(black_box("  Coca-Cola (33cl) / Extra   ICE, please ")))
    });

    c.bench_function("find_item_last", |b| {
        b.iter(|| find_item(black_box("chicken shawarma 199 large"), black_box("section 7"), black_box(&items)))
    });

    c.bench_function("find_addon", |b| {
        b.iter(|| find_addon(black_box(&targets[5]), black_box(&rows)))
    });

    c.bench_function("claim_all_targets", |b| {
        b.iter(|| {
            let mut slots = AddonSlots::new(black_box(&rows));
            for t in &targets {
                black_box(slots.claim(t));
            }
            slots.claimed()
        })
    });
}

criterion_group!(benches, bench_matcher);
criterion_main!(benches);
