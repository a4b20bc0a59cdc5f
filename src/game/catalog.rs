//! Immutable item and species catalog.
//!
//! Seeded insert-if-absent at startup; nothing at runtime mutates these
//! rows. Color variants of a garment share a `base_id` so the store page can
//! render one card with a swatch per variant.

use std::collections::BTreeMap;

use crate::game::errors::GameError;
use crate::game::storage::GameStore;
use crate::game::types::{
    ItemGender, ItemRecord, ItemSlot, SpeciesRecord, CATALOG_SCHEMA_VERSION,
};

/// Item ids granted free to every new account.
pub const STARTER_ITEM_IDS: [u32; 3] = [1, 2, 3];

fn item(
    id: u32,
    base_id: u32,
    slot: ItemSlot,
    gender: ItemGender,
    name: &str,
    price: i64,
    image: &str,
    css_filter: Option<&str>,
) -> ItemRecord {
    ItemRecord {
        id,
        base_id,
        slot,
        gender,
        name: name.to_string(),
        price,
        image: image.to_string(),
        css_filter: css_filter.map(str::to_string),
        schema_version: CATALOG_SCHEMA_VERSION,
    }
}

fn species(code: &str, display_name: &str, price: i64) -> SpeciesRecord {
    SpeciesRecord {
        code: code.to_string(),
        display_name: display_name.to_string(),
        price,
        egg_image: format!("eggs/{}_egg.png", code),
        pet_image: format!("pets/{}.png", code),
        schema_version: CATALOG_SCHEMA_VERSION,
    }
}

/// The full cosmetic catalog. Ids 1-3 are the free starter outfit.
pub fn default_items() -> Vec<ItemRecord> {
    use ItemGender::{Female, Male, Unisex};
    use ItemSlot::{Eyes, Hair, Misc, Mouth, Pants, Shirt, Shoes};

    vec![
        item(1, 1, Shirt, Unisex, "Plain Tee", 0, "items/plain_tee.png", None),
        item(2, 2, Pants, Unisex, "Everyday Jeans", 0, "items/everyday_jeans.png", None),
        item(3, 3, Shoes, Unisex, "Canvas Sneakers", 0, "items/canvas_sneakers.png", None),
        item(10, 10, Hair, Female, "Long Waves", 180, "items/long_waves.png", None),
        item(11, 10, Hair, Female, "Long Waves (Rose)", 180, "items/long_waves.png", Some("hue-rotate(315deg)")),
        item(12, 10, Hair, Female, "Long Waves (Ocean)", 180, "items/long_waves.png", Some("hue-rotate(180deg)")),
        item(20, 20, Hair, Male, "Short Crop", 120, "items/short_crop.png", None),
        item(21, 20, Hair, Male, "Short Crop (Ash)", 120, "items/short_crop.png", Some("grayscale(80%)")),
        item(30, 30, Shirt, Unisex, "Star Hoodie", 150, "items/star_hoodie.png", None),
        item(31, 30, Shirt, Unisex, "Star Hoodie (Mint)", 150, "items/star_hoodie.png", Some("hue-rotate(90deg)")),
        item(32, 30, Shirt, Unisex, "Star Hoodie (Plum)", 150, "items/star_hoodie.png", Some("hue-rotate(270deg)")),
        item(40, 40, Pants, Unisex, "Cargo Shorts", 90, "items/cargo_shorts.png", None),
        item(50, 50, Shoes, Unisex, "Rocket Boots", 250, "items/rocket_boots.png", None),
        item(51, 50, Shoes, Unisex, "Rocket Boots (Gold)", 300, "items/rocket_boots.png", Some("sepia(60%) saturate(300%)")),
        item(60, 60, Eyes, Unisex, "Sparkle Eyes", 80, "items/sparkle_eyes.png", None),
        item(61, 60, Eyes, Unisex, "Sparkle Eyes (Violet)", 80, "items/sparkle_eyes.png", Some("hue-rotate(250deg)")),
        item(70, 70, Mouth, Unisex, "Cheeky Grin", 60, "items/cheeky_grin.png", None),
        item(80, 80, Misc, Unisex, "Jackaloaf Plush", 200, "items/jackaloaf_plush.png", None),
    ]
}

/// Adoptable pet species, cheapest first.
pub fn default_species() -> Vec<SpeciesRecord> {
    vec![
        species("jackaloaf", "Jackaloaf", 100),
        species("cloudlamb", "Cloud Lamb", 150),
        species("mossling", "Mossling", 200),
        species("emberfox", "Ember Fox", 250),
    ]
}

/// Items grouped by `base_id`, groups in ascending base id order and each
/// group's variants in ascending item id order.
pub fn list_items_grouped_by_base_id(
    store: &GameStore,
) -> Result<BTreeMap<u32, Vec<ItemRecord>>, GameError> {
    let mut grouped: BTreeMap<u32, Vec<ItemRecord>> = BTreeMap::new();
    for item in store.list_items()? {
        grouped.entry(item.base_id).or_default().push(item);
    }
    for variants in grouped.values_mut() {
        variants.sort_by_key(|i| i.id);
    }
    Ok(grouped)
}

/// Adoptable species sorted by price, then name.
pub fn list_species(store: &GameStore) -> Result<Vec<SpeciesRecord>, GameError> {
    let mut species = store.list_species()?;
    species.sort_by(|a, b| {
        a.price
            .cmp(&b.price)
            .then_with(|| a.display_name.cmp(&b.display_name))
    });
    Ok(species)
}
