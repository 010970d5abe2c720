//! Service category model.

use serde::{Deserialize, Serialize};

/// Maximum number of showcase image references per category.
pub const MAX_CATEGORY_IMAGES: usize = 3;

/// Fixed seed set, keyed by slug. Seeding is idempotent and never duplicates
/// or overwrites rows.
pub const DEFAULT_CATEGORIES: &[(&str, &str)] = &[
    ("branding", "Branding & Identity"),
    ("web-design", "Web Design"),
    ("interior", "Interior Design"),
    ("photography", "Photography"),
    ("motion", "Motion & Film"),
];

/// A named service category holding up to three project references used for
/// its showcase.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ServiceCategory {
    pub slug: String,
    pub name: String,
    #[serde(default)]
    pub images: Vec<String>,
    pub updated_at: String,
}

/// Request body for PUT /api/service-categories.
#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SetCategoryImagesRequest {
    pub slug: String,
    pub images: Vec<String>,
}
