//! Hero slot models for the landing-page configuration.

use serde::{Deserialize, Serialize};

/// Maximum number of descriptive strings a hero slot carries.
pub const MAX_SLOT_DESCRIPTIONS: usize = 3;

/// One hero slot: a project pinned to a landing-page position (1-based).
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct HeroSlot {
    pub id: String,
    pub project_id: String,
    pub position: i64,
    #[serde(default)]
    pub descriptions: Vec<String>,
    #[serde(default)]
    pub images: Vec<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub background_image: Option<String>,
    pub created_at: String,
}

/// Request body for POST /api/hero-projects. The slot set is replaced
/// wholesale; positions are assigned from list order.
#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SaveHeroRequest {
    pub hero_projects: Vec<HeroSlotInput>,
}

/// One slot within a replace-all save.
#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct HeroSlotInput {
    pub project_id: String,
    #[serde(default)]
    pub descriptions: Vec<String>,
    #[serde(default)]
    pub images: Vec<String>,
    #[serde(default)]
    pub background_image: Option<String>,
}
