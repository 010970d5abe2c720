//! Portfolio project model matching the site's project card interface.

use serde::{Deserialize, Serialize};

/// A portfolio project. `order_position` defines display order; the sequence
/// may contain gaps after deletions and is never compacted.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Project {
    pub id: String,
    pub title: String,
    #[serde(default)]
    pub categories: Vec<String>,
    pub description: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub image_url: Option<String>,
    /// Media-relative path of the stored image, used for cleanup on delete.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub image_path: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub link: Option<String>,
    pub order_position: i64,
    pub created_at: String,
    pub updated_at: String,
}

/// Validated fields for inserting a project row.
#[derive(Debug, Clone)]
pub struct NewProject {
    pub title: String,
    pub categories: Vec<String>,
    pub description: String,
    pub image_url: Option<String>,
    pub image_path: Option<String>,
    pub link: Option<String>,
}

/// Request body for PUT /api/projects/reorder.
#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ReorderRequest {
    pub project_ids: Vec<String>,
}

/// Response body for a completed reorder.
#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ReorderResult {
    pub message: String,
    pub updated: usize,
}
