//! Generated jewelry designs.

use chrono::{DateTime, Utc};
use glamora_core::{DesignId, DesignType};
use serde::{Deserialize, Serialize};

/// A design produced by the generator, remote or simulated.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Design {
    pub id: DesignId,
    #[serde(rename = "type")]
    pub kind: DesignType,
    /// Free-form style name (e.g., "minimalist", "art deco").
    pub style: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
    pub image_url: String,
    pub created_at: DateTime<Utc>,
    #[serde(default)]
    pub is_favorite: bool,
}
