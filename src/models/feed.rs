use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use super::CatalogItem;

/// A transient, multi-section personalized feed; rebuilt on every request
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct Feed {
    pub recommendations: Vec<CatalogItem>,
    pub continue_reading: Vec<CatalogItem>,
    pub new_in_genres: Vec<CatalogItem>,
    pub trending: Vec<CatalogItem>,
    pub generated_at: DateTime<Utc>,
}
