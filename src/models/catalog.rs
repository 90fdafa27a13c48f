use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

/// A recommendable item (a book) from the shared catalog
///
/// Every field is optional in the document; absent fields resolve to empty or zero here.
#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq)]
#[serde(default)]
pub struct CatalogItem {
    pub id: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub title: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub author: Option<String>,
    pub genres: Vec<String>,
    pub themes: Vec<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub reading_level: Option<String>,
    pub formats: Vec<String>,
    pub average_rating: f64,
    pub popularity: f64,
    pub recent_views: f64,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub added_date: Option<String>,
    #[serde(flatten)]
    pub extra: Map<String, Value>,
}

impl CatalogItem {
    /// Author name, or an empty string when absent
    pub fn author_name(&self) -> &str {
        self.author.as_deref().unwrap_or_default()
    }

    /// Reading level, or an empty string when absent
    pub fn level(&self) -> &str {
        self.reading_level.as_deref().unwrap_or_default()
    }

    /// Title for display, `Unknown` when absent
    pub fn display_title(&self) -> &str {
        self.title.as_deref().unwrap_or("Unknown")
    }

    /// Author for display, `Unknown` when absent
    pub fn display_author(&self) -> &str {
        self.author.as_deref().unwrap_or("Unknown")
    }

    pub fn has_any_genre(&self, genres: &[String]) -> bool {
        self.genres.iter().any(|g| genres.contains(g))
    }
}

/// The shared, read-only collection of recommendable items
#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq)]
pub struct Catalog {
    #[serde(default)]
    pub books: Vec<CatalogItem>,
    #[serde(flatten)]
    pub extra: Map<String, Value>,
}

impl Catalog {
    pub fn new(books: Vec<CatalogItem>) -> Self {
        Self {
            books,
            extra: Map::new(),
        }
    }

    pub fn is_empty(&self) -> bool {
        self.books.is_empty()
    }

    pub fn len(&self) -> usize {
        self.books.len()
    }

    pub fn items(&self) -> &[CatalogItem] {
        &self.books
    }

    /// Looks up an item by id (first match in catalog order)
    pub fn find_by_id(&self, id: &str) -> Option<&CatalogItem> {
        self.books.iter().find(|book| book.id == id)
    }
}
