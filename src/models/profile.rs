use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};
use std::{
    collections::{BTreeMap, HashSet},
    fmt::Display,
    str::FromStr,
};

use super::{timestamp, Action, Interaction};
use crate::error::{AppError, AppResult};

pub const DEFAULT_READING_LEVEL: &str = "general";

/// Lowest and highest rating a user can give
pub const RATING_RANGE: std::ops::RangeInclusive<u8> = 1..=5;

/// Preference categories a profile recognizes
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "snake_case")]
pub enum PreferenceCategory {
    Genres,
    Authors,
    Themes,
    ReadingLevel,
    FormatPreference,
}

impl PreferenceCategory {
    pub fn as_str(&self) -> &'static str {
        match self {
            PreferenceCategory::Genres => "genres",
            PreferenceCategory::Authors => "authors",
            PreferenceCategory::Themes => "themes",
            PreferenceCategory::ReadingLevel => "reading_level",
            PreferenceCategory::FormatPreference => "format_preference",
        }
    }
}

impl FromStr for PreferenceCategory {
    type Err = AppError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "genres" => Ok(PreferenceCategory::Genres),
            "authors" => Ok(PreferenceCategory::Authors),
            "themes" => Ok(PreferenceCategory::Themes),
            "reading_level" => Ok(PreferenceCategory::ReadingLevel),
            "format_preference" => Ok(PreferenceCategory::FormatPreference),
            other => Err(AppError::InvalidInput(format!(
                "Unknown preference category: {}",
                other
            ))),
        }
    }
}

impl Display for PreferenceCategory {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

fn default_reading_level() -> String {
    DEFAULT_READING_LEVEL.to_string()
}

fn default_format_preference() -> Vec<String> {
    vec!["digital".to_string(), "audio".to_string()]
}

/// Taste preferences of a single user
///
/// List-valued categories keep insertion order and never hold a value twice.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct Preferences {
    #[serde(default)]
    pub genres: Vec<String>,
    #[serde(default)]
    pub authors: Vec<String>,
    #[serde(default)]
    pub themes: Vec<String>,
    #[serde(default = "default_reading_level")]
    pub reading_level: String,
    #[serde(default = "default_format_preference")]
    pub format_preference: Vec<String>,
    /// Keys this version does not know about, preserved on save
    #[serde(flatten)]
    pub extra: Map<String, Value>,
}

impl Default for Preferences {
    fn default() -> Self {
        Self {
            genres: Vec::new(),
            authors: Vec::new(),
            themes: Vec::new(),
            reading_level: default_reading_level(),
            format_preference: default_format_preference(),
            extra: Map::new(),
        }
    }
}

impl Preferences {
    /// Adds a value to a list category, or overwrites the scalar `reading_level`.
    ///
    /// Returns whether the preferences changed.
    pub fn add(&mut self, category: PreferenceCategory, value: &str) -> bool {
        let list = match category {
            PreferenceCategory::Genres => &mut self.genres,
            PreferenceCategory::Authors => &mut self.authors,
            PreferenceCategory::Themes => &mut self.themes,
            PreferenceCategory::FormatPreference => &mut self.format_preference,
            PreferenceCategory::ReadingLevel => {
                let changed = self.reading_level != value;
                self.reading_level = value.to_string();
                return changed;
            }
        };

        if list.iter().any(|existing| existing == value) {
            return false;
        }
        list.push(value.to_string());
        true
    }
}

/// The persisted preference/history/rating/bookmark record for one user
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct UserProfile {
    #[serde(default)]
    pub preferences: Preferences,
    #[serde(default)]
    pub history: Vec<Interaction>,
    #[serde(default)]
    pub ratings: BTreeMap<String, u8>,
    #[serde(default)]
    pub bookmarks: Vec<String>,
    #[serde(default = "Utc::now", with = "timestamp::lenient")]
    pub created_at: DateTime<Utc>,
    #[serde(flatten)]
    pub extra: Map<String, Value>,
}

impl Default for UserProfile {
    fn default() -> Self {
        Self::new()
    }
}

impl UserProfile {
    /// Creates an empty profile stamped with the current time
    pub fn new() -> Self {
        Self {
            preferences: Preferences::default(),
            history: Vec::new(),
            ratings: BTreeMap::new(),
            bookmarks: Vec::new(),
            created_at: Utc::now(),
            extra: Map::new(),
        }
    }

    /// Adds a preference value (idempotent for list categories)
    pub fn add_preference(&mut self, category: PreferenceCategory, value: &str) -> bool {
        self.preferences.add(category, value)
    }

    /// Appends an interaction to the history
    ///
    /// A rating, when given, must be within 1..=5 and replaces any earlier rating for the item.
    /// A `bookmarked` action also adds the item to the bookmarks.
    pub fn record_interaction(
        &mut self,
        item_id: &str,
        action: Action,
        rating: Option<u8>,
    ) -> AppResult<()> {
        if let Some(value) = rating {
            if !RATING_RANGE.contains(&value) {
                return Err(AppError::InvalidInput(format!(
                    "Rating must be between 1 and 5, got {}",
                    value
                )));
            }
        }
        if item_id.trim().is_empty() {
            return Err(AppError::InvalidInput("Item id must not be empty".to_string()));
        }

        if let Some(value) = rating {
            self.ratings.insert(item_id.to_string(), value);
        }

        if action == Action::Bookmarked && !self.bookmarks.iter().any(|b| b == item_id) {
            self.bookmarks.push(item_id.to_string());
        }

        self.history.push(Interaction::new(item_id, action, rating));
        Ok(())
    }

    /// Ids of every item the user has interacted with
    pub fn interacted_ids(&self) -> HashSet<&str> {
        self.history.iter().map(|h| h.item_id.as_str()).collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_new_profile_defaults() {
        let profile = UserProfile::new();
        assert!(profile.preferences.genres.is_empty());
        assert!(profile.preferences.authors.is_empty());
        assert!(profile.preferences.themes.is_empty());
        assert_eq!(profile.preferences.reading_level, "general");
        assert_eq!(profile.preferences.format_preference, vec!["digital", "audio"]);
        assert!(profile.history.is_empty());
        assert!(profile.ratings.is_empty());
        assert!(profile.bookmarks.is_empty());
    }

    #[test]
    fn test_add_preference_is_idempotent() {
        let mut profile = UserProfile::new();
        assert!(profile.add_preference(PreferenceCategory::Genres, "scifi"));
        assert!(!profile.add_preference(PreferenceCategory::Genres, "scifi"));
        assert!(profile.add_preference(PreferenceCategory::Genres, "fantasy"));
        assert_eq!(profile.preferences.genres, vec!["scifi", "fantasy"]);
    }

    #[test]
    fn test_add_preference_overwrites_reading_level() {
        let mut profile = UserProfile::new();
        profile.add_preference(PreferenceCategory::ReadingLevel, "advanced");
        assert_eq!(profile.preferences.reading_level, "advanced");
    }

    #[test]
    fn test_add_format_preference_skips_existing() {
        let mut profile = UserProfile::new();
        assert!(!profile.add_preference(PreferenceCategory::FormatPreference, "audio"));
        assert!(profile.add_preference(PreferenceCategory::FormatPreference, "print"));
        assert_eq!(
            profile.preferences.format_preference,
            vec!["digital", "audio", "print"]
        );
    }

    #[test]
    fn test_category_parse() {
        assert_eq!(
            "format_preference".parse::<PreferenceCategory>().unwrap(),
            PreferenceCategory::FormatPreference
        );
        assert!(matches!(
            "moods".parse::<PreferenceCategory>(),
            Err(AppError::InvalidInput(_))
        ));
    }

    #[test]
    fn test_rating_last_write_wins() {
        let mut profile = UserProfile::new();
        profile.record_interaction("b1", Action::Rated, Some(2)).unwrap();
        profile.record_interaction("b1", Action::Rated, Some(5)).unwrap();
        assert_eq!(profile.ratings.get("b1"), Some(&5));
        assert_eq!(profile.history.len(), 2);
        assert_eq!(profile.history[0].rating, Some(2));
        assert_eq!(profile.history[1].rating, Some(5));
    }

    #[test]
    fn test_rating_out_of_range_is_rejected() {
        let mut profile = UserProfile::new();
        let result = profile.record_interaction("b1", Action::Rated, Some(6));
        assert!(matches!(result, Err(AppError::InvalidInput(_))));
        let result = profile.record_interaction("b1", Action::Rated, Some(0));
        assert!(matches!(result, Err(AppError::InvalidInput(_))));
        assert!(profile.history.is_empty());
        assert!(profile.ratings.is_empty());
    }

    #[test]
    fn test_bookmark_added_once() {
        let mut profile = UserProfile::new();
        profile.record_interaction("b1", Action::Bookmarked, None).unwrap();
        profile.record_interaction("b1", Action::Bookmarked, None).unwrap();
        assert_eq!(profile.bookmarks, vec!["b1"]);
        assert_eq!(profile.history.len(), 2);
    }

    #[test]
    fn test_missing_fields_resolve_to_defaults() {
        let profile: UserProfile = serde_json::from_str("{}").unwrap();
        assert_eq!(profile.preferences, Preferences::default());
        assert!(profile.history.is_empty());
    }

    #[test]
    fn test_unknown_keys_survive_round_trip() {
        let json = r#"{
            "preferences": {"genres": ["scifi"], "moods": ["cozy"]},
            "history": [],
            "ratings": {"b1": 4},
            "bookmarks": [],
            "created_at": "2024-01-02T03:04:05.678901",
            "streak": 7
        }"#;
        let profile: UserProfile = serde_json::from_str(json).unwrap();
        assert_eq!(profile.preferences.reading_level, "general");

        let written = serde_json::to_value(&profile).unwrap();
        assert_eq!(written["preferences"]["moods"][0], "cozy");
        assert_eq!(written["streak"], 7);
        assert_eq!(written["ratings"]["b1"], 4);
    }
}
