use std::collections::HashSet;

use crate::models::{CatalogItem, UserProfile};

pub const GENRE_WEIGHT: u32 = 3;
pub const AUTHOR_WEIGHT: u32 = 4;
pub const THEME_WEIGHT: u32 = 2;
pub const READING_LEVEL_WEIGHT: u32 = 2;
pub const FORMAT_WEIGHT: u32 = 1;
pub const TOP_RATED_BONUS: u32 = 5;
pub const WELL_RATED_BONUS: u32 = 3;

const TOP_RATED_THRESHOLD: f64 = 4.5;
const WELL_RATED_THRESHOLD: f64 = 4.0;

/// Computes the additive relevance score of `item` for `profile`
///
/// Terms, each independent of the others:
/// - genres shared with the preferred genres, `GENRE_WEIGHT` each
/// - `AUTHOR_WEIGHT` when the author is a preferred author
/// - themes shared with the preferred themes, `THEME_WEIGHT` each
/// - `READING_LEVEL_WEIGHT` when the reading level matches
/// - formats shared with the preferred formats, `FORMAT_WEIGHT` each
/// - a rating bonus: `TOP_RATED_BONUS` at 4.5 and above, else `WELL_RATED_BONUS` at 4.0 and above
pub fn relevance_score(profile: &UserProfile, item: &CatalogItem) -> u32 {
    let prefs = &profile.preferences;
    let mut score = 0;

    score += overlap(&item.genres, &prefs.genres) * GENRE_WEIGHT;

    if prefs.authors.iter().any(|a| a == item.author_name()) {
        score += AUTHOR_WEIGHT;
    }

    score += overlap(&item.themes, &prefs.themes) * THEME_WEIGHT;

    if item.level() == prefs.reading_level {
        score += READING_LEVEL_WEIGHT;
    }

    score += overlap(&item.formats, &prefs.format_preference) * FORMAT_WEIGHT;

    score + rating_bonus(item.average_rating)
}

fn rating_bonus(average_rating: f64) -> u32 {
    if average_rating >= TOP_RATED_THRESHOLD {
        TOP_RATED_BONUS
    } else if average_rating >= WELL_RATED_THRESHOLD {
        WELL_RATED_BONUS
    } else {
        0
    }
}

/// Number of distinct values of `values` that also appear in `preferred`
fn overlap(values: &[String], preferred: &[String]) -> u32 {
    let distinct: HashSet<&str> = values.iter().map(String::as_str).collect();
    distinct
        .into_iter()
        .filter(|v| preferred.iter().any(|p| p == v))
        .count() as u32
}
