use std::collections::{BTreeMap, HashSet};

use crate::models::{AnalysisReport, Catalog, PreferenceSummary, UserProfile};

const TOP_GENRE_COUNT: usize = 3;
const MIN_RATINGS_FOR_CONFIDENCE: usize = 5;

/// Summarizes the user's taste from their interaction history
///
/// An empty history short-circuits to the insufficient-data report without touching the catalog.
pub fn analyze(profile: &UserProfile, catalog: &Catalog) -> AnalysisReport {
    if profile.history.is_empty() {
        return AnalysisReport::insufficient_data();
    }

    let top_genres = top_genres(profile, catalog);

    let mut reading_patterns = BTreeMap::new();
    for interaction in &profile.history {
        *reading_patterns
            .entry(interaction.action.as_str().to_string())
            .or_insert(0) += 1;
    }

    let total_books_interacted = profile
        .history
        .iter()
        .map(|h| h.item_id.as_str())
        .collect::<HashSet<_>>()
        .len();

    let suggestions = suggestions(&top_genres, profile.ratings.len());

    AnalysisReport::Summary(PreferenceSummary {
        top_genres,
        reading_patterns,
        average_rating_given: average_rating(profile),
        total_books_interacted,
        suggestions,
    })
}

/// Most frequent genres across interacted items; ties keep first-seen order
fn top_genres(profile: &UserProfile, catalog: &Catalog) -> Vec<String> {
    let mut counts: Vec<(&str, usize)> = Vec::new();

    for interaction in &profile.history {
        let Some(item) = catalog.find_by_id(&interaction.item_id) else {
            continue;
        };
        for genre in &item.genres {
            match counts.iter_mut().find(|(g, _)| *g == genre.as_str()) {
                Some((_, count)) => *count += 1,
                None => counts.push((genre.as_str(), 1)),
            }
        }
    }

    counts.sort_by(|a, b| b.1.cmp(&a.1));
    counts
        .into_iter()
        .take(TOP_GENRE_COUNT)
        .map(|(genre, _)| genre.to_string())
        .collect()
}

/// Mean of all given ratings rounded to two decimals, 0 when there are none
fn average_rating(profile: &UserProfile) -> f64 {
    if profile.ratings.is_empty() {
        return 0.0;
    }
    let total: u32 = profile.ratings.values().map(|&r| u32::from(r)).sum();
    let mean = f64::from(total) / profile.ratings.len() as f64;
    (mean * 100.0).round() / 100.0
}

fn suggestions(top_genres: &[String], rating_count: usize) -> Vec<String> {
    let mut suggestions = Vec::new();

    match top_genres.first() {
        None => suggestions
            .push("Explore different genres to get better recommendations".to_string()),
        Some(favorite) if top_genres.len() < TOP_GENRE_COUNT => suggestions.push(format!(
            "You seem to like {} - try exploring similar genres",
            favorite
        )),
        Some(_) => {}
    }

    if rating_count < MIN_RATINGS_FOR_CONFIDENCE {
        suggestions.push("Rate more books to improve recommendations".to_string());
    }

    suggestions
}
