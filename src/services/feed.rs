use std::collections::HashSet;

use chrono::{DateTime, Utc};

use crate::{
    models::{timestamp::parse_timestamp, Action, Catalog, CatalogItem, Feed, UserProfile},
    services::recommendations::recommend,
};

pub const FEED_RECOMMENDATIONS: usize = 5;
pub const CONTINUE_READING_LIMIT: usize = 3;
pub const NEW_IN_GENRES_LIMIT: usize = 5;
pub const TRENDING_LIMIT: usize = 5;

/// How far back an `added_date` may be for an item to count as new
pub const NEW_RELEASE_WINDOW_DAYS: i64 = 30;

/// Assembles the personalized feed as of now
pub fn build_feed(profile: &UserProfile, catalog: &Catalog) -> Feed {
    build_feed_at(profile, catalog, Utc::now())
}

/// Assembles the personalized feed as of `now`
pub fn build_feed_at(profile: &UserProfile, catalog: &Catalog, now: DateTime<Utc>) -> Feed {
    let feed = Feed {
        recommendations: owned(recommend(profile, catalog, FEED_RECOMMENDATIONS)),
        continue_reading: owned(continue_reading(profile, catalog)),
        new_in_genres: owned(new_in_genres(profile, catalog, now)),
        trending: owned(trending(catalog)),
        generated_at: now,
    };

    tracing::debug!(
        recommendations = feed.recommendations.len(),
        continue_reading = feed.continue_reading.len(),
        new_in_genres = feed.new_in_genres.len(),
        trending = feed.trending.len(),
        "Assembled feed"
    );

    feed
}

/// Items the user started and has not completed, in the order they were first started
pub fn continue_reading<'a>(profile: &UserProfile, catalog: &'a Catalog) -> Vec<&'a CatalogItem> {
    let completed: HashSet<&str> = profile
        .history
        .iter()
        .filter(|h| h.action == Action::Completed)
        .map(|h| h.item_id.as_str())
        .collect();

    let mut seen = HashSet::new();
    profile
        .history
        .iter()
        .filter(|h| h.action == Action::Started)
        .map(|h| h.item_id.as_str())
        .filter(|id| !completed.contains(id) && seen.insert(*id))
        .filter_map(|id| catalog.find_by_id(id))
        .take(CONTINUE_READING_LIMIT)
        .collect()
}

/// Recently added items sharing a genre with the user's preferred genres
///
/// Items without a parseable `added_date` are left out.
pub fn new_in_genres<'a>(
    profile: &UserProfile,
    catalog: &'a Catalog,
    now: DateTime<Utc>,
) -> Vec<&'a CatalogItem> {
    let genres = &profile.preferences.genres;

    catalog
        .items()
        .iter()
        .filter(|item| item.has_any_genre(genres))
        .filter(|item| {
            item.added_date
                .as_deref()
                .and_then(parse_timestamp)
                .is_some_and(|added| (now - added).num_days() <= NEW_RELEASE_WINDOW_DAYS)
        })
        .take(NEW_IN_GENRES_LIMIT)
        .collect()
}

/// Items with the most recent views, highest first
pub fn trending(catalog: &Catalog) -> Vec<&CatalogItem> {
    let mut books: Vec<&CatalogItem> = catalog.items().iter().collect();
    books.sort_by(|a, b| b.recent_views.total_cmp(&a.recent_views));
    books.truncate(TRENDING_LIMIT);
    books
}

fn owned(items: Vec<&CatalogItem>) -> Vec<CatalogItem> {
    items.into_iter().cloned().collect()
}
