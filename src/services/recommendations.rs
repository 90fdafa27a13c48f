use crate::{
    models::{Catalog, CatalogItem, UserProfile},
    services::scoring::relevance_score,
};

/// Number of recommendations returned when the caller does not ask for a specific count
pub const DEFAULT_LIMIT: usize = 5;

/// Ranks the catalog for `profile` and returns up to `limit` items
///
/// Items are ordered by relevance score, highest first, with catalog order breaking ties.
/// Anything already present in the user's history is excluded. An empty catalog takes the
/// popularity path, which yields nothing.
pub fn recommend<'a>(
    profile: &UserProfile,
    catalog: &'a Catalog,
    limit: usize,
) -> Vec<&'a CatalogItem> {
    if catalog.is_empty() {
        return popular(catalog, limit);
    }

    let mut scored: Vec<(&CatalogItem, u32)> = catalog
        .items()
        .iter()
        .map(|item| (item, relevance_score(profile, item)))
        .collect();

    // sort_by is stable, so equal scores keep catalog order
    scored.sort_by(|a, b| b.1.cmp(&a.1));

    let seen = profile.interacted_ids();
    let recommendations: Vec<&CatalogItem> = scored
        .into_iter()
        .filter(|(item, _)| !seen.contains(item.id.as_str()))
        .map(|(item, _)| item)
        .take(limit)
        .collect();

    tracing::debug!(
        catalog_size = catalog.len(),
        excluded = seen.len(),
        returned = recommendations.len(),
        "Computed recommendations"
    );

    recommendations
}

/// Default ranking by `(average_rating, popularity)`, highest first
pub fn popular(catalog: &Catalog, limit: usize) -> Vec<&CatalogItem> {
    let mut books: Vec<&CatalogItem> = catalog.items().iter().collect();
    books.sort_by(|a, b| {
        b.average_rating
            .total_cmp(&a.average_rating)
            .then_with(|| b.popularity.total_cmp(&a.popularity))
    });
    books.truncate(limit);
    books
}
