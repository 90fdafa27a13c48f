use std::sync::Arc;

use crate::{
    db::{CatalogStore, ProfileRepository},
    error::AppResult,
    models::{
        Action, AnalysisReport, Catalog, CatalogItem, Feed, PreferenceCategory, UserId,
        UserProfile,
    },
    services::{analysis, feed, recommendations},
};

/// Entry point tying the profile and catalog stores to the scoring services
///
/// Reads load the documents fresh on every call. Mutations load, change, and save the
/// whole profile document.
#[derive(Clone)]
pub struct PersonalizationEngine {
    profiles: Arc<dyn ProfileRepository>,
    catalog: CatalogStore,
}

impl PersonalizationEngine {
    pub fn new(profiles: Arc<dyn ProfileRepository>, catalog: CatalogStore) -> Self {
        Self { profiles, catalog }
    }

    pub fn profile(&self, user_id: &UserId) -> AppResult<UserProfile> {
        self.profiles.load(user_id)
    }

    pub fn catalog(&self) -> AppResult<Catalog> {
        self.catalog.load()
    }

    /// Top `limit` recommendations for the user
    pub fn recommend(&self, user_id: &UserId, limit: usize) -> AppResult<Vec<CatalogItem>> {
        let profile = self.profiles.load(user_id)?;
        let catalog = self.catalog.load()?;

        let items: Vec<CatalogItem> = recommendations::recommend(&profile, &catalog, limit)
            .into_iter()
            .cloned()
            .collect();

        tracing::info!(user_id = %user_id, count = items.len(), "Generated recommendations");
        Ok(items)
    }

    pub fn feed(&self, user_id: &UserId) -> AppResult<Feed> {
        let profile = self.profiles.load(user_id)?;
        let catalog = self.catalog.load()?;
        Ok(feed::build_feed(&profile, &catalog))
    }

    pub fn analyze(&self, user_id: &UserId) -> AppResult<AnalysisReport> {
        let profile = self.profiles.load(user_id)?;
        if profile.history.is_empty() {
            return Ok(AnalysisReport::insufficient_data());
        }
        let catalog = self.catalog.load()?;
        Ok(analysis::analyze(&profile, &catalog))
    }

    /// Adds a preference and saves the profile
    pub fn add_preference(
        &self,
        user_id: &UserId,
        category: PreferenceCategory,
        value: &str,
    ) -> AppResult<UserProfile> {
        let mut profile = self.profiles.load(user_id)?;
        let changed = profile.add_preference(category, value);
        self.profiles.save(user_id, &profile)?;

        tracing::info!(user_id = %user_id, category = %category, value, changed, "Preference added");
        Ok(profile)
    }

    /// Appends an interaction and saves the profile
    pub fn record_interaction(
        &self,
        user_id: &UserId,
        item_id: &str,
        action: Action,
        rating: Option<u8>,
    ) -> AppResult<UserProfile> {
        if action.is_unrecognized() {
            tracing::warn!(user_id = %user_id, action = %action, "Recording unrecognized action");
        }

        let mut profile = self.profiles.load(user_id)?;
        profile.record_interaction(item_id, action.clone(), rating)?;
        self.profiles.save(user_id, &profile)?;

        tracing::info!(user_id = %user_id, item_id, action = %action, "Interaction recorded");
        Ok(profile)
    }

    /// Records a `rated` interaction
    pub fn rate(&self, user_id: &UserId, item_id: &str, rating: u8) -> AppResult<UserProfile> {
        self.record_interaction(user_id, item_id, Action::Rated, Some(rating))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::db::{MockProfileRepository, ProfileStore};
    use crate::error::AppError;
    use mockall::predicate::eq;
    use std::fs;

    fn alice() -> UserId {
        "alice".parse().unwrap()
    }

    fn engine_with(repo: MockProfileRepository) -> PersonalizationEngine {
        PersonalizationEngine::new(
            Arc::new(repo),
            CatalogStore::new("/nonexistent/shelfwise/catalog.json"),
        )
    }

    #[test]
    fn test_rate_saves_whole_profile() {
        let mut repo = MockProfileRepository::new();
        repo.expect_load()
            .with(eq(alice()))
            .times(1)
            .returning(|_| Ok(UserProfile::new()));
        repo.expect_save()
            .withf(|user_id, profile| {
                user_id.as_str() == "alice"
                    && profile.history.len() == 1
                    && profile.history[0].action == Action::Rated
                    && profile.ratings.get("b1") == Some(&4)
            })
            .times(1)
            .returning(|_, _| Ok(()));

        let profile = engine_with(repo).rate(&alice(), "b1", 4).unwrap();
        assert_eq!(profile.ratings.get("b1"), Some(&4));
    }

    #[test]
    fn test_invalid_rating_is_not_saved() {
        let mut repo = MockProfileRepository::new();
        repo.expect_load().returning(|_| Ok(UserProfile::new()));
        repo.expect_save().times(0);

        let result = engine_with(repo).rate(&alice(), "b1", 9);
        assert!(matches!(result, Err(AppError::InvalidInput(_))));
    }

    #[test]
    fn test_add_preference_always_saves() {
        let mut repo = MockProfileRepository::new();
        repo.expect_load().times(2).returning(|_| {
            let mut profile = UserProfile::new();
            profile.add_preference(PreferenceCategory::Genres, "scifi");
            Ok(profile)
        });
        repo.expect_save()
            .withf(|_, profile| profile.preferences.genres == vec!["scifi".to_string()])
            .times(2)
            .returning(|_, _| Ok(()));

        let engine = engine_with(repo);
        engine
            .add_preference(&alice(), PreferenceCategory::Genres, "scifi")
            .unwrap();
        engine
            .add_preference(&alice(), PreferenceCategory::Genres, "scifi")
            .unwrap();
    }

    #[test]
    fn test_analyze_empty_history_skips_catalog() {
        let mut repo = MockProfileRepository::new();
        repo.expect_load().returning(|_| Ok(UserProfile::new()));

        let dir = tempfile::tempdir().unwrap();
        let catalog_path = dir.path().join("catalog.json");
        // A corrupt catalog would fail the call if it were read
        fs::write(&catalog_path, "not json").unwrap();

        let engine = PersonalizationEngine::new(Arc::new(repo), CatalogStore::new(catalog_path));
        assert_eq!(
            engine.analyze(&alice()).unwrap(),
            AnalysisReport::insufficient_data()
        );
    }

    #[test]
    fn test_end_to_end_with_file_stores() {
        let dir = tempfile::tempdir().unwrap();
        let catalog_path = dir.path().join("catalog.json");
        fs::write(
            &catalog_path,
            r#"{"books": [
                {"id": "A", "title": "Foundation", "author": "X", "genres": ["scifi"], "average_rating": 4.6},
                {"id": "B", "title": "Ledger", "author": "X", "genres": [], "average_rating": 3.0}
            ]}"#,
        )
        .unwrap();

        let engine = PersonalizationEngine::new(
            Arc::new(ProfileStore::new(dir.path())),
            CatalogStore::new(&catalog_path),
        );
        let user = alice();

        engine
            .add_preference(&user, PreferenceCategory::Genres, "scifi")
            .unwrap();
        let recs = engine.recommend(&user, 2).unwrap();
        let ids: Vec<&str> = recs.iter().map(|b| b.id.as_str()).collect();
        assert_eq!(ids, vec!["A", "B"]);

        engine
            .record_interaction(&user, "A", Action::Started, None)
            .unwrap();
        let feed = engine.feed(&user).unwrap();
        assert_eq!(feed.continue_reading.len(), 1);
        assert_eq!(feed.recommendations.len(), 1);
        assert_eq!(feed.recommendations[0].id, "B");

        let reloaded = engine.profile(&user).unwrap();
        assert_eq!(reloaded.preferences.genres, vec!["scifi"]);
        assert_eq!(reloaded.history.len(), 1);
    }
}
