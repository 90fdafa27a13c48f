pub mod catalog_store;
pub mod profile_store;

pub use catalog_store::CatalogStore;
pub use profile_store::ProfileStore;

use crate::{
    error::AppResult,
    models::{UserId, UserProfile},
};

/// Whole-document persistence for user profiles
///
/// There is no partial update: callers load, mutate, and save the entire profile.
/// Implementations do not coordinate concurrent writers for the same user.
#[cfg_attr(test, mockall::automock)]
pub trait ProfileRepository: Send + Sync {
    /// Returns the stored profile, or a fresh default one when none exists
    fn load(&self, user_id: &UserId) -> AppResult<UserProfile>;

    /// Overwrites the stored profile
    fn save(&self, user_id: &UserId, profile: &UserProfile) -> AppResult<()>;
}
