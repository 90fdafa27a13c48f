pub mod analysis;
pub mod catalog;
pub mod feed;
pub mod interaction;
pub mod profile;
pub mod timestamp;
pub mod user_id;

pub use analysis::{AnalysisReport, PreferenceSummary};
pub use catalog::{Catalog, CatalogItem};
pub use feed::Feed;
pub use interaction::{Action, Interaction};
pub use profile::{PreferenceCategory, Preferences, UserProfile, DEFAULT_READING_LEVEL};
pub use user_id::UserId;
