pub mod analysis;
pub mod engine;
pub mod feed;
pub mod recommendations;
pub mod scoring;

pub use analysis::analyze;
pub use engine::PersonalizationEngine;
pub use feed::{build_feed, build_feed_at};
pub use recommendations::{popular, recommend, DEFAULT_LIMIT};
pub use scoring::relevance_score;
