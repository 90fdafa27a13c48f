use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

/// Insights derived from a user's interaction history
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(untagged)]
pub enum AnalysisReport {
    Summary(PreferenceSummary),
    /// Returned when the history is empty
    InsufficientData {
        message: String,
        recommendations: Vec<String>,
    },
}

impl AnalysisReport {
    pub fn insufficient_data() -> Self {
        AnalysisReport::InsufficientData {
            message: "Not enough data to analyze preferences".to_string(),
            recommendations: vec![
                "Start reading books to get personalized recommendations".to_string(),
            ],
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct PreferenceSummary {
    /// Up to three most frequent genres, most frequent first
    pub top_genres: Vec<String>,
    /// Interaction count per action tag
    pub reading_patterns: BTreeMap<String, usize>,
    pub average_rating_given: f64,
    pub total_books_interacted: usize,
    pub suggestions: Vec<String>,
}
