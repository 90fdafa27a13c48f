use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::{convert::Infallible, fmt::Display, str::FromStr};

use super::timestamp;

/// What the user did with an item
///
/// Unrecognized tags are kept verbatim in `Other` so documents round-trip.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(from = "String", into = "String")]
pub enum Action {
    Viewed,
    Started,
    Completed,
    Bookmarked,
    Rated,
    Other(String),
}

impl Action {
    pub fn as_str(&self) -> &str {
        match self {
            Action::Viewed => "viewed",
            Action::Started => "started",
            Action::Completed => "completed",
            Action::Bookmarked => "bookmarked",
            Action::Rated => "rated",
            Action::Other(tag) => tag,
        }
    }

    /// True for the `Other` variant
    pub fn is_unrecognized(&self) -> bool {
        matches!(self, Action::Other(_))
    }
}

impl From<String> for Action {
    fn from(tag: String) -> Self {
        match tag.as_str() {
            "viewed" => Action::Viewed,
            "started" => Action::Started,
            "completed" => Action::Completed,
            "bookmarked" => Action::Bookmarked,
            "rated" => Action::Rated,
            _ => Action::Other(tag),
        }
    }
}

impl From<Action> for String {
    fn from(action: Action) -> Self {
        match action {
            Action::Other(tag) => tag,
            known => known.as_str().to_string(),
        }
    }
}

impl FromStr for Action {
    type Err = Infallible;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Ok(Action::from(s.to_string()))
    }
}

impl Display for Action {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

/// One timestamped record of a user action against a catalog item
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct Interaction {
    #[serde(alias = "book_id")]
    pub item_id: String,
    pub action: Action,
    #[serde(with = "timestamp::lenient")]
    pub timestamp: DateTime<Utc>,
    #[serde(default)]
    pub rating: Option<u8>,
}

impl Interaction {
    pub fn new(item_id: impl Into<String>, action: Action, rating: Option<u8>) -> Self {
        Self {
            item_id: item_id.into(),
            action,
            timestamp: Utc::now(),
            rating,
        }
    }
}
