use std::io::Write;
use std::path::PathBuf;

use clap::{Parser, Subcommand};

use crate::config::Config;
use crate::error::{AppError, AppResult};
use crate::models::{Action, PreferenceCategory, UserId};
use crate::services::{PersonalizationEngine, DEFAULT_LIMIT};

#[derive(Debug, Parser)]
#[command(name = "shelfwise")]
#[command(about = "Personalized book recommendations and reading preference tracking")]
pub struct Cli {
    /// User id (defaults to SHELFWISE_DEFAULT_USER or `anonymous`)
    #[arg(short, long)]
    pub user: Option<String>,

    /// Directory holding profiles and the catalog (overrides SHELFWISE_DATA_DIR)
    #[arg(long)]
    pub data_dir: Option<PathBuf>,

    #[command(subcommand)]
    pub command: Option<Command>,
}

#[derive(Debug, Clone, PartialEq, Subcommand)]
pub enum Command {
    /// Print the top recommendations
    Recommend {
        #[arg(short, long, default_value_t = DEFAULT_LIMIT)]
        limit: usize,
    },
    /// Print the personalized feed as JSON
    Feed,
    /// Print the preference analysis as JSON
    Analyze,
    /// Rate a book from 1 to 5
    Rate {
        #[arg(long)]
        book_id: Option<String>,
        #[arg(long)]
        rating: Option<u8>,
    },
    /// Add a preference (genres, authors, themes, reading_level, format_preference)
    Prefer { category: String, value: String },
    /// Record an interaction such as viewed, started, completed or bookmarked
    Record {
        #[arg(long)]
        book_id: String,
        #[arg(long)]
        action: Action,
        #[arg(long)]
        rating: Option<u8>,
    },
    /// Serve the HTTP API
    Serve,
}

impl Default for Command {
    fn default() -> Self {
        Command::Recommend {
            limit: DEFAULT_LIMIT,
        }
    }
}

impl Cli {
    /// Applies command line overrides on top of the environment configuration
    pub fn apply(&self, config: &mut Config) {
        if let Some(dir) = &self.data_dir {
            config.data_dir = dir.clone();
        }
        if let Some(user) = &self.user {
            config.default_user = user.clone();
        }
    }
}

/// Exit status for invalid user input
pub const USAGE_ERROR: u8 = 2;

/// Exit status and stderr message for a failed run
///
/// User mistakes print bare and exit with `USAGE_ERROR`; anything else exits with 1.
pub fn failure_report(err: &anyhow::Error) -> (u8, String) {
    match err.downcast_ref::<AppError>() {
        Some(AppError::InvalidInput(msg)) => (USAGE_ERROR, msg.clone()),
        _ => (1, format!("Error: {:#}", err)),
    }
}

/// Runs a one-shot command, writing its report to `out`
///
/// User mistakes come back as `AppError::InvalidInput` for the caller to report.
pub fn execute(
    engine: &PersonalizationEngine,
    user_id: &UserId,
    command: Command,
    out: &mut dyn Write,
) -> AppResult<()> {
    match command {
        Command::Recommend { limit } => {
            let items = engine.recommend(user_id, limit)?;
            writeln!(out, "Personalized Recommendations:")?;
            for (i, item) in items.iter().enumerate() {
                writeln!(
                    out,
                    "{}. {} by {}",
                    i + 1,
                    item.display_title(),
                    item.display_author()
                )?;
            }
        }
        Command::Feed => {
            let feed = engine.feed(user_id)?;
            writeln!(out, "Your Personalized Feed:")?;
            writeln!(out, "{}", serde_json::to_string_pretty(&feed)?)?;
        }
        Command::Analyze => {
            let report = engine.analyze(user_id)?;
            writeln!(out, "Preference Analysis:")?;
            writeln!(out, "{}", serde_json::to_string_pretty(&report)?)?;
        }
        Command::Rate { book_id, rating } => {
            let (Some(book_id), Some(rating)) = (book_id, rating) else {
                return Err(AppError::InvalidInput(
                    "Please provide --book-id and --rating".to_string(),
                ));
            };
            engine.rate(user_id, &book_id, rating)?;
            writeln!(out, "Rated book {}: {}/5", book_id, rating)?;
        }
        Command::Prefer { category, value } => {
            let category: PreferenceCategory = category.parse()?;
            let profile = engine.add_preference(user_id, category, &value)?;
            writeln!(
                out,
                "Preferences updated:\n{}",
                serde_json::to_string_pretty(&profile.preferences)?
            )?;
        }
        Command::Record {
            book_id,
            action,
            rating,
        } => {
            engine.record_interaction(user_id, &book_id, action.clone(), rating)?;
            writeln!(out, "Recorded {} for book {}", action, book_id)?;
        }
        Command::Serve => {
            return Err(AppError::Internal(
                "serve runs the HTTP server and is not a one-shot command".to_string(),
            ));
        }
    }

    Ok(())
}
