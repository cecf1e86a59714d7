use std::path::PathBuf;

use canvass_core::enums::SurveyStatus;
use chrono::{DateTime, Utc};
use clap::Subcommand;

use crate::commands::shared::parse::parse_when;

/// Survey commands.
#[derive(Clone, Debug, Subcommand)]
pub enum SurveyCommands {
    /// Create an empty draft owned by the configured user.
    Create {
        #[arg(long)]
        title: String,
        #[arg(long)]
        description: Option<String>,
        /// RFC 3339 timestamp or YYYY-MM-DD.
        #[arg(long, value_parser = parse_when)]
        starts_at: Option<DateTime<Utc>>,
        #[arg(long, value_parser = parse_when)]
        ends_at: Option<DateTime<Utc>>,
    },
    /// Get a survey by ID.
    Get {
        id: String,
        /// Include the ordered question list.
        #[arg(long)]
        questions: bool,
    },
    /// List your surveys.
    List,
    /// Write a stored survey to a draft file for editing.
    Export {
        id: String,
        /// Draft file (.json or .toml).
        #[arg(long)]
        file: PathBuf,
    },
    /// Save a draft file as one aggregate write and record the saved IDs in it.
    Save {
        /// Draft file (.json or .toml).
        #[arg(long)]
        file: PathBuf,
    },
    /// Publish a survey. Window bounds default to the stored ones.
    Publish {
        id: String,
        #[arg(long, value_parser = parse_when)]
        starts_at: Option<DateTime<Utc>>,
        #[arg(long, value_parser = parse_when)]
        ends_at: Option<DateTime<Utc>>,
    },
    /// Stop accepting responses.
    Close { id: String },
    /// Take a published survey back to draft.
    Unpublish { id: String },
    /// Set the status directly, skipping lifecycle checks.
    Status { id: String, status: SurveyStatus },
    /// Delete a survey with its questions and responses.
    Delete { id: String },
}
