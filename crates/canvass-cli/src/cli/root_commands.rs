use clap::{Args, Subcommand};

use crate::cli::subcommands::{QuestionCommands, SurveyCommands};

/// Top-level command tree.
#[derive(Clone, Debug, Subcommand)]
pub enum Commands {
    /// Surveys.
    Survey {
        #[command(subcommand)]
        action: SurveyCommands,
    },
    /// Questions.
    Question {
        #[command(subcommand)]
        action: QuestionCommands,
    },
    /// Submit a response to an open survey.
    Respond(RespondArgs),
    /// List submitted responses (owner only).
    Responses { survey_id: String },
    /// Per-question result summaries.
    Results { survey_id: String },
}

#[derive(Clone, Debug, Args)]
pub struct RespondArgs {
    pub survey_id: String,
    /// Respondent display name.
    #[arg(long)]
    pub name: Option<String>,
    /// `QUESTION_ID=VALUE`; VALUE is JSON when it parses, text otherwise.
    /// Repeat once per answered question.
    #[arg(long = "answer", value_name = "QUESTION_ID=VALUE")]
    pub answers: Vec<String>,
}
