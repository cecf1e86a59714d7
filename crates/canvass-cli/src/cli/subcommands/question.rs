use canvass_core::enums::QuestionType;
use clap::Subcommand;

/// Question commands.
#[derive(Clone, Debug, Subcommand)]
pub enum QuestionCommands {
    /// Append a question after the survey's last one.
    Add {
        survey_id: String,
        #[arg(long = "type")]
        kind: QuestionType,
        #[arg(long)]
        title: String,
        #[arg(long)]
        text: Option<String>,
        /// Repeat for each option (radio, multiple, dragdrop).
        #[arg(long = "option")]
        options: Vec<String>,
        #[arg(long)]
        min: Option<f64>,
        #[arg(long)]
        max: Option<f64>,
        #[arg(long)]
        step: Option<f64>,
    },
    /// List a survey's questions in order.
    List { survey_id: String },
}
