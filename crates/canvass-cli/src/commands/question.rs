use canvass_core::entities::QuestionInput;

use crate::cli::GlobalFlags;
use crate::cli::subcommands::QuestionCommands;
use crate::commands::shared::Created;
use crate::context::AppContext;
use crate::output::output;

/// Handle `canvass question`.
pub async fn handle(
    action: &QuestionCommands,
    ctx: &AppContext,
    flags: &GlobalFlags,
) -> anyhow::Result<()> {
    match action {
        QuestionCommands::Add {
            survey_id,
            kind,
            title,
            text,
            options,
            min,
            max,
            step,
        } => {
            let question = QuestionInput {
                text: text.clone(),
                options: (!options.is_empty()).then(|| options.clone()),
                min: *min,
                max: *max,
                step: *step,
                ..QuestionInput::new(*kind, title.clone())
            };
            let id = ctx.service.append_question(survey_id, question).await?;
            output(&Created { id }, flags.format)
        }
        QuestionCommands::List { survey_id } => {
            output(&ctx.service.list_questions(survey_id).await?, flags.format)
        }
    }
}
