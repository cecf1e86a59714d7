use crate::cli::GlobalFlags;
use crate::cli::root_commands::RespondArgs;
use crate::commands::shared::Created;
use crate::commands::shared::parse::parse_answer;
use crate::context::AppContext;
use crate::output::output;

/// Handle `canvass respond`.
pub async fn handle(args: &RespondArgs, ctx: &AppContext, flags: &GlobalFlags) -> anyhow::Result<()> {
    if args.answers.is_empty() {
        anyhow::bail!("at least one --answer is required");
    }
    let answers = args
        .answers
        .iter()
        .map(|raw| parse_answer(raw))
        .collect::<anyhow::Result<Vec<_>>>()?;
    let id = ctx
        .service
        .submit_raw(&args.survey_id, args.name.clone(), &answers)
        .await?;
    output(&Created { id }, flags.format)
}

/// Handle `canvass responses`.
pub async fn list(survey_id: &str, ctx: &AppContext, flags: &GlobalFlags) -> anyhow::Result<()> {
    output(&ctx.service.responses(survey_id).await?, flags.format)
}

/// Handle `canvass results`.
pub async fn results(survey_id: &str, ctx: &AppContext, flags: &GlobalFlags) -> anyhow::Result<()> {
    output(&ctx.service.results(survey_id).await?, flags.format)
}
