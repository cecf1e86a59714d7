use crate::cli::GlobalFlags;
use crate::cli::root_commands::Commands;
use crate::commands;
use crate::context::AppContext;

/// Dispatch a parsed command to the corresponding handler module.
pub async fn dispatch(command: Commands, ctx: &AppContext, flags: &GlobalFlags) -> anyhow::Result<()> {
    match command {
        Commands::Survey { action } => commands::survey::handle(&action, ctx, flags).await,
        Commands::Question { action } => commands::question::handle(&action, ctx, flags).await,
        Commands::Respond(args) => commands::respond::handle(&args, ctx, flags).await,
        Commands::Responses { survey_id } => commands::respond::list(&survey_id, ctx, flags).await,
        Commands::Results { survey_id } => commands::respond::results(&survey_id, ctx, flags).await,
    }
}
