use anyhow::Context;
use canvass_core::entities::NewSurvey;
use serde::Serialize;

use crate::cli::GlobalFlags;
use crate::cli::subcommands::SurveyCommands;
use crate::commands::shared::draft_file::{read_draft, write_draft};
use crate::commands::shared::{Created, Done};
use crate::context::AppContext;
use crate::output::output;

#[derive(Serialize)]
struct Saved<'a> {
    survey_id: &'a str,
    question_ids: Vec<String>,
    file: String,
}

/// Handle `canvass survey`.
pub async fn handle(
    action: &SurveyCommands,
    ctx: &AppContext,
    flags: &GlobalFlags,
) -> anyhow::Result<()> {
    let service = &ctx.service;
    match action {
        SurveyCommands::Create {
            title,
            description,
            starts_at,
            ends_at,
        } => {
            let survey = NewSurvey {
                owner_id: String::new(),
                title: title.clone(),
                description: description.clone(),
                starts_at: *starts_at,
                ends_at: *ends_at,
            };
            let id = service.create_draft(survey).await?;
            output(&Created { id }, flags.format)
        }
        SurveyCommands::Get { id, questions } => {
            if *questions {
                output(&service.get_with_questions(id).await?, flags.format)
            } else {
                output(&service.get(id).await?, flags.format)
            }
        }
        SurveyCommands::List => output(&service.list_mine().await?, flags.format),
        SurveyCommands::Export { id, file } => {
            let draft = service.load_draft(id).await?;
            write_draft(file, &draft)?;
            output(&draft, flags.format)
        }
        SurveyCommands::Save { file } => {
            let mut draft = read_draft(file)?;
            let question_ids = service.save_draft(&mut draft).await?;
            let survey_id = draft.survey_id.as_deref().unwrap_or_default();
            // The save is committed; without the IDs in the file the next
            // save would create the survey again.
            write_draft(file, &draft).with_context(|| {
                format!(
                    "survey {survey_id} was saved with question ids [{}], but {} was not \
                     updated; add these ids to the draft before saving it again",
                    question_ids.join(", "),
                    file.display()
                )
            })?;
            let saved = Saved {
                survey_id,
                question_ids,
                file: file.display().to_string(),
            };
            output(&saved, flags.format)
        }
        SurveyCommands::Publish {
            id,
            starts_at,
            ends_at,
        } => {
            service.publish(id, *starts_at, *ends_at).await?;
            output(&Done::new(id, "published"), flags.format)
        }
        SurveyCommands::Close { id } => {
            service.close(id).await?;
            output(&Done::new(id, "closed"), flags.format)
        }
        SurveyCommands::Unpublish { id } => {
            service.unpublish(id).await?;
            output(&Done::new(id, "draft"), flags.format)
        }
        SurveyCommands::Status { id, status } => {
            service.update_status(id, *status).await?;
            output(&Done::new(id, status.as_str()), flags.format)
        }
        SurveyCommands::Delete { id } => {
            service.delete(id).await?;
            output(&Done::new(id, "deleted"), flags.format)
        }
    }
}
