//! Response repository. Answers are embedded in the response row as JSON.

use chrono::Utc;

use canvass_core::entities::{Answer, ResponseSubmission, SurveyResponse};
use canvass_core::ids::{PREFIX_RESPONDENT, PREFIX_RESPONSE};

use crate::access::{require_accepting, require_owner};
use crate::error::StoreError;
use crate::helpers::{get_opt_string, parse_datetime};
use crate::repos::survey::fetch_survey;
use crate::{SurveyStore, generate_id};

const SELECT_COLS: &str = "id, survey_id, respondent_id, name, answers, submitted_at";

fn row_to_response(row: &libsql::Row) -> Result<SurveyResponse, StoreError> {
    let answers: Vec<Answer> = serde_json::from_str(&row.get::<String>(4)?)?;
    Ok(SurveyResponse {
        id: row.get(0)?,
        survey_id: row.get(1)?,
        respondent_id: row.get(2)?,
        name: get_opt_string(row, 3)?,
        answers,
        submitted_at: parse_datetime(&row.get::<String>(5)?)?,
    })
}

impl SurveyStore {
    /// Store a submission under a fresh response ID and a fresh
    /// pseudo-anonymous respondent ID.
    pub async fn record_response(
        &self,
        survey_id: &str,
        submission: &ResponseSubmission,
    ) -> Result<String, StoreError> {
        let _guard = self.lock().await;
        let survey = fetch_survey(self.conn(), survey_id).await?;
        require_accepting(&survey)?;

        let id = generate_id(self.conn(), PREFIX_RESPONSE).await?;
        let respondent_id = generate_id(self.conn(), PREFIX_RESPONDENT).await?;
        let answers = serde_json::to_string(&submission.answers)?;
        self.conn()
            .execute(
                &format!("INSERT INTO responses ({SELECT_COLS}) VALUES (?1, ?2, ?3, ?4, ?5, ?6)"),
                libsql::params![
                    id.as_str(),
                    survey_id,
                    respondent_id.as_str(),
                    submission.name.as_deref(),
                    answers,
                    Utc::now().to_rfc3339()
                ],
            )
            .await?;
        tracing::debug!(survey_id, response_id = %id, answers = submission.answers.len(), "recorded response");
        Ok(id)
    }

    /// Responses to a survey the caller owns, oldest first.
    pub async fn list_survey_responses(
        &self,
        survey_id: &str,
    ) -> Result<Vec<SurveyResponse>, StoreError> {
        let _guard = self.lock().await;
        let survey = fetch_survey(self.conn(), survey_id).await?;
        require_owner(self.identity(), &survey)?;
        let mut rows = self
            .conn()
            .query(
                &format!(
                    "SELECT {SELECT_COLS} FROM responses WHERE survey_id = ?1 ORDER BY submitted_at, rowid"
                ),
                [survey_id],
            )
            .await?;
        let mut responses = Vec::new();
        while let Some(row) = rows.next().await? {
            responses.push(row_to_response(&row)?);
        }
        Ok(responses)
    }
}
