//! Aggregate writes: survey plus its full question list as one unit.

use canvass_core::entities::{CreatedSurvey, NewSurvey, QuestionInput, SurveyWithQuestions};
use canvass_core::reconcile::{ReconcileStep, plan_reconciliation};
use canvass_core::updates::SurveyUpdate;
use tracing::warn;

use crate::SurveyStore;
use crate::access::{require_owner, require_read, require_user};
use crate::error::StoreError;
use crate::repos::question::{fetch_question_ids, fetch_questions, insert_question, overwrite_question};
use crate::repos::survey::{fetch_survey, insert_survey, merge_survey};

/// Commit on success, roll back on failure. A failed rollback is logged; the
/// original error is what the caller sees.
pub(crate) async fn finish<T>(
    tx: libsql::Transaction,
    result: Result<T, StoreError>,
) -> Result<T, StoreError> {
    match result {
        Ok(value) => {
            tx.commit().await?;
            Ok(value)
        }
        Err(error) => {
            if let Err(rollback) = tx.rollback().await {
                warn!(%error, %rollback, "rollback failed");
            }
            Err(error)
        }
    }
}

/// Execute the reconciliation plan on `conn` and return the final question
/// IDs in input order.
async fn reconcile(
    conn: &libsql::Connection,
    survey_id: &str,
    update: &SurveyUpdate,
    questions: &[QuestionInput],
) -> Result<Vec<String>, StoreError> {
    merge_survey(conn, survey_id, update).await?;

    let stored = fetch_question_ids(conn, survey_id).await?;
    let plan = plan_reconciliation(stored.iter().map(String::as_str), questions);

    let mut ids = Vec::with_capacity(questions.len());
    for (input, step) in questions.iter().zip(&plan.steps) {
        match step {
            ReconcileStep::Overwrite(id) => {
                overwrite_question(conn, survey_id, id, input).await?;
                ids.push(id.clone());
            }
            ReconcileStep::Insert => ids.push(insert_question(conn, survey_id, input).await?),
        }
    }

    for id in &plan.deletions {
        conn.execute(
            "DELETE FROM questions WHERE id = ?1 AND survey_id = ?2",
            libsql::params![id.as_str(), survey_id],
        )
        .await?;
    }

    tracing::debug!(
        survey_id,
        overwritten = plan.overwrite_count(),
        inserted = plan.insert_count(),
        deleted = plan.deletions.len(),
        "reconciled questions"
    );
    Ok(ids)
}

impl SurveyStore {
    /// Create a survey and insert every question as a new document, in one
    /// transaction. Question IDs come back in input order.
    pub async fn create_aggregate(
        &self,
        survey: &NewSurvey,
        questions: &[QuestionInput],
    ) -> Result<CreatedSurvey, StoreError> {
        require_user(self.identity(), &survey.owner_id)?;
        let _guard = self.lock().await;

        let tx = self.conn().transaction().await?;
        let result = async {
            let survey_id = insert_survey(&tx, survey).await?;
            let mut question_ids = Vec::with_capacity(questions.len());
            for input in questions {
                question_ids.push(insert_question(&tx, &survey_id, input).await?);
            }
            Ok::<_, StoreError>(CreatedSurvey {
                survey_id,
                question_ids,
            })
        }
        .await;
        let created = finish(tx, result).await?;
        tracing::debug!(
            id = %created.survey_id,
            questions = created.question_ids.len(),
            "created survey aggregate"
        );
        Ok(created)
    }

    /// The survey with its questions, `order` ascending.
    pub async fn get_aggregate(&self, survey_id: &str) -> Result<SurveyWithQuestions, StoreError> {
        let _guard = self.lock().await;
        let survey = fetch_survey(self.conn(), survey_id).await?;
        require_read(self.identity(), &survey)?;
        let questions = fetch_questions(self.conn(), survey_id).await?;
        Ok(SurveyWithQuestions { survey, questions })
    }

    /// Reconcile the stored aggregate with `update` and `questions` in one
    /// transaction. See [`plan_reconciliation`] for the matching rules.
    pub async fn reconcile_aggregate(
        &self,
        survey_id: &str,
        update: &SurveyUpdate,
        questions: &[QuestionInput],
    ) -> Result<Vec<String>, StoreError> {
        let _guard = self.lock().await;
        let survey = fetch_survey(self.conn(), survey_id).await?;
        require_owner(self.identity(), &survey)?;

        let tx = self.conn().transaction().await?;
        let result = reconcile(&tx, survey_id, update, questions).await;
        finish(tx, result).await
    }
}
