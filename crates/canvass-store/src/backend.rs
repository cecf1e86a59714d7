use async_trait::async_trait;
use canvass_core::entities::{
    CreatedSurvey, NewSurvey, Question, QuestionInput, ResponseSubmission, Survey, SurveyResponse,
    SurveyWithQuestions,
};
use canvass_core::enums::SurveyStatus;
use canvass_core::updates::SurveyUpdate;
use canvass_core::{BackendError, SurveyBackend};
use chrono::{DateTime, Utc};

use crate::SurveyStore;

#[async_trait]
impl SurveyBackend for SurveyStore {
    fn name(&self) -> &'static str {
        "store"
    }

    async fn create_draft(&self, survey: NewSurvey) -> Result<String, BackendError> {
        Ok(self.create_survey(&survey).await?)
    }

    async fn get_by_id(&self, survey_id: &str) -> Result<Survey, BackendError> {
        Ok(self.get_survey(survey_id).await?)
    }

    async fn list_by_owner(&self, owner_id: &str) -> Result<Vec<Survey>, BackendError> {
        Ok(self.list_surveys(owner_id).await?)
    }

    async fn add_question(
        &self,
        survey_id: &str,
        question: QuestionInput,
    ) -> Result<String, BackendError> {
        Ok(self.add_question_to(survey_id, &question).await?)
    }

    async fn publish(
        &self,
        survey_id: &str,
        starts_at: DateTime<Utc>,
        ends_at: DateTime<Utc>,
    ) -> Result<(), BackendError> {
        Ok(self.publish_survey(survey_id, starts_at, ends_at).await?)
    }

    async fn list_questions(&self, survey_id: &str) -> Result<Vec<Question>, BackendError> {
        Ok(self.list_survey_questions(survey_id).await?)
    }

    async fn submit_response(
        &self,
        survey_id: &str,
        submission: ResponseSubmission,
    ) -> Result<String, BackendError> {
        Ok(self.record_response(survey_id, &submission).await?)
    }

    async fn create_survey_with_questions(
        &self,
        survey: NewSurvey,
        questions: Vec<QuestionInput>,
    ) -> Result<CreatedSurvey, BackendError> {
        Ok(self.create_aggregate(&survey, &questions).await?)
    }

    async fn get_survey_with_questions(
        &self,
        survey_id: &str,
    ) -> Result<SurveyWithQuestions, BackendError> {
        Ok(self.get_aggregate(survey_id).await?)
    }

    async fn update_survey_with_questions(
        &self,
        survey_id: &str,
        update: SurveyUpdate,
        questions: Vec<QuestionInput>,
    ) -> Result<Vec<String>, BackendError> {
        Ok(self.reconcile_aggregate(survey_id, &update, &questions).await?)
    }

    async fn update_status(
        &self,
        survey_id: &str,
        status: SurveyStatus,
    ) -> Result<(), BackendError> {
        Ok(self.set_status(survey_id, status).await?)
    }

    async fn delete_survey(&self, survey_id: &str) -> Result<(), BackendError> {
        Ok(self.delete_survey_cascade(survey_id).await?)
    }

    async fn list_responses(&self, survey_id: &str) -> Result<Vec<SurveyResponse>, BackendError> {
        Ok(self.list_survey_responses(survey_id).await?)
    }
}
