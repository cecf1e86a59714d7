//! `SurveyService` against an in-memory backend.

use std::collections::HashMap;
use std::sync::Arc;

use async_trait::async_trait;
use canvass_core::answer::AnswerValue;
use canvass_core::draft::SurveyDraft;
use canvass_core::entities::{
    Answer, CreatedSurvey, NewSurvey, Question, QuestionInput, ResponseSubmission, Survey, SurveyResponse,
    SurveyWithQuestions,
};
use canvass_core::enums::{QuestionType, SurveyStatus};
use canvass_core::identity::{AuthContext, AuthIdentity};
use canvass_core::reconcile::{ReconcileStep, plan_reconciliation};
use canvass_core::results::Tally;
use canvass_core::updates::SurveyUpdate;
use canvass_core::{BackendError, ErrorKind, SurveyBackend, SurveyService};
use chrono::{DateTime, Duration, Utc};
use pretty_assertions::assert_eq;
use serde_json::json;
use tokio::sync::Mutex;

#[derive(Default)]
struct State {
    next: u32,
    surveys: HashMap<String, Survey>,
    questions: HashMap<String, Vec<Question>>,
    responses: HashMap<String, Vec<SurveyResponse>>,
    calls: Vec<&'static str>,
    fail_next_aggregate_read: bool,
}

impl State {
    fn id(&mut self, prefix: &str) -> String {
        self.next += 1;
        format!("{prefix}-{:08x}", self.next)
    }
}

#[derive(Default)]
struct FakeBackend {
    state: Mutex<State>,
}

impl FakeBackend {
    async fn calls(&self) -> Vec<&'static str> {
        self.state.lock().await.calls.clone()
    }
}

fn missing(id: &str) -> BackendError {
    BackendError::survey_not_found(id)
}

#[async_trait]
impl SurveyBackend for FakeBackend {
    fn name(&self) -> &'static str {
        "fake"
    }

    async fn create_draft(&self, survey: NewSurvey) -> Result<String, BackendError> {
        let mut state = self.state.lock().await;
        state.calls.push("create_draft");
        let id = state.id("srv");
        let now = Utc::now();
        state.surveys.insert(
            id.clone(),
            Survey {
                id: id.clone(),
                owner_id: survey.owner_id,
                title: survey.title,
                description: survey.description,
                starts_at: survey.starts_at,
                ends_at: survey.ends_at,
                status: SurveyStatus::Draft,
                created_at: now,
                updated_at: now,
            },
        );
        state.questions.insert(id.clone(), Vec::new());
        Ok(id)
    }

    async fn get_by_id(&self, survey_id: &str) -> Result<Survey, BackendError> {
        let state = self.state.lock().await;
        state.surveys.get(survey_id).cloned().ok_or_else(|| missing(survey_id))
    }

    async fn list_by_owner(&self, owner_id: &str) -> Result<Vec<Survey>, BackendError> {
        let state = self.state.lock().await;
        Ok(state
            .surveys
            .values()
            .filter(|s| s.owner_id == owner_id)
            .cloned()
            .collect())
    }

    async fn add_question(
        &self,
        survey_id: &str,
        question: QuestionInput,
    ) -> Result<String, BackendError> {
        let mut state = self.state.lock().await;
        state.calls.push("add_question");
        if !state.surveys.contains_key(survey_id) {
            return Err(missing(survey_id));
        }
        let id = state.id("qst");
        let question = question.into_question(id.clone(), survey_id);
        state.questions.entry(survey_id.into()).or_default().push(question);
        Ok(id)
    }

    async fn publish(
        &self,
        survey_id: &str,
        starts_at: DateTime<Utc>,
        ends_at: DateTime<Utc>,
    ) -> Result<(), BackendError> {
        let mut state = self.state.lock().await;
        state.calls.push("publish");
        let survey = state.surveys.get_mut(survey_id).ok_or_else(|| missing(survey_id))?;
        survey.starts_at = Some(starts_at);
        survey.ends_at = Some(ends_at);
        survey.status = SurveyStatus::Published;
        Ok(())
    }

    async fn list_questions(&self, survey_id: &str) -> Result<Vec<Question>, BackendError> {
        let state = self.state.lock().await;
        let mut questions = state
            .questions
            .get(survey_id)
            .cloned()
            .ok_or_else(|| missing(survey_id))?;
        questions.sort_by_key(|q| q.order);
        Ok(questions)
    }

    async fn submit_response(
        &self,
        survey_id: &str,
        submission: ResponseSubmission,
    ) -> Result<String, BackendError> {
        let mut state = self.state.lock().await;
        state.calls.push("submit_response");
        let id = state.id("rsp");
        let respondent_id = state.id("anon");
        state.responses.entry(survey_id.into()).or_default().push(SurveyResponse {
            id: id.clone(),
            survey_id: survey_id.into(),
            respondent_id,
            name: submission.name,
            answers: submission.answers,
            submitted_at: Utc::now(),
        });
        Ok(id)
    }

    async fn create_survey_with_questions(
        &self,
        survey: NewSurvey,
        questions: Vec<QuestionInput>,
    ) -> Result<CreatedSurvey, BackendError> {
        let id = self.create_draft(survey).await?;
        let mut state = self.state.lock().await;
        state.calls.push("create_survey_with_questions");
        let mut stored = Vec::new();
        let mut question_ids = Vec::new();
        for input in questions {
            let qid = state.id("qst");
            question_ids.push(qid.clone());
            stored.push(input.into_question(qid, &id));
        }
        state.questions.insert(id.clone(), stored);
        Ok(CreatedSurvey {
            survey_id: id,
            question_ids,
        })
    }

    async fn get_survey_with_questions(
        &self,
        survey_id: &str,
    ) -> Result<SurveyWithQuestions, BackendError> {
        {
            let mut state = self.state.lock().await;
            if std::mem::take(&mut state.fail_next_aggregate_read) {
                return Err(BackendError::BackendUnavailable("network blip".into()));
            }
        }
        let survey = self.get_by_id(survey_id).await?;
        let questions = self.list_questions(survey_id).await?;
        Ok(SurveyWithQuestions { survey, questions })
    }

    async fn update_survey_with_questions(
        &self,
        survey_id: &str,
        update: SurveyUpdate,
        questions: Vec<QuestionInput>,
    ) -> Result<Vec<String>, BackendError> {
        let mut state = self.state.lock().await;
        state.calls.push("update_survey_with_questions");
        let survey = state.surveys.get_mut(survey_id).ok_or_else(|| missing(survey_id))?;
        if let Some(title) = update.title {
            survey.title = title;
        }
        if let Some(description) = update.description {
            survey.description = description;
        }
        survey.updated_at = Utc::now();
        let stored: Vec<String> = state
            .questions
            .get(survey_id)
            .map(|qs| qs.iter().map(|q| q.id.clone()).collect())
            .unwrap_or_default();
        let plan = plan_reconciliation(stored.iter().map(String::as_str), &questions);
        let ids: Vec<String> = plan
            .steps
            .iter()
            .map(|step| match step {
                ReconcileStep::Overwrite(id) => id.clone(),
                ReconcileStep::Insert => state.id("qst"),
            })
            .collect();
        let replaced = questions
            .into_iter()
            .zip(&ids)
            .map(|(input, id)| input.into_question(id.clone(), survey_id))
            .collect();
        state.questions.insert(survey_id.into(), replaced);
        Ok(ids)
    }

    async fn update_status(
        &self,
        survey_id: &str,
        status: SurveyStatus,
    ) -> Result<(), BackendError> {
        let mut state = self.state.lock().await;
        state.calls.push("update_status");
        let survey = state.surveys.get_mut(survey_id).ok_or_else(|| missing(survey_id))?;
        survey.status = status;
        Ok(())
    }

    async fn delete_survey(&self, survey_id: &str) -> Result<(), BackendError> {
        let mut state = self.state.lock().await;
        state.surveys.remove(survey_id).ok_or_else(|| missing(survey_id))?;
        state.questions.remove(survey_id);
        state.responses.remove(survey_id);
        Ok(())
    }

    async fn list_responses(&self, survey_id: &str) -> Result<Vec<SurveyResponse>, BackendError> {
        let state = self.state.lock().await;
        Ok(state.responses.get(survey_id).cloned().unwrap_or_default())
    }
}

fn service() -> (Arc<FakeBackend>, SurveyService) {
    let backend = Arc::new(FakeBackend::default());
    let service = SurveyService::new(
        backend.clone(),
        AuthContext::signed_in(AuthIdentity::new("user_1")),
    );
    (backend, service)
}

fn draft() -> SurveyDraft {
    let mut draft = SurveyDraft::new("Lunch");
    draft.add_question(QuestionInput::new(QuestionType::YesNo, "Hungry?"));
    draft.add_question(
        QuestionInput::new(QuestionType::Radio, "Where").with_options(["canteen", "park"]),
    );
    draft
}

async fn published_survey(service: &SurveyService) -> (String, Vec<String>) {
    let mut draft = draft();
    let ids = service.save_draft(&mut draft).await.unwrap();
    let survey_id = draft.survey_id.clone().unwrap();
    let now = Utc::now();
    service
        .publish(&survey_id, Some(now - Duration::hours(1)), Some(now + Duration::hours(1)))
        .await
        .unwrap();
    (survey_id, ids)
}

#[tokio::test]
async fn first_save_creates_aggregate_and_fills_ids() {
    let (backend, service) = service();
    let mut draft = draft();

    let ids = service.save_draft(&mut draft).await.unwrap();

    assert_eq!(ids.len(), 2);
    assert!(draft.survey_id.is_some());
    assert_eq!(draft.questions[0].id.as_deref(), Some(ids[0].as_str()));
    assert_eq!(draft.questions[1].id.as_deref(), Some(ids[1].as_str()));
    assert!(backend.calls().await.contains(&"create_survey_with_questions"));
}

#[tokio::test]
async fn first_save_does_not_depend_on_a_follow_up_read() {
    let (backend, service) = service();
    backend.state.lock().await.fail_next_aggregate_read = true;
    let mut draft = draft();

    let first = service.save_draft(&mut draft).await.unwrap();
    assert!(draft.survey_id.is_some());

    let retry = service.save_draft(&mut draft).await.unwrap();
    assert_eq!(retry, first);
    assert_eq!(service.list_mine().await.unwrap().len(), 1);
}

#[tokio::test]
async fn second_save_reconciles_with_same_ids() {
    let (backend, service) = service();
    let mut draft = draft();
    let first = service.save_draft(&mut draft).await.unwrap();

    draft.move_question(1, 0);
    let second = service.save_draft(&mut draft).await.unwrap();

    assert_eq!(second, vec![first[1].clone(), first[0].clone()]);
    assert!(backend.calls().await.contains(&"update_survey_with_questions"));
}

#[tokio::test]
async fn invalid_draft_never_reaches_backend() {
    let (backend, service) = service();
    let mut draft = SurveyDraft::new("");
    draft.add_question(QuestionInput::new(QuestionType::Radio, "Pick"));
    let before = draft.clone();

    let err = service.save_draft(&mut draft).await.unwrap_err();

    assert_eq!(err.kind(), ErrorKind::ValidationFailed);
    assert_eq!(draft, before);
    assert!(backend.calls().await.is_empty());
}

#[tokio::test]
async fn anonymous_caller_cannot_create() {
    let backend = Arc::new(FakeBackend::default());
    let service = SurveyService::new(backend, AuthContext::anonymous());
    let err = service
        .create_draft(NewSurvey::new("ignored", "Title"))
        .await
        .unwrap_err();
    assert_eq!(err.kind(), ErrorKind::Unauthorized);
}

#[tokio::test]
async fn create_draft_uses_current_user_as_owner() {
    let (_, service) = service();
    let id = service
        .create_draft(NewSurvey::new("someone_else", "Title"))
        .await
        .unwrap();
    assert_eq!(service.get(&id).await.unwrap().owner_id, "user_1");
    assert_eq!(service.list_mine().await.unwrap().len(), 1);
}

#[tokio::test]
async fn append_question_goes_after_last() {
    let (_, service) = service();
    let mut draft = draft();
    service.save_draft(&mut draft).await.unwrap();
    let survey_id = draft.survey_id.unwrap();

    service
        .append_question(&survey_id, QuestionInput::new(QuestionType::Date, "When").with_order(0))
        .await
        .unwrap();

    let orders: Vec<i64> = service
        .list_questions(&survey_id)
        .await
        .unwrap()
        .iter()
        .map(|q| q.order)
        .collect();
    assert_eq!(orders, vec![0, 1, 2]);
}

#[tokio::test]
async fn publish_requires_window() {
    let (backend, service) = service();
    let mut draft = draft();
    service.save_draft(&mut draft).await.unwrap();

    let err = service
        .publish(draft.survey_id.as_deref().unwrap(), Some(Utc::now()), None)
        .await
        .unwrap_err();

    assert_eq!(err.kind(), ErrorKind::ValidationFailed);
    assert!(!backend.calls().await.contains(&"publish"));
}

#[tokio::test]
async fn publish_rejects_inverted_window() {
    let (_, service) = service();
    let mut draft = draft();
    service.save_draft(&mut draft).await.unwrap();
    let now = Utc::now();

    let err = service
        .publish(draft.survey_id.as_deref().unwrap(), Some(now), Some(now - Duration::days(1)))
        .await
        .unwrap_err();

    assert!(err.to_string().contains("must not be before starts_at"));
}

#[tokio::test]
async fn publish_requires_questions() {
    let (_, service) = service();
    let mut draft = SurveyDraft::new("Empty");
    service.save_draft(&mut draft).await.unwrap();
    let now = Utc::now();

    let err = service
        .publish(draft.survey_id.as_deref().unwrap(), Some(now), Some(now))
        .await
        .unwrap_err();

    assert!(err.to_string().contains("at least one question"));
}

#[tokio::test]
async fn lifecycle_is_enforced_by_service() {
    let (_, service) = service();
    let (survey_id, _) = published_survey(&service).await;

    service.close(&survey_id).await.unwrap();
    assert_eq!(service.get(&survey_id).await.unwrap().status, SurveyStatus::Closed);

    let err = service.unpublish(&survey_id).await.unwrap_err();
    assert_eq!(err.kind(), ErrorKind::ValidationFailed);

    // Direct status writes bypass the lifecycle.
    service.update_status(&survey_id, SurveyStatus::Draft).await.unwrap();
    assert_eq!(service.get(&survey_id).await.unwrap().status, SurveyStatus::Draft);
}

#[tokio::test]
async fn submit_validates_answers() {
    let (backend, service) = service();
    let (survey_id, ids) = published_survey(&service).await;

    let bad = ResponseSubmission {
        name: None,
        answers: vec![Answer::new(ids[1].clone(), AnswerValue::Radio("beach".into()))],
    };
    let err = service.submit(&survey_id, bad).await.unwrap_err();
    assert!(err.to_string().contains("'beach' is not an option"));
    assert!(!backend.calls().await.contains(&"submit_response"));
}

#[tokio::test]
async fn submit_to_draft_is_rejected() {
    let (_, service) = service();
    let mut draft = draft();
    let ids = service.save_draft(&mut draft).await.unwrap();

    let submission = ResponseSubmission {
        name: None,
        answers: vec![Answer::new(ids[0].clone(), AnswerValue::YesNo(true))],
    };
    let err = service
        .submit(draft.survey_id.as_deref().unwrap(), submission)
        .await
        .unwrap_err();
    assert!(err.to_string().contains("not open for responses"));
}

#[tokio::test]
async fn raw_answers_decode_and_tally() {
    let (_, service) = service();
    let (survey_id, ids) = published_survey(&service).await;

    for (hungry, place) in [("yes", "park"), ("no", "park"), ("yes", "canteen")] {
        service
            .submit_raw(
                &survey_id,
                None,
                &[(ids[0].clone(), json!(hungry)), (ids[1].clone(), json!(place))],
            )
            .await
            .unwrap();
    }

    let results = service.results(&survey_id).await.unwrap();
    assert_eq!(results.response_count, 3);
    let Tally::Choices { counts } = &results.questions[1].tally else {
        panic!("expected choice counts");
    };
    let pairs: Vec<(&str, usize)> = counts.iter().map(|c| (c.option.as_str(), c.count)).collect();
    assert_eq!(pairs, vec![("canteen", 1), ("park", 2)]);
}

#[tokio::test]
async fn raw_answer_for_unknown_question_is_rejected() {
    let (_, service) = service();
    let (survey_id, _) = published_survey(&service).await;
    let err = service
        .submit_raw(&survey_id, None, &[("qst-nope".into(), json!("yes"))])
        .await
        .unwrap_err();
    assert!(err.to_string().contains("unknown question qst-nope"));
}

#[tokio::test]
async fn delete_forwards_and_get_reports_not_found() {
    let (_, service) = service();
    let (survey_id, _) = published_survey(&service).await;
    service.delete(&survey_id).await.unwrap();
    let err = service.get(&survey_id).await.unwrap_err();
    assert_eq!(err.kind(), ErrorKind::NotFound);
}

#[tokio::test]
async fn load_draft_roundtrips_stored_aggregate() {
    let (_, service) = service();
    let mut draft = draft();
    service.save_draft(&mut draft).await.unwrap();
    let loaded = service
        .load_draft(draft.survey_id.as_deref().unwrap())
        .await
        .unwrap();
    assert_eq!(loaded, draft);
}
