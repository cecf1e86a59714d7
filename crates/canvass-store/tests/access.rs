//! Access rules and response handling, with several callers sharing one
//! database.

use canvass_core::answer::AnswerValue;
use canvass_core::entities::{Answer, NewSurvey, QuestionInput, ResponseSubmission};
use canvass_core::enums::{QuestionType, SurveyStatus};
use canvass_core::identity::AuthIdentity;
use canvass_core::updates::SurveyUpdate;
use canvass_core::{ErrorKind, SurveyBackend};
use canvass_store::SurveyStore;
use chrono::{Duration, Utc};
use pretty_assertions::assert_eq;

struct Callers {
    owner: SurveyStore,
    other: SurveyStore,
    anonymous: SurveyStore,
}

async fn callers() -> Callers {
    let owner = SurveyStore::open_local(":memory:", Some(AuthIdentity::new("owner")))
        .await
        .unwrap();
    Callers {
        other: owner.with_identity(Some(AuthIdentity::new("other"))),
        anonymous: owner.with_identity(None),
        owner,
    }
}

async fn survey_with_question(store: &SurveyStore) -> (String, String) {
    let created = store
        .create_survey_with_questions(
            NewSurvey::new("owner", "Poll"),
            vec![QuestionInput::new(QuestionType::YesNo, "Coffee?")],
        )
        .await
        .unwrap();
    (created.survey_id, created.question_ids[0].clone())
}

async fn publish(store: &SurveyStore, id: &str) {
    let now = Utc::now();
    store
        .publish(id, now - Duration::hours(1), now + Duration::hours(1))
        .await
        .unwrap();
}

fn yes(question_id: &str) -> ResponseSubmission {
    ResponseSubmission {
        name: None,
        answers: vec![Answer::new(question_id, AnswerValue::YesNo(true))],
    }
}

#[tokio::test]
async fn create_requires_matching_identity() {
    let c = callers().await;
    let err = c
        .anonymous
        .create_draft(NewSurvey::new("owner", "Poll"))
        .await
        .unwrap_err();
    assert_eq!(err.kind(), ErrorKind::Unauthorized);

    let err = c
        .other
        .create_survey_with_questions(NewSurvey::new("owner", "Poll"), vec![])
        .await
        .unwrap_err();
    assert_eq!(err.kind(), ErrorKind::Unauthorized);
}

#[tokio::test]
async fn drafts_are_private() {
    let c = callers().await;
    let (id, _) = survey_with_question(&c.owner).await;

    for caller in [&c.other, &c.anonymous] {
        assert_eq!(caller.get_by_id(&id).await.unwrap_err().kind(), ErrorKind::Unauthorized);
        assert_eq!(
            caller.get_survey_with_questions(&id).await.unwrap_err().kind(),
            ErrorKind::Unauthorized
        );
        assert_eq!(
            caller.list_questions(&id).await.unwrap_err().kind(),
            ErrorKind::Unauthorized
        );
    }
}

#[tokio::test]
async fn published_surveys_are_readable_by_anyone() {
    let c = callers().await;
    let (id, _) = survey_with_question(&c.owner).await;
    publish(&c.owner, &id).await;

    let aggregate = c.anonymous.get_survey_with_questions(&id).await.unwrap();
    assert_eq!(aggregate.questions.len(), 1);
    assert_eq!(c.other.get_by_id(&id).await.unwrap().status, SurveyStatus::Published);
}

#[tokio::test]
async fn only_owner_writes() {
    let c = callers().await;
    let (id, _) = survey_with_question(&c.owner).await;
    publish(&c.owner, &id).await;
    let other = &c.other;

    let errors = [
        other
            .update_survey_with_questions(&id, SurveyUpdate::default(), vec![])
            .await
            .unwrap_err(),
        other
            .add_question(&id, QuestionInput::new(QuestionType::YesNo, "?"))
            .await
            .unwrap_err(),
        other.update_status(&id, SurveyStatus::Closed).await.unwrap_err(),
        other.delete_survey(&id).await.unwrap_err(),
        other.list_responses(&id).await.unwrap_err(),
        other.list_by_owner("owner").await.unwrap_err(),
    ];
    for err in errors {
        assert_eq!(err.kind(), ErrorKind::Unauthorized, "{err}");
    }

    // Nothing was applied.
    assert_eq!(c.owner.list_questions(&id).await.unwrap().len(), 1);
    assert_eq!(c.owner.get_by_id(&id).await.unwrap().status, SurveyStatus::Published);
}

#[tokio::test]
async fn anyone_submits_while_published() {
    let c = callers().await;
    let (id, qid) = survey_with_question(&c.owner).await;

    let err = c.anonymous.submit_response(&id, yes(&qid)).await.unwrap_err();
    assert_eq!(err.kind(), ErrorKind::Unauthorized);

    publish(&c.owner, &id).await;
    let first = c.anonymous.submit_response(&id, yes(&qid)).await.unwrap();
    let second = c.other.submit_response(&id, yes(&qid)).await.unwrap();
    assert!(first.starts_with("rsp-"));
    assert_ne!(first, second);

    c.owner.update_status(&id, SurveyStatus::Closed).await.unwrap();
    let err = c.anonymous.submit_response(&id, yes(&qid)).await.unwrap_err();
    assert_eq!(err.kind(), ErrorKind::Unauthorized);
}

#[tokio::test]
async fn responses_embed_answers_with_fresh_respondents() {
    let c = callers().await;
    let (id, qid) = survey_with_question(&c.owner).await;
    publish(&c.owner, &id).await;

    let mut named = yes(&qid);
    named.name = Some("Robin".into());
    c.anonymous.submit_response(&id, named).await.unwrap();
    c.anonymous.submit_response(&id, yes(&qid)).await.unwrap();

    let responses = c.owner.list_responses(&id).await.unwrap();
    assert_eq!(responses.len(), 2);
    assert_eq!(responses[0].name.as_deref(), Some("Robin"));
    assert_eq!(responses[0].answers, vec![Answer::new(qid.clone(), AnswerValue::YesNo(true))]);
    assert!(responses[0].respondent_id.starts_with("anon-"));
    assert_ne!(responses[0].respondent_id, responses[1].respondent_id);
}

#[tokio::test]
async fn delete_cascades_questions_and_responses() {
    let c = callers().await;
    let (id, qid) = survey_with_question(&c.owner).await;
    publish(&c.owner, &id).await;
    c.anonymous.submit_response(&id, yes(&qid)).await.unwrap();

    c.owner.delete_survey(&id).await.unwrap();

    assert_eq!(c.owner.get_by_id(&id).await.unwrap_err().kind(), ErrorKind::NotFound);
    for table in ["questions", "responses"] {
        let mut rows = c
            .owner
            .conn()
            .query(&format!("SELECT count(*) FROM {table} WHERE survey_id = ?1"), [id.as_str()])
            .await
            .unwrap();
        let count: i64 = rows.next().await.unwrap().unwrap().get(0).unwrap();
        assert_eq!(count, 0, "{table} should be empty");
    }
}

#[tokio::test]
async fn delete_missing_survey_is_not_found() {
    let c = callers().await;
    let err = c.owner.delete_survey("srv-gone").await.unwrap_err();
    assert_eq!(err.kind(), ErrorKind::NotFound);
}
