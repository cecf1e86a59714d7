//! Aggregate persistence against an in-memory store.

use canvass_core::entities::{NewSurvey, QuestionInput, SurveyWithQuestions};
use canvass_core::enums::{QuestionType, SurveyStatus};
use canvass_core::identity::AuthIdentity;
use canvass_core::updates::{SurveyUpdate, SurveyUpdateBuilder};
use canvass_core::{ErrorKind, SurveyBackend};
use canvass_store::SurveyStore;
use chrono::{Duration, Utc};
use pretty_assertions::assert_eq;

const OWNER: &str = "user_owner";

async fn store() -> SurveyStore {
    SurveyStore::open_local(":memory:", Some(AuthIdentity::new(OWNER)))
        .await
        .unwrap()
}

fn q(kind: QuestionType, title: &str, order: i64) -> QuestionInput {
    QuestionInput::new(kind, title).with_order(order)
}

fn three_questions() -> Vec<QuestionInput> {
    vec![
        q(QuestionType::YesNo, "A", 0),
        q(QuestionType::Freitext, "B", 1),
        QuestionInput::new(QuestionType::Radio, "C")
            .with_options(["x", "y"])
            .with_order(2),
    ]
}

async fn seeded(store: &SurveyStore, questions: Vec<QuestionInput>) -> (String, SurveyWithQuestions) {
    let created = store
        .create_survey_with_questions(NewSurvey::new(OWNER, "Offsite"), questions)
        .await
        .unwrap();
    let aggregate = store
        .get_survey_with_questions(&created.survey_id)
        .await
        .unwrap();
    (created.survey_id, aggregate)
}

fn as_inputs(aggregate: &SurveyWithQuestions) -> Vec<QuestionInput> {
    aggregate.questions.iter().map(|q| q.to_input()).collect()
}

#[tokio::test]
async fn create_returns_draft_with_ordered_questions() {
    let store = store().await;
    let (id, aggregate) = seeded(&store, three_questions()).await;

    assert!(id.starts_with("srv-"));
    assert_eq!(aggregate.survey.status, SurveyStatus::Draft);
    assert_eq!(aggregate.survey.owner_id, OWNER);
    let titles: Vec<&str> = aggregate.questions.iter().map(|q| q.title.as_str()).collect();
    assert_eq!(titles, vec!["A", "B", "C"]);
    assert_eq!(
        aggregate.questions[2].options,
        Some(vec!["x".to_string(), "y".to_string()])
    );
    assert!(aggregate.questions.iter().all(|q| q.survey_id == id));
}

#[tokio::test]
async fn create_ignores_input_ids() {
    let store = store().await;
    let inputs = vec![
        q(QuestionType::YesNo, "A", 0).with_id("qst-caller01"),
        q(QuestionType::YesNo, "B", 1).with_id("qst-caller01"),
    ];
    let (_, aggregate) = seeded(&store, inputs).await;

    assert_eq!(aggregate.questions.len(), 2);
    assert!(aggregate.questions.iter().all(|q| q.id != "qst-caller01"));
    assert_ne!(aggregate.questions[0].id, aggregate.questions[1].id);
}

#[tokio::test]
async fn get_orders_by_order_not_insertion() {
    let store = store().await;
    let inputs = vec![
        q(QuestionType::YesNo, "third", 2),
        q(QuestionType::YesNo, "first", 0),
        q(QuestionType::YesNo, "second", 1),
    ];
    let (id, _) = seeded(&store, inputs).await;

    let questions = store.list_questions(&id).await.unwrap();
    let titles: Vec<&str> = questions.iter().map(|q| q.title.as_str()).collect();
    assert_eq!(titles, vec!["first", "second", "third"]);
}

#[tokio::test]
async fn create_returns_question_ids_in_input_order() {
    let store = store().await;
    let inputs = vec![
        q(QuestionType::YesNo, "third", 2),
        q(QuestionType::YesNo, "first", 0),
        q(QuestionType::YesNo, "second", 1),
    ];

    let created = store
        .create_survey_with_questions(NewSurvey::new(OWNER, "Offsite"), inputs)
        .await
        .unwrap();

    let stored = store.list_questions(&created.survey_id).await.unwrap();
    let by_id = |id: &str| {
        stored
            .iter()
            .find(|q| q.id == id)
            .map(|q| q.title.clone())
            .unwrap()
    };
    let titles: Vec<String> = created.question_ids.iter().map(|id| by_id(id)).collect();
    assert_eq!(titles, vec!["third", "first", "second"]);
}

#[tokio::test]
async fn first_reconcile_inserts_then_repeats_as_noop() {
    let store = store().await;
    let id = store.create_draft(NewSurvey::new(OWNER, "Empty")).await.unwrap();
    let inputs = three_questions();

    let first = store
        .update_survey_with_questions(&id, SurveyUpdate::default(), inputs.clone())
        .await
        .unwrap();

    assert_eq!(first.len(), 3);
    assert!(first.iter().all(|qid| qid.starts_with("qst-")));
    let distinct: std::collections::HashSet<&String> = first.iter().collect();
    assert_eq!(distinct.len(), 3);
    let stored = store.list_questions(&id).await.unwrap();
    let titles_by_returned_id: Vec<&str> = first
        .iter()
        .filter_map(|qid| stored.iter().find(|q| &q.id == qid))
        .map(|q| q.title.as_str())
        .collect();
    assert_eq!(titles_by_returned_id, vec!["A", "B", "C"]);

    let with_ids: Vec<QuestionInput> = inputs
        .into_iter()
        .zip(&first)
        .map(|(input, qid)| input.with_id(qid.clone()))
        .collect();
    let second = store
        .update_survey_with_questions(&id, SurveyUpdate::default(), with_ids)
        .await
        .unwrap();

    assert_eq!(second, first);
    let after = store.list_questions(&id).await.unwrap();
    assert_eq!(after.len(), 3);
    assert_eq!(after, stored);
}

#[tokio::test]
async fn reconcile_is_idempotent() {
    let store = store().await;
    let (id, before) = seeded(&store, three_questions()).await;
    let inputs = as_inputs(&before);

    let first = store
        .update_survey_with_questions(&id, SurveyUpdate::default(), inputs.clone())
        .await
        .unwrap();
    let second = store
        .update_survey_with_questions(&id, SurveyUpdate::default(), inputs)
        .await
        .unwrap();

    assert_eq!(first, second);
    let after = store.get_survey_with_questions(&id).await.unwrap();
    assert_eq!(after.questions, before.questions);
}

#[tokio::test]
async fn omitted_questions_are_deleted() {
    let store = store().await;
    let (id, before) = seeded(&store, three_questions()).await;
    let kept = vec![before.questions[0].to_input(), before.questions[2].to_input()];

    let ids = store
        .update_survey_with_questions(&id, SurveyUpdate::default(), kept)
        .await
        .unwrap();

    assert_eq!(ids, vec![before.questions[0].id.clone(), before.questions[2].id.clone()]);
    let after = store.list_questions(&id).await.unwrap();
    assert_eq!(after.len(), 2);
    assert!(after.iter().all(|q| q.id != before.questions[1].id));
}

#[tokio::test]
async fn mixed_update_insert_delete() {
    let store = store().await;
    let (id, before) = seeded(&store, three_questions()[..2].to_vec()).await;
    let mut edited = before.questions[0].to_input();
    edited.title = "A, reworded".into();
    let fresh = q(QuestionType::Date, "When", 1);

    let ids = store
        .update_survey_with_questions(&id, SurveyUpdate::default(), vec![edited, fresh])
        .await
        .unwrap();

    assert_eq!(ids.len(), 2);
    assert_eq!(ids[0], before.questions[0].id);
    assert!(ids[1].starts_with("qst-"));
    assert_ne!(ids[1], before.questions[1].id);

    let after = store.list_questions(&id).await.unwrap();
    let view: Vec<(&str, &str)> = after.iter().map(|q| (q.id.as_str(), q.title.as_str())).collect();
    assert_eq!(view, vec![(ids[0].as_str(), "A, reworded"), (ids[1].as_str(), "When")]);
}

#[tokio::test]
async fn reorder_swaps_orders_in_place() {
    let store = store().await;
    let (id, before) = seeded(&store, three_questions()).await;
    let mut inputs = as_inputs(&before);
    inputs.reverse();
    for (position, input) in inputs.iter_mut().enumerate() {
        input.order = i64::try_from(position).unwrap();
    }

    store
        .update_survey_with_questions(&id, SurveyUpdate::default(), inputs)
        .await
        .unwrap();

    let titles: Vec<String> = store
        .list_questions(&id)
        .await
        .unwrap()
        .into_iter()
        .map(|q| q.title)
        .collect();
    assert_eq!(titles, vec!["C", "B", "A"]);
}

#[tokio::test]
async fn survey_fields_merge_and_updated_at_advances() {
    let store = store().await;
    let mut new = NewSurvey::new(OWNER, "Offsite");
    new.description = Some("keep me".into());
    let id = store
        .create_survey_with_questions(new, vec![])
        .await
        .unwrap()
        .survey_id;
    let before = store.get_by_id(&id).await.unwrap();

    let update = SurveyUpdateBuilder::new().title("Offsite 2026").build();
    store
        .update_survey_with_questions(&id, update, vec![])
        .await
        .unwrap();

    let after = store.get_by_id(&id).await.unwrap();
    assert_eq!(after.title, "Offsite 2026");
    assert_eq!(after.description.as_deref(), Some("keep me"));
    assert!(after.updated_at >= before.updated_at);

    let clear = SurveyUpdateBuilder::new().description(None).build();
    store
        .update_survey_with_questions(&id, clear, vec![])
        .await
        .unwrap();
    assert_eq!(store.get_by_id(&id).await.unwrap().description, None);
}

#[tokio::test]
async fn mid_batch_failure_leaves_aggregate_unchanged() {
    let store = store().await;
    let (id, before) = seeded(&store, three_questions()).await;

    let mut edited = before.questions[0].to_input();
    edited.title = "changed".into();
    let broken = q(QuestionType::YesNo, "   ", 3);
    let update = SurveyUpdateBuilder::new().title("changed too").build();

    let result = store
        .update_survey_with_questions(&id, update, vec![edited, broken])
        .await;

    assert!(result.is_err());
    let after = store.get_survey_with_questions(&id).await.unwrap();
    assert_eq!(after, before);
}

#[tokio::test]
async fn reconcile_unknown_survey_is_not_found() {
    let store = store().await;
    let err = store
        .update_survey_with_questions("srv-missing", SurveyUpdate::default(), vec![])
        .await
        .unwrap_err();
    assert_eq!(err.kind(), ErrorKind::NotFound);
}

#[tokio::test]
async fn update_status_touches_only_status() {
    let store = store().await;
    let (id, before) = seeded(&store, three_questions()).await;

    // No window set: status writes skip date validation.
    store.update_status(&id, SurveyStatus::Published).await.unwrap();

    let after = store.get_survey_with_questions(&id).await.unwrap();
    assert_eq!(after.survey.status, SurveyStatus::Published);
    assert_eq!(after.survey.updated_at, before.survey.updated_at);
    assert_eq!(after.survey.title, before.survey.title);
    assert_eq!(after.survey.starts_at, None);
    assert_eq!(after.questions, before.questions);
}

#[tokio::test]
async fn publish_sets_window_and_status() {
    let store = store().await;
    let (id, _) = seeded(&store, three_questions()).await;
    let start = Utc::now();
    let end = start + Duration::days(3);

    store.publish(&id, start, end).await.unwrap();

    let survey = store.get_by_id(&id).await.unwrap();
    assert_eq!(survey.status, SurveyStatus::Published);
    assert_eq!(survey.starts_at.map(|t| t.timestamp()), Some(start.timestamp()));
    assert_eq!(survey.ends_at.map(|t| t.timestamp()), Some(end.timestamp()));
}

#[tokio::test]
async fn add_question_appends_document() {
    let store = store().await;
    let id = store.create_draft(NewSurvey::new(OWNER, "Empty")).await.unwrap();
    assert!(store.list_questions(&id).await.unwrap().is_empty());

    let qid = store
        .add_question(&id, QuestionInput::new(QuestionType::Star, "Rate").with_range(1.0, 10.0, None))
        .await
        .unwrap();

    let questions = store.list_questions(&id).await.unwrap();
    assert_eq!(questions.len(), 1);
    assert_eq!(questions[0].id, qid);
    assert_eq!(questions[0].max, Some(10.0));
    assert_eq!(questions[0].step, None);
}

#[tokio::test]
async fn add_question_to_missing_survey_is_not_found() {
    let store = store().await;
    let err = store
        .add_question("srv-nope", QuestionInput::new(QuestionType::YesNo, "?"))
        .await
        .unwrap_err();
    assert_eq!(err.kind(), ErrorKind::NotFound);
}

#[tokio::test]
async fn list_by_owner_returns_own_surveys() {
    let store = store().await;
    store.create_draft(NewSurvey::new(OWNER, "One")).await.unwrap();
    store.create_draft(NewSurvey::new(OWNER, "Two")).await.unwrap();

    let surveys = store.list_by_owner(OWNER).await.unwrap();
    assert_eq!(surveys.len(), 2);
}

#[tokio::test]
async fn file_backed_store_persists_across_opens() {
    let dir = tempfile::TempDir::new().unwrap();
    let path = dir.path().join("canvass.db");
    let path = path.to_str().unwrap();

    let id = {
        let store = SurveyStore::open_local(path, Some(AuthIdentity::new(OWNER)))
            .await
            .unwrap();
        seeded(&store, three_questions()).await.0
    };

    let reopened = SurveyStore::open_local(path, Some(AuthIdentity::new(OWNER)))
        .await
        .unwrap();
    assert_eq!(reopened.list_questions(&id).await.unwrap().len(), 3);
}
