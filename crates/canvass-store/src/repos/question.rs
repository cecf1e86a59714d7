//! Question repository.

use canvass_core::entities::{Question, QuestionInput};
use canvass_core::ids::PREFIX_QUESTION;

use crate::access::{require_owner, require_read};
use crate::error::StoreError;
use crate::helpers::{get_opt_string, optional_json, optional_real, parse_enum, parse_optional_json};
use crate::repos::survey::fetch_survey;
use crate::{SurveyStore, generate_id};

const SELECT_COLS: &str = "id, survey_id, type, title, text, options, min, max, step, \"order\"";

fn row_to_question(row: &libsql::Row) -> Result<Question, StoreError> {
    Ok(Question {
        id: row.get(0)?,
        survey_id: row.get(1)?,
        kind: parse_enum(&row.get::<String>(2)?)?,
        title: row.get(3)?,
        text: get_opt_string(row, 4)?,
        options: parse_optional_json(get_opt_string(row, 5)?.as_deref())?,
        min: row.get::<Option<f64>>(6)?,
        max: row.get::<Option<f64>>(7)?,
        step: row.get::<Option<f64>>(8)?,
        order: row.get(9)?,
    })
}

/// Questions of a survey, `order` ascending.
pub(crate) async fn fetch_questions(
    conn: &libsql::Connection,
    survey_id: &str,
) -> Result<Vec<Question>, StoreError> {
    let mut rows = conn
        .query(
            &format!(
                "SELECT {SELECT_COLS} FROM questions WHERE survey_id = ?1 ORDER BY \"order\", rowid"
            ),
            [survey_id],
        )
        .await?;
    let mut questions = Vec::new();
    while let Some(row) = rows.next().await? {
        questions.push(row_to_question(&row)?);
    }
    Ok(questions)
}

/// Stored question IDs of a survey.
pub(crate) async fn fetch_question_ids(
    conn: &libsql::Connection,
    survey_id: &str,
) -> Result<Vec<String>, StoreError> {
    let mut rows = conn
        .query(
            "SELECT id FROM questions WHERE survey_id = ?1 ORDER BY \"order\", rowid",
            [survey_id],
        )
        .await?;
    let mut ids = Vec::new();
    while let Some(row) = rows.next().await? {
        ids.push(row.get::<String>(0)?);
    }
    Ok(ids)
}

/// Insert `input` as a new question under a fresh ID. Any ID on the input
/// is ignored.
pub(crate) async fn insert_question(
    conn: &libsql::Connection,
    survey_id: &str,
    input: &QuestionInput,
) -> Result<String, StoreError> {
    let id = generate_id(conn, PREFIX_QUESTION).await?;
    conn.execute(
        &format!(
            "INSERT INTO questions ({SELECT_COLS})
             VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7, ?8, ?9, ?10)"
        ),
        libsql::params![
            id.as_str(),
            survey_id,
            input.kind.as_str(),
            input.title.as_str(),
            input.text.as_deref(),
            optional_json(input.options.as_ref())?,
            optional_real(input.min),
            optional_real(input.max),
            optional_real(input.step),
            input.order
        ],
    )
    .await?;
    Ok(id)
}

/// Overwrite every field of the stored question `question_id` with `input`.
pub(crate) async fn overwrite_question(
    conn: &libsql::Connection,
    survey_id: &str,
    question_id: &str,
    input: &QuestionInput,
) -> Result<(), StoreError> {
    let changed = conn
        .execute(
            "UPDATE questions
             SET type = ?1, title = ?2, text = ?3, options = ?4, min = ?5, max = ?6, step = ?7, \"order\" = ?8
             WHERE id = ?9 AND survey_id = ?10",
            libsql::params![
                input.kind.as_str(),
                input.title.as_str(),
                input.text.as_deref(),
                optional_json(input.options.as_ref())?,
                optional_real(input.min),
                optional_real(input.max),
                optional_real(input.step),
                input.order,
                question_id,
                survey_id
            ],
        )
        .await?;
    if changed == 0 {
        return Err(StoreError::NotFound {
            entity: "question",
            id: question_id.to_string(),
        });
    }
    Ok(())
}

impl SurveyStore {
    /// Add one question to a survey the caller owns.
    pub async fn add_question_to(
        &self,
        survey_id: &str,
        input: &QuestionInput,
    ) -> Result<String, StoreError> {
        let _guard = self.lock().await;
        let survey = fetch_survey(self.conn(), survey_id).await?;
        require_owner(self.identity(), &survey)?;
        let id = insert_question(self.conn(), survey_id, input).await?;
        tracing::debug!(survey_id, question_id = %id, "added question");
        Ok(id)
    }

    pub async fn list_survey_questions(&self, survey_id: &str) -> Result<Vec<Question>, StoreError> {
        let _guard = self.lock().await;
        let survey = fetch_survey(self.conn(), survey_id).await?;
        require_read(self.identity(), &survey)?;
        fetch_questions(self.conn(), survey_id).await
    }
}
