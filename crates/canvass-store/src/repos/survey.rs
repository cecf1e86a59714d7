//! Survey repository.

use chrono::{DateTime, Utc};

use canvass_core::entities::{NewSurvey, Survey};
use canvass_core::enums::SurveyStatus;
use canvass_core::ids::PREFIX_SURVEY;
use canvass_core::updates::SurveyUpdate;

use crate::access::{require_owner, require_read, require_user};
use crate::error::StoreError;
use crate::helpers::{get_opt_string, optional_datetime, parse_datetime, parse_enum, parse_optional_datetime};
use crate::{SurveyStore, generate_id};

pub(crate) const SELECT_COLS: &str =
    "id, owner_id, title, description, starts_at, ends_at, status, created_at, updated_at";

fn row_to_survey(row: &libsql::Row) -> Result<Survey, StoreError> {
    Ok(Survey {
        id: row.get(0)?,
        owner_id: row.get(1)?,
        title: row.get(2)?,
        description: get_opt_string(row, 3)?,
        starts_at: parse_optional_datetime(get_opt_string(row, 4)?.as_deref())?,
        ends_at: parse_optional_datetime(get_opt_string(row, 5)?.as_deref())?,
        status: parse_enum(&row.get::<String>(6)?)?,
        created_at: parse_datetime(&row.get::<String>(7)?)?,
        updated_at: parse_datetime(&row.get::<String>(8)?)?,
    })
}

pub(crate) async fn fetch_survey(
    conn: &libsql::Connection,
    survey_id: &str,
) -> Result<Survey, StoreError> {
    let mut rows = conn
        .query(
            &format!("SELECT {SELECT_COLS} FROM surveys WHERE id = ?1"),
            [survey_id],
        )
        .await?;
    let row = rows
        .next()
        .await?
        .ok_or_else(|| StoreError::survey_not_found(survey_id))?;
    row_to_survey(&row)
}

/// Insert a new `Draft` survey and return its ID.
pub(crate) async fn insert_survey(
    conn: &libsql::Connection,
    survey: &NewSurvey,
) -> Result<String, StoreError> {
    let id = generate_id(conn, PREFIX_SURVEY).await?;
    let now = Utc::now().to_rfc3339();
    conn.execute(
        &format!(
            "INSERT INTO surveys ({SELECT_COLS})
             VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7, ?8, ?9)"
        ),
        libsql::params![
            id.as_str(),
            survey.owner_id.as_str(),
            survey.title.as_str(),
            survey.description.as_deref(),
            optional_datetime(survey.starts_at),
            optional_datetime(survey.ends_at),
            SurveyStatus::Draft.as_str(),
            now.as_str(),
            now.as_str()
        ],
    )
    .await?;
    Ok(id)
}

/// Merge the present fields of `update` into the stored survey and stamp
/// `updated_at`.
pub(crate) async fn merge_survey(
    conn: &libsql::Connection,
    survey_id: &str,
    update: &SurveyUpdate,
) -> Result<(), StoreError> {
    let mut sets = Vec::new();
    let mut params: Vec<libsql::Value> = Vec::new();
    let mut idx = 1usize;

    if let Some(ref title) = update.title {
        sets.push(format!("title = ?{idx}"));
        params.push(title.clone().into());
        idx += 1;
    }
    if let Some(ref description) = update.description {
        sets.push(format!("description = ?{idx}"));
        params.push(description.clone().map_or(libsql::Value::Null, Into::into));
        idx += 1;
    }
    if let Some(starts_at) = update.starts_at {
        sets.push(format!("starts_at = ?{idx}"));
        params.push(optional_datetime(starts_at));
        idx += 1;
    }
    if let Some(ends_at) = update.ends_at {
        sets.push(format!("ends_at = ?{idx}"));
        params.push(optional_datetime(ends_at));
        idx += 1;
    }

    sets.push(format!("updated_at = ?{idx}"));
    params.push(Utc::now().to_rfc3339().into());
    idx += 1;

    params.push(survey_id.into());
    let sql = format!("UPDATE surveys SET {} WHERE id = ?{idx}", sets.join(", "));
    let changed = conn.execute(&sql, libsql::params_from_iter(params)).await?;
    if changed == 0 {
        return Err(StoreError::survey_not_found(survey_id));
    }
    Ok(())
}

impl SurveyStore {
    pub async fn create_survey(&self, survey: &NewSurvey) -> Result<String, StoreError> {
        require_user(self.identity(), &survey.owner_id)?;
        let _guard = self.lock().await;
        let id = insert_survey(self.conn(), survey).await?;
        tracing::debug!(%id, owner = %survey.owner_id, "created survey");
        Ok(id)
    }

    pub async fn get_survey(&self, survey_id: &str) -> Result<Survey, StoreError> {
        let _guard = self.lock().await;
        let survey = fetch_survey(self.conn(), survey_id).await?;
        require_read(self.identity(), &survey)?;
        Ok(survey)
    }

    /// Surveys of `owner_id`, most recently updated first.
    pub async fn list_surveys(&self, owner_id: &str) -> Result<Vec<Survey>, StoreError> {
        require_user(self.identity(), owner_id)?;
        let _guard = self.lock().await;
        let mut rows = self
            .conn()
            .query(
                &format!(
                    "SELECT {SELECT_COLS} FROM surveys WHERE owner_id = ?1 ORDER BY updated_at DESC, id"
                ),
                [owner_id],
            )
            .await?;
        let mut surveys = Vec::new();
        while let Some(row) = rows.next().await? {
            surveys.push(row_to_survey(&row)?);
        }
        Ok(surveys)
    }

    /// Set the window and move to `Published`.
    pub async fn publish_survey(
        &self,
        survey_id: &str,
        starts_at: DateTime<Utc>,
        ends_at: DateTime<Utc>,
    ) -> Result<(), StoreError> {
        let _guard = self.lock().await;
        let survey = fetch_survey(self.conn(), survey_id).await?;
        require_owner(self.identity(), &survey)?;
        self.conn()
            .execute(
                "UPDATE surveys SET starts_at = ?1, ends_at = ?2, status = ?3, updated_at = ?4 WHERE id = ?5",
                libsql::params![
                    starts_at.to_rfc3339(),
                    ends_at.to_rfc3339(),
                    SurveyStatus::Published.as_str(),
                    Utc::now().to_rfc3339(),
                    survey_id
                ],
            )
            .await?;
        tracing::debug!(survey_id, "published survey");
        Ok(())
    }

    /// Write `status` only. `updated_at` is left alone.
    pub async fn set_status(&self, survey_id: &str, status: SurveyStatus) -> Result<(), StoreError> {
        let _guard = self.lock().await;
        let survey = fetch_survey(self.conn(), survey_id).await?;
        require_owner(self.identity(), &survey)?;
        self.conn()
            .execute(
                "UPDATE surveys SET status = ?1 WHERE id = ?2",
                libsql::params![status.as_str(), survey_id],
            )
            .await?;
        tracing::debug!(survey_id, %status, "status updated");
        Ok(())
    }

    /// Delete the survey, its questions, and its responses in one
    /// transaction.
    pub async fn delete_survey_cascade(&self, survey_id: &str) -> Result<(), StoreError> {
        let _guard = self.lock().await;
        let survey = fetch_survey(self.conn(), survey_id).await?;
        require_owner(self.identity(), &survey)?;

        let tx = self.conn().transaction().await?;
        let result = async {
            tx.execute("DELETE FROM responses WHERE survey_id = ?1", [survey_id])
                .await?;
            tx.execute("DELETE FROM questions WHERE survey_id = ?1", [survey_id])
                .await?;
            tx.execute("DELETE FROM surveys WHERE id = ?1", [survey_id])
                .await?;
            Ok::<(), StoreError>(())
        }
        .await;
        crate::repos::aggregate::finish(tx, result).await?;
        tracing::debug!(survey_id, "deleted survey");
        Ok(())
    }
}
