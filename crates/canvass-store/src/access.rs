//! Access rules.
//!
//! - Writes to a survey and reading its responses: owner only.
//! - Creating a survey: the signed-in user, as owner.
//! - Reading a survey and its questions: the owner, or anyone once the
//!   survey is published or closed.
//! - Listing by owner: that owner only.
//! - Submitting a response: anyone, while the survey is published.

use canvass_core::entities::Survey;
use canvass_core::enums::SurveyStatus;
use canvass_core::identity::AuthIdentity;

use crate::error::StoreError;

fn caller(identity: Option<&AuthIdentity>) -> Result<&str, StoreError> {
    identity
        .map(|identity| identity.user_id.as_str())
        .ok_or_else(|| StoreError::Forbidden("sign in required".into()))
}

/// Caller must be signed in as `owner_id`.
pub fn require_user(identity: Option<&AuthIdentity>, owner_id: &str) -> Result<(), StoreError> {
    if caller(identity)? == owner_id {
        Ok(())
    } else {
        Err(StoreError::Forbidden(format!(
            "cannot act on behalf of {owner_id}"
        )))
    }
}

/// Caller must own `survey`.
pub fn require_owner(identity: Option<&AuthIdentity>, survey: &Survey) -> Result<(), StoreError> {
    if caller(identity)? == survey.owner_id {
        Ok(())
    } else {
        Err(StoreError::Forbidden(format!(
            "survey {} belongs to another user",
            survey.id
        )))
    }
}

/// Caller may read `survey` and its questions.
pub fn require_read(identity: Option<&AuthIdentity>, survey: &Survey) -> Result<(), StoreError> {
    if survey.status.is_public() {
        return Ok(());
    }
    match identity {
        Some(identity) if identity.user_id == survey.owner_id => Ok(()),
        _ => Err(StoreError::Forbidden(format!(
            "survey {} is not published",
            survey.id
        ))),
    }
}

/// Survey must be accepting responses.
pub fn require_accepting(survey: &Survey) -> Result<(), StoreError> {
    if survey.status == SurveyStatus::Published {
        Ok(())
    } else {
        Err(StoreError::Forbidden(format!(
            "survey {} is not accepting responses",
            survey.id
        )))
    }
}
