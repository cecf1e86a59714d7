//! Caller-side validation.
//!
//! The persistence layer stores whatever it is given. These checks run in the
//! service (and the builder draft) before a body reaches a backend.

use std::collections::HashSet;

use chrono::{DateTime, Utc};

use crate::entities::{Question, QuestionInput, ResponseSubmission};
use crate::errors::ValidationError;

/// Title must contain something other than whitespace.
#[must_use]
pub fn validate_title(title: &str) -> Option<ValidationError> {
    title
        .trim()
        .is_empty()
        .then(|| ValidationError::new("title", "must not be empty"))
}

/// When both ends of the window are set, `ends_at` must not precede
/// `starts_at`.
#[must_use]
pub fn validate_window(
    starts_at: Option<DateTime<Utc>>,
    ends_at: Option<DateTime<Utc>>,
) -> Option<ValidationError> {
    match (starts_at, ends_at) {
        (Some(start), Some(end)) if end < start => Some(ValidationError::new(
            "ends_at",
            "must not be before starts_at",
        )),
        _ => None,
    }
}

/// Publishing needs a complete window with `ends_at >= starts_at`.
///
/// # Errors
///
/// Returns every violated rule.
pub fn validate_publish_window(
    starts_at: Option<DateTime<Utc>>,
    ends_at: Option<DateTime<Utc>>,
) -> Result<(DateTime<Utc>, DateTime<Utc>), Vec<ValidationError>> {
    let mut errors = Vec::new();
    if starts_at.is_none() {
        errors.push(ValidationError::new("starts_at", "required to publish"));
    }
    if ends_at.is_none() {
        errors.push(ValidationError::new("ends_at", "required to publish"));
    }
    errors.extend(validate_window(starts_at, ends_at));
    match (starts_at, ends_at) {
        (Some(start), Some(end)) if errors.is_empty() => Ok((start, end)),
        _ => Err(errors),
    }
}

/// Check one question body at position `index`.
#[must_use]
pub fn validate_question(index: usize, question: &QuestionInput) -> Vec<ValidationError> {
    let field = |name: &str| format!("questions[{index}].{name}");
    let mut errors = Vec::new();

    if question.title.trim().is_empty() {
        errors.push(ValidationError::new(field("title"), "must not be empty"));
    }

    if question.kind.requires_options() {
        let options = question.options.as_deref().unwrap_or_default();
        if options.is_empty() {
            errors.push(ValidationError::new(
                field("options"),
                format!("a {} question needs at least one option", question.kind),
            ));
        }
        if options.iter().any(|option| option.trim().is_empty()) {
            errors.push(ValidationError::new(field("options"), "options must not be empty"));
        }
        let unique: HashSet<&String> = options.iter().collect();
        if unique.len() != options.len() {
            errors.push(ValidationError::new(field("options"), "options must be unique"));
        }
    }

    if question.kind.is_numeric() {
        if let (Some(min), Some(max)) = (question.min, question.max)
            && min >= max
        {
            errors.push(ValidationError::new(field("max"), "must be greater than min"));
        }
        if question.step.is_some_and(|step| step <= 0.0) {
            errors.push(ValidationError::new(field("step"), "must be positive"));
        }
    }

    errors
}

/// Check a whole question list: each body, plus unique `order` values.
#[must_use]
pub fn validate_questions(questions: &[QuestionInput]) -> Vec<ValidationError> {
    let mut errors: Vec<ValidationError> = questions
        .iter()
        .enumerate()
        .flat_map(|(idx, question)| validate_question(idx, question))
        .collect();

    let mut seen = HashSet::with_capacity(questions.len());
    for (idx, question) in questions.iter().enumerate() {
        if !seen.insert(question.order) {
            errors.push(ValidationError::new(
                format!("questions[{idx}].order"),
                format!("order {} is used twice", question.order),
            ));
        }
    }

    errors
}

/// Check a submission against the survey's questions: every answer refers
/// to a question of the survey, no question is answered twice, and every
/// value fits its question.
#[must_use]
pub fn validate_submission(
    questions: &[Question],
    submission: &ResponseSubmission,
) -> Vec<ValidationError> {
    let mut errors = Vec::new();
    let mut answered = HashSet::with_capacity(submission.answers.len());

    if submission.answers.is_empty() {
        errors.push(ValidationError::new("answers", "at least one answer is required"));
    }

    for (idx, answer) in submission.answers.iter().enumerate() {
        let field = format!("answers[{idx}]");
        let Some(question) = questions.iter().find(|q| q.id == answer.question_id) else {
            errors.push(ValidationError::new(
                field,
                format!("unknown question {}", answer.question_id),
            ));
            continue;
        };
        if !answered.insert(answer.question_id.as_str()) {
            errors.push(ValidationError::new(
                field,
                format!("question {} answered twice", answer.question_id),
            ));
            continue;
        }
        if let Err(error) = answer.value.validate_for(question, &field) {
            errors.push(error);
        }
    }

    errors
}
