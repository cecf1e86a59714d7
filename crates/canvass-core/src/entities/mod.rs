//! Entity structs for the survey aggregate and submitted responses.
//!
//! Each stored entity maps to a table in the document store. All structs
//! derive `Serialize`, `Deserialize`, and `JsonSchema` for JSON roundtrip and
//! schema validation.

mod question;
mod response;
mod survey;

pub use question::{Question, QuestionInput};
pub use response::{Answer, AnswerRecord, ResponseSubmission, SurveyResponse};
pub use survey::{CreatedSurvey, NewSurvey, Survey, SurveyWithQuestions};
