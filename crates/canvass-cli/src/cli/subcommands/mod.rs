mod question;
mod survey;

pub use question::QuestionCommands;
pub use survey::SurveyCommands;
