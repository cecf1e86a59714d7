//! Repository methods on [`SurveyStore`](crate::SurveyStore), one module
//! per table plus the aggregate writes that span them.
//!
//! The row-level functions take a `&libsql::Connection` so they run the
//! same way on the bare connection and inside a transaction.

pub mod aggregate;
pub mod question;
pub mod response;
pub mod survey;
