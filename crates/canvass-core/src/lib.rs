//! # canvass-core
//!
//! Core types, the backend port, and the application service for canvass.
//!
//! This crate provides the foundational pieces shared across all canvass crates:
//! - Entity structs for surveys, questions, and submitted responses
//! - Status and question-type enums with the survey lifecycle
//! - ID prefix constants
//! - The error taxonomy surfaced by every backend
//! - The `SurveyBackend` port that concrete adapters implement
//! - Reconciliation planning for the survey aggregate
//! - The builder draft model, answer values, and result tallies
//! - `SurveyService`, the facade the CLI talks to

pub mod answer;
pub mod backend;
pub mod draft;
pub mod entities;
pub mod enums;
pub mod errors;
pub mod identity;
pub mod ids;
pub mod reconcile;
pub mod results;
pub mod service;
pub mod updates;
pub mod validation;

pub use backend::SurveyBackend;
pub use errors::{BackendError, ErrorKind};
pub use service::SurveyService;
