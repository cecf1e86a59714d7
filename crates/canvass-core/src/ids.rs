//! ID prefixes for store-assigned identifiers.
//!
//! IDs look like `srv-a3f8b2c19d04e6f7`: a short prefix, a dash, and
//! sixteen lowercase hex characters.

pub const PREFIX_SURVEY: &str = "srv";
pub const PREFIX_QUESTION: &str = "qst";
pub const PREFIX_RESPONSE: &str = "rsp";
pub const PREFIX_RESPONDENT: &str = "anon";

pub const ALL_PREFIXES: [&str; 4] = [
    PREFIX_SURVEY,
    PREFIX_QUESTION,
    PREFIX_RESPONSE,
    PREFIX_RESPONDENT,
];

/// Format a prefixed ID from a random hex suffix.
#[must_use]
pub fn format_id(prefix: &str, hex: &str) -> String {
    format!("{prefix}-{hex}")
}

/// Return the prefix of an ID, if it has one.
#[must_use]
pub fn prefix_of(id: &str) -> Option<&str> {
    id.split_once('-').map(|(prefix, _)| prefix)
}
