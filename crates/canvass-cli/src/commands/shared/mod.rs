pub mod draft_file;
pub mod parse;

use serde::Serialize;

/// Output of commands that create something.
#[derive(Debug, Serialize)]
pub struct Created {
    pub id: String,
}

/// Output of commands that change a survey without returning it.
#[derive(Debug, Serialize)]
pub struct Done<'a> {
    pub id: &'a str,
    pub status: &'a str,
}

impl<'a> Done<'a> {
    pub const fn new(id: &'a str, status: &'a str) -> Self {
        Self { id, status }
    }
}
