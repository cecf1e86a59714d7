//! Draft files: a `SurveyDraft` on disk as JSON or TOML, picked by
//! extension. Timestamps in TOML are quoted RFC 3339 strings.

use std::path::{Path, PathBuf};

use anyhow::Context;
use canvass_core::draft::SurveyDraft;

#[derive(Clone, Copy, Debug, Eq, PartialEq)]
enum DraftFormat {
    Json,
    Toml,
}

fn format_for(path: &Path) -> DraftFormat {
    match path.extension().and_then(|ext| ext.to_str()) {
        Some(ext) if ext.eq_ignore_ascii_case("toml") => DraftFormat::Toml,
        _ => DraftFormat::Json,
    }
}

pub fn read_draft(path: &Path) -> anyhow::Result<SurveyDraft> {
    let text = std::fs::read_to_string(path)
        .with_context(|| format!("failed to read draft file {}", path.display()))?;
    let draft = match format_for(path) {
        DraftFormat::Json => serde_json::from_str(&text).map_err(anyhow::Error::from),
        DraftFormat::Toml => toml::from_str(&text).map_err(anyhow::Error::from),
    };
    draft.with_context(|| format!("invalid draft file {}", path.display()))
}

/// Sibling path the new contents are staged in before the rename.
fn staging_path(path: &Path) -> PathBuf {
    let mut staged = path.as_os_str().to_owned();
    staged.push(".tmp");
    PathBuf::from(staged)
}

/// Write `draft` to `path`. The file is replaced in one rename, so a failed
/// write leaves the previous contents in place.
pub fn write_draft(path: &Path, draft: &SurveyDraft) -> anyhow::Result<()> {
    let text = match format_for(path) {
        DraftFormat::Json => serde_json::to_string_pretty(draft)?,
        DraftFormat::Toml => toml::to_string_pretty(draft)?,
    };
    let staged = staging_path(path);
    std::fs::write(&staged, text)
        .and_then(|()| std::fs::rename(&staged, path))
        .with_context(|| format!("failed to write draft file {}", path.display()))
}
