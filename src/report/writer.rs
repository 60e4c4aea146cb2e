//! @ai:module:intent Persist generated report text to dated Markdown files
//! @ai:module:layer infrastructure
//! @ai:module:public_api ReportWriter
//! @ai:module:stateless true

use crate::report::ReportKind;
use anyhow::{Context, Result};
use chrono::{DateTime, Local};
use regex::Regex;
use std::path::{Path, PathBuf};
use std::sync::OnceLock;

/// @ai:intent Owns the output directory layout and file naming for reports
#[derive(Debug, Clone)]
pub struct ReportWriter {
    reports_dir: PathBuf,
}

impl ReportWriter {
    /// @ai:effects pure
    pub fn new(reports_dir: impl Into<PathBuf>) -> Self {
        Self {
            reports_dir: reports_dir.into(),
        }
    }

    pub fn reports_dir(&self) -> &Path {
        &self.reports_dir
    }

    /// @ai:intent Write a report stamped with the current local time
    /// @ai:effects fs:write, time
    pub fn write(&self, kind: ReportKind, label: &str, text: &str) -> Result<(String, PathBuf)> {
        self.write_at(kind, label, text, Local::now())
    }

    /// @ai:intent Write `<reports_dir>/<kind>/<label>_<timestamp>.md`
    /// @ai:effects fs:write
    pub fn write_at(
        &self,
        kind: ReportKind,
        label: &str,
        text: &str,
        at: DateTime<Local>,
    ) -> Result<(String, PathBuf)> {
        let dir = self.reports_dir.join(kind.as_str());
        std::fs::create_dir_all(&dir)
            .with_context(|| format!("Failed to create report directory: {}", dir.display()))?;

        let file_name = format!(
            "{}_{}.md",
            sanitize_label(label),
            at.format("%Y-%m-%d_%H-%M-%S")
        );
        let path = dir.join(file_name);

        std::fs::write(&path, text)
            .with_context(|| format!("Failed to write report: {}", path.display()))?;

        tracing::info!("{} report saved to {}", kind.display_name(), path.display());
        Ok((text.to_string(), path))
    }
}

/// @ai:intent Make a label safe for use as a file name component
/// @ai:effects pure
pub(crate) fn sanitize_label(label: &str) -> String {
    static UNSAFE: OnceLock<Regex> = OnceLock::new();
    let unsafe_chars = UNSAFE.get_or_init(|| Regex::new(r"[^A-Za-z0-9._-]+").unwrap());

    let cleaned = unsafe_chars.replace_all(label.trim(), "_");
    let cleaned = cleaned.trim_matches('_');
    if cleaned.is_empty() {
        "report".to_string()
    } else {
        cleaned.to_string()
    }
}
