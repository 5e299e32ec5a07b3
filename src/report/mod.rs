//! Report generation.
//!
//! The assembler builds one [`ReportDocument`]; Markdown, PDF and JSON are
//! all rendered from that same value.

pub mod assembler;
pub mod document;
pub mod markdown;
pub mod pdf;

pub use assembler::{assemble, ReportSettings};
pub use document::ReportDocument;
pub use markdown::render_markdown;
pub use pdf::{layout_pages, render_pdf, PageSetup};

use crate::error::ReportError;
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};
use tracing::info;

/// Export format for the report.
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize, clap::ValueEnum,
)]
#[serde(rename_all = "lowercase")]
pub enum ReportFormat {
    /// Markdown text (default)
    #[default]
    Markdown,
    /// Paginated PDF document
    Pdf,
    /// JSON document
    Json,
}

impl ReportFormat {
    /// Fixed output file name for this format.
    pub fn file_name(self) -> &'static str {
        match self {
            ReportFormat::Markdown => "olympic_analysis_report.md",
            ReportFormat::Pdf => "olympic_analysis_report.pdf",
            ReportFormat::Json => "olympic_analysis_report.json",
        }
    }
}

/// Generate a JSON report.
pub fn render_json(document: &ReportDocument) -> Result<String, ReportError> {
    serde_json::to_string_pretty(document).map_err(Into::into)
}

/// Render the report in the requested format.
pub fn render(document: &ReportDocument, format: ReportFormat) -> Result<Vec<u8>, ReportError> {
    match format {
        ReportFormat::Markdown => Ok(render_markdown(document).into_bytes()),
        ReportFormat::Json => Ok(render_json(document)?.into_bytes()),
        ReportFormat::Pdf => {
            let setup = PageSetup::default();
            render_pdf(&layout_pages(document, setup), setup)
        }
    }
}

/// Render and write the report into `output_dir` under the format's fixed
/// file name. Returns the written path.
pub fn export(
    document: &ReportDocument,
    format: ReportFormat,
    output_dir: &Path,
) -> Result<PathBuf, ReportError> {
    let content = render(document, format)?;

    std::fs::create_dir_all(output_dir)?;
    let path = output_dir.join(format.file_name());
    std::fs::write(&path, &content)?;

    info!("Wrote {} bytes to {}", content.len(), path.display());
    Ok(path)
}
