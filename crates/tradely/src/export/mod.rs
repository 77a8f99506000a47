//! Exporting analyses as downloadable artifacts
//!
//! Four independent encoders turn the full analysis into bytes. They share
//! one filename rule ([`resolve_filename`]) and one download primitive
//! ([`DownloadSink`]). Exports always read the complete [`AnalysisResult`],
//! never what the reveal engine has disclosed so far.

mod encode;
mod pdf;
mod sink;

use std::fmt;
use std::path::PathBuf;
use std::str::FromStr;

use serde::{Deserialize, Serialize};
use tracing::{info, warn};

use crate::analysis::{AnalysisResult, DEFAULT_LABEL};
use crate::error::{Result, TradelyError};

pub use encode::{encode_csv, encode_json, encode_pdf, encode_txt};
pub use pdf::PdfLayout;
pub use sink::{DirectorySink, DownloadSink, MemorySink};

/// Output encodings offered next to an analysis
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ExportFormat {
    Txt,
    Csv,
    Json,
    Pdf,
}

impl ExportFormat {
    pub const ALL: [Self; 4] = [Self::Txt, Self::Csv, Self::Json, Self::Pdf];

    pub fn extension(self) -> &'static str {
        match self {
            Self::Txt => "txt",
            Self::Csv => "csv",
            Self::Json => "json",
            Self::Pdf => "pdf",
        }
    }

    pub fn mime_type(self) -> &'static str {
        match self {
            Self::Txt => "text/plain",
            Self::Csv => "text/csv",
            Self::Json => "application/json",
            Self::Pdf => "application/pdf",
        }
    }
}

impl fmt::Display for ExportFormat {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.extension())
    }
}

impl FromStr for ExportFormat {
    type Err = TradelyError;

    fn from_str(s: &str) -> Result<Self> {
        match s.trim().to_ascii_lowercase().as_str() {
            "txt" | "text" => Ok(Self::Txt),
            "csv" => Ok(Self::Csv),
            "json" => Ok(Self::Json),
            "pdf" => Ok(Self::Pdf),
            other => Err(TradelyError::Other(format!("Unknown export format: {other}"))),
        }
    }
}

/// Payload of an artifact, as a browser would receive it
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ArtifactBody {
    /// Raw bytes handed over as a blob
    Blob(Vec<u8>),
    /// A `data:` URI whose payload is percent-encoded
    DataUri(String),
}

/// An encoded export, ready to be saved
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Artifact {
    pub body: ArtifactBody,
    pub filename: String,
    pub mime_type: &'static str,
}

impl Artifact {
    /// Bytes that end up on disk once the artifact is downloaded
    pub fn to_bytes(&self) -> Vec<u8> {
        match &self.body {
            ArtifactBody::Blob(bytes) => bytes.clone(),
            ArtifactBody::DataUri(uri) => {
                let payload = uri.split_once(',').map_or("", |(_, payload)| payload);
                percent_encoding::percent_decode_str(payload).collect()
            }
        }
    }
}

/// Caller label, or [`DEFAULT_LABEL`] when missing or blank
pub fn resolve_label(label: Option<&str>) -> &str {
    label
        .map(str::trim)
        .filter(|label| !label.is_empty())
        .unwrap_or(DEFAULT_LABEL)
}

/// Suggested filename for an export.
///
/// JSON exports of objects that carry their own `symbol` are named after it
/// (`<symbol>_data.json`); everything else is `<label>_analysis.<ext>`.
pub fn resolve_filename(format: ExportFormat, label: Option<&str>, symbol: Option<&str>) -> String {
    match (format, symbol.map(str::trim).filter(|s| !s.is_empty())) {
        (ExportFormat::Json, Some(symbol)) => format!("{symbol}_data.json"),
        _ => format!("{}_analysis.{}", resolve_label(label), format.extension()),
    }
}

/// Encode `analysis` in `format`, or `None` when there is nothing to export
pub fn encode(
    format: ExportFormat,
    analysis: &AnalysisResult,
    label: Option<&str>,
    layout: &PdfLayout,
) -> Option<Artifact> {
    match format {
        ExportFormat::Txt => encode_txt(analysis.narrative()?, label),
        ExportFormat::Csv => encode_csv(analysis.narrative()?, label),
        ExportFormat::Json => encode_json(analysis, label),
        ExportFormat::Pdf => encode_pdf(analysis.narrative()?, label, layout),
    }
}

/// Encodes analyses and hands the result to a [`DownloadSink`]
pub struct ExportPipeline<S> {
    sink: S,
    layout: PdfLayout,
}

impl<S: DownloadSink> ExportPipeline<S> {
    pub fn new(sink: S) -> Self {
        Self {
            sink,
            layout: PdfLayout::default(),
        }
    }

    pub fn with_layout(mut self, layout: PdfLayout) -> Self {
        self.layout = layout;
        self
    }

    pub fn sink(&self) -> &S {
        &self.sink
    }

    /// Whether `format` has anything to export; hosts use it to disable controls
    pub fn can_export(format: ExportFormat, analysis: &AnalysisResult) -> bool {
        match format {
            ExportFormat::Json => !analysis.is_empty(),
            _ => analysis.narrative().is_some(),
        }
    }

    /// Encode and save one artifact.
    ///
    /// Returns `Ok(None)` without touching the sink when the analysis has no
    /// content for this format.
    pub fn export(
        &self,
        format: ExportFormat,
        analysis: &AnalysisResult,
        label: Option<&str>,
    ) -> Result<Option<PathBuf>> {
        let Some(artifact) = encode(format, analysis, label, &self.layout) else {
            warn!(%format, "Nothing to export");
            return Ok(None);
        };

        let location = self.sink.save(&artifact)?;
        info!(%format, filename = %artifact.filename, location = %location.display(), "Exported analysis");
        Ok(Some(location))
    }

    pub fn save_as_txt(&self, analysis: &AnalysisResult, label: Option<&str>) -> Result<Option<PathBuf>> {
        self.export(ExportFormat::Txt, analysis, label)
    }

    pub fn save_as_csv(&self, analysis: &AnalysisResult, label: Option<&str>) -> Result<Option<PathBuf>> {
        self.export(ExportFormat::Csv, analysis, label)
    }

    pub fn save_as_json(&self, analysis: &AnalysisResult, label: Option<&str>) -> Result<Option<PathBuf>> {
        self.export(ExportFormat::Json, analysis, label)
    }

    pub fn save_as_pdf(&self, analysis: &AnalysisResult, label: Option<&str>) -> Result<Option<PathBuf>> {
        self.export(ExportFormat::Pdf, analysis, label)
    }
}
