//! Per-format encoders

use percent_encoding::{AsciiSet, NON_ALPHANUMERIC, utf8_percent_encode};

use super::pdf::PdfLayout;
use super::{Artifact, ArtifactBody, ExportFormat, resolve_filename};
use crate::analysis::AnalysisResult;

/// Characters left alone by JavaScript's `encodeURIComponent`
const URI_COMPONENT: &AsciiSet = &NON_ALPHANUMERIC
    .remove(b'-')
    .remove(b'_')
    .remove(b'.')
    .remove(b'!')
    .remove(b'~')
    .remove(b'*')
    .remove(b'\'')
    .remove(b'(')
    .remove(b')');

const CSV_DATA_URI_PREFIX: &str = "data:text/csv;charset=utf-8,";

/// Narrative as UTF-8 text, unchanged
pub fn encode_txt(content: &str, label: Option<&str>) -> Option<Artifact> {
    if content.is_empty() {
        return None;
    }
    Some(Artifact {
        body: ArtifactBody::Blob(content.as_bytes().to_vec()),
        filename: resolve_filename(ExportFormat::Txt, label, None),
        mime_type: ExportFormat::Txt.mime_type(),
    })
}

/// Narrative as a single percent-encoded CSV data URI.
///
/// The text is not tabular, so it is not split into rows.
pub fn encode_csv(content: &str, label: Option<&str>) -> Option<Artifact> {
    if content.is_empty() {
        return None;
    }
    let uri = format!("{CSV_DATA_URI_PREFIX}{}", utf8_percent_encode(content, URI_COMPONENT));
    Some(Artifact {
        body: ArtifactBody::DataUri(uri),
        filename: resolve_filename(ExportFormat::Csv, label, None),
        mime_type: ExportFormat::Csv.mime_type(),
    })
}

/// Whole analysis object, pretty-printed with two-space indentation
pub fn encode_json(analysis: &AnalysisResult, label: Option<&str>) -> Option<Artifact> {
    if analysis.is_empty() {
        return None;
    }
    // Serializing a JSON map cannot fail
    let json = serde_json::to_string_pretty(analysis.as_map()).ok()?;
    Some(Artifact {
        body: ArtifactBody::Blob(json.into_bytes()),
        filename: resolve_filename(ExportFormat::Json, label, analysis.symbol()),
        mime_type: ExportFormat::Json.mime_type(),
    })
}

/// Narrative laid out on as many PDF pages as it needs
pub fn encode_pdf(content: &str, label: Option<&str>, layout: &PdfLayout) -> Option<Artifact> {
    if content.is_empty() {
        return None;
    }
    Some(Artifact {
        body: ArtifactBody::Blob(layout.render(content)),
        filename: resolve_filename(ExportFormat::Pdf, label, None),
        mime_type: ExportFormat::Pdf.mime_type(),
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_txt_is_byte_exact() {
        let content = "Résumé: Buy.\n\tTarget 180 €";
        let artifact = encode_txt(content, Some("AAPL")).unwrap();
        assert_eq!(artifact.filename, "AAPL_analysis.txt");
        assert_eq!(artifact.mime_type, "text/plain");
        assert_eq!(artifact.to_bytes(), content.as_bytes());
    }

    #[test]
    fn test_csv_is_percent_encoded_data_uri() {
        let artifact = encode_csv("Buy now, (maybe) 100%\nok", None).unwrap();
        assert_eq!(artifact.filename, "stock_analysis.csv");

        let ArtifactBody::DataUri(uri) = &artifact.body else {
            panic!("csv export should be a data URI");
        };
        assert_eq!(
            uri,
            "data:text/csv;charset=utf-8,Buy%20now%2C%20(maybe)%20100%25%0Aok"
        );
        assert_eq!(artifact.to_bytes(), b"Buy now, (maybe) 100%\nok");
    }

    #[test]
    fn test_csv_non_ascii_round_trips() {
        let content = "Kurs: 12,5 €";
        let artifact = encode_csv(content, Some("SAP")).unwrap();
        assert_eq!(String::from_utf8(artifact.to_bytes()).unwrap(), content);
    }

    #[test]
    fn test_json_pretty_print_keeps_key_order() {
        let analysis = AnalysisResult::from_value(json!({
            "symbol": "AAPL",
            "llm_response": "short",
            "deepthinking_response": "long",
            "stock_data": {"metadata": {"ticker": "AAPL"}},
        }));
        let artifact = encode_json(&analysis, Some("ignored")).unwrap();
        assert_eq!(artifact.filename, "AAPL_data.json");

        let text = String::from_utf8(artifact.to_bytes()).unwrap();
        assert!(text.starts_with("{\n  \"symbol\": \"AAPL\",\n  \"llm_response\""));
        assert!(text.contains("\n    \"metadata\": {"));

        let decoded: AnalysisResult = serde_json::from_str(&text).unwrap();
        assert_eq!(decoded, analysis);
    }

    #[test]
    fn test_json_without_symbol_uses_label() {
        let analysis = AnalysisResult::from_text(Some("MSFT"), "Hold.");
        let artifact = encode_json(&analysis, Some("MSFT")).unwrap();
        assert_eq!(artifact.filename, "MSFT_analysis.json");

        let artifact = encode_json(&analysis, None).unwrap();
        assert_eq!(artifact.filename, "stock_analysis.json");
    }

    #[test]
    fn test_empty_content_produces_nothing() {
        assert!(encode_txt("", Some("AAPL")).is_none());
        assert!(encode_csv("", Some("AAPL")).is_none());
        assert!(encode_pdf("", Some("AAPL"), &PdfLayout::default()).is_none());
        assert!(encode_json(&AnalysisResult::default(), Some("AAPL")).is_none());
    }
}
