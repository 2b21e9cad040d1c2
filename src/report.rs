//! Duration report model and JSON rendering.

use crate::error::{Error, Result};
use serde::Serialize;

/// Column headers of the report, in output order.
pub const COLUMNS: [&str; 2] = ["number page", "duration"];

/// One row of the report: an output page number and an optional
/// transition duration in seconds.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct DurationRow {
    /// 1-based rank of the slide after numeric sorting.
    #[serde(rename = "number page")]
    pub page: u32,
    /// Transition duration in seconds, rounded to two decimals.
    pub duration: Option<f64>,
}

/// Ordered collection of duration rows, one per slide entry.
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct DurationReport {
    pub rows: Vec<DurationRow>,
}

/// JSON output format.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum JsonFormat {
    /// Indented, human-readable JSON.
    Pretty,
    /// Single-line JSON.
    Compact,
}

impl DurationReport {
    /// Create an empty report.
    pub fn new() -> Self {
        Self::default()
    }

    /// Number of data rows.
    pub fn len(&self) -> usize {
        self.rows.len()
    }

    /// Whether the report has no data rows.
    pub fn is_empty(&self) -> bool {
        self.rows.is_empty()
    }

    /// Render the rows as JSON.
    pub fn to_json(&self, format: JsonFormat) -> Result<String> {
        let json = match format {
            JsonFormat::Pretty => serde_json::to_string_pretty(&self.rows),
            JsonFormat::Compact => serde_json::to_string(&self.rows),
        };
        json.map_err(|e| Error::ReportWrite(e.to_string()))
    }
}

impl FromIterator<DurationRow> for DurationReport {
    fn from_iter<I: IntoIterator<Item = DurationRow>>(iter: I) -> Self {
        Self {
            rows: iter.into_iter().collect(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn sample() -> DurationReport {
        DurationReport {
            rows: vec![
                DurationRow {
                    page: 1,
                    duration: Some(2.5),
                },
                DurationRow {
                    page: 2,
                    duration: None,
                },
            ],
        }
    }

    #[test]
    fn test_len() {
        assert_eq!(sample().len(), 2);
        assert!(DurationReport::new().is_empty());
    }

    #[test]
    fn test_to_json_compact() {
        let json = sample().to_json(JsonFormat::Compact).unwrap();
        assert_eq!(
            json,
            r#"[{"number page":1,"duration":2.5},{"number page":2,"duration":null}]"#
        );
    }

    #[test]
    fn test_to_json_pretty_is_multiline() {
        let json = sample().to_json(JsonFormat::Pretty).unwrap();
        assert!(json.contains('\n'));
        assert!(json.contains("\"number page\": 1"));
    }
}
