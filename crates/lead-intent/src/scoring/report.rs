use serde::Serialize;

use super::domain::{IntentLabel, ScoredLead};

pub const CSV_HEADER: &str = "name,role,company,industry,location,intent,score,reasoning";

/// Counts per final intent label plus the rounded mean score.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct BatchSummary {
    pub total: usize,
    pub high: usize,
    pub medium: usize,
    pub low: usize,
    pub average_score: u8,
}

impl BatchSummary {
    /// Degraded records count as Low and contribute 0 to the average.
    pub fn from_results(results: &[ScoredLead]) -> Self {
        let mut summary = Self {
            total: results.len(),
            ..Self::default()
        };

        let mut score_sum: u64 = 0;
        for lead in results {
            match lead.intent {
                IntentLabel::High => summary.high += 1,
                IntentLabel::Medium => summary.medium += 1,
                IntentLabel::Low => summary.low += 1,
            }
            score_sum += u64::from(lead.score);
        }

        if summary.total > 0 {
            let mean = score_sum as f64 / summary.total as f64;
            summary.average_score = mean.round() as u8;
        }

        summary
    }
}

/// Output of one scoring batch, results in input order.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ScoringReport {
    pub summary: BatchSummary,
    pub results: Vec<ScoredLead>,
}

impl ScoringReport {
    pub fn preview(&self, limit: usize) -> &[ScoredLead] {
        &self.results[..self.results.len().min(limit)]
    }
}

#[derive(Debug, thiserror::Error)]
pub enum ExportError {
    #[error("failed to write CSV row: {0}")]
    Csv(#[from] csv::Error),
    #[error("failed to flush CSV output: {0}")]
    Io(#[from] std::io::Error),
    #[error("CSV output is not valid UTF-8: {0}")]
    Encoding(#[from] std::string::FromUtf8Error),
}

/// Flattened delimited-text rendering: every text field quoted with quotes doubled,
/// score bare.
pub fn results_to_csv(results: &[ScoredLead]) -> Result<String, ExportError> {
    let mut buffer = Vec::with_capacity(CSV_HEADER.len() + 1 + results.len() * 128);
    buffer.extend_from_slice(CSV_HEADER.as_bytes());
    buffer.push(b'\n');

    // cells arrive pre-quoted, so the writer must not add its own quoting
    let mut writer = csv::WriterBuilder::new()
        .has_headers(false)
        .quote_style(csv::QuoteStyle::Never)
        .terminator(csv::Terminator::Any(b'\n'))
        .from_writer(buffer);

    for lead in results {
        writer.write_record([
            quoted(&lead.name),
            quoted(&lead.role),
            quoted(&lead.company),
            quoted(&lead.industry),
            quoted(&lead.location),
            quoted(lead.intent.label()),
            lead.score.to_string(),
            quoted(&lead.reasoning),
        ])?;
    }

    let bytes = writer
        .into_inner()
        .map_err(|err| ExportError::Io(err.into_error()))?;
    Ok(String::from_utf8(bytes)?)
}

fn quoted(value: &str) -> String {
    format!("\"{}\"", value.replace('"', "\"\""))
}
