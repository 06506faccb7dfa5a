use std::io::Read;
use std::path::Path;

use super::domain::Lead;

pub const REQUIRED_COLUMNS: [&str; 6] = [
    "name",
    "role",
    "company",
    "industry",
    "location",
    "linkedin_bio",
];

#[derive(Debug, thiserror::Error)]
pub enum LeadImportError {
    #[error("failed to read lead file: {0}")]
    Io(#[from] std::io::Error),
    #[error("invalid lead CSV data: {0}")]
    Csv(#[from] csv::Error),
    #[error("Missing required columns: {}", .0.join(", "))]
    MissingColumns(Vec<String>),
    #[error("CSV file is empty or improperly formatted")]
    Empty,
}

pub fn leads_from_path<P: AsRef<Path>>(path: P) -> Result<Vec<Lead>, LeadImportError> {
    let file = std::fs::File::open(path)?;
    parse_leads(file)
}

/// Parses a lead CSV. Extra columns are ignored and short rows read as empty cells.
pub fn parse_leads<R: Read>(reader: R) -> Result<Vec<Lead>, LeadImportError> {
    let mut csv_reader = csv::ReaderBuilder::new()
        .trim(csv::Trim::All)
        .flexible(true)
        .from_reader(reader);

    let headers: Vec<String> = csv_reader
        .headers()?
        .iter()
        .map(normalize_header)
        .collect();

    let mut positions = [0usize; 6];
    let mut missing = Vec::new();
    for (slot, column) in REQUIRED_COLUMNS.iter().enumerate() {
        match headers.iter().position(|header| header == column) {
            Some(position) => positions[slot] = position,
            None => missing.push((*column).to_string()),
        }
    }
    if !missing.is_empty() {
        return Err(LeadImportError::MissingColumns(missing));
    }

    let mut leads = Vec::new();
    for record in csv_reader.records() {
        let record = record?;
        let cell = |slot: usize| record.get(positions[slot]).unwrap_or_default().to_string();

        leads.push(Lead {
            name: cell(0),
            role: cell(1),
            company: cell(2),
            industry: cell(3),
            location: cell(4),
            linkedin_bio: cell(5),
        });
    }

    if leads.is_empty() {
        return Err(LeadImportError::Empty);
    }

    Ok(leads)
}

fn normalize_header(value: &str) -> String {
    value.replace(['\u{feff}', '\u{200b}'], "").trim().to_string()
}
