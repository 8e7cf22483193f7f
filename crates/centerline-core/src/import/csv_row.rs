//! CSV row model and file-level parsing

use csv::{ReaderBuilder, StringRecord, Trim};
use serde::Deserialize;

use crate::error::DomainError;

/// One raw row of the import file. Every column is optional at this level;
/// the reconciler enforces `shopping_center_name`.
#[derive(Debug, Clone, Default, Deserialize, PartialEq)]
pub struct CenterRow {
    pub shopping_center_name: Option<String>,
    pub center_type: Option<String>,
    pub address_street: Option<String>,
    pub address_city: Option<String>,
    pub address_state: Option<String>,
    pub address_zip: Option<String>,
    pub county: Option<String>,
    pub municipality: Option<String>,
    pub owner: Option<String>,
    pub property_manager: Option<String>,
    pub total_gla: Option<String>,
    pub tenant_name: Option<String>,
    pub tenant_suite_number: Option<String>,
    pub square_footage: Option<String>,
    pub retail_category: Option<String>,
    pub base_rent: Option<String>,
    pub is_chain: Option<String>,
    pub google_place_id: Option<String>,
}

/// A row plus its spreadsheet line number (header is line 1).
#[derive(Debug, Clone, PartialEq)]
pub struct NumberedRow {
    pub line: usize,
    pub row: CenterRow,
}

/// Parses the whole file up front. Any structural problem (bad quoting,
/// ragged rows, invalid UTF-8, missing header) fails the entire import.
pub fn parse_center_rows(data: &[u8]) -> Result<Vec<NumberedRow>, DomainError> {
    let mut reader = ReaderBuilder::new()
        .has_headers(true)
        .trim(Trim::All)
        .from_reader(data);

    let headers = reader
        .headers()
        .map_err(|e| DomainError::Parse(format!("Failed to read CSV headers: {}", e)))?
        .clone();
    if headers.iter().all(|h| h.trim().is_empty()) {
        return Err(DomainError::Parse("CSV file has no header row".to_string()));
    }

    let mut rows = Vec::new();
    let mut record = StringRecord::new();
    loop {
        let read = reader
            .read_record(&mut record)
            .map_err(|e| DomainError::Parse(format!("Failed to parse CSV: {}", e)))?;
        if !read {
            break;
        }
        // Line where the record starts; quoted cells may span several lines.
        let line = record
            .position()
            .map_or(rows.len() + 2, |p| p.line() as usize);
        let row: CenterRow = record.deserialize(Some(&headers)).map_err(|e| {
            DomainError::Parse(format!("Failed to parse CSV row {}: {}", line, e))
        })?;
        rows.push(NumberedRow { line, row });
    }

    Ok(rows)
}
