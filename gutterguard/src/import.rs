//! Entry list import
//!
//! Reads conductor rows from CSV exports of spreadsheets and from JSON files.
//! Spreadsheet exports often carry title rows and blank padding above the
//! real header, so the CSV reader drops blank rows and then guesses which row
//! is the header before mapping columns.

use std::path::Path;

use crate::conductor::EntryInput;
use crate::core::SizingError;

/// Rows past this index are never taken as the header.
const MAX_HEADER_ROW: usize = 25;

const SIZE_HEADERS: [&str; 3] = ["size", "conductor", "awg"];
const QUANTITY_HEADERS: [&str; 3] = ["qty", "quantity", "count"];

/// Load entries from a `.json`, `.csv` or `.txt` file.
pub fn load_entries_file(path: &Path) -> Result<Vec<EntryInput>, SizingError> {
    let ext = path
        .extension()
        .and_then(|s| s.to_str())
        .map(|s| s.to_ascii_lowercase());

    match ext.as_deref() {
        Some("json") => {
            let content = std::fs::read_to_string(path)?;
            parse_entries_json(&content)
        }
        Some("csv") | Some("txt") => {
            let content = std::fs::read_to_string(path)?;
            parse_entries_csv(&content)
        }
        _ => Err(SizingError::Import(format!(
            "{}: expected a .json, .csv or .txt file",
            path.display()
        ))),
    }
}

/// Parse a JSON array of `{ "size": ..., "quantity": ... }` objects.
pub fn parse_entries_json(json: &str) -> Result<Vec<EntryInput>, SizingError> {
    Ok(serde_json::from_str(json)?)
}

/// Parse entries from CSV text.
pub fn parse_entries_csv(text: &str) -> Result<Vec<EntryInput>, SizingError> {
    let rows: Vec<Vec<String>> = text
        .lines()
        .map(split_csv_line)
        .filter(|row| filled_count(row) > 0)
        .collect();

    if rows.is_empty() {
        return Ok(Vec::new());
    }

    let guessed = find_header_row(&rows);

    // A named header above the guessed row wins; the guess can land past the
    // real header when the first data row carries extra cells.
    let named = rows[..=guessed]
        .iter()
        .enumerate()
        .rev()
        .find_map(|(index, row)| header_columns(row).map(|cols| (index, cols)));

    let (header_index, size_col, qty_col, data) = match named {
        Some((index, (size_col, qty_col))) => (index, size_col, qty_col, &rows[index + 1..]),
        None => (guessed, 0, 1, &rows[guessed..]),
    };

    let mut entries = Vec::with_capacity(data.len());
    for (i, row) in data.iter().enumerate() {
        let size = row.get(size_col).map(String::as_str).unwrap_or("");
        if size.is_empty() {
            tracing::warn!("Skipping import row {} with no conductor size", i + 1);
            continue;
        }
        let quantity = row.get(qty_col).cloned().unwrap_or_default();
        entries.push(EntryInput::new(size, quantity));
    }

    tracing::debug!(
        "Imported {} entries (header row {})",
        entries.len(),
        header_index
    );
    Ok(entries)
}

fn filled_count(row: &[String]) -> usize {
    row.iter().filter(|cell| !cell.is_empty()).count()
}

/// First row with at least as many filled cells as the row after it.
/// Falls back to row 0 when no row qualifies or the match is too deep.
fn find_header_row(rows: &[Vec<String>]) -> usize {
    rows.windows(2)
        .position(|pair| filled_count(&pair[0]) >= filled_count(&pair[1]))
        .filter(|&index| index <= MAX_HEADER_ROW)
        .unwrap_or(0)
}

fn names_any(cell: &str, names: &[&str]) -> bool {
    let cell = cell.to_ascii_lowercase();
    names.iter().any(|name| cell.contains(name))
}

/// Column indices of the size and quantity headers, when both are named in
/// separate cells. A cell naming a quantity is never the size column.
fn header_columns(row: &[String]) -> Option<(usize, usize)> {
    let qty_col = row
        .iter()
        .position(|cell| names_any(cell, &QUANTITY_HEADERS))?;
    let size_col = row.iter().enumerate().position(|(i, cell)| {
        i != qty_col
            && names_any(cell, &SIZE_HEADERS)
            && !names_any(cell, &QUANTITY_HEADERS)
    })?;
    Some((size_col, qty_col))
}

/// Split one CSV line into trimmed cells. Double quotes group a cell and
/// `""` inside quotes is a literal quote.
fn split_csv_line(line: &str) -> Vec<String> {
    let mut cells = Vec::new();
    let mut cell = String::new();
    let mut in_quotes = false;
    let mut chars = line.chars().peekable();

    while let Some(c) = chars.next() {
        match c {
            '"' if in_quotes && chars.peek() == Some(&'"') => {
                cell.push('"');
                chars.next();
            }
            '"' => in_quotes = !in_quotes,
            ',' if !in_quotes => {
                cells.push(cell.trim().to_string());
                cell.clear();
            }
            _ => cell.push(c),
        }
    }
    cells.push(cell.trim().to_string());
    cells
}
