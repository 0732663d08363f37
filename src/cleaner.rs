//! Record cleaning
//!
//! Sheet exports carry non-breaking spaces, zero-width joiners, smart quotes and
//! other artefacts of manual editing. Everything here is total: malformed cells
//! become `FieldValue::Absent` or stay as text, they never fail the row.

use crate::models::{AthleteRecord, ColumnSet, FieldValue, Table};
use lazy_static::lazy_static;
use regex::Regex;

lazy_static! {
    static ref MULTI_WS_RE: Regex = Regex::new(r"\s+").unwrap();
    static ref NUMBER_RE: Regex = Regex::new(r"^[+-]?(\d+([.,]\d+)?|[.,]\d+)$").unwrap();
    static ref RANK_RE: Regex = Regex::new(r"^(?i)(?:t|=)?\s*(\d+(?:\.0+)?)\s*=?$").unwrap();
}

/// Normalize a raw cell: unify space characters, drop invisible characters,
/// fold typographic punctuation to ASCII, collapse whitespace and trim.
pub fn clean_text(raw: &str) -> String {
    let mapped: String = raw
        .chars()
        .filter_map(|c| match c {
            '\u{00A0}' | '\u{2007}' | '\u{202F}' | '\u{2009}' | '\u{200A}' | '\u{3000}' => Some(' '),
            '\u{200B}' | '\u{200C}' | '\u{200D}' | '\u{2060}' | '\u{FEFF}' | '\u{00AD}' => None,
            '\u{2018}' | '\u{2019}' | '\u{201B}' | '\u{2032}' => Some('\''),
            '\u{201C}' | '\u{201D}' | '\u{201F}' | '\u{2033}' => Some('"'),
            '\u{2010}' | '\u{2011}' | '\u{2012}' | '\u{2013}' | '\u{2014}' | '\u{2212}' => Some('-'),
            '\t' | '\n' | '\r' => Some(' '),
            c if c.is_control() => None,
            c => Some(c),
        })
        .collect();

    MULTI_WS_RE.replace_all(&mapped, " ").trim().to_string()
}

/// Clean a cell and coerce numeric-looking values. A comma decimal separator is accepted.
pub fn coerce_field(raw: &str) -> FieldValue {
    let cleaned = clean_text(raw);
    if cleaned.is_empty() {
        return FieldValue::Absent;
    }

    if NUMBER_RE.is_match(&cleaned) {
        if let Ok(value) = cleaned.replace(',', ".").parse::<f64>() {
            return FieldValue::Number(value);
        }
    }

    FieldValue::Text(cleaned)
}

/// Numeric view of a cell, `None` for blanks, sentinels and anything unparsable.
pub fn parse_number(value: &FieldValue) -> Option<f64> {
    if value.is_blank() {
        return None;
    }
    value.as_number()
}

/// Parse a rank cell. Tie markers such as `=3`, `3=` and `T3` are accepted.
pub fn parse_rank(value: &FieldValue) -> Option<i64> {
    match value {
        FieldValue::Number(number) if number.is_finite() && number.fract() == 0.0 => Some(*number as i64),
        FieldValue::Number(number) => {
            log::warn!("Ignoring fractional rank {}", number);
            None
        }
        FieldValue::Text(text) => {
            let text = text.trim();
            if text.is_empty() || text == "-" {
                return None;
            }
            let parsed = RANK_RE
                .captures(text)
                .and_then(|caps| caps.get(1))
                .and_then(|m| m.as_str().parse::<f64>().ok())
                .map(|rank| rank as i64);
            if parsed.is_none() {
                log::warn!("Unparsable rank '{}'", text);
            }
            parsed
        }
        FieldValue::Absent => None,
    }
}

/// Build a record from one data row. The name column becomes `name`, every
/// other non-empty header lands in `raw_fields`.
pub fn clean_row(headers: &[String], cells: &[String], columns: &ColumnSet) -> AthleteRecord {
    let mut record = AthleteRecord::new("");

    for (index, header) in headers.iter().enumerate() {
        if header.is_empty() {
            continue;
        }
        let raw = cells.get(index).map(String::as_str).unwrap_or("");

        if *header == columns.name {
            record.name = clean_text(raw);
        } else {
            record.raw_fields.insert(header.clone(), coerce_field(raw));
        }
    }

    record
}

/// Clean every row of a table. Header text is cleaned the same way as cells.
pub fn clean_table(table: &Table, columns: &ColumnSet) -> Vec<AthleteRecord> {
    let headers: Vec<String> = table.headers.iter().map(|h| clean_text(h)).collect();

    if !headers.iter().any(|h| *h == columns.name) {
        log::warn!("Name column '{}' not found in sheet headers", columns.name);
    }

    table
        .rows
        .iter()
        .map(|cells| clean_row(&headers, cells, columns))
        .collect()
}
