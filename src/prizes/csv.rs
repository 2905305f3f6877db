//! Prize CSV codec
//!
//! Fixed seven-column schema. Bad rows are reported as skip records and the
//! rest of the file still imports; only a bad header fails the whole parse.
//!
//! Input is split into lines before quote handling, so a quoted field cannot
//! span lines.

use std::collections::HashSet;

use serde::{Deserialize, Serialize};
use thiserror::Error;

use super::model::Prize;

/// Column names, in file order
pub const CSV_COLUMNS: [&str; 7] = [
    "id",
    "order",
    "prizeName",
    "itemName",
    "imagePath",
    "selected",
    "memo",
];

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum CsvError {
    #[error("invalid-csv-header")]
    InvalidHeader,
}

/// Why a row was dropped
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum SkipReason {
    ColumnMismatch,
    MissingRequired,
    DuplicateId,
    InvalidOrder,
}

impl SkipReason {
    pub fn as_str(&self) -> &'static str {
        match self {
            SkipReason::ColumnMismatch => "column-mismatch",
            SkipReason::MissingRequired => "missing-required",
            SkipReason::DuplicateId => "duplicate-id",
            SkipReason::InvalidOrder => "invalid-order",
        }
    }
}

/// A rejected row
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SkipRecord {
    /// Row id, empty when the row had none
    pub id: String,
    pub reason: SkipReason,
}

/// Result of a successful parse
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ParsedCsv {
    /// Accepted prizes, orders renumbered 0..n-1
    pub prizes: Vec<Prize>,
    /// Rejected rows, in file order
    pub skipped: Vec<SkipRecord>,
}

/// Split one line on commas outside double quotes. `""` inside quotes is a
/// literal quote.
pub fn split_fields(line: &str) -> Vec<String> {
    let mut fields = Vec::new();
    let mut current = String::new();
    let mut in_quotes = false;
    let mut chars = line.chars().peekable();

    while let Some(c) = chars.next() {
        match c {
            '"' if in_quotes && chars.peek() == Some(&'"') => {
                current.push('"');
                chars.next();
            }
            '"' => in_quotes = !in_quotes,
            ',' if !in_quotes => fields.push(std::mem::take(&mut current)),
            _ => current.push(c),
        }
    }
    fields.push(current);
    fields
}

fn parse_bool(value: &str) -> bool {
    matches!(value.to_ascii_lowercase().as_str(), "true" | "1" | "yes")
}

fn non_empty(value: &str) -> Option<String> {
    (!value.is_empty()).then(|| value.to_string())
}

/// Parse prize CSV text
pub fn parse(text: &str) -> Result<ParsedCsv, CsvError> {
    let text = text.strip_prefix('\u{feff}').unwrap_or(text);
    let mut lines = text.lines().map(str::trim).filter(|l| !l.is_empty());

    let Some(header) = lines.next() else {
        return Ok(ParsedCsv::default());
    };
    let header_fields = split_fields(header);
    let header_ok = header_fields.len() == CSV_COLUMNS.len()
        && header_fields
            .iter()
            .zip(CSV_COLUMNS)
            .all(|(got, want)| got.trim() == want);
    if !header_ok {
        log::warn!("Rejecting CSV with header {header:?}");
        return Err(CsvError::InvalidHeader);
    }

    let mut seen = HashSet::new();
    // (declared order, prize)
    let mut accepted: Vec<(i64, Prize)> = Vec::new();
    let mut skipped = Vec::new();

    for line in lines {
        let fields: Vec<String> = split_fields(line)
            .into_iter()
            .map(|f| f.trim().to_string())
            .collect();
        let id = fields.first().cloned().unwrap_or_default();
        let mut skip = |reason| {
            skipped.push(SkipRecord {
                id: id.clone(),
                reason,
            })
        };

        let [id_field, order, prize_name, item_name, image_path, selected, memo] = fields.as_slice()
        else {
            skip(SkipReason::ColumnMismatch);
            continue;
        };
        if id_field.is_empty() || prize_name.is_empty() || item_name.is_empty() {
            skip(SkipReason::MissingRequired);
            continue;
        }
        if seen.contains(id_field.as_str()) {
            skip(SkipReason::DuplicateId);
            continue;
        }
        let Ok(declared_order) = order.parse::<i64>() else {
            skip(SkipReason::InvalidOrder);
            continue;
        };

        seen.insert(id_field.clone());
        accepted.push((
            declared_order,
            Prize {
                id: id_field.clone(),
                order: 0,
                prize_name: prize_name.clone(),
                item_name: item_name.clone(),
                image_path: non_empty(image_path),
                selected: parse_bool(selected),
                memo: non_empty(memo),
            },
        ));
    }

    accepted.sort_by_key(|(declared, _)| *declared);
    let prizes = accepted
        .into_iter()
        .enumerate()
        .map(|(i, (_, prize))| Prize {
            order: i as u32,
            ..prize
        })
        .collect::<Vec<_>>();

    log::info!("Parsed {} prizes, skipped {} rows", prizes.len(), skipped.len());
    Ok(ParsedCsv { prizes, skipped })
}

/// Quote a field when it holds a comma, quote or newline
fn escape(field: &str) -> String {
    if field.contains([',', '"', '\n', '\r']) {
        format!("\"{}\"", field.replace('"', "\"\""))
    } else {
        field.to_string()
    }
}

/// Serialize prizes to CSV, in display order
pub fn generate(prizes: &[Prize]) -> String {
    let mut sorted: Vec<&Prize> = prizes.iter().collect();
    sorted.sort_by_key(|p| p.order);

    let mut lines = Vec::with_capacity(sorted.len() + 1);
    lines.push(CSV_COLUMNS.join(","));
    for prize in sorted {
        let order = prize.order.to_string();
        let row = [
            prize.id.as_str(),
            order.as_str(),
            prize.prize_name.as_str(),
            prize.item_name.as_str(),
            prize.image_path.as_deref().unwrap_or(""),
            if prize.selected { "true" } else { "false" },
            prize.memo.as_deref().unwrap_or(""),
        ];
        lines.push(row.iter().map(|f| escape(f)).collect::<Vec<_>>().join(","));
    }
    lines.join("\n")
}
