//! CSV import into an existing prize list

use std::collections::HashSet;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use super::csv::{self, CsvError, SkipReason, SkipRecord};
use super::list::normalize_order;
use super::model::Prize;

/// Summary shown to the user after an import
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CsvImportResult {
    /// File name (or other label) the rows came from
    pub source_name: String,
    pub added_count: usize,
    pub skipped: Vec<SkipRecord>,
    pub processed_at: DateTime<Utc>,
}

/// Merge CSV rows into `existing`.
///
/// Rows whose id is already in `existing` are skipped as duplicates. New
/// prizes go after the existing ones, in their file order.
pub fn import_csv(
    existing: &[Prize],
    source_name: &str,
    text: &str,
    now: DateTime<Utc>,
) -> Result<(Vec<Prize>, CsvImportResult), CsvError> {
    let parsed = csv::parse(text)?;

    let mut next = normalize_order(existing);
    let known: HashSet<&str> = existing.iter().map(|p| p.id.as_str()).collect();
    let mut skipped = parsed.skipped;
    let mut added_count = 0;

    for prize in parsed.prizes {
        if known.contains(prize.id.as_str()) {
            skipped.push(SkipRecord {
                id: prize.id,
                reason: SkipReason::DuplicateId,
            });
            continue;
        }
        next.push(Prize {
            order: next.len() as u32,
            ..prize
        });
        added_count += 1;
    }

    log::info!(
        "Imported {added_count} prizes from {source_name} ({} skipped)",
        skipped.len()
    );
    let result = CsvImportResult {
        source_name: source_name.to_string(),
        added_count,
        skipped,
        processed_at: now,
    };
    Ok((next, result))
}

/// Export the list as CSV text
pub fn export_csv(list: &[Prize]) -> String {
    csv::generate(list)
}
