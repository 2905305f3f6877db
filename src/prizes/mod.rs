//! Prize list: model, edits, CSV import/export and image blobs

pub mod blob;
pub mod csv;
pub mod import;
pub mod list;
pub mod model;

pub use blob::{BlobStore, MemoryBlobStore};
pub use csv::{CSV_COLUMNS, CsvError, ParsedCsv, SkipReason, SkipRecord};
pub use import::{CsvImportResult, export_csv, import_csv};
pub use model::{NewPrize, Prize, PrizeList};
