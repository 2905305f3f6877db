//! Crate-wide error type
//!
//! Each module owns a focused error enum; `Error` gathers them for callers
//! that just want one `?`-able type.

use thiserror::Error;

use crate::game::DrawError;
use crate::persistence::StorageError;
use crate::prizes::CsvError;
use crate::session::SessionError;

pub type Result<T> = std::result::Result<T, Error>;

#[derive(Debug, Error)]
pub enum Error {
    #[error(transparent)]
    Draw(#[from] DrawError),

    #[error(transparent)]
    Csv(#[from] CsvError),

    #[error(transparent)]
    Storage(#[from] StorageError),

    #[error(transparent)]
    Session(#[from] SessionError),

    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),
}
