//! Domain errors raised while locating and reading rosters

use std::path::PathBuf;

use thiserror::Error;

#[derive(Debug, Error)]
pub enum RosterError {
    #[error(
        "no roster workbooks in {}; put weekly workbooks there, e.g. 10월3주차.xlsx, 10월4주차.xlsx",
        .0.display()
    )]
    EmptyCatalog(PathBuf),

    #[error("roster file not found: {0}")]
    UnknownFile(String),

    #[error("subject column not found: {0}")]
    UnknownSubject(String),

    #[error("invalid column range: {0} (expected something like A:AG)")]
    InvalidColumnRange(String),

    #[error("no sheets found in workbook")]
    NoSheets,

    #[error("header row {0} is beyond the end of the sheet")]
    MissingHeaderRow(usize),
}
