//! Excel file parser (xlsx, xls, ods)

use std::borrow::Cow;
use std::path::Path;

use anyhow::{Context, Result};
use calamine::{open_workbook_auto, Data, Range, Reader};
use log::{debug, warn};

use crate::config::{Config, SheetSelector};
use crate::error::RosterError;
use crate::model::{CellValue, Grid};

use super::Parser;

/// Parser for Excel files
pub struct ExcelParser;

impl Parser for ExcelParser {
    fn read_grid(&self, path: &Path, config: &Config) -> Result<Grid> {
        let mut workbook = open_workbook_auto(path)
            .with_context(|| format!("Failed to open Excel file: {}", path.display()))?;

        let sheets = workbook.sheet_names();
        let sheet_name = pick_sheet(&sheets, &config.sheet)?;
        debug!("reading sheet '{}' of {}", sheet_name, path.display());

        let range: Range<Data> = workbook
            .worksheet_range(&sheet_name)
            .with_context(|| format!("Failed to read sheet: {}", sheet_name))?;

        Ok(range_to_grid(&range))
    }

    fn supports_extension(&self, ext: &str) -> bool {
        matches!(ext.to_lowercase().as_str(), "xlsx" | "xls" | "ods" | "xlsm")
    }
}

/// Resolve the configured sheet; unknown names and indices fall back to the first sheet
fn pick_sheet(sheets: &[String], selector: &SheetSelector) -> Result<String, RosterError> {
    let first = sheets.first().ok_or(RosterError::NoSheets)?;

    let chosen = match selector {
        SheetSelector::Index(i) => sheets.get(*i),
        SheetSelector::Name(name) => sheets.iter().find(|s| *s == name),
    };

    match chosen {
        Some(name) => Ok(name.clone()),
        None => {
            warn!("sheet {:?} not found, using first sheet '{}'", selector, first);
            Ok(first.clone())
        }
    }
}

fn range_to_grid(range: &Range<Data>) -> Grid {
    let mut grid = Grid::new();
    // calamine ranges start at the first used cell, not at A1
    let (first_row, first_col) = match range.start() {
        Some((r, c)) => (r as usize, c as usize),
        None => return grid,
    };

    for (offset, row) in range.rows().enumerate() {
        let cells = row.iter().map(convert_cell).collect();
        grid.put_row(first_row + offset, first_col, cells);
    }

    grid
}

fn convert_cell(cell: &Data) -> CellValue {
    match cell {
        Data::Empty => CellValue::Null,
        Data::String(s) => {
            if s.trim().is_empty() {
                CellValue::Null
            } else {
                CellValue::String(Cow::Owned(s.clone()))
            }
        }
        Data::Float(f) => {
            // Check if it's actually an integer
            if f.fract() == 0.0 && *f >= i64::MIN as f64 && *f <= i64::MAX as f64 {
                CellValue::Int(*f as i64)
            } else {
                CellValue::Float(*f)
            }
        }
        Data::Int(i) => CellValue::Int(*i),
        Data::Bool(b) => CellValue::Bool(*b),
        Data::DateTime(ref dt) => {
            let s = format!("{}", dt);
            if let Ok(datetime) = chrono::NaiveDateTime::parse_from_str(&s, "%Y-%m-%d %H:%M:%S%.f") {
                CellValue::DateTime(datetime)
            } else if let Ok(date) = chrono::NaiveDate::parse_from_str(&s, "%Y-%m-%d") {
                CellValue::Date(date)
            } else {
                CellValue::String(Cow::Owned(s))
            }
        }
        Data::DateTimeIso(s) => {
            if let Ok(dt) = chrono::NaiveDateTime::parse_from_str(s, "%Y-%m-%dT%H:%M:%S") {
                CellValue::DateTime(dt)
            } else if let Ok(d) = chrono::NaiveDate::parse_from_str(s, "%Y-%m-%d") {
                CellValue::Date(d)
            } else {
                CellValue::String(Cow::Owned(s.clone()))
            }
        }
        Data::DurationIso(s) => CellValue::String(Cow::Owned(s.clone())),
        Data::Error(e) => CellValue::String(Cow::Owned(format!("#{:?}", e))),
    }
}
