//! Roster sheets: headers, student rows and per-subject totals

mod columns;
mod filter;

use anyhow::{Context, Result};
use indexmap::IndexMap;
use log::debug;

use crate::catalog::RosterFile;
use crate::config::Config;
use crate::error::RosterError;
use crate::model::{CellValue, Column, Grid, Table};
use crate::parser::ParserFactory;

pub use columns::{clean_headers, find_col, normalize_text, IdentityColumns};
pub use filter::{is_one, select_applicants, Applicants, SubjectList, PREVIEW_LIMIT};

/// One weekly roster, read with the configured header row, column span and sum row
#[derive(Debug, Clone)]
pub struct RosterSheet {
    /// Where the sheet came from
    pub file: RosterFile,
    /// Student rows under the header row
    pub table: Table,
    /// Value of the sum row for each header, in column order
    pub totals: IndexMap<String, f64>,
}

impl RosterSheet {
    /// Read a roster workbook from disk
    pub fn load(file: &RosterFile, config: &Config) -> Result<Self> {
        let grid = ParserFactory::new()
            .read_grid(&file.path, config)
            .with_context(|| format!("Failed to load roster: {}", file.name))?;
        let sheet = Self::from_grid(file.clone(), &grid, config)?;
        debug!(
            "{}: {} columns, {} student rows",
            file.name,
            sheet.table.column_count(),
            sheet.table.row_count()
        );
        Ok(sheet)
    }

    /// Interpret a raw grid as a roster
    pub fn from_grid(file: RosterFile, grid: &Grid, config: &Config) -> Result<Self, RosterError> {
        let header_row = config.header_row;
        if grid.height() <= header_row {
            return Err(RosterError::MissingHeaderRow(header_row + 1));
        }

        // only the part of the span the sheet actually uses
        let width = grid.width();
        let used: Vec<usize> = (config.columns.start..=config.columns.end)
            .take_while(|&col| col < width)
            .collect();

        let raw_headers: Vec<String> = used
            .iter()
            .map(|&col| grid.cell(header_row, col).display().into_owned())
            .collect();
        let headers = clean_headers(&raw_headers);

        let columns = headers
            .iter()
            .enumerate()
            .map(|(i, name)| Column::new(name.clone(), i))
            .collect();
        let mut table = Table::new(columns);

        // 0-based position of the totals row, which never counts as a student
        let sum_idx = config.sum_row.checked_sub(1);

        for row in (header_row + 1)..grid.height() {
            if Some(row) == sum_idx {
                continue;
            }
            let cells: Vec<CellValue> =
                used.iter().map(|&col| grid.cell(row, col).clone()).collect();
            if cells.iter().all(CellValue::is_blank) {
                continue;
            }
            table.add_row(cells, row + 1);
        }

        let totals = headers
            .iter()
            .zip(&used)
            .map(|(name, &col)| {
                let total = sum_idx
                    .and_then(|r| grid.cell(r, col).as_number())
                    .unwrap_or(0.0);
                (name.clone(), total)
            })
            .collect();

        Ok(Self {
            file,
            table,
            totals,
        })
    }

    /// Column headers in sheet order
    pub fn headers(&self) -> Vec<&str> {
        self.table.column_names()
    }

    /// Sum-row value for a column; missing columns read as zero
    pub fn total(&self, column: &str) -> f64 {
        self.totals.get(column).copied().unwrap_or(0.0)
    }

    /// Columns identifying the student, as detected from the headers
    pub fn identity_columns(&self, config: &Config) -> IdentityColumns {
        IdentityColumns::detect(&self.headers(), config)
    }

    /// Subjects offered for filtering
    pub fn subjects(&self, config: &Config) -> SubjectList {
        filter::filterable_subjects(self, config)
    }
}


#[cfg(test)]
mod tests {
    use super::fixtures::*;
    use super::*;
    use crate::config::ColumnRange;

    #[test]
    fn test_headers_and_rows() {
        let sheet = weekly_sheet();

        assert_eq!(sheet.headers(), vec!["반", "번호", "이름", "국어", "수학", "과학"]);
        // blank row and totals row are skipped
        assert_eq!(sheet.table.row_count(), 4);
        assert_eq!(sheet.table.rows[2].source_line, 6);
    }

    #[test]
    fn test_totals() {
        let sheet = weekly_sheet();

        assert_eq!(sheet.total("국어"), 2.0);
        assert_eq!(sheet.total("수학"), 3.0);
        assert_eq!(sheet.total("과학"), 0.0);
        // "합계" is text
        assert_eq!(sheet.total("반"), 0.0);
        assert_eq!(sheet.total("없는열"), 0.0);
    }

    #[test]
    fn test_sum_row_past_end_reads_zero() {
        let file = RosterFile::from_path(std::path::Path::new("w.xlsx"));
        let config = weekly_config().with_sum_row(174);
        let sheet = RosterSheet::from_grid(file, &weekly_grid(), &config).unwrap();

        assert!(sheet.totals.values().all(|v| *v == 0.0));
        // the old totals row is now an ordinary row
        assert_eq!(sheet.table.row_count(), 5);
    }

    #[test]
    fn test_span_limited_to_used_columns() {
        let file = RosterFile::from_path(std::path::Path::new("w.xlsx"));
        // A:AG over a sheet that only uses A:D
        let grid = Grid::from_rows(vec![
            vec![CellValue::from("title")],
            vec![
                CellValue::from("반"),
                CellValue::from("번호"),
                CellValue::from("이름"),
                CellValue::from("국어"),
            ],
            vec![CellValue::Int(1), CellValue::Int(1), CellValue::from("김민수"), CellValue::Int(1)],
        ]);
        let sheet = RosterSheet::from_grid(file, &grid, &Config::default()).unwrap();

        assert_eq!(sheet.headers(), vec!["반", "번호", "이름", "국어"]);
        assert_eq!(sheet.totals.len(), 4);
        assert_eq!(sheet.table.rows[0].cells.len(), 4);
    }

    #[test]
    fn test_span_starting_past_used_columns() {
        let file = RosterFile::from_path(std::path::Path::new("w.xlsx"));
        let config = weekly_config().with_columns(ColumnRange::parse("H:K").unwrap());
        let sheet = RosterSheet::from_grid(file, &weekly_grid(), &config).unwrap();

        assert!(sheet.headers().is_empty());
        assert_eq!(sheet.table.row_count(), 0);
    }

    #[test]
    fn test_missing_header_row() {
        let file = RosterFile::from_path(std::path::Path::new("w.xlsx"));
        let grid = Grid::from_rows(vec![vec![CellValue::from("only a title")]]);

        let err = RosterSheet::from_grid(file, &grid, &weekly_config()).unwrap_err();
        assert!(matches!(err, RosterError::MissingHeaderRow(2)));
    }
}
