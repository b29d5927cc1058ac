//! Raw sheet contents addressed by absolute position

use super::table::CellValue;

static NULL: CellValue = CellValue::Null;

/// A worksheet as read from disk, before any header interpretation.
///
/// Rows and columns are 0-based and absolute: `(0, 0)` is cell A1 even when
/// the sheet's used area starts further down.
#[derive(Debug, Clone, Default)]
pub struct Grid {
    rows: Vec<Vec<CellValue>>,
}

impl Grid {
    pub fn new() -> Self {
        Self::default()
    }

    /// Build from rows that start at A1
    pub fn from_rows(rows: Vec<Vec<CellValue>>) -> Self {
        Self { rows }
    }

    /// Place a row of cells at `(row, first_col)`, growing the grid as needed
    pub fn put_row(&mut self, row: usize, first_col: usize, cells: Vec<CellValue>) {
        if self.rows.len() <= row {
            self.rows.resize_with(row + 1, Vec::new);
        }
        let target = &mut self.rows[row];
        let needed = first_col + cells.len();
        if target.len() < needed {
            target.resize(needed, CellValue::Null);
        }
        for (offset, cell) in cells.into_iter().enumerate() {
            target[first_col + offset] = cell;
        }
    }

    /// Cell at an absolute position; out-of-range cells are null
    pub fn cell(&self, row: usize, col: usize) -> &CellValue {
        self.rows
            .get(row)
            .and_then(|r| r.get(col))
            .unwrap_or(&NULL)
    }

    /// Number of rows up to the last one present
    pub fn height(&self) -> usize {
        self.rows.len()
    }

    /// Number of columns up to the last one present in any row
    pub fn width(&self) -> usize {
        self.rows.iter().map(Vec::len).max().unwrap_or(0)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_put_row_with_offset() {
        let mut grid = Grid::new();
        grid.put_row(2, 1, vec![CellValue::Int(7), CellValue::from("x")]);

        assert_eq!(grid.height(), 3);
        assert_eq!(grid.width(), 3);
        assert_eq!(grid.cell(2, 1), &CellValue::Int(7));
        assert_eq!(grid.cell(2, 2), &CellValue::from("x"));
        assert!(grid.cell(2, 0).is_null());
        assert!(grid.cell(0, 0).is_null());
        assert!(grid.cell(99, 99).is_null());
    }

    #[test]
    fn test_width_is_widest_row() {
        let grid = Grid::from_rows(vec![
            vec![CellValue::from("title")],
            vec![CellValue::Null; 4],
            vec![CellValue::Int(1); 2],
        ]);
        assert_eq!(grid.width(), 4);
        assert_eq!(Grid::new().width(), 0);
    }
}
