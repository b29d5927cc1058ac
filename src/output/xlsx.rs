//! Printable Excel sign-up sheet
//!
//! ```text
//! row 1  |            10월3주차 국어 (merged, 16pt bold)         |
//! row 2  (spacer)
//! row 3  | 순번 | 반 | 번호 | 이름 | 월 | 화 | 수 | 목 | 금 |
//! row 4  |  1   | 1  |  1   | 김민수 |   |    |    |    |    |
//! ```

use std::io::Write;

use anyhow::{Context, Result};
use log::info;
use rust_xlsxwriter::{Color, Format, FormatAlign, FormatBorder, Workbook, Worksheet, XlsxError};

use crate::model::CellValue;
use crate::roster::Applicants;

use super::Exporter;

const SHEET_NAME: &str = "필터결과";

const HEADERS: [&str; 9] = ["순번", "반", "번호", "이름", "월", "화", "수", "목", "금"];

const COLUMN_WIDTHS: [f64; 9] = [6.0, 6.0, 6.0, 16.0, 6.0, 6.0, 6.0, 6.0, 6.0];

const TITLE_ROW: u32 = 0;
const SPACER_ROW: u32 = 1;
const HEADER_ROW: u32 = 2;
const FIRST_DATA_ROW: u32 = 3;

const TITLE_HEIGHT: f64 = 28.0;
const SPACER_HEIGHT: f64 = 6.0;
const TABLE_ROW_HEIGHT: f64 = 20.0;

/// Identity values copied per student; the weekday columns stay blank
const IDENTITY_VALUES: usize = 3;

struct SheetFormats {
    title: Format,
    header: Format,
    body: Format,
}

/// Excel writer for the fixed sign-up layout
pub struct XlsxOutput {
    font_name: String,
}

impl XlsxOutput {
    pub fn new(font_name: impl Into<String>) -> Self {
        Self {
            font_name: font_name.into(),
        }
    }

    fn create_formats(&self) -> SheetFormats {
        let title = Format::new()
            .set_font_name(self.font_name.as_str())
            .set_font_size(16)
            .set_bold()
            .set_align(FormatAlign::Center)
            .set_align(FormatAlign::VerticalCenter);

        let body = Format::new()
            .set_font_name(self.font_name.as_str())
            .set_align(FormatAlign::Center)
            .set_align(FormatAlign::VerticalCenter)
            .set_border(FormatBorder::Thin)
            .set_border_color(Color::Black);

        let header = body.clone().set_bold();

        SheetFormats {
            title,
            header,
            body,
        }
    }

    /// Build the workbook in memory
    pub fn render_to_bytes(&self, applicants: &Applicants) -> Result<Vec<u8>> {
        let mut workbook = Workbook::new();
        let formats = self.create_formats();

        let sheet = workbook.add_worksheet();
        fill_sheet(sheet, applicants, &formats)
            .with_context(|| format!("Failed to lay out sheet for {}", applicants.sheet_title()))?;

        let buffer = workbook
            .save_to_buffer()
            .context("Failed to create Excel workbook")?;
        info!(
            "built workbook '{}' with {} row(s)",
            applicants.sheet_title(),
            applicants.len()
        );
        Ok(buffer)
    }
}

fn fill_sheet(
    sheet: &mut Worksheet,
    applicants: &Applicants,
    formats: &SheetFormats,
) -> Result<(), XlsxError> {
    let last_col = (HEADERS.len() - 1) as u16;
    sheet.set_name(SHEET_NAME)?;

    sheet.merge_range(
        TITLE_ROW,
        0,
        TITLE_ROW,
        last_col,
        &applicants.sheet_title(),
        &formats.title,
    )?;

    for (col, header) in HEADERS.iter().enumerate() {
        sheet.write_with_format(HEADER_ROW, col as u16, *header, &formats.header)?;
    }

    for (i, row) in applicants.rows.iter().enumerate() {
        let r = FIRST_DATA_ROW + i as u32;
        sheet.write_with_format(r, 0, (i + 1) as f64, &formats.body)?;
        for offset in 0..IDENTITY_VALUES {
            let col = 1 + offset as u16;
            write_cell(sheet, r, col, row.get(offset), &formats.body)?;
        }
        for col in (1 + IDENTITY_VALUES as u16)..=last_col {
            sheet.write_blank(r, col, &formats.body)?;
        }
    }

    for (r, height) in row_heights(applicants.len()) {
        sheet.set_row_height(r, height)?;
    }
    for (col, width) in COLUMN_WIDTHS.iter().enumerate() {
        sheet.set_column_width(col as u16, *width)?;
    }

    Ok(())
}

/// Title, spacer, then the bordered table: header plus one row per applicant
fn row_heights(applicant_count: usize) -> Vec<(u32, f64)> {
    let last_row = HEADER_ROW + applicant_count as u32;
    [(TITLE_ROW, TITLE_HEIGHT), (SPACER_ROW, SPACER_HEIGHT)]
        .into_iter()
        .chain((HEADER_ROW..=last_row).map(|r| (r, TABLE_ROW_HEIGHT)))
        .collect()
}

fn write_cell(
    sheet: &mut Worksheet,
    row: u32,
    col: u16,
    value: Option<&CellValue>,
    format: &Format,
) -> Result<(), XlsxError> {
    match value {
        None | Some(CellValue::Null) => {
            sheet.write_blank(row, col, format)?;
        }
        Some(CellValue::Int(i)) => {
            sheet.write_with_format(row, col, *i as f64, format)?;
        }
        Some(CellValue::Float(f)) => {
            sheet.write_with_format(row, col, *f, format)?;
        }
        Some(CellValue::Bool(b)) => {
            sheet.write_with_format(row, col, *b, format)?;
        }
        Some(other) => {
            sheet.write_with_format(row, col, &*other.display(), format)?;
        }
    }
    Ok(())
}

impl Exporter for XlsxOutput {
    fn render(&self, applicants: &Applicants, writer: &mut dyn Write) -> Result<()> {
        let bytes = self.render_to_bytes(applicants)?;
        writer.write_all(&bytes)?;
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use std::io::Cursor;

    use calamine::{Data, Reader, Xlsx};

    use super::*;
    use crate::roster::fixtures::*;
    use crate::roster::select_applicants;

    fn read_back(bytes: Vec<u8>) -> Xlsx<Cursor<Vec<u8>>> {
        Xlsx::new(Cursor::new(bytes)).unwrap()
    }

    #[test]
    fn test_layout_reads_back() {
        let sheet = weekly_sheet();
        let applicants = select_applicants(&sheet, "국어", &weekly_config()).unwrap();

        let bytes = XlsxOutput::new("Apple SD Gothic Neo")
            .render_to_bytes(&applicants)
            .unwrap();
        assert_eq!(&bytes[..4], b"PK\x03\x04");

        let mut workbook = read_back(bytes);
        assert_eq!(workbook.sheet_names(), vec![SHEET_NAME.to_string()]);

        workbook.load_merged_regions().unwrap();
        let merged: Vec<_> = workbook
            .merged_regions()
            .iter()
            .map(|(_, _, dims)| (dims.start, dims.end))
            .collect();
        assert_eq!(merged, vec![((0, 0), (0, 8))]);

        let range = workbook.worksheet_range(SHEET_NAME).unwrap();
        assert_eq!(range.get_value((0, 0)), Some(&Data::String("10월3주차 국어".into())));
        for (col, header) in HEADERS.iter().enumerate() {
            assert_eq!(
                range.get_value((HEADER_ROW, col as u32)),
                Some(&Data::String(header.to_string()))
            );
        }
        assert_eq!(range.get_value((3, 0)), Some(&Data::Float(1.0)));
        assert_eq!(range.get_value((4, 3)), Some(&Data::String("박지훈".into())));
    }

    #[test]
    fn test_row_heights() {
        let heights = row_heights(2);
        assert_eq!(
            heights,
            vec![(0, 28.0), (1, 6.0), (2, 20.0), (3, 20.0), (4, 20.0)]
        );
        // header row only
        assert_eq!(row_heights(0).last(), Some(&(2, 20.0)));
        assert_eq!(COLUMN_WIDTHS.len(), HEADERS.len());
    }

    #[test]
    fn test_empty_result_still_writes_header() {
        let sheet = weekly_sheet();
        let applicants = select_applicants(&sheet, "과학", &weekly_config()).unwrap();
        assert!(applicants.is_empty());

        let bytes = XlsxOutput::new("Arial").render_to_bytes(&applicants).unwrap();
        let mut workbook = read_back(bytes);
        let range = workbook.worksheet_range(SHEET_NAME).unwrap();
        assert_eq!(range.get_value((HEADER_ROW, 0)), Some(&Data::String("순번".into())));
        assert_eq!(range.get_value((HEADER_ROW + 1, 0)), None);
    }
}
