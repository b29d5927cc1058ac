//! Configuration handling for rosterpick

use std::path::PathBuf;

use crate::error::RosterError;

/// Default folder holding the weekly roster workbooks
pub const DEFAULT_DATA_DIR: &str = "./data";

/// Headers live in A2:AG2
pub const DEFAULT_HEADER_ROW: usize = 1;

/// Per-subject totals row (1-based, as seen in Excel)
pub const DEFAULT_SUM_ROW: usize = 174;

pub const DEFAULT_COLUMN_RANGE: &str = "A:AG";

const FALLBACK_FONT: &str = "Arial";

/// Output format for the applicant list
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum OutputFormat {
    #[default]
    Terminal,
    Xlsx,
    Pdf,
    Csv,
    Json,
}

impl OutputFormat {
    /// File extension used when naming an export
    pub fn extension(self) -> &'static str {
        match self {
            // plain-text copy of the terminal table
            OutputFormat::Terminal => "txt",
            OutputFormat::Xlsx => "xlsx",
            OutputFormat::Pdf => "pdf",
            OutputFormat::Csv => "csv",
            OutputFormat::Json => "json",
        }
    }
}

/// Which worksheet of a workbook to read
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SheetSelector {
    Index(usize),
    Name(String),
}

impl Default for SheetSelector {
    fn default() -> Self {
        SheetSelector::Index(0)
    }
}

/// Inclusive, 0-based column span such as `A:AG`
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ColumnRange {
    pub start: usize,
    pub end: usize,
}

impl ColumnRange {
    /// Parse an Excel-style `A:AG` span
    pub fn parse(spec: &str) -> Result<Self, RosterError> {
        let bad = || RosterError::InvalidColumnRange(spec.to_string());

        let (start, end) = spec.split_once(':').ok_or_else(bad)?;
        let start = column_index_from_letters(start.trim()).ok_or_else(bad)?;
        let end = column_index_from_letters(end.trim()).ok_or_else(bad)?;
        if start > end {
            return Err(bad());
        }

        Ok(Self { start, end })
    }
}

impl Default for ColumnRange {
    fn default() -> Self {
        // A:AG
        Self { start: 0, end: 32 }
    }
}

/// Last column Excel can address, `XFD`
pub const MAX_COLUMN_INDEX: usize = 16_383;

/// `A` -> 0, `Z` -> 25, `AA` -> 26; `None` past `XFD`
pub fn column_index_from_letters(letters: &str) -> Option<usize> {
    // XFD is the longest valid name
    if letters.is_empty() || letters.len() > 3 {
        return None;
    }

    let mut index = 0usize;
    for c in letters.chars() {
        if !c.is_ascii_alphabetic() {
            return None;
        }
        let digit = (c.to_ascii_uppercase() as u8 - b'A' + 1) as usize;
        index = index.checked_mul(26)?.checked_add(digit)?;
    }

    Some(index - 1).filter(|&i| i <= MAX_COLUMN_INDEX)
}

/// Configuration for loading rosters and rendering applicant lists
#[derive(Debug, Clone)]
pub struct Config {
    /// Folder scanned for roster workbooks
    pub data_dir: PathBuf,
    /// Worksheet to read
    pub sheet: SheetSelector,
    /// 0-based row holding the column headers
    pub header_row: usize,
    /// Columns read from each row
    pub columns: ColumnRange,
    /// 1-based row holding per-column totals
    pub sum_row: usize,
    /// Header candidates for the class column
    pub class_candidates: Vec<String>,
    /// Header candidates for the student number column
    pub number_candidates: Vec<String>,
    /// Header candidates for the student name column
    pub name_candidates: Vec<String>,
    /// Font names written into exported workbooks, first one wins
    pub preferred_fonts: Vec<String>,
    /// TrueType font embedded into PDFs (needed for Hangul)
    pub pdf_font: Option<PathBuf>,
    /// Output format
    pub output_format: OutputFormat,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            data_dir: PathBuf::from(DEFAULT_DATA_DIR),
            sheet: SheetSelector::default(),
            header_row: DEFAULT_HEADER_ROW,
            columns: ColumnRange::default(),
            sum_row: DEFAULT_SUM_ROW,
            class_candidates: strings(&["반", "학급", "Class"]),
            number_candidates: strings(&["번호", "번", "No"]),
            name_candidates: strings(&["이름", "성명", "Name"]),
            preferred_fonts: strings(&["Apple SD Gothic Neo", "Malgun Gothic"]),
            pdf_font: None,
            output_format: OutputFormat::default(),
        }
    }
}

fn strings(items: &[&str]) -> Vec<String> {
    items.iter().map(|s| s.to_string()).collect()
}

impl Config {
    /// Create a new Config reading rosters from `data_dir`
    pub fn new(data_dir: PathBuf) -> Self {
        Self {
            data_dir,
            ..Default::default()
        }
    }

    /// Set the worksheet to read
    pub fn with_sheet(mut self, sheet: SheetSelector) -> Self {
        self.sheet = sheet;
        self
    }

    /// Set the 0-based header row
    pub fn with_header_row(mut self, row: usize) -> Self {
        self.header_row = row;
        self
    }

    /// Set the column span
    pub fn with_columns(mut self, columns: ColumnRange) -> Self {
        self.columns = columns;
        self
    }

    /// Set the 1-based totals row
    pub fn with_sum_row(mut self, row: usize) -> Self {
        self.sum_row = row;
        self
    }

    /// Set the font embedded into PDFs
    pub fn with_pdf_font(mut self, path: PathBuf) -> Self {
        self.pdf_font = Some(path);
        self
    }

    /// Set output format
    pub fn with_output_format(mut self, format: OutputFormat) -> Self {
        self.output_format = format;
        self
    }

    /// Font name stamped on every exported workbook cell
    pub fn font_name(&self) -> &str {
        self.preferred_fonts
            .first()
            .map(String::as_str)
            .unwrap_or(FALLBACK_FONT)
    }
}
