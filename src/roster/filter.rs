//! Subject selection and the applicant list

use log::{debug, warn};

use crate::config::Config;
use crate::error::RosterError;
use crate::model::CellValue;

use super::RosterSheet;

/// Rows shown when the class / number / name columns can't be found
pub const PREVIEW_LIMIT: usize = 20;

const DEFAULT_CLASS_HEADER: &str = "반";
const DEFAULT_NUMBER_HEADER: &str = "번호";
const DEFAULT_NAME_HEADER: &str = "이름";

/// Whether a cell marks an application: its text reads as the number 1
pub fn is_one(cell: &CellValue) -> bool {
    cell.as_number() == Some(1.0)
}

/// Subject columns a user may pick from
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SubjectList {
    pub subjects: Vec<String>,
    /// No column survived filtering, so every column is offered
    pub fell_back: bool,
}

impl SubjectList {
    pub fn warning(&self) -> Option<&'static str> {
        self.fell_back.then_some(
            "no filterable subject columns (class/number/name and zero-total columns excluded); \
             showing every column, check the totals row and headers",
        )
    }
}

/// Every column except the student identity columns and those whose total is zero
pub(super) fn filterable_subjects(sheet: &RosterSheet, config: &Config) -> SubjectList {
    let ids = sheet.identity_columns(config);

    let subjects: Vec<String> = sheet
        .table
        .columns
        .iter()
        .filter(|c| !ids.contains(c.index) && sheet.total(&c.name) != 0.0)
        .map(|c| c.name.clone())
        .collect();

    if subjects.is_empty() {
        let list = SubjectList {
            subjects: sheet.headers().into_iter().map(String::from).collect(),
            fell_back: true,
        };
        if let Some(msg) = list.warning() {
            warn!("{}: {}", sheet.file.name, msg);
        }
        return list;
    }

    SubjectList {
        subjects,
        fell_back: false,
    }
}

/// Students who applied for one subject
#[derive(Debug, Clone)]
pub struct Applicants {
    /// Roster file name, e.g. `10월3주차.xlsx`
    pub file: String,
    /// File name without extension, e.g. `10월3주차`
    pub label: String,
    pub subject: String,
    /// Display columns (class, number, name), or every column as a fallback
    pub columns: Vec<String>,
    pub rows: Vec<Vec<CellValue>>,
    /// False when class/number/name couldn't be found
    pub has_display_columns: bool,
}

impl Applicants {
    pub fn len(&self) -> usize {
        self.rows.len()
    }

    pub fn is_empty(&self) -> bool {
        self.rows.is_empty()
    }

    /// Heading shown above the list
    pub fn page_title(&self) -> String {
        format!("{} {} 수강자 명단", self.label, self.subject)
    }

    /// Title written into the exported workbook
    pub fn sheet_title(&self) -> String {
        format!("{} {}", self.label, self.subject).trim().to_string()
    }

    /// Title of the PDF report
    pub fn report_title(&self) -> String {
        format!("필터 결과 ({} == 1) — {}", self.subject, self.file)
    }

    /// Default file name for an export
    pub fn export_file_name(&self, ext: &str) -> String {
        format!("{}_{}.{}", self.label, self.subject, ext)
    }

    /// Rows for on-screen preview; capped when showing every column
    pub fn preview_rows(&self) -> &[Vec<CellValue>] {
        if self.has_display_columns {
            &self.rows
        } else {
            &self.rows[..self.rows.len().min(PREVIEW_LIMIT)]
        }
    }

    pub fn warning(&self) -> Option<&'static str> {
        (!self.has_display_columns)
            .then_some("class/number/name columns not found, check the workbook headers")
    }

    /// Header row with a leading sequence column
    pub fn numbered_header(&self) -> Vec<String> {
        std::iter::once("순번".to_string())
            .chain(self.columns.iter().cloned())
            .collect()
    }

    /// Rows with a leading 1-based sequence number
    pub fn numbered_rows<'a>(
        &'a self,
        rows: &'a [Vec<CellValue>],
    ) -> impl Iterator<Item = Vec<String>> + 'a {
        rows.iter().enumerate().map(|(i, row)| {
            std::iter::once((i + 1).to_string())
                .chain(row.iter().map(|c| c.display().into_owned()))
                .collect()
        })
    }
}

/// Rows whose `subject` cell is one, projected onto the display columns
pub fn select_applicants(
    sheet: &RosterSheet,
    subject: &str,
    config: &Config,
) -> Result<Applicants, RosterError> {
    let subject = super::normalize_text(subject);
    let subject_idx = sheet
        .table
        .column_index(&subject)
        .ok_or_else(|| RosterError::UnknownSubject(subject.clone()))?;

    let headers = sheet.headers();
    let literal = |name: &str| headers.iter().position(|h| *h == name);
    let mut ids = sheet.identity_columns(config);
    ids.class = ids.class.or_else(|| literal(DEFAULT_CLASS_HEADER));
    ids.number = ids.number.or_else(|| literal(DEFAULT_NUMBER_HEADER));
    ids.name = ids.name.or_else(|| literal(DEFAULT_NAME_HEADER));
    let display = ids.ordered();

    let has_display_columns = !display.is_empty();
    let display = if has_display_columns {
        display
    } else {
        (0..headers.len()).collect()
    };

    let rows: Vec<Vec<CellValue>> = sheet
        .table
        .rows
        .iter()
        .filter(|row| row.get(subject_idx).map(is_one).unwrap_or(false))
        .map(|row| {
            display
                .iter()
                .map(|&i| row.get(i).cloned().unwrap_or(CellValue::Null))
                .collect()
        })
        .collect();

    debug!("{} applicant(s) for '{}' in {}", rows.len(), subject, sheet.file.name);

    let applicants = Applicants {
        file: sheet.file.name.clone(),
        label: sheet.file.label(),
        subject,
        columns: display.iter().map(|&i| headers[i].to_string()).collect(),
        rows,
        has_display_columns,
    };
    if let Some(msg) = applicants.warning() {
        warn!("{}: {}", sheet.file.name, msg);
    }

    Ok(applicants)
}
