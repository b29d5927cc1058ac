//! CSV output

use std::io::Write;

use anyhow::Result;

use crate::roster::Applicants;

use super::Exporter;

/// Numbered applicant rows as CSV
pub struct CsvOutput;

impl CsvOutput {
    pub fn new() -> Self {
        Self
    }
}

impl Default for CsvOutput {
    fn default() -> Self {
        Self::new()
    }
}

impl Exporter for CsvOutput {
    fn render(&self, applicants: &Applicants, writer: &mut dyn Write) -> Result<()> {
        let mut csv_writer = csv::Writer::from_writer(writer);
        csv_writer.write_record(applicants.numbered_header())?;
        for row in applicants.numbered_rows(&applicants.rows) {
            csv_writer.write_record(row)?;
        }
        csv_writer.flush()?;
        Ok(())
    }
}
