//! Terminal preview of the applicant list

use std::io::Write;

use anyhow::Result;
use tabled::builder::Builder;
use tabled::settings::{Alignment, Style};

use crate::roster::Applicants;

use super::Exporter;

const RULE: &str = "━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━";

/// Boxed, centered table with a title banner
pub struct TerminalOutput;

impl TerminalOutput {
    pub fn new() -> Self {
        Self
    }

    fn write_header(&self, applicants: &Applicants, writer: &mut dyn Write) -> Result<()> {
        writeln!(writer, "{}", RULE)?;
        writeln!(writer, " {}", applicants.page_title())?;
        writeln!(writer, "{}", RULE)?;
        writeln!(writer)?;
        Ok(())
    }

    fn write_warning(&self, applicants: &Applicants, writer: &mut dyn Write) -> Result<()> {
        if let Some(msg) = applicants.warning() {
            writeln!(writer, "warning: {}", msg)?;
            writeln!(writer)?;
        }
        Ok(())
    }
}

impl Default for TerminalOutput {
    fn default() -> Self {
        Self::new()
    }
}

impl Exporter for TerminalOutput {
    fn render(&self, applicants: &Applicants, writer: &mut dyn Write) -> Result<()> {
        self.write_header(applicants, writer)?;
        self.write_warning(applicants, writer)?;

        if applicants.is_empty() {
            writeln!(writer, "No applicants for {}.", applicants.subject)?;
            return Ok(());
        }

        let rows = applicants.preview_rows();
        let mut builder = Builder::default();
        builder.push_record(applicants.numbered_header());
        for row in applicants.numbered_rows(rows) {
            builder.push_record(row);
        }

        let mut table = builder.build();
        table.with(Style::modern()).with(Alignment::center());
        writeln!(writer, "{}", table)?;

        if rows.len() < applicants.len() {
            writeln!(writer, "... showing {} of {} rows", rows.len(), applicants.len())?;
        }
        writeln!(writer, "Total: {}", applicants.len())?;

        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::roster::fixtures::*;
    use crate::roster::select_applicants;

    fn render(subject: &str) -> String {
        let sheet = weekly_sheet();
        let applicants = select_applicants(&sheet, subject, &weekly_config()).unwrap();
        let mut out = Vec::new();
        TerminalOutput::new().render(&applicants, &mut out).unwrap();
        String::from_utf8(out).unwrap()
    }

    #[test]
    fn test_renders_title_and_rows() {
        let text = render("수학");

        assert!(text.contains("10월3주차 수학 수강자 명단"));
        assert!(text.contains("순번"));
        assert!(text.contains("이서연"));
        assert!(text.contains("Total: 3"));
        assert!(!text.contains("김민수"));
    }

    #[test]
    fn test_empty_result() {
        let text = render("과학");
        assert!(text.contains("No applicants for 과학."));
    }
}
