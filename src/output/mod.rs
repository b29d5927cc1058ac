//! Output formatting for applicant lists

mod csv;
mod json;
mod pdf;
mod terminal;
mod xlsx;

use std::fs::File;
use std::io::{BufWriter, Write};
use std::path::Path;

use anyhow::{Context, Result};

use crate::config::{Config, OutputFormat};
use crate::roster::Applicants;

pub use self::csv::CsvOutput;
pub use json::JsonOutput;
pub use pdf::PdfOutput;
pub use terminal::TerminalOutput;
pub use xlsx::XlsxOutput;

/// Trait for applicant list renderers
pub trait Exporter {
    /// Render the applicant list to a writer
    fn render(&self, applicants: &Applicants, writer: &mut dyn Write) -> Result<()>;
}

/// Factory for creating renderers
pub struct ExportFactory;

impl ExportFactory {
    /// Create a renderer based on format type
    pub fn create(format: OutputFormat, config: &Config) -> Box<dyn Exporter> {
        match format {
            OutputFormat::Terminal => Box::new(TerminalOutput::new()),
            OutputFormat::Xlsx => Box::new(XlsxOutput::new(config.font_name())),
            OutputFormat::Pdf => Box::new(PdfOutput::new(config.pdf_font.clone())),
            OutputFormat::Csv => Box::new(CsvOutput::new()),
            OutputFormat::Json => Box::new(JsonOutput::new()),
        }
    }
}

/// Render to stdout in the configured format
pub fn render_to_stdout(applicants: &Applicants, config: &Config) -> Result<()> {
    let exporter = ExportFactory::create(config.output_format, config);
    let mut stdout = std::io::stdout().lock();
    exporter.render(applicants, &mut stdout)?;
    stdout.flush()?;
    Ok(())
}

/// Render into a file in the configured format, replacing it if present
pub fn export_to_path(applicants: &Applicants, config: &Config, path: &Path) -> Result<()> {
    let exporter = ExportFactory::create(config.output_format, config);
    let file =
        File::create(path).with_context(|| format!("Failed to create {}", path.display()))?;
    let mut writer = BufWriter::new(file);
    exporter
        .render(applicants, &mut writer)
        .with_context(|| format!("Failed to write {}", path.display()))?;
    writer.flush()?;
    Ok(())
}
