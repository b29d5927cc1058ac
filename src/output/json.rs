//! JSON output format

use std::io::Write;

use anyhow::Result;
use serde::Serialize;

use crate::model::CellValue;
use crate::roster::Applicants;

use super::Exporter;

/// Pretty-printed JSON document of the applicant list
pub struct JsonOutput;

impl JsonOutput {
    pub fn new() -> Self {
        Self
    }
}

impl Default for JsonOutput {
    fn default() -> Self {
        Self::new()
    }
}

#[derive(Serialize)]
struct JsonApplicants<'a> {
    file: &'a str,
    subject: &'a str,
    title: String,
    columns: &'a [String],
    rows: Vec<serde_json::Map<String, serde_json::Value>>,
    count: usize,
}

impl Exporter for JsonOutput {
    fn render(&self, applicants: &Applicants, writer: &mut dyn Write) -> Result<()> {
        let rows = applicants
            .rows
            .iter()
            .map(|row| {
                applicants
                    .columns
                    .iter()
                    .zip(row)
                    .map(|(name, cell)| (name.clone(), cell_value_to_json(cell)))
                    .collect()
            })
            .collect();

        let output = JsonApplicants {
            file: &applicants.file,
            subject: &applicants.subject,
            title: applicants.page_title(),
            columns: &applicants.columns,
            rows,
            count: applicants.len(),
        };

        serde_json::to_writer_pretty(&mut *writer, &output)?;
        writeln!(writer)?;

        Ok(())
    }
}

fn cell_value_to_json(value: &CellValue) -> serde_json::Value {
    match value {
        CellValue::Null => serde_json::Value::Null,
        CellValue::Bool(b) => serde_json::Value::Bool(*b),
        CellValue::Int(i) => serde_json::Value::Number((*i).into()),
        CellValue::Float(f) => serde_json::Number::from_f64(*f)
            .map(serde_json::Value::Number)
            .unwrap_or(serde_json::Value::Null),
        other => serde_json::Value::String(other.display().into_owned()),
    }
}
