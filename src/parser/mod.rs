//! Parser layer for reading roster sheets

mod csv;
mod excel;

use std::path::Path;

use anyhow::{bail, Result};

use crate::config::Config;
use crate::model::Grid;

pub use self::csv::CsvParser;
pub use self::excel::ExcelParser;

/// Trait for reading a roster file into a raw grid
pub trait Parser: Send + Sync {
    /// Read the configured sheet of a file
    fn read_grid(&self, path: &Path, config: &Config) -> Result<Grid>;

    /// Check if this parser can handle the given file extension
    fn supports_extension(&self, ext: &str) -> bool;
}

/// Factory for creating parsers based on file extension
pub struct ParserFactory {
    parsers: Vec<Box<dyn Parser>>,
}

impl Default for ParserFactory {
    fn default() -> Self {
        Self::new()
    }
}

impl ParserFactory {
    /// Create a new parser factory with all supported parsers
    pub fn new() -> Self {
        Self {
            parsers: vec![Box::new(ExcelParser), Box::new(CsvParser)],
        }
    }

    /// Get a parser for the given file path
    pub fn get_parser(&self, path: &Path) -> Result<&dyn Parser> {
        let ext = path
            .extension()
            .and_then(|e| e.to_str())
            .unwrap_or("")
            .to_lowercase();

        for parser in &self.parsers {
            if parser.supports_extension(&ext) {
                return Ok(parser.as_ref());
            }
        }

        bail!(
            "Unsupported file format: {}",
            path.extension()
                .and_then(|e| e.to_str())
                .unwrap_or("unknown")
        )
    }

    /// Read a file using the appropriate parser
    pub fn read_grid(&self, path: &Path, config: &Config) -> Result<Grid> {
        let parser = self.get_parser(path)?;
        parser.read_grid(path, config)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parser_selection() {
        let factory = ParserFactory::new();
        assert!(factory.get_parser(Path::new("10월3주차.xlsx")).is_ok());
        assert!(factory.get_parser(Path::new("OLD.XLS")).is_ok());
        assert!(factory.get_parser(Path::new("roster.csv")).is_ok());
        assert!(factory.get_parser(Path::new("roster.tsv")).is_err());
        assert!(factory.get_parser(Path::new("roster.txt")).is_err());
        assert!(factory.get_parser(Path::new("roster.parquet")).is_err());
        assert!(factory.get_parser(Path::new("roster")).is_err());
    }
}
