//! rosterpick - weekly roster subject picker
//!
//! Reads a weekly roster workbook, offers its subject columns, and lists or
//! exports (Excel, PDF, CSV, JSON) the students who marked a subject with `1`.

pub mod catalog;
pub mod config;
pub mod error;
pub mod model;
pub mod output;
pub mod parser;
pub mod roster;

pub use catalog::RosterFile;
pub use config::Config;
pub use error::RosterError;
pub use roster::{select_applicants, Applicants, RosterSheet};
