//! rosterpick - list and export the applicants of one subject in a weekly roster

use std::io::{BufRead, IsTerminal, Write};
use std::path::PathBuf;
use std::process::ExitCode;

use anyhow::{bail, Context, Result};
use clap::{Parser, Subcommand, ValueEnum};
use log::info;

use rosterpick::catalog;
use rosterpick::config::{
    ColumnRange, Config, OutputFormat, SheetSelector, DEFAULT_COLUMN_RANGE, DEFAULT_DATA_DIR,
    DEFAULT_SUM_ROW,
};
use rosterpick::output::{export_to_path, render_to_stdout};
use rosterpick::roster::{select_applicants, Applicants, RosterSheet};

#[derive(Debug, Clone, Copy, ValueEnum)]
enum CliExportFormat {
    Xlsx,
    Pdf,
    Csv,
    Json,
    /// The terminal table, as plain text
    Txt,
}

impl From<CliExportFormat> for OutputFormat {
    fn from(f: CliExportFormat) -> Self {
        match f {
            CliExportFormat::Xlsx => OutputFormat::Xlsx,
            CliExportFormat::Pdf => OutputFormat::Pdf,
            CliExportFormat::Csv => OutputFormat::Csv,
            CliExportFormat::Json => OutputFormat::Json,
            CliExportFormat::Txt => OutputFormat::Terminal,
        }
    }
}

/// List and export the students who applied for a subject in a weekly roster
#[derive(Parser, Debug)]
#[command(name = "rosterpick")]
#[command(author, version, about, long_about = None)]
struct Cli {
    #[command(subcommand)]
    command: Command,

    /// Folder holding the weekly roster workbooks
    #[arg(long, global = true, default_value = DEFAULT_DATA_DIR)]
    data_dir: PathBuf,

    /// Worksheet to read (defaults to the first sheet)
    #[arg(long, global = true)]
    sheet: Option<String>,

    /// Row holding the column headers (1-based)
    #[arg(long, global = true, default_value_t = 2, value_parser = clap::value_parser!(u64).range(1..))]
    header_row: u64,

    /// Columns to read, e.g. A:AG
    #[arg(long, global = true, default_value = DEFAULT_COLUMN_RANGE)]
    columns: String,

    /// Row holding per-subject totals (1-based); zero-total subjects are hidden
    #[arg(long, global = true, default_value_t = DEFAULT_SUM_ROW)]
    sum_row: usize,

    /// TrueType font embedded into PDF exports
    #[arg(long, global = true)]
    pdf_font: Option<PathBuf>,

    /// More log output (-v info, -vv debug)
    #[arg(short, long, global = true, action = clap::ArgAction::Count)]
    verbose: u8,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// List roster workbooks in the data folder
    Files,

    /// List the subjects of a roster that can be filtered on
    Subjects {
        /// Roster file name (or path); asked for when omitted
        file: Option<String>,
    },

    /// Show the applicants of a subject
    Show {
        /// Roster file name (or path); asked for when omitted
        file: Option<String>,
        /// Subject column; asked for when omitted
        subject: Option<String>,
    },

    /// Export the applicants of a subject
    Export {
        /// Roster file name (or path); asked for when omitted
        file: Option<String>,
        /// Subject column; asked for when omitted
        subject: Option<String>,

        /// Export format
        #[arg(short, long, value_enum, default_value = "xlsx")]
        format: CliExportFormat,

        /// Output path; `-` writes to stdout. Defaults to `<week>_<subject>.<ext>`
        #[arg(short, long)]
        output: Option<PathBuf>,
    },
}

fn main() -> ExitCode {
    let cli = Cli::parse();
    init_logging(cli.verbose);

    match run(cli) {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            eprintln!("Error: {:#}", e);
            ExitCode::from(2)
        }
    }
}

fn init_logging(verbose: u8) {
    let default_level = match verbose {
        0 => "warn",
        1 => "info",
        _ => "debug",
    };
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or(default_level))
        .format_timestamp(None)
        .init();
}

fn build_config(cli: &Cli) -> Result<Config> {
    let columns = ColumnRange::parse(&cli.columns)?;
    let mut config = Config::new(cli.data_dir.clone())
        .with_header_row((cli.header_row - 1) as usize)
        .with_columns(columns)
        .with_sum_row(cli.sum_row);

    if let Some(ref name) = cli.sheet {
        config = config.with_sheet(SheetSelector::Name(name.clone()));
    }
    if let Some(ref font) = cli.pdf_font {
        config = config.with_pdf_font(font.clone());
    }

    Ok(config)
}

fn run(cli: Cli) -> Result<()> {
    let config = build_config(&cli)?;

    match cli.command {
        Command::Files => {
            for file in catalog::list_roster_files(&config.data_dir)? {
                println!("{}", file.name);
            }
        }
        Command::Subjects { file } => {
            let sheet = load_sheet(file.as_deref(), &config)?;
            let list = sheet.subjects(&config);
            if let Some(msg) = list.warning() {
                eprintln!("warning: {}", msg);
            }
            for subject in &list.subjects {
                println!("{}", subject);
            }
        }
        Command::Show { file, subject } => {
            let applicants = pick_applicants(file.as_deref(), subject.as_deref(), &config)?;
            render_to_stdout(&applicants, &config)?;
        }
        Command::Export {
            file,
            subject,
            format,
            output,
        } => {
            let format = OutputFormat::from(format);
            let applicants = pick_applicants(file.as_deref(), subject.as_deref(), &config)?;
            let config = config.with_output_format(format);

            match output {
                Some(path) if path.as_os_str() == "-" => {
                    render_to_stdout(&applicants, &config)?;
                }
                output => {
                    let path = output.unwrap_or_else(|| {
                        PathBuf::from(applicants.export_file_name(format.extension()))
                    });
                    export_to_path(&applicants, &config, &path)?;
                    info!("exported {} applicant(s)", applicants.len());
                    eprintln!("Wrote {}", path.display());
                }
            }
        }
    }

    Ok(())
}

fn load_sheet(file: Option<&str>, config: &Config) -> Result<RosterSheet> {
    let file = match file {
        Some(name) => catalog::resolve(&config.data_dir, name)?,
        None => {
            let files = catalog::list_roster_files(&config.data_dir)?;
            let names: Vec<String> = files.iter().map(|f| f.name.clone()).collect();
            let idx = choose("Weekly roster", &names)?;
            files[idx].clone()
        }
    };
    RosterSheet::load(&file, config)
}

fn pick_applicants(file: Option<&str>, subject: Option<&str>, config: &Config) -> Result<Applicants> {
    let sheet = load_sheet(file, config)?;

    let subject = match subject {
        Some(s) => s.to_string(),
        None => {
            let list = sheet.subjects(config);
            let idx = choose("Subject", &list.subjects)?;
            list.subjects[idx].clone()
        }
    };

    select_applicants(&sheet, &subject, config)
        .with_context(|| format!("Failed to filter {} by {}", sheet.file.name, subject))
}

/// Numbered menu on an interactive terminal; the first option otherwise
fn choose(prompt: &str, options: &[String]) -> Result<usize> {
    if options.is_empty() {
        bail!("nothing to choose for {}", prompt.to_lowercase());
    }

    let stdin = std::io::stdin();
    if !stdin.is_terminal() {
        info!("{}: using '{}'", prompt, options[0]);
        return Ok(0);
    }

    let mut stderr = std::io::stderr();
    for (i, option) in options.iter().enumerate() {
        writeln!(stderr, "  {:>2}) {}", i + 1, option)?;
    }

    let mut lines = stdin.lock().lines();
    loop {
        write!(stderr, "{} [1]: ", prompt)?;
        stderr.flush()?;

        let line = match lines.next() {
            Some(line) => line?,
            None => return Ok(0),
        };
        if let Some(idx) = parse_choice(&line, options) {
            return Ok(idx);
        }
        writeln!(stderr, "Pick a number between 1 and {}", options.len())?;
    }
}

/// Empty input picks the first option; otherwise a 1-based number or an exact name
fn parse_choice(input: &str, options: &[String]) -> Option<usize> {
    let input = input.trim();
    if input.is_empty() {
        return Some(0);
    }
    match input.parse::<usize>() {
        Ok(n) if (1..=options.len()).contains(&n) => Some(n - 1),
        Ok(_) => None,
        Err(_) => options.iter().position(|o| o == input),
    }
}
