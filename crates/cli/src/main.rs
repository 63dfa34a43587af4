// digitlaw CLI - headless Benford first-digit validation

use std::fs;
use std::path::{Path, PathBuf};
use std::process::ExitCode;

use clap::{Parser, Subcommand};

use digitlaw_engine::{validate_column, ConformityResult, Table};
use digitlaw_store::ResultStore;

pub const EXIT_SUCCESS: u8 = 0;
pub const EXIT_ERROR: u8 = 1;
pub const EXIT_USAGE: u8 = 2;

#[derive(Parser)]
#[command(name = "dlaw")]
#[command(about = "Validate datasets against Benford's Law")]
#[command(version)]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// List the column names of a tabular file
    #[command(after_help = "\
Examples:
  dlaw columns payments.csv
  dlaw columns report.xlsx")]
    Columns {
        /// Delimited text or spreadsheet file
        file: PathBuf,
    },

    /// Validate one column against Benford's Law and store the result
    #[command(after_help = "\
Examples:
  dlaw check payments.csv --column amount
  dlaw check report.xlsx -c Total --db ./history.sqlite")]
    Check {
        /// Delimited text or spreadsheet file
        file: PathBuf,

        /// Column to analyze
        #[arg(long, short = 'c')]
        column: String,

        /// Store location (defaults to the user data directory)
        #[arg(long)]
        db: Option<PathBuf>,
    },

    /// List stored validation results
    History {
        /// Store location (defaults to the user data directory)
        #[arg(long)]
        db: Option<PathBuf>,
    },

    /// Replay a stored result by id
    Show {
        /// Record id, as listed by `dlaw history`
        id: i64,

        /// Store location (defaults to the user data directory)
        #[arg(long)]
        db: Option<PathBuf>,
    },
}

#[derive(Debug)]
pub struct CliError {
    pub code: u8,
    pub message: String,
    pub hint: Option<String>,
}

impl CliError {
    fn error(message: impl Into<String>) -> CliError {
        CliError {
            code: EXIT_ERROR,
            message: message.into(),
            hint: None,
        }
    }

    fn with_hint(message: impl Into<String>, hint: impl Into<String>) -> CliError {
        CliError {
            code: EXIT_ERROR,
            message: message.into(),
            hint: Some(hint.into()),
        }
    }

    fn usage(message: impl Into<String>, hint: impl Into<String>) -> CliError {
        CliError {
            code: EXIT_USAGE,
            message: message.into(),
            hint: Some(hint.into()),
        }
    }
}

fn main() -> ExitCode {
    let cli = Cli::parse();

    let result = match cli.command {
        Commands::Columns { file } => cmd_columns(file),
        Commands::Check { file, column, db } => cmd_check(file, column, db),
        Commands::History { db } => cmd_history(db),
        Commands::Show { id, db } => cmd_show(id, db),
    };

    match result {
        Ok(()) => ExitCode::from(EXIT_SUCCESS),
        Err(CliError { code, message, hint }) => {
            eprintln!("error: {}", message);
            if let Some(hint) = hint {
                eprintln!("hint:  {}", hint);
            }
            ExitCode::from(code)
        }
    }
}

fn cmd_columns(file: PathBuf) -> Result<(), CliError> {
    let (table, _) = load_table(&file)?;
    for name in table.column_names() {
        println!("{name}");
    }
    Ok(())
}

fn cmd_check(file: PathBuf, column: String, db: Option<PathBuf>) -> Result<(), CliError> {
    let (table, filename) = load_table(&file)?;

    let col = table.column(&column).ok_or_else(|| {
        CliError::usage(
            format!("no column named '{column}' in {filename}"),
            format!("available columns: {}", table.column_names().join(", ")),
        )
    })?;

    let result = validate_column(&filename, &column, &col.values)
        .map_err(|e| CliError::with_hint(e.to_string(), "try a different column"))?;

    let store = open_store(db)?;
    let id = store.insert(&result).map_err(|e| CliError::error(e.to_string()))?;

    print_result(&result);
    println!();
    println!("stored as record {id}");
    Ok(())
}

fn cmd_history(db: Option<PathBuf>) -> Result<(), CliError> {
    let store = open_store(db)?;
    let entries = store.list().map_err(|e| CliError::error(e.to_string()))?;

    if entries.is_empty() {
        println!("no stored results");
        return Ok(());
    }
    for entry in entries {
        println!(
            "{:>4}  {}  {}  {}",
            entry.id,
            entry.timestamp.format("%Y-%m-%d %H:%M:%S"),
            entry.filename,
            entry.column,
        );
    }
    Ok(())
}

fn cmd_show(id: i64, db: Option<PathBuf>) -> Result<(), CliError> {
    let store = open_store(db)?;
    let result = store
        .get(id)
        .map_err(|e| CliError::with_hint(e.to_string(), "`dlaw history` lists stored ids"))?;
    print_result(&result);
    Ok(())
}

fn load_table(file: &Path) -> Result<(Table, String), CliError> {
    let filename = file
        .file_name()
        .and_then(|n| n.to_str())
        .unwrap_or("upload")
        .to_string();
    let bytes = fs::read(file)
        .map_err(|e| CliError::error(format!("cannot read {}: {e}", file.display())))?;
    let table = digitlaw_io::parse(&bytes, &filename)
        .map_err(|e| CliError::with_hint(e.to_string(), "try a different file"))?;
    Ok((table, filename))
}

fn open_store(db: Option<PathBuf>) -> Result<ResultStore, CliError> {
    let path = match db {
        Some(path) => path,
        None => default_store_path()?,
    };
    if let Some(parent) = path.parent() {
        if !parent.as_os_str().is_empty() {
            fs::create_dir_all(parent).map_err(|e| {
                CliError::error(format!("cannot create {}: {e}", parent.display()))
            })?;
        }
    }
    ResultStore::open(&path).map_err(|e| CliError::error(e.to_string()))
}

fn default_store_path() -> Result<PathBuf, CliError> {
    dirs::data_dir()
        .map(|dir| dir.join("digitlaw").join("history.sqlite"))
        .ok_or_else(|| CliError::error("no user data directory found; pass --db"))
}

fn print_result(result: &ConformityResult) {
    println!("{}", result.verdict());
    println!();
    println!("digit  observed  expected");
    for bin in &result.distribution.bins {
        println!(
            "{:>5}  {:>7.1}%  {:>7.1}%",
            bin.digit,
            bin.observed * 100.0,
            bin.expected * 100.0,
        );
    }
}
