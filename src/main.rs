use clap::{Parser, Subcommand, ValueEnum};
use std::path::PathBuf;
use thiserror::Error;
use tracing_subscriber::EnvFilter;

use sqlkv::codec::{self, CodecError, Value};
use sqlkv::kv::{Batch, Entry, KvError, KvStore};
use sqlkv::settings::{Settings, SettingsError};

#[derive(Error, Debug)]
pub enum AppError {
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Settings error: {0}")]
    Settings(#[from] SettingsError),

    #[error("KV store error: {0}")]
    Kv(#[from] KvError),

    #[error("Encoding error: {0}")]
    Codec(#[from] CodecError),

    #[error("Invalid integer '{0}'")]
    InvalidInteger(String),

    #[error("Either a value or --file must be specified")]
    MissingValue,
}

/// How a value given on the command line is interpreted.
#[derive(Debug, Clone, Copy, Default, ValueEnum)]
pub enum ValueKind {
    /// UTF-8 text.
    #[default]
    Text,
    /// Signed 64-bit integer.
    Integer,
    /// Raw bytes (use with --file for binary payloads).
    Bytes,
}

/// How stored values are printed.
#[derive(Debug, Clone, Copy, Default, ValueEnum)]
pub enum Show {
    /// Decode as UTF-8 text (lossy).
    #[default]
    Text,
    /// Decode as a little-endian integer.
    Integer,
    /// Print the raw bytes as hex.
    Hex,
}

#[derive(Parser)]
#[command(name = "sqlkv")]
#[command(about = "Key-value storage over a single relational table")]
struct Cli {
    /// Settings file (JSON, or TOML with a .toml extension); defaults apply if it is missing
    #[arg(long, global = true, default_value = "settings.json", env = "SQLKV_SETTINGS")]
    settings: PathBuf,

    /// Connection target (e.g. sqlite:///kv_db.db), overriding the settings file
    #[arg(long, global = true, env = "SQLKV_DATABASE")]
    database: Option<String>,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Print the connection target assembled from the settings file
    ConnectionString,

    /// Get the value for a key
    Get {
        /// Key to look up
        key: String,

        /// How to print the value
        #[arg(long, value_enum, default_value_t = Show::Text)]
        show: Show,
    },

    /// List every entry
    List {
        /// How to print the values
        #[arg(long, value_enum, default_value_t = Show::Text)]
        show: Show,
    },

    /// Get the values for several keys, skipping missing ones
    GetMany {
        /// Keys to look up
        #[arg(required = true)]
        keys: Vec<String>,

        /// How to print the values
        #[arg(long, value_enum, default_value_t = Show::Text)]
        show: Show,
    },

    /// Insert a new entry (fails if the key exists)
    Insert {
        /// Key for the value
        key: String,

        /// Value to store
        #[arg(group = "input")]
        value: Option<String>,

        /// Read the value from a file
        #[arg(long, group = "input")]
        file: Option<PathBuf>,

        /// How to interpret the value
        #[arg(long, value_enum, default_value_t = ValueKind::Text)]
        kind: ValueKind,
    },

    /// Insert a JSON batch atomically: an object, or an array of pairs / single-entry objects
    InsertMany {
        /// JSON batch
        #[arg(group = "input")]
        json: Option<String>,

        /// Read the JSON batch from a file
        #[arg(long, group = "input")]
        file: Option<PathBuf>,
    },

    /// Replace the value of an existing entry
    Update {
        /// Key for the value
        key: String,

        /// New value
        #[arg(group = "input")]
        value: Option<String>,

        /// Read the value from a file
        #[arg(long, group = "input")]
        file: Option<PathBuf>,

        /// How to interpret the value
        #[arg(long, value_enum, default_value_t = ValueKind::Text)]
        kind: ValueKind,
    },

    /// Remove entries (missing keys are ignored)
    Remove {
        /// Keys to remove
        #[arg(required = true)]
        keys: Vec<String>,
    },
}

fn main() -> Result<(), AppError> {
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("warn")),
        )
        .with_writer(std::io::stderr)
        .init();

    let cli = Cli::parse();
    let settings = Settings::load_or_default(&cli.settings)?;

    if let Commands::ConnectionString = cli.command {
        println!("{}", settings.connection_string());
        return Ok(());
    }

    let mut store = match &cli.database {
        Some(target) => KvStore::open_with(target, settings.store_options()?)?,
        None => KvStore::from_settings(&settings)?,
    };

    match cli.command {
        Commands::ConnectionString => Ok(()),
        Commands::Get { key, show } => {
            match store.get(&key)? {
                Some(entry) => println!("{}", render(&entry.value, show)),
                None => {
                    eprintln!("Key '{}' not found", key);
                    std::process::exit(1);
                }
            }
            Ok(())
        }
        Commands::List { show } => {
            let entries = store.get_all()?;
            if entries.is_empty() {
                println!("No entries");
            } else {
                print_entries(&entries, show);
            }
            Ok(())
        }
        Commands::GetMany { keys, show } => {
            let entries = store.get_multiple(&keys)?;
            print_entries(&entries, show);
            eprintln!("Found {} of {} keys", entries.len(), keys.len());
            Ok(())
        }
        Commands::Insert {
            key,
            value,
            file,
            kind,
        } => {
            let value = read_value(value, file, kind)?;
            store.insert(&key, value)?;
            println!("Inserted '{}'", key);
            Ok(())
        }
        Commands::InsertMany { json, file } => {
            let text = match (json, file) {
                (Some(j), _) => j,
                (None, Some(f)) => std::fs::read_to_string(f)?,
                (None, None) => return Err(AppError::MissingValue),
            };
            let batch: Batch = text.parse()?;
            let count = store.insert_multiple(batch)?;
            println!("Inserted {} entries", count);
            Ok(())
        }
        Commands::Update {
            key,
            value,
            file,
            kind,
        } => {
            let value = read_value(value, file, kind)?;
            store.update(&key, value)?;
            println!("Updated '{}'", key);
            Ok(())
        }
        Commands::Remove { keys } => {
            let removed = store.remove(&keys)?;
            println!("Removed {} entries", removed);
            Ok(())
        }
    }
}

fn read_value(
    value: Option<String>,
    file: Option<PathBuf>,
    kind: ValueKind,
) -> Result<Value, AppError> {
    match (kind, value, file) {
        (ValueKind::Bytes, _, Some(f)) => Ok(Value::Bytes(std::fs::read(f)?)),
        (ValueKind::Bytes, Some(v), None) => Ok(Value::Bytes(v.into_bytes())),
        (ValueKind::Text, _, Some(f)) => Ok(Value::Text(std::fs::read_to_string(f)?)),
        (ValueKind::Text, Some(v), None) => Ok(Value::Text(v)),
        (ValueKind::Integer, value, file) => {
            let text = match (value, file) {
                (Some(v), _) => v,
                (None, Some(f)) => std::fs::read_to_string(f)?,
                (None, None) => return Err(AppError::MissingValue),
            };
            let trimmed = text.trim();
            trimmed
                .parse()
                .map(Value::Integer)
                .map_err(|_| AppError::InvalidInteger(trimmed.to_string()))
        }
        (_, None, None) => Err(AppError::MissingValue),
    }
}

fn print_entries(entries: &[Entry], show: Show) {
    for entry in entries {
        println!("{}: {}", entry.key, render(&entry.value, show));
    }
}

fn render(bytes: &[u8], show: Show) -> String {
    match show {
        Show::Text => String::from_utf8_lossy(bytes).into_owned(),
        Show::Integer => match codec::decode_integer(bytes) {
            Ok(i) => i.to_string(),
            Err(e) => format!("<decode error: {}>", e),
        },
        Show::Hex => bytes.iter().map(|b| format!("{:02x}", b)).collect(),
    }
}
