//! Command-line front end for the QuickNote store.
//!
//! # Responsibility
//! - Apply one note action per invocation against a file-backed store.
//! - Print the resulting list as tab-separated lines for scripting.

use clap::{Parser, Subcommand};
use quicknote_core::db::open_db;
use quicknote_core::config::LOG_DIR_ENV;
use quicknote_core::{
    core_version, index_from_i64, init_logging, ping, Note, NotePatch, NoteStore, NotesConfig,
    SqliteKvStore,
};
use std::path::PathBuf;
use std::process::ExitCode;

#[derive(Parser, Debug)]
#[command(name = "quicknote", version, about = "Ordered notes backed by SQLite")]
struct Cli {
    /// Database file (overrides QUICKNOTE_DB_PATH).
    #[arg(long, global = true)]
    db: Option<PathBuf>,

    /// Log level (overrides QUICKNOTE_LOG_LEVEL).
    #[arg(long, global = true)]
    log_level: Option<String>,

    /// Absolute log directory (overrides QUICKNOTE_LOG_DIR).
    #[arg(long, global = true)]
    log_dir: Option<PathBuf>,

    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Print all notes.
    List,
    /// Append a note; rejected when title and content are both blank.
    Add {
        #[arg(long, default_value = "")]
        title: String,
        #[arg(long, default_value = "")]
        content: String,
    },
    /// Delete the note at INDEX.
    Delete {
        #[arg(allow_negative_numbers = true)]
        index: i64,
    },
    /// Overwrite the given fields of the note at INDEX.
    Edit {
        #[arg(allow_negative_numbers = true)]
        index: i64,
        #[arg(long)]
        title: Option<String>,
        #[arg(long)]
        content: Option<String>,
    },
    /// Remove the note at INDEX and print its fields for re-adding.
    Take {
        #[arg(allow_negative_numbers = true)]
        index: i64,
    },
    /// Print core version information.
    Version,
}

fn main() -> ExitCode {
    let cli = Cli::parse();

    let mut config = NotesConfig::from_env();
    if let Some(db) = cli.db {
        config.db_path = db;
    }
    if let Some(log_dir) = cli.log_dir {
        config.log_dir = Some(log_dir);
    }

    match plan_logging(&config, cli.log_level.as_deref()) {
        LoggingPlan::Start { level, log_dir } => {
            if let Err(err) = init_logging(level, &log_dir.to_string_lossy()) {
                eprintln!("quicknote: logging disabled: {err}");
            }
        }
        LoggingPlan::Invalid(message) => eprintln!("quicknote: logging disabled: {message}"),
        LoggingPlan::Disabled {
            ignored_level_flag: true,
        } => eprintln!(
            "quicknote: --log-level has no effect without --log-dir or {LOG_DIR_ENV}"
        ),
        LoggingPlan::Disabled { .. } => {}
    }

    if let Command::Version = cli.command {
        println!("quicknote_core ping={}", ping());
        println!("quicknote_core version={}", core_version());
        return ExitCode::SUCCESS;
    }

    let kv = match open_db(&config.db_path)
        .map_err(|err| err.to_string())
        .and_then(|conn| SqliteKvStore::try_new(conn).map_err(|err| err.to_string()))
    {
        Ok(kv) => kv,
        Err(err) => {
            eprintln!(
                "quicknote: cannot open `{}`: {err}",
                config.db_path.display()
            );
            return ExitCode::FAILURE;
        }
    };

    let mut store = NoteStore::init(kv);
    run(&mut store, cli.command);
    print_notes(store.notes());
    ExitCode::SUCCESS
}

/// How this run sets up logging.
#[derive(Debug, PartialEq, Eq)]
enum LoggingPlan {
    Disabled { ignored_level_flag: bool },
    Start { level: &'static str, log_dir: PathBuf },
    Invalid(String),
}

/// Logging starts only with a log directory; the level is validated then.
fn plan_logging(config: &NotesConfig, flag_level: Option<&str>) -> LoggingPlan {
    let Some(log_dir) = config.log_dir.clone() else {
        return LoggingPlan::Disabled {
            ignored_level_flag: flag_level.is_some(),
        };
    };
    match config.effective_log_level(flag_level, "--log-level") {
        Ok(level) => LoggingPlan::Start { level, log_dir },
        Err(err) => LoggingPlan::Invalid(err.to_string()),
    }
}

fn run(store: &mut NoteStore<SqliteKvStore>, command: Command) {
    match command {
        Command::List | Command::Version => {}
        Command::Add { title, content } => {
            if !store.add(title, content) {
                eprintln!("quicknote: title and content are both empty; nothing added");
            }
        }
        Command::Delete { index } => match index_from_i64(index) {
            Some(position) => {
                store.delete(position);
            }
            None => report_out_of_range(index),
        },
        Command::Edit {
            index,
            title,
            content,
        } => match index_from_i64(index) {
            Some(position) => {
                store.edit(position, NotePatch { title, content });
            }
            None => report_out_of_range(index),
        },
        Command::Take { index } => {
            match index_from_i64(index).and_then(|position| store.take_for_edit(position)) {
                Some(draft) => println!(
                    "draft\t{}\t{}",
                    escape_field(&draft.title),
                    escape_field(&draft.content)
                ),
                None => report_out_of_range(index),
            }
        }
    }
}

fn report_out_of_range(index: i64) {
    eprintln!("quicknote: index {index} is out of range; list unchanged");
}

fn print_notes(notes: &[Note]) {
    for (index, note) in notes.iter().enumerate() {
        println!(
            "{index}\t{}\t{}",
            escape_field(&note.title),
            escape_field(&note.content)
        );
    }
}

fn escape_field(value: &str) -> String {
    value
        .replace('\\', "\\\\")
        .replace('\t', "\\t")
        .replace('\n', "\\n")
}
