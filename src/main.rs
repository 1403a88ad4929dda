//! Markbook CLI
//!
//! A terminal front end over the notebook store, standing in for the
//! graphical shell: list, create, show, and save notes and notebooks.

use clap::{Parser, Subcommand};
use markbook::{JsonConfigStore, MarkbookConfig, MarkbookError, NotebookManager};
use std::io::Read;
use std::path::PathBuf;
use tracing_subscriber::EnvFilter;

/// Markbook - notebooks of Markdown files on local disk
#[derive(Parser, Debug)]
#[command(name = "markbook")]
#[command(author, version, about, long_about = None)]
struct Cli {
    /// Path to the settings file holding the notebook registry
    #[arg(long)]
    config: Option<PathBuf>,

    /// Verbose output
    #[arg(short, long)]
    verbose: bool,

    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// List registered notebooks
    Notebooks,

    /// List the notes of a notebook
    Notes { notebook: String },

    /// Create a new notebook and register it
    NewNotebook {
        name: String,

        /// Storage directory; defaults under the per-app config directory
        #[arg(long)]
        path: Option<PathBuf>,
    },

    /// Create a new empty note inside a notebook
    NewNote { notebook: String, name: String },

    /// Print a note's contents
    Show { notebook: String, note: String },

    /// Replace a note's contents and save it
    Save {
        notebook: String,
        note: String,

        /// Read the new contents from this file instead of stdin
        #[arg(long)]
        file: Option<PathBuf>,
    },
}

fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();

    let filter = if cli.verbose {
        EnvFilter::new("debug")
    } else {
        EnvFilter::new("info")
    };

    // Logs go to stderr so `show` output stays pipeable.
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_target(false)
        .with_writer(std::io::stderr)
        .init();

    let config = resolve_config(cli.config)?;
    let store = JsonConfigStore::open(&config.settings_file)?;
    let mut manager = NotebookManager::new(store)?;

    match cli.command {
        Command::Notebooks => {
            for nb in manager.notebooks() {
                println!(
                    "{}  {}  ({} notes)",
                    nb.name(),
                    nb.storage_path().display(),
                    nb.notes().len()
                );
            }
        }
        Command::Notes { notebook } => {
            let nb = manager
                .notebook(&notebook)
                .ok_or(MarkbookError::NotebookNotFound(notebook))?;
            for note in nb.notes() {
                println!("{}", note.name());
            }
        }
        Command::NewNotebook { name, path } => {
            let storage_path = path.unwrap_or_else(|| config.notebooks_root.join(&name));
            let nb = manager.create_notebook(&name, storage_path)?;
            println!(
                "Created notebook {} at {}",
                nb.name(),
                nb.storage_path().display()
            );
        }
        Command::NewNote { notebook, name } => {
            let nb = manager
                .notebook_mut(&notebook)
                .ok_or(MarkbookError::NotebookNotFound(notebook))?;
            let note = nb.create_note(&name)?;
            println!("Created note {}", note.backing_path().display());
        }
        Command::Show { notebook, note } => {
            let nb = manager
                .notebook(&notebook)
                .ok_or(MarkbookError::NotebookNotFound(notebook))?;
            let note = nb.note(&note).ok_or(MarkbookError::NoteNotFound(note))?;
            print!("{}", note.contents());
        }
        Command::Save {
            notebook,
            note,
            file,
        } => {
            let contents = read_contents(file)?;
            let nb = manager
                .notebook_mut(&notebook)
                .ok_or(MarkbookError::NotebookNotFound(notebook))?;
            let note = nb
                .note_mut(&note)
                .ok_or(MarkbookError::NoteNotFound(note))?;
            note.set_contents(contents);
            note.save()?;
        }
    }

    // Mirror the desktop app: flush the registry on normal shutdown.
    manager.write_config()?;

    Ok(())
}

/// Resolve the settings location, honoring a `--config` override.
fn resolve_config(config_override: Option<PathBuf>) -> anyhow::Result<MarkbookConfig> {
    let config_dir = dirs::config_dir()
        .ok_or_else(|| anyhow::anyhow!("Could not find config directory"))?
        .join("markbook");

    let mut config = MarkbookConfig::new(config_dir);
    if let Some(path) = config_override {
        config = config.with_settings_file(path);
    }
    Ok(config)
}

/// New note contents: from a file when given, otherwise stdin to EOF.
fn read_contents(file: Option<PathBuf>) -> anyhow::Result<String> {
    match file {
        Some(path) => Ok(std::fs::read_to_string(path)?),
        None => {
            let mut buf = String::new();
            std::io::stdin().read_to_string(&mut buf)?;
            Ok(buf)
        }
    }
}
