//! drawmgr - command-line tools for drawing manager documents.
//!
//! Inspect and normalize saved shape documents, convert them to and from the
//! cookie format, and replay recorded command scripts against a headless map.

use anyhow::{bail, Context, Result};
use api::{
    execute_command, execute_query, Command, Console, DrawManager, DrawOptions, HeadlessMap,
    Query,
};
use clap::{Parser, Subcommand};
use interchange::{CodecOptions, Document};
use std::fs;
use std::path::{Path, PathBuf};
use storage::{CookieStore, LoadHandler, SaveHandler, COOKIE_NAME};

/// drawmgr - work with saved map drawings
#[derive(Parser)]
#[command(name = "drawmgr")]
#[command(about = "Command-line tools for map drawing documents")]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Summarize the shapes in a document
    Inspect {
        file: PathBuf,
    },

    /// Decode a document and write it back out in canonical form
    Normalize {
        file: PathBuf,

        /// Write coordinates as JSON numbers instead of strings
        #[arg(long)]
        numeric: bool,

        /// Output file (default: stdout)
        #[arg(short, long)]
        output: Option<PathBuf>,
    },

    /// Convert between documents and the cookie format
    Cookie {
        #[command(subcommand)]
        action: CookieAction,
    },

    /// Run a script of JSON commands against a document
    Replay {
        /// Document to load; rewritten on every change
        document: PathBuf,

        /// One JSON command or query per line
        commands: PathBuf,

        /// Write coordinates as JSON numbers instead of strings
        #[arg(long)]
        numeric: bool,
    },
}

#[derive(Subcommand)]
enum CookieAction {
    /// Print the cookie line that stores a document
    Encode { file: PathBuf },

    /// Print the document held by a cookie value or cookie header
    Decode { value: String },
}

fn main() -> Result<()> {
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info")).init();

    let cli = Cli::parse();

    match cli.command {
        Commands::Inspect { file } => inspect(&file),
        Commands::Normalize {
            file,
            numeric,
            output,
        } => normalize(&file, numeric, output.as_deref()),
        Commands::Cookie { action } => match action {
            CookieAction::Encode { file } => cookie_encode(&file),
            CookieAction::Decode { value } => cookie_decode(&value),
        },
        Commands::Replay {
            document,
            commands,
            numeric,
        } => replay(&document, &commands, numeric),
    }
}

fn codec_options(numeric: bool) -> CodecOptions {
    if numeric {
        CodecOptions::numeric()
    } else {
        CodecOptions::default()
    }
}

fn read_document(path: &Path) -> Result<Document> {
    let json = fs::read_to_string(path)
        .with_context(|| format!("Failed to read {}", path.display()))?;
    Document::from_json(&json).with_context(|| format!("Invalid document {}", path.display()))
}

fn inspect(path: &Path) -> Result<()> {
    let document = read_document(path)?;

    println!("{}: {} shapes", path.display(), document.len());
    for (kind, count) in document.kind_counts() {
        println!("  {:<10} {}", kind, count);
    }
    println!();
    for (index, record) in document.shapes.iter().enumerate() {
        let color = if record.color.is_empty() {
            "(no color)"
        } else {
            record.color.as_str()
        };
        println!("  [{}] {} {}", index, record.kind(), color);
    }
    Ok(())
}

fn normalize(path: &Path, numeric: bool, output: Option<&Path>) -> Result<()> {
    let document = read_document(path)?;
    let json = document.to_json(codec_options(numeric))?;

    match output {
        Some(out) => {
            fs::write(out, &json).with_context(|| format!("Failed to write {}", out.display()))?;
            log::info!("Wrote {} shapes to {}", document.len(), out.display());
        }
        None => println!("{}", json),
    }
    Ok(())
}

fn cookie_encode(path: &Path) -> Result<()> {
    let document = read_document(path)?;
    let json = document.to_json(CodecOptions::default())?;
    let (store, _jar) = CookieStore::in_memory();
    println!("{}", store.line(&json));
    Ok(())
}

fn cookie_decode(value: &str) -> Result<()> {
    // Accept a bare value or a whole `document.cookie` header.
    let raw = storage::find_cookie(value, COOKIE_NAME).unwrap_or(value);
    let json = storage::unescape(raw.trim())?;
    let document = Document::from_json(&json).context("Cookie does not hold a shape document")?;
    println!("{}", document.to_json(CodecOptions::default())?);
    Ok(())
}

/// One line of a replay script.
#[derive(Debug, PartialEq)]
enum ScriptLine {
    Command(Command),
    Query(Query),
}

/// Parse a script line. Blank lines and `#` comments yield `None`.
fn parse_line(line: &str) -> Result<Option<ScriptLine>> {
    let line = line.trim();
    if line.is_empty() || line.starts_with('#') {
        return Ok(None);
    }
    if let Ok(command) = serde_json::from_str::<Command>(line) {
        return Ok(Some(ScriptLine::Command(command)));
    }
    match serde_json::from_str::<Query>(line) {
        Ok(query) => Ok(Some(ScriptLine::Query(query))),
        Err(e) => bail!("Not a command or query: {}", e),
    }
}

fn replay(document: &Path, commands: &Path, numeric: bool) -> Result<()> {
    let script = fs::read_to_string(commands)
        .with_context(|| format!("Failed to read {}", commands.display()))?;

    // A document that does not decode is left untouched.
    let stored = if document.exists() {
        let json = fs::read_to_string(document)
            .with_context(|| format!("Failed to read {}", document.display()))?;
        Document::from_json(&json)
            .with_context(|| format!("Invalid document {}", document.display()))?;
        Some(json)
    } else {
        None
    };

    let target = document.to_path_buf();
    let save = SaveHandler::callback(move |json| {
        if let Err(e) = fs::write(&target, json) {
            log::error!("Failed to write {}: {}", target.display(), e);
        }
    });
    let load = LoadHandler::callback(move || stored.clone());

    let options = DrawOptions::default().with_codec(codec_options(numeric));
    let mut manager = DrawManager::new(HeadlessMap::new(), options, save, load, Console::Log);

    let mut succeeded = false;
    for (number, line) in script.lines().enumerate() {
        let parsed = parse_line(line)
            .with_context(|| format!("{}:{}", commands.display(), number + 1))?;
        let output = match parsed {
            Some(ScriptLine::Command(command)) => {
                let result = execute_command(&mut manager, command);
                succeeded |= result.is_success();
                serde_json::to_string(&result)?
            }
            Some(ScriptLine::Query(query)) => {
                serde_json::to_string(&execute_query(&manager, query))?
            }
            None => continue,
        };
        println!("{}", output);
    }

    if succeeded {
        manager.save();
    }
    Ok(())
}
