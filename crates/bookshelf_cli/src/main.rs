//! Command-line front end for the bookshelf catalog.
//!
//! # Responsibility
//! - Collect field values from arguments and invoke core registries/catalog.
//! - Print records as text or JSON; print domain errors and exit non-zero.

use std::path::PathBuf;
use std::process::ExitCode;

use anyhow::Context;
use bookshelf_core::db::open_db;
use bookshelf_core::{
    init_logging, CatalogConfig, CatalogError, NameRegistry, NamedRecord, NamedRecordStore,
    RecordKind, SqliteWorkCatalog, Work, WorkInput,
};
use clap::{Args, Parser, Subcommand};
use log::debug;
use serde::Serialize;

#[derive(Parser)]
#[command(name = "bookshelf")]
#[command(about = "Manage a catalog of works, creators and publishers", long_about = None)]
struct Cli {
    /// Config file (defaults to <config dir>/bookshelf/config.toml)
    #[arg(long, global = true)]
    config: Option<PathBuf>,

    /// SQLite database file, overriding the config value
    #[arg(long, global = true)]
    db: Option<PathBuf>,

    /// Print records as JSON
    #[arg(long, global = true)]
    json: bool,

    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand)]
enum Command {
    /// Manage creators
    Creator {
        #[command(subcommand)]
        action: NameAction,
    },
    /// Manage publishers
    Publisher {
        #[command(subcommand)]
        action: NameAction,
    },
    /// Manage works
    Work {
        #[command(subcommand)]
        action: WorkAction,
    },
}

#[derive(Subcommand)]
enum NameAction {
    /// Add a new record
    Add { name: String },
    /// Rename an existing record
    Rename { current: String, new_name: String },
    /// Delete a record that no work references
    Delete { name: String },
    /// Show one record by exact name
    Find { name: String },
    /// List all records
    List,
}

/// Field values for adding or modifying a work.
#[derive(Args)]
struct WorkFields {
    #[arg(long, allow_negative_numbers = true)]
    isbn: i64,
    #[arg(long)]
    title: String,
    #[arg(long, allow_negative_numbers = true)]
    year: i32,
    /// Total copies owned
    #[arg(long, allow_negative_numbers = true)]
    total: i32,
    /// Copies currently on loan
    #[arg(long, allow_negative_numbers = true, default_value_t = 0)]
    loaned: i32,
    /// Creator name; created when missing
    #[arg(long)]
    creator: String,
    /// Publisher name; created when missing
    #[arg(long)]
    publisher: String,
}

impl From<WorkFields> for WorkInput {
    fn from(fields: WorkFields) -> Self {
        Self {
            isbn: fields.isbn,
            title: fields.title,
            year: fields.year,
            total_copies: fields.total,
            loaned_copies: fields.loaned,
            creator_name: fields.creator,
            publisher_name: fields.publisher,
        }
    }
}

#[derive(Subcommand)]
enum WorkAction {
    /// Add a new work
    Add(WorkFields),
    /// Overwrite the work currently carrying ISBN
    Modify {
        #[arg(value_name = "CURRENT_ISBN")]
        current: i64,
        #[command(flatten)]
        fields: WorkFields,
    },
    /// Delete the work carrying ISBN
    Delete { isbn: i64 },
    /// Show the work carrying ISBN
    Show { isbn: i64 },
    /// Show the work with an exact title
    FindTitle { title: String },
    /// List works by a creator
    ByCreator { name: String },
    /// List works by a publisher
    ByPublisher { name: String },
    /// List all works
    List,
}

struct Output {
    json: bool,
}

impl Output {
    fn one<T: Serialize + std::fmt::Display>(&self, value: &T) -> anyhow::Result<()> {
        if self.json {
            println!("{}", serde_json::to_string_pretty(value)?);
        } else {
            println!("{value}");
        }
        Ok(())
    }

    fn many<T: Serialize + std::fmt::Display>(
        &self,
        values: &[T],
        empty_label: &str,
    ) -> anyhow::Result<()> {
        if self.json {
            println!("{}", serde_json::to_string_pretty(values)?);
        } else if values.is_empty() {
            println!("No {empty_label} stored yet.");
        } else {
            for (index, value) in values.iter().enumerate() {
                println!("{}. {value}", index + 1);
            }
        }
        Ok(())
    }

    fn deleted(&self, kind: &str, key: serde_json::Value, message: impl std::fmt::Display) {
        if self.json {
            println!("{}", delete_ack(kind, key));
        } else {
            println!("{message}");
        }
    }
}

fn delete_ack(kind: &str, key: serde_json::Value) -> serde_json::Value {
    serde_json::json!({ "deleted": kind, "key": key })
}

fn main() -> ExitCode {
    let cli = Cli::parse();
    match run(cli) {
        Ok(()) => ExitCode::SUCCESS,
        Err(err) => {
            match err.downcast_ref::<CatalogError>() {
                Some(domain) => eprintln!("{}: {domain}", domain.code()),
                None => eprintln!("error: {err:#}"),
            }
            ExitCode::FAILURE
        }
    }
}

fn run(cli: Cli) -> anyhow::Result<()> {
    let mut config = CatalogConfig::resolve(cli.config.as_deref())?;
    if let Some(db) = cli.db {
        config.database_path = db;
    }
    init_logging(&config.log_level, config.log_dir.as_deref())?;

    if let Some(parent) = config.database_path.parent() {
        if !parent.as_os_str().is_empty() {
            std::fs::create_dir_all(parent)
                .with_context(|| format!("failed to create `{}`", parent.display()))?;
        }
    }
    let conn = open_db(&config.database_path)
        .with_context(|| format!("failed to open `{}`", config.database_path.display()))?;
    let catalog = SqliteWorkCatalog::open(&conn)?;
    let out = Output { json: cli.json };
    debug!("event=cli_start module=cli status=ok");

    match cli.command {
        Command::Creator { action } => run_names(catalog.creators(), action, &out),
        Command::Publisher { action } => run_names(catalog.publishers(), action, &out),
        Command::Work { action } => run_works(&catalog, action, &out),
    }
}

fn run_names<K, S>(
    registry: &NameRegistry<K, S>,
    action: NameAction,
    out: &Output,
) -> anyhow::Result<()>
where
    K: RecordKind,
    S: NamedRecordStore<K>,
{
    match action {
        NameAction::Add { name } => {
            let record = registry.create(&name)?;
            out.one(&record)?;
        }
        NameAction::Rename { current, new_name } => {
            let mut record = require_named(registry, &current)?;
            registry.rename(&mut record, &new_name)?;
            out.one(&record)?;
        }
        NameAction::Delete { name } => {
            let record = require_named(registry, &name)?;
            registry.delete(record.id)?;
            out.deleted(
                K::LABEL,
                serde_json::json!(record.id),
                format!("Deleted {} `{}`.", K::LABEL, record.name),
            );
        }
        NameAction::Find { name } => {
            let record = require_named(registry, &name)?;
            out.one(&record)?;
        }
        NameAction::List => {
            let records = registry.list_all()?;
            out.many(&records, &format!("{}s", K::LABEL))?;
        }
    }
    Ok(())
}

fn require_named<K, S>(
    registry: &NameRegistry<K, S>,
    name: &str,
) -> anyhow::Result<NamedRecord<K>>
where
    K: RecordKind,
    S: NamedRecordStore<K>,
{
    let record = registry
        .find_by_name(name)?
        .ok_or_else(|| CatalogError::NotFound(format!("no {} named `{name}`", K::LABEL)))?;
    Ok(record)
}

fn run_works(
    catalog: &SqliteWorkCatalog<'_>,
    action: WorkAction,
    out: &Output,
) -> anyhow::Result<()> {
    match action {
        WorkAction::Add(fields) => {
            let work = catalog.create(&fields.into())?;
            out.one(&work)?;
        }
        WorkAction::Modify { current, fields } => {
            let mut work = require_isbn(catalog, current)?;
            catalog.modify(&mut work, &fields.into())?;
            out.one(&work)?;
        }
        WorkAction::Delete { isbn } => {
            catalog.delete(isbn)?;
            out.deleted(
                "work",
                serde_json::json!(isbn),
                format!("Deleted work with ISBN {isbn}."),
            );
        }
        WorkAction::Show { isbn } => out.one(&require_isbn(catalog, isbn)?)?,
        WorkAction::FindTitle { title } => out.one(&catalog.find_by_title(&title)?)?,
        WorkAction::ByCreator { name } => out.many(&catalog.find_by_creator(&name)?, "works")?,
        WorkAction::ByPublisher { name } => {
            out.many(&catalog.find_by_publisher(&name)?, "works")?
        }
        WorkAction::List => out.many(&catalog.list_all()?, "works")?,
    }
    Ok(())
}

fn require_isbn(catalog: &SqliteWorkCatalog<'_>, isbn: i64) -> anyhow::Result<Work> {
    let work = catalog
        .find_by_isbn(isbn)?
        .ok_or_else(|| CatalogError::NotFound(format!("no work with isbn {isbn}")))?;
    Ok(work)
}
