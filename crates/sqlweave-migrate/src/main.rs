//! sqlweave-migrate CLI
//!
//! Command-line tool for diffing and inspecting schema snapshots.

use std::path::{Path, PathBuf};

use clap::{Parser, Subcommand, ValueEnum};
use tracing::{info, Level};
use tracing_subscriber::FmtSubscriber;

use sqlweave_migrate::prelude::*;

/// Schema differ and DDL generator.
#[derive(Parser)]
#[command(name = "sqlweave-migrate")]
#[command(author, version, about, long_about = None)]
struct Cli {
    /// Enable verbose output.
    #[arg(short, long, global = true)]
    verbose: bool,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Compute the alterations that move the current snapshot to the goal.
    Diff {
        /// Current database snapshot (empty database if omitted).
        #[arg(short, long, env = "SQLWEAVE_CURRENT")]
        current: Option<PathBuf>,

        /// Goal database snapshot.
        #[arg(short, long, env = "SQLWEAVE_GOAL")]
        goal: PathBuf,

        /// Output format.
        #[arg(short, long, value_enum, default_value_t = OutputFormat::Sql)]
        format: OutputFormat,
    },

    /// Print an outline of a snapshot.
    Tree {
        /// Snapshot to outline.
        #[arg(short, long)]
        snapshot: PathBuf,
    },

    /// Validate a snapshot.
    Check {
        /// Snapshot to validate.
        #[arg(short, long)]
        snapshot: PathBuf,
    },
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
enum OutputFormat {
    /// PostgreSQL DDL script.
    Sql,
    /// Alteration list as JSON.
    Json,
}

fn load_valid(path: &Path) -> Result<Database> {
    let database = load_database(path)?;
    validate(&database)?;
    Ok(database)
}

fn outline(database: &Database) -> String {
    let mut lines = Vec::new();
    walk(database, &mut |node: SchemaNode<'_>| {
        let line = match node {
            SchemaNode::Database(db) => format!("database ({} schemas)", db.schemas.len()),
            SchemaNode::Schema(schema) => match &schema.owner {
                Some(owner) => format!("  schema {} (owner {owner})", schema.name),
                None => format!("  schema {}", schema.name),
            },
            SchemaNode::DefaultPrivilege(_, p) => format!(
                "    default {} on {} to {}",
                p.privileges.join(", "),
                p.object_type,
                p.grantee
            ),
            SchemaNode::Privilege(_, p) => {
                format!("    grant {} to {}", p.privileges.join(", "), p.grantee)
            }
            SchemaNode::Table(_, table) => format!("    table {}", table.name),
            SchemaNode::Column(_, column) => format!(
                "      column {} {}{}",
                column.name,
                column.store_type,
                if column.is_nullable { "" } else { " not null" }
            ),
            SchemaNode::Index(_, index) => format!(
                "      index {} {:?} ({})",
                index.name,
                index.index_type,
                index.columns.join(", ")
            ),
        };
        lines.push(line);
    });
    lines.join("\n")
}

fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();

    // Setup logging
    let log_level = if cli.verbose {
        Level::DEBUG
    } else {
        Level::INFO
    };
    let subscriber = FmtSubscriber::builder()
        .with_max_level(log_level)
        .with_target(false)
        .without_time()
        .with_writer(std::io::stderr)
        .finish();
    tracing::subscriber::set_global_default(subscriber)?;

    match cli.command {
        Commands::Diff {
            current,
            goal,
            format,
        } => {
            let current = match current {
                Some(path) => load_valid(&path)?,
                None => {
                    info!("No current snapshot given, diffing against an empty database.");
                    Database::new()
                }
            };
            let goal = load_valid(&goal)?;

            let alterations = diff_database(&current, &goal);
            if alterations.is_empty() {
                info!("No changes detected.");
                return Ok(());
            }
            info!("{} alteration(s) detected.", alterations.len());

            match format {
                OutputFormat::Sql => {
                    print!("{}", PostgresScripter::new().render_script(&alterations));
                }
                OutputFormat::Json => {
                    println!("{}", serde_json::to_string_pretty(&alterations)?);
                }
            }
        }

        Commands::Tree { snapshot } => {
            let database = load_database(&snapshot)?;
            println!("{}", outline(&database));
        }

        Commands::Check { snapshot } => {
            let database = load_database(&snapshot)?;
            validate(&database)?;
            info!("{} is valid.", snapshot.display());
        }
    }

    Ok(())
}
