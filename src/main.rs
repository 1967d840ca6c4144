//! pathgraph CLI - Command line interface for pathgraph stores
//!
//! Provides commands for reading and writing one named tree of a store file.
//! Paths are written `a/b/c`; the empty string is the root path. Values are
//! JSON, or the tagged form with `--tagged`.

use clap::{Parser, Subcommand};
use pathgraph::codec::{json, tagged};
use pathgraph::{
    Data, Database, DataTranslator, Nullable, PersistentTree, StringTranslator, Translator,
};
use pathgraph::{NodeStore, ObjectStore};
use std::path::PathBuf;

#[derive(Parser)]
#[command(name = "pathgraph")]
#[command(about = "Path-keyed trees in a content-addressed store file")]
#[command(version)]
struct Cli {
    /// Path to the database file
    #[arg(short, long, default_value = "tree.pgdb")]
    database: PathBuf,

    /// Output format (json or text)
    #[arg(short, long, default_value = "json")]
    format: OutputFormat,

    /// Name of the tree to operate on
    #[arg(short, long, default_value = "main")]
    tree: String,

    /// Read and print values in the tagged form instead of JSON
    #[arg(long)]
    tagged: bool,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Clone, Copy, Debug, PartialEq, Eq, clap::ValueEnum)]
enum OutputFormat {
    Json,
    Text,
}

#[derive(Subcommand)]
enum Commands {
    /// Initialize a new database
    Init,

    /// Store a value at a path
    Put {
        /// Path, e.g. "a/b/c"
        path: String,
        /// The value (JSON, or tagged with --tagged); empty text stores null
        value: String,
    },

    /// Get the value at a path
    Get {
        path: String,
    },

    /// Get every value along a path, root first
    GetAll {
        path: String,
    },

    /// Remove the value at a path
    Remove {
        path: String,
    },

    /// Check whether a path holds a value
    Contains {
        path: String,
    },

    /// List all entries of the tree
    List {
        /// Maximum number of entries to return
        #[arg(short, long)]
        limit: Option<usize>,
    },

    /// List the trees in the database
    Trees,

    /// Delete a tree
    Drop {
        /// Tree name
        name: String,
    },

    /// Show database status
    Status,
}

type CliTree<'db> = PersistentTree<'db, StringTranslator, Nullable<DataTranslator>, ObjectStore>;

fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();

    match &cli.command {
        Commands::Init => {
            let db = Database::create(&cli.database)?;
            db.flush()?;
            output(
                &cli.format,
                &serde_json::json!({
                    "status": "ok",
                    "message": format!("Created database at {}", cli.database.display())
                }),
            );
        }

        Commands::Put { path, value } => {
            let db = open_db(&cli.database)?;
            let mut tree = open_tree(&db, &cli.tree)?;
            let value = parse_value(&cli, value)?;
            let previous = tree.put(&parse_path(path), &value)?;
            let root = tree.flush()?;
            output(
                &cli.format,
                &serde_json::json!({
                    "status": "ok",
                    "path": path,
                    "replaced": previous.is_some(),
                    "previous": render(&cli, previous.as_ref())?,
                    "root": root.to_hex()
                }),
            );
        }

        Commands::Get { path } => {
            let db = open_db(&cli.database)?;
            let tree = open_tree(&db, &cli.tree)?;
            match tree.get(&parse_path(path))? {
                Some(value) => {
                    output(
                        &cli.format,
                        &serde_json::json!({
                            "path": path,
                            "value": render_value(&cli, &value)?
                        }),
                    );
                }
                None => {
                    output(
                        &cli.format,
                        &serde_json::json!({
                            "status": "error",
                            "message": format!("Path not found: {}", path)
                        }),
                    );
                    std::process::exit(1);
                }
            }
        }

        Commands::GetAll { path } => {
            let db = open_db(&cli.database)?;
            let tree = open_tree(&db, &cli.tree)?;
            let values = tree
                .get_all(&parse_path(path))?
                .iter()
                .map(|v| render_value(&cli, v))
                .collect::<anyhow::Result<Vec<_>>>()?;
            output(
                &cli.format,
                &serde_json::json!({
                    "path": path,
                    "count": values.len(),
                    "values": values
                }),
            );
        }

        Commands::Remove { path } => {
            let db = open_db(&cli.database)?;
            let mut tree = open_tree(&db, &cli.tree)?;
            let previous = tree.remove(&parse_path(path))?;
            tree.flush()?;
            output(
                &cli.format,
                &serde_json::json!({
                    "status": "ok",
                    "path": path,
                    "removed": previous.is_some(),
                    "previous": render(&cli, previous.as_ref())?
                }),
            );
        }

        Commands::Contains { path } => {
            let db = open_db(&cli.database)?;
            let tree = open_tree(&db, &cli.tree)?;
            output(
                &cli.format,
                &serde_json::json!({
                    "path": path,
                    "contains": tree.contains_path(&parse_path(path))
                }),
            );
        }

        Commands::List { limit } => {
            let db = open_db(&cli.database)?;
            let tree = open_tree(&db, &cli.tree)?;
            let mut entries: Vec<_> = tree
                .entries()?
                .into_iter()
                .map(|(path, value)| (path.join("/"), value))
                .collect();
            entries.sort_by(|a, b| a.0.cmp(&b.0));
            if let Some(limit) = limit {
                entries.truncate(*limit);
            }
            let items = entries
                .iter()
                .map(|(path, value)| -> anyhow::Result<serde_json::Value> {
                    Ok(serde_json::json!({
                        "path": path,
                        "value": render_value(&cli, value)?
                    }))
                })
                .collect::<anyhow::Result<Vec<_>>>()?;
            output(
                &cli.format,
                &serde_json::json!({
                    "tree": cli.tree,
                    "count": items.len(),
                    "entries": items
                }),
            );
        }

        Commands::Trees => {
            let db = open_db(&cli.database)?;
            let trees: Vec<_> = db
                .store()
                .roots()
                .into_iter()
                .map(|(name, root)| {
                    serde_json::json!({
                        "name": name,
                        "root": root.to_hex()
                    })
                })
                .collect();
            output(
                &cli.format,
                &serde_json::json!({
                    "count": trees.len(),
                    "trees": trees
                }),
            );
        }

        Commands::Drop { name } => {
            let db = open_db(&cli.database)?;
            let dropped = db.drop_tree(name)?;
            output(
                &cli.format,
                &serde_json::json!({
                    "status": "ok",
                    "tree": name,
                    "dropped": dropped
                }),
            );
        }

        Commands::Status => {
            let db = open_db(&cli.database)?;
            let tree = open_tree(&db, &cli.tree)?;
            output(
                &cli.format,
                &serde_json::json!({
                    "database": cli.database.display().to_string(),
                    "tree": cli.tree,
                    "entries": tree.len(),
                    "root": db.root(&cli.tree).map(|h| h.to_hex()),
                    "trees": db.tree_names().len(),
                    "objects": db.object_count()
                }),
            );
        }
    }

    Ok(())
}

fn open_db(path: &PathBuf) -> anyhow::Result<Database> {
    let db = Database::open_or_create(path)?;
    Ok(db)
}

fn open_tree<'db>(db: &'db Database, name: &str) -> anyhow::Result<CliTree<'db>> {
    Ok(db.tree(name, StringTranslator, Nullable(DataTranslator))?)
}

/// Split `a/b/c` into its key elements; surrounding slashes are ignored
fn parse_path(path: &str) -> Vec<String> {
    let trimmed = path.trim_matches('/');
    if trimmed.is_empty() {
        Vec::new()
    } else {
        trimmed.split('/').map(str::to_string).collect()
    }
}

fn parse_value(cli: &Cli, text: &str) -> anyhow::Result<Option<Data>> {
    let translator = Nullable(DataTranslator);
    if cli.tagged {
        return Ok(translator.decode(text)?);
    }
    if text.trim().is_empty() {
        return Ok(None);
    }
    Ok(translator.from_data(&json::from_str(text)?)?)
}

fn render(cli: &Cli, value: Option<&Option<Data>>) -> anyhow::Result<serde_json::Value> {
    match value {
        Some(value) => render_value(cli, value),
        None => Ok(serde_json::Value::Null),
    }
}

fn render_value(cli: &Cli, value: &Option<Data>) -> anyhow::Result<serde_json::Value> {
    let data = value.clone().unwrap_or_default();
    if cli.tagged {
        Ok(serde_json::Value::String(tagged::encode(&data)))
    } else {
        Ok(json::to_value(&data)?)
    }
}

fn output(format: &OutputFormat, value: &serde_json::Value) {
    let rendered = match format {
        OutputFormat::Json => serde_json::to_string(value),
        OutputFormat::Text => serde_json::to_string_pretty(value),
    };
    match rendered {
        Ok(text) => println!("{}", text),
        Err(e) => eprintln!("Failed to render output: {}", e),
    }
}
