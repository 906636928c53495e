use std::path::PathBuf;
use std::process;

use anyhow::{Context, Result};
use clap::{Parser, Subcommand};

use musaeum::{db, entry, render, ArtifactRecord, Session, StoreOptions};

#[derive(Debug, Parser)]
#[command(name = "musaeum", about = "Artifact catalogue store", version)]
struct Cli {
    /// Optional explicit store path; defaults to the platform data dir.
    #[arg(long, value_name = "PATH")]
    db: Option<PathBuf>,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Debug, Subcommand)]
enum Commands {
    /// List every category (folder) in the store.
    Categories,
    /// Create a new empty category.
    CreateCategory {
        /// Category name (letters, digits, underscores; letter first).
        name: String,
    },
    /// List every record title in a category.
    Titles { category: String },
    /// Look up one record by title and print it as JSON.
    Show {
        title: String,
        /// Restrict the lookup to one category instead of scanning all.
        #[arg(long)]
        category: Option<String>,
    },
    /// Validate a JSON record from a file and save it into a category.
    Save {
        category: String,
        /// Path to a JSON-encoded record.
        file: PathBuf,
    },
    /// Render a stored record to an HTML page plus a QR code PNG.
    Render {
        title: String,
        #[arg(long)]
        category: Option<String>,
        /// Output directory for the generated artifacts.
        #[arg(long, default_value = ".")]
        out: PathBuf,
    },
    /// Delete a record by title. Deleting an absent title is a no-op.
    Delete { category: String, title: String },
}

fn default_db_path() -> Result<PathBuf> {
    let base = dirs::data_dir().unwrap_or(std::env::current_dir()?);
    Ok(base.join("musaeum").join("musaeum.sqlite3"))
}

/// Titles may hold anything; file names may not.
fn artifact_file_stem(title: &str) -> String {
    let stem: String = title
        .chars()
        .map(|ch| if ch.is_ascii_alphanumeric() { ch } else { '_' })
        .collect();
    if stem.is_empty() {
        "artifact".to_string()
    } else {
        stem
    }
}

async fn run(cli: Cli) -> Result<i32> {
    let db_path = match cli.db {
        Some(path) => path,
        None => default_db_path().context("determine store path")?,
    };
    let session = Session::open(&StoreOptions {
        db_path: Some(db_path),
    })
    .await
    .context("open store session")?;

    let code = match cli.command {
        Commands::Categories => {
            for name in session.list_categories().await? {
                println!("{name}");
            }
            0
        }
        Commands::CreateCategory { name } => {
            session.create_category(&name).await?;
            println!("Created category '{name}'");
            0
        }
        Commands::Titles { category } => {
            for title in session.list_titles(&category).await? {
                println!("{title}");
            }
            0
        }
        Commands::Show { title, category } => {
            match session.find_by_title(category.as_deref(), &title).await? {
                Some((record, found_in)) => {
                    eprintln!("Found in category '{found_in}'");
                    println!("{}", serde_json::to_string_pretty(&record)?);
                    0
                }
                None => {
                    eprintln!("No record titled '{title}'");
                    1
                }
            }
        }
        Commands::Save { category, file } => {
            let raw = std::fs::read_to_string(&file)
                .with_context(|| format!("read record from {}", file.display()))?;
            let record: ArtifactRecord =
                serde_json::from_str(&raw).context("parse JSON record")?;
            entry::validate(&record)?;
            session.save(&category, &record).await?;
            println!("Saved '{}' into '{category}'", record.title);
            0
        }
        Commands::Render {
            title,
            category,
            out,
        } => match session.find_by_title(category.as_deref(), &title).await? {
            Some((record, _)) => {
                let stem = artifact_file_stem(&record.title);
                let html_path = out.join(format!("{stem}.html"));
                let qr_path = out.join(format!("{stem}.png"));

                let html = render::render_html(&record);
                db::write_atomic(&html_path, html.as_bytes())
                    .with_context(|| format!("write {}", html_path.display()))?;

                let qr = render::render_qr(&html_path.display().to_string())?;
                db::write_atomic(&qr_path, &qr)
                    .with_context(|| format!("write {}", qr_path.display()))?;

                println!("{}", html_path.display());
                println!("{}", qr_path.display());
                0
            }
            None => {
                eprintln!("No record titled '{title}'");
                1
            }
        },
        Commands::Delete { category, title } => {
            let removed = session.delete(&category, &title).await?;
            if removed {
                println!("Deleted '{title}' from '{category}'");
            } else {
                println!("Nothing to delete: no record titled '{title}' in '{category}'");
            }
            0
        }
    };

    session.close().await;
    Ok(code)
}

#[tokio::main]
async fn main() {
    musaeum::logging::init();

    let cli = Cli::parse();
    match run(cli).await {
        Ok(code) => process::exit(code),
        Err(err) => {
            eprintln!("Error: {err:#}");
            process::exit(1);
        }
    }
}
