mod config;

use std::path::{Path, PathBuf};

use anyhow::{Context, bail};
use clap::{Parser, Subcommand};
use fragments::{FragmentService, available_representations, is_supported_type};
use serde::Serialize;
use tokio::io::AsyncWriteExt;
use tracing::info;
use tracing_subscriber::EnvFilter;

#[derive(Parser, Debug)]
#[command(name = "fragments")]
#[command(about = "Store typed fragments and read them back in other formats")]
struct Cli {
    /// Owner to act as. Defaults to the configured owner.
    #[arg(long, global = true, env = "FRAGMENTS_OWNER")]
    owner: Option<String>,

    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Store a file as a new fragment
    Create {
        /// Declared Content-Type, e.g. "text/markdown"
        #[arg(short = 't', long = "type")]
        content_type: String,
        file: PathBuf,
    },
    /// Print a fragment's data, converted when `<id>.<ext>` is given
    Get {
        path: String,
        /// Write to a file instead of stdout
        #[arg(short, long)]
        out: Option<PathBuf>,
    },
    /// Print a fragment's metadata
    Info { id: String },
    /// List the owner's fragments
    List {
        /// Include full metadata instead of ids only
        #[arg(short, long)]
        expand: bool,
    },
    /// Replace a fragment's data; the type must match
    Update {
        id: String,
        #[arg(short = 't', long = "type")]
        content_type: String,
        file: PathBuf,
    },
    /// Delete a fragment
    Delete { id: String },
    /// Show which types a Content-Type can be read back as
    Formats { content_type: String },
}

#[derive(Serialize)]
struct FragmentInfo<'a> {
    #[serde(flatten)]
    fragment: &'a fragments::Fragment,
    formats: Vec<&'static str>,
}

fn print_json<T: Serialize>(value: &T) -> anyhow::Result<()> {
    println!("{}", serde_json::to_string_pretty(value)?);
    Ok(())
}

async fn read_input(file: &Path) -> anyhow::Result<Vec<u8>> {
    tokio::fs::read(file)
        .await
        .with_context(|| format!("Failed to read {}", file.display()))
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::from_default_env())
        .with_target(false)
        .with_writer(std::io::stderr)
        .init();

    let cli = Cli::parse();
    let config = config::AppConfig::load().context("Failed to load config")?;
    let owner = cli.owner.unwrap_or(config.owner);

    let store = config
        .storage
        .open()
        .await
        .context("Failed to open fragment store")?;
    let service = FragmentService::new(store);
    info!(owner = %owner, backend = ?config.storage.backend, "fragment store ready");

    match cli.command {
        Command::Create { content_type, file } => {
            let data = read_input(&file).await?;
            let fragment = service.create(&owner, &content_type, &data).await?;
            print_json(&FragmentInfo {
                formats: fragment.formats(),
                fragment: &fragment,
            })?;
        }
        Command::Get { path, out } => {
            let content = service.read_by_path(&owner, &path).await?;
            match out {
                Some(out) => {
                    tokio::fs::write(&out, &content.data)
                        .await
                        .with_context(|| format!("Failed to write {}", out.display()))?;
                    info!(content_type = %content.content_type, path = %out.display(), "wrote fragment");
                }
                None => {
                    let mut stdout = tokio::io::stdout();
                    stdout.write_all(&content.data).await?;
                    stdout.flush().await?;
                }
            }
        }
        Command::Info { id } => {
            let fragment = service.read_metadata(&owner, &id).await?;
            print_json(&FragmentInfo {
                formats: fragment.formats(),
                fragment: &fragment,
            })?;
        }
        Command::List { expand } => {
            print_json(&service.list(&owner, expand).await?)?;
        }
        Command::Update {
            id,
            content_type,
            file,
        } => {
            let data = read_input(&file).await?;
            let fragment = service.update(&owner, &id, &content_type, &data).await?;
            print_json(&FragmentInfo {
                formats: fragment.formats(),
                fragment: &fragment,
            })?;
        }
        Command::Delete { id } => {
            service.delete(&owner, &id).await?;
        }
        Command::Formats { content_type } => {
            if !is_supported_type(&content_type) {
                bail!("'{content_type}' is not a supported type");
            }
            let formats: Vec<_> = available_representations(&content_type)
                .into_iter()
                .map(|t| t.as_str())
                .collect();
            print_json(&formats)?;
        }
    }

    Ok(())
}
