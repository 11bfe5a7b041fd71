use anyhow::{bail, Result};
use clap::{Parser, Subcommand};
use cli::render;
use serde::Serialize;
use tracing::{error, info, warn};
use tracing_subscriber::EnvFilter;
use vault_core::browse::{self, FileFilter};
use vault_core::classifier::ClassifyRequest;
use vault_core::config;
use vault_core::files::{self, Upload};
use vault_core::models::Category;
use vault_core::pipeline::{self, Vault};

#[tokio::main]
async fn main() -> Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")))
        .init();

    let cli = Cli::parse();
    if let Err(err) = run(cli).await {
        error!(error = %err, "command failed");
        return Err(err);
    }
    Ok(())
}

async fn run(cli: Cli) -> Result<()> {
    let cfg = config::load(cli.config.as_deref())?;
    let vault = pipeline::open(&cfg).await?;

    match cli.command {
        Commands::Classify {
            id,
            url,
            mime,
            name,
            json,
        } => {
            let req = ClassifyRequest {
                file_id: id,
                file_url: url,
                mime_type: mime,
                file_name: name,
            };
            let result = vault.classifier.classify_and_persist(&req).await;
            if json {
                print_json(&result)?;
            } else {
                println!("{}", render::classification_line(id, &result));
            }
        }
        Commands::Retag { user, json } => {
            let outcome = vault.retagger.retag_all(user.as_deref()).await;
            if json {
                print_json(&outcome)?;
            } else {
                println!("{}", render::retag_line(&outcome));
            }
        }
        Commands::List {
            user,
            category,
            tag,
            search,
            json,
        } => run_list(&vault, user, category, tag, search, json).await?,
        Commands::Register {
            user,
            name,
            url,
            mime,
            size,
            json,
        } => {
            let record = files::register_upload(
                &vault.files,
                Upload {
                    owner_id: user,
                    file_name: name,
                    file_url: url,
                    mime_type: mime,
                    file_size: size,
                },
            )
            .await?;
            // Same fire-and-forget entry point an upload handler uses; awaited
            // here only so the process does not exit first.
            let handle = vault.classifier.spawn(ClassifyRequest {
                file_id: record.id,
                file_url: record.file_url.clone(),
                mime_type: record.mime_type.clone(),
                file_name: record.file_name.clone(),
            });
            let result = handle.await?;
            if let Some(err) = &result.error {
                warn!(file_id = record.id, error = %err, "registered file left uncategorized");
            }
            if json {
                print_json(&serde_json::json!({ "file": record, "classification": result }))?;
            } else {
                println!("registered file {}", record.id);
                println!("{}", render::classification_line(record.id, &result));
            }
        }
        Commands::AddUser { email } => {
            let id = vault.files.add_user(&email).await?;
            info!(user_id = id, "user created");
            println!("user {id}");
        }
        Commands::Delete { id } => {
            files::delete_file(&vault.files, vault.objects.as_ref(), id).await?;
            println!("File deleted successfully");
        }
    }
    Ok(())
}

#[derive(Parser)]
#[command(name = "file-vault")]
#[command(about = "Personal file vault with automatic categories and tags", long_about = None)]
struct Cli {
    /// Path to config TOML
    #[arg(short, long)]
    config: Option<String>,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Classify one stored file and write the result to its record
    Classify {
        /// File record id
        #[arg(long)]
        id: i64,
        /// Storage URL of the object
        #[arg(long)]
        url: String,
        /// MIME type of the file
        #[arg(long)]
        mime: String,
        /// File name shown to the user
        #[arg(long)]
        name: String,
        /// Output JSON
        #[arg(long)]
        json: bool,
    },
    /// Re-classify every file of a user, one file at a time
    Retag {
        /// Authenticated user id
        #[arg(long)]
        user: Option<String>,
        /// Output JSON
        #[arg(long)]
        json: bool,
    },
    /// List a user's files
    List {
        /// Owner id
        #[arg(long)]
        user: i64,
        /// Only this category, e.g. "Diagrams & Charts"
        #[arg(long)]
        category: Option<String>,
        /// Only files carrying this exact tag
        #[arg(long)]
        tag: Option<String>,
        /// Case-insensitive match on file name or tags
        #[arg(long)]
        search: Option<String>,
        /// Output JSON
        #[arg(long)]
        json: bool,
    },
    /// Record an uploaded object and classify it
    Register {
        /// Owner id
        #[arg(long)]
        user: i64,
        /// File name
        #[arg(long)]
        name: String,
        /// Storage URL; query parameters are dropped
        #[arg(long)]
        url: String,
        /// MIME type; resolved from the name when omitted
        #[arg(long)]
        mime: Option<String>,
        /// Size in bytes
        #[arg(long, default_value_t = 0)]
        size: i64,
        /// Output JSON
        #[arg(long)]
        json: bool,
    },
    /// Create a file owner
    AddUser {
        #[arg(long)]
        email: String,
    },
    /// Delete a file's object and record
    Delete {
        /// File record id
        #[arg(long)]
        id: i64,
    },
}

async fn run_list(
    vault: &Vault,
    user: i64,
    category: Option<String>,
    tag: Option<String>,
    search: Option<String>,
    json: bool,
) -> Result<()> {
    let category = match category.as_deref() {
        None | Some("All") => None,
        Some(label) => match Category::from_label(label) {
            Some(c) => Some(c),
            None => {
                let known: Vec<&str> = Category::ALL.iter().map(|c| c.label()).collect();
                bail!("unknown category {label:?}; expected one of {}", known.join(", "));
            }
        },
    };
    let filter = FileFilter {
        category,
        tag,
        search,
    };

    let records = vault.files.records(user).await?;
    let hits = filter.apply(&records);
    if json {
        print_json(&serde_json::json!({
            "categories": browse::present_categories(&records),
            "files": hits,
        }))?;
    } else {
        for file in &hits {
            println!("{}", render::file_line(file));
        }
        println!("{} of {} file(s)", hits.len(), records.len());
    }
    Ok(())
}

fn print_json<T: Serialize>(value: &T) -> Result<()> {
    println!("{}", serde_json::to_string_pretty(value)?);
    Ok(())
}
