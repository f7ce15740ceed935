//! Command-line interface for modelshelf.
//!
//! A thin consumer of the core: every command goes through the
//! repository contract, the query utilities, and the version
//! comparator. No command parses stored bytes itself.

use std::path::PathBuf;

use anyhow::{bail, Context, Result};
use clap::{Parser, Subcommand};
use uuid::Uuid;

use crate::config;
use crate::domain::{time, ChangelogEntry, IndexEntry, ModelMeta, Version};
use crate::query::{self, SortMode};
use crate::repo::ModelRepository;

/// modelshelf - team-shared catalog of versioned model assets
#[derive(Parser, Debug)]
#[command(name = "modelshelf")]
#[command(author, version, about, long_about = None)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Commands,
}

#[derive(Subcommand, Debug)]
pub enum Commands {
    /// Initialize the configured repository (writes an empty index)
    Init,

    /// List model families in the catalog
    List {
        /// Sort order
        #[arg(short, long, value_enum, default_value = "name")]
        sort: SortMode,

        /// Filter query; supports "a AND b" / "a OR b"
        #[arg(short, long)]
        query: Option<String>,
    },

    /// Search the catalog
    Search {
        /// Search query; supports "a AND b" / "a OR b"
        query: String,
    },

    /// Show one release's metadata
    Show {
        /// Model family id
        model_id: String,

        /// Release version (defaults to the latest)
        #[arg(short, long)]
        version: Option<String>,
    },

    /// Publish a new release
    Publish {
        /// Model family id (minted when omitted)
        #[arg(long)]
        id: Option<String>,

        /// Model family name
        #[arg(short, long)]
        name: String,

        /// Release version ("MAJOR.MINOR.PATCH")
        #[arg(short, long)]
        version: String,

        /// Payload files to upload
        #[arg(required = true)]
        files: Vec<PathBuf>,

        /// Description
        #[arg(short, long, default_value = "")]
        description: String,

        /// Author (defaults to $USER)
        #[arg(short, long)]
        author: Option<String>,

        /// Tags (comma-separated)
        #[arg(short, long)]
        tags: Option<String>,

        /// Changelog summary for this release
        #[arg(long, default_value = "")]
        summary: String,
    },

    /// Download a release's payload files
    Download {
        /// Model family id
        model_id: String,

        /// Release version
        version: String,

        /// Destination directory
        #[arg(short, long, default_value = ".")]
        dest: PathBuf,
    },

    /// Delete a release from the repository
    Delete {
        /// Model family id
        model_id: String,

        /// Release version
        version: String,
    },

    /// Show the resolved repository location
    Config,
}

impl Cli {
    /// Execute the CLI command
    pub async fn execute(self) -> Result<()> {
        match self.command {
            Commands::Init => init().await,
            Commands::List { sort, query } => list(sort, query.as_deref()).await,
            Commands::Search { query } => list(SortMode::Name, Some(query.as_str())).await,
            Commands::Show { model_id, version } => show(&model_id, version.as_deref()).await,
            Commands::Publish {
                id,
                name,
                version,
                files,
                description,
                author,
                tags,
                summary,
            } => {
                publish(PublishArgs {
                    id,
                    name,
                    version,
                    files,
                    description,
                    author,
                    tags,
                    summary,
                })
                .await
            }
            Commands::Download {
                model_id,
                version,
                dest,
            } => download(&model_id, &version, &dest).await,
            Commands::Delete { model_id, version } => delete(&model_id, &version).await,
            Commands::Config => show_config(),
        }
    }
}

/// Initialize the repository with an empty index if none exists
async fn init() -> Result<()> {
    let repo = config::open_repository()?;
    let index = repo.load_index().await?;
    repo.save_index(&index).await?;

    println!("Initialized {} ({} entries)", repo.describe(), index.len());
    Ok(())
}

/// List catalog entries, optionally filtered by a query
async fn list(sort: SortMode, query: Option<&str>) -> Result<()> {
    let repo = config::open_repository()?;
    let index = repo.load_index().await?;

    let mut entries: Vec<IndexEntry> = match query {
        Some(q) => index
            .entries
            .into_iter()
            .filter(|e| query::entry_matches_advanced(e, q))
            .collect(),
        None => index.entries,
    };
    query::sort_entries(&mut entries, sort);

    if entries.is_empty() {
        println!("No models found.");
        return Ok(());
    }

    println!("{:<38} {:<24} {:<12} UPDATED", "ID", "NAME", "VERSION");
    for entry in &entries {
        println!(
            "{:<38} {:<24} {:<12} {}",
            entry.id,
            entry.name,
            entry.latest_version,
            format_ticks(entry.updated_time_ticks),
        );
    }
    Ok(())
}

/// Show one release in detail
async fn show(model_id: &str, version: Option<&str>) -> Result<()> {
    let repo = config::open_repository()?;
    let index = repo.load_index().await?;

    let entry = index
        .get(model_id)
        .with_context(|| format!("No model with id {} in the index", model_id))?;

    let version = match version {
        Some(v) => v.to_string(),
        None => entry.latest_version.clone(),
    };

    let meta = repo.load_meta(model_id, &version).await?;

    println!("{} {} ({})", meta.identity.name, meta.version, meta.identity.id);
    if !meta.description.is_empty() {
        println!("  {}", meta.description);
    }
    if !meta.author.is_empty() {
        println!("  author:    {}", meta.author);
    }
    println!("  uploaded:  {}", format_ticks(meta.upload_time));
    if meta.vertex_count > 0 || meta.triangle_count > 0 {
        println!(
            "  geometry:  {} vertices, {} triangles",
            meta.vertex_count, meta.triangle_count
        );
    }
    if !meta.payload_paths.is_empty() {
        println!("  files:");
        for path in &meta.payload_paths {
            println!("    {}", path);
        }
    }
    if !meta.dependencies_detailed.is_empty() {
        println!("  dependencies:");
        for dep in &meta.dependencies_detailed {
            if dep.name.is_empty() {
                println!("    {}", dep.id);
            } else {
                println!("    {} ({})", dep.name, dep.type_name);
            }
        }
    }
    if !meta.notes.is_empty() {
        println!("  notes:");
        for note in &meta.notes {
            println!("    [{}] {}: {}", note.tag, note.author, note.message);
        }
    }
    if !meta.changelog.is_empty() {
        println!("  changelog:");
        for change in &meta.changelog {
            println!("    {} - {}", change.version, change.summary);
        }
    }
    Ok(())
}

struct PublishArgs {
    id: Option<String>,
    name: String,
    version: String,
    files: Vec<PathBuf>,
    description: String,
    author: Option<String>,
    tags: Option<String>,
    summary: String,
}

/// Publish a release: upload payload, write metadata, update the index
async fn publish(args: PublishArgs) -> Result<()> {
    if Version::parse(&args.version).is_none() {
        bail!(
            "Invalid version {:?}: expected MAJOR.MINOR.PATCH",
            args.version
        );
    }
    for file in &args.files {
        if !file.is_file() {
            bail!("Payload file not found: {}", file.display());
        }
    }

    let repo = config::open_repository()?;
    let mut index = repo.load_index().await?;

    let model_id = args
        .id
        .clone()
        .or_else(|| {
            // Re-publishing under the same name continues that family.
            index
                .entries
                .iter()
                .find(|e| e.name == args.name)
                .map(|e| e.id.clone())
        })
        .unwrap_or_else(|| Uuid::new_v4().to_string());

    let author = args
        .author
        .clone()
        .or_else(|| std::env::var("USER").ok())
        .unwrap_or_default();

    let now = time::ticks_now();
    let mut meta = ModelMeta::new(&model_id, &args.name, &args.version);
    meta.description = args.description.clone();
    meta.author = author.clone();
    meta.created_time = now;
    meta.updated_time = now;
    meta.relative_path = crate::repo::version_dir(&model_id, &args.version);

    // Carry family-level state (notes, changelog) forward from the
    // previous latest release.
    if let Some(entry) = index.get(&model_id) {
        if !entry.latest_version.is_empty() {
            match repo.load_meta(&model_id, &entry.latest_version).await {
                Ok(previous) => {
                    meta.notes = previous.notes;
                    meta.changelog = previous.changelog;
                    meta.install_path = previous.install_path;
                }
                Err(err) if err.is_not_found() => {}
                Err(err) => return Err(err.into()),
            }
        }
    }
    meta.changelog.push(ChangelogEntry {
        version: args.version.clone(),
        summary: args.summary.clone(),
        author: author.clone(),
        timestamp: now,
    });

    for file in &args.files {
        let file_name = file
            .file_name()
            .map(|n| n.to_string_lossy().to_string())
            .with_context(|| format!("Payload file has no name: {}", file.display()))?;
        let relative = format!("{}/{}", meta.relative_path, file_name);
        repo.upload_file(&relative, file).await?;
        meta.payload_paths.push(file_name);
    }
    meta.upload_time = time::ticks_now();

    repo.save_meta(&model_id, &args.version, &meta).await?;

    let mut entry = index
        .get(&model_id)
        .cloned()
        .unwrap_or_else(|| IndexEntry::new(&model_id, &args.name));
    entry.name = args.name.clone();
    entry.latest_version = args.version.clone();
    entry.description = args.description;
    if let Some(tags) = args.tags {
        entry.tags = tags
            .split(',')
            .map(|t| t.trim().to_string())
            .filter(|t| !t.is_empty())
            .collect();
    }
    entry.updated_time_ticks = now;
    entry.release_time_ticks = now;
    index.upsert(entry);
    repo.save_index(&index).await?;

    println!(
        "Published {} {} ({} files) as {}",
        args.name,
        args.version,
        args.files.len(),
        model_id
    );
    Ok(())
}

/// Download a release's payload files to a local directory
async fn download(model_id: &str, version: &str, dest: &PathBuf) -> Result<()> {
    let repo = config::open_repository()?;
    let meta = repo.load_meta(model_id, version).await?;

    if meta.payload_paths.is_empty() {
        println!("Release {} {} has no payload files.", model_id, version);
        return Ok(());
    }

    let release_dir = crate::repo::version_dir(model_id, version);
    for path in &meta.payload_paths {
        let relative = format!("{}/{}", release_dir, path);
        let local = dest.join(path);
        repo.download_file(&relative, &local).await?;
        println!("  {}", local.display());
    }

    println!(
        "Downloaded {} file(s) to {}",
        meta.payload_paths.len(),
        dest.display()
    );
    Ok(())
}

/// Delete a release and reconcile the index
async fn delete(model_id: &str, version: &str) -> Result<()> {
    let repo = config::open_repository()?;

    if !repo.delete_version(model_id, version).await? {
        println!("Release {} {} does not exist.", model_id, version);
        return Ok(());
    }

    let mut index = repo.load_index().await?;
    let was_latest = index
        .get(model_id)
        .map(|e| e.latest_version == version)
        .unwrap_or(false);

    if was_latest {
        match latest_remaining_version(repo.as_ref(), model_id).await? {
            Some(latest) => {
                if let Some(entry) = index.get_mut(model_id) {
                    entry.latest_version = latest;
                    entry.updated_time_ticks = time::ticks_now();
                }
            }
            None => {
                index.remove(model_id);
            }
        }
        repo.save_index(&index).await?;
    }

    println!("Deleted {} {}", model_id, version);
    Ok(())
}

/// Highest remaining release version of a model family, if any
async fn latest_remaining_version(
    repo: &dyn ModelRepository,
    model_id: &str,
) -> Result<Option<String>> {
    let files = repo.list_files(model_id).await?;

    let mut versions: Vec<Version> = files
        .iter()
        .filter_map(|f| f.split('/').next())
        .filter_map(Version::parse)
        .collect();
    versions.sort();
    versions.dedup();

    Ok(versions.last().map(|v| v.to_string()))
}

/// Print the resolved repository location
fn show_config() -> Result<()> {
    let location = config::resolve_location()?;
    match location {
        config::RepositoryLocation::Local(path) => {
            println!("repository: local {}", path.display())
        }
        config::RepositoryLocation::Http(url) => println!("repository: http {}", url),
    }
    Ok(())
}

/// Format epoch ticks as a human-readable UTC date
fn format_ticks(ticks: i64) -> String {
    if ticks == 0 {
        return "-".to_string();
    }
    time::datetime_from_ticks(ticks)
        .format("%Y-%m-%d %H:%M")
        .to_string()
}
