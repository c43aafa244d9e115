//! Ecomap CLI — ecosystem map engine.
//!
//! Usage:
//!   ecomap list [--db path]
//!   ecomap create <name> [--db path]
//!   ecomap import <image> [--save] [--db path]

use clap::{Parser, Subcommand};
use ecomap::{
    EcosystemMap, ImageData, MapPatch, MapStoreClient, OpenStore, SqliteStore, VisionExtractor,
};
use std::path::{Path, PathBuf};
use std::sync::Arc;

#[derive(Parser)]
#[command(name = "ecomap", version, about = "Ecosystem map engine")]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// List all maps, most recently updated first
    List {
        /// Path to SQLite database file
        #[arg(long)]
        db: Option<PathBuf>,
    },
    /// Show one map's nodes and edges
    Show {
        /// Map id
        id: String,
        #[arg(long)]
        db: Option<PathBuf>,
    },
    /// Create an empty map
    Create {
        /// Display name for the new map
        name: String,
        #[arg(long)]
        db: Option<PathBuf>,
    },
    /// Rename a map
    Rename {
        /// Map id
        id: String,
        /// New display name
        name: String,
        #[arg(long)]
        db: Option<PathBuf>,
    },
    /// Delete a map
    Delete {
        /// Map id
        id: String,
        #[arg(long)]
        db: Option<PathBuf>,
    },
    /// Extract a map candidate from a diagram image
    Import {
        /// Path to the image file
        image: PathBuf,
        /// Persist the candidate after extraction
        #[arg(long)]
        save: bool,
        #[arg(long)]
        db: Option<PathBuf>,
    },
}

/// Get the default database path (~/.local/share/ecomap/ecomap.db)
fn default_db_path() -> PathBuf {
    let data_dir = dirs::data_dir()
        .unwrap_or_else(|| dirs::home_dir().unwrap_or_default().join(".local/share"));
    let ecomap_dir = data_dir.join("ecomap");
    std::fs::create_dir_all(&ecomap_dir).ok();
    ecomap_dir.join("ecomap.db")
}

fn open_client(db: Option<PathBuf>) -> Result<MapStoreClient, String> {
    let db_path = db.unwrap_or_else(default_db_path);
    let store =
        SqliteStore::open(&db_path).map_err(|e| format!("failed to open database: {}", e))?;
    Ok(MapStoreClient::new(Arc::new(store)))
}

/// Media type from the image file extension.
fn detect_media_type(path: &Path) -> &'static str {
    match path.extension().and_then(|e| e.to_str()) {
        Some("jpg") | Some("jpeg") => "image/jpeg",
        Some("png") => "image/png",
        Some("gif") => "image/gif",
        Some("webp") => "image/webp",
        Some("svg") => "image/svg+xml",
        _ => "application/octet-stream",
    }
}

fn cmd_list(client: &MapStoreClient) -> i32 {
    let maps = match client.list_current() {
        Ok(maps) => maps,
        Err(e) => {
            eprintln!("Error: {}", e);
            return 1;
        }
    };
    if maps.is_empty() {
        println!("No maps saved.");
        return 0;
    }
    println!("{:<36}  {:<28}  {:>5}  {:>5}  UPDATED", "ID", "NAME", "NODES", "EDGES");
    println!("{}", "-".repeat(100));
    for map in maps {
        println!(
            "{:<36}  {:<28}  {:>5}  {:>5}  {}",
            map.id,
            map.name,
            map.nodes.len(),
            map.edges.len(),
            map.updated_at.format("%Y-%m-%d %H:%M:%S"),
        );
    }
    0
}

fn cmd_show(client: &MapStoreClient, id: &str) -> i32 {
    let map = match client.list_current() {
        Ok(maps) => maps.into_iter().find(|m| m.id == id),
        Err(e) => {
            eprintln!("Error: {}", e);
            return 1;
        }
    };
    let map = match map {
        Some(map) => map,
        None => {
            eprintln!("Error: map '{}' not found", id);
            return 1;
        }
    };
    println!("{} ({})", map.name, map.id);
    println!("section: {}", map.section);
    println!("created: {}", map.created_at.to_rfc3339());
    println!("updated: {}", map.updated_at.to_rfc3339());
    println!("\nnodes:");
    for node in &map.nodes {
        println!("  {:<8} [{}] {}", node.id, node.node_type, node.label);
    }
    println!("\nedges:");
    for edge in &map.edges {
        match &edge.label {
            Some(label) => println!("  {:<8} {} -[{}]-> {}", edge.id, edge.source, label, edge.target),
            None => println!("  {:<8} {} -> {}", edge.id, edge.source, edge.target),
        }
    }
    0
}

async fn cmd_create(client: &MapStoreClient, name: &str) -> i32 {
    match client.save(EcosystemMap::new(name)).await {
        Ok(saved) => {
            println!("Created map '{}' ({})", name, saved.id);
            0
        }
        Err(e) => {
            eprintln!("Error: {}", e);
            1
        }
    }
}

async fn cmd_rename(client: &MapStoreClient, id: &str, name: &str) -> i32 {
    match client.update(id, MapPatch::new().with_name(name)).await {
        Ok(()) => {
            println!("Renamed map {} to '{}'", id, name);
            0
        }
        Err(e) => {
            eprintln!("Error: {}", e);
            1
        }
    }
}

async fn cmd_delete(client: &MapStoreClient, id: &str) -> i32 {
    match client.delete(id).await {
        Ok(true) => {
            println!("Deleted map {}", id);
            0
        }
        Ok(false) => {
            eprintln!("Error: map '{}' not found", id);
            1
        }
        Err(e) => {
            eprintln!("Error: {}", e);
            1
        }
    }
}

async fn cmd_import(client: &MapStoreClient, image_path: &Path, save: bool) -> i32 {
    let bytes = match std::fs::read(image_path) {
        Ok(bytes) => bytes,
        Err(e) => {
            eprintln!("Error: cannot read '{}': {}", image_path.display(), e);
            return 1;
        }
    };
    let image = ImageData::from_bytes(detect_media_type(image_path), &bytes);

    let extractor = match VisionExtractor::from_env() {
        Ok(extractor) => extractor,
        Err(e) => {
            eprintln!("Error: {}", e);
            return 1;
        }
    };

    let candidate = match extractor.extract(&image).await {
        Ok(candidate) => candidate,
        Err(e) => {
            eprintln!("Error: {}", e);
            return 1;
        }
    };

    println!(
        "Extracted '{}': {} nodes, {} edges",
        candidate.name,
        candidate.nodes.len(),
        candidate.edges.len()
    );
    for node in &candidate.nodes {
        println!("  {:<8} [{}] {}", node.id, node.node_type, node.label);
    }

    if save {
        match client.save(candidate.into_map()).await {
            Ok(saved) => println!("Saved as {}", saved.id),
            Err(e) => {
                eprintln!("Error: {}", e);
                return 1;
            }
        }
    } else {
        println!("Not saved (pass --save to persist).");
    }
    0
}

#[tokio::main]
async fn main() {
    tracing_subscriber::fmt::init();

    let cli = Cli::parse();
    let code = match cli.command {
        Commands::List { db } => match open_client(db) {
            Ok(client) => cmd_list(&client),
            Err(e) => {
                eprintln!("Error: {}", e);
                1
            }
        },
        Commands::Show { id, db } => match open_client(db) {
            Ok(client) => cmd_show(&client, &id),
            Err(e) => {
                eprintln!("Error: {}", e);
                1
            }
        },
        Commands::Create { name, db } => match open_client(db) {
            Ok(client) => cmd_create(&client, &name).await,
            Err(e) => {
                eprintln!("Error: {}", e);
                1
            }
        },
        Commands::Rename { id, name, db } => match open_client(db) {
            Ok(client) => cmd_rename(&client, &id, &name).await,
            Err(e) => {
                eprintln!("Error: {}", e);
                1
            }
        },
        Commands::Delete { id, db } => match open_client(db) {
            Ok(client) => cmd_delete(&client, &id).await,
            Err(e) => {
                eprintln!("Error: {}", e);
                1
            }
        },
        Commands::Import { image, save, db } => match open_client(db) {
            Ok(client) => cmd_import(&client, &image, save).await,
            Err(e) => {
                eprintln!("Error: {}", e);
                1
            }
        },
    };
    std::process::exit(code);
}
