use anyhow::{Context, Result};
use clap::{Parser, Subcommand};
use std::path::{Path, PathBuf};
use tokio::sync::mpsc;

use emoji_picker::app::{App, AppEvent, AppOptions, Mode};
use emoji_picker::config::Config;
use emoji_picker::dataset::{self, category_slug, display_category, DatasetSource, LoadPolicy};
use emoji_picker::filter::{self, FilterQuery};
use emoji_picker::pagination::{self, PAGE_SIZE};
use emoji_picker::storage::{Database, DatabaseError};
use emoji_picker::ui;

/// Get the config directory path (~/.config/emoji-picker/)
fn get_config_dir() -> Result<PathBuf> {
    let home = std::env::var("HOME").context("HOME environment variable not set")?;
    let config_dir = PathBuf::from(home).join(".config").join("emoji-picker");
    Ok(config_dir)
}

#[derive(Parser, Debug)]
#[command(
    name = "emoji-picker",
    about = "Terminal emoji picker with search and a curated popular list"
)]
struct Args {
    /// Config file (default: ~/.config/emoji-picker/config.toml)
    #[arg(long, value_name = "FILE")]
    config: Option<PathBuf>,

    /// Dataset URL or file, overriding the config file
    #[arg(long, value_name = "SOURCE")]
    dataset: Option<String>,

    /// What to do when the dataset cannot be loaded
    #[arg(long, value_enum)]
    load_policy: Option<LoadPolicy>,

    #[command(subcommand)]
    command: Option<Command>,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Search and copy emojis (default)
    Browse,
    /// Edit the popular emoji list
    Curate,
    /// Print one page of matches and exit
    Search {
        /// Free-text query (empty matches everything)
        #[arg(default_value = "")]
        text: String,

        /// Category label or slug, e.g. "food-drink"
        #[arg(long)]
        category: Option<String>,

        /// 1-based page number
        #[arg(long, default_value_t = 1)]
        page: usize,
    },
    /// Print the saved popular emojis and exit
    Popular,
}

/// Create the config directory with user-only permissions.
fn ensure_config_dir(config_dir: &Path) -> Result<()> {
    if !config_dir.exists() {
        std::fs::create_dir_all(config_dir).context("Failed to create config directory")?;
        tracing::info!(path = %config_dir.display(), "Created config directory");
    }

    #[cfg(unix)]
    {
        use std::os::unix::fs::PermissionsExt;
        match std::fs::metadata(config_dir) {
            Ok(metadata) => {
                let mut perms = metadata.permissions();
                perms.set_mode(0o700);
                if let Err(e) = std::fs::set_permissions(config_dir, perms) {
                    tracing::warn!(
                        path = %config_dir.display(),
                        error = %e,
                        "Failed to set config directory permissions to 0700"
                    );
                }
            }
            Err(e) => {
                tracing::warn!(
                    path = %config_dir.display(),
                    error = %e,
                    "Failed to read config directory metadata"
                );
            }
        }
    }

    Ok(())
}

async fn open_database(path: &Path) -> Result<Database> {
    let path_str = path
        .to_str()
        .ok_or_else(|| anyhow::anyhow!("Invalid UTF-8 in database path"))?;
    match Database::open(path_str).await {
        Ok(db) => Ok(db),
        Err(DatabaseError::InstanceLocked) => {
            eprintln!(
                "Error: Another instance of emoji-picker appears to be running. Please close it and try again."
            );
            std::process::exit(1);
        }
        Err(e) => Err(anyhow::anyhow!("Failed to open database: {}", e)),
    }
}

/// `search`: load, filter, print one page.
async fn run_search(
    source: &DatasetSource,
    policy: LoadPolicy,
    config: &Config,
    text: String,
    category: Option<String>,
    page: usize,
) -> Result<()> {
    let client = reqwest::Client::builder()
        .timeout(config.fetch_timeout())
        .user_agent(concat!("emoji-picker/", env!("CARGO_PKG_VERSION")))
        .build()?;
    let dataset = dataset::load_dataset(&client, source, policy, config.fetch_timeout())
        .await
        .context("Failed to load emoji data")?;

    let query = FilterQuery::new(text, category.as_deref().map(category_slug));
    let view = filter::apply(&dataset, &query);
    let result = pagination::page(&view, PAGE_SIZE, page);

    if result.items.is_empty() {
        println!("No emojis found");
        return Ok(());
    }

    for record in result.items {
        println!(
            "{}  {}  ({})",
            record.glyph,
            record.name,
            display_category(&record.category)
        );
    }
    if result.has_more {
        println!(
            "... {} total matches, use --page {} for more",
            view.len(),
            page.max(1) + 1
        );
    }
    Ok(())
}

#[tokio::main]
async fn main() -> Result<()> {
    // Logs go to stderr so they do not corrupt the TUI or piped output
    tracing_subscriber::fmt()
        .with_env_filter(tracing_subscriber::EnvFilter::from_default_env())
        .with_writer(std::io::stderr)
        .init();

    let args = Args::parse();

    let config_dir = get_config_dir()?;
    ensure_config_dir(&config_dir)?;

    let config_path = args
        .config
        .clone()
        .unwrap_or_else(|| config_dir.join("config.toml"));
    let config = Config::load(&config_path)
        .with_context(|| format!("Failed to load config from {}", config_path.display()))?;

    let source_str = args
        .dataset
        .clone()
        .unwrap_or_else(|| config.dataset_source(&config_dir));
    let source = DatasetSource::parse(&source_str).context("Invalid dataset source")?;

    let command = args.command.unwrap_or(Command::Browse);
    let mode = match command {
        Command::Curate => Mode::Curate,
        _ => Mode::Browse,
    };
    let load_policy = args
        .load_policy
        .or(config.load_policy)
        .unwrap_or_else(|| mode.default_load_policy());

    let db_path = config.database_path(&config_dir);

    match command {
        Command::Search {
            text,
            category,
            page,
        } => return run_search(&source, load_policy, &config, text, category, page).await,
        Command::Popular => {
            let db = open_database(&db_path).await?;
            let glyphs = db.load_popular(&config.popular_key).await;
            if glyphs.is_empty() {
                println!("No popular emojis selected yet");
            } else {
                for glyph in glyphs {
                    println!("{}", glyph);
                }
            }
            return Ok(());
        }
        Command::Browse | Command::Curate => {}
    }

    let db = open_database(&db_path).await?;

    let options = AppOptions {
        mode,
        source,
        load_policy,
        fetch_timeout: config.fetch_timeout(),
        search_debounce: config.search_debounce(),
        popular_key: config.popular_key.clone(),
    };
    let mut app = App::new(db, options).context("Failed to create application")?;
    app.load_popular().await;

    // Create event channel for background tasks
    let (event_tx, event_rx) = mpsc::channel::<AppEvent>(32);

    app.begin_load(&event_tx);

    // Run the TUI
    ui::run(&mut app, event_tx, event_rx).await?;

    Ok(())
}
