//! Lexstore CLI - inspect and edit database-backed localization strings

use clap::{Parser, Subcommand};
use std::path::{Path, PathBuf};
use lexstore::config::{self, LexstoreConfig};
use lexstore::storage::SqliteStore;
use lexstore::ui::{self, StringsTable, stats_table};
use lexstore::{Locale, LocalizedString, ResolverFactory, ResourceEntry, Resolver};
use tracing_subscriber::{fmt, prelude::*, EnvFilter};

#[derive(Parser)]
#[command(name = "lexstore")]
#[command(version)]
#[command(about = "Database-backed string localization with locale fallback")]
#[command(long_about = r#"
Lexstore resolves display strings by key and locale from a SQLite store,
falling back through parent locales (zh-CN -> zh -> invariant) and to the
key itself when no translation exists.

Example usage:
  lexstore set --resource App.Strings --locale zh --key Hello --value 你好
  lexstore get --resource App.Strings --locale zh-CN --key Hello
  lexstore list --resource App.Strings --locale zh-CN --all
"#)]
struct Cli {
    /// Enable verbose logging
    #[arg(short, long, global = true)]
    verbose: bool,

    /// Path to the config file
    #[arg(short, long, global = true)]
    config: Option<PathBuf>,

    /// Path to the database file (overrides the config file)
    #[arg(short, long, global = true)]
    database: Option<PathBuf>,

    #[command(subcommand)]
    command: Commands,
}

/// Identifies a resolver by base name and location
#[derive(clap::Args)]
struct ResourceArgs {
    /// Resource base name, e.g. App.Strings
    #[arg(short, long)]
    resource: String,

    /// Location (module) of the resource; defaults to the first segment of the base name
    #[arg(short = 'L', long)]
    location: Option<String>,

    /// Locale name, e.g. zh-CN; empty for the invariant locale
    #[arg(short, long)]
    locale: String,
}

#[derive(Subcommand)]
enum Commands {
    /// Write a default config file
    Init {
        /// Overwrite an existing config
        #[arg(long)]
        force: bool,
    },

    /// Resolve one string
    Get {
        #[command(flatten)]
        target: ResourceArgs,

        /// Content key
        #[arg(short, long)]
        key: String,

        /// Positional format arguments ({0}, {1}, ...)
        #[arg(short, long = "arg")]
        args: Vec<String>,

        /// Register the key in the store when it cannot be resolved
        #[arg(long)]
        auto_create: bool,
    },

    /// List all strings of a resource
    List {
        #[command(flatten)]
        target: ResourceArgs,

        /// Include keys from parent locales
        #[arg(short, long)]
        all: bool,

        /// Output JSON instead of a table
        #[arg(long)]
        json: bool,
    },

    /// Set (insert or replace) a translation
    Set {
        #[command(flatten)]
        target: ResourceArgs,

        /// Content key
        #[arg(short, long)]
        key: String,

        /// Translated content
        #[arg(short = 'V', long)]
        value: String,
    },

    /// Show keys registered without a translation
    Gaps {
        #[command(flatten)]
        target: ResourceArgs,
    },

    /// Show statistics about the store
    Stats,
}

fn main() {
    let cli = Cli::parse();

    // Initialize logging
    let filter = if cli.verbose {
        EnvFilter::new("debug")
    } else {
        EnvFilter::new("info")
    };

    tracing_subscriber::registry()
        .with(fmt::layer().with_writer(std::io::stderr))
        .with(filter)
        .init();

    if let Err(e) = run(cli) {
        ui::error(&format!("{:#}", e));
        std::process::exit(1);
    }
}

fn run(cli: Cli) -> anyhow::Result<()> {
    let config_path = cli.config.clone().unwrap_or_else(config::default_config_path);
    let mut config = config::load_config(Some(&config_path))?.unwrap_or_default();
    let database = match cli.database {
        Some(path) => path,
        None => match config.database.take() {
            Some(path) => PathBuf::from(path),
            None => config::default_database_path_in(&std::env::current_dir()?),
        },
    };
    tracing::debug!("Using database {}", database.display());

    match cli.command {
        Commands::Init { force } => {
            let mut fresh = LexstoreConfig::default();
            fresh.database = Some(config::default_database_path_in(Path::new(".")).display().to_string());
            config::write_config(&config_path, &fresh, force)?;
            ui::success(&format!("Wrote {}", config_path.display()));
        }

        Commands::Get { target, key, args, auto_create } => {
            let mut options = config.localization;
            options.auto_create_missing |= auto_create;
            let factory = ResolverFactory::new(SqliteStore::open(&database)?, options);
            let resolver = resolver_for(&factory, &target)?;
            let locale = parse_locale(&target.locale)?;

            let result = resolver.lookup_formatted(&key, args.as_slice(), &locale)?;
            println!("{}", ui::translation(&result));
            if !result.found {
                ui::warn(&format!(
                    "'{}' has no translation in {} for {}",
                    key,
                    resolver.resource_name(),
                    display_locale(&locale)
                ));
            }
        }

        Commands::List { target, all, json } => {
            let factory = ResolverFactory::new(SqliteStore::open(&database)?, config.localization);
            let resolver = resolver_for(&factory, &target)?;
            let locale = parse_locale(&target.locale)?;

            let strings = resolver
                .all_strings(&locale, all)?
                .iter()
                .collect::<lexstore::Result<Vec<LocalizedString>>>()?;

            if json {
                println!("{}", serde_json::to_string_pretty(&strings)?);
            } else if strings.is_empty() {
                ui::warn(&format!("No strings for {} in {}", resolver.resource_name(), display_locale(&locale)));
            } else {
                ui::resource_heading(resolver.resource_name(), display_locale(&locale));
                let mut table = StringsTable::new();
                for string in &strings {
                    table.add(string);
                }
                println!("{}", table.build());
                let missing = strings.iter().filter(|s| !s.found).count();
                ui::info("Strings", &format!("{} ({} untranslated)", strings.len(), missing));
            }
        }

        Commands::Set { target, key, value } => {
            let store = SqliteStore::open(&database)?;
            let factory = ResolverFactory::new(store, config.localization);
            let resolver = resolver_for(&factory, &target)?;
            let locale = parse_locale(&target.locale)?;

            let entry = ResourceEntry::new(resolver.resource_name(), locale.name(), key.as_str(), value.as_str());
            factory.store().upsert(&entry)?;
            ui::success(&format!("{} [{}] {} = {}", entry.resource_name, display_locale(&locale), key, value));
        }

        Commands::Gaps { target } => {
            let factory = ResolverFactory::new(SqliteStore::open(&database)?, config.localization);
            let resolver = resolver_for(&factory, &target)?;
            let locale = parse_locale(&target.locale)?;

            let gaps = factory.store().untranslated(resolver.resource_name(), locale.name())?;
            if gaps.is_empty() {
                ui::success("No untranslated keys");
            } else {
                ui::resource_heading(resolver.resource_name(), display_locale(&locale));
                for entry in &gaps {
                    ui::missing(&entry.content_key);
                }
            }
        }

        Commands::Stats => {
            let store = SqliteStore::open(&database)?;
            let stats = store.stats()?;
            let entries = stats.entries.to_string();
            let untranslated = stats.untranslated.to_string();
            ui::header("Localization store");
            println!("{}", ui::dim(&database.display().to_string()));
            println!("{}", stats_table(&[("Entries", &entries), ("Untranslated", &untranslated)]));
        }
    }

    Ok(())
}

fn resolver_for(
    factory: &ResolverFactory<SqliteStore>,
    target: &ResourceArgs,
) -> lexstore::Result<std::sync::Arc<Resolver<SqliteStore>>> {
    let location = target
        .location
        .clone()
        .unwrap_or_else(|| target.resource.split('.').next().unwrap_or_default().to_string());
    factory.for_location(&target.resource, &location)
}

fn parse_locale(name: &str) -> lexstore::Result<Locale> {
    if name.trim().is_empty() {
        return Ok(Locale::invariant());
    }
    Locale::new(name)
}

fn display_locale(locale: &Locale) -> &str {
    if locale.is_invariant() { "invariant" } else { locale.name() }
}
