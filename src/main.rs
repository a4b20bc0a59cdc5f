//! Binary entrypoint for the Lamoland CLI.
//!
//! Commands:
//! - `serve [--port <port>]` - run the HTTP server
//! - `init` - create a starter `config.toml` and seed the item catalog
//! - `status` - print store statistics and a brief summary
//! - `user-passwd <username>` - interactively reset a password (argon2 hashed)
//!
//! See the library crate docs for module-level details: `lamoland::`.
use anyhow::Result;
use clap::{Parser, Subcommand};
use log::info;

use lamoland::config::Config;
use lamoland::game::ledger;
use lamoland::game::storage::GameStoreBuilder;
use lamoland::web;

#[derive(Parser)]
#[command(name = "lamoland")]
#[command(about = "A virtual-pet community server with an in-game economy")]
#[command(version)]
struct Cli {
    #[command(subcommand)]
    command: Commands,

    /// Configuration file path (can be used before or after subcommand)
    #[arg(short, long, default_value = "config.toml", global = true)]
    config: String,

    /// Verbose logging (-v, -vv for more; may appear before or after subcommand)
    #[arg(short, long, action = clap::ArgAction::Count, global = true)]
    verbose: u8,
}

#[derive(Subcommand)]
enum Commands {
    /// Start the HTTP server
    Serve {
        /// Listen port (overrides the config file)
        #[arg(short, long)]
        port: Option<u16>,
    },
    /// Initialize a new configuration and seed the item catalog
    Init,
    /// Show store statistics
    Status,
    /// Set or update a user's password
    UserPasswd {
        /// Account to update
        username: String,
    },
}

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();

    // Load config early to configure logging (except for Init which writes the default later)
    let pre_config = match cli.command {
        Commands::Init => None,
        _ => Config::load(&cli.config).await.ok(),
    };
    init_logging(&pre_config, cli.verbose);

    match cli.command {
        Commands::Serve { port } => {
            let mut config = pre_config.unwrap_or(Config::load(&cli.config).await?);
            if let Some(port) = port {
                config.server.port = port;
            }
            info!("Starting Lamoland v{}", env!("CARGO_PKG_VERSION"));
            web::run(config).await?;
        }
        Commands::Init => {
            info!("Initializing new Lamoland configuration");
            let config = Config::default();
            let serialized = toml::to_string_pretty(&config)?;
            tokio::fs::write(&cli.config, serialized).await?;
            info!("Configuration file created at {}", cli.config);

            // Opening the store seeds the default catalog idempotently.
            let data_dir = std::path::PathBuf::from(&config.storage.data_dir);
            tokio::fs::create_dir_all(&data_dir).await?;
            let store = GameStoreBuilder::new(data_dir.join("lamoland")).open()?;
            info!(
                "Store ready at {} ({} items, {} species)",
                data_dir.join("lamoland").display(),
                store.list_items()?.len(),
                store.list_species()?.len()
            );
        }
        Commands::Status => {
            let config = pre_config.unwrap_or(Config::load(&cli.config).await?);
            let data_dir = std::path::PathBuf::from(&config.storage.data_dir);
            let store = GameStoreBuilder::new(data_dir.join("lamoland")).open()?;
            println!("Lamoland v{}", env!("CARGO_PKG_VERSION"));
            println!("Data dir:  {}", config.storage.data_dir);
            println!("Users:     {}", store.count_users()?);
            println!("Topics:    {}", store.count_topics()?);
            println!("Comments:  {}", store.count_comments()?);
            println!(
                "Catalog:   {} items, {} species",
                store.list_items()?.len(),
                store.list_species()?.len()
            );
        }
        Commands::UserPasswd { username } => {
            let config = pre_config.unwrap_or(Config::load(&cli.config).await?);
            let data_dir = std::path::PathBuf::from(&config.storage.data_dir);
            let store = GameStoreBuilder::new(data_dir.join("lamoland")).open()?;

            if !store.user_exists(&username)? {
                println!("Error: no such user '{}'.", username);
                return Ok(());
            }
            println!("Setting password for '{}'.", username);
            let pass1 = rpassword::prompt_password("New password: ")?;
            let pass2 = rpassword::prompt_password("Confirm password: ")?;
            if pass1 != pass2 {
                println!("Error: passwords do not match.");
                return Ok(());
            }
            match ledger::set_user_password(&store, &username, &pass1) {
                Ok(()) => println!("Password updated successfully."),
                Err(e) => println!("Error: {}", e),
            }
        }
    }

    Ok(())
}

fn init_logging(config: &Option<Config>, verbosity: u8) {
    use std::io::Write;
    let mut builder = env_logger::Builder::new();
    // CLI verbosity overrides the configured level
    let base_level = match verbosity {
        0 => config
            .as_ref()
            .and_then(|c| c.logging.level.parse().ok())
            .unwrap_or(log::LevelFilter::Info),
        1 => log::LevelFilter::Debug,
        _ => log::LevelFilter::Trace,
    };
    builder.filter_level(base_level);

    let log_file = config.as_ref().and_then(|c| c.logging.file.clone());
    if let Some(file) = log_file {
        if let Ok(f) = std::fs::OpenOptions::new()
            .create(true)
            .append(true)
            .open(&file)
        {
            let write_mutex = std::sync::Arc::new(std::sync::Mutex::new(f));
            let is_tty = atty::is(atty::Stream::Stdout);

            builder.format(move |fmt, record| {
                let ts = chrono::Utc::now().format("%Y-%m-%dT%H:%M:%SZ");
                let line = format!("{} [{}] {}", ts, record.level(), record.args());

                if let Ok(mut guard) = write_mutex.lock() {
                    let _ = writeln!(guard, "{}", line);
                }

                // Mirror to the console when running in a terminal
                if is_tty {
                    writeln!(fmt, "{}", line)
                } else {
                    Ok(())
                }
            });
        } else {
            builder.format(|fmt, record| {
                writeln!(
                    fmt,
                    "{} [{}] {}",
                    chrono::Utc::now().format("%Y-%m-%dT%H:%M:%SZ"),
                    record.level(),
                    record.args()
                )
            });
        }
    } else {
        builder.format(|fmt, record| {
            writeln!(
                fmt,
                "{} [{}] {}",
                chrono::Utc::now().format("%Y-%m-%dT%H:%M:%SZ"),
                record.level(),
                record.args()
            )
        });
    }
    let _ = builder.try_init();
}
