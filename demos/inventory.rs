//! bucketrepo demo
//!
//! Small inventory tool over a store file. Values are arbitrary JSON.
//!
//! ```text
//! cargo run --example inventory -- --store inv.redb put Fruit apple '{"count":3}'
//! cargo run --example inventory -- --store inv.redb list Fruit
//! ```

use std::convert::Infallible;
use std::process;
use std::time::Duration;

use bucketrepo::{Config, Repository};
use clap::{Parser, Subcommand};
use serde_json::Value;
use tracing_subscriber::{fmt, EnvFilter};

/// bucketrepo inventory demo
#[derive(Parser, Debug)]
#[command(name = "inventory")]
#[command(about = "Store and inspect JSON values in named buckets")]
#[command(version)]
struct Args {
    /// Store file
    #[arg(short, long, default_value = "./inventory.redb")]
    store: String,

    /// Give up after this many milliseconds if the store is locked
    #[arg(short, long)]
    timeout_ms: Option<u64>,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand, Debug)]
enum Commands {
    /// Save a JSON value
    Put {
        bucket: String,
        key: String,
        /// JSON text
        value: String,
    },

    /// Print a value
    Get { bucket: String, key: String },

    /// Delete a value
    Del { bucket: String, key: String },

    /// Check whether a key exists
    Has { bucket: String, key: String },

    /// Print every entry of a bucket in key order
    List { bucket: String },

    /// Print bucket names
    Buckets,
}

fn main() {
    let filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new("warn,bucketrepo=debug"));

    fmt()
        .with_env_filter(filter)
        .with_target(true)
        .with_writer(std::io::stderr)
        .init();

    let args = Args::parse();

    let mut builder = Config::builder().path(&args.store);
    if let Some(ms) = args.timeout_ms {
        builder = builder.open_timeout(Duration::from_millis(ms));
    }
    let repo = Repository::from_config(builder.build());

    if let Err(e) = run(&repo, args.command) {
        tracing::error!("{}", e);
        process::exit(1);
    }
}

fn run(repo: &Repository, command: Commands) -> bucketrepo::Result<()> {
    match command {
        Commands::Put { bucket, key, value } => {
            let value: Value = Repository::deserialize(value.as_bytes())?;
            repo.save(&bucket, &key, &value)?;
        }
        Commands::Get { bucket, key } => match repo.read::<Value>(&bucket, &key)? {
            Some(value) => println!("{}", value),
            None => println!("(absent)"),
        },
        Commands::Del { bucket, key } => {
            let removed = repo.delete(&bucket, &key)?;
            println!("{}", if removed { "deleted" } else { "(absent)" });
        }
        Commands::Has { bucket, key } => {
            println!("{}", repo.has_item(&bucket, &key)?);
        }
        Commands::List { bucket } => {
            repo.for_each(&bucket, |key: &str, value: Value| {
                println!("{}\t{}", key, value);
                Ok::<(), Infallible>(())
            })?;
        }
        Commands::Buckets => {
            for name in repo.buckets()? {
                println!("{}", name);
            }
        }
    }
    Ok(())
}
