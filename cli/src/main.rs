//! nftstake: inspect a staking ledger from the command line.

mod config;
mod report;

use anyhow::{bail, Context};
use clap::Parser;
use config::CliConfig;
use nftstake_store::PoolStore;
use nftstake_store_lmdb::LmdbEnvironment;
use nftstake_types::{Address, PoolId, Timestamp, TokenId};
use nftstake_utils::{init_logging, LogFormat};
use serde::Serialize;
use std::path::PathBuf;

#[derive(Parser)]
#[command(name = "nftstake", version, about = "Inspect pools, stakes and rewards in an nftstake ledger")]
struct Cli {
    /// Path to a TOML configuration file. File settings are the base;
    /// flags and env vars override them.
    #[arg(long, env = "NFTSTAKE_CONFIG")]
    config: Option<PathBuf>,

    /// Directory holding the LMDB environment.
    #[arg(long, env = "NFTSTAKE_DATA_DIR")]
    data_dir: Option<PathBuf>,

    /// Log level: "trace", "debug", "info", "warn", "error".
    #[arg(long, env = "NFTSTAKE_LOG_LEVEL")]
    log_level: Option<String>,

    /// Log format: "human" or "json".
    #[arg(long, env = "NFTSTAKE_LOG_FORMAT")]
    log_format: Option<LogFormat>,

    /// Print results as JSON instead of text.
    #[arg(long, global = true)]
    json: bool,

    #[command(subcommand)]
    command: Command,
}

#[derive(clap::Subcommand)]
enum Command {
    /// Print the effective configuration as TOML.
    Config,
    #[command(flatten)]
    Query(Query),
}

/// Read-only queries against the ledger.
#[derive(clap::Subcommand)]
enum Query {
    /// List every pool.
    Pools,
    /// Show one pool.
    Pool { id: u64 },
    /// Show stake records for tokens of a pool.
    Stakes {
        pool: u64,
        #[arg(required = true)]
        tokens: Vec<u64>,
    },
    /// List tokens an owner currently has staked in a pool.
    Staked { pool: u64, owner: String },
    /// Project what claiming tokens would pay.
    Rewards {
        pool: u64,
        #[arg(required = true)]
        tokens: Vec<u64>,
        /// Unix time to project at (default: now).
        #[arg(long)]
        at: Option<u64>,
    },
}

fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();

    let mut config = match &cli.config {
        Some(path) => CliConfig::from_toml_file(path)
            .with_context(|| format!("loading {}", path.display()))?,
        None => CliConfig::default(),
    };
    if let Some(data_dir) = cli.data_dir {
        config.data_dir = data_dir;
    }
    if let Some(level) = cli.log_level {
        config.log_level = level;
    }
    if let Some(format) = cli.log_format {
        config.log_format = format;
    }

    init_logging(config.log_format, &config.log_level);

    match cli.command {
        Command::Config => {
            print!("{}", config.to_toml_string()?);
            Ok(())
        }
        Command::Query(query) => run(query, &config, cli.json),
    }
}

fn run(query: Query, config: &CliConfig, json: bool) -> anyhow::Result<()> {
    if !config.data_dir.exists() {
        bail!("no ledger at {}", config.data_dir.display());
    }
    let env = LmdbEnvironment::open(&config.data_dir, config.max_dbs, config.map_size)
        .with_context(|| format!("opening ledger at {}", config.data_dir.display()))?;
    tracing::info!(data_dir = %config.data_dir.display(), pools = env.pool_count()?, "ledger opened");

    match query {
        Query::Pools => emit(json, &env.iter_pools()?, |p| report::render_pools(p)),
        Query::Pool { id } => emit(json, &report::pool(&env, PoolId::new(id))?, report::render_pool),
        Query::Stakes { pool, tokens } => emit(
            json,
            &report::stakes(&env, PoolId::new(pool), &token_ids(&tokens))?,
            |s| report::render_stakes(s),
        ),
        Query::Staked { pool, owner } => {
            let owner = Address::parse(&owner)?;
            emit(
                json,
                &report::staked(&env, PoolId::new(pool), &owner)?,
                |t| report::render_tokens(t),
            )
        }
        Query::Rewards { pool, tokens, at } => {
            let at = at.map(Timestamp::new).unwrap_or_else(Timestamp::now);
            emit(
                json,
                &report::rewards(&env, PoolId::new(pool), &token_ids(&tokens), at)?,
                report::render_projection,
            )
        }
    }
}

fn token_ids(raw: &[u64]) -> Vec<TokenId> {
    raw.iter().copied().map(TokenId::new).collect()
}

fn emit<T: Serialize + ?Sized>(json: bool, value: &T, human: impl FnOnce(&T) -> String) -> anyhow::Result<()> {
    if json {
        println!("{}", serde_json::to_string_pretty(value)?);
    } else {
        print!("{}", human(value));
    }
    Ok(())
}
