//! userpatch server
//!
//! Serves the user resource over HTTP on the `may` coroutine runtime.

use std::sync::Arc;

use anyhow::Context;
use clap::Parser;
use may_minihttp::HttpServer;

use userpatch::config::{Backend, ServiceConfig};
use userpatch::http::UserHttpService;
use userpatch::pool::PgPool;
use userpatch::schema::ensure_schema;
use userpatch::service::{build_validator, UserService};
use userpatch::store::{MemoryUserStore, PgUserStore, UserStore};

#[derive(Parser)]
#[command(name = "userpatch")]
#[command(about = "User service with tri-state PATCH semantics")]
#[command(version)]
struct Cli {
    /// Config file (default: config/config.toml)
    #[arg(long)]
    config: Option<String>,

    /// Listen address, overrides `server.bind`
    #[arg(long)]
    bind: Option<String>,

    /// Use the in-memory store instead of PostgreSQL
    #[arg(long)]
    memory: bool,

    /// Verbose output
    #[arg(short, long)]
    verbose: bool,

    /// Quiet output (errors only)
    #[arg(short, long)]
    quiet: bool,
}

fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();

    let level = if cli.quiet {
        "error"
    } else if cli.verbose {
        "debug"
    } else {
        "info"
    };
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or(level)).init();

    let mut config = ServiceConfig::load(cli.config.as_deref()).context("loading configuration")?;
    if let Some(bind) = cli.bind {
        config.server.bind = bind;
    }
    if cli.memory {
        config.database.backend = Backend::Memory;
    }

    may::config().set_workers(config.server.workers);

    let store: Arc<dyn UserStore> = match config.database.backend {
        Backend::Memory => {
            log::info!("Using in-memory store");
            Arc::new(MemoryUserStore::new())
        }
        Backend::Postgres => {
            let pool = PgPool::connect(&config.database.url, config.database.max_connections)
                .context("connecting to PostgreSQL")?;
            for (slot, health) in pool.check_health().into_iter().enumerate() {
                match health {
                    Ok(true) => {}
                    Ok(false) => log::warn!("Connection {} failed its health check", slot),
                    Err(e) => log::warn!("Connection {} health check error: {}", slot, e),
                }
            }
            ensure_schema(&pool).context("creating schema")?;
            Arc::new(PgUserStore::new(pool))
        }
    };

    let validator = build_validator().context("checking request validation rules")?;
    let service = UserService::new(store, Arc::new(validator));

    let server = HttpServer(UserHttpService::new(service))
        .start(config.server.bind.as_str())
        .with_context(|| format!("binding {}", config.server.bind))?;
    log::info!("userpatch listening on http://{}", config.server.bind);
    server
        .join()
        .map_err(|e| anyhow::anyhow!("Server encountered an error: {:?}", e))?;
    Ok(())
}
