use anyhow::{anyhow, Context, Result};
use axum::Router;
use clap::{Parser, Subcommand};
use mimalloc::MiMalloc;
use runtime::{AppConfig, CliArgs, DatabaseConfig};
use sea_orm::{ConnectOptions, ConnectionTrait, Database, DatabaseConnection};
use std::path::{Path, PathBuf};
use std::time::Duration;
use tokio_util::sync::CancellationToken;
use url::Url;

use api_ingress::{ApiIngress, ApiIngressConfig, ServiceInfo};
use quotes_info::{config::QuotesInfoConfig, QuotesInfo};

#[global_allocator]
static GLOBAL: MiMalloc = MiMalloc;

const SERVICE_TITLE: &str = "Quotes API";
const INGRESS_MODULE: &str = "api_ingress";

/// Expand a sqlite DSN into an absolute-path DSN using a base directory.
/// - Keeps "sqlite::memory:" as-is.
/// - Adds `mode=rwc` so the database file is created on first start.
/// - Normalizes backslashes into forward slashes (important on Windows).
fn absolutize_sqlite_dsn(dsn: &str, base_dir: &Path, create_dirs: bool) -> Result<String> {
    if is_memory_dsn(dsn) {
        return Ok("sqlite::memory:".to_string());
    }
    let db_path = dsn
        .strip_prefix("sqlite://")
        .ok_or_else(|| anyhow!("DSN must start with sqlite:// (got: {})", dsn))?;

    let (path_str, query) = match db_path.split_once('?') {
        Some((p, q)) => (p, Some(q)),
        None => (db_path, None),
    };

    let mut p = PathBuf::from(path_str);
    if p.as_os_str().is_empty() {
        return Err(anyhow!("Empty SQLite path in DSN"));
    }
    if p.is_relative() {
        p = base_dir.join(p);
    }

    if let Some(dir) = p.parent() {
        if create_dirs {
            std::fs::create_dir_all(dir)
                .with_context(|| format!("Failed to create {}", dir.display()))?;
        }
    }

    // Rebuild DSN with absolute path and normalized slashes
    let mut out = String::from("sqlite://");
    out.push_str(&p.to_string_lossy().replace('\\', "/"));
    match query {
        Some(q) if q.split('&').any(|kv| kv.starts_with("mode=")) => {
            out.push('?');
            out.push_str(q);
        }
        Some(q) => {
            out.push('?');
            out.push_str(q);
            out.push_str("&mode=rwc");
        }
        None => out.push_str("?mode=rwc"),
    }
    Ok(out)
}

fn is_memory_dsn(dsn: &str) -> bool {
    dsn.eq_ignore_ascii_case("sqlite::memory:") || dsn.eq_ignore_ascii_case("sqlite://:memory:")
}

/// Quotes Server - CRUD API for quotes and their authors
#[derive(Parser)]
#[command(name = "quotes-server")]
#[command(about = "Quotes Server - CRUD API for quotes and their authors")]
#[command(version)]
struct Cli {
    /// Path to configuration file
    #[arg(short, long)]
    config: Option<PathBuf>,

    /// Port for HTTP server (overrides config)
    #[arg(short, long)]
    port: Option<u16>,

    /// Print current configuration and exit
    #[arg(long)]
    print_config: bool,

    /// Log verbosity level (-v debug, -vv trace)
    #[arg(short, long, action = clap::ArgAction::Count)]
    verbose: u8,

    /// Use an in-memory SQLite database
    #[arg(long)]
    mock: bool,

    #[command(subcommand)]
    command: Option<Commands>,
}

#[derive(Subcommand)]
enum Commands {
    /// Start the server
    Run,
    /// Check configuration
    Check,
}

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();

    // CLI args passed down to config/app
    let args = CliArgs {
        config: cli.config.as_ref().map(|p| p.to_string_lossy().to_string()),
        port: cli.port,
        print_config: cli.print_config,
        verbose: cli.verbose,
        mock: cli.mock,
    };

    // Load configuration (normalized home_dir is applied inside)
    let mut config = AppConfig::load_or_default(cli.config.as_deref())?;

    // Apply CLI overrides (port / verbosity / mock database)
    config.apply_cli_overrides(&args);

    // Print config and exit if requested
    if cli.print_config {
        println!("{}", config.to_yaml()?);
        return Ok(());
    }

    // Initialize logging
    let logging_config = config.logging.as_ref().cloned().unwrap_or_default();
    runtime::logging::init_logging_from_config(&logging_config, Path::new(&config.server.home_dir));
    tracing::info!("Quotes Server starting");

    // Execute command
    match cli.command.unwrap_or(Commands::Run) {
        Commands::Run => run_server(config, args).await,
        Commands::Check => check_config(config, &args),
    }
}

/// Detect DB backend from URL scheme (sqlite/postgres).
fn detect_from_dsn(cfg: &DatabaseConfig) -> Result<&'static str> {
    let raw = cfg.url.trim();
    if raw.is_empty() {
        return Err(anyhow!("Database URL not configured"));
    }
    if is_memory_dsn(raw) {
        return Ok("sqlite");
    }

    let url = Url::parse(raw).map_err(|e| anyhow!("Invalid database DSN '{}': {}", raw, e))?;

    match url.scheme() {
        "sqlite" | "sqlite3" => Ok("sqlite"),
        "postgres" | "postgresql" => Ok("postgres"),
        other => Err(anyhow!("Unsupported database type: {}", other)),
    }
}

/// Ingress settings with the listen address and timeout filled in from
/// `server` where the module section leaves them open.
fn ingress_config(config: &AppConfig, args: &CliArgs) -> Result<ApiIngressConfig> {
    let mut cfg: ApiIngressConfig = config.module_config(INGRESS_MODULE)?;
    if args.port.is_some() || cfg.bind_addr.is_none() {
        cfg.bind_addr = Some(format!("{}:{}", config.server.host, config.server.port));
    }
    if config.server.timeout_sec > 0 {
        cfg.request_timeout_secs = config.server.timeout_sec;
    }
    Ok(cfg)
}

async fn connect_database(db_config: &DatabaseConfig, base_dir: &Path) -> Result<DatabaseConnection> {
    let backend = detect_from_dsn(db_config)?;

    // Absolutize sqlite DSNs to avoid cwd issues
    let mut dsn = db_config.url.trim().to_owned();
    if backend == "sqlite" {
        dsn = absolutize_sqlite_dsn(&dsn, base_dir, true)?;
    }

    let mut opts = ConnectOptions::new(dsn.clone());
    opts.acquire_timeout(Duration::from_secs(5))
        .sqlx_logging(false);

    if is_memory_dsn(&dsn) {
        // Each pooled connection would get its own empty in-memory database
        opts.max_connections(1).min_connections(1);
    } else if let Some(max_conns) = db_config.max_conns {
        opts.max_connections(max_conns);
    }

    if backend == "sqlite" {
        let busy = Duration::from_millis(u64::from(db_config.busy_timeout_ms.unwrap_or(5000)));
        opts.map_sqlx_sqlite_opts(move |o| o.busy_timeout(busy));
    }

    tracing::info!("Connecting to {} database: {}", backend, dsn);
    let db = Database::connect(opts)
        .await
        .with_context(|| format!("Failed to connect to database '{dsn}'"))?;
    tracing::info!("Connected DB backend: {:?}", db.get_database_backend());
    Ok(db)
}

async fn run_server(config: AppConfig, args: CliArgs) -> Result<()> {
    tracing::info!("Initializing modules...");

    let db_config = config
        .database
        .clone()
        .ok_or_else(|| anyhow!("No database configuration found"))?;

    // Validate everything that does not need I/O before touching the database
    let quotes_cfg: QuotesInfoConfig = config.module_config(QuotesInfo::NAME)?;
    let ingress = ApiIngress::new(
        ingress_config(&config, &args)?,
        ServiceInfo::new(SERVICE_TITLE, env!("CARGO_PKG_VERSION")),
    );
    let addr = ingress.bind_addr()?;

    // Base dir for resolving relative sqlite paths (already absolute & created)
    let base_dir = PathBuf::from(&config.server.home_dir);
    let db = connect_database(&db_config, &base_dir).await?;

    let quotes = QuotesInfo::init(db, &quotes_cfg)?;
    quotes.migrate().await?;

    let openapi = ingress.build_openapi(vec![quotes.openapi()]);
    let router = ingress.build_router(quotes.register_rest(Router::new()), openapi);

    let cancel = CancellationToken::new();
    tokio::spawn(wait_for_shutdown(cancel.clone()));

    tracing::info!("Serving {} on http://{}", SERVICE_TITLE, addr);
    ingress.serve(router, cancel).await?;
    tracing::info!("Quotes Server stopped");
    Ok(())
}

/// Cancel `token` on Ctrl+C or SIGTERM.
async fn wait_for_shutdown(token: CancellationToken) {
    #[cfg(unix)]
    {
        use tokio::signal::unix::{signal, SignalKind};
        match signal(SignalKind::terminate()) {
            Ok(mut term) => {
                tokio::select! {
                    _ = tokio::signal::ctrl_c() => {}
                    _ = term.recv() => {}
                }
            }
            Err(e) => {
                tracing::warn!("Failed to install SIGTERM handler: {}", e);
                let _ = tokio::signal::ctrl_c().await;
            }
        }
    }
    #[cfg(not(unix))]
    {
        let _ = tokio::signal::ctrl_c().await;
    }

    tracing::info!("Shutdown signal received");
    token.cancel();
}

fn check_config(config: AppConfig, args: &CliArgs) -> Result<()> {
    tracing::info!("Checking configuration...");

    // AppConfig::load_* already normalized & created home_dir
    let quotes_cfg: QuotesInfoConfig = config.module_config(QuotesInfo::NAME)?;
    quotes_cfg.validate()?;

    let ingress = ingress_config(&config, args)?;
    let addr = ApiIngress::new(ingress, ServiceInfo::new(SERVICE_TITLE, env!("CARGO_PKG_VERSION")))
        .bind_addr()?;

    let backend = match config.database.as_ref() {
        Some(db) => detect_from_dsn(db)?,
        None => return Err(anyhow!("No database configuration found")),
    };

    tracing::info!("Configuration is valid");
    println!("Configuration check passed");
    println!("Listen address: {addr}");
    println!("Database backend: {backend}");
    println!("{}", config.to_yaml()?);

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::tempdir;

    fn db(url: &str) -> DatabaseConfig {
        DatabaseConfig {
            url: url.to_string(),
            max_conns: None,
            busy_timeout_ms: None,
        }
    }

    #[test]
    fn memory_dsn_is_kept() {
        let base = Path::new("/srv/quotes");
        assert_eq!(
            absolutize_sqlite_dsn("sqlite::memory:", base, false).unwrap(),
            "sqlite::memory:"
        );
        assert_eq!(
            absolutize_sqlite_dsn("sqlite://:memory:", base, false).unwrap(),
            "sqlite::memory:"
        );
    }

    #[test]
    fn relative_sqlite_path_resolves_under_home() {
        let tmp = tempdir().unwrap();
        let dsn = absolutize_sqlite_dsn("sqlite://database/quotes.db", tmp.path(), true).unwrap();

        let expected = tmp
            .path()
            .join("database/quotes.db")
            .to_string_lossy()
            .replace('\\', "/");
        assert_eq!(dsn, format!("sqlite://{expected}?mode=rwc"));
        assert!(tmp.path().join("database").is_dir());
    }

    #[test]
    fn explicit_mode_is_preserved() {
        let tmp = tempdir().unwrap();
        let dsn =
            absolutize_sqlite_dsn("sqlite://q.db?mode=ro&cache=shared", tmp.path(), false).unwrap();
        assert!(dsn.ends_with("?mode=ro&cache=shared"));

        let dsn = absolutize_sqlite_dsn("sqlite://q.db?cache=shared", tmp.path(), false).unwrap();
        assert!(dsn.ends_with("?cache=shared&mode=rwc"));
    }

    #[test]
    fn rejects_non_sqlite_or_empty_paths() {
        let base = Path::new("/tmp");
        assert!(absolutize_sqlite_dsn("postgres://localhost/db", base, false).is_err());
        assert!(absolutize_sqlite_dsn("sqlite://", base, false).is_err());
    }

    #[test]
    fn backend_detection() {
        assert_eq!(detect_from_dsn(&db("sqlite://quotes.db")).unwrap(), "sqlite");
        assert_eq!(detect_from_dsn(&db("sqlite::memory:")).unwrap(), "sqlite");
        assert_eq!(
            detect_from_dsn(&db("postgres://u:p@localhost/quotes")).unwrap(),
            "postgres"
        );
        assert!(detect_from_dsn(&db("mysql://localhost/quotes")).is_err());
        assert!(detect_from_dsn(&db("  ")).is_err());
    }

    #[test]
    fn ingress_address_follows_server_section() {
        let mut config = AppConfig::default();
        config.server.port = 9001;
        config.server.timeout_sec = 7;

        let cfg = ingress_config(&config, &CliArgs::default()).unwrap();
        assert_eq!(cfg.bind_addr.as_deref(), Some("127.0.0.1:9001"));
        assert_eq!(cfg.request_timeout_secs, 7);

        config.modules.insert(
            INGRESS_MODULE.into(),
            serde_json::json!({ "bind_addr": "0.0.0.0:8080" }),
        );
        let cfg = ingress_config(&config, &CliArgs::default()).unwrap();
        assert_eq!(cfg.bind_addr.as_deref(), Some("0.0.0.0:8080"));

        // an explicit --port wins over the module section
        let args = CliArgs {
            port: Some(9001),
            ..Default::default()
        };
        let cfg = ingress_config(&config, &args).unwrap();
        assert_eq!(cfg.bind_addr.as_deref(), Some("127.0.0.1:9001"));
    }
}
