//! Engram MCP Server
//!
//! Exposes the engram-core cognitive memory engine over a stdio JSON-RPC
//! loop implementing the Model Context Protocol: twelve named operations
//! (store, query, get, delete, list, delete_all, store_fact, query_facts,
//! get_timeline, reinforce, apply_decay, stats) fanned out across a
//! project-scoped and a user-scoped memory core.

use std::io;
use std::path::PathBuf;
use std::sync::Arc;

use tokio::sync::Mutex;
use tracing::{error, info, Level};
use tracing_subscriber::EnvFilter;

use engram_core::embedding::LocalHashEmbedding;
use engram_core::scope::resolve_scope_paths;
use engram_core::ScopeRouter;

use engram_mcp::protocol::stdio::StdioTransport;
use engram_mcp::server::McpServer;

/// Parse command-line arguments, returning an optional `--data-dir`
/// override. Exits the process for `--help`/`--version`.
fn parse_args() -> Option<PathBuf> {
    let args: Vec<String> = std::env::args().collect();
    let mut data_dir: Option<PathBuf> = None;
    let mut i = 1;

    while i < args.len() {
        match args[i].as_str() {
            "--help" | "-h" => {
                println!("engram-mcp {}", env!("CARGO_PKG_VERSION"));
                println!();
                println!("Cognitive memory server for AI assistants, exposed over MCP/stdio.");
                println!();
                println!("USAGE:");
                println!("    engram-mcp [OPTIONS]");
                println!();
                println!("OPTIONS:");
                println!("    -h, --help           Print help information");
                println!("    -V, --version        Print version information");
                println!("    --data-dir <PATH>    Root directory holding project/ and user/ scope data");
                println!();
                println!("ENVIRONMENT:");
                println!("    RUST_LOG                   Log level filter (e.g. debug, info, warn)");
                println!("    ENGRAM_PROJECT_DATA_DIR    Override the project scope's data directory");
                println!("    ENGRAM_USER_DATA_DIR       Override the user scope's data directory");
                println!("    ENGRAM_PROJECT_ROOT        Override project root detection");
                std::process::exit(0);
            }
            "--version" | "-V" => {
                println!("engram-mcp {}", env!("CARGO_PKG_VERSION"));
                std::process::exit(0);
            }
            "--data-dir" => {
                i += 1;
                if i >= args.len() {
                    eprintln!("error: --data-dir requires a path argument");
                    std::process::exit(1);
                }
                data_dir = Some(PathBuf::from(&args[i]));
            }
            arg if arg.starts_with("--data-dir=") => {
                let path = arg.strip_prefix("--data-dir=").unwrap_or("");
                if path.is_empty() {
                    eprintln!("error: --data-dir requires a path argument");
                    std::process::exit(1);
                }
                data_dir = Some(PathBuf::from(path));
            }
            arg => {
                eprintln!("error: unknown argument '{arg}'");
                eprintln!("Try 'engram-mcp --help' for more information.");
                std::process::exit(1);
            }
        }
        i += 1;
    }

    data_dir
}

#[tokio::main]
async fn main() {
    let data_dir = parse_args();

    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::from_default_env().add_directive(Level::INFO.into()))
        .with_writer(io::stderr)
        .with_target(false)
        .with_ansi(false)
        .init();

    info!("engram-mcp v{} starting", env!("CARGO_PKG_VERSION"));

    let paths = resolve_scope_paths(data_dir.as_deref());
    info!(project_dir = %paths.project_dir.display(), user_dir = %paths.user_dir.display(), "resolved scope data directories");

    let router = match ScopeRouter::open(&paths.project_dir, &paths.user_dir, || Box::new(LocalHashEmbedding::new())) {
        Ok(router) => Arc::new(Mutex::new(router)),
        Err(e) => {
            error!("failed to open scope router: {e}");
            std::process::exit(1);
        }
    };

    let server = McpServer::new(router);
    let transport = StdioTransport::new();

    info!("listening on stdio");
    if let Err(e) = transport.run(server).await {
        error!("server error: {e}");
        std::process::exit(1);
    }

    info!("engram-mcp shutting down");
}
