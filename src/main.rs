//! Focus Tasks MCP Server - Main Entry Point
//!
//! The actual implementation is in the `focus_tasks` library.

use anyhow::Result;
use clap::{CommandFactory, Parser};
use focus_tasks::TaskServerHandler;
use mcp_attr::server::serve_stdio;
use tracing_subscriber::EnvFilter;

/// Focus Tasks MCP Server - tasks, deadlines and a focus timer via Model Context Protocol
#[derive(Parser, Debug)]
#[command(author, version, about, long_about = None)]
struct Args {
    /// Path to the data file (TOML)
    file: String,

    /// Log level used when RUST_LOG is not set
    #[arg(long, default_value = "info")]
    log_level: String,
}

#[tokio::main]
async fn main() -> Result<()> {
    // Check if no arguments were provided (except the program name)
    if std::env::args().len() == 1 {
        // No arguments provided, show help and exit with error code
        let mut cmd = Args::command();
        cmd.print_help().ok();
        println!(); // Add a newline after help
        std::process::exit(2);
    }

    let args = Args::parse();

    // stdout carries the MCP transport, so logs go to stderr
    let filter = EnvFilter::try_from_default_env()
        .or_else(|_| EnvFilter::try_new(&args.log_level))?;
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .init();

    let handler = TaskServerHandler::new(&args.file)?;
    handler.resume_focus_ticker();
    serve_stdio(handler).await?;
    Ok(())
}
