//! SpeedPlan Gateway Binary
//!
//! Standalone HTTP server for the browser interface.
//!
//! # Usage
//! ```bash
//! speedplan-gateway [--port 8080] [--host 127.0.0.1] [--config speedplan.json] [--verbose]
//! ```

use clap::Parser;
use speedplan_gateway::{init_tracing, Gateway, GatewayConfig};
use std::path::PathBuf;

/// SpeedPlan Gateway - WordPress/Elementor speed plans in the browser
#[derive(Parser)]
#[command(author, version, about, long_about = None)]
struct Args {
    /// Port to listen on (overrides the config file)
    #[arg(short, long)]
    port: Option<u16>,

    /// Host to bind to (overrides the config file)
    #[arg(long)]
    host: Option<String>,

    /// JSON configuration file
    #[arg(short, long, value_name = "FILE")]
    config: Option<PathBuf>,

    /// Enable verbose debug logging
    #[arg(short, long)]
    verbose: bool,
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let args = Args::parse();

    dotenvy::dotenv().ok();
    init_tracing(args.verbose);

    let mut config = match &args.config {
        Some(path) => GatewayConfig::from_file(path)?,
        None => GatewayConfig::default(),
    };
    if let Some(host) = args.host {
        config = config.with_host(host);
    }
    if let Some(port) = args.port {
        config = config.with_port(port);
    }

    println!();
    println!("SpeedPlan Gateway v{}", speedplan_gateway::VERSION);
    println!("   └─ http://{}:{}", config.host, config.port);
    println!();

    let gateway = Gateway::from_config(config)?;
    gateway.start().await?;

    Ok(())
}
