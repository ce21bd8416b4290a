use anyhow::Context;
use clap::{Parser, Subcommand};
use std::io::Read;
use std::path::{Path, PathBuf};

use speedplan_agent::providers::DEFAULT_MODEL;
use speedplan_agent::GeminiPlanSource;
use speedplan_core::comparison::DEFAULT_BEFORE_SCORE;
use speedplan_core::{
    classify, parse_report, read_report, LighthouseResult, MetricKind, PlanRequest, PlanSource,
    ScoreComparison, SpeedPlanError,
};
use speedplan_gateway::{init_tracing, Gateway, GatewayConfig};

mod render;

/// SpeedPlan CLI - WordPress/Elementor speed optimization plans
#[derive(Parser)]
#[command(author, version, about, long_about = None)]
struct Cli {
    #[command(subcommand)]
    command: Commands,

    /// Enable verbose debug logging
    #[arg(short, long, global = true)]
    verbose: bool,
}

#[derive(Subcommand)]
enum Commands {
    /// Generate an optimization plan for a site
    Plan {
        /// Site URL, e.g. https://example.com
        #[arg(long)]
        url: String,

        /// Hosting provider
        #[arg(long, default_value = "")]
        hosting: String,

        /// Additional context about the site
        #[arg(long, default_value = "")]
        notes: String,

        /// Model to use
        #[arg(long, default_value = DEFAULT_MODEL)]
        model: String,

        /// Output the plan as JSON
        #[arg(long)]
        json: bool,
    },

    /// Summarize a Lighthouse / PageSpeed Insights JSON report
    Report {
        /// Report file, or `-` for stdin
        file: PathBuf,

        /// Score to compare against
        #[arg(long, default_value_t = DEFAULT_BEFORE_SCORE)]
        before: u8,

        /// Output the parsed result as JSON
        #[arg(long)]
        json: bool,
    },

    /// Classify a single metric display value
    Classify {
        /// Display value, e.g. "2.4 s"
        value: String,

        /// Metric kind: fcp, lcp, tbt, cls or si
        #[arg(long)]
        kind: MetricKind,
    },

    /// Start the browser interface
    Serve {
        /// Host to bind to
        #[arg(long)]
        host: Option<String>,

        /// Port to listen on
        #[arg(short, long)]
        port: Option<u16>,

        /// JSON configuration file
        #[arg(short, long, value_name = "FILE")]
        config: Option<PathBuf>,
    },
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();

    dotenvy::dotenv().ok();
    init_tracing(cli.verbose);

    match cli.command {
        Commands::Plan {
            url,
            hosting,
            notes,
            model,
            json,
        } => {
            let request = PlanRequest::new(url, hosting, notes)?;
            let source = GeminiPlanSource::from_env(model)?;

            let plan = match source.request_plan(&request).await {
                Ok(plan) => plan,
                Err(e) => {
                    tracing::error!("Plan generation failed: {}", e);
                    anyhow::bail!("{}", e.user_message());
                }
            };

            if json {
                println!("{}", serde_json::to_string_pretty(&plan)?);
            } else {
                print!("{}", render::render_plan(&plan));
            }
        }
        Commands::Report { file, before, json } => {
            let result = load_report(&file)?;

            if json {
                println!("{}", serde_json::to_string_pretty(&result)?);
            } else {
                print!(
                    "{}",
                    render::render_comparison(&ScoreComparison::against(before, &result))
                );
            }
        }
        Commands::Classify { value, kind } => {
            println!("{}", classify(&value, kind));
        }
        Commands::Serve { host, port, config } => {
            let mut config = match config {
                Some(path) => GatewayConfig::from_file(&path)?,
                None => GatewayConfig::default(),
            };
            if let Some(host) = host {
                config = config.with_host(host);
            }
            if let Some(port) = port {
                config = config.with_port(port);
            }

            println!("SpeedPlan interface on http://{}:{}", config.host, config.port);
            Gateway::from_config(config)?.start().await?;
        }
    }

    Ok(())
}

fn load_report(path: &Path) -> anyhow::Result<LighthouseResult> {
    let loaded = if path.as_os_str() == "-" {
        let mut raw = String::new();
        std::io::stdin()
            .read_to_string(&mut raw)
            .context("Failed to read report from stdin")?;
        parse_report(&raw).map_err(SpeedPlanError::from)
    } else {
        read_report(path)
    };

    loaded.map_err(|e| match e {
        SpeedPlanError::Report(report) => {
            tracing::debug!("Report rejected: {}", report);
            anyhow::anyhow!("{}", report.user_message())
        }
        other => anyhow::Error::new(other),
    })
}
