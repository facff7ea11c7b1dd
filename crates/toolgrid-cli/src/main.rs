//! toolgrid - AI Model Capability Matrix CLI
//!
//! The `toolgrid` command probes AI-model hosting platforms for tool-calling
//! and structured-output support and renders the results as a static
//! comparison matrix.
//!
//! ## Commands
//!
//! - `probe router|hub|direct`: run one platform checker and record its
//!   result document
//! - `probe all`: run every checker whose endpoint is configured
//! - `render`: build the HTML matrix from recorded documents

use std::path::{Path, PathBuf};

use anyhow::{Context, Result};
use clap::{Args, Parser, Subcommand};
use tracing::{info, warn, Level};

use toolgrid_core::{
    init_tracing, load_identity_table, write_document, ModelRecord, ReasonLimits, ResultDocument,
    RunSummary, RUNS_PER_PROBE,
};
use toolgrid_probe::{DirectChecker, HubChecker, PlatformChecker, RouterChecker};
use toolgrid_site::{generate_site, load_inputs, DIRECT_FILE, HUB_FILE, ROUTER_FILE};

#[derive(Parser)]
#[command(name = "toolgrid")]
#[command(version = env!("CARGO_PKG_VERSION"))]
#[command(
    about = "Probe AI hosting platforms for tool-calling and structured-output support",
    long_about = None
)]
struct Cli {
    /// Enable verbose output
    #[arg(short, long, global = true)]
    verbose: bool,

    /// Emit JSON-formatted log lines
    #[arg(long, global = true)]
    json: bool,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Probe a source platform and record its result document
    Probe {
        #[command(subcommand)]
        target: ProbeTarget,
    },

    /// Render the comparison matrix from recorded documents
    Render {
        /// Directory holding the per-source result documents
        #[arg(long, default_value = "data")]
        data_dir: PathBuf,

        /// Identity table path
        #[arg(long, default_value = "config/models.json")]
        models: PathBuf,

        /// Output HTML file
        #[arg(short, long, default_value = "site/index.html")]
        output: PathBuf,
    },
}

#[derive(Args)]
struct ProbeCommon {
    /// Identity table path
    #[arg(long, default_value = "config/models.json")]
    models: PathBuf,

    /// Directory to write the result document into
    #[arg(long, default_value = "data")]
    data_dir: PathBuf,

    /// Override the per-source concurrent-request limit
    #[arg(long)]
    concurrency: Option<usize>,
}

#[derive(Subcommand)]
enum ProbeTarget {
    /// Multi-provider router source
    Router {
        #[command(flatten)]
        common: ProbeCommon,

        /// Router API base URL, including the version segment
        #[arg(long, env = "TOOLGRID_ROUTER_URL")]
        base_url: String,

        /// Router API key
        #[arg(long, env = "TOOLGRID_ROUTER_KEY", hide_env_values = true)]
        api_key: String,
    },

    /// Model-hub source
    Hub {
        #[command(flatten)]
        common: ProbeCommon,

        /// Hub metadata API base URL
        #[arg(long, env = "TOOLGRID_HUB_API_URL")]
        api_url: String,

        /// Hub inference gateway base URL, including the version segment
        #[arg(long, env = "TOOLGRID_HUB_GATEWAY_URL")]
        gateway_url: String,

        /// Hub API key
        #[arg(long, env = "TOOLGRID_HUB_KEY", hide_env_values = true)]
        api_key: String,
    },

    /// Direct compute-platform source
    Direct {
        #[command(flatten)]
        common: ProbeCommon,

        /// Platform API base URL, including the version segment
        #[arg(long, env = "TOOLGRID_DIRECT_URL")]
        base_url: String,

        /// Platform API key
        #[arg(long, env = "TOOLGRID_DIRECT_KEY", hide_env_values = true)]
        api_key: String,
    },

    /// Every source whose endpoint and key are configured via environment
    All {
        #[command(flatten)]
        common: ProbeCommon,

        #[arg(long, env = "TOOLGRID_ROUTER_URL")]
        router_url: Option<String>,

        #[arg(long, env = "TOOLGRID_ROUTER_KEY", hide_env_values = true)]
        router_key: Option<String>,

        #[arg(long, env = "TOOLGRID_HUB_API_URL")]
        hub_api_url: Option<String>,

        #[arg(long, env = "TOOLGRID_HUB_GATEWAY_URL")]
        hub_gateway_url: Option<String>,

        #[arg(long, env = "TOOLGRID_HUB_KEY", hide_env_values = true)]
        hub_key: Option<String>,

        #[arg(long, env = "TOOLGRID_DIRECT_URL")]
        direct_url: Option<String>,

        #[arg(long, env = "TOOLGRID_DIRECT_KEY", hide_env_values = true)]
        direct_key: Option<String>,
    },
}

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();

    let level = if cli.verbose {
        Level::DEBUG
    } else {
        Level::INFO
    };
    init_tracing(cli.json, level);

    match cli.command {
        Commands::Probe { target } => match target {
            ProbeTarget::Router {
                common,
                base_url,
                api_key,
            } => {
                let mut checker = RouterChecker::new(base_url, api_key);
                if let Some(limit) = common.concurrency {
                    checker = checker.with_concurrency(limit);
                }
                cmd_probe(&checker, &common, ROUTER_FILE).await
            }
            ProbeTarget::Hub {
                common,
                api_url,
                gateway_url,
                api_key,
            } => {
                let mut checker = HubChecker::new(api_url, gateway_url, api_key);
                if let Some(limit) = common.concurrency {
                    checker = checker.with_concurrency(limit);
                }
                cmd_probe(&checker, &common, HUB_FILE).await
            }
            ProbeTarget::Direct {
                common,
                base_url,
                api_key,
            } => {
                let mut checker = DirectChecker::new(base_url, api_key);
                if let Some(limit) = common.concurrency {
                    checker = checker.with_concurrency(limit);
                }
                cmd_probe(&checker, &common, DIRECT_FILE).await
            }
            ProbeTarget::All {
                common,
                router_url,
                router_key,
                hub_api_url,
                hub_gateway_url,
                hub_key,
                direct_url,
                direct_key,
            } => {
                cmd_probe_all(
                    &common,
                    router_url.zip(router_key),
                    hub_api_url.zip(hub_gateway_url).zip(hub_key),
                    direct_url.zip(direct_key),
                )
                .await
            }
        },
        Commands::Render {
            data_dir,
            models,
            output,
        } => cmd_render(&data_dir, &models, &output),
    }
}

/// Run one checker and persist its result document.
async fn cmd_probe(
    checker: &dyn PlatformChecker,
    common: &ProbeCommon,
    file_name: &str,
) -> Result<()> {
    let identity = load_identity_table(&common.models)?;
    let source = checker.source();

    info!(source = %source, models = identity.len(), "starting probe pass");
    let document = checker.check(&identity).await;

    let path = common.data_dir.join(file_name);
    write_document(&path, &document)?;
    info!(source = %source, path = %path.display(), "recorded result document");

    print_summary(source.label(), &document);
    Ok(())
}

/// Run every checker whose endpoint configuration is complete.
async fn cmd_probe_all(
    common: &ProbeCommon,
    router: Option<(String, String)>,
    hub: Option<((String, String), String)>,
    direct: Option<(String, String)>,
) -> Result<()> {
    let mut probed = 0;

    if let Some((url, key)) = router {
        cmd_probe(&RouterChecker::new(url, key), common, ROUTER_FILE).await?;
        probed += 1;
    } else {
        warn!("router endpoint not configured, skipping");
    }

    if let Some(((api_url, gateway_url), key)) = hub {
        cmd_probe(&HubChecker::new(api_url, gateway_url, key), common, HUB_FILE).await?;
        probed += 1;
    } else {
        warn!("hub endpoint not configured, skipping");
    }

    if let Some((url, key)) = direct {
        cmd_probe(&DirectChecker::new(url, key), common, DIRECT_FILE).await?;
        probed += 1;
    } else {
        warn!("direct platform endpoint not configured, skipping");
    }

    anyhow::ensure!(probed > 0, "no source platform is configured");
    Ok(())
}

/// Render the comparison matrix.
fn cmd_render(data_dir: &Path, models: &Path, output: &Path) -> Result<()> {
    let inputs = load_inputs(data_dir, models)?;
    let html = generate_site(inputs, &ReasonLimits::default());

    if let Some(parent) = output.parent() {
        std::fs::create_dir_all(parent)
            .with_context(|| format!("create {}", parent.display()))?;
    }
    std::fs::write(output, html).with_context(|| format!("write {}", output.display()))?;

    println!("Matrix rendered: {}", output.display());
    Ok(())
}

fn bucket(summary: Option<&RunSummary>, full: &mut u32, partial: &mut u32, failing: &mut u32) {
    match summary.and_then(|s| s.success_count) {
        Some(n) if n as usize >= RUNS_PER_PROBE => *full += 1,
        Some(0) | None => *failing += 1,
        Some(_) => *partial += 1,
    }
}

/// Print the per-source support totals after a probe pass.
fn print_summary(source_label: &str, document: &ResultDocument) {
    let mut full = 0;
    let mut partial = 0;
    let mut failing = 0;

    for model in &document.models {
        match model {
            ModelRecord::ProviderList(record) => {
                for provider in &record.providers {
                    bucket(provider.summary.as_ref(), &mut full, &mut partial, &mut failing);
                }
            }
            ModelRecord::Direct(record) => {
                bucket(record.summary.as_ref(), &mut full, &mut partial, &mut failing);
            }
        }
    }

    println!("{source_label} tool support:");
    println!("  Fully supporting (3/3):       {full}");
    println!("  Partially supporting (1-2/3): {partial}");
    println!("  Not supporting (0/3):         {failing}");
}
