use anyhow::Result;
use clap::{Parser, Subcommand};
use std::path::PathBuf;

mod assets;
mod config;
mod data_source;
mod pdf;
mod reports;

use config::{Overrides, ReportConfig};
use pdf::{CommandPdfRenderer, PdfRenderer};

#[derive(Parser, Debug)]
#[command(name = "netreport")]
#[command(about = "Network audit report generator", long_about = None)]
struct Args {
    /// Path to configuration file
    #[arg(short, long, default_value = "netreport.toml")]
    config: PathBuf,

    /// Inventory server URL
    #[arg(long, env = "IPF_URL")]
    url: Option<String>,

    /// Inventory API token
    #[arg(long, env = "IPF_TOKEN", hide_env_values = true)]
    token: Option<String>,

    /// Snapshot id or reference ($last, $prev, $lastLocked)
    #[arg(long, env = "IPF_SNAPSHOT")]
    snapshot: Option<String>,

    /// Request timeout in seconds
    #[arg(long)]
    timeout: Option<u64>,

    /// Directory reports are written to
    #[arg(short, long)]
    output_dir: Option<PathBuf>,

    /// Write HTML only
    #[arg(long)]
    no_pdf: bool,

    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Management protocols report (AAA, NTP, syslog, SNMP, flow, DNS)
    Mgmt,

    /// Network data report for one or more sites
    Data {
        /// Comma-separated site names
        #[arg(short, long)]
        site: String,

        /// Snapshot to compare counts against
        #[arg(long)]
        compare: Option<String>,
    },
}

#[tokio::main(flavor = "current_thread")]
async fn main() -> Result<()> {
    // Initialize tracing
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env().unwrap_or_else(|_| {
                "netreport=info,netreport_sdk=info,netreport_core=info".into()
            }),
        )
        .with_target(false)
        .with_file(true)
        .with_line_number(true)
        .init();

    let args = Args::parse();

    // Load configuration
    let mut config = ReportConfig::load(&args.config)?;
    config.apply(Overrides {
        url: args.url,
        token: args.token,
        snapshot: args.snapshot,
        timeout_secs: args.timeout,
        output_dir: args.output_dir,
        no_pdf: args.no_pdf,
    });

    let client = config.client()?;
    tracing::info!("Using inventory at {}", client.server_url());

    let converter = CommandPdfRenderer::new(config.pdf.command.clone(), config.pdf.args.clone());
    let pdf_renderer: Option<&dyn PdfRenderer> = if config.output.pdf {
        Some(&converter)
    } else {
        None
    };

    let output = match args.command {
        Command::Mgmt => reports::mgmt::run(&config, &client, pdf_renderer).await?,
        Command::Data { site, compare } => {
            let sites = reports::data::parse_sites(&site)?;
            reports::data::run(&config, &client, &sites, compare.as_deref(), pdf_renderer).await?
        }
    };

    tracing::info!("Report written to {}", output.html.display());
    if let Some(pdf) = output.pdf {
        tracing::info!("PDF written to {}", pdf.display());
    }

    Ok(())
}
