use std::sync::Arc;

use anyhow::Result;
use clap::{Parser, Subcommand};
use tracing_subscriber::EnvFilter;

use brandscan_audit::Auditor;
use brandscan_common::Config;
use brandscan_fetch::{FetchClient, FetchOptions};
use brandscan_presence::PresenceProber;
use brandscan_scan::SiteScanner;

#[derive(Parser)]
#[command(name = "brandscan", about = "Business web-footprint scanner")]
struct Cli {
    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand)]
enum Command {
    /// Scan a website and emit the site audit as JSON
    Scan {
        /// Target URL or bare domain (https assumed)
        url: String,
    },
    /// Probe platform presence for a business
    Presence {
        business_name: String,
        handle: String,
        domain: String,
    },
    /// Full audit: site scan plus presence probe in one record
    Audit {
        url: String,
        business_name: Option<String>,
        handle: Option<String>,
    },
}

#[tokio::main]
async fn main() -> Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")),
        )
        .with_writer(std::io::stderr)
        .init();

    let cli = Cli::parse();
    let config = Config::from_env();

    let fetcher = Arc::new(FetchClient::new(&config.user_agent));
    let opts = FetchOptions {
        max_redirects: config.max_redirects,
        timeout: config.timeout,
        ..FetchOptions::default()
    };

    match cli.command {
        Command::Scan { url } => {
            let scanner = SiteScanner::new(fetcher, opts);
            let audit = scanner.scan(&url).await?;
            println!("{}", serde_json::to_string_pretty(&audit)?);
        }
        Command::Presence {
            business_name,
            handle,
            domain,
        } => {
            let prober = PresenceProber::new(fetcher, opts);
            let report = prober.probe(&business_name, &handle, &domain).await;
            println!("{}", serde_json::to_string_pretty(&report)?);
        }
        Command::Audit {
            url,
            business_name,
            handle,
        } => {
            let auditor = Auditor::new(fetcher, opts);
            let record = auditor
                .audit(&url, business_name.as_deref(), handle.as_deref())
                .await?;
            println!("{}", serde_json::to_string_pretty(&record)?);
        }
    }

    Ok(())
}
