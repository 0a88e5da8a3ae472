mod resolve;

use std::process::ExitCode;

use clap::{Parser, Subcommand};
use tracing_subscriber::EnvFilter;

#[derive(Debug, Parser)]
#[command(name = "geolink")]
#[command(about = "Resolve map share links into coordinates and place names")]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Debug, Subcommand)]
enum Commands {
    /// Resolve a share link and print the JSON response on stdout
    Resolve {
        /// Short link, redirect link or place page URL
        url: String,

        /// Outer attempt budget (overrides `GEOLINK_MAX_ATTEMPTS`)
        #[arg(long)]
        attempts: Option<u32>,

        /// Redirect hops per attempt (overrides `GEOLINK_MAX_HOPS`)
        #[arg(long)]
        max_hops: Option<usize>,

        /// Pretty-print the JSON body
        #[arg(long)]
        pretty: bool,
    },
    /// Print the normalized `lat,lon` form of two raw values
    Normalize {
        #[arg(allow_negative_numbers = true)]
        a: f64,
        #[arg(allow_negative_numbers = true)]
        b: f64,
    },
}

#[tokio::main]
async fn main() -> anyhow::Result<ExitCode> {
    let cli = Cli::parse();

    let config = geolink_core::load_app_config()?;
    let env_filter = EnvFilter::try_from_default_env()
        .or_else(|_| EnvFilter::try_new(config.log_level.clone()))?;
    tracing_subscriber::fmt()
        .with_env_filter(env_filter)
        .with_writer(std::io::stderr)
        .init();

    match cli.command {
        Commands::Resolve {
            url,
            attempts,
            max_hops,
            pretty,
        } => {
            let overrides = resolve::Overrides { attempts, max_hops };
            resolve::run_resolve(&config, &url, overrides, pretty).await
        }
        Commands::Normalize { a, b } => {
            println!("{}", resolve::run_normalize(a, b));
            Ok(ExitCode::SUCCESS)
        }
    }
}

#[cfg(test)]
mod tests;
