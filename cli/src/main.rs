use anyhow::Result;
use clap::{Parser, Subcommand};
use std::path::PathBuf;
use tracing::error;
use tracing_subscriber::EnvFilter;

use pvr::process::{pvr_decode, pvr_decode_batch, pvr_info};

#[derive(Parser)]
#[command(name = "pvr-cli")]
#[command(about = "CLI for PVR texture files", long_about = None)]
struct Cli {
    /// Log decoder diagnostics (overridden by RUST_LOG)
    #[arg(short, long, global = true, default_value_t = false)]
    verbose: bool,
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Decode a PVR file into a PNG
    Decode {
        /// Input PVR file
        input: PathBuf,
        /// Output PNG file (optional, defaults to input name + .png)
        #[arg(short, long)]
        output: Option<PathBuf>,
    },
    /// Print the dialect, dimensions and format of a PVR file
    Info {
        /// Input PVR file
        input: PathBuf,
        /// Print the header fields as JSON
        #[arg(long, default_value_t = false)]
        json: bool,
    },
    /// Decode every .pvr file in a directory tree
    Batch {
        /// Input directory
        input: PathBuf,
        /// Output directory (optional, defaults to the input directory)
        #[arg(short, long)]
        output: Option<PathBuf>,
    },
}

fn init_tracing(verbose: bool) {
    let default = if verbose { "debug" } else { "info" };
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default));
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_target(false)
        .init();
}

fn main() -> Result<()> {
    let cli = Cli::parse();
    init_tracing(cli.verbose);

    match &cli.command {
        Commands::Decode { input, output } => {
            let out_path = pvr_decode(input, output)?;
            println!("Decoded PVR saved to {:?}", out_path);
        }
        Commands::Info { input, json } => match pvr_info(input) {
            Ok(info) if *json => {
                println!("{}", serde_json::to_string_pretty(&info)?);
            }
            Ok(info) => {
                println!("Dialect:  {}", info.dialect);
                println!("Format:   {}", info.format);
                println!("Size:     {}x{}", info.width, info.height);
                println!("BPP:      {}", info.bpp);
                println!("Mipmaps:  {}", info.mip_count);
            }
            Err(e) => {
                error!(input = ?input, error = %e, "Failed to read PVR");
                println!("Status:   {}", e.status());
                return Err(e.into());
            }
        },
        Commands::Batch { input, output } => {
            let summary = pvr_decode_batch(input, output)?;
            println!(
                "Batch complete: {} decoded, {} failed",
                summary.decoded, summary.failed
            );
        }
    }

    Ok(())
}
