use anyhow::{Context, Result};
use clap::{Parser, Subcommand};
use std::path::PathBuf;
use tracing::info;
use tracing_subscriber::EnvFilter;

use crossinline::{render_report, run_check, run_explain, ConfigArgs};

#[derive(Parser)]
#[command(name = "crossinline")]
#[command(about = "Report which functions qualify for cross-module inlining", long_about = None)]
struct Cli {
    /// Enable verbose output
    #[arg(short, long, global = true)]
    verbose: bool,

    /// Enable debug output
    #[arg(short, long, global = true)]
    debug: bool,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Run the eligibility gate over every function of a program
    Check {
        /// Program manifest (YAML or JSON)
        manifest: PathBuf,

        #[command(flatten)]
        config: ConfigArgs,

        /// Print the report as JSON
        #[arg(long)]
        json: bool,

        /// Also write the JSON report to this file
        #[arg(short, long)]
        export: Option<PathBuf>,
    },

    /// Explain the verdict for one function
    Explain {
        /// Program manifest (YAML or JSON)
        manifest: PathBuf,

        /// Function as `unit::name`
        declaration: String,

        #[command(flatten)]
        config: ConfigArgs,
    },
}

fn main() -> Result<()> {
    let cli = Cli::parse();

    // Initialize tracing
    let level = if cli.debug {
        "trace"
    } else if cli.verbose {
        "debug"
    } else {
        "info"
    };

    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(level)))
        .with_target(cli.debug) // Show target module in debug mode
        .with_writer(std::io::stderr)
        .init();

    match cli.command {
        Commands::Check {
            manifest,
            config,
            json,
            export,
        } => {
            let report = run_check(&manifest, config.resolve()?)?;
            if json {
                println!("{}", report.to_json()?);
            } else {
                print!("{}", render_report(&report));
            }
            if let Some(path) = export {
                report
                    .export_to_file(&path)
                    .with_context(|| format!("Failed to export report to {}", path.display()))?;
                info!("Report written to {}", path.display());
            }
            Ok(())
        }
        Commands::Explain {
            manifest,
            declaration,
            config,
        } => {
            let verdict = run_explain(&manifest, &declaration, config.resolve()?)?;
            println!("{}: {}", declaration, verdict);
            Ok(())
        }
    }
}
