#![forbid(unsafe_code)]

use std::path::PathBuf;

use clap::{Parser, Subcommand};
use tracing_subscriber::EnvFilter;

use typelense::{MonorepoType, detect_cmd, report_cmd};

#[derive(Parser, Debug)]
#[command(name = "typelense")]
#[command(about = "Monorepo detection and portable TypeScript error reports", long_about = None)]
struct Cli {
    /// Enable verbose logging (or set TYPELENSE_LOG)
    #[arg(long, global = true)]
    verbose: bool,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand, Debug)]
enum Commands {
    /// Detect the monorepo convention and list its packages
    Detect {
        /// Project root to inspect
        #[arg(long, default_value = ".")]
        root: PathBuf,
        /// Skip detection and use this convention
        #[arg(long = "type", value_enum)]
        monorepo_type: Option<MonorepoType>,
        /// Print the detection as JSON
        #[arg(long)]
        json: bool,
    },

    /// Write errors.tsv, metadata.json and optionally an HTML report
    Report {
        /// JSON array of collected TypeScript errors
        #[arg(long)]
        errors: PathBuf,
        /// Project root (used for metadata and as the default output base)
        #[arg(long, default_value = ".")]
        root: PathBuf,
        /// Base directory for the .typelense output folder
        #[arg(long)]
        out_dir: Option<PathBuf>,
        /// JSON file written verbatim as metadata.json
        #[arg(long)]
        metadata: Option<PathBuf>,
        /// Skip detection and use this convention for metadata
        #[arg(long = "type", value_enum)]
        monorepo_type: Option<MonorepoType>,
        /// Also produce a self-contained index.html
        #[arg(long)]
        web: bool,
        /// Template directory (overrides TYPELENSE_TEMPLATES and the install lookup)
        #[arg(long)]
        templates: Option<PathBuf>,
    },
}

fn init_tracing(verbose: bool) {
    let env = std::env::var("TYPELENSE_LOG").unwrap_or_else(|_| {
        if verbose { "typelense=debug".to_string() } else { "typelense=info".to_string() }
    });
    let _ = tracing_subscriber::fmt()
        .with_writer(std::io::stderr)
        .with_ansi(true)
        .with_env_filter(EnvFilter::new(env))
        .try_init();
}

fn main() {
    color_eyre::install().ok();
    let cli = Cli::parse();
    init_tracing(cli.verbose);

    let result = match cli.command {
        Commands::Detect { root, monorepo_type, json } => detect_cmd::run(root, monorepo_type, json),
        Commands::Report { errors, root, out_dir, metadata, monorepo_type, web, templates } => {
            report_cmd::run(errors, root, out_dir, metadata, monorepo_type, web, templates)
        }
    };

    if let Err(e) = result {
        eprintln!("{:#}", e);
        std::process::exit(1);
    }
}
