//! pdfbook CLI - Command-line interface for PDF to e-book conversion

mod commands;

use anyhow::Result;
use clap::{Parser, Subcommand};
use std::path::PathBuf;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

#[derive(Parser)]
#[command(name = "pdfbook")]
#[command(author, version, about, long_about = None)]
struct Cli {
    /// Verbose output
    #[arg(short, long, global = true)]
    verbose: bool,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Convert a PDF to an e-book format
    Convert {
        /// Input PDF path
        input: PathBuf,

        /// Target format (epub, mobi, azw3, txt)
        #[arg(short, long)]
        format: String,

        /// Book title, also used for the output file name
        #[arg(short, long)]
        title: Option<String>,

        /// Book author
        #[arg(short, long)]
        author: Option<String>,

        /// Directory to write the converted file to
        #[arg(short, long, default_value = ".")]
        output_dir: PathBuf,
    },

    /// List supported target formats
    Formats {
        /// Output as JSON
        #[arg(long)]
        json: bool,
    },

    /// Check whether the external converter is installed
    Probe,
}

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();

    // Initialize tracing
    let filter = if cli.verbose {
        "pdfbook_cli=debug,pdfbook_core=debug"
    } else {
        "pdfbook_cli=warn,pdfbook_core=warn"
    };

    tracing_subscriber::registry()
        .with(tracing_subscriber::EnvFilter::new(filter))
        .with(tracing_subscriber::fmt::layer().with_writer(std::io::stderr))
        .init();

    match cli.command {
        Commands::Convert {
            input,
            format,
            title,
            author,
            output_dir,
        } => commands::convert(&input, &format, title, author, &output_dir).await,

        Commands::Formats { json } => commands::formats(json),

        Commands::Probe => commands::probe(),
    }
}
