//! PDF Packet CLI tool
//!
//! Stamps every PDF in a directory with its file name and merges the
//! stamped copies, in natural order, into a single packet.

use std::path::PathBuf;
use std::process;

use clap::Parser;

use pdf_packet::batch::{run_batch, BatchOptions};

/// PDF Packet - stamp a directory of PDFs and merge them into one file
#[derive(Parser)]
#[command(name = "pdf-packet")]
#[command(author, version, about, long_about = None)]
#[command(after_help = "EXAMPLES:
    # Stamp and merge every PDF in the current directory
    pdf-packet

    # Keep the stamped copies in an annotated/ subdirectory
    pdf-packet ~/lectures --keep-annotated

    # Open the directory in the file manager when done
    pdf-packet ~/lectures --reveal")]
struct Cli {
    /// Directory containing the input PDF files
    #[arg(default_value = ".")]
    directory: PathBuf,

    /// Keep the stamped copies in an annotated/ subdirectory instead of
    /// deleting them after the merge
    #[arg(long)]
    keep_annotated: bool,

    /// Open the directory in the system file manager after merging
    #[arg(long)]
    reveal: bool,
}

fn main() {
    let cli = Cli::parse();

    if let Err(e) = run(cli) {
        eprintln!("Error: {e:#}");
        process::exit(1);
    }
}

fn run(cli: Cli) -> anyhow::Result<()> {
    let options = BatchOptions {
        directory: cli.directory,
        keep_annotated: cli.keep_annotated,
        reveal_after: cli.reveal,
    };

    eprintln!("Stamping PDFs in {}...", options.directory.display());

    let summary = run_batch(&options)?;

    eprintln!(
        "Merged {} files ({} pages) into {}",
        summary.input_count,
        summary.page_count,
        summary.merged_path.display()
    );

    Ok(())
}
