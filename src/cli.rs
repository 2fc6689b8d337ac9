//! CLI argument definitions using clap derive macros.

use std::path::PathBuf;

use clap::Parser;

/// Resolve paper references and deliver arXiv PDFs with live progress.
///
/// Paperdrop takes free text, an arXiv DOI, or an arXiv URL and retrieves
/// the matching paper's PDF, or processes a whole BibTeX bibliography one
/// entry at a time.
#[derive(Parser, Debug)]
#[command(name = "paperdrop")]
#[command(author, version, about)]
pub struct Args {
    /// References to resolve (free text, arXiv DOI, or arXiv URL);
    /// read from stdin when omitted
    pub references: Vec<String>,

    /// Process every entry of a BibTeX file instead of positional references
    #[arg(short, long, value_name = "FILE", conflicts_with = "references")]
    pub bib: Option<PathBuf>,

    /// Directory where delivered PDFs are placed
    #[arg(short, long, default_value = ".", value_name = "DIR")]
    pub output_dir: PathBuf,

    /// Increase output verbosity (-v for debug, -vv for trace)
    #[arg(short, long, action = clap::ArgAction::Count)]
    pub verbose: u8,

    /// Suppress non-error output
    #[arg(short, long)]
    pub quiet: bool,
}
