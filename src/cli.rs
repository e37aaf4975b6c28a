use clap::{Args, Parser, Subcommand};
use std::path::PathBuf;

#[derive(Debug, Parser)]
#[command(
    name = "degflow",
    version,
    about = "DEG conversion and CellPhoneDB contrast summarization CLI"
)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Commands,
}

#[derive(Debug, Subcommand)]
pub enum Commands {
    /// Run the full pipeline: convert, index, analyze, summarize.
    Run(RunArgs),
    /// Convert raw DEG CSV tables and build the index only.
    Convert(ConvertArgs),
    /// Summarize an existing analysis output root only.
    Summarize(SummarizeArgs),
}

#[derive(Debug, Args)]
pub struct RunArgs {
    #[arg(long, help = "Directory of raw per-cell-type DEG CSV files")]
    pub deg_dir: PathBuf,

    #[arg(long, help = "Normalized expression matrix file passed to the analysis")]
    pub counts: PathBuf,

    #[arg(long, help = "Per-cell metadata file passed to the analysis")]
    pub metadata: PathBuf,

    #[arg(long, help = "Reference database archive (zip)")]
    pub database: PathBuf,

    #[arg(long, help = "Output root directory")]
    pub out: PathBuf,

    #[arg(long, default_value = "log-normalized", help = "Counts representation tag")]
    pub counts_data: String,

    #[arg(long, default_value_t = 8, help = "Threads for the external analysis")]
    pub threads: usize,

    #[arg(long, default_value = "cellphonedb", help = "External analysis program")]
    pub analysis_cmd: PathBuf,

    #[arg(long, default_value_t = false, help = "Skip the external analysis step")]
    pub skip_analysis: bool,

    #[arg(
        long,
        default_value_t = false,
        help = "Skip unreadable files instead of aborting; exit non-zero at the end if any failed"
    )]
    pub keep_going: bool,
}

#[derive(Debug, Args)]
pub struct ConvertArgs {
    #[arg(long, help = "Directory of raw per-cell-type DEG CSV files")]
    pub deg_dir: PathBuf,

    #[arg(long, help = "Destination directory for canonical two-column files")]
    pub out: PathBuf,

    #[arg(long, default_value_t = false)]
    pub keep_going: bool,
}

#[derive(Debug, Args)]
pub struct SummarizeArgs {
    #[arg(long, help = "Analysis output root containing per-contrast directories")]
    pub analysis_dir: PathBuf,

    #[arg(long, default_value_t = false)]
    pub keep_going: bool,
}
