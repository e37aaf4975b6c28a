use std::path::PathBuf;

use crate::deg::ConvertedFile;
use crate::index::IndexRecord;
use crate::summarize::{ContrastSummary, SignificanceSummary};

/// Every location the pipeline reads or writes, resolved once at startup.
#[derive(Debug, Clone)]
pub struct Paths {
    pub deg_csv_dir: PathBuf,
    pub deg_txt_dir: PathBuf,
    pub index_file: PathBuf,
    pub counts_file: PathBuf,
    pub metadata_file: PathBuf,
    pub database_file: PathBuf,
    pub analysis_out_dir: PathBuf,
    pub existence_summary: PathBuf,
    pub significance_summary: PathBuf,
    pub report_path: PathBuf,
}

impl Paths {
    pub fn new(
        deg_csv_dir: PathBuf,
        counts_file: PathBuf,
        metadata_file: PathBuf,
        database_file: PathBuf,
        out_root: PathBuf,
    ) -> Self {
        let deg_txt_dir = out_root.join("deg_txt");
        let index_file = deg_txt_dir.join("meta_method3.txt");
        let analysis_out_dir = out_root.join("analysis_degs_method3");
        let existence_summary = analysis_out_dir.join("deg_outputs_summary.csv");
        let significance_summary = analysis_out_dir.join("significant_means_summary.csv");
        let report_path = out_root.join("run_report.json");
        Self {
            deg_csv_dir,
            deg_txt_dir,
            index_file,
            counts_file,
            metadata_file,
            database_file,
            analysis_out_dir,
            existence_summary,
            significance_summary,
            report_path,
        }
    }
}

#[derive(Debug)]
pub struct Ctx {
    pub paths: Paths,
    pub counts_data: String,
    pub threads: usize,
    pub fail_fast: bool,
    pub skip_analysis: bool,
    pub tool_version: String,

    pub converted: Vec<ConvertedFile>,
    pub index: Vec<IndexRecord>,
    pub existence_summary: Vec<ContrastSummary>,
    pub significance_summary: Vec<SignificanceSummary>,
    pub warnings: Vec<String>,
    /// Files that failed to load under keep-going mode; non-empty means the
    /// run exits non-zero after completing.
    pub failed_files: Vec<String>,
}

impl Ctx {
    pub fn new(
        paths: Paths,
        counts_data: String,
        threads: usize,
        fail_fast: bool,
        skip_analysis: bool,
        tool_version: &str,
    ) -> Self {
        Self {
            paths,
            counts_data,
            threads,
            fail_fast,
            skip_analysis,
            tool_version: tool_version.to_string(),
            converted: Vec::new(),
            index: Vec::new(),
            existence_summary: Vec::new(),
            significance_summary: Vec::new(),
            warnings: Vec::new(),
            failed_files: Vec::new(),
        }
    }
}
