use std::path::PathBuf;
use std::process::Command;

use anyhow::{Context, Result, bail};

/// Full parameter set of one analysis invocation. All fields required; the
/// core never inspects the counts/metadata/database contents.
#[derive(Debug, Clone)]
pub struct AnalysisRequest {
    pub meta_file: PathBuf,
    pub counts_file: PathBuf,
    pub database_file: PathBuf,
    pub degs_dir: PathBuf,
    pub counts_data: String,
    pub log_level: String,
    pub threads: usize,
    pub output_dir: PathBuf,
}

/// Boundary to the external cell-cell-communication analysis. The real
/// implementation shells out; tests substitute a fake that writes fixture
/// contrast directories.
pub trait AnalysisMethod {
    fn name(&self) -> &'static str;
    fn run(&self, req: &AnalysisRequest) -> Result<()>;
}

/// Drives an external analysis program (CellPhoneDB CLI or a wrapper),
/// passing the documented parameter set as long flags. Any non-success exit
/// becomes an error and propagates unmodified.
pub struct ExternalCommand {
    pub program: PathBuf,
}

impl AnalysisMethod for ExternalCommand {
    fn name(&self) -> &'static str {
        "cpdb_degs_analysis"
    }

    fn run(&self, req: &AnalysisRequest) -> Result<()> {
        let status = Command::new(&self.program)
            .arg("--meta-file-path")
            .arg(&req.meta_file)
            .arg("--counts-file-path")
            .arg(&req.counts_file)
            .arg("--database-file-path")
            .arg(&req.database_file)
            .arg("--degs-folder-path")
            .arg(&req.degs_dir)
            .arg("--counts-data")
            .arg(&req.counts_data)
            .arg("--log-level")
            .arg(&req.log_level)
            .arg("--threads")
            .arg(req.threads.to_string())
            .arg("--output-path")
            .arg(&req.output_dir)
            .status()
            .with_context(|| {
                format!("failed to launch analysis program {}", self.program.display())
            })?;

        if !status.success() {
            bail!(
                "analysis program {} exited with {}",
                self.program.display(),
                status
            );
        }
        Ok(())
    }
}
