use anyhow::Result;
use tracing::{error, info};

use crate::analysis::{AnalysisMethod, AnalysisRequest};
use crate::ctx::Ctx;
use crate::pipeline::Stage;

pub struct Stage3Analysis {
    method: Box<dyn AnalysisMethod>,
}

impl Stage3Analysis {
    pub fn new(method: Box<dyn AnalysisMethod>) -> Self {
        Self { method }
    }
}

impl Stage for Stage3Analysis {
    fn name(&self) -> &'static str {
        "stage3_analysis"
    }

    fn run(&self, ctx: &mut Ctx) -> Result<()> {
        if ctx.skip_analysis {
            info!("analysis step skipped");
            return Ok(());
        }

        let req = AnalysisRequest {
            meta_file: ctx.paths.metadata_file.clone(),
            counts_file: ctx.paths.counts_file.clone(),
            database_file: ctx.paths.database_file.clone(),
            degs_dir: ctx.paths.deg_txt_dir.clone(),
            counts_data: ctx.counts_data.clone(),
            log_level: "INFO".to_string(),
            threads: ctx.threads,
            output_dir: ctx.paths.analysis_out_dir.clone(),
        };
        info!(
            method = self.method.name(),
            counts = %req.counts_file.display(),
            metadata = %req.meta_file.display(),
            database = %req.database_file.display(),
            degs_dir = %req.degs_dir.display(),
            output_dir = %req.output_dir.display(),
            counts_data = req.counts_data.as_str(),
            threads = req.threads,
            "running analysis"
        );

        // Failure propagates unmodified after logging; no retry, no salvage.
        if let Err(err) = self.method.run(&req) {
            error!(method = self.method.name(), error = %err, "analysis failed");
            return Err(err);
        }
        info!(method = self.method.name(), "analysis completed");
        Ok(())
    }
}
