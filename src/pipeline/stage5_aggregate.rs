use anyhow::Result;
use tracing::info;

use crate::ctx::Ctx;
use crate::pipeline::Stage;
use crate::summarize;

pub struct Stage5Aggregate;

impl Stage5Aggregate {
    pub fn new() -> Self {
        Self
    }
}

impl Stage for Stage5Aggregate {
    fn name(&self) -> &'static str {
        "stage5_aggregate"
    }

    fn run(&self, ctx: &mut Ctx) -> Result<()> {
        let outcome =
            summarize::aggregate_significant_means(&ctx.paths.analysis_out_dir, ctx.fail_fast)?;
        summarize::write_significance_summary(&ctx.paths.significance_summary, &outcome.rows)?;
        info!(
            contrasts = outcome.rows.len(),
            skipped = outcome.skipped.len(),
            failed = outcome.failures.len(),
            summary = %ctx.paths.significance_summary.display(),
            "significance summary written"
        );
        for name in &outcome.skipped {
            ctx.warnings
                .push(format!("contrast {} has no significant means file", name));
        }
        ctx.significance_summary = outcome.rows;
        ctx.failed_files.extend(outcome.failures);
        Ok(())
    }
}
