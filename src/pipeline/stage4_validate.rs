use anyhow::Result;
use tracing::info;

use crate::ctx::Ctx;
use crate::pipeline::Stage;
use crate::summarize;

pub struct Stage4Validate;

impl Stage4Validate {
    pub fn new() -> Self {
        Self
    }
}

impl Stage for Stage4Validate {
    fn name(&self) -> &'static str {
        "stage4_validate"
    }

    fn run(&self, ctx: &mut Ctx) -> Result<()> {
        let outcome =
            summarize::summarize_outputs(&ctx.paths.analysis_out_dir, ctx.fail_fast)?;
        summarize::write_existence_summary(&ctx.paths.existence_summary, &outcome.rows)?;
        info!(
            contrasts = outcome.rows.len(),
            failed = outcome.failures.len(),
            summary = %ctx.paths.existence_summary.display(),
            "output summary written"
        );
        ctx.existence_summary = outcome.rows;
        ctx.failed_files.extend(outcome.failures);
        Ok(())
    }
}
