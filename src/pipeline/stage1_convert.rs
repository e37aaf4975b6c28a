use anyhow::Result;
use tracing::info;

use crate::ctx::Ctx;
use crate::deg;
use crate::pipeline::Stage;

pub struct Stage1Convert;

impl Stage1Convert {
    pub fn new() -> Self {
        Self
    }
}

impl Stage for Stage1Convert {
    fn name(&self) -> &'static str {
        "stage1_convert"
    }

    fn run(&self, ctx: &mut Ctx) -> Result<()> {
        let outcome = deg::convert_dir(
            &ctx.paths.deg_csv_dir,
            &ctx.paths.deg_txt_dir,
            ctx.fail_fast,
        )?;
        info!(
            converted = outcome.files.len(),
            failed = outcome.failures.len(),
            "conversion done"
        );
        ctx.converted = outcome.files;
        ctx.failed_files.extend(outcome.failures);
        Ok(())
    }
}
