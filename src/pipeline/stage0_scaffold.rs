use anyhow::Result;
use std::fs;
use tracing::info;

use crate::ctx::Ctx;
use crate::pipeline::Stage;

pub struct Stage0Scaffold;

impl Stage0Scaffold {
    pub fn new() -> Self {
        Self
    }
}

impl Stage for Stage0Scaffold {
    fn name(&self) -> &'static str {
        "stage0_scaffold"
    }

    fn run(&self, ctx: &mut Ctx) -> Result<()> {
        fs::create_dir_all(&ctx.paths.deg_txt_dir)?;
        fs::create_dir_all(&ctx.paths.analysis_out_dir)?;
        info!(
            deg_txt_dir = %ctx.paths.deg_txt_dir.display(),
            analysis_out_dir = %ctx.paths.analysis_out_dir.display(),
            "output_dirs_ready"
        );
        Ok(())
    }
}
