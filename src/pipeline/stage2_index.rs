use anyhow::Result;

use crate::ctx::Ctx;
use crate::index;
use crate::pipeline::Stage;

pub struct Stage2Index;

impl Stage2Index {
    pub fn new() -> Self {
        Self
    }
}

impl Stage for Stage2Index {
    fn name(&self) -> &'static str {
        "stage2_index"
    }

    fn run(&self, ctx: &mut Ctx) -> Result<()> {
        ctx.index = index::build_index(&ctx.paths.deg_txt_dir, &ctx.paths.index_file)?;
        Ok(())
    }
}
