use std::fs::File;
use std::io::BufWriter;
use std::path::Path;

use anyhow::Result;
use serde::{Deserialize, Serialize};

use crate::ctx::Ctx;

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ToolInfo {
    pub name: String,
    pub version: String,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct StageCounts {
    pub files_converted: usize,
    pub index_entries: usize,
    pub contrasts_scanned: usize,
    pub contrasts_aggregated: usize,
    pub total_significant_flags: f64,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RunReport {
    pub tool: ToolInfo,
    pub counts: StageCounts,
    pub warnings: Vec<String>,
    pub failed_files: Vec<String>,
}

pub fn build_report(ctx: &Ctx) -> RunReport {
    let total_significant_flags = ctx
        .significance_summary
        .iter()
        .map(|s| s.total_significant_flags)
        .sum();
    RunReport {
        tool: ToolInfo {
            name: "degflow".to_string(),
            version: ctx.tool_version.clone(),
        },
        counts: StageCounts {
            files_converted: ctx.converted.len(),
            index_entries: ctx.index.len(),
            contrasts_scanned: ctx.existence_summary.len(),
            contrasts_aggregated: ctx.significance_summary.len(),
            total_significant_flags,
        },
        warnings: ctx.warnings.clone(),
        failed_files: ctx.failed_files.clone(),
    }
}

pub fn write_json(path: &Path, report: &RunReport) -> Result<()> {
    let file = File::create(path)?;
    let writer = BufWriter::new(file);
    serde_json::to_writer_pretty(writer, report)?;
    Ok(())
}

pub fn format_summary(ctx: &Ctx) -> String {
    let report = build_report(ctx);

    let mut out = String::new();
    out.push_str(&format!("degflow v{}\n", report.tool.version));
    out.push_str(&format!(
        "Converted: {} DEG tables, {} index entries\n",
        report.counts.files_converted, report.counts.index_entries
    ));
    out.push_str(&format!(
        "Contrasts: {} scanned, {} aggregated, {:.0} significant flags\n",
        report.counts.contrasts_scanned,
        report.counts.contrasts_aggregated,
        report.counts.total_significant_flags
    ));
    if report.warnings.is_empty() {
        out.push_str("Warnings: none\n");
    } else {
        out.push_str(&format!("Warnings: {}\n", report.warnings.join("; ")));
    }
    if !report.failed_files.is_empty() {
        out.push_str(&format!(
            "Failed files: {}\n",
            report.failed_files.join(", ")
        ));
    }
    out
}
