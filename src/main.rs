use anyhow::Result;
use clap::Parser;
use tracing_subscriber::EnvFilter;

use degflow::analysis::ExternalCommand;
use degflow::cli::{Cli, Commands, ConvertArgs, RunArgs, SummarizeArgs};
use degflow::ctx::{Ctx, Paths};
use degflow::pipeline::Pipeline;
use degflow::pipeline::stage0_scaffold::Stage0Scaffold;
use degflow::pipeline::stage1_convert::Stage1Convert;
use degflow::pipeline::stage2_index::Stage2Index;
use degflow::pipeline::stage3_analysis::Stage3Analysis;
use degflow::pipeline::stage4_validate::Stage4Validate;
use degflow::pipeline::stage5_aggregate::Stage5Aggregate;
use degflow::pipeline::Stage;
use degflow::{deg, index, report, summarize};

fn main() -> Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")),
        )
        .init();

    let cli = Cli::parse();
    match cli.command {
        Commands::Run(args) => run(args),
        Commands::Convert(args) => convert(args),
        Commands::Summarize(args) => summarize_outputs(args),
    }
}

fn run(args: RunArgs) -> Result<()> {
    let paths = Paths::new(
        args.deg_dir,
        args.counts,
        args.metadata,
        args.database,
        args.out,
    );
    let mut ctx = Ctx::new(
        paths,
        args.counts_data,
        args.threads,
        !args.keep_going,
        args.skip_analysis,
        env!("CARGO_PKG_VERSION"),
    );

    let stages: Vec<Box<dyn Stage>> = vec![
        Box::new(Stage0Scaffold::new()),
        Box::new(Stage1Convert::new()),
        Box::new(Stage2Index::new()),
        Box::new(Stage3Analysis::new(Box::new(ExternalCommand {
            program: args.analysis_cmd,
        }))),
        Box::new(Stage4Validate::new()),
        Box::new(Stage5Aggregate::new()),
    ];
    Pipeline::new(stages).run(&mut ctx)?;

    let run_report = report::build_report(&ctx);
    report::write_json(&ctx.paths.report_path, &run_report)?;
    print!("{}", report::format_summary(&ctx));

    fail_if_files_failed(&ctx.failed_files)
}

fn convert(args: ConvertArgs) -> Result<()> {
    let outcome = deg::convert_dir(&args.deg_dir, &args.out, !args.keep_going)?;
    let records = index::build_index(&args.out, &args.out.join(index::INDEX_FILE_NAME))?;
    println!(
        "Converted {} DEG tables, {} index entries",
        outcome.files.len(),
        records.len()
    );
    fail_if_files_failed(&outcome.failures)
}

fn summarize_outputs(args: SummarizeArgs) -> Result<()> {
    let fail_fast = !args.keep_going;

    let scan = summarize::summarize_outputs(&args.analysis_dir, fail_fast)?;
    summarize::write_existence_summary(
        &args.analysis_dir.join(summarize::EXISTENCE_SUMMARY_FILE),
        &scan.rows,
    )?;

    let agg = summarize::aggregate_significant_means(&args.analysis_dir, fail_fast)?;
    summarize::write_significance_summary(
        &args.analysis_dir.join(summarize::SIGNIFICANCE_SUMMARY_FILE),
        &agg.rows,
    )?;

    println!(
        "Summarized {} contrasts, aggregated {} ({} skipped)",
        scan.rows.len(),
        agg.rows.len(),
        agg.skipped.len()
    );

    let mut failed = scan.failures;
    failed.extend(agg.failures);
    fail_if_files_failed(&failed)
}

fn fail_if_files_failed(failed: &[String]) -> Result<()> {
    if !failed.is_empty() {
        anyhow::bail!("{} file(s) failed to load: {}", failed.len(), failed.join(", "));
    }
    Ok(())
}
