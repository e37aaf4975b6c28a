use std::fs;
use std::path::Path;

use assert_cmd::Command;
use serde_json::Value;
use tempfile::TempDir;

fn write_deg_csvs(dir: &Path) {
    fs::write(
        dir.join("CD16Mono_DEGs.csv"),
        "gene,log2fc,padj\nIFIT3,2.1,0.001\nISG15,1.8,0.004\nISG15,1.8,0.004\n",
    )
    .unwrap();
    fs::write(dir.join("CD14Mono.csv"), "gene,log2fc,padj\nCXCL10,3.0,0.002\n").unwrap();
}

fn seed_analysis_outputs(out_root: &Path) {
    let analysis = out_root.join("analysis_degs_method3");
    let complete = analysis.join("R+1_vs_preflight");
    fs::create_dir_all(&complete).unwrap();
    fs::write(
        complete.join("degs_degs_method_means.txt"),
        "interacting_pair\tmean\nA_B\t0.5\n",
    )
    .unwrap();
    fs::write(
        complete.join("degs_degs_method_pvalues.txt"),
        "interacting_pair\tpvalue\nA_B\t0.01\n",
    )
    .unwrap();
    fs::write(
        complete.join("degs_degs_method_significant_means.txt"),
        "interacting_pair\tsignificant_A\tsignificant_B\nA_B\t1\t0\nC_D\t1\t1\n",
    )
    .unwrap();
    fs::create_dir_all(analysis.join("R+7_vs_preflight")).unwrap();
}

fn run_pipeline(deg_dir: &Path, inputs: &Path, out: &Path) {
    let mut cmd = Command::cargo_bin("degflow").unwrap();
    cmd.args([
        "run",
        "--deg-dir",
        deg_dir.to_str().unwrap(),
        "--counts",
        inputs.join("counts.h5ad").to_str().unwrap(),
        "--metadata",
        inputs.join("metadata.tsv").to_str().unwrap(),
        "--database",
        inputs.join("cellphonedb.zip").to_str().unwrap(),
        "--out",
        out.to_str().unwrap(),
        "--skip-analysis",
    ]);
    cmd.assert().success();
}

fn setup() -> (TempDir, TempDir, TempDir) {
    let deg_dir = TempDir::new().unwrap();
    let inputs = TempDir::new().unwrap();
    let out = TempDir::new().unwrap();
    write_deg_csvs(deg_dir.path());
    for name in ["counts.h5ad", "metadata.tsv", "cellphonedb.zip"] {
        fs::write(inputs.path().join(name), b"").unwrap();
    }
    seed_analysis_outputs(out.path());
    (deg_dir, inputs, out)
}

#[test]
fn run_writes_all_artifacts() {
    let (deg_dir, inputs, out) = setup();
    run_pipeline(deg_dir.path(), inputs.path(), out.path());

    let deg_txt = out.path().join("deg_txt");
    assert!(deg_txt.join("CD14Mono_DEGs.txt").exists());
    assert!(deg_txt.join("CD16Mono_DEGs_DEGs.txt").exists());

    let meta = fs::read_to_string(deg_txt.join("meta_method3.txt")).unwrap();
    let lines: Vec<&str> = meta.lines().collect();
    assert_eq!(lines[0], "celltype\tdeg_txt_path");
    assert_eq!(lines.len(), 3);
    assert!(lines[1].starts_with("CD14Mono\t"));
    assert!(lines[2].starts_with("CD16Mono\t"));

    let analysis = out.path().join("analysis_degs_method3");
    assert!(analysis.join("deg_outputs_summary.csv").exists());
    assert!(analysis.join("significant_means_summary.csv").exists());
    assert!(out.path().join("run_report.json").exists());
}

#[test]
fn run_summaries_cover_both_contrasts_asymmetrically() {
    let (deg_dir, inputs, out) = setup();
    run_pipeline(deg_dir.path(), inputs.path(), out.path());

    let analysis = out.path().join("analysis_degs_method3");
    let existence = fs::read_to_string(analysis.join("deg_outputs_summary.csv")).unwrap();
    // Header plus one row per contrast, complete or not.
    assert_eq!(existence.lines().count(), 3);

    let significance =
        fs::read_to_string(analysis.join("significant_means_summary.csv")).unwrap();
    let lines: Vec<&str> = significance.lines().collect();
    assert_eq!(lines[0], "contrast,n_rows,total_significant_flags");
    assert_eq!(lines.len(), 2);
    assert!(lines[1].starts_with("R+1_vs_preflight,2,3"));
}

#[test]
fn run_report_schema_fields_exist() {
    let (deg_dir, inputs, out) = setup();
    run_pipeline(deg_dir.path(), inputs.path(), out.path());

    let report = out.path().join("run_report.json");
    let v: Value = serde_json::from_slice(&fs::read(report).unwrap()).unwrap();
    assert_eq!(v["tool"]["name"], "degflow");
    assert!(v["tool"]["version"].is_string());
    assert_eq!(v["counts"]["files_converted"], 2);
    assert_eq!(v["counts"]["index_entries"], 2);
    assert_eq!(v["counts"]["contrasts_scanned"], 2);
    assert_eq!(v["counts"]["contrasts_aggregated"], 1);
    assert_eq!(v["counts"]["total_significant_flags"], 3.0);
    assert!(v["warnings"].is_array());
    assert!(v["failed_files"].is_array());
}

#[test]
fn repeated_runs_are_byte_identical() {
    let (deg_dir, inputs, out) = setup();
    run_pipeline(deg_dir.path(), inputs.path(), out.path());

    let names = [
        "deg_txt/CD14Mono_DEGs.txt",
        "deg_txt/CD16Mono_DEGs_DEGs.txt",
        "deg_txt/meta_method3.txt",
        "analysis_degs_method3/deg_outputs_summary.csv",
        "analysis_degs_method3/significant_means_summary.csv",
        "run_report.json",
    ];
    let first: Vec<Vec<u8>> = names
        .iter()
        .map(|n| fs::read(out.path().join(n)).unwrap())
        .collect();

    run_pipeline(deg_dir.path(), inputs.path(), out.path());
    for (name, before) in names.iter().zip(&first) {
        let after = fs::read(out.path().join(name)).unwrap();
        assert_eq!(&after, before, "mismatch in {}", name);
    }
}

#[test]
fn convert_subcommand_writes_canonical_files_and_index() {
    let deg_dir = TempDir::new().unwrap();
    let out = TempDir::new().unwrap();
    write_deg_csvs(deg_dir.path());

    let mut cmd = Command::cargo_bin("degflow").unwrap();
    cmd.args([
        "convert",
        "--deg-dir",
        deg_dir.path().to_str().unwrap(),
        "--out",
        out.path().to_str().unwrap(),
    ]);
    cmd.assert().success();

    assert!(out.path().join("CD14Mono_DEGs.txt").exists());
    assert!(out.path().join("meta_method3.txt").exists());
}

#[test]
fn summarize_subcommand_writes_both_summaries() {
    let out = TempDir::new().unwrap();
    seed_analysis_outputs(out.path());
    let analysis = out.path().join("analysis_degs_method3");

    let mut cmd = Command::cargo_bin("degflow").unwrap();
    cmd.args([
        "summarize",
        "--analysis-dir",
        analysis.to_str().unwrap(),
    ]);
    cmd.assert().success();

    assert!(analysis.join("deg_outputs_summary.csv").exists());
    assert!(analysis.join("significant_means_summary.csv").exists());
}
