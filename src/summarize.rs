use std::fs;
use std::path::Path;

use anyhow::{Context, Result};
use csv::ReaderBuilder;
use serde::Serialize;
use tracing::warn;

pub const RESULT_MEANS: &str = "degs_degs_method_means.txt";
pub const RESULT_PVALUES: &str = "degs_degs_method_pvalues.txt";
pub const RESULT_SIG_MEANS: &str = "degs_degs_method_significant_means.txt";

pub const EXISTENCE_SUMMARY_FILE: &str = "deg_outputs_summary.csv";
pub const SIGNIFICANCE_SUMMARY_FILE: &str = "significant_means_summary.csv";

/// Columns whose header starts with this are summed by the aggregator. The
/// set of matching columns varies per contrast and is discovered per load.
const SIGNIFICANT_PREFIX: &str = "significant";

/// One existence-summary row per contrast. Missing files stay `None`, never
/// a fabricated zero; csv serializes `None` as an empty field.
#[derive(Debug, Clone, Serialize)]
pub struct ContrastSummary {
    pub contrast: String,
    pub means_exists: bool,
    pub pvalues_exists: bool,
    pub sig_means_exists: bool,
    pub means_rows: Option<u64>,
    pub pvalues_rows: Option<u64>,
    pub sig_means_rows: Option<u64>,
}

#[derive(Debug, Clone, Serialize)]
pub struct SignificanceSummary {
    pub contrast: String,
    pub n_rows: u64,
    pub total_significant_flags: f64,
}

#[derive(Debug)]
pub struct ScanOutcome<T> {
    pub rows: Vec<T>,
    /// Contrasts abandoned because a present file was unreadable
    /// (keep-going mode only; fail-fast propagates instead).
    pub failures: Vec<String>,
    /// Contrasts skipped for a missing significant-means file
    /// (aggregator only; these are warnings, not failures).
    pub skipped: Vec<String>,
}

impl<T> Default for ScanOutcome<T> {
    fn default() -> Self {
        Self {
            rows: Vec::new(),
            failures: Vec::new(),
            skipped: Vec::new(),
        }
    }
}

/// Subdirectory names of the analysis output root, lexicographic. Plain
/// files (the summary CSVs live there too) are ignored.
fn contrast_dirs(root: &Path) -> Result<Vec<String>> {
    let mut names = Vec::new();
    for entry in fs::read_dir(root)
        .with_context(|| format!("failed to read analysis output root {}", root.display()))?
    {
        let entry = entry?;
        // is_dir follows symlinks, unlike DirEntry::file_type.
        if entry.path().is_dir() {
            names.push(entry.file_name().to_string_lossy().to_string());
        }
    }
    names.sort();
    Ok(names)
}

/// Data rows of a tab-separated result table, header excluded.
fn count_rows(path: &Path) -> Result<u64> {
    let mut reader = ReaderBuilder::new()
        .delimiter(b'\t')
        .has_headers(true)
        .from_path(path)
        .with_context(|| format!("failed to open {}", path.display()))?;
    let mut n = 0u64;
    for result in reader.records() {
        result.with_context(|| format!("malformed row in {}", path.display()))?;
        n += 1;
    }
    Ok(n)
}

fn summarize_contrast(dir: &Path, name: &str) -> Result<ContrastSummary> {
    let means_path = dir.join(RESULT_MEANS);
    let pvalues_path = dir.join(RESULT_PVALUES);
    let sig_means_path = dir.join(RESULT_SIG_MEANS);

    let mut row = ContrastSummary {
        contrast: name.to_string(),
        means_exists: means_path.exists(),
        pvalues_exists: pvalues_path.exists(),
        sig_means_exists: sig_means_path.exists(),
        means_rows: None,
        pvalues_rows: None,
        sig_means_rows: None,
    };
    if row.means_exists {
        row.means_rows = Some(count_rows(&means_path)?);
    }
    if row.pvalues_exists {
        row.pvalues_rows = Some(count_rows(&pvalues_path)?);
    }
    if row.sig_means_exists {
        row.sig_means_rows = Some(count_rows(&sig_means_path)?);
    }
    Ok(row)
}

/// Existence/row-count summary: one row per contrast directory regardless of
/// completeness. A missing result file never raises; an unreadable present
/// file aborts that contrast (and under `fail_fast`, the whole step).
pub fn summarize_outputs(root: &Path, fail_fast: bool) -> Result<ScanOutcome<ContrastSummary>> {
    let mut outcome = ScanOutcome::default();
    for name in contrast_dirs(root)? {
        let dir = root.join(&name);
        match summarize_contrast(&dir, &name) {
            Ok(row) => outcome.rows.push(row),
            Err(err) => {
                if fail_fast {
                    return Err(err);
                }
                warn!(contrast = name.as_str(), error = %err, "skipping unreadable contrast");
                outcome.failures.push(name);
            }
        }
    }
    Ok(outcome)
}

fn sum_significant(path: &Path) -> Result<(u64, f64)> {
    let mut reader = ReaderBuilder::new()
        .delimiter(b'\t')
        .has_headers(true)
        .from_path(path)
        .with_context(|| format!("failed to open {}", path.display()))?;
    let headers = reader
        .headers()
        .with_context(|| format!("failed to read header of {}", path.display()))?;
    let sig_cols: Vec<usize> = headers
        .iter()
        .enumerate()
        .filter(|(_, h)| h.starts_with(SIGNIFICANT_PREFIX))
        .map(|(i, _)| i)
        .collect();

    let mut n_rows = 0u64;
    let mut total = 0f64;
    for result in reader.records() {
        let record = result.with_context(|| format!("malformed row in {}", path.display()))?;
        n_rows += 1;
        for &i in &sig_cols {
            let field = record.get(i).unwrap_or("").trim();
            if field.is_empty() {
                continue;
            }
            // NaN and non-numeric cells contribute nothing.
            if let Ok(v) = field.parse::<f64>() {
                if !v.is_nan() {
                    total += v;
                }
            }
        }
    }
    Ok((n_rows, total))
}

/// Significance aggregation: one row per contrast that actually has the
/// significant-means table. Contrasts missing it are skipped with a warning
/// and excluded from the output, unlike `summarize_outputs` which reports
/// them.
pub fn aggregate_significant_means(
    root: &Path,
    fail_fast: bool,
) -> Result<ScanOutcome<SignificanceSummary>> {
    let mut outcome = ScanOutcome::default();
    for name in contrast_dirs(root)? {
        let sig_means_path = root.join(&name).join(RESULT_SIG_MEANS);
        if !sig_means_path.exists() {
            warn!(contrast = name.as_str(), "significant means file missing, skipping");
            outcome.skipped.push(name);
            continue;
        }
        match sum_significant(&sig_means_path) {
            Ok((n_rows, total)) => outcome.rows.push(SignificanceSummary {
                contrast: name,
                n_rows,
                total_significant_flags: total,
            }),
            Err(err) => {
                if fail_fast {
                    return Err(err);
                }
                warn!(contrast = name.as_str(), error = %err, "skipping unreadable contrast");
                outcome.failures.push(name);
            }
        }
    }
    Ok(outcome)
}

pub fn write_existence_summary(path: &Path, rows: &[ContrastSummary]) -> Result<()> {
    write_summary_csv(path, rows)
}

pub fn write_significance_summary(path: &Path, rows: &[SignificanceSummary]) -> Result<()> {
    write_summary_csv(path, rows)
}

/// Whole-file replace; an empty row set yields an empty file.
fn write_summary_csv<T: Serialize>(path: &Path, rows: &[T]) -> Result<()> {
    let mut writer = csv::Writer::from_path(path)
        .with_context(|| format!("failed to create {}", path.display()))?;
    for row in rows {
        writer.serialize(row)?;
    }
    writer.flush()?;
    Ok(())
}
