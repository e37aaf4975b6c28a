use std::collections::HashSet;
use std::fs;
use std::io::{BufWriter, Write};
use std::path::{Path, PathBuf};

use anyhow::{Context, Result, bail};
use csv::ReaderBuilder;
use tracing::{info, warn};

/// Canonical DEG files end with this; the index scan keys on it too.
pub const CANONICAL_SUFFIX: &str = "_DEGs.txt";

#[derive(Debug, Clone)]
pub struct ConvertedFile {
    pub cell_type: String,
    pub source: PathBuf,
    pub dest: PathBuf,
    pub rows: usize,
}

#[derive(Debug, Default)]
pub struct ConvertOutcome {
    pub files: Vec<ConvertedFile>,
    pub failures: Vec<String>,
}

/// Cell-type label for a raw CSV name: remove the exact `_DEGs.csv` suffix;
/// failing that, remove only the `.csv` extension. First matching pattern
/// wins, and a name lacking both maps to itself, so the transform is
/// idempotent. A `_DEGs` token mid-stem is left alone.
pub fn cell_type_from_source(file_name: &str) -> &str {
    file_name
        .strip_suffix("_DEGs.csv")
        .or_else(|| file_name.strip_suffix(".csv"))
        .unwrap_or(file_name)
}

/// Cell-type label for a canonical file name: everything before the first
/// `_DEGs` token, extension dropped.
pub fn cell_type_from_canonical(file_name: &str) -> &str {
    let stem = file_name.strip_suffix(".txt").unwrap_or(file_name);
    match stem.find("_DEGs") {
        Some(i) => &stem[..i],
        None => stem,
    }
}

/// Canonical output name for a raw CSV, e.g. `CD14Mono.csv` -> `CD14Mono_DEGs.txt`.
pub fn canonical_name(file_name: &str) -> String {
    let stem = file_name.strip_suffix(".csv").unwrap_or(file_name);
    format!("{}{}", stem, CANONICAL_SUFFIX)
}

/// Convert every `*.csv` table in `src_dir` into a two-column canonical file
/// in `dest_dir`, creating `dest_dir` if needed. With `fail_fast` the first
/// unreadable table aborts; otherwise it is recorded and siblings continue.
pub fn convert_dir(src_dir: &Path, dest_dir: &Path, fail_fast: bool) -> Result<ConvertOutcome> {
    fs::create_dir_all(dest_dir)
        .with_context(|| format!("failed to create {}", dest_dir.display()))?;

    let mut names = Vec::new();
    for entry in fs::read_dir(src_dir)
        .with_context(|| format!("failed to read DEG directory {}", src_dir.display()))?
    {
        let entry = entry?;
        let name = entry.file_name().to_string_lossy().to_string();
        // is_file follows symlinks, unlike DirEntry::file_type.
        if entry.path().is_file() && name.ends_with(".csv") {
            names.push(name);
        }
    }
    names.sort();

    let mut outcome = ConvertOutcome::default();
    for name in &names {
        let src = src_dir.join(name);
        match convert_table(&src, dest_dir) {
            Ok(file) => {
                info!(
                    source = name.as_str(),
                    cell_type = file.cell_type.as_str(),
                    rows = file.rows,
                    "converted"
                );
                outcome.files.push(file);
            }
            Err(err) => {
                if fail_fast {
                    return Err(err);
                }
                warn!(source = name.as_str(), error = %err, "skipping unreadable DEG table");
                outcome.failures.push(src.display().to_string());
            }
        }
    }
    Ok(outcome)
}

/// Convert one raw DEG table. The first column is the gene identifier
/// regardless of its header text; rows with a missing gene are dropped and
/// duplicate genes keep their first occurrence (stable order). Gene values
/// are written verbatim, whitespace included.
pub fn convert_table(src: &Path, dest_dir: &Path) -> Result<ConvertedFile> {
    let file_name = src
        .file_name()
        .and_then(|n| n.to_str())
        .with_context(|| format!("invalid file name {}", src.display()))?;
    let cell_type = cell_type_from_source(file_name).to_string();

    let mut reader = ReaderBuilder::new()
        .has_headers(true)
        .from_path(src)
        .with_context(|| format!("failed to open {}", src.display()))?;

    let headers = reader
        .headers()
        .with_context(|| format!("failed to read header of {}", src.display()))?;
    if headers.is_empty() {
        bail!("{} has no columns", src.display());
    }

    let mut seen: HashSet<String> = HashSet::new();
    let mut genes: Vec<String> = Vec::new();
    for result in reader.records() {
        let record =
            result.with_context(|| format!("malformed row in {}", src.display()))?;
        let gene = record.get(0).unwrap_or("");
        if gene.is_empty() {
            continue;
        }
        if seen.insert(gene.to_string()) {
            genes.push(gene.to_string());
        }
    }

    let dest = dest_dir.join(canonical_name(file_name));
    let out = fs::File::create(&dest)
        .with_context(|| format!("failed to create {}", dest.display()))?;
    let mut w = BufWriter::new(out);
    for gene in &genes {
        writeln!(w, "{}\t{}", cell_type, gene)?;
    }
    w.flush()?;

    Ok(ConvertedFile {
        cell_type,
        source: src.to_path_buf(),
        dest,
        rows: genes.len(),
    })
}
