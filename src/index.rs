use std::fs;
use std::io::{BufWriter, Write};
use std::path::{Path, PathBuf};

use anyhow::{Context, Result};
use tracing::info;

use crate::deg::{CANONICAL_SUFFIX, cell_type_from_canonical};

pub const INDEX_FILE_NAME: &str = "meta_method3.txt";

#[derive(Debug, Clone)]
pub struct IndexRecord {
    pub cell_type: String,
    pub path: PathBuf,
}

/// Scan `deg_txt_dir` for canonical DEG files and write the index table,
/// one `celltype\tdeg_txt_path` row per file, sorted by filename, resolved
/// to absolute paths. Fully overwrites any prior index. Zero files yields a
/// header-only index.
pub fn build_index(deg_txt_dir: &Path, index_file: &Path) -> Result<Vec<IndexRecord>> {
    let mut names = Vec::new();
    for entry in fs::read_dir(deg_txt_dir)
        .with_context(|| format!("failed to read {}", deg_txt_dir.display()))?
    {
        let entry = entry?;
        let name = entry.file_name().to_string_lossy().to_string();
        // is_file follows symlinks, unlike DirEntry::file_type.
        if entry.path().is_file() && name.ends_with(CANONICAL_SUFFIX) {
            names.push(name);
        }
    }
    names.sort();

    let mut records = Vec::with_capacity(names.len());
    for name in &names {
        let path = fs::canonicalize(deg_txt_dir.join(name))
            .with_context(|| format!("failed to resolve {}", deg_txt_dir.join(name).display()))?;
        records.push(IndexRecord {
            cell_type: cell_type_from_canonical(name).to_string(),
            path,
        });
    }

    let file = fs::File::create(index_file)
        .with_context(|| format!("failed to create {}", index_file.display()))?;
    let mut w = BufWriter::new(file);
    writeln!(w, "celltype\tdeg_txt_path")?;
    for record in &records {
        writeln!(w, "{}\t{}", record.cell_type, record.path.display())?;
    }
    w.flush()?;

    info!(entries = records.len(), index = %index_file.display(), "index written");
    Ok(records)
}
