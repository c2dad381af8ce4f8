use std::fs;
use std::path::{Path, PathBuf};

use anyhow::{Context, Result, bail};
use regex::Regex;
use tracing::info;

use crate::cli::InventoryArgs;
use crate::config::SOURCE_FILENAME_PATTERN;
use crate::ingest::DEFAULT_MANIFEST_FILENAME;
use crate::model::{SourceEntry, SourcesManifest};
use crate::util::{now_utc_string, sha256_file, write_json_pretty};

pub fn run(args: InventoryArgs) -> Result<()> {
    let manifest = build_manifest(&args.data_root)?;

    if args.dry_run {
        info!(
            source_count = manifest.source_count,
            source = %manifest.source_directory,
            "inventory dry-run complete"
        );
        return Ok(());
    }

    let manifest_path = args
        .manifest_path
        .unwrap_or_else(|| args.data_root.join(DEFAULT_MANIFEST_FILENAME));

    write_json_pretty(&manifest_path, &manifest)?;
    info!(path = %manifest_path.display(), "wrote sources manifest");
    info!(source_count = manifest.source_count, "inventory completed");

    Ok(())
}

/// Scans the data root for CSV sources and fixes their order (by filename)
/// for ingestion. The model label is taken from the
/// `<label>_eval_scoring.csv` convention, falling back to the file stem.
pub fn build_manifest(data_root: &Path) -> Result<SourcesManifest> {
    let pattern = Regex::new(SOURCE_FILENAME_PATTERN)
        .context("failed to compile source filename regex")?;

    let mut csv_paths = discover_sources(data_root)?;
    csv_paths.sort();

    if csv_paths.is_empty() {
        bail!("no CSV sources found in {}", data_root.display());
    }

    let mut sources = Vec::with_capacity(csv_paths.len());
    for path in csv_paths {
        let filename = path
            .file_name()
            .and_then(|name| name.to_str())
            .map(ToOwned::to_owned)
            .with_context(|| format!("invalid UTF-8 filename: {}", path.display()))?;

        let label = parse_source_label(&filename, &pattern);
        let sha256 = sha256_file(&path)?;

        sources.push(SourceEntry {
            filename,
            label,
            sha256,
        });
    }

    Ok(SourcesManifest {
        manifest_version: 1,
        generated_at: now_utc_string(),
        source_directory: data_root.display().to_string(),
        source_count: sources.len(),
        sources,
    })
}

fn discover_sources(data_root: &Path) -> Result<Vec<PathBuf>> {
    let mut csvs = Vec::new();

    let entries = fs::read_dir(data_root)
        .with_context(|| format!("failed to read {}", data_root.display()))?;

    for entry in entries {
        let entry =
            entry.with_context(|| format!("failed to read entry in {}", data_root.display()))?;
        let path = entry.path();

        if !entry
            .file_type()
            .with_context(|| format!("failed to inspect file type: {}", path.display()))?
            .is_file()
        {
            continue;
        }

        let is_csv = path
            .extension()
            .and_then(|ext| ext.to_str())
            .map(|ext| ext.eq_ignore_ascii_case("csv"))
            .unwrap_or(false);

        if is_csv {
            csvs.push(path);
        }
    }

    Ok(csvs)
}

fn parse_source_label(filename: &str, pattern: &Regex) -> String {
    if let Some(captures) = pattern.captures(filename) {
        if let Some(label) = captures.get(1) {
            return label.as_str().to_string();
        }
    }

    Path::new(filename)
        .file_stem()
        .and_then(|stem| stem.to_str())
        .unwrap_or(filename)
        .to_string()
}
