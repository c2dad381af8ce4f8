use std::fs;
use std::path::Path;

use anyhow::{Context, Result};
use chrono::Utc;
use tracing::{info, warn};

use crate::commands::inventory;
use crate::corpus::EvalCorpus;
use crate::index::CorpusIndex;
use crate::model::{IngestReport, SourceCounts, SourceEntry, SourcesManifest};
use crate::normalize::normalize_row;
use crate::table::Table;
use crate::util::{now_utc_string, utc_compact_string};

pub const DEFAULT_MANIFEST_FILENAME: &str = "sources.json";

/// Resolves the ordered source list: an explicit manifest when given, the
/// default manifest beside the data when present, otherwise a fresh scan of
/// the data root. The manifest order is what the first-wins policies in the
/// index are anchored to.
pub fn load_sources(data_root: &Path, manifest_path: Option<&Path>) -> Result<SourcesManifest> {
    if let Some(path) = manifest_path {
        return read_manifest(path);
    }

    let default_path = data_root.join(DEFAULT_MANIFEST_FILENAME);
    if default_path.exists() {
        return read_manifest(&default_path);
    }

    inventory::build_manifest(data_root)
}

fn read_manifest(path: &Path) -> Result<SourcesManifest> {
    let raw =
        fs::read(path).with_context(|| format!("failed to read {}", path.display()))?;
    let manifest: SourcesManifest = serde_json::from_slice(&raw)
        .with_context(|| format!("failed to parse {}", path.display()))?;

    info!(
        path = %path.display(),
        source_count = manifest.source_count,
        "loaded sources manifest"
    );

    Ok(manifest)
}

/// Loads the source list and ingests everything into a frozen corpus.
pub fn ingest_from(
    data_root: &Path,
    manifest_path: Option<&Path>,
) -> Result<(EvalCorpus, IngestReport)> {
    let manifest = load_sources(data_root, manifest_path)?;
    ingest_all(data_root, &manifest.sources)
}

/// Processes every source in the given order into a single shared index.
/// All-or-nothing visible: an unreadable or unparsable source fails the
/// whole run and no corpus is returned. Malformed rows are counted per
/// source and skipped, never fatal; a source with zero valid rows is not a
/// failure.
pub fn ingest_all(
    data_root: &Path,
    sources: &[SourceEntry],
) -> Result<(EvalCorpus, IngestReport)> {
    let started_ts = Utc::now();
    let run_id = format!("run-{}", utc_compact_string(started_ts));

    info!(run_id = %run_id, source_count = sources.len(), "starting ingest");

    let mut index = CorpusIndex::new();
    let mut per_source = Vec::with_capacity(sources.len());

    for source in sources {
        let path = data_root.join(&source.filename);
        let text = fs::read_to_string(&path)
            .with_context(|| format!("failed to read source {}", path.display()))?;
        let table = Table::parse(&text)
            .with_context(|| format!("failed to parse source {}", path.display()))?;

        let mut counts = SourceCounts {
            label: source.label.clone(),
            filename: source.filename.clone(),
            rows_seen: 0,
            rows_ingested: 0,
            rows_rejected: 0,
        };

        for row in table.rows() {
            counts.rows_seen += 1;
            match normalize_row(row) {
                Some(record) => {
                    index.insert(record, &source.filename);
                    counts.rows_ingested += 1;
                }
                None => counts.rows_rejected += 1,
            }
        }

        if counts.rows_rejected > 0 {
            warn!(
                source = %source.filename,
                rejected = counts.rows_rejected,
                "skipped malformed rows"
            );
        }
        info!(
            source = %source.filename,
            rows = counts.rows_seen,
            ingested = counts.rows_ingested,
            "ingested source"
        );

        per_source.push(counts);
    }

    let report = IngestReport {
        run_id,
        generated_at: now_utc_string(),
        source_count: per_source.len(),
        model_count: index.model_count(),
        query_count: index.query_count(),
        rows_seen: per_source.iter().map(|counts| counts.rows_seen).sum(),
        rows_ingested: per_source.iter().map(|counts| counts.rows_ingested).sum(),
        rows_rejected: per_source.iter().map(|counts| counts.rows_rejected).sum(),
        sources: per_source,
    };

    info!(
        models = report.model_count,
        queries = report.query_count,
        rows = report.rows_ingested,
        rejected = report.rows_rejected,
        "ingest completed"
    );

    Ok((EvalCorpus::new(index), report))
}
