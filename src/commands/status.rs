use anyhow::Result;
use tracing::info;

use crate::cli::StatusArgs;
use crate::ingest;
use crate::util::write_json_pretty;

pub fn run(args: StatusArgs) -> Result<()> {
    let (_corpus, report) = ingest::ingest_from(&args.data_root, args.manifest_path.as_deref())?;

    for source in &report.sources {
        info!(
            source = %source.filename,
            label = %source.label,
            rows = source.rows_seen,
            ingested = source.rows_ingested,
            rejected = source.rows_rejected,
            "source status"
        );
    }

    info!(
        run_id = %report.run_id,
        sources = report.source_count,
        models = report.model_count,
        queries = report.query_count,
        rows = report.rows_ingested,
        rejected = report.rows_rejected,
        "corpus status"
    );

    if let Some(report_path) = args.report_path {
        write_json_pretty(&report_path, &report)?;
        info!(path = %report_path.display(), "wrote ingest report");
    }

    Ok(())
}
