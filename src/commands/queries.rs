use std::io::{self, Write};

use anyhow::{Context, Result};

use crate::cli::QueriesArgs;
use crate::ingest;

pub fn run(args: QueriesArgs) -> Result<()> {
    let (corpus, _report) = ingest::ingest_from(&args.data_root, args.manifest_path.as_deref())?;
    let entries = corpus.query_entries();

    let mut output = io::BufWriter::new(io::stdout().lock());
    if args.json {
        serde_json::to_writer_pretty(&mut output, &entries)
            .context("failed to serialize queries json output")?;
        writeln!(output)?;
    } else {
        for entry in &entries {
            let text = if args.full {
                &entry.full_text
            } else {
                &entry.label
            };
            writeln!(output, "{}\t{}", entry.id, text)?;
        }
    }
    output.flush()?;

    Ok(())
}
