use std::io::{self, Write};

use anyhow::{Context, Result};

use crate::cli::ModelsArgs;
use crate::ingest;

pub fn run(args: ModelsArgs) -> Result<()> {
    let (corpus, _report) = ingest::ingest_from(&args.data_root, args.manifest_path.as_deref())?;
    let models = corpus.models();

    let mut output = io::BufWriter::new(io::stdout().lock());
    if args.json {
        serde_json::to_writer_pretty(&mut output, &models)
            .context("failed to serialize models json output")?;
        writeln!(output)?;
    } else {
        for model in &models {
            writeln!(output, "{model}")?;
        }
    }
    output.flush()?;

    Ok(())
}
