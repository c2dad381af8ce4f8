use std::io::{self, Write};

use anyhow::Result;
use tracing::warn;

use crate::cli::SourceArgs;
use crate::ingest;

/// Prints the dataset path a model was first observed in, for download
/// tooling. An unknown model is a lookup miss, not a fault.
pub fn run(args: SourceArgs) -> Result<()> {
    let (corpus, _report) = ingest::ingest_from(&args.data_root, args.manifest_path.as_deref())?;

    match corpus.source_for(&args.model) {
        Some(filename) => {
            let path = args.data_root.join(filename);
            let mut output = io::BufWriter::new(io::stdout().lock());
            writeln!(output, "{}", path.display())?;
            output.flush()?;
        }
        None => {
            warn!(model = %args.model, "model not present in any ingested source");
        }
    }

    Ok(())
}
