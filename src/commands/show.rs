use std::io::{self, Write};

use anyhow::{Context, Result, bail};
use rand::SeedableRng;
use rand::rngs::StdRng;
use serde::Serialize;

use crate::cli::ShowArgs;
use crate::corpus::LanguageCell;
use crate::ingest;
use crate::model::QueryId;

#[derive(Debug, Serialize)]
struct ShowResponse {
    model: String,
    query_id: QueryId,
    query_text: String,
    languages: Vec<LanguageCell>,
}

pub fn run(args: ShowArgs) -> Result<()> {
    let Some(query_id) = QueryId::parse(&args.query) else {
        bail!("query id must not be empty");
    };

    let (corpus, _report) = ingest::ingest_from(&args.data_root, args.manifest_path.as_deref())?;

    // Multi-record buckets are sampled anew on every invocation; --seed
    // pins the draw for scripting.
    let languages = match args.seed {
        Some(seed) => {
            let mut rng = StdRng::seed_from_u64(seed);
            corpus.language_panel_with(&mut rng, &args.model, &query_id)
        }
        None => corpus.language_panel(&args.model, &query_id),
    };

    let query_text = corpus.canonical_text(&query_id);

    if args.json {
        let response = ShowResponse {
            model: args.model,
            query_id,
            query_text,
            languages,
        };

        let mut output = io::BufWriter::new(io::stdout().lock());
        serde_json::to_writer_pretty(&mut output, &response)
            .context("failed to serialize show json output")?;
        writeln!(output)?;
        output.flush()?;
        return Ok(());
    }

    write_text_response(&args.model, &query_id, &query_text, &languages)
}

fn write_text_response(
    model: &str,
    query_id: &QueryId,
    query_text: &str,
    languages: &[LanguageCell],
) -> Result<()> {
    let mut output = io::BufWriter::new(io::stdout().lock());

    writeln!(output, "Model: {model}")?;
    writeln!(output, "Query {query_id}: {query_text}")?;

    for cell in languages {
        writeln!(output)?;
        writeln!(output, "[{}]", cell.display_name)?;

        match &cell.response {
            Some(response) => {
                writeln!(output, "{}", response.answer)?;
                let scores = response
                    .scores
                    .iter()
                    .map(|score| format!("{}={}", score.label, score.display))
                    .collect::<Vec<String>>()
                    .join(" ");
                writeln!(output, "\tscores: {scores}")?;
            }
            None => {
                writeln!(output, "\t(no response found for {})", cell.language)?;
            }
        }
    }

    output.flush()?;
    Ok(())
}
