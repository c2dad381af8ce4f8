use rand::Rng;
use rand::seq::SliceRandom;
use serde::Serialize;

use crate::config::{
    MISSING_SCORE_PLACEHOLDER, QUERY_LABEL_MAX_CHARS, TARGET_LANGUAGES, truncate_label,
};
use crate::index::CorpusIndex;
use crate::model::{QueryId, ResponseRecord};

/// Read-only view over a fully ingested corpus. This is the only surface
/// the command layer consults; the mutable index never leaves the
/// ingestion coordinator.
#[derive(Debug)]
pub struct EvalCorpus {
    index: CorpusIndex,
}

/// One browsable query: identity, truncated list label, full text.
#[derive(Debug, Clone, Serialize)]
pub struct QueryEntry {
    pub id: QueryId,
    pub label: String,
    pub full_text: String,
}

#[derive(Debug, Clone, Serialize)]
pub struct ScoreCell {
    pub label: &'static str,
    pub value: Option<f64>,
    pub display: String,
}

#[derive(Debug, Clone, Serialize)]
pub struct ResponseCell {
    pub answer: String,
    pub scores: Vec<ScoreCell>,
}

/// One panel slot: a configured target language with either a rendered
/// response or an explicit no-response marker.
#[derive(Debug, Clone, Serialize)]
pub struct LanguageCell {
    pub language: &'static str,
    pub display_name: &'static str,
    pub response: Option<ResponseCell>,
}

impl EvalCorpus {
    pub(crate) fn new(index: CorpusIndex) -> Self {
        Self { index }
    }

    /// Known model names, lexicographically sorted.
    pub fn models(&self) -> Vec<&str> {
        self.index.models().collect()
    }

    /// Browsable queries sorted by identity, labels truncated for list
    /// views.
    pub fn query_entries(&self) -> Vec<QueryEntry> {
        self.index
            .query_ids()
            .map(|id| {
                let full_text = self.index.canonical_text(id);
                QueryEntry {
                    id: id.clone(),
                    label: truncate_label(&full_text, QUERY_LABEL_MAX_CHARS),
                    full_text,
                }
            })
            .collect()
    }

    pub fn canonical_text(&self, query_id: &QueryId) -> String {
        self.index.canonical_text(query_id)
    }

    /// All records under one (model, query id, language) key, in insertion
    /// order. Unknown selections read as empty.
    #[allow(dead_code)]
    pub fn lookup(&self, model: &str, query_id: &QueryId, language: &str) -> &[ResponseRecord] {
        self.index.lookup(model, query_id, language)
    }

    /// Samples one response from the bucket: `None` when empty, the sole
    /// record when singular, otherwise uniformly at random among the bucket
    /// on every call. Deliberately non-deterministic; repeat calls may
    /// return different records and nothing is cached.
    #[allow(dead_code)]
    pub fn select_response(
        &self,
        model: &str,
        query_id: &QueryId,
        language: &str,
    ) -> Option<&ResponseRecord> {
        self.select_response_with(&mut rand::thread_rng(), model, query_id, language)
    }

    /// `select_response` with a caller-supplied RNG, for seeded sampling.
    pub fn select_response_with<R: Rng + ?Sized>(
        &self,
        rng: &mut R,
        model: &str,
        query_id: &QueryId,
        language: &str,
    ) -> Option<&ResponseRecord> {
        self.index.lookup(model, query_id, language).choose(rng)
    }

    /// Source label the model's dataset was first observed in, for the
    /// download affordance.
    pub fn source_for(&self, model: &str) -> Option<&str> {
        self.index.source_for(model)
    }

    /// One cell per configured target language, in fixed panel order. An
    /// unknown model or query yields a panel of no-response cells, not an
    /// error.
    pub fn language_panel(&self, model: &str, query_id: &QueryId) -> Vec<LanguageCell> {
        self.language_panel_with(&mut rand::thread_rng(), model, query_id)
    }

    pub fn language_panel_with<R: Rng + ?Sized>(
        &self,
        rng: &mut R,
        model: &str,
        query_id: &QueryId,
    ) -> Vec<LanguageCell> {
        TARGET_LANGUAGES
            .iter()
            .map(|&(language, display_name)| LanguageCell {
                language,
                display_name,
                response: self
                    .select_response_with(rng, model, query_id, language)
                    .map(render_response),
            })
            .collect()
    }
}

fn render_response(record: &ResponseRecord) -> ResponseCell {
    let scores = record
        .scores
        .iter()
        .map(|(criterion, value)| ScoreCell {
            label: criterion.label(),
            value,
            display: match value {
                Some(score) => format!("{score}"),
                None => MISSING_SCORE_PLACEHOLDER.to_string(),
            },
        })
        .collect();

    ResponseCell {
        answer: record.answer.clone(),
        scores,
    }
}
