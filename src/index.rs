use std::collections::{BTreeSet, HashMap};

use crate::config::REFERENCE_LANGUAGE;
use crate::model::{QueryId, ResponseRecord};

/// Mutable accumulator for normalized records, keyed
/// model → query id → language → insertion-ordered bucket, with the
/// auxiliary registries the read surface is built from. Owned by the
/// ingestion coordinator while loading; frozen into `EvalCorpus` afterwards
/// and never exposed mutable beyond that point.
#[derive(Debug, Default)]
pub struct CorpusIndex {
    responses: HashMap<String, HashMap<QueryId, HashMap<String, Vec<ResponseRecord>>>>,
    models: BTreeSet<String>,
    query_ids: BTreeSet<QueryId>,
    canonical_text: HashMap<QueryId, String>,
    source_by_model: HashMap<String, String>,
}

impl CorpusIndex {
    pub fn new() -> Self {
        Self::default()
    }

    /// Appends `record` to its (model, query id, language) bucket, creating
    /// intermediate levels on first use, and registers the model and query
    /// identity. Buckets keep every record in insertion order; duplicates
    /// under one key are all retained as selection candidates.
    pub fn insert(&mut self, record: ResponseRecord, source_label: &str) {
        self.models.insert(record.model.clone());
        self.query_ids.insert(record.query_id.clone());

        // A model keeps the source it was first observed in.
        self.source_by_model
            .entry(record.model.clone())
            .or_insert_with(|| source_label.to_string());

        // Reference-language text is preferred as the display string, but
        // only when it arrives before any other language has filled the
        // slot; the first text recorded for an identity is never replaced.
        if record.language == REFERENCE_LANGUAGE
            || !self.canonical_text.contains_key(&record.query_id)
        {
            self.canonical_text
                .entry(record.query_id.clone())
                .or_insert_with(|| record.query_text.clone());
        }

        self.responses
            .entry(record.model.clone())
            .or_default()
            .entry(record.query_id.clone())
            .or_default()
            .entry(record.language.clone())
            .or_default()
            .push(record);
    }

    /// The bucket for one (model, query id, language) key, in insertion
    /// order. Unknown keys at any level read as empty, never as an error.
    pub fn lookup(&self, model: &str, query_id: &QueryId, language: &str) -> &[ResponseRecord] {
        self.responses
            .get(model)
            .and_then(|queries| queries.get(query_id))
            .and_then(|languages| languages.get(language))
            .map(Vec::as_slice)
            .unwrap_or(&[])
    }

    /// Known model names, lexicographically sorted, deduplicated.
    pub fn models(&self) -> impl Iterator<Item = &str> {
        self.models.iter().map(String::as_str)
    }

    /// Known query identities in natural order (numeric ids numerically,
    /// ahead of textual ids lexically), deduplicated.
    pub fn query_ids(&self) -> impl Iterator<Item = &QueryId> {
        self.query_ids.iter()
    }

    /// Canonical display text for an identity. Falls back to a synthesized
    /// label for an identity no text was ever recorded for; insertion
    /// preconditions make that unreachable through normal loading, but the
    /// result is still defined.
    pub fn canonical_text(&self, query_id: &QueryId) -> String {
        self.canonical_text
            .get(query_id)
            .cloned()
            .unwrap_or_else(|| format!("Query {query_id}"))
    }

    /// Source label the model was first observed in.
    pub fn source_for(&self, model: &str) -> Option<&str> {
        self.source_by_model.get(model).map(String::as_str)
    }

    pub fn model_count(&self) -> usize {
        self.models.len()
    }

    pub fn query_count(&self) -> usize {
        self.query_ids.len()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::ScoreCard;

    fn record(model: &str, id: i64, language: &str, query_text: &str) -> ResponseRecord {
        ResponseRecord {
            model: model.to_string(),
            query_id: QueryId::Num(id),
            query_text: query_text.to_string(),
            language: language.to_string(),
            answer: format!("{model} answer in {language}"),
            scores: ScoreCard::default(),
        }
    }

    #[test]
    fn lookup_returns_bucket_in_insertion_order() {
        let mut index = CorpusIndex::new();
        let mut first = record("m1", 1, "english", "What is X?");
        first.answer = "first".to_string();
        let mut second = record("m1", 1, "english", "What is X?");
        second.answer = "second".to_string();

        index.insert(first, "s1.csv");
        index.insert(second, "s1.csv");

        let bucket = index.lookup("m1", &QueryId::Num(1), "english");
        assert_eq!(bucket.len(), 2);
        assert_eq!(bucket[0].answer, "first");
        assert_eq!(bucket[1].answer, "second");
    }

    #[test]
    fn lookup_on_unknown_keys_is_empty_not_an_error() {
        let mut index = CorpusIndex::new();
        index.insert(record("m1", 1, "english", "What is X?"), "s1.csv");

        assert!(index.lookup("m1", &QueryId::Num(1), "swahili").is_empty());
        assert!(index.lookup("m1", &QueryId::Num(2), "english").is_empty());
        assert!(index.lookup("ghost", &QueryId::Num(1), "english").is_empty());
    }

    #[test]
    fn canonical_text_keeps_the_first_writer() {
        let mut index = CorpusIndex::new();
        index.insert(record("m1", 1, "hindi", "A"), "s1.csv");
        index.insert(record("m1", 1, "english", "B"), "s1.csv");

        // The reference language does not retroactively override.
        assert_eq!(index.canonical_text(&QueryId::Num(1)), "A");
    }

    #[test]
    fn canonical_text_prefers_reference_language_when_it_arrives_first() {
        let mut index = CorpusIndex::new();
        index.insert(record("m1", 2, "english", "What is Y?"), "s1.csv");
        index.insert(record("m2", 2, "hindi", "Y kya hai?"), "s2.csv");

        assert_eq!(index.canonical_text(&QueryId::Num(2)), "What is Y?");
    }

    #[test]
    fn canonical_text_falls_back_to_synthesized_label() {
        let index = CorpusIndex::new();
        assert_eq!(index.canonical_text(&QueryId::Num(9)), "Query 9");
    }

    #[test]
    fn model_source_mapping_is_first_wins() {
        let mut index = CorpusIndex::new();
        index.insert(record("m1", 1, "english", "What is X?"), "s1.csv");
        index.insert(record("m1", 2, "english", "What is Y?"), "s2.csv");

        assert_eq!(index.source_for("m1"), Some("s1.csv"));
        assert_eq!(index.source_for("ghost"), None);
    }

    #[test]
    fn models_are_sorted_and_deduplicated() {
        let mut index = CorpusIndex::new();
        index.insert(record("zeta", 1, "english", "What is X?"), "s1.csv");
        index.insert(record("alpha", 1, "hindi", "X kya hai?"), "s2.csv");
        index.insert(record("zeta", 2, "english", "What is Y?"), "s1.csv");

        let models: Vec<_> = index.models().collect();
        assert_eq!(models, ["alpha", "zeta"]);
    }

    #[test]
    fn query_ids_are_sorted_and_reads_are_idempotent() {
        let mut index = CorpusIndex::new();
        index.insert(record("m1", 5, "english", "What is X?"), "s1.csv");
        index.insert(record("m2", 2, "english", "What is Y?"), "s2.csv");
        index.insert(record("m1", 5, "hindi", "X kya hai?"), "s1.csv");

        let first: Vec<_> = index.query_ids().cloned().collect();
        let second: Vec<_> = index.query_ids().cloned().collect();
        assert_eq!(first, vec![QueryId::Num(2), QueryId::Num(5)]);
        assert_eq!(first, second);

        assert_eq!(
            index.canonical_text(&QueryId::Num(5)),
            index.canonical_text(&QueryId::Num(5))
        );
    }
}
