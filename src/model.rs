use std::fmt;

use serde::{Deserialize, Serialize};

/// Identity shared by translated variants of the same question. Source data
/// uses small integers, but textual ids are accepted so the corpus does not
/// depend on numeric-only keys. Numeric ids order numerically ahead of
/// textual ids, which order lexically.
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(untagged)]
pub enum QueryId {
    Num(i64),
    Text(String),
}

impl QueryId {
    /// Parses a raw `index` cell. Whitespace is trimmed; an empty cell is
    /// not a valid identity.
    pub fn parse(raw: &str) -> Option<Self> {
        let trimmed = raw.trim();
        if trimmed.is_empty() {
            return None;
        }

        match trimmed.parse::<i64>() {
            Ok(value) => Some(Self::Num(value)),
            Err(_) => Some(Self::Text(trimmed.to_string())),
        }
    }
}

impl fmt::Display for QueryId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Num(value) => write!(f, "{value}"),
            Self::Text(value) => write!(f, "{value}"),
        }
    }
}

/// The fixed scoring criteria, in panel order.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub enum Criterion {
    DetailAndCompleteness,
    LinguisticQuality,
    FactualCorrectness,
    Actionability,
    Riskiness,
    Overall,
}

impl Criterion {
    pub const ALL: [Self; 6] = [
        Self::DetailAndCompleteness,
        Self::LinguisticQuality,
        Self::FactualCorrectness,
        Self::Actionability,
        Self::Riskiness,
        Self::Overall,
    ];

    /// Column name in the source datasets.
    pub fn column(self) -> &'static str {
        match self {
            Self::DetailAndCompleteness => "Detail and Completeness",
            Self::LinguisticQuality => "Linguistic Quality",
            Self::FactualCorrectness => "Factual Correctness",
            Self::Actionability => "Actionability",
            Self::Riskiness => "Riskiness",
            Self::Overall => "Overall",
        }
    }

    /// Short label used when rendering score panels.
    pub fn label(self) -> &'static str {
        match self {
            Self::DetailAndCompleteness => "Detail",
            Self::LinguisticQuality => "Linguistic",
            Self::FactualCorrectness => "Factual",
            Self::Actionability => "Actionability",
            Self::Riskiness => "Riskiness",
            Self::Overall => "Overall",
        }
    }
}

/// Per-criterion quality scores. A blank or non-numeric source cell is an
/// absent score, never zero.
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct ScoreCard {
    pub detail_and_completeness: Option<f64>,
    pub linguistic_quality: Option<f64>,
    pub factual_correctness: Option<f64>,
    pub actionability: Option<f64>,
    pub riskiness: Option<f64>,
    pub overall: Option<f64>,
}

impl ScoreCard {
    pub fn get(&self, criterion: Criterion) -> Option<f64> {
        match criterion {
            Criterion::DetailAndCompleteness => self.detail_and_completeness,
            Criterion::LinguisticQuality => self.linguistic_quality,
            Criterion::FactualCorrectness => self.factual_correctness,
            Criterion::Actionability => self.actionability,
            Criterion::Riskiness => self.riskiness,
            Criterion::Overall => self.overall,
        }
    }

    pub fn set(&mut self, criterion: Criterion, value: Option<f64>) {
        let slot = match criterion {
            Criterion::DetailAndCompleteness => &mut self.detail_and_completeness,
            Criterion::LinguisticQuality => &mut self.linguistic_quality,
            Criterion::FactualCorrectness => &mut self.factual_correctness,
            Criterion::Actionability => &mut self.actionability,
            Criterion::Riskiness => &mut self.riskiness,
            Criterion::Overall => &mut self.overall,
        };
        *slot = value;
    }

    /// Scores in fixed criterion order.
    pub fn iter(&self) -> impl Iterator<Item = (Criterion, Option<f64>)> + '_ {
        Criterion::ALL
            .into_iter()
            .map(move |criterion| (criterion, self.get(criterion)))
    }
}

/// One evaluated answer from one source dataset.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ResponseRecord {
    pub model: String,
    pub query_id: QueryId,
    /// The question as asked in this record's own language.
    pub query_text: String,
    /// Lower-cased language token; may fall outside the display set.
    pub language: String,
    pub answer: String,
    pub scores: ScoreCard,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SourceEntry {
    pub filename: String,
    /// Model label derived from the filename convention.
    pub label: String,
    pub sha256: String,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SourcesManifest {
    pub manifest_version: u32,
    pub generated_at: String,
    pub source_directory: String,
    pub source_count: usize,
    pub sources: Vec<SourceEntry>,
}

/// Per-source row accounting for one ingest run.
#[derive(Debug, Clone, Serialize)]
pub struct SourceCounts {
    pub label: String,
    pub filename: String,
    pub rows_seen: usize,
    pub rows_ingested: usize,
    pub rows_rejected: usize,
}

#[derive(Debug, Clone, Serialize)]
pub struct IngestReport {
    pub run_id: String,
    pub generated_at: String,
    pub source_count: usize,
    pub model_count: usize,
    pub query_count: usize,
    pub rows_seen: usize,
    pub rows_ingested: usize,
    pub rows_rejected: usize,
    pub sources: Vec<SourceCounts>,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn query_id_parse_distinguishes_numeric_and_textual() {
        assert_eq!(QueryId::parse("7"), Some(QueryId::Num(7)));
        assert_eq!(QueryId::parse(" 12 "), Some(QueryId::Num(12)));
        assert_eq!(
            QueryId::parse("q-12"),
            Some(QueryId::Text("q-12".to_string()))
        );
        assert_eq!(QueryId::parse("   "), None);
        assert_eq!(QueryId::parse(""), None);
    }

    #[test]
    fn query_id_orders_numeric_before_textual() {
        let mut ids = vec![
            QueryId::Text("alpha".to_string()),
            QueryId::Num(10),
            QueryId::Num(2),
            QueryId::Text("Beta".to_string()),
        ];
        ids.sort();

        assert_eq!(
            ids,
            vec![
                QueryId::Num(2),
                QueryId::Num(10),
                QueryId::Text("Beta".to_string()),
                QueryId::Text("alpha".to_string()),
            ]
        );
    }

    #[test]
    fn score_card_roundtrips_by_criterion() {
        let mut scores = ScoreCard::default();
        scores.set(Criterion::Overall, Some(8.0));
        scores.set(Criterion::Riskiness, None);

        assert_eq!(scores.get(Criterion::Overall), Some(8.0));
        assert_eq!(scores.get(Criterion::Riskiness), None);
        assert_eq!(scores.iter().count(), 6);
    }
}
