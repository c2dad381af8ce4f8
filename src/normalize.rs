use crate::model::{Criterion, QueryId, ResponseRecord, ScoreCard};
use crate::table::Row;

/// Turns one raw row into a validated record, or rejects it. Rejection is
/// silent here; the ingestion coordinator counts rejects per source.
///
/// A row is rejected when `model`, `query`, `language` or `index` is absent
/// or empty. The language is lower-cased but not checked against the display
/// set, so the index stays a superset of what rendering iterates.
pub fn normalize_row(row: Row<'_>) -> Option<ResponseRecord> {
    let model = required_field(row, "model")?;
    let query_text = required_field(row, "query")?;
    let language = required_field(row, "language")?.to_lowercase();
    let query_id = QueryId::parse(row.get("index")?)?;

    let answer = row.get("answer").unwrap_or_default().to_string();

    let mut scores = ScoreCard::default();
    for criterion in Criterion::ALL {
        scores.set(criterion, parse_score(row.get(criterion.column())));
    }

    Some(ResponseRecord {
        model,
        query_id,
        query_text,
        language,
        answer,
        scores,
    })
}

fn required_field(row: Row<'_>, column: &str) -> Option<String> {
    let value = row.get(column)?.trim();
    if value.is_empty() {
        return None;
    }
    Some(value.to_string())
}

/// Loose numeric coercion for score cells: blank or non-numeric reads as
/// absent, never as zero.
fn parse_score(raw: Option<&str>) -> Option<f64> {
    let trimmed = raw?.trim();
    if trimmed.is_empty() {
        return None;
    }
    trimmed.parse::<f64>().ok()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::table::Table;

    const HEADER: &str =
        "model,query,language,index,answer,Detail and Completeness,Linguistic Quality,Factual Correctness,Actionability,Riskiness,Overall";

    fn normalize_first(csv: &str) -> Option<ResponseRecord> {
        let table = Table::parse(csv).expect("test csv parses");
        let row = table.rows().next().expect("test csv has a row");
        normalize_row(row)
    }

    #[test]
    fn valid_row_produces_typed_record() {
        let csv = format!("{HEADER}\nm1,What is X?,English,1,X is...,7,8,9,6,2,8\n");
        let record = normalize_first(&csv).expect("row is valid");

        assert_eq!(record.model, "m1");
        assert_eq!(record.query_text, "What is X?");
        assert_eq!(record.language, "english");
        assert_eq!(record.query_id, QueryId::Num(1));
        assert_eq!(record.answer, "X is...");
        assert_eq!(record.scores.get(Criterion::Overall), Some(8.0));
        assert_eq!(record.scores.get(Criterion::Riskiness), Some(2.0));
    }

    #[test]
    fn rows_missing_required_fields_are_rejected() {
        let missing_model = format!("{HEADER}\n,What is X?,english,1,answer,,,,,,\n");
        let missing_query = format!("{HEADER}\nm1,,english,1,answer,,,,,,\n");
        let missing_language = format!("{HEADER}\nm1,What is X?, ,1,answer,,,,,,\n");
        let missing_index = format!("{HEADER}\nm1,What is X?,english,,answer,,,,,,\n");

        assert!(normalize_first(&missing_model).is_none());
        assert!(normalize_first(&missing_query).is_none());
        assert!(normalize_first(&missing_language).is_none());
        assert!(normalize_first(&missing_index).is_none());
    }

    #[test]
    fn blank_and_junk_scores_read_as_absent() {
        let csv = format!("{HEADER}\nm1,What is X?,english,1,answer, ,n/a,9.5,,3,\n");
        let record = normalize_first(&csv).expect("row is valid");

        assert_eq!(record.scores.get(Criterion::DetailAndCompleteness), None);
        assert_eq!(record.scores.get(Criterion::LinguisticQuality), None);
        assert_eq!(record.scores.get(Criterion::FactualCorrectness), Some(9.5));
        assert_eq!(record.scores.get(Criterion::Actionability), None);
        assert_eq!(record.scores.get(Criterion::Riskiness), Some(3.0));
        assert_eq!(record.scores.get(Criterion::Overall), None);
    }

    #[test]
    fn unknown_language_is_still_admitted() {
        let csv = format!("{HEADER}\nm1,What is X?,Klingon,1,answer,,,,,,\n");
        let record = normalize_first(&csv).expect("row is valid");
        assert_eq!(record.language, "klingon");
    }

    #[test]
    fn textual_identity_is_accepted() {
        let csv = format!("{HEADER}\nm1,What is X?,english,q-7,answer,,,,,,\n");
        let record = normalize_first(&csv).expect("row is valid");
        assert_eq!(record.query_id, QueryId::Text("q-7".to_string()));
    }

    #[test]
    fn missing_answer_column_defaults_to_empty() {
        let csv = "model,query,language,index\nm1,What is X?,english,1\n";
        let record = normalize_first(csv).expect("row is valid");
        assert_eq!(record.answer, "");
    }
}
