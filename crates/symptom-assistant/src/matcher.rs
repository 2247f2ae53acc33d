use std::sync::Arc;

use tracing::debug;

use assistant_common::embedding::Embed;
use assistant_common::similarity::{argmax, cosine_similarity};

use crate::error::AppError;
use crate::index::SymptomContext;
use crate::model::CatalogRecord;

/// Minimum cosine similarity (exclusive) for a semantic match to be accepted.
pub const SIMILARITY_THRESHOLD: f32 = 0.6;

#[derive(Debug, Clone, Copy, PartialEq)]
pub enum MatchResult<'a> {
    /// The record's symptom occurs verbatim (case-insensitively) in the input.
    Exact(&'a CatalogRecord),
    /// Nearest record by embedding similarity, above `SIMILARITY_THRESHOLD`.
    Semantic { record: &'a CatalogRecord, score: f32 },
    NoMatch,
}

impl<'a> MatchResult<'a> {
    pub fn record(&self) -> Option<&'a CatalogRecord> {
        match self {
            Self::Exact(record) | Self::Semantic { record, .. } => Some(record),
            Self::NoMatch => None,
        }
    }

    pub fn kind(&self) -> &'static str {
        match self {
            Self::Exact(_) => "exact",
            Self::Semantic { .. } => "semantic",
            Self::NoMatch => "none",
        }
    }
}

pub struct Matcher {
    context: Arc<SymptomContext>,
    embedder: Arc<dyn Embed>,
}

impl Matcher {
    pub fn new(context: Arc<SymptomContext>, embedder: Arc<dyn Embed>) -> Self {
        Self { context, embedder }
    }

    /// Exact step, then semantic step.
    pub async fn find(&self, input: &str) -> Result<MatchResult<'_>, AppError> {
        if let Some(record) = self.exact_match(input) {
            return Ok(MatchResult::Exact(record));
        }
        self.semantic_match(input).await
    }

    /// First record, in catalog order, whose symptom is a case-insensitive substring of `input`.
    pub fn exact_match(&self, input: &str) -> Option<&CatalogRecord> {
        let haystack = input.to_lowercase();
        let idx = self
            .context
            .folded_symptoms()
            .iter()
            .position(|symptom| haystack.contains(symptom.as_str()))?;
        self.context.catalog().get(idx)
    }

    pub async fn semantic_match(&self, input: &str) -> Result<MatchResult<'_>, AppError> {
        let query = self.embedder.embed_one(input).await?;
        let scores: Vec<f32> = self
            .context
            .index()
            .vectors()
            .iter()
            .map(|v| cosine_similarity(&query, v).unwrap_or(f32::NEG_INFINITY))
            .collect();

        let Some((best_idx, best_score)) = argmax(&scores) else {
            return Ok(MatchResult::NoMatch);
        };
        debug!(best_idx, best_score, "semantic match candidate");

        if best_score > SIMILARITY_THRESHOLD {
            if let Some(record) = self.context.catalog().get(best_idx) {
                return Ok(MatchResult::Semantic {
                    record,
                    score: best_score,
                });
            }
        }
        Ok(MatchResult::NoMatch)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::catalog::Catalog;
    use crate::testing::{BrokenEmbedder, KeywordEmbedder};

    const VOCAB: &[&str] = &["fever", "cough", "tired", "energy", "weight", "pain"];

    fn catalog() -> Catalog {
        Catalog::new(vec![
            CatalogRecord::new("fever", "Flu", "Rest and hydrate"),
            CatalogRecord::new("Cough", "Common cold", "Drink warm fluids"),
            CatalogRecord::new("tired and low energy", "Fatigue", "Sleep well"),
            CatalogRecord::new("fever and cough", "Bronchitis", "See a doctor"),
        ])
        .expect("non-empty")
    }

    async fn matcher() -> Matcher {
        let embedder: Arc<dyn Embed> = Arc::new(KeywordEmbedder::new(VOCAB));
        let context = SymptomContext::build(catalog(), embedder.as_ref())
            .await
            .expect("context");
        Matcher::new(Arc::new(context), embedder)
    }

    #[tokio::test]
    async fn exact_match_is_case_insensitive_substring() {
        let m = matcher().await;
        let record = m.exact_match("I have a FEVER and chills").expect("match");
        assert_eq!(record.possible_condition, "Flu");
        assert_eq!(m.exact_match("bad cough lately").map(|r| r.symptom.as_str()), Some("Cough"));
    }

    #[tokio::test]
    async fn exact_match_first_in_catalog_order_wins() {
        let m = matcher().await;
        // Both "fever" and "fever and cough" occur; "fever" comes first in the catalog.
        let record = m.exact_match("fever and cough since monday").expect("match");
        assert_eq!(record.possible_condition, "Flu");
    }

    #[tokio::test]
    async fn semantic_match_above_threshold() {
        let m = matcher().await;
        // keywords {tired, energy} equal the third record's vector exactly
        let result = m
            .find("I feel very tired and have no energy")
            .await
            .expect("find");
        match result {
            MatchResult::Semantic { record, score } => {
                assert_eq!(record.possible_condition, "Fatigue");
                assert!(score > SIMILARITY_THRESHOLD);
            }
            other => panic!("expected semantic match, got {other:?}"),
        }
    }

    #[tokio::test]
    async fn semantic_match_below_threshold_is_no_match() {
        let m = matcher().await;
        // {tired, weight, pain} vs {tired, energy}: 1 / (sqrt(3) * sqrt(2)) ~= 0.41
        let result = m.semantic_match("tired, weight gain, back pain").await.expect("match");
        assert_eq!(result, MatchResult::NoMatch);
    }

    #[tokio::test]
    async fn semantic_match_exactly_at_threshold_is_no_match() {
        let vocab = ["ache", "chills", "nausea", "rash", "itch", "swelling", "cramp"];
        let embedder: Arc<dyn Embed> = Arc::new(KeywordEmbedder::new(&vocab));
        let catalog = Catalog::new(vec![CatalogRecord::new(
            "ache chills nausea rash itch",
            "Viral infection",
            "Rest and monitor",
        )])
        .expect("non-empty");
        let context = SymptomContext::build(catalog, embedder.as_ref())
            .await
            .expect("context");
        let m = Matcher::new(Arc::new(context), embedder.clone());

        // 5 keywords each, 3 shared: 3 / (sqrt(5) * sqrt(5)) == 0.6
        let input = "ache, chills, nausea, swelling and cramp";
        let query = embedder.embed_one(input).await.expect("embed");
        let score = cosine_similarity(&query, &m.context.index().vectors()[0]).expect("score");
        assert!((score - SIMILARITY_THRESHOLD).abs() < 1e-6, "got {score}");

        assert_eq!(m.exact_match(input), None);
        let result = m.semantic_match(input).await.expect("match");
        assert_eq!(result, MatchResult::NoMatch);
    }

    #[tokio::test]
    async fn unrelated_input_is_no_match() {
        let m = matcher().await;
        let result = m.find("I have a rash").await.expect("find");
        assert_eq!(result, MatchResult::NoMatch);
        assert_eq!(result.record(), None);
        assert_eq!(result.kind(), "none");
    }

    #[tokio::test]
    async fn exact_step_runs_before_semantic() {
        let m = matcher().await;
        let result = m.find("my fever is back").await.expect("find");
        assert_eq!(result.kind(), "exact");
    }

    #[tokio::test]
    async fn query_embedding_failure_propagates() {
        let keyword: Arc<dyn Embed> = Arc::new(KeywordEmbedder::new(VOCAB));
        let context = SymptomContext::build(catalog(), keyword.as_ref())
            .await
            .expect("context");
        let m = Matcher::new(Arc::new(context), Arc::new(BrokenEmbedder));
        assert!(m.semantic_match("anything").await.is_err());
    }
}
