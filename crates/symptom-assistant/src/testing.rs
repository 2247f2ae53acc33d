//! Deterministic embedders for tests that must not download a model.
use async_trait::async_trait;

use assistant_common::embedding::Embed;
use assistant_common::error::CommonError;

/// Bag-of-keywords embedder: one dimension per vocabulary word, 1.0 when the word occurs.
/// Text containing none of the words embeds to the zero vector.
pub struct KeywordEmbedder {
    vocabulary: Vec<String>,
}

impl KeywordEmbedder {
    pub fn new(vocabulary: &[&str]) -> Self {
        Self {
            vocabulary: vocabulary.iter().map(|w| w.to_lowercase()).collect(),
        }
    }

    fn encode(&self, text: &str) -> Vec<f32> {
        let lowered = text.to_lowercase();
        self.vocabulary
            .iter()
            .map(|w| if lowered.contains(w.as_str()) { 1.0 } else { 0.0 })
            .collect()
    }
}

#[async_trait]
impl Embed for KeywordEmbedder {
    async fn embed_batch(&self, texts: &[String]) -> Result<Vec<Vec<f32>>, CommonError> {
        Ok(texts.iter().map(|t| self.encode(t)).collect())
    }

    fn dimensions(&self) -> usize {
        self.vocabulary.len()
    }
}

/// Fails every call, standing in for an unavailable model.
pub struct BrokenEmbedder;

#[async_trait]
impl Embed for BrokenEmbedder {
    async fn embed_batch(&self, _texts: &[String]) -> Result<Vec<Vec<f32>>, CommonError> {
        Err(CommonError::Embedding("model unavailable".to_string()))
    }

    fn dimensions(&self) -> usize {
        4
    }
}
