use tracing::info;

use assistant_common::embedding::Embed;
use assistant_common::error::CommonError;

use crate::catalog::Catalog;
use crate::error::AppError;

/// One embedding per catalog record, aligned by row index.
#[derive(Debug, Clone)]
pub struct EmbeddingIndex {
    vectors: Vec<Vec<f32>>,
    dimensions: usize,
}

impl EmbeddingIndex {
    /// Embed every catalog symptom with `embedder`.
    ///
    /// Fails if the embedder returns the wrong number of vectors or any vector whose length
    /// differs from `embedder.dimensions()`.
    pub async fn build(catalog: &Catalog, embedder: &dyn Embed) -> Result<Self, AppError> {
        let texts = catalog.symptoms();
        let vectors = embedder.embed_batch(&texts).await?;
        if vectors.len() != catalog.len() {
            return Err(AppError::Index(format!(
                "embedder returned {} vectors for {} catalog records",
                vectors.len(),
                catalog.len()
            )));
        }

        let dimensions = embedder.dimensions();
        if let Some(bad) = vectors.iter().find(|v| v.len() != dimensions) {
            return Err(CommonError::DimensionMismatch {
                expected: dimensions,
                actual: bad.len(),
            }
            .into());
        }

        Ok(Self {
            vectors,
            dimensions,
        })
    }

    pub fn vectors(&self) -> &[Vec<f32>] {
        &self.vectors
    }

    pub fn dimensions(&self) -> usize {
        self.dimensions
    }
}

/// Immutable catalog plus its embedding index, built once at startup and shared read-only.
#[derive(Debug, Clone)]
pub struct SymptomContext {
    catalog: Catalog,
    index: EmbeddingIndex,
    folded_symptoms: Vec<String>,
}

impl SymptomContext {
    pub async fn build(catalog: Catalog, embedder: &dyn Embed) -> Result<Self, AppError> {
        let index = EmbeddingIndex::build(&catalog, embedder).await?;
        info!(
            records = catalog.len(),
            dimensions = index.dimensions(),
            "symptom index built"
        );
        let folded_symptoms = catalog
            .records()
            .iter()
            .map(|r| r.symptom.to_lowercase())
            .collect();
        Ok(Self {
            catalog,
            index,
            folded_symptoms,
        })
    }

    pub fn catalog(&self) -> &Catalog {
        &self.catalog
    }

    pub fn index(&self) -> &EmbeddingIndex {
        &self.index
    }

    /// Lowercased catalog symptoms, aligned with the catalog by row index.
    pub fn folded_symptoms(&self) -> &[String] {
        &self.folded_symptoms
    }
}
