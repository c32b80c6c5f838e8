// piiredact/src/semantic.rs
//! Semantic flag adapter: advisory topical-risk scoring of the whole input
//! against configured sensitive-topic exemplars.
//!
//! The similarity capability is injected as a [`SemanticScorer`] trait
//! object owned by the surrounding system, not a hidden process-wide
//! singleton. This stage never influences redaction; internally it returns
//! typed results, and the engine flattens any failure to an empty flag list
//! at the public boundary.

use log::debug;
use once_cell::sync::OnceCell;
use std::sync::Arc;

use crate::analysis::SemanticFlag;
use crate::config::SemanticConfig;
use crate::errors::SemanticError;

/// An external embedding capability with ranked-similarity semantics.
///
/// Implementations map text to a fixed-dimension vector. They must be safe
/// to call concurrently; the adapter treats the handle as read-only after
/// construction.
pub trait SemanticScorer: Send + Sync {
    /// Embeds `text` into a similarity vector.
    fn embed(&self, text: &str) -> Result<Vec<f32>, SemanticError>;
}

/// Cosine similarity between two vectors.
/// Returns 0.0 for zero-length, mismatched, or zero-magnitude vectors.
pub fn cosine_similarity(a: &[f32], b: &[f32]) -> f32 {
    if a.len() != b.len() || a.is_empty() {
        return 0.0;
    }
    let (mut dot, mut mag_a, mut mag_b) = (0.0f64, 0.0f64, 0.0f64);
    for (x, y) in a.iter().zip(b.iter()) {
        let (x, y) = (*x as f64, *y as f64);
        dot += x * y;
        mag_a += x * x;
        mag_b += y * y;
    }
    let denom = mag_a.sqrt() * mag_b.sqrt();
    if denom < f64::EPSILON {
        0.0
    } else {
        (dot / denom).clamp(-1.0, 1.0) as f32
    }
}

/// Scores whole inputs against a fixed exemplar list through an injected
/// [`SemanticScorer`].
///
/// Exemplar embeddings are computed once, on first use: the first caller
/// pays the initialization cost, concurrent callers observe either nothing
/// or the fully initialized set (`OnceCell` guarantees no double
/// initialization and no partially built value).
pub struct SemanticFlagAdapter {
    scorer: Arc<dyn SemanticScorer>,
    exemplars: Vec<String>,
    threshold: f32,
    exemplar_embeddings: OnceCell<Vec<Vec<f32>>>,
}

impl std::fmt::Debug for SemanticFlagAdapter {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("SemanticFlagAdapter")
            .field("exemplars", &self.exemplars)
            .field("threshold", &self.threshold)
            .field("initialized", &self.exemplar_embeddings.get().is_some())
            .finish()
    }
}

impl SemanticFlagAdapter {
    pub fn new(scorer: Arc<dyn SemanticScorer>, config: &SemanticConfig) -> Self {
        Self {
            scorer,
            exemplars: config.exemplars.clone(),
            threshold: config.threshold,
            exemplar_embeddings: OnceCell::new(),
        }
    }

    fn exemplar_embeddings(&self) -> Result<&Vec<Vec<f32>>, SemanticError> {
        self.exemplar_embeddings.get_or_try_init(|| {
            debug!(
                "[piiredact::semantic] Embedding {} exemplars (one-time initialization)",
                self.exemplars.len()
            );
            self.exemplars
                .iter()
                .map(|exemplar| {
                    let embedding = self.scorer.embed(exemplar)?;
                    if embedding.is_empty() {
                        return Err(SemanticError::EmptyEmbedding);
                    }
                    Ok(embedding)
                })
                .collect()
        })
    }

    /// Scores `text` against every exemplar and returns the flags whose
    /// similarity meets the threshold, in exemplar-declaration order.
    ///
    /// Failures are typed here; the engine degrades them to an empty flag
    /// list at the `analyze` boundary.
    pub fn score_topics(&self, text: &str) -> Result<Vec<SemanticFlag>, SemanticError> {
        let exemplar_embeddings = self.exemplar_embeddings()?;
        let text_embedding = self.scorer.embed(text)?;
        if text_embedding.is_empty() {
            return Err(SemanticError::EmptyEmbedding);
        }

        let mut flags = Vec::new();
        for (exemplar, embedding) in self.exemplars.iter().zip(exemplar_embeddings) {
            let score = cosine_similarity(&text_embedding, embedding);
            if score >= self.threshold {
                flags.push(SemanticFlag { exemplar: exemplar.clone(), score });
            }
        }
        Ok(flags)
    }
}
