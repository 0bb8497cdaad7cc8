//! Similarity providers — pluggable, trait-based sentence similarity backends.
//!
//! Default: `TokenOverlapSimilarity` (pure-Rust, deterministic, offline).
//! Optional: `EmbeddingSimilarity` (network-backed embedding endpoint).
//!
//! The engine holds an `Arc<dyn SimilarityProvider>` picked at startup; when
//! the configured backend fails mid-request the ranker falls back to token
//! overlap and flags the analysis as degraded.

use std::collections::HashSet;
use std::time::Duration;

use async_trait::async_trait;
use reqwest::Client;
use serde::{Deserialize, Serialize};
use thiserror::Error;
use tracing::debug;

#[derive(Debug, Error)]
pub enum SimilarityError {
    #[error("HTTP error: {0}")]
    Http(#[from] reqwest::Error),

    #[error("embedding endpoint returned status {status}: {message}")]
    Api { status: u16, message: String },

    #[error("embedding count mismatch: sent {sent} sentences, got {got} vectors")]
    ShapeMismatch { sent: usize, got: usize },
}

/// Scores every (job, résumé) sentence pair. Implement this to swap
/// similarity backends without touching the ranker or handlers.
#[async_trait]
pub trait SimilarityProvider: Send + Sync {
    /// Returns a `job.len() x resume.len()` matrix of similarities in [0,1].
    async fn score_pairs(
        &self,
        job: &[String],
        resume: &[String],
    ) -> Result<Vec<Vec<f32>>, SimilarityError>;

    /// Backend label carried into logs for transparency.
    fn backend(&self) -> &'static str;
}

// ────────────────────────────────────────────────────────────────────────────
// TokenOverlapSimilarity — deterministic local fallback
// ────────────────────────────────────────────────────────────────────────────

/// Jaccard overlap of lowercase word sets. Symmetric, deterministic, and
/// infallible — the degradation target when no embedding backend is usable.
pub struct TokenOverlapSimilarity;

impl TokenOverlapSimilarity {
    /// Synchronous scoring used directly by the ranker's fallback path.
    pub fn score_matrix(&self, job: &[String], resume: &[String]) -> Vec<Vec<f32>> {
        let resume_tokens: Vec<HashSet<String>> =
            resume.iter().map(|s| sentence_tokens(s)).collect();

        job.iter()
            .map(|job_sentence| {
                let job_tokens = sentence_tokens(job_sentence);
                resume_tokens
                    .iter()
                    .map(|rt| jaccard(&job_tokens, rt))
                    .collect()
            })
            .collect()
    }
}

#[async_trait]
impl SimilarityProvider for TokenOverlapSimilarity {
    async fn score_pairs(
        &self,
        job: &[String],
        resume: &[String],
    ) -> Result<Vec<Vec<f32>>, SimilarityError> {
        Ok(self.score_matrix(job, resume))
    }

    fn backend(&self) -> &'static str {
        "token-overlap"
    }
}

fn sentence_tokens(sentence: &str) -> HashSet<String> {
    sentence
        .split(|c: char| !c.is_alphanumeric())
        .filter(|t| t.chars().count() >= 2)
        .map(|t| t.to_lowercase())
        .collect()
}

fn jaccard(a: &HashSet<String>, b: &HashSet<String>) -> f32 {
    if a.is_empty() || b.is_empty() {
        return 0.0;
    }
    let intersection = a.intersection(b).count();
    let union = a.len() + b.len() - intersection;
    intersection as f32 / union as f32
}

// ────────────────────────────────────────────────────────────────────────────
// EmbeddingSimilarity — network-backed embedding endpoint
// ────────────────────────────────────────────────────────────────────────────

#[derive(Debug, Serialize)]
struct EmbeddingRequest<'a> {
    input: &'a [String],
}

#[derive(Debug, Deserialize)]
struct EmbeddingResponse {
    embeddings: Vec<Vec<f32>>,
}

/// Embeds all sentences in one batch and scores pairs by cosine similarity,
/// clamped into [0,1].
pub struct EmbeddingSimilarity {
    client: Client,
    url: String,
}

impl EmbeddingSimilarity {
    pub fn new(url: String, timeout: Duration) -> Self {
        Self {
            client: Client::builder()
                .timeout(timeout)
                .build()
                .expect("Failed to build HTTP client"),
            url,
        }
    }

    async fn embed(&self, sentences: &[String]) -> Result<Vec<Vec<f32>>, SimilarityError> {
        let response = self
            .client
            .post(&self.url)
            .json(&EmbeddingRequest { input: sentences })
            .send()
            .await?;

        let status = response.status();
        if !status.is_success() {
            let message = response.text().await.unwrap_or_default();
            return Err(SimilarityError::Api {
                status: status.as_u16(),
                message,
            });
        }

        let body: EmbeddingResponse = response.json().await?;
        if body.embeddings.len() != sentences.len() {
            return Err(SimilarityError::ShapeMismatch {
                sent: sentences.len(),
                got: body.embeddings.len(),
            });
        }

        Ok(body.embeddings)
    }
}

#[async_trait]
impl SimilarityProvider for EmbeddingSimilarity {
    async fn score_pairs(
        &self,
        job: &[String],
        resume: &[String],
    ) -> Result<Vec<Vec<f32>>, SimilarityError> {
        // One batch for both sides keeps this to a single round-trip.
        let mut batch: Vec<String> = Vec::with_capacity(job.len() + resume.len());
        batch.extend_from_slice(job);
        batch.extend_from_slice(resume);

        let embeddings = self.embed(&batch).await?;
        let (job_vecs, resume_vecs) = embeddings.split_at(job.len());

        debug!(
            "Embedded {} job + {} resume sentences",
            job_vecs.len(),
            resume_vecs.len()
        );

        Ok(job_vecs
            .iter()
            .map(|jv| {
                resume_vecs
                    .iter()
                    .map(|rv| cosine_similarity(jv, rv).clamp(0.0, 1.0))
                    .collect()
            })
            .collect())
    }

    fn backend(&self) -> &'static str {
        "embedding"
    }
}

fn cosine_similarity(a: &[f32], b: &[f32]) -> f32 {
    if a.len() != b.len() || a.is_empty() {
        return 0.0;
    }
    let dot: f32 = a.iter().zip(b).map(|(x, y)| x * y).sum();
    let norm_a: f32 = a.iter().map(|x| x * x).sum::<f32>().sqrt();
    let norm_b: f32 = b.iter().map(|x| x * x).sum::<f32>().sqrt();
    if norm_a == 0.0 || norm_b == 0.0 {
        return 0.0;
    }
    dot / (norm_a * norm_b)
}
