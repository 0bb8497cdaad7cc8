//! Semantic Similarity Ranker — finds the résumé sentences that best answer
//! each job-description sentence.
//!
//! Segmentation and pair selection are deterministic; only the similarity
//! values come from the injected provider. A provider failure degrades to the
//! token-overlap fallback instead of failing the analysis.

use serde::{Deserialize, Serialize};
use tracing::warn;

use crate::similarity::{SimilarityProvider, TokenOverlapSimilarity};

/// Default number of top sentence pairs returned.
pub const DEFAULT_TOP_N: usize = 5;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "UPPERCASE")]
pub enum SentenceSource {
    Job,
    Resume,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Sentence {
    pub text: String,
    pub source: SentenceSource,
}

/// A job sentence paired with its best-matching résumé sentence.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SimilarityPair {
    pub job_sentence: Sentence,
    pub resume_sentence: Sentence,
    pub similarity: f32,
}

/// Ranker output: top pairs plus an aggregate score and a confidence flag.
#[derive(Debug, Clone, Serialize)]
pub struct RankOutcome {
    pub pairs: Vec<SimilarityPair>,
    /// 100 * mean similarity over the returned pairs; 0 with no sentences.
    pub semantic_score: f64,
    /// True when the configured provider failed and the token-overlap
    /// fallback produced the similarities instead.
    pub degraded: bool,
}

impl RankOutcome {
    fn empty() -> Self {
        Self {
            pairs: Vec::new(),
            semantic_score: 0.0,
            degraded: false,
        }
    }
}

/// Splits text into sentences on `.`, `!` or `?` followed by whitespace
/// (or end of input), collapsing internal whitespace. Empty segments are
/// dropped; source order is preserved.
pub fn split_sentences(text: &str) -> Vec<String> {
    let mut sentences = Vec::new();
    let mut current = String::new();
    let mut chars = text.chars().peekable();

    while let Some(c) = chars.next() {
        current.push(c);
        if matches!(c, '.' | '!' | '?') {
            let at_boundary = match chars.peek() {
                Some(next) => next.is_whitespace(),
                None => true,
            };
            if at_boundary {
                push_sentence(&mut sentences, &current);
                current.clear();
            }
        }
    }
    push_sentence(&mut sentences, &current);

    sentences
}

fn push_sentence(sentences: &mut Vec<String>, raw: &str) {
    let collapsed = raw.split_whitespace().collect::<Vec<_>>().join(" ");
    if !collapsed.is_empty() {
        sentences.push(collapsed);
    }
}

/// Ranks job sentences against résumé sentences and returns the `top_n`
/// best pairs, sorted descending by similarity with ties broken by original
/// job-sentence order.
pub async fn rank(
    job_text: &str,
    resume_text: &str,
    top_n: usize,
    provider: &dyn SimilarityProvider,
    fallback: &TokenOverlapSimilarity,
) -> RankOutcome {
    let job_sentences = split_sentences(job_text);
    let resume_sentences = split_sentences(resume_text);

    if job_sentences.is_empty() || resume_sentences.is_empty() {
        return RankOutcome::empty();
    }

    let (matrix, degraded) = match provider.score_pairs(&job_sentences, &resume_sentences).await {
        Ok(matrix) if matrix_shape_ok(&matrix, job_sentences.len(), resume_sentences.len()) => {
            (matrix, false)
        }
        Ok(_) => {
            warn!(
                backend = provider.backend(),
                "Similarity matrix has wrong shape, falling back to token overlap"
            );
            (fallback.score_matrix(&job_sentences, &resume_sentences), true)
        }
        Err(e) => {
            warn!(
                backend = provider.backend(),
                "Similarity provider failed ({e}), falling back to token overlap"
            );
            (fallback.score_matrix(&job_sentences, &resume_sentences), true)
        }
    };

    // Best résumé sentence per job sentence; ties keep the earliest one.
    let mut best: Vec<(usize, usize, f32)> = matrix
        .iter()
        .enumerate()
        .filter_map(|(job_idx, row)| {
            row.iter()
                .enumerate()
                .map(|(resume_idx, s)| (resume_idx, s.clamp(0.0, 1.0)))
                .reduce(|acc, cand| if cand.1 > acc.1 { cand } else { acc })
                .map(|(resume_idx, similarity)| (job_idx, resume_idx, similarity))
        })
        .collect();

    best.sort_by(|a, b| {
        b.2.partial_cmp(&a.2)
            .unwrap_or(std::cmp::Ordering::Equal)
            .then_with(|| a.0.cmp(&b.0))
    });
    best.truncate(top_n);

    let semantic_score = if best.is_empty() {
        0.0
    } else {
        100.0 * best.iter().map(|(_, _, s)| *s as f64).sum::<f64>() / best.len() as f64
    };

    let pairs = best
        .into_iter()
        .map(|(job_idx, resume_idx, similarity)| SimilarityPair {
            job_sentence: Sentence {
                text: job_sentences[job_idx].clone(),
                source: SentenceSource::Job,
            },
            resume_sentence: Sentence {
                text: resume_sentences[resume_idx].clone(),
                source: SentenceSource::Resume,
            },
            similarity,
        })
        .collect();

    RankOutcome {
        pairs,
        semantic_score,
        degraded,
    }
}

fn matrix_shape_ok(matrix: &[Vec<f32>], job_len: usize, resume_len: usize) -> bool {
    matrix.len() == job_len && matrix.iter().all(|row| row.len() == resume_len)
}
