//! Keyword Matcher — pure set comparison of JD keywords against résumé keywords.
//!
//! Every JD keyword lands in exactly one of `matched`/`missing`; the score is
//! the covered fraction scaled to 0–100. No stemming or fuzzy matching —
//! exact lowercase token equality keeps the partition invariant trivially true.

use std::collections::HashSet;

use serde::Serialize;

use crate::analysis::normalizer::TokenSet;

/// Result of comparing job-description keywords against résumé keywords.
#[derive(Debug, Clone, Serialize)]
pub struct KeywordReport {
    /// JD keywords present in the résumé, in JD order.
    pub matched: Vec<String>,
    /// JD keywords absent from the résumé, in JD order.
    pub missing: Vec<String>,
    /// 100 * |matched| / |job keywords|; 0 when the JD has no keywords.
    pub score: f64,
}

/// Partitions `job` tokens by membership in `resume` and computes coverage.
///
/// Pure function. An empty `job` set yields a zero score with both
/// partitions empty — explicit policy, not an error.
pub fn match_keywords(job: &TokenSet, resume: &TokenSet) -> KeywordReport {
    let resume_set: HashSet<&str> = resume.iter().collect();

    let mut matched = Vec::new();
    let mut missing = Vec::new();

    for token in job.iter() {
        if resume_set.contains(token) {
            matched.push(token.to_string());
        } else {
            missing.push(token.to_string());
        }
    }

    let score = if job.is_empty() {
        0.0
    } else {
        100.0 * matched.len() as f64 / job.len() as f64
    };

    KeywordReport {
        matched,
        missing,
        score,
    }
}
