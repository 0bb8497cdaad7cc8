//! Analysis Orchestrator — runs the full matching pipeline.
//!
//! Flow: validate input → normalize both texts → keyword match →
//!       semantic rank → optional AI enrichment → assemble result.
//!
//! Only blank input aborts an analysis. Everything else degrades: empty
//! keyword sets score zero, a failed similarity backend falls back to token
//! overlap, and enrichment timeouts simply leave the AI fields absent.

use std::sync::Arc;
use std::time::Duration;

use serde::{Deserialize, Serialize};
use thiserror::Error;
use tracing::{info, warn};
use uuid::Uuid;

use crate::analysis::enrichment::enrich;
use crate::analysis::keywords::{match_keywords, KeywordReport};
use crate::analysis::normalizer::{normalize, NormalizerConfig, TokenSet, DEFAULT_MIN_TOKEN_LEN};
use crate::analysis::ranker::{rank, SimilarityPair, DEFAULT_TOP_N};
use crate::llm_client::LlmClient;
use crate::similarity::{SimilarityProvider, TokenOverlapSimilarity};

#[derive(Debug, Error)]
pub enum AnalyzeError {
    /// Blank résumé or job-description text — the one hard failure.
    #[error("Invalid input: {0}")]
    InvalidInput(String),
}

/// Raw per-request input. Request-scoped; nothing is retained between calls.
#[derive(Debug, Clone, Deserialize)]
pub struct RawInput {
    pub resume_text: String,
    pub job_description: String,
}

/// Per-request knobs. Defaults match the documented wire contract.
#[derive(Debug, Clone)]
pub struct AnalysisOptions {
    pub top_n_matches: usize,
    pub enable_ai_enrichment: bool,
    pub min_keyword_length: usize,
}

impl Default for AnalysisOptions {
    fn default() -> Self {
        Self {
            top_n_matches: DEFAULT_TOP_N,
            enable_ai_enrichment: true,
            min_keyword_length: DEFAULT_MIN_TOKEN_LEN,
        }
    }
}

/// The analysis output contract. Field names and optionality are the wire
/// shape consumed by the HTTP layer — do not rename.
#[derive(Debug, Clone, Serialize)]
pub struct AnalysisResult {
    pub match_score: f64,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub semantic_score: Option<f64>,
    pub matched_keywords: Vec<String>,
    pub missing_keywords: Vec<String>,
    pub top_matches: Vec<SimilarityPair>,
    /// True when the semantic score came from the token-overlap fallback
    /// rather than the configured similarity backend.
    pub degraded: bool,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub ai_summary: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub ai_missing_skills: Option<Vec<String>>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub ai_bullet_improvements: Option<Vec<String>>,
}

/// The matching engine. Read-only after construction; safe to share across
/// concurrent requests without coordination.
pub struct AnalysisEngine {
    normalizer: NormalizerConfig,
    similarity: Arc<dyn SimilarityProvider>,
    fallback: TokenOverlapSimilarity,
    llm: Option<LlmClient>,
    enrichment_timeout: Duration,
}

impl AnalysisEngine {
    pub fn new(
        normalizer: NormalizerConfig,
        similarity: Arc<dyn SimilarityProvider>,
        llm: Option<LlmClient>,
        enrichment_timeout: Duration,
    ) -> Self {
        Self {
            normalizer,
            similarity,
            fallback: TokenOverlapSimilarity,
            llm,
            enrichment_timeout,
        }
    }

    /// Runs one full analysis.
    ///
    /// Steps:
    /// 1. Reject blank input
    /// 2. Normalize JD and résumé (no-token inputs become empty sets)
    /// 3. Keyword match
    /// 4. Semantic rank (degrades on backend failure)
    /// 5. AI enrichment under a bounded timeout, best-effort
    pub async fn analyze(
        &self,
        raw: &RawInput,
        options: &AnalysisOptions,
    ) -> Result<AnalysisResult, AnalyzeError> {
        validate_input(raw)?;

        let analysis_id = Uuid::new_v4();
        info!(
            %analysis_id,
            backend = self.similarity.backend(),
            "Starting analysis"
        );

        let normalizer = self.effective_normalizer(options.min_keyword_length);
        let job_tokens = tokens_or_empty(&raw.job_description, &normalizer);
        let resume_tokens = tokens_or_empty(&raw.resume_text, &normalizer);

        let report = match_keywords(&job_tokens, &resume_tokens);
        info!(
            %analysis_id,
            match_score = report.score,
            matched = report.matched.len(),
            missing = report.missing.len(),
            "Keyword match complete"
        );

        let outcome = rank(
            &raw.job_description,
            &raw.resume_text,
            options.top_n_matches,
            self.similarity.as_ref(),
            &self.fallback,
        )
        .await;
        info!(
            %analysis_id,
            semantic_score = outcome.semantic_score,
            pairs = outcome.pairs.len(),
            degraded = outcome.degraded,
            "Semantic ranking complete"
        );

        let mut result = AnalysisResult {
            match_score: report.score,
            semantic_score: Some(outcome.semantic_score),
            matched_keywords: report.matched.clone(),
            missing_keywords: report.missing.clone(),
            top_matches: outcome.pairs,
            degraded: outcome.degraded,
            ai_summary: None,
            ai_missing_skills: None,
            ai_bullet_improvements: None,
        };

        if options.enable_ai_enrichment {
            if let Some(llm) = &self.llm {
                self.apply_enrichment(llm, analysis_id, raw, &report, &mut result)
                    .await;
            }
        }

        Ok(result)
    }

    /// Keyword-only preview: normalizer + matcher, no ranking or enrichment.
    pub fn keyword_report(
        &self,
        raw: &RawInput,
        min_keyword_length: usize,
    ) -> Result<KeywordReport, AnalyzeError> {
        validate_input(raw)?;

        let normalizer = self.effective_normalizer(min_keyword_length);
        let job_tokens = tokens_or_empty(&raw.job_description, &normalizer);
        let resume_tokens = tokens_or_empty(&raw.resume_text, &normalizer);

        Ok(match_keywords(&job_tokens, &resume_tokens))
    }

    async fn apply_enrichment(
        &self,
        llm: &LlmClient,
        analysis_id: Uuid,
        raw: &RawInput,
        report: &KeywordReport,
        result: &mut AnalysisResult,
    ) {
        let semantic = result.semantic_score.unwrap_or(0.0);
        let call = enrich(llm, &raw.job_description, report, semantic);

        match tokio::time::timeout(self.enrichment_timeout, call).await {
            Ok(Ok(payload)) => {
                result.ai_summary = Some(payload.summary);
                result.ai_missing_skills = Some(payload.missing_skills);
                result.ai_bullet_improvements = Some(payload.bullet_improvements);
            }
            Ok(Err(e)) => {
                warn!(%analysis_id, "AI enrichment failed, omitting AI fields: {e}");
            }
            Err(_) => {
                warn!(
                    %analysis_id,
                    timeout_secs = self.enrichment_timeout.as_secs(),
                    "AI enrichment timed out, omitting AI fields"
                );
            }
        }
    }

    fn effective_normalizer(&self, min_keyword_length: usize) -> NormalizerConfig {
        if min_keyword_length == self.normalizer.min_token_len() {
            self.normalizer.clone()
        } else {
            self.normalizer.with_min_token_len(min_keyword_length)
        }
    }
}

fn validate_input(raw: &RawInput) -> Result<(), AnalyzeError> {
    if raw.resume_text.trim().is_empty() {
        return Err(AnalyzeError::InvalidInput(
            "resume_text cannot be empty".to_string(),
        ));
    }
    if raw.job_description.trim().is_empty() {
        return Err(AnalyzeError::InvalidInput(
            "job_description cannot be empty".to_string(),
        ));
    }
    Ok(())
}

/// Converts the normalizer's no-token case into an empty set. Whether that
/// is acceptable was already decided by `validate_input` — here it just
/// means "no keywords on this side".
fn tokens_or_empty(text: &str, config: &NormalizerConfig) -> TokenSet {
    normalize(text, config).unwrap_or_default()
}

#[cfg(test)]
mod tests {
    use super::*;

    fn engine() -> AnalysisEngine {
        AnalysisEngine::new(
            NormalizerConfig::default(),
            Arc::new(TokenOverlapSimilarity),
            None,
            Duration::from_secs(5),
        )
    }

    fn input(resume: &str, jd: &str) -> RawInput {
        RawInput {
            resume_text: resume.to_string(),
            job_description: jd.to_string(),
        }
    }

    const JD: &str = "Looking for a Python developer with AWS and Docker experience";
    const RESUME: &str = "Experienced Python developer skilled in Docker and Kubernetes";

    #[tokio::test]
    async fn test_analyze_example_from_contract() {
        let result = engine()
            .analyze(&input(RESUME, JD), &AnalysisOptions::default())
            .await
            .unwrap();

        for kw in ["python", "docker", "developer"] {
            assert!(
                result.matched_keywords.iter().any(|k| k == kw),
                "expected '{kw}' in matched keywords: {:?}",
                result.matched_keywords
            );
        }
        assert!(result.missing_keywords.iter().any(|k| k == "aws"));

        let total = result.matched_keywords.len() + result.missing_keywords.len();
        let expected = 100.0 * result.matched_keywords.len() as f64 / total as f64;
        assert!((result.match_score - expected).abs() < 1e-9);
    }

    #[tokio::test]
    async fn test_keyword_partition_matches_normalized_jd() {
        let eng = engine();
        let raw = input(RESUME, JD);
        let result = eng.analyze(&raw, &AnalysisOptions::default()).await.unwrap();

        let jd_tokens = normalize(JD, &NormalizerConfig::default()).unwrap();
        let mut partition: Vec<&str> = result
            .matched_keywords
            .iter()
            .chain(result.missing_keywords.iter())
            .map(String::as_str)
            .collect();
        partition.sort_unstable();
        let mut expected: Vec<&str> = jd_tokens.iter().collect();
        expected.sort_unstable();
        assert_eq!(partition, expected);
    }

    #[tokio::test]
    async fn test_analyze_is_idempotent() {
        let eng = engine();
        let raw = input(RESUME, JD);
        let opts = AnalysisOptions::default();

        let first = eng.analyze(&raw, &opts).await.unwrap();
        let second = eng.analyze(&raw, &opts).await.unwrap();

        assert_eq!(first.match_score, second.match_score);
        assert_eq!(first.matched_keywords, second.matched_keywords);
        assert_eq!(first.missing_keywords, second.missing_keywords);
        assert_eq!(first.semantic_score, second.semantic_score);
    }

    #[tokio::test]
    async fn test_empty_resume_is_invalid_input() {
        let err = engine()
            .analyze(&input("   ", JD), &AnalysisOptions::default())
            .await
            .unwrap_err();
        assert!(matches!(err, AnalyzeError::InvalidInput(_)));
    }

    #[tokio::test]
    async fn test_empty_job_description_is_invalid_input() {
        let err = engine()
            .analyze(&input(RESUME, "\n"), &AnalysisOptions::default())
            .await
            .unwrap_err();
        assert!(matches!(err, AnalyzeError::InvalidInput(_)));
    }

    #[tokio::test]
    async fn test_all_stop_word_jd_scores_zero_with_empty_sets() {
        // Non-blank input, but no extractable keywords.
        let result = engine()
            .analyze(
                &input(RESUME, "the and of with to for"),
                &AnalysisOptions::default(),
            )
            .await
            .unwrap();
        assert_eq!(result.match_score, 0.0);
        assert!(result.matched_keywords.is_empty());
        assert!(result.missing_keywords.is_empty());
    }

    #[tokio::test]
    async fn test_top_n_option_bounds_pairs() {
        let jd = "Python needed. AWS needed. Docker needed. SQL needed. Linux needed.";
        let resume = "Python, AWS, Docker, SQL and Linux background. Shipped many services.";
        let opts = AnalysisOptions {
            top_n_matches: 3,
            ..AnalysisOptions::default()
        };

        let result = engine().analyze(&input(resume, jd), &opts).await.unwrap();
        assert!(result.top_matches.len() <= 3);
    }

    #[tokio::test]
    async fn test_enrichment_disabled_leaves_ai_fields_absent() {
        let opts = AnalysisOptions {
            enable_ai_enrichment: false,
            ..AnalysisOptions::default()
        };
        let result = engine().analyze(&input(RESUME, JD), &opts).await.unwrap();
        assert!(result.ai_summary.is_none());
        assert!(result.ai_missing_skills.is_none());
        assert!(result.ai_bullet_improvements.is_none());
    }

    #[tokio::test]
    async fn test_no_llm_configured_still_returns_full_result() {
        // enable_ai_enrichment defaults to true, but no client is configured.
        let result = engine()
            .analyze(&input(RESUME, JD), &AnalysisOptions::default())
            .await
            .unwrap();
        assert!(result.ai_summary.is_none());
        assert!(result.match_score > 0.0);
        assert!(result.semantic_score.is_some());
    }

    #[tokio::test]
    async fn test_min_keyword_length_option_filters_short_tokens() {
        let opts = AnalysisOptions {
            min_keyword_length: 7,
            ..AnalysisOptions::default()
        };
        let result = engine()
            .analyze(&input("go rust developer", "go rust developer"), &opts)
            .await
            .unwrap();
        assert_eq!(result.matched_keywords, ["developer"]);
    }

    #[tokio::test]
    async fn test_match_score_100_iff_no_missing_keywords() {
        let result = engine()
            .analyze(
                &input("python docker aws veteran", "python docker aws"),
                &AnalysisOptions::default(),
            )
            .await
            .unwrap();
        assert!((result.match_score - 100.0).abs() < f64::EPSILON);
        assert!(result.missing_keywords.is_empty());
    }

    #[test]
    fn test_keyword_report_preview() {
        let report = engine()
            .keyword_report(&input(RESUME, JD), DEFAULT_MIN_TOKEN_LEN)
            .unwrap();
        assert!(report.matched.iter().any(|k| k == "python"));
        assert!(report.missing.iter().any(|k| k == "aws"));
    }

    #[test]
    fn test_keyword_report_rejects_blank_input() {
        let err = engine()
            .keyword_report(&input("", JD), DEFAULT_MIN_TOKEN_LEN)
            .unwrap_err();
        assert!(matches!(err, AnalyzeError::InvalidInput(_)));
    }

    #[test]
    fn test_result_serializes_wire_contract_fields() {
        let result = AnalysisResult {
            match_score: 50.0,
            semantic_score: Some(40.0),
            matched_keywords: vec!["python".to_string()],
            missing_keywords: vec!["aws".to_string()],
            top_matches: vec![],
            degraded: false,
            ai_summary: None,
            ai_missing_skills: None,
            ai_bullet_improvements: None,
        };

        let json = serde_json::to_value(&result).unwrap();
        assert_eq!(json["match_score"], 50.0);
        assert_eq!(json["semantic_score"], 40.0);
        assert_eq!(json["matched_keywords"][0], "python");
        assert_eq!(json["missing_keywords"][0], "aws");
        assert!(json["top_matches"].as_array().unwrap().is_empty());
        // Absent AI fields are omitted entirely, not serialized as null.
        assert!(json.get("ai_summary").is_none());
        assert!(json.get("ai_missing_skills").is_none());
        assert!(json.get("ai_bullet_improvements").is_none());
    }
}
