//! Axum route handlers for the Analysis API.

use axum::{extract::State, Json};
use serde::{Deserialize, Serialize};

use crate::analysis::keywords::KeywordReport;
use crate::analysis::orchestrator::{AnalysisOptions, AnalysisResult, RawInput};
use crate::errors::AppError;
use crate::state::AppState;

// ────────────────────────────────────────────────────────────────────────────
// Request / Response types
// ────────────────────────────────────────────────────────────────────────────

#[derive(Debug, Deserialize)]
pub struct AnalyzeRequest {
    pub resume_text: String,
    pub job_description: String,
    pub top_n_matches: Option<usize>,
    pub enable_ai_enrichment: Option<bool>,
    pub min_keyword_length: Option<usize>,
}

impl AnalyzeRequest {
    fn split(self) -> (RawInput, AnalysisOptions) {
        let defaults = AnalysisOptions::default();
        let options = AnalysisOptions {
            top_n_matches: self.top_n_matches.unwrap_or(defaults.top_n_matches),
            enable_ai_enrichment: self
                .enable_ai_enrichment
                .unwrap_or(defaults.enable_ai_enrichment),
            min_keyword_length: self
                .min_keyword_length
                .unwrap_or(defaults.min_keyword_length),
        };
        let raw = RawInput {
            resume_text: self.resume_text,
            job_description: self.job_description,
        };
        (raw, options)
    }
}

#[derive(Debug, Deserialize)]
pub struct KeywordPreviewRequest {
    pub resume_text: String,
    pub job_description: String,
    pub min_keyword_length: Option<usize>,
}

#[derive(Debug, Serialize)]
pub struct KeywordPreviewResponse {
    pub matched_keywords: Vec<String>,
    pub missing_keywords: Vec<String>,
    pub match_score: f64,
}

impl From<KeywordReport> for KeywordPreviewResponse {
    fn from(report: KeywordReport) -> Self {
        Self {
            matched_keywords: report.matched,
            missing_keywords: report.missing,
            match_score: report.score,
        }
    }
}

// ────────────────────────────────────────────────────────────────────────────
// Handlers
// ────────────────────────────────────────────────────────────────────────────

/// POST /api/v1/analyze
///
/// Full pipeline: normalize → keyword match → semantic rank → AI enrichment.
/// The response body is the `AnalysisResult` wire contract.
pub async fn handle_analyze(
    State(state): State<AppState>,
    Json(request): Json<AnalyzeRequest>,
) -> Result<Json<AnalysisResult>, AppError> {
    let (raw, options) = request.split();
    let result = state.engine.analyze(&raw, &options).await?;
    Ok(Json(result))
}

/// POST /api/v1/analyze/keywords
///
/// Keyword-only preview — no sentence ranking, no LLM call. Useful for
/// cheap re-scoring while the user edits their résumé.
pub async fn handle_keyword_preview(
    State(state): State<AppState>,
    Json(request): Json<KeywordPreviewRequest>,
) -> Result<Json<KeywordPreviewResponse>, AppError> {
    let min_len = request
        .min_keyword_length
        .unwrap_or(AnalysisOptions::default().min_keyword_length);
    let raw = RawInput {
        resume_text: request.resume_text,
        job_description: request.job_description,
    };

    let report = state.engine.keyword_report(&raw, min_len)?;
    Ok(Json(report.into()))
}
