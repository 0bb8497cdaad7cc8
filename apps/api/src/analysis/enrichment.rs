//! AI enrichment — best-effort prose summary and suggestions on top of the
//! computed signals. Output is stored verbatim; a failure here never fails
//! the analysis.

use serde::Deserialize;

use crate::analysis::keywords::KeywordReport;
use crate::analysis::prompts::{ENRICHMENT_PROMPT_TEMPLATE, ENRICHMENT_SYSTEM};
use crate::llm_client::{LlmClient, LlmError};

/// Structured enrichment returned by the text-generation provider.
#[derive(Debug, Clone, Deserialize)]
pub struct EnrichmentPayload {
    pub summary: String,
    #[serde(default)]
    pub missing_skills: Vec<String>,
    #[serde(default)]
    pub bullet_improvements: Vec<String>,
}

/// Requests summary/suggestions from the LLM, feeding it the computed
/// keyword and semantic signals as prompt context.
pub async fn enrich(
    llm: &LlmClient,
    job_description: &str,
    report: &KeywordReport,
    semantic_score: f64,
) -> Result<EnrichmentPayload, LlmError> {
    let prompt = build_prompt(job_description, report, semantic_score);
    llm.complete_json::<EnrichmentPayload>(&prompt, ENRICHMENT_SYSTEM)
        .await
}

fn build_prompt(job_description: &str, report: &KeywordReport, semantic_score: f64) -> String {
    ENRICHMENT_PROMPT_TEMPLATE
        .replace("{match_score}", &format!("{:.0}", report.score))
        .replace("{semantic_score}", &format!("{semantic_score:.0}"))
        .replace("{matched_keywords}", &join_or_none(&report.matched))
        .replace("{missing_keywords}", &join_or_none(&report.missing))
        .replace("{job_description}", job_description)
}

fn join_or_none(keywords: &[String]) -> String {
    if keywords.is_empty() {
        "(none)".to_string()
    } else {
        keywords.join(", ")
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn report() -> KeywordReport {
        KeywordReport {
            matched: vec!["python".to_string(), "docker".to_string()],
            missing: vec!["aws".to_string()],
            score: 66.7,
        }
    }

    #[test]
    fn test_prompt_includes_signals() {
        let prompt = build_prompt("Python developer with AWS.", &report(), 72.4);
        assert!(prompt.contains("python, docker"));
        assert!(prompt.contains("aws"));
        assert!(prompt.contains("67/100"));
        assert!(prompt.contains("72/100"));
        assert!(prompt.contains("Python developer with AWS."));
    }

    #[test]
    fn test_prompt_marks_empty_keyword_lists() {
        let empty = KeywordReport {
            matched: vec![],
            missing: vec![],
            score: 0.0,
        };
        let prompt = build_prompt("Any role.", &empty, 0.0);
        assert!(prompt.contains("(none)"));
    }

    #[test]
    fn test_payload_deserializes_with_missing_lists() {
        let payload: EnrichmentPayload =
            serde_json::from_str(r#"{"summary": "Decent fit."}"#).unwrap();
        assert_eq!(payload.summary, "Decent fit.");
        assert!(payload.missing_skills.is_empty());
        assert!(payload.bullet_improvements.is_empty());
    }

    #[test]
    fn test_payload_deserializes_full() {
        let json = r#"{
            "summary": "Good coverage of core skills.",
            "missing_skills": ["AWS"],
            "bullet_improvements": ["Quantify the Docker migration impact."]
        }"#;
        let payload: EnrichmentPayload = serde_json::from_str(json).unwrap();
        assert_eq!(payload.missing_skills, ["AWS"]);
        assert_eq!(payload.bullet_improvements.len(), 1);
    }
}
