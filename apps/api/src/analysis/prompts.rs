// All LLM prompt constants for the analysis module.

/// System prompt for AI enrichment — enforces JSON-only output.
pub const ENRICHMENT_SYSTEM: &str =
    "You are an expert resume reviewer and career coach. \
    Given a job description and computed keyword-match signals, produce a short \
    assessment to help the candidate improve their resume. \
    You MUST respond with valid JSON only. \
    Do NOT include any text outside the JSON object. \
    Do NOT use markdown code fences. \
    Do NOT include explanations or apologies.";

/// Enrichment prompt template.
/// Replace: {job_description}, {matched_keywords}, {missing_keywords},
///          {match_score}, {semantic_score}
pub const ENRICHMENT_PROMPT_TEMPLATE: &str = r#"A candidate's resume was compared against the job description below.

Computed signals (already verified — do not recompute or contradict them):
- Keyword match score: {match_score}/100
- Semantic similarity score: {semantic_score}/100
- Job keywords found in the resume: {matched_keywords}
- Job keywords missing from the resume: {missing_keywords}

Return a JSON object with this EXACT schema (no extra fields):
{
  "summary": "Two or three sentences assessing overall fit, referencing the scores.",
  "missing_skills": ["skill the candidate should address, most important first"],
  "bullet_improvements": ["concrete rewrite suggestion for a resume bullet"]
}

Rules:
- Base `missing_skills` on the missing keywords list, grouped into real skills.
- Keep `bullet_improvements` actionable — each one names what to add or rephrase.
- At most 5 items per list. Empty lists are fine when there is nothing to say.

JOB DESCRIPTION:
{job_description}"#;
