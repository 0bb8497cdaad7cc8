// Analysis engine: text normalization, keyword matching, semantic ranking,
// orchestration, and best-effort AI enrichment.
// All LLM calls go through llm_client — no direct Anthropic calls here.

pub mod enrichment;
pub mod handlers;
pub mod keywords;
pub mod normalizer;
pub mod orchestrator;
pub mod prompts;
pub mod ranker;
