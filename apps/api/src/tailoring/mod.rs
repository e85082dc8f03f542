//! Résumé tailoring: upload extraction, LLM rewrite and ATS scoring, and the
//! render chain that turns a tailored text back into a `.docx`.
//!
//! Render chain, best first:
//!   1. `rewriter` edits the original document in place (formatting kept).
//!   2. `fallback` builds a fresh document from heading/bullet heuristics.
//!   3. `fallback::render_plain` writes one paragraph per line.

pub mod ats;
pub mod extract;
pub mod fallback;
pub mod handlers;
pub mod matcher;
pub mod prompts;
pub mod render;
pub mod rewriter;
pub mod service;
