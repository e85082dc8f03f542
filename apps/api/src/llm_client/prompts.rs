// Cross-cutting prompt fragments. Feature prompts live next to their feature
// (see `tailoring::prompts`).

/// System prompt fragment that enforces JSON-only output.
pub const JSON_ONLY_SYSTEM: &str = "You MUST respond with valid JSON only. \
    Do NOT include any text outside the JSON object. \
    Do NOT use markdown code fences. \
    Do NOT include explanations or apologies.";

/// Instruction that keeps rewritten résumés truthful.
pub const TRUTHFULNESS_INSTRUCTION: &str = "\
    CRITICAL: Only emphasize skills and experience that already appear in the résumé. \
    Do NOT invent employers, titles, dates, degrees, certifications or metrics.";
