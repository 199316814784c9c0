// Cross-cutting prompt fragments. Module-specific prompts live next to the
// module that sends them (catalog/prompts.rs, applications/prompts.rs).

/// Appended to system prompts whose reply is parsed as JSON.
pub const JSON_ONLY_SYSTEM: &str = "\
    You MUST respond with valid JSON only. \
    Do NOT include any text outside the JSON object. \
    Do NOT use markdown code fences. \
    Do NOT include explanations or apologies.";

/// Keeps generated figures tied to the record that was sent.
pub const NO_INVENTED_FIGURES: &str = "\
    Only use amounts, rates and tenures that appear in the data provided. \
    If a figure is missing, say so instead of estimating it.";
