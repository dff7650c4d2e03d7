//! Improvement prompt for a reported failure
//!
//! Builds the text a reviewer pastes into an LLM to get a revised system
//! prompt. The output is fully determined by its inputs.

use super::entities::ReportDetail;

const MISSING_SYSTEM_PROMPT: &str = "[No system prompt found]";

const TASKS: &str = "Your tasks:

1. Analyze what went wrong in the AI response.
2. Identify which part of the system prompt allowed this failure.
3. Produce a fully improved VERSION OF THE SYSTEM PROMPT that:
   - Reduces the chance of this failure happening again
   - Keeps strict restrictions intact
   - Improves clarity and enforcement of rules
4. Optionally provide:
   - Additional safety rules
   - Example corrections

Return your output in this exact format:

### Error Analysis
(text)

### Revised System Prompt
(text)

### Additional Fine-Tuning Notes
(text)";

/// Reviewer classification fed into the prompt
#[derive(Debug, Clone, Default, PartialEq)]
pub struct PromptInputs {
    pub category: String,
    pub severity: String,
    pub expected_response: String,
}

pub fn build_improvement_prompt(detail: &ReportDetail, inputs: &PromptInputs) -> String {
    let system_prompt = detail
        .system_prompt()
        .filter(|content| !content.is_empty())
        .unwrap_or(MISSING_SYSTEM_PROMPT);
    let report = &detail.report;

    format!(
        "Act as a senior Prompt Engineering and AI Evaluation expert.

You are given a real production failure where an AI assistant did not meet expectations.

--- CURRENT SYSTEM PROMPT ---
{system_prompt}

--- USER MESSAGE ---
{user_message}

--- AI RESPONSE ---
{assistant_response}

--- USER REPORT REASON ---
{reason}

--- INTERNAL CLASSIFICATION ---
Category: {category}
Severity: {severity}

--- EXPECTED IDEAL RESPONSE ---
{expected}

{TASKS}",
        user_message = report.user_message,
        assistant_response = report.assistant_response,
        reason = report.reason,
        category = inputs.category,
        severity = inputs.severity,
        expected = inputs.expected_response,
    )
}
