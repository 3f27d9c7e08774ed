//! Assembles generation requests from instruction, document, context, and
//! optional schema. Pure functions with no backend access.

use crate::models::{ContentUnit, GenerationRequest};
use crate::prompts;
use crate::schema::Schema;

/// Build a backend request. A `Some(schema)` requests structured-output
/// mode; `None` requests free-form text.
pub fn compose(
    system_instruction: impl Into<String>,
    temperature: Option<f32>,
    document: ContentUnit,
    context: impl Into<String>,
    schema: Option<Schema>,
) -> GenerationRequest {
    GenerationRequest {
        system_instruction: system_instruction.into(),
        temperature,
        schema,
        document,
        context: context.into(),
    }
}

/// Context for the one-shot analysis call: the verbatim job description
/// inside the analysis wrapper.
pub fn analysis_context(job_description: &str) -> String {
    prompts::render(
        prompts::ANALYSIS_USER,
        &[("job_description", job_description)],
    )
}

/// Context for the outreach-generation call.
pub fn outreach_context(job_description: &str) -> String {
    prompts::render(
        prompts::OUTREACH_USER,
        &[("job_description", job_description)],
    )
}

/// Context for the interview-chat bootstrap turn. The ~200-word bound on the
/// narrative lives in the template text and is advisory to the backend.
pub fn bootstrap_context(job_description: &str) -> String {
    prompts::render(
        prompts::INTERVIEW_BOOTSTRAP,
        &[("job_description", job_description)],
    )
}
