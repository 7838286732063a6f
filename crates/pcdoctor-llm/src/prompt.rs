//! Diagnosis prompt templating
//!
//! Pure string construction, but the wording is a contract: the response
//! normalizer relies on the model honoring "return ONLY valid JSON", and
//! the confidence bands and OS buckets here define how the output is
//! interpreted downstream.

use pcdoctor_core::SystemSpecs;

/// The fixed system-role persona message.
#[must_use]
pub fn system_prompt() -> &'static str {
    "You are PC Doctor, an expert computer technician. Provide detailed, accurate \
     technical diagnoses and solutions. Always respond with valid JSON only, no \
     additional text."
}

/// Build the user-role diagnosis prompt for one request.
///
/// Deterministic: the same specs and problem always produce the same
/// prompt.
#[must_use]
pub fn build_prompt(specs: &SystemSpecs, problem: &str) -> String {
    format!(
        r#"You are PC Doctor, an expert computer technician AI assistant. Analyze the following computer problem and provide a detailed diagnosis with step-by-step solutions.

Set the confidence score using these bands:
- 90-100: the symptoms exactly match a known problem pattern
- 70-89: a probable cause based on common patterns
- 50-69: multiple plausible causes
- below 50: insufficient information for a confident diagnosis

When a step involves commands, tailor them to the operating system using the
keys "windows", "macos" and "linux". Omit keys that do not apply to the
user's system. Use real commands only, never placeholders.

System Specifications:
- CPU: {cpu}
- GPU: {gpu}
- RAM: {ram}
- Operating System: {os}
- Storage: {storage}

Problem Description:
{problem}

Please provide your response in the following JSON format:
{{
  "diagnosis": "Brief summary of the main issue",
  "confidence": 85,
  "possibleCauses": ["Cause 1", "Cause 2", "Cause 3"],
  "steps": [
    {{
      "step": 1,
      "title": "Step title",
      "description": "Detailed description of what to do",
      "difficulty": "easy|medium|hard",
      "estimatedTime": "5 mins",
      "commands": {{"windows": ["command1"], "linux": ["command2"]}},
      "warnings": ["Warning if any"]
    }}
  ],
  "preventiveTips": ["Tip 1", "Tip 2", "Tip 3"]
}}

Provide 3-6 solution steps ordered from the easiest to the most involved. Make sure the confidence score reflects how certain you are about the diagnosis based on the information provided. Return ONLY valid JSON with no surrounding prose."#,
        cpu = specs.cpu(),
        gpu = specs.gpu(),
        ram = specs.ram(),
        os = specs.os(),
        storage = specs.storage(),
        problem = problem,
    )
}
