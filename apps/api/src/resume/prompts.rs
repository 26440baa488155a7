// Resume extraction prompt templates.
// The field names requested here are the source keys `resume::normalize` maps.

use crate::config::CompletionSettings;
use crate::llm_client::CompletionRequest;

/// Bump when the wording or the requested field list changes.
pub const PROMPT_VERSION: &str = "resume-extract-v1";

pub const RESUME_PARSE_SYSTEM: &str =
    "You are an expert resume parser. Extract structured data from resumes.";

pub const RESUME_PARSE_PROMPT: &str = r#"Here is a resume:

{resume_text}

Extract the following:
- Full Name
- Contact Info (Email, Phone, LinkedIn, GitHub, Personal Website; omit channels that are not present)
- Skills, grouped as:
  - Technical Skills
  - Personal Skills
  - Programming Languages
  - Databases
  - Tools
  - Languages (spoken)
- Education (a list; each item with Degree, Field of Study, University, Duration)
- Work Experience (a list; each item with Company, Role, Duration)
- Certifications (a list, if any)

Use exactly these top-level keys: "Full Name", "Contact Info", "Skills", "Education", "Work Experience", "Certifications".
Return the result in JSON format, inside a single ```json fenced code block."#;

/// Builds the completion request for one résumé.
///
/// Pure: the same text and settings always produce the same request. Long
/// résumés are passed through untouched; no truncation or chunking happens here.
pub fn build_request(resume_text: &str, settings: &CompletionSettings) -> CompletionRequest {
    CompletionRequest {
        model: settings.model.clone(),
        system: RESUME_PARSE_SYSTEM.to_string(),
        user: RESUME_PARSE_PROMPT.replace("{resume_text}", resume_text),
        temperature: settings.temperature,
        max_tokens: settings.max_tokens,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn settings() -> CompletionSettings {
        CompletionSettings {
            api_key: "k".to_string(),
            api_url: "http://localhost".to_string(),
            model: "llama-3.3-70b-versatile".to_string(),
            temperature: 0.3,
            max_tokens: 1200,
        }
    }

    #[test]
    fn test_build_request_is_deterministic() {
        let a = build_request("Jane Doe\nRust Engineer", &settings());
        let b = build_request("Jane Doe\nRust Engineer", &settings());
        assert_eq!(a, b);
    }

    #[test]
    fn test_resume_text_is_embedded_verbatim() {
        let text = "Jane Doe  \n\t{weird} ```braces```";
        let request = build_request(text, &settings());
        assert!(request.user.contains(text));
        assert!(!request.user.contains("{resume_text}"));
    }

    #[test]
    fn test_request_carries_sampling_settings() {
        let request = build_request("x", &settings());
        assert_eq!(request.model, "llama-3.3-70b-versatile");
        assert_eq!(request.temperature, 0.3);
        assert_eq!(request.max_tokens, 1200);
        assert!(request.system.contains("expert resume parser"));
    }

    #[test]
    fn test_prompt_names_every_normalized_section() {
        let request = build_request("x", &settings());
        for key in [
            "Full Name",
            "Contact Info",
            "Skills",
            "Education",
            "Work Experience",
            "Certifications",
            "LinkedIn",
            "GitHub",
            "Programming Languages",
            "```json",
        ] {
            assert!(request.user.contains(key), "prompt is missing {key}");
        }
    }
}
