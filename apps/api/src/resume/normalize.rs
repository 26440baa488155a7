//! Record Normalizer — maps the model's field names onto the stored schema.
//!
//! Total over its input: a missing or failed record still yields a complete
//! `NormalizedRecord` with every section present. Keys the normalizer does
//! not know about are carried through untouched.

use serde::Serialize;
use serde_json::{Map, Value};

use crate::resume::decode::ParsedRecord;

/// Passthrough key for a top-level value that is not a JSON object.
pub const RAW_KEY: &str = "raw";
/// Wrapper key for a mapping section that arrived as something else.
pub const ITEMS_KEY: &str = "items";

/// The shape stored and rendered for every parsed résumé.
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct NormalizedRecord {
    pub education: Vec<Value>,
    #[serde(rename = "workExperience")]
    pub work_experience: Vec<Value>,
    pub certifications: Vec<Value>,
    #[serde(rename = "Contact Info")]
    pub contact_info: Map<String, Value>,
    #[serde(rename = "Skills")]
    pub skills: Map<String, Value>,
    /// Everything else the model emitted, e.g. "Full Name".
    #[serde(flatten)]
    pub extra: Map<String, Value>,
}

pub fn normalize(parsed: Option<ParsedRecord>) -> NormalizedRecord {
    let mut fields = match parsed {
        None | Some(Value::Null) => Map::new(),
        Some(Value::Object(map)) => map,
        Some(other) => Map::from_iter([(RAW_KEY.to_string(), other)]),
    };

    let education = into_list(take_section(&mut fields, "Education", "education"));
    let work_experience =
        into_list(take_section(&mut fields, "Work Experience", "workExperience"));
    let certifications =
        into_list(take_section(&mut fields, "Certifications", "certifications"));
    let contact_info = into_mapping(take_section(&mut fields, "Contact Info", "Contact Info"));
    let skills = into_mapping(take_section(&mut fields, "Skills", "Skills"));

    NormalizedRecord {
        education,
        work_experience,
        certifications,
        contact_info,
        skills,
        extra: fields,
    }
}

/// Removes a section from `fields`. The model's key wins; an already
/// canonical key is used when the model's key is absent, which keeps
/// `normalize` idempotent.
fn take_section(fields: &mut Map<String, Value>, source: &str, canonical: &str) -> Option<Value> {
    let existing = fields.remove(canonical);
    if source == canonical {
        return existing;
    }
    fields.remove(source).or(existing)
}

fn into_list(value: Option<Value>) -> Vec<Value> {
    match value {
        None | Some(Value::Null) => Vec::new(),
        Some(Value::Array(items)) => items,
        Some(other) => vec![other],
    }
}

fn into_mapping(value: Option<Value>) -> Map<String, Value> {
    match value {
        None | Some(Value::Null) => Map::new(),
        Some(Value::Object(map)) => map,
        Some(other) => Map::from_iter([(ITEMS_KEY.to_string(), other)]),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn renormalize(record: &NormalizedRecord) -> NormalizedRecord {
        normalize(Some(serde_json::to_value(record).unwrap()))
    }

    #[test]
    fn test_none_yields_empty_sections() {
        let record = normalize(None);
        let value = serde_json::to_value(&record).unwrap();
        assert_eq!(
            value,
            json!({
                "education": [],
                "workExperience": [],
                "certifications": [],
                "Contact Info": {},
                "Skills": {}
            })
        );
    }

    #[test]
    fn test_model_keys_map_to_canonical_keys() {
        let record = normalize(Some(json!({
            "Full Name": "Jane Doe",
            "Contact Info": {"Email": "jane@example.com"},
            "Skills": {"Programming Languages": ["Rust"]},
            "Education": [{"Degree": "BSc", "University": "MIT"}],
            "Work Experience": [{"Company": "Acme", "Role": "Engineer", "Duration": "2y"}],
            "Certifications": ["CKA"]
        })));

        assert_eq!(record.education, vec![json!({"Degree": "BSc", "University": "MIT"})]);
        assert_eq!(record.work_experience.len(), 1);
        assert_eq!(record.certifications, vec![json!("CKA")]);
        assert_eq!(record.contact_info["Email"], json!("jane@example.com"));
        assert_eq!(record.skills["Programming Languages"], json!(["Rust"]));
        assert_eq!(record.extra.len(), 1);
        assert_eq!(record.extra["Full Name"], json!("Jane Doe"));
    }

    #[test]
    fn test_unknown_keys_pass_through() {
        let record = normalize(Some(json!({
            "Full Name": "A",
            "Projects": [{"Name": "ats"}],
            "Summary": null
        })));
        assert_eq!(record.extra["Projects"], json!([{"Name": "ats"}]));
        assert_eq!(record.extra["Summary"], Value::Null);
    }

    #[test]
    fn test_source_key_match_is_case_sensitive() {
        let record = normalize(Some(json!({"work experience": [{"Company": "Acme"}]})));
        assert!(record.work_experience.is_empty());
        assert_eq!(record.extra["work experience"], json!([{"Company": "Acme"}]));
    }

    #[test]
    fn test_wrong_shapes_are_coerced() {
        let record = normalize(Some(json!({
            "Education": {"Degree": "BSc"},
            "Certifications": null,
            "Skills": ["Rust", "SQL"],
            "Contact Info": "jane@example.com"
        })));
        assert_eq!(record.education, vec![json!({"Degree": "BSc"})]);
        assert!(record.certifications.is_empty());
        assert_eq!(record.skills[ITEMS_KEY], json!(["Rust", "SQL"]));
        assert_eq!(record.contact_info[ITEMS_KEY], json!("jane@example.com"));
    }

    #[test]
    fn test_non_object_record_is_kept_under_raw() {
        let record = normalize(Some(json!(["Rust", "Go"])));
        assert_eq!(record.extra[RAW_KEY], json!(["Rust", "Go"]));
        assert!(record.skills.is_empty());
    }

    #[test]
    fn test_normalize_is_idempotent() {
        let inputs = [
            None,
            Some(json!({})),
            Some(json!("just a string")),
            Some(json!({
                "Full Name": "Jane Doe",
                "Education": [{"Degree": "BSc"}],
                "Work Experience": {"Company": "Acme"},
                "Skills": ["Rust"],
                "Hobbies": ["chess"]
            })),
        ];

        for input in inputs {
            let once = normalize(input);
            assert_eq!(renormalize(&once), once);
        }
    }
}
