//! Normalizer. Turns whatever the store (or a client) sends into a canonical
//! `ResumeRecord`.
//!
//! Every function here is total: missing keys, nulls, wrong types and extra
//! metadata never produce an error, they produce empty strings and empty lists.
//! User-authored free text is never "invalid", only "empty".

use serde_json::{Map, Value};

use crate::models::resume::{
    split_tech_stack, EducationEntry, ExperienceEntry, ListEntry, ProjectEntry, ResumeRecord,
    SkillEntry,
};

/// Converts a JSON object into a `ResumeRecord` without padding lists.
/// This is the shape used by the preview projector and the PDF export.
pub fn normalize(value: &Value) -> ResumeRecord {
    let Some(obj) = value.as_object() else {
        return ResumeRecord::default();
    };

    ResumeRecord {
        id: integer(obj.get("id")),
        document_id: obj
            .get("documentId")
            .map(text_of)
            .filter(|id| !id.is_empty()),
        full_name: text(obj, "fullName"),
        email: text(obj, "email"),
        phone: text(obj, "phone"),
        summary: text(obj, "summary"),
        education: entries(obj, "education", education_entry),
        experience: entries(obj, "experience", experience_entry),
        skills: entries(obj, "skills", skill_entry),
        projects: entries(obj, "projects", project_entry),
    }
}

/// Like [`normalize`], then pads every empty list with one placeholder entry.
/// This is the shape handed to the form controller.
pub fn normalize_for_edit(value: &Value) -> ResumeRecord {
    let mut record = normalize(value);
    pad_for_edit(&mut record);
    record
}

/// Ensures every list holds at least one entry.
pub fn pad_for_edit(record: &mut ResumeRecord) {
    pad(&mut record.education);
    pad(&mut record.experience);
    pad(&mut record.skills);
    pad(&mut record.projects);
}

fn pad<T: ListEntry>(list: &mut Vec<T>) {
    if list.is_empty() {
        list.push(T::default());
    }
}

/// Renders a scalar JSON value as text. Strings pass through, numbers and
/// booleans are printed, everything else is empty.
pub(crate) fn text_of(value: &Value) -> String {
    match value {
        Value::String(s) => s.clone(),
        Value::Number(n) => n.to_string(),
        Value::Bool(b) => b.to_string(),
        _ => String::new(),
    }
}

pub(crate) fn text(obj: &Map<String, Value>, key: &str) -> String {
    obj.get(key).map(text_of).unwrap_or_default()
}

pub(crate) fn integer(value: Option<&Value>) -> Option<i64> {
    match value? {
        Value::Number(n) => n.as_i64(),
        Value::String(s) => s.trim().parse().ok(),
        _ => None,
    }
}

fn entries<T: ListEntry>(
    obj: &Map<String, Value>,
    key: &str,
    decode: fn(&Map<String, Value>) -> T,
) -> Vec<T> {
    match obj.get(key) {
        Some(Value::Array(items)) => items
            .iter()
            .map(|item| item.as_object().map(decode).unwrap_or_default())
            .collect(),
        _ => Vec::new(),
    }
}

fn education_entry(obj: &Map<String, Value>) -> EducationEntry {
    EducationEntry {
        school: text(obj, "school"),
        degree: text(obj, "degree"),
        start_date: text(obj, "startDate"),
        end_date: text(obj, "endDate"),
        description: text(obj, "description"),
    }
}

fn experience_entry(obj: &Map<String, Value>) -> ExperienceEntry {
    ExperienceEntry {
        company: text(obj, "company"),
        position: text(obj, "position"),
        start_date: text(obj, "startDate"),
        end_date: text(obj, "endDate"),
        description: text(obj, "description"),
    }
}

fn skill_entry(obj: &Map<String, Value>) -> SkillEntry {
    SkillEntry {
        name: text(obj, "name"),
        description: text(obj, "description"),
    }
}

fn project_entry(obj: &Map<String, Value>) -> ProjectEntry {
    // Older records were written with a lowercase `techstack` key.
    let raw = obj.get("techStack").or_else(|| obj.get("techstack"));
    ProjectEntry {
        title: text(obj, "title"),
        description: text(obj, "description"),
        tech_stack: raw.map(tech_stack_of).unwrap_or_default(),
    }
}

fn tech_stack_of(value: &Value) -> Vec<String> {
    match value {
        Value::Array(items) => items
            .iter()
            .flat_map(|item| split_tech_stack(&text_of(item)))
            .collect(),
        other => split_tech_stack(&text_of(other)),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::resume::ListSection;
    use serde_json::json;

    #[test]
    fn test_edit_normalization_pads_empty_education() {
        let record = normalize_for_edit(&json!({
            "fullName": " Jane Doe ",
            "email": "j@x.com",
            "education": []
        }));
        assert_eq!(record.education, vec![EducationEntry::default()]);
        assert_eq!(record.full_name, " Jane Doe ");
    }

    #[test]
    fn test_edit_normalization_every_list_non_empty() {
        let inputs = [
            json!({}),
            json!(null),
            json!("not an object"),
            json!({ "skills": null, "projects": "oops" }),
            json!({ "education": [{ "school": "MIT" }], "experience": [] }),
        ];
        for input in inputs {
            let record = normalize_for_edit(&input);
            for section in ListSection::ALL {
                assert!(
                    record.list_len(section) >= 1,
                    "{section:?} empty for input {input}"
                );
            }
        }
    }

    #[test]
    fn test_view_normalization_does_not_pad() {
        let record = normalize(&json!({ "fullName": "A", "skills": [] }));
        assert!(record.skills.is_empty());
        assert!(record.education.is_empty());
    }

    #[test]
    fn test_missing_entry_keys_default_to_empty() {
        let record = normalize(&json!({
            "experience": [{ "company": "Acme" }]
        }));
        let exp = &record.experience[0];
        assert_eq!(exp.company, "Acme");
        assert_eq!(exp.position, "");
        assert_eq!(exp.end_date, "");
    }

    #[test]
    fn test_non_string_scalars_are_coerced() {
        let record = normalize(&json!({
            "fullName": null,
            "phone": 5551234,
            "summary": { "nested": true },
            "email": false
        }));
        assert_eq!(record.full_name, "");
        assert_eq!(record.phone, "5551234");
        assert_eq!(record.summary, "");
        assert_eq!(record.email, "false");
    }

    #[test]
    fn test_non_object_list_items_become_blank_entries() {
        let record = normalize(&json!({ "skills": ["Rust", { "name": "Go" }] }));
        assert_eq!(record.skills.len(), 2);
        assert_eq!(record.skills[0], SkillEntry::default());
        assert_eq!(record.skills[1].name, "Go");
    }

    #[test]
    fn test_extra_metadata_ignored_and_ids_kept() {
        let record = normalize(&json!({
            "id": 7,
            "documentId": "abc123",
            "createdAt": "2024-01-01T00:00:00Z",
            "publishedAt": null,
            "fullName": "Jane"
        }));
        assert_eq!(record.id, Some(7));
        assert_eq!(record.document_id.as_deref(), Some("abc123"));
        assert_eq!(record.full_name, "Jane");
    }

    #[test]
    fn test_string_id_parsed() {
        assert_eq!(normalize(&json!({ "id": "42" })).id, Some(42));
        assert_eq!(normalize(&json!({ "id": "x" })).id, None);
    }

    #[test]
    fn test_tech_stack_string_and_legacy_key() {
        let record = normalize(&json!({
            "projects": [
                { "title": "A", "techStack": "React, Node.js,  TypeScript" },
                { "title": "B", "techstack": "Go" },
                { "title": "C", "techStack": ["Rust", " Tokio "] },
                { "title": "D", "techStack": "" }
            ]
        }));
        assert_eq!(
            record.projects[0].tech_stack,
            vec!["React", "Node.js", "TypeScript"]
        );
        assert_eq!(record.projects[1].tech_stack, vec!["Go"]);
        assert_eq!(record.projects[2].tech_stack, vec!["Rust", "Tokio"]);
        assert!(record.projects[3].tech_stack.is_empty());
    }

    #[test]
    fn test_serialize_then_normalize_round_trip() {
        let record = normalize_for_edit(&json!({
            "id": 3,
            "documentId": "doc-3",
            "fullName": "Jane Doe",
            "email": "j@x.com",
            "phone": "",
            "summary": "Engineer",
            "education": [{ "school": "MIT", "degree": "BSc", "startDate": "2015", "endDate": "2019", "description": "  spaced  " }],
            "projects": [{ "title": "Site", "description": "d", "techStack": "React,  Go" }]
        }));
        let serialized = serde_json::to_value(&record).unwrap();
        assert_eq!(normalize(&serialized), record);
    }
}
