//! Wire shapes of the store.
//!
//! Responses come either flat (`{ id, documentId, fullName, ... }`) or wrapped
//! in an `attributes` envelope (`{ id, attributes: { fullName, ... } }`), and
//! collections either as `{ data: [...] }` or as a bare array. Everything is
//! flattened here so no other module sees the ambiguity.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

use crate::models::resume::{
    EducationEntry, ExperienceEntry, ProjectEntry, ResumeRecord, ResumeSummary, SkillEntry,
};
use crate::resume::normalize::{integer, text, text_of};

/// `{ "data": ... }` request/response wrapper.
#[derive(Debug, Serialize, Deserialize)]
pub struct DataEnvelope<T> {
    pub data: T,
}

/// The fields sent on create/update. Identifiers are never sent; the store
/// owns them.
#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ResumeData<'a> {
    pub full_name: &'a str,
    pub email: &'a str,
    pub phone: &'a str,
    pub summary: &'a str,
    pub education: &'a [EducationEntry],
    pub experience: &'a [ExperienceEntry],
    pub skills: &'a [SkillEntry],
    pub projects: &'a [ProjectEntry],
}

impl<'a> From<&'a ResumeRecord> for ResumeData<'a> {
    fn from(r: &'a ResumeRecord) -> Self {
        Self {
            full_name: &r.full_name,
            email: &r.email,
            phone: &r.phone,
            summary: &r.summary,
            education: &r.education,
            experience: &r.experience,
            skills: &r.skills,
            projects: &r.projects,
        }
    }
}

/// Flattens an `attributes` envelope into its parent. The outer `id` wins;
/// for other keys a non-empty attribute value wins over the outer one.
pub fn unwrap_entity(value: &Value) -> Value {
    let Some(obj) = value.as_object() else {
        return value.clone();
    };
    let Some(attributes) = obj.get("attributes").and_then(Value::as_object) else {
        return value.clone();
    };

    let mut merged: Map<String, Value> = obj
        .iter()
        .filter(|(key, _)| key.as_str() != "attributes")
        .map(|(key, val)| (key.clone(), val.clone()))
        .collect();

    for (key, val) in attributes {
        if key == "id" && merged.contains_key("id") {
            continue;
        }
        let blank = val.is_null() || val.as_str() == Some("");
        if blank && merged.contains_key(key) {
            continue;
        }
        merged.insert(key.clone(), val.clone());
    }

    Value::Object(merged)
}

/// Items of a collection response, each flattened.
pub fn collection_items(body: &Value) -> Vec<Value> {
    match body.get("data").unwrap_or(body) {
        Value::Array(items) => items.iter().map(unwrap_entity).collect(),
        _ => Vec::new(),
    }
}

/// The single entity of a response: `{ data: {...} }`, `{ data: [first, ...] }`
/// or a bare object. `None` when there is nothing.
pub fn single_item(body: &Value) -> Option<Value> {
    let data = body.get("data").unwrap_or(body);
    match data {
        Value::Array(items) => items.first().map(unwrap_entity),
        Value::Object(_) => Some(unwrap_entity(data)),
        _ => None,
    }
}

/// List-view projection of an already flattened entity.
pub fn summary_from(value: &Value) -> ResumeSummary {
    let empty = Map::new();
    let obj = value.as_object().unwrap_or(&empty);
    ResumeSummary {
        id: integer(obj.get("id")),
        document_id: obj
            .get("documentId")
            .map(text_of)
            .filter(|id| !id.is_empty()),
        full_name: text(obj, "fullName"),
        email: text(obj, "email"),
        phone: text(obj, "phone"),
        summary: text(obj, "summary"),
        created_at: obj
            .get("createdAt")
            .and_then(Value::as_str)
            .and_then(|s| DateTime::parse_from_rfc3339(s).ok())
            .map(|dt| dt.with_timezone(&Utc)),
    }
}
