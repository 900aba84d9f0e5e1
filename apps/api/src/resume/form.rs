//! Form state controller: the editable, in-memory copy of one resume.
//!
//! Invariant: while a record lives inside a `ResumeForm`, every list holds at
//! least one entry. `load` pads, `remove_list_entry` refuses to empty a list.

use serde::{Deserialize, Serialize};
use tracing::debug;

use crate::models::resume::{EntryField, ListEntry, ListSection, ResumeRecord, ScalarField};
use crate::resume::normalize::pad_for_edit;

/// A single edit, as sent by clients driving the form over HTTP.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "op", rename_all = "snake_case")]
pub enum FormAction {
    SetField {
        field: ScalarField,
        value: String,
    },
    SetEntryField {
        section: ListSection,
        index: usize,
        field: EntryField,
        value: String,
    },
    AddEntry {
        section: ListSection,
    },
    RemoveEntry {
        section: ListSection,
        index: usize,
    },
}

#[derive(Debug, Clone)]
pub struct ResumeForm {
    record: ResumeRecord,
    baseline: ResumeRecord,
}

impl Default for ResumeForm {
    fn default() -> Self {
        Self::new()
    }
}

impl ResumeForm {
    /// A brand-new resume: empty scalars, one placeholder row per section.
    pub fn new() -> Self {
        Self::load(ResumeRecord::default())
    }

    /// Takes ownership of a normalized record. The loaded state becomes the
    /// baseline for [`ResumeForm::is_dirty`].
    pub fn load(mut record: ResumeRecord) -> Self {
        pad_for_edit(&mut record);
        Self {
            baseline: record.clone(),
            record,
        }
    }

    pub fn record(&self) -> &ResumeRecord {
        &self.record
    }

    pub fn set_field(&mut self, field: ScalarField, value: impl Into<String>) {
        *self.record.scalar_mut(field) = value.into();
    }

    /// Replaces one field of one entry. Out-of-range indices and fields that
    /// the section's entry type does not have are ignored (`false`).
    pub fn set_list_entry_field(
        &mut self,
        section: ListSection,
        index: usize,
        field: EntryField,
        value: impl Into<String>,
    ) -> bool {
        let value = value.into();
        let r = &mut self.record;
        match section {
            ListSection::Education => set_entry(&mut r.education, index, field, value),
            ListSection::Experience => set_entry(&mut r.experience, index, field, value),
            ListSection::Skills => set_entry(&mut r.skills, index, field, value),
            ListSection::Projects => set_entry(&mut r.projects, index, field, value),
        }
    }

    /// Appends the section's blank template at the end of the list.
    pub fn add_list_entry(&mut self, section: ListSection) {
        let r = &mut self.record;
        match section {
            ListSection::Education => r.education.push(Default::default()),
            ListSection::Experience => r.experience.push(Default::default()),
            ListSection::Skills => r.skills.push(Default::default()),
            ListSection::Projects => r.projects.push(Default::default()),
        }
    }

    /// Removes the entry at `index` unless it is the last one left.
    pub fn remove_list_entry(&mut self, section: ListSection, index: usize) -> bool {
        let r = &mut self.record;
        match section {
            ListSection::Education => remove_entry(&mut r.education, index),
            ListSection::Experience => remove_entry(&mut r.experience, index),
            ListSection::Skills => remove_entry(&mut r.skills, index),
            ListSection::Projects => remove_entry(&mut r.projects, index),
        }
    }

    /// Applies one action. Returns whether it changed anything structurally
    /// valid (ignored actions return `false`).
    pub fn apply(&mut self, action: FormAction) -> bool {
        let applied = match &action {
            FormAction::SetField { field, value } => {
                self.set_field(*field, value.clone());
                true
            }
            FormAction::SetEntryField {
                section,
                index,
                field,
                value,
            } => self.set_list_entry_field(*section, *index, *field, value.clone()),
            FormAction::AddEntry { section } => {
                self.add_list_entry(*section);
                true
            }
            FormAction::RemoveEntry { section, index } => self.remove_list_entry(*section, *index),
        };
        if !applied {
            debug!(?action, "form action ignored");
        }
        applied
    }

    /// Applies actions in order, returning how many took effect.
    pub fn apply_all(&mut self, actions: impl IntoIterator<Item = FormAction>) -> usize {
        actions
            .into_iter()
            .map(|action| self.apply(action))
            .filter(|applied| *applied)
            .count()
    }

    /// The record as it would be submitted. Top-level scalars are trimmed;
    /// list-entry text is left exactly as typed.
    pub fn snapshot(&self) -> ResumeRecord {
        let mut record = self.record.clone();
        for field in ScalarField::ALL {
            let slot = record.scalar_mut(field);
            *slot = slot.trim().to_string();
        }
        record
    }

    pub fn is_dirty(&self) -> bool {
        self.record != self.baseline
    }

    /// Whether anything at all has been typed into the form.
    pub fn has_data(&self) -> bool {
        let r = &self.record;
        ScalarField::ALL.iter().any(|f| !r.scalar(*f).is_empty())
            || r.education.iter().any(ListEntry::has_content)
            || r.experience.iter().any(ListEntry::has_content)
            || r.skills.iter().any(ListEntry::has_content)
            || r.projects.iter().any(ListEntry::has_content)
    }

    #[cfg(test)]
    pub fn list_len(&self, section: ListSection) -> usize {
        self.record.list_len(section)
    }
}

fn set_entry<T: ListEntry>(list: &mut [T], index: usize, field: EntryField, value: String) -> bool {
    list.get_mut(index)
        .map(|entry| entry.set_field(field, value))
        .unwrap_or(false)
}

fn remove_entry<T>(list: &mut Vec<T>, index: usize) -> bool {
    if list.len() <= 1 || index >= list.len() {
        return false;
    }
    list.remove(index);
    true
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::resume::{EducationEntry, ProjectEntry, SkillEntry};
    use crate::resume::normalize::normalize_for_edit;
    use serde_json::json;

    fn filled_form() -> ResumeForm {
        ResumeForm::load(normalize_for_edit(&json!({
            "fullName": "Jane",
            "email": "j@x.com",
            "skills": [{ "name": "Rust", "description": "" }, { "name": "Go", "description": "" }]
        })))
    }

    #[test]
    fn test_new_form_has_one_placeholder_per_section() {
        let form = ResumeForm::new();
        for section in ListSection::ALL {
            assert_eq!(form.list_len(section), 1);
        }
        assert!(!form.has_data());
        assert!(!form.is_dirty());
    }

    #[test]
    fn test_set_field_replaces_scalar() {
        let mut form = ResumeForm::new();
        form.set_field(ScalarField::Summary, "Backend engineer");
        assert_eq!(form.record().summary, "Backend engineer");
        assert!(form.is_dirty());
        assert!(form.has_data());
    }

    #[test]
    fn test_set_list_entry_field_in_bounds() {
        let mut form = ResumeForm::new();
        assert!(form.set_list_entry_field(ListSection::Education, 0, EntryField::School, "MIT"));
        assert_eq!(form.record().education[0].school, "MIT");
    }

    #[test]
    fn test_set_list_entry_field_out_of_bounds_is_noop() {
        let mut form = ResumeForm::new();
        let before = form.record().clone();
        assert!(!form.set_list_entry_field(ListSection::Skills, 5, EntryField::Name, "Rust"));
        assert_eq!(form.record(), &before);
    }

    #[test]
    fn test_set_list_entry_field_wrong_field_is_noop() {
        let mut form = ResumeForm::new();
        assert!(!form.set_list_entry_field(ListSection::Skills, 0, EntryField::Company, "Acme"));
        assert!(!form.is_dirty());
    }

    #[test]
    fn test_set_tech_stack_splits() {
        let mut form = ResumeForm::new();
        form.set_list_entry_field(
            ListSection::Projects,
            0,
            EntryField::TechStack,
            "React, Node.js,  TypeScript",
        );
        assert_eq!(
            form.record().projects[0].tech_stack,
            vec!["React", "Node.js", "TypeScript"]
        );
    }

    #[test]
    fn test_add_appends_blank_template() {
        let mut form = ResumeForm::new();
        form.set_list_entry_field(ListSection::Education, 0, EntryField::School, "MIT");
        form.add_list_entry(ListSection::Education);
        assert_eq!(form.list_len(ListSection::Education), 2);
        assert_eq!(form.record().education[0].school, "MIT");
        assert_eq!(form.record().education[1], EducationEntry::default());
    }

    #[test]
    fn test_add_then_remove_restores_list() {
        let mut form = filled_form();
        let before = form.record().skills.clone();
        form.add_list_entry(ListSection::Skills);
        let new_index = form.list_len(ListSection::Skills) - 1;
        assert!(form.remove_list_entry(ListSection::Skills, new_index));
        assert_eq!(form.record().skills, before);
    }

    #[test]
    fn test_remove_on_single_entry_is_noop() {
        let mut form = ResumeForm::new();
        form.set_list_entry_field(ListSection::Projects, 0, EntryField::Title, "Site");
        let before = form.record().projects.clone();
        assert!(!form.remove_list_entry(ListSection::Projects, 0));
        assert!(!form.remove_list_entry(ListSection::Projects, 0));
        assert_eq!(form.record().projects, before);
        assert_eq!(before[0].title, "Site");
    }

    #[test]
    fn test_remove_out_of_bounds_is_noop() {
        let mut form = filled_form();
        assert!(!form.remove_list_entry(ListSection::Skills, 9));
        assert_eq!(form.list_len(ListSection::Skills), 2);
    }

    #[test]
    fn test_remove_middle_entry_keeps_order() {
        let mut form = filled_form();
        form.add_list_entry(ListSection::Skills);
        form.set_list_entry_field(ListSection::Skills, 2, EntryField::Name, "Zig");
        assert!(form.remove_list_entry(ListSection::Skills, 1));
        let names: Vec<_> = form.record().skills.iter().map(|s| s.name.as_str()).collect();
        assert_eq!(names, vec!["Rust", "Zig"]);
    }

    #[test]
    fn test_snapshot_trims_only_scalars() {
        let mut form = ResumeForm::load(normalize_for_edit(&json!({
            "fullName": " Jane Doe ",
            "email": "j@x.com",
            "education": []
        })));
        form.set_list_entry_field(ListSection::Education, 0, EntryField::Description, "  keep  ");
        form.set_field(ScalarField::Phone, "\t555 ");
        let snap = form.snapshot();
        assert_eq!(snap.full_name, "Jane Doe");
        assert_eq!(snap.phone, "555");
        assert_eq!(snap.education[0].description, "  keep  ");
        // The live form is untouched.
        assert_eq!(form.record().full_name, " Jane Doe ");
    }

    #[test]
    fn test_apply_actions_from_json() {
        let actions: Vec<FormAction> = serde_json::from_value(json!([
            { "op": "set_field", "field": "fullName", "value": "Jane" },
            { "op": "add_entry", "section": "skills" },
            { "op": "set_entry_field", "section": "skills", "index": 1, "field": "name", "value": "Rust" },
            { "op": "remove_entry", "section": "skills", "index": 0 },
            { "op": "remove_entry", "section": "skills", "index": 0 }
        ]))
        .unwrap();
        let mut form = ResumeForm::new();
        assert_eq!(form.apply_all(actions), 4);
        assert_eq!(form.record().full_name, "Jane");
        assert_eq!(
            form.record().skills,
            vec![SkillEntry {
                name: "Rust".to_string(),
                description: String::new()
            }]
        );
    }

    #[test]
    fn test_has_data_sees_tech_stack() {
        let mut form = ResumeForm::load(ResumeRecord {
            projects: vec![ProjectEntry {
                tech_stack: vec!["Go".to_string()],
                ..Default::default()
            }],
            ..Default::default()
        });
        assert!(form.has_data());
        form.set_list_entry_field(ListSection::Projects, 0, EntryField::TechStack, " , ");
        assert!(!form.has_data());
    }
}
