use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize, Serializer};

// ────────────────────────────────────────────────────────────────────────────
// Field selectors
// ────────────────────────────────────────────────────────────────────────────

/// Top-level free-text fields of a resume.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum ScalarField {
    FullName,
    Email,
    Phone,
    Summary,
}

impl ScalarField {
    pub const ALL: [ScalarField; 4] = [
        ScalarField::FullName,
        ScalarField::Email,
        ScalarField::Phone,
        ScalarField::Summary,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            ScalarField::FullName => "fullName",
            ScalarField::Email => "email",
            ScalarField::Phone => "phone",
            ScalarField::Summary => "summary",
        }
    }
}

/// The repeatable sections of a resume.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ListSection {
    Education,
    Experience,
    Skills,
    Projects,
}

impl ListSection {
    #[cfg(test)]
    pub const ALL: [ListSection; 4] = [
        ListSection::Education,
        ListSection::Experience,
        ListSection::Skills,
        ListSection::Projects,
    ];

    /// Heading used by the preview and the PDF export.
    pub fn title(&self) -> &'static str {
        match self {
            ListSection::Education => "Education",
            ListSection::Experience => "Experience",
            ListSection::Skills => "Skills",
            ListSection::Projects => "Projects",
        }
    }
}

/// Every field name that can appear inside a list entry.
/// Which ones are valid depends on the section (see [`ListEntry::set_field`]).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum EntryField {
    School,
    Degree,
    Company,
    Position,
    StartDate,
    EndDate,
    Description,
    Name,
    Title,
    TechStack,
}

// ────────────────────────────────────────────────────────────────────────────
// List entries
// ────────────────────────────────────────────────────────────────────────────

/// Shared behaviour of the repeatable entry types.
///
/// `Default` is the zero-valued template appended by "add entry" and used as
/// the edit-mode placeholder row.
pub trait ListEntry: Clone + Default + PartialEq {
    /// Replaces one field. Returns `false` when the entry type has no such field.
    fn set_field(&mut self, field: EntryField, value: String) -> bool;

    /// Whether the discriminating field(s) are filled, i.e. the entry is shown
    /// in a preview or export.
    fn is_displayable(&self) -> bool;

    /// Whether any field at all carries text.
    fn has_content(&self) -> bool;
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct EducationEntry {
    pub school: String,
    pub degree: String,
    pub start_date: String,
    pub end_date: String,
    pub description: String,
}

impl ListEntry for EducationEntry {
    fn set_field(&mut self, field: EntryField, value: String) -> bool {
        let slot = match field {
            EntryField::School => &mut self.school,
            EntryField::Degree => &mut self.degree,
            EntryField::StartDate => &mut self.start_date,
            EntryField::EndDate => &mut self.end_date,
            EntryField::Description => &mut self.description,
            _ => return false,
        };
        *slot = value;
        true
    }

    fn is_displayable(&self) -> bool {
        !self.school.is_empty() || !self.degree.is_empty()
    }

    fn has_content(&self) -> bool {
        [
            &self.school,
            &self.degree,
            &self.start_date,
            &self.end_date,
            &self.description,
        ]
        .iter()
        .any(|s| !s.is_empty())
    }
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ExperienceEntry {
    pub company: String,
    pub position: String,
    pub start_date: String,
    pub end_date: String,
    pub description: String,
}

impl ListEntry for ExperienceEntry {
    fn set_field(&mut self, field: EntryField, value: String) -> bool {
        let slot = match field {
            EntryField::Company => &mut self.company,
            EntryField::Position => &mut self.position,
            EntryField::StartDate => &mut self.start_date,
            EntryField::EndDate => &mut self.end_date,
            EntryField::Description => &mut self.description,
            _ => return false,
        };
        *slot = value;
        true
    }

    fn is_displayable(&self) -> bool {
        !self.company.is_empty() || !self.position.is_empty()
    }

    fn has_content(&self) -> bool {
        [
            &self.company,
            &self.position,
            &self.start_date,
            &self.end_date,
            &self.description,
        ]
        .iter()
        .any(|s| !s.is_empty())
    }
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct SkillEntry {
    pub name: String,
    pub description: String,
}

impl ListEntry for SkillEntry {
    fn set_field(&mut self, field: EntryField, value: String) -> bool {
        match field {
            EntryField::Name => self.name = value,
            EntryField::Description => self.description = value,
            _ => return false,
        }
        true
    }

    fn is_displayable(&self) -> bool {
        !self.name.is_empty()
    }

    fn has_content(&self) -> bool {
        !self.name.is_empty() || !self.description.is_empty()
    }
}

/// A project. `tech_stack` is kept as a list here; the store only knows the
/// flat comma-separated `techStack` string, produced on serialization.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ProjectEntry {
    pub title: String,
    pub description: String,
    #[serde(serialize_with = "serialize_tech_stack")]
    pub tech_stack: Vec<String>,
}

impl ListEntry for ProjectEntry {
    fn set_field(&mut self, field: EntryField, value: String) -> bool {
        match field {
            EntryField::Title => self.title = value,
            EntryField::Description => self.description = value,
            EntryField::TechStack => self.tech_stack = split_tech_stack(&value),
            _ => return false,
        }
        true
    }

    fn is_displayable(&self) -> bool {
        !self.title.is_empty()
    }

    fn has_content(&self) -> bool {
        !self.title.is_empty() || !self.description.is_empty() || !self.tech_stack.is_empty()
    }
}

/// Splits a free-text tech stack on commas. Segments are trimmed and empty
/// segments dropped, so `"React, ,Go"` yields two tags.
pub fn split_tech_stack(raw: &str) -> Vec<String> {
    raw.split(',')
        .map(str::trim)
        .filter(|s| !s.is_empty())
        .map(str::to_string)
        .collect()
}

pub fn join_tech_stack(tags: &[String]) -> String {
    tags.join(", ")
}

fn serialize_tech_stack<S: Serializer>(tags: &[String], serializer: S) -> Result<S::Ok, S::Error> {
    serializer.serialize_str(&join_tech_stack(tags))
}

// ────────────────────────────────────────────────────────────────────────────
// Records
// ────────────────────────────────────────────────────────────────────────────

/// The canonical resume. Built only through `resume::normalize`, so every
/// field is a plain string and no key is ever missing.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ResumeRecord {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub id: Option<i64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub document_id: Option<String>,
    pub full_name: String,
    pub email: String,
    pub phone: String,
    pub summary: String,
    pub education: Vec<EducationEntry>,
    pub experience: Vec<ExperienceEntry>,
    pub skills: Vec<SkillEntry>,
    pub projects: Vec<ProjectEntry>,
}

impl ResumeRecord {
    pub fn scalar(&self, field: ScalarField) -> &str {
        match field {
            ScalarField::FullName => &self.full_name,
            ScalarField::Email => &self.email,
            ScalarField::Phone => &self.phone,
            ScalarField::Summary => &self.summary,
        }
    }

    pub fn scalar_mut(&mut self, field: ScalarField) -> &mut String {
        match field {
            ScalarField::FullName => &mut self.full_name,
            ScalarField::Email => &mut self.email,
            ScalarField::Phone => &mut self.phone,
            ScalarField::Summary => &mut self.summary,
        }
    }

    #[cfg(test)]
    pub fn list_len(&self, section: ListSection) -> usize {
        match section {
            ListSection::Education => self.education.len(),
            ListSection::Experience => self.experience.len(),
            ListSection::Skills => self.skills.len(),
            ListSection::Projects => self.projects.len(),
        }
    }
}

/// Row of the resume list view. List entries are only loaded per record.
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ResumeSummary {
    pub id: Option<i64>,
    pub document_id: Option<String>,
    pub full_name: String,
    pub email: String,
    pub phone: String,
    pub summary: String,
    pub created_at: Option<DateTime<Utc>>,
}
