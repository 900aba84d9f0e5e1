//! Preview projector: read-only display view of a resume, shared by the
//! preview endpoint and the PDF export.
//!
//! Entries without their discriminating field are dropped; a section with no
//! remaining entries is absent. The source record is never modified.

use serde::Serialize;

use crate::models::resume::{ListEntry, ListSection, ResumeRecord};

/// A dated item (education or experience).
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct TimelineItem {
    pub title: String,
    pub subtitle: String,
    pub description: Option<String>,
    pub dates: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct SkillTag {
    pub name: String,
    pub description: Option<String>,
    /// `"name - description"`, or just the name.
    pub label: String,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ProjectItem {
    pub title: String,
    pub tech_stack: Vec<String>,
    pub description: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ResumePreview {
    pub full_name: String,
    pub email: String,
    pub phone: Option<String>,
    pub summary: Option<String>,
    pub education: Vec<TimelineItem>,
    pub experience: Vec<TimelineItem>,
    pub skills: Vec<SkillTag>,
    pub projects: Vec<ProjectItem>,
    /// No summary and no section: rendered as an empty state.
    pub is_minimal: bool,
}

impl ResumePreview {
    pub fn has_section(&self, section: ListSection) -> bool {
        self.section_len(section) > 0
    }

    pub fn section_len(&self, section: ListSection) -> usize {
        match section {
            ListSection::Education => self.education.len(),
            ListSection::Experience => self.experience.len(),
            ListSection::Skills => self.skills.len(),
            ListSection::Projects => self.projects.len(),
        }
    }
}

pub fn project(record: &ResumeRecord) -> ResumePreview {
    let education: Vec<_> = displayable(&record.education)
        .map(|e| TimelineItem {
            title: e.degree.clone(),
            subtitle: e.school.clone(),
            description: non_empty(&e.description),
            dates: date_range(&e.start_date, &e.end_date),
        })
        .collect();

    let experience: Vec<_> = displayable(&record.experience)
        .map(|e| TimelineItem {
            title: e.position.clone(),
            subtitle: e.company.clone(),
            description: non_empty(&e.description),
            dates: date_range(&e.start_date, &e.end_date),
        })
        .collect();

    let skills: Vec<_> = displayable(&record.skills)
        .map(|s| {
            let description = non_empty(&s.description);
            let label = match &description {
                Some(d) => format!("{} - {}", s.name, d),
                None => s.name.clone(),
            };
            SkillTag {
                name: s.name.clone(),
                description,
                label,
            }
        })
        .collect();

    let projects: Vec<_> = displayable(&record.projects)
        .map(|p| ProjectItem {
            title: p.title.clone(),
            tech_stack: p.tech_stack.clone(),
            description: non_empty(&p.description),
        })
        .collect();

    let summary = non_empty(&record.summary);
    let is_minimal = summary.is_none()
        && education.is_empty()
        && experience.is_empty()
        && skills.is_empty()
        && projects.is_empty();

    ResumePreview {
        full_name: record.full_name.clone(),
        email: record.email.clone(),
        phone: non_empty(&record.phone),
        summary,
        education,
        experience,
        skills,
        projects,
        is_minimal,
    }
}

/// `"{start} - {end}"` with a missing end shown as `Present`.
/// `None` when both dates are empty (no badge at all).
pub fn date_range(start: &str, end: &str) -> Option<String> {
    if start.is_empty() && end.is_empty() {
        return None;
    }
    let end = if end.is_empty() { "Present" } else { end };
    Some(format!("{start} - {end}"))
}

fn displayable<T: ListEntry>(entries: &[T]) -> impl Iterator<Item = &T> {
    entries.iter().filter(|e| e.is_displayable())
}

fn non_empty(s: &str) -> Option<String> {
    (!s.is_empty()).then(|| s.to_string())
}
