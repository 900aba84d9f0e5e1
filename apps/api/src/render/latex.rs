//! LaTeX source for the PDF export, built from a `ResumePreview`.
//!
//! Only sections present in the preview are emitted; a minimal resume gets an
//! empty-state paragraph instead. All user text goes through [`latex_escape`].

use crate::models::resume::ListSection;
use crate::resume::preview::{ResumePreview, TimelineItem};

const PREAMBLE: &str = r"\documentclass[10pt]{article}
\usepackage[margin=0.75in]{geometry}
\usepackage[T1]{fontenc}
\usepackage{xcolor}
\definecolor{accent}{HTML}{4F46E5}
\definecolor{muted}{HTML}{6B7280}
\pagestyle{empty}
\setlength{\parindent}{0pt}
\newcommand{\resumesection}[1]{\vspace{10pt}{\large\bfseries\color{accent}#1}\par\vspace{2pt}\hrule\vspace{6pt}}
\newcommand{\datebadge}[1]{\hfill{\small\color{muted}#1}}
\newcommand{\techtag}[1]{\fbox{\footnotesize #1}\,}
";

pub fn render_resume(preview: &ResumePreview) -> String {
    let mut tex = String::with_capacity(4096);
    tex.push_str(PREAMBLE);
    tex.push_str("\\begin{document}\n");

    render_header(&mut tex, preview);

    if let Some(summary) = &preview.summary {
        tex.push_str("\\resumesection{Professional Summary}\n");
        tex.push_str(&latex_escape(summary));
        tex.push_str("\n\n");
    }

    if preview.has_section(ListSection::Education) {
        section_heading(&mut tex, preview, ListSection::Education);
        render_timeline(&mut tex, &preview.education);
    }

    if preview.has_section(ListSection::Experience) {
        section_heading(&mut tex, preview, ListSection::Experience);
        render_timeline(&mut tex, &preview.experience);
    }

    if preview.has_section(ListSection::Skills) {
        section_heading(&mut tex, preview, ListSection::Skills);
        let labels: Vec<_> = preview
            .skills
            .iter()
            .map(|s| latex_escape(&s.label))
            .collect();
        tex.push_str(&labels.join(" \\textbullet{} "));
        tex.push_str("\n\n");
    }

    if preview.has_section(ListSection::Projects) {
        section_heading(&mut tex, preview, ListSection::Projects);
        for project in &preview.projects {
            tex.push_str(&format!("\\textbf{{{}}}\\par\n", latex_escape(&project.title)));
            if !project.tech_stack.is_empty() {
                for tag in &project.tech_stack {
                    tex.push_str(&format!("\\techtag{{{}}}", latex_escape(tag)));
                }
                tex.push_str("\\par\n");
            }
            if let Some(description) = &project.description {
                tex.push_str(&latex_escape(description));
                tex.push_str("\\par\n");
            }
            tex.push_str("\\vspace{6pt}\n");
        }
    }

    if preview.is_minimal {
        tex.push_str("\\vspace{24pt}\\begin{center}{\\color{muted}No resume content yet. ");
        tex.push_str("Add a summary, education, experience, skills or projects.}\\end{center}\n");
    }

    tex.push_str("\\end{document}\n");
    tex
}

fn render_header(tex: &mut String, preview: &ResumePreview) {
    tex.push_str("\\begin{center}\n");
    let name = if preview.full_name.trim().is_empty() {
        "Resume".to_string()
    } else {
        latex_escape(&preview.full_name)
    };
    tex.push_str(&format!("{{\\LARGE\\bfseries\\color{{accent}}{name}}}\\\\[4pt]\n"));

    let contact: Vec<_> = [Some(preview.email.as_str()), preview.phone.as_deref()]
        .into_iter()
        .flatten()
        .filter(|s| !s.is_empty())
        .map(latex_escape)
        .collect();
    if !contact.is_empty() {
        tex.push_str(&format!(
            "{{\\small {}}}\n",
            contact.join(" \\quad\\textbar\\quad ")
        ));
    }
    tex.push_str("\\end{center}\n");
}

fn section_heading(tex: &mut String, preview: &ResumePreview, section: ListSection) {
    tex.push_str(&format!(
        "\\resumesection{{{} ({})}}\n",
        section.title(),
        preview.section_len(section)
    ));
}

fn render_timeline(tex: &mut String, items: &[TimelineItem]) {
    for item in items {
        tex.push_str(&format!("\\textbf{{{}}}", latex_escape(&item.title)));
        if let Some(dates) = &item.dates {
            tex.push_str(&format!("\\datebadge{{{}}}", latex_escape(dates)));
        }
        tex.push_str("\\par\n");
        if !item.subtitle.is_empty() {
            tex.push_str(&format!("\\textit{{{}}}\\par\n", latex_escape(&item.subtitle)));
        }
        if let Some(description) = &item.description {
            tex.push_str(&latex_escape(description));
            tex.push_str("\\par\n");
        }
        tex.push_str("\\vspace{6pt}\n");
    }
}

/// Escapes TeX special characters and maps common typographic characters to
/// their TeX spellings. Blank lines are preserved as paragraph breaks.
pub fn latex_escape(input: &str) -> String {
    let mut out = String::with_capacity(input.len());
    for c in input.chars() {
        match c {
            '\\' => out.push_str("\\textbackslash{}"),
            '{' => out.push_str("\\{"),
            '}' => out.push_str("\\}"),
            '$' => out.push_str("\\$"),
            '&' => out.push_str("\\&"),
            '#' => out.push_str("\\#"),
            '^' => out.push_str("\\^{}"),
            '_' => out.push_str("\\_"),
            '%' => out.push_str("\\%"),
            '~' => out.push_str("\\~{}"),
            '<' => out.push_str("\\textless{}"),
            '>' => out.push_str("\\textgreater{}"),
            '\u{2014}' => out.push_str("---"),
            '\u{2013}' => out.push_str("--"),
            '\u{201C}' => out.push_str("``"),
            '\u{201D}' => out.push_str("''"),
            '\u{2018}' => out.push('`'),
            '\u{2019}' => out.push('\''),
            '\u{2022}' => out.push_str("\\textbullet{}"),
            '\u{20AC}' => out.push_str("EUR"),
            _ => out.push(c),
        }
    }
    out
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::resume::normalize::{normalize, normalize_for_edit};
    use crate::resume::preview::project;
    use serde_json::json;

    #[test]
    fn test_escape_specials() {
        assert_eq!(latex_escape("R&D 100% #1"), "R\\&D 100\\% \\#1");
        assert_eq!(latex_escape("a_b {c}"), "a\\_b \\{c\\}");
        assert_eq!(latex_escape("C:\\dir"), "C:\\textbackslash{}dir");
    }

    #[test]
    fn test_only_present_sections_rendered() {
        let preview = project(&normalize(&json!({
            "fullName": "Jane Doe",
            "email": "j@x.com",
            "experience": [{ "company": "Acme", "position": "Dev", "startDate": "2020" }],
            "skills": [{ "name": "" }]
        })));
        let tex = render_resume(&preview);
        assert!(tex.contains("Jane Doe"));
        assert!(tex.contains("Experience (1)"));
        assert!(tex.contains("2020 - Present"));
        assert!(!tex.contains("Skills ("));
        assert!(!tex.contains("Education ("));
        assert!(!tex.contains("No resume content yet"));
        assert!(tex.trim_end().ends_with("\\end{document}"));
    }

    #[test]
    fn test_minimal_resume_gets_empty_state() {
        let preview = project(&normalize_for_edit(&json!({ "fullName": "Jane" })));
        let tex = render_resume(&preview);
        assert!(tex.contains("No resume content yet"));
        assert!(!tex.contains("Professional Summary"));
    }

    #[test]
    fn test_project_tags_and_escaping() {
        let preview = project(&normalize(&json!({
            "fullName": "J & J",
            "projects": [{ "title": "C# tool", "techStack": "C#, .NET" }]
        })));
        let tex = render_resume(&preview);
        assert!(tex.contains("J \\& J"));
        assert!(tex.contains("\\techtag{C\\#}"));
        assert!(tex.contains("\\techtag{.NET}"));
        assert!(tex.contains("Projects (1)"));
    }
}
