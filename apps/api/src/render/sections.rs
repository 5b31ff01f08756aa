//! Per-section-type formatters for CV documents.
//!
//! Each formatter returns `Ok(None)` when its content source is empty so the
//! caller can drop the section instead of emitting an empty heading.

use std::fmt::{self, Write};

use crate::models::document::{
    non_empty, DocumentModel, Populated, ReferencesDisplay, SectionType, SkillCategory,
};
use crate::render::escape::{escape_html, safe_href};
use crate::render::locale::{format_date, format_phone, format_range};

pub const REFERENCES_ON_REQUEST: &str = "References available on request.";

type Body = Result<Option<String>, fmt::Error>;

/// Markup for the body of one section, dispatched on its type.
pub fn format_body(kind: &SectionType, doc: &DocumentModel) -> Body {
    match kind {
        SectionType::Summary => summary(doc),
        SectionType::Experience => experience(doc),
        SectionType::Education => education(doc),
        SectionType::Skills => skills(doc),
        SectionType::Projects => projects(doc),
        SectionType::Certifications => certifications(doc),
        SectionType::Languages => languages(doc),
        SectionType::Interests => interests(doc),
        SectionType::References => references(doc),
        SectionType::Other(_) => Ok(None),
    }
}

/// Splits free text on blank lines into escaped `<p>` elements.
pub fn paragraphs(out: &mut String, class: &str, text: &str) -> fmt::Result {
    for para in text.split("\n\n").map(str::trim).filter(|p| !p.is_empty()) {
        write!(out, r#"<p class="{class}">{}</p>"#, escape_html(para))?;
    }
    Ok(())
}

fn summary(doc: &DocumentModel) -> Body {
    let Some(text) = non_empty(&doc.personal.summary) else {
        return Ok(None);
    };
    let mut out = String::new();
    paragraphs(&mut out, "cv-summary", text)?;
    Ok(Some(out))
}

fn experience(doc: &DocumentModel) -> Body {
    let mut out = String::new();
    for exp in doc.experience.iter().filter(|e| e.is_populated()) {
        write!(out, r#"<article class="cv-entry cv-experience" data-id="{}">"#, escape_html(&exp.id))?;
        write!(
            out,
            r#"<div class="cv-entry-head"><h3 class="cv-entry-title">{}</h3><span class="cv-entry-org">{}</span></div>"#,
            escape_html(exp.position.trim()),
            escape_html(exp.company.trim())
        )?;
        let dates = format_range(
            Some(exp.start_date.as_str()),
            exp.effective_end_date(),
            exp.current,
            doc.locale,
        );
        meta_line(&mut out, &dates, non_empty(&exp.location))?;
        if let Some(desc) = non_empty(&exp.description) {
            paragraphs(&mut out, "cv-entry-description", desc)?;
        }
        bullet_list(&mut out, "cv-achievements", &exp.achievements)?;
        out.push_str("</article>");
    }
    Ok(non_blank(out))
}

fn education(doc: &DocumentModel) -> Body {
    let mut out = String::new();
    for edu in doc.education.iter().filter(|e| e.is_populated()) {
        write!(out, r#"<article class="cv-entry cv-education" data-id="{}">"#, escape_html(&edu.id))?;
        let degree = match non_empty(&edu.field_of_study) {
            Some(field) if !edu.degree.trim().is_empty() => format!("{}, {}", edu.degree.trim(), field),
            Some(field) => field.to_string(),
            None => edu.degree.trim().to_string(),
        };
        write!(
            out,
            r#"<div class="cv-entry-head"><h3 class="cv-entry-title">{}</h3><span class="cv-entry-org">{}</span></div>"#,
            escape_html(&degree),
            escape_html(edu.institution.trim())
        )?;
        let dates = format_range(
            edu.start_date.as_deref(),
            edu.end_date.as_deref(),
            false,
            doc.locale,
        );
        meta_line(&mut out, &dates, non_empty(&edu.location))?;
        if let Some(grade) = non_empty(&edu.grade) {
            write!(out, r#"<p class="cv-grade">{}</p>"#, escape_html(grade))?;
        }
        if let Some(desc) = non_empty(&edu.description) {
            paragraphs(&mut out, "cv-entry-description", desc)?;
        }
        out.push_str("</article>");
    }
    Ok(non_blank(out))
}

fn skills(doc: &DocumentModel) -> Body {
    let mut out = String::new();
    for category in SkillCategory::ALL {
        let group: Vec<_> = doc
            .skills
            .iter()
            .filter(|s| s.category == category && s.is_populated())
            .collect();
        if group.is_empty() {
            continue;
        }
        write!(
            out,
            r#"<div class="cv-skill-group"><h3 class="cv-skill-category">{}</h3><ul class="cv-skills">"#,
            category.label()
        )?;
        for skill in group {
            write!(
                out,
                r#"<li class="cv-skill level-{level}"><span class="cv-skill-name">{}</span> <span class="cv-skill-level">{}</span></li>"#,
                escape_html(skill.name.trim()),
                skill.level.label(),
                level = skill.level.label().to_ascii_lowercase()
            )?;
        }
        out.push_str("</ul></div>");
    }
    Ok(non_blank(out))
}

fn projects(doc: &DocumentModel) -> Body {
    let mut out = String::new();
    for project in doc.projects.iter().filter(|p| p.is_populated()) {
        write!(out, r#"<article class="cv-entry cv-project" data-id="{}">"#, escape_html(&project.id))?;
        let name = escape_html(project.name.trim());
        match project.url.as_deref().and_then(safe_href) {
            Some(href) => write!(
                out,
                r#"<h3 class="cv-entry-title"><a href="{href}">{name}</a></h3>"#
            )?,
            None => write!(out, r#"<h3 class="cv-entry-title">{name}</h3>"#)?,
        }
        let dates = format_range(
            project.start_date.as_deref(),
            project.end_date.as_deref(),
            false,
            doc.locale,
        );
        meta_line(&mut out, &dates, None)?;
        if let Some(desc) = non_empty(&project.description) {
            paragraphs(&mut out, "cv-entry-description", desc)?;
        }
        let tech: Vec<&str> = project
            .technologies
            .iter()
            .map(|t| t.trim())
            .filter(|t| !t.is_empty())
            .collect();
        if !tech.is_empty() {
            write!(out, r#"<p class="cv-technologies">{}</p>"#, escape_html(&tech.join(", ")))?;
        }
        out.push_str("</article>");
    }
    Ok(non_blank(out))
}

fn certifications(doc: &DocumentModel) -> Body {
    let mut out = String::new();
    for cert in doc.certifications.iter().filter(|c| c.is_populated()) {
        write!(
            out,
            r#"<li class="cv-certification" data-id="{}"><span class="cv-certification-name">{}</span>"#,
            escape_html(&cert.id),
            escape_html(cert.name.trim())
        )?;
        if let Some(issuer) = non_empty(&cert.issuer) {
            write!(out, r#" <span class="cv-issuer">{}</span>"#, escape_html(issuer))?;
        }
        if let Some(date) = non_empty(&cert.date) {
            write!(
                out,
                r#" <span class="cv-dates">{}</span>"#,
                escape_html(&format_date(date, doc.locale))
            )?;
        }
        if let Some(expiry) = non_empty(&cert.expiry_date) {
            write!(
                out,
                r#" <span class="cv-expiry">valid until {}</span>"#,
                escape_html(&format_date(expiry, doc.locale))
            )?;
        }
        if let Some(credential) = non_empty(&cert.credential_id) {
            write!(out, r#" <span class="cv-credential">ID {}</span>"#, escape_html(credential))?;
        }
        out.push_str("</li>");
    }
    Ok(non_blank(out).map(|items| format!(r#"<ul class="cv-certifications">{items}</ul>"#)))
}

fn languages(doc: &DocumentModel) -> Body {
    let mut out = String::new();
    for lang in doc.languages.iter().filter(|l| l.is_populated()) {
        write!(
            out,
            r#"<li class="cv-language-item"><span class="cv-language">{}</span> <span class="cv-proficiency">{}</span></li>"#,
            escape_html(lang.name.trim()),
            lang.proficiency.label()
        )?;
    }
    Ok(non_blank(out).map(|items| format!(r#"<ul class="cv-languages">{items}</ul>"#)))
}

fn interests(doc: &DocumentModel) -> Body {
    let mut out = String::new();
    for interest in doc.interests.iter().filter(|i| i.is_populated()) {
        write!(out, r#"<li class="cv-interest">{}"#, escape_html(interest.name.trim()))?;
        if let Some(desc) = non_empty(&interest.description) {
            write!(out, r#" <span class="cv-interest-detail">{}</span>"#, escape_html(desc))?;
        }
        out.push_str("</li>");
    }
    Ok(non_blank(out).map(|items| format!(r#"<ul class="cv-interests">{items}</ul>"#)))
}

/// `available-on-request` is static and renders regardless of the collection;
/// `detailed` renders one block per populated reference, or nothing.
fn references(doc: &DocumentModel) -> Body {
    match doc.references_display {
        ReferencesDisplay::AvailableOnRequest => Ok(Some(format!(
            r#"<p class="cv-references-note">{REFERENCES_ON_REQUEST}</p>"#
        ))),
        ReferencesDisplay::Detailed => {
            let mut out = String::new();
            for reference in doc.references.iter().filter(|r| r.is_populated()) {
                write!(
                    out,
                    r#"<div class="cv-reference" data-id="{}"><h3 class="cv-reference-name">{}</h3>"#,
                    escape_html(&reference.id),
                    escape_html(reference.name.trim())
                )?;
                let role = [non_empty(&reference.position), non_empty(&reference.company)]
                    .into_iter()
                    .flatten()
                    .collect::<Vec<_>>()
                    .join(", ");
                if !role.is_empty() {
                    write!(out, r#"<p class="cv-reference-role">{}</p>"#, escape_html(&role))?;
                }
                if let Some(rel) = non_empty(&reference.relationship) {
                    write!(out, r#"<p class="cv-reference-relationship">{}</p>"#, escape_html(rel))?;
                }
                if let Some(email) = non_empty(&reference.email) {
                    write!(out, r#"<p class="cv-reference-email">{}</p>"#, escape_html(email))?;
                }
                if let Some(phone) = non_empty(&reference.phone) {
                    write!(
                        out,
                        r#"<p class="cv-reference-phone">{}</p>"#,
                        escape_html(&format_phone(phone, doc.locale))
                    )?;
                }
                out.push_str("</div>");
            }
            Ok(non_blank(out))
        }
    }
}

// ────────────────────────────────────────────────────────────────────────────
// Helpers
// ────────────────────────────────────────────────────────────────────────────

fn non_blank(out: String) -> Option<String> {
    if out.is_empty() {
        None
    } else {
        Some(out)
    }
}

fn meta_line(out: &mut String, dates: &str, location: Option<&str>) -> fmt::Result {
    if dates.is_empty() && location.is_none() {
        return Ok(());
    }
    out.push_str(r#"<p class="cv-entry-meta">"#);
    if !dates.is_empty() {
        write!(out, r#"<span class="cv-dates">{}</span>"#, escape_html(dates))?;
    }
    if let Some(loc) = location {
        if !dates.is_empty() {
            out.push_str(" · ");
        }
        write!(out, r#"<span class="cv-location">{}</span>"#, escape_html(loc))?;
    }
    out.push_str("</p>");
    Ok(())
}

fn bullet_list(out: &mut String, class: &str, items: &[String]) -> fmt::Result {
    let items: Vec<&str> = items.iter().map(|i| i.trim()).filter(|i| !i.is_empty()).collect();
    if items.is_empty() {
        return Ok(());
    }
    write!(out, r#"<ul class="{class}">"#)?;
    for item in items {
        write!(out, "<li>{}</li>", escape_html(item))?;
    }
    out.push_str("</ul>");
    Ok(())
}
