//! Advisory document checks against a template's field contract.
//!
//! Nothing here blocks rendering or export: the editor shows the returned
//! warnings next to the preview. Output order is stable (personal block,
//! then sections in the template's declared order, then entry-level checks).

use std::collections::{HashMap, HashSet};

use serde::{Deserialize, Serialize};

use crate::models::document::{
    non_empty, DocumentModel, Populated, ReferencesDisplay, SectionType,
};
use crate::models::template::{TemplateDefinition, TemplateKind};

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ValidationError {
    pub field: String,
    pub message: String,
}

impl ValidationError {
    fn new(field: impl Into<String>, message: impl Into<String>) -> Self {
        Self {
            field: field.into(),
            message: message.into(),
        }
    }
}

/// Checks `document` against `template`. An empty result means valid.
pub fn validate(document: &DocumentModel, template: &TemplateDefinition) -> Vec<ValidationError> {
    let mut errors = Vec::new();

    if template.kind.document_kind() != document.kind {
        errors.push(ValidationError::new(
            "template",
            format!(
                "Template '{}' is for a different kind of document",
                template.id
            ),
        ));
    }

    check_personal(document, &mut errors);

    match template.kind {
        TemplateKind::Cv => {
            check_required_sections(document, template, &mut errors);
            check_experience(document, &mut errors);
            check_references(document, &mut errors);
        }
        TemplateKind::CoverLetter => check_cover_letter(document, &mut errors),
    }

    check_section_orders(document, &mut errors);
    check_section_types(document, &mut errors);
    check_duplicate_ids(document, &mut errors);
    errors
}

fn check_personal(document: &DocumentModel, errors: &mut Vec<ValidationError>) {
    let personal = &document.personal;
    if personal.full_name.trim().is_empty() {
        errors.push(ValidationError::new("personal.fullName", "Full name is required"));
    }
    match non_empty(&personal.email) {
        None => errors.push(ValidationError::new("personal.email", "Email address is required")),
        Some(email) if !looks_like_email(email) => errors.push(ValidationError::new(
            "personal.email",
            "Email address does not look valid",
        )),
        Some(_) => {}
    }
}

/// `local@domain.tld` with no whitespace. Deliberately loose.
fn looks_like_email(email: &str) -> bool {
    if email.chars().any(char::is_whitespace) {
        return false;
    }
    let Some((local, domain)) = email.split_once('@') else {
        return false;
    };
    !local.is_empty()
        && !domain.contains('@')
        && domain
            .split_once('.')
            .is_some_and(|(host, tld)| !host.is_empty() && !tld.is_empty() && !tld.ends_with('.'))
}

/// Core sections the template declares must carry content, unless the user hid them.
fn check_required_sections(
    document: &DocumentModel,
    template: &TemplateDefinition,
    errors: &mut Vec<ValidationError>,
) {
    for kind in &template.structure.sections {
        if !document.is_section_shown(kind) {
            continue;
        }
        let (field, missing) = match kind {
            SectionType::Summary => ("personal.summary", non_empty(&document.personal.summary).is_none()),
            SectionType::Experience => ("experience", !document.experience.iter().any(|e| e.is_populated())),
            SectionType::Education => ("education", !document.education.iter().any(|e| e.is_populated())),
            SectionType::Skills => ("skills", !document.skills.iter().any(|s| s.is_populated())),
            _ => continue,
        };
        if missing {
            errors.push(ValidationError::new(
                field,
                format!("{} is expected by this template", kind.default_title()),
            ));
        }
    }
}

fn check_experience(document: &DocumentModel, errors: &mut Vec<ValidationError>) {
    for (i, exp) in document.experience.iter().enumerate() {
        if !exp.is_populated() {
            continue;
        }
        if exp.company.trim().is_empty() {
            errors.push(ValidationError::new(format!("experience[{i}].company"), "Company is required"));
        }
        if exp.position.trim().is_empty() {
            errors.push(ValidationError::new(format!("experience[{i}].position"), "Position is required"));
        }
        if exp.start_date.trim().is_empty() {
            errors.push(ValidationError::new(format!("experience[{i}].startDate"), "Start date is required"));
        }
        if exp.current && non_empty(&exp.end_date).is_some() {
            errors.push(ValidationError::new(
                format!("experience[{i}].endDate"),
                "End date is ignored for a current role",
            ));
        }
    }
}

fn check_references(document: &DocumentModel, errors: &mut Vec<ValidationError>) {
    if document.references_display != ReferencesDisplay::Detailed
        || !document.is_section_shown(&SectionType::References)
    {
        return;
    }
    for (i, reference) in document.references.iter().enumerate() {
        if reference.is_populated()
            && non_empty(&reference.email).is_none()
            && non_empty(&reference.phone).is_none()
        {
            errors.push(ValidationError::new(
                format!("references[{i}]"),
                "Detailed references need an email or phone number",
            ));
        }
    }
}

fn check_cover_letter(document: &DocumentModel, errors: &mut Vec<ValidationError>) {
    let letter = document.cover_letter.clone().unwrap_or_default();
    if non_empty(&letter.recipient_name).is_none() && non_empty(&letter.company_name).is_none() {
        errors.push(ValidationError::new(
            "coverLetter.recipientName",
            "Add a recipient or company name",
        ));
    }
    if letter.body_paragraphs().next().is_none() {
        errors.push(ValidationError::new(
            "coverLetter.paragraphs",
            "The letter needs at least one paragraph",
        ));
    }
}

fn check_section_orders(document: &DocumentModel, errors: &mut Vec<ValidationError>) {
    let mut seen: HashMap<u32, usize> = HashMap::new();
    for (i, section) in document.sections.iter().enumerate() {
        if let Some(first) = seen.insert(section.order, i) {
            errors.push(ValidationError::new(
                format!("sections[{i}].order"),
                format!(
                    "Order {} is already used by sections[{first}]",
                    section.order
                ),
            ));
            // Keep pointing at the first holder of this order.
            seen.insert(section.order, first);
        }
    }
}

fn check_section_types(document: &DocumentModel, errors: &mut Vec<ValidationError>) {
    let mut seen: HashMap<&SectionType, usize> = HashMap::new();
    for (i, section) in document.sections.iter().enumerate() {
        if let Some(&first) = seen.get(&section.kind) {
            errors.push(ValidationError::new(
                format!("sections[{i}].type"),
                format!(
                    "Section type '{}' is already listed at sections[{first}]",
                    section.kind.as_str()
                ),
            ));
        } else {
            seen.insert(&section.kind, i);
        }
    }
}

fn check_duplicate_ids(document: &DocumentModel, errors: &mut Vec<ValidationError>) {
    fn scan<'a>(
        collection: &str,
        ids: impl Iterator<Item = &'a str>,
        errors: &mut Vec<ValidationError>,
    ) {
        let mut seen = HashSet::new();
        for (i, id) in ids.enumerate() {
            if !id.is_empty() && !seen.insert(id) {
                errors.push(ValidationError::new(
                    format!("{collection}[{i}].id"),
                    format!("Duplicate id '{id}'"),
                ));
            }
        }
    }

    scan("experience", document.experience.iter().map(|e| e.id.as_str()), errors);
    scan("education", document.education.iter().map(|e| e.id.as_str()), errors);
    scan("skills", document.skills.iter().map(|s| s.id.as_str()), errors);
    scan("languages", document.languages.iter().map(|l| l.id.as_str()), errors);
    scan("projects", document.projects.iter().map(|p| p.id.as_str()), errors);
    scan("certifications", document.certifications.iter().map(|c| c.id.as_str()), errors);
    scan("interests", document.interests.iter().map(|i| i.id.as_str()), errors);
    scan("references", document.references.iter().map(|r| r.id.as_str()), errors);
}

// ────────────────────────────────────────────────────────────────────────────
// Tests
// ────────────────────────────────────────────────────────────────────────────

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::document::{
        CoverLetterContent, DocumentKind, Experience, PersonalInfo, Reference, Section,
    };
    use crate::templates::registry::TemplateRegistry;

    fn template(id: &str) -> TemplateDefinition {
        TemplateRegistry::builtin().unwrap().get_by_id(id).unwrap().clone()
    }

    fn fields(errors: &[ValidationError]) -> Vec<&str> {
        errors.iter().map(|e| e.field.as_str()).collect()
    }

    #[test]
    fn test_empty_document_reports_identity_and_core_sections() {
        let errors = validate(&DocumentModel::default(), &template("classic"));
        let fields = fields(&errors);
        assert!(fields.contains(&"personal.fullName"));
        assert!(fields.contains(&"personal.email"));
        assert!(fields.contains(&"experience"));
        assert!(fields.contains(&"education"));
    }

    #[test]
    fn test_sample_cv_is_valid_for_every_cv_template() {
        let registry = TemplateRegistry::builtin().unwrap();
        let doc = crate::sample::sample_cv();
        for t in registry.list_all().iter().filter(|t| t.kind == TemplateKind::Cv) {
            assert_eq!(validate(&doc, t), vec![], "template {}", t.id);
        }
    }

    #[test]
    fn test_sample_letter_is_valid_for_letter_templates() {
        let doc = crate::sample::sample_cover_letter();
        assert_eq!(validate(&doc, &template("letter-executive")), vec![]);
    }

    #[test]
    fn test_validate_is_idempotent_and_pure() {
        let doc = DocumentModel {
            experience: vec![Experience {
                id: "x".into(),
                company: "Intercom".into(),
                current: true,
                end_date: Some("2022-01".into()),
                ..Default::default()
            }],
            ..Default::default()
        };
        let before = doc.clone();
        let t = template("classic");
        let first = validate(&doc, &t);
        assert_eq!(first, validate(&doc, &t));
        assert_eq!(doc, before);
        let fields = fields(&first);
        assert!(fields.contains(&"experience[0].position"));
        assert!(fields.contains(&"experience[0].startDate"));
        assert!(fields.contains(&"experience[0].endDate"));
    }

    #[test]
    fn test_malformed_email() {
        for bad in ["aoife", "aoife@", "@example.ie", "aoife@example", "a b@example.ie", "a@b@c.ie"] {
            assert!(!looks_like_email(bad), "{bad}");
        }
        assert!(looks_like_email("aoife.byrne@example.ie"));
    }

    #[test]
    fn test_hidden_section_is_not_required() {
        let mut doc = crate::sample::sample_cv();
        doc.education.clear();
        let t = template("classic");
        assert!(fields(&validate(&doc, &t)).contains(&"education"));

        for section in doc.sections.iter_mut().filter(|s| s.kind == SectionType::Education) {
            section.visible = false;
        }
        assert!(!fields(&validate(&doc, &t)).contains(&"education"));
    }

    #[test]
    fn test_duplicate_orders_and_ids() {
        let section = |kind, order| Section {
            id: String::new(),
            kind,
            title: String::new(),
            visible: true,
            order,
        };
        let doc = DocumentModel {
            sections: vec![
                section(SectionType::Summary, 1),
                section(SectionType::Experience, 1),
                section(SectionType::Skills, 1),
            ],
            experience: vec![
                Experience { id: "dup".into(), company: "A".into(), ..Default::default() },
                Experience { id: "dup".into(), company: "B".into(), ..Default::default() },
            ],
            ..Default::default()
        };
        let errors = validate(&doc, &template("classic"));
        let fields = fields(&errors);
        assert!(fields.contains(&"sections[1].order"));
        assert!(fields.contains(&"sections[2].order"));
        assert!(fields.contains(&"experience[1].id"));
        let order_error = errors.iter().find(|e| e.field == "sections[2].order").unwrap();
        assert!(order_error.message.contains("sections[0]"));
    }

    #[test]
    fn test_repeated_section_type_is_flagged_and_hides_requirement() {
        let section = |kind, order, visible| Section {
            id: String::new(),
            kind,
            title: String::new(),
            visible,
            order,
        };
        let doc = DocumentModel {
            sections: vec![
                section(SectionType::Experience, 0, false),
                section(SectionType::Experience, 1, true),
                section(SectionType::Skills, 2, true),
                section(SectionType::Skills, 3, true),
            ],
            ..Default::default()
        };
        let errors = validate(&doc, &template("classic"));
        let fields = fields(&errors);
        assert!(fields.contains(&"sections[1].type"));
        assert!(fields.contains(&"sections[3].type"));
        assert!(!fields.contains(&"sections[0].type"));
        assert!(!fields.contains(&"experience"), "a hidden twin hides the section");
        let skills = errors.iter().find(|e| e.field == "sections[3].type").unwrap();
        assert!(skills.message.contains("sections[2]"));
    }

    #[test]
    fn test_detailed_reference_without_contact() {
        let doc = DocumentModel {
            references_display: ReferencesDisplay::Detailed,
            references: vec![Reference { id: "r".into(), name: "Seán".into(), ..Default::default() }],
            ..Default::default()
        };
        assert!(fields(&validate(&doc, &template("classic"))).contains(&"references[0]"));

        let on_request = DocumentModel {
            references_display: ReferencesDisplay::AvailableOnRequest,
            ..doc
        };
        assert!(!fields(&validate(&on_request, &template("classic"))).contains(&"references[0]"));
    }

    #[test]
    fn test_cover_letter_requirements_and_kind_mismatch() {
        let doc = DocumentModel {
            kind: DocumentKind::CoverLetter,
            personal: PersonalInfo {
                full_name: "Aoife Byrne".into(),
                email: Some("aoife@example.ie".into()),
                ..Default::default()
            },
            cover_letter: Some(CoverLetterContent {
                paragraphs: vec!["   ".into()],
                ..Default::default()
            }),
            ..Default::default()
        };
        let fields_letter = fields(&validate(&doc, &template("letter-classic"))).join(",");
        assert!(fields_letter.contains("coverLetter.recipientName"));
        assert!(fields_letter.contains("coverLetter.paragraphs"));
        assert!(!fields_letter.contains("template"));

        assert!(fields(&validate(&doc, &template("classic"))).contains(&"template"));
    }
}
