// Document renderer: (DocumentModel, TemplateDefinition) -> template-scoped HTML + CSS.
// Pure over its inputs; the registry is only read to resolve base chains.

pub mod escape;
pub mod handlers;
pub mod letter;
pub mod locale;
pub mod sections;

use std::fmt::{self, Write};

use serde::Serialize;
use thiserror::Error;
use tracing::{debug, warn};

use crate::models::document::{non_empty, DocumentModel, SectionType};
use crate::models::template::{TemplateDefinition, TemplateKind};
use crate::render::escape::{escape_html, safe_href};
use crate::render::locale::format_phone;
use crate::templates::css::{
    css_ident, design_overrides, document_scope_class, scope_class, template_stylesheet,
};
use crate::templates::registry::{TemplateError, TemplateRegistry};

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct RenderedOutput {
    pub html: String,
    pub css: String,
}

#[derive(Debug, Error)]
pub enum RenderError {
    #[error(transparent)]
    Template(#[from] TemplateError),

    #[error("Failed to assemble markup for section '{section}'")]
    Markup {
        section: String,
        #[source]
        source: fmt::Error,
    },

    #[error("Failed to render cover letter with template '{template}'")]
    Letter {
        template: String,
        #[source]
        source: minijinja::Error,
    },
}

fn markup_error(section: &str) -> impl FnOnce(fmt::Error) -> RenderError + '_ {
    move |source| RenderError::Markup {
        section: section.to_string(),
        source,
    }
}

/// Renders `document` with `template`.
///
/// Cover-letter templates are resolved through their base chain first; CV
/// templates render directly. Neither input is mutated.
pub fn render(
    registry: &TemplateRegistry,
    document: &DocumentModel,
    template: &TemplateDefinition,
) -> Result<RenderedOutput, RenderError> {
    let chain = match template.kind {
        TemplateKind::CoverLetter => registry.resolve_base(template)?,
        TemplateKind::Cv => vec![template],
    };

    let html = match template.kind {
        TemplateKind::Cv => render_cv(document, template)?,
        TemplateKind::CoverLetter => {
            let letter = letter::render_letter(document, &chain).map_err(|source| RenderError::Letter {
                template: template.id.clone(),
                source,
            })?;
            format!(
                "<div class=\"cl-document {scope} {doc}\" data-template=\"{id}\" lang=\"{lang}\">\n{letter}\n</div>\n",
                scope = scope_class(&template.id),
                doc = document_scope_class(&document.id.to_string()),
                id = css_ident(&template.id),
                lang = document.locale.tag(),
            )
        }
    };

    let mut css = template_stylesheet(template, &chain);
    if let Some(settings) = &document.design_settings {
        css.push_str(&design_overrides(&template.id, &document.id.to_string(), settings));
    }

    Ok(RenderedOutput { html, css })
}

fn render_cv(document: &DocumentModel, template: &TemplateDefinition) -> Result<String, RenderError> {
    let structure = &template.structure;
    let mut main = String::new();
    let mut side = String::new();

    for section in document.effective_sections(template) {
        let kind = &section.kind;
        if !section.visible {
            debug!("Section '{}' hidden by document", kind.as_str());
            continue;
        }
        if let SectionType::Other(name) = kind {
            warn!("Skipping unknown section type '{name}'");
            continue;
        }
        if !structure.supports(kind) {
            debug!(
                "Template '{}' does not support section '{}'",
                template.id,
                kind.as_str()
            );
            continue;
        }

        let Some(body) = sections::format_body(kind, document).map_err(markup_error(kind.as_str()))? else {
            debug!("Section '{}' has no content", kind.as_str());
            continue;
        };

        let target = if structure.in_sidebar(kind) { &mut side } else { &mut main };
        write!(
            target,
            "<section class=\"cv-section cv-section-{kind}\" data-section-id=\"{id}\"><h2 class=\"cv-section-title\">{title}</h2>{body}</section>\n",
            kind = css_ident(kind.as_str()),
            id = escape_html(&section.id),
            title = escape_html(section.display_title()),
        )
        .map_err(markup_error(kind.as_str()))?;
    }

    let mut html = String::new();
    write!(
        html,
        "<div class=\"cv-document {scope} {doc} layout-{layout}\" data-template=\"{id}\" lang=\"{lang}\">\n",
        scope = scope_class(&template.id),
        doc = document_scope_class(&document.id.to_string()),
        layout = structure.layout.as_str(),
        id = css_ident(&template.id),
        lang = document.locale.tag(),
    )
    .map_err(markup_error("personal"))?;
    personal_header(&mut html, document).map_err(markup_error("personal"))?;

    if structure.layout.has_sidebar() {
        html.push_str("<div class=\"cv-body\">\n<aside class=\"cv-sidebar\">\n");
        html.push_str(&side);
        html.push_str("</aside>\n<main class=\"cv-main\">\n");
        html.push_str(&main);
        html.push_str("</main>\n</div>\n");
    } else {
        html.push_str("<main class=\"cv-main\">\n");
        html.push_str(&main);
        html.push_str("</main>\n");
    }
    html.push_str("</div>\n");
    Ok(html)
}

/// The personal-info block. Always emitted; missing fields are simply omitted
/// (an absent name leaves an empty heading for the editor to fill).
fn personal_header(out: &mut String, document: &DocumentModel) -> fmt::Result {
    let personal = &document.personal;
    out.push_str("<header class=\"cv-header cv-personal\">");
    write!(out, "<h1 class=\"cv-name\">{}</h1>", escape_html(personal.full_name.trim()))?;
    if let Some(title) = non_empty(&personal.title) {
        write!(out, "<p class=\"cv-headline\">{}</p>", escape_html(title))?;
    }

    let mut contact = String::new();
    if let Some(email) = non_empty(&personal.email) {
        let email = escape_html(email);
        write!(contact, "<li class=\"cv-email\"><a href=\"mailto:{email}\">{email}</a></li>")?;
    }
    if let Some(phone) = non_empty(&personal.phone) {
        let formatted = format_phone(phone, document.locale);
        let dial: String = formatted
            .chars()
            .filter(|c| c.is_ascii_digit() || *c == '+')
            .collect();
        write!(
            contact,
            "<li class=\"cv-phone\"><a href=\"tel:{dial}\">{}</a></li>",
            escape_html(&formatted)
        )?;
    }
    if let Some(location) = non_empty(&personal.location) {
        write!(contact, "<li class=\"cv-location\">{}</li>", escape_html(location))?;
    }
    for (kind, url) in personal.links() {
        match safe_href(url) {
            Some(href) => write!(
                contact,
                "<li class=\"cv-{kind}\"><a href=\"{href}\">{}</a></li>",
                escape_html(url)
            )?,
            None => write!(contact, "<li class=\"cv-{kind}\">{}</li>", escape_html(url))?,
        }
    }
    if !contact.is_empty() {
        write!(out, "<ul class=\"cv-contact\">{contact}</ul>")?;
    }
    out.push_str("</header>\n");
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::document::{
        CoverLetterContent, DesignSettings, DocumentKind, Experience, PersonalInfo, Reference,
        ReferencesDisplay, Section, Skill,
    };
    use crate::templates::catalogue::tests_support::letter_template;
    use proptest::prelude::*;
    use uuid::Uuid;

    fn registry() -> TemplateRegistry {
        TemplateRegistry::builtin().unwrap()
    }

    fn section(kind: SectionType, order: u32, visible: bool) -> Section {
        Section {
            id: format!("sec-{}", kind.as_str()),
            kind,
            title: String::new(),
            visible,
            order,
        }
    }

    fn populated_doc() -> DocumentModel {
        DocumentModel {
            personal: PersonalInfo {
                full_name: "Aoife Byrne".into(),
                title: Some("Platform Engineer".into()),
                email: Some("aoife@example.ie".into()),
                phone: Some("087 123 4567".into()),
                location: Some("Cork".into()),
                summary: Some("Infrastructure engineer.".into()),
                ..Default::default()
            },
            experience: vec![Experience {
                id: "e1".into(),
                company: "Workhuman".into(),
                position: "Engineer".into(),
                start_date: "2020-01".into(),
                current: true,
                achievements: vec!["Migrated 40 services".into()],
                ..Default::default()
            }],
            skills: vec![Skill { id: "s".into(), name: "Rust".into(), ..Default::default() }],
            references: vec![Reference {
                id: "r".into(),
                name: "Ciarán Walsh".into(),
                email: Some("ciaran@example.ie".into()),
                ..Default::default()
            }],
            sections: vec![
                section(SectionType::Summary, 0, true),
                section(SectionType::Experience, 1, true),
                section(SectionType::Skills, 2, true),
                section(SectionType::References, 3, true),
            ],
            ..Default::default()
        }
    }

    #[test]
    fn test_empty_document_classic_has_header_and_no_experience() {
        let r = registry();
        let classic = r.get_by_id("classic").unwrap();
        let out = render(&r, &DocumentModel::default(), classic).unwrap();
        assert!(out.html.contains("cv-personal"));
        assert!(!out.html.contains("cv-section-experience"));
        assert!(!out.html.contains("Professional Experience"));
    }

    #[test]
    fn test_render_is_deterministic() {
        let r = registry();
        let doc = populated_doc();
        for t in r.list_all() {
            let a = render(&r, &doc, t).unwrap();
            let b = render(&r, &doc, t).unwrap();
            assert_eq!(a, b, "render must be byte-identical for {}", t.id);
        }
    }

    #[test]
    fn test_render_does_not_mutate_inputs() {
        let r = registry();
        let doc = populated_doc();
        let before = doc.clone();
        let template = r.get_by_id("modern").unwrap().clone();
        render(&r, &doc, &template).unwrap();
        assert_eq!(doc, before);
        assert_eq!(&template, r.get_by_id("modern").unwrap());
    }

    #[test]
    fn test_sections_follow_order() {
        let r = registry();
        let mut doc = populated_doc();
        doc.sections = vec![
            section(SectionType::Experience, 5, true),
            section(SectionType::Summary, 1, true),
        ];
        let out = render(&r, &doc, r.get_by_id("classic").unwrap()).unwrap();
        let summary = out.html.find("cv-section-summary").unwrap();
        let experience = out.html.find("cv-section-experience").unwrap();
        assert!(summary < experience);
    }

    #[test]
    fn test_hidden_references_removed() {
        let r = registry();
        let classic = r.get_by_id("classic").unwrap();
        let mut doc = populated_doc();
        assert!(render(&r, &doc, classic).unwrap().html.contains("cv-section-references"));

        doc.sections[3].visible = false;
        let html = render(&r, &doc, classic).unwrap().html;
        assert!(!html.contains("cv-section-references"));
        assert!(!html.contains(sections::REFERENCES_ON_REQUEST));
    }

    #[test]
    fn test_repeated_section_type_renders_once_and_hidden_wins() {
        let r = registry();
        let mut doc = populated_doc();
        doc.sections = vec![
            section(SectionType::Experience, 0, false),
            section(SectionType::Experience, 1, true),
            section(SectionType::Skills, 2, true),
            section(SectionType::Skills, 3, true),
        ];
        let html = render(&r, &doc, r.get_by_id("classic").unwrap()).unwrap().html;
        assert_eq!(html.matches("cv-section-experience").count(), 0);
        assert_eq!(html.matches("cv-section-skills").count(), 1);
    }

    #[test]
    fn test_references_gating_on_request() {
        let r = registry();
        let doc = populated_doc();
        let html = render(&r, &doc, r.get_by_id("classic").unwrap()).unwrap().html;
        assert!(html.contains(sections::REFERENCES_ON_REQUEST));
        assert!(!html.contains("ciaran@example.ie"));

        let detailed = DocumentModel {
            references_display: ReferencesDisplay::Detailed,
            ..populated_doc()
        };
        let html = render(&r, &detailed, r.get_by_id("classic").unwrap()).unwrap().html;
        assert!(html.contains("ciaran@example.ie"));
    }

    #[test]
    fn test_unknown_section_type_is_skipped() {
        let r = registry();
        let mut doc = populated_doc();
        doc.sections.push(section(SectionType::Other("publications".into()), 9, true));
        let html = render(&r, &doc, r.get_by_id("classic").unwrap()).unwrap().html;
        assert!(!html.contains("publications"));
        assert!(html.contains("cv-section-experience"));
    }

    #[test]
    fn test_unsupported_section_type_is_skipped() {
        let r = registry();
        let mut doc = populated_doc();
        doc.interests = vec![crate::models::document::Interest {
            id: "i".into(),
            name: "Sea swimming".into(),
            description: None,
        }];
        doc.sections.push(section(SectionType::Interests, 8, true));
        let minimal = r.get_by_id("minimal").unwrap();
        assert!(!render(&r, &doc, minimal).unwrap().html.contains("Sea swimming"));
        let classic = r.get_by_id("classic").unwrap();
        assert!(render(&r, &doc, classic).unwrap().html.contains("Sea swimming"));
    }

    #[test]
    fn test_sidebar_layout_routes_skills_to_aside() {
        let r = registry();
        let html = render(&r, &populated_doc(), r.get_by_id("modern").unwrap()).unwrap().html;
        let aside_start = html.find("<aside").unwrap();
        let aside_end = html.find("</aside>").unwrap();
        let skills = html.find("cv-section-skills").unwrap();
        assert!(aside_start < skills && skills < aside_end);
        let experience = html.find("cv-section-experience").unwrap();
        assert!(experience > aside_end);
    }

    #[test]
    fn test_phone_normalized_in_header() {
        let r = registry();
        let html = render(&r, &populated_doc(), r.get_by_id("classic").unwrap()).unwrap().html;
        assert!(html.contains("+353 87 123 4567"));
        assert!(html.contains("tel:+353871234567"));
    }

    #[test]
    fn test_css_scoped_and_design_overrides_appended() {
        let r = registry();
        let mut doc = populated_doc();
        doc.design_settings = Some(DesignSettings {
            font_size_pt: Some(12.0),
            ..Default::default()
        });
        let classic = render(&r, &doc, r.get_by_id("classic").unwrap()).unwrap();
        let modern = render(&r, &doc, r.get_by_id("modern").unwrap()).unwrap();
        assert!(classic.css.contains(".tpl-classic"));
        assert!(!classic.css.contains(".tpl-modern"));
        assert!(!modern.css.contains(".tpl-classic"));
        assert!(classic.css.ends_with("}\n"));
        assert!(classic.css.contains("/* design settings */"));
        assert!(classic.html.contains("tpl-classic"));
    }

    #[test]
    fn test_design_overrides_scoped_per_document() {
        let r = registry();
        let classic = r.get_by_id("classic").unwrap();
        let settings = DesignSettings {
            margin_mm: Some(12.0),
            ..Default::default()
        };
        let mut first = populated_doc();
        first.id = Uuid::new_v4();
        first.design_settings = Some(settings.clone());
        let mut second = first.clone();
        second.id = Uuid::new_v4();

        let a = render(&r, &first, classic).unwrap();
        let b = render(&r, &second, classic).unwrap();
        let a_scope = format!(".tpl-classic.doc-{}", first.id);
        let b_scope = format!(".tpl-classic.doc-{}", second.id);
        assert!(a.css.contains(&a_scope) && !a.css.contains(&b_scope));
        assert!(b.css.contains(&b_scope) && !b.css.contains(&a_scope));
        assert!(a.html.contains(&format!("doc-{}", first.id)));
    }

    #[test]
    fn test_cover_letter_includes_base_skeleton() {
        let r = TemplateRegistry::new(vec![
            letter_template("A", None),
            letter_template("B", Some("A")),
        ])
        .unwrap();
        let b = r.get_by_id("B").unwrap();
        let out = render(&r, &DocumentModel::default(), b).unwrap();
        assert!(out.html.contains(r#"<div class="skeleton-A">"#));
        assert!(out.html.contains("tpl-B"));
        assert!(out.css.contains(".tpl-B .from-A"));
        assert!(out.css.contains(".tpl-B .from-B"));
        let from_a = out.css.find(".from-A").unwrap();
        let from_b = out.css.find(".from-B").unwrap();
        assert!(from_a < from_b, "base rules come first so the child wins the cascade");
    }

    #[test]
    fn test_builtin_letter_chain_renders() {
        let r = registry();
        let doc = DocumentModel {
            kind: DocumentKind::CoverLetter,
            personal: PersonalInfo {
                full_name: "Aoife Byrne".into(),
                title: Some("Platform Engineer".into()),
                ..Default::default()
            },
            cover_letter: Some(CoverLetterContent {
                company_name: Some("Stripe".into()),
                paragraphs: vec!["First.".into(), "Second.".into()],
                ..Default::default()
            }),
            ..Default::default()
        };
        let html = render(&r, &doc, r.get_by_id("letter-executive").unwrap()).unwrap().html;
        assert!(html.contains("cl-letterhead"), "root skeleton");
        assert!(html.contains("cl-accent-bar"), "letterhead from letter-modern");
        assert!(html.contains("cl-signature-rule"), "signature from letter-executive");
        assert_eq!(html.matches("cl-paragraph").count(), 2);
        assert!(!html.contains("{{"));
    }

    #[test]
    fn test_cyclic_letter_fails_only_that_render() {
        let r = TemplateRegistry::new(vec![
            letter_template("A", Some("B")),
            letter_template("B", Some("A")),
            letter_template("C", None),
        ])
        .unwrap();
        let err = render(&r, &DocumentModel::default(), r.get_by_id("A").unwrap()).unwrap_err();
        assert!(matches!(err, RenderError::Template(TemplateError::Cyclic { .. })));
        assert!(render(&r, &DocumentModel::default(), r.get_by_id("C").unwrap()).is_ok());
    }

    #[test]
    fn test_script_in_name_is_escaped() {
        let r = registry();
        let mut doc = populated_doc();
        doc.personal.full_name = "<script>alert(1)</script>".into();
        for t in r.list_all() {
            let html = render(&r, &doc, t).unwrap().html;
            assert!(!html.contains("<script>"), "unescaped in {}", t.id);
        }
    }

    proptest! {
        #![proptest_config(ProptestConfig::with_cases(64))]

        #[test]
        fn prop_user_text_never_emits_raw_tags(name in ".{0,40}", company in ".{0,40}", bullet in ".{0,60}") {
            let r = registry();
            let mut doc = populated_doc();
            doc.personal.full_name = format!("<script>{name}");
            doc.experience[0].company = format!("<img src=x>{company}");
            doc.experience[0].achievements = vec![format!("<iframe>{bullet}")];
            let html = render(&r, &doc, r.get_by_id("classic").unwrap()).unwrap().html;
            prop_assert!(!html.contains("<script>"));
            prop_assert!(!html.contains("<img"));
            prop_assert!(!html.contains("<iframe"));
        }

        #[test]
        fn prop_hidden_sections_never_render(mask in proptest::collection::vec(any::<bool>(), 9)) {
            let r = registry();
            let mut doc = crate::sample::sample_cv();
            doc.references_display = ReferencesDisplay::Detailed;
            doc.sections = SectionType::KNOWN
                .iter()
                .cloned()
                .enumerate()
                .map(|(i, kind)| section(kind, i as u32, mask[i]))
                .collect();
            let html = render(&r, &doc, r.get_by_id("classic").unwrap()).unwrap().html;
            for (i, kind) in SectionType::KNOWN.iter().enumerate() {
                let marker = format!("cv-section-{}", kind.as_str());
                if !mask[i] {
                    prop_assert!(!html.contains(&marker), "{} rendered while hidden", kind.as_str());
                }
            }
        }
    }
}
