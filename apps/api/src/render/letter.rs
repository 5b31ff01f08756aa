//! Cover-letter assembly over a resolved base-template chain.
//!
//! The nearest skeleton in the chain is loaded into a minijinja environment as
//! the layout. Every chain member then becomes a child template that
//! `{% extends %}` the previous one and overrides the `{% block %}`s named by
//! its slots, so the most derived slot wins. Document text reaches the output
//! only as context values, auto-escaped as HTML and never parsed as template
//! source.

use std::collections::BTreeMap;

use minijinja::value::Value;
use minijinja::{AutoEscape, Environment};
use tracing::warn;

use crate::models::document::{non_empty, DocumentModel};
use crate::models::template::TemplateDefinition;
use crate::render::escape::{escape_html, safe_href};
use crate::render::locale::{format_date, format_phone};

const FALLBACK_SKELETON: &str = concat!(
    r#"<article class="cl-letter">"#,
    r#"<p class="cl-greeting">{{ greeting }}</p>{{ body }}"#,
    r#"<p class="cl-closing">{{ closing }}</p>"#,
    r#"<p class="cl-signature">{% block signature_block %}{{ signature }}{% endblock %}</p>"#,
    "</article>",
);

const LAYOUT_NAME: &str = "letter/layout.html";

const DEFAULT_GREETING: &str = "Dear Hiring Manager,";
const DEFAULT_CLOSING: &str = "Yours sincerely,";

/// Template sources for a root-first chain, in load order. The last entry is
/// the one to render.
pub fn chain_sources(chain: &[&TemplateDefinition]) -> Vec<(String, String)> {
    let skeleton = chain
        .iter()
        .rev()
        .find_map(|t| t.skeleton.as_deref())
        .unwrap_or_else(|| {
            warn!("No skeleton in template chain; using fallback letter skeleton");
            FALLBACK_SKELETON
        });
    sources_over(skeleton, chain)
}

fn sources_over(skeleton: &str, chain: &[&TemplateDefinition]) -> Vec<(String, String)> {
    let mut sources = vec![(LAYOUT_NAME.to_string(), skeleton.to_string())];
    for (depth, template) in chain.iter().enumerate() {
        let parent = &sources[sources.len() - 1].0;
        let mut source = format!("{{% extends {parent:?} %}}");
        for (slot, markup) in &template.slots {
            source.push_str(&format!("{{% block {slot} %}}{markup}{{% endblock %}}"));
        }
        sources.push((format!("letter/{depth}-{}.html", template.id), source));
    }
    sources
}

/// Compiles `sources` into an environment with HTML auto-escaping on for
/// every template.
fn environment(sources: &[(String, String)]) -> Result<Environment<'_>, minijinja::Error> {
    let mut env = Environment::new();
    env.set_auto_escape_callback(|_| AutoEscape::Html);
    for (name, source) in sources {
        env.add_template(name, source)?;
    }
    Ok(env)
}

/// Checks that a letter template's skeleton and slots parse on their own.
pub fn check_syntax(template: &TemplateDefinition) -> Result<(), minijinja::Error> {
    let skeleton = template.skeleton.as_deref().unwrap_or(FALLBACK_SKELETON);
    let sources = sources_over(skeleton, &[template]);
    environment(&sources).map(|_| ())
}

/// Context values for the letter. Plain fields are escaped by the engine;
/// composite fields are assembled here from escaped parts and marked safe.
fn letter_context(doc: &DocumentModel) -> Value {
    let personal = &doc.personal;
    let letter = doc.cover_letter.clone().unwrap_or_default();
    let mut ctx: BTreeMap<String, Value> = BTreeMap::new();

    let name = personal.full_name.trim().to_string();
    ctx.insert("sender_name".into(), Value::from(name.clone()));
    ctx.insert("signature".into(), Value::from(name));
    ctx.insert(
        "sender_title".into(),
        Value::from(non_empty(&personal.title).unwrap_or_default()),
    );

    let mut contact: Vec<String> = Vec::new();
    if let Some(email) = non_empty(&personal.email) {
        contact.push(escape_html(email));
    }
    if let Some(phone) = non_empty(&personal.phone) {
        contact.push(escape_html(&format_phone(phone, doc.locale)));
    }
    if let Some(location) = non_empty(&personal.location) {
        contact.push(escape_html(location));
    }
    for (kind, url) in personal.links() {
        match safe_href(url) {
            Some(href) => contact.push(format!(
                r#"<a class="cl-link cl-{kind}" href="{href}">{}</a>"#,
                escape_html(url)
            )),
            None => contact.push(escape_html(url)),
        }
    }
    ctx.insert(
        "sender_contact".into(),
        Value::from_safe_string(contact.join(" · ")),
    );

    let date = non_empty(&letter.date)
        .map(str::to_string)
        .or_else(|| doc.last_modified.map(|ts| ts.date_naive().format("%Y-%m-%d").to_string()))
        .map(|d| format_date(&d, doc.locale))
        .unwrap_or_default();
    ctx.insert("date".into(), Value::from(date));

    let mut recipient: Vec<String> = [
        non_empty(&letter.recipient_name),
        non_empty(&letter.recipient_title),
        non_empty(&letter.company_name),
    ]
    .into_iter()
    .flatten()
    .map(escape_html)
    .collect();
    if let Some(address) = non_empty(&letter.company_address) {
        recipient.extend(
            address
                .lines()
                .map(str::trim)
                .filter(|l| !l.is_empty())
                .map(escape_html),
        );
    }
    ctx.insert(
        "recipient".into(),
        Value::from_safe_string(recipient.join("<br>")),
    );

    let greeting = match (non_empty(&letter.greeting), non_empty(&letter.recipient_name)) {
        (Some(greeting), _) => greeting.to_string(),
        (None, Some(recipient)) => format!("Dear {recipient},"),
        (None, None) => DEFAULT_GREETING.to_string(),
    };
    ctx.insert("greeting".into(), Value::from(greeting));

    let body: String = letter
        .body_paragraphs()
        .map(|p| format!(r#"<p class="cl-paragraph">{}</p>"#, escape_html(p)))
        .collect();
    ctx.insert("body".into(), Value::from_safe_string(body));

    ctx.insert(
        "closing".into(),
        Value::from(non_empty(&letter.closing).unwrap_or(DEFAULT_CLOSING)),
    );
    Value::from(ctx)
}

/// Letter markup (without the scoping wrapper) for `doc` over a resolved chain.
pub fn render_letter(
    doc: &DocumentModel,
    chain: &[&TemplateDefinition],
) -> Result<String, minijinja::Error> {
    let sources = chain_sources(chain);
    let env = environment(&sources)?;
    let entry = &sources[sources.len() - 1].0;
    env.get_template(entry)?.render(letter_context(doc))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::document::{CoverLetterContent, PersonalInfo};
    use crate::templates::catalogue::tests_support::letter_template;

    fn named(full_name: &str) -> DocumentModel {
        DocumentModel {
            personal: PersonalInfo {
                full_name: full_name.into(),
                ..Default::default()
            },
            ..Default::default()
        }
    }

    #[test]
    fn test_chain_sources_extend_root_first() {
        let parent = letter_template("A", None);
        let child = letter_template("B", Some("A"));
        let sources = chain_sources(&[&parent, &child]);
        let names: Vec<&str> = sources.iter().map(|(n, _)| n.as_str()).collect();
        assert_eq!(names, vec![LAYOUT_NAME, "letter/0-A.html", "letter/1-B.html"]);
        assert!(sources[1].1.starts_with(r#"{% extends "letter/layout.html" %}"#));
        assert!(sources[2].1.starts_with(r#"{% extends "letter/0-A.html" %}"#));
    }

    #[test]
    fn test_child_slot_overrides_parent() {
        let parent = letter_template("A", None);
        let mut child = letter_template("B", Some("A"));
        child.slots.insert(
            "letterhead".to_string(),
            "<h2 class=\"child\">{{ sender_name }}</h2>".to_string(),
        );
        let html = render_letter(&named("Niamh"), &[&parent, &child]).unwrap();
        assert!(html.contains(r#"<h2 class="child">Niamh</h2>"#));
        assert!(!html.contains("<h1>"));
    }

    #[test]
    fn test_parent_slot_survives_when_child_is_silent() {
        let parent = letter_template("A", None);
        let mut child = letter_template("B", Some("A"));
        child.slots.clear();
        let html = render_letter(&named("Niamh"), &[&parent, &child]).unwrap();
        assert!(html.contains("<h1>Niamh</h1>"));
    }

    #[test]
    fn test_render_letter_escapes_content_and_keeps_skeleton() {
        let parent = letter_template("A", None);
        let child = letter_template("B", Some("A"));
        let doc = DocumentModel {
            cover_letter: Some(CoverLetterContent {
                paragraphs: vec!["I build <things>.".into()],
                ..Default::default()
            }),
            ..named("<b>Niamh</b> {{ body }}")
        };
        let html = render_letter(&doc, &[&parent, &child]).unwrap();
        assert!(html.contains(r#"<div class="skeleton-A">"#));
        assert!(html.contains("&lt;b&gt;Niamh"));
        assert!(html.contains("{{ body }}"), "user text is never parsed as a template");
        assert!(html.contains("I build &lt;things&gt;."));
        assert!(!html.contains("<b>"));
    }

    #[test]
    fn test_greeting_defaults() {
        let parent = letter_template("A", None);
        let mut greeting_only = parent.clone();
        greeting_only.skeleton = Some("{{ greeting }}".to_string());

        let doc = DocumentModel {
            cover_letter: Some(CoverLetterContent {
                recipient_name: Some("Ms Kelly".into()),
                ..Default::default()
            }),
            ..Default::default()
        };
        assert_eq!(render_letter(&doc, &[&greeting_only]).unwrap(), "Dear Ms Kelly,");
        assert_eq!(
            render_letter(&DocumentModel::default(), &[&greeting_only]).unwrap(),
            DEFAULT_GREETING
        );
    }

    #[test]
    fn test_missing_skeleton_falls_back() {
        let orphan = letter_template("orphan", Some("gone"));
        let sources = chain_sources(&[&orphan]);
        assert_eq!(sources[0].1, FALLBACK_SKELETON);
        let html = render_letter(&named("Niamh"), &[&orphan]).unwrap();
        assert!(html.contains("cl-greeting"));
    }

    #[test]
    fn test_check_syntax_rejects_broken_slot() {
        let mut broken = letter_template("A", None);
        assert!(check_syntax(&broken).is_ok());
        broken
            .slots
            .insert("letterhead".to_string(), "{% if %}".to_string());
        assert!(check_syntax(&broken).is_err());
    }
}
