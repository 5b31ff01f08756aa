//! Template-scoped stylesheet generation.
//!
//! Every selector is prefixed with `.tpl-<id>` so documents rendered with
//! different templates on the same page never share rules. Output is built
//! only from ordered collections, so it is byte-stable.

use std::fmt::Write;

use crate::models::document::DesignSettings;
use crate::models::template::{LayoutKind, TemplateDefinition, TemplateKind};

/// Class-safe form of a template id: anything outside `[A-Za-z0-9_-]` becomes `-`.
pub fn css_ident(id: &str) -> String {
    id.chars()
        .map(|c| {
            if c.is_ascii_alphanumeric() || c == '-' || c == '_' {
                c
            } else {
                '-'
            }
        })
        .collect()
}

/// The scoping class for a template, without the leading dot.
pub fn scope_class(id: &str) -> String {
    format!("tpl-{}", css_ident(id))
}

/// Class that pins design overrides to one document on a shared page.
pub fn document_scope_class(document_id: &str) -> String {
    format!("doc-{}", css_ident(document_id))
}

/// Drops characters that could terminate a declaration or open a new block.
fn css_value(value: &str) -> String {
    value
        .chars()
        .filter(|c| !matches!(c, ';' | '{' | '}' | '<' | '>' | '\\'))
        .collect()
}

fn rule(out: &mut String, scope: &str, selector: &str, declarations: &[(&str, String)]) {
    let selector = if selector.is_empty() {
        format!(".{scope}")
    } else {
        selector
            .split(',')
            .map(|part| format!(".{scope} {}", part.trim()))
            .collect::<Vec<_>>()
            .join(", ")
    };
    // Writing to a String cannot fail.
    let _ = writeln!(out, "{selector} {{");
    for (prop, value) in declarations {
        let _ = writeln!(out, "  {prop}: {};", css_value(value));
    }
    out.push_str("}\n");
}

/// Full stylesheet for `template`, with `chain` (root first, ending in
/// `template`) contributing colours, typography and extra rules.
pub fn template_stylesheet(template: &TemplateDefinition, chain: &[&TemplateDefinition]) -> String {
    let scope = scope_class(&template.id);
    let colors = &template.structure.color_scheme;
    let typo = &template.typography;
    let mut out = String::new();

    let _ = writeln!(out, "/* template: {} */", css_ident(&template.id));
    rule(
        &mut out,
        &scope,
        "",
        &[
            ("font-family", typo.font_family.clone()),
            ("font-size", format!("{:.1}pt", typo.font_size_pt)),
            ("line-height", format!("{:.2}", typo.line_height)),
            ("color", colors.text.clone()),
            ("background", colors.background.clone()),
            ("box-sizing", "border-box".to_string()),
            ("max-width", "210mm".to_string()),
            ("padding", "18mm".to_string()),
        ],
    );
    rule(
        &mut out,
        &scope,
        "h1, h2, h3",
        &[("font-family", typo.heading_font_family.clone())],
    );
    rule(
        &mut out,
        &scope,
        "a",
        &[("color", colors.accent.clone()), ("text-decoration", "none".to_string())],
    );

    match template.kind {
        TemplateKind::Cv => cv_rules(&mut out, &scope, template),
        TemplateKind::CoverLetter => {
            rule(&mut out, &scope, ".cl-sender-name", &[("color", colors.primary.clone())]);
            rule(&mut out, &scope, ".cl-accent-bar", &[("background", colors.accent.clone())]);
            rule(&mut out, &scope, ".cl-signature-rule", &[("border-top", format!("1px solid {}", colors.secondary))]);
        }
    }

    for ancestor in chain {
        if ancestor.css_rules.is_empty() {
            continue;
        }
        let _ = writeln!(out, "/* from: {} */", css_ident(&ancestor.id));
        for extra in &ancestor.css_rules {
            let decls: Vec<(&str, String)> = extra
                .declarations
                .iter()
                .map(|(k, v)| (k.as_str(), v.clone()))
                .collect();
            rule(&mut out, &scope, &css_value(&extra.selector), &decls);
        }
    }

    out
}

fn cv_rules(out: &mut String, scope: &str, template: &TemplateDefinition) {
    let colors = &template.structure.color_scheme;

    rule(out, scope, ".cv-header", &[("margin-bottom", "12pt".to_string())]);
    rule(
        out,
        scope,
        ".cv-name",
        &[("color", colors.primary.clone()), ("margin", "0".to_string()), ("font-size", "22pt".to_string())],
    );
    rule(out, scope, ".cv-headline", &[("color", colors.secondary.clone()), ("margin", "2pt 0".to_string())]);
    rule(
        out,
        scope,
        ".cv-contact",
        &[("list-style", "none".to_string()), ("padding", "0".to_string()), ("margin", "4pt 0".to_string())],
    );
    rule(out, scope, ".cv-contact li", &[("display", "inline-block".to_string()), ("margin-right", "10pt".to_string())]);
    rule(out, scope, ".cv-section", &[("margin-bottom", "10pt".to_string()), ("break-inside", "avoid-page".to_string())]);
    rule(
        out,
        scope,
        ".cv-section-title",
        &[
            ("color", colors.primary.clone()),
            ("font-size", "12pt".to_string()),
            ("text-transform", "uppercase".to_string()),
            ("border-bottom", format!("1.5px solid {}", colors.accent)),
            ("padding-bottom", "2pt".to_string()),
        ],
    );
    rule(out, scope, ".cv-entry", &[("margin-bottom", "8pt".to_string())]);
    rule(out, scope, ".cv-entry-meta", &[("color", colors.secondary.clone()), ("font-size", "0.9em".to_string())]);
    rule(out, scope, ".cv-achievements", &[("margin", "3pt 0 0 14pt".to_string()), ("padding", "0".to_string())]);

    match template.structure.layout {
        LayoutKind::SingleColumn => {}
        LayoutKind::Sidebar | LayoutKind::Banner => {
            rule(
                out,
                scope,
                ".cv-body",
                &[("display", "grid".to_string()), ("grid-template-columns", "32% 1fr".to_string()), ("gap", "14pt".to_string())],
            );
            rule(
                out,
                scope,
                ".cv-sidebar",
                &[("background", format!("{}14", colors.primary)), ("padding", "10pt".to_string())],
            );
        }
    }
    if template.structure.layout == LayoutKind::Banner {
        rule(
            out,
            scope,
            ".cv-header",
            &[("background", colors.primary.clone()), ("color", colors.background.clone()), ("padding", "14pt".to_string())],
        );
        rule(out, scope, ".cv-header .cv-name", &[("color", colors.background.clone())]);
    }
}

/// Per-document overrides, emitted after the template stylesheet so they win
/// the cascade. Scoped to the template and the document together. Values are
/// clamped; the font family is reduced to a safe character set.
pub fn design_overrides(template_id: &str, document_id: &str, settings: &DesignSettings) -> String {
    let scope = format!(
        "{}.{}",
        scope_class(template_id),
        document_scope_class(document_id)
    );
    let mut root: Vec<(&str, String)> = Vec::new();

    if let Some(margin) = settings.margin_mm {
        root.push(("padding", format!("{:.1}mm", margin.clamp(5.0, 40.0))));
    }
    if let Some(size) = settings.font_size_pt {
        root.push(("font-size", format!("{:.1}pt", size.clamp(8.0, 16.0))));
    }
    if let Some(spacing) = settings.line_spacing {
        root.push(("line-height", format!("{:.2}", spacing.clamp(1.0, 2.5))));
    }
    if let Some(family) = settings.font_family.as_deref() {
        let family = sanitize_font_family(family);
        if !family.is_empty() {
            root.push(("font-family", format!("'{family}', sans-serif")));
        }
    }

    let mut out = String::new();
    if !root.is_empty() {
        out.push_str("/* design settings */\n");
        rule(&mut out, &scope, "", &root);
    }
    if let Some(gap) = settings.section_spacing_mm {
        rule(
            &mut out,
            &scope,
            ".cv-section",
            &[("margin-bottom", format!("{:.1}mm", gap.clamp(0.0, 20.0)))],
        );
    }
    out
}

fn sanitize_font_family(raw: &str) -> String {
    raw.chars()
        .filter(|c| c.is_ascii_alphanumeric() || matches!(c, ' ' | '-'))
        .collect::<String>()
        .trim()
        .to_string()
}
