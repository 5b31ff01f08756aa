//! Built-in template catalogue: six CV layouts and a family of cover letters.
//!
//! Cover letters share one skeleton declared by `letter-classic`. Slots are
//! minijinja blocks in that skeleton; descendants override them by name and
//! append CSS rules.

use std::collections::BTreeMap;

use crate::models::document::SectionType;
use crate::models::template::{
    ColorScheme, CssRule, LayoutKind, TemplateDefinition, TemplateKind, TemplateStructure,
    Typography,
};

const LETTER_SKELETON: &str = r#"<article class="cl-letter">
<header class="cl-letterhead">{% block letterhead %}{% endblock %}</header>
<div class="cl-meta"><p class="cl-date">{{date}}</p><address class="cl-recipient">{{recipient}}</address></div>
<div class="cl-body"><p class="cl-greeting">{{greeting}}</p>{{body}}</div>
<footer class="cl-signoff"><p class="cl-closing">{{closing}}</p>{% block signature_block %}{% endblock %}</footer>
</article>"#;

const CLASSIC_LETTERHEAD: &str = concat!(
    r#"<h1 class="cl-sender-name">{{sender_name}}</h1>"#,
    r#"<p class="cl-sender-contact">{{sender_contact}}</p>"#,
);

const MODERN_LETTERHEAD: &str = concat!(
    r#"<div class="cl-accent-bar"></div>"#,
    r#"<h1 class="cl-sender-name">{{sender_name}}</h1>"#,
    r#"<p class="cl-sender-title">{{sender_title}}</p>"#,
    r#"<p class="cl-sender-contact">{{sender_contact}}</p>"#,
);

const PLAIN_SIGNATURE: &str = r#"<p class="cl-signature">{{signature}}</p>"#;

const RULED_SIGNATURE: &str = concat!(
    r#"<div class="cl-signature-rule"></div>"#,
    r#"<p class="cl-signature">{{signature}}</p>"#,
    r#"<p class="cl-signature-title">{{sender_title}}</p>"#,
);

const COMPACT_SIDEBAR: [SectionType; 4] = [
    SectionType::Skills,
    SectionType::Languages,
    SectionType::Interests,
    SectionType::Certifications,
];

fn colors(
    primary: &str,
    secondary: &str,
    accent: &str,
    text: &str,
    background: &str,
) -> ColorScheme {
    ColorScheme {
        primary: primary.to_string(),
        secondary: secondary.to_string(),
        accent: accent.to_string(),
        text: text.to_string(),
        background: background.to_string(),
    }
}

fn typography(body: &str, heading: &str, size: f32, line_height: f32) -> Typography {
    Typography {
        font_family: body.to_string(),
        heading_font_family: heading.to_string(),
        font_size_pt: size,
        line_height,
    }
}

struct CvSpec<'a> {
    id: &'a str,
    name: &'a str,
    description: &'a str,
    categories: &'a [&'a str],
    is_premium: bool,
    popularity: u32,
    layout: LayoutKind,
    sections: Vec<SectionType>,
    colors: ColorScheme,
    typography: Typography,
}

fn cv(spec: CvSpec<'_>) -> TemplateDefinition {
    let sidebar_sections = if spec.layout.has_sidebar() {
        COMPACT_SIDEBAR.to_vec()
    } else {
        Vec::new()
    };
    TemplateDefinition {
        id: spec.id.to_string(),
        name: spec.name.to_string(),
        description: spec.description.to_string(),
        kind: TemplateKind::Cv,
        categories: spec.categories.iter().map(|c| c.to_string()).collect(),
        is_premium: spec.is_premium,
        popularity: spec.popularity,
        structure: TemplateStructure {
            layout: spec.layout,
            sections: spec.sections,
            color_scheme: spec.colors,
            sidebar_sections,
        },
        typography: spec.typography,
        base_template: None,
        skeleton: None,
        slots: BTreeMap::new(),
        css_rules: Vec::new(),
    }
}

fn all_sections() -> Vec<SectionType> {
    SectionType::KNOWN.to_vec()
}

fn letter_structure(accent: &str) -> TemplateStructure {
    TemplateStructure {
        layout: LayoutKind::SingleColumn,
        sections: Vec::new(),
        color_scheme: colors("#1f2937", "#4b5563", accent, "#111827", "#ffffff"),
        sidebar_sections: Vec::new(),
    }
}

fn slots(pairs: &[(&str, &str)]) -> BTreeMap<String, String> {
    pairs
        .iter()
        .map(|(k, v)| (k.to_string(), v.to_string()))
        .collect()
}

/// The catalogue shipped with the service.
pub fn builtin_templates() -> Vec<TemplateDefinition> {
    vec![
        cv(CvSpec {
            id: "classic",
            name: "Classic",
            description: "Traditional single-column layout that parses cleanly in applicant tracking systems.",
            categories: &["professional", "ats-friendly", "simple"],
            is_premium: false,
            popularity: 98,
            layout: LayoutKind::SingleColumn,
            sections: all_sections(),
            colors: colors("#1f2937", "#4b5563", "#2563eb", "#111827", "#ffffff"),
            typography: typography(
                "Georgia, 'Times New Roman', serif",
                "Georgia, serif",
                11.0,
                1.4,
            ),
        }),
        cv(CvSpec {
            id: "modern",
            name: "Modern",
            description: "Two-column layout with a tinted sidebar for skills and languages.",
            categories: &["modern", "professional"],
            is_premium: false,
            popularity: 95,
            layout: LayoutKind::Sidebar,
            sections: all_sections(),
            colors: colors("#0f766e", "#115e59", "#14b8a6", "#1f2937", "#ffffff"),
            typography: typography(
                "'Inter', Arial, sans-serif",
                "'Inter', Arial, sans-serif",
                10.5,
                1.45,
            ),
        }),
        cv(CvSpec {
            id: "minimal",
            name: "Minimal",
            description: "Generous whitespace and restrained typography.",
            categories: &["simple", "ats-friendly"],
            is_premium: false,
            popularity: 90,
            layout: LayoutKind::SingleColumn,
            sections: vec![
                SectionType::Summary,
                SectionType::Experience,
                SectionType::Education,
                SectionType::Skills,
                SectionType::Projects,
                SectionType::Certifications,
                SectionType::Languages,
                SectionType::References,
            ],
            colors: colors("#111827", "#6b7280", "#111827", "#111827", "#ffffff"),
            typography: typography(
                "'Helvetica Neue', Arial, sans-serif",
                "'Helvetica Neue', Arial, sans-serif",
                10.5,
                1.5,
            ),
        }),
        cv(CvSpec {
            id: "creative",
            name: "Creative",
            description: "Bold banner header over a two-column body.",
            categories: &["creative", "modern"],
            is_premium: true,
            popularity: 84,
            layout: LayoutKind::Banner,
            sections: all_sections(),
            colors: colors("#7c3aed", "#5b21b6", "#f59e0b", "#1f2937", "#ffffff"),
            typography: typography(
                "'Lato', Arial, sans-serif",
                "'Montserrat', Arial, sans-serif",
                10.5,
                1.45,
            ),
        }),
        cv(CvSpec {
            id: "executive",
            name: "Executive",
            description: "Understated serif layout for senior leadership roles.",
            categories: &["professional", "executive"],
            is_premium: true,
            popularity: 80,
            layout: LayoutKind::SingleColumn,
            sections: all_sections(),
            colors: colors("#1e3a5f", "#334155", "#b45309", "#0f172a", "#ffffff"),
            typography: typography(
                "'EB Garamond', Georgia, serif",
                "'EB Garamond', Georgia, serif",
                11.5,
                1.4,
            ),
        }),
        cv(CvSpec {
            id: "technical",
            name: "Technical",
            description: "Projects-forward layout for engineering roles.",
            categories: &["modern", "ats-friendly"],
            is_premium: false,
            popularity: 77,
            layout: LayoutKind::Sidebar,
            sections: vec![
                SectionType::Summary,
                SectionType::Skills,
                SectionType::Experience,
                SectionType::Projects,
                SectionType::Education,
                SectionType::Certifications,
                SectionType::Languages,
                SectionType::Interests,
                SectionType::References,
            ],
            colors: colors("#0f172a", "#334155", "#0ea5e9", "#0f172a", "#ffffff"),
            typography: typography(
                "'Source Sans 3', Arial, sans-serif",
                "'JetBrains Mono', monospace",
                10.0,
                1.4,
            ),
        }),
        TemplateDefinition {
            id: "letter-classic".to_string(),
            name: "Classic Letter".to_string(),
            description: "Formal block-style cover letter.".to_string(),
            kind: TemplateKind::CoverLetter,
            categories: vec!["cover-letter".to_string(), "professional".to_string()],
            is_premium: false,
            popularity: 92,
            structure: letter_structure("#2563eb"),
            typography: typography(
                "Georgia, 'Times New Roman', serif",
                "Georgia, serif",
                11.0,
                1.5,
            ),
            base_template: None,
            skeleton: Some(LETTER_SKELETON.to_string()),
            slots: slots(&[
                ("letterhead", CLASSIC_LETTERHEAD),
                ("signature_block", PLAIN_SIGNATURE),
            ]),
            css_rules: vec![
                CssRule::new(
                    ".cl-letterhead",
                    &[("border-bottom", "1px solid #d1d5db"), ("padding-bottom", "8pt")],
                ),
                CssRule::new(".cl-sender-name", &[("margin", "0"), ("font-size", "20pt")]),
                CssRule::new(".cl-meta", &[("margin", "18pt 0")]),
                CssRule::new(".cl-recipient", &[("font-style", "normal")]),
                CssRule::new(".cl-body p", &[("margin", "0 0 10pt 0"), ("text-align", "justify")]),
                CssRule::new(".cl-signoff", &[("margin-top", "18pt")]),
            ],
        },
        TemplateDefinition {
            id: "letter-modern".to_string(),
            name: "Modern Letter".to_string(),
            description: "Classic letter with an accent bar and headline.".to_string(),
            kind: TemplateKind::CoverLetter,
            categories: vec!["cover-letter".to_string(), "modern".to_string()],
            is_premium: false,
            popularity: 88,
            structure: letter_structure("#14b8a6"),
            typography: typography(
                "'Inter', Arial, sans-serif",
                "'Inter', Arial, sans-serif",
                10.5,
                1.5,
            ),
            base_template: Some("letter-classic".to_string()),
            skeleton: None,
            slots: slots(&[("letterhead", MODERN_LETTERHEAD)]),
            css_rules: vec![
                CssRule::new(".cl-letterhead", &[("border-bottom", "none")]),
                CssRule::new(".cl-accent-bar", &[("height", "6pt"), ("margin-bottom", "10pt")]),
                CssRule::new(
                    ".cl-sender-title",
                    &[
                        ("margin", "2pt 0"),
                        ("text-transform", "uppercase"),
                        ("letter-spacing", "0.08em"),
                    ],
                ),
            ],
        },
        TemplateDefinition {
            id: "letter-minimal".to_string(),
            name: "Minimal Letter".to_string(),
            description: "Classic letter with lighter rules and spacing.".to_string(),
            kind: TemplateKind::CoverLetter,
            categories: vec!["cover-letter".to_string(), "simple".to_string()],
            is_premium: false,
            popularity: 70,
            structure: letter_structure("#111827"),
            typography: typography(
                "'Helvetica Neue', Arial, sans-serif",
                "'Helvetica Neue', Arial, sans-serif",
                10.5,
                1.6,
            ),
            base_template: Some("letter-classic".to_string()),
            skeleton: None,
            slots: BTreeMap::new(),
            css_rules: vec![
                CssRule::new(".cl-letterhead", &[("border-bottom", "none")]),
                CssRule::new(".cl-sender-name", &[("font-size", "16pt"), ("font-weight", "400")]),
            ],
        },
        TemplateDefinition {
            id: "letter-executive".to_string(),
            name: "Executive Letter".to_string(),
            description: "Modern letter with a ruled signature block.".to_string(),
            kind: TemplateKind::CoverLetter,
            categories: vec!["cover-letter".to_string(), "executive".to_string()],
            is_premium: true,
            popularity: 75,
            structure: letter_structure("#b45309"),
            typography: typography(
                "'EB Garamond', Georgia, serif",
                "'EB Garamond', Georgia, serif",
                11.5,
                1.5,
            ),
            base_template: Some("letter-modern".to_string()),
            skeleton: None,
            slots: slots(&[("signature_block", RULED_SIGNATURE)]),
            css_rules: vec![
                CssRule::new(".cl-signature-rule", &[("width", "40%"), ("margin-top", "24pt")]),
                CssRule::new(
                    ".cl-signature-title",
                    &[("margin", "0"), ("font-variant", "small-caps")],
                ),
            ],
        },
    ]
}
