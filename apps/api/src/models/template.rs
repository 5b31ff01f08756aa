//! Template catalogue entries. Immutable once the registry is built.

use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};

use crate::models::document::{DocumentKind, SectionType};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum TemplateKind {
    Cv,
    CoverLetter,
}

impl TemplateKind {
    pub fn document_kind(self) -> DocumentKind {
        match self {
            TemplateKind::Cv => DocumentKind::Cv,
            TemplateKind::CoverLetter => DocumentKind::CoverLetter,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum LayoutKind {
    /// Everything in one column, top to bottom.
    SingleColumn,
    /// Narrow side column for compact sections, wide main column.
    Sidebar,
    /// Full-width header band above a sidebar layout.
    Banner,
}

impl LayoutKind {
    pub fn as_str(self) -> &'static str {
        match self {
            LayoutKind::SingleColumn => "single-column",
            LayoutKind::Sidebar => "sidebar",
            LayoutKind::Banner => "banner",
        }
    }

    pub fn has_sidebar(self) -> bool {
        matches!(self, LayoutKind::Sidebar | LayoutKind::Banner)
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ColorScheme {
    pub primary: String,
    pub secondary: String,
    pub accent: String,
    pub text: String,
    pub background: String,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Typography {
    pub font_family: String,
    pub heading_font_family: String,
    pub font_size_pt: f32,
    pub line_height: f32,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TemplateStructure {
    pub layout: LayoutKind,
    /// Section types this template can render, in their default order.
    pub sections: Vec<SectionType>,
    pub color_scheme: ColorScheme,
    /// Section types routed to the side column in sidebar layouts.
    #[serde(default)]
    pub sidebar_sections: Vec<SectionType>,
}

impl TemplateStructure {
    pub fn supports(&self, kind: &SectionType) -> bool {
        self.sections.contains(kind)
    }

    pub fn in_sidebar(&self, kind: &SectionType) -> bool {
        self.layout.has_sidebar() && self.sidebar_sections.contains(kind)
    }
}

/// One CSS rule contributed by a template; the selector is scoped to the
/// template when the stylesheet is generated.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CssRule {
    pub selector: String,
    pub declarations: Vec<(String, String)>,
}

impl CssRule {
    pub fn new(selector: &str, declarations: &[(&str, &str)]) -> Self {
        Self {
            selector: selector.to_string(),
            declarations: declarations
                .iter()
                .map(|(k, v)| (k.to_string(), v.to_string()))
                .collect(),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TemplateDefinition {
    pub id: String,
    pub name: String,
    pub description: String,
    pub kind: TemplateKind,
    pub categories: Vec<String>,
    #[serde(default)]
    pub is_premium: bool,
    #[serde(default)]
    pub popularity: u32,
    pub structure: TemplateStructure,
    pub typography: Typography,
    /// Cover-letter templates only: the template this one extends.
    #[serde(default)]
    pub base_template: Option<String>,
    /// Letter layout as a minijinja template: `{% block name %}` marks each slot,
    /// `{{ field }}` a document value. Inherited when absent.
    #[serde(default)]
    pub skeleton: Option<String>,
    /// Template-authored markup for named slots, rendered as block overrides.
    /// The most derived template in the chain wins.
    #[serde(default)]
    pub slots: BTreeMap<String, String>,
    #[serde(default)]
    pub css_rules: Vec<CssRule>,
}

impl TemplateDefinition {
    pub fn has_category(&self, category: &str) -> bool {
        self.categories
            .iter()
            .any(|c| c.eq_ignore_ascii_case(category))
    }

    pub fn summary(&self) -> TemplateSummary {
        TemplateSummary {
            id: self.id.clone(),
            name: self.name.clone(),
            description: self.description.clone(),
            kind: self.kind,
            categories: self.categories.clone(),
            is_premium: self.is_premium,
            popularity: self.popularity,
            structure: StructureSummary {
                layout: self.structure.layout,
                sections: self.structure.sections.clone(),
            },
            base_template: self.base_template.clone(),
        }
    }
}

/// Listing shape: everything except markup and CSS payloads.
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct TemplateSummary {
    pub id: String,
    pub name: String,
    pub description: String,
    pub kind: TemplateKind,
    pub categories: Vec<String>,
    pub is_premium: bool,
    pub popularity: u32,
    pub structure: StructureSummary,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub base_template: Option<String>,
}

#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct StructureSummary {
    pub layout: LayoutKind,
    pub sections: Vec<SectionType>,
}
