//! Career-document model: the structured CV / cover-letter data edited by a user.
//!
//! Documents arrive as JSON from the editing surface, so every field is defaulted:
//! a half-filled document must deserialize and render, never fail.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::models::template::TemplateDefinition;

// ────────────────────────────────────────────────────────────────────────────
// Top-level document
// ────────────────────────────────────────────────────────────────────────────

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum DocumentKind {
    #[default]
    Cv,
    CoverLetter,
}

/// Regional convention for dates and phone numbers.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub enum Locale {
    #[default]
    #[serde(rename = "en-IE")]
    EnIe,
    #[serde(rename = "en-GB")]
    EnGb,
    #[serde(rename = "en-US")]
    EnUs,
}

impl Locale {
    pub fn tag(self) -> &'static str {
        match self {
            Locale::EnIe => "en-IE",
            Locale::EnGb => "en-GB",
            Locale::EnUs => "en-US",
        }
    }
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum ReferencesDisplay {
    #[default]
    AvailableOnRequest,
    Detailed,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct DocumentModel {
    pub id: Uuid,
    pub kind: DocumentKind,
    /// Identifier of the template the user picked in the editor.
    pub template: String,
    pub last_modified: Option<DateTime<Utc>>,
    pub version: u32,
    pub locale: Locale,
    pub personal: PersonalInfo,
    pub experience: Vec<Experience>,
    pub education: Vec<Education>,
    pub skills: Vec<Skill>,
    pub languages: Vec<Language>,
    pub projects: Vec<Project>,
    pub certifications: Vec<Certification>,
    pub interests: Vec<Interest>,
    pub references: Vec<Reference>,
    pub sections: Vec<Section>,
    pub references_display: ReferencesDisplay,
    pub design_settings: Option<DesignSettings>,
    pub cover_letter: Option<CoverLetterContent>,
}

impl DocumentModel {
    /// Sections in render order, at most one per type.
    ///
    /// Falls back to the template's declared section list (all visible) when the
    /// document carries none. Ties on `order` keep their insertion position.
    /// Repeated types collapse onto the first entry by order, which stays hidden
    /// if any entry of that type is hidden.
    pub fn effective_sections(&self, template: &TemplateDefinition) -> Vec<Section> {
        let mut sections = if self.sections.is_empty() {
            template
                .structure
                .sections
                .iter()
                .enumerate()
                .map(|(i, kind)| Section {
                    id: kind.as_str().to_string(),
                    kind: kind.clone(),
                    title: String::new(),
                    visible: true,
                    order: i as u32,
                })
                .collect()
        } else {
            self.sections.clone()
        };
        sections.sort_by_key(|s| s.order);

        let mut unique: Vec<Section> = Vec::with_capacity(sections.len());
        for section in sections {
            match unique.iter_mut().find(|s| s.kind == section.kind) {
                Some(first) => first.visible &= section.visible,
                None => unique.push(section),
            }
        }
        unique
    }

    /// True unless any of the document's entries for this section type hides it.
    pub fn is_section_shown(&self, kind: &SectionType) -> bool {
        self.sections
            .iter()
            .filter(|s| &s.kind == kind)
            .all(|s| s.visible)
    }
}

// ────────────────────────────────────────────────────────────────────────────
// Personal block
// ────────────────────────────────────────────────────────────────────────────

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct PersonalInfo {
    pub full_name: String,
    pub title: Option<String>,
    pub email: Option<String>,
    pub phone: Option<String>,
    pub location: Option<String>,
    pub linkedin: Option<String>,
    pub website: Option<String>,
    pub github: Option<String>,
    pub summary: Option<String>,
}

impl PersonalInfo {
    /// True when any identity or contact field carries text. The summary is
    /// weighed separately.
    pub fn has_identity(&self) -> bool {
        !self.full_name.trim().is_empty()
            || [
                &self.title,
                &self.email,
                &self.phone,
                &self.location,
                &self.linkedin,
                &self.website,
                &self.github,
            ]
            .into_iter()
            .any(|f| non_empty(f).is_some())
    }

    /// Populated link fields as `(kind, value)` pairs, in display order.
    pub fn links(&self) -> Vec<(&'static str, &str)> {
        [
            ("linkedin", &self.linkedin),
            ("website", &self.website),
            ("github", &self.github),
        ]
        .into_iter()
        .filter_map(|(kind, v)| non_empty(v).map(|v| (kind, v)))
        .collect()
    }
}

/// Treats blank optional strings the same as absent ones.
pub fn non_empty(value: &Option<String>) -> Option<&str> {
    value.as_deref().map(str::trim).filter(|s| !s.is_empty())
}

// ────────────────────────────────────────────────────────────────────────────
// Repeated entities
// ────────────────────────────────────────────────────────────────────────────

/// Whether an entry carries enough text to be worth rendering or weighing.
/// Editors create blank rows before the user types into them.
pub trait Populated {
    fn is_populated(&self) -> bool;
}

fn any_text(fields: &[&str]) -> bool {
    fields.iter().any(|f| !f.trim().is_empty())
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct Experience {
    pub id: String,
    pub company: String,
    pub position: String,
    pub location: Option<String>,
    pub start_date: String,
    pub end_date: Option<String>,
    pub current: bool,
    pub description: Option<String>,
    pub achievements: Vec<String>,
}

impl Experience {
    /// End date honouring the `current` flag: a current role has no end.
    pub fn effective_end_date(&self) -> Option<&str> {
        if self.current {
            None
        } else {
            non_empty(&self.end_date)
        }
    }
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct Education {
    pub id: String,
    pub institution: String,
    pub degree: String,
    pub field_of_study: Option<String>,
    pub location: Option<String>,
    pub start_date: Option<String>,
    pub end_date: Option<String>,
    pub grade: Option<String>,
    pub description: Option<String>,
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum SkillLevel {
    Beginner,
    #[default]
    Intermediate,
    Advanced,
    Expert,
}

impl SkillLevel {
    pub fn label(self) -> &'static str {
        match self {
            SkillLevel::Beginner => "Beginner",
            SkillLevel::Intermediate => "Intermediate",
            SkillLevel::Advanced => "Advanced",
            SkillLevel::Expert => "Expert",
        }
    }
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum SkillCategory {
    #[default]
    Technical,
    Soft,
    Tools,
    Other,
}

impl SkillCategory {
    pub const ALL: [SkillCategory; 4] = [
        SkillCategory::Technical,
        SkillCategory::Soft,
        SkillCategory::Tools,
        SkillCategory::Other,
    ];

    pub fn label(self) -> &'static str {
        match self {
            SkillCategory::Technical => "Technical",
            SkillCategory::Soft => "Interpersonal",
            SkillCategory::Tools => "Tools",
            SkillCategory::Other => "Other",
        }
    }
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct Skill {
    pub id: String,
    pub name: String,
    pub level: SkillLevel,
    pub category: SkillCategory,
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Proficiency {
    Basic,
    #[default]
    Conversational,
    Professional,
    Fluent,
    Native,
}

impl Proficiency {
    pub fn label(self) -> &'static str {
        match self {
            Proficiency::Basic => "Basic",
            Proficiency::Conversational => "Conversational",
            Proficiency::Professional => "Professional working proficiency",
            Proficiency::Fluent => "Fluent",
            Proficiency::Native => "Native",
        }
    }
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct Language {
    pub id: String,
    pub name: String,
    pub proficiency: Proficiency,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct Project {
    pub id: String,
    pub name: String,
    pub description: Option<String>,
    pub technologies: Vec<String>,
    pub url: Option<String>,
    pub start_date: Option<String>,
    pub end_date: Option<String>,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct Certification {
    pub id: String,
    pub name: String,
    pub issuer: Option<String>,
    pub date: Option<String>,
    pub expiry_date: Option<String>,
    pub credential_id: Option<String>,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct Interest {
    pub id: String,
    pub name: String,
    pub description: Option<String>,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct Reference {
    pub id: String,
    pub name: String,
    pub position: Option<String>,
    pub company: Option<String>,
    pub email: Option<String>,
    pub phone: Option<String>,
    pub relationship: Option<String>,
}

impl Populated for Experience {
    fn is_populated(&self) -> bool {
        any_text(&[self.company.as_str(), self.position.as_str()])
    }
}

impl Populated for Education {
    fn is_populated(&self) -> bool {
        any_text(&[self.institution.as_str(), self.degree.as_str()])
    }
}

impl Populated for Skill {
    fn is_populated(&self) -> bool {
        any_text(&[self.name.as_str()])
    }
}

impl Populated for Language {
    fn is_populated(&self) -> bool {
        any_text(&[self.name.as_str()])
    }
}

impl Populated for Project {
    fn is_populated(&self) -> bool {
        any_text(&[self.name.as_str()])
    }
}

impl Populated for Certification {
    fn is_populated(&self) -> bool {
        any_text(&[self.name.as_str()])
    }
}

impl Populated for Interest {
    fn is_populated(&self) -> bool {
        any_text(&[self.name.as_str()])
    }
}

impl Populated for Reference {
    fn is_populated(&self) -> bool {
        any_text(&[self.name.as_str()])
    }
}

// ────────────────────────────────────────────────────────────────────────────
// Sections
// ────────────────────────────────────────────────────────────────────────────

/// Closed set of section types with a catch-all for types this build does not know.
///
/// Serialized as a plain string so documents written by a newer editor still
/// deserialize; `Other` sections are skipped at render time.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(from = "String", into = "String")]
pub enum SectionType {
    Summary,
    Experience,
    Education,
    Skills,
    Projects,
    Certifications,
    Languages,
    Interests,
    References,
    Other(String),
}

impl SectionType {
    pub const KNOWN: [SectionType; 9] = [
        SectionType::Summary,
        SectionType::Experience,
        SectionType::Education,
        SectionType::Skills,
        SectionType::Projects,
        SectionType::Certifications,
        SectionType::Languages,
        SectionType::Interests,
        SectionType::References,
    ];

    pub fn as_str(&self) -> &str {
        match self {
            SectionType::Summary => "summary",
            SectionType::Experience => "experience",
            SectionType::Education => "education",
            SectionType::Skills => "skills",
            SectionType::Projects => "projects",
            SectionType::Certifications => "certifications",
            SectionType::Languages => "languages",
            SectionType::Interests => "interests",
            SectionType::References => "references",
            SectionType::Other(name) => name,
        }
    }

    pub fn default_title(&self) -> &str {
        match self {
            SectionType::Summary => "Profile",
            SectionType::Experience => "Professional Experience",
            SectionType::Education => "Education",
            SectionType::Skills => "Skills",
            SectionType::Projects => "Projects",
            SectionType::Certifications => "Certifications",
            SectionType::Languages => "Languages",
            SectionType::Interests => "Interests",
            SectionType::References => "References",
            SectionType::Other(name) => name,
        }
    }
}

impl From<String> for SectionType {
    fn from(value: String) -> Self {
        match value.trim().to_ascii_lowercase().as_str() {
            "summary" => SectionType::Summary,
            "experience" => SectionType::Experience,
            "education" => SectionType::Education,
            "skills" => SectionType::Skills,
            "projects" => SectionType::Projects,
            "certifications" => SectionType::Certifications,
            "languages" => SectionType::Languages,
            "interests" => SectionType::Interests,
            "references" => SectionType::References,
            _ => SectionType::Other(value),
        }
    }
}

impl From<SectionType> for String {
    fn from(value: SectionType) -> Self {
        value.as_str().to_string()
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Section {
    #[serde(default)]
    pub id: String,
    #[serde(rename = "type")]
    pub kind: SectionType,
    #[serde(default)]
    pub title: String,
    #[serde(default = "default_visible")]
    pub visible: bool,
    #[serde(default)]
    pub order: u32,
}

impl Section {
    /// The user's title, or the type's default when left blank.
    pub fn display_title(&self) -> &str {
        let title = self.title.trim();
        if title.is_empty() {
            self.kind.default_title()
        } else {
            title
        }
    }
}

fn default_visible() -> bool {
    true
}

// ────────────────────────────────────────────────────────────────────────────
// Design settings and cover-letter content
// ────────────────────────────────────────────────────────────────────────────

/// Per-document overrides of the template's typography and spacing.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct DesignSettings {
    pub margin_mm: Option<f32>,
    pub font_size_pt: Option<f32>,
    pub line_spacing: Option<f32>,
    pub section_spacing_mm: Option<f32>,
    pub font_family: Option<String>,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct CoverLetterContent {
    pub recipient_name: Option<String>,
    pub recipient_title: Option<String>,
    pub company_name: Option<String>,
    pub company_address: Option<String>,
    pub date: Option<String>,
    pub greeting: Option<String>,
    pub paragraphs: Vec<String>,
    pub closing: Option<String>,
}

impl CoverLetterContent {
    pub fn body_paragraphs(&self) -> impl Iterator<Item = &str> {
        self.paragraphs
            .iter()
            .map(|p| p.trim())
            .filter(|p| !p.is_empty())
    }
}

// ────────────────────────────────────────────────────────────────────────────
// Tests
// ────────────────────────────────────────────────────────────────────────────
