//! Page-count estimation, a coarse, template-agnostic signal for the editor's
//! page badge ("CV is 3 pages").
//!
//! Content is reduced to a single weight (roughly characters of printed text,
//! with fixed allowances for headings and contact blocks) and divided by the
//! capacity of one A4 page at the default font metrics. This is not a layout
//! engine: it never looks at the template, section visibility or design
//! settings, and it is never used to drop content.

use serde::{Deserialize, Serialize};

use crate::models::document::{non_empty, DocumentKind, DocumentModel, Populated};

// ────────────────────────────────────────────────────────────────────────────
// Weights
// ────────────────────────────────────────────────────────────────────────────

/// Weight one A4 page holds at 10.5pt body text with 18mm margins.
pub const CHARS_PER_PAGE: usize = 3000;

const PERSONAL_BLOCK: usize = 250;
const EXPERIENCE_BASE: usize = 150;
const ACHIEVEMENT_BASE: usize = 60;
const EDUCATION_BASE: usize = 120;
const SKILL: usize = 20;
const PROJECT_BASE: usize = 100;
const PROJECT_TECHNOLOGY: usize = 10;
const LANGUAGE: usize = 25;
const CERTIFICATION: usize = 60;
const INTEREST: usize = 15;
/// Contact blocks are bulky; the heaviest per-entry allowance.
const REFERENCE: usize = 180;
const LETTER_BASE: usize = 200;

const CV_MAX_PAGES: usize = 2;
const COVER_LETTER_MAX_PAGES: usize = 1;

// ────────────────────────────────────────────────────────────────────────────
// Types
// ────────────────────────────────────────────────────────────────────────────

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum PageVerdict {
    WithinLimit,
    OverLimit,
}

/// Estimate plus the numbers behind it, for the editor's page badge.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PaginationReport {
    pub pages: usize,
    pub content_weight: usize,
    pub page_capacity: usize,
    /// Share of the last page in use, 0.0–1.0. An empty document reports 0.0.
    pub last_page_fill: f32,
    pub recommended_max_pages: usize,
    pub verdict: PageVerdict,
}

// ────────────────────────────────────────────────────────────────────────────
// Core functions
// ────────────────────────────────────────────────────────────────────────────

fn text_weight(text: &str) -> usize {
    text.trim().chars().count()
}

fn optional_weight(text: &Option<String>) -> usize {
    non_empty(text).map(text_weight).unwrap_or(0)
}

/// Sums the weight of every populated field and entry in `doc`.
///
/// References count regardless of `referencesDisplay` or section visibility.
pub fn content_weight(doc: &DocumentModel) -> usize {
    let mut weight = 0;

    if doc.personal.has_identity() {
        weight += PERSONAL_BLOCK;
    }
    weight += optional_weight(&doc.personal.summary);

    for exp in doc.experience.iter().filter(|e| e.is_populated()) {
        weight += EXPERIENCE_BASE + optional_weight(&exp.description);
        weight += exp
            .achievements
            .iter()
            .filter(|a| !a.trim().is_empty())
            .map(|a| ACHIEVEMENT_BASE + text_weight(a))
            .sum::<usize>();
    }

    for edu in doc.education.iter().filter(|e| e.is_populated()) {
        weight += EDUCATION_BASE + optional_weight(&edu.description);
    }

    weight += SKILL * doc.skills.iter().filter(|s| s.is_populated()).count();

    for project in doc.projects.iter().filter(|p| p.is_populated()) {
        let technologies = project.technologies.iter().filter(|t| !t.trim().is_empty()).count();
        weight += PROJECT_BASE + optional_weight(&project.description) + PROJECT_TECHNOLOGY * technologies;
    }

    weight += LANGUAGE * doc.languages.iter().filter(|l| l.is_populated()).count();
    weight += CERTIFICATION * doc.certifications.iter().filter(|c| c.is_populated()).count();
    weight += INTEREST * doc.interests.iter().filter(|i| i.is_populated()).count();
    weight += REFERENCE * doc.references.iter().filter(|r| r.is_populated()).count();

    if let Some(letter) = &doc.cover_letter {
        let body: usize = letter.body_paragraphs().map(text_weight).sum();
        if body > 0 {
            weight += LETTER_BASE + body;
        }
    }

    weight
}

/// Estimated printed A4 pages for `doc`. Never less than 1.
pub fn estimate_pages(doc: &DocumentModel) -> usize {
    content_weight(doc).div_ceil(CHARS_PER_PAGE).max(1)
}

/// Builds the full report for `doc`.
pub fn pagination_report(doc: &DocumentModel) -> PaginationReport {
    let content_weight = content_weight(doc);
    let pages = estimate_pages(doc);

    let used_on_last = content_weight - (pages - 1) * CHARS_PER_PAGE;
    let last_page_fill = (used_on_last as f32 / CHARS_PER_PAGE as f32).min(1.0);

    let recommended_max_pages = match doc.kind {
        DocumentKind::Cv => CV_MAX_PAGES,
        DocumentKind::CoverLetter => COVER_LETTER_MAX_PAGES,
    };
    let verdict = if pages > recommended_max_pages {
        PageVerdict::OverLimit
    } else {
        PageVerdict::WithinLimit
    };

    PaginationReport {
        pages,
        content_weight,
        page_capacity: CHARS_PER_PAGE,
        last_page_fill,
        recommended_max_pages,
        verdict,
    }
}

// ────────────────────────────────────────────────────────────────────────────
// Tests
// ────────────────────────────────────────────────────────────────────────────

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::document::{
        CoverLetterContent, Experience, Reference, Section, SectionType, Skill,
    };
    use proptest::prelude::*;

    fn achievement(n: usize) -> String {
        format!("Reduced deployment time by {:02}% across twelve product teams in Dublin and Cork.", n % 100)
    }

    fn experience(i: usize, achievements: usize) -> Experience {
        Experience {
            id: format!("exp-{i}"),
            company: format!("Company {i}"),
            position: "Engineer".to_string(),
            start_date: "2018-01".to_string(),
            achievements: (0..achievements).map(achievement).collect(),
            ..Default::default()
        }
    }

    #[test]
    fn test_empty_document_is_one_page() {
        let doc = DocumentModel::default();
        assert_eq!(content_weight(&doc), 0);
        assert_eq!(estimate_pages(&doc), 1);
        let report = pagination_report(&doc);
        assert_eq!(report.pages, 1);
        assert_eq!(report.last_page_fill, 0.0);
        assert_eq!(report.verdict, PageVerdict::WithinLimit);
    }

    #[test]
    fn test_ten_roles_with_five_achievements_reach_three_pages() {
        let doc = DocumentModel {
            experience: (0..10).map(|i| experience(i, 5)).collect(),
            ..Default::default()
        };
        assert!(achievement(1).chars().count() >= 75);
        assert!(estimate_pages(&doc) >= 3, "weight {}", content_weight(&doc));
        let report = pagination_report(&doc);
        assert_eq!(report.verdict, PageVerdict::OverLimit);
        assert_eq!(report.recommended_max_pages, 2);
    }

    #[test]
    fn test_blank_rows_carry_no_weight() {
        let doc = DocumentModel {
            experience: vec![Experience::default()],
            skills: vec![Skill::default(); 5],
            ..Default::default()
        };
        assert_eq!(content_weight(&doc), 0);
    }

    #[test]
    fn test_reference_visibility_does_not_change_weight() {
        let mut doc = DocumentModel {
            references: vec![Reference {
                id: "r".into(),
                name: "Ciarán Walsh".into(),
                ..Default::default()
            }],
            sections: vec![Section {
                id: "refs".into(),
                kind: SectionType::References,
                title: String::new(),
                visible: true,
                order: 0,
            }],
            ..Default::default()
        };
        let shown = content_weight(&doc);
        doc.sections[0].visible = false;
        assert_eq!(content_weight(&doc), shown);
        doc.references.clear();
        assert!(content_weight(&doc) < shown);
    }

    #[test]
    fn test_reference_is_heaviest_entry() {
        for other in [EXPERIENCE_BASE, EDUCATION_BASE, PROJECT_BASE, CERTIFICATION, LANGUAGE, SKILL, INTEREST] {
            assert!(REFERENCE > other);
        }
    }

    #[test]
    fn test_cover_letter_body_counts_and_limit_is_one_page() {
        let doc = DocumentModel {
            kind: DocumentKind::CoverLetter,
            cover_letter: Some(CoverLetterContent {
                paragraphs: vec!["p".repeat(1600), "q".repeat(1600)],
                ..Default::default()
            }),
            ..Default::default()
        };
        let report = pagination_report(&doc);
        assert_eq!(report.pages, 2);
        assert_eq!(report.recommended_max_pages, 1);
        assert_eq!(report.verdict, PageVerdict::OverLimit);
    }

    #[test]
    fn test_exact_page_boundary_reports_full_last_page() {
        let doc = DocumentModel {
            skills: (0..CHARS_PER_PAGE / SKILL)
                .map(|i| Skill { id: i.to_string(), name: format!("skill {i}"), ..Default::default() })
                .collect(),
            ..Default::default()
        };
        let report = pagination_report(&doc);
        assert_eq!(report.content_weight, CHARS_PER_PAGE);
        assert_eq!(report.pages, 1);
        assert_eq!(report.last_page_fill, 1.0);
    }

    proptest! {
        #[test]
        fn prop_adding_an_experience_never_decreases_pages(
            existing in 0usize..12,
            achievements in 1usize..8,
        ) {
            let mut doc = DocumentModel {
                experience: (0..existing).map(|i| experience(i, 3)).collect(),
                ..Default::default()
            };
            let before = estimate_pages(&doc);
            let weight_before = content_weight(&doc);
            doc.experience.push(experience(existing, achievements));
            prop_assert!(estimate_pages(&doc) >= before);
            prop_assert!(content_weight(&doc) > weight_before);
        }

        #[test]
        fn prop_pages_never_below_one(summary in ".{0,200}") {
            let mut doc = DocumentModel::default();
            doc.personal.summary = Some(summary);
            prop_assert!(estimate_pages(&doc) >= 1);
        }
    }
}
