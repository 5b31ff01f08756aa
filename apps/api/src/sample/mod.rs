//! Built-in sample documents used for template previews when the caller sends
//! no data of their own.

use chrono::{TimeZone, Utc};
use uuid::Uuid;

use crate::models::document::{
    Certification, CoverLetterContent, DocumentKind, DocumentModel, Education, Experience,
    Interest, Language, Locale, PersonalInfo, Proficiency, Project, Reference, ReferencesDisplay,
    Section, SectionType, Skill, SkillCategory, SkillLevel,
};

fn personal() -> PersonalInfo {
    PersonalInfo {
        full_name: "Aoife Byrne".into(),
        title: Some("Senior Software Engineer".into()),
        email: Some("aoife.byrne@example.ie".into()),
        phone: Some("087 123 4567".into()),
        location: Some("Dublin, Ireland".into()),
        linkedin: Some("linkedin.com/in/aoifebyrne".into()),
        website: None,
        github: Some("github.com/aoifebyrne".into()),
        summary: Some(
            "Backend engineer with eight years building payment and identity systems for \
             high-growth Irish and European companies. Comfortable owning services from \
             design review through on-call."
                .into(),
        ),
    }
}

fn skill(id: &str, name: &str, level: SkillLevel, category: SkillCategory) -> Skill {
    Skill {
        id: id.into(),
        name: name.into(),
        level,
        category,
    }
}

fn default_sections() -> Vec<Section> {
    SectionType::KNOWN
        .iter()
        .cloned()
        .enumerate()
        .map(|(i, kind)| Section {
            id: format!("section-{}", kind.as_str()),
            kind,
            title: String::new(),
            visible: true,
            order: i as u32,
        })
        .collect()
}

/// A complete one-to-two page CV in the Irish locale.
pub fn sample_cv() -> DocumentModel {
    DocumentModel {
        id: Uuid::nil(),
        kind: DocumentKind::Cv,
        template: "classic".into(),
        last_modified: Utc.with_ymd_and_hms(2024, 3, 1, 9, 0, 0).single(),
        version: 1,
        locale: Locale::EnIe,
        personal: personal(),
        experience: vec![
            Experience {
                id: "exp-1".into(),
                company: "Fintrail".into(),
                position: "Senior Software Engineer".into(),
                location: Some("Dublin".into()),
                start_date: "2021-02".into(),
                end_date: None,
                current: true,
                description: Some("Payments platform team, Rust and PostgreSQL.".into()),
                achievements: vec![
                    "Cut card-authorisation latency by 38% by moving risk checks off the hot path".into(),
                    "Led the migration of 14 services to a shared ledger with zero downtime".into(),
                ],
            },
            Experience {
                id: "exp-2".into(),
                company: "Kerrygold Digital".into(),
                position: "Software Engineer".into(),
                location: Some("Cork".into()),
                start_date: "2017-09".into(),
                end_date: Some("2021-01".into()),
                current: false,
                description: None,
                achievements: vec![
                    "Built the customer identity service used by 2M accounts".into(),
                    "Mentored four graduate engineers through their first year".into(),
                ],
            },
        ],
        education: vec![Education {
            id: "edu-1".into(),
            institution: "Trinity College Dublin".into(),
            degree: "BA (Mod.)".into(),
            field_of_study: Some("Computer Science".into()),
            location: Some("Dublin".into()),
            start_date: Some("2013-09".into()),
            end_date: Some("2017-06".into()),
            grade: Some("First Class Honours".into()),
            description: None,
        }],
        skills: vec![
            skill("sk-1", "Rust", SkillLevel::Expert, SkillCategory::Technical),
            skill("sk-2", "PostgreSQL", SkillLevel::Advanced, SkillCategory::Technical),
            skill("sk-3", "Kubernetes", SkillLevel::Intermediate, SkillCategory::Tools),
            skill("sk-4", "Technical writing", SkillLevel::Advanced, SkillCategory::Soft),
        ],
        languages: vec![
            Language { id: "lang-1".into(), name: "English".into(), proficiency: Proficiency::Native },
            Language { id: "lang-2".into(), name: "Irish".into(), proficiency: Proficiency::Professional },
        ],
        projects: vec![Project {
            id: "proj-1".into(),
            name: "ledgerlite".into(),
            description: Some("Open-source double-entry ledger library.".into()),
            technologies: vec!["Rust".into(), "SQLite".into()],
            url: Some("https://github.com/aoifebyrne/ledgerlite".into()),
            start_date: Some("2022-05".into()),
            end_date: None,
        }],
        certifications: vec![Certification {
            id: "cert-1".into(),
            name: "Certified Kubernetes Application Developer".into(),
            issuer: Some("CNCF".into()),
            date: Some("2022-11".into()),
            expiry_date: Some("2025-11".into()),
            credential_id: None,
        }],
        interests: vec![Interest {
            id: "int-1".into(),
            name: "Sea swimming".into(),
            description: None,
        }],
        references: vec![Reference {
            id: "ref-1".into(),
            name: "Ciarán Walsh".into(),
            position: Some("Engineering Director".into()),
            company: Some("Fintrail".into()),
            email: Some("ciaran.walsh@example.ie".into()),
            phone: Some("01 555 0100".into()),
            relationship: Some("Line manager".into()),
        }],
        sections: default_sections(),
        references_display: ReferencesDisplay::AvailableOnRequest,
        design_settings: None,
        cover_letter: None,
    }
}

/// A short cover letter from the same sender.
pub fn sample_cover_letter() -> DocumentModel {
    DocumentModel {
        id: Uuid::nil(),
        kind: DocumentKind::CoverLetter,
        template: "letter-classic".into(),
        last_modified: Utc.with_ymd_and_hms(2024, 3, 1, 9, 0, 0).single(),
        version: 1,
        locale: Locale::EnIe,
        personal: personal(),
        cover_letter: Some(CoverLetterContent {
            recipient_name: Some("Niamh Kelly".into()),
            recipient_title: Some("Head of Engineering".into()),
            company_name: Some("Harbour Payments".into()),
            company_address: Some("12 Grand Canal Quay\nDublin 2\nD02 XY12".into()),
            date: Some("2024-03-01".into()),
            greeting: None,
            paragraphs: vec![
                "I am writing to apply for the Staff Engineer role on your settlements team.".into(),
                "For the past three years I have owned the authorisation path at Fintrail, \
                 where I reduced latency by more than a third while keeping availability above \
                 99.99%."
                    .into(),
                "I would welcome the chance to discuss how that experience could help Harbour \
                 scale its platform across Europe."
                    .into(),
            ],
            closing: Some("Kind regards,".into()),
        }),
        ..Default::default()
    }
}
