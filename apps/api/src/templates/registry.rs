//! Template registry: the read-only catalogue plus base-chain resolution.
//!
//! The registry is built once at startup and shared behind an `Arc`; nothing on
//! it takes `&mut self`, so concurrent handlers read it without locking. The
//! current selection is a caller-owned [`TemplateSelection`], never registry state.

use std::collections::{HashMap, HashSet};

use serde::Serialize;
use thiserror::Error;
use tracing::{info, warn};

use crate::models::template::{TemplateDefinition, TemplateKind};
use crate::render::letter;
use crate::templates::catalogue::builtin_templates;
use crate::templates::css;

#[derive(Debug, Clone, PartialEq, Error)]
pub enum TemplateError {
    #[error("Template '{0}' not found")]
    NotFound(String),

    #[error("Cyclic base-template chain: {}", chain.join(" -> "))]
    Cyclic { chain: Vec<String> },

    #[error("Duplicate template id '{0}'")]
    Duplicate(String),

    #[error("Template catalogue could not be loaded: {0}")]
    Catalogue(String),
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct CategoryCount {
    pub category: String,
    pub count: usize,
}

/// Session-scoped "template in use". Owned by the caller, passed into [`TemplateRegistry::select`].
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct TemplateSelection {
    current: Option<String>,
}

impl TemplateSelection {
    pub fn new(current: Option<String>) -> Self {
        Self { current }
    }

    pub fn current(&self) -> Option<&str> {
        self.current.as_deref()
    }
}

/// Load-time checks for operator-supplied definitions.
///
/// CV templates render standalone, so a declared base would only leak into
/// their CSS. Letter skeletons and slots must parse as minijinja templates.
fn check_definition(template: &TemplateDefinition) -> Result<(), TemplateError> {
    match template.kind {
        TemplateKind::Cv if template.base_template.is_some() => Err(TemplateError::Catalogue(
            format!("CV template '{}' cannot declare a base template", template.id),
        )),
        TemplateKind::Cv => Ok(()),
        TemplateKind::CoverLetter => letter::check_syntax(template).map_err(|e| {
            TemplateError::Catalogue(format!("Letter template '{}': {e}", template.id))
        }),
    }
}

#[derive(Debug)]
pub struct TemplateRegistry {
    /// Sorted by popularity (descending) then id.
    templates: Vec<TemplateDefinition>,
    index: HashMap<String, usize>,
}

impl TemplateRegistry {
    /// Builds a registry from definitions. Ids must be unique; base references
    /// are checked lazily by [`resolve_base`](Self::resolve_base).
    pub fn new(mut templates: Vec<TemplateDefinition>) -> Result<Self, TemplateError> {
        templates.sort_by(|a, b| {
            b.popularity
                .cmp(&a.popularity)
                .then_with(|| a.id.cmp(&b.id))
        });

        let mut index = HashMap::with_capacity(templates.len());
        for (i, t) in templates.iter().enumerate() {
            if index.insert(t.id.clone(), i).is_some() {
                return Err(TemplateError::Duplicate(t.id.clone()));
            }
        }

        Ok(Self { templates, index })
    }

    /// The built-in catalogue.
    pub fn builtin() -> Result<Self, TemplateError> {
        Self::new(builtin_templates())
    }

    /// The built-in catalogue plus operator-supplied definitions (JSON array).
    pub fn with_extra_json(json: &str) -> Result<Self, TemplateError> {
        let extra: Vec<TemplateDefinition> =
            serde_json::from_str(json).map_err(|e| TemplateError::Catalogue(e.to_string()))?;
        for template in &extra {
            check_definition(template)?;
        }
        let extra_count = extra.len();
        let mut templates = builtin_templates();
        templates.extend(extra);
        let registry = Self::new(templates)?;
        info!("Loaded {extra_count} additional template(s) from catalogue file");
        Ok(registry)
    }

    pub fn len(&self) -> usize {
        self.templates.len()
    }

    /// Every template, most popular first. Stable across calls.
    pub fn list_all(&self) -> &[TemplateDefinition] {
        &self.templates
    }

    /// Templates tagged with `category` (case-insensitive). Unknown or blank
    /// categories yield an empty list.
    pub fn list_by_category(&self, category: &str) -> Vec<&TemplateDefinition> {
        let category = category.trim();
        if category.is_empty() {
            return Vec::new();
        }
        self.templates
            .iter()
            .filter(|t| t.has_category(category))
            .collect()
    }

    pub fn get_by_id(&self, id: &str) -> Result<&TemplateDefinition, TemplateError> {
        self.index
            .get(id)
            .map(|&i| &self.templates[i])
            .ok_or_else(|| TemplateError::NotFound(id.to_string()))
    }

    /// Stores `id` as the session's selection. Unknown ids return `false` and
    /// leave the previous selection untouched.
    pub fn select(&self, selection: &mut TemplateSelection, id: &str) -> bool {
        if !self.index.contains_key(id) {
            return false;
        }
        selection.current = Some(id.to_string());
        true
    }

    /// Distinct categories with their template counts, largest first.
    pub fn categories(&self) -> Vec<CategoryCount> {
        let mut counts: HashMap<String, usize> = HashMap::new();
        for t in &self.templates {
            // A template tagged twice with the same category counts once.
            let unique: HashSet<String> = t.categories.iter().map(|c| c.to_lowercase()).collect();
            for c in unique {
                *counts.entry(c).or_insert(0) += 1;
            }
        }

        let mut result: Vec<CategoryCount> = counts
            .into_iter()
            .map(|(category, count)| CategoryCount { category, count })
            .collect();
        result.sort_by(|a, b| {
            b.count
                .cmp(&a.count)
                .then_with(|| a.category.cmp(&b.category))
        });
        result
    }

    /// The chain from the root ancestor down to `template`, root first.
    ///
    /// A template without `base_template` resolves to `[template]`. Revisiting an
    /// id already in the chain is a [`TemplateError::Cyclic`]; a dangling base
    /// reference is a [`TemplateError::NotFound`].
    pub fn resolve_base<'a>(
        &'a self,
        template: &'a TemplateDefinition,
    ) -> Result<Vec<&'a TemplateDefinition>, TemplateError> {
        let mut chain = vec![template];
        let mut seen: HashSet<&str> = HashSet::from([template.id.as_str()]);
        let mut current = template;

        while let Some(base_id) = current.base_template.as_deref() {
            if !seen.insert(base_id) {
                let mut ids: Vec<String> = chain.iter().map(|t| t.id.clone()).collect();
                ids.push(base_id.to_string());
                warn!("Cyclic base-template chain detected: {}", ids.join(" -> "));
                return Err(TemplateError::Cyclic { chain: ids });
            }
            current = self.get_by_id(base_id)?;
            chain.push(current);
        }

        chain.reverse();
        Ok(chain)
    }

    /// Template-scoped stylesheet for `id`, including base-chain contributions.
    /// Pure: identical ids give byte-identical output.
    pub fn generate_css(&self, id: &str) -> Result<String, TemplateError> {
        let template = self.get_by_id(id)?;
        let chain = self.resolve_base(template)?;
        Ok(css::template_stylesheet(template, &chain))
    }
}

// ────────────────────────────────────────────────────────────────────────────
// Tests
// ────────────────────────────────────────────────────────────────────────────
