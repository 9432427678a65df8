//! services/client/src/app/project_form.rs
//!
//! Form state behind the add/edit project screens.

use crate::app::projects::ProjectStore;
use chrono::{Datelike, Utc};
use portfolio_core::domain::{Project, ProjectDraft, ProjectPatch};

/// Editable project fields plus the id of the project being edited, if any.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ProjectForm {
    editing: Option<i64>,
    pub draft: ProjectDraft,
}

impl ProjectForm {
    /// An empty form for a new project.
    pub fn new_project() -> Self {
        Self {
            editing: None,
            draft: ProjectDraft {
                name: String::new(),
                kind: String::new(),
                description: String::new(),
                year: Utc::now().year(),
                languages: String::new(),
                github: String::new(),
                image: String::new(),
                images: Vec::new(),
                rank: 0,
            },
        }
    }

    /// A form pre-filled from an existing project.
    pub fn edit(project: &Project) -> Self {
        Self {
            editing: Some(project.id),
            draft: ProjectDraft {
                name: project.name.clone(),
                kind: project.kind.clone(),
                description: project.description.clone().unwrap_or_default(),
                year: project.year.unwrap_or_else(|| Utc::now().year()),
                languages: project.languages.clone().unwrap_or_default(),
                github: project.github.clone().unwrap_or_default(),
                image: project.image.clone(),
                images: project.images.clone(),
                rank: project.rank.unwrap_or(0),
            },
        }
    }

    pub fn is_editing(&self) -> bool {
        self.editing.is_some()
    }

    /// Adds a gallery image. Blank or duplicate references are ignored.
    pub fn add_image(&mut self, reference: &str) -> bool {
        let reference = reference.trim();
        if reference.is_empty() || self.draft.images.iter().any(|i| i == reference) {
            return false;
        }
        self.draft.images.push(reference.to_string());
        true
    }

    pub fn remove_image(&mut self, reference: &str) {
        self.draft.images.retain(|i| i != reference);
    }

    /// Creates or updates the project. Returns `true` when the backend accepted it.
    pub async fn submit(&self, store: &ProjectStore) -> bool {
        match self.editing {
            Some(id) => store.update(id, &ProjectPatch::from(self.draft.clone())).await,
            None => store.create(&self.draft).await,
        }
    }
}
