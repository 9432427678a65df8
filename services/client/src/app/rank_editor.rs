//! services/client/src/app/rank_editor.rs
//!
//! The admin ranking screen: a working copy of the projects that a drag gesture
//! reorders, persisted as one rank update per project.

use crate::app::projects::ProjectStore;
use crate::app::state::AppState;
use crate::error::ClientError;
use futures::future::join_all;
use portfolio_core::domain::{Project, ProjectPatch};
use portfolio_core::ranking::{assign_ranks, initial_order, reorder, DragTracker, Gesture};
use portfolio_core::routing::View;
use tracing::{error, info, warn};

/// Progress of the most recent save.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SaveState {
    Idle,
    Saving,
    Done,
    Failed,
}

/// What a finished pointer gesture did to the editor.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum EditorAction {
    /// A click on a row: open that project.
    Open(i64),
    Reordered,
    None,
}

pub struct RankEditor {
    projects: Vec<Project>,
    tracker: DragTracker,
    state: SaveState,
}

impl RankEditor {
    pub fn new(projects: &[Project], drag_activation_distance: f64) -> Self {
        Self {
            projects: initial_order(projects),
            tracker: DragTracker::new(drag_activation_distance),
            state: SaveState::Idle,
        }
    }

    pub fn projects(&self) -> &[Project] {
        &self.projects
    }

    pub fn state(&self) -> SaveState {
        self.state
    }

    /// Moves the row at `from` to `to`. A drop in place is a no-op returning `false`.
    pub fn reorder(&mut self, from: usize, to: usize) -> Result<bool, ClientError> {
        let moved = reorder(&mut self.projects, from, to)?;
        if moved {
            self.state = SaveState::Idle;
        }
        Ok(moved)
    }

    pub fn pointer_down(&mut self, index: usize, at: (f64, f64)) {
        self.tracker.press(index, at);
    }

    pub fn pointer_move(&mut self, at: (f64, f64)) {
        self.tracker.motion(at);
    }

    /// Finishes the gesture over the row at `target`.
    pub fn pointer_up(&mut self, target: Option<usize>) -> EditorAction {
        match self.tracker.release(target) {
            Gesture::Click(index) => self
                .projects
                .get(index)
                .map_or(EditorAction::None, |p| EditorAction::Open(p.id)),
            Gesture::Drop { from, to } => match self.reorder(from, to) {
                Ok(true) => EditorAction::Reordered,
                Ok(false) => EditorAction::None,
                Err(e) => {
                    warn!("Ignoring drop: {}", e);
                    EditorAction::None
                }
            },
            Gesture::None => EditorAction::None,
        }
    }

    /// Persists every project's rank with concurrent updates.
    ///
    /// Succeeds only if every update succeeds. Updates that were applied before a
    /// failure are not rolled back, and the local order is kept for a retry.
    pub async fn save(&mut self, store: &ProjectStore) -> Result<(), ClientError> {
        self.state = SaveState::Saving;
        assign_ranks(&mut self.projects);

        let service = store.service();
        let updates = self.projects.iter().map(|project| {
            let id = project.id;
            let patch = ProjectPatch::rank_only(project.rank.unwrap_or_default());
            async move { (id, service.update_project(id, &patch).await) }
        });

        let failed: Vec<i64> = join_all(updates)
            .await
            .into_iter()
            .filter_map(|(id, result)| match result {
                Ok(()) => None,
                Err(e) => {
                    error!("Failed to update rank for project {}: {}", id, e);
                    Some(id)
                }
            })
            .collect();

        store.refresh().await;

        if failed.is_empty() {
            info!("Saved ranks for {} projects", self.projects.len());
            self.state = SaveState::Done;
            Ok(())
        } else {
            self.state = SaveState::Failed;
            Err(ClientError::RankSave { failed })
        }
    }
}

impl AppState {
    /// Opens the editor over the cached projects.
    pub async fn rank_editor(&self) -> RankEditor {
        RankEditor::new(
            &self.projects.all().await,
            self.config.drag_activation_distance,
        )
    }

    /// Saves the editor and navigates home on success.
    pub async fn save_ranking(&self, editor: &mut RankEditor) -> Result<(), ClientError> {
        editor.save(&self.projects).await?;
        let session = self.current_user().await;
        self.navigator.navigate(View::Home, session.as_ref());
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use async_trait::async_trait;
    use portfolio_core::domain::ProjectDraft;
    use portfolio_core::ports::{PortError, PortResult, ProjectService};
    use std::collections::HashSet;
    use std::sync::{Arc, Mutex};

    #[derive(Default)]
    struct RecordingProjects {
        failing: HashSet<i64>,
        updates: Mutex<Vec<(i64, ProjectPatch)>>,
    }

    #[async_trait]
    impl ProjectService for RecordingProjects {
        async fn list_projects(&self) -> PortResult<Vec<Project>> {
            Ok(Vec::new())
        }

        async fn get_project(&self, id: i64) -> PortResult<Project> {
            Err(PortError::NotFound(id.to_string()))
        }

        async fn create_project(&self, _draft: &ProjectDraft) -> PortResult<()> {
            Ok(())
        }

        async fn update_project(&self, id: i64, patch: &ProjectPatch) -> PortResult<()> {
            self.updates.lock().unwrap().push((id, patch.clone()));
            if self.failing.contains(&id) {
                Err(PortError::Status {
                    status: 500,
                    body: "boom".to_string(),
                })
            } else {
                Ok(())
            }
        }

        async fn delete_project(&self, _id: i64) -> PortResult<()> {
            Ok(())
        }
    }

    fn project(id: i64, rank: Option<i64>) -> Project {
        Project {
            id,
            name: format!("Project {id}"),
            kind: "Tool".to_string(),
            description: None,
            year: None,
            languages: None,
            github: None,
            image: String::new(),
            images: Vec::new(),
            complexity: None,
            rank,
        }
    }

    fn ids(editor: &RankEditor) -> Vec<i64> {
        editor.projects().iter().map(|p| p.id).collect()
    }

    #[test]
    fn editor_starts_in_rank_order() {
        let editor = RankEditor::new(
            &[project(1, Some(2)), project(2, Some(1)), project(3, None)],
            5.0,
        );
        assert_eq!(ids(&editor), vec![2, 1, 3]);
        assert_eq!(editor.state(), SaveState::Idle);
    }

    #[test]
    fn click_opens_and_drag_reorders() {
        let mut editor = RankEditor::new(
            &[project(1, Some(1)), project(2, Some(2)), project(3, Some(3))],
            5.0,
        );

        editor.pointer_down(1, (0.0, 0.0));
        editor.pointer_move((1.0, 1.0));
        assert_eq!(editor.pointer_up(Some(2)), EditorAction::Open(2));
        assert_eq!(ids(&editor), vec![1, 2, 3]);

        editor.pointer_down(0, (0.0, 0.0));
        editor.pointer_move((0.0, 60.0));
        assert_eq!(editor.pointer_up(Some(2)), EditorAction::Reordered);
        assert_eq!(ids(&editor), vec![2, 3, 1]);
        let ranks: Vec<Option<i64>> = editor.projects().iter().map(|p| p.rank).collect();
        assert_eq!(ranks, vec![Some(1), Some(2), Some(3)]);
    }

    #[tokio::test]
    async fn save_sends_one_rank_update_per_project() {
        let service = Arc::new(RecordingProjects::default());
        let store = ProjectStore::new(service.clone(), false);
        let mut editor = RankEditor::new(
            &[project(1, Some(1)), project(2, Some(2)), project(3, None)],
            5.0,
        );
        editor.reorder(0, 2).unwrap();

        editor.save(&store).await.unwrap();
        assert_eq!(editor.state(), SaveState::Done);

        let mut updates = service.updates.lock().unwrap().clone();
        updates.sort_by_key(|(id, _)| *id);
        assert_eq!(
            updates,
            vec![
                (1, ProjectPatch::rank_only(3)),
                (2, ProjectPatch::rank_only(1)),
                (3, ProjectPatch::rank_only(2)),
            ]
        );
    }

    #[tokio::test]
    async fn partial_failure_fails_the_batch_and_keeps_the_order() {
        let service = Arc::new(RecordingProjects {
            failing: HashSet::from([2]),
            ..Default::default()
        });
        let store = ProjectStore::new(service.clone(), false);
        let mut editor = RankEditor::new(&[project(1, Some(1)), project(2, Some(2))], 5.0);
        editor.reorder(1, 0).unwrap();

        let err = editor.save(&store).await.unwrap_err();
        assert!(matches!(err, ClientError::RankSave { ref failed } if failed == &vec![2]));
        assert_eq!(editor.state(), SaveState::Failed);
        assert_eq!(ids(&editor), vec![2, 1]);
        // Every update was still attempted.
        assert_eq!(service.updates.lock().unwrap().len(), 2);
    }
}
