//! services/client/src/app/projects.rs
//!
//! Cached accessors for project listings and work history.

use crate::adapters::fallback::{sample_experiences, sample_projects};
use portfolio_core::domain::{Project, ProjectDraft, ProjectPatch, WorkExperience};
use portfolio_core::ports::{ExperienceService, ProjectService};
use portfolio_core::ranking::display_order;
use std::sync::Arc;
use tokio::sync::RwLock;
use tracing::{error, info, warn};

/// Local cache of the project collection, refreshed after every mutation.
pub struct ProjectStore {
    service: Arc<dyn ProjectService>,
    cache: RwLock<Vec<Project>>,
    mock_fallback: bool,
}

impl ProjectStore {
    pub fn new(service: Arc<dyn ProjectService>, mock_fallback: bool) -> Self {
        Self {
            service,
            cache: RwLock::new(Vec::new()),
            mock_fallback,
        }
    }

    pub fn service(&self) -> &Arc<dyn ProjectService> {
        &self.service
    }

    /// Reloads the cache from the backend. Returns `false` when the backend failed,
    /// in which case the cache holds sample data (if enabled) or is left as it was.
    pub async fn refresh(&self) -> bool {
        match self.service.list_projects().await {
            Ok(projects) => {
                info!("Loaded {} projects", projects.len());
                *self.cache.write().await = projects;
                true
            }
            Err(e) => {
                error!("Failed to fetch projects: {}", e);
                if self.mock_fallback {
                    warn!("Falling back to sample projects");
                    *self.cache.write().await = sample_projects();
                }
                false
            }
        }
    }

    /// Every cached project, in backend order.
    pub async fn all(&self) -> Vec<Project> {
        self.cache.read().await.clone()
    }

    /// Cached projects in display order (ranked first, ascending).
    pub async fn ordered(&self) -> Vec<Project> {
        display_order(&self.cache.read().await)
    }

    pub async fn by_id(&self, id: i64) -> Option<Project> {
        self.cache.read().await.iter().find(|p| p.id == id).cloned()
    }

    /// Fetches one project from the backend, falling back to the cache.
    pub async fn fetch(&self, id: i64) -> Option<Project> {
        match self.service.get_project(id).await {
            Ok(project) => Some(project),
            Err(e) => {
                error!("Failed to fetch project {}: {}", id, e);
                self.by_id(id).await
            }
        }
    }

    pub async fn create(&self, draft: &ProjectDraft) -> bool {
        match self.service.create_project(draft).await {
            Ok(()) => {
                self.refresh().await;
                true
            }
            Err(e) => {
                error!("Failed to create project: {}", e);
                false
            }
        }
    }

    pub async fn update(&self, id: i64, patch: &ProjectPatch) -> bool {
        match self.service.update_project(id, patch).await {
            Ok(()) => {
                self.refresh().await;
                true
            }
            Err(e) => {
                error!("Failed to update project {}: {}", id, e);
                false
            }
        }
    }

    pub async fn delete(&self, id: i64) -> bool {
        match self.service.delete_project(id).await {
            Ok(()) => {
                self.refresh().await;
                true
            }
            Err(e) => {
                error!("Failed to delete project {}: {}", id, e);
                false
            }
        }
    }
}

/// Loads the work history, degrading to sample data when allowed.
pub async fn load_experiences(
    service: &dyn ExperienceService,
    mock_fallback: bool,
) -> Vec<WorkExperience> {
    match service.list_work_experiences().await {
        Ok(experiences) => experiences,
        Err(e) => {
            error!("Failed to fetch work experiences: {}", e);
            if mock_fallback {
                sample_experiences()
            } else {
                Vec::new()
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use async_trait::async_trait;
    use portfolio_core::ports::{PortError, PortResult};
    use std::sync::atomic::{AtomicBool, AtomicUsize, Ordering};

    struct FakeProjects {
        projects: Vec<Project>,
        offline: AtomicBool,
        lists: AtomicUsize,
    }

    impl FakeProjects {
        fn new(projects: Vec<Project>) -> Self {
            Self {
                projects,
                offline: AtomicBool::new(false),
                lists: AtomicUsize::new(0),
            }
        }

        fn check(&self) -> PortResult<()> {
            if self.offline.load(Ordering::SeqCst) {
                Err(PortError::Transport("connection refused".to_string()))
            } else {
                Ok(())
            }
        }
    }

    #[async_trait]
    impl ProjectService for FakeProjects {
        async fn list_projects(&self) -> PortResult<Vec<Project>> {
            self.lists.fetch_add(1, Ordering::SeqCst);
            self.check()?;
            Ok(self.projects.clone())
        }

        async fn get_project(&self, id: i64) -> PortResult<Project> {
            self.check()?;
            self.projects
                .iter()
                .find(|p| p.id == id)
                .cloned()
                .ok_or_else(|| PortError::NotFound(id.to_string()))
        }

        async fn create_project(&self, _draft: &ProjectDraft) -> PortResult<()> {
            self.check()
        }

        async fn update_project(&self, _id: i64, _patch: &ProjectPatch) -> PortResult<()> {
            self.check()
        }

        async fn delete_project(&self, _id: i64) -> PortResult<()> {
            self.check()
        }
    }

    fn project(id: i64, rank: Option<i64>) -> Project {
        Project {
            id,
            name: format!("Project {id}"),
            kind: "Library".to_string(),
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

    #[tokio::test]
    async fn refresh_fills_the_cache_in_display_order() {
        let fake = Arc::new(FakeProjects::new(vec![
            project(1, Some(2)),
            project(2, Some(1)),
            project(3, None),
        ]));
        let store = ProjectStore::new(fake, true);
        assert!(store.refresh().await);
        let ids: Vec<i64> = store.ordered().await.iter().map(|p| p.id).collect();
        assert_eq!(ids, vec![2, 1, 3]);
        assert_eq!(store.by_id(3).await.map(|p| p.id), Some(3));
    }

    #[tokio::test]
    async fn offline_backend_degrades_to_samples_when_enabled() {
        let fake = Arc::new(FakeProjects::new(vec![project(7, None)]));
        fake.offline.store(true, Ordering::SeqCst);

        let with_fallback = ProjectStore::new(fake.clone(), true);
        assert!(!with_fallback.refresh().await);
        assert_eq!(with_fallback.all().await, sample_projects());

        let without_fallback = ProjectStore::new(fake, false);
        assert!(!without_fallback.refresh().await);
        assert!(without_fallback.all().await.is_empty());
    }

    #[tokio::test]
    async fn fetch_falls_back_to_the_cache() {
        let fake = Arc::new(FakeProjects::new(vec![project(7, None)]));
        let store = ProjectStore::new(fake.clone(), false);
        store.refresh().await;

        fake.offline.store(true, Ordering::SeqCst);
        assert_eq!(store.fetch(7).await.map(|p| p.id), Some(7));
        assert_eq!(store.fetch(8).await, None);
    }

    #[tokio::test]
    async fn mutations_refresh_only_on_success() {
        let fake = Arc::new(FakeProjects::new(vec![project(1, None)]));
        let store = ProjectStore::new(fake.clone(), false);

        assert!(store.update(1, &ProjectPatch::rank_only(1)).await);
        assert_eq!(fake.lists.load(Ordering::SeqCst), 1);

        fake.offline.store(true, Ordering::SeqCst);
        assert!(!store.delete(1).await);
        assert_eq!(fake.lists.load(Ordering::SeqCst), 1);
    }
}
