//! services/client/src/app/state.rs
//!
//! Defines the application's shared state: created once at startup, injected into
//! every consumer, refreshed on explicit mutation.

use crate::app::chat::ChatSession;
use crate::app::navigator::{resolve_screen, Navigator, Screen};
use crate::app::projects::{load_experiences, ProjectStore};
use crate::config::Config;
use portfolio_core::domain::{User, WorkExperience};
use portfolio_core::ports::{
    AuthService, ChatService, ContactService, ExperienceService, ProjectService, ThreadStore,
};
use std::sync::Arc;
use tokio::sync::RwLock;

//=========================================================================================
// AppState (Shared Across All Screens)
//=========================================================================================

/// The shared application state, created once at startup and passed to all screens.
pub struct AppState {
    pub config: Arc<Config>,
    pub auth: Arc<dyn AuthService>,
    pub experiences: Arc<dyn ExperienceService>,
    pub contact: Arc<dyn ContactService>,
    pub chat: Arc<dyn ChatService>,
    pub thread_store: Arc<dyn ThreadStore>,
    pub projects: ProjectStore,
    pub navigator: Navigator,
    /// The signed-in user, `None` when unauthenticated.
    pub session: RwLock<Option<User>>,
}

impl AppState {
    /// Builds the state from one backend that serves every port.
    pub fn from_backend<B>(
        config: Arc<Config>,
        backend: Arc<B>,
        thread_store: Arc<dyn ThreadStore>,
        initial_fragment: &str,
    ) -> Self
    where
        B: AuthService
            + ProjectService
            + ExperienceService
            + ContactService
            + ChatService
            + 'static,
    {
        let projects: Arc<dyn ProjectService> = backend.clone();
        Self {
            projects: ProjectStore::new(projects, config.mock_fallback),
            auth: backend.clone(),
            experiences: backend.clone(),
            contact: backend.clone(),
            chat: backend,
            thread_store,
            navigator: Navigator::new(initial_fragment),
            session: RwLock::new(None),
            config,
        }
    }

    pub async fn current_user(&self) -> Option<User> {
        self.session.read().await.clone()
    }

    pub async fn is_admin(&self) -> bool {
        self.session
            .read()
            .await
            .as_ref()
            .is_some_and(|user| user.is_admin)
    }

    /// Resolves the screen for the current route, re-checking authorization.
    pub async fn current_screen(&self) -> Screen {
        let session = self.current_user().await;
        let projects = self.projects.all().await;
        resolve_screen(self.navigator.view(), session.as_ref(), &projects)
    }

    pub async fn work_experiences(&self) -> Vec<WorkExperience> {
        load_experiences(self.experiences.as_ref(), self.config.mock_fallback).await
    }

    /// A chat session bound to this state's chat backend and thread store.
    pub fn chat_session(&self) -> ChatSession {
        ChatSession::new(
            self.chat.clone(),
            self.thread_store.clone(),
            self.config.chat_poll_interval,
        )
    }
}
