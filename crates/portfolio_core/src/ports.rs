//! crates/portfolio_core/src/ports.rs
//!
//! Defines the service contracts (traits) the client core depends on.
//! These traits form the boundary of the hexagonal architecture, keeping the core
//! independent of the HTTP backend and of where client-side state is persisted.

use async_trait::async_trait;
use crate::domain::{
    ChatListing, ContactForm, Credentials, Project, ProjectDraft, ProjectPatch, RunId, ThreadId, User,
    WorkExperience,
};

//=========================================================================================
// Generic Port Error and Result Types
//=========================================================================================

/// A generic error type for all port operations.
/// This abstracts away the specific errors from external services (HTTP, filesystem).
#[derive(Debug, thiserror::Error)]
pub enum PortError {
    #[error("Item not found: {0}")]
    NotFound(String),
    #[error("Unauthorized")]
    Unauthorized,
    #[error("Request failed with status {status}: {body}")]
    Status { status: u16, body: String },
    #[error("Transport failure: {0}")]
    Transport(String),
    #[error("Malformed response: {0}")]
    Malformed(String),
    #[error("An unexpected error occurred: {0}")]
    Unexpected(String),
}

/// A convenience type alias for `Result<T, PortError>`.
pub type PortResult<T> = Result<T, PortError>;

//=========================================================================================
// Service Ports (Traits)
//=========================================================================================

#[async_trait]
pub trait AuthService: Send + Sync {
    /// Resolves the session cookie to a user. `Ok(None)` when unauthenticated.
    async fn current_user(&self) -> PortResult<Option<User>>;

    async fn login(&self, credentials: &Credentials) -> PortResult<()>;

    async fn register(&self, credentials: &Credentials) -> PortResult<()>;

    async fn logout(&self) -> PortResult<()>;
}

#[async_trait]
pub trait ProjectService: Send + Sync {
    async fn list_projects(&self) -> PortResult<Vec<Project>>;

    async fn get_project(&self, id: i64) -> PortResult<Project>;

    async fn create_project(&self, draft: &ProjectDraft) -> PortResult<()>;

    /// Sends a partial update. The rank travels in the backend's `complexity` slot.
    async fn update_project(&self, id: i64, patch: &ProjectPatch) -> PortResult<()>;

    async fn delete_project(&self, id: i64) -> PortResult<()>;
}

#[async_trait]
pub trait ExperienceService: Send + Sync {
    async fn list_work_experiences(&self) -> PortResult<Vec<WorkExperience>>;
}

#[async_trait]
pub trait ContactService: Send + Sync {
    async fn send_contact(&self, form: &ContactForm) -> PortResult<()>;
}

#[async_trait]
pub trait ChatService: Send + Sync {
    /// Creates a new conversation thread.
    async fn create_thread(&self) -> PortResult<ThreadId>;

    /// Posts a visitor message and returns the run that will answer it.
    async fn send_message(&self, thread: &ThreadId, text: &str) -> PortResult<RunId>;

    /// Lists a thread's messages (newest first) and the status of `run`, if any.
    async fn list_messages(&self, thread: &ThreadId, run: Option<&RunId>)
        -> PortResult<ChatListing>;
}

/// Durable client-side storage for the chat thread identifier.
#[async_trait]
pub trait ThreadStore: Send + Sync {
    async fn load_thread(&self) -> PortResult<Option<ThreadId>>;

    async fn save_thread(&self, thread: &ThreadId) -> PortResult<()>;
}
