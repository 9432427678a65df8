pub mod auth;
pub mod chat;
pub mod contact;
pub mod navigator;
pub mod project_form;
pub mod projects;
pub mod rank_editor;
pub mod state;

// Re-export the pieces a front end drives directly.
pub use chat::{ChatSession, ChatSnapshot, SendOutcome};
pub use navigator::{Navigator, Screen};
pub use project_form::ProjectForm;
pub use projects::ProjectStore;
pub use rank_editor::{EditorAction, RankEditor, SaveState};
pub use state::AppState;
