//! crates/portfolio_core/src/domain.rs
//!
//! Defines the pure, core data structures for the portfolio client.
//! These structs are independent of any wire or storage format.

use chrono::{DateTime, Utc};
use std::fmt;

/// A project listing shown on the portfolio.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Project {
    pub id: i64,
    pub name: String,
    /// Category of the project ("Web Application", ...).
    pub kind: String,
    pub description: Option<String>,
    pub year: Option<i32>,
    /// Comma-joined technology tags as stored by the backend.
    pub languages: Option<String>,
    pub github: Option<String>,
    pub image: String,
    pub images: Vec<String>,
    pub complexity: Option<String>,
    /// Lower ranks display first; `None` sorts after every ranked project.
    pub rank: Option<i64>,
}

impl Project {
    /// Splits the comma-joined `languages` field into trimmed tags.
    pub fn language_tags(&self) -> Vec<&str> {
        self.languages
            .as_deref()
            .map(|langs| {
                langs
                    .split(',')
                    .map(str::trim)
                    .filter(|tag| !tag.is_empty())
                    .collect()
            })
            .unwrap_or_default()
    }

    /// The image used for cards: the first gallery image, else the primary one.
    pub fn display_image(&self) -> Option<&str> {
        self.images
            .first()
            .map(String::as_str)
            .or_else(|| (!self.image.is_empty()).then_some(self.image.as_str()))
    }
}

/// The full field set sent when creating or editing a project.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ProjectDraft {
    pub name: String,
    pub kind: String,
    pub description: String,
    pub year: i32,
    pub languages: String,
    pub github: String,
    pub image: String,
    pub images: Vec<String>,
    pub rank: i64,
}

/// A partial update. Only the fields that are `Some` are sent.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ProjectPatch {
    pub name: Option<String>,
    pub kind: Option<String>,
    pub description: Option<String>,
    pub year: Option<i32>,
    pub languages: Option<String>,
    pub github: Option<String>,
    pub image: Option<String>,
    pub images: Option<Vec<String>>,
    pub rank: Option<i64>,
}

impl ProjectPatch {
    pub fn rank_only(rank: i64) -> Self {
        Self {
            rank: Some(rank),
            ..Default::default()
        }
    }
}

impl From<ProjectDraft> for ProjectPatch {
    fn from(draft: ProjectDraft) -> Self {
        Self {
            name: Some(draft.name),
            kind: Some(draft.kind),
            description: Some(draft.description),
            year: Some(draft.year),
            languages: Some(draft.languages),
            github: Some(draft.github),
            image: Some(draft.image),
            images: Some(draft.images),
            rank: Some(draft.rank),
        }
    }
}

/// A position in the work history section. Read-only for the client.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct WorkExperience {
    pub id: String,
    pub title: String,
    pub company: String,
    pub location: String,
    pub date_range: String,
    pub details: Vec<String>,
}

// Represents the signed-in user resolved from the session cookie
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct User {
    pub id: String,
    pub email: String,
    pub is_admin: bool,
}

// Only used for login/register requests
#[derive(Debug, Clone)]
pub struct Credentials {
    pub email: String,
    pub password: String,
}

/// A visitor's message from the contact section.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ContactForm {
    pub name: String,
    pub email: String,
    pub message: String,
}

impl ContactForm {
    pub fn is_empty(&self) -> bool {
        self.name.is_empty() && self.email.is_empty() && self.message.is_empty()
    }
}

/// Who authored a chat message.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Sender {
    Visitor,
    Assistant,
}

/// A single entry of the chat transcript.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ChatMessage {
    pub id: String,
    pub text: String,
    pub sender: Sender,
    pub timestamp: DateTime<Utc>,
}

/// Identifies one conversation with the assistant backend.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct ThreadId(pub String);

/// Identifies one asynchronous assistant run inside a thread.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct RunId(pub String);

impl fmt::Display for ThreadId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl fmt::Display for RunId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

/// Status of a run as reported by `/chat/list`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum RunStatus {
    InProgress,
    Completed,
    Other(String),
}

impl RunStatus {
    pub fn from_wire(status: &str) -> Self {
        match status {
            "completed" => Self::Completed,
            "in_progress" | "in-progress" | "queued" => Self::InProgress,
            other => Self::Other(other.to_string()),
        }
    }

    pub fn is_completed(&self) -> bool {
        matches!(self, Self::Completed)
    }
}

/// The result of listing a thread: messages newest first, as the backend returns them.
#[derive(Debug, Clone)]
pub struct ChatListing {
    pub messages: Vec<ChatMessage>,
    pub status: RunStatus,
}
