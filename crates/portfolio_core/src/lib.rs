pub mod chat_text;
pub mod domain;
pub mod ports;
pub mod ranking;
pub mod routing;

pub use domain::{
    ChatListing, ChatMessage, ContactForm, Credentials, Project, ProjectDraft, ProjectPatch,
    RunId, RunStatus, Sender, ThreadId, User, WorkExperience,
};
pub use ports::{
    AuthService, ChatService, ContactService, ExperienceService, PortError, PortResult,
    ProjectService, ThreadStore,
};
pub use ranking::{DragTracker, Gesture, RankingError};
pub use routing::View;
