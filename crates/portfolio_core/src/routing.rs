//! crates/portfolio_core/src/routing.rs
//!
//! Maps URL fragments to application views and back.
//!
//! Parsing is pure so the same function serves the initial load and every
//! later fragment change.

/// The top-level screens the application can show.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum View {
    Home,
    Project(i64),
    Login,
    AddProject,
    EditProject(i64),
    RankProjects,
}

impl View {
    /// Derives a view from a fragment such as `project/3` or `#rank-projects`.
    ///
    /// An id segment that does not parse as an integer degrades to `Home`.
    pub fn parse(fragment: &str) -> Self {
        let fragment = fragment.strip_prefix('#').unwrap_or(fragment);
        let mut segments = fragment.split('/');
        let head = segments.next().unwrap_or_default();
        let id = segments.next().and_then(|raw| raw.trim().parse::<i64>().ok());

        match head {
            "project" => id.map_or(Self::Home, Self::Project),
            "edit-project" => id.map_or(Self::Home, Self::EditProject),
            "add-project" => Self::AddProject,
            "rank-projects" => Self::RankProjects,
            "login" => Self::Login,
            _ => Self::Home,
        }
    }

    /// The canonical fragment for this view, without the leading `#`.
    pub fn fragment(&self) -> String {
        match self {
            Self::Home => String::new(),
            Self::Project(id) => format!("project/{id}"),
            Self::Login => "login".to_string(),
            Self::AddProject => "add-project".to_string(),
            Self::EditProject(id) => format!("edit-project/{id}"),
            Self::RankProjects => "rank-projects".to_string(),
        }
    }

    /// Views that only an admin session may navigate to or render.
    pub fn requires_admin(&self) -> bool {
        matches!(
            self,
            Self::AddProject | Self::EditProject(_) | Self::RankProjects
        )
    }

    /// The project this view is about, if any.
    pub fn project_id(&self) -> Option<i64> {
        match self {
            Self::Project(id) | Self::EditProject(id) => Some(*id),
            _ => None,
        }
    }
}
