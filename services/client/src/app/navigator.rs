//! services/client/src/app/navigator.rs
//!
//! Owns the current URL fragment and the view derived from it, and decides
//! which screen a view renders to for a given session.

use portfolio_core::domain::{Project, User};
use portfolio_core::routing::View;
use tokio::sync::watch;
use tracing::{debug, info};

/// The fragment currently shown in the address bar and the view it maps to.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Route {
    pub fragment: String,
    pub view: View,
}

impl Route {
    fn from_fragment(fragment: &str) -> Self {
        let fragment = fragment.strip_prefix('#').unwrap_or(fragment);
        Self {
            fragment: fragment.to_string(),
            view: View::parse(fragment),
        }
    }
}

/// Fragment-driven view state. Subscribers are told about every view change.
#[derive(Debug)]
pub struct Navigator {
    route: watch::Sender<Route>,
}

impl Navigator {
    pub fn new(initial_fragment: &str) -> Self {
        let (route, _) = watch::channel(Route::from_fragment(initial_fragment));
        Self { route }
    }

    pub fn current(&self) -> Route {
        self.route.borrow().clone()
    }

    pub fn view(&self) -> View {
        self.route.borrow().view
    }

    pub fn subscribe(&self) -> watch::Receiver<Route> {
        self.route.subscribe()
    }

    /// Handles a fragment change that did not come from `navigate`
    /// (typed into the address bar, back/forward).
    pub fn on_fragment_changed(&self, fragment: &str) -> View {
        let next = Route::from_fragment(fragment);
        let view = next.view;
        self.route.send_if_modified(|route| {
            if *route == next {
                return false;
            }
            *route = next;
            true
        });
        debug!("Fragment '{}' resolved to {:?}", fragment, view);
        view
    }

    /// Navigates to `target`. Admin-only views are refused unless `session` is an admin,
    /// in which case the fragment is left untouched and `false` is returned.
    pub fn navigate(&self, target: View, session: Option<&User>) -> bool {
        if target.requires_admin() && !is_admin(session) {
            info!("Ignoring navigation to {:?}: admin session required", target);
            return false;
        }
        self.on_fragment_changed(&target.fragment());
        true
    }
}

/// What the application actually shows for a view.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Screen {
    Home,
    Login,
    ProjectDetail(Project),
    /// Add form when `None`, edit form for the given project otherwise.
    ProjectForm(Option<Project>),
    RankEditor,
    AccessDenied,
    ProjectNotFound,
}

/// Render-time decision. Re-checks the admin flag because the fragment itself
/// can be typed in directly.
pub fn resolve_screen(view: View, session: Option<&User>, projects: &[Project]) -> Screen {
    if view.requires_admin() && !is_admin(session) {
        return Screen::AccessDenied;
    }
    let find = |id: i64| projects.iter().find(|p| p.id == id).cloned();

    match view {
        View::Home => Screen::Home,
        View::Login => Screen::Login,
        View::Project(id) => find(id).map_or(Screen::ProjectNotFound, Screen::ProjectDetail),
        View::AddProject => Screen::ProjectForm(None),
        View::EditProject(id) => {
            find(id).map_or(Screen::ProjectNotFound, |p| Screen::ProjectForm(Some(p)))
        }
        View::RankProjects => Screen::RankEditor,
    }
}

fn is_admin(session: Option<&User>) -> bool {
    session.is_some_and(|user| user.is_admin)
}
