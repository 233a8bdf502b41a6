//! Navigation guard: maps `(path, session phase)` to a page or redirect.
//!
//! SYSTEM CONTEXT
//! ==============
//! Every route view in `app` defers to [`resolve_route`], so login redirects
//! and the loading screen behave identically on all paths. The gate holds no
//! state; it re-runs whenever the location or the session changes.
//!
//! Matching ignores ASCII case and a single trailing `/`.

#[cfg(test)]
#[path = "route_gate_test.rs"]
mod route_gate_test;

use crate::state::auth::SessionPhase;

pub const LOGIN_PATH: &str = "/login";
pub const REGISTER_PATH: &str = "/register";
pub const DASHBOARD_PATH: &str = "/dashboard";
/// Root of the protected subtree; it forwards to the dashboard.
pub const PROTECTED_ROOT: &str = "/";

#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum Page {
    Login,
    Register,
    Dashboard,
    Documents,
    Search,
    Learning,
    Settings,
}

impl Page {
    /// Pages behind the login wall, in navigation order.
    pub const PROTECTED: [Page; 5] = [Page::Dashboard, Page::Documents, Page::Search, Page::Learning, Page::Settings];

    #[must_use]
    pub fn path(self) -> &'static str {
        match self {
            Page::Login => LOGIN_PATH,
            Page::Register => REGISTER_PATH,
            Page::Dashboard => DASHBOARD_PATH,
            Page::Documents => "/documents",
            Page::Search => "/search",
            Page::Learning => "/learning",
            Page::Settings => "/settings",
        }
    }

    #[must_use]
    pub fn title(self) -> &'static str {
        match self {
            Page::Login => "Sign in",
            Page::Register => "Create account",
            Page::Dashboard => "Dashboard",
            Page::Documents => "Documents",
            Page::Search => "Search",
            Page::Learning => "Learning",
            Page::Settings => "Settings",
        }
    }

    #[must_use]
    pub fn is_protected(self) -> bool {
        !matches!(self, Page::Login | Page::Register)
    }

    fn from_path(path: &str) -> Option<Page> {
        [Page::Login, Page::Register]
            .into_iter()
            .chain(Page::PROTECTED)
            .find(|page| page.path().eq_ignore_ascii_case(path))
    }
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum RouteDecision {
    /// Session not settled yet; show the loading indicator.
    Loading,
    Render(Page),
    Redirect(&'static str),
}

/// Decide what to show for `path` given the session phase.
#[must_use]
pub fn resolve_route(path: &str, phase: SessionPhase) -> RouteDecision {
    let path = normalize_path(path);
    let page = Page::from_path(path);

    match phase {
        SessionPhase::Initializing => RouteDecision::Loading,
        SessionPhase::Unauthenticated => match page {
            Some(page) if !page.is_protected() => RouteDecision::Render(page),
            _ => RouteDecision::Redirect(LOGIN_PATH),
        },
        SessionPhase::Authenticated => match page {
            Some(page) if page.is_protected() => RouteDecision::Render(page),
            Some(_) => RouteDecision::Redirect(DASHBOARD_PATH),
            None if path == PROTECTED_ROOT => RouteDecision::Redirect(DASHBOARD_PATH),
            None => RouteDecision::Redirect(PROTECTED_ROOT),
        },
    }
}

fn normalize_path(path: &str) -> &str {
    let path = path.split(['?', '#']).next().unwrap_or_default();
    match path.strip_suffix('/') {
        Some(trimmed) if !trimmed.is_empty() => trimmed,
        _ if path.is_empty() => PROTECTED_ROOT,
        _ => path,
    }
}
