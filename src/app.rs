//! Root application component with routing and context providers.

use std::sync::Arc;

use leptos::prelude::*;
use leptos_meta::{MetaTags, Stylesheet, Title, provide_meta_context};
use leptos_router::{
    NavigateOptions, StaticSegment,
    components::{Redirect, Route, Router, Routes},
    hooks::use_location,
};

use crate::components::{layout::Layout, loading_spinner::{LoadingSpinner, SpinnerSize}};
use crate::config::ClientConfig;
use crate::net::api::HttpAuthTransport;
use crate::pages::{
    dashboard::DashboardPage,
    login::LoginPage,
    register::RegisterPage,
    sections::{DocumentsPage, LearningPage, SearchPage, SettingsPage},
};
use crate::state::auth::AuthState;
use crate::state::session::{AppSessionStore, SessionStore};
use crate::util::route_gate::{Page, RouteDecision, resolve_route};
use crate::util::storage::BrowserStorage;

/// Shared handle to the session store, provided through context.
pub type SessionHandle = Arc<AppSessionStore>;

/// HTML shell rendered on the server for SSR + hydration.
pub fn shell(options: LeptosOptions) -> impl IntoView {
    view! {
        <!DOCTYPE html>
        <html lang="en">
            <head>
                <meta charset="utf-8"/>
                <meta name="viewport" content="width=device-width, initial-scale=1"/>
                <AutoReload options=options.clone()/>
                <HydrationScripts options/>
                <MetaTags/>
            </head>
            <body>
                <App/>
            </body>
        </html>
    }
}

/// Root application component.
///
/// Builds the session store from durable storage, mirrors it into an
/// `RwSignal<AuthState>`, and routes every path through [`RouteGate`].
#[component]
pub fn App() -> impl IntoView {
    provide_meta_context();

    let config = ClientConfig::from_build_env();
    let store: SessionHandle = Arc::new(SessionStore::restore(
        &config,
        HttpAuthTransport::new(&config),
        BrowserStorage,
    ));

    let auth = RwSignal::new(store.snapshot());
    store.subscribe(move |state| auth.set(state.clone()));

    provide_context(auth);
    provide_context(Arc::clone(&store));

    // Settle the startup phase once the app is live in the browser.
    let startup = Arc::clone(&store);
    Effect::new(move || startup.check_auth());

    view! {
        <Stylesheet id="leptos" href="/pkg/mycelium.css"/>
        <Title text="Mycelium"/>

        <Router>
            <Routes fallback=|| view! { <RouteGate/> }>
                <Route path=StaticSegment("") view=RouteGate/>
                <Route path=StaticSegment("login") view=RouteGate/>
                <Route path=StaticSegment("register") view=RouteGate/>
                <Route path=StaticSegment("dashboard") view=RouteGate/>
                <Route path=StaticSegment("documents") view=RouteGate/>
                <Route path=StaticSegment("search") view=RouteGate/>
                <Route path=StaticSegment("learning") view=RouteGate/>
                <Route path=StaticSegment("settings") view=RouteGate/>
            </Routes>
        </Router>
    }
}

/// Render whatever [`resolve_route`] decides for the current location.
#[component]
fn RouteGate() -> impl IntoView {
    let auth = expect_context::<RwSignal<AuthState>>();
    let location = use_location();

    move || {
        let path = location.pathname.get();
        match resolve_route(&path, auth.with(AuthState::phase)) {
            RouteDecision::Loading => view! {
                <div class="app-loading">
                    <LoadingSpinner size=SpinnerSize::Large/>
                </div>
            }
            .into_any(),
            RouteDecision::Redirect(to) => {
                log::debug!("route gate: {path} -> {to}");
                let options = NavigateOptions { replace: true, ..NavigateOptions::default() };
                view! { <Redirect path=to options/> }.into_any()
            }
            RouteDecision::Render(page) => render_page(page),
        }
    }
}

fn render_page(page: Page) -> AnyView {
    match page {
        Page::Login => view! { <LoginPage/> }.into_any(),
        Page::Register => view! { <RegisterPage/> }.into_any(),
        Page::Dashboard => view! { <Layout current=page><DashboardPage/></Layout> }.into_any(),
        Page::Documents => view! { <Layout current=page><DocumentsPage/></Layout> }.into_any(),
        Page::Search => view! { <Layout current=page><SearchPage/></Layout> }.into_any(),
        Page::Learning => view! { <Layout current=page><LearningPage/></Layout> }.into_any(),
        Page::Settings => view! { <Layout current=page><SettingsPage/></Layout> }.into_any(),
    }
}
