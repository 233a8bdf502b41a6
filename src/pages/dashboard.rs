//! Dashboard: the authenticated landing route.

use leptos::prelude::*;
use leptos_router::components::A;

use crate::state::auth::AuthState;
use crate::util::route_gate::Page;

#[component]
pub fn DashboardPage() -> impl IntoView {
    let auth = expect_context::<RwSignal<AuthState>>();
    let greeting = move || {
        auth.with(|state| match &state.user {
            Some(user) => format!("Welcome back, {}", user.username),
            None => "Welcome back".to_owned(),
        })
    };

    view! {
        <section class="dashboard">
            <h1>{greeting}</h1>
            <ul class="dashboard__shortcuts">
                {Page::PROTECTED
                    .into_iter()
                    .filter(|page| *page != Page::Dashboard)
                    .map(|page| view! { <li><A href=page.path()>{page.title()}</A></li> })
                    .collect_view()}
            </ul>
        </section>
    }
}
