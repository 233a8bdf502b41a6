//! Shared chrome around every protected page: navigation and sign-out.

#[cfg(test)]
#[path = "layout_test.rs"]
mod layout_test;

use leptos::prelude::*;
use leptos_router::components::A;

use crate::app::SessionHandle;
use crate::state::auth::AuthState;
use crate::util::route_gate::Page;

/// Name shown in the header for the signed-in account.
pub(crate) fn account_label(state: &AuthState) -> String {
    state
        .user
        .as_ref()
        .map_or_else(|| "Signed in".to_owned(), |u| u.username.clone())
}

fn nav_class(page: Page, current: Page) -> &'static str {
    if page == current { "layout-nav__link layout-nav__link--active" } else { "layout-nav__link" }
}

#[component]
pub fn Layout(current: Page, children: Children) -> impl IntoView {
    let auth = expect_context::<RwSignal<AuthState>>();
    let store = expect_context::<SessionHandle>();

    // The route gate redirects to /login once the session clears.
    let on_logout = move |_: leptos::ev::MouseEvent| store.logout();

    view! {
        <div class="layout">
            <header class="layout-header">
                <span class="layout-header__brand">"Mycelium"</span>
                <span class="layout-header__account">{move || auth.with(account_label)}</span>
                <button class="layout-header__logout" on:click=on_logout>
                    "Sign out"
                </button>
            </header>
            <nav class="layout-nav">
                {Page::PROTECTED
                    .into_iter()
                    .map(|page| {
                        view! {
                            <A href=page.path() attr:class=nav_class(page, current)>
                                {page.title()}
                            </A>
                        }
                    })
                    .collect_view()}
            </nav>
            <main class="layout-main">{children()}</main>
        </div>
    }
}
