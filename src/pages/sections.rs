//! Protected app sections rendered inside the shared layout.
//!
//! Document management, search, and learning live behind their own APIs;
//! these routes only host them.

#[cfg(test)]
#[path = "sections_test.rs"]
mod sections_test;

use leptos::prelude::*;

use crate::state::auth::AuthState;
use crate::util::route_gate::Page;

#[component]
fn Section(page: Page, blurb: &'static str) -> impl IntoView {
    view! {
        <section class="section">
            <h1>{page.title()}</h1>
            <p class="section__blurb">{blurb}</p>
        </section>
    }
}

#[component]
pub fn DocumentsPage() -> impl IntoView {
    view! { <Section page=Page::Documents blurb="Upload and organize PDFs, text, and markdown."/> }
}

#[component]
pub fn SearchPage() -> impl IntoView {
    view! { <Section page=Page::Search blurb="Ask questions across everything you have saved."/> }
}

#[component]
pub fn LearningPage() -> impl IntoView {
    view! { <Section page=Page::Learning blurb="Review flashcards generated from your documents."/> }
}

/// Account facts for the settings page, as `(label, value)` rows.
pub(crate) fn account_rows(state: &AuthState) -> Vec<(&'static str, String)> {
    let Some(user) = &state.user else {
        return Vec::new();
    };
    vec![
        ("Email", user.email.clone()),
        ("Username", user.username.clone()),
        ("Verified", if user.is_verified { "Yes" } else { "No" }.to_owned()),
        ("Member since", user.created_at.clone()),
    ]
}

#[component]
pub fn SettingsPage() -> impl IntoView {
    let auth = expect_context::<RwSignal<AuthState>>();

    view! {
        <section class="section">
            <h1>{Page::Settings.title()}</h1>
            <dl class="settings__account">
                {move || {
                    auth.with(account_rows)
                        .into_iter()
                        .map(|(label, value)| view! { <dt>{label}</dt><dd>{value}</dd> })
                        .collect_view()
                }}
            </dl>
        </section>
    }
}
