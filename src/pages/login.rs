//! Login page: email + password exchanged through the session store.

#[cfg(test)]
#[path = "login_test.rs"]
mod login_test;

use std::sync::Arc;

use leptos::prelude::*;
use leptos_router::components::A;

use crate::app::SessionHandle;
use crate::net::api::AuthError;
use crate::util::route_gate::REGISTER_PATH;

/// Trim the email and require both fields. Passwords are passed through
/// untouched.
pub(crate) fn validate_login_input(email: &str, password: &str) -> Result<(String, String), &'static str> {
    let email = email.trim();
    if email.is_empty() || password.is_empty() {
        return Err("Enter both email and password.");
    }
    Ok((email.to_owned(), password.to_owned()))
}

/// User-facing text for a failed sign-in or registration.
pub(crate) fn auth_failure_message(action: &str, err: &AuthError) -> String {
    match err {
        AuthError::Rejected { detail: Some(detail), .. } if !detail.is_empty() => format!("{action} failed: {detail}"),
        AuthError::Rejected { status: 401, .. } => format!("{action} failed: invalid email or password"),
        other => format!("{action} failed: {other}"),
    }
}

#[component]
pub fn LoginPage() -> impl IntoView {
    let store = expect_context::<SessionHandle>();
    let email = RwSignal::new(String::new());
    let password = RwSignal::new(String::new());
    let info = RwSignal::new(String::new());
    let busy = RwSignal::new(false);

    let on_submit = move |ev: leptos::ev::SubmitEvent| {
        ev.prevent_default();
        if busy.get() {
            return;
        }
        let (email_value, password_value) = match validate_login_input(&email.get(), &password.get()) {
            Ok(values) => values,
            Err(msg) => {
                info.set(msg.to_owned());
                return;
            }
        };
        busy.set(true);
        info.set("Signing in...".to_owned());

        let store = Arc::clone(&store);
        leptos::task::spawn_local(async move {
            // On success the route gate moves us to the dashboard.
            match store.login(&email_value, &password_value).await {
                Ok(()) => info.set(String::new()),
                Err(e) => info.set(auth_failure_message("Sign-in", &e)),
            }
            password.set(String::new());
            busy.set(false);
        });
    };

    view! {
        <div class="login-page">
            <div class="login-card">
                <h1>"Mycelium"</h1>
                <p class="login-card__subtitle">"Sign in to your knowledge base"</p>
                <form class="login-form" on:submit=on_submit>
                    <input
                        class="login-input"
                        type="email"
                        placeholder="you@example.com"
                        prop:value=move || email.get()
                        on:input=move |ev| email.set(event_target_value(&ev))
                    />
                    <input
                        class="login-input"
                        type="password"
                        placeholder="Password"
                        prop:value=move || password.get()
                        on:input=move |ev| password.set(event_target_value(&ev))
                    />
                    <button class="login-button" type="submit" disabled=move || busy.get()>
                        "Sign In"
                    </button>
                </form>
                <Show when=move || !info.get().is_empty()>
                    <p class="login-message">{move || info.get()}</p>
                </Show>
                <div class="login-divider"></div>
                <p class="login-card__subtitle">
                    "No account? "
                    <A href=REGISTER_PATH>"Create one"</A>
                </p>
            </div>
        </div>
    }
}
