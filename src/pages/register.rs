//! Registration page: creates an account and signs straight into it.

#[cfg(test)]
#[path = "register_test.rs"]
mod register_test;

use std::sync::Arc;

use leptos::prelude::*;
use leptos_router::components::A;

use super::login::auth_failure_message;
use crate::app::SessionHandle;
use crate::net::api::AuthError;
use crate::util::route_gate::LOGIN_PATH;

/// The backend rejects shorter passwords; checking here saves a round-trip.
pub(crate) const MIN_PASSWORD_LEN: usize = 8;

pub(crate) struct RegisterInput {
    pub email: String,
    pub username: String,
    pub password: String,
}

/// Text shown after a failed registration. A 2xx without a token means the
/// account exists but the backend did not start a session.
pub(crate) fn register_failure_message(err: &AuthError) -> String {
    match err {
        AuthError::MissingToken => "Account created. Please sign in.".to_owned(),
        other => auth_failure_message("Registration", other),
    }
}

pub(crate) fn validate_register_input(email: &str, username: &str, password: &str) -> Result<RegisterInput, &'static str> {
    let email = email.trim();
    let username = username.trim();
    if email.is_empty() || username.is_empty() || password.is_empty() {
        return Err("Enter email, username, and password.");
    }
    if password.chars().count() < MIN_PASSWORD_LEN {
        return Err("Password must be at least 8 characters long.");
    }
    Ok(RegisterInput { email: email.to_owned(), username: username.to_owned(), password: password.to_owned() })
}

#[component]
pub fn RegisterPage() -> impl IntoView {
    let store = expect_context::<SessionHandle>();
    let email = RwSignal::new(String::new());
    let username = RwSignal::new(String::new());
    let password = RwSignal::new(String::new());
    let info = RwSignal::new(String::new());
    let busy = RwSignal::new(false);

    let on_submit = move |ev: leptos::ev::SubmitEvent| {
        ev.prevent_default();
        if busy.get() {
            return;
        }
        let input = match validate_register_input(&email.get(), &username.get(), &password.get()) {
            Ok(input) => input,
            Err(msg) => {
                info.set(msg.to_owned());
                return;
            }
        };
        busy.set(true);
        info.set("Creating account...".to_owned());

        let store = Arc::clone(&store);
        leptos::task::spawn_local(async move {
            match store.register(&input.email, &input.username, &input.password).await {
                Ok(()) => info.set(String::new()),
                Err(e) => info.set(register_failure_message(&e)),
            }
            busy.set(false);
        });
    };

    view! {
        <div class="login-page">
            <div class="login-card">
                <h1>"Mycelium"</h1>
                <p class="login-card__subtitle">"Create your account"</p>
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
                        type="text"
                        placeholder="Username"
                        prop:value=move || username.get()
                        on:input=move |ev| username.set(event_target_value(&ev))
                    />
                    <input
                        class="login-input"
                        type="password"
                        placeholder="Password (8+ characters)"
                        prop:value=move || password.get()
                        on:input=move |ev| password.set(event_target_value(&ev))
                    />
                    <button class="login-button" type="submit" disabled=move || busy.get()>
                        "Create Account"
                    </button>
                </form>
                <Show when=move || !info.get().is_empty()>
                    <p class="login-message">{move || info.get()}</p>
                </Show>
                <div class="login-divider"></div>
                <p class="login-card__subtitle">
                    "Already registered? "
                    <A href=LOGIN_PATH>"Sign in"</A>
                </p>
            </div>
        </div>
    }
}
