//! Neutral loading indicator shown while the session settles.

#[cfg(test)]
#[path = "loading_spinner_test.rs"]
mod loading_spinner_test;

use leptos::prelude::*;

#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub enum SpinnerSize {
    Small,
    #[default]
    Medium,
    Large,
}

impl SpinnerSize {
    #[must_use]
    pub fn class(self) -> &'static str {
        match self {
            SpinnerSize::Small => "spinner spinner--small",
            SpinnerSize::Medium => "spinner spinner--medium",
            SpinnerSize::Large => "spinner spinner--large",
        }
    }
}

#[component]
pub fn LoadingSpinner(#[prop(optional)] size: SpinnerSize) -> impl IntoView {
    view! {
        <div class=size.class() role="status" aria-label="Loading">
            <span class="spinner__ring"></span>
        </div>
    }
}
