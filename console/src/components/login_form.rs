use dioxus::prelude::*;

use super::form_input::{FormInput, InputKind};
use super::session_provider::use_session;
use crate::services::client::Session;

#[component]
pub fn LoginForm(on_success: EventHandler<Session>) -> Element {
    let session = use_session();
    let mut email = use_signal(String::new);
    let mut password = use_signal(String::new);
    let mut error = use_signal(|| None::<String>);
    let mut submitting = use_signal(|| false);

    let can_submit =
        !submitting() && !email().trim().is_empty() && !password().trim().is_empty();

    rsx! {
        div {
            class: "login-form",

            h2 {
                class: "form-title",
                "Sign in"
            }

            FormInput {
                label: "Email".to_string(),
                value: email(),
                kind: InputKind::Email,
                placeholder: "dispatcher@example.com".to_string(),
                disabled: submitting(),
                on_change: move |value: String| email.set(value)
            }

            FormInput {
                label: "Password".to_string(),
                value: password(),
                kind: InputKind::Password,
                disabled: submitting(),
                on_change: move |value: String| password.set(value)
            }

            button {
                class: "login-button",
                disabled: !can_submit,
                onclick: move |_| {
                    let context = session.clone();
                    spawn(async move {
                        submitting.set(true);
                        error.set(None);
                        match context.manager.login(email().trim(), &password()).await {
                            Ok(logged_in) => {
                                password.set(String::new());
                                context.sync();
                                on_success.call(logged_in);
                            }
                            Err(e) => error.set(Some(e.message)),
                        }
                        submitting.set(false);
                    });
                },
                if submitting() { "Signing in..." } else { "Sign in" }
            }

            if let Some(message) = error() {
                div {
                    class: "auth-result error",
                    "{message}"
                }
            }
        }
    }
}
