use dioxus::prelude::*;

use super::form_input::{FormInput, InputKind};
use super::session_provider::use_session;
use crate::services::client::Session;

/// Phone sign-in: request a one-time code, then verify it
#[component]
pub fn OtpLoginForm(on_success: EventHandler<Session>) -> Element {
    let session = use_session();
    let mut phone = use_signal(String::new);
    let mut code = use_signal(String::new);
    let mut challenge = use_signal(|| None::<String>);
    let mut error = use_signal(|| None::<String>);
    let mut submitting = use_signal(|| false);

    let code_requested = challenge().is_some();
    let can_request = !submitting() && !phone().trim().is_empty();
    let can_verify = !submitting() && !code().trim().is_empty();

    let request_context = session.clone();
    let verify_context = session.clone();

    rsx! {
        div {
            class: "login-form otp-form",

            h2 {
                class: "form-title",
                "Sign in with phone"
            }

            FormInput {
                label: "Phone".to_string(),
                value: phone(),
                kind: InputKind::Tel,
                placeholder: "+15550100".to_string(),
                disabled: submitting() || code_requested,
                on_change: move |value: String| phone.set(value)
            }

            if !code_requested {
                button {
                    class: "login-button",
                    disabled: !can_request,
                    onclick: move |_| {
                        let context = request_context.clone();
                        spawn(async move {
                            submitting.set(true);
                            error.set(None);
                            match context.manager.request_otp(phone().trim()).await {
                                Ok(sent) => challenge.set(Some(sent.message)),
                                Err(e) => error.set(Some(e.message)),
                            }
                            submitting.set(false);
                        });
                    },
                    if submitting() { "Sending code..." } else { "Send code" }
                }
            } else {
                if let Some(message) = challenge() {
                    div {
                        class: "auth-result info",
                        "{message}"
                    }
                }

                FormInput {
                    label: "Code".to_string(),
                    value: code(),
                    kind: InputKind::Text,
                    placeholder: "123456".to_string(),
                    disabled: submitting(),
                    on_change: move |value: String| code.set(value)
                }

                button {
                    class: "login-button",
                    disabled: !can_verify,
                    onclick: move |_| {
                        let context = verify_context.clone();
                        spawn(async move {
                            submitting.set(true);
                            error.set(None);
                            match context
                                .manager
                                .login_with_otp(phone().trim(), code().trim())
                                .await
                            {
                                Ok(logged_in) => {
                                    code.set(String::new());
                                    context.sync();
                                    on_success.call(logged_in);
                                }
                                Err(e) => error.set(Some(e.message)),
                            }
                            submitting.set(false);
                        });
                    },
                    if submitting() { "Verifying..." } else { "Verify" }
                }

                button {
                    class: "link-button",
                    disabled: submitting(),
                    onclick: move |_| {
                        challenge.set(None);
                        code.set(String::new());
                    },
                    "Use a different number"
                }
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
