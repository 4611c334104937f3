use dioxus::prelude::*;
use dispatch_console::{
    use_session, Capability, LoginForm, OtpLoginForm, PermissionGate, Session, SessionProvider,
    SessionState,
};

fn main() {
    dioxus::launch(App);
}

#[component]
fn App() -> Element {
    rsx! {
        SessionProvider {
            Router::<Route> {}
        }
    }
}

#[derive(Clone, Routable, Debug, PartialEq)]
enum Route {
    #[route("/")]
    Dashboard {},
    #[route("/login")]
    Login {},
}

#[component]
fn Dashboard() -> Element {
    let session = use_session();
    let state = session.state.read().clone();

    match state {
        SessionState::Restoring => rsx! {
            div { class: "loading", "Restoring session..." }
        },
        SessionState::Unauthenticated => rsx! {
            div {
                class: "signed-out",
                p { "You are not signed in." }
                Link { to: Route::Login {}, "Sign in" }
            }
        },
        SessionState::Authenticated(user) => {
            let context = session.clone();
            rsx! {
                div {
                    class: "dashboard",
                    header {
                        span { class: "user-name", "{user.display_name}" }
                        span { class: "user-role", "{user.role}" }
                        button {
                            class: "logout-button",
                            onclick: move |_| {
                                let context = context.clone();
                                spawn(async move {
                                    context.manager.logout().await;
                                    context.sync();
                                });
                            },
                            "Log out"
                        }
                    }

                    PermissionGate {
                        capability: Capability::ViewOrders,
                        section { class: "panel", h3 { "Orders" } }
                    }
                    PermissionGate {
                        capability: Capability::ManageDrivers,
                        section { class: "panel", h3 { "Drivers" } }
                    }
                    PermissionGate {
                        capability: Capability::ViewReports,
                        section { class: "panel", h3 { "Reports" } }
                    }
                    PermissionGate {
                        capability: Capability::ManageUsers,
                        section { class: "panel", h3 { "Users" } }
                    }
                    PermissionGate {
                        capability: Capability::ManageSettings,
                        section { class: "panel", h3 { "Settings" } }
                    }
                }
            }
        }
    }
}

#[component]
fn Login() -> Element {
    let navigator = use_navigator();

    rsx! {
        div {
            class: "login-page",
            LoginForm {
                on_success: move |_: Session| {
                    navigator.push(Route::Dashboard {});
                }
            }
            OtpLoginForm {
                on_success: move |_: Session| {
                    navigator.push(Route::Dashboard {});
                }
            }
        }
    }
}
