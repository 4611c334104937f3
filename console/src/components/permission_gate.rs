use dioxus::prelude::*;

use super::session_provider::use_session;
use crate::services::session::Capability;

/// Render `children` only when the current session holds `capability`
#[component]
pub fn PermissionGate(capability: Capability, children: Element) -> Element {
    let session = use_session();

    if session.has_permission(capability) {
        rsx! {
            {children}
        }
    } else {
        rsx! {}
    }
}
