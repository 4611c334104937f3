use dioxus::prelude::*;

use crate::services::client::ApiClient;
use crate::services::config::ConsoleConfig;
use crate::services::session::{Capability, SessionManager, SessionState};

/// What UI code receives from [`SessionProvider`]
#[derive(Clone)]
pub struct SessionContext {
    pub manager: SessionManager,
    /// Reactive mirror of the manager's state; reading it subscribes the component
    pub state: Signal<SessionState>,
}

impl SessionContext {
    pub fn has_permission(&self, capability: Capability) -> bool {
        self.state
            .read()
            .session()
            .is_some_and(|session| session.role.grants(capability))
    }

    /// Copy the manager's current state into the signal
    pub fn sync(&self) {
        let mut state = self.state;
        state.set(self.manager.state());
    }
}

pub fn use_session() -> SessionContext {
    use_context::<SessionContext>()
}

/// Restores the persisted session and shares it with every descendant.
///
/// Invalidation signals from the request pipeline re-render the tree as soon
/// as they are published.
#[component]
pub fn SessionProvider(#[props(default)] config: ConsoleConfig, children: Element) -> Element {
    let context = use_context_provider(move || {
        let manager = SessionManager::start(ApiClient::new(&config));
        let state = Signal::new(manager.state());
        SessionContext { manager, state }
    });

    use_future(move || {
        let context = context.clone();
        async move {
            let mut state = context.state;
            context
                .manager
                .watch_invalidations(|next| state.set(next))
                .await;
        }
    });

    rsx! {
        {children}
    }
}
