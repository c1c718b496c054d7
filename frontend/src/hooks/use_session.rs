use shared::{LoginResponse, SessionUser};
use yew::prelude::*;

use crate::services::logging::Logger;
use crate::services::session::SessionStore;

const COMPONENT: &str = "session-hook";

#[derive(Clone, PartialEq)]
pub struct SessionState {
    pub user: Option<SessionUser>,
}

pub struct UseSessionResult {
    pub state: SessionState,
    pub actions: UseSessionActions,
}

#[derive(Clone, PartialEq)]
pub struct UseSessionActions {
    pub login: Callback<LoginResponse>,
    pub logout: Callback<()>,
}

/// Reactive wrapper over the session storage credentials.
///
/// The storage stays the source of truth for API calls; the hook only
/// mirrors the user into component state so the app re-renders on login
/// and logout.
#[hook]
pub fn use_session() -> UseSessionResult {
    let user = use_state(|| SessionStore::new().current_user());

    let login = {
        let user = user.clone();

        use_callback((), move |response: LoginResponse, _| {
            let store = SessionStore::new();
            store.store(&response.token, &response.user);
            Logger::info_with_component(
                COMPONENT,
                &format!("sesión iniciada para {}", response.user.display_name()),
            );
            user.set(Some(response.user));
        })
    };

    let logout = {
        let user = user.clone();

        use_callback((), move |_, _| {
            SessionStore::new().clear();
            Logger::info_with_component(COMPONENT, "sesión cerrada");
            user.set(None);
        })
    };

    let state = SessionState {
        user: (*user).clone(),
    };

    let actions = UseSessionActions { login, logout };

    UseSessionResult { state, actions }
}
