use shared::SessionUser;

const TOKEN_KEY: &str = "token";
const USER_KEY: &str = "user";

/// Handle to the browser session storage holding the auth credentials.
///
/// The store never caches anything in memory: the token and user are read
/// fresh from storage on every access, so a login or logout in another part
/// of the app (or another tab sharing the session) is reflected on the very
/// next API call.
#[derive(Clone, Default)]
pub struct SessionStore;

impl SessionStore {
    pub fn new() -> Self {
        Self
    }

    fn storage() -> Option<web_sys::Storage> {
        web_sys::window()?.session_storage().ok().flatten()
    }

    /// Bearer token, if a session is active.
    pub fn token(&self) -> Option<String> {
        Self::storage()?.get_item(TOKEN_KEY).ok().flatten()
    }

    /// Authenticated user, if a session is active and the stored value is
    /// readable.
    pub fn current_user(&self) -> Option<SessionUser> {
        let raw = Self::storage()?.get_item(USER_KEY).ok().flatten()?;
        serde_json::from_str(&raw).ok()
    }

    /// Login half of the session lifecycle: persist the credentials.
    pub fn store(&self, token: &str, user: &SessionUser) {
        let Some(storage) = Self::storage() else {
            return;
        };
        let _ = storage.set_item(TOKEN_KEY, token);
        if let Ok(raw) = serde_json::to_string(user) {
            let _ = storage.set_item(USER_KEY, &raw);
        }
    }

    /// Logout half of the session lifecycle: drop the credentials.
    pub fn clear(&self) {
        let Some(storage) = Self::storage() else {
            return;
        };
        let _ = storage.remove_item(TOKEN_KEY);
        let _ = storage.remove_item(USER_KEY);
    }
}
