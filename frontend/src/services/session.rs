//! Access to the current authenticated session.
//!
//! The calendar logic never reads browser globals directly; the token is
//! read here and injected into the API client, so tests and alternate
//! hosts can supply their own.

const TOKEN_STORAGE_KEY: &str = "authToken";

/// Accessor for the current session's auth token. By default the token
/// comes from `localStorage`; an explicit override takes precedence.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Session {
    token_override: Option<String>,
}

impl Session {
    pub fn new() -> Self {
        Self::default()
    }

    /// Session carrying a fixed token instead of reading storage
    pub fn with_token(token: String) -> Self {
        Self {
            token_override: Some(token),
        }
    }

    /// The bearer token for API calls, if the member is signed in
    pub fn auth_token(&self) -> Option<String> {
        if self.token_override.is_some() {
            return self.token_override.clone();
        }
        read_stored_token()
    }
}

fn read_stored_token() -> Option<String> {
    let storage = web_sys::window()?.local_storage().ok()??;
    storage.get_item(TOKEN_STORAGE_KEY).ok()?
}
