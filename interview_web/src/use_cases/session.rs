use crate::domain::{SessionStore, TOKEN_KEY, USERNAME_KEY};

// Stores the credentials handed back by a successful login.
pub fn remember_login(store: &dyn SessionStore, token: &str, username: &str) {
    store.set(TOKEN_KEY, token);
    store.set(USERNAME_KEY, username);
    tracing::info!(username, "session stored");
}

// Drops the local session. Returns whether anything was stored.
pub fn logout(store: &dyn SessionStore) -> bool {
    let token_removed = store.remove(TOKEN_KEY);
    let username_removed = store.remove(USERNAME_KEY);
    token_removed || username_removed
}

pub fn is_authenticated(store: &dyn SessionStore) -> bool {
    store.get(USERNAME_KEY).is_some()
}
