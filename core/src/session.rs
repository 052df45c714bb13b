//! Session credentials and the navigation policy around losing them.
//!
//! # Design
//! The token and user id live in an explicit `Session` value the host owns
//! and passes into the client, never in ambient globals. The host decides
//! where to persist it (keychain, config file, browser storage) and when to
//! navigate — `redirect_target` only answers the policy question.

use crate::types::LoginResponse;

/// Path of the landing (login) page.
pub const LANDING_PATH: &str = "/";
/// Path of the signup page, which must stay reachable while logged out.
pub const SIGNUP_PATH: &str = "/signup";

/// Credentials for the current session: an opaque bearer token and the id of
/// the logged-in user. Both absent means logged out.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Session {
    access_token: Option<String>,
    user_id: Option<String>,
}

impl Session {
    /// A logged-out session.
    pub fn new() -> Self {
        Self::default()
    }

    pub fn token(&self) -> Option<&str> {
        self.access_token.as_deref()
    }

    pub fn set_token(&mut self, token: impl Into<String>) {
        self.access_token = Some(token.into());
    }

    pub fn remove_token(&mut self) {
        self.access_token = None;
    }

    pub fn user_id(&self) -> Option<&str> {
        self.user_id.as_deref()
    }

    pub fn set_user_id(&mut self, id: impl Into<String>) {
        self.user_id = Some(id.into());
    }

    pub fn remove_user_id(&mut self) {
        self.user_id = None;
    }

    /// Drop both credentials. Idempotent.
    pub fn clear(&mut self) {
        self.access_token = None;
        self.user_id = None;
    }

    /// Guard for protected views: a session counts as authenticated as soon
    /// as it holds a token. The token itself is opaque and only the backend
    /// can reject it.
    pub fn is_authenticated(&self) -> bool {
        self.access_token.is_some()
    }

    /// Absorb a successful login response, storing both credentials.
    pub fn establish(&mut self, login: &LoginResponse) {
        self.access_token = Some(login.access_token.clone());
        self.user_id = Some(login.user_id.clone());
    }
}

/// Where to send the user after an authentication failure, or when a
/// protected view finds no stored token. Returns `None` when the current
/// page is already the landing or signup page, so those stay usable while
/// logged out.
pub fn redirect_target(current_path: &str) -> Option<&'static str> {
    if current_path == LANDING_PATH || current_path == SIGNUP_PATH {
        None
    } else {
        Some(LANDING_PATH)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn fresh_session_is_logged_out() {
        let session = Session::new();
        assert_eq!(session.token(), None);
        assert_eq!(session.user_id(), None);
        assert!(!session.is_authenticated());
    }

    #[test]
    fn set_and_remove_per_field() {
        let mut session = Session::new();
        session.set_token("tok-1");
        session.set_user_id("42");
        assert_eq!(session.token(), Some("tok-1"));
        assert_eq!(session.user_id(), Some("42"));
        assert!(session.is_authenticated());

        session.remove_token();
        assert_eq!(session.token(), None);
        assert!(!session.is_authenticated());
        // The user id survives until it is removed on its own.
        assert_eq!(session.user_id(), Some("42"));
        session.remove_user_id();
        assert_eq!(session.user_id(), None);
    }

    #[test]
    fn clear_drops_both_fields() {
        let mut session = Session::new();
        session.set_token("tok-1");
        session.set_user_id("42");
        session.clear();
        assert_eq!(session, Session::new());
        // Clearing an empty session is fine.
        session.clear();
        assert_eq!(session, Session::new());
    }

    #[test]
    fn establish_stores_login_credentials() {
        let login = LoginResponse {
            access_token: "tok-9".to_string(),
            token_type: "bearer".to_string(),
            user_id: "7".to_string(),
        };
        let mut session = Session::new();
        session.establish(&login);
        assert_eq!(session.token(), Some("tok-9"));
        assert_eq!(session.user_id(), Some("7"));
    }

    #[test]
    fn redirect_skips_public_pages() {
        assert_eq!(redirect_target("/"), None);
        assert_eq!(redirect_target("/signup"), None);
        assert_eq!(redirect_target("/posts"), Some("/"));
        assert_eq!(redirect_target("/posts/17"), Some("/"));
        assert_eq!(redirect_target(""), Some("/"));
    }
}
