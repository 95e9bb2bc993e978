//! Login session lifecycle: load from the store, log in through the API, log out.
use chrono::{DateTime, Duration, Utc};
use rusqlite::Connection;
use thiserror::Error;

use crate::api::{ApiError, MarketplaceApi};
use crate::db;
use crate::types::{AuthBody, User};

/// Days a login stays valid.
pub const SESSION_DAYS: i64 = 7;

#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Session {
    pub token: String,
    pub user: User,
    pub created_at: DateTime<Utc>,
    pub expires_at: DateTime<Utc>,
}

#[derive(Debug, Error)]
pub enum SessionError {
    #[error(transparent)]
    Api(#[from] ApiError),

    #[error(transparent)]
    Store(#[from] anyhow::Error),

    #[error("Email and password are required")]
    MissingCredentials,
}

impl SessionError {
    pub fn user_message(&self) -> String {
        match self {
            SessionError::Api(ApiError::Unauthorized) => {
                "Email o contraseña incorrectos".to_string()
            }
            SessionError::Api(err) => err.user_message(),
            SessionError::Store(_) => "No se pudo guardar la sesión".to_string(),
            SessionError::MissingCredentials => "Ingresa email y contraseña".to_string(),
        }
    }
}

impl Session {
    pub fn new(token: String, user: User, created_at: DateTime<Utc>) -> Self {
        Self {
            token,
            user,
            created_at,
            expires_at: created_at + Duration::days(SESSION_DAYS),
        }
    }

    pub fn is_expired(&self, now: DateTime<Utc>) -> bool {
        now >= self.expires_at
    }

    /// The stored, unexpired session if any.
    pub fn load(conn: &Connection) -> anyhow::Result<Option<Session>> {
        db::load_session(Utc::now(), conn)
    }

    pub fn login(
        api: &dyn MarketplaceApi,
        conn: &Connection,
        body: &AuthBody,
    ) -> Result<Session, SessionError> {
        if body.email.trim().is_empty() || body.password.is_empty() {
            return Err(SessionError::MissingCredentials);
        }
        let response = api.login(body)?;
        let session = Session::new(
            response.token,
            User {
                email: response.email,
                name: response.name,
            },
            Utc::now(),
        );
        db::save_session(&session, conn)?;
        tracing::info!("logged in as {}", session.user.email);
        Ok(session)
    }

    pub fn logout(conn: &Connection) -> anyhow::Result<()> {
        db::clear_session(conn)?;
        tracing::info!("logged out");
        Ok(())
    }
}

/// Session plus the last login error, as the UI and CLI see it.
#[derive(Debug, Default)]
pub struct AuthState {
    session: Option<Session>,
    error: Option<String>,
}

impl AuthState {
    pub fn restore(conn: &Connection) -> Self {
        match Session::load(conn) {
            Ok(session) => Self {
                session,
                error: None,
            },
            Err(err) => {
                tracing::warn!("could not read stored session: {err:#}");
                Self::default()
            }
        }
    }

    pub fn session(&self) -> Option<&Session> {
        self.session.as_ref()
    }

    pub fn user(&self) -> Option<&User> {
        self.session.as_ref().map(|session| &session.user)
    }

    pub fn error(&self) -> Option<&str> {
        self.error.as_deref()
    }

    pub fn is_logged_in(&self) -> bool {
        self.session.is_some()
    }

    /// On failure the session is left as it was and the error is kept.
    pub fn login(&mut self, api: &dyn MarketplaceApi, conn: &Connection, body: &AuthBody) -> bool {
        match Session::login(api, conn, body) {
            Ok(session) => {
                self.session = Some(session);
                self.error = None;
                true
            }
            Err(err) => {
                tracing::warn!("login failed for {}: {err}", body.email);
                self.error = Some(err.user_message());
                false
            }
        }
    }

    pub fn logout(&mut self, conn: &Connection) -> anyhow::Result<()> {
        self.session = None;
        self.error = None;
        Session::logout(conn)
    }

    pub fn clear_error(&mut self) {
        self.error = None;
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::api::stub::{PASSWORD, StubApi};
    use crate::db::init_in_memory;

    fn body(password: &str) -> AuthBody {
        AuthBody {
            email: "ana@example.com".to_string(),
            password: password.to_string(),
        }
    }

    #[test]
    fn new_session_expires_after_a_week() {
        let now = Utc::now();
        let user = User {
            email: "e".into(),
            name: "n".into(),
        };
        let session = Session::new("t".into(), user, now);
        assert!(!session.is_expired(now + Duration::days(6)));
        assert!(session.is_expired(now + Duration::days(7)));
    }

    #[test]
    fn login_persists_and_logout_clears() {
        let conn = init_in_memory().unwrap();
        let api = StubApi::default();
        let session = Session::login(&api, &conn, &body(PASSWORD)).unwrap();
        assert_eq!(session.user.name, "Ana");
        assert_eq!(Session::load(&conn).unwrap(), Some(session));

        Session::logout(&conn).unwrap();
        assert!(Session::load(&conn).unwrap().is_none());
    }

    #[test]
    fn empty_credentials_never_reach_the_api() {
        let conn = init_in_memory().unwrap();
        let api = StubApi::default();
        let err = Session::login(&api, &conn, &body("")).unwrap_err();
        assert!(matches!(err, SessionError::MissingCredentials));
        assert_eq!(api.login_calls.get(), 0);
    }

    #[test]
    fn auth_state_keeps_login_error() {
        let conn = init_in_memory().unwrap();
        let api = StubApi::default();
        let mut auth = AuthState::restore(&conn);
        assert!(!auth.is_logged_in());

        assert!(!auth.login(&api, &conn, &body("wrong")));
        assert_eq!(auth.error(), Some("Email o contraseña incorrectos"));
        assert!(auth.session().is_none());

        assert!(auth.login(&api, &conn, &body(PASSWORD)));
        assert!(auth.error().is_none());
        assert_eq!(auth.user().map(|user| user.email.as_str()), Some("ana@example.com"));
        assert!(AuthState::restore(&conn).is_logged_in());

        auth.logout(&conn).unwrap();
        assert!(!AuthState::restore(&conn).is_logged_in());
    }
}
