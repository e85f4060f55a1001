#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum SessionMode {
    #[default]
    Anonymous,
    Registering,
    Guest,
    Authenticated,
}

impl SessionMode {
    pub fn as_label(self) -> &'static str {
        match self {
            Self::Anonymous => "SESSION_ANONYMOUS",
            Self::Registering => "SESSION_REGISTERING",
            Self::Guest => "SESSION_GUEST",
            Self::Authenticated => "SESSION_AUTHENTICATED",
        }
    }
}

/// Token and username of a signed-in user. Always travel together.
#[derive(Clone, PartialEq, Eq)]
pub struct Credentials {
    pub token: String,
    pub username: String,
}

impl std::fmt::Debug for Credentials {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Credentials")
            .field("token", &"[REDACTED]")
            .field("username", &self.username)
            .finish()
    }
}

/// Client-side authentication state.
///
/// Credentials exist exactly when the mode is `Authenticated`; the
/// constructors are the only way to build a session, which keeps the
/// two in lockstep.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct Session {
    mode: SessionMode,
    credentials: Option<Credentials>,
}

impl Session {
    pub fn anonymous() -> Self {
        Self::default()
    }

    pub fn registering() -> Self {
        Self {
            mode: SessionMode::Registering,
            credentials: None,
        }
    }

    pub fn guest() -> Self {
        Self {
            mode: SessionMode::Guest,
            credentials: None,
        }
    }

    pub fn authenticated(credentials: Credentials) -> Self {
        Self {
            mode: SessionMode::Authenticated,
            credentials: Some(credentials),
        }
    }

    pub fn mode(&self) -> SessionMode {
        self.mode
    }

    pub fn token(&self) -> Option<&str> {
        self.credentials.as_ref().map(|c| c.token.as_str())
    }

    pub fn username(&self) -> Option<&str> {
        self.credentials.as_ref().map(|c| c.username.as_str())
    }

    pub fn is_authenticated(&self) -> bool {
        self.mode == SessionMode::Authenticated
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn creds() -> Credentials {
        Credentials {
            token: "tok-1".to_owned(),
            username: "bucky".to_owned(),
        }
    }

    #[test]
    fn default_session_is_anonymous_without_credentials() {
        let session = Session::default();

        assert_eq!(session.mode(), SessionMode::Anonymous);
        assert_eq!(session.token(), None);
        assert_eq!(session.username(), None);
    }

    #[test]
    fn only_authenticated_session_carries_credentials() {
        for session in [Session::anonymous(), Session::registering(), Session::guest()] {
            assert!(session.token().is_none());
            assert!(session.username().is_none());
            assert!(!session.is_authenticated());
        }

        let session = Session::authenticated(creds());
        assert!(session.is_authenticated());
        assert_eq!(session.token(), Some("tok-1"));
        assert_eq!(session.username(), Some("bucky"));
    }

    #[test]
    fn debug_output_hides_token() {
        let rendered = format!("{:?}", Session::authenticated(creds()));

        assert!(!rendered.contains("tok-1"));
        assert!(rendered.contains("bucky"));
    }
}
