//! Session state for CloudVault.
//!
//! A session is either logged out or logged in as one user, and owns the
//! navigation cursor used by namespace operations.

use chrono::{DateTime, Utc};
use uuid::Uuid;

use super::directory::UserDirectory;
use crate::namespace::Cursor;
use crate::{DriveError, Result};

/// Login state of a session.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SessionState {
    LoggedOut,
    LoggedIn {
        /// Authenticated user id.
        user_id: String,
        /// Unique session token (UUID v4).
        token: String,
        /// When the login happened.
        since: DateTime<Utc>,
    },
}

/// One interactive session.
#[derive(Debug, Clone)]
pub struct Session {
    state: SessionState,
    cursor: Cursor,
    home: Cursor,
}

impl Session {
    /// Logged-out session positioned at `home`.
    pub fn new(home: Cursor) -> Self {
        Self {
            state: SessionState::LoggedOut,
            cursor: home,
            home,
        }
    }

    pub fn state(&self) -> &SessionState {
        &self.state
    }

    pub fn is_logged_in(&self) -> bool {
        matches!(self.state, SessionState::LoggedIn { .. })
    }

    pub fn user_id(&self) -> Option<&str> {
        match &self.state {
            SessionState::LoggedIn { user_id, .. } => Some(user_id),
            SessionState::LoggedOut => None,
        }
    }

    pub fn token(&self) -> Option<&str> {
        match &self.state {
            SessionState::LoggedIn { token, .. } => Some(token),
            SessionState::LoggedOut => None,
        }
    }

    /// Acting user, or [`DriveError::LoginRequired`].
    pub fn require_user(&self) -> Result<&str> {
        self.user_id().ok_or(DriveError::LoginRequired)
    }

    /// `LoggedOut -> LoggedIn` on valid credentials.
    pub fn login(&mut self, users: &mut UserDirectory, user_id: &str, password: &str) -> Result<()> {
        if let Some(current) = self.user_id() {
            return Err(DriveError::PermissionDenied(format!(
                "already logged in as {current}"
            )));
        }
        let account = users
            .authenticate(user_id, password)
            .ok_or(DriveError::AuthFailed)?;

        self.state = SessionState::LoggedIn {
            user_id: account.user_id().to_string(),
            token: Uuid::new_v4().to_string(),
            since: Utc::now(),
        };
        self.cursor = self.home;
        Ok(())
    }

    /// `LoggedIn -> LoggedOut`, stamping last-logout. Returns the user id.
    pub fn logout(&mut self, users: &mut UserDirectory) -> Result<String> {
        let user_id = self.require_user()?.to_string();
        users.logout(&user_id)?;
        self.state = SessionState::LoggedOut;
        self.cursor = self.home;
        Ok(user_id)
    }

    pub fn cursor(&self) -> &Cursor {
        &self.cursor
    }

    pub fn cursor_mut(&mut self) -> &mut Cursor {
        &mut self.cursor
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::auth::HashCost;
    use crate::namespace::NamespaceTree;

    fn setup() -> (NamespaceTree, UserDirectory) {
        let tree = NamespaceTree::new("Root");
        let mut users = UserDirectory::with_cost(HashCost::light());
        users
            .add_user("alice", "alicepass1", "Q?", "a")
            .unwrap();
        (tree, users)
    }

    #[test]
    fn test_new_session_logged_out() {
        let (tree, _) = setup();
        let session = Session::new(tree.cursor());

        assert!(!session.is_logged_in());
        assert_eq!(session.state(), &SessionState::LoggedOut);
        assert!(matches!(
            session.require_user(),
            Err(DriveError::LoginRequired)
        ));
    }

    #[test]
    fn test_login_logout_cycle() {
        let (tree, mut users) = setup();
        let mut session = Session::new(tree.cursor());

        session.login(&mut users, "alice", "alicepass1").unwrap();
        assert_eq!(session.require_user().unwrap(), "alice");
        assert_eq!(session.token().unwrap().len(), 36);

        let user = session.logout(&mut users).unwrap();
        assert_eq!(user, "alice");
        assert!(!session.is_logged_in());
        assert!(users.find_user("alice").unwrap().last_logout().is_some());
    }

    #[test]
    fn test_login_wrong_password() {
        let (tree, mut users) = setup();
        let mut session = Session::new(tree.cursor());

        let result = session.login(&mut users, "alice", "wrongpass");
        assert!(matches!(result, Err(DriveError::AuthFailed)));
        assert!(!session.is_logged_in());
    }

    #[test]
    fn test_double_login_refused() {
        let (tree, mut users) = setup();
        let mut session = Session::new(tree.cursor());
        session.login(&mut users, "alice", "alicepass1").unwrap();

        let result = session.login(&mut users, "alice", "alicepass1");
        assert!(matches!(result, Err(DriveError::PermissionDenied(_))));
    }

    #[test]
    fn test_logout_when_logged_out() {
        let (tree, mut users) = setup();
        let mut session = Session::new(tree.cursor());
        assert!(matches!(
            session.logout(&mut users),
            Err(DriveError::LoginRequired)
        ));
    }

    #[test]
    fn test_logout_resets_cursor() {
        let (mut tree, mut users) = setup();
        let mut session = Session::new(tree.cursor());
        session.login(&mut users, "alice", "alicepass1").unwrap();

        tree.make_directory(session.cursor(), "docs", "alice").unwrap();
        tree.change_directory(session.cursor_mut(), "docs").unwrap();
        assert_ne!(session.cursor(), &tree.cursor());

        session.logout(&mut users).unwrap();
        assert_eq!(session.cursor(), &tree.cursor());
    }
}
