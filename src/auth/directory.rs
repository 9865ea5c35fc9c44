//! User directory and sharing graph.
//!
//! Accounts are nodes; each account owns its outgoing share edges. The graph
//! is a pure relation store: it checks that both users exist but does not
//! look at the namespace.

use std::collections::HashMap;

use chrono::Utc;
use tracing::{info, warn};

use super::account::{Permission, ShareEdge, UserAccount};
use super::password::{
    generate_password, hash_password_with, hash_secret, verify_password, HashCost,
    TEMPORARY_PASSWORD_LENGTH,
};
use super::validation::{normalize_answer, validate_security_pair, validate_user_id};
use crate::{DriveError, Result};

/// All registered users and their outgoing shares.
#[derive(Debug, Default)]
pub struct UserDirectory {
    users: HashMap<String, UserAccount>,
    cost: HashCost,
}

impl UserDirectory {
    /// Directory hashing with the default Argon2 cost.
    pub fn new() -> Self {
        Self::default()
    }

    /// Directory hashing with a custom Argon2 cost.
    pub fn with_cost(cost: HashCost) -> Self {
        Self {
            users: HashMap::new(),
            cost,
        }
    }

    pub fn find_user(&self, user_id: &str) -> Option<&UserAccount> {
        self.users.get(user_id)
    }

    pub fn contains(&self, user_id: &str) -> bool {
        self.users.contains_key(user_id)
    }

    /// Register a new account.
    pub fn add_user(
        &mut self,
        user_id: &str,
        password: &str,
        question: &str,
        answer: &str,
    ) -> Result<&UserAccount> {
        validate_user_id(user_id)?;
        if self.users.contains_key(user_id) {
            return Err(DriveError::DuplicateUser(user_id.to_string()));
        }
        validate_security_pair(question, answer)?;

        let password_hash = hash_password_with(password, self.cost)?;
        let answer_hash = hash_secret(&normalize_answer(answer), self.cost)?;
        let account = UserAccount::new(
            user_id.to_string(),
            password_hash,
            question.to_string(),
            answer_hash,
        );

        info!(user = user_id, "User account created");
        Ok(&*self.users.entry(user_id.to_string()).or_insert(account))
    }

    /// Check credentials and stamp last-login on success.
    ///
    /// Returns `None` for an unknown user or a wrong password.
    pub fn authenticate(&mut self, user_id: &str, password: &str) -> Option<&UserAccount> {
        let Some(account) = self.users.get_mut(user_id) else {
            warn!(user = user_id, "Login attempt for unknown user");
            return None;
        };
        if verify_password(password, account.password_hash()).is_err() {
            warn!(user = user_id, "Login failed: wrong password");
            return None;
        }

        account.stamp_login();
        info!(user = user_id, "User logged in");
        Some(&*account)
    }

    /// Stamp last-logout.
    pub fn logout(&mut self, user_id: &str) -> Result<()> {
        let account = self
            .users
            .get_mut(user_id)
            .ok_or_else(|| DriveError::UserNotFound(user_id.to_string()))?;
        account.stamp_logout();
        info!(user = user_id, "User logged out");
        Ok(())
    }

    /// Security question of an account.
    pub fn security_question(&self, user_id: &str) -> Result<&str> {
        self.users
            .get(user_id)
            .map(|a| a.security_question())
            .ok_or_else(|| DriveError::UserNotFound(user_id.to_string()))
    }

    /// Answer the security question to obtain a password.
    ///
    /// Stored passwords are hashed, so a correct answer replaces the password
    /// with a freshly generated temporary one, which is returned.
    pub fn recover_password(&mut self, user_id: &str, answer: &str) -> Result<String> {
        let cost = self.cost;
        let account = self
            .users
            .get_mut(user_id)
            .ok_or_else(|| DriveError::UserNotFound(user_id.to_string()))?;

        if verify_password(&normalize_answer(answer), account.security_answer_hash()).is_err() {
            warn!(user = user_id, "Password recovery failed: wrong answer");
            return Err(DriveError::WrongAnswer);
        }

        let temporary = generate_password(TEMPORARY_PASSWORD_LENGTH);
        account.set_password_hash(hash_password_with(&temporary, cost)?);
        info!(user = user_id, "Password reset through security question");
        Ok(temporary)
    }

    /// Record that `owner` shares `file_name` with `target`.
    ///
    /// Identical edges are not deduplicated.
    pub fn share_file(
        &mut self,
        owner: &str,
        target: &str,
        file_name: &str,
        permission: Permission,
    ) -> Result<()> {
        if !self.users.contains_key(target) {
            warn!(owner, target, "Share refused: target user not found");
            return Err(DriveError::UserNotFound(target.to_string()));
        }
        let account = self
            .users
            .get_mut(owner)
            .ok_or_else(|| DriveError::UserNotFound(owner.to_string()))?;

        account.push_share(ShareEdge {
            target: target.to_string(),
            file_name: file_name.to_string(),
            permission,
            shared_at: Utc::now(),
        });
        info!(owner, target, file = file_name, %permission, "File shared");
        Ok(())
    }

    /// Outgoing shares of `owner` in insertion order.
    pub fn list_shares(&self, owner: &str) -> Result<&[ShareEdge]> {
        self.users
            .get(owner)
            .map(|a| a.shares())
            .ok_or_else(|| DriveError::UserNotFound(owner.to_string()))
    }

    /// Incoming shares of `target` as `(owner, edge)`, ordered by owner id.
    pub fn shared_with(&self, target: &str) -> Vec<(&str, &ShareEdge)> {
        let mut incoming: Vec<_> = self
            .users
            .values()
            .flat_map(|account| {
                account
                    .shares()
                    .iter()
                    .filter(move |edge| edge.target == target)
                    .map(move |edge| (account.user_id(), edge))
            })
            .collect();
        incoming.sort_by(|a, b| a.0.cmp(b.0));
        incoming
    }

    /// All user ids, sorted.
    pub fn user_ids(&self) -> Vec<&str> {
        let mut ids: Vec<_> = self.users.keys().map(String::as_str).collect();
        ids.sort_unstable();
        ids
    }

    pub fn len(&self) -> usize {
        self.users.len()
    }

    pub fn is_empty(&self) -> bool {
        self.users.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::auth::PasswordError;

    fn directory() -> UserDirectory {
        let mut users = UserDirectory::with_cost(HashCost::light());
        users
            .add_user("alice", "alicepass1", "Favorite color?", "Blue")
            .unwrap();
        users
            .add_user("bob", "bobpass12", "First pet?", "rex")
            .unwrap();
        users
    }

    #[test]
    fn test_add_user_duplicate() {
        let mut users = directory();
        let result = users.add_user("bob", "another1", "Q?", "a");
        assert!(matches!(result, Err(DriveError::DuplicateUser(id)) if id == "bob"));
        assert_eq!(users.len(), 2);
    }

    #[test]
    fn test_add_user_validation() {
        let mut users = UserDirectory::with_cost(HashCost::light());
        assert!(matches!(
            users.add_user("", "password1", "Q?", "a"),
            Err(DriveError::InvalidName(_))
        ));
        assert!(matches!(
            users.add_user("carol", "short", "Q?", "a"),
            Err(DriveError::Password(PasswordError::TooShort))
        ));
        assert!(matches!(
            users.add_user("carol", "password1", "", "a"),
            Err(DriveError::InvalidName(_))
        ));
        assert!(users.is_empty());
    }

    #[test]
    fn test_authenticate() {
        let mut users = directory();

        assert!(users.authenticate("alice", "wrongpass").is_none());
        assert!(users.find_user("alice").unwrap().last_login().is_none());
        assert!(users.authenticate("nobody", "alicepass1").is_none());

        let account = users.authenticate("alice", "alicepass1").unwrap();
        assert_eq!(account.user_id(), "alice");
        assert!(account.last_login().is_some());
    }

    #[test]
    fn test_logout_stamps() {
        let mut users = directory();
        users.logout("alice").unwrap();
        assert!(users.find_user("alice").unwrap().last_logout().is_some());
        assert!(matches!(
            users.logout("nobody"),
            Err(DriveError::UserNotFound(_))
        ));
    }

    #[test]
    fn test_recover_password() {
        let mut users = directory();

        assert!(matches!(
            users.recover_password("nobody", "blue"),
            Err(DriveError::UserNotFound(_))
        ));
        assert!(matches!(
            users.recover_password("alice", "red"),
            Err(DriveError::WrongAnswer)
        ));
        assert!(users.authenticate("alice", "alicepass1").is_some());

        let temporary = users.recover_password("alice", "  blue ").unwrap();
        assert!(users.authenticate("alice", "alicepass1").is_none());
        assert!(users.authenticate("alice", &temporary).is_some());
    }

    #[test]
    fn test_security_question() {
        let users = directory();
        assert_eq!(users.security_question("bob").unwrap(), "First pet?");
        assert!(users.security_question("nobody").is_err());
    }

    #[test]
    fn test_share_unknown_target() {
        let mut users = directory();
        let result = users.share_file("alice", "nouser", "f", Permission::View);

        assert!(matches!(result, Err(DriveError::UserNotFound(id)) if id == "nouser"));
        assert!(users.list_shares("alice").unwrap().is_empty());
    }

    #[test]
    fn test_share_appends_without_dedup() {
        let mut users = directory();
        users
            .share_file("alice", "bob", "f", Permission::Edit)
            .unwrap();
        users
            .share_file("alice", "bob", "f", Permission::Edit)
            .unwrap();
        users
            .share_file("alice", "bob", "g", Permission::View)
            .unwrap();

        let shares = users.list_shares("alice").unwrap();
        assert_eq!(shares.len(), 3);
        assert_eq!(shares[0].target, "bob");
        assert_eq!(shares[0].permission, Permission::Edit);
        assert_eq!(shares[2].file_name, "g");
    }

    #[test]
    fn test_share_unknown_owner() {
        let mut users = directory();
        assert!(matches!(
            users.share_file("ghost", "bob", "f", Permission::View),
            Err(DriveError::UserNotFound(id)) if id == "ghost"
        ));
    }

    #[test]
    fn test_shared_with() {
        let mut users = directory();
        users
            .add_user("carol", "carolpass", "Q?", "a")
            .unwrap();
        users
            .share_file("carol", "bob", "c.txt", Permission::View)
            .unwrap();
        users
            .share_file("alice", "bob", "a.txt", Permission::Edit)
            .unwrap();

        let incoming = users.shared_with("bob");
        let owners: Vec<_> = incoming.iter().map(|(owner, _)| *owner).collect();
        assert_eq!(owners, ["alice", "carol"]);
        assert!(users.shared_with("alice").is_empty());
    }

    #[test]
    fn test_user_ids_sorted() {
        let users = directory();
        assert_eq!(users.user_ids(), ["alice", "bob"]);
    }
}
