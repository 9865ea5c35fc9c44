//! User accounts and share edges.

use std::fmt;
use std::str::FromStr;

use chrono::{DateTime, Utc};
use serde::Serialize;

use crate::DriveError;

/// Access level granted by a share.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum Permission {
    View,
    Edit,
}

impl Permission {
    pub fn as_str(&self) -> &'static str {
        match self {
            Permission::View => "view",
            Permission::Edit => "edit",
        }
    }
}

impl fmt::Display for Permission {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for Permission {
    type Err = DriveError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_lowercase().as_str() {
            "view" => Ok(Permission::View),
            "edit" => Ok(Permission::Edit),
            _ => Err(DriveError::InvalidPermission(s.to_string())),
        }
    }
}

/// Outgoing grant from an owner to another user over a named file.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ShareEdge {
    /// User id the file is shared with.
    pub target: String,
    /// Shared file name.
    pub file_name: String,
    /// Granted access level.
    pub permission: Permission,
    /// When the grant was made.
    pub shared_at: DateTime<Utc>,
}

/// A registered user.
#[derive(Debug, Clone)]
pub struct UserAccount {
    user_id: String,
    password_hash: String,
    security_question: String,
    security_answer_hash: String,
    created_at: DateTime<Utc>,
    last_login: Option<DateTime<Utc>>,
    last_logout: Option<DateTime<Utc>>,
    shares: Vec<ShareEdge>,
}

impl UserAccount {
    pub(crate) fn new(
        user_id: String,
        password_hash: String,
        security_question: String,
        security_answer_hash: String,
    ) -> Self {
        Self {
            user_id,
            password_hash,
            security_question,
            security_answer_hash,
            created_at: Utc::now(),
            last_login: None,
            last_logout: None,
            shares: Vec::new(),
        }
    }

    pub fn user_id(&self) -> &str {
        &self.user_id
    }

    pub fn security_question(&self) -> &str {
        &self.security_question
    }

    pub fn created_at(&self) -> DateTime<Utc> {
        self.created_at
    }

    pub fn last_login(&self) -> Option<DateTime<Utc>> {
        self.last_login
    }

    pub fn last_logout(&self) -> Option<DateTime<Utc>> {
        self.last_logout
    }

    /// Outgoing shares in insertion order.
    pub fn shares(&self) -> &[ShareEdge] {
        &self.shares
    }

    pub(crate) fn password_hash(&self) -> &str {
        &self.password_hash
    }

    pub(crate) fn security_answer_hash(&self) -> &str {
        &self.security_answer_hash
    }

    pub(crate) fn set_password_hash(&mut self, hash: String) {
        self.password_hash = hash;
    }

    pub(crate) fn stamp_login(&mut self) {
        self.last_login = Some(Utc::now());
    }

    pub(crate) fn stamp_logout(&mut self) {
        self.last_logout = Some(Utc::now());
    }

    pub(crate) fn push_share(&mut self, edge: ShareEdge) {
        self.shares.push(edge);
    }
}
