//! Authentication and sharing module for CloudVault.
//!
//! This module provides password hashing, account validation, the user
//! directory with its sharing graph, and session state.

mod account;
mod directory;
mod password;
mod session;
pub mod validation;

pub use account::{Permission, ShareEdge, UserAccount};
pub use directory::UserDirectory;
pub use password::{
    generate_password, hash_password, hash_password_with, hash_secret, validate_password,
    verify_password, HashCost, PasswordError, MAX_PASSWORD_LENGTH, MIN_PASSWORD_LENGTH,
    TEMPORARY_PASSWORD_LENGTH,
};
pub use session::{Session, SessionState};
pub use validation::ValidationError;
