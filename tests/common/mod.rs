//! Test helpers for drive scenario tests.
//!
//! Provides a drive with cheap password hashing and two ordinary users.

#![allow(dead_code)]

use cloudvault::config::Config;
use cloudvault::{DriveService, Session};

pub const ADMIN: &str = "admin";
pub const ADMIN_PASSWORD: &str = "password";
pub const ALICE: &str = "alice";
pub const ALICE_PASSWORD: &str = "alicepass1";
pub const BOB: &str = "bob";
pub const BOB_PASSWORD: &str = "bobpass12";

/// Configuration with the lightest Argon2 cost.
pub fn test_config() -> Config {
    Config::parse(
        r#"
[drive]
root_name = "Root"

[auth]
memory_kib = 1024
iterations = 1
parallelism = 1
"#,
    )
    .unwrap()
}

/// Drive with `alice` and `bob` registered by the administrator.
pub fn setup_drive() -> DriveService {
    let mut drive = DriveService::new(&test_config()).unwrap();
    create_test_user(&mut drive, ALICE, ALICE_PASSWORD);
    create_test_user(&mut drive, BOB, BOB_PASSWORD);
    drive
}

/// Register a user through the administrator account.
pub fn create_test_user(drive: &mut DriveService, user_id: &str, password: &str) {
    drive
        .add_user(ADMIN, user_id, password, "Pet name?", "rex")
        .unwrap();
}

/// A session logged in as `user_id`.
pub fn login(drive: &mut DriveService, user_id: &str, password: &str) -> Session {
    let mut session = drive.session();
    drive.login(&mut session, user_id, password).unwrap();
    session
}

/// Names in the session's current directory.
pub fn names(drive: &DriveService, session: &Session) -> Vec<String> {
    drive
        .list_contents(session.cursor())
        .unwrap()
        .into_iter()
        .map(|e| e.name)
        .collect()
}
