//! Scenario tests for accounts, sessions and sharing.

mod common;

use cloudvault::{DriveError, Permission};
use common::{
    create_test_user, login, setup_drive, ADMIN, ADMIN_PASSWORD, ALICE, ALICE_PASSWORD, BOB,
};

#[test]
fn test_share_with_unknown_user() {
    let mut drive = setup_drive();
    let cursor = *drive.session().cursor();
    drive.create_file(ALICE, &cursor, "f", "x").unwrap();

    let result = drive.share_file(ALICE, &cursor, "f", "nouser", "view");
    assert!(matches!(result, Err(DriveError::UserNotFound(_))));
    assert!(drive.list_shares(ALICE).unwrap().is_empty());
}

#[test]
fn test_share_appends_one_edge() {
    let mut drive = setup_drive();
    let cursor = *drive.session().cursor();
    drive.create_file(ALICE, &cursor, "f", "x").unwrap();

    drive.share_file(ALICE, &cursor, "f", BOB, "View").unwrap();
    let shares = drive.list_shares(ALICE).unwrap();
    assert_eq!(shares.len(), 1);
    assert_eq!(shares[0].target, BOB);
    assert_eq!(shares[0].file_name, "f");
    assert_eq!(shares[0].permission, Permission::View);

    drive.share_file(ALICE, &cursor, "f", BOB, "edit").unwrap();
    assert_eq!(drive.list_shares(ALICE).unwrap().len(), 2);

    let incoming = drive.shared_with_me(BOB);
    assert_eq!(incoming.len(), 2);
    assert!(incoming.iter().all(|s| s.owner == ALICE));
    assert!(drive.shared_with_me(ALICE).is_empty());
}

#[test]
fn test_login_requires_valid_credentials() {
    let mut drive = setup_drive();
    let mut session = drive.session();

    assert!(matches!(
        drive.login(&mut session, ALICE, "wrongpass"),
        Err(DriveError::AuthFailed)
    ));
    assert!(matches!(
        drive.login(&mut session, "ghost", "whatever1"),
        Err(DriveError::AuthFailed)
    ));
    assert!(matches!(
        session.require_user(),
        Err(DriveError::LoginRequired)
    ));

    drive.login(&mut session, ALICE, ALICE_PASSWORD).unwrap();
    assert!(session.is_logged_in());
    assert!(drive.users().find_user(ALICE).unwrap().last_login().is_some());

    assert_eq!(drive.logout(&mut session).unwrap(), ALICE);
    assert!(drive.users().find_user(ALICE).unwrap().last_logout().is_some());
}

#[test]
fn test_only_admin_adds_users() {
    let mut drive = setup_drive();
    let admin = login(&mut drive, ADMIN, ADMIN_PASSWORD);
    assert_eq!(admin.user_id(), Some(ADMIN));

    let result = drive.add_user(ALICE, "carol", "carolpass", "Q?", "a");
    assert!(matches!(result, Err(DriveError::PermissionDenied(_))));

    create_test_user(&mut drive, "carol", "carolpass");
    assert_eq!(drive.users().user_ids(), [ADMIN, ALICE, BOB, "carol"]);
}

#[test]
fn test_password_recovery() {
    let mut drive = setup_drive();
    assert_eq!(drive.security_question(ALICE).unwrap(), "Pet name?");

    assert!(matches!(
        drive.recover_password(ALICE, "max"),
        Err(DriveError::WrongAnswer)
    ));
    assert!(matches!(
        drive.recover_password("ghost", "rex"),
        Err(DriveError::UserNotFound(_))
    ));

    let temporary = drive.recover_password(ALICE, "  REX ").unwrap();
    let mut session = drive.session();
    assert!(drive.login(&mut session, ALICE, ALICE_PASSWORD).is_err());
    drive.login(&mut session, ALICE, &temporary).unwrap();
}
