// Copyright (C) 2026 Fred Clausen
// Use of this source code is governed by an MIT-style
// license that can be found in the LICENSE file or at
// https://opensource.org/licenses/MIT.

use super::create_test_persistence;
use crate::{BOOTSTRAP_ADMIN_ID, BOOTSTRAP_ADMIN_ROLE_ID, Persistence};
use staffdesk_domain::{PermissionLevel, Role};

#[test]
fn test_foreign_keys_enforced() {
    let mut persistence: Persistence = create_test_persistence();

    assert!(persistence.verify_foreign_key_enforcement().is_ok());
}

#[test]
fn test_in_memory_databases_are_isolated() {
    let mut first: Persistence = create_test_persistence();
    let mut second: Persistence = create_test_persistence();

    first
        .insert_staff("Only in first", BOOTSTRAP_ADMIN_ROLE_ID)
        .unwrap();

    assert!(second.get_staff(staffdesk_domain::UserId(2)).unwrap().is_none());
    assert!(first.get_staff(staffdesk_domain::UserId(2)).unwrap().is_some());
}

#[test]
fn test_migration_seeds_administrator() {
    let mut persistence: Persistence = create_test_persistence();

    let roles: Vec<Role> = persistence.list_roles().unwrap();
    assert_eq!(roles.len(), 1);
    let admin: &Role = &roles[0];
    assert_eq!(admin.id, BOOTSTRAP_ADMIN_ROLE_ID);
    assert_eq!(admin.name, "admin");
    assert_eq!(admin.hierarchy_level, 0);
    assert_eq!(admin.permissions.approve_leave, PermissionLevel::All);
    assert!(admin.permissions.manage_roles);
    assert!(admin.permissions.access_webapp);

    let staff = persistence.get_staff(BOOTSTRAP_ADMIN_ID).unwrap().unwrap();
    assert_eq!(staff.role_id, BOOTSTRAP_ADMIN_ROLE_ID.0);
}

#[test]
fn test_file_database_persists_across_reopen() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("staffdesk.db");

    {
        let mut persistence: Persistence = Persistence::new_with_file(&path).unwrap();
        persistence
            .insert_staff("Asha", BOOTSTRAP_ADMIN_ROLE_ID)
            .unwrap();
    }

    let mut reopened: Persistence = Persistence::new_with_file(&path).unwrap();
    let staff = reopened
        .get_staff(staffdesk_domain::UserId(2))
        .unwrap()
        .unwrap();
    assert_eq!(staff.display_name, "Asha");
}
