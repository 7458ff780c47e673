// Copyright (C) 2026 Fred Clausen
// Use of this source code is governed by an MIT-style
// license that can be found in the LICENSE file or at
// https://opensource.org/licenses/MIT.

use diesel::SqliteConnection;
use diesel::prelude::*;
use staffdesk::NewRole;
use staffdesk_domain::{Role, RoleId, validate_role_name};
use tracing::info;

use crate::backend::sqlite::get_last_insert_rowid;
use crate::data_models::{RoleChangeset, level_to_column};
use crate::diesel_schema::roles;
use crate::error::PersistenceError;
use crate::queries::roles::{count_role_holders, get_role};

/// Creates a role.
///
/// # Errors
///
/// Returns `PersistenceError::InvalidData` if the name is not a valid slug and
/// `PersistenceError::Conflict` if the name is already taken.
pub fn insert_role(conn: &mut SqliteConnection, role: &NewRole) -> Result<Role, PersistenceError> {
    validate_role_name(&role.name)?;
    let changeset: RoleChangeset = RoleChangeset::new(
        &role.name,
        &role.display_name,
        role.hierarchy_level,
        true,
        &role.permissions,
    )?;

    conn.immediate_transaction(|conn| {
        diesel::insert_into(roles::table)
            .values(&changeset)
            .execute(conn)?;
        let role_id: i64 = get_last_insert_rowid(conn)?;

        info!(role_id, name = %role.name, "Created role");
        get_role(conn, RoleId(role_id))?
            .ok_or_else(|| PersistenceError::NotFound(format!("role {role_id}")))
    })
}

/// Replaces every field of a role.
///
/// # Errors
///
/// Returns `PersistenceError::NotFound` if the role does not exist.
pub fn update_role(conn: &mut SqliteConnection, role: &Role) -> Result<Role, PersistenceError> {
    validate_role_name(&role.name)?;
    let changeset: RoleChangeset = RoleChangeset::new(
        &role.name,
        &role.display_name,
        role.hierarchy_level,
        role.active,
        &role.permissions,
    )?;

    conn.immediate_transaction(|conn| {
        let updated: usize = diesel::update(roles::table.find(role.id.0))
            .set(&changeset)
            .execute(conn)?;
        if updated == 0 {
            return Err(PersistenceError::NotFound(format!("role {}", role.id)));
        }

        info!(role_id = role.id.0, "Updated role");
        get_role(conn, role.id)?
            .ok_or_else(|| PersistenceError::NotFound(format!("role {}", role.id)))
    })
}

/// Deletes a role that no staff member holds.
///
/// # Errors
///
/// Returns `PersistenceError::NotFound` if the role does not exist and
/// `PersistenceError::Conflict` if it is still assigned.
pub fn delete_role(conn: &mut SqliteConnection, id: RoleId) -> Result<(), PersistenceError> {
    conn.immediate_transaction(|conn| {
        let holders: i64 = count_role_holders(conn, id)?;
        if holders > 0 {
            return Err(PersistenceError::Conflict(format!(
                "role {id} is held by {holders} staff member(s)"
            )));
        }

        let deleted: usize = diesel::delete(roles::table.find(id.0)).execute(conn)?;
        if deleted == 0 {
            return Err(PersistenceError::NotFound(format!("role {id}")));
        }

        info!(role_id = id.0, "Deleted role");
        Ok(())
    })
}

/// Sets the hierarchy level of several roles atomically.
///
/// # Errors
///
/// Returns `PersistenceError::NotFound` if any role does not exist, in which
/// case no level changes.
pub fn set_hierarchy_levels(
    conn: &mut SqliteConnection,
    levels: &[(RoleId, u32)],
) -> Result<(), PersistenceError> {
    conn.immediate_transaction(|conn| {
        for (id, level) in levels {
            let updated: usize = diesel::update(roles::table.find(id.0))
                .set(roles::hierarchy_level.eq(level_to_column(*level)?))
                .execute(conn)?;
            if updated == 0 {
                return Err(PersistenceError::NotFound(format!("role {id}")));
            }
        }

        info!(count = levels.len(), "Reordered role hierarchy");
        Ok(())
    })
}
