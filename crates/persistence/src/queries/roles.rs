// Copyright (C) 2026 Fred Clausen
// Use of this source code is governed by an MIT-style
// license that can be found in the LICENSE file or at
// https://opensource.org/licenses/MIT.

use diesel::SqliteConnection;
use diesel::prelude::*;
use staffdesk_domain::{Role, RoleId};
use tracing::debug;

use crate::data_models::RoleRow;
use crate::diesel_schema::{roles, staff};
use crate::error::PersistenceError;

/// Retrieves every role, ordered by hierarchy level then id.
///
/// # Errors
///
/// Returns an error if the query fails or a stored row is malformed.
pub fn list_roles(conn: &mut SqliteConnection) -> Result<Vec<Role>, PersistenceError> {
    let rows: Vec<RoleRow> = roles::table
        .order((roles::hierarchy_level.asc(), roles::role_id.asc()))
        .select(RoleRow::as_select())
        .load(conn)
        .map_err(|e| PersistenceError::QueryFailed(format!("list_roles: {e}")))?;

    debug!(count = rows.len(), "Loaded roles");
    rows.into_iter().map(Role::try_from).collect()
}

/// Retrieves a role by ID.
///
/// # Errors
///
/// Returns an error if the database query fails.
/// Returns `Ok(None)` if the role is not found.
pub fn get_role(conn: &mut SqliteConnection, id: RoleId) -> Result<Option<Role>, PersistenceError> {
    roles::table
        .find(id.0)
        .select(RoleRow::as_select())
        .first(conn)
        .optional()?
        .map(Role::try_from)
        .transpose()
}

/// Counts the staff members holding a role.
///
/// # Errors
///
/// Returns an error if the database query fails.
pub fn count_role_holders(conn: &mut SqliteConnection, id: RoleId) -> Result<i64, PersistenceError> {
    Ok(staff::table
        .filter(staff::role_id.eq(id.0))
        .count()
        .get_result(conn)?)
}
