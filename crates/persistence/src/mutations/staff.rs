// Copyright (C) 2026 Fred Clausen
// Use of this source code is governed by an MIT-style
// license that can be found in the LICENSE file or at
// https://opensource.org/licenses/MIT.

use diesel::SqliteConnection;
use diesel::prelude::*;
use staffdesk_domain::{RoleId, UserId};
use tracing::info;

use crate::backend::sqlite::get_last_insert_rowid;
use crate::diesel_schema::staff;
use crate::error::PersistenceError;
use crate::queries::roles::get_role;

/// Creates a staff member holding `role_id`.
///
/// # Errors
///
/// Returns `PersistenceError::NotFound` if the role does not exist, or
/// `PersistenceError::InvalidData` if the display name is blank.
pub fn insert_staff(
    conn: &mut SqliteConnection,
    display_name: &str,
    role_id: RoleId,
) -> Result<UserId, PersistenceError> {
    if display_name.trim().is_empty() {
        return Err(PersistenceError::InvalidData(String::from(
            "display name cannot be empty",
        )));
    }

    conn.immediate_transaction(|conn| {
        if get_role(conn, role_id)?.is_none() {
            return Err(PersistenceError::NotFound(format!("role {role_id}")));
        }

        diesel::insert_into(staff::table)
            .values((
                staff::display_name.eq(display_name.trim()),
                staff::role_id.eq(role_id.0),
            ))
            .execute(conn)?;
        let staff_id: i64 = get_last_insert_rowid(conn)?;

        info!(staff_id, role_id = role_id.0, "Created staff member");
        Ok(UserId(staff_id))
    })
}
