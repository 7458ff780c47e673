// Copyright (C) 2026 Fred Clausen
// Use of this source code is governed by an MIT-style
// license that can be found in the LICENSE file or at
// https://opensource.org/licenses/MIT.

use diesel::SqliteConnection;
use diesel::prelude::*;
use staffdesk_domain::{RoleId, UserId};

use crate::data_models::StaffData;
use crate::diesel_schema::staff;
use crate::error::PersistenceError;

/// Returns the role held by a staff member.
///
/// # Errors
///
/// Returns an error if the database query fails.
/// Returns `Ok(None)` if the staff member is not found.
pub fn get_staff_role(
    conn: &mut SqliteConnection,
    staff_id: UserId,
) -> Result<Option<RoleId>, PersistenceError> {
    Ok(staff::table
        .find(staff_id.0)
        .select(staff::role_id)
        .first::<i64>(conn)
        .optional()?
        .map(RoleId))
}

/// Retrieves a staff member by ID.
///
/// # Errors
///
/// Returns an error if the database query fails.
/// Returns `Ok(None)` if the staff member is not found.
pub fn get_staff(
    conn: &mut SqliteConnection,
    staff_id: UserId,
) -> Result<Option<StaffData>, PersistenceError> {
    Ok(staff::table
        .find(staff_id.0)
        .select((staff::staff_id, staff::display_name, staff::role_id))
        .first::<(i64, String, i64)>(conn)
        .optional()?
        .map(|(staff_id, display_name, role_id)| StaffData {
            staff_id,
            display_name,
            role_id,
        }))
}
