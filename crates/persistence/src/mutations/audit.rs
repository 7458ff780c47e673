// Copyright (C) 2026 Fred Clausen
// Use of this source code is governed by an MIT-style
// license that can be found in the LICENSE file or at
// https://opensource.org/licenses/MIT.

use diesel::SqliteConnection;
use diesel::prelude::*;
use staffdesk_audit::AuditEvent;
use tracing::debug;

use crate::backend::sqlite::get_last_insert_rowid;
use crate::data_models::NewAuditEventRow;
use crate::diesel_schema::audit_events;
use crate::error::PersistenceError;

/// Appends an audit event to the trail.
///
/// # Returns
///
/// The event ID assigned by the database.
///
/// # Errors
///
/// Returns an error if the event cannot be serialized or the insert fails.
pub fn persist_audit_event(
    conn: &mut SqliteConnection,
    event: &AuditEvent,
) -> Result<i64, PersistenceError> {
    let row: NewAuditEventRow = NewAuditEventRow::from_event(event)?;

    conn.immediate_transaction(|conn| {
        diesel::insert_into(audit_events::table)
            .values(&row)
            .execute(conn)?;
        let event_id: i64 = get_last_insert_rowid(conn)?;

        debug!(
            event_id,
            request = %event.request,
            action = %event.action.name,
            "Persisted audit event"
        );
        Ok(event_id)
    })
}
