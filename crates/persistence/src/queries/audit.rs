// Copyright (C) 2026 Fred Clausen
// Use of this source code is governed by an MIT-style
// license that can be found in the LICENSE file or at
// https://opensource.org/licenses/MIT.

use diesel::SqliteConnection;
use diesel::prelude::*;
use staffdesk_audit::AuditEvent;
use staffdesk_domain::RequestKey;

use crate::data_models::AuditEventRow;
use crate::diesel_schema::audit_events;
use crate::error::PersistenceError;

/// Lists audit events in the order they were recorded, optionally only
/// those for one request.
///
/// # Errors
///
/// Returns an error if the query fails or a stored row is malformed.
pub fn list_audit_events(
    conn: &mut SqliteConnection,
    request: Option<RequestKey>,
) -> Result<Vec<AuditEvent>, PersistenceError> {
    let mut query = audit_events::table
        .select(AuditEventRow::as_select())
        .order(audit_events::event_id.asc())
        .into_boxed();
    if let Some(key) = request {
        query = query
            .filter(audit_events::kind.eq(key.kind.as_str()))
            .filter(audit_events::request_id.eq(key.id));
    }

    let rows: Vec<AuditEventRow> = query
        .load(conn)
        .map_err(|e| PersistenceError::QueryFailed(format!("list_audit_events: {e}")))?;
    rows.into_iter().map(AuditEvent::try_from).collect()
}
