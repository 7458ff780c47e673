// Copyright (C) 2026 Fred Clausen
// Use of this source code is governed by an MIT-style
// license that can be found in the LICENSE file or at
// https://opensource.org/licenses/MIT.

//! Durable audit trail.
//!
//! The trail holds its own connection to the database so it can receive
//! events while the request store is mid-decision. Writes are append-only.

use diesel::SqliteConnection;
use staffdesk_audit::{AuditEvent, AuditSink, AuditSinkError};
use staffdesk_domain::RequestKey;
use tracing::warn;

use crate::error::PersistenceError;
use crate::{mutations, queries};

/// Audit events stored in the `audit_events` table.
pub struct AuditTrail {
    conn: SqliteConnection,
}

impl std::fmt::Debug for AuditTrail {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("AuditTrail").finish_non_exhaustive()
    }
}

impl AuditTrail {
    pub(crate) const fn new(conn: SqliteConnection) -> Self {
        Self { conn }
    }

    /// Appends an event and returns its id.
    ///
    /// # Errors
    ///
    /// Returns an error if the insert fails.
    pub fn record(&mut self, event: &AuditEvent) -> Result<i64, PersistenceError> {
        mutations::audit::persist_audit_event(&mut self.conn, event)
    }

    /// Returns every event in the order recorded.
    ///
    /// # Errors
    ///
    /// Returns an error if the query fails.
    pub fn events(&mut self) -> Result<Vec<AuditEvent>, PersistenceError> {
        queries::audit::list_audit_events(&mut self.conn, None)
    }

    /// Returns the events recorded for one request.
    ///
    /// # Errors
    ///
    /// Returns an error if the query fails.
    pub fn events_for(&mut self, key: RequestKey) -> Result<Vec<AuditEvent>, PersistenceError> {
        queries::audit::list_audit_events(&mut self.conn, Some(key))
    }
}

impl AuditSink for AuditTrail {
    fn emit(&mut self, event: &AuditEvent) -> Result<(), AuditSinkError> {
        self.record(event).map(|_| ()).map_err(|e| {
            warn!(request = %event.request, error = %e, "Failed to persist audit event");
            AuditSinkError::Unavailable(e.to_string())
        })
    }
}
