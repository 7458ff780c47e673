// Copyright (C) 2026 Fred Clausen
// Use of this source code is governed by an MIT-style
// license that can be found in the LICENSE file or at
// https://opensource.org/licenses/MIT.

//! Notification collaborators that observe applied decisions.
//!
//! Delivery is best effort. A failing sink never undoes the transition that
//! produced the event; callers log the failure and carry on.

use crate::AuditEvent;
use staffdesk_domain::RequestKey;
use tracing::info;

/// Errors raised while delivering an audit event.
#[derive(Debug, thiserror::Error)]
pub enum AuditSinkError {
    #[error("audit sink unavailable: {0}")]
    Unavailable(String),
    #[error("audit event for {request} rejected: {reason}")]
    Rejected { request: RequestKey, reason: String },
}

/// Receives one event per successful decision.
pub trait AuditSink {
    /// Delivers an event.
    ///
    /// # Errors
    ///
    /// Returns an error if the event could not be delivered.
    fn emit(&mut self, event: &AuditEvent) -> Result<(), AuditSinkError>;
}

impl<T: AuditSink + ?Sized> AuditSink for &mut T {
    fn emit(&mut self, event: &AuditEvent) -> Result<(), AuditSinkError> {
        (**self).emit(event)
    }
}

/// Delivers to both sinks. The second still runs if the first fails; the
/// first error wins.
impl<A: AuditSink, B: AuditSink> AuditSink for (A, B) {
    fn emit(&mut self, event: &AuditEvent) -> Result<(), AuditSinkError> {
        let first = self.0.emit(event);
        let second = self.1.emit(event);
        first.and(second)
    }
}

/// In-memory, append-only event log. Used in tests; servers store events
/// durably through the persistence crate.
#[derive(Debug, Clone, Default)]
pub struct AuditLog {
    events: Vec<AuditEvent>,
}

impl AuditLog {
    #[must_use]
    pub const fn new() -> Self {
        Self { events: Vec::new() }
    }

    /// Returns all events in emission order.
    #[must_use]
    pub fn events(&self) -> &[AuditEvent] {
        &self.events
    }

    /// Returns the events recorded for one request.
    pub fn for_request(&self, key: RequestKey) -> impl Iterator<Item = &AuditEvent> {
        self.events.iter().filter(move |event| event.request == key)
    }

    #[must_use]
    pub const fn len(&self) -> usize {
        self.events.len()
    }

    #[must_use]
    pub const fn is_empty(&self) -> bool {
        self.events.is_empty()
    }
}

impl AuditSink for AuditLog {
    fn emit(&mut self, event: &AuditEvent) -> Result<(), AuditSinkError> {
        self.events.push(event.clone());
        Ok(())
    }
}

/// Writes each event as a structured `info` record on the `audit` target.
#[derive(Debug, Clone, Copy, Default)]
pub struct TracingAuditSink;

impl AuditSink for TracingAuditSink {
    fn emit(&mut self, event: &AuditEvent) -> Result<(), AuditSinkError> {
        info!(
            target: "audit",
            request_id = event.request.id,
            kind = event.request.kind.as_str(),
            from_status = event.from_status.as_str(),
            to_status = event.to_status.as_str(),
            actor_id = event.actor.id.0,
            action = %event.action.name,
            timestamp = %event.timestamp,
            "Request decision applied"
        );
        Ok(())
    }
}
