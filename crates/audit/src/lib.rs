// Copyright (C) 2026 Fred Clausen
// Use of this source code is governed by an MIT-style
// license that can be found in the LICENSE file or at
// https://opensource.org/licenses/MIT.

#![deny(
    clippy::pedantic,
    clippy::cargo,
    clippy::nursery,
    clippy::style,
    clippy::correctness,
    clippy::all
)]

mod sink;

#[cfg(test)]
mod tests;

pub use sink::{AuditLog, AuditSink, AuditSinkError, TracingAuditSink};

use serde::{Deserialize, Serialize};
use staffdesk_domain::{RequestKey, RequestStatus, UserId};
use time::OffsetDateTime;

/// The user who performed a decision.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Actor {
    /// The acting user's id. Compared against a request's decider.
    pub id: UserId,
    /// The slug of the role the actor held when acting.
    pub role_name: String,
}

impl Actor {
    /// Creates a new Actor.
    ///
    /// # Arguments
    ///
    /// * `id` - The acting user's id
    /// * `role_name` - The slug of the actor's role
    #[must_use]
    pub const fn new(id: UserId, role_name: String) -> Self {
        Self { id, role_name }
    }
}

/// The decision that was performed.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Action {
    /// The name of the action (e.g., "`Approve`", "`Reject`").
    pub name: String,
    /// Optional additional details, such as the rejection reason.
    pub details: Option<String>,
}

impl Action {
    /// Creates a new Action.
    ///
    /// # Arguments
    ///
    /// * `name` - The name of the action
    /// * `details` - Optional additional details
    #[must_use]
    pub const fn new(name: String, details: Option<String>) -> Self {
        Self { name, details }
    }
}

/// An immutable record of one applied decision.
///
/// Every successful decision produces exactly one event. Events capture:
/// - Which request changed (request)
/// - The status before and after
/// - Who performed the action (actor)
/// - What action was performed (action)
/// - When it was applied (timestamp)
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct AuditEvent {
    pub request: RequestKey,
    pub from_status: RequestStatus,
    pub to_status: RequestStatus,
    pub actor: Actor,
    pub action: Action,
    #[serde(with = "time::serde::rfc3339")]
    pub timestamp: OffsetDateTime,
}

impl AuditEvent {
    /// Creates a new `AuditEvent`.
    ///
    /// # Arguments
    ///
    /// * `request` - The `(kind, id)` of the changed request
    /// * `from_status` - The status before the transition
    /// * `to_status` - The status after the transition
    /// * `actor` - The actor who made the decision
    /// * `action` - The action that was performed
    /// * `timestamp` - When the transition was applied
    #[must_use]
    pub const fn new(
        request: RequestKey,
        from_status: RequestStatus,
        to_status: RequestStatus,
        actor: Actor,
        action: Action,
        timestamp: OffsetDateTime,
    ) -> Self {
        Self {
            request,
            from_status,
            to_status,
            actor,
            action,
            timestamp,
        }
    }
}
