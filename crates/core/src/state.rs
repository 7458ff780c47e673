// Copyright (C) 2026 Fred Clausen
// Use of this source code is governed by an MIT-style
// license that can be found in the LICENSE file or at
// https://opensource.org/licenses/MIT.

use staffdesk_audit::AuditEvent;
use staffdesk_domain::{Request, RequestKey, RequestStatus, UserId};
use time::OffsetDateTime;

/// A compare-and-set write of a request's decision fields.
///
/// The store applies the new values only if the persisted request is still
/// the one that was read (same owner and creation time) and still has
/// `expected_status` and `expected_manager_id`; otherwise the write is a
/// conflict.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct StatusUpdate {
    pub key: RequestKey,
    pub expected_staff_id: UserId,
    pub expected_created_at: OffsetDateTime,
    pub expected_status: RequestStatus,
    pub expected_manager_id: Option<UserId>,
    pub status: RequestStatus,
    pub manager_id: Option<UserId>,
    pub rejection_reason: Option<String>,
    pub updated_at: OffsetDateTime,
}

/// The result of a successful state transition.
///
/// Transitions are atomic: they either succeed completely or fail without side effects.
#[derive(Debug, Clone, PartialEq)]
pub struct TransitionResult {
    /// The request as it will look once the update is stored.
    pub request: Request,
    /// The write the persistence collaborator must perform.
    pub update: StatusUpdate,
    /// The audit event recording this transition.
    pub audit_event: AuditEvent,
}
