// Copyright (C) 2026 Fred Clausen
// Use of this source code is governed by an MIT-style
// license that can be found in the LICENSE file or at
// https://opensource.org/licenses/MIT.

use crate::command::Command;
use crate::error::CoreError;
use crate::state::{StatusUpdate, TransitionResult};
use staffdesk_audit::{Action, Actor, AuditEvent};
use staffdesk_domain::{Request, RequestStatus, normalize_rejection_reason};
use time::OffsetDateTime;

/// Applies a decision to a request, producing the new request, the write
/// to persist, and an audit event.
///
/// One function serves all three request kinds; the payload is never
/// inspected. Authorization against the actor's role is the caller's job;
/// the only identity check made here is the decider check for
/// `EditReason`.
///
/// | From | Command | To |
/// |---|---|---|
/// | Pending | Approve | Approved |
/// | Pending | Reject | Rejected |
/// | Approved, Rejected | Revert | Pending |
/// | Rejected | `EditReason` | Rejected |
///
/// # Arguments
///
/// * `request` - The current request (immutable)
/// * `command` - The decision to apply
/// * `actor` - The actor performing this action
/// * `now` - The timestamp written to `updated_at`
///
/// # Returns
///
/// * `Ok(TransitionResult)` containing the new request, update and audit event
/// * `Err(CoreError)` if the command is invalid
///
/// # Errors
///
/// Returns an error if:
/// - A `Reject` or `EditReason` reason is blank (checked before status)
/// - An `EditReason` actor is not the request's recorded decider
/// - The command is not legal from the request's current status
pub fn apply(
    request: &Request,
    command: Command,
    actor: Actor,
    now: OffsetDateTime,
) -> Result<TransitionResult, CoreError> {
    let from: RequestStatus = request.status;
    let action_name: &'static str = command.name();

    let (status, manager_id, rejection_reason) = match command {
        Command::Approve => {
            require_status(from, &[RequestStatus::Pending], action_name)?;
            (RequestStatus::Approved, Some(actor.id), None)
        }
        Command::Reject { reason } => {
            let reason: String = normalize_rejection_reason(Some(&reason))?;
            require_status(from, &[RequestStatus::Pending], action_name)?;
            (RequestStatus::Rejected, Some(actor.id), Some(reason))
        }
        Command::Revert => {
            require_status(
                from,
                &[RequestStatus::Approved, RequestStatus::Rejected],
                action_name,
            )?;
            (RequestStatus::Pending, None, None)
        }
        Command::EditReason { reason } => {
            if request.manager_id != Some(actor.id) {
                return Err(CoreError::NotDecider {
                    actor: actor.id,
                    decider: request.manager_id,
                });
            }
            let reason: String = normalize_rejection_reason(Some(&reason))?;
            require_status(from, &[RequestStatus::Rejected], action_name)?;
            (RequestStatus::Rejected, request.manager_id, Some(reason))
        }
    };

    let update: StatusUpdate = StatusUpdate {
        key: request.key(),
        expected_staff_id: request.staff_id,
        expected_created_at: request.created_at,
        expected_status: from,
        expected_manager_id: request.manager_id,
        status,
        manager_id,
        rejection_reason: rejection_reason.clone(),
        updated_at: now,
    };

    let mut new_request: Request = request.clone();
    new_request.status = status;
    new_request.manager_id = manager_id;
    new_request.rejection_reason = rejection_reason.clone();
    new_request.updated_at = now;

    let audit_event: AuditEvent = AuditEvent::new(
        request.key(),
        from,
        status,
        actor,
        Action::new(action_name.to_string(), rejection_reason),
        now,
    );

    Ok(TransitionResult {
        request: new_request,
        update,
        audit_event,
    })
}

fn require_status(
    from: RequestStatus,
    allowed: &[RequestStatus],
    action: &'static str,
) -> Result<(), CoreError> {
    if allowed.contains(&from) {
        Ok(())
    } else {
        Err(CoreError::InvalidTransition { from, action })
    }
}
