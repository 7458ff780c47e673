// Copyright (C) 2026 Fred Clausen
// Use of this source code is governed by an MIT-style
// license that can be found in the LICENSE file or at
// https://opensource.org/licenses/MIT.

//! Approval orchestration.
//!
//! Sequences one decision as: resolve the owner's role, authorize through
//! the permission evaluator, run the state machine, write the result with
//! a compare-and-set, then notify the audit collaborator. A failure at any
//! step before the write leaves the request untouched. A notification
//! failure after the write does not undo it.
//!
//! Bulk decisions run the same sequence once per item, in input order.
//! They are best effort: one item's failure never stops or rolls back the
//! others.

use staffdesk::{Command, RequestStore, TransitionResult, apply};
use staffdesk_audit::{AuditEvent, AuditSink};
use staffdesk_domain::{Request, RequestKey, RoleId, RoleSet};
use time::OffsetDateTime;
use tracing::{info, warn};

use crate::auth::{AuthenticatedActor, AuthorizationService};
use crate::error::{ApprovalError, translate_core_error, translate_store_error};
use crate::request_response::{BulkDecisionResponse, BulkItemResponse, DecisionResponse};

/// The result of one successful decision.
#[derive(Debug, Clone, PartialEq)]
pub struct DecisionOutcome {
    /// The request as the store now holds it.
    pub request: Request,
    /// The event emitted for this decision.
    pub event: AuditEvent,
    /// False if the audit collaborator failed to accept the event.
    pub notified: bool,
}

impl From<DecisionOutcome> for DecisionResponse {
    fn from(outcome: DecisionOutcome) -> Self {
        Self {
            request: outcome.request,
            event: outcome.event,
            notified: outcome.notified,
        }
    }
}

/// One item of a bulk decision.
#[derive(Debug, Clone, PartialEq)]
pub struct BulkItem {
    pub key: RequestKey,
    pub result: Result<DecisionOutcome, ApprovalError>,
}

/// Per-item outcomes of a bulk decision, in input order.
#[derive(Debug, Clone, PartialEq, Default)]
pub struct BulkReport {
    pub items: Vec<BulkItem>,
}

impl BulkReport {
    #[must_use]
    pub fn succeeded(&self) -> usize {
        self.items.iter().filter(|item| item.result.is_ok()).count()
    }

    #[must_use]
    pub fn failed(&self) -> usize {
        self.items.len() - self.succeeded()
    }

    /// Iterates the failed items with their errors.
    pub fn failures(&self) -> impl Iterator<Item = (RequestKey, &ApprovalError)> {
        self.items
            .iter()
            .filter_map(|item| item.result.as_ref().err().map(|e| (item.key, e)))
    }
}

impl From<BulkReport> for BulkDecisionResponse {
    fn from(report: BulkReport) -> Self {
        let succeeded: usize = report.succeeded();
        let failed: usize = report.failed();
        let items: Vec<BulkItemResponse> = report
            .items
            .into_iter()
            .map(|item| match item.result {
                Ok(outcome) => BulkItemResponse {
                    kind: item.key.kind,
                    id: item.key.id,
                    ok: true,
                    status: Some(outcome.request.status),
                    error_kind: None,
                    error: None,
                },
                Err(e) => BulkItemResponse {
                    kind: item.key.kind,
                    id: item.key.id,
                    ok: false,
                    status: None,
                    error_kind: Some(e.kind().to_string()),
                    error: Some(e.to_string()),
                },
            })
            .collect();
        Self {
            succeeded,
            failed,
            items,
        }
    }
}

/// Decides one request.
///
/// # Arguments
///
/// * `store` - The request store; performs the compare-and-set write
/// * `sink` - The audit/notification collaborator
/// * `roles` - The current role set from the registry
/// * `actor` - The authenticated actor
/// * `request` - The request as the caller last read it
/// * `command` - The decision to apply
/// * `now` - The decision time
///
/// # Errors
///
/// Returns:
/// - `NotFound` if the owner no longer exists
/// - `Unauthorized` if the actor fails the decision gate, or edits a reason
///   it did not record
/// - `Validation` for a blank rejection reason
/// - `InvalidTransition` if the action is illegal from the current status
/// - `Conflict` if the stored request changed since `request` was read
/// - `Upstream` if the store fails
pub fn decide(
    store: &mut dyn RequestStore,
    sink: &mut dyn AuditSink,
    roles: &RoleSet,
    actor: &AuthenticatedActor,
    request: &Request,
    command: Command,
    now: OffsetDateTime,
) -> Result<DecisionOutcome, ApprovalError> {
    let key: RequestKey = request.key();
    let action: &'static str = command.name();

    let owner_role_id: RoleId = store
        .staff_role_id(request.staff_id)
        .map_err(translate_store_error)?
        .ok_or_else(|| ApprovalError::NotFound {
            resource: String::from("Staff"),
            message: format!("owner {} of request {key} does not exist", request.staff_id),
        })?;
    let owner_role = roles
        .get(owner_role_id)
        .ok_or_else(|| ApprovalError::Unauthorized {
            action: action.to_string(),
            reason: format!("role {owner_role_id} of the request owner is unknown"),
        })?;

    AuthorizationService::authorize_decision(actor, owner_role, request.kind(), action)?;

    let result: TransitionResult =
        apply(request, command, actor.to_audit_actor(), now).map_err(translate_core_error)?;

    let stored: Request = store
        .apply_status_update(&result.update)
        .map_err(translate_store_error)?;

    let notified: bool = match sink.emit(&result.audit_event) {
        Ok(()) => true,
        Err(e) => {
            warn!(request = %key, error = %e, "Decision stored but audit delivery failed");
            false
        }
    };

    info!(
        request_id = key.id,
        kind = key.kind.as_str(),
        actor_id = actor.id.0,
        action,
        from = result.audit_event.from_status.as_str(),
        to = stored.status.as_str(),
        "Request decided"
    );

    Ok(DecisionOutcome {
        request: stored,
        event: result.audit_event,
        notified,
    })
}

/// Loads a request by `(kind, id)` and decides it.
///
/// # Errors
///
/// Returns `NotFound` if no request has this key, otherwise as [`decide`].
pub fn decide_by_key(
    store: &mut dyn RequestStore,
    sink: &mut dyn AuditSink,
    roles: &RoleSet,
    actor: &AuthenticatedActor,
    key: RequestKey,
    command: Command,
    now: OffsetDateTime,
) -> Result<DecisionOutcome, ApprovalError> {
    let request: Request = store
        .find_request(key)
        .map_err(translate_store_error)?
        .ok_or_else(|| ApprovalError::NotFound {
            resource: String::from("Request"),
            message: format!("request {key} does not exist"),
        })?;
    decide(store, sink, roles, actor, &request, command, now)
}

/// Applies one decision to each request in turn.
///
/// Every request is authorized and transitioned independently against the
/// state the caller supplied. Failures are recorded against their item.
#[must_use]
pub fn decide_bulk(
    store: &mut dyn RequestStore,
    sink: &mut dyn AuditSink,
    roles: &RoleSet,
    actor: &AuthenticatedActor,
    requests: &[Request],
    command: &Command,
    now: OffsetDateTime,
) -> BulkReport {
    let items: Vec<BulkItem> = requests
        .iter()
        .map(|request| BulkItem {
            key: request.key(),
            result: decide(store, sink, roles, actor, request, command.clone(), now),
        })
        .collect();
    finish_bulk(actor, command, items)
}

/// Applies one decision to each addressed request in turn, loading each
/// by key first.
#[must_use]
pub fn decide_bulk_by_keys(
    store: &mut dyn RequestStore,
    sink: &mut dyn AuditSink,
    roles: &RoleSet,
    actor: &AuthenticatedActor,
    keys: &[RequestKey],
    command: &Command,
    now: OffsetDateTime,
) -> BulkReport {
    let items: Vec<BulkItem> = keys
        .iter()
        .map(|&key| BulkItem {
            key,
            result: decide_by_key(store, sink, roles, actor, key, command.clone(), now),
        })
        .collect();
    finish_bulk(actor, command, items)
}

fn finish_bulk(actor: &AuthenticatedActor, command: &Command, items: Vec<BulkItem>) -> BulkReport {
    let report: BulkReport = BulkReport { items };
    info!(
        actor_id = actor.id.0,
        action = command.name(),
        succeeded = report.succeeded(),
        failed = report.failed(),
        "Bulk decision finished"
    );
    report
}
