// Copyright (C) 2026 Fred Clausen
// Use of this source code is governed by an MIT-style
// license that can be found in the LICENSE file or at
// https://opensource.org/licenses/MIT.

//! Owner-side request operations: submit, list, read, withdraw.

use staffdesk::RequestStore;
use staffdesk_domain::{
    Request, RequestKey, RequestPayload, RequestStatus, RoleSet, validate_payload,
};
use time::OffsetDateTime;
use tracing::info;

use crate::auth::{AuthenticatedActor, AuthorizationService};
use crate::capabilities::compute_request_capabilities;
use crate::error::{ApprovalError, translate_domain_error, translate_store_error};
use crate::request_response::{ListRequestsResponse, RequestDetailResponse};

/// Submits a new request owned by the actor. It starts `Pending`.
///
/// # Errors
///
/// Returns `Validation` if the payload is malformed and `Upstream` if the
/// store fails.
pub fn submit_request(
    store: &mut dyn RequestStore,
    actor: &AuthenticatedActor,
    payload: &RequestPayload,
    now: OffsetDateTime,
) -> Result<Request, ApprovalError> {
    validate_payload(payload).map_err(translate_domain_error)?;

    let request: Request = store
        .insert_request(actor.id, payload, now)
        .map_err(translate_store_error)?;

    info!(
        request_id = request.id,
        kind = request.kind().as_str(),
        staff_id = actor.id.0,
        "Request submitted"
    );
    Ok(request)
}

/// Lists the actor's own requests, optionally narrowed to one status.
///
/// # Errors
///
/// Returns `Upstream` if the store fails.
pub fn list_own_requests(
    store: &mut dyn RequestStore,
    actor: &AuthenticatedActor,
    status: Option<RequestStatus>,
) -> Result<ListRequestsResponse, ApprovalError> {
    let requests: Vec<Request> = store
        .list_own_requests(actor.id, status)
        .map_err(translate_store_error)?;
    Ok(ListRequestsResponse { requests })
}

/// Reads one request with the actor's capabilities on it.
///
/// # Errors
///
/// Returns `NotFound` for an unknown key and `Unauthorized` if the actor
/// neither owns the request nor has authority over its owner.
pub fn get_request(
    store: &mut dyn RequestStore,
    roles: &RoleSet,
    actor: &AuthenticatedActor,
    key: RequestKey,
) -> Result<RequestDetailResponse, ApprovalError> {
    let request: Request = store
        .find_request(key)
        .map_err(translate_store_error)?
        .ok_or_else(|| ApprovalError::NotFound {
            resource: String::from("Request"),
            message: format!("request {key} does not exist"),
        })?;
    let owner_role = store
        .staff_role_id(request.staff_id)
        .map_err(translate_store_error)?
        .and_then(|id| roles.get(id));

    AuthorizationService::authorize_view_request(actor, owner_role, &request)?;
    let capabilities = compute_request_capabilities(actor, owner_role, &request);
    Ok(RequestDetailResponse {
        request,
        capabilities,
    })
}

/// Withdraws (deletes) one of the actor's own requests while it is pending.
///
/// # Errors
///
/// Returns `NotFound` if the actor has no request with this key and
/// `Conflict` if it has already been decided.
pub fn withdraw_request(
    store: &mut dyn RequestStore,
    actor: &AuthenticatedActor,
    key: RequestKey,
) -> Result<(), ApprovalError> {
    store
        .delete_pending_request(key, actor.id)
        .map_err(translate_store_error)?;
    info!(request = %key, staff_id = actor.id.0, "Request withdrawn");
    Ok(())
}
