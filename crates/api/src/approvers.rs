// Copyright (C) 2026 Fred Clausen
// Use of this source code is governed by an MIT-style
// license that can be found in the LICENSE file or at
// https://opensource.org/licenses/MIT.

//! "Who can approve this" labelling.

use staffdesk::RequestStore;
use staffdesk_domain::{Request, RequestKey, RoleId, RoleSet, resolve_approvers};

use crate::auth::{AuthenticatedActor, AuthorizationService};
use crate::error::{ApprovalError, translate_store_error};
use crate::request_response::{ApproverInfo, ApproversResponse};

/// Lists the roles able to approve requests from holders of `target_role_id`.
#[must_use]
pub fn approvers_for(roles: &RoleSet, target_role_id: RoleId) -> ApproversResponse {
    let approvers: Vec<ApproverInfo> = resolve_approvers(roles, target_role_id)
        .into_iter()
        .map(|role| ApproverInfo {
            role_id: role.id,
            name: role.name.clone(),
            display_name: role.display_name.clone(),
            hierarchy_level: role.hierarchy_level,
        })
        .collect();

    ApproversResponse {
        needs_approval: !approvers.is_empty(),
        approvers,
    }
}

/// Lists the roles able to approve one stored request.
///
/// # Errors
///
/// Returns `NotFound` if the request or its owner does not exist, and
/// `Unauthorized` if the actor may not view the request.
pub fn request_approvers(
    store: &mut dyn RequestStore,
    roles: &RoleSet,
    actor: &AuthenticatedActor,
    key: RequestKey,
) -> Result<ApproversResponse, ApprovalError> {
    let request: Request = store
        .find_request(key)
        .map_err(translate_store_error)?
        .ok_or_else(|| ApprovalError::NotFound {
            resource: String::from("Request"),
            message: format!("request {key} does not exist"),
        })?;
    let owner_role_id: RoleId = store
        .staff_role_id(request.staff_id)
        .map_err(translate_store_error)?
        .ok_or_else(|| ApprovalError::NotFound {
            resource: String::from("Staff"),
            message: format!("owner {} of request {key} does not exist", request.staff_id),
        })?;

    AuthorizationService::authorize_view_request(actor, roles.get(owner_role_id), &request)?;
    Ok(approvers_for(roles, owner_role_id))
}
