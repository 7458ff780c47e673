// Copyright (C) 2026 Fred Clausen
// Use of this source code is governed by an MIT-style
// license that can be found in the LICENSE file or at
// https://opensource.org/licenses/MIT.

//! Capability computation for authorization-aware UI gating.
//!
//! Capabilities expose what actions an actor is permitted to perform
//! without leaking domain internals. They are advisory only and do not
//! replace the checks the orchestrator performs.

use staffdesk_domain::{
    GlobalPermission, HierarchicalPermission, PermissionLevel, Request, RequestStatus, Role,
    can_access_portal, can_act_on, has_global_permission, has_hierarchical_permission,
};

use crate::auth::AuthenticatedActor;
use crate::request_response::{Capability, GlobalCapabilities, RequestCapabilities};

/// Computes role-wide capabilities for an actor.
///
/// An actor without portal access has no capabilities at all.
#[must_use]
pub fn compute_global_capabilities(actor: &AuthenticatedActor) -> GlobalCapabilities {
    let role: &Role = &actor.role;
    let portal: bool = can_access_portal(role);
    let global = |permission: GlobalPermission| -> Capability {
        Capability::from_bool(portal && has_global_permission(role, permission))
    };

    GlobalCapabilities {
        can_access_portal: Capability::from_bool(portal),
        can_manage_roles: global(GlobalPermission::ManageRoles),
        can_manage_leave_types: global(GlobalPermission::ManageLeaveTypes),
        can_manage_email_settings: global(GlobalPermission::ManageEmailSettings),
        can_view_reports: Capability::from_bool(
            portal
                && has_hierarchical_permission(
                    role,
                    HierarchicalPermission::ViewReports,
                    PermissionLevel::Subordinates,
                ),
        ),
    }
}

/// Computes what an actor may do to one request.
///
/// # Arguments
///
/// * `actor` - The authenticated actor
/// * `owner_role` - The role held by the request's owner, if known
/// * `request` - The request being displayed
#[must_use]
pub fn compute_request_capabilities(
    actor: &AuthenticatedActor,
    owner_role: Option<&Role>,
    request: &Request,
) -> RequestCapabilities {
    let may_act: bool = can_access_portal(&actor.role)
        && owner_role.is_some_and(|owner| can_act_on(&actor.role, owner, request.kind()));
    let pending: bool = request.status == RequestStatus::Pending;

    RequestCapabilities {
        can_approve: Capability::from_bool(may_act && pending),
        can_reject: Capability::from_bool(may_act && pending),
        can_revert: Capability::from_bool(may_act && request.status.is_decided()),
        can_edit_reason: Capability::from_bool(
            may_act
                && request.status == RequestStatus::Rejected
                && request.manager_id == Some(actor.id),
        ),
    }
}
