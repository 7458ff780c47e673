// Copyright (C) 2026 Fred Clausen
// Use of this source code is governed by an MIT-style
// license that can be found in the LICENSE file or at
// https://opensource.org/licenses/MIT.

//! Authenticated actors and the authorization checks applied to them.
//!
//! Identity is resolved upstream; by the time an actor reaches this crate
//! its id and current role are known. Every check here is a thin wrapper
//! over the permission evaluator that turns a `false` into a typed
//! `Unauthorized` error naming the action.

use staffdesk_audit::Actor;
use staffdesk_domain::{
    GlobalPermission, HierarchicalPermission, PermissionLevel, Request, RequestKind, Role, UserId,
    can_access_portal, can_act_on, has_global_permission, has_hierarchical_permission,
    has_permission_over,
};

use crate::error::ApprovalError;

/// An authenticated caller with the role it currently holds.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AuthenticatedActor {
    /// The caller's user id. Compared against a request's decider.
    pub id: UserId,
    /// The role the caller holds, as resolved through the role registry.
    pub role: Role,
}

impl AuthenticatedActor {
    /// Creates a new authenticated actor.
    #[must_use]
    pub const fn new(id: UserId, role: Role) -> Self {
        Self { id, role }
    }

    /// Converts this actor into the audit representation.
    #[must_use]
    pub fn to_audit_actor(&self) -> Actor {
        Actor::new(self.id, self.role.name.clone())
    }
}

fn unauthorized(action: &str, reason: impl Into<String>) -> ApprovalError {
    ApprovalError::Unauthorized {
        action: action.to_string(),
        reason: reason.into(),
    }
}

/// Authorization service for the portal's mutating and read operations.
pub struct AuthorizationService;

impl AuthorizationService {
    /// Checks that the actor's role grants portal access at all.
    ///
    /// # Errors
    ///
    /// Returns `Unauthorized` if the role is inactive or lacks `access-webapp`.
    pub fn authorize_portal_access(actor: &AuthenticatedActor) -> Result<(), ApprovalError> {
        if can_access_portal(&actor.role) {
            return Ok(());
        }
        let reason: &str = if actor.role.active {
            "role does not grant portal access"
        } else {
            "role is inactive"
        };
        Err(unauthorized("access_portal", reason))
    }

    /// Checks the single gate for every decision on a request.
    ///
    /// # Arguments
    ///
    /// * `actor` - The authenticated actor
    /// * `target` - The role held by the request's owner
    /// * `kind` - The kind of request being decided
    /// * `action` - The action name, for the error message
    ///
    /// # Errors
    ///
    /// Returns `Unauthorized` if the actor ranks below the target or cannot
    /// approve requests of this kind.
    pub fn authorize_decision(
        actor: &AuthenticatedActor,
        target: &Role,
        kind: RequestKind,
        action: &str,
    ) -> Result<(), ApprovalError> {
        if can_act_on(&actor.role, target, kind) {
            return Ok(());
        }
        Err(unauthorized(
            action,
            format!(
                "role '{}' (level {}) cannot act on {kind} requests from role '{}' (level {})",
                actor.role.name, actor.role.hierarchy_level, target.name, target.hierarchy_level
            ),
        ))
    }

    /// Checks whether the actor may read a request.
    ///
    /// Owners may always read their own requests. Anyone else needs either
    /// decision authority over the owner or `view-activities` over them.
    ///
    /// # Errors
    ///
    /// Returns `Unauthorized` otherwise.
    pub fn authorize_view_request(
        actor: &AuthenticatedActor,
        owner_role: Option<&Role>,
        request: &Request,
    ) -> Result<(), ApprovalError> {
        if request.staff_id == actor.id {
            return Ok(());
        }
        if let Some(owner_role) = owner_role
            && (can_act_on(&actor.role, owner_role, request.kind())
                || has_permission_over(
                    &actor.role,
                    HierarchicalPermission::ViewActivities,
                    owner_role,
                ))
        {
            return Ok(());
        }
        Err(unauthorized(
            "view_request",
            format!("no authority over the owner of request {}", request.key()),
        ))
    }

    /// Checks that the actor may administer roles.
    ///
    /// # Errors
    ///
    /// Returns `Unauthorized` without the global `manage-roles` permission.
    pub fn authorize_manage_roles(actor: &AuthenticatedActor) -> Result<(), ApprovalError> {
        if has_global_permission(&actor.role, GlobalPermission::ManageRoles) {
            Ok(())
        } else {
            Err(unauthorized("manage_roles", "requires manage-roles"))
        }
    }

    /// Checks that the actor may create a staff member holding `role`.
    ///
    /// # Errors
    ///
    /// Returns `Unauthorized` unless the actor's `manage-users` permission
    /// reaches the new member's role.
    pub fn authorize_create_staff(
        actor: &AuthenticatedActor,
        role: &Role,
    ) -> Result<(), ApprovalError> {
        if has_permission_over(&actor.role, HierarchicalPermission::ManageUsers, role) {
            Ok(())
        } else {
            Err(unauthorized(
                "create_staff",
                format!("manage-users does not reach role '{}'", role.name),
            ))
        }
    }

    /// Checks that the actor may read the audit trail.
    ///
    /// # Errors
    ///
    /// Returns `Unauthorized` unless `view-reports` is at least `subordinates`.
    pub fn authorize_view_audit(actor: &AuthenticatedActor) -> Result<(), ApprovalError> {
        if has_hierarchical_permission(
            &actor.role,
            HierarchicalPermission::ViewReports,
            PermissionLevel::Subordinates,
        ) {
            Ok(())
        } else {
            Err(unauthorized("view_audit", "requires view-reports"))
        }
    }
}
