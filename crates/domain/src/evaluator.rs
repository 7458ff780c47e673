// Copyright (C) 2026 Fred Clausen
// Use of this source code is governed by an MIT-style
// license that can be found in the LICENSE file or at
// https://opensource.org/licenses/MIT.

//! Permission evaluation.
//!
//! Pure functions answering authorization questions from a resolved
//! [`Role`]. Nothing here performs I/O or consults ambient state; callers
//! resolve roles through the registry first.
//!
//! Authority is derived from hierarchy level alone. A role may act on any
//! target whose level is equal to or numerically greater than its own;
//! there is no direct-manager linkage.

use crate::permission::{GlobalPermission, HierarchicalPermission, PermissionLevel};
use crate::request::RequestKind;
use crate::role::{Role, RoleId, RoleSet};

/// Returns true if the role's value for `permission` is at least `level`.
///
/// `All` satisfies every check; `Subordinates` satisfies `Subordinates`
/// and `None` checks.
#[must_use]
pub fn has_hierarchical_permission(
    role: &Role,
    permission: HierarchicalPermission,
    level: PermissionLevel,
) -> bool {
    role.permissions.level(permission) >= level
}

/// Returns the role's flag for a global permission.
#[must_use]
pub const fn has_global_permission(role: &Role, permission: GlobalPermission) -> bool {
    role.permissions.flag(permission)
}

/// Returns true if holders of `role` may use the portal at all.
///
/// Requires an active role with the explicit `access-webapp` flag. Approval
/// powers do not imply portal access.
#[must_use]
pub const fn can_access_portal(role: &Role) -> bool {
    role.active && role.permissions.access_webapp
}

/// Returns true if `a` ranks at or above `b`.
///
/// Lower hierarchy level means higher authority; equal levels are peers.
#[must_use]
pub const fn is_higher_or_equal_authority(a: &Role, b: &Role) -> bool {
    a.hierarchy_level <= b.hierarchy_level
}

/// Returns the hierarchical permission that gates approval of `kind`.
///
/// On-duty and time-off requests share the on-duty approval permission.
#[must_use]
pub const fn approval_permission_for(kind: RequestKind) -> HierarchicalPermission {
    match kind {
        RequestKind::Leave => HierarchicalPermission::ApproveLeave,
        RequestKind::OnDuty | RequestKind::TimeOff => HierarchicalPermission::ApproveOnDuty,
    }
}

/// Returns true if the role holds any approval power over `kind`.
#[must_use]
pub fn can_approve_kind(role: &Role, kind: RequestKind) -> bool {
    has_hierarchical_permission(role, approval_permission_for(kind), PermissionLevel::Subordinates)
}

/// Returns every role that may approve requests from holders of
/// `target_role_id`.
///
/// A role qualifies if it ranks at or above the target and holds at least
/// one approval permission above `none`. The result is ordered by
/// hierarchy level ascending, then id. An unknown target yields no
/// approvers.
#[must_use]
pub fn resolve_approvers(roles: &RoleSet, target_role_id: RoleId) -> Vec<&Role> {
    let Some(target) = roles.get(target_role_id) else {
        return Vec::new();
    };
    roles
        .iter()
        .filter(|role| {
            is_higher_or_equal_authority(role, target) && role.permissions.has_any_approval()
        })
        .collect()
}

/// The authorization gate for every mutating action on a request.
///
/// `actor` may act on a request of `kind` owned by a holder of `target` iff
/// it ranks at or above `target` and can approve `kind`.
#[must_use]
pub fn can_act_on(actor: &Role, target: &Role, kind: RequestKind) -> bool {
    is_higher_or_equal_authority(actor, target) && can_approve_kind(actor, kind)
}

/// Scoped check for a hierarchical permission against a target role.
///
/// `All` always applies, `Subordinates` applies to same-or-lower
/// authority targets, `None` never applies.
#[must_use]
pub fn has_permission_over(role: &Role, permission: HierarchicalPermission, target: &Role) -> bool {
    match role.permissions.level(permission) {
        PermissionLevel::All => true,
        PermissionLevel::Subordinates => is_higher_or_equal_authority(role, target),
        PermissionLevel::None => false,
    }
}
