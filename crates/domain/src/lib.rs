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
    clippy::all,
    clippy::suspicious,
    clippy::complexity,
    clippy::perf,
    clippy::unwrap_used,
    clippy::expect_used
)]

mod error;
mod evaluator;
mod permission;
mod request;
mod role;
mod validation;

#[cfg(test)]
mod tests;

pub use error::DomainError;
pub use evaluator::{
    approval_permission_for, can_access_portal, can_act_on, can_approve_kind,
    has_global_permission, has_hierarchical_permission, has_permission_over,
    is_higher_or_equal_authority, resolve_approvers,
};
pub use permission::{GlobalPermission, HierarchicalPermission, PermissionLevel, PermissionMatrix};
pub use request::{
    Coordinates, LeavePayload, OnDutyPayload, Request, RequestKey, RequestKind, RequestPayload,
    RequestStatus, TimeOffPayload,
};
pub use role::{Role, RoleId, RoleSet, User, UserId, validate_role_name};
pub use validation::{normalize_rejection_reason, parse_date, validate_payload};
