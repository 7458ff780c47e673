// Copyright (C) 2026 Fred Clausen
// Use of this source code is governed by an MIT-style
// license that can be found in the LICENSE file or at
// https://opensource.org/licenses/MIT.

//! API boundary for staffdesk.
//!
//! Hosts the approval orchestrator and the operations around it. Callers
//! arrive already authenticated; every mutating operation re-checks
//! authorization against the current role set before touching a store.

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

mod approvers;
mod auth;
mod capabilities;
mod error;
mod orchestrator;
mod request_response;
mod requests;
mod roles;

#[cfg(test)]
mod tests;

pub use approvers::{approvers_for, request_approvers};
pub use auth::{AuthenticatedActor, AuthorizationService};
pub use capabilities::{compute_global_capabilities, compute_request_capabilities};
pub use error::{ApprovalError, translate_core_error, translate_domain_error, translate_store_error};
pub use orchestrator::{
    BulkItem, BulkReport, DecisionOutcome, decide, decide_bulk, decide_bulk_by_keys,
    decide_by_key,
};
pub use request_response::{
    ApproverInfo, ApproversResponse, BulkDecisionRequest, BulkDecisionResponse, BulkItemResponse,
    Capability, CreateRoleRequest, CreateStaffRequest, CreateStaffResponse, DecisionAction,
    DecisionRequest, DecisionResponse, ErrorResponse, GlobalCapabilities, HierarchyLevelEntry,
    ListRequestsResponse, ListRolesResponse, ReorderHierarchyRequest, RequestCapabilities,
    RequestDetailResponse, UpdateRoleRequest,
};
pub use requests::{get_request, list_own_requests, submit_request, withdraw_request};
pub use roles::{create_role, delete_role, list_roles, reorder_hierarchy, update_role};
