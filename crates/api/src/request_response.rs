// Copyright (C) 2026 Fred Clausen
// Use of this source code is governed by an MIT-style
// license that can be found in the LICENSE file or at
// https://opensource.org/licenses/MIT.

//! API request and response data transfer objects.

use serde::{Deserialize, Serialize};
use staffdesk::Command;
use staffdesk_audit::AuditEvent;
use staffdesk_domain::{
    PermissionMatrix, Request, RequestKey, RequestKind, RequestStatus, Role, RoleId, UserId,
};

/// The decision a caller asks for.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum DecisionAction {
    Approve,
    Reject,
    Revert,
    EditReason,
}

/// API request to decide one request.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct DecisionRequest {
    pub action: DecisionAction,
    /// The rejection reason. Required for `reject` and `edit_reason`.
    #[serde(default)]
    pub reason: Option<String>,
}

impl DecisionRequest {
    /// Converts this request into a core command.
    ///
    /// A missing reason becomes an empty one so the state machine reports
    /// it as a validation failure.
    #[must_use]
    pub fn into_command(self) -> Command {
        let reason: String = self.reason.unwrap_or_default();
        match self.action {
            DecisionAction::Approve => Command::Approve,
            DecisionAction::Reject => Command::Reject { reason },
            DecisionAction::Revert => Command::Revert,
            DecisionAction::EditReason => Command::EditReason { reason },
        }
    }
}

/// API request to apply one decision to many requests.
///
/// Targets are addressed by `(kind, id)`; ids are only unique within a kind.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct BulkDecisionRequest {
    pub items: Vec<RequestKey>,
    pub action: DecisionAction,
    /// One reason shared by every item.
    #[serde(default)]
    pub reason: Option<String>,
}

impl BulkDecisionRequest {
    /// Splits this request into its targets and the shared command.
    #[must_use]
    pub fn into_parts(self) -> (Vec<RequestKey>, Command) {
        let command: Command = DecisionRequest {
            action: self.action,
            reason: self.reason,
        }
        .into_command();
        (self.items, command)
    }
}

/// API response for a successful decision.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DecisionResponse {
    /// The request as stored after the decision.
    pub request: Request,
    /// The audit event recorded for the decision.
    pub event: AuditEvent,
    /// Whether the audit/notification collaborator accepted the event.
    pub notified: bool,
}

/// The outcome of one item in a bulk decision.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct BulkItemResponse {
    pub kind: RequestKind,
    pub id: i64,
    pub ok: bool,
    /// The status after the decision, on success.
    pub status: Option<RequestStatus>,
    /// The error kind, on failure.
    pub error_kind: Option<String>,
    /// The error message, on failure.
    pub error: Option<String>,
}

/// API response for a bulk decision.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct BulkDecisionResponse {
    pub succeeded: usize,
    pub failed: usize,
    /// Per-item outcomes, in input order.
    pub items: Vec<BulkItemResponse>,
}

/// API response listing roles.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ListRolesResponse {
    /// Roles ordered by hierarchy level, highest authority first.
    pub roles: Vec<Role>,
}

/// API request to create a role.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CreateRoleRequest {
    /// Machine slug, `[a-z0-9_-]+`.
    pub name: String,
    pub display_name: String,
    pub hierarchy_level: u32,
    #[serde(default)]
    pub permissions: PermissionMatrix,
}

/// API request to replace a role's mutable fields.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct UpdateRoleRequest {
    pub display_name: String,
    pub hierarchy_level: u32,
    pub active: bool,
    pub permissions: PermissionMatrix,
}

/// One entry of a hierarchy reorder.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct HierarchyLevelEntry {
    pub role_id: RoleId,
    pub hierarchy_level: u32,
}

/// API request to set several roles' hierarchy levels at once.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ReorderHierarchyRequest {
    pub levels: Vec<HierarchyLevelEntry>,
}

/// API request to create a staff member.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CreateStaffRequest {
    pub display_name: String,
    pub role_id: RoleId,
}

/// API response for a successful staff creation.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CreateStaffResponse {
    pub staff_id: UserId,
    pub display_name: String,
    pub role_id: RoleId,
}

/// A role able to approve a given target, for labelling.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ApproverInfo {
    pub role_id: RoleId,
    pub name: String,
    pub display_name: String,
    pub hierarchy_level: u32,
}

/// API response describing who can approve a target role's requests.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ApproversResponse {
    /// False when no role qualifies, so the request needs no approver.
    pub needs_approval: bool,
    /// Qualifying roles, highest authority first.
    pub approvers: Vec<ApproverInfo>,
}

/// Represents whether a specific action is permitted.
///
/// This enum provides better type safety than raw booleans and serializes
/// to JSON as true/false for API compatibility.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Capability {
    /// The action is permitted.
    Allowed,
    /// The action is not permitted.
    Denied,
}

impl Capability {
    /// Returns true if the capability is allowed.
    #[must_use]
    pub const fn is_allowed(self) -> bool {
        matches!(self, Self::Allowed)
    }

    /// Creates a capability from a boolean value.
    #[must_use]
    pub const fn from_bool(value: bool) -> Self {
        if value { Self::Allowed } else { Self::Denied }
    }
}

impl Serialize for Capability {
    fn serialize<S>(&self, serializer: S) -> Result<S::Ok, S::Error>
    where
        S: serde::Serializer,
    {
        serializer.serialize_bool(self.is_allowed())
    }
}

impl<'de> Deserialize<'de> for Capability {
    fn deserialize<D>(deserializer: D) -> Result<Self, D::Error>
    where
        D: serde::Deserializer<'de>,
    {
        let b = bool::deserialize(deserializer)?;
        Ok(Self::from_bool(b))
    }
}

/// Role-wide capabilities of an actor.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct GlobalCapabilities {
    pub can_access_portal: Capability,
    pub can_manage_roles: Capability,
    pub can_manage_leave_types: Capability,
    pub can_manage_email_settings: Capability,
    pub can_view_reports: Capability,
}

/// What an actor may do to one specific request.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct RequestCapabilities {
    pub can_approve: Capability,
    pub can_reject: Capability,
    pub can_revert: Capability,
    pub can_edit_reason: Capability,
}

/// API response for a single request with the caller's capabilities on it.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RequestDetailResponse {
    pub request: Request,
    pub capabilities: RequestCapabilities,
}

/// API response listing the caller's own requests, newest first.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ListRequestsResponse {
    pub requests: Vec<Request>,
}

/// Error body returned at the HTTP boundary.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ErrorResponse {
    /// Machine-readable error kind.
    pub kind: String,
    pub error: String,
}
