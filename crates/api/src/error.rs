// Copyright (C) 2026 Fred Clausen
// Use of this source code is governed by an MIT-style
// license that can be found in the LICENSE file or at
// https://opensource.org/licenses/MIT.

//! Error types for the API layer.

use staffdesk::{CoreError, StoreError};
use staffdesk_domain::{DomainError, RequestStatus};

/// Errors returned by the orchestrator and the other API operations.
///
/// These are distinct from domain/core errors and represent the API contract.
/// Every failure leaves the affected request unchanged.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum ApprovalError {
    /// The actor may not perform this action.
    #[error("Unauthorized: cannot {action}: {reason}")]
    Unauthorized {
        /// The action that was attempted.
        action: String,
        /// Why it was refused.
        reason: String,
    },
    /// Input was missing or malformed.
    #[error("Invalid input for field '{field}': {message}")]
    Validation {
        /// The field that was invalid.
        field: String,
        /// A human-readable description of the error.
        message: String,
    },
    /// The action is not legal from the request's current status.
    #[error("Cannot {action} a request that is {from}")]
    InvalidTransition {
        /// The status the request was in.
        from: RequestStatus,
        /// The action that was attempted.
        action: String,
    },
    /// The stored record changed concurrently.
    #[error("Conflict: {0}")]
    Conflict(String),
    /// A requested resource was not found.
    #[error("{resource} not found: {message}")]
    NotFound {
        /// The type of resource that was not found.
        resource: String,
        /// A human-readable description of what was not found.
        message: String,
    },
    /// A collaborator call failed or timed out.
    #[error("Upstream failure: {0}")]
    Upstream(String),
}

impl ApprovalError {
    /// A short machine-readable name for the error kind.
    #[must_use]
    pub const fn kind(&self) -> &'static str {
        match self {
            Self::Unauthorized { .. } => "unauthorized",
            Self::Validation { .. } => "validation",
            Self::InvalidTransition { .. } => "invalid_transition",
            Self::Conflict(_) => "conflict",
            Self::NotFound { .. } => "not_found",
            Self::Upstream(_) => "upstream",
        }
    }
}

/// Translates a domain error into an API error.
///
/// Domain errors are always caused by bad input, so every variant becomes
/// `Validation` naming the offending field.
#[must_use]
pub fn translate_domain_error(err: DomainError) -> ApprovalError {
    let field: &str = match &err {
        DomainError::EmptyRejectionReason => "reason",
        DomainError::EmptyField { field } => *field,
        DomainError::InvalidDateRange { .. } => "end_date",
        DomainError::InvalidTimeRange { .. } => "end_time",
        DomainError::InvalidCoordinates { .. } => "coordinates",
        DomainError::DateParseError { .. } => "date",
        DomainError::InvalidPermissionLevel(_) | DomainError::UnknownPermission(_) => {
            "permissions"
        }
        DomainError::InvalidRequestKind(_) => "kind",
        DomainError::InvalidRequestStatus(_) => "status",
        DomainError::InvalidRoleName(_) => "name",
    };
    ApprovalError::Validation {
        field: field.to_string(),
        message: err.to_string(),
    }
}

/// Translates a core error into an API error.
///
/// A reason edit by anyone other than the original decider is an
/// authorization failure, not a transition failure.
#[must_use]
pub fn translate_core_error(err: CoreError) -> ApprovalError {
    match err {
        CoreError::DomainViolation(domain_err) => translate_domain_error(domain_err),
        CoreError::InvalidTransition { from, action } => ApprovalError::InvalidTransition {
            from,
            action: action.to_string(),
        },
        CoreError::NotDecider { actor, decider } => ApprovalError::Unauthorized {
            action: String::from("EditReason"),
            reason: decider.map_or_else(
                || String::from("the request has no decider"),
                |decider| format!("user {actor} is not the original decider {decider}"),
            ),
        },
    }
}

/// Translates a store error into an API error.
///
/// Conflicts are propagated unchanged so the caller can report them.
#[must_use]
pub fn translate_store_error(err: StoreError) -> ApprovalError {
    match err {
        StoreError::NotFound(what) => ApprovalError::NotFound {
            resource: String::from("Record"),
            message: what,
        },
        StoreError::Conflict(msg) => ApprovalError::Conflict(msg),
        StoreError::Invalid(msg) => ApprovalError::Validation {
            field: String::from("record"),
            message: msg,
        },
        StoreError::Unavailable(msg) => ApprovalError::Upstream(msg),
    }
}
