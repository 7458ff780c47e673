// Copyright (C) 2026 Fred Clausen
// Use of this source code is governed by an MIT-style
// license that can be found in the LICENSE file or at
// https://opensource.org/licenses/MIT.

use staffdesk_domain::{DomainError, RequestStatus, UserId};

/// Errors that can occur during state transitions.
///
/// A transition that fails performs no mutation.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum CoreError {
    /// A domain rule was violated.
    DomainViolation(DomainError),
    /// The action is not legal from the request's current status.
    InvalidTransition {
        /// The status the request was in.
        from: RequestStatus,
        /// The attempted action.
        action: &'static str,
    },
    /// Someone other than the original decider tried to edit the reason.
    NotDecider {
        /// The actor attempting the edit.
        actor: UserId,
        /// The user recorded as the decider, if any.
        decider: Option<UserId>,
    },
}

impl std::fmt::Display for CoreError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::DomainViolation(err) => write!(f, "Domain violation: {err}"),
            Self::InvalidTransition { from, action } => {
                write!(f, "Cannot {action} a request that is {from}")
            }
            Self::NotDecider { actor, decider } => match decider {
                Some(decider) => write!(
                    f,
                    "User {actor} cannot edit a reason recorded by user {decider}"
                ),
                None => write!(f, "User {actor} cannot edit a request that has no decider"),
            },
        }
    }
}

impl std::error::Error for CoreError {}

impl From<DomainError> for CoreError {
    fn from(err: DomainError) -> Self {
        Self::DomainViolation(err)
    }
}
