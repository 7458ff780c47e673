// Copyright (C) 2026 Fred Clausen
// Use of this source code is governed by an MIT-style
// license that can be found in the LICENSE file or at
// https://opensource.org/licenses/MIT.

/// A decision on a request, expressed as data only.
///
/// Commands are the only way to change a request's status.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Command {
    /// Approve a pending request.
    Approve,
    /// Reject a pending request with a reason.
    Reject {
        /// The rejection reason. Must be non-blank once trimmed.
        reason: String,
    },
    /// Return a decided request to pending, undoing the decision.
    Revert,
    /// Replace the reason on a rejected request. Only the original decider may do this.
    EditReason {
        /// The replacement reason. Must be non-blank once trimmed.
        reason: String,
    },
}

impl Command {
    /// Returns the action name recorded in audit events.
    #[must_use]
    pub const fn name(&self) -> &'static str {
        match self {
            Self::Approve => "Approve",
            Self::Reject { .. } => "Reject",
            Self::Revert => "Revert",
            Self::EditReason { .. } => "EditReason",
        }
    }
}
