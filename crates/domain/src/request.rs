// Copyright (C) 2026 Fred Clausen
// Use of this source code is governed by an MIT-style
// license that can be found in the LICENSE file or at
// https://opensource.org/licenses/MIT.

//! Request model.
//!
//! Leave, on-duty and time-off requests share one envelope and one
//! lifecycle. The kind-specific data lives in [`RequestPayload`]; the kind
//! itself is derived from the payload so the two can never disagree.

use crate::error::DomainError;
use crate::role::UserId;
use serde::{Deserialize, Serialize};
use std::str::FromStr;
use time::{Date, OffsetDateTime, Time};

/// The three request kinds. Each kind has its own id space.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum RequestKind {
    Leave,
    OnDuty,
    TimeOff,
}

impl RequestKind {
    pub const ALL: [Self; 3] = [Self::Leave, Self::OnDuty, Self::TimeOff];

    /// Returns the string representation of the kind.
    ///
    /// This is used for persistence, URLs and API serialization.
    #[must_use]
    pub const fn as_str(&self) -> &'static str {
        match self {
            Self::Leave => "leave",
            Self::OnDuty => "on_duty",
            Self::TimeOff => "time_off",
        }
    }
}

impl FromStr for RequestKind {
    type Err = DomainError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "leave" => Ok(Self::Leave),
            "on_duty" => Ok(Self::OnDuty),
            "time_off" => Ok(Self::TimeOff),
            _ => Err(DomainError::InvalidRequestKind(s.to_string())),
        }
    }
}

impl std::fmt::Display for RequestKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Lifecycle status of a request.
///
/// `Pending` is initial. `Approved` and `Rejected` are terminal and can only
/// be left through an explicit revert.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum RequestStatus {
    Pending,
    Approved,
    Rejected,
}

impl RequestStatus {
    /// Returns the string representation of the status.
    #[must_use]
    pub const fn as_str(&self) -> &'static str {
        match self {
            Self::Pending => "Pending",
            Self::Approved => "Approved",
            Self::Rejected => "Rejected",
        }
    }

    /// Returns true if this status records a decision.
    #[must_use]
    pub const fn is_decided(&self) -> bool {
        matches!(self, Self::Approved | Self::Rejected)
    }
}

impl FromStr for RequestStatus {
    type Err = DomainError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "Pending" => Ok(Self::Pending),
            "Approved" => Ok(Self::Approved),
            "Rejected" => Ok(Self::Rejected),
            _ => Err(DomainError::InvalidRequestStatus(s.to_string())),
        }
    }
}

impl std::fmt::Display for RequestStatus {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Identifies a request across kinds.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub struct RequestKey {
    pub kind: RequestKind,
    pub id: i64,
}

impl RequestKey {
    #[must_use]
    pub const fn new(kind: RequestKind, id: i64) -> Self {
        Self { kind, id }
    }
}

impl std::fmt::Display for RequestKey {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}/{}", self.kind, self.id)
    }
}

/// A latitude/longitude pair in decimal degrees.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Coordinates {
    pub latitude: f64,
    pub longitude: f64,
}

impl Coordinates {
    /// Returns true if both components are finite and within bounds.
    #[must_use]
    pub fn is_valid(&self) -> bool {
        self.latitude.is_finite()
            && self.longitude.is_finite()
            && (-90.0..=90.0).contains(&self.latitude)
            && (-180.0..=180.0).contains(&self.longitude)
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct LeavePayload {
    pub leave_type: String,
    pub start_date: Date,
    pub end_date: Date,
    pub reason: String,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct OnDutyPayload {
    pub client_name: String,
    pub location: String,
    pub purpose: String,
    #[serde(with = "time::serde::rfc3339")]
    pub start_time: OffsetDateTime,
    #[serde(default, with = "time::serde::rfc3339::option")]
    pub end_time: Option<OffsetDateTime>,
    pub start_coords: Coordinates,
    #[serde(default)]
    pub end_coords: Option<Coordinates>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TimeOffPayload {
    pub date: Date,
    pub start_time: Time,
    pub end_time: Time,
    pub reason: String,
}

/// Kind-specific request data, tagged by `kind`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum RequestPayload {
    Leave(LeavePayload),
    OnDuty(OnDutyPayload),
    TimeOff(TimeOffPayload),
}

impl RequestPayload {
    #[must_use]
    pub const fn kind(&self) -> RequestKind {
        match self {
            Self::Leave(_) => RequestKind::Leave,
            Self::OnDuty(_) => RequestKind::OnDuty,
            Self::TimeOff(_) => RequestKind::TimeOff,
        }
    }
}

/// A request envelope.
///
/// Invariant: `rejection_reason` is `Some` exactly when `status` is
/// `Rejected`, and `manager_id` is `Some` exactly when the request has
/// been decided. Only the state machine in the core crate changes
/// `status`, `manager_id` and `rejection_reason`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Request {
    pub id: i64,
    pub staff_id: UserId,
    pub status: RequestStatus,
    #[serde(with = "time::serde::rfc3339")]
    pub created_at: OffsetDateTime,
    #[serde(with = "time::serde::rfc3339")]
    pub updated_at: OffsetDateTime,
    pub manager_id: Option<UserId>,
    pub rejection_reason: Option<String>,
    pub payload: RequestPayload,
}

impl Request {
    /// Creates a new `Pending` request owned by `staff_id`.
    #[must_use]
    pub const fn new_pending(
        id: i64,
        staff_id: UserId,
        payload: RequestPayload,
        now: OffsetDateTime,
    ) -> Self {
        Self {
            id,
            staff_id,
            status: RequestStatus::Pending,
            created_at: now,
            updated_at: now,
            manager_id: None,
            rejection_reason: None,
            payload,
        }
    }

    #[must_use]
    pub const fn kind(&self) -> RequestKind {
        self.payload.kind()
    }

    #[must_use]
    pub const fn key(&self) -> RequestKey {
        RequestKey::new(self.kind(), self.id)
    }
}
