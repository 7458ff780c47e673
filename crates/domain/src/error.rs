// Copyright (C) 2026 Fred Clausen
// Use of this source code is governed by an MIT-style
// license that can be found in the LICENSE file or at
// https://opensource.org/licenses/MIT.

/// Errors that can occur during domain validation.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum DomainError {
    /// A rejection reason was missing, empty, or whitespace only.
    EmptyRejectionReason,
    /// A required free-text field was empty.
    EmptyField {
        /// The name of the field.
        field: &'static str,
    },
    /// A date range ends before it starts.
    InvalidDateRange {
        /// The start of the range.
        start: time::Date,
        /// The end of the range.
        end: time::Date,
    },
    /// A time range ends before (or at) its start.
    InvalidTimeRange {
        /// The start of the range.
        start: String,
        /// The end of the range.
        end: String,
    },
    /// A coordinate pair is outside the valid latitude/longitude bounds.
    InvalidCoordinates {
        /// The latitude value.
        latitude: String,
        /// The longitude value.
        longitude: String,
    },
    /// Failed to parse a date or timestamp from a string.
    DateParseError {
        /// The invalid input.
        input: String,
        /// The parsing error message.
        error: String,
    },
    /// Permission level string is not one of `none`, `subordinates`, `all`.
    InvalidPermissionLevel(String),
    /// Permission name is not a known hierarchical or global permission.
    UnknownPermission(String),
    /// Request kind string is not one of `leave`, `on_duty`, `time_off`.
    InvalidRequestKind(String),
    /// Request status string is not one of `Pending`, `Approved`, `Rejected`.
    InvalidRequestStatus(String),
    /// Role name slug is empty or contains characters outside `[a-z0-9_-]`.
    InvalidRoleName(String),
}

impl std::fmt::Display for DomainError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::EmptyRejectionReason => {
                write!(f, "A rejection reason is required and cannot be blank")
            }
            Self::EmptyField { field } => write!(f, "Field '{field}' cannot be empty"),
            Self::InvalidDateRange { start, end } => {
                write!(f, "Invalid date range: end date {end} is before start date {start}")
            }
            Self::InvalidTimeRange { start, end } => {
                write!(f, "Invalid time range: end {end} is not after start {start}")
            }
            Self::InvalidCoordinates {
                latitude,
                longitude,
            } => {
                write!(f, "Invalid coordinates: ({latitude}, {longitude})")
            }
            Self::DateParseError { input, error } => {
                write!(f, "Failed to parse date '{input}': {error}")
            }
            Self::InvalidPermissionLevel(value) => write!(
                f,
                "Invalid permission level '{value}'. Must be one of none, subordinates, all"
            ),
            Self::UnknownPermission(name) => write!(f, "Unknown permission: '{name}'"),
            Self::InvalidRequestKind(value) => write!(
                f,
                "Invalid request kind '{value}'. Must be one of leave, on_duty, time_off"
            ),
            Self::InvalidRequestStatus(value) => write!(
                f,
                "Invalid request status '{value}'. Must be one of Pending, Approved, Rejected"
            ),
            Self::InvalidRoleName(value) => write!(f, "Invalid role name: '{value}'"),
        }
    }
}

impl std::error::Error for DomainError {}
