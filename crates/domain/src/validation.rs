// Copyright (C) 2026 Fred Clausen
// Use of this source code is governed by an MIT-style
// license that can be found in the LICENSE file or at
// https://opensource.org/licenses/MIT.

use crate::error::DomainError;
use crate::request::{LeavePayload, OnDutyPayload, RequestPayload, TimeOffPayload};
use time::Date;

/// Normalizes a rejection reason.
///
/// # Arguments
///
/// * `reason` - The reason as supplied by the caller, if any
///
/// # Returns
///
/// * `Ok(String)` with surrounding whitespace removed
/// * `Err(DomainError::EmptyRejectionReason)` otherwise
///
/// # Errors
///
/// Returns an error if the reason is absent, empty, or whitespace only.
/// Blank reasons are never coerced into a default.
pub fn normalize_rejection_reason(reason: Option<&str>) -> Result<String, DomainError> {
    match reason.map(str::trim) {
        Some(trimmed) if !trimmed.is_empty() => Ok(trimmed.to_string()),
        _ => Err(DomainError::EmptyRejectionReason),
    }
}

/// Validates a request payload before submission.
///
/// # Errors
///
/// Returns an error if:
/// - A required text field is blank
/// - A date or time range ends before it starts
/// - A coordinate pair is out of bounds
pub fn validate_payload(payload: &RequestPayload) -> Result<(), DomainError> {
    match payload {
        RequestPayload::Leave(leave) => validate_leave(leave),
        RequestPayload::OnDuty(on_duty) => validate_on_duty(on_duty),
        RequestPayload::TimeOff(time_off) => validate_time_off(time_off),
    }
}

fn validate_leave(leave: &LeavePayload) -> Result<(), DomainError> {
    require_text("leave_type", &leave.leave_type)?;
    require_text("reason", &leave.reason)?;
    // Single-day leave has start == end
    if leave.end_date < leave.start_date {
        return Err(DomainError::InvalidDateRange {
            start: leave.start_date,
            end: leave.end_date,
        });
    }
    Ok(())
}

fn validate_on_duty(on_duty: &OnDutyPayload) -> Result<(), DomainError> {
    require_text("client_name", &on_duty.client_name)?;
    require_text("location", &on_duty.location)?;
    require_text("purpose", &on_duty.purpose)?;

    if let Some(end_time) = on_duty.end_time
        && end_time <= on_duty.start_time
    {
        return Err(DomainError::InvalidTimeRange {
            start: on_duty.start_time.to_string(),
            end: end_time.to_string(),
        });
    }

    for coords in std::iter::once(&on_duty.start_coords).chain(on_duty.end_coords.as_ref()) {
        if !coords.is_valid() {
            return Err(DomainError::InvalidCoordinates {
                latitude: coords.latitude.to_string(),
                longitude: coords.longitude.to_string(),
            });
        }
    }
    Ok(())
}

fn validate_time_off(time_off: &TimeOffPayload) -> Result<(), DomainError> {
    require_text("reason", &time_off.reason)?;
    if time_off.end_time <= time_off.start_time {
        return Err(DomainError::InvalidTimeRange {
            start: time_off.start_time.to_string(),
            end: time_off.end_time.to_string(),
        });
    }
    Ok(())
}

fn require_text(field: &'static str, value: &str) -> Result<(), DomainError> {
    if value.trim().is_empty() {
        return Err(DomainError::EmptyField { field });
    }
    Ok(())
}

/// Parses an ISO 8601 calendar date (`YYYY-MM-DD`).
///
/// # Errors
///
/// Returns `DomainError::DateParseError` if the input is not a valid date.
pub fn parse_date(input: &str) -> Result<Date, DomainError> {
    let format = time::macros::format_description!("[year]-[month]-[day]");
    Date::parse(input, format).map_err(|e| DomainError::DateParseError {
        input: input.to_string(),
        error: e.to_string(),
    })
}
