// Copyright (C) 2026 Fred Clausen
// Use of this source code is governed by an MIT-style
// license that can be found in the LICENSE file or at
// https://opensource.org/licenses/MIT.

//! Row types and their mapping onto domain values.
//!
//! Booleans are stored as `0`/`1` integers, permission levels and statuses
//! by their string forms, and timestamps as RFC 3339 text.

use crate::diesel_schema::{audit_events, requests, roles};
use crate::error::PersistenceError;
use diesel::prelude::*;
use serde::{Deserialize, Serialize};
use staffdesk_audit::{Action, Actor, AuditEvent};
use staffdesk_domain::{
    PermissionMatrix, Request, RequestKey, RequestKind, RequestPayload, RequestStatus, Role,
    RoleId, UserId,
};
use time::OffsetDateTime;
use time::format_description::well_known::Rfc3339;

#[derive(Debug, Clone, Queryable, Selectable)]
#[diesel(table_name = roles)]
pub struct RoleRow {
    pub role_id: i64,
    pub name: String,
    pub display_name: String,
    pub hierarchy_level: i32,
    pub is_active: i32,
    pub approve_leave: String,
    pub approve_on_duty: String,
    pub manage_users: String,
    pub view_users: String,
    pub view_reports: String,
    pub manage_active_on_duty: String,
    pub manage_schedule: String,
    pub view_activities: String,
    pub manage_leave_types: i32,
    pub access_webapp: i32,
    pub manage_roles: i32,
    pub manage_email_settings: i32,
}

/// Column values shared by role inserts and updates.
#[derive(Debug, Clone, Insertable, AsChangeset)]
#[diesel(table_name = roles)]
pub struct RoleChangeset {
    pub name: String,
    pub display_name: String,
    pub hierarchy_level: i32,
    pub is_active: i32,
    pub approve_leave: String,
    pub approve_on_duty: String,
    pub manage_users: String,
    pub view_users: String,
    pub view_reports: String,
    pub manage_active_on_duty: String,
    pub manage_schedule: String,
    pub view_activities: String,
    pub manage_leave_types: i32,
    pub access_webapp: i32,
    pub manage_roles: i32,
    pub manage_email_settings: i32,
}

impl RoleChangeset {
    /// Builds the stored form of a role's fields.
    ///
    /// # Errors
    ///
    /// Returns `PersistenceError::InvalidData` if the hierarchy level does not fit the column.
    pub fn new(
        name: &str,
        display_name: &str,
        hierarchy_level: u32,
        active: bool,
        permissions: &PermissionMatrix,
    ) -> Result<Self, PersistenceError> {
        Ok(Self {
            name: name.to_string(),
            display_name: display_name.to_string(),
            hierarchy_level: level_to_column(hierarchy_level)?,
            is_active: i32::from(active),
            approve_leave: permissions.approve_leave.as_str().to_string(),
            approve_on_duty: permissions.approve_on_duty.as_str().to_string(),
            manage_users: permissions.manage_users.as_str().to_string(),
            view_users: permissions.view_users.as_str().to_string(),
            view_reports: permissions.view_reports.as_str().to_string(),
            manage_active_on_duty: permissions.manage_active_on_duty.as_str().to_string(),
            manage_schedule: permissions.manage_schedule.as_str().to_string(),
            view_activities: permissions.view_activities.as_str().to_string(),
            manage_leave_types: i32::from(permissions.manage_leave_types),
            access_webapp: i32::from(permissions.access_webapp),
            manage_roles: i32::from(permissions.manage_roles),
            manage_email_settings: i32::from(permissions.manage_email_settings),
        })
    }
}

impl TryFrom<RoleRow> for Role {
    type Error = PersistenceError;

    fn try_from(row: RoleRow) -> Result<Self, Self::Error> {
        let permissions: PermissionMatrix = PermissionMatrix {
            approve_leave: row.approve_leave.parse()?,
            approve_on_duty: row.approve_on_duty.parse()?,
            manage_users: row.manage_users.parse()?,
            view_users: row.view_users.parse()?,
            view_reports: row.view_reports.parse()?,
            manage_active_on_duty: row.manage_active_on_duty.parse()?,
            manage_schedule: row.manage_schedule.parse()?,
            view_activities: row.view_activities.parse()?,
            manage_leave_types: row.manage_leave_types != 0,
            access_webapp: row.access_webapp != 0,
            manage_roles: row.manage_roles != 0,
            manage_email_settings: row.manage_email_settings != 0,
        };
        let hierarchy_level: u32 = u32::try_from(row.hierarchy_level).map_err(|_| {
            PersistenceError::InvalidData(format!(
                "role {} has negative hierarchy level {}",
                row.role_id, row.hierarchy_level
            ))
        })?;

        Ok(Self {
            id: RoleId(row.role_id),
            name: row.name,
            display_name: row.display_name,
            hierarchy_level,
            active: row.is_active != 0,
            permissions,
        })
    }
}

/// Converts a hierarchy level to its column type.
///
/// # Errors
///
/// Returns `PersistenceError::InvalidData` if the level exceeds `i32::MAX`.
pub fn level_to_column(level: u32) -> Result<i32, PersistenceError> {
    i32::try_from(level)
        .map_err(|_| PersistenceError::InvalidData(format!("hierarchy level {level} too large")))
}

#[derive(Debug, Clone, Queryable, Selectable, Insertable)]
#[diesel(table_name = requests)]
pub struct RequestRow {
    pub kind: String,
    pub request_id: i64,
    pub staff_id: i64,
    pub status: String,
    pub payload_json: String,
    pub manager_id: Option<i64>,
    pub rejection_reason: Option<String>,
    pub created_at: String,
    pub updated_at: String,
}

impl RequestRow {
    /// Builds the stored form of a request.
    ///
    /// # Errors
    ///
    /// Returns an error if the payload or timestamps cannot be serialized.
    pub fn from_request(request: &Request) -> Result<Self, PersistenceError> {
        Ok(Self {
            kind: request.kind().as_str().to_string(),
            request_id: request.id,
            staff_id: request.staff_id.0,
            status: request.status.as_str().to_string(),
            payload_json: serde_json::to_string(&request.payload)?,
            manager_id: request.manager_id.map(|id| id.0),
            rejection_reason: request.rejection_reason.clone(),
            created_at: format_timestamp(request.created_at)?,
            updated_at: format_timestamp(request.updated_at)?,
        })
    }
}

impl TryFrom<RequestRow> for Request {
    type Error = PersistenceError;

    fn try_from(row: RequestRow) -> Result<Self, Self::Error> {
        let payload: RequestPayload = serde_json::from_str(&row.payload_json)?;
        if payload.kind().as_str() != row.kind {
            return Err(PersistenceError::InvalidData(format!(
                "request {}/{} carries a {} payload",
                row.kind,
                row.request_id,
                payload.kind()
            )));
        }
        let status: RequestStatus = row.status.parse()?;

        Ok(Self {
            id: row.request_id,
            staff_id: UserId(row.staff_id),
            status,
            created_at: parse_timestamp(&row.created_at)?,
            updated_at: parse_timestamp(&row.updated_at)?,
            manager_id: row.manager_id.map(UserId),
            rejection_reason: row.rejection_reason,
            payload,
        })
    }
}

#[derive(Debug, Clone, Queryable, Selectable)]
#[diesel(table_name = audit_events)]
pub struct AuditEventRow {
    pub event_id: i64,
    pub kind: String,
    pub request_id: i64,
    pub from_status: String,
    pub to_status: String,
    pub actor_id: i64,
    pub actor_role: String,
    pub action_name: String,
    pub action_details: Option<String>,
    pub occurred_at: String,
}

#[derive(Debug, Clone, Insertable)]
#[diesel(table_name = audit_events)]
pub struct NewAuditEventRow {
    pub kind: String,
    pub request_id: i64,
    pub from_status: String,
    pub to_status: String,
    pub actor_id: i64,
    pub actor_role: String,
    pub action_name: String,
    pub action_details: Option<String>,
    pub occurred_at: String,
}

impl NewAuditEventRow {
    /// Builds the stored form of an audit event.
    ///
    /// # Errors
    ///
    /// Returns an error if the timestamp cannot be formatted.
    pub fn from_event(event: &AuditEvent) -> Result<Self, PersistenceError> {
        Ok(Self {
            kind: event.request.kind.as_str().to_string(),
            request_id: event.request.id,
            from_status: event.from_status.as_str().to_string(),
            to_status: event.to_status.as_str().to_string(),
            actor_id: event.actor.id.0,
            actor_role: event.actor.role_name.clone(),
            action_name: event.action.name.clone(),
            action_details: event.action.details.clone(),
            occurred_at: format_timestamp(event.timestamp)?,
        })
    }
}

impl TryFrom<AuditEventRow> for AuditEvent {
    type Error = PersistenceError;

    fn try_from(row: AuditEventRow) -> Result<Self, Self::Error> {
        let kind: RequestKind = row.kind.parse()?;
        Ok(Self::new(
            RequestKey::new(kind, row.request_id),
            row.from_status.parse::<RequestStatus>()?,
            row.to_status.parse::<RequestStatus>()?,
            Actor::new(UserId(row.actor_id), row.actor_role),
            Action::new(row.action_name, row.action_details),
            parse_timestamp(&row.occurred_at)?,
        ))
    }
}

/// Formats a timestamp for storage.
///
/// # Errors
///
/// Returns an error if the timestamp cannot be represented in RFC 3339.
pub fn format_timestamp(at: OffsetDateTime) -> Result<String, PersistenceError> {
    Ok(at.format(&Rfc3339)?)
}

/// Parses a stored timestamp.
///
/// # Errors
///
/// Returns an error if the text is not RFC 3339.
pub fn parse_timestamp(text: &str) -> Result<OffsetDateTime, PersistenceError> {
    Ok(OffsetDateTime::parse(text, &Rfc3339)?)
}

/// A staff member as stored.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct StaffData {
    pub staff_id: i64,
    pub display_name: String,
    pub role_id: i64,
}
