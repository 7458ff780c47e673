// Copyright (C) 2026 Fred Clausen
// Use of this source code is governed by an MIT-style
// license that can be found in the LICENSE file or at
// https://opensource.org/licenses/MIT.

//! Actor extraction for the server.
//!
//! Identity is established upstream of this service; requests arrive with
//! the caller's staff id in the `X-Actor-Id` header. This module resolves
//! that id to the staff member's current role and enforces portal access
//! before any handler runs.

use axum::{
    extract::FromRequestParts,
    http::{StatusCode, request::Parts},
    response::{IntoResponse, Response},
};
use staffdesk_api::{AuthenticatedActor, AuthorizationService, ErrorResponse};
use staffdesk_domain::{Role, RoleId, UserId};
use staffdesk_persistence::StaffData;
use tracing::{debug, warn};

use crate::AppState;

/// Header carrying the authenticated staff id.
pub const ACTOR_HEADER: &str = "X-Actor-Id";

/// Extractor for the acting staff member.
///
/// # Usage
///
/// ```ignore
/// async fn my_handler(
///     RequestActor(actor): RequestActor,
/// ) -> Result<Json<Response>, HttpError> {
///     // actor: AuthenticatedActor with its role resolved
/// }
/// ```
///
/// # Errors
///
/// Rejects with 401 if the header is missing, malformed or names an unknown
/// staff member, and with 403 if the staff member's role is inactive or does
/// not grant portal access.
pub struct RequestActor(pub AuthenticatedActor);

impl FromRequestParts<AppState> for RequestActor {
    type Rejection = ActorError;

    async fn from_request_parts(
        parts: &mut Parts,
        state: &AppState,
    ) -> Result<Self, Self::Rejection> {
        let raw = parts
            .headers
            .get(ACTOR_HEADER)
            .ok_or_else(|| {
                debug!("Missing actor header");
                ActorError::MissingHeader
            })?
            .to_str()
            .map_err(|_| {
                warn!("Invalid actor header encoding");
                ActorError::InvalidHeader
            })?;

        let staff_id: i64 = raw.trim().parse().map_err(|_| {
            warn!(value = raw, "Actor header is not a staff id");
            ActorError::InvalidHeader
        })?;

        let mut persistence = state.persistence.lock().await;
        let staff: StaffData = persistence
            .get_staff(UserId(staff_id))
            .map_err(|e| ActorError::Lookup(e.to_string()))?
            .ok_or(ActorError::UnknownStaff(staff_id))?;

        let role_id: RoleId = RoleId(staff.role_id);
        let role: Role = state
            .registry
            .get_by_id(&mut *persistence, role_id)
            .ok_or(ActorError::UnknownRole(role_id))?;
        drop(persistence);

        let actor: AuthenticatedActor = AuthenticatedActor::new(UserId(staff_id), role);
        AuthorizationService::authorize_portal_access(&actor)
            .map_err(|e| ActorError::PortalDenied(e.to_string()))?;

        debug!(
            staff_id,
            role = %actor.role.name,
            "Actor resolved"
        );

        Ok(Self(actor))
    }
}

/// Actor extraction errors.
#[derive(Debug)]
pub enum ActorError {
    /// The actor header is absent.
    MissingHeader,
    /// The actor header is not a numeric staff id.
    InvalidHeader,
    /// No staff member has this id.
    UnknownStaff(i64),
    /// The staff member's role is not in the role set.
    UnknownRole(RoleId),
    /// The staff member may not use the portal.
    PortalDenied(String),
    /// The staff lookup failed.
    Lookup(String),
}

impl IntoResponse for ActorError {
    fn into_response(self) -> Response {
        let (status, kind, message) = match self {
            Self::MissingHeader => (
                StatusCode::UNAUTHORIZED,
                "unauthenticated",
                format!("Missing {ACTOR_HEADER} header"),
            ),
            Self::InvalidHeader => (
                StatusCode::UNAUTHORIZED,
                "unauthenticated",
                format!("Invalid {ACTOR_HEADER} header. Expected a numeric staff id"),
            ),
            Self::UnknownStaff(id) => (
                StatusCode::UNAUTHORIZED,
                "unauthenticated",
                format!("Unknown staff member {id}"),
            ),
            Self::UnknownRole(id) => (
                StatusCode::FORBIDDEN,
                "unauthorized",
                format!("Role {id} is not available"),
            ),
            Self::PortalDenied(reason) => (StatusCode::FORBIDDEN, "unauthorized", reason),
            Self::Lookup(reason) => {
                warn!(error = %reason, "Actor lookup failed");
                (StatusCode::BAD_GATEWAY, "upstream", reason)
            }
        };

        let body = axum::Json(ErrorResponse {
            kind: kind.to_string(),
            error: message,
        });
        (status, body).into_response()
    }
}
