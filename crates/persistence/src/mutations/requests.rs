// Copyright (C) 2026 Fred Clausen
// Use of this source code is governed by an MIT-style
// license that can be found in the LICENSE file or at
// https://opensource.org/licenses/MIT.

use diesel::SqliteConnection;
use diesel::prelude::*;
use staffdesk::StatusUpdate;
use staffdesk_domain::{Request, RequestKey, RequestKind, RequestPayload, RequestStatus, UserId};
use time::OffsetDateTime;
use tracing::{debug, info};

use crate::data_models::{RequestRow, format_timestamp};
use crate::diesel_schema::{request_counters, requests};
use crate::error::PersistenceError;
use crate::queries::requests::get_request;
use crate::queries::staff::get_staff_role;

/// Advances the per-kind counter and returns the id it now holds.
///
/// Must run inside the transaction that inserts the request.
///
/// # Errors
///
/// Returns an error if the counter row is missing or the update fails.
fn next_request_id(
    conn: &mut SqliteConnection,
    kind: RequestKind,
) -> Result<i64, PersistenceError> {
    let updated: usize = diesel::update(request_counters::table.find(kind.as_str()))
        .set(request_counters::last_id.eq(request_counters::last_id + 1))
        .execute(conn)?;
    if updated == 0 {
        return Err(PersistenceError::InvalidData(format!("no id counter for request kind {kind}")));
    }

    Ok(request_counters::table
        .find(kind.as_str())
        .select(request_counters::last_id)
        .first::<i64>(conn)?)
}

/// Stores a new `Pending` request, assigning the next id within its kind.
///
/// Ids come from a counter that never decreases, so an id released by a
/// withdrawal is not reused.
///
/// # Errors
///
/// Returns `PersistenceError::NotFound` if the staff member does not exist.
pub fn insert_request(
    conn: &mut SqliteConnection,
    staff_id: UserId,
    payload: &RequestPayload,
    now: OffsetDateTime,
) -> Result<Request, PersistenceError> {
    conn.immediate_transaction(|conn| {
        if get_staff_role(conn, staff_id)?.is_none() {
            return Err(PersistenceError::NotFound(format!("staff {staff_id}")));
        }

        let next_id: i64 = next_request_id(conn, payload.kind())?;
        let request: Request = Request::new_pending(next_id, staff_id, payload.clone(), now);
        diesel::insert_into(requests::table)
            .values(&RequestRow::from_request(&request)?)
            .execute(conn)?;

        info!(
            request_id = next_id,
            kind = payload.kind().as_str(),
            staff_id = staff_id.0,
            "Stored new request"
        );
        Ok(request)
    })
}

/// Applies a decision only if the stored request still matches what the
/// caller read.
///
/// # Errors
///
/// Returns `PersistenceError::NotFound` if the request does not exist and
/// `PersistenceError::Conflict` if its status or decider changed, or if the
/// row no longer holds the request the caller read.
pub fn apply_status_update(
    conn: &mut SqliteConnection,
    update: &StatusUpdate,
) -> Result<Request, PersistenceError> {
    let key: RequestKey = update.key;
    let updated_at: String = format_timestamp(update.updated_at)?;

    conn.immediate_transaction(|conn| {
        let current: Request = get_request(conn, key)?
            .ok_or_else(|| PersistenceError::NotFound(format!("request {key}")))?;

        if current.staff_id != update.expected_staff_id
            || current.created_at != update.expected_created_at
        {
            debug!(
                request = %key,
                expected_owner = update.expected_staff_id.0,
                found_owner = current.staff_id.0,
                "Status update targets a different request"
            );
            return Err(PersistenceError::Conflict(format!(
                "request {key} is no longer the request that was read"
            )));
        }

        if current.status != update.expected_status
            || current.manager_id != update.expected_manager_id
        {
            debug!(
                request = %key,
                expected = update.expected_status.as_str(),
                found = current.status.as_str(),
                "Stale status update"
            );
            return Err(PersistenceError::Conflict(format!(
                "request {key} is now {} and was expected to be {}",
                current.status, update.expected_status
            )));
        }

        diesel::update(requests::table.find((key.kind.as_str(), key.id)))
            .set((
                requests::status.eq(update.status.as_str()),
                requests::manager_id.eq(update.manager_id.map(|id| id.0)),
                requests::rejection_reason.eq(update.rejection_reason.as_deref()),
                requests::updated_at.eq(&updated_at),
            ))
            .execute(conn)?;

        get_request(conn, key)?.ok_or_else(|| PersistenceError::NotFound(format!("request {key}")))
    })
}

/// Deletes a request on behalf of its owner while it is still pending.
///
/// # Errors
///
/// Returns `PersistenceError::NotFound` if the owner has no such request and
/// `PersistenceError::Conflict` if it has already been decided.
pub fn delete_pending_request(
    conn: &mut SqliteConnection,
    key: RequestKey,
    staff_id: UserId,
) -> Result<(), PersistenceError> {
    conn.immediate_transaction(|conn| {
        let current: Request = get_request(conn, key)?
            .filter(|request| request.staff_id == staff_id)
            .ok_or_else(|| PersistenceError::NotFound(format!("request {key}")))?;

        if current.status != RequestStatus::Pending {
            return Err(PersistenceError::Conflict(format!(
                "request {key} is {} and can no longer be withdrawn",
                current.status
            )));
        }

        diesel::delete(requests::table.find((key.kind.as_str(), key.id))).execute(conn)?;
        info!(request = %key, staff_id = staff_id.0, "Withdrew pending request");
        Ok(())
    })
}
