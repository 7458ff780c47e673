// Copyright (C) 2026 Fred Clausen
// Use of this source code is governed by an MIT-style
// license that can be found in the LICENSE file or at
// https://opensource.org/licenses/MIT.

use diesel::SqliteConnection;
use diesel::prelude::*;
use staffdesk_domain::{Request, RequestKey, RequestStatus, UserId};

use crate::data_models::RequestRow;
use crate::diesel_schema::requests;
use crate::error::PersistenceError;

/// Retrieves a request by `(kind, id)`.
///
/// # Errors
///
/// Returns an error if the query fails or the stored row is malformed.
/// Returns `Ok(None)` if the request is not found.
pub fn get_request(
    conn: &mut SqliteConnection,
    key: RequestKey,
) -> Result<Option<Request>, PersistenceError> {
    requests::table
        .find((key.kind.as_str(), key.id))
        .select(RequestRow::as_select())
        .first(conn)
        .optional()?
        .map(Request::try_from)
        .transpose()
}

/// Lists one staff member's requests, optionally narrowed by status, newest
/// first.
///
/// # Errors
///
/// Returns an error if the query fails or a stored row is malformed.
pub fn list_requests(
    conn: &mut SqliteConnection,
    staff_id: UserId,
    status: Option<RequestStatus>,
) -> Result<Vec<Request>, PersistenceError> {
    let mut query = requests::table
        .filter(requests::staff_id.eq(staff_id.0))
        .select(RequestRow::as_select())
        .order((
            requests::created_at.desc(),
            requests::kind.asc(),
            requests::request_id.desc(),
        ))
        .into_boxed();
    if let Some(status) = status {
        query = query.filter(requests::status.eq(status.as_str()));
    }

    let rows: Vec<RequestRow> = query
        .load(conn)
        .map_err(|e| PersistenceError::QueryFailed(format!("list_requests: {e}")))?;
    rows.into_iter().map(Request::try_from).collect()
}
