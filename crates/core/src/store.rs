// Copyright (C) 2026 Fred Clausen
// Use of this source code is governed by an MIT-style
// license that can be found in the LICENSE file or at
// https://opensource.org/licenses/MIT.

//! Collaborator seams.
//!
//! The core never talks to a database directly. These traits describe what
//! it needs from the outside world; the persistence crate implements them
//! over `SQLite`, and tests implement them in memory.

use crate::state::StatusUpdate;
use staffdesk_domain::{
    PermissionMatrix, Request, RequestKey, RequestPayload, RequestStatus, Role, RoleId, UserId,
};
use std::sync::{Mutex, PoisonError};
use time::OffsetDateTime;

/// Errors raised by the request and role stores.
#[derive(Debug, thiserror::Error)]
pub enum StoreError {
    #[error("{0} not found")]
    NotFound(String),
    /// The persisted record no longer matches what the caller read.
    #[error("conflict: {0}")]
    Conflict(String),
    #[error("invalid data: {0}")]
    Invalid(String),
    /// The backing store failed or timed out.
    #[error("store unavailable: {0}")]
    Unavailable(String),
}

/// Errors raised while fetching roles from the source of truth.
#[derive(Debug, thiserror::Error)]
#[error("role fetch failed: {0}")]
pub struct RoleSourceError(pub String);

/// Errors raised by the durable role snapshot.
#[derive(Debug, thiserror::Error)]
pub enum SnapshotError {
    #[error("snapshot I/O failed: {0}")]
    Io(#[from] std::io::Error),
    #[error("snapshot is corrupt: {0}")]
    Corrupt(String),
}

/// Request records as the orchestrator needs them.
pub trait RequestStore {
    /// Loads a request by `(kind, id)`.
    ///
    /// # Errors
    ///
    /// Returns an error if the store cannot be read. An unknown key is
    /// `Ok(None)`.
    fn find_request(&mut self, key: RequestKey) -> Result<Option<Request>, StoreError>;

    /// Returns the role currently held by a staff member.
    ///
    /// # Errors
    ///
    /// Returns an error if the store cannot be read.
    fn staff_role_id(&mut self, staff_id: UserId) -> Result<Option<RoleId>, StoreError>;

    /// Lists the requests owned by a staff member, newest first, optionally
    /// narrowed to one status.
    ///
    /// # Errors
    ///
    /// Returns an error if the store cannot be read.
    fn list_own_requests(
        &mut self,
        staff_id: UserId,
        status: Option<RequestStatus>,
    ) -> Result<Vec<Request>, StoreError>;

    /// Performs a compare-and-set write of a request's decision fields and
    /// returns the stored record.
    ///
    /// # Errors
    ///
    /// Returns `StoreError::NotFound` if the request is gone and
    /// `StoreError::Conflict` if its owner, creation time, status or decider
    /// no longer match what was read.
    fn apply_status_update(&mut self, update: &StatusUpdate) -> Result<Request, StoreError>;

    /// Stores a new `Pending` request and assigns its id within its kind.
    ///
    /// # Errors
    ///
    /// Returns an error if the write fails.
    fn insert_request(
        &mut self,
        staff_id: UserId,
        payload: &RequestPayload,
        now: OffsetDateTime,
    ) -> Result<Request, StoreError>;

    /// Deletes a request owned by `staff_id`, only while it is `Pending`.
    ///
    /// # Errors
    ///
    /// Returns `StoreError::NotFound` if no such request exists for the owner
    /// and `StoreError::Conflict` if it is no longer pending.
    fn delete_pending_request(
        &mut self,
        key: RequestKey,
        staff_id: UserId,
    ) -> Result<(), StoreError>;
}

/// The source of truth for role definitions.
pub trait RoleSource {
    /// Fetches every role.
    ///
    /// # Errors
    ///
    /// Returns an error if the roles cannot be fetched.
    fn fetch_roles(&mut self) -> Result<Vec<Role>, RoleSourceError>;
}

/// A role to be created. The store assigns the id.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NewRole {
    pub name: String,
    pub display_name: String,
    pub hierarchy_level: u32,
    pub permissions: PermissionMatrix,
}

/// Role mutations. Callers must invalidate the role registry after each
/// successful write.
pub trait RoleAdminStore: RoleSource {
    /// Creates a role.
    ///
    /// # Errors
    ///
    /// Returns `StoreError::Conflict` if the name is taken.
    fn insert_role(&mut self, role: &NewRole) -> Result<Role, StoreError>;

    /// Replaces every field of an existing role.
    ///
    /// # Errors
    ///
    /// Returns `StoreError::NotFound` if the role does not exist.
    fn update_role(&mut self, role: &Role) -> Result<Role, StoreError>;

    /// Deletes a role.
    ///
    /// # Errors
    ///
    /// Returns `StoreError::NotFound` if the role does not exist and
    /// `StoreError::Conflict` if staff still hold it.
    fn delete_role(&mut self, id: RoleId) -> Result<(), StoreError>;

    /// Sets the hierarchy level of several roles in one write.
    ///
    /// # Errors
    ///
    /// Returns `StoreError::NotFound` if any role does not exist; no level
    /// changes in that case.
    fn set_hierarchy_levels(&mut self, levels: &[(RoleId, u32)]) -> Result<(), StoreError>;
}

/// Durable copy of the last successfully fetched role set.
pub trait RoleSnapshotStore {
    /// Reads the snapshot, if one was ever written.
    ///
    /// # Errors
    ///
    /// Returns an error if the snapshot exists but cannot be read.
    fn read(&self) -> Result<Option<Vec<Role>>, SnapshotError>;

    /// Replaces the snapshot.
    ///
    /// # Errors
    ///
    /// Returns an error if the snapshot cannot be written.
    fn write(&self, roles: &[Role]) -> Result<(), SnapshotError>;
}

/// A snapshot held in process memory. Lost on restart.
#[derive(Debug, Default)]
pub struct MemorySnapshot {
    roles: Mutex<Option<Vec<Role>>>,
}

impl MemorySnapshot {
    #[must_use]
    pub const fn new() -> Self {
        Self {
            roles: Mutex::new(None),
        }
    }
}

impl RoleSnapshotStore for MemorySnapshot {
    fn read(&self) -> Result<Option<Vec<Role>>, SnapshotError> {
        Ok(self
            .roles
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .clone())
    }

    fn write(&self, roles: &[Role]) -> Result<(), SnapshotError> {
        *self.roles.lock().unwrap_or_else(PoisonError::into_inner) = Some(roles.to_vec());
        Ok(())
    }
}
