// Copyright (C) 2026 Fred Clausen
// Use of this source code is governed by an MIT-style
// license that can be found in the LICENSE file or at
// https://opensource.org/licenses/MIT.

//! Persistence layer for staffdesk.
//!
//! This crate stores roles, staff and requests in `SQLite` through Diesel and
//! implements the core's collaborator traits (`RequestStore`, `RoleSource`,
//! `RoleAdminStore`) on top of them. It also provides the durable audit
//! trail (an `AuditSink`) and the JSON-file role snapshot used by the role
//! registry.
//!
//! ## Storage layout
//!
//! - `roles`: one row per role, permission matrix flattened into columns
//! - `staff`: users and the role each holds
//! - `requests`: all three request kinds in one table keyed by
//!   `(kind, request_id)`; the payload is JSON
//! - `request_counters`: the last id issued per kind; ids are never reused
//! - `audit_events`: one row per applied decision, append-only
//!
//! ## Concurrency
//!
//! Decision writes are compare-and-set: the stored owner, creation time,
//! status and decider must still match what the caller read, checked and
//! written inside one `IMMEDIATE` transaction. A mismatch is reported as a
//! conflict and nothing is written.
//!
//! ## Testing Philosophy
//!
//! - Tests run against unique shared in-memory databases
//! - Migrations seed a single `admin` role held by staff member 1

#![deny(
    clippy::pedantic,
    clippy::cargo,
    clippy::nursery,
    clippy::style,
    clippy::correctness,
    clippy::all,
    clippy::suspicious,
    clippy::complexity,
    clippy::perf,
    clippy::unwrap_used,
    clippy::expect_used
)]
#![allow(clippy::multiple_crate_versions)]

use diesel::SqliteConnection;
use staffdesk_domain::{Request, RequestKey, Role, RoleId, UserId};
use std::path::Path;
use std::sync::atomic::{AtomicU64, Ordering};

/// Atomic counter for generating unique in-memory database names.
///
/// Each call to `new_in_memory()` receives a unique sequential ID.
static DB_COUNTER: AtomicU64 = AtomicU64::new(0);

mod audit_trail;
mod backend;
mod data_models;
mod diesel_schema;
mod error;
mod mutations;
mod queries;
mod snapshot;
mod store;

#[cfg(test)]
mod tests;

pub use audit_trail::AuditTrail;
pub use data_models::StaffData;
pub use error::PersistenceError;
pub use snapshot::JsonFileRoleSnapshot;

/// The id of the administrator seeded by the initial migration.
pub const BOOTSTRAP_ADMIN_ID: UserId = UserId(1);

/// The id of the `admin` role seeded by the initial migration.
pub const BOOTSTRAP_ADMIN_ROLE_ID: RoleId = RoleId(1);

/// `SQLite` persistence adapter.
pub struct Persistence {
    pub(crate) conn: SqliteConnection,
    database_url: String,
}

impl std::fmt::Debug for Persistence {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Persistence").finish_non_exhaustive()
    }
}

impl Persistence {
    /// Creates a new persistence adapter with an in-memory `SQLite` database.
    ///
    /// Each call receives a unique database instance via atomic counter,
    /// ensuring deterministic test isolation without time-based collisions.
    ///
    /// # Errors
    ///
    /// Returns an error if the database cannot be initialized.
    pub fn new_in_memory() -> Result<Self, PersistenceError> {
        let db_id = DB_COUNTER.fetch_add(1, Ordering::SeqCst);
        let shared_memory_url = format!("file:memdb_staffdesk_{db_id}?mode=memory&cache=shared");

        let mut conn: SqliteConnection = backend::sqlite::initialize_database(&shared_memory_url)?;
        backend::sqlite::verify_foreign_key_enforcement(&mut conn)?;

        Ok(Self {
            conn,
            database_url: shared_memory_url,
        })
    }

    /// Creates a new persistence adapter with a file-based `SQLite` database.
    ///
    /// # Arguments
    ///
    /// * `path` - The path to the `SQLite` database file
    ///
    /// # Errors
    ///
    /// Returns an error if the database cannot be opened or initialized.
    pub fn new_with_file<P: AsRef<Path>>(path: P) -> Result<Self, PersistenceError> {
        let path_str = path.as_ref().to_str().ok_or_else(|| {
            PersistenceError::InitializationError("Invalid database path".to_string())
        })?;

        let mut conn: SqliteConnection = backend::sqlite::initialize_database(path_str)?;
        backend::sqlite::enable_wal_mode(&mut conn)?;
        backend::sqlite::verify_foreign_key_enforcement(&mut conn)?;

        Ok(Self {
            conn,
            database_url: path_str.to_string(),
        })
    }

    /// Opens the audit trail on a second connection to the same database.
    ///
    /// For an in-memory database the trail only works while this adapter
    /// is alive.
    ///
    /// # Errors
    ///
    /// Returns an error if the connection cannot be opened.
    pub fn open_audit_trail(&self) -> Result<AuditTrail, PersistenceError> {
        let conn: SqliteConnection = backend::sqlite::open_connection(&self.database_url)?;
        Ok(AuditTrail::new(conn))
    }

    /// Verifies that foreign key enforcement is enabled.
    ///
    /// # Errors
    ///
    /// Returns an error if foreign key enforcement is not enabled.
    pub fn verify_foreign_key_enforcement(&mut self) -> Result<(), PersistenceError> {
        backend::sqlite::verify_foreign_key_enforcement(&mut self.conn)
    }

    // ========================================================================
    // Roles
    // ========================================================================

    /// Lists every role, ordered by hierarchy level then id.
    ///
    /// # Errors
    ///
    /// Returns an error if the query fails.
    pub fn list_roles(&mut self) -> Result<Vec<Role>, PersistenceError> {
        queries::roles::list_roles(&mut self.conn)
    }

    /// Retrieves a role by ID.
    ///
    /// # Errors
    ///
    /// Returns an error if the query fails.
    pub fn get_role(&mut self, id: RoleId) -> Result<Option<Role>, PersistenceError> {
        queries::roles::get_role(&mut self.conn, id)
    }

    // ========================================================================
    // Staff
    // ========================================================================

    /// Creates a staff member holding `role_id`.
    ///
    /// # Errors
    ///
    /// Returns an error if the role does not exist or the name is blank.
    pub fn insert_staff(
        &mut self,
        display_name: &str,
        role_id: RoleId,
    ) -> Result<UserId, PersistenceError> {
        mutations::staff::insert_staff(&mut self.conn, display_name, role_id)
    }

    /// Retrieves a staff member by ID.
    ///
    /// # Errors
    ///
    /// Returns an error if the query fails.
    pub fn get_staff(&mut self, staff_id: UserId) -> Result<Option<StaffData>, PersistenceError> {
        queries::staff::get_staff(&mut self.conn, staff_id)
    }

    // ========================================================================
    // Requests
    // ========================================================================

    /// Retrieves a request by `(kind, id)`.
    ///
    /// # Errors
    ///
    /// Returns an error if the query fails.
    pub fn get_request(&mut self, key: RequestKey) -> Result<Option<Request>, PersistenceError> {
        queries::requests::get_request(&mut self.conn, key)
    }
}
