// Copyright (C) 2026 Fred Clausen
// Use of this source code is governed by an MIT-style
// license that can be found in the LICENSE file or at
// https://opensource.org/licenses/MIT.

//! Mutation modules.
//!
//! This module contains all state-changing operations for the persistence layer.
//! Multi-statement writes run inside `IMMEDIATE` transactions so the read that
//! guards a write and the write itself cannot interleave with another writer.
//!
//! ## Module Organization
//!
//! - `audit`: Appending decision events to the audit trail
//! - `roles`: Role creation, update, deletion and hierarchy reorder
//! - `staff`: Staff creation
//! - `requests`: Request submission, compare-and-set decisions, withdrawal

pub mod audit;
pub mod requests;
pub mod roles;
pub mod staff;
