// Copyright (C) 2026 Fred Clausen
// Use of this source code is governed by an MIT-style
// license that can be found in the LICENSE file or at
// https://opensource.org/licenses/MIT.

//! Query modules for persistence layer.
//!
//! This module contains all read-only queries for the persistence layer.
//!
//! ## Module Organization
//!
//! - `audit`: The decision audit trail
//! - `roles`: Role definitions
//! - `staff`: Staff members and their role assignment
//! - `requests`: Leave, on-duty and time-off requests

pub mod audit;
pub mod requests;
pub mod roles;
pub mod staff;
