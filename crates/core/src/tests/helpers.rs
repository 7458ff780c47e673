// Copyright (C) 2026 Fred Clausen
// Use of this source code is governed by an MIT-style
// license that can be found in the LICENSE file or at
// https://opensource.org/licenses/MIT.

use crate::{RoleSource, RoleSourceError};
use staffdesk_audit::Actor;
use staffdesk_domain::{
    LeavePayload, PermissionLevel, PermissionMatrix, Request, RequestPayload, RequestStatus, Role,
    RoleId, UserId,
};
use time::OffsetDateTime;
use time::macros::{date, datetime};

pub const MANAGER_ID: UserId = UserId(100);
pub const OTHER_ADMIN_ID: UserId = UserId(200);

pub fn t0() -> OffsetDateTime {
    datetime!(2026-02-20 09:00 UTC)
}

pub fn create_test_actor(id: UserId) -> Actor {
    Actor::new(id, String::from("manager"))
}

pub fn create_pending_leave() -> Request {
    Request::new_pending(
        1,
        UserId(42),
        RequestPayload::Leave(LeavePayload {
            leave_type: String::from("annual"),
            start_date: date!(2026 - 03 - 02),
            end_date: date!(2026 - 03 - 04),
            reason: String::from("Family visit"),
        }),
        t0(),
    )
}

pub fn create_decided_leave(status: RequestStatus, reason: Option<&str>) -> Request {
    let mut request: Request = create_pending_leave();
    request.status = status;
    request.manager_id = Some(MANAGER_ID);
    request.rejection_reason = reason.map(String::from);
    request
}

pub fn create_role(id: i64, level: u32, approve_leave: PermissionLevel) -> Role {
    Role::new(
        RoleId(id),
        &format!("role-{id}"),
        &format!("Role {id}"),
        level,
        PermissionMatrix {
            approve_leave,
            access_webapp: true,
            ..PermissionMatrix::default()
        },
    )
    .unwrap()
}

/// A role source whose contents and availability tests control.
pub struct ScriptedSource {
    pub roles: Vec<Role>,
    pub failing: bool,
    pub fetches: usize,
}

impl ScriptedSource {
    pub const fn new(roles: Vec<Role>) -> Self {
        Self {
            roles,
            failing: false,
            fetches: 0,
        }
    }
}

impl RoleSource for ScriptedSource {
    fn fetch_roles(&mut self) -> Result<Vec<Role>, RoleSourceError> {
        self.fetches += 1;
        if self.failing {
            return Err(RoleSourceError(String::from("connection refused")));
        }
        Ok(self.roles.clone())
    }
}
