// Copyright (C) 2026 Fred Clausen
// Use of this source code is governed by an MIT-style
// license that can be found in the LICENSE file or at
// https://opensource.org/licenses/MIT.

#![allow(clippy::expect_used, clippy::unwrap_used)]

mod initialization_tests;

use crate::Persistence;
use staffdesk::NewRole;
use staffdesk_domain::{
    LeavePayload, PermissionLevel, PermissionMatrix, RequestPayload, TimeOffPayload,
};
use time::OffsetDateTime;
use time::macros::{date, datetime, time};

pub fn create_test_persistence() -> Persistence {
    Persistence::new_in_memory().unwrap()
}

pub fn t0() -> OffsetDateTime {
    datetime!(2026-02-20 09:00 UTC)
}

pub fn new_role(name: &str, level: u32, approve_leave: PermissionLevel) -> NewRole {
    NewRole {
        name: name.to_string(),
        display_name: name.to_uppercase(),
        hierarchy_level: level,
        permissions: PermissionMatrix {
            approve_leave,
            access_webapp: true,
            ..PermissionMatrix::default()
        },
    }
}

pub fn leave_payload() -> RequestPayload {
    RequestPayload::Leave(LeavePayload {
        leave_type: String::from("annual"),
        start_date: date!(2026 - 03 - 02),
        end_date: date!(2026 - 03 - 04),
        reason: String::from("Family visit"),
    })
}

pub fn time_off_payload() -> RequestPayload {
    RequestPayload::TimeOff(TimeOffPayload {
        date: date!(2026 - 03 - 05),
        start_time: time!(14:00),
        end_time: time!(16:30),
        reason: String::from("Dentist"),
    })
}
