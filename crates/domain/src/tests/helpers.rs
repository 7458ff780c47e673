// Copyright (C) 2026 Fred Clausen
// Use of this source code is governed by an MIT-style
// license that can be found in the LICENSE file or at
// https://opensource.org/licenses/MIT.

use crate::{PermissionLevel, PermissionMatrix, Role, RoleId};

pub fn create_role(id: i64, hierarchy_level: u32, approve_leave: PermissionLevel) -> Role {
    let permissions: PermissionMatrix = PermissionMatrix {
        approve_leave,
        access_webapp: true,
        ..PermissionMatrix::default()
    };
    Role::new(
        RoleId(id),
        &format!("role-{id}"),
        &format!("Role {id}"),
        hierarchy_level,
        permissions,
    )
    .unwrap()
}

pub const LEVELS: [PermissionLevel; 3] = [
    PermissionLevel::None,
    PermissionLevel::Subordinates,
    PermissionLevel::All,
];
