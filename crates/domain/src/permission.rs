// Copyright (C) 2026 Fred Clausen
// Use of this source code is governed by an MIT-style
// license that can be found in the LICENSE file or at
// https://opensource.org/licenses/MIT.

//! Permission vocabulary for roles.
//!
//! Two kinds of permission exist:
//!
//! - Hierarchical permissions carry a [`PermissionLevel`], totally ordered
//!   `None < Subordinates < All`.
//! - Global permissions are plain booleans.
//!
//! Every permission a role can hold is a field of [`PermissionMatrix`];
//! lookups go through exhaustive matches so adding a permission forces
//! every call site to be revisited.

use crate::error::DomainError;
use serde::{Deserialize, Serialize};
use std::str::FromStr;

/// Granularity of a hierarchical permission.
///
/// The derived ordering is significant: `None < Subordinates < All`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum PermissionLevel {
    /// The permission is not held.
    #[default]
    None,
    /// The permission applies to targets of same-or-lower authority.
    Subordinates,
    /// The permission applies to any target.
    All,
}

impl PermissionLevel {
    /// Returns the string representation of the level.
    #[must_use]
    pub const fn as_str(&self) -> &'static str {
        match self {
            Self::None => "none",
            Self::Subordinates => "subordinates",
            Self::All => "all",
        }
    }

    /// Returns true unless the level is `None`.
    #[must_use]
    pub const fn is_granted(&self) -> bool {
        !matches!(self, Self::None)
    }
}

impl FromStr for PermissionLevel {
    type Err = DomainError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "none" => Ok(Self::None),
            "subordinates" => Ok(Self::Subordinates),
            "all" => Ok(Self::All),
            _ => Err(DomainError::InvalidPermissionLevel(s.to_string())),
        }
    }
}

impl std::fmt::Display for PermissionLevel {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Permissions whose value is a [`PermissionLevel`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum HierarchicalPermission {
    ApproveLeave,
    ApproveOnDuty,
    ManageUsers,
    ViewUsers,
    ViewReports,
    ManageActiveOnDuty,
    ManageSchedule,
    ViewActivities,
}

impl HierarchicalPermission {
    /// All hierarchical permissions, in declaration order.
    pub const ALL: [Self; 8] = [
        Self::ApproveLeave,
        Self::ApproveOnDuty,
        Self::ManageUsers,
        Self::ViewUsers,
        Self::ViewReports,
        Self::ManageActiveOnDuty,
        Self::ManageSchedule,
        Self::ViewActivities,
    ];

    /// Returns the machine slug of the permission.
    #[must_use]
    pub const fn as_str(&self) -> &'static str {
        match self {
            Self::ApproveLeave => "approve-leave",
            Self::ApproveOnDuty => "approve-on-duty",
            Self::ManageUsers => "manage-users",
            Self::ViewUsers => "view-users",
            Self::ViewReports => "view-reports",
            Self::ManageActiveOnDuty => "manage-active-on-duty",
            Self::ManageSchedule => "manage-schedule",
            Self::ViewActivities => "view-activities",
        }
    }

    /// Returns true for the permissions that gate request approval.
    #[must_use]
    pub const fn is_approval(&self) -> bool {
        matches!(self, Self::ApproveLeave | Self::ApproveOnDuty)
    }
}

impl FromStr for HierarchicalPermission {
    type Err = DomainError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::ALL
            .into_iter()
            .find(|permission| permission.as_str() == s)
            .ok_or_else(|| DomainError::UnknownPermission(s.to_string()))
    }
}

/// Permissions whose value is a boolean.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum GlobalPermission {
    ManageLeaveTypes,
    AccessWebapp,
    ManageRoles,
    ManageEmailSettings,
}

impl GlobalPermission {
    /// All global permissions, in declaration order.
    pub const ALL: [Self; 4] = [
        Self::ManageLeaveTypes,
        Self::AccessWebapp,
        Self::ManageRoles,
        Self::ManageEmailSettings,
    ];

    /// Returns the machine slug of the permission.
    #[must_use]
    pub const fn as_str(&self) -> &'static str {
        match self {
            Self::ManageLeaveTypes => "manage-leave-types",
            Self::AccessWebapp => "access-webapp",
            Self::ManageRoles => "manage-roles",
            Self::ManageEmailSettings => "manage-email-settings",
        }
    }
}

impl FromStr for GlobalPermission {
    type Err = DomainError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::ALL
            .into_iter()
            .find(|permission| permission.as_str() == s)
            .ok_or_else(|| DomainError::UnknownPermission(s.to_string()))
    }
}

/// The full set of permissions held by a role.
///
/// Missing fields deserialize as `none` / `false`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct PermissionMatrix {
    pub approve_leave: PermissionLevel,
    pub approve_on_duty: PermissionLevel,
    pub manage_users: PermissionLevel,
    pub view_users: PermissionLevel,
    pub view_reports: PermissionLevel,
    pub manage_active_on_duty: PermissionLevel,
    pub manage_schedule: PermissionLevel,
    pub view_activities: PermissionLevel,
    pub manage_leave_types: bool,
    pub access_webapp: bool,
    pub manage_roles: bool,
    pub manage_email_settings: bool,
}

impl PermissionMatrix {
    /// Returns the level held for a hierarchical permission.
    #[must_use]
    pub const fn level(&self, permission: HierarchicalPermission) -> PermissionLevel {
        match permission {
            HierarchicalPermission::ApproveLeave => self.approve_leave,
            HierarchicalPermission::ApproveOnDuty => self.approve_on_duty,
            HierarchicalPermission::ManageUsers => self.manage_users,
            HierarchicalPermission::ViewUsers => self.view_users,
            HierarchicalPermission::ViewReports => self.view_reports,
            HierarchicalPermission::ManageActiveOnDuty => self.manage_active_on_duty,
            HierarchicalPermission::ManageSchedule => self.manage_schedule,
            HierarchicalPermission::ViewActivities => self.view_activities,
        }
    }

    /// Returns the flag held for a global permission.
    #[must_use]
    pub const fn flag(&self, permission: GlobalPermission) -> bool {
        match permission {
            GlobalPermission::ManageLeaveTypes => self.manage_leave_types,
            GlobalPermission::AccessWebapp => self.access_webapp,
            GlobalPermission::ManageRoles => self.manage_roles,
            GlobalPermission::ManageEmailSettings => self.manage_email_settings,
        }
    }

    /// Sets the level for a hierarchical permission.
    pub const fn set_level(&mut self, permission: HierarchicalPermission, level: PermissionLevel) {
        match permission {
            HierarchicalPermission::ApproveLeave => self.approve_leave = level,
            HierarchicalPermission::ApproveOnDuty => self.approve_on_duty = level,
            HierarchicalPermission::ManageUsers => self.manage_users = level,
            HierarchicalPermission::ViewUsers => self.view_users = level,
            HierarchicalPermission::ViewReports => self.view_reports = level,
            HierarchicalPermission::ManageActiveOnDuty => self.manage_active_on_duty = level,
            HierarchicalPermission::ManageSchedule => self.manage_schedule = level,
            HierarchicalPermission::ViewActivities => self.view_activities = level,
        }
    }

    /// Sets the flag for a global permission.
    pub const fn set_flag(&mut self, permission: GlobalPermission, value: bool) {
        match permission {
            GlobalPermission::ManageLeaveTypes => self.manage_leave_types = value,
            GlobalPermission::AccessWebapp => self.access_webapp = value,
            GlobalPermission::ManageRoles => self.manage_roles = value,
            GlobalPermission::ManageEmailSettings => self.manage_email_settings = value,
        }
    }

    /// Returns true if any approval permission is above `none`.
    #[must_use]
    pub const fn has_any_approval(&self) -> bool {
        self.approve_leave.is_granted() || self.approve_on_duty.is_granted()
    }
}

#[cfg(test)]
mod tests {
    #![allow(clippy::unwrap_used)]

    use super::*;

    #[test]
    fn test_levels_are_totally_ordered() {
        assert!(PermissionLevel::None < PermissionLevel::Subordinates);
        assert!(PermissionLevel::Subordinates < PermissionLevel::All);
        assert!(PermissionLevel::None < PermissionLevel::All);
    }

    #[test]
    fn test_permission_slugs_parse() {
        for permission in HierarchicalPermission::ALL {
            assert_eq!(permission.as_str().parse::<HierarchicalPermission>(), Ok(permission));
        }
        for permission in GlobalPermission::ALL {
            assert_eq!(permission.as_str().parse::<GlobalPermission>(), Ok(permission));
        }
        assert!(matches!(
            "approve-everything".parse::<HierarchicalPermission>(),
            Err(DomainError::UnknownPermission(_))
        ));
    }

    #[test]
    fn test_set_level_and_flag_touch_only_their_field() {
        let mut matrix = PermissionMatrix::default();
        matrix.set_level(HierarchicalPermission::ViewReports, PermissionLevel::All);
        matrix.set_flag(GlobalPermission::ManageRoles, true);

        for permission in HierarchicalPermission::ALL {
            let expected = if permission == HierarchicalPermission::ViewReports {
                PermissionLevel::All
            } else {
                PermissionLevel::None
            };
            assert_eq!(matrix.level(permission), expected);
        }
        assert!(matrix.flag(GlobalPermission::ManageRoles));
        assert!(!matrix.flag(GlobalPermission::AccessWebapp));
        assert!(!matrix.has_any_approval());
    }

    #[test]
    fn test_matrix_deserializes_missing_fields_as_none() {
        let matrix: PermissionMatrix =
            serde_json::from_str(r#"{"approve_leave":"subordinates","access_webapp":true}"#)
                .unwrap();

        assert_eq!(matrix.approve_leave, PermissionLevel::Subordinates);
        assert_eq!(matrix.approve_on_duty, PermissionLevel::None);
        assert!(matrix.access_webapp);
        assert!(!matrix.manage_roles);
    }
}
