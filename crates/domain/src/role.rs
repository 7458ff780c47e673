// Copyright (C) 2026 Fred Clausen
// Use of this source code is governed by an MIT-style
// license that can be found in the LICENSE file or at
// https://opensource.org/licenses/MIT.

use crate::error::DomainError;
use crate::permission::PermissionMatrix;
use serde::{Deserialize, Serialize};

/// Identifier of a role.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct RoleId(pub i64);

impl std::fmt::Display for RoleId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// Identifier of a user (staff member or manager).
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct UserId(pub i64);

impl std::fmt::Display for UserId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// A role definition.
///
/// `hierarchy_level` 0 is the highest authority; larger values rank lower.
/// Levels may tie, in which case the roles are equal authority.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Role {
    pub id: RoleId,
    /// Machine slug, `[a-z0-9_-]+`.
    pub name: String,
    pub display_name: String,
    pub hierarchy_level: u32,
    pub active: bool,
    pub permissions: PermissionMatrix,
}

impl Role {
    /// Creates a new active role.
    ///
    /// # Errors
    ///
    /// Returns `DomainError::InvalidRoleName` if `name` is not a valid slug,
    /// or `DomainError::EmptyField` if `display_name` is blank.
    pub fn new(
        id: RoleId,
        name: &str,
        display_name: &str,
        hierarchy_level: u32,
        permissions: PermissionMatrix,
    ) -> Result<Self, DomainError> {
        validate_role_name(name)?;
        if display_name.trim().is_empty() {
            return Err(DomainError::EmptyField {
                field: "display_name",
            });
        }
        Ok(Self {
            id,
            name: name.to_string(),
            display_name: display_name.trim().to_string(),
            hierarchy_level,
            active: true,
            permissions,
        })
    }
}

/// Validates a role slug.
///
/// # Errors
///
/// Returns `DomainError::InvalidRoleName` if the name is empty or contains
/// characters other than lowercase ASCII letters, digits, `_` and `-`.
pub fn validate_role_name(name: &str) -> Result<(), DomainError> {
    let valid = !name.is_empty()
        && name
            .chars()
            .all(|c| c.is_ascii_lowercase() || c.is_ascii_digit() || c == '_' || c == '-');
    if valid {
        Ok(())
    } else {
        Err(DomainError::InvalidRoleName(name.to_string()))
    }
}

/// A user as seen by the authorization core.
///
/// There is no manager pointer; authority derives from the role's level.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct User {
    pub id: UserId,
    pub role_id: RoleId,
}

/// An immutable set of roles, ordered by hierarchy level then id.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(from = "Vec<Role>", into = "Vec<Role>")]
pub struct RoleSet {
    roles: Vec<Role>,
}

impl RoleSet {
    /// Builds a role set from any collection of roles.
    #[must_use]
    pub fn new(mut roles: Vec<Role>) -> Self {
        roles.sort_by_key(|role| (role.hierarchy_level, role.id));
        Self { roles }
    }

    /// Returns the role with the given id, if present.
    #[must_use]
    pub fn get(&self, id: RoleId) -> Option<&Role> {
        self.roles.iter().find(|role| role.id == id)
    }

    /// Iterates roles in hierarchy order.
    pub fn iter(&self) -> std::slice::Iter<'_, Role> {
        self.roles.iter()
    }

    #[must_use]
    pub const fn len(&self) -> usize {
        self.roles.len()
    }

    #[must_use]
    pub const fn is_empty(&self) -> bool {
        self.roles.is_empty()
    }

    /// Returns the roles as a slice.
    #[must_use]
    pub fn as_slice(&self) -> &[Role] {
        &self.roles
    }
}

impl From<Vec<Role>> for RoleSet {
    fn from(roles: Vec<Role>) -> Self {
        Self::new(roles)
    }
}

impl From<RoleSet> for Vec<Role> {
    fn from(set: RoleSet) -> Self {
        set.roles
    }
}

impl<'a> IntoIterator for &'a RoleSet {
    type Item = &'a Role;
    type IntoIter = std::slice::Iter<'a, Role>;

    fn into_iter(self) -> Self::IntoIter {
        self.roles.iter()
    }
}
