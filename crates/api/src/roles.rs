// Copyright (C) 2026 Fred Clausen
// Use of this source code is governed by an MIT-style
// license that can be found in the LICENSE file or at
// https://opensource.org/licenses/MIT.

//! Role administration.
//!
//! Every successful write invalidates the role registry so the next
//! authorization check sees the new permissions.

use staffdesk::{NewRole, RoleAdminStore, RoleRegistry};
use staffdesk_domain::{Role, RoleId, validate_role_name};
use std::collections::HashSet;
use tracing::info;

use crate::auth::{AuthenticatedActor, AuthorizationService};
use crate::error::{ApprovalError, translate_domain_error, translate_store_error};
use crate::request_response::{
    CreateRoleRequest, ListRolesResponse, ReorderHierarchyRequest, UpdateRoleRequest,
};

/// Lists roles through the registry.
pub fn list_roles<S: RoleAdminStore>(store: &mut S, registry: &RoleRegistry) -> ListRolesResponse {
    ListRolesResponse {
        roles: registry.load(store, false).as_slice().to_vec(),
    }
}

/// Creates a role.
///
/// # Errors
///
/// Returns `Unauthorized` without `manage-roles`, `Validation` for a bad
/// slug or blank display name, and `Conflict` if the name is taken.
pub fn create_role<S: RoleAdminStore>(
    store: &mut S,
    registry: &RoleRegistry,
    actor: &AuthenticatedActor,
    request: CreateRoleRequest,
) -> Result<Role, ApprovalError> {
    AuthorizationService::authorize_manage_roles(actor)?;
    validate_role_name(&request.name).map_err(translate_domain_error)?;
    require_display_name(&request.display_name)?;

    let role: Role = store
        .insert_role(&NewRole {
            name: request.name,
            display_name: request.display_name.trim().to_string(),
            hierarchy_level: request.hierarchy_level,
            permissions: request.permissions,
        })
        .map_err(translate_store_error)?;
    registry.invalidate();

    info!(role_id = role.id.0, name = %role.name, actor_id = actor.id.0, "Role created");
    Ok(role)
}

/// Replaces a role's display name, level, active flag and permissions.
///
/// # Errors
///
/// Returns `Unauthorized` without `manage-roles` and `NotFound` for an
/// unknown role.
pub fn update_role<S: RoleAdminStore>(
    store: &mut S,
    registry: &RoleRegistry,
    actor: &AuthenticatedActor,
    role_id: RoleId,
    request: UpdateRoleRequest,
) -> Result<Role, ApprovalError> {
    AuthorizationService::authorize_manage_roles(actor)?;
    require_display_name(&request.display_name)?;

    let current: Role = store
        .fetch_roles()
        .map_err(|e| ApprovalError::Upstream(e.to_string()))?
        .into_iter()
        .find(|role| role.id == role_id)
        .ok_or_else(|| role_not_found(role_id))?;

    let updated: Role = store
        .update_role(&Role {
            id: current.id,
            name: current.name,
            display_name: request.display_name.trim().to_string(),
            hierarchy_level: request.hierarchy_level,
            active: request.active,
            permissions: request.permissions,
        })
        .map_err(translate_store_error)?;
    registry.invalidate();

    info!(role_id = role_id.0, actor_id = actor.id.0, "Role updated");
    Ok(updated)
}

/// Deletes a role that no staff member holds.
///
/// # Errors
///
/// Returns `Unauthorized` without `manage-roles`, `NotFound` for an unknown
/// role and `Conflict` while staff still hold it.
pub fn delete_role<S: RoleAdminStore>(
    store: &mut S,
    registry: &RoleRegistry,
    actor: &AuthenticatedActor,
    role_id: RoleId,
) -> Result<(), ApprovalError> {
    AuthorizationService::authorize_manage_roles(actor)?;
    store.delete_role(role_id).map_err(translate_store_error)?;
    registry.invalidate();

    info!(role_id = role_id.0, actor_id = actor.id.0, "Role deleted");
    Ok(())
}

/// Sets several roles' hierarchy levels in one write.
///
/// # Errors
///
/// Returns `Unauthorized` without `manage-roles`, `Validation` if a role
/// appears twice, and `NotFound` if any role does not exist. Nothing
/// changes on error.
pub fn reorder_hierarchy<S: RoleAdminStore>(
    store: &mut S,
    registry: &RoleRegistry,
    actor: &AuthenticatedActor,
    request: &ReorderHierarchyRequest,
) -> Result<(), ApprovalError> {
    AuthorizationService::authorize_manage_roles(actor)?;

    let mut seen: HashSet<RoleId> = HashSet::new();
    if let Some(duplicate) = request
        .levels
        .iter()
        .find(|entry| !seen.insert(entry.role_id))
    {
        return Err(ApprovalError::Validation {
            field: String::from("levels"),
            message: format!("role {} appears more than once", duplicate.role_id),
        });
    }

    let levels: Vec<(RoleId, u32)> = request
        .levels
        .iter()
        .map(|entry| (entry.role_id, entry.hierarchy_level))
        .collect();
    store
        .set_hierarchy_levels(&levels)
        .map_err(translate_store_error)?;
    registry.invalidate();

    info!(roles = levels.len(), actor_id = actor.id.0, "Role hierarchy reordered");
    Ok(())
}

fn require_display_name(display_name: &str) -> Result<(), ApprovalError> {
    if display_name.trim().is_empty() {
        return Err(ApprovalError::Validation {
            field: String::from("display_name"),
            message: String::from("Display name cannot be empty"),
        });
    }
    Ok(())
}

fn role_not_found(role_id: RoleId) -> ApprovalError {
    ApprovalError::NotFound {
        resource: String::from("Role"),
        message: format!("role {role_id} does not exist"),
    }
}
