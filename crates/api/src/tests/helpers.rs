// Copyright (C) 2026 Fred Clausen
// Use of this source code is governed by an MIT-style
// license that can be found in the LICENSE file or at
// https://opensource.org/licenses/MIT.

//! Test helper functions and fixtures.

use std::collections::{BTreeMap, HashMap};
use std::sync::Arc;

use staffdesk::{
    Clock, ManualClock, MemorySnapshot, NewRole, RegistryConfig, RequestStore, RoleAdminStore,
    RoleRegistry, RoleSource, RoleSourceError, StatusUpdate, StoreError,
};
use staffdesk_audit::{AuditEvent, AuditSink, AuditSinkError};
use staffdesk_domain::{
    Coordinates, LeavePayload, OnDutyPayload, PermissionLevel, PermissionMatrix, Request,
    RequestKey, RequestKind, RequestPayload, RequestStatus, Role, RoleId, RoleSet, UserId,
};
use time::OffsetDateTime;
use time::macros::{date, datetime};

use crate::AuthenticatedActor;

pub const ADMIN_ID: UserId = UserId(1);
pub const SECOND_ADMIN_ID: UserId = UserId(2);
pub const MANAGER_ID: UserId = UserId(10);
pub const LEAD_ID: UserId = UserId(11);
pub const EMPLOYEE_ID: UserId = UserId(20);
pub const OTHER_EMPLOYEE_ID: UserId = UserId(21);

pub const ADMIN_ROLE: RoleId = RoleId(1);
pub const MANAGER_ROLE: RoleId = RoleId(2);
pub const LEAD_ROLE: RoleId = RoleId(3);
pub const EMPLOYEE_ROLE: RoleId = RoleId(4);

pub fn t0() -> OffsetDateTime {
    datetime!(2026-02-20 09:00 UTC)
}

fn role(id: RoleId, name: &str, level: u32, permissions: PermissionMatrix) -> Role {
    Role::new(id, name, &name.to_uppercase(), level, permissions).unwrap()
}

/// admin (0) > manager, lead (1) > employee (2).
pub fn create_test_roles() -> Vec<Role> {
    vec![
        role(
            ADMIN_ROLE,
            "admin",
            0,
            PermissionMatrix {
                approve_leave: PermissionLevel::All,
                approve_on_duty: PermissionLevel::All,
                manage_users: PermissionLevel::All,
                view_reports: PermissionLevel::All,
                access_webapp: true,
                manage_roles: true,
                ..PermissionMatrix::default()
            },
        ),
        role(
            MANAGER_ROLE,
            "manager",
            1,
            PermissionMatrix {
                approve_leave: PermissionLevel::Subordinates,
                approve_on_duty: PermissionLevel::Subordinates,
                manage_users: PermissionLevel::Subordinates,
                access_webapp: true,
                ..PermissionMatrix::default()
            },
        ),
        role(
            LEAD_ROLE,
            "lead",
            1,
            PermissionMatrix {
                approve_leave: PermissionLevel::Subordinates,
                access_webapp: true,
                ..PermissionMatrix::default()
            },
        ),
        role(
            EMPLOYEE_ROLE,
            "employee",
            2,
            PermissionMatrix {
                access_webapp: true,
                ..PermissionMatrix::default()
            },
        ),
    ]
}

pub fn create_test_role_set() -> RoleSet {
    RoleSet::new(create_test_roles())
}

pub fn create_actor(id: UserId, role_id: RoleId) -> AuthenticatedActor {
    let role: Role = create_test_roles()
        .into_iter()
        .find(|role| role.id == role_id)
        .unwrap();
    AuthenticatedActor::new(id, role)
}

pub fn create_admin() -> AuthenticatedActor {
    create_actor(ADMIN_ID, ADMIN_ROLE)
}

pub fn create_manager() -> AuthenticatedActor {
    create_actor(MANAGER_ID, MANAGER_ROLE)
}

pub fn create_employee() -> AuthenticatedActor {
    create_actor(EMPLOYEE_ID, EMPLOYEE_ROLE)
}

pub fn leave_payload() -> RequestPayload {
    RequestPayload::Leave(LeavePayload {
        leave_type: String::from("annual"),
        start_date: date!(2026 - 03 - 02),
        end_date: date!(2026 - 03 - 04),
        reason: String::from("Family visit"),
    })
}

pub fn on_duty_payload() -> RequestPayload {
    RequestPayload::OnDuty(OnDutyPayload {
        client_name: String::from("Harbour Logistics"),
        location: String::from("Pier 4"),
        purpose: String::from("Quarterly audit"),
        start_time: datetime!(2026-03-10 08:00 UTC),
        end_time: Some(datetime!(2026-03-10 17:00 UTC)),
        start_coords: Coordinates {
            latitude: 51.5,
            longitude: -0.12,
        },
        end_coords: None,
    })
}

/// A role and request store held in memory, with the same compare-and-set
/// semantics as the database.
#[derive(Debug, Default)]
pub struct MemoryStore {
    pub requests: BTreeMap<RequestKey, Request>,
    pub staff: HashMap<UserId, RoleId>,
    pub roles: Vec<Role>,
    pub last_ids: HashMap<RequestKind, i64>,
    pub unavailable: bool,
    pub writes: usize,
}

impl MemoryStore {
    pub fn new() -> Self {
        let staff: HashMap<UserId, RoleId> = [
            (ADMIN_ID, ADMIN_ROLE),
            (SECOND_ADMIN_ID, ADMIN_ROLE),
            (MANAGER_ID, MANAGER_ROLE),
            (LEAD_ID, LEAD_ROLE),
            (EMPLOYEE_ID, EMPLOYEE_ROLE),
            (OTHER_EMPLOYEE_ID, EMPLOYEE_ROLE),
        ]
        .into_iter()
        .collect();
        Self {
            staff,
            roles: create_test_roles(),
            ..Self::default()
        }
    }

    /// Stores a pending request for `staff_id` and returns it.
    pub fn seed(&mut self, staff_id: UserId, payload: RequestPayload) -> Request {
        self.insert_request(staff_id, &payload, t0()).unwrap()
    }

    /// Stores a request already decided by `manager_id`.
    pub fn seed_decided(
        &mut self,
        staff_id: UserId,
        status: RequestStatus,
        manager_id: UserId,
        reason: Option<&str>,
    ) -> Request {
        let mut request: Request = self.seed(staff_id, leave_payload());
        request.status = status;
        request.manager_id = Some(manager_id);
        request.rejection_reason = reason.map(String::from);
        self.requests.insert(request.key(), request.clone());
        request
    }

    pub fn stored(&self, key: RequestKey) -> &Request {
        &self.requests[&key]
    }

    fn check_available(&self) -> Result<(), StoreError> {
        if self.unavailable {
            return Err(StoreError::Unavailable(String::from("connection timed out")));
        }
        Ok(())
    }
}

impl RequestStore for MemoryStore {
    fn find_request(&mut self, key: RequestKey) -> Result<Option<Request>, StoreError> {
        self.check_available()?;
        Ok(self.requests.get(&key).cloned())
    }

    fn staff_role_id(&mut self, staff_id: UserId) -> Result<Option<RoleId>, StoreError> {
        self.check_available()?;
        Ok(self.staff.get(&staff_id).copied())
    }

    fn list_own_requests(
        &mut self,
        staff_id: UserId,
        status: Option<RequestStatus>,
    ) -> Result<Vec<Request>, StoreError> {
        self.check_available()?;
        let mut owned: Vec<Request> = self
            .requests
            .values()
            .filter(|request| request.staff_id == staff_id)
            .filter(|request| status.is_none_or(|status| request.status == status))
            .cloned()
            .collect();
        owned.sort_by_key(|request| std::cmp::Reverse(request.created_at));
        Ok(owned)
    }

    fn apply_status_update(&mut self, update: &StatusUpdate) -> Result<Request, StoreError> {
        self.check_available()?;
        let current: &mut Request = self
            .requests
            .get_mut(&update.key)
            .ok_or_else(|| StoreError::NotFound(format!("request {}", update.key)))?;
        if current.staff_id != update.expected_staff_id
            || current.created_at != update.expected_created_at
        {
            return Err(StoreError::Conflict(format!(
                "request {} was replaced",
                update.key
            )));
        }
        if current.status != update.expected_status
            || current.manager_id != update.expected_manager_id
        {
            return Err(StoreError::Conflict(format!(
                "request {} is now {}",
                update.key, current.status
            )));
        }
        current.status = update.status;
        current.manager_id = update.manager_id;
        current.rejection_reason.clone_from(&update.rejection_reason);
        current.updated_at = update.updated_at;
        self.writes += 1;
        Ok(current.clone())
    }

    fn insert_request(
        &mut self,
        staff_id: UserId,
        payload: &RequestPayload,
        now: OffsetDateTime,
    ) -> Result<Request, StoreError> {
        self.check_available()?;
        if !self.staff.contains_key(&staff_id) {
            return Err(StoreError::NotFound(format!("staff {staff_id}")));
        }
        let kind: RequestKind = payload.kind();
        let last_id: &mut i64 = self.last_ids.entry(kind).or_insert(0);
        *last_id += 1;
        let next_id: i64 = *last_id;
        let request: Request = Request::new_pending(next_id, staff_id, payload.clone(), now);
        self.requests.insert(request.key(), request.clone());
        Ok(request)
    }

    fn delete_pending_request(
        &mut self,
        key: RequestKey,
        staff_id: UserId,
    ) -> Result<(), StoreError> {
        self.check_available()?;
        match self.requests.get(&key) {
            Some(request) if request.staff_id == staff_id => {
                if request.status != RequestStatus::Pending {
                    return Err(StoreError::Conflict(format!("request {key} is decided")));
                }
                self.requests.remove(&key);
                Ok(())
            }
            _ => Err(StoreError::NotFound(format!("request {key}"))),
        }
    }
}

impl RoleSource for MemoryStore {
    fn fetch_roles(&mut self) -> Result<Vec<Role>, RoleSourceError> {
        if self.unavailable {
            return Err(RoleSourceError(String::from("connection timed out")));
        }
        Ok(self.roles.clone())
    }
}

impl RoleAdminStore for MemoryStore {
    fn insert_role(&mut self, role: &NewRole) -> Result<Role, StoreError> {
        self.check_available()?;
        if self.roles.iter().any(|existing| existing.name == role.name) {
            return Err(StoreError::Conflict(format!("role {} exists", role.name)));
        }
        let id: i64 = self.roles.iter().map(|r| r.id.0).max().unwrap_or(0) + 1;
        let created: Role = Role::new(
            RoleId(id),
            &role.name,
            &role.display_name,
            role.hierarchy_level,
            role.permissions,
        )
        .map_err(|e| StoreError::Invalid(e.to_string()))?;
        self.roles.push(created.clone());
        Ok(created)
    }

    fn update_role(&mut self, role: &Role) -> Result<Role, StoreError> {
        self.check_available()?;
        let existing: &mut Role = self
            .roles
            .iter_mut()
            .find(|existing| existing.id == role.id)
            .ok_or_else(|| StoreError::NotFound(format!("role {}", role.id)))?;
        *existing = role.clone();
        Ok(role.clone())
    }

    fn delete_role(&mut self, id: RoleId) -> Result<(), StoreError> {
        self.check_available()?;
        if self.staff.values().any(|held| *held == id) {
            return Err(StoreError::Conflict(format!("role {id} is held")));
        }
        let before: usize = self.roles.len();
        self.roles.retain(|role| role.id != id);
        if self.roles.len() == before {
            return Err(StoreError::NotFound(format!("role {id}")));
        }
        Ok(())
    }

    fn set_hierarchy_levels(&mut self, levels: &[(RoleId, u32)]) -> Result<(), StoreError> {
        self.check_available()?;
        if let Some((missing, _)) = levels
            .iter()
            .find(|(id, _)| !self.roles.iter().any(|role| role.id == *id))
        {
            return Err(StoreError::NotFound(format!("role {missing}")));
        }
        for (id, level) in levels {
            if let Some(role) = self.roles.iter_mut().find(|role| role.id == *id) {
                role.hierarchy_level = *level;
            }
        }
        Ok(())
    }
}

/// An audit collaborator that is always down.
pub struct FailingSink;

impl AuditSink for FailingSink {
    fn emit(&mut self, _event: &AuditEvent) -> Result<(), AuditSinkError> {
        Err(AuditSinkError::Unavailable(String::from("smtp relay offline")))
    }
}

pub fn create_registry() -> RoleRegistry {
    RoleRegistry::new(
        RegistryConfig::default(),
        Arc::new(ManualClock::new(t0())) as Arc<dyn Clock>,
        Box::new(MemorySnapshot::new()),
    )
}
