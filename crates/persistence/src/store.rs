// Copyright (C) 2026 Fred Clausen
// Use of this source code is governed by an MIT-style
// license that can be found in the LICENSE file or at
// https://opensource.org/licenses/MIT.

//! Collaborator trait implementations over `Persistence`.

use staffdesk::{
    NewRole, RequestStore, RoleAdminStore, RoleSource, RoleSourceError, StatusUpdate, StoreError,
};
use staffdesk_domain::{
    Request, RequestKey, RequestPayload, RequestStatus, Role, RoleId, UserId,
};
use time::OffsetDateTime;

use crate::{Persistence, mutations, queries};

impl RequestStore for Persistence {
    fn find_request(&mut self, key: RequestKey) -> Result<Option<Request>, StoreError> {
        Ok(queries::requests::get_request(&mut self.conn, key)?)
    }

    fn staff_role_id(&mut self, staff_id: UserId) -> Result<Option<RoleId>, StoreError> {
        Ok(queries::staff::get_staff_role(&mut self.conn, staff_id)?)
    }

    fn list_own_requests(
        &mut self,
        staff_id: UserId,
        status: Option<RequestStatus>,
    ) -> Result<Vec<Request>, StoreError> {
        Ok(queries::requests::list_requests(
            &mut self.conn,
            staff_id,
            status,
        )?)
    }

    fn apply_status_update(&mut self, update: &StatusUpdate) -> Result<Request, StoreError> {
        Ok(mutations::requests::apply_status_update(
            &mut self.conn,
            update,
        )?)
    }

    fn insert_request(
        &mut self,
        staff_id: UserId,
        payload: &RequestPayload,
        now: OffsetDateTime,
    ) -> Result<Request, StoreError> {
        Ok(mutations::requests::insert_request(
            &mut self.conn,
            staff_id,
            payload,
            now,
        )?)
    }

    fn delete_pending_request(
        &mut self,
        key: RequestKey,
        staff_id: UserId,
    ) -> Result<(), StoreError> {
        Ok(mutations::requests::delete_pending_request(
            &mut self.conn,
            key,
            staff_id,
        )?)
    }
}

impl RoleSource for Persistence {
    fn fetch_roles(&mut self) -> Result<Vec<Role>, RoleSourceError> {
        queries::roles::list_roles(&mut self.conn).map_err(|e| RoleSourceError(e.to_string()))
    }
}

impl RoleAdminStore for Persistence {
    fn insert_role(&mut self, role: &NewRole) -> Result<Role, StoreError> {
        Ok(mutations::roles::insert_role(&mut self.conn, role)?)
    }

    fn update_role(&mut self, role: &Role) -> Result<Role, StoreError> {
        Ok(mutations::roles::update_role(&mut self.conn, role)?)
    }

    fn delete_role(&mut self, id: RoleId) -> Result<(), StoreError> {
        Ok(mutations::roles::delete_role(&mut self.conn, id)?)
    }

    fn set_hierarchy_levels(&mut self, levels: &[(RoleId, u32)]) -> Result<(), StoreError> {
        Ok(mutations::roles::set_hierarchy_levels(&mut self.conn, levels)?)
    }
}
