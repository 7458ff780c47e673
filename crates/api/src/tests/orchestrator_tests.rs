// Copyright (C) 2026 Fred Clausen
// Use of this source code is governed by an MIT-style
// license that can be found in the LICENSE file or at
// https://opensource.org/licenses/MIT.

use super::helpers::{
    ADMIN_ID, ADMIN_ROLE, EMPLOYEE_ID, FailingSink, LEAD_ID, LEAD_ROLE, MANAGER_ID, MemoryStore,
    OTHER_EMPLOYEE_ID, SECOND_ADMIN_ID, create_actor, create_admin, create_employee,
    create_manager, create_test_role_set, leave_payload, on_duty_payload, t0,
};
use crate::{ApprovalError, DecisionOutcome, decide, decide_by_key};
use staffdesk::Command;
use staffdesk_audit::AuditLog;
use staffdesk_domain::{Request, RequestKey, RequestKind, RequestStatus, RoleId, RoleSet, UserId};
use time::{Duration, OffsetDateTime};

fn later() -> OffsetDateTime {
    t0() + Duration::hours(2)
}

fn reject(reason: &str) -> Command {
    Command::Reject {
        reason: String::from(reason),
    }
}

#[test]
fn test_manager_approves_subordinate_leave() {
    let mut store: MemoryStore = MemoryStore::new();
    let mut log: AuditLog = AuditLog::new();
    let request: Request = store.seed(EMPLOYEE_ID, leave_payload());

    let outcome: DecisionOutcome = decide(
        &mut store,
        &mut log,
        &create_test_role_set(),
        &create_manager(),
        &request,
        Command::Approve,
        later(),
    )
    .unwrap();

    assert_eq!(outcome.request.status, RequestStatus::Approved);
    assert_eq!(outcome.request.manager_id, Some(MANAGER_ID));
    assert_eq!(outcome.request.updated_at, later());
    assert!(outcome.notified);
    assert_eq!(store.stored(request.key()), &outcome.request);

    assert_eq!(log.len(), 1);
    let event = &log.events()[0];
    assert_eq!(event.request, request.key());
    assert_eq!(event.from_status, RequestStatus::Pending);
    assert_eq!(event.to_status, RequestStatus::Approved);
    assert_eq!(event.actor.id, MANAGER_ID);
    assert_eq!(event.timestamp, later());
}

#[test]
fn test_reject_records_reason_and_decider() {
    let mut store: MemoryStore = MemoryStore::new();
    let mut log: AuditLog = AuditLog::new();
    let request: Request = store.seed(EMPLOYEE_ID, leave_payload());

    let outcome: DecisionOutcome = decide(
        &mut store,
        &mut log,
        &create_test_role_set(),
        &create_manager(),
        &request,
        reject("Insufficient notice"),
        later(),
    )
    .unwrap();

    assert_eq!(outcome.request.status, RequestStatus::Rejected);
    assert_eq!(
        outcome.request.rejection_reason.as_deref(),
        Some("Insufficient notice")
    );
    assert_eq!(outcome.request.manager_id, Some(MANAGER_ID));
}

#[test]
fn test_employee_cannot_decide() {
    let mut store: MemoryStore = MemoryStore::new();
    let mut log: AuditLog = AuditLog::new();
    let request: Request = store.seed(OTHER_EMPLOYEE_ID, leave_payload());

    let result = decide(
        &mut store,
        &mut log,
        &create_test_role_set(),
        &create_employee(),
        &request,
        Command::Approve,
        later(),
    );

    assert!(matches!(result, Err(ApprovalError::Unauthorized { .. })));
    assert_eq!(store.stored(request.key()), &request);
    assert!(log.is_empty());
}

#[test]
fn test_lower_authority_cannot_act_on_higher() {
    let mut store: MemoryStore = MemoryStore::new();
    let mut log: AuditLog = AuditLog::new();
    let request: Request = store.seed(ADMIN_ID, leave_payload());

    let result = decide(
        &mut store,
        &mut log,
        &create_test_role_set(),
        &create_manager(),
        &request,
        Command::Approve,
        later(),
    );

    assert!(matches!(result, Err(ApprovalError::Unauthorized { .. })));
    assert_eq!(store.writes, 0);
}

#[test]
fn test_peers_at_equal_level_may_approve_each_other() {
    let mut store: MemoryStore = MemoryStore::new();
    let mut log: AuditLog = AuditLog::new();
    let request: Request = store.seed(LEAD_ID, leave_payload());

    let outcome = decide(
        &mut store,
        &mut log,
        &create_test_role_set(),
        &create_manager(),
        &request,
        Command::Approve,
        later(),
    )
    .unwrap();

    assert_eq!(outcome.request.status, RequestStatus::Approved);
}

#[test]
fn test_kind_permission_gates_on_duty() {
    let mut store: MemoryStore = MemoryStore::new();
    let mut log: AuditLog = AuditLog::new();
    let roles: RoleSet = create_test_role_set();
    let lead = create_actor(LEAD_ID, LEAD_ROLE);
    let on_duty: Request = store.seed(EMPLOYEE_ID, on_duty_payload());
    let leave: Request = store.seed(EMPLOYEE_ID, leave_payload());

    let denied = decide(
        &mut store,
        &mut log,
        &roles,
        &lead,
        &on_duty,
        Command::Approve,
        later(),
    );
    let allowed = decide(
        &mut store,
        &mut log,
        &roles,
        &lead,
        &leave,
        Command::Approve,
        later(),
    );

    assert!(matches!(denied, Err(ApprovalError::Unauthorized { .. })));
    assert!(allowed.is_ok());
}

#[test]
fn test_blank_reject_reason_is_validation_error() {
    let mut store: MemoryStore = MemoryStore::new();
    let mut log: AuditLog = AuditLog::new();
    let request: Request = store.seed(EMPLOYEE_ID, leave_payload());

    for reason in ["", "   ", "\n\t"] {
        let result = decide(
            &mut store,
            &mut log,
            &create_test_role_set(),
            &create_manager(),
            &request,
            reject(reason),
            later(),
        );

        assert!(matches!(
            result,
            Err(ApprovalError::Validation { ref field, .. }) if field == "reason"
        ));
    }
    assert_eq!(store.stored(request.key()).status, RequestStatus::Pending);
    assert_eq!(store.writes, 0);
    assert!(log.is_empty());
}

#[test]
fn test_approve_twice_is_invalid_transition() {
    let mut store: MemoryStore = MemoryStore::new();
    let mut log: AuditLog = AuditLog::new();
    let request: Request =
        store.seed_decided(EMPLOYEE_ID, RequestStatus::Approved, MANAGER_ID, None);

    let result = decide(
        &mut store,
        &mut log,
        &create_test_role_set(),
        &create_manager(),
        &request,
        Command::Approve,
        later(),
    );

    assert_eq!(
        result,
        Err(ApprovalError::InvalidTransition {
            from: RequestStatus::Approved,
            action: String::from("Approve"),
        })
    );
}

#[test]
fn test_revert_then_revert_again() {
    let mut store: MemoryStore = MemoryStore::new();
    let mut log: AuditLog = AuditLog::new();
    let roles: RoleSet = create_test_role_set();
    let request: Request = store.seed_decided(
        EMPLOYEE_ID,
        RequestStatus::Rejected,
        MANAGER_ID,
        Some("No cover"),
    );

    let reverted = decide(
        &mut store,
        &mut log,
        &roles,
        &create_admin(),
        &request,
        Command::Revert,
        later(),
    )
    .unwrap();
    assert_eq!(reverted.request.status, RequestStatus::Pending);
    assert_eq!(reverted.request.manager_id, None);
    assert_eq!(reverted.request.rejection_reason, None);

    let again = decide(
        &mut store,
        &mut log,
        &roles,
        &create_admin(),
        &reverted.request,
        Command::Revert,
        later(),
    );
    assert!(matches!(
        again,
        Err(ApprovalError::InvalidTransition {
            from: RequestStatus::Pending,
            ..
        })
    ));
}

#[test]
fn test_edit_reason_by_other_admin_is_unauthorized() {
    let mut store: MemoryStore = MemoryStore::new();
    let mut log: AuditLog = AuditLog::new();
    let request: Request =
        store.seed_decided(EMPLOYEE_ID, RequestStatus::Rejected, ADMIN_ID, Some("No cover"));
    let other_admin = create_actor(SECOND_ADMIN_ID, ADMIN_ROLE);

    let result = decide(
        &mut store,
        &mut log,
        &create_test_role_set(),
        &other_admin,
        &request,
        Command::EditReason {
            reason: String::from("Overruled"),
        },
        later(),
    );

    assert!(matches!(result, Err(ApprovalError::Unauthorized { .. })));
    assert_eq!(store.stored(request.key()), &request);
}

#[test]
fn test_edit_reason_by_decider() {
    let mut store: MemoryStore = MemoryStore::new();
    let mut log: AuditLog = AuditLog::new();
    let request: Request =
        store.seed_decided(EMPLOYEE_ID, RequestStatus::Rejected, ADMIN_ID, Some("No cover"));

    let outcome = decide(
        &mut store,
        &mut log,
        &create_test_role_set(),
        &create_admin(),
        &request,
        Command::EditReason {
            reason: String::from("No cover during stocktake"),
        },
        later(),
    )
    .unwrap();

    assert_eq!(outcome.request.status, RequestStatus::Rejected);
    assert_eq!(
        outcome.request.rejection_reason.as_deref(),
        Some("No cover during stocktake")
    );
    assert_eq!(outcome.event.from_status, RequestStatus::Rejected);
    assert_eq!(outcome.event.to_status, RequestStatus::Rejected);
}

#[test]
fn test_concurrent_decision_surfaces_conflict() {
    let mut store: MemoryStore = MemoryStore::new();
    let mut log: AuditLog = AuditLog::new();
    let roles: RoleSet = create_test_role_set();
    let stale: Request = store.seed(EMPLOYEE_ID, leave_payload());

    decide(
        &mut store,
        &mut log,
        &roles,
        &create_admin(),
        &stale,
        Command::Approve,
        later(),
    )
    .unwrap();
    let result = decide(
        &mut store,
        &mut log,
        &roles,
        &create_manager(),
        &stale,
        reject("Too late"),
        later(),
    );

    assert!(matches!(result, Err(ApprovalError::Conflict(_))));
    let stored = store.stored(stale.key());
    assert_eq!(stored.status, RequestStatus::Approved);
    assert_eq!(stored.manager_id, Some(ADMIN_ID));
    assert_eq!(log.len(), 1);
}

#[test]
fn test_stale_copy_of_replaced_request_is_conflict() {
    let mut store: MemoryStore = MemoryStore::new();
    let mut log: AuditLog = AuditLog::new();
    let stale: Request = store.seed(EMPLOYEE_ID, leave_payload());

    // Same key, different owner: the row the manager read is gone.
    let mut replacement: Request = stale.clone();
    replacement.staff_id = SECOND_ADMIN_ID;
    store.requests.insert(replacement.key(), replacement);

    let result = decide(
        &mut store,
        &mut log,
        &create_test_role_set(),
        &create_manager(),
        &stale,
        Command::Approve,
        later(),
    );

    assert!(matches!(result, Err(ApprovalError::Conflict(_))));
    let stored = store.stored(stale.key());
    assert_eq!(stored.status, RequestStatus::Pending);
    assert_eq!(stored.staff_id, SECOND_ADMIN_ID);
    assert!(log.is_empty());
    assert_eq!(store.writes, 0);
}

#[test]
fn test_audit_failure_does_not_undo_decision() {
    let mut store: MemoryStore = MemoryStore::new();
    let request: Request = store.seed(EMPLOYEE_ID, leave_payload());

    let outcome = decide(
        &mut store,
        &mut FailingSink,
        &create_test_role_set(),
        &create_manager(),
        &request,
        Command::Approve,
        later(),
    )
    .unwrap();

    assert!(!outcome.notified);
    assert_eq!(
        store.stored(request.key()).status,
        RequestStatus::Approved
    );
}

#[test]
fn test_store_failure_is_upstream() {
    let mut store: MemoryStore = MemoryStore::new();
    let mut log: AuditLog = AuditLog::new();
    let request: Request = store.seed(EMPLOYEE_ID, leave_payload());
    store.unavailable = true;

    let result = decide(
        &mut store,
        &mut log,
        &create_test_role_set(),
        &create_manager(),
        &request,
        Command::Approve,
        later(),
    );

    assert!(matches!(result, Err(ApprovalError::Upstream(_))));
    assert!(log.is_empty());
}

#[test]
fn test_decide_by_unknown_key_is_not_found() {
    let mut store: MemoryStore = MemoryStore::new();
    let mut log: AuditLog = AuditLog::new();

    let result = decide_by_key(
        &mut store,
        &mut log,
        &create_test_role_set(),
        &create_manager(),
        RequestKey::new(RequestKind::TimeOff, 404),
        Command::Approve,
        later(),
    );

    assert!(matches!(result, Err(ApprovalError::NotFound { .. })));
}

#[test]
fn test_decide_by_key_loads_current_state() {
    let mut store: MemoryStore = MemoryStore::new();
    let mut log: AuditLog = AuditLog::new();
    let request: Request = store.seed(EMPLOYEE_ID, leave_payload());

    let outcome = decide_by_key(
        &mut store,
        &mut log,
        &create_test_role_set(),
        &create_manager(),
        request.key(),
        Command::Approve,
        later(),
    )
    .unwrap();

    assert_eq!(outcome.request.key(), request.key());
    assert_eq!(outcome.request.status, RequestStatus::Approved);
}

#[test]
fn test_owner_without_known_role_is_unauthorized() {
    let mut store: MemoryStore = MemoryStore::new();
    let mut log: AuditLog = AuditLog::new();
    store.staff.insert(UserId(99), RoleId(77));
    let request: Request = store.seed(UserId(99), leave_payload());

    let result = decide(
        &mut store,
        &mut log,
        &create_test_role_set(),
        &create_admin(),
        &request,
        Command::Approve,
        later(),
    );

    assert!(matches!(result, Err(ApprovalError::Unauthorized { .. })));
}

#[test]
fn test_missing_owner_is_not_found() {
    let mut store: MemoryStore = MemoryStore::new();
    let mut log: AuditLog = AuditLog::new();
    let request: Request = store.seed(EMPLOYEE_ID, leave_payload());
    store.staff.remove(&EMPLOYEE_ID);

    let result = decide(
        &mut store,
        &mut log,
        &create_test_role_set(),
        &create_admin(),
        &request,
        Command::Approve,
        later(),
    );

    assert!(matches!(result, Err(ApprovalError::NotFound { .. })));
}
