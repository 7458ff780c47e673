// Copyright (C) 2026 Fred Clausen
// Use of this source code is governed by an MIT-style
// license that can be found in the LICENSE file or at
// https://opensource.org/licenses/MIT.

use super::helpers::{
    MANAGER_ID, OTHER_ADMIN_ID, create_decided_leave, create_pending_leave, create_test_actor, t0,
};
use crate::{Command, CoreError, TransitionResult, apply};
use staffdesk_domain::{DomainError, Request, RequestStatus};
use time::{Duration, OffsetDateTime};

fn later() -> OffsetDateTime {
    t0() + Duration::hours(3)
}

#[test]
fn test_approve_pending_sets_decider_and_clears_reason() {
    let request: Request = create_pending_leave();

    let result: TransitionResult = apply(
        &request,
        Command::Approve,
        create_test_actor(MANAGER_ID),
        later(),
    )
    .unwrap();

    assert_eq!(result.request.status, RequestStatus::Approved);
    assert_eq!(result.request.manager_id, Some(MANAGER_ID));
    assert_eq!(result.request.rejection_reason, None);
    assert_eq!(result.request.updated_at, later());
    assert_eq!(result.request.created_at, t0());
    assert_eq!(result.update.expected_staff_id, request.staff_id);
    assert_eq!(result.update.expected_created_at, t0());
    assert_eq!(result.update.expected_status, RequestStatus::Pending);
    assert_eq!(result.update.expected_manager_id, None);
    assert_eq!(result.audit_event.from_status, RequestStatus::Pending);
    assert_eq!(result.audit_event.to_status, RequestStatus::Approved);
    assert_eq!(result.audit_event.action.name, "Approve");
    assert_eq!(result.audit_event.actor.id, MANAGER_ID);
}

#[test]
fn test_reject_with_reason_records_reason() {
    let request: Request = create_pending_leave();

    let result: TransitionResult = apply(
        &request,
        Command::Reject {
            reason: String::from("Insufficient notice"),
        },
        create_test_actor(MANAGER_ID),
        later(),
    )
    .unwrap();

    assert_eq!(result.request.status, RequestStatus::Rejected);
    assert_eq!(
        result.request.rejection_reason.as_deref(),
        Some("Insufficient notice")
    );
    assert_eq!(result.request.manager_id, Some(MANAGER_ID));
    assert_eq!(
        result.audit_event.action.details.as_deref(),
        Some("Insufficient notice")
    );
}

#[test]
fn test_reject_reason_is_trimmed() {
    let request: Request = create_pending_leave();

    let result: TransitionResult = apply(
        &request,
        Command::Reject {
            reason: String::from("  Overlaps audit week \n"),
        },
        create_test_actor(MANAGER_ID),
        later(),
    )
    .unwrap();

    assert_eq!(
        result.update.rejection_reason.as_deref(),
        Some("Overlaps audit week")
    );
}

#[test]
fn test_blank_reject_reason_is_validation_error_from_every_status() {
    let requests: Vec<Request> = vec![
        create_pending_leave(),
        create_decided_leave(RequestStatus::Approved, None),
        create_decided_leave(RequestStatus::Rejected, Some("Old reason")),
    ];

    for request in requests {
        for reason in ["", "   ", "\t"] {
            let result = apply(
                &request,
                Command::Reject {
                    reason: String::from(reason),
                },
                create_test_actor(MANAGER_ID),
                later(),
            );
            assert_eq!(
                result,
                Err(CoreError::DomainViolation(DomainError::EmptyRejectionReason))
            );
        }
    }
}

#[test]
fn test_approve_already_approved_is_invalid_transition() {
    let request: Request = create_decided_leave(RequestStatus::Approved, None);

    let result = apply(
        &request,
        Command::Approve,
        create_test_actor(MANAGER_ID),
        later(),
    );

    assert_eq!(
        result,
        Err(CoreError::InvalidTransition {
            from: RequestStatus::Approved,
            action: "Approve",
        })
    );
}

#[test]
fn test_reject_approved_is_invalid_transition() {
    let request: Request = create_decided_leave(RequestStatus::Approved, None);

    let result = apply(
        &request,
        Command::Reject {
            reason: String::from("Changed my mind"),
        },
        create_test_actor(MANAGER_ID),
        later(),
    );

    assert!(matches!(
        result,
        Err(CoreError::InvalidTransition {
            from: RequestStatus::Approved,
            ..
        })
    ));
}

#[test]
fn test_revert_returns_decided_requests_to_pending() {
    for request in [
        create_decided_leave(RequestStatus::Approved, None),
        create_decided_leave(RequestStatus::Rejected, Some("No cover")),
    ] {
        let result: TransitionResult = apply(
            &request,
            Command::Revert,
            create_test_actor(OTHER_ADMIN_ID),
            later(),
        )
        .unwrap();

        assert_eq!(result.request.status, RequestStatus::Pending);
        assert_eq!(result.request.manager_id, None);
        assert_eq!(result.request.rejection_reason, None);
        assert_eq!(result.update.expected_manager_id, Some(MANAGER_ID));
        assert_eq!(result.audit_event.to_status, RequestStatus::Pending);
    }
}

#[test]
fn test_revert_pending_is_invalid_transition() {
    let request: Request = create_pending_leave();

    let result = apply(
        &request,
        Command::Revert,
        create_test_actor(MANAGER_ID),
        later(),
    );

    assert_eq!(
        result,
        Err(CoreError::InvalidTransition {
            from: RequestStatus::Pending,
            action: "Revert",
        })
    );
}

#[test]
fn test_revert_twice_fails_second_time() {
    let request: Request = create_decided_leave(RequestStatus::Approved, None);
    let first: TransitionResult = apply(
        &request,
        Command::Revert,
        create_test_actor(MANAGER_ID),
        later(),
    )
    .unwrap();

    let second = apply(
        &first.request,
        Command::Revert,
        create_test_actor(MANAGER_ID),
        later(),
    );

    assert!(matches!(second, Err(CoreError::InvalidTransition { .. })));
}

#[test]
fn test_edit_reason_by_decider_replaces_reason_only() {
    let request: Request = create_decided_leave(RequestStatus::Rejected, Some("No cover"));

    let result: TransitionResult = apply(
        &request,
        Command::EditReason {
            reason: String::from("No cover on the night roster"),
        },
        create_test_actor(MANAGER_ID),
        later(),
    )
    .unwrap();

    assert_eq!(result.request.status, RequestStatus::Rejected);
    assert_eq!(result.request.manager_id, Some(MANAGER_ID));
    assert_eq!(
        result.request.rejection_reason.as_deref(),
        Some("No cover on the night roster")
    );
    assert_eq!(result.request.updated_at, later());
    assert_eq!(result.audit_event.from_status, RequestStatus::Rejected);
    assert_eq!(result.audit_event.to_status, RequestStatus::Rejected);
}

#[test]
fn test_edit_reason_by_other_admin_is_rejected() {
    let request: Request = create_decided_leave(RequestStatus::Rejected, Some("No cover"));

    let result = apply(
        &request,
        Command::EditReason {
            reason: String::from("Overruled"),
        },
        create_test_actor(OTHER_ADMIN_ID),
        later(),
    );

    assert_eq!(
        result,
        Err(CoreError::NotDecider {
            actor: OTHER_ADMIN_ID,
            decider: Some(MANAGER_ID),
        })
    );
}

#[test]
fn test_edit_reason_on_pending_has_no_decider() {
    let request: Request = create_pending_leave();

    let result = apply(
        &request,
        Command::EditReason {
            reason: String::from("Anything"),
        },
        create_test_actor(MANAGER_ID),
        later(),
    );

    assert!(matches!(
        result,
        Err(CoreError::NotDecider { decider: None, .. })
    ));
}

#[test]
fn test_edit_reason_on_approved_by_decider_is_invalid_transition() {
    let request: Request = create_decided_leave(RequestStatus::Approved, None);

    let result = apply(
        &request,
        Command::EditReason {
            reason: String::from("Should not apply"),
        },
        create_test_actor(MANAGER_ID),
        later(),
    );

    assert!(matches!(
        result,
        Err(CoreError::InvalidTransition {
            from: RequestStatus::Approved,
            action: "EditReason",
        })
    ));
}

#[test]
fn test_edit_reason_blank_is_validation_error() {
    let request: Request = create_decided_leave(RequestStatus::Rejected, Some("No cover"));

    let result = apply(
        &request,
        Command::EditReason {
            reason: String::from(" "),
        },
        create_test_actor(MANAGER_ID),
        later(),
    );

    assert_eq!(
        result,
        Err(CoreError::DomainViolation(DomainError::EmptyRejectionReason))
    );
}

#[test]
fn test_apply_does_not_touch_input() {
    let request: Request = create_pending_leave();
    let before: Request = request.clone();

    let _ = apply(
        &request,
        Command::Approve,
        create_test_actor(MANAGER_ID),
        later(),
    );

    assert_eq!(request, before);
}
