// Copyright (C) 2026 Fred Clausen
// Use of this source code is governed by an MIT-style
// license that can be found in the LICENSE file or at
// https://opensource.org/licenses/MIT.

use super::types::create_test_event;
use crate::{AuditEvent, AuditLog, AuditSink, AuditSinkError, TracingAuditSink};
use staffdesk_domain::{RequestKey, RequestKind};

struct BrokenSink;

impl AuditSink for BrokenSink {
    fn emit(&mut self, _event: &AuditEvent) -> Result<(), AuditSinkError> {
        Err(AuditSinkError::Unavailable(String::from("mail relay down")))
    }
}

#[test]
fn test_audit_log_records_in_order() {
    let mut log: AuditLog = AuditLog::new();
    log.emit(&create_test_event(1, "Approve")).unwrap();
    log.emit(&create_test_event(2, "Reject")).unwrap();
    log.emit(&create_test_event(1, "Revert")).unwrap();

    assert_eq!(log.len(), 3);
    let names: Vec<&str> = log
        .for_request(RequestKey::new(RequestKind::Leave, 1))
        .map(|event| event.action.name.as_str())
        .collect();
    assert_eq!(names, vec!["Approve", "Revert"]);
}

#[test]
fn test_tracing_sink_never_fails() {
    let mut sink: TracingAuditSink = TracingAuditSink;

    assert!(sink.emit(&create_test_event(1, "Approve")).is_ok());
}

#[test]
fn test_pair_delivers_to_second_even_when_first_fails() {
    let mut log: AuditLog = AuditLog::new();
    let result = (BrokenSink, &mut log).emit(&create_test_event(3, "Approve"));

    assert!(matches!(result, Err(AuditSinkError::Unavailable(_))));
    assert_eq!(log.len(), 1);
}
