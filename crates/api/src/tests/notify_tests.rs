// Copyright (C) 2026 Fred Clausen
// Use of this source code is governed by an MIT-style
// license that can be found in the LICENSE file or at
// https://opensource.org/licenses/MIT.

use entregas_domain::DeliveryStatus;

use crate::{DeliveryNotifier, DeliveryRecord, NotifyError, SpoolNotifier};

fn record(client_email: Option<&str>) -> DeliveryRecord {
    DeliveryRecord {
        delivery_id: 7,
        entregador: String::from("joao"),
        client_name: String::from("Maria"),
        address: String::from("Rua das Flores, 12"),
        client_email: client_email.map(ToString::to_string),
        client_phone: None,
        status: DeliveryStatus::Delivered,
        note: String::new(),
        tracking_code: Some(String::from("ENT-0000BEEF")),
        has_photo: false,
        has_signature: false,
        created_at: String::from("2026-03-01 10:00:00"),
    }
}

#[test]
fn test_spool_notifier_writes_message() {
    let dir = tempfile::tempdir().unwrap();
    let notifier = SpoolNotifier::new(dir.path().join("outbox"), "entregas@example.com");

    notifier
        .notify_delivery(&record(Some("maria@example.com")))
        .unwrap();

    let message =
        std::fs::read_to_string(dir.path().join("outbox").join("delivery-7.eml")).unwrap();
    assert!(message.starts_with("From: entregas@example.com\r\n"));
    assert!(message.contains("To: maria@example.com\r\n"));
    assert!(message.contains("Date: Sun, 01 Mar 2026 10:00:00 +0000\r\n"));
    assert!(message.contains("Subject: Entrega registrada ENT-0000BEEF\r\n"));
    assert!(message.contains("Status: Delivered"));
}

#[test]
fn test_spool_notifier_skips_records_without_email() {
    let dir = tempfile::tempdir().unwrap();
    let notifier = SpoolNotifier::new(dir.path(), "entregas@example.com");

    notifier.notify_delivery(&record(None)).unwrap();

    assert_eq!(std::fs::read_dir(notifier.spool_dir()).unwrap().count(), 0);
}

#[test]
fn test_header_values_cannot_inject_headers() {
    let notifier = SpoolNotifier::new("/unused", "entregas@example.com");

    let message = notifier
        .render_message(&record(None), "maria@example.com\r\nBcc: x@example.com")
        .unwrap();

    assert!(message.contains("To: maria@example.comBcc: x@example.com\r\n"));
    assert!(!message.contains("\r\nBcc:"));
}

#[test]
fn test_unwritable_spool_reports_error() {
    let dir = tempfile::tempdir().unwrap();
    let blocker = dir.path().join("not-a-dir");
    std::fs::write(&blocker, b"x").unwrap();
    let notifier = SpoolNotifier::new(&blocker, "entregas@example.com");

    let result = notifier.notify_delivery(&record(Some("maria@example.com")));

    assert!(matches!(result, Err(NotifyError::Spool { .. })));
}
