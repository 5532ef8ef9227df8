// Copyright (C) 2026 Fred Clausen
// Use of this source code is governed by an MIT-style
// license that can be found in the LICENSE file or at
// https://opensource.org/licenses/MIT.

//! Spreadsheet export tests.

use entregas_domain::{DeliveryStatus, Role};
use time::macros::date;

use super::helpers::{create_account, create_test_persistence, default_admin, delivery_form, test_now};
use crate::{
    ApiError, CreateDeliveryRequest, DeliveryRecord, ExportError, LogNotifier, create_delivery,
    export_file_name, export_my_deliveries, export_slice, export_tenant_deliveries, parse_export,
};

fn record(id: i64, client_name: &str, note: &str) -> DeliveryRecord {
    DeliveryRecord {
        delivery_id: id,
        entregador: String::from("joao"),
        client_name: client_name.to_string(),
        address: String::from("Av. Paulista, 1000, apto 12"),
        client_email: None,
        client_phone: Some(String::from("11 98888-7777")),
        status: DeliveryStatus::Delivered,
        note: note.to_string(),
        tracking_code: Some(String::from("ENT-00C0FFEE")),
        has_photo: true,
        has_signature: false,
        created_at: String::from("2026-03-01 10:00:00"),
    }
}

#[test]
fn test_export_reads_back_with_same_rows_and_text() {
    let records = vec![
        record(2, "Maria \"Mari\" Silva", "Frágil, cuidado\nsegunda linha"),
        record(1, "José", ""),
    ];

    let bytes = export_slice(&records).unwrap();
    let rows = parse_export(&bytes).unwrap();

    assert_eq!(rows.len(), 2);
    assert_eq!(rows[0].id, 2);
    assert_eq!(rows[0].client_name, "Maria \"Mari\" Silva");
    assert_eq!(rows[0].note, "Frágil, cuidado\nsegunda linha");
    assert_eq!(rows[0].address, "Av. Paulista, 1000, apto 12");
    assert_eq!(rows[0].client_email, None);
    assert_eq!(rows[0].status, DeliveryStatus::Delivered);
    assert!(rows[0].has_photo);
    assert!(!rows[0].has_signature);
    assert_eq!(rows[1].client_name, "José");
    assert_eq!(rows[1].note, "");
}

#[test]
fn test_empty_export_still_has_header() {
    let bytes = export_slice(&[]).unwrap();
    let text = String::from_utf8(bytes.clone()).unwrap();

    assert_eq!(
        text.trim_end(),
        "id,client_name,address,client_email,client_phone,status,note,created_at,entregador,tracking_code,has_photo,has_signature"
    );
    assert!(parse_export(&bytes).unwrap().is_empty());
}

#[test]
fn test_parse_rejects_foreign_header() {
    let result = parse_export(b"nome,endereco\nMaria,Rua 1\n");
    assert!(matches!(result, Err(ExportError::UnexpectedHeader(_))));
}

#[test]
fn test_export_file_name() {
    assert_eq!(
        export_file_name("joao", date!(2026 - 03 - 01)).unwrap(),
        "entregas-joao-2026-03-01.csv"
    );
}

#[test]
fn test_export_handlers_respect_scope_and_role() {
    let mut persistence = create_test_persistence();
    let admin = default_admin(&mut persistence);
    let joao = create_account(&mut persistence, "Empresa Demo", "joao", Role::Entregador);
    let ana = create_account(&mut persistence, "Empresa Demo", "ana", Role::Entregador);
    create_delivery(&mut persistence, &LogNotifier, &joao, delivery_form("A"), test_now()).unwrap();
    create_delivery(
        &mut persistence,
        &LogNotifier,
        &ana,
        CreateDeliveryRequest {
            client_email: None,
            ..delivery_form("B")
        },
        test_now(),
    )
    .unwrap();

    let mine = export_my_deliveries(&mut persistence, &joao, test_now()).unwrap();
    assert_eq!(mine.file_name, "entregas-joao-2026-03-01.csv");
    assert_eq!(mine.row_count, 1);
    assert_eq!(parse_export(&mine.content).unwrap()[0].client_name, "A");

    let all = export_tenant_deliveries(&mut persistence, &admin, test_now()).unwrap();
    assert_eq!(all.file_name, "entregas-all-2026-03-01.csv");
    assert_eq!(parse_export(&all.content).unwrap().len(), 2);

    assert!(matches!(
        export_tenant_deliveries(&mut persistence, &joao, test_now()),
        Err(ApiError::Unauthorized { .. })
    ));
}
