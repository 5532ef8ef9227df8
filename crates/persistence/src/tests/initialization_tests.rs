// Copyright (C) 2026 Fred Clausen
// Use of this source code is governed by an MIT-style
// license that can be found in the LICENSE file or at
// https://opensource.org/licenses/MIT.

//! Backend initialization tests.

use entregas_domain::Role;

use super::{create_test_persistence, create_test_tenant, create_test_user};
use crate::Persistence;

#[test]
fn test_persistence_initialization() {
    let result = Persistence::new_in_memory();
    assert!(result.is_ok());
}

#[test]
fn test_foreign_keys_are_enforced() {
    let mut persistence = create_test_persistence();
    assert!(persistence.verify_foreign_key_enforcement().is_ok());
}

#[test]
fn test_multiple_in_memory_instances_are_isolated() {
    let mut db1 = create_test_persistence();
    let mut db2 = create_test_persistence();

    let tenant_id = create_test_tenant(&mut db1, "Empresa Demo");
    create_test_user(&mut db1, tenant_id, "joao", Role::Entregador);

    assert_eq!(db1.count_users().unwrap(), 1);
    assert_eq!(db2.count_users().unwrap(), 0, "db2 must not see db1 rows");
}

#[test]
fn test_file_database_survives_reopen() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("entregas.db");

    {
        let mut persistence = Persistence::new_with_file(&path)
            .unwrap()
            .with_bcrypt_cost(4);
        let tenant_id = create_test_tenant(&mut persistence, "Empresa Demo");
        create_test_user(&mut persistence, tenant_id, "joao", Role::Entregador);
    }

    let mut reopened = Persistence::new_with_file(&path).unwrap();
    assert_eq!(reopened.count_users().unwrap(), 1);
    assert!(reopened.get_tenant_by_name("Empresa Demo").unwrap().is_some());
}

#[test]
fn test_ensure_tenant_is_idempotent() {
    let mut persistence = create_test_persistence();

    let first = persistence.ensure_tenant("Empresa Demo").unwrap();
    let second = persistence.ensure_tenant("Empresa Demo").unwrap();

    assert_eq!(first.tenant_id, second.tenant_id);
    assert_eq!(
        persistence
            .get_tenant_by_id(first.tenant_id)
            .unwrap()
            .unwrap()
            .name,
        "Empresa Demo"
    );
}
