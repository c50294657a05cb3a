use crudrepo_core::db::open_shared_db_in_memory;
use crudrepo_core::{
    role_repository, Action, CrudRepository, CrudService, ErrorKind, FindOptions,
    ResourceActions, Role, RoleRepository, SortDirection,
};

const ROLE_ID: &str = "a24a6ea4-ce75-4665-a070-57453082c256";

fn repo() -> RoleRepository {
    role_repository(open_shared_db_in_memory().unwrap()).unwrap()
}

fn report_actions() -> Vec<ResourceActions> {
    vec![ResourceActions {
        resource_id: "reports".to_string(),
        actions: vec![
            Action {
                name: "read".to_string(),
                permission: true,
            },
            Action {
                name: "export".to_string(),
                permission: false,
            },
        ],
    }]
}

#[test]
fn create_with_uuid_persists_role_and_fills_created_at() {
    let repo = repo();
    let role = Role::with_id(ROLE_ID, "auditor", report_actions());

    let created = repo.create(&role).unwrap();
    assert_eq!(created.id, ROLE_ID);
    assert_eq!(created.name, "auditor");
    assert_eq!(created.resource_actions, report_actions());
    assert!(created.created_at.is_some());

    assert_eq!(repo.find_one(ROLE_ID).unwrap(), created);
}

#[test]
fn create_with_non_uuid_id_is_rejected_before_store() {
    let repo = repo();
    let role = Role::with_id("1", "nn", Vec::new());

    let err = repo.create(&role).unwrap_err();
    assert_eq!(err.kind, ErrorKind::InvalidId);
    assert_eq!(err.message, "Id passed is not valid UUID");
    assert!(err.cause.is_none());

    assert!(repo.find(&FindOptions::default()).unwrap().is_empty());
}

#[test]
fn update_keeps_created_at_assigned_on_insert() {
    let repo = repo();
    let created = repo.create(&Role::new("viewer", Vec::new())).unwrap();

    let mut renamed = created.clone();
    renamed.name = "reader".to_string();
    renamed.created_at = None;
    renamed.resource_actions = report_actions();
    repo.update(&renamed).unwrap();

    let loaded = repo.find_one(&created.id).unwrap();
    assert_eq!(loaded.name, "reader");
    assert_eq!(loaded.created_at, created.created_at);
    assert!(loaded.allows("reports", "read"));
    assert!(!loaded.allows("reports", "export"));
}

#[test]
fn non_create_operations_are_not_uuid_checked() {
    let repo = repo();

    assert_eq!(repo.find_one("1").unwrap_err().kind, ErrorKind::NotFound);
    assert_eq!(repo.delete("1").unwrap_err().kind, ErrorKind::DeleteFailed);
    assert_eq!(repo.find_one("").unwrap_err().kind, ErrorKind::InvalidId);
}

#[test]
fn find_pages_roles_by_name() {
    let repo = repo();
    for name in ["c-role", "a-role", "b-role", "d-role"] {
        repo.create(&Role::new(name, Vec::new())).unwrap();
    }

    let page = FindOptions::page(2, 1).ordered_by("name", SortDirection::Asc);
    let names: Vec<_> = repo
        .find(&page)
        .unwrap()
        .into_iter()
        .map(|role| role.name)
        .collect();
    assert_eq!(names, vec!["c-role"]);
}

#[test]
fn service_wraps_repository_calls() {
    let service = CrudService::new(repo());
    let role = Role::with_id(ROLE_ID, "owner", report_actions());

    let created = service.create(&role).unwrap();
    assert_eq!(service.find_one(ROLE_ID).unwrap(), created);
    assert_eq!(service.find(&FindOptions::default()).unwrap(), vec![created]);

    let err = service.create(&Role::with_id("ss", "owner", Vec::new())).unwrap_err();
    assert_eq!(err.kind, ErrorKind::InvalidId);

    assert!(service.delete(ROLE_ID).unwrap().success);
    assert_eq!(
        service.find_one(ROLE_ID).unwrap_err().message,
        "Role not found for id: a24a6ea4-ce75-4665-a070-57453082c256"
    );
}

#[test]
fn stacked_services_delegate_unchanged() {
    let service = CrudService::new(CrudService::new(repo()));
    let created = service
        .create(&Role::with_id(ROLE_ID, "owner", Vec::new()))
        .unwrap();
    assert_eq!(service.find_one(ROLE_ID).unwrap(), created);
    assert!(service.update(&created).unwrap().success);
}

#[test]
fn service_is_usable_as_a_trait_object() {
    let service = CrudService::new(repo());
    let roles: &dyn CrudRepository<Record = Role> = &service;

    let created = roles
        .create(&Role::with_id(ROLE_ID, "owner", report_actions()))
        .unwrap();
    assert_eq!(service.repository().find_one(ROLE_ID).unwrap(), created);
    assert_eq!(roles.find_one(ROLE_ID).unwrap(), created);
}
