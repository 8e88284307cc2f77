//! Custom roles: input validation, permission handling and lookups.

use sankalp::domain::{
    toggle_permission, Branch, BranchId, BranchKind, CustomRole, DomainError, Permission,
    RoleBook, RoleInput,
};

fn forest() -> Vec<Branch> {
    vec![Branch {
        id: "1".into(),
        name: "North Region".into(),
        kind: BranchKind::Branch,
        location: "Delhi".into(),
        head: "Amit Kumar".into(),
        parent_id: None,
        children: vec![Branch {
            id: "3".into(),
            name: "Delhi Chapter".into(),
            kind: BranchKind::Unit,
            location: "Delhi".into(),
            head: "Priya Singh".into(),
            parent_id: Some("1".into()),
            children: vec![],
        }],
    }]
}

fn role(id: &str, branch: &str) -> CustomRole {
    CustomRole {
        id: id.into(),
        name: format!("role {id}"),
        permissions: vec![Permission::ViewAnalytics],
        branch_id: branch.into(),
    }
}

#[test]
fn given_repeated_permissions_when_creating_role_then_deduplicated_in_order() {
    let input = RoleInput {
        name: "  Treasurer ".into(),
        branch_id: Some("1".into()),
        permissions: vec![
            Permission::ManageBudget,
            Permission::ViewAnalytics,
            Permission::ManageBudget,
        ],
    };

    let role = input.into_role("42".into()).unwrap();

    assert_eq!(role.name, "Treasurer");
    assert_eq!(
        role.permissions,
        vec![Permission::ManageBudget, Permission::ViewAnalytics]
    );
    assert_eq!(role.branch_id, BranchId::from("1"));
}

#[test]
fn given_role_without_branch_when_validating_then_missing_field() {
    let input = RoleInput {
        name: "Lead".into(),
        branch_id: None,
        permissions: vec![],
    };

    assert_eq!(input.validate(), Err(DomainError::MissingField("branch")));
}

#[test]
fn given_blank_name_when_validating_then_missing_field() {
    let input = RoleInput {
        name: "   ".into(),
        branch_id: Some("1".into()),
        permissions: vec![],
    };

    assert_eq!(input.validate(), Err(DomainError::MissingField("name")));
}

#[test]
fn given_permission_toggled_twice_when_done_then_list_restored() {
    let mut perms = vec![Permission::CreateEvents];

    toggle_permission(&mut perms, Permission::EditContent);
    assert_eq!(perms, vec![Permission::CreateEvents, Permission::EditContent]);

    toggle_permission(&mut perms, Permission::EditContent);
    assert_eq!(perms, vec![Permission::CreateEvents]);
}

#[test]
fn given_all_permissions_when_round_tripping_names_then_parse_back() {
    for permission in Permission::ALL {
        assert_eq!(permission.as_str().parse::<Permission>(), Ok(permission));
    }
}

#[test]
fn given_role_on_nested_branch_when_resolving_branch_name_then_found() {
    let forest = forest();

    assert_eq!(RoleBook::branch_name(&forest, &role("r", "3")), Some("Delhi Chapter"));
    assert_eq!(RoleBook::branch_name(&forest, &role("r", "1")), Some("North Region"));
    assert_eq!(RoleBook::branch_name(&forest, &role("r", "404")), None);
}

#[test]
fn given_roles_on_several_branches_when_filtering_then_only_that_branch() {
    let mut book = RoleBook::new();
    book.add(role("a", "1"));
    book.add(role("b", "3"));
    book.add(role("c", "1"));

    let branch = BranchId::from("1");
    let ids: Vec<&str> = book.for_branch(&branch).map(|r| r.id.as_str()).collect();

    assert_eq!(ids, vec!["a", "c"]);
    assert_eq!(book.len(), 3);
    assert_eq!(book.get("b").map(|r| r.branch_id.as_str()), Some("3"));
}
