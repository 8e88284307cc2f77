//! Tests for OrganizationService

use std::sync::Arc;

use sankalp::application::services::{OrganizationService, OrganizationSession};
use sankalp::application::ApplicationError;
use sankalp::domain::forest;
use sankalp::domain::{
    ActivityKind, BranchFilter, BranchId, BranchInput, BranchKind, DomainError, Permission,
    RoleInput,
};
use sankalp::infrastructure::traits::SequentialIdGenerator;
use sankalp::util::testing;

fn service() -> OrganizationService {
    testing::init_test_setup();
    OrganizationService::new(Arc::new(SequentialIdGenerator::starting_at(100)))
}

fn input(name: &str, parent: Option<&str>) -> BranchInput {
    BranchInput {
        name: name.into(),
        kind: BranchKind::Division,
        location: "Mumbai".into(),
        head: "Sunita Rao".into(),
        parent_id: parent.map(BranchId::from),
    }
}

fn domain_err(result: Result<impl std::fmt::Debug, ApplicationError>) -> DomainError {
    match result {
        Err(ApplicationError::Domain(e)) => e,
        other => panic!("expected domain error, got {:?}", other),
    }
}

#[test]
fn given_sample_when_creating_root_branch_then_appended_with_generated_id() {
    let service = service();
    let mut session = OrganizationSession::sample();

    let id = service.create_branch(&mut session, input("West Region", None)).unwrap();

    assert_eq!(id, BranchId::from("100"));
    assert_eq!(session.branches.len(), 3);
    assert_eq!(session.branches[2].name, "West Region");
    assert_eq!(session.branches[2].parent_id, None);
}

#[test]
fn given_nested_parent_when_creating_branch_then_attached_below_it() {
    let service = service();
    let mut session = OrganizationSession::sample();

    let id = service
        .create_branch(&mut session, input("Saket Unit", Some("3")))
        .unwrap();

    let chapter = forest::find(&session.branches, &"3".into()).unwrap();
    assert_eq!(chapter.children.len(), 1);
    assert_eq!(chapter.children[0].id, id);
    assert_eq!(chapter.children[0].parent_id, Some(BranchId::from("3")));
    assert_eq!(
        service.branch_path(&session, &id).unwrap(),
        vec!["North Region", "Delhi Chapter", "Saket Unit"]
    );
}

#[test]
fn given_unknown_parent_when_creating_branch_then_error_and_session_unchanged() {
    let service = service();
    let mut session = OrganizationSession::sample();
    let before = session.clone();

    let err = domain_err(service.create_branch(&mut session, input("Lost", Some("99"))));

    assert_eq!(err, DomainError::ParentNotFound("99".into()));
    assert_eq!(session, before);
}

#[test]
fn given_blank_head_when_creating_branch_then_missing_field() {
    let service = service();
    let mut session = OrganizationSession::empty();
    let mut blank = input("Somewhere", None);
    blank.head = "  ".into();

    let err = domain_err(service.create_branch(&mut session, blank));

    assert_eq!(err, DomainError::MissingField("head"));
    assert!(session.branches.is_empty());
}

#[test]
fn given_generator_reusing_existing_id_when_creating_branch_then_duplicate_rejected() {
    let service = OrganizationService::new(Arc::new(SequentialIdGenerator::starting_at(2)));
    let mut session = OrganizationSession::sample();

    let err = domain_err(service.create_branch(&mut session, input("Clash", None)));

    assert_eq!(err, DomainError::DuplicateBranchId("2".into()));
}

#[test]
fn given_branch_when_toggling_twice_then_expanded_then_collapsed() {
    let service = service();
    let mut session = OrganizationSession::sample();
    let north = BranchId::from("1");

    assert!(service.toggle_expand(&mut session, &north).unwrap());
    let views = service.render(&session);
    assert_eq!(views[0].children.len(), 1);

    assert!(!service.toggle_expand(&mut session, &north).unwrap());
    assert!(session.expanded.is_empty());
}

#[test]
fn given_unknown_branch_when_toggling_then_not_found() {
    let service = service();
    let mut session = OrganizationSession::sample();

    let err = domain_err(service.toggle_expand(&mut session, &"nope".into()));

    assert_eq!(err, DomainError::BranchNotFound("nope".into()));
    assert!(session.expanded.is_empty());
}

#[test]
fn given_fresh_sample_when_rendering_then_only_regions_visible() {
    let service = service();
    let session = OrganizationSession::sample();

    let visible: usize = service.render(&session).iter().map(|v| v.visible_count()).sum();

    assert_eq!(visible, 2);
}

#[test]
fn given_expand_all_then_collapse_all_when_rendering_then_back_to_roots() {
    let service = service();
    let mut session = OrganizationSession::sample();

    service.expand_all(&mut session);
    let expanded: usize = service.render(&session).iter().map(|v| v.visible_count()).sum();
    service.collapse_all(&mut session);
    let collapsed: usize = service.render(&session).iter().map(|v| v.visible_count()).sum();

    assert_eq!(expanded, 3);
    assert_eq!(collapsed, 2);
}

#[test]
fn given_existing_branch_when_creating_role_then_listed_with_id() {
    let service = service();
    let mut session = OrganizationSession::sample();

    let id = service
        .create_role(
            &mut session,
            RoleInput {
                name: "Content Editor".into(),
                branch_id: Some("3".into()),
                permissions: vec![Permission::EditContent, Permission::EditContent],
            },
        )
        .unwrap();

    let role = session.roles.get(&id).unwrap();
    assert_eq!(session.roles.len(), 3);
    assert_eq!(role.permissions, vec![Permission::EditContent]);
    assert_eq!(role.branch_id, BranchId::from("3"));
}

#[test]
fn given_unknown_branch_when_creating_role_then_not_found_and_no_role_added() {
    let service = service();
    let mut session = OrganizationSession::sample();

    let err = domain_err(service.create_role(
        &mut session,
        RoleInput {
            name: "Ghost".into(),
            branch_id: Some("404".into()),
            permissions: vec![],
        },
    ));

    assert_eq!(err, DomainError::BranchNotFound("404".into()));
    assert_eq!(session.roles.len(), 2);
}

#[test]
fn given_empty_session_when_creating_under_missing_parent_then_error_names_that_parent() {
    let service = service();
    let mut session = OrganizationSession::empty();

    let err = domain_err(service.create_branch(&mut session, input("Orphan", Some("7"))));

    assert_eq!(err, DomainError::ParentNotFound("7".into()));
    assert!(session.branches.is_empty());
}

#[test]
fn given_nested_branch_when_revealing_then_it_and_all_ancestors_expand() {
    let service = service();
    let mut session = OrganizationSession::sample();
    let unit = service
        .create_branch(&mut session, input("Saket Unit", Some("3")))
        .unwrap();

    service.reveal(&mut session, &unit).unwrap();

    for id in [unit.as_str(), "3", "1"] {
        assert!(session.expanded.is_expanded(&BranchId::from(id)), "{id} collapsed");
    }
    assert!(!session.expanded.is_expanded(&BranchId::from("2")));
    let visible: usize = service.render(&session).iter().map(|v| v.visible_count()).sum();
    assert_eq!(visible, 4);
}

#[test]
fn given_unknown_branch_when_revealing_then_not_found_and_nothing_expanded() {
    let service = service();
    let mut session = OrganizationSession::sample();

    let err = domain_err(service.reveal(&mut session, &"nope".into()));

    assert_eq!(err, DomainError::BranchNotFound("nope".into()));
    assert!(session.expanded.is_empty());
}

#[test]
fn given_sample_when_reading_activity_for_south_then_milestone_only() {
    let service = service();
    let session = OrganizationSession::sample();

    let all = service.activities(&session, &BranchFilter::All);
    let south = service.activities(&session, &BranchFilter::Branch("2".into()));

    assert_eq!(all.len(), 2);
    assert!(all[0].timestamp > all[1].timestamp);
    assert_eq!(south.len(), 1);
    assert_eq!(south[0].kind, ActivityKind::MilestoneReached);
}
