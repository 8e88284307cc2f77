//! Projects dashboard: filtering, progress and task dependencies.

use chrono::{DateTime, NaiveDate, Utc};
use rstest::rstest;

use sankalp::application::services::OrganizationSession;
use sankalp::domain::projects::{
    filter_activities, filter_projects, percent, Priority, ProjectStatus,
};
use sankalp::domain::{
    Activity, ActivityKind, BranchFilter, DomainError, Project, ProjectTask, TaskGraph, TaskStatus,
};

fn task(id: &str, status: TaskStatus, deps: &[&str]) -> ProjectTask {
    ProjectTask {
        id: id.into(),
        title: format!("task {id}"),
        description: None,
        status,
        assigned_branch: "1".into(),
        depends_on: deps.iter().map(|d| d.to_string()).collect(),
        deadline: None,
        priority: Some(Priority::High),
    }
}

fn project(id: &str, branch: &str, tasks: Vec<ProjectTask>) -> Project {
    Project {
        id: id.into(),
        name: format!("project {id}"),
        description: String::new(),
        progress: 0,
        branch_id: branch.into(),
        status: ProjectStatus::NotStarted,
        start_date: None,
        end_date: None,
        tasks,
    }
}

#[rstest]
#[case(0, 4, 0)]
#[case(1, 4, 25)]
#[case(2, 3, 66)]
#[case(4, 4, 100)]
#[case(9, 4, 100)]
#[case(3, 0, 0)]
fn given_counts_when_computing_percent_then_rounded_down_and_clamped(
    #[case] part: u64,
    #[case] whole: u64,
    #[case] expected: u8,
) {
    assert_eq!(percent(part, whole), expected);
}

#[test]
fn given_sample_projects_when_filtering_by_branch_then_only_owned_projects() {
    let session = OrganizationSession::sample();

    let all = filter_projects(&session.projects, &BranchFilter::All);
    let south = filter_projects(&session.projects, &BranchFilter::Branch("2".into()));
    let nobody = filter_projects(&session.projects, &BranchFilter::Branch("404".into()));

    assert_eq!(all.len(), 2);
    assert_eq!(south.len(), 1);
    assert_eq!(south[0].name, "Education Initiative");
    assert!(nobody.is_empty());
}

#[test]
fn given_sample_project_when_computing_task_progress_then_half_done() {
    let session = OrganizationSession::sample();

    assert_eq!(session.projects[0].task_progress(), 50);
    assert_eq!(session.projects[1].task_progress(), 0);
}

#[test]
fn given_dependencies_when_ordering_then_dependencies_come_first() {
    let projects = vec![
        project(
            "p1",
            "1",
            vec![
                task("c", TaskStatus::Pending, &["b"]),
                task("a", TaskStatus::Completed, &[]),
            ],
        ),
        project(
            "p2",
            "2",
            vec![
                task("b", TaskStatus::InProgress, &["a"]),
                task("d", TaskStatus::Pending, &[]),
            ],
        ),
    ];
    let graph = TaskGraph::build(&projects).unwrap();

    let order: Vec<&str> = graph
        .topological_order()
        .unwrap()
        .iter()
        .map(|t| t.id.as_str())
        .collect();

    assert_eq!(order, vec!["a", "d", "b", "c"]);
    assert_eq!(graph.tasks().len(), 4);
    assert_eq!(
        graph.dependents("a").iter().map(|t| t.id.as_str()).collect::<Vec<_>>(),
        vec!["b"]
    );
}

#[test]
fn given_unfinished_dependency_when_listing_blocked_then_dependent_is_blocked() {
    let projects = vec![project(
        "p",
        "1",
        vec![
            task("a", TaskStatus::Completed, &[]),
            task("b", TaskStatus::Pending, &["a"]),
            task("c", TaskStatus::InProgress, &[]),
            task("d", TaskStatus::Pending, &["b", "c"]),
        ],
    )];
    let graph = TaskGraph::build(&projects).unwrap();

    let blocked: Vec<&str> = graph.blocked().iter().map(|t| t.id.as_str()).collect();

    assert_eq!(blocked, vec!["d"]);
}

#[test]
fn given_unknown_dependency_when_building_graph_then_error_names_both_tasks() {
    let projects = vec![project("p", "1", vec![task("a", TaskStatus::Pending, &["ghost"])])];

    let err = TaskGraph::build(&projects).unwrap_err();

    assert_eq!(
        err,
        DomainError::UnknownTaskDependency {
            task: "a".into(),
            dependency: "ghost".into(),
        }
    );
}

#[test]
fn given_circular_dependencies_when_ordering_then_cycle_error() {
    let projects = vec![project(
        "p",
        "1",
        vec![
            task("free", TaskStatus::Pending, &[]),
            task("x", TaskStatus::Pending, &["y"]),
            task("y", TaskStatus::Pending, &["x"]),
        ],
    )];
    let graph = TaskGraph::build(&projects).unwrap();

    let err = graph.topological_order().unwrap_err();

    assert!(matches!(err, DomainError::TaskCycle(id) if id == "x"));
}

#[test]
fn given_sample_session_when_listing_blocked_then_only_teacher_training() {
    let session = OrganizationSession::sample();
    let graph = TaskGraph::build(&session.projects).unwrap();

    let blocked: Vec<&str> = graph.blocked().iter().map(|t| t.title.as_str()).collect();

    assert_eq!(blocked, vec!["Teacher Training"]);
}

fn activity(id: &str, branch: &str, secs: i64) -> Activity {
    Activity {
        id: id.into(),
        kind: ActivityKind::TaskStarted,
        content: format!("activity {id}"),
        timestamp: DateTime::<Utc>::from_timestamp(secs, 0).unwrap(),
        branch_id: branch.into(),
    }
}

#[rstest]
#[case(BranchFilter::All, vec!["late", "middle", "early"])]
#[case(BranchFilter::Branch("1".into()), vec!["late", "early"])]
#[case(BranchFilter::Branch("404".into()), vec![])]
fn given_activities_when_filtering_by_branch_then_newest_first(
    #[case] filter: BranchFilter,
    #[case] expected: Vec<&str>,
) {
    let activities = vec![
        activity("early", "1", 1_000),
        activity("late", "1", 3_000),
        activity("middle", "2", 2_000),
    ];

    let feed: Vec<&str> = filter_activities(&activities, &filter)
        .iter()
        .map(|a| a.id.as_str())
        .collect();

    assert_eq!(feed, expected);
}

#[test]
fn given_sample_session_when_reading_activity_then_feed_is_branch_scoped() {
    let session = OrganizationSession::sample();

    let north = filter_activities(&session.activities, &BranchFilter::Branch("1".into()));

    assert_eq!(session.activities.len(), 2);
    assert_eq!(north.len(), 1);
    assert_eq!(north[0].kind, ActivityKind::TaskCompleted);
    assert_eq!(north[0].content, "North Region completed Venue Booking");
}

#[test]
fn given_optional_schedule_fields_when_parsing_toml_then_dates_are_read_and_absent_ones_default() {
    let raw = r#"
        id = "p"
        name = "Festival"
        description = "Annual"
        progress = 10
        branch_id = "1"
        start_date = "2023-09-01"

        [[tasks]]
        id = "t1"
        title = "Venue"
        description = "Book the hall"
        status = "in-progress"
        assigned_branch = "1"
        deadline = "2023-10-01"
    "#;

    let project: Project = toml::from_str(raw).unwrap();

    assert_eq!(project.start_date, NaiveDate::from_ymd_opt(2023, 9, 1));
    assert_eq!(project.end_date, None);
    assert_eq!(project.tasks[0].description.as_deref(), Some("Book the hall"));
    assert_eq!(project.tasks[0].deadline, NaiveDate::from_ymd_opt(2023, 10, 1));
    assert_eq!(project.tasks[0].priority, None);
}

#[test]
fn given_activity_when_serializing_then_kind_is_written_as_type() {
    let rendered = toml::to_string(&activity("a", "2", 0)).unwrap();

    assert!(rendered.contains("type = \"task_started\""));
    assert!(rendered.contains("timestamp = \"1970-01-01T00:00:00Z\""));
}
