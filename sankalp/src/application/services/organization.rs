//! Organization service
//!
//! Owns no state: the session is plain data passed in by the caller and
//! mutated in place, one operation per user action.

use std::sync::Arc;

use chrono::{DateTime, NaiveDate, Utc};
use serde::{Deserialize, Serialize};
use tracing::{debug, info, instrument};

use crate::application::ApplicationResult;
use crate::domain::forest::{self, Forest, InsertOutcome};
use crate::domain::projects::{
    filter_activities, filter_projects, BranchFilter, Priority, Project, ProjectStatus,
};
use crate::domain::{
    render_forest, Activity, ActivityKind, Branch, BranchArena, BranchId, BranchInput,
    BranchKind, BranchView, CustomRole, DomainError, ExpandedSet, Permission, ProjectTask,
    RoleBook, RoleInput, TaskGraph, TaskStatus,
};
use crate::infrastructure::traits::IdGenerator;

/// Everything the hierarchy view holds for one organization.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct OrganizationSession {
    pub expanded: ExpandedSet,
    pub branches: Forest,
    pub roles: RoleBook,
    pub projects: Vec<Project>,
    pub activities: Vec<Activity>,
}

impl OrganizationSession {
    pub fn empty() -> Self {
        Self::default()
    }

    /// Starter organization: two regions, one chapter, two roles, two projects
    /// and their recent activity.
    pub fn sample() -> Self {
        let branch = |id: &str,
                      name: &str,
                      kind,
                      location: &str,
                      head: &str,
                      parent: Option<&str>| Branch {
            id: id.into(),
            name: name.into(),
            kind,
            location: location.into(),
            head: head.into(),
            parent_id: parent.map(BranchId::from),
            children: Vec::new(),
        };

        let mut north = branch(
            "1",
            "North Region",
            BranchKind::Branch,
            "Delhi",
            "Amit Kumar",
            None,
        );
        north.children.push(branch(
            "3",
            "Delhi Chapter",
            BranchKind::Unit,
            "Delhi",
            "Priya Singh",
            Some("1"),
        ));
        let south = branch(
            "2",
            "South Region",
            BranchKind::Branch,
            "Bangalore",
            "Rahul Menon",
            None,
        );

        let roles = RoleBook::from(vec![
            CustomRole {
                id: "1".into(),
                name: "Branch Manager".into(),
                permissions: vec![
                    Permission::ManageMembers,
                    Permission::ApproveEvents,
                    Permission::ManageBudget,
                ],
                branch_id: "1".into(),
            },
            CustomRole {
                id: "2".into(),
                name: "Volunteer Lead".into(),
                permissions: vec![Permission::ManageVolunteers, Permission::CreateEvents],
                branch_id: "1".into(),
            },
        ]);

        let date = |y, m, d| NaiveDate::from_ymd_opt(y, m, d);
        let task = |id: &str, title: &str, status, branch: &str, deps: &[&str], deadline| {
            ProjectTask {
                id: id.into(),
                title: title.into(),
                description: None,
                status,
                assigned_branch: branch.into(),
                depends_on: deps.iter().map(|d| d.to_string()).collect(),
                deadline,
                priority: Some(Priority::Medium),
            }
        };

        let projects = vec![
            Project {
                id: "1".into(),
                name: "Cultural Festival 2023".into(),
                description: "Annual cultural festival across all branches".into(),
                progress: 75,
                branch_id: "1".into(),
                status: ProjectStatus::InProgress,
                start_date: date(2023, 9, 1),
                end_date: date(2023, 11, 30),
                tasks: vec![
                    task("1", "Venue Booking", TaskStatus::Completed, "1", &[], date(2023, 10, 1)),
                    task(
                        "2",
                        "Artist Coordination",
                        TaskStatus::InProgress,
                        "2",
                        &["1"],
                        date(2023, 11, 1),
                    ),
                ],
            },
            Project {
                id: "2".into(),
                name: "Education Initiative".into(),
                description: "Cross-branch education program".into(),
                progress: 40,
                branch_id: "2".into(),
                status: ProjectStatus::InProgress,
                start_date: date(2023, 8, 1),
                end_date: date(2024, 3, 31),
                tasks: vec![
                    task(
                        "3",
                        "Curriculum Development",
                        TaskStatus::InProgress,
                        "1",
                        &[],
                        date(2023, 12, 15),
                    ),
                    task("4", "Teacher Training", TaskStatus::Pending, "2", &["3"], None),
                ],
            },
        ];

        // 2023-10-14T10:00:00Z and 2023-10-13T15:30:00Z
        let at = |secs| DateTime::<Utc>::from_timestamp(secs, 0).unwrap_or_default();
        let activities = vec![
            Activity {
                id: "1".into(),
                kind: ActivityKind::TaskCompleted,
                content: "North Region completed Venue Booking".into(),
                timestamp: at(1_697_277_600),
                branch_id: "1".into(),
            },
            Activity {
                id: "2".into(),
                kind: ActivityKind::MilestoneReached,
                content: "South Region reached 50% completion in Education Initiative".into(),
                timestamp: at(1_697_211_000),
                branch_id: "2".into(),
            },
        ];

        Self {
            expanded: ExpandedSet::new(),
            branches: vec![north, south],
            roles,
            projects,
            activities,
        }
    }
}

/// Use cases of the organization hierarchy screen.
pub struct OrganizationService {
    ids: Arc<dyn IdGenerator>,
}

impl OrganizationService {
    pub fn new(ids: Arc<dyn IdGenerator>) -> Self {
        Self { ids }
    }

    /// Create a branch from form input and attach it to the forest.
    ///
    /// Unlike the bare forest insert, an unknown parent is reported instead of
    /// silently dropping the branch. The session is unchanged on error.
    #[instrument(level = "debug", skip(self, session))]
    pub fn create_branch(
        &self,
        session: &mut OrganizationSession,
        input: BranchInput,
    ) -> ApplicationResult<BranchId> {
        input.validate()?;
        let id = BranchId::new(self.ids.next_id());
        let parent_id = input.parent_id.clone();
        let branch = input.into_branch(id.clone());

        let mut arena = BranchArena::from_forest(&session.branches)?;
        arena.attach(&branch, parent_id.as_ref())?;

        let (forest, outcome) =
            forest::insert(std::mem::take(&mut session.branches), parent_id.as_ref(), branch);
        session.branches = forest;

        match outcome {
            InsertOutcome::Attached => {
                info!("created branch {}", id);
                Ok(id)
            }
            InsertOutcome::ParentNotFound => {
                // a root insert always attaches
                let parent = parent_id.unwrap_or(id);
                Err(DomainError::ParentNotFound(parent).into())
            }
        }
    }

    /// Flip the expanded state of a branch. Returns true when it is now expanded.
    #[instrument(level = "debug", skip(self, session))]
    pub fn toggle_expand(
        &self,
        session: &mut OrganizationSession,
        id: &BranchId,
    ) -> ApplicationResult<bool> {
        if !forest::contains(&session.branches, id) {
            return Err(DomainError::BranchNotFound(id.clone()).into());
        }
        let expanded = session.expanded.toggle(id);
        debug!("branch {} expanded={}", id, expanded);
        Ok(expanded)
    }

    /// Expand `id` and every ancestor so the branch shows up in the rendered tree.
    #[instrument(level = "debug", skip(self, session))]
    pub fn reveal(
        &self,
        session: &mut OrganizationSession,
        id: &BranchId,
    ) -> ApplicationResult<()> {
        let arena = BranchArena::from_forest(&session.branches)?;
        let ancestors = arena.ancestors(id)?;
        for branch_id in std::iter::once(id).chain(&ancestors) {
            session.expanded.expand(branch_id.clone());
        }
        debug!("revealed branch {} under {} ancestors", id, ancestors.len());
        Ok(())
    }

    pub fn expand_all(&self, session: &mut OrganizationSession) {
        let OrganizationSession {
            expanded, branches, ..
        } = session;
        expanded.expand_all(branches);
    }

    pub fn collapse_all(&self, session: &mut OrganizationSession) {
        session.expanded.collapse_all();
    }

    pub fn render(&self, session: &OrganizationSession) -> Vec<BranchView> {
        render_forest(&session.branches, &session.expanded)
    }

    /// Create a role scoped to an existing branch.
    #[instrument(level = "debug", skip(self, session))]
    pub fn create_role(
        &self,
        session: &mut OrganizationSession,
        input: RoleInput,
    ) -> ApplicationResult<String> {
        input.validate()?;
        if let Some(branch_id) = &input.branch_id {
            if !forest::contains(&session.branches, branch_id) {
                return Err(DomainError::BranchNotFound(branch_id.clone()).into());
            }
        }
        let role = input.into_role(self.ids.next_id())?;
        let id = role.id.clone();
        session.roles.add(role);
        info!("created role {}", id);
        Ok(id)
    }

    /// Branch names from the root down to `id`.
    pub fn branch_path(
        &self,
        session: &OrganizationSession,
        id: &BranchId,
    ) -> ApplicationResult<Vec<String>> {
        let arena = BranchArena::from_forest(&session.branches)?;
        Ok(arena.path(id)?)
    }

    pub fn projects<'a>(
        &self,
        session: &'a OrganizationSession,
        filter: &BranchFilter,
    ) -> Vec<&'a Project> {
        filter_projects(&session.projects, filter)
    }

    /// Activity feed for the filter, newest first.
    pub fn activities<'a>(
        &self,
        session: &'a OrganizationSession,
        filter: &BranchFilter,
    ) -> Vec<&'a Activity> {
        filter_activities(&session.activities, filter)
    }

    pub fn task_graph<'a>(
        &self,
        session: &'a OrganizationSession,
    ) -> ApplicationResult<TaskGraph<'a>> {
        Ok(TaskGraph::build(&session.projects)?)
    }
}
