//! Cross-branch projects and their task dependency graph.

use std::collections::{HashMap, VecDeque};
use std::fmt;

use chrono::{DateTime, NaiveDate, Utc};
use serde::{Deserialize, Serialize};
use tracing::instrument;

use crate::domain::entities::BranchId;
use crate::domain::error::{DomainError, DomainResult};

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum TaskStatus {
    #[default]
    Pending,
    InProgress,
    Completed,
}

impl fmt::Display for TaskStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            TaskStatus::Pending => "pending",
            TaskStatus::InProgress => "in-progress",
            TaskStatus::Completed => "completed",
        })
    }
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum ProjectStatus {
    #[default]
    NotStarted,
    InProgress,
    Completed,
}

impl fmt::Display for ProjectStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            ProjectStatus::NotStarted => "not-started",
            ProjectStatus::InProgress => "in-progress",
            ProjectStatus::Completed => "completed",
        })
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Priority {
    Low,
    Medium,
    High,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ProjectTask {
    pub id: String,
    pub title: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
    pub status: TaskStatus,
    pub assigned_branch: BranchId,
    #[serde(default)]
    pub depends_on: Vec<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub deadline: Option<NaiveDate>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub priority: Option<Priority>,
}

impl ProjectTask {
    /// Unfinished with a deadline before `today`.
    pub fn is_overdue(&self, today: NaiveDate) -> bool {
        self.status != TaskStatus::Completed && self.deadline.is_some_and(|d| d < today)
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Project {
    pub id: String,
    pub name: String,
    pub description: String,
    /// Reported progress in percent
    pub progress: u8,
    pub branch_id: BranchId,
    #[serde(default)]
    pub status: ProjectStatus,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub start_date: Option<NaiveDate>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub end_date: Option<NaiveDate>,
    #[serde(default)]
    pub tasks: Vec<ProjectTask>,
}

impl Project {
    /// Share of completed tasks in percent.
    pub fn task_progress(&self) -> u8 {
        let done = self
            .tasks
            .iter()
            .filter(|t| t.status == TaskStatus::Completed)
            .count();
        percent(done as u64, self.tasks.len() as u64)
    }
}

/// `part / whole * 100`, rounded down and clamped to 0..=100. Zero for an empty whole.
pub fn percent(part: u64, whole: u64) -> u8 {
    if whole == 0 {
        return 0;
    }
    let pct = part.saturating_mul(100) / whole;
    pct.min(100) as u8
}

/// Project selection on the dashboard.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub enum BranchFilter {
    #[default]
    All,
    Branch(BranchId),
}

impl BranchFilter {
    /// `"all"` selects everything, any other value is a branch id.
    pub fn parse(value: Option<&str>) -> Self {
        match value {
            None | Some("all") => BranchFilter::All,
            Some(id) => BranchFilter::Branch(BranchId::from(id)),
        }
    }

    pub fn matches(&self, branch_id: &BranchId) -> bool {
        match self {
            BranchFilter::All => true,
            BranchFilter::Branch(id) => branch_id == id,
        }
    }
}

pub fn filter_projects<'a>(projects: &'a [Project], filter: &BranchFilter) -> Vec<&'a Project> {
    projects
        .iter()
        .filter(|p| filter.matches(&p.branch_id))
        .collect()
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ActivityKind {
    TaskCompleted,
    MilestoneReached,
    DeadlineApproaching,
    TaskStarted,
}

impl ActivityKind {
    pub fn as_str(&self) -> &'static str {
        match self {
            ActivityKind::TaskCompleted => "task_completed",
            ActivityKind::MilestoneReached => "milestone_reached",
            ActivityKind::DeadlineApproaching => "deadline_approaching",
            ActivityKind::TaskStarted => "task_started",
        }
    }
}

impl fmt::Display for ActivityKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Entry of the project activity feed, scoped to the branch it happened in.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Activity {
    pub id: String,
    #[serde(rename = "type")]
    pub kind: ActivityKind,
    pub content: String,
    pub timestamp: DateTime<Utc>,
    pub branch_id: BranchId,
}

/// Feed entries for the filter, newest first. Equal timestamps keep input order.
pub fn filter_activities<'a>(
    activities: &'a [Activity],
    filter: &BranchFilter,
) -> Vec<&'a Activity> {
    let mut feed: Vec<&Activity> = activities
        .iter()
        .filter(|a| filter.matches(&a.branch_id))
        .collect();
    feed.sort_by(|a, b| b.timestamp.cmp(&a.timestamp));
    feed
}

/// Dependency graph over the tasks of all projects.
#[derive(Debug)]
pub struct TaskGraph<'a> {
    tasks: Vec<&'a ProjectTask>,
    position: HashMap<&'a str, usize>,
}

impl<'a> TaskGraph<'a> {
    /// Collect every task and verify that each dependency names a known task.
    #[instrument(level = "debug", skip(projects))]
    pub fn build(projects: &'a [Project]) -> DomainResult<Self> {
        let tasks: Vec<&ProjectTask> = projects.iter().flat_map(|p| p.tasks.iter()).collect();
        let position: HashMap<&str, usize> = tasks
            .iter()
            .enumerate()
            .map(|(i, t)| (t.id.as_str(), i))
            .collect();

        for task in &tasks {
            if let Some(missing) = task
                .depends_on
                .iter()
                .find(|dep| !position.contains_key(dep.as_str()))
            {
                return Err(DomainError::UnknownTaskDependency {
                    task: task.id.clone(),
                    dependency: missing.clone(),
                });
            }
        }

        Ok(Self { tasks, position })
    }

    pub fn tasks(&self) -> &[&'a ProjectTask] {
        &self.tasks
    }

    pub fn get(&self, id: &str) -> Option<&'a ProjectTask> {
        self.position.get(id).map(|&i| self.tasks[i])
    }

    /// Tasks listing `id` among their dependencies.
    pub fn dependents(&self, id: &str) -> Vec<&'a ProjectTask> {
        self.tasks
            .iter()
            .copied()
            .filter(|t| t.depends_on.iter().any(|d| d == id))
            .collect()
    }

    /// Dependencies before dependents; ties keep input order.
    pub fn topological_order(&self) -> DomainResult<Vec<&'a ProjectTask>> {
        let mut in_degree: Vec<usize> = self.tasks.iter().map(|t| t.depends_on.len()).collect();
        let mut ready: VecDeque<usize> = in_degree
            .iter()
            .enumerate()
            .filter(|(_, &d)| d == 0)
            .map(|(i, _)| i)
            .collect();
        let mut order = Vec::with_capacity(self.tasks.len());

        while let Some(i) = ready.pop_front() {
            let task = self.tasks[i];
            order.push(task);
            for (j, other) in self.tasks.iter().enumerate() {
                let edges = other.depends_on.iter().filter(|d| **d == task.id).count();
                if edges > 0 {
                    in_degree[j] -= edges;
                    if in_degree[j] == 0 {
                        ready.push_back(j);
                    }
                }
            }
        }

        if order.len() < self.tasks.len() {
            let stuck = self
                .tasks
                .iter()
                .zip(&in_degree)
                .find(|(_, &d)| d > 0)
                .map(|(t, _)| t.id.clone())
                .unwrap_or_default();
            return Err(DomainError::TaskCycle(stuck));
        }
        Ok(order)
    }

    /// Unfinished tasks waiting on at least one unfinished dependency.
    pub fn blocked(&self) -> Vec<&'a ProjectTask> {
        self.tasks
            .iter()
            .copied()
            .filter(|t| t.status != TaskStatus::Completed)
            .filter(|t| {
                t.depends_on
                    .iter()
                    .filter_map(|d| self.get(d))
                    .any(|dep| dep.status != TaskStatus::Completed)
            })
            .collect()
    }
}
