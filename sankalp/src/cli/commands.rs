//! Command dispatch: load settings and session, run the use case, save.

use std::io;
use std::path::Path;

use clap::CommandFactory;
use itertools::Itertools;
use tracing::{debug, instrument};

use crate::application::services::OrganizationSession;
use crate::cli::args::{
    BranchCommands, Cli, Commands, ConfigCommands, ProjectCommands, RoleCommands,
};
use crate::cli::output;
use crate::cli::{CliError, CliResult};
use crate::config::{global_config_path, local_config_path, Settings};
use crate::domain::forest;
use crate::domain::{
    BranchFilter, BranchId, BranchInput, BranchKind, CustomRole, Permission, Project, RoleBook,
    RoleInput, TaskStatus, TreeNodeConvert,
};
use crate::infrastructure::di::ServiceContainer;
use crate::infrastructure::InfraError;

pub fn execute_command(cli: &Cli) -> CliResult<()> {
    let Some(command) = &cli.command else {
        Cli::command()
            .print_help()
            .map_err(|e| InfraError::io("print help", e))?;
        return Ok(());
    };

    if let Commands::Completion { shell } = command {
        let mut cmd = Cli::command();
        let name = cmd.get_name().to_string();
        clap_complete::generate(*shell, &mut cmd, name, &mut io::stdout());
        return Ok(());
    }

    let project_dir = match &cli.project_dir {
        Some(dir) => dir.clone(),
        None => std::env::current_dir().map_err(InfraError::WorkingDir)?,
    };
    let mut settings = Settings::load(Some(&project_dir))?;
    if let Some(file) = &cli.file {
        settings.data_file = file.clone();
    }
    debug!("data file: {}", settings.data_file.display());
    let services = ServiceContainer::new(settings);

    match command {
        Commands::Init { empty, force } => cmd_init(&services, *empty, *force),
        Commands::Branch { command } => cmd_branch(&services, command),
        Commands::Role { command } => cmd_role(&services, command),
        Commands::Project { command } => cmd_project(&services, command),
        Commands::Config { command } => cmd_config(&services, &project_dir, command),
        Commands::Completion { .. } => Ok(()),
    }
}

fn load(services: &ServiceContainer) -> CliResult<OrganizationSession> {
    Ok(services.store.load(services.data_file())?)
}

fn save(services: &ServiceContainer, session: &OrganizationSession) -> CliResult<()> {
    Ok(services.store.save(services.data_file(), session)?)
}

#[instrument(skip(services))]
fn cmd_init(services: &ServiceContainer, empty: bool, force: bool) -> CliResult<()> {
    let path = services.data_file();
    if services.store.exists(path) && !force {
        return Err(CliError::Usage(format!(
            "{} already exists (use --force to overwrite)",
            path.display()
        )));
    }
    let session = if empty {
        OrganizationSession::empty()
    } else {
        OrganizationSession::sample()
    };
    save(services, &session)?;
    output::success(&format!("Initialized {}", path.display()));
    Ok(())
}

fn cmd_branch(services: &ServiceContainer, command: &BranchCommands) -> CliResult<()> {
    match command {
        BranchCommands::Add {
            name,
            kind,
            location,
            head,
            parent,
        } => branch_add(services, name, *kind, location, head, parent.as_deref()),
        BranchCommands::Tree {
            expand,
            all,
            plain,
            no_details,
        } => branch_tree(services, expand, *all, *plain, *no_details),
        BranchCommands::Toggle { id } => branch_toggle(services, id),
        BranchCommands::Collapse => {
            let mut session = load(services)?;
            services.organization.collapse_all(&mut session);
            save(services, &session)?;
            output::success("Collapsed all branches");
            Ok(())
        }
        BranchCommands::List => branch_list(services),
        BranchCommands::Path { id } => {
            let session = load(services)?;
            let path = services
                .organization
                .branch_path(&session, &BranchId::from(id.as_str()))?;
            output::info(&path.join(" > "));
            Ok(())
        }
    }
}

#[instrument(skip(services))]
fn branch_add(
    services: &ServiceContainer,
    name: &str,
    kind: BranchKind,
    location: &str,
    head: &str,
    parent: Option<&str>,
) -> CliResult<()> {
    let mut session = load(services)?;
    let input = BranchInput {
        name: name.to_string(),
        kind,
        location: location.to_string(),
        head: head.to_string(),
        parent_id: parent.map(BranchId::from),
    };
    let id = services.organization.create_branch(&mut session, input)?;
    save(services, &session)?;
    output::action("Created branch", &format!("{} ({})", name, id));
    Ok(())
}

#[instrument(skip(services))]
fn branch_tree(
    services: &ServiceContainer,
    expand: &[String],
    all: bool,
    plain: bool,
    no_details: bool,
) -> CliResult<()> {
    let mut session = load(services)?;
    if session.branches.is_empty() {
        output::warning("no branches yet (sankalp branch add ...)");
        return Ok(());
    }

    if all || services.settings.render.expand_all {
        services.organization.expand_all(&mut session);
    }
    for id in expand {
        services
            .organization
            .reveal(&mut session, &BranchId::from(id.as_str()))?;
    }

    let details = services.settings.render.show_details && !no_details;
    for view in services.organization.render(&session) {
        if plain {
            for line in view.to_lines(details) {
                output::info(&line);
            }
        } else {
            output::info(&view.to_tree_string(details));
        }
    }
    Ok(())
}

fn branch_toggle(services: &ServiceContainer, id: &str) -> CliResult<()> {
    let mut session = load(services)?;
    let id = BranchId::from(id);
    let expanded = services.organization.toggle_expand(&mut session, &id)?;
    save(services, &session)?;

    let name = forest::find(&session.branches, &id)
        .map(|b| b.name.clone())
        .unwrap_or_else(|| id.to_string());
    output::action(if expanded { "Expanded" } else { "Collapsed" }, &name);
    Ok(())
}

fn branch_list(services: &ServiceContainer) -> CliResult<()> {
    let session = load(services)?;
    for (depth, branch) in forest::preorder(&session.branches) {
        output::info(&format!(
            "{}{}  {} ({}, {}, head: {})",
            "  ".repeat(depth),
            branch.id,
            branch.name,
            branch.kind,
            branch.location,
            branch.head
        ));
    }
    output::detail(&format!(
        "{} branches, {} levels",
        forest::len(&session.branches),
        forest::depth(&session.branches)
    ));
    Ok(())
}

fn print_role(session: &OrganizationSession, role: &CustomRole) {
    output::header(&role.name);
    let branch_name =
        RoleBook::branch_name(&session.branches, role).unwrap_or("(unknown branch)");
    output::detail(&format!("Branch: {} ({})", branch_name, role.branch_id));
    output::detail(&format!(
        "Permissions: {}",
        role.permissions.iter().map(|p| p.as_str()).join(", ")
    ));
}

fn cmd_role(services: &ServiceContainer, command: &RoleCommands) -> CliResult<()> {
    match command {
        RoleCommands::Add {
            name,
            branch,
            permissions,
        } => {
            let mut session = load(services)?;
            let input = RoleInput {
                name: name.clone(),
                branch_id: Some(BranchId::from(branch.as_str())),
                permissions: permissions.clone(),
            };
            let id = services.organization.create_role(&mut session, input)?;
            save(services, &session)?;
            output::action("Created role", &format!("{} ({})", name, id));
            if let Some(role) = session.roles.get(&id) {
                print_role(&session, role);
            }
            Ok(())
        }
        RoleCommands::List { branch } => {
            let session = load(services)?;
            let branch_id = branch.as_deref().map(BranchId::from);
            let roles: Vec<&CustomRole> = match &branch_id {
                Some(id) => session.roles.for_branch(id).collect(),
                None => session.roles.list().iter().collect(),
            };
            for role in roles {
                print_role(&session, role);
            }
            Ok(())
        }
        RoleCommands::Permissions => {
            for permission in Permission::ALL {
                output::info(&format!("{:<22} {}", permission.as_str(), permission.label()));
            }
            Ok(())
        }
    }
}

fn cmd_project(services: &ServiceContainer, command: &ProjectCommands) -> CliResult<()> {
    let session = load(services)?;
    match command {
        ProjectCommands::List { branch } => {
            let filter = BranchFilter::parse(branch.as_deref());
            let today = chrono::Local::now().date_naive();
            for project in services.organization.projects(&session, &filter) {
                print_project(project, today);
            }
            Ok(())
        }
        ProjectCommands::Activity { branch } => {
            let filter = BranchFilter::parse(branch.as_deref());
            let feed = services.organization.activities(&session, &filter);
            if feed.is_empty() {
                output::warning("no recent activity");
            }
            for activity in feed {
                output::info(&format!(
                    "{}  {:<20} {}",
                    activity.timestamp.format("%Y-%m-%d %H:%M"),
                    activity.kind,
                    activity.content
                ));
            }
            Ok(())
        }
        ProjectCommands::Deps => {
            let graph = services.organization.task_graph(&session)?;
            output::header("Task order");
            for (n, task) in graph.topological_order()?.into_iter().enumerate() {
                let deps = task
                    .depends_on
                    .iter()
                    .filter_map(|d| graph.get(d))
                    .map(|d| d.title.as_str())
                    .join(", ");
                if deps.is_empty() {
                    output::detail(&format!("{}. {} ({})", n + 1, task.title, task.status));
                } else {
                    output::detail(&format!(
                        "{}. {} ({}) after: {}",
                        n + 1,
                        task.title,
                        task.status,
                        deps
                    ));
                }
                let unblocks = graph
                    .dependents(&task.id)
                    .iter()
                    .map(|t| t.title.as_str())
                    .join(", ");
                if !unblocks.is_empty() {
                    output::detail(&format!("   unblocks: {}", unblocks));
                }
            }
            let blocked = graph.blocked();
            if !blocked.is_empty() {
                output::header("Blocked");
                for task in blocked {
                    output::blocked(&format!("{} ({})", task.title, task.assigned_branch));
                }
            }
            Ok(())
        }
    }
}

fn print_project(project: &Project, today: chrono::NaiveDate) {
    output::header(&format!("{} [{}]", project.name, project.status));
    output::detail(&project.description);
    match (project.start_date, project.end_date) {
        (Some(start), Some(end)) => output::detail(&format!("Schedule {} to {}", start, end)),
        (Some(start), None) => output::detail(&format!("Schedule from {}", start)),
        (None, Some(end)) => output::detail(&format!("Schedule until {}", end)),
        (None, None) => {}
    }
    output::detail(&format!("Progress {}", output::progress_bar(project.progress)));
    let done = project
        .tasks
        .iter()
        .filter(|t| t.status == TaskStatus::Completed)
        .count();
    output::detail(&format!(
        "Tasks    {} ({}/{})",
        output::progress_bar(project.task_progress()),
        done,
        project.tasks.len()
    ));
    for task in &project.tasks {
        let deadline = match task.deadline {
            Some(d) if task.is_overdue(today) => format!("  due {} (overdue)", d),
            Some(d) => format!("  due {}", d),
            None => String::new(),
        };
        output::detail(&format!("  {:<28} {}{}", task.title, task.status, deadline));
        if let Some(description) = &task.description {
            output::detail(&format!("    {}", description));
        }
    }
}

fn cmd_config(
    services: &ServiceContainer,
    project_dir: &Path,
    command: &ConfigCommands,
) -> CliResult<()> {
    match command {
        ConfigCommands::Show => {
            output::info(&services.settings.to_toml()?);
        }
        ConfigCommands::Path => {
            match global_config_path() {
                Some(p) => output::action("global", &p.display()),
                None => output::warning("no global config directory on this platform"),
            }
            output::action("local", &local_config_path(project_dir).display());
            output::action("data", &services.data_file().display());
        }
        ConfigCommands::Template => {
            output::info(&Settings::template());
        }
    }
    Ok(())
}
