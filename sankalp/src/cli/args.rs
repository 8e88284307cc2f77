//! CLI argument definitions using clap

use std::path::PathBuf;

use clap::{ArgAction, Parser, Subcommand, ValueHint};

use crate::domain::{BranchKind, Permission};

/// Organization hierarchy manager: branch trees, custom roles and cross-branch projects
#[derive(Parser, Debug)]
#[command(name = "sankalp")]
#[command(author, version, about, long_about = None)]
#[command(propagate_version = true)]
pub struct Cli {
    /// Log verbosity (-d info, -dd debug, -ddd trace)
    #[arg(short, long, action = ArgAction::Count, global = true)]
    pub debug: u8,

    /// Project directory with local .sankalp.toml (default: cwd)
    #[arg(short = 'C', long, global = true, value_hint = ValueHint::DirPath)]
    pub project_dir: Option<PathBuf>,

    /// Organization data file (overrides config)
    #[arg(short, long, global = true, value_hint = ValueHint::FilePath)]
    pub file: Option<PathBuf>,

    #[command(subcommand)]
    pub command: Option<Commands>,
}

#[derive(Subcommand, Debug)]
pub enum Commands {
    /// Write a fresh organization file
    Init {
        /// Start without sample branches, roles and projects
        #[arg(long)]
        empty: bool,
        /// Overwrite an existing file
        #[arg(long)]
        force: bool,
    },

    /// Manage the branch hierarchy
    Branch {
        #[command(subcommand)]
        command: BranchCommands,
    },

    /// Manage custom roles
    Role {
        #[command(subcommand)]
        command: RoleCommands,
    },

    /// Show cross-branch projects
    Project {
        #[command(subcommand)]
        command: ProjectCommands,
    },

    /// Manage settings
    Config {
        #[command(subcommand)]
        command: ConfigCommands,
    },

    /// Generate shell completions
    Completion {
        /// Shell type
        #[arg(value_enum)]
        shell: clap_complete::Shell,
    },
}

#[derive(Subcommand, Debug)]
pub enum BranchCommands {
    /// Create a branch (top level unless --parent is given)
    Add {
        /// Branch name
        #[arg(long)]
        name: String,
        /// branch, division or unit
        #[arg(long, default_value = "branch")]
        kind: BranchKind,
        /// Location
        #[arg(long)]
        location: String,
        /// Head of the branch
        #[arg(long)]
        head: String,
        /// Parent branch id
        #[arg(long)]
        parent: Option<String>,
    },

    /// Show the hierarchy (collapsed branches hide their children)
    Tree {
        /// Also show these branch ids, expanding their ancestors (not saved)
        #[arg(short, long)]
        expand: Vec<String>,
        /// Expand every branch
        #[arg(short, long)]
        all: bool,
        /// Indented text instead of tree drawing
        #[arg(long)]
        plain: bool,
        /// Names only
        #[arg(long)]
        no_details: bool,
    },

    /// Expand or collapse a branch (saved)
    Toggle {
        /// Branch id
        id: String,
    },

    /// Collapse every branch (saved)
    Collapse,

    /// List all branches with ids
    List,

    /// Show the path from the root to a branch
    Path {
        /// Branch id
        id: String,
    },
}

#[derive(Subcommand, Debug)]
pub enum RoleCommands {
    /// Create a role for a branch
    Add {
        /// Role name
        #[arg(long)]
        name: String,
        /// Branch id
        #[arg(long)]
        branch: String,
        /// Granted permission (repeatable)
        #[arg(short, long = "permission")]
        permissions: Vec<Permission>,
    },

    /// List roles
    List {
        /// Only roles of this branch id
        #[arg(long)]
        branch: Option<String>,
    },

    /// List available permissions
    Permissions,
}

#[derive(Subcommand, Debug)]
pub enum ProjectCommands {
    /// List projects with progress and tasks
    List {
        /// Only projects owned by this branch id
        #[arg(long)]
        branch: Option<String>,
    },

    /// Show task dependency order and blocked tasks
    Deps,

    /// Show recent project activity, newest first
    Activity {
        /// Only activity of this branch id
        #[arg(long)]
        branch: Option<String>,
    },
}

#[derive(Subcommand, Debug)]
pub enum ConfigCommands {
    /// Show effective configuration
    Show,

    /// Show config file locations
    Path,

    /// Print a config template
    Template,
}
