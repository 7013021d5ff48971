use clap::{CommandFactory, Parser, Subcommand};
use clap_complete::Shell;
use std::io;

use crate::pagination::{PAGE_SIZES, PageSize};
use crate::query::{ALL, SortKey, StatusFilter};
use crate::types::{LeadStatus, VALID_STATUSES};

#[derive(Parser)]
#[command(name = "leaddesk")]
#[command(about = "Lead desk console for trip operators")]
#[command(version)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Commands,
}

/// How a command prints its result.
#[derive(Debug, Clone, Copy, Default)]
pub struct OutputOptions {
    pub json: bool,
}

impl OutputOptions {
    pub fn new(json: bool) -> Self {
        Self { json }
    }
}

#[derive(Subcommand)]
pub enum Commands {
    /// Log in and store the session token
    Login {
        /// Username
        username: String,

        /// Password (read from stdin when omitted)
        #[arg(long)]
        password: Option<String>,

        /// Output as JSON
        #[arg(long)]
        json: bool,
    },

    /// Log out and forget the stored session
    Logout {
        /// Output as JSON
        #[arg(long)]
        json: bool,
    },

    /// Show who is logged in
    Whoami {
        /// Output as JSON
        #[arg(long)]
        json: bool,
    },

    /// List trips
    Trips {
        /// Output as JSON
        #[arg(long)]
        json: bool,
    },

    /// List users leads can be assigned to
    Users {
        /// Output as JSON
        #[arg(long)]
        json: bool,
    },

    /// List the leads of a trip
    #[command(visible_alias = "ls")]
    Leads {
        /// Trip id or name (default: first trip)
        #[arg(short, long)]
        trip: Option<String>,

        /// Match name, phone or assignee
        #[arg(short, long)]
        search: Option<String>,

        /// Status filter: all, new, pending, "waiting for payment", cancelled, confirmed
        #[arg(long, value_parser = parse_status_filter)]
        status: Option<StatusFilter>,

        /// Assignee filter: all, unassigned, a username or a user id
        #[arg(short, long)]
        assignee: Option<String>,

        /// Sort column: name, phone, status, assignedTo
        #[arg(long, value_parser = parse_sort_key)]
        sort: Option<SortKey>,

        /// Sort descending
        #[arg(long)]
        desc: bool,

        /// Page number (clamped into range)
        #[arg(short, long, allow_negative_numbers = true)]
        page: Option<i64>,

        /// Rows per page: 5, 10, 20, 50 or 100
        #[arg(long, value_parser = parse_page_size)]
        page_size: Option<PageSize>,

        /// Output as JSON
        #[arg(long)]
        json: bool,
    },

    /// Show one lead with contact links
    #[command(visible_alias = "s")]
    Show {
        /// Lead id
        id: String,

        /// Trip id or name (default: first trip)
        #[arg(short, long)]
        trip: Option<String>,

        /// Output as JSON
        #[arg(long)]
        json: bool,
    },

    /// Add a lead to a trip
    Add {
        /// Lead name
        name: String,

        /// 10-digit phone number
        phone: String,

        /// Trip id or name (default: first trip)
        #[arg(short, long)]
        trip: Option<String>,

        /// Country code (default: +91)
        #[arg(long)]
        country_code: Option<String>,

        /// Free-text note
        #[arg(short, long)]
        note: Option<String>,

        /// Output as JSON
        #[arg(long)]
        json: bool,
    },

    /// Update fields of a lead
    Update {
        /// Lead id
        id: String,

        /// Trip id or name (default: first trip)
        #[arg(short, long)]
        trip: Option<String>,

        /// New name
        #[arg(long)]
        name: Option<String>,

        /// New country code
        #[arg(long)]
        country_code: Option<String>,

        /// New 10-digit phone number
        #[arg(long)]
        phone: Option<String>,

        /// New status
        #[arg(long, value_parser = parse_status)]
        status: Option<LeadStatus>,

        /// New note
        #[arg(short, long)]
        note: Option<String>,

        /// Output as JSON
        #[arg(long)]
        json: bool,
    },

    /// Manage configuration
    Config {
        #[command(subcommand)]
        action: ConfigAction,
    },

    /// Generate shell completions
    Completions {
        /// Shell to generate completions for [possible values: bash, zsh, fish, powershell, elvish]
        shell: Shell,
    },
}

#[derive(Subcommand)]
pub enum ConfigAction {
    /// Show current configuration
    Show {
        /// Output as JSON
        #[arg(long)]
        json: bool,
    },
    /// Set a configuration value
    Set {
        /// Configuration key (api_url, remote_timeout, page_size, auth.token, auth.name, filters.status, filters.assignee)
        key: String,
        /// Value to set
        value: String,
        /// Output as JSON
        #[arg(long)]
        json: bool,
    },
    /// Get a configuration value
    Get {
        /// Configuration key (api_url, remote_timeout, page_size, auth.token, auth.name, filters.status, filters.assignee)
        key: String,
        /// Output as JSON
        #[arg(long)]
        json: bool,
    },
}

impl Commands {
    /// Execute the command, dispatching to the appropriate handler.
    pub async fn run(self) -> crate::error::Result<()> {
        use crate::commands::{
            AddOptions, LeadsOptions, UpdateOptions, cmd_add, cmd_config_get, cmd_config_set,
            cmd_config_show, cmd_leads, cmd_login, cmd_logout, cmd_show, cmd_trips, cmd_update,
            cmd_users, cmd_whoami,
        };

        match self {
            Commands::Login {
                username,
                password,
                json,
            } => cmd_login(&username, password, OutputOptions::new(json)).await,
            Commands::Logout { json } => cmd_logout(OutputOptions::new(json)).await,
            Commands::Whoami { json } => cmd_whoami(OutputOptions::new(json)),
            Commands::Trips { json } => cmd_trips(OutputOptions::new(json)).await,
            Commands::Users { json } => cmd_users(OutputOptions::new(json)).await,

            Commands::Leads {
                trip,
                search,
                status,
                assignee,
                sort,
                desc,
                page,
                page_size,
                json,
            } => {
                let options = LeadsOptions {
                    trip,
                    search,
                    status,
                    assignee,
                    sort,
                    desc,
                    page,
                    page_size,
                };
                cmd_leads(options, OutputOptions::new(json)).await
            }

            Commands::Show { id, trip, json } => {
                cmd_show(&id, trip.as_deref(), OutputOptions::new(json)).await
            }

            Commands::Add {
                name,
                phone,
                trip,
                country_code,
                note,
                json,
            } => {
                let options = AddOptions {
                    trip,
                    name,
                    country_code,
                    phone,
                    note,
                };
                cmd_add(options, OutputOptions::new(json)).await
            }

            Commands::Update {
                id,
                trip,
                name,
                country_code,
                phone,
                status,
                note,
                json,
            } => {
                let options = UpdateOptions {
                    id,
                    trip,
                    name,
                    country_code,
                    phone,
                    status: status.map(|s| s.to_string()),
                    note,
                };
                cmd_update(options, OutputOptions::new(json)).await
            }

            Commands::Config { action } => match action {
                ConfigAction::Show { json } => cmd_config_show(OutputOptions::new(json)),
                ConfigAction::Set { key, value, json } => {
                    cmd_config_set(&key, &value, OutputOptions::new(json))
                }
                ConfigAction::Get { key, json } => cmd_config_get(&key, OutputOptions::new(json)),
            },

            Commands::Completions { shell } => {
                generate_completions(shell);
                Ok(())
            }
        }
    }
}

/// Generic validation helper for parsing values with a standard error message format.
fn parse_with_validation<T, F>(
    s: &str,
    parser: F,
    field_name: &str,
    valid_values: &[&str],
) -> Result<T, String>
where
    F: FnOnce(&str) -> Result<T, String>,
{
    parser(s).map_err(|_| {
        format!(
            "Invalid {}. Must be one of: {}",
            field_name,
            valid_values.join(", ")
        )
    })
}

fn parse_status(s: &str) -> Result<LeadStatus, String> {
    parse_with_validation(
        s,
        |v| v.parse().map_err(|_| String::new()),
        "status",
        VALID_STATUSES,
    )
}

/// `all` or one known status.
fn parse_status_filter(s: &str) -> Result<StatusFilter, String> {
    if s.trim().eq_ignore_ascii_case(ALL) {
        return Ok(StatusFilter::All);
    }
    parse_status(s).map(StatusFilter::Only).map_err(|_| {
        format!(
            "Invalid status filter. Must be one of: {ALL}, {}",
            VALID_STATUSES.join(", ")
        )
    })
}

fn parse_sort_key(s: &str) -> Result<SortKey, String> {
    parse_with_validation(
        s,
        |v| v.parse().map_err(|_| String::new()),
        "sort key",
        SortKey::ALL_STRINGS,
    )
}

fn parse_page_size(s: &str) -> Result<PageSize, String> {
    s.parse().map_err(|_| {
        let sizes: Vec<String> = PAGE_SIZES.iter().map(|n| n.to_string()).collect();
        format!("Invalid page size. Must be one of: {}", sizes.join(", "))
    })
}

pub fn generate_completions(shell: Shell) {
    let mut cmd = Cli::command();
    clap_complete::generate(shell, &mut cmd, "leaddesk", &mut io::stdout());
}
