#[macro_use]
mod macros;

pub mod auth;
pub mod cache;
pub mod cli;
pub mod commands;
pub mod config;
pub mod console;
pub mod display;
pub mod edit;
pub mod error;
pub mod notify;
pub mod pagination;
pub mod paths;
pub mod query;
pub mod remote;
pub mod types;
pub mod utils;

pub use auth::{AuthSession, Credentials};
pub use cache::{LeadCache, Upsert};
pub use config::{Config, FilterPreferences};
pub use console::{FetchTicket, LeadConsole, LeadPage, SaveTicket};
pub use edit::{EditForm, EditMode, LeadDraft, LeadField, SaveRequest};
pub use error::{LeadError, Result};
pub use notify::{Toast, ToastLevel};
pub use pagination::{PageSize, Pagination};
pub use query::{AssigneeFilter, LeadQuery, SortDirection, SortKey, SortSpec, StatusFilter};
pub use remote::{HttpLeadStore, LeadStore, LeadUpdate, LoginResponse, NewLead};
pub use types::{Lead, LeadId, LeadStatus, Trip, TripId, User, UserId, UserRef};
