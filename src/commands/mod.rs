//! Command implementations behind the `leaddesk` CLI.

mod auth;
mod config;
mod edit;
mod leads;
mod trips;

pub use auth::{cmd_login, cmd_logout, cmd_whoami, login_with, logout_with};
pub use config::{cmd_config_get, cmd_config_set, cmd_config_show};
pub use edit::{AddOptions, UpdateOptions, add_lead, cmd_add, cmd_update, update_lead};
pub use leads::{LeadsOptions, apply_leads_options, cmd_leads, cmd_show};
pub use trips::{cmd_trips, cmd_users};

use serde_json::Value;

use crate::auth::AuthSession;
use crate::cli::OutputOptions;
use crate::config::Config;
use crate::console::LeadConsole;
use crate::error::{LeadError, Result};
use crate::remote::{HttpLeadStore, LeadStore};

/// Result of a command: a JSON value and an optional human-readable text.
pub struct CommandOutput {
    json: Value,
    text: Option<String>,
}

impl CommandOutput {
    pub fn new(json: Value) -> Self {
        Self { json, text: None }
    }

    pub fn with_text(mut self, text: impl Into<String>) -> Self {
        self.text = Some(text.into());
        self
    }

    /// Print JSON when requested, the text otherwise. Without a text the
    /// JSON is printed either way.
    pub fn print(self, output: OutputOptions) -> Result<()> {
        match self.text {
            Some(text) if !output.json => {
                println!("{text}");
                Ok(())
            }
            _ => print_json(&self.json),
        }
    }
}

/// Print a value as pretty JSON to stdout.
pub fn print_json(value: &Value) -> Result<()> {
    println!("{}", serde_json::to_string_pretty(value)?);
    Ok(())
}

/// What every command needs: the loaded config, the session built from it
/// and a store to talk to.
pub struct Context {
    pub config: Config,
    pub session: AuthSession,
    pub store: Box<dyn LeadStore>,
}

impl Context {
    /// Load config and build the HTTP store from it.
    pub fn load() -> Result<Self> {
        let config = Config::load()?;
        let session = AuthSession::from_config(&config);
        let store = HttpLeadStore::from_config(&config, &session)?;
        Ok(Self::with_store(config, session, Box::new(store)))
    }

    /// Like [`Context::load`], failing when nobody is logged in.
    pub fn authenticated() -> Result<Self> {
        let ctx = Self::load()?;
        ctx.session.require()?;
        Ok(ctx)
    }

    pub fn with_store(config: Config, session: AuthSession, store: Box<dyn LeadStore>) -> Self {
        Self {
            config,
            session,
            store,
        }
    }

    /// Pass a store result through, forgetting the stored token when the
    /// server rejected it.
    pub fn check<T>(&mut self, result: Result<T>) -> Result<T> {
        if let Err(e) = &result {
            self.forget_rejected_token(e)?;
        }
        result
    }

    fn forget_rejected_token(&mut self, error: &LeadError) -> Result<()> {
        if error.is_unauthorized() && self.config.auth.token.is_some() {
            tracing::warn!("Server rejected the session token, clearing it");
            self.config.clear_auth();
            self.config.save()?;
        }
        Ok(())
    }

    /// Build a console, load trips and users, select `trip` (or the first
    /// trip) and fetch its leads.
    pub async fn open_console(&mut self, trip: Option<&str>) -> Result<LeadConsole> {
        let mut console =
            LeadConsole::for_today(self.config.filters.clone(), self.config.page_size);

        let (trips, users) =
            futures::future::join(self.store.list_trips(), self.store.list_users()).await;
        let trips = self.check(trips)?;
        if let Err(e) = &users
            && e.is_unauthorized()
        {
            self.forget_rejected_token(e)?;
            return Err(LeadError::Unauthorized);
        }
        console.load_users(users);
        let first = console.load_trips(Ok(trips));

        let ticket = match trip {
            Some(key) => {
                let id = console
                    .find_trip(key)
                    .map(|t| t.id.clone())
                    .ok_or_else(|| LeadError::TripNotFound(key.to_string()))?;
                console.on_trip_changed(id)?
            }
            None => first.ok_or(LeadError::NoTripSelected)?,
        };

        let leads = self.store.list_leads(&ticket.trip_id).await;
        let leads = self.check(leads)?;
        console.apply_fetch(ticket, Ok(leads));
        Ok(console)
    }
}
