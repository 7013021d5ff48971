//! Session commands.
//!
//! - `login`: Exchange credentials for a token and store it
//! - `logout`: Tell the server, then forget the token whatever it says
//! - `whoami`: Show the stored session

use std::io::{self, BufRead, IsTerminal, Write};

use owo_colors::OwoColorize;
use serde_json::json;

use super::{CommandOutput, Context};
use crate::auth::{Credentials, LOGIN_FAILED};
use crate::cli::OutputOptions;
use crate::error::{LeadError, Result};

/// Read the password from stdin when it was not given on the command line.
fn prompt_password() -> Result<String> {
    let stdin = io::stdin();
    if stdin.is_terminal() {
        eprint!("Password: ");
        io::stderr().flush()?;
    }
    let mut line = String::new();
    stdin.lock().read_line(&mut line)?;
    Ok(line.trim_end_matches(['\r', '\n']).to_string())
}

/// Log in against the store in `ctx` and persist the session.
///
/// Any rejection by the server is reported as [`LOGIN_FAILED`]; transport
/// failures keep their own message.
pub async fn login_with(ctx: &mut Context, credentials: &Credentials) -> Result<String> {
    let response = match ctx.store.login(credentials).await {
        Ok(response) => response,
        Err(LeadError::Api(_) | LeadError::Unauthorized) => {
            return Err(LeadError::Validation(LOGIN_FAILED.to_string()));
        }
        Err(e) => return Err(e),
    };

    let name = if response.name.is_empty() {
        credentials.username().to_string()
    } else {
        response.name.clone()
    };
    ctx.config.set_auth(response.token, name.clone());
    ctx.config.save()?;
    tracing::info!("Logged in as {}", name);
    Ok(name)
}

pub async fn cmd_login(
    username: &str,
    password: Option<String>,
    output: OutputOptions,
) -> Result<()> {
    let password = match password {
        Some(password) => password,
        None => prompt_password()?,
    };
    let credentials = Credentials::new(username, &password)?;

    let mut ctx = Context::load()?;
    let name = login_with(&mut ctx, &credentials).await?;

    CommandOutput::new(json!({
        "logged_in": true,
        "name": name,
    }))
    .with_text(format!("Logged in as {}", name.green()))
    .print(output)
}

/// Log out. Local state is cleared even when the server call fails.
pub async fn logout_with(ctx: &mut Context) -> Result<bool> {
    let was_logged_in = ctx.session.is_logged_in();
    if was_logged_in && let Err(e) = ctx.store.logout().await {
        tracing::warn!("Server logout failed, clearing local session anyway: {}", e);
    }
    ctx.config.clear_auth();
    ctx.config.save()?;
    tracing::info!("Logged out");
    Ok(was_logged_in)
}

pub async fn cmd_logout(output: OutputOptions) -> Result<()> {
    let mut ctx = Context::load()?;
    let was_logged_in = logout_with(&mut ctx).await?;

    let text = if was_logged_in {
        "Logged out".to_string()
    } else {
        "Not logged in".dimmed().to_string()
    };
    CommandOutput::new(json!({ "logged_out": was_logged_in }))
        .with_text(text)
        .print(output)
}

pub fn cmd_whoami(output: OutputOptions) -> Result<()> {
    let ctx = Context::load()?;
    let logged_in = ctx.session.is_logged_in();
    let name = ctx.session.display_name().map(str::to_string);

    let text = match (&name, logged_in) {
        (Some(name), true) => format!("{} ({})", name.green(), ctx.config.api_url.dimmed()),
        (None, true) => format!("Logged in ({})", ctx.config.api_url.dimmed()),
        (_, false) => "Not logged in".dimmed().to_string(),
    };

    CommandOutput::new(json!({
        "logged_in": logged_in,
        "name": name,
        "api_url": ctx.config.api_url,
    }))
    .with_text(text)
    .print(output)
}
