use jiff::Zoned;
use owo_colors::OwoColorize;
use serde_json::json;

use super::{CommandOutput, Context};
use crate::cli::OutputOptions;
use crate::display::{render_trip_table, render_user_table};
use crate::error::Result;

/// List trips with their date and whether they are still open for edits.
pub async fn cmd_trips(output: OutputOptions) -> Result<()> {
    let mut ctx = Context::authenticated()?;
    let trips = ctx.store.list_trips().await;
    let trips = ctx.check(trips)?;
    let today = Zoned::now().date();

    let json_trips: Vec<_> = trips
        .iter()
        .map(|trip| {
            json!({
                "id": trip.id,
                "name": trip.name,
                "date": trip.date,
                "expired": trip.is_expired_on(today),
            })
        })
        .collect();

    let text = if trips.is_empty() {
        "No trips".dimmed().to_string()
    } else {
        render_trip_table(&trips, today)
    };

    CommandOutput::new(json!(json_trips))
        .with_text(text)
        .print(output)
}

/// List users that leads can be assigned to.
pub async fn cmd_users(output: OutputOptions) -> Result<()> {
    let mut ctx = Context::authenticated()?;
    let users = ctx.store.list_users().await;
    let users = ctx.check(users)?;

    let text = if users.is_empty() {
        "No users".dimmed().to_string()
    } else {
        render_user_table(&users)
    };

    CommandOutput::new(serde_json::to_value(&users)?)
        .with_text(text)
        .print(output)
}
