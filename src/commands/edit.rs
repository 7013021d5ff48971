//! `add` and `update`: drive the console's edit form from command-line
//! arguments and save it.

use serde_json::json;

use super::{CommandOutput, Context};
use crate::cli::OutputOptions;
use crate::console::LeadConsole;
use crate::edit::LeadField;
use crate::error::Result;
use crate::types::{Lead, LeadId};

#[derive(Debug, Clone, Default)]
pub struct AddOptions {
    pub trip: Option<String>,
    pub name: String,
    pub country_code: Option<String>,
    pub phone: String,
    pub note: Option<String>,
}

#[derive(Debug, Clone, Default)]
pub struct UpdateOptions {
    pub id: String,
    pub trip: Option<String>,
    pub name: Option<String>,
    pub country_code: Option<String>,
    pub phone: Option<String>,
    pub status: Option<String>,
    pub note: Option<String>,
}

/// Fill the given fields of the open form, skipping unset ones.
fn fill_form(console: &mut LeadConsole, fields: &[(LeadField, Option<&str>)]) -> Result<()> {
    for (field, value) in fields {
        if let Some(value) = value {
            console.edit_field(*field, value)?;
        }
    }
    Ok(())
}

/// Save the open form and report the outcome through `ctx`.
async fn save_form(ctx: &mut Context, console: &mut LeadConsole) -> Result<Lead> {
    let result = console.save(ctx.store.as_ref()).await;
    if let Some(toast) = console.take_toast() {
        eprintln!("{}", toast.render());
    }
    ctx.check(result)
}

/// Create a lead on the selected trip.
pub async fn add_lead(ctx: &mut Context, options: &AddOptions) -> Result<Lead> {
    let mut console = ctx.open_console(options.trip.as_deref()).await?;
    console.open_new()?;
    fill_form(
        &mut console,
        &[
            (LeadField::Name, Some(options.name.as_str())),
            (LeadField::CountryCode, options.country_code.as_deref()),
            (LeadField::Phone, Some(options.phone.as_str())),
            (LeadField::Note, options.note.as_deref()),
        ],
    )?;
    save_form(ctx, &mut console).await
}

/// Update an existing lead. Fields not given keep their current values.
pub async fn update_lead(ctx: &mut Context, options: &UpdateOptions) -> Result<Lead> {
    let mut console = ctx.open_console(options.trip.as_deref()).await?;
    console.open_lead(&LeadId::new(options.id.as_str()))?;
    if console.form().is_some_and(|form| form.is_read_only()) {
        // Let the save path produce the expired-trip error and toast
        return save_form(ctx, &mut console).await;
    }
    fill_form(
        &mut console,
        &[
            (LeadField::Name, options.name.as_deref()),
            (LeadField::CountryCode, options.country_code.as_deref()),
            (LeadField::Phone, options.phone.as_deref()),
            (LeadField::Status, options.status.as_deref()),
            (LeadField::Note, options.note.as_deref()),
        ],
    )?;
    save_form(ctx, &mut console).await
}

pub async fn cmd_add(options: AddOptions, output: OutputOptions) -> Result<()> {
    let mut ctx = Context::authenticated()?;
    let lead = add_lead(&mut ctx, &options).await?;
    CommandOutput::new(json!({ "action": "created", "lead": lead }))
        .with_text(lead.id.to_string())
        .print(output)
}

pub async fn cmd_update(options: UpdateOptions, output: OutputOptions) -> Result<()> {
    let mut ctx = Context::authenticated()?;
    let lead = update_lead(&mut ctx, &options).await?;
    CommandOutput::new(json!({ "action": "updated", "lead": lead }))
        .with_text(lead.id.to_string())
        .print(output)
}
