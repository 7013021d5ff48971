//! Lead listing and detail commands.

use owo_colors::OwoColorize;
use serde_json::json;

use super::{CommandOutput, Context};
use crate::cli::OutputOptions;
use crate::console::LeadConsole;
use crate::display::{
    format_lead_detail, page_navigation, page_summary, render_lead_table, status_info,
};
use crate::error::{LeadError, Result};
use crate::pagination::PageSize;
use crate::query::{AssigneeFilter, SortDirection, SortKey, SortSpec, StatusFilter};
use crate::types::LeadId;
use crate::utils::{tel_link, whatsapp_link, whatsapp_web_link};

/// Options for `leads`. Unset options keep the console's current state,
/// which starts from the saved filter preferences.
#[derive(Debug, Clone, Default)]
pub struct LeadsOptions {
    pub trip: Option<String>,
    pub search: Option<String>,
    pub status: Option<StatusFilter>,
    pub assignee: Option<String>,
    pub sort: Option<SortKey>,
    pub desc: bool,
    pub page: Option<i64>,
    pub page_size: Option<PageSize>,
}

impl LeadsOptions {
    /// True when the invocation changes a persisted filter.
    pub fn changes_filters(&self) -> bool {
        self.status.is_some() || self.assignee.is_some()
    }
}

/// Resolve an assignee argument: the reserved values, a username, or a raw
/// user id.
fn resolve_assignee(console: &LeadConsole, value: &str) -> AssigneeFilter {
    match console
        .users()
        .iter()
        .find(|u| u.username.eq_ignore_ascii_case(value.trim()))
    {
        Some(user) => AssigneeFilter::User(user.id.clone()),
        None => AssigneeFilter::parse(value),
    }
}

/// Apply listing options to a loaded console. The page is set last so that
/// filter changes, which go back to page one, do not override it.
pub fn apply_leads_options(console: &mut LeadConsole, options: &LeadsOptions) {
    if let Some(size) = options.page_size {
        console.set_page_size(size);
    }
    if let Some(status) = &options.status {
        console.set_status_filter(status.clone());
    }
    if let Some(assignee) = &options.assignee {
        let filter = resolve_assignee(console, assignee);
        console.set_assignee_filter(filter);
    }
    if let Some(search) = &options.search {
        console.set_search(search.as_str());
    }
    if options.sort.is_some() || options.desc {
        let direction = if options.desc {
            SortDirection::Descending
        } else {
            SortDirection::Ascending
        };
        console.set_sort(SortSpec::new(options.sort.unwrap_or_default(), direction));
    }
    if let Some(page) = options.page {
        console.set_page(page);
    }
}

pub async fn cmd_leads(options: LeadsOptions, output: OutputOptions) -> Result<()> {
    let mut ctx = Context::authenticated()?;
    let mut console = ctx.open_console(options.trip.as_deref()).await?;
    apply_leads_options(&mut console, &options);

    if options.changes_filters() {
        ctx.config.filters = console.filter_preferences();
        ctx.config.save()?;
    }

    let page = console.view();
    let trip_name = console
        .selected_trip()
        .map(|t| t.name.clone())
        .unwrap_or_default();
    let expired = console.is_trip_expired();

    let json_output = json!({
        "trip": console.selected_trip(),
        "expired": expired,
        "filters": {
            "search": console.query().search,
            "status": console.query().status,
            "assignee": console.query().assignee,
            "sort": console.query().sort.key.to_string(),
            "direction": console.query().sort.direction.to_string(),
        },
        "page": page.current_page,
        "total_pages": page.total_pages,
        "page_size": page.page_size.get(),
        "matched": page.matched,
        "total": page.total,
        "leads": page.rows,
    });

    let mut text = String::new();
    text.push_str(&format!("{}", trip_name.cyan().bold()));
    if expired {
        text.push_str(&format!(" {}", "(expired, read-only)".dimmed()));
    }
    text.push('\n');
    if !page.is_empty() {
        text.push_str(&render_lead_table(&page.rows));
        text.push('\n');
    }
    text.push_str(&page_summary(&page));
    if page.total_pages > 1 {
        text.push('\n');
        text.push_str(&page_navigation(&page).dimmed().to_string());
    }

    CommandOutput::new(json_output).with_text(text).print(output)
}

pub async fn cmd_show(id: &str, trip: Option<&str>, output: OutputOptions) -> Result<()> {
    let mut ctx = Context::authenticated()?;
    let console = ctx.open_console(trip).await?;
    let lead_id = LeadId::new(id);
    let lead = console
        .lead(&lead_id)
        .ok_or_else(|| LeadError::LeadNotFound(id.to_string()))?;
    let info = status_info(&lead.status);

    CommandOutput::new(json!({
        "lead": lead,
        "status_description": info.description,
        "next_action": info.action,
        "read_only": console.is_trip_expired(),
        "links": {
            "tel": tel_link(&lead.phone),
            "whatsapp": whatsapp_link(&lead.phone),
            "whatsapp_web": whatsapp_web_link(&lead.phone),
        },
    }))
    .with_text(format_lead_detail(lead))
    .print(output)
}
