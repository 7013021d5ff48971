//! Terminal rendering of trips, users and lead pages.

use owo_colors::OwoColorize;
use tabled::settings::Style;
use tabled::{Table, Tabled};

use crate::console::LeadPage;
use crate::types::{Lead, LeadStatus, Trip, User};
use crate::utils::{single_line, tel_link, truncate_string, whatsapp_link};

/// Maximum note length shown in the lead table.
const NOTE_WIDTH: usize = 32;

/// Description and suggested next action for a status.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct StatusInfo {
    pub description: &'static str,
    pub action: &'static str,
}

pub fn status_info(status: &LeadStatus) -> StatusInfo {
    let (description, action) = match status {
        LeadStatus::New => ("New inquiry", "Lead"),
        LeadStatus::Pending => ("Awaiting response", "Follow up"),
        LeadStatus::WaitingForPayment => ("Waiting for payment", "Send invoice"),
        LeadStatus::Confirmed => ("Trip confirmed", "View details"),
        LeadStatus::Cancelled => ("Cancelled", "Archive"),
        LeadStatus::Unknown(_) => ("Unknown status", "Review"),
    };
    StatusInfo {
        description,
        action,
    }
}

pub fn format_status_colored(status: &LeadStatus) -> String {
    format_status_colored_with_format(status, |s| format!("[{s}]"))
}

pub fn format_status_colored_with_format<F>(status: &LeadStatus, format_fn: F) -> String
where
    F: Fn(&str) -> String,
{
    let badge = format_fn(&status.label());
    match status {
        LeadStatus::New => badge.blue().to_string(),
        LeadStatus::Pending => badge.yellow().to_string(),
        LeadStatus::WaitingForPayment => badge.magenta().to_string(),
        LeadStatus::Confirmed => badge.green().to_string(),
        LeadStatus::Cancelled => badge.red().to_string(),
        LeadStatus::Unknown(_) => badge.dimmed().to_string(),
    }
}

#[derive(Tabled)]
struct LeadRow {
    #[tabled(rename = "ID")]
    id: String,
    #[tabled(rename = "Name")]
    name: String,
    #[tabled(rename = "Phone")]
    phone: String,
    #[tabled(rename = "Status")]
    status: String,
    #[tabled(rename = "Assigned To")]
    assigned_to: String,
    #[tabled(rename = "Note")]
    note: String,
}

impl LeadRow {
    fn new(lead: &Lead) -> Self {
        Self {
            id: lead.id.to_string(),
            name: if lead.name.is_empty() {
                "(no name)".to_string()
            } else {
                lead.name.clone()
            },
            phone: lead.full_phone(),
            status: lead.status.label(),
            assigned_to: lead.assignee_name().unwrap_or("Unassigned").to_string(),
            note: lead
                .note
                .as_deref()
                .map(|n| truncate_string(&single_line(n), NOTE_WIDTH))
                .unwrap_or_default(),
        }
    }
}

/// Table of the rows on one page, without colour so widths stay aligned.
pub fn render_lead_table(leads: &[&Lead]) -> String {
    let rows: Vec<LeadRow> = leads.iter().map(|lead| LeadRow::new(lead)).collect();
    let mut table = Table::new(rows);
    table.with(Style::rounded());
    table.to_string()
}

#[derive(Tabled)]
struct TripRow {
    #[tabled(rename = "ID")]
    id: String,
    #[tabled(rename = "Trip")]
    name: String,
    #[tabled(rename = "Date")]
    date: String,
    #[tabled(rename = "State")]
    state: String,
}

pub fn render_trip_table(trips: &[Trip], today: jiff::civil::Date) -> String {
    let rows: Vec<TripRow> = trips
        .iter()
        .map(|trip| TripRow {
            id: trip.id.to_string(),
            name: trip.name.clone(),
            date: trip.formatted_date(),
            state: if trip.is_expired_on(today) {
                "expired".to_string()
            } else {
                "open".to_string()
            },
        })
        .collect();
    let mut table = Table::new(rows);
    table.with(Style::rounded());
    table.to_string()
}

#[derive(Tabled)]
struct UserRow {
    #[tabled(rename = "ID")]
    id: String,
    #[tabled(rename = "Username")]
    username: String,
}

pub fn render_user_table(users: &[User]) -> String {
    let rows: Vec<UserRow> = users
        .iter()
        .map(|u| UserRow {
            id: u.id.to_string(),
            username: u.username.clone(),
        })
        .collect();
    let mut table = Table::new(rows);
    table.with(Style::rounded());
    table.to_string()
}

/// "Showing a-b of n leads" line under the table.
pub fn page_summary(page: &LeadPage<'_>) -> String {
    if page.total == 0 {
        return "No leads for this trip".to_string();
    }
    if page.matched == 0 {
        return format!("No leads match the current filters ({} total)", page.total);
    }
    if page.is_empty() {
        return format!(
            "Page {} is past the end ({} of {} matching leads)",
            page.current_page, page.matched, page.total
        );
    }

    let mut summary = format!(
        "Showing {}-{} of {} leads",
        page.range.start + 1,
        page.range.end,
        page.matched
    );
    if page.matched < page.total {
        summary.push_str(&format!(" (filtered from {})", page.total));
    }
    summary
}

/// "Page x of y" with the page window, current page in brackets.
pub fn page_navigation(page: &LeadPage<'_>) -> String {
    let numbers: Vec<String> = page
        .window
        .clone()
        .map(|n| {
            if n == page.current_page {
                format!("[{n}]")
            } else {
                n.to_string()
            }
        })
        .collect();
    format!(
        "Page {} of {}  {}",
        page.current_page,
        page.total_pages,
        numbers.join(" ")
    )
}

/// Multi-line detail view of one lead.
pub fn format_lead_detail(lead: &Lead) -> String {
    let info = status_info(&lead.status);
    let mut out = String::new();
    out.push_str(&format!("{}\n", lead.name.bold()));
    out.push_str(&format!("  {:<12}{}\n", "ID:".dimmed(), lead.id));
    out.push_str(&format!(
        "  {:<12}{} {}\n",
        "Status:".dimmed(),
        format_status_colored(&lead.status),
        info.description.dimmed()
    ));
    out.push_str(&format!("  {:<12}{}\n", "Next step:".dimmed(), info.action));
    out.push_str(&format!("  {:<12}{}\n", "Phone:".dimmed(), lead.full_phone()));
    out.push_str(&format!(
        "  {:<12}{}\n",
        "Assigned:".dimmed(),
        lead.assignee_name().unwrap_or("Unassigned")
    ));
    if let Some(note) = lead.note.as_deref().filter(|n| !n.is_empty()) {
        out.push_str(&format!("  {:<12}{}\n", "Note:".dimmed(), note));
    }
    out.push_str(&format!("  {:<12}{}\n", "Call:".dimmed(), tel_link(&lead.phone)));
    out.push_str(&format!(
        "  {:<12}{}",
        "WhatsApp:".dimmed(),
        whatsapp_link(&lead.phone)
    ));
    out
}
