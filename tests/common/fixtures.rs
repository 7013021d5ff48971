//! Builders for trips, users and leads used across integration tests.

use jiff::civil::{Date, date};
use leaddesk::types::{Lead, LeadStatus, Trip, User};

pub const OPEN_TRIP: &str = "c-open";
pub const EXPIRED_TRIP: &str = "c-expired";
pub const UNDATED_TRIP: &str = "c-undated";

/// Fixed "today" for console tests.
pub fn today() -> Date {
    date(2025, 6, 14)
}

/// One future trip, one long past and one without a date. Dates are far
/// enough from now that tests going through the real clock agree.
pub fn trips() -> Vec<Trip> {
    vec![
        Trip::new(OPEN_TRIP, "Monsoon Trek", Some("2099-07-01T00:00:00.000Z")),
        Trip::new(EXPIRED_TRIP, "Spring Hike", Some("2020-03-01")),
        Trip::new(UNDATED_TRIP, "Open Camp", None),
    ]
}

pub fn users() -> Vec<User> {
    vec![User::new("u1", "sam"), User::new("u2", "ria")]
}

pub fn lead(id: &str, name: &str, phone: &str) -> Lead {
    Lead::new(id, name, phone)
}

/// `count` leads named "Lead 01".. with every fifth one confirmed and
/// assigned to sam.
pub fn numbered_leads(prefix: &str, count: usize) -> Vec<Lead> {
    (1..=count)
        .map(|i| {
            let lead = Lead::new(
                format!("{prefix}{i}"),
                format!("Lead {i:02}"),
                format!("90000000{i:02}"),
            );
            if i % 5 == 0 {
                lead.with_status(LeadStatus::Confirmed).assigned("u1", "sam")
            } else {
                lead
            }
        })
        .collect()
}
