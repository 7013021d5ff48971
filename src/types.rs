use std::fmt;
use std::str::FromStr;

use jiff::civil::Date;
use jiff::tz::TimeZone;
use serde::{Deserialize, Deserializer, Serialize, Serializer};

use crate::error::LeadError;

/// Dialing code used when a lead is created without one.
pub const DEFAULT_COUNTRY_CODE: &str = "+91";

/// Number of subscriber digits a phone number must have.
pub const PHONE_DIGITS: usize = 10;

macro_rules! string_id {
    ($name:ident) => {
        #[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
        #[serde(transparent)]
        pub struct $name(String);

        impl $name {
            pub fn new(id: impl Into<String>) -> Self {
                Self(id.into())
            }

            pub fn as_str(&self) -> &str {
                &self.0
            }
        }

        impl fmt::Display for $name {
            fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
                f.write_str(&self.0)
            }
        }

        impl From<&str> for $name {
            fn from(s: &str) -> Self {
                Self(s.to_string())
            }
        }

        impl From<String> for $name {
            fn from(s: String) -> Self {
                Self(s)
            }
        }

        impl AsRef<str> for $name {
            fn as_ref(&self) -> &str {
                &self.0
            }
        }
    };
}

string_id!(LeadId);
string_id!(TripId);
string_id!(UserId);

/// Workflow status of a lead.
///
/// Values outside the known set are kept verbatim in `Unknown` so a newer
/// server never breaks the listing.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Default)]
pub enum LeadStatus {
    #[default]
    New,
    Pending,
    WaitingForPayment,
    Cancelled,
    Confirmed,
    Unknown(String),
}

pub const VALID_STATUSES: &[&str] = &[
    "new",
    "pending",
    "waiting for payment",
    "cancelled",
    "confirmed",
];

impl LeadStatus {
    pub const KNOWN: [LeadStatus; 5] = [
        LeadStatus::New,
        LeadStatus::Pending,
        LeadStatus::WaitingForPayment,
        LeadStatus::Cancelled,
        LeadStatus::Confirmed,
    ];

    /// Lenient parse: anything unrecognised becomes `Unknown`.
    pub fn parse(s: &str) -> Self {
        match s {
            "new" => LeadStatus::New,
            "pending" => LeadStatus::Pending,
            "waiting for payment" | "waiting_for_payment" => LeadStatus::WaitingForPayment,
            "cancelled" => LeadStatus::Cancelled,
            "confirmed" => LeadStatus::Confirmed,
            other => LeadStatus::Unknown(other.to_string()),
        }
    }

    pub fn as_str(&self) -> &str {
        match self {
            LeadStatus::New => "new",
            LeadStatus::Pending => "pending",
            LeadStatus::WaitingForPayment => "waiting for payment",
            LeadStatus::Cancelled => "cancelled",
            LeadStatus::Confirmed => "confirmed",
            LeadStatus::Unknown(s) => s,
        }
    }

    pub fn is_known(&self) -> bool {
        !matches!(self, LeadStatus::Unknown(_))
    }

    /// Human label with the first letter capitalised.
    pub fn label(&self) -> String {
        let s = self.as_str();
        let mut chars = s.chars();
        match chars.next() {
            Some(first) => first.to_uppercase().chain(chars).collect(),
            None => String::new(),
        }
    }
}

impl fmt::Display for LeadStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Strict parse used for user input: unknown values are rejected.
impl FromStr for LeadStatus {
    type Err = LeadError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let normalized = s.trim().to_lowercase().replace(['_', '-'], " ");
        match LeadStatus::parse(&normalized) {
            LeadStatus::Unknown(_) => Err(LeadError::invalid_status(s.to_string())),
            status => Ok(status),
        }
    }
}

impl Serialize for LeadStatus {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.serialize_str(self.as_str())
    }
}

impl<'de> Deserialize<'de> for LeadStatus {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        let s = String::deserialize(deserializer)?;
        Ok(LeadStatus::parse(&s))
    }
}

/// Missing, null and empty statuses all ingest as `new`.
fn status_or_new<'de, D: Deserializer<'de>>(deserializer: D) -> Result<LeadStatus, D::Error> {
    let raw: Option<String> = Option::deserialize(deserializer)?;
    Ok(match raw.as_deref() {
        None | Some("") => LeadStatus::New,
        Some(s) => LeadStatus::parse(s),
    })
}

fn string_or_empty<'de, D: Deserializer<'de>>(deserializer: D) -> Result<String, D::Error> {
    let raw: Option<String> = Option::deserialize(deserializer)?;
    Ok(raw.unwrap_or_default())
}

/// Denormalized reference to the user a lead is assigned to.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct UserRef {
    #[serde(rename = "_id")]
    pub id: UserId,
    #[serde(default, deserialize_with = "string_or_empty")]
    pub username: String,
}

/// A prospective customer scoped to one trip.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Lead {
    #[serde(rename = "_id")]
    pub id: LeadId,
    #[serde(default, deserialize_with = "string_or_empty")]
    pub name: String,
    #[serde(default, deserialize_with = "string_or_empty")]
    pub country_code: String,
    #[serde(default, deserialize_with = "string_or_empty")]
    pub phone: String,
    #[serde(default, deserialize_with = "status_or_new")]
    pub status: LeadStatus,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub assigned_to: Option<UserRef>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub note: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub camp: Option<TripId>,
}

impl Lead {
    pub fn new(id: impl Into<LeadId>, name: impl Into<String>, phone: impl Into<String>) -> Self {
        Self {
            id: id.into(),
            name: name.into(),
            country_code: DEFAULT_COUNTRY_CODE.to_string(),
            phone: phone.into(),
            status: LeadStatus::New,
            assigned_to: None,
            note: None,
            camp: None,
        }
    }

    pub fn with_status(mut self, status: LeadStatus) -> Self {
        self.status = status;
        self
    }

    pub fn assigned(mut self, id: impl Into<UserId>, username: impl Into<String>) -> Self {
        self.assigned_to = Some(UserRef {
            id: id.into(),
            username: username.into(),
        });
        self
    }

    pub fn with_note(mut self, note: impl Into<String>) -> Self {
        self.note = Some(note.into());
        self
    }

    pub fn assignee_name(&self) -> Option<&str> {
        self.assigned_to.as_ref().map(|u| u.username.as_str())
    }

    /// Full dialable number, e.g. `+91 9876543210`.
    pub fn full_phone(&self) -> String {
        if self.country_code.is_empty() {
            self.phone.clone()
        } else {
            format!("{} {}", self.country_code, self.phone)
        }
    }
}

/// A travel event ("camp") that leads belong to.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Trip {
    #[serde(rename = "_id")]
    pub id: TripId,
    #[serde(default, deserialize_with = "string_or_empty")]
    pub name: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub date: Option<String>,
}

impl Trip {
    pub fn new(id: impl Into<TripId>, name: impl Into<String>, date: Option<&str>) -> Self {
        Self {
            id: id.into(),
            name: name.into(),
            date: date.map(str::to_string),
        }
    }

    /// The trip's calendar day in the local time zone, if the date parses.
    ///
    /// Accepts RFC 3339 timestamps (`2025-06-14T00:00:00.000Z`) and plain
    /// dates (`2025-06-14`).
    pub fn day(&self) -> Option<Date> {
        let raw = self.date.as_deref()?.trim();
        if raw.is_empty() {
            return None;
        }
        if let Ok(ts) = raw.parse::<jiff::Timestamp>() {
            return Some(ts.to_zoned(TimeZone::system()).date());
        }
        match raw.parse::<Date>() {
            Ok(date) => Some(date),
            Err(e) => {
                tracing::warn!("Unparseable date '{}' on trip {}: {}", raw, self.id, e);
                None
            }
        }
    }

    /// A trip is expired when its day is strictly before `today`.
    ///
    /// Trips without a (parseable) date never expire.
    pub fn is_expired_on(&self, today: Date) -> bool {
        self.day().is_some_and(|day| day < today)
    }

    /// Long-form date for display, e.g. "June 14, 2025".
    pub fn formatted_date(&self) -> String {
        match self.day() {
            Some(day) => day.strftime("%B %-d, %Y").to_string(),
            None => self.date.clone().unwrap_or_default(),
        }
    }
}

/// A staff member leads can be assigned to.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct User {
    #[serde(rename = "_id")]
    pub id: UserId,
    #[serde(default, deserialize_with = "string_or_empty")]
    pub username: String,
}

impl User {
    pub fn new(id: impl Into<UserId>, username: impl Into<String>) -> Self {
        Self {
            id: id.into(),
            username: username.into(),
        }
    }
}
