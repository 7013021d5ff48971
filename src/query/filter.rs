//! Filter predicates for lead listings.
//!
//! Three independent dimensions (free-text search, status, assignee) that
//! compose with logical AND.

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Deserializer, Serialize, Serializer};

use crate::error::LeadError;
use crate::types::{Lead, LeadStatus, UserId};

/// Trait for lead filters
pub trait LeadFilter {
    fn matches(&self, lead: &Lead) -> bool;
}

/// Reserved filter value that disables a dimension.
pub const ALL: &str = "all";

/// Reserved assignee filter value matching leads nobody owns.
pub const UNASSIGNED: &str = "unassigned";

/// Status dimension: `all` or one exact status.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub enum StatusFilter {
    #[default]
    All,
    Only(LeadStatus),
}

impl LeadFilter for StatusFilter {
    fn matches(&self, lead: &Lead) -> bool {
        match self {
            StatusFilter::All => true,
            StatusFilter::Only(status) => lead.status == *status,
        }
    }
}

impl StatusFilter {
    /// Parse a stored or typed value. Anything other than `all` is taken as
    /// a status, including values the server may use that we don't know.
    pub fn parse(s: &str) -> Self {
        let s = s.trim();
        if s.is_empty() || s == ALL {
            StatusFilter::All
        } else {
            StatusFilter::Only(LeadStatus::parse(s))
        }
    }
}

impl fmt::Display for StatusFilter {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            StatusFilter::All => f.write_str(ALL),
            StatusFilter::Only(status) => write!(f, "{status}"),
        }
    }
}

impl FromStr for StatusFilter {
    type Err = LeadError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Ok(StatusFilter::parse(s))
    }
}

impl Serialize for StatusFilter {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.collect_str(self)
    }
}

impl<'de> Deserialize<'de> for StatusFilter {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        let s = String::deserialize(deserializer)?;
        Ok(StatusFilter::parse(&s))
    }
}

/// Assignee dimension: `all`, `unassigned`, or a specific user id.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub enum AssigneeFilter {
    #[default]
    All,
    Unassigned,
    User(UserId),
}

impl LeadFilter for AssigneeFilter {
    fn matches(&self, lead: &Lead) -> bool {
        match self {
            AssigneeFilter::All => true,
            AssigneeFilter::Unassigned => lead.assigned_to.is_none(),
            AssigneeFilter::User(id) => lead.assigned_to.as_ref().is_some_and(|u| u.id == *id),
        }
    }
}

impl AssigneeFilter {
    pub fn parse(s: &str) -> Self {
        match s.trim() {
            "" | ALL => AssigneeFilter::All,
            UNASSIGNED => AssigneeFilter::Unassigned,
            id => AssigneeFilter::User(UserId::new(id)),
        }
    }
}

impl fmt::Display for AssigneeFilter {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            AssigneeFilter::All => f.write_str(ALL),
            AssigneeFilter::Unassigned => f.write_str(UNASSIGNED),
            AssigneeFilter::User(id) => write!(f, "{id}"),
        }
    }
}

impl FromStr for AssigneeFilter {
    type Err = LeadError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Ok(AssigneeFilter::parse(s))
    }
}

impl Serialize for AssigneeFilter {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.collect_str(self)
    }
}

impl<'de> Deserialize<'de> for AssigneeFilter {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        let s = String::deserialize(deserializer)?;
        Ok(AssigneeFilter::parse(&s))
    }
}

/// Free-text search, pre-lowercased once per query run.
#[derive(Debug, Clone)]
pub struct SearchTerm<'a> {
    raw: &'a str,
    lowered: String,
}

impl<'a> SearchTerm<'a> {
    pub fn new(raw: &'a str) -> Self {
        Self {
            raw,
            lowered: raw.to_lowercase(),
        }
    }

    pub fn is_empty(&self) -> bool {
        self.raw.is_empty()
    }
}

/// Name and assignee match case-insensitively; phone matches the raw term
/// as typed. Empty terms match everything.
impl LeadFilter for SearchTerm<'_> {
    fn matches(&self, lead: &Lead) -> bool {
        if self.is_empty() {
            return true;
        }
        lead.name.to_lowercase().contains(&self.lowered)
            || lead.phone.contains(self.raw)
            || lead
                .assignee_name()
                .is_some_and(|name| name.to_lowercase().contains(&self.lowered))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn lead(id: &str, name: &str, phone: &str) -> Lead {
        Lead::new(id, name, phone)
    }

    #[test]
    fn test_search_matches_name_case_insensitively() {
        let term = SearchTerm::new("ANU");
        assert!(term.matches(&lead("1", "Anupama", "9000000000")));
        assert!(!term.matches(&lead("2", "Bala", "9000000000")));
    }

    #[test]
    fn test_search_matches_phone_substring() {
        let term = SearchTerm::new("4321");
        assert!(term.matches(&lead("1", "Anu", "9876543210")));
        assert!(!term.matches(&lead("2", "Bala", "9000000000")));
    }

    #[test]
    fn test_search_matches_assignee_username() {
        let term = SearchTerm::new("sam");
        let assigned = lead("1", "Anu", "9000000000").assigned("u1", "Samuel");
        assert!(term.matches(&assigned));
        assert!(!term.matches(&lead("2", "Anu", "9000000000")));
    }

    #[test]
    fn test_empty_search_matches_all() {
        assert!(SearchTerm::new("").matches(&lead("1", "", "")));
    }

    #[test]
    fn test_status_filter_exact_match() {
        let confirmed = lead("1", "A", "1").with_status(LeadStatus::Confirmed);
        let unknown = lead("2", "B", "2").with_status(LeadStatus::Unknown("vip".into()));

        assert!(StatusFilter::All.matches(&confirmed));
        assert!(StatusFilter::parse("confirmed").matches(&confirmed));
        assert!(!StatusFilter::parse("new").matches(&confirmed));
        assert!(StatusFilter::parse("vip").matches(&unknown));
        assert!(!StatusFilter::parse("VIP").matches(&unknown));
    }

    #[test]
    fn test_assignee_filter_sentinels() {
        let assigned = lead("1", "A", "1").assigned("u1", "sam");
        let free = lead("2", "B", "2");

        assert!(AssigneeFilter::parse("all").matches(&assigned));
        assert!(AssigneeFilter::parse("all").matches(&free));
        assert!(AssigneeFilter::parse("unassigned").matches(&free));
        assert!(!AssigneeFilter::parse("unassigned").matches(&assigned));
        assert!(AssigneeFilter::parse("u1").matches(&assigned));
        assert!(!AssigneeFilter::parse("u2").matches(&assigned));
        assert!(!AssigneeFilter::parse("u1").matches(&free));
    }

    #[test]
    fn test_filters_roundtrip_through_strings() {
        for raw in ["all", "unassigned", "u42"] {
            assert_eq!(AssigneeFilter::parse(raw).to_string(), raw);
        }
        for raw in ["all", "new", "waiting for payment", "vip"] {
            assert_eq!(StatusFilter::parse(raw).to_string(), raw);
        }
    }
}
