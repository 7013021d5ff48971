//! Sort functions for lead listings.

use std::cmp::Ordering;

use unicase::UniCase;

use crate::types::Lead;

/// Column a lead listing can be sorted by.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum SortKey {
    #[default]
    Name,
    Phone,
    Status,
    AssignedTo,
}

impl SortKey {
    /// All valid string representations of this enum.
    pub const ALL_STRINGS: &[&str] = &["name", "phone", "status", "assignedTo"];

    /// The string a lead is compared by for this key.
    pub fn value_of<'a>(&self, lead: &'a Lead) -> &'a str {
        match self {
            SortKey::Name => &lead.name,
            SortKey::Phone => &lead.phone,
            SortKey::Status => lead.status.as_str(),
            SortKey::AssignedTo => lead.assignee_name().unwrap_or(""),
        }
    }
}

enum_display_fromstr!(
    SortKey,
    crate::error::LeadError::invalid_sort_key,
    {
        Name => "name",
        Phone => "phone",
        Status => "status",
        AssignedTo => "assignedTo" | "assigned_to" | "assignee",
    }
);

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum SortDirection {
    #[default]
    Ascending,
    Descending,
}

impl SortDirection {
    pub fn flip(self) -> Self {
        match self {
            SortDirection::Ascending => SortDirection::Descending,
            SortDirection::Descending => SortDirection::Ascending,
        }
    }
}

enum_display_fromstr!(
    SortDirection,
    crate::error::LeadError::invalid_sort_direction,
    {
        Ascending => "asc" | "ascending",
        Descending => "desc" | "descending",
    }
);

/// Active sort: one key and one direction.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct SortSpec {
    pub key: SortKey,
    pub direction: SortDirection,
}

impl SortSpec {
    pub fn new(key: SortKey, direction: SortDirection) -> Self {
        Self { key, direction }
    }

    /// Column-header behaviour: picking the active key flips the direction,
    /// picking a different key sorts by it ascending.
    pub fn toggled(self, key: SortKey) -> Self {
        if self.key == key {
            Self::new(key, self.direction.flip())
        } else {
            Self::new(key, SortDirection::Ascending)
        }
    }

    pub fn compare(&self, a: &Lead, b: &Lead) -> Ordering {
        let ord = UniCase::new(self.key.value_of(a)).cmp(&UniCase::new(self.key.value_of(b)));
        match self.direction {
            SortDirection::Ascending => ord,
            SortDirection::Descending => ord.reverse(),
        }
    }
}

/// Sort leads in place. The sort is stable: ties keep their relative order.
pub fn sort_leads(leads: &mut [&Lead], spec: SortSpec) {
    leads.sort_by(|a, b| spec.compare(a, b));
}

#[cfg(test)]
mod tests {
    use std::str::FromStr;

    use super::*;
    use crate::types::LeadStatus;

    fn ids(leads: &[&Lead]) -> Vec<String> {
        leads.iter().map(|l| l.id.to_string()).collect()
    }

    #[test]
    fn test_sort_by_name_case_insensitive() {
        let a = Lead::new("1", "bala", "1");
        let b = Lead::new("2", "Anu", "2");
        let c = Lead::new("3", "Chitra", "3");
        let mut leads = vec![&a, &b, &c];

        sort_leads(&mut leads, SortSpec::default());
        assert_eq!(ids(&leads), ["2", "1", "3"]);

        sort_leads(
            &mut leads,
            SortSpec::new(SortKey::Name, SortDirection::Descending),
        );
        assert_eq!(ids(&leads), ["3", "1", "2"]);
    }

    #[test]
    fn test_sort_by_assignee_treats_unassigned_as_empty() {
        let a = Lead::new("1", "A", "1").assigned("u2", "zed");
        let b = Lead::new("2", "B", "2");
        let c = Lead::new("3", "C", "3").assigned("u1", "Amy");
        let mut leads = vec![&a, &b, &c];

        sort_leads(
            &mut leads,
            SortSpec::new(SortKey::AssignedTo, SortDirection::Ascending),
        );
        assert_eq!(ids(&leads), ["2", "3", "1"]);
    }

    #[test]
    fn test_sort_is_stable_for_ties() {
        let a = Lead::new("1", "x", "1").with_status(LeadStatus::Pending);
        let b = Lead::new("2", "y", "2").with_status(LeadStatus::New);
        let c = Lead::new("3", "z", "3").with_status(LeadStatus::Pending);
        let d = Lead::new("4", "w", "4").with_status(LeadStatus::New);
        let mut leads = vec![&a, &b, &c, &d];

        let spec = SortSpec::new(SortKey::Status, SortDirection::Ascending);
        sort_leads(&mut leads, spec);
        assert_eq!(ids(&leads), ["2", "4", "1", "3"]);

        let spec = SortSpec::new(SortKey::Status, SortDirection::Descending);
        let mut again = vec![&a, &b, &c, &d];
        sort_leads(&mut again, spec);
        assert_eq!(ids(&again), ["1", "3", "2", "4"]);
    }

    #[test]
    fn test_toggle_semantics() {
        let spec = SortSpec::default();
        let flipped = spec.toggled(SortKey::Name);
        assert_eq!(flipped.direction, SortDirection::Descending);

        let other = flipped.toggled(SortKey::Phone);
        assert_eq!(other, SortSpec::new(SortKey::Phone, SortDirection::Ascending));
    }

    #[test]
    fn test_sort_key_parsing() {
        assert_eq!(SortKey::from_str("assignedTo").unwrap(), SortKey::AssignedTo);
        assert_eq!(SortKey::from_str("ASSIGNEE").unwrap(), SortKey::AssignedTo);
        assert_eq!(SortKey::AssignedTo.to_string(), "assignedTo");
        assert!(SortKey::from_str("created").is_err());
        assert_eq!(
            SortDirection::from_str("desc").unwrap(),
            SortDirection::Descending
        );
    }
}
