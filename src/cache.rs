//! In-memory lead cache for the selected trip.
//!
//! Filled by one bulk fetch per trip selection and patched in place after
//! each successful save. It is never refetched after a save.

use std::collections::HashMap;

use crate::types::{Lead, LeadId, LeadStatus};

/// What an upsert did to the cache.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Upsert {
    Inserted,
    Replaced,
}

#[derive(Debug, Clone, Default)]
pub struct LeadCache {
    leads: Vec<Lead>,
}

impl LeadCache {
    pub fn new() -> Self {
        Self::default()
    }

    /// Replace the whole cache with a freshly fetched listing.
    ///
    /// Leads without a status ingest as `new`. If the server sends the same
    /// id twice the later record wins, at the earlier record's position.
    pub fn load(&mut self, leads: Vec<Lead>) {
        self.leads.clear();
        self.leads.reserve(leads.len());
        let mut index: HashMap<LeadId, usize> = HashMap::with_capacity(leads.len());
        for lead in leads {
            let lead = normalize(lead);
            match index.get(&lead.id) {
                Some(&position) => {
                    tracing::debug!("Duplicate lead id in listing, keeping the later record");
                    self.leads[position] = lead;
                }
                None => {
                    index.insert(lead.id.clone(), self.leads.len());
                    self.leads.push(lead);
                }
            }
        }
    }

    /// Merge a saved lead: replace the entry with the same id, else append.
    pub fn upsert(&mut self, lead: Lead) -> Upsert {
        match self.position(&lead.id) {
            Some(index) => {
                self.leads[index] = lead;
                Upsert::Replaced
            }
            None => {
                self.leads.push(lead);
                Upsert::Inserted
            }
        }
    }

    pub fn clear(&mut self) {
        self.leads.clear();
    }

    pub fn get(&self, id: &LeadId) -> Option<&Lead> {
        self.leads.iter().find(|lead| lead.id == *id)
    }

    pub fn contains(&self, id: &LeadId) -> bool {
        self.position(id).is_some()
    }

    pub fn len(&self) -> usize {
        self.leads.len()
    }

    pub fn is_empty(&self) -> bool {
        self.leads.is_empty()
    }

    /// Leads in insertion order.
    pub fn as_slice(&self) -> &[Lead] {
        &self.leads
    }

    fn position(&self, id: &LeadId) -> Option<usize> {
        self.leads.iter().position(|lead| lead.id == *id)
    }
}

fn normalize(mut lead: Lead) -> Lead {
    if matches!(&lead.status, LeadStatus::Unknown(s) if s.trim().is_empty()) {
        lead.status = LeadStatus::New;
    }
    lead
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_upsert_replaces_existing_in_place() {
        let mut cache = LeadCache::new();
        cache.load(vec![Lead::new("1", "Anu", "1"), Lead::new("2", "Bala", "2")]);

        let outcome = cache.upsert(Lead::new("1", "Anu K", "1").with_status(LeadStatus::Pending));
        assert_eq!(outcome, Upsert::Replaced);
        assert_eq!(cache.len(), 2);
        assert_eq!(cache.as_slice()[0].name, "Anu K");
        assert_eq!(cache.as_slice()[1].name, "Bala");
    }

    #[test]
    fn test_upsert_appends_new_id() {
        let mut cache = LeadCache::new();
        cache.load(vec![Lead::new("1", "Anu", "1")]);

        assert_eq!(cache.upsert(Lead::new("9", "New", "9")), Upsert::Inserted);
        assert_eq!(cache.len(), 2);
        assert_eq!(cache.as_slice()[1].id.as_str(), "9");

        // Same record again: size unchanged.
        assert_eq!(cache.upsert(Lead::new("9", "New", "9")), Upsert::Replaced);
        assert_eq!(cache.len(), 2);
    }

    #[test]
    fn test_load_normalizes_blank_status_and_dedupes() {
        let mut cache = LeadCache::new();
        cache.load(vec![
            Lead::new("1", "A", "1").with_status(LeadStatus::Unknown(String::new())),
            Lead::new("2", "B", "2"),
            Lead::new("1", "A2", "1").with_status(LeadStatus::Confirmed),
        ]);

        assert_eq!(cache.len(), 2);
        let first = cache.get(&LeadId::new("1")).unwrap();
        assert_eq!(first.name, "A2");
        assert_eq!(first.status, LeadStatus::Confirmed);
        assert_eq!(cache.as_slice()[0].id.as_str(), "1");
    }

    #[test]
    fn test_load_large_listing_with_repeats() {
        let leads: Vec<Lead> = (0..5000)
            .map(|i| Lead::new(format!("{}", i % 2500), format!("L{i}"), "1"))
            .collect();
        let mut cache = LeadCache::new();
        cache.load(leads);

        assert_eq!(cache.len(), 2500);
        assert_eq!(cache.as_slice()[0].name, "L2500");
        assert_eq!(cache.as_slice()[2499].id.as_str(), "2499");
        assert_eq!(cache.as_slice()[2499].name, "L4999");
    }

    #[test]
    fn test_load_discards_previous_contents() {
        let mut cache = LeadCache::new();
        cache.load(vec![Lead::new("1", "A", "1")]);
        cache.load(vec![Lead::new("2", "B", "2")]);
        assert!(!cache.contains(&LeadId::new("1")));
        assert_eq!(cache.len(), 1);
    }
}
