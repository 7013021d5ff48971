//! Lead query pipeline: search, filter, then sort.
//!
//! Everything here is a pure function of the cached leads and the filter
//! state, cheap enough to rerun on every keystroke for a few thousand leads.

pub mod filter;
pub mod sort;

pub use filter::{ALL, AssigneeFilter, LeadFilter, SearchTerm, StatusFilter, UNASSIGNED};
pub use sort::{SortDirection, SortKey, SortSpec, sort_leads};

use crate::types::Lead;

/// Complete filter and sort state for one listing.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct LeadQuery {
    pub search: String,
    pub status: StatusFilter,
    pub assignee: AssigneeFilter,
    pub sort: SortSpec,
}

impl LeadQuery {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_search(mut self, search: impl Into<String>) -> Self {
        self.search = search.into();
        self
    }

    pub fn with_status(mut self, status: StatusFilter) -> Self {
        self.status = status;
        self
    }

    pub fn with_assignee(mut self, assignee: AssigneeFilter) -> Self {
        self.assignee = assignee;
        self
    }

    pub fn with_sort(mut self, sort: SortSpec) -> Self {
        self.sort = sort;
        self
    }

    /// True when the lead passes all three filter dimensions.
    pub fn matches(&self, lead: &Lead) -> bool {
        self.predicate()(lead)
    }

    /// Run the pipeline over `leads`, returning the matching subset in sort
    /// order. Input order is kept for ties.
    pub fn run<'a>(&self, leads: &'a [Lead]) -> Vec<&'a Lead> {
        let keep = self.predicate();
        let mut matched: Vec<&Lead> = leads.iter().filter(|&lead| keep(lead)).collect();

        sort_leads(&mut matched, self.sort);
        matched
    }

    /// Number of leads the pipeline would return, without sorting.
    pub fn count(&self, leads: &[Lead]) -> usize {
        let keep = self.predicate();
        leads.iter().filter(|&lead| keep(lead)).count()
    }

    /// Conjunction of the search, status and assignee filters. The search
    /// term is prepared once per call.
    fn predicate(&self) -> impl Fn(&Lead) -> bool + '_ {
        let search = SearchTerm::new(&self.search);
        move |lead: &Lead| {
            let filters: [&dyn LeadFilter; 3] = [&search, &self.status, &self.assignee];
            filters.iter().all(|f| f.matches(lead))
        }
    }
}
