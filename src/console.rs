//! The lead console: one selected trip, its cached leads, the filter and
//! page state over them, and the edit form.
//!
//! Everything runs on a single logical thread. Network calls are the only
//! suspension points, so the console is split into a synchronous event API
//! (`on_trip_changed`, `apply_fetch`, `begin_save`, `complete_save`) and thin
//! async wrappers that drive it against a [`LeadStore`].
//!
//! Each lead fetch is tagged with the trip it was issued for and a
//! generation counter. A response whose tag is no longer current is dropped,
//! so a slow fetch for a previous trip can never overwrite the cache of the
//! trip now selected.

use std::ops::{Range, RangeInclusive};

use jiff::civil::Date;
use jiff::Zoned;

use crate::cache::{LeadCache, Upsert};
use crate::config::FilterPreferences;
use crate::edit::{EditForm, EditSession, LeadField, SaveRequest};
use crate::error::{LeadError, Result};
use crate::notify::Toast;
use crate::pagination::{PageSize, Pagination};
use crate::query::{AssigneeFilter, LeadQuery, SortKey, SortSpec, StatusFilter};
use crate::remote::LeadStore;
use crate::types::{Lead, LeadId, Trip, TripId, User};

/// Identifies one lead fetch. Only the most recent ticket can be applied.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FetchTicket {
    pub trip_id: TripId,
    generation: u64,
}

/// A validated save waiting for the store's answer.
#[derive(Debug, Clone)]
pub struct SaveTicket {
    pub request: SaveRequest,
    trip_id: Option<TripId>,
    generation: u64,
}

/// One entry of the assignee filter menu.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AssigneeOption {
    pub value: AssigneeFilter,
    pub label: String,
}

/// The visible page of the filtered, sorted listing.
#[derive(Debug, Clone)]
pub struct LeadPage<'a> {
    pub rows: Vec<&'a Lead>,
    pub current_page: usize,
    pub total_pages: usize,
    pub page_size: PageSize,
    /// Leads passing the filters
    pub matched: usize,
    /// Leads in the cache
    pub total: usize,
    /// Page numbers to offer as buttons
    pub window: RangeInclusive<usize>,
    /// Position of `rows` within the matched listing
    pub range: Range<usize>,
}

impl LeadPage<'_> {
    pub fn is_empty(&self) -> bool {
        self.rows.is_empty()
    }
}

#[derive(Debug)]
pub struct LeadConsole {
    today: Date,
    trips: Vec<Trip>,
    users: Vec<User>,
    selected_trip: Option<TripId>,
    generation: u64,
    loading: bool,
    cache: LeadCache,
    query: LeadQuery,
    pagination: Pagination,
    edit: EditSession,
    toast: Option<Toast>,
}

impl LeadConsole {
    /// New console with restored filter preferences, evaluating trip expiry
    /// against `today`.
    pub fn new(preferences: FilterPreferences, page_size: PageSize, today: Date) -> Self {
        Self {
            today,
            trips: Vec::new(),
            users: Vec::new(),
            selected_trip: None,
            generation: 0,
            loading: false,
            cache: LeadCache::new(),
            query: LeadQuery::new()
                .with_status(preferences.status)
                .with_assignee(preferences.assignee),
            pagination: Pagination::new(page_size),
            edit: EditSession::new(),
            toast: None,
        }
    }

    /// Console evaluating expiry against the local calendar day.
    pub fn for_today(preferences: FilterPreferences, page_size: PageSize) -> Self {
        Self::new(preferences, page_size, Zoned::now().date())
    }

    pub fn today(&self) -> Date {
        self.today
    }

    // Trips and users

    /// Load trips and users concurrently, then select the first trip and
    /// fetch its leads. Failures leave the affected list empty.
    pub async fn bootstrap(&mut self, store: &dyn LeadStore) {
        let (trips, users) = futures::future::join(store.list_trips(), store.list_users()).await;
        self.load_users(users);
        if let Some(ticket) = self.load_trips(trips) {
            let leads = store.list_leads(&ticket.trip_id).await;
            self.apply_fetch(ticket, leads);
        }
    }

    /// Install the trip list. When no trip is selected yet the first one is
    /// selected and the fetch ticket for it returned.
    pub fn load_trips(&mut self, result: Result<Vec<Trip>>) -> Option<FetchTicket> {
        self.trips = match result {
            Ok(trips) => trips,
            Err(e) => {
                tracing::warn!("Failed to load trips: {}", e);
                Vec::new()
            }
        };

        if self.selected_trip.is_some() {
            return None;
        }
        let first = self.trips.first()?.id.clone();
        self.on_trip_changed(first).ok()
    }

    pub fn load_users(&mut self, result: Result<Vec<User>>) {
        self.users = match result {
            Ok(users) => users,
            Err(e) => {
                tracing::warn!("Failed to load users: {}", e);
                Vec::new()
            }
        };
    }

    pub fn trips(&self) -> &[Trip] {
        &self.trips
    }

    pub fn users(&self) -> &[User] {
        &self.users
    }

    pub fn selected_trip_id(&self) -> Option<&TripId> {
        self.selected_trip.as_ref()
    }

    /// The selected trip, if it is among the loaded trips.
    pub fn selected_trip(&self) -> Option<&Trip> {
        let id = self.selected_trip.as_ref()?;
        self.trips.iter().find(|t| t.id == *id)
    }

    pub fn is_trip_expired(&self) -> bool {
        self.selected_trip()
            .is_some_and(|t| t.is_expired_on(self.today))
    }

    /// Find a trip by id or by case-insensitive name.
    pub fn find_trip(&self, key: &str) -> Option<&Trip> {
        self.trips
            .iter()
            .find(|t| t.id.as_str() == key)
            .or_else(|| self.trips.iter().find(|t| t.name.eq_ignore_ascii_case(key)))
    }

    /// Menu entries for the assignee filter: the two sentinels, then users.
    pub fn assignee_options(&self) -> Vec<AssigneeOption> {
        let mut options = vec![
            AssigneeOption {
                value: AssigneeFilter::All,
                label: "All".to_string(),
            },
            AssigneeOption {
                value: AssigneeFilter::Unassigned,
                label: "Unassigned".to_string(),
            },
        ];
        options.extend(self.users.iter().map(|u| AssigneeOption {
            value: AssigneeFilter::User(u.id.clone()),
            label: u.username.clone(),
        }));
        options
    }

    // Trip selection and lead fetch

    /// Select a trip. Discards the cache, closes the form, goes back to the
    /// first page and returns the ticket the matching fetch must present.
    ///
    /// Search, sort and filters are kept.
    pub fn on_trip_changed(&mut self, trip_id: TripId) -> Result<FetchTicket> {
        if !self.trips.is_empty() && !self.trips.iter().any(|t| t.id == trip_id) {
            return Err(LeadError::TripNotFound(trip_id.to_string()));
        }

        self.generation += 1;
        self.selected_trip = Some(trip_id.clone());
        self.cache.clear();
        self.loading = true;
        self.edit.close();
        self.pagination.reset();

        tracing::debug!("Selected trip {} (generation {})", trip_id, self.generation);
        Ok(FetchTicket {
            trip_id,
            generation: self.generation,
        })
    }

    pub fn is_current(&self, ticket: &FetchTicket) -> bool {
        ticket.generation == self.generation && self.selected_trip.as_ref() == Some(&ticket.trip_id)
    }

    /// Apply a completed fetch. Returns false when the ticket is stale and
    /// the result was dropped.
    pub fn apply_fetch(&mut self, ticket: FetchTicket, result: Result<Vec<Lead>>) -> bool {
        if !self.is_current(&ticket) {
            tracing::debug!(
                "Discarding stale lead fetch for trip {} (generation {}, current {})",
                ticket.trip_id,
                ticket.generation,
                self.generation
            );
            return false;
        }

        match result {
            Ok(leads) => self.cache.load(leads),
            Err(e) => {
                tracing::warn!("Failed to load leads for trip {}: {}", ticket.trip_id, e);
                self.cache.clear();
            }
        }
        self.loading = false;
        true
    }

    /// Select a trip and fetch its leads.
    pub async fn switch_trip(&mut self, store: &dyn LeadStore, trip_id: TripId) -> Result<()> {
        let ticket = self.on_trip_changed(trip_id)?;
        let result = store.list_leads(&ticket.trip_id).await;
        self.apply_fetch(ticket, result);
        Ok(())
    }

    pub fn is_loading(&self) -> bool {
        self.loading
    }

    /// All cached leads in insertion order.
    pub fn leads(&self) -> &[Lead] {
        self.cache.as_slice()
    }

    pub fn lead(&self, id: &LeadId) -> Option<&Lead> {
        self.cache.get(id)
    }

    // Filters and sort

    pub fn query(&self) -> &LeadQuery {
        &self.query
    }

    pub fn set_search(&mut self, search: impl Into<String>) {
        let search = search.into();
        if search != self.query.search {
            self.query.search = search;
            self.pagination.reset();
        }
    }

    pub fn set_status_filter(&mut self, status: StatusFilter) {
        if status != self.query.status {
            self.query.status = status;
            self.pagination.reset();
        }
    }

    pub fn set_assignee_filter(&mut self, assignee: AssigneeFilter) {
        if assignee != self.query.assignee {
            self.query.assignee = assignee;
            self.pagination.reset();
        }
    }

    /// Header click: same key flips direction, a new key sorts ascending.
    /// The current page is kept.
    pub fn sort_by(&mut self, key: SortKey) {
        self.query.sort = self.query.sort.toggled(key);
    }

    /// Set key and direction at once. The current page is kept.
    pub fn set_sort(&mut self, sort: SortSpec) {
        self.query.sort = sort;
    }

    /// Current filter values, for persisting.
    pub fn filter_preferences(&self) -> FilterPreferences {
        FilterPreferences {
            status: self.query.status.clone(),
            assignee: self.query.assignee.clone(),
        }
    }

    // Pagination

    /// Number of leads passing the current filters.
    pub fn matched_count(&self) -> usize {
        self.query.count(self.cache.as_slice())
    }

    pub fn current_page(&self) -> usize {
        self.pagination.current_page()
    }

    pub fn page_size(&self) -> PageSize {
        self.pagination.page_size()
    }

    pub fn total_pages(&self) -> usize {
        self.pagination.total_pages(self.matched_count())
    }

    /// Jump to a page, clamped into range. Returns the page now current.
    pub fn set_page(&mut self, page: i64) -> usize {
        let matched = self.matched_count();
        self.pagination.set_page(page, matched)
    }

    pub fn set_page_size(&mut self, page_size: PageSize) {
        self.pagination.set_page_size(page_size);
    }

    pub fn first_page(&mut self) -> usize {
        let matched = self.matched_count();
        self.pagination.first(matched)
    }

    pub fn previous_page(&mut self) -> usize {
        let matched = self.matched_count();
        self.pagination.previous(matched)
    }

    pub fn next_page(&mut self) -> usize {
        let matched = self.matched_count();
        self.pagination.next(matched)
    }

    pub fn last_page(&mut self) -> usize {
        let matched = self.matched_count();
        self.pagination.last(matched)
    }

    /// Run the query and cut out the current page.
    pub fn view(&self) -> LeadPage<'_> {
        let matched = self.query.run(self.cache.as_slice());
        let range = self.pagination.row_range(matched.len());
        let rows = matched[range.clone()].to_vec();

        LeadPage {
            rows,
            current_page: self.pagination.current_page(),
            total_pages: self.pagination.total_pages(matched.len()),
            page_size: self.pagination.page_size(),
            matched: matched.len(),
            total: self.cache.len(),
            window: self.pagination.window(matched.len()),
            range,
        }
    }

    // Edit form

    pub fn form(&self) -> Option<&EditForm> {
        self.edit.form()
    }

    pub fn is_form_open(&self) -> bool {
        self.edit.is_open()
    }

    /// Open the form on a cached lead. Expired trips open it read-only.
    pub fn open_lead(&mut self, id: &LeadId) -> Result<()> {
        let lead = self
            .cache
            .get(id)
            .cloned()
            .ok_or_else(|| LeadError::LeadNotFound(id.to_string()))?;
        let read_only = self.is_trip_expired();
        self.edit.open_existing(lead, read_only);
        Ok(())
    }

    /// Open an empty form. Not available for expired trips.
    pub fn open_new(&mut self) -> Result<()> {
        if let Some(trip) = self.selected_trip()
            && trip.is_expired_on(self.today)
        {
            return Err(LeadError::TripExpired(trip.id.to_string()));
        }
        self.edit.open_new();
        Ok(())
    }

    pub fn close_form(&mut self) {
        self.edit.close();
    }

    pub fn edit_field(&mut self, field: LeadField, value: &str) -> Result<()> {
        self.edit.set_field(field, value)
    }

    /// Validate the open form. A failure raises an error toast and leaves
    /// the form open; nothing is sent.
    pub fn begin_save(&mut self) -> Result<SaveTicket> {
        let trip = self.selected_trip().cloned().or_else(|| {
            self.selected_trip
                .as_ref()
                .map(|id| Trip::new(id.clone(), String::new(), None))
        });

        match self.edit.prepare_save(trip.as_ref(), self.today) {
            Ok(request) => Ok(SaveTicket {
                request,
                trip_id: trip.map(|t| t.id),
                generation: self.generation,
            }),
            Err(e) => {
                self.toast = Some(Toast::error(e.user_message()));
                Err(e)
            }
        }
    }

    /// Apply the store's answer to a save.
    ///
    /// Success merges the returned lead into the cache, closes the form and
    /// raises a success toast. Failure raises an error toast and leaves both
    /// the cache and the form untouched.
    ///
    /// The lead is merged while its own trip is selected and loaded, which
    /// includes coming back to that trip after the refetch already landed.
    /// The form is closed only when the selection never changed.
    pub fn complete_save(&mut self, ticket: SaveTicket, result: Result<Lead>) -> Result<Lead> {
        match result {
            Ok(lead) => {
                let same_selection = ticket.generation == self.generation;
                let own_trip_loaded = !self.loading
                    && ticket.trip_id.is_some()
                    && self.selected_trip == ticket.trip_id;
                if same_selection || own_trip_loaded {
                    let outcome = self.cache.upsert(lead.clone());
                    tracing::debug!("Merged lead {} into cache ({:?})", lead.id, outcome);
                } else {
                    tracing::debug!("Trip changed during save of lead {}, not merging", lead.id);
                }
                if same_selection {
                    self.edit.close();
                }
                self.toast = Some(Toast::success(ticket.request.success_message()));
                Ok(lead)
            }
            Err(e) => {
                tracing::warn!("Failed to save lead: {}", e);
                self.toast = Some(Toast::error(e.user_message()));
                Err(e)
            }
        }
    }

    /// Validate, send and merge the open form.
    pub async fn save(&mut self, store: &dyn LeadStore) -> Result<Lead> {
        let ticket = self.begin_save()?;
        let result = match &ticket.request {
            SaveRequest::Create(new) => store.create_lead(new).await,
            SaveRequest::Update(update) => store.update_lead(update).await,
        };
        self.complete_save(ticket, result)
    }

    /// Merge a lead saved elsewhere. Exposed for callers that talk to the
    /// store themselves.
    pub fn merge_lead(&mut self, lead: Lead) -> Upsert {
        self.cache.upsert(lead)
    }

    // Notifications

    pub fn toast(&self) -> Option<&Toast> {
        self.toast.as_ref()
    }

    pub fn take_toast(&mut self) -> Option<Toast> {
        self.toast.take()
    }

    /// Drop the toast once it has been shown long enough.
    pub fn expire_toast(&mut self, now: std::time::Instant) {
        if self.toast.as_ref().is_some_and(|t| t.is_expired_at(now)) {
            self.toast = None;
        }
    }
}
