//! In-memory [`LeadStore`] with server-side id assignment, call counters,
//! per-trip response delays and injectable failures.

use std::collections::HashMap;
use std::sync::{Arc, Mutex};
use std::time::Duration;

use async_trait::async_trait;
use leaddesk::auth::Credentials;
use leaddesk::error::{LeadError, Result};
use leaddesk::remote::{LeadStore, LeadUpdate, LoginResponse, NewLead};
use leaddesk::types::{Lead, LeadId, LeadStatus, Trip, TripId, User};

pub const USERNAME: &str = "sam";
pub const PASSWORD: &str = "secret1";
pub const TOKEN: &str = "tok-sam";

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Op {
    ListTrips,
    ListLeads,
    ListUsers,
    Create,
    Update,
    Login,
    Logout,
}

/// Error a scripted operation fails with.
#[derive(Debug, Clone)]
pub enum Failure {
    Api(String),
    Unauthorized,
    Timeout,
}

impl Failure {
    fn to_error(&self) -> LeadError {
        match self {
            Failure::Api(msg) => LeadError::Api(msg.clone()),
            Failure::Unauthorized => LeadError::Unauthorized,
            Failure::Timeout => LeadError::Timeout(60),
        }
    }
}

#[derive(Default)]
struct State {
    trips: Vec<Trip>,
    users: Vec<User>,
    leads: HashMap<TripId, Vec<Lead>>,
    calls: HashMap<Op, usize>,
    failures: HashMap<Op, Failure>,
    delays: HashMap<TripId, Duration>,
}

/// Clones share state, so a test can keep a handle after giving one away.
#[derive(Clone, Default)]
pub struct MemoryLeadStore {
    state: Arc<Mutex<State>>,
}

impl MemoryLeadStore {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_trips(self, trips: Vec<Trip>) -> Self {
        self.state.lock().unwrap().trips = trips;
        self
    }

    pub fn with_users(self, users: Vec<User>) -> Self {
        self.state.lock().unwrap().users = users;
        self
    }

    pub fn with_leads(self, trip: &str, leads: Vec<Lead>) -> Self {
        self.state
            .lock()
            .unwrap()
            .leads
            .insert(TripId::new(trip), leads);
        self
    }

    /// Make every later call of `op` fail.
    pub fn fail(&self, op: Op, failure: Failure) {
        self.state.lock().unwrap().failures.insert(op, failure);
    }

    pub fn recover(&self, op: Op) {
        self.state.lock().unwrap().failures.remove(&op);
    }

    /// Hold lead listings for `trip` for `delay` before answering.
    pub fn delay_leads(&self, trip: &str, delay: Duration) {
        self.state
            .lock()
            .unwrap()
            .delays
            .insert(TripId::new(trip), delay);
    }

    pub fn calls(&self, op: Op) -> usize {
        self.state
            .lock()
            .unwrap()
            .calls
            .get(&op)
            .copied()
            .unwrap_or(0)
    }

    /// Leads as the server has them for `trip`.
    pub fn stored_leads(&self, trip: &str) -> Vec<Lead> {
        self.state
            .lock()
            .unwrap()
            .leads
            .get(&TripId::new(trip))
            .cloned()
            .unwrap_or_default()
    }

    fn enter(&self, op: Op) -> Result<()> {
        let mut state = self.state.lock().unwrap();
        *state.calls.entry(op).or_default() += 1;
        match state.failures.get(&op) {
            Some(failure) => Err(failure.to_error()),
            None => Ok(()),
        }
    }
}

#[async_trait]
impl LeadStore for MemoryLeadStore {
    async fn list_trips(&self) -> Result<Vec<Trip>> {
        self.enter(Op::ListTrips)?;
        Ok(self.state.lock().unwrap().trips.clone())
    }

    async fn list_leads(&self, trip: &TripId) -> Result<Vec<Lead>> {
        self.enter(Op::ListLeads)?;
        let delay = self.state.lock().unwrap().delays.get(trip).copied();
        if let Some(delay) = delay {
            tokio::time::sleep(delay).await;
        }
        Ok(self
            .state
            .lock()
            .unwrap()
            .leads
            .get(trip)
            .cloned()
            .unwrap_or_default())
    }

    async fn list_users(&self) -> Result<Vec<User>> {
        self.enter(Op::ListUsers)?;
        Ok(self.state.lock().unwrap().users.clone())
    }

    async fn create_lead(&self, new: &NewLead) -> Result<Lead> {
        self.enter(Op::Create)?;
        let mut lead = Lead::new(
            uuid::Uuid::new_v4().to_string(),
            new.name.clone(),
            new.phone.clone(),
        );
        lead.country_code = new.country_code.clone();
        lead.note = Some(new.note.clone()).filter(|n| !n.is_empty());
        lead.camp = Some(new.camp.clone());

        self.state
            .lock()
            .unwrap()
            .leads
            .entry(new.camp.clone())
            .or_default()
            .push(lead.clone());
        Ok(lead)
    }

    async fn update_lead(&self, update: &LeadUpdate) -> Result<Lead> {
        self.enter(Op::Update)?;
        let mut state = self.state.lock().unwrap();
        let lead = state
            .leads
            .values_mut()
            .flat_map(|leads| leads.iter_mut())
            .find(|l| l.id == update.id)
            .ok_or_else(|| LeadError::Api("Lead not found".to_string()))?;

        lead.name = update.name.clone();
        lead.country_code = update.country_code.clone();
        lead.phone = update.phone.clone();
        lead.note = Some(update.note.clone()).filter(|n| !n.is_empty());
        lead.status = update.status.clone();
        Ok(lead.clone())
    }

    async fn login(&self, credentials: &Credentials) -> Result<LoginResponse> {
        self.enter(Op::Login)?;
        if credentials.username() == USERNAME && credentials.password() == PASSWORD {
            Ok(LoginResponse {
                token: TOKEN.to_string(),
                name: "Sam".to_string(),
            })
        } else {
            Err(LeadError::Api("Invalid credentials".to_string()))
        }
    }

    async fn logout(&self) -> Result<()> {
        self.enter(Op::Logout)
    }
}

/// Lead id of the stored lead named `name`.
pub fn id_of(store: &MemoryLeadStore, trip: &str, name: &str) -> LeadId {
    store
        .stored_leads(trip)
        .into_iter()
        .find(|l| l.name == name)
        .map(|l| l.id)
        .expect("lead not in store")
}

/// Status of a stored lead.
pub fn stored_status(store: &MemoryLeadStore, trip: &str, id: &LeadId) -> Option<LeadStatus> {
    store
        .stored_leads(trip)
        .into_iter()
        .find(|l| l.id == *id)
        .map(|l| l.status)
}
