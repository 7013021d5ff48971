//! Remote lead store.
//!
//! The console talks to the backend only through the [`LeadStore`] trait.
//! [`http::HttpLeadStore`] is the production implementation.

pub mod error;
pub mod http;

use serde::{Deserialize, Serialize};

use crate::auth::Credentials;
use crate::error::Result;
use crate::types::{Lead, LeadId, LeadStatus, Trip, TripId, User};

pub use error::ApiError;
pub use http::HttpLeadStore;

/// Fields sent when creating a lead. The server assigns the id and the
/// initial status.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct NewLead {
    pub name: String,
    pub country_code: String,
    pub phone: String,
    pub note: String,
    pub camp: TripId,
}

/// Full replacement of a lead's mutable fields.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct LeadUpdate {
    #[serde(skip)]
    pub id: LeadId,
    pub name: String,
    pub country_code: String,
    pub phone: String,
    pub note: String,
    pub status: LeadStatus,
}

/// Successful login payload.
#[derive(Clone, Deserialize)]
pub struct LoginResponse {
    pub token: String,
    #[serde(default)]
    pub name: String,
}

impl std::fmt::Debug for LoginResponse {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("LoginResponse")
            .field("token", &"[REDACTED]")
            .field("name", &self.name)
            .finish()
    }
}

/// Operations the console needs from the backend.
///
/// Every call may fail with a transport error or an application error
/// carrying the server's message.
#[async_trait::async_trait]
pub trait LeadStore: Send + Sync {
    async fn list_trips(&self) -> Result<Vec<Trip>>;

    /// Leads of one trip, in server order.
    async fn list_leads(&self, trip: &TripId) -> Result<Vec<Lead>>;

    async fn list_users(&self) -> Result<Vec<User>>;

    /// Create a lead. A missing status in the response reads as `new`.
    async fn create_lead(&self, lead: &NewLead) -> Result<Lead>;

    /// Update a lead. Missing id or status in the response fall back to the
    /// submitted values.
    async fn update_lead(&self, update: &LeadUpdate) -> Result<Lead>;

    async fn login(&self, credentials: &Credentials) -> Result<LoginResponse>;

    async fn logout(&self) -> Result<()>;
}
