//! HTTP implementation of [`LeadStore`] over the lead desk REST API.
//!
//! # Security Note - Logging
//!
//! The bearer token is wrapped in `RedactedHeader`, whose `Display` and
//! `Debug` print `[REDACTED]`, so it cannot leak through request logging.
//! Do not enable `reqwest=debug` logging in production regardless.

use std::fmt;
use std::time::Duration;

use reqwest::header::{self, HeaderValue};
use reqwest::{Client, Method, RequestBuilder};
use secrecy::{ExposeSecret, SecretString};
use serde::Deserialize;
use serde::de::DeserializeOwned;
use url::Url;

use super::error::{ApiError, transport_error};
use super::{LeadStore, LeadUpdate, LoginResponse, NewLead};
use crate::auth::{AuthSession, Credentials};
use crate::config::Config;
use crate::error::{LeadError, Result};
use crate::types::{Lead, LeadId, LeadStatus, Trip, TripId, User, UserRef};

/// Wrapper for sensitive header values that redacts the value when formatted.
struct RedactedHeader {
    value: String,
}

impl RedactedHeader {
    fn bearer(token: &SecretString) -> Self {
        Self {
            value: format!("Bearer {}", token.expose_secret()),
        }
    }

    fn as_header_value(&self) -> Result<HeaderValue> {
        let mut value = HeaderValue::from_str(&self.value)
            .map_err(|_| LeadError::Config("auth token contains invalid characters".to_string()))?;
        value.set_sensitive(true);
        Ok(value)
    }
}

impl fmt::Display for RedactedHeader {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "[REDACTED]")
    }
}

impl fmt::Debug for RedactedHeader {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("RedactedHeader")
            .field("value", &"[REDACTED]")
            .finish()
    }
}

/// Every response body is wrapped as `{"data": ...}`.
#[derive(Deserialize)]
struct Envelope<T> {
    data: Option<T>,
}

/// Lead as returned by create and update, where `_id` and `status` may be
/// missing.
#[derive(Deserialize)]
#[serde(rename_all = "camelCase")]
struct SavedLead {
    #[serde(rename = "_id", default)]
    id: Option<LeadId>,
    #[serde(default)]
    name: Option<String>,
    #[serde(default)]
    country_code: Option<String>,
    #[serde(default)]
    phone: Option<String>,
    #[serde(default)]
    status: Option<String>,
    #[serde(default)]
    assigned_to: Option<UserRef>,
    #[serde(default)]
    note: Option<String>,
    #[serde(default)]
    camp: Option<TripId>,
}

impl SavedLead {
    fn into_lead(self, id: LeadId, status: LeadStatus) -> Lead {
        Lead {
            id,
            name: self.name.unwrap_or_default(),
            country_code: self.country_code.unwrap_or_default(),
            phone: self.phone.unwrap_or_default(),
            status,
            assigned_to: self.assigned_to,
            note: self.note,
            camp: self.camp,
        }
    }

    fn status_or(&self, fallback: LeadStatus) -> LeadStatus {
        match self.status.as_deref() {
            None | Some("") => fallback,
            Some(s) => LeadStatus::parse(s),
        }
    }

    /// Response to a create: the id is required, status defaults to `new`.
    fn created(self) -> Result<Lead> {
        let status = self.status_or(LeadStatus::New);
        let id = self
            .id
            .clone()
            .ok_or_else(|| LeadError::Api("server response is missing the lead id".to_string()))?;
        Ok(self.into_lead(id, status))
    }

    /// Response to an update: missing id and status come from the request.
    fn updated(self, request: &LeadUpdate) -> Lead {
        let status = self.status_or(request.status.clone());
        let id = self.id.clone().unwrap_or_else(|| request.id.clone());
        self.into_lead(id, status)
    }
}

pub struct HttpLeadStore {
    client: Client,
    base_url: Url,
    token: Option<SecretString>,
    timeout_secs: u64,
}

impl HttpLeadStore {
    /// Build a client for `base_url` with the given request timeout.
    pub fn new(base_url: &str, timeout: Duration, session: &AuthSession) -> Result<Self> {
        let mut base_url = Url::parse(base_url.trim())?;
        if !base_url.path().ends_with('/') {
            let path = format!("{}/", base_url.path());
            base_url.set_path(&path);
        }

        let client = Client::builder()
            .timeout(timeout)
            .connect_timeout(timeout.min(Duration::from_secs(30)))
            .build()?;

        Ok(Self {
            client,
            base_url,
            token: session.token().cloned(),
            timeout_secs: timeout.as_secs(),
        })
    }

    /// Client configured from `api_url` and `remote_timeout`.
    pub fn from_config(config: &Config, session: &AuthSession) -> Result<Self> {
        Self::new(&config.api_url, config.remote_timeout(), session)
    }

    pub fn base_url(&self) -> &Url {
        &self.base_url
    }

    fn endpoint(&self, path: &str) -> Result<Url> {
        Ok(self.base_url.join(path.trim_start_matches('/'))?)
    }

    fn request(&self, method: Method, path: &str) -> Result<RequestBuilder> {
        let url = self.endpoint(path)?;
        tracing::debug!("{} {}", method, url);

        let mut builder = self
            .client
            .request(method, url)
            .header(header::CONTENT_TYPE, HeaderValue::from_static("application/json"));
        if let Some(token) = &self.token {
            let auth_header = RedactedHeader::bearer(token);
            builder = builder.header(header::AUTHORIZATION, auth_header.as_header_value()?);
        }
        Ok(builder)
    }

    /// Send a request and unwrap the `data` envelope.
    async fn send<T: DeserializeOwned>(&self, builder: RequestBuilder) -> Result<Option<T>> {
        let response = builder
            .send()
            .await
            .map_err(|e| transport_error(e, self.timeout_secs))?;

        let status = response.status();
        let body = response
            .text()
            .await
            .map_err(|e| transport_error(e, self.timeout_secs))?;

        if !status.is_success() {
            let error = ApiError::from_response(status, &body);
            tracing::warn!("API request failed: {}", error);
            return Err(error.into());
        }

        if body.trim().is_empty() {
            return Ok(None);
        }
        let envelope: Envelope<T> = serde_json::from_str(&body)?;
        Ok(envelope.data)
    }

    async fn get_list<T: DeserializeOwned>(&self, path: &str) -> Result<Vec<T>> {
        let builder = self.request(Method::GET, path)?;
        Ok(self.send::<Vec<T>>(builder).await?.unwrap_or_default())
    }

    async fn send_saved(&self, builder: RequestBuilder) -> Result<SavedLead> {
        self.send::<SavedLead>(builder)
            .await?
            .ok_or_else(|| LeadError::Api("server returned no lead".to_string()))
    }
}

#[async_trait::async_trait]
impl LeadStore for HttpLeadStore {
    async fn list_trips(&self) -> Result<Vec<Trip>> {
        self.get_list("/api/camp").await
    }

    async fn list_leads(&self, trip: &TripId) -> Result<Vec<Lead>> {
        self.get_list(&format!("/api/lead/{trip}")).await
    }

    async fn list_users(&self) -> Result<Vec<User>> {
        self.get_list("/api/user").await
    }

    async fn create_lead(&self, lead: &NewLead) -> Result<Lead> {
        let builder = self.request(Method::POST, "/api/lead")?.json(lead);
        self.send_saved(builder).await?.created()
    }

    async fn update_lead(&self, update: &LeadUpdate) -> Result<Lead> {
        let builder = self
            .request(Method::PUT, &format!("/api/lead/{}", update.id))?
            .json(update);
        Ok(self.send_saved(builder).await?.updated(update))
    }

    async fn login(&self, credentials: &Credentials) -> Result<LoginResponse> {
        let body = serde_json::json!({
            "username": credentials.username(),
            "password": credentials.password(),
        });
        let builder = self.request(Method::POST, "/login")?.json(&body);
        self.send::<LoginResponse>(builder)
            .await?
            .ok_or_else(|| LeadError::Api("server returned no session".to_string()))
    }

    async fn logout(&self) -> Result<()> {
        let builder = self.request(Method::POST, "/logout")?;
        self.send::<serde_json::Value>(builder).await?;
        Ok(())
    }
}
