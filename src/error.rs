use thiserror::Error;

/// Fallback toast text when a save fails without a server-provided message.
pub const GENERIC_SAVE_ERROR: &str = "Failed to save lead. Please try again.";

#[derive(Error, Debug)]
pub enum LeadError {
    #[error("lead '{0}' not found")]
    LeadNotFound(String),

    #[error("trip '{0}' not found")]
    TripNotFound(String),

    #[error("no trip selected")]
    NoTripSelected,

    #[error("trip '{0}' has expired; its leads are read-only")]
    TripExpired(String),

    #[error("{0}")]
    Validation(String),

    #[error("invalid status '{0}'")]
    InvalidStatus(String),

    #[error("invalid sort key '{0}' (expected one of: name, phone, status, assignedTo)")]
    InvalidSortKey(String),

    #[error("invalid sort direction '{0}' (expected asc or desc)")]
    InvalidSortDirection(String),

    #[error("invalid page size '{0}' (expected one of: 5, 10, 20, 50, 100)")]
    InvalidPageSize(String),

    #[error("unknown field '{0}' (expected one of: name, country_code, phone, status, note)")]
    InvalidField(String),

    #[error("the edit form is closed")]
    FormClosed,

    #[error("the edit form is read-only")]
    ReadOnlyForm,

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("YAML parse error: {0}")]
    YamlParse(#[from] serde_yaml_ng::Error),

    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    #[error("configuration error: {0}")]
    Config(String),

    #[error("not logged in; run `leaddesk login` first")]
    NotLoggedIn,

    #[error("session expired or invalid; log in again")]
    Unauthorized,

    #[error("request timed out after {0}s")]
    Timeout(u64),

    #[error("API error: {0}")]
    Api(String),

    #[error("HTTP error: {0}")]
    Http(#[from] reqwest::Error),

    #[error("invalid API URL: {0}")]
    Url(#[from] url::ParseError),

    #[error("{0}")]
    Other(String),
}

impl LeadError {
    pub fn invalid_status(s: String) -> Self {
        LeadError::InvalidStatus(s)
    }

    pub fn invalid_sort_key(s: String) -> Self {
        LeadError::InvalidSortKey(s)
    }

    pub fn invalid_sort_direction(s: String) -> Self {
        LeadError::InvalidSortDirection(s)
    }

    /// Text suitable for a transient notification after a failed save.
    ///
    /// Server-provided messages and local validation messages are shown
    /// verbatim; everything else collapses to the generic fallback.
    pub fn user_message(&self) -> String {
        match self {
            LeadError::Api(msg) | LeadError::Validation(msg) if !msg.is_empty() => msg.clone(),
            LeadError::TripExpired(_) => "Cannot modify leads for expired trips".to_string(),
            LeadError::NoTripSelected => "Please select a trip first".to_string(),
            LeadError::Unauthorized => self.to_string(),
            _ => GENERIC_SAVE_ERROR.to_string(),
        }
    }

    /// True for failures that invalidate the stored session token.
    pub fn is_unauthorized(&self) -> bool {
        matches!(self, LeadError::Unauthorized)
    }
}

pub type Result<T> = std::result::Result<T, LeadError>;
