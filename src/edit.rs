//! Lead edit form state.
//!
//! The form is either closed or open on a draft. An open form with no
//! original lead is creating a new one. Forms opened on an expired trip are
//! read-only: field edits are rejected and saving is not offered.

use jiff::civil::Date;

use crate::error::{LeadError, Result};
use crate::remote::{LeadUpdate, NewLead};
use crate::types::{DEFAULT_COUNTRY_CODE, Lead, LeadStatus, Trip};
use crate::utils::{is_complete_phone, sanitize_phone};

/// Form fields in tab order.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum LeadField {
    #[default]
    Name,
    CountryCode,
    Phone,
    Status,
    Note,
}

enum_display_fromstr!(LeadField, LeadError::InvalidField, {
    Name => "name",
    CountryCode => "country_code" | "countrycode" | "country-code",
    Phone => "phone",
    Status => "status",
    Note => "note",
});

impl LeadField {
    /// Next field, wrapping.
    pub fn next(self) -> Self {
        match self {
            LeadField::Name => LeadField::CountryCode,
            LeadField::CountryCode => LeadField::Phone,
            LeadField::Phone => LeadField::Status,
            LeadField::Status => LeadField::Note,
            LeadField::Note => LeadField::Name,
        }
    }

    /// Previous field, wrapping.
    pub fn prev(self) -> Self {
        match self {
            LeadField::Name => LeadField::Note,
            LeadField::CountryCode => LeadField::Name,
            LeadField::Phone => LeadField::CountryCode,
            LeadField::Status => LeadField::Phone,
            LeadField::Note => LeadField::Status,
        }
    }
}

/// Editable values of a lead.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LeadDraft {
    pub name: String,
    pub country_code: String,
    pub phone: String,
    pub status: LeadStatus,
    pub note: String,
}

impl Default for LeadDraft {
    fn default() -> Self {
        Self {
            name: String::new(),
            country_code: DEFAULT_COUNTRY_CODE.to_string(),
            phone: String::new(),
            status: LeadStatus::New,
            note: String::new(),
        }
    }
}

impl From<&Lead> for LeadDraft {
    fn from(lead: &Lead) -> Self {
        let country_code = if lead.country_code.is_empty() {
            DEFAULT_COUNTRY_CODE.to_string()
        } else {
            lead.country_code.clone()
        };
        Self {
            name: lead.name.clone(),
            country_code,
            phone: lead.phone.clone(),
            status: lead.status.clone(),
            note: lead.note.clone().unwrap_or_default(),
        }
    }
}

#[derive(Debug, Clone)]
pub struct EditForm {
    original: Option<Lead>,
    pub draft: LeadDraft,
    pub focus: LeadField,
    read_only: bool,
}

impl EditForm {
    /// The lead being edited, `None` when creating.
    pub fn original(&self) -> Option<&Lead> {
        self.original.as_ref()
    }

    pub fn is_creating(&self) -> bool {
        self.original.is_none()
    }

    pub fn is_read_only(&self) -> bool {
        self.read_only
    }

    /// Title for the form header.
    pub fn title(&self) -> &'static str {
        match (&self.original, self.read_only) {
            (_, true) => "View Lead",
            (Some(_), false) => "Edit Lead",
            (None, false) => "Add Lead",
        }
    }
}

/// A validated save ready to send to the store.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SaveRequest {
    Create(NewLead),
    Update(LeadUpdate),
}

impl SaveRequest {
    pub fn success_message(&self) -> &'static str {
        match self {
            SaveRequest::Create(_) => "Lead added successfully!",
            SaveRequest::Update(_) => "Lead updated successfully!",
        }
    }
}

/// The editing mode state machine.
///
/// The form is boxed to keep `Closed` small.
#[derive(Debug, Clone, Default)]
pub enum EditMode {
    #[default]
    Closed,
    Open(Box<EditForm>),
}

#[derive(Debug, Clone, Default)]
pub struct EditSession {
    mode: EditMode,
}

impl EditSession {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn mode(&self) -> &EditMode {
        &self.mode
    }

    pub fn is_open(&self) -> bool {
        matches!(self.mode, EditMode::Open(_))
    }

    pub fn form(&self) -> Option<&EditForm> {
        match &self.mode {
            EditMode::Open(form) => Some(form.as_ref()),
            EditMode::Closed => None,
        }
    }

    /// Open the form on an existing lead. Allowed in any trip state; an
    /// expired trip makes the form read-only.
    pub fn open_existing(&mut self, lead: Lead, read_only: bool) {
        let draft = LeadDraft::from(&lead);
        self.mode = EditMode::Open(Box::new(EditForm {
            original: Some(lead),
            draft,
            focus: LeadField::default(),
            read_only,
        }));
    }

    /// Open an empty form for a new lead.
    pub fn open_new(&mut self) {
        self.mode = EditMode::Open(Box::new(EditForm {
            original: None,
            draft: LeadDraft::default(),
            focus: LeadField::default(),
            read_only: false,
        }));
    }

    /// Cancel or close. Closing an already closed form is a no-op.
    pub fn close(&mut self) {
        self.mode = EditMode::Closed;
    }

    /// Change one field of the draft.
    ///
    /// Phone input keeps digits only and stops at ten. Status input must be
    /// one of the known statuses.
    pub fn set_field(&mut self, field: LeadField, value: &str) -> Result<()> {
        let form = self.open_form_mut()?;
        if form.read_only {
            return Err(LeadError::ReadOnlyForm);
        }

        form.focus = field;
        let draft = &mut form.draft;
        match field {
            LeadField::Name => draft.name = value.to_string(),
            LeadField::CountryCode => draft.country_code = value.trim().to_string(),
            LeadField::Phone => draft.phone = sanitize_phone(value),
            LeadField::Status => draft.status = value.parse()?,
            LeadField::Note => draft.note = value.to_string(),
        }
        Ok(())
    }

    /// Validate the draft against the selected trip and build the request.
    ///
    /// Checks run in a fixed order: expired trip, missing trip, phone
    /// length. Nothing here touches the network.
    pub fn prepare_save(&self, trip: Option<&Trip>, today: Date) -> Result<SaveRequest> {
        let form = self.form().ok_or(LeadError::FormClosed)?;

        if let Some(trip) = trip
            && (form.read_only || trip.is_expired_on(today))
        {
            return Err(LeadError::TripExpired(trip.id.to_string()));
        }
        let trip = trip.ok_or(LeadError::NoTripSelected)?;
        if form.read_only {
            return Err(LeadError::ReadOnlyForm);
        }

        let draft = &form.draft;
        if !is_complete_phone(&draft.phone) {
            return Err(LeadError::Validation(
                "Phone number must be exactly 10 digits".to_string(),
            ));
        }

        let country_code = if draft.country_code.is_empty() {
            DEFAULT_COUNTRY_CODE.to_string()
        } else {
            draft.country_code.clone()
        };

        Ok(match &form.original {
            Some(lead) => SaveRequest::Update(LeadUpdate {
                id: lead.id.clone(),
                name: draft.name.clone(),
                country_code,
                phone: draft.phone.clone(),
                note: draft.note.clone(),
                status: draft.status.clone(),
            }),
            None => SaveRequest::Create(NewLead {
                name: draft.name.clone(),
                country_code,
                phone: draft.phone.clone(),
                note: draft.note.clone(),
                camp: trip.id.clone(),
            }),
        })
    }

    fn open_form_mut(&mut self) -> Result<&mut EditForm> {
        match &mut self.mode {
            EditMode::Open(form) => Ok(form.as_mut()),
            EditMode::Closed => Err(LeadError::FormClosed),
        }
    }
}
