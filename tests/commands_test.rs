#[path = "common/mod.rs"]
mod common;

use common::EnvGuard;
use common::fixtures::{self, EXPIRED_TRIP, OPEN_TRIP, UNDATED_TRIP};
use common::store::{Failure, MemoryLeadStore, Op, PASSWORD, TOKEN, USERNAME, id_of, stored_status};
use leaddesk::auth::{AuthSession, Credentials, LOGIN_FAILED};
use leaddesk::commands::{
    AddOptions, Context, UpdateOptions, add_lead, login_with, logout_with, update_lead,
};
use leaddesk::config::Config;
use leaddesk::error::LeadError;
use leaddesk::types::LeadStatus;
use serial_test::serial;
use tempfile::TempDir;

struct Env {
    _dir: TempDir,
    _home: EnvGuard,
    _token: EnvGuard,
}

fn isolated_env() -> Env {
    let dir = TempDir::new().unwrap();
    // SAFETY: every test in this file is #[serial]
    let home = unsafe { EnvGuard::set("LEADDESK_HOME", dir.path()) };
    let token = unsafe { EnvGuard::remove("LEADDESK_TOKEN") };
    Env {
        _dir: dir,
        _home: home,
        _token: token,
    }
}

fn store() -> MemoryLeadStore {
    MemoryLeadStore::new()
        .with_trips(fixtures::trips())
        .with_users(fixtures::users())
        .with_leads(OPEN_TRIP, fixtures::numbered_leads("o", 3))
        .with_leads(EXPIRED_TRIP, fixtures::numbered_leads("e", 2))
}

fn logged_in(store: &MemoryLeadStore) -> Context {
    let mut config = Config::default();
    config.set_auth(TOKEN.to_string(), "Sam".to_string());
    config.save().unwrap();
    let session = AuthSession::from_config(&config);
    Context::with_store(config, session, Box::new(store.clone()))
}

fn anonymous(store: &MemoryLeadStore) -> Context {
    Context::with_store(
        Config::default(),
        AuthSession::anonymous(),
        Box::new(store.clone()),
    )
}

// ============================================================================
// Login / logout
// ============================================================================

#[tokio::test]
#[serial]
async fn test_login_stores_token_and_name() {
    let _env = isolated_env();
    let store = store();
    let mut ctx = anonymous(&store);

    let credentials = Credentials::new(USERNAME, PASSWORD).unwrap();
    let name = login_with(&mut ctx, &credentials).await.unwrap();
    assert_eq!(name, "Sam");

    let config = Config::load().unwrap();
    assert_eq!(config.auth.token.as_deref(), Some(TOKEN));
    assert_eq!(config.auth.name.as_deref(), Some("Sam"));
}

#[tokio::test]
#[serial]
async fn test_rejected_login_uses_fixed_message() {
    let _env = isolated_env();
    let store = store();
    let mut ctx = anonymous(&store);

    let credentials = Credentials::new(USERNAME, "wrong-password").unwrap();
    let err = login_with(&mut ctx, &credentials).await.unwrap_err();
    assert_eq!(err.to_string(), LOGIN_FAILED);
    assert!(!Config::config_path().exists());
}

#[tokio::test]
#[serial]
async fn test_login_timeout_keeps_its_message() {
    let _env = isolated_env();
    let store = store();
    store.fail(Op::Login, Failure::Timeout);
    let mut ctx = anonymous(&store);

    let credentials = Credentials::new(USERNAME, PASSWORD).unwrap();
    let err = login_with(&mut ctx, &credentials).await.unwrap_err();
    assert!(matches!(err, LeadError::Timeout(60)));
}

#[tokio::test]
#[serial]
async fn test_logout_clears_session_when_server_fails() {
    let _env = isolated_env();
    let store = store();
    store.fail(Op::Logout, Failure::Api("boom".to_string()));
    let mut ctx = logged_in(&store);

    assert!(logout_with(&mut ctx).await.unwrap());
    assert_eq!(store.calls(Op::Logout), 1);
    assert!(Config::load().unwrap().auth.is_empty());
}

#[tokio::test]
#[serial]
async fn test_logout_when_anonymous_skips_server() {
    let _env = isolated_env();
    let store = store();
    let mut ctx = anonymous(&store);

    assert!(!logout_with(&mut ctx).await.unwrap());
    assert_eq!(store.calls(Op::Logout), 0);
}

#[tokio::test]
#[serial]
async fn test_unauthorized_response_forgets_token() {
    let _env = isolated_env();
    let store = store();
    store.fail(Op::ListTrips, Failure::Unauthorized);
    let mut ctx = logged_in(&store);

    let err = ctx.open_console(None).await.unwrap_err();
    assert!(err.is_unauthorized());
    assert!(Config::load().unwrap().auth.token.is_none());
}

// ============================================================================
// Console through the command context
// ============================================================================

#[tokio::test]
#[serial]
async fn test_open_console_by_trip_name() {
    let _env = isolated_env();
    let store = store();
    let mut ctx = logged_in(&store);

    let console = ctx.open_console(Some("spring hike")).await.unwrap();
    assert_eq!(console.leads().len(), 2);
    assert!(console.is_trip_expired());

    let err = ctx.open_console(Some("Atlantis")).await.unwrap_err();
    assert!(matches!(err, LeadError::TripNotFound(_)));
}

#[tokio::test]
#[serial]
async fn test_no_trips_means_no_selection() {
    let _env = isolated_env();
    let store = MemoryLeadStore::new();
    let mut ctx = logged_in(&store);

    let err = ctx.open_console(None).await.unwrap_err();
    assert!(matches!(err, LeadError::NoTripSelected));
}

#[tokio::test]
#[serial]
async fn test_add_lead_on_named_trip() {
    let _env = isolated_env();
    let store = store();
    let mut ctx = logged_in(&store);

    let options = AddOptions {
        trip: Some(UNDATED_TRIP.to_string()),
        name: "Meera".to_string(),
        phone: "(912) 345-6780".to_string(),
        note: Some("prefers mornings".to_string()),
        ..Default::default()
    };
    let lead = add_lead(&mut ctx, &options).await.unwrap();

    assert_eq!(lead.phone, "9123456780");
    assert_eq!(lead.country_code, "+91");
    let stored = store.stored_leads(UNDATED_TRIP);
    assert_eq!(stored.len(), 1);
    assert_eq!(stored[0].note.as_deref(), Some("prefers mornings"));
}

#[tokio::test]
#[serial]
async fn test_update_lead_status() {
    let _env = isolated_env();
    let store = store();
    let mut ctx = logged_in(&store);
    let id = id_of(&store, OPEN_TRIP, "Lead 02");

    let options = UpdateOptions {
        id: id.to_string(),
        status: Some("confirmed".to_string()),
        ..Default::default()
    };
    let lead = update_lead(&mut ctx, &options).await.unwrap();

    assert_eq!(lead.status, LeadStatus::Confirmed);
    assert_eq!(lead.name, "Lead 02");
    assert_eq!(
        stored_status(&store, OPEN_TRIP, &id),
        Some(LeadStatus::Confirmed)
    );
}

#[tokio::test]
#[serial]
async fn test_update_on_expired_trip_is_refused() {
    let _env = isolated_env();
    let store = store();
    let mut ctx = logged_in(&store);

    let options = UpdateOptions {
        id: "e1".to_string(),
        trip: Some(EXPIRED_TRIP.to_string()),
        name: Some("Changed".to_string()),
        ..Default::default()
    };
    let err = update_lead(&mut ctx, &options).await.unwrap_err();

    assert!(matches!(err, LeadError::TripExpired(_)));
    assert_eq!(store.calls(Op::Update), 0);
}

#[tokio::test]
#[serial]
async fn test_update_unknown_lead() {
    let _env = isolated_env();
    let store = store();
    let mut ctx = logged_in(&store);

    let options = UpdateOptions {
        id: "missing".to_string(),
        ..Default::default()
    };
    let err = update_lead(&mut ctx, &options).await.unwrap_err();
    assert!(matches!(err, LeadError::LeadNotFound(_)));
}
