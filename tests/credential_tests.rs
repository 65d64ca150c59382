use worker_missions::config::Config;
use worker_missions::db::Store;
use worker_missions::models::NewWorker;
use worker_missions::services::{AuthError, CredentialError};
use worker_missions::state::SharedState;

async fn setup() -> SharedState {
    let mut config = Config::default();
    config.general.database_path = "sqlite::memory:".to_string();
    config.security.sign_key = "credential-test-signing-key".to_string();
    config.security.argon2_memory_cost_kib = 1024;
    config.security.argon2_time_cost = 1;

    SharedState::new(config).await.expect("Failed to build state")
}

fn new_worker(email: &str, password: &str) -> NewWorker {
    NewWorker {
        name: "Ann".to_string(),
        weight_limit: 100.0,
        email: email.to_string(),
        password: password.to_string(),
    }
}

async fn stored_hash(store: &Store, email: &str) -> String {
    store
        .get_worker_with_password(email)
        .await
        .unwrap()
        .map(|(_, hash)| hash)
        .unwrap()
}

#[tokio::test]
async fn test_register_hashes_password() {
    let state = setup().await;

    let worker = state
        .credential_service
        .register(new_worker(" Ann@Example.COM ", "hunter22"))
        .await
        .unwrap();

    assert_eq!(worker.email, "ann@example.com");

    let hash = stored_hash(&state.store, "ann@example.com").await;
    assert!(hash.starts_with("$argon2id$"));
    assert!(!hash.contains("hunter22"));
}

#[tokio::test]
async fn test_register_rejects_bad_input() {
    let state = setup().await;
    let credentials = &state.credential_service;
    credentials
        .register(new_worker("ann@example.com", "hunter22"))
        .await
        .unwrap();

    for (email, password) in [
        ("ann@example.com", "hunter22"),
        ("bob@example.com", "PaSsWoRd99"),
        ("bob@example.com", "abc"),
        ("bob-at-example.com", "hunter22"),
    ] {
        let result = credentials.register(new_worker(email, password)).await;
        assert!(
            matches!(result, Err(CredentialError::Validation(_))),
            "{email}/{password} should be rejected"
        );
    }

    let mut nameless = new_worker("cy@example.com", "hunter22");
    nameless.name = "   ".to_string();
    assert!(matches!(
        credentials.register(nameless).await,
        Err(CredentialError::Validation(_))
    ));

    let mut negative = new_worker("cy@example.com", "hunter22");
    negative.weight_limit = -1.0;
    assert!(matches!(
        credentials.register(negative).await,
        Err(CredentialError::Validation(_))
    ));
}

#[tokio::test]
async fn test_verify_credentials() {
    let state = setup().await;
    let credentials = &state.credential_service;
    let worker = credentials
        .register(new_worker("ann@example.com", "hunter22"))
        .await
        .unwrap();

    let verified = credentials
        .verify_credentials("ann@example.com", "hunter22")
        .await
        .unwrap();
    assert_eq!(verified.id, worker.id);

    assert!(matches!(
        credentials.verify_credentials("ann@example.com", "hunter23").await,
        Err(CredentialError::WrongCredentials)
    ));
    assert!(matches!(
        credentials.verify_credentials("nobody@example.com", "hunter22").await,
        Err(CredentialError::NoSuchWorker)
    ));
}

#[tokio::test]
async fn test_password_whitespace_is_kept() {
    let state = setup().await;
    let credentials = &state.credential_service;
    let worker = credentials
        .register(new_worker("ann@example.com", " hunter22 "))
        .await
        .unwrap();

    let verified = credentials
        .verify_credentials("ann@example.com", " hunter22 ")
        .await
        .unwrap();
    assert_eq!(verified.id, worker.id);

    assert!(matches!(
        credentials.verify_credentials("ann@example.com", "hunter22").await,
        Err(CredentialError::WrongCredentials)
    ));
}

#[tokio::test]
async fn test_authenticate_follows_issued_token_list() {
    let state = setup().await;
    let credentials = &state.credential_service;
    let worker = credentials
        .register(new_worker("ann@example.com", "hunter22"))
        .await
        .unwrap();

    let first = credentials.issue_token(&worker).await.unwrap();
    let second = credentials.issue_token(&worker).await.unwrap();
    assert_eq!(state.store.list_worker_tokens(&worker.id).await.unwrap().len(), 2);

    assert_eq!(state.authenticator.authenticate(&first).await.unwrap().id, worker.id);
    assert_eq!(state.authenticator.authenticate(&second).await.unwrap().id, worker.id);

    assert!(credentials.revoke_token(&worker.id, &first).await.unwrap());
    assert!(!credentials.revoke_token(&worker.id, &first).await.unwrap());
    assert!(matches!(
        state.authenticator.authenticate(&first).await,
        Err(AuthError::NotAuthenticated)
    ));
    assert!(state.authenticator.authenticate(&second).await.is_ok());

    assert_eq!(credentials.revoke_all_tokens(&worker.id).await.unwrap(), 1);
    assert!(matches!(
        state.authenticator.authenticate(&second).await,
        Err(AuthError::NotAuthenticated)
    ));
}

#[tokio::test]
async fn test_authenticate_rejects_expired_and_foreign_tokens() {
    let state = setup().await;
    let worker = state
        .credential_service
        .register(new_worker("ann@example.com", "hunter22"))
        .await
        .unwrap();

    let stale = state
        .signer
        .issue_at(&worker.id, chrono::Utc::now() - chrono::Duration::days(30))
        .unwrap();
    state.store.add_worker_token(&worker.id, &stale).await.unwrap();

    assert!(matches!(
        state.authenticator.authenticate(&stale).await,
        Err(AuthError::Expired)
    ));
    assert!(matches!(
        state.authenticator.authenticate("garbage").await,
        Err(AuthError::InvalidToken)
    ));

    // Signed correctly but never recorded as issued
    let unrecorded = state.signer.issue(&worker.id).unwrap();
    assert!(matches!(
        state.authenticator.authenticate(&unrecorded).await,
        Err(AuthError::NotAuthenticated)
    ));
}
