//! Wire-level tests: real reqwest clients against an in-process stub service.

mod common;

use std::sync::Arc;
use std::time::Duration;

use serde_json::json;

use common::{dead_base_url, json_reply, spawn_stub, RecordedRequest, StubReply};
use shotcall_lib::auth::authenticator::{HttpLogin, SessionAuthenticator, StaticCredentials};
use shotcall_lib::auth::types::{AuthState, Credentials, SessionToken};
use shotcall_lib::config::AppConfig;
use shotcall_lib::court::types::{CourtCoordinate, PixelPoint};
use shotcall_lib::features::vector::{FeatureVector, FeatureVectorBuilder};
use shotcall_lib::prediction::client::{PredictionClient, PredictionService, NON_FINITE_MESSAGE};
use shotcall_lib::prediction::types::{PredictionErrorKind, PredictionOutcome, ShotLabel};
use shotcall_lib::presenter::DisplayStyle;
use shotcall_lib::session::engine::{ClickSession, SessionHandle};
use shotcall_lib::session::state::{SessionEvent, UiUpdate};

const TOKEN: &str = "tok-123";

/// Behaves like the real service: form login for johndoe/secret, bearer-checked predict.
fn service(prediction: serde_json::Value) -> impl Fn(&RecordedRequest) -> StubReply {
    move |req: &RecordedRequest| match req.path.as_str() {
        "/login" if req.body.contains("username=johndoe&password=secret") => json_reply(
            200,
            "OK",
            json!({"access_token": TOKEN, "token_type": "bearer"}),
        ),
        "/login" => json_reply(401, "Unauthorized", json!({"detail": "Incorrect username or password"})),
        "/predict" if req.header("authorization") == Some(format!("Bearer {TOKEN}").as_str()) => {
            json_reply(200, "OK", json!({ "prediction": prediction.clone() }))
        }
        "/predict" => json_reply(401, "Unauthorized", json!({"detail": "Not authenticated"})),
        _ => json_reply(404, "Not Found", json!({"detail": "Not Found"})),
    }
}

fn config_for(base_url: &str) -> AppConfig {
    let mut cfg = AppConfig::default();
    cfg.api.base_url = format!("{base_url}/");
    cfg.api.request_timeout_secs = 5;
    cfg
}

fn silent_config(base_url: &str) -> AppConfig {
    let mut cfg = config_for(base_url);
    cfg.api.request_timeout_secs = 1;
    cfg
}

fn http(cfg: &AppConfig) -> reqwest::Client {
    reqwest::Client::builder()
        .timeout(cfg.request_timeout())
        .no_proxy()
        .build()
        .unwrap()
}

fn vector_at_basket_line() -> FeatureVector {
    FeatureVectorBuilder::default().build(CourtCoordinate { x: 0.0, y: 900.0 })
}

async fn predict_once(base_url: &str, token: Option<&str>) -> PredictionOutcome {
    let cfg = config_for(base_url);
    let client = PredictionClient::new(cfg.endpoint("predict"), http(&cfg));
    let token = token.map(SessionToken::new);
    client.predict(&vector_at_basket_line(), token.as_ref()).await
}

async fn next_update(handle: &mut SessionHandle) -> UiUpdate {
    tokio::time::timeout(Duration::from_secs(10), handle.ui_rx.recv())
        .await
        .expect("timed out waiting for ui update")
        .expect("session closed")
}

#[tokio::test]
async fn test_click_to_make_end_to_end() {
    let stub = spawn_stub(service(json!(1))).await;
    let cfg = config_for(&stub.base_url);
    let client = http(&cfg);

    let auth = SessionAuthenticator::new(Arc::new(HttpLogin::new(cfg.endpoint("login"), client.clone())));
    let state = auth
        .authenticate_with(&StaticCredentials::new(cfg.credentials()))
        .await;
    assert_eq!(state, AuthState::Authenticated(SessionToken::new(TOKEN)));

    let service = Arc::new(PredictionClient::new(cfg.endpoint("predict"), client));
    let (mut session, mut handle) = ClickSession::new(cfg.surface_spec().unwrap(), auth, service);
    let task = tokio::spawn(async move { session.run_loop().await });

    handle
        .tx
        .send(SessionEvent::Click(PixelPoint::new(106.25, 0.0)))
        .await
        .unwrap();
    assert_eq!(
        next_update(&mut handle).await,
        UiUpdate::CoordinateSelected {
            seq: 1,
            coordinate: CourtCoordinate { x: 0.0, y: 900.0 }
        }
    );
    match next_update(&mut handle).await {
        UiUpdate::Display { seq, display } => {
            assert_eq!(seq, 1);
            assert_eq!(display.text, "Prediction: Make");
            assert_eq!(display.style, DisplayStyle::Normal);
        }
        other => panic!("unexpected update {other:?}"),
    }

    handle.tx.send(SessionEvent::Stop).await.unwrap();
    task.await.unwrap();

    let login = stub.last("/login").expect("login request");
    assert_eq!(login.method, "POST");
    assert_eq!(
        login.header("content-type"),
        Some("application/x-www-form-urlencoded")
    );
    assert_eq!(
        login.body,
        "grant_type=&username=johndoe&password=secret&scope=&client_id=&client_secret="
    );

    let predict = stub.last("/predict").expect("predict request");
    assert_eq!(predict.method, "POST");
    assert_eq!(predict.header("content-type"), Some("application/json"));
    assert_eq!(predict.header("accept"), Some("application/json"));
    assert!(predict.body.starts_with("{\"Period\":-0.4,"));
    let body: serde_json::Value = serde_json::from_str(&predict.body).unwrap();
    assert_eq!(body["X_Location"], json!(0.0));
    assert_eq!(body["Y_Location"], json!(9.0));
    assert_eq!(body["Year"], json!(2022));
    assert_eq!(body.as_object().unwrap().len(), 39);
}

#[tokio::test]
async fn test_failed_login_still_sends_predictions() {
    let stub = spawn_stub(service(json!(1))).await;
    let cfg = config_for(&stub.base_url);
    let client = http(&cfg);

    let auth = SessionAuthenticator::new(Arc::new(HttpLogin::new(cfg.endpoint("login"), client.clone())));
    let state = auth
        .authenticate(&Credentials::new("johndoe", "wrong"))
        .await;
    assert!(matches!(state, AuthState::AuthFailed(ref reason) if reason.contains("401")));

    let service = Arc::new(PredictionClient::new(cfg.endpoint("predict"), client));
    let (mut session, mut handle) = ClickSession::new(cfg.surface_spec().unwrap(), auth, service);
    tokio::spawn(async move { session.run_loop().await });

    handle
        .tx
        .send(SessionEvent::Click(PixelPoint::new(0.0, 0.0)))
        .await
        .unwrap();
    next_update(&mut handle).await;
    match next_update(&mut handle).await {
        UiUpdate::Display { display, .. } => {
            assert_eq!(display.text, "Not Authorized");
            assert_eq!(display.style, DisplayStyle::Error);
        }
        other => panic!("unexpected update {other:?}"),
    }

    let predict = stub.last("/predict").expect("predict request");
    assert!(predict.header("authorization").is_none());
}

#[tokio::test]
async fn test_threshold_over_the_wire() {
    for (prediction, expected) in [
        (json!(1), ShotLabel::Make),
        (json!(0), ShotLabel::Miss),
        (json!(2), ShotLabel::Miss),
        (json!("1"), ShotLabel::Miss),
    ] {
        let stub = spawn_stub(service(prediction.clone())).await;
        assert_eq!(
            predict_once(&stub.base_url, Some(TOKEN)).await,
            PredictionOutcome::success(expected),
            "prediction = {prediction}"
        );
    }
}

#[tokio::test]
async fn test_unauthorized() {
    let stub = spawn_stub(service(json!(1))).await;
    assert_eq!(
        predict_once(&stub.base_url, Some("stale-token")).await,
        PredictionOutcome::error(PredictionErrorKind::Unauthorized)
    );
}

#[tokio::test]
async fn test_server_error_carries_status() {
    let stub = spawn_stub(|_: &RecordedRequest| {
        json_reply(500, "Internal Server Error", json!({"detail": "model not loaded"}))
    })
    .await;
    assert_eq!(
        predict_once(&stub.base_url, Some(TOKEN)).await,
        PredictionOutcome::error(PredictionErrorKind::ServerError {
            status: 500,
            status_text: "Internal Server Error".into()
        })
    );
}

#[tokio::test]
async fn test_no_response_when_nothing_listens() {
    let base = dead_base_url().await;
    assert_eq!(
        predict_once(&base, Some(TOKEN)).await,
        PredictionOutcome::error(PredictionErrorKind::NoResponse)
    );
}

#[tokio::test]
async fn test_no_response_when_connection_drops() {
    let stub = spawn_stub(|_: &RecordedRequest| StubReply::Hangup).await;
    assert_eq!(
        predict_once(&stub.base_url, Some(TOKEN)).await,
        PredictionOutcome::error(PredictionErrorKind::NoResponse)
    );
    assert_eq!(stub.recorded().len(), 1);
}

#[tokio::test]
async fn test_unbuildable_request_is_client_error() {
    let stub = spawn_stub(service(json!(1))).await;
    let outcome = predict_once(&stub.base_url, Some("bad\ntoken")).await;
    assert!(matches!(
        outcome,
        PredictionOutcome::Error {
            kind: PredictionErrorKind::ClientError { .. }
        }
    ));
    assert!(stub.recorded().is_empty());

    let client = PredictionClient::new("not a url/predict".into(), reqwest::Client::new());
    let outcome = client.predict(&vector_at_basket_line(), None).await;
    assert!(matches!(
        outcome,
        PredictionOutcome::Error {
            kind: PredictionErrorKind::ClientError { .. }
        }
    ));
}

#[tokio::test]
async fn test_login_against_dead_service_fails_session() {
    let base = dead_base_url().await;
    let cfg = config_for(&base);
    let auth = SessionAuthenticator::new(Arc::new(HttpLogin::new(cfg.endpoint("login"), http(&cfg))));
    let state = auth
        .authenticate_with(&StaticCredentials::new(cfg.credentials()))
        .await;
    assert!(matches!(state, AuthState::AuthFailed(_)));
    assert!(auth.token().await.is_none());
}

#[tokio::test]
async fn test_predict_timeout_is_no_response() {
    let stub = spawn_stub(|_: &RecordedRequest| StubReply::Silent).await;
    let cfg = silent_config(&stub.base_url);
    assert!(cfg.validate().is_ok());
    let client = PredictionClient::new(cfg.endpoint("predict"), http(&cfg));

    let outcome = tokio::time::timeout(
        Duration::from_secs(10),
        client.predict(&vector_at_basket_line(), Some(&SessionToken::new(TOKEN))),
    )
    .await
    .expect("request timeout did not fire");
    assert_eq!(outcome, PredictionOutcome::error(PredictionErrorKind::NoResponse));
    assert_eq!(stub.recorded().len(), 1);
}

#[tokio::test]
async fn test_login_timeout_fails_session() {
    let stub = spawn_stub(|_: &RecordedRequest| StubReply::Silent).await;
    let cfg = silent_config(&stub.base_url);
    let auth = SessionAuthenticator::new(Arc::new(HttpLogin::new(cfg.endpoint("login"), http(&cfg))));

    let state = tokio::time::timeout(
        Duration::from_secs(10),
        auth.authenticate_with(&StaticCredentials::new(cfg.credentials())),
    )
    .await
    .expect("request timeout did not fire");
    assert!(matches!(state, AuthState::AuthFailed(_)));
    assert!(auth.token().await.is_none());
    assert_eq!(stub.last("/login").map(|r| r.method), Some("POST".to_string()));
}

#[tokio::test]
async fn test_non_finite_vector_is_not_sent() {
    let stub = spawn_stub(service(json!(1))).await;
    let cfg = config_for(&stub.base_url);
    let client = PredictionClient::new(cfg.endpoint("predict"), http(&cfg));
    let vector = FeatureVector {
        x_location: f64::INFINITY,
        ..vector_at_basket_line()
    };

    let outcome = client.predict(&vector, Some(&SessionToken::new(TOKEN))).await;
    assert_eq!(
        outcome,
        PredictionOutcome::error(PredictionErrorKind::ClientError {
            message: NON_FINITE_MESSAGE.to_string()
        })
    );
    assert!(stub.recorded().is_empty());
}
