//! End-to-end form session tests against a mocked Craft backend

use serde_json::json;
use std::sync::Arc;
use std::time::Duration;
use wiremock::matchers::{body_partial_json, method, path};
use wiremock::{Mock, MockServer, ResponseTemplate};

use freeform_relay::app::build_session;
use freeform_relay::backend::{build_http_client, GraphQlClient, GraphQlGateway, HttpConfigLoader};
use freeform_relay::challenge::StaticChallengeProvider;
use freeform_relay::config::RelayConfig;
use freeform_relay::form::{
    BannerKind, FormError, FormSchema, FormServices, FormSession, FormVariant, Phase, SessionSettings,
    SubmissionOutcome,
};

async fn mock_properties(server: &MockServer, captcha_enabled: bool) {
    Mock::given(method("GET"))
        .and(path("/freeform/form/properties/4"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "csrf": { "name": "CRAFT_CSRF_TOKEN", "token": "csrf-e2e" },
            "honeypot": { "name": "freeform_form_handle", "value": "" },
            "reCaptcha": { "enabled": captcha_enabled, "handle": "recaptcha", "name": "g-recaptcha-response" },
            "loadingText": "Sending...",
            "successMessage": "Thanks!",
            "errorMessage": "Please try again."
        })))
        .mount(server)
        .await;
}

fn session_for(server: &MockServer, challenge: StaticChallengeProvider) -> FormSession {
    let http = build_http_client(Duration::from_secs(5)).unwrap();
    let schema = FormSchema::quote();
    let services = FormServices {
        loader: Arc::new(HttpConfigLoader::new(http.clone(), format!("{}/freeform", server.uri()))),
        challenge: Arc::new(challenge),
        gateway: Arc::new(GraphQlGateway::new(
            GraphQlClient::new(http, format!("{}/graphql", server.uri())),
            schema.clone(),
        )),
    };
    FormSession::new(
        schema,
        services,
        SessionSettings {
            form_id: 4,
            submission_timeout: Duration::from_secs(5),
            challenge_required: true,
        },
    )
}

fn fill_quote(session: &FormSession) {
    session.set_field("firstName", "Ann");
    session.set_field("lastName", "Lee");
    session.set_field("email", "ann@example.com");
    session.set_field("cellPhone", "555-0100");
    session.set_field("subject", "Pie");
    session.set_field("department", "sales");
    session.set_field("message", "How much for a pie?");
    session.set_field("acceptTerms", "yes");
}

#[tokio::test]
async fn test_quote_form_submits_end_to_end() {
    let server = MockServer::start().await;
    mock_properties(&server, true).await;
    Mock::given(method("POST"))
        .and(path("/graphql"))
        .and(body_partial_json(json!({
            "variables": {
                "csrfToken": { "name": "CRAFT_CSRF_TOKEN", "value": "csrf-e2e" },
                "reCaptcha": { "name": "g-recaptcha-response", "value": "human" },
                "firstName": "Ann",
                "cellPhone": "555-0100"
            }
        })))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "data": { "save_quote_Submission": { "submissionId": "77", "success": true } }
        })))
        .expect(1)
        .mount(&server)
        .await;

    let session = session_for(&server, StaticChallengeProvider::new("human"));
    session.mount().await.unwrap();
    assert_eq!(session.phase(), Phase::Ready);
    assert!(session.config_loaded());

    fill_quote(&session);
    let outcome = session.submit().await.unwrap();

    assert!(matches!(outcome, SubmissionOutcome::Success(ref id) if id.as_str() == "77"));
    let view = session.view();
    assert_eq!(view.phase, Phase::Ready);
    let banner = view.banner.unwrap();
    assert_eq!(banner.kind, BannerKind::Success);
    assert_eq!(banner.message, "Thanks!");
    assert_eq!(session.fields().text("firstName"), "");
}

#[tokio::test]
async fn test_rejection_keeps_values_and_shows_error_banner() {
    let server = MockServer::start().await;
    mock_properties(&server, false).await;
    Mock::given(method("POST"))
        .and(path("/graphql"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "errors": [{ "message": "Department is not valid" }]
        })))
        .expect(1)
        .mount(&server)
        .await;

    let session = session_for(&server, StaticChallengeProvider::new("human"));
    session.mount().await.unwrap();
    fill_quote(&session);

    let outcome = session.submit().await.unwrap();

    assert!(matches!(outcome, SubmissionOutcome::Failure(ref e) if e.field_errors().len() == 1));
    let view = session.view();
    assert_eq!(view.banner.unwrap().message, "Please try again.");
    assert!(view.submit_enabled);
    assert_eq!(session.fields().text("firstName"), "Ann");
}

#[tokio::test]
async fn test_missing_properties_disable_submission() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .respond_with(ResponseTemplate::new(500))
        .mount(&server)
        .await;
    Mock::given(method("POST"))
        .respond_with(ResponseTemplate::new(200))
        .expect(0)
        .mount(&server)
        .await;

    let session = session_for(&server, StaticChallengeProvider::new("human"));
    session.mount().await.unwrap();
    fill_quote(&session);

    assert_eq!(session.phase(), Phase::Ready);
    assert!(!session.view().submit_enabled);
    assert_eq!(session.submit().await, Err(FormError::ConfigUnavailable));
}

#[tokio::test]
async fn test_build_session_from_relay_config() {
    let server = MockServer::start().await;
    mock_properties(&server, false).await;

    let mut config = RelayConfig::default();
    config.backend.properties_base_url = format!("{}/freeform", server.uri());
    config.backend.endpoint_url = format!("{}/graphql", server.uri());
    config.form.form_id = 4;
    config.form.variant = FormVariant::Quote;

    let session = build_session(&config, config.form.variant.schema()).unwrap();
    session.mount().await.unwrap();

    assert!(session.config_loaded());
    assert_eq!(session.config().csrf_token, "csrf-e2e");
}

#[tokio::test]
async fn test_absent_token_blocks_even_without_captcha() {
    let server = MockServer::start().await;
    mock_properties(&server, false).await;
    Mock::given(method("POST"))
        .respond_with(ResponseTemplate::new(200))
        .expect(0)
        .mount(&server)
        .await;

    let session = session_for(&server, StaticChallengeProvider::unavailable());
    session.mount().await.unwrap();
    fill_quote(&session);

    assert_eq!(session.submit().await, Err(FormError::ChallengeUnavailable));
    assert_eq!(session.phase(), Phase::Ready);
}
