//! Integration tests for the Kafka REST emitter against a mock proxy

use chrono::NaiveDate;
use mockito::Matcher;
use patient_service::adapters::events::kafka_rest::KAFKA_JSON_CONTENT_TYPE;
use patient_service::adapters::events::{EventEmitter, KafkaRestEmitter};
use patient_service::config::{secret_string, EventTarget, EventsConfig};
use patient_service::domain::{EmissionError, Patient, PatientCreatedEvent, PatientRequest};
use serde_json::json;

fn config(base_url: String, with_auth: bool) -> EventsConfig {
    EventsConfig {
        target: EventTarget::KafkaRest,
        base_url: Some(base_url),
        topic: "patient".to_string(),
        username: with_auth.then(|| "svc".to_string()),
        password: with_auth.then(|| secret_string("pw".to_string())),
        timeout_seconds: 2,
        channel_capacity: 16,
        retry: Default::default(),
    }
}

fn event() -> PatientCreatedEvent {
    let patient = Patient::create(PatientRequest::new(
        "Alice",
        "a@x.com",
        "1 Main St",
        NaiveDate::from_ymd_opt(1990, 1, 1).unwrap(),
    ));
    PatientCreatedEvent::for_patient(&patient)
}

#[tokio::test]
async fn test_publish_posts_keyed_record() {
    let mut server = mockito::Server::new_async().await;
    let event = event();

    let mock = server
        .mock("POST", "/topics/patient")
        .match_header("content-type", KAFKA_JSON_CONTENT_TYPE)
        .match_header("authorization", "Basic c3ZjOnB3")
        .match_body(Matcher::PartialJson(json!({
            "records": [{
                "key": event.patient_id.to_string(),
                "value": {
                    "eventType": "PATIENT_CREATED",
                    "patientId": event.patient_id.to_string(),
                    "name": "Alice",
                    "email": "a@x.com"
                }
            }]
        })))
        .with_status(200)
        .with_body(r#"{"offsets":[{"partition":0,"offset":1}]}"#)
        .create_async()
        .await;

    let emitter = KafkaRestEmitter::new(&config(server.url(), true)).unwrap();
    emitter.publish(&event).await.unwrap();

    mock.assert_async().await;
}

#[tokio::test]
async fn test_no_auth_header_without_credentials() {
    let mut server = mockito::Server::new_async().await;

    let mock = server
        .mock("POST", "/topics/patient")
        .match_header("authorization", Matcher::Missing)
        .with_status(200)
        .create_async()
        .await;

    let emitter = KafkaRestEmitter::new(&config(server.url(), false)).unwrap();
    emitter.publish(&event()).await.unwrap();

    mock.assert_async().await;
}

#[tokio::test]
async fn test_server_error_is_retryable() {
    let mut server = mockito::Server::new_async().await;
    let _mock = server
        .mock("POST", "/topics/patient")
        .with_status(503)
        .with_body("broker unavailable")
        .create_async()
        .await;

    let emitter = KafkaRestEmitter::new(&config(server.url(), false)).unwrap();
    let err = emitter.publish(&event()).await.unwrap_err();

    assert!(matches!(err, EmissionError::ServerError { status: 503, .. }));
    assert!(err.is_retryable());
}

#[tokio::test]
async fn test_client_error_is_not_retryable() {
    let mut server = mockito::Server::new_async().await;
    let _mock = server
        .mock("POST", "/topics/patient")
        .with_status(422)
        .with_body(r#"{"error_code":42203,"message":"bad schema"}"#)
        .create_async()
        .await;

    let emitter = KafkaRestEmitter::new(&config(server.url(), false)).unwrap();
    let err = emitter.publish(&event()).await.unwrap_err();

    match err {
        EmissionError::ClientError { status, ref message } => {
            assert_eq!(status, 422);
            assert!(message.contains("bad schema"));
        }
        ref other => panic!("unexpected error: {other:?}"),
    }
    assert!(!err.is_retryable());
}

#[tokio::test]
async fn test_too_many_requests_is_retryable() {
    let mut server = mockito::Server::new_async().await;
    let _mock = server
        .mock("POST", "/topics/patient")
        .with_status(429)
        .create_async()
        .await;

    let emitter = KafkaRestEmitter::new(&config(server.url(), false)).unwrap();
    let err = emitter.publish(&event()).await.unwrap_err();

    assert!(err.is_retryable());
}
