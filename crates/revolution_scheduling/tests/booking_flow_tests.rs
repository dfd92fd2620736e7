use axum::{
    body::{to_bytes, Body},
    http::{Method, Request, StatusCode},
    Router,
};
use revolution_config::BackendConfig;
use revolution_scheduling::handlers::CLIENT_ID_HEADER;
use revolution_scheduling::routes::routes;
use revolution_scheduling::{HttpAppointmentBackend, ScheduleContext, SchedulingState};
use serde_json::{json, Value};
use std::sync::Arc;
use tower::ServiceExt;
use wiremock::matchers::{body_partial_json, method, path};
use wiremock::{Mock, MockServer, ResponseTemplate};

async fn send(app: &Router, method: Method, uri: &str, body: Option<Value>) -> (StatusCode, Value) {
    let mut request = Request::builder()
        .method(method)
        .uri(uri)
        .header(CLIENT_ID_HEADER, "cliente-1");
    let body = match body {
        Some(json) => {
            request = request.header("content-type", "application/json");
            Body::from(json.to_string())
        }
        None => Body::empty(),
    };
    let response = app
        .clone()
        .oneshot(request.body(body).unwrap())
        .await
        .unwrap();
    let status = response.status();
    let bytes = to_bytes(response.into_body(), usize::MAX).await.unwrap();
    let json = if bytes.is_empty() {
        Value::Null
    } else {
        serde_json::from_slice(&bytes).unwrap()
    };
    (status, json)
}

async fn mock_backend() -> MockServer {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/api/blackout-days"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!([
            {"id": "navidad", "date": 1766685600000_i64, "registeredBy": "admin"}
        ])))
        .mount(&server)
        .await;
    // Once for the first board load, once for the reconciliation.
    Mock::given(method("GET"))
        .and(path("/api/appointments"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!([{
            "id": 7,
            "startTime": 1749567600000_i64,
            "serviceType": "basic",
            "cost": 150,
            "vehicleRef": "carro-7",
            "clientRef": "cliente-1",
            "status": "scheduled"
        }])))
        .expect(2)
        .mount(&server)
        .await;
    Mock::given(method("POST"))
        .and(path("/api/appointments"))
        .and(body_partial_json(json!({
            "startTime": 1749571200000_i64,
            "clientRef": "cliente-1",
            "cost": 250
        })))
        .respond_with(ResponseTemplate::new(201).set_body_json(json!({
            "id": 8,
            "startTime": 1749571200000_i64,
            "serviceType": "complete",
            "cost": 250,
            "vehicleRef": "carro-8",
            "clientRef": "cliente-1",
            "status": "scheduled"
        })))
        .expect(1)
        .mount(&server)
        .await;
    Mock::given(method("PATCH"))
        .and(path("/api/appointments/7/status"))
        .respond_with(
            ResponseTemplate::new(503).set_body_json(json!({"message": "status service down"})),
        )
        .expect(1)
        .mount(&server)
        .await;
    server
}

#[tokio::test]
async fn test_booking_and_board_flow() {
    let server = mock_backend().await;
    let backend = HttpAppointmentBackend::from_config(&BackendConfig {
        base_url: format!("{}/api", server.uri()),
        api_token: None,
        timeout_secs: Some(5),
    })
    .unwrap();
    let state = SchedulingState::new(Arc::new(backend), ScheduleContext::default());
    let app = routes(Arc::new(state));

    // Christmas is blacked out.
    let (status, body) = send(
        &app,
        Method::POST,
        "/appointments/validate",
        Some(json!({"startTime": {"kind": "wall_clock", "value": "2025-12-25T10:00"}})),
    )
    .await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["reason"], "BLACKOUT_DAY");

    let (status, body) = send(
        &app,
        Method::POST,
        "/appointments",
        Some(json!({
            "startTime": {"kind": "wall_clock", "value": "2025-12-25T10:00"},
            "serviceType": "complete",
            "vehicleRef": "carro-8"
        })),
    )
    .await;
    assert_eq!(status, StatusCode::UNPROCESSABLE_ENTITY);
    assert_eq!(body["errors"]["startTime"]["kind"], "BLACKOUT_DAY");

    // Localized input is accepted and sent as epoch milliseconds.
    let (status, body) = send(
        &app,
        Method::POST,
        "/appointments",
        Some(json!({
            "startTime": {"kind": "raw", "value": "10/06/2025, 10:00 a. m."},
            "serviceType": "complete",
            "vehicleRef": "carro-8"
        })),
    )
    .await;
    assert_eq!(status, StatusCode::CREATED);
    assert_eq!(body["appointment"]["id"], "8");

    let (status, body) = send(&app, Method::GET, "/board", None).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["counts"]["scheduled"], 1);

    // The backend refuses the move: the card snaps back and the admin is told.
    let (status, body) = send(
        &app,
        Method::PUT,
        "/board/7/lane",
        Some(json!({"lane": "in_progress"})),
    )
    .await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["outcome"], "reconciled");
    assert_eq!(body["counts"]["scheduled"], 1);
    assert_eq!(body["counts"]["inProgress"], 0);
    let message = body["notices"][0]["message"].as_str().unwrap();
    assert!(message.contains("status service down"), "{}", message);

    server.verify().await;
}
