use chrono::Timelike;
use mockito::Server;
use serde_json::json;
use tariff_check::TariffError;
use tariff_check::forecast::{EvccClient, ForecastSource};

fn state_body() -> String {
    json!({
        "result": {
            "tariffGrid": 0.2841,
            "forecast": {
                "grid": [
                    {"start": "2024-06-03T00:00:00+02:00", "end": "2024-06-03T01:00:00+02:00", "value": 0.301},
                    {"start": "2024-06-03T01:00:00+02:00", "end": "2024-06-03T02:00:00+02:00", "value": 0.276},
                    {"start": "2024-06-03T02:00:00+02:00", "end": "2024-06-03T03:00:00+02:00", "value": 0.276}
                ]
            }
        }
    })
    .to_string()
}

#[tokio::test]
async fn fetches_and_decodes_forecast() {
    let mut server = Server::new_async().await;
    let mock = server
        .mock("GET", "/api/state")
        .with_status(200)
        .with_header("content-type", "application/json")
        .with_body(state_body())
        .create_async()
        .await;

    let client = EvccClient::new().unwrap();
    let series = client
        .fetch_forecast(&server.host_with_port())
        .await
        .unwrap();

    assert_eq!(series.len(), 3);
    assert!((series.current_price - 0.2841).abs() < 1e-9);
    assert_eq!(series.points()[2].start.hour(), 2);
    mock.assert_async().await;
}

#[tokio::test]
async fn malformed_body_is_a_decode_error() {
    let mut server = Server::new_async().await;
    let mock = server
        .mock("GET", "/api/state")
        .with_status(200)
        .with_body("{\"result\": {\"forecast\": ")
        .create_async()
        .await;

    let client = EvccClient::new().unwrap();
    let err = client
        .fetch_forecast(&server.host_with_port())
        .await
        .unwrap_err();

    assert!(matches!(err, TariffError::Decode { .. }));
    assert!(!err.is_fatal_fetch());
    mock.assert_async().await;
}

#[tokio::test]
async fn error_status_is_an_api_error() {
    let mut server = Server::new_async().await;
    let mock = server
        .mock("GET", "/api/state")
        .with_status(503)
        .with_body("starting up")
        .create_async()
        .await;

    let client = EvccClient::new().unwrap();
    let err = client
        .fetch_forecast(&server.host_with_port())
        .await
        .unwrap_err();

    assert!(matches!(err, TariffError::Api { status: 503, .. }));
    mock.assert_async().await;
}

#[tokio::test]
async fn unreachable_host_is_a_fatal_network_error() {
    // Bind then release a port so nothing is listening on it
    let port = {
        let listener = std::net::TcpListener::bind("127.0.0.1:0").unwrap();
        listener.local_addr().unwrap().port()
    };

    let client = EvccClient::new().unwrap();
    let err = client
        .fetch_forecast(&format!("127.0.0.1:{}", port))
        .await
        .unwrap_err();

    assert!(matches!(err, TariffError::Network { .. }));
    assert!(err.is_fatal_fetch());
}
