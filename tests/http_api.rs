//! End-to-end tests: HTTP request -> router -> CwaClient -> mock CWA API.

use std::sync::Arc;

use axum::body::Body;
use axum::http::{Request, StatusCode};
use cwa_weather_proxy::config::WeatherConfig;
use cwa_weather_proxy::{AppState, CwaClient, web};
use http_body_util::BodyExt;
use serde_json::{Value, json};
use tower::ServiceExt;
use wiremock::matchers::{method, query_param};
use wiremock::{Mock, MockServer, ResponseTemplate};

fn app_for(mock_server: &MockServer, api_key: Option<&str>) -> axum::Router {
    let config = WeatherConfig {
        api_key: api_key.map(str::to_string),
        base_url: mock_server.uri(),
        ..WeatherConfig::default()
    };
    let client = CwaClient::new(&config).unwrap();
    web::app(AppState::new(Arc::new(client)))
}

async fn get(app: axum::Router, uri: &str) -> (StatusCode, Value) {
    let response = app
        .oneshot(Request::builder().uri(uri).body(Body::empty()).unwrap())
        .await
        .unwrap();

    let status = response.status();
    let bytes = response.into_body().collect().await.unwrap().to_bytes();
    (status, serde_json::from_slice(&bytes).unwrap())
}

fn kaohsiung_min_temp() -> Value {
    json!({
        "success": "true",
        "records": {
            "datasetDescription": "三十六小時天氣預報",
            "location": [{
                "locationName": "高雄市",
                "weatherElement": [{
                    "elementName": "MinT",
                    "time": [{
                        "startTime": "2024-01-01 06:00:00",
                        "endTime": "2024-01-01 18:00:00",
                        "parameter": {"parameterName": "20", "parameterUnit": "C"}
                    }]
                }]
            }]
        }
    })
}

#[tokio::test]
async fn test_kaohsiung_end_to_end() {
    let mock_server = MockServer::start().await;

    Mock::given(method("GET"))
        .and(query_param("locationName", "高雄市"))
        .respond_with(ResponseTemplate::new(200).set_body_json(kaohsiung_min_temp()))
        .expect(1)
        .mount(&mock_server)
        .await;

    let (status, body) = get(app_for(&mock_server, Some("test-key")), "/api/weather/kaohsiung").await;

    assert_eq!(status, StatusCode::OK);
    assert_eq!(
        body,
        json!({
            "success": true,
            "data": {
                "city": "高雄市",
                "updateTime": "三十六小時天氣預報",
                "forecasts": [{
                    "startTime": "2024-01-01 06:00:00",
                    "endTime": "2024-01-01 18:00:00",
                    "weather": "",
                    "rain": "",
                    "minTemp": "20°C",
                    "maxTemp": "",
                    "comfort": "",
                    "windSpeed": ""
                }]
            }
        })
    );
}

#[tokio::test]
async fn test_named_city_is_percent_decoded() {
    let mock_server = MockServer::start().await;

    Mock::given(method("GET"))
        .and(query_param("locationName", "高雄市"))
        .respond_with(ResponseTemplate::new(200).set_body_json(kaohsiung_min_temp()))
        .expect(1)
        .mount(&mock_server)
        .await;

    let (status, body) = get(
        app_for(&mock_server, Some("test-key")),
        "/api/weather/city/%E9%AB%98%E9%9B%84%E5%B8%82",
    )
    .await;

    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["data"]["city"], "高雄市");
}

#[tokio::test]
async fn test_all_with_zero_locations_is_not_found() {
    let mock_server = MockServer::start().await;

    Mock::given(method("GET"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "records": {"datasetDescription": "三十六小時天氣預報", "location": []}
        })))
        .mount(&mock_server)
        .await;

    let (status, body) = get(app_for(&mock_server, Some("test-key")), "/api/weather/all").await;

    assert_eq!(status, StatusCode::NOT_FOUND);
    assert_eq!(body["error"], "no data");
}

#[tokio::test]
async fn test_upstream_status_is_forwarded() {
    let mock_server = MockServer::start().await;

    Mock::given(method("GET"))
        .respond_with(ResponseTemplate::new(401).set_body_json(json!({"message": "Unauthorized"})))
        .mount(&mock_server)
        .await;

    let (status, body) = get(app_for(&mock_server, Some("bad-key")), "/api/weather/all").await;

    assert_eq!(status, StatusCode::UNAUTHORIZED);
    assert_eq!(body["error"], "upstream error");
    assert_eq!(body["details"], json!({"message": "Unauthorized"}));
}

#[tokio::test]
async fn test_missing_api_key_only_breaks_data_endpoints() {
    let mock_server = MockServer::start().await;

    Mock::given(method("GET"))
        .respond_with(ResponseTemplate::new(200).set_body_json(kaohsiung_min_temp()))
        .expect(0)
        .mount(&mock_server)
        .await;

    for uri in [
        "/api/weather/kaohsiung",
        "/api/weather/all",
        "/api/weather/city/%E9%AB%98%E9%9B%84%E5%B8%82",
    ] {
        let (status, body) = get(app_for(&mock_server, None), uri).await;
        assert_eq!(status, StatusCode::INTERNAL_SERVER_ERROR, "{uri}");
        assert_eq!(body["error"], "server misconfigured");
    }

    let (status, body) = get(app_for(&mock_server, None), "/api/health").await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["status"], "OK");

    let (status, _) = get(app_for(&mock_server, None), "/").await;
    assert_eq!(status, StatusCode::OK);
}
