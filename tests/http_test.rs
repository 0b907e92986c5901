use adintel::dashboard::{DashboardService, DashboardSettings};
use adintel::http::{router, serve_with_simulator, AppState};
use adintel::predictor::{PredictionService, Predictor};
use adintel::runtime::DashboardSystem;
use axum::body::{to_bytes, Body};
use axum::http::{Method, Request, StatusCode};
use axum::Router;
use serde_json::{json, Value};
use std::time::Duration;
use tower::ServiceExt;

const MODEL: &str = include_str!("../assets/prediction_model.json");

fn state(system: &DashboardSystem, predictor: Option<Predictor>) -> AppState {
    AppState {
        campaigns: system.campaign_client.clone(),
        dashboard: DashboardService::new(
            system.campaign_client.clone(),
            system.insight_client.clone(),
            DashboardSettings::default(),
        ),
        predictions: PredictionService::new(system.campaign_client.clone(), predictor),
    }
}

fn app(system: &DashboardSystem, predictor: Option<Predictor>) -> Router {
    router(state(system, predictor))
}

fn bundled_model() -> Predictor {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("model.json");
    std::fs::write(&path, MODEL).unwrap();
    Predictor::load(&path).unwrap()
}

async fn call(app: &Router, method: Method, uri: &str, body: Option<Value>) -> (StatusCode, Value) {
    let mut request = Request::builder().method(method).uri(uri);
    let body = match body {
        Some(json) => {
            request = request.header("content-type", "application/json");
            Body::from(json.to_string())
        }
        None => Body::empty(),
    };
    let response = app.clone().oneshot(request.body(body).unwrap()).await.unwrap();
    let status = response.status();
    let bytes = to_bytes(response.into_body(), usize::MAX).await.unwrap();
    let value = if bytes.is_empty() {
        Value::Null
    } else {
        serde_json::from_slice(&bytes).unwrap()
    };
    (status, value)
}

fn campaign(ad_id: &str) -> Value {
    json!({
        "Ad_ID": ad_id,
        "Campaign_Name": "Data Analytics Course",
        "Platform": "Google",
        "Device": "desktop",
        "Impressions": 4498,
        "Clicks": 104,
        "Cost": "$231.88",
        "Conversions": 7,
        "Sale_Amount": "$1,892.00",
        "Ad_Date": "2024-11-16",
        "Budget_Distribution": "40%, 35%, 25%"
    })
}

#[tokio::test]
async fn test_health_reports_model_state() {
    let system = DashboardSystem::in_memory().unwrap();
    let app = app(&system, None);

    let (status, body) = call(&app, Method::GET, "/health", None).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body, json!({"status": "ok", "campaigns": 0, "model_loaded": false}));
}

#[tokio::test]
async fn test_campaign_routes() {
    let system = DashboardSystem::in_memory().unwrap();
    let app = app(&system, None);

    let (status, body) = call(&app, Method::POST, "/campaigns", Some(campaign("A1000"))).await;
    assert_eq!(status, StatusCode::CREATED);
    assert_eq!(body["ad_id"], "A1000");

    let (status, _) = call(&app, Method::POST, "/campaigns", Some(campaign("A1000"))).await;
    assert_eq!(status, StatusCode::CONFLICT);

    let (status, body) = call(&app, Method::GET, "/campaigns/A1000", None).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["cost"], 231.88);
    assert_eq!(body["sale_amount"], 1892.0);

    let (status, body) = call(&app, Method::PATCH, "/campaigns/A1000", Some(json!({"clicks": 120}))).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["clicks"], 120);

    let (status, body) = call(&app, Method::PATCH, "/campaigns/A1000", Some(json!({"cost": -1.0}))).await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert!(body["error"].as_str().unwrap().contains("Cost"));

    let (status, body) = call(&app, Method::GET, "/getAllCampaigns?limit=1", None).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body[0]["campaign_name"], "Data Analytics Course");
    assert_eq!(body[0]["clicks"], 120);

    let (status, _) = call(&app, Method::GET, "/getAllCampaigns?limit=abc", None).await;
    assert_eq!(status, StatusCode::BAD_REQUEST);

    let (status, _) = call(&app, Method::DELETE, "/campaigns/A1000", None).await;
    assert_eq!(status, StatusCode::NO_CONTENT);

    let (status, body) = call(&app, Method::GET, "/campaigns/A1000", None).await;
    assert_eq!(status, StatusCode::NOT_FOUND);
    assert!(body["error"].is_string());
}

#[tokio::test]
async fn test_dashboard_routes_on_empty_table() {
    let system = DashboardSystem::in_memory().unwrap();
    let app = app(&system, None);

    let (status, body) = call(&app, Method::GET, "/getWeeklyTrends", None).await;
    assert_eq!(status, StatusCode::OK);
    let points = body.as_array().unwrap();
    assert_eq!(points.len(), 7);
    assert_eq!(points[0]["impressions"], 20000);
    assert_eq!(points[0]["synthetic"], true);

    for uri in ["/getDeviceDemographics", "/getKpiData", "/getCampaignPerformance", "/getPlatformPerformance", "/predictiveInsights"] {
        let (status, body) = call(&app, Method::GET, uri, None).await;
        assert_eq!(status, StatusCode::OK, "{uri}");
        assert_eq!(body, json!([]), "{uri}");
    }

    let (status, body) = call(&app, Method::GET, "/getKpiSummary", None).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["roi"], 0.0);

    let (status, body) = call(&app, Method::GET, "/realTime", None).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(
        body,
        json!({
            "total_campaigns": 0,
            "total_impressions": 0,
            "avg_ctr": 0.0,
            "total_clicks": 0,
            "avg_conversions": 0.0,
            "total_cpc": 0.0
        })
    );
}

#[tokio::test]
async fn test_predict_routes() {
    let system = DashboardSystem::in_memory().unwrap();

    let unloaded = app(&system, None);
    let (status, body) = call(&unloaded, Method::POST, "/predict", Some(json!({"campaign_name": "x"}))).await;
    assert_eq!(status, StatusCode::SERVICE_UNAVAILABLE);
    assert!(body["error"].is_string());

    let app = app(&system, Some(bundled_model()));
    call(&app, Method::POST, "/campaigns", Some(campaign("A1000"))).await;

    let (status, body) = call(
        &app,
        Method::POST,
        "/predict",
        Some(json!({"campaign_name": "Data Analytics Course"})),
    )
    .await;
    assert_eq!(status, StatusCode::OK);
    for key in ["Budget Recommendation", "Performance Alerts"] {
        assert!(body[key].is_string(), "{key}");
    }
    for key in ["Audience Expansion", "Creative Refresh"] {
        let value = body[key].as_str().unwrap();
        assert!(value == "Yes" || value == "No", "{key}");
    }

    let direct = json!({
        "platform": "Meta",
        "impressions": 2000,
        "clicks": 40,
        "spend": 80.0,
        "conversions": 4,
        "CTR": 2.0,
        "ROAS": 3.1,
        "recommended_budget_distribution": "50/30/20"
    });
    let (status, _) = call(&app, Method::POST, "/predict", Some(direct)).await;
    assert_eq!(status, StatusCode::OK);

    let (status, _) = call(&app, Method::POST, "/predict", Some(json!({"campaign_name": "Nope"}))).await;
    assert_eq!(status, StatusCode::NOT_FOUND);

    let unknown = json!({"platform": "TikTok", "impressions": 1, "clicks": 0, "spend": 1, "conversions": 0});
    let (status, body) = call(&app, Method::POST, "/predict", Some(unknown)).await;
    assert_eq!(status, StatusCode::UNPROCESSABLE_ENTITY);
    assert!(body["error"].as_str().unwrap().contains("TikTok Ads"));
}

#[tokio::test]
async fn test_conversation_and_cors() {
    let system = DashboardSystem::in_memory().unwrap();
    let app = app(&system, None);

    let (status, body) = call(&app, Method::POST, "/api/conversation", Some(json!({"message": "hi"}))).await;
    assert_eq!(status, StatusCode::OK);
    assert!(body["reply"].as_str().unwrap().contains("hi"));

    let request = Request::builder()
        .uri("/health")
        .header("origin", "http://localhost:3000")
        .body(Body::empty())
        .unwrap();
    let response = app.oneshot(request).await.unwrap();
    assert_eq!(response.headers()["access-control-allow-origin"], "*");
}

#[tokio::test]
async fn test_out_of_range_counts_are_bad_requests() {
    let system = DashboardSystem::in_memory().unwrap();
    let app = app(&system, None);

    let (status, body) = call(&app, Method::POST, "/campaigns", Some(json!({"Ad_ID": "big", "Impressions": 1e30}))).await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert!(body["error"].is_string());

    let (status, _) = call(&app, Method::POST, "/campaigns", Some(json!({"Ad_ID": "big", "Impressions": 5e18}))).await;
    assert_eq!(status, StatusCode::BAD_REQUEST);

    let (status, body) = call(&app, Method::GET, "/health", None).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["campaigns"], 0);
}

#[tokio::test]
async fn test_failed_bind_releases_simulator() {
    let system = DashboardSystem::in_memory().unwrap();
    let taken = tokio::net::TcpListener::bind("127.0.0.1:0").await.unwrap();
    let addr = taken.local_addr().unwrap();

    let state = state(&system, None);
    let simulator = state.dashboard.start_simulator(Duration::from_millis(5));
    assert!(simulator.is_some());

    let served = serve_with_simulator(addr, state, simulator, std::future::pending()).await;
    assert!(served.is_err());

    tokio::time::timeout(Duration::from_secs(5), system.shutdown())
        .await
        .expect("actors still referenced after a failed start")
        .unwrap();
}
