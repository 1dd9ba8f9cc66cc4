//! HTTP transport and client against a local axum server
//!
//! Each test spins up a router on an ephemeral port, points the client at
//! it, and checks how responses map to values, fallbacks, and errors.

use std::time::Duration;

use axum::{
    extract::Path,
    http::{header::ACCEPT, HeaderMap, StatusCode},
    response::{IntoResponse, Json},
    routing::get,
    Router,
};
use serde_json::{json, Value};
use url::Url;

use restaurant_discovery::{
    fetch_enriched_restaurants, fetch_price_ranges_for, ApiTransport, AppConfig, Endpoint,
    FetchError, HttpTransport, OpenStatus, PriceRange, RestaurantClient, TransportError,
    ValidationMode,
};

async fn serve(router: Router) -> Url {
    let listener = tokio::net::TcpListener::bind("127.0.0.1:0")
        .await
        .expect("bind test listener");
    let addr = listener.local_addr().expect("listener address");
    tokio::spawn(async move {
        axum::serve(listener, router).await.expect("test server");
    });
    Url::parse(&format!("http://{}/api", addr)).expect("base url")
}

fn config(base: Url, mode: ValidationMode) -> AppConfig {
    AppConfig::new(base)
        .with_timeout(Duration::from_secs(2))
        .with_validation_mode(mode)
}

fn restaurant(id: &str, price_range_id: &str) -> Value {
    json!({
        "id": id,
        "name": format!("Restaurant {}", id),
        "rating": 4.5,
        "filter_ids": ["5e0f48b8"],
        "image_url": "/images/coffee.png",
        "delivery_time_minutes": 30,
        "price_range_id": price_range_id
    })
}

async fn open_status(Path(id): Path<String>) -> impl IntoResponse {
    match id.as_str() {
        "broken" => (StatusCode::INTERNAL_SERVER_ERROR, "boom").into_response(),
        _ => Json(json!({"restaurant_id": id, "is_open": true})).into_response(),
    }
}

async fn price_range(Path(id): Path<String>) -> Json<Value> {
    let range = match id.as_str() {
        "cheap" => "$",
        "pricey" => "$$$",
        _ => "",
    };
    Json(json!({"id": id, "range": range}))
}

fn api_router() -> Router {
    Router::new()
        .route(
            "/api/restaurants",
            get(|| async {
                Json(json!({"restaurants": [
                    restaurant("r1", "pricey"),
                    restaurant("broken", "cheap"),
                    restaurant("r3", "pricey"),
                ]}))
            }),
        )
        .route(
            "/api/filter",
            get(|| async {
                Json(json!({"filters": [
                    {"id": "5e0f48b8", "name": "Coffee", "image_url": "/images/coffee.png"}
                ]}))
            }),
        )
        .route("/api/open/:id", get(open_status))
        .route("/api/price-range/:id", get(price_range))
}

#[tokio::test]
async fn fetches_and_enriches_over_http() {
    let base = serve(api_router()).await;
    let client = RestaurantClient::from_config(&config(base, ValidationMode::Strict)).unwrap();

    let restaurants = fetch_enriched_restaurants(&client).await.unwrap();
    let flags: Vec<_> = restaurants.iter().map(|r| (r.id(), r.is_open)).collect();
    assert_eq!(flags, vec![("r1", true), ("broken", false), ("r3", true)]);

    let categories = client.fetch_categories().await.unwrap();
    assert_eq!(categories[0].name, "Coffee");

    let price_ranges = fetch_price_ranges_for(&client, &restaurants).await.unwrap();
    assert_eq!(
        price_ranges,
        vec![
            PriceRange {
                id: "cheap".into(),
                range: "$".into()
            },
            PriceRange {
                id: "pricey".into(),
                range: "$$$".into()
            },
        ]
    );
}

#[tokio::test]
async fn sends_accept_json() {
    let router = Router::new().route(
        "/api/open/:id",
        get(|Path(id): Path<String>, headers: HeaderMap| async move {
            let accepts_json = headers
                .get(ACCEPT)
                .and_then(|v| v.to_str().ok())
                .map_or(false, |v| v.contains("application/json"));
            Json(json!({"restaurant_id": id, "is_open": accepts_json}))
        }),
    );
    let base = serve(router).await;
    let client = RestaurantClient::from_config(&config(base, ValidationMode::Strict)).unwrap();

    let status = client.fetch_open_status("r1").await.unwrap();
    assert!(status.is_open);
}

#[tokio::test]
async fn non_success_status_is_transport_failure() {
    let router = Router::new().route(
        "/api/restaurants",
        get(|| async { (StatusCode::SERVICE_UNAVAILABLE, "maintenance") }),
    );
    let base = serve(router).await;
    let cfg = config(base, ValidationMode::Strict);
    let transport = HttpTransport::new(&cfg).unwrap();

    let err = transport.get_json(&Endpoint::Restaurants).await.unwrap_err();
    assert!(matches!(err, TransportError::Status { status: 503 }));

    let client = RestaurantClient::from_config(&cfg).unwrap();
    assert!(client.fetch_restaurants().await.unwrap().is_empty());
}

#[tokio::test]
async fn missing_wrapper_key_is_not_an_empty_success() {
    let router = Router::new().route(
        "/api/restaurants",
        get(|| async { Json(json!({"data": []})) }),
    );
    let base = serve(router).await;
    let client = RestaurantClient::from_config(&config(base, ValidationMode::Strict)).unwrap();

    let err = client.try_fetch_restaurants().await.unwrap_err();
    assert!(matches!(
        err,
        FetchError::Transport(TransportError::MissingField {
            field: "restaurants"
        })
    ));
    assert!(client.fetch_restaurants().await.unwrap().is_empty());
}

#[tokio::test]
async fn non_json_body_is_transport_failure() {
    let router = Router::new().route("/api/filter", get(|| async { "<html>oops</html>" }));
    let base = serve(router).await;
    let client = RestaurantClient::from_config(&config(base, ValidationMode::Strict)).unwrap();

    let err = client.try_fetch_categories().await.unwrap_err();
    assert!(matches!(
        err,
        FetchError::Transport(TransportError::InvalidJson { .. })
    ));
    assert!(client.fetch_categories().await.unwrap().is_empty());
}

#[tokio::test]
async fn slow_response_times_out_to_fallback() {
    let router = Router::new().route(
        "/api/open/:id",
        get(|Path(id): Path<String>| async move {
            tokio::time::sleep(Duration::from_secs(3)).await;
            Json(json!({"restaurant_id": id, "is_open": true}))
        }),
    );
    let base = serve(router).await;
    let cfg = config(base, ValidationMode::Strict).with_timeout(Duration::from_millis(200));
    let client = RestaurantClient::from_config(&cfg).unwrap();

    let err = client.try_fetch_open_status("r1").await.unwrap_err();
    assert!(matches!(
        err,
        FetchError::Transport(TransportError::Timeout { .. })
    ));
    assert_eq!(
        client.fetch_open_status("r1").await.unwrap(),
        OpenStatus::closed("r1")
    );
}

#[tokio::test]
async fn schema_drift_depends_on_mode() {
    let router = Router::new().route(
        "/api/price-range/:id",
        get(|Path(id): Path<String>| async move { Json(json!({"id": id, "label": "$"})) }),
    );
    let base = serve(router).await;

    let strict = RestaurantClient::from_config(&config(base.clone(), ValidationMode::Strict)).unwrap();
    let err = strict.fetch_price_range("p1").await.unwrap_err();
    assert_eq!(err.entity, "price range");

    let lenient = RestaurantClient::from_config(&config(base, ValidationMode::Lenient)).unwrap();
    assert_eq!(
        lenient.fetch_price_range("p1").await.unwrap(),
        PriceRange::unresolved("p1")
    );
}

#[tokio::test]
async fn unreachable_service_degrades_to_empty() {
    // Bind then drop to get a port with nothing listening.
    let listener = tokio::net::TcpListener::bind("127.0.0.1:0").await.unwrap();
    let addr = listener.local_addr().unwrap();
    drop(listener);

    let base = Url::parse(&format!("http://{}/api", addr)).unwrap();
    let client = RestaurantClient::from_config(&config(base, ValidationMode::Strict)).unwrap();

    assert!(fetch_enriched_restaurants(&client).await.unwrap().is_empty());
}
