//! End-to-end nearby searches through the real HTTP dataset client.

use std::sync::Arc;
use std::time::Duration;

use serde_json::json;
use wiremock::matchers::{method, path};
use wiremock::{Mock, MockServer, ResponseTemplate};

use truckfinder_core::Coordinate;
use truckfinder_locator::{
    filter_by_food_item, DatasetClient, FixedLocation, LocationAcquirer, Locator, RawDatasetCache,
    SearchRequest,
};

const DATASET_PATH: &str = "/resource/rqzj-sfat.json";

fn sf() -> Coordinate {
    Coordinate::new(37.7749, -122.4194).expect("valid coordinate")
}

fn locator_for(server: &MockServer, acquirer: LocationAcquirer) -> Locator {
    let client = DatasetClient::new(
        &format!("{}{DATASET_PATH}", server.uri()),
        5,
        "truckfinder-test/0.1",
    )
    .expect("client");
    let cache = RawDatasetCache::new(Arc::new(client), Duration::from_secs(3600));
    Locator::new(Arc::new(cache), Arc::new(acquirer))
}

fn around_sf(radius_miles: f64) -> Option<SearchRequest> {
    Some(SearchRequest {
        reference: sf(),
        radius_miles,
    })
}

#[tokio::test]
async fn invalid_coordinates_are_dropped_from_results() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path(DATASET_PATH))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!([
            {"applicant": "Taco Truck", "latitude": "37.7749", "longitude": "-122.4194"},
            {"applicant": "Bad Truck", "latitude": "invalid", "longitude": "-122.4194"}
        ])))
        .mount(&server)
        .await;

    let locator = locator_for(&server, LocationAcquirer::unavailable());
    let results = locator.search(around_sf(1.0)).await;

    let names: Vec<_> = results.iter().map(|t| t.name.as_str()).collect();
    assert_eq!(names, vec!["Taco Truck"]);
}

#[tokio::test]
async fn only_trucks_inside_the_radius_are_returned() {
    let server = MockServer::start().await;
    // 500 m and 2000 m due north of the reference point.
    Mock::given(method("GET"))
        .and(path(DATASET_PATH))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!([
            {"applicant": "Two Thousand", "latitude": "37.792886", "longitude": "-122.4194"},
            {"applicant": "Five Hundred", "latitude": "37.779397", "longitude": "-122.4194"}
        ])))
        .mount(&server)
        .await;

    let locator = locator_for(&server, LocationAcquirer::unavailable());
    let results = locator.search(around_sf(1.0)).await;

    let names: Vec<_> = results.iter().map(|t| t.name.as_str()).collect();
    assert_eq!(names, vec!["Five Hundred"]);
}

#[tokio::test]
async fn upstream_error_yields_no_results() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path(DATASET_PATH))
        .respond_with(ResponseTemplate::new(500))
        .mount(&server)
        .await;

    let locator = locator_for(&server, LocationAcquirer::unavailable());
    assert!(locator.search(around_sf(5.0)).await.is_empty());
}

#[tokio::test]
async fn dataset_is_fetched_once_per_ttl() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path(DATASET_PATH))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!([
            {"applicant": "Taco Truck", "latitude": "37.7749", "longitude": "-122.4194"}
        ])))
        .expect(1)
        .mount(&server)
        .await;

    let locator = locator_for(&server, LocationAcquirer::unavailable());
    let first = locator.search(around_sf(1.0)).await;
    let second = locator.search(around_sf(1.0)).await;
    assert_eq!(first, second);
    assert_eq!(first.len(), 1);
}

#[tokio::test]
async fn fixed_device_location_drives_locate_and_search() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path(DATASET_PATH))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!([
            {
                "applicant": "Taco Truck",
                "latitude": "37.7749",
                "longitude": "-122.4194",
                "fooditems": "Tacos: Burritos: Horchata"
            },
            {
                "applicant": "Coffee Cart",
                "latitude": "37.7759",
                "longitude": "-122.4194",
                "fooditems": "Espresso: Pastries"
            }
        ])))
        .mount(&server)
        .await;

    let acquirer = LocationAcquirer::new(Arc::new(FixedLocation(sf())));
    let locator = locator_for(&server, acquirer);

    let results = locator.locate_and_search(1.0).await;
    assert_eq!(results.len(), 2);
    assert_eq!(results[0].name, "Taco Truck");

    let coffee = filter_by_food_item(results, "espresso");
    let names: Vec<_> = coffee.iter().map(|t| t.name.as_str()).collect();
    assert_eq!(names, vec!["Coffee Cart"]);
}
