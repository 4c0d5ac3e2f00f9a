use axum::{Json, Router, http::StatusCode, routing::post};
use firetv_core::{
    Wheel,
    api::routes::api,
    roulette::{FALLBACK_TITLES, MAX_SEGMENTS},
};
use firetv_model::SpinResponse;
use serde_json::{Value, json};

#[path = "support/mod.rs"]
mod support;

use support::{build_server, spawn_upstream, test_config};

#[tokio::test]
async fn spin_lands_on_the_requested_title() {
    let (server, _) = build_server(test_config().await).await;
    let titles = vec!["Alien", "Heat", "Ran", "Up", "Tár"];

    let response = server
        .post(api::roulette::SPIN)
        .json(&json!({ "titles": titles, "target": "Ran" }))
        .await;
    response.assert_status_ok();
    let spin: SpinResponse = response.json();

    assert_eq!(spin.selected, "Ran");
    assert_eq!(spin.segment_index, 2);
    assert_eq!(spin.titles, titles);
    assert!(spin.rotation_degrees >= 5.0 * 360.0);
    assert_eq!(spin.duration_ms, 4_000);

    let wheel = Wheel::new(spin.titles.clone()).unwrap();
    assert_eq!(
        wheel.segment_under_pointer(spin.rotation_degrees),
        spin.segment_index
    );
}

#[tokio::test]
async fn random_target_is_one_of_the_titles() {
    let (server, _) = build_server(test_config().await).await;

    let spin: SpinResponse = server
        .post(api::roulette::SPIN)
        .json(&json!({ "titles": ["A", "B", "C"] }))
        .await
        .json();

    assert_eq!(spin.titles[spin.segment_index], spin.selected);
}

#[tokio::test]
async fn recommender_picks_are_padded_to_a_full_wheel() {
    let recommender = Router::new().route(
        "/api/recommend",
        post(|Json(body): Json<Value>| async move {
            assert_eq!(body["input"], "cosy mysteries");
            assert_eq!(body["mode"], "chaos");
            Json(json!({ "recommendations": "Knives Out, Clue ,  , Murder Mystery" }))
        }),
    );
    let mut config = test_config().await;
    config.upstreams.recommender_url = spawn_upstream(recommender).await;
    let (server, _) = build_server(config).await;

    let spin: SpinResponse = server
        .post(api::roulette::SPIN)
        .json(&json!({ "prompt": "cosy mysteries", "target": "Clue" }))
        .await
        .json();

    assert_eq!(spin.titles.len(), MAX_SEGMENTS);
    assert_eq!(&spin.titles[..3], ["Knives Out", "Clue", "Murder Mystery"]);
    assert_eq!(spin.titles[3], "Recommended Title 4");
    assert_eq!(spin.titles[7], "Recommended Title 8");
    assert_eq!(spin.selected, "Clue");
}

#[tokio::test]
async fn unreachable_recommender_falls_back() {
    let (server, _) = build_server(test_config().await).await;

    let spin: SpinResponse = server
        .post(api::roulette::SPIN)
        .json(&json!({}))
        .await
        .json();

    assert_eq!(spin.titles, FALLBACK_TITLES);
}

#[tokio::test]
async fn oversized_wheel_and_unknown_target_are_rejected() {
    let (server, _) = build_server(test_config().await).await;
    let nine: Vec<String> = (1..=9).map(|i| format!("Title {i}")).collect();

    server
        .post(api::roulette::SPIN)
        .json(&json!({ "titles": nine }))
        .await
        .assert_status(StatusCode::BAD_REQUEST);

    server
        .post(api::roulette::SPIN)
        .json(&json!({ "titles": ["A", "B"], "target": "Z" }))
        .await
        .assert_status(StatusCode::BAD_REQUEST);
}

#[tokio::test]
async fn respin_continues_forward_from_the_previous_angle() {
    let (server, _) = build_server(test_config().await).await;
    let titles = ["Alien", "Heat", "Ran", "Up"];

    let first: SpinResponse = server
        .post(api::roulette::SPIN)
        .json(&json!({ "titles": titles, "target": "Heat" }))
        .await
        .json();
    let second: SpinResponse = server
        .post(api::roulette::SPIN)
        .json(&json!({
            "titles": titles,
            "target": "Up",
            "fromRotation": first.rotation_degrees
        }))
        .await
        .json();

    assert_eq!(second.selected, "Up");
    assert!(second.rotation_degrees - first.rotation_degrees >= 4.0 * 360.0);
    let wheel = Wheel::new(second.titles.clone()).unwrap();
    assert_eq!(wheel.segment_under_pointer(second.rotation_degrees), 3);
}
