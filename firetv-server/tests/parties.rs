use axum::http::StatusCode;
use firetv_core::api::routes::{api, fill};
use serde_json::{Value, json};

#[path = "support/mod.rs"]
mod support;

use support::{build_server, test_config};

#[tokio::test]
async fn create_list_and_join_a_party() {
    let (server, _) = build_server(test_config().await).await;

    let created = server
        .post(api::parties::COLLECTION)
        .json(&json!({ "title": "  Friday Movie Night ", "isPrivate": false }))
        .await;
    created.assert_status(StatusCode::CREATED);
    let party: Value = created.json();
    assert_eq!(party["title"], "Friday Movie Night");
    assert_eq!(party["members"], json!([]));
    let id = party["id"].as_str().unwrap().to_string();

    let joined = server
        .post(&fill(api::parties::JOIN, &[("id", id.as_str())]))
        .json(&json!({ "userId": "user_1", "username": "neo" }))
        .await;
    joined.assert_status_ok();
    // Joining again does not duplicate the member.
    let rejoined = server
        .post(&fill(api::parties::JOIN, &[("id", id.as_str())]))
        .json(&json!({ "userId": "user_1", "username": "neo" }))
        .await;
    let body: Value = rejoined.json();
    assert_eq!(body["members"].as_array().unwrap().len(), 1);
    assert_eq!(body["members"][0]["username"], "neo");

    let listed: Value = server.get(api::parties::COLLECTION).await.json();
    assert_eq!(listed.as_array().unwrap().len(), 1);
    assert_eq!(listed[0]["id"], id);
}

#[tokio::test]
async fn duplicate_titles_conflict() {
    let (server, _) = build_server(test_config().await).await;
    let body = json!({ "title": "Anime Club" });

    server
        .post(api::parties::COLLECTION)
        .json(&body)
        .await
        .assert_status(StatusCode::CREATED);
    let second = server.post(api::parties::COLLECTION).json(&body).await;
    second.assert_status(StatusCode::CONFLICT);
    let error: Value = second.json();
    assert_eq!(error["error"]["status"], 409);
}

#[tokio::test]
async fn private_parties_need_and_check_a_password() {
    let (server, _) = build_server(test_config().await).await;

    server
        .post(api::parties::COLLECTION)
        .json(&json!({ "title": "Secret", "isPrivate": true }))
        .await
        .assert_status(StatusCode::BAD_REQUEST);

    let created = server
        .post(api::parties::COLLECTION)
        .json(&json!({ "title": "Secret", "isPrivate": true, "password": "hunter2" }))
        .await;
    created.assert_status(StatusCode::CREATED);
    let party: Value = created.json();
    assert!(party.get("password").is_none());
    let join_path = fill(api::parties::JOIN, &[("id", party["id"].as_str().unwrap())]);

    server
        .post(&join_path)
        .json(&json!({ "userId": "u", "username": "u", "password": "guess" }))
        .await
        .assert_status(StatusCode::FORBIDDEN);
    server
        .post(&join_path)
        .json(&json!({ "userId": "u", "username": "u", "password": "hunter2" }))
        .await
        .assert_status_ok();
}

#[tokio::test]
async fn joining_an_unknown_party_is_not_found() {
    let (server, _) = build_server(test_config().await).await;

    server
        .post(&fill(api::parties::JOIN, &[("id", "nope")]))
        .json(&json!({ "userId": "u", "username": "u" }))
        .await
        .assert_status(StatusCode::NOT_FOUND);
}

#[tokio::test]
async fn messages_come_back_oldest_first() {
    let (server, state) = build_server(test_config().await).await;

    let party: Value = server
        .post(api::parties::COLLECTION)
        .json(&json!({ "title": "Chatty" }))
        .await
        .json();
    let id = firetv_model::PartyId::from(party["id"].as_str().unwrap());

    state.parties.post_message(&id, "neo", "Thomas", "first").unwrap();
    state.parties.post_message(&id, "trinity", "Trinity", "second").unwrap();

    let path = fill(api::messages::BY_PARTY, &[("party_id", id.as_str())]);
    let messages: Value = server.get(&path).await.json();
    let contents: Vec<&str> = messages
        .as_array()
        .unwrap()
        .iter()
        .map(|m| m["content"].as_str().unwrap())
        .collect();
    assert_eq!(contents, vec!["first", "second"]);
    assert_eq!(messages[0]["senderName"], "Thomas");

    let empty: Value = server
        .get(&fill(api::messages::BY_PARTY, &[("party_id", "unknown")]))
        .await
        .json();
    assert_eq!(empty, json!([]));
}
