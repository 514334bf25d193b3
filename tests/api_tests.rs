//! PokeAPI client tests against a wiremock server

use std::time::Duration;

use pokedex::api::{ClientConfig, FetchFailure, PokeClient};
use pokedex::state::MAX_POKEMON_ID;
use serde_json::json;
use wiremock::matchers::{method, path};
use wiremock::{Mock, MockServer, ResponseTemplate};

fn pokemon_body(id: u32, name: &str) -> serde_json::Value {
    json!({
        "id": id,
        "name": name,
        "height": 4,
        "weight": 60,
        "sprites": { "front_default": format!("https://example.test/{id}.png") },
        "cries": { "latest": format!("https://example.test/{id}.ogg"), "legacy": null },
        "types": [{ "slot": 1, "type": { "name": "electric", "url": "x" } }],
        "abilities": [{ "ability": { "name": "static", "url": "x" }, "is_hidden": false }],
        "stats": [{ "base_stat": 35, "effort": 0, "stat": { "name": "hp", "url": "x" } }],
        "moves": [{ "move": { "name": "mega-punch", "url": "x" } }]
    })
}

fn client_for(server: &MockServer) -> PokeClient {
    PokeClient::new(ClientConfig {
        base_url: format!("{}/pokemon", server.uri()),
        timeout: Duration::from_secs(5),
    })
    .expect("client builds")
}

#[tokio::test]
async fn test_fetch_by_id_success() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/pokemon/25"))
        .respond_with(ResponseTemplate::new(200).set_body_json(pokemon_body(25, "pikachu")))
        .mount(&server)
        .await;

    let record = client_for(&server).fetch_by_id(25).await.unwrap();

    assert_eq!(record.id, 25);
    assert_eq!(record.name, "pikachu");
    assert_eq!(record.types, vec!["electric"]);
    assert_eq!(record.abilities, vec!["static"]);
    assert_eq!(record.moves, vec!["mega-punch"]);
    assert_eq!(record.sprite_url.as_deref(), Some("https://example.test/25.png"));
}

#[tokio::test]
async fn test_ids_below_one_request_last_entry() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path(format!("/pokemon/{MAX_POKEMON_ID}")))
        .respond_with(
            ResponseTemplate::new(200).set_body_json(pokemon_body(MAX_POKEMON_ID, "pecharunt")),
        )
        .expect(2)
        .mount(&server)
        .await;

    let client = client_for(&server);
    for id in [0, -5] {
        let record = client.fetch_by_id(id).await.unwrap();
        assert_eq!(record.id, MAX_POKEMON_ID);
    }
}

#[tokio::test]
async fn test_high_ids_are_not_wrapped() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/pokemon/1026"))
        .respond_with(ResponseTemplate::new(404))
        .expect(1)
        .mount(&server)
        .await;

    let error = client_for(&server).fetch_by_id(1026).await.unwrap_err();
    assert_eq!(error.query, "#1026");
}

#[tokio::test]
async fn test_ids_past_u32_are_requested_verbatim() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/pokemon/5000000000"))
        .respond_with(ResponseTemplate::new(404))
        .expect(1)
        .mount(&server)
        .await;

    let error = client_for(&server)
        .fetch_by_name("5000000000")
        .await
        .unwrap_err();
    assert_eq!(error.query, "#5000000000");
}

#[tokio::test]
async fn test_not_found_status_collapses_to_not_found() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/pokemon/missingno"))
        .respond_with(ResponseTemplate::new(404).set_body_string("Not Found"))
        .mount(&server)
        .await;

    let error = client_for(&server)
        .fetch_by_name("missingno")
        .await
        .unwrap_err();

    assert_eq!(error.to_string(), "Pokémon not found: missingno");
    assert!(matches!(error.cause, FetchFailure::Status(status) if status.as_u16() == 404));
}

#[tokio::test]
async fn test_malformed_body_collapses_to_not_found() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/pokemon/1"))
        .respond_with(ResponseTemplate::new(200).set_body_string("<html>oops</html>"))
        .mount(&server)
        .await;

    let error = client_for(&server).fetch_by_id(1).await.unwrap_err();

    assert!(matches!(error.cause, FetchFailure::Decode(_)));
}

#[tokio::test]
async fn test_server_error_collapses_to_not_found() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/pokemon/1"))
        .respond_with(ResponseTemplate::new(503))
        .mount(&server)
        .await;

    let error = client_for(&server).fetch_by_id(1).await.unwrap_err();

    assert!(matches!(error.cause, FetchFailure::Status(_)));
}

#[tokio::test]
async fn test_name_lookup_is_trimmed_and_lowercased() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/pokemon/pikachu"))
        .respond_with(ResponseTemplate::new(200).set_body_json(pokemon_body(25, "pikachu")))
        .expect(1)
        .mount(&server)
        .await;

    let record = client_for(&server)
        .fetch_by_name("  PiKaChU ")
        .await
        .unwrap();
    assert_eq!(record.id, 25);
}

#[tokio::test]
async fn test_empty_name_sends_no_request() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .respond_with(ResponseTemplate::new(200))
        .expect(0)
        .mount(&server)
        .await;

    let error = client_for(&server).fetch_by_name("   ").await.unwrap_err();
    assert!(matches!(error.cause, FetchFailure::EmptyQuery));
}

#[tokio::test]
async fn test_fetch_bytes() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/cries/25.ogg"))
        .respond_with(ResponseTemplate::new(200).set_body_bytes(vec![1u8, 2, 3]))
        .mount(&server)
        .await;
    Mock::given(method("GET"))
        .and(path("/cries/0.ogg"))
        .respond_with(ResponseTemplate::new(410))
        .mount(&server)
        .await;

    let client = client_for(&server);
    let bytes = client
        .fetch_bytes(&format!("{}/cries/25.ogg", server.uri()))
        .await
        .unwrap();
    assert_eq!(bytes, vec![1, 2, 3]);

    let error = client
        .fetch_bytes(&format!("{}/cries/0.ogg", server.uri()))
        .await
        .unwrap_err();
    assert!(matches!(error, FetchFailure::Status(status) if status.as_u16() == 410));
}

#[tokio::test]
async fn test_slow_upstream_times_out() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/pokemon/1"))
        .respond_with(
            ResponseTemplate::new(200)
                .set_body_json(pokemon_body(1, "bulbasaur"))
                .set_delay(Duration::from_secs(2)),
        )
        .mount(&server)
        .await;

    let client = PokeClient::new(ClientConfig {
        base_url: format!("{}/pokemon", server.uri()),
        timeout: Duration::from_millis(200),
    })
    .unwrap();

    let error = client.fetch_by_id(1).await.unwrap_err();
    assert!(matches!(error.cause, FetchFailure::Transport(_)));
}
