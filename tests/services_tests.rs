//! Effect task bodies against a wiremock PokeAPI

use std::io::Cursor;
use std::time::Duration;

use image::{ImageFormat, Rgba, RgbaImage};
use pokedex::action::Action;
use pokedex::api::{ClientConfig, PokeClient, PokemonQuery};
use pokedex::services::{lookup_action, sprite_action};
use serde_json::json;
use wiremock::matchers::{method, path};
use wiremock::{Mock, MockServer, ResponseTemplate};

fn png_bytes(width: u32, height: u32) -> Vec<u8> {
    let image = RgbaImage::from_pixel(width, height, Rgba([200, 40, 40, 255]));
    let mut out = Cursor::new(Vec::new());
    image.write_to(&mut out, ImageFormat::Png).unwrap();
    out.into_inner()
}

fn client_for(server: &MockServer) -> PokeClient {
    PokeClient::new(ClientConfig {
        base_url: format!("{}/pokemon/", server.uri()),
        timeout: Duration::from_secs(5),
    })
    .unwrap()
}

#[tokio::test]
async fn test_lookup_action_success() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/pokemon/132"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "id": 132,
            "name": "ditto",
            "height": 3,
            "weight": 40,
            "sprites": { "front_default": null },
            "cries": null,
            "types": [], "abilities": [], "stats": [], "moves": []
        })))
        .mount(&server)
        .await;

    let action = lookup_action(&client_for(&server), &PokemonQuery::Id(132)).await;

    match action {
        Action::PokemonDidLoad(record) => {
            assert_eq!(record.name, "ditto");
            assert_eq!(record.sprite_url, None);
            assert_eq!(record.cry_url, None);
        }
        other => panic!("expected PokemonDidLoad, got {other:?}"),
    }
}

#[tokio::test]
async fn test_lookup_action_failure() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .respond_with(ResponseTemplate::new(404))
        .mount(&server)
        .await;

    let action = lookup_action(
        &client_for(&server),
        &PokemonQuery::Name("agumon".into()),
    )
    .await;

    assert!(matches!(
        action,
        Action::PokemonDidError { ref query, .. } if query == "agumon"
    ));
}

#[tokio::test]
async fn test_sprite_action_decodes_png() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/sprites/25.png"))
        .respond_with(ResponseTemplate::new(200).set_body_bytes(png_bytes(3, 2)))
        .mount(&server)
        .await;

    let url = format!("{}/sprites/25.png", server.uri());
    let action = sprite_action(&client_for(&server), 25, &url).await;

    match action {
        Action::SpriteDidLoad { id, sprite } => {
            assert_eq!(id, 25);
            assert_eq!((sprite.width, sprite.height), (3, 2));
            assert_eq!(sprite.rgba.len(), 3 * 2 * 4);
        }
        other => panic!("expected SpriteDidLoad, got {other:?}"),
    }
}

#[tokio::test]
async fn test_sprite_action_reports_bad_payload() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/sprites/25.png"))
        .respond_with(ResponseTemplate::new(200).set_body_string("not a png"))
        .mount(&server)
        .await;
    Mock::given(method("GET"))
        .and(path("/sprites/26.png"))
        .respond_with(ResponseTemplate::new(404))
        .mount(&server)
        .await;

    let client = client_for(&server);
    let bad = sprite_action(&client, 25, &format!("{}/sprites/25.png", server.uri())).await;
    let missing = sprite_action(&client, 26, &format!("{}/sprites/26.png", server.uri())).await;

    assert!(matches!(bad, Action::SpriteDidError { id: 25, .. }));
    assert!(matches!(missing, Action::SpriteDidError { id: 26, .. }));
}
