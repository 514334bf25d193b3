//! PokeAPI client

use std::fmt;
use std::sync::Arc;
use std::time::Duration;

use serde::Deserialize;
use thiserror::Error;

use crate::state::{PokemonRecord, PokemonStat, MAX_POKEMON_ID};

pub const API_BASE: &str = "https://pokeapi.co/api/v2/pokemon";
pub const DEFAULT_TIMEOUT: Duration = Duration::from_secs(10);

// ============================================================================
// Errors
// ============================================================================

/// Why a fetch failed. Only surfaced through logs; callers see one error kind.
#[derive(Debug, Error)]
pub enum FetchFailure {
    #[error("request failed: {0}")]
    Transport(#[source] reqwest::Error),
    #[error("upstream returned {0}")]
    Status(reqwest::StatusCode),
    #[error("malformed response: {0}")]
    Decode(#[source] serde_json::Error),
    #[error("empty query")]
    EmptyQuery,
}

/// A lookup failed: network, HTTP status and decode errors all land here.
#[derive(Debug, Error)]
#[error("Pokémon not found: {query}")]
pub struct NotFoundError {
    pub query: String,
    #[source]
    pub cause: FetchFailure,
}

impl NotFoundError {
    fn new(query: &PokemonQuery, cause: FetchFailure) -> Self {
        Self {
            query: query.to_string(),
            cause,
        }
    }
}

// ============================================================================
// Queries
// ============================================================================

#[derive(Clone, Debug, PartialEq, Eq)]
pub enum PokemonQuery {
    Id(i64),
    Name(String),
}

impl PokemonQuery {
    /// Integers are ID lookups, anything else is a name.
    pub fn parse(text: &str) -> Self {
        let text = text.trim();
        match text.parse::<i64>() {
            Ok(id) => PokemonQuery::Id(id),
            Err(_) => PokemonQuery::Name(text.to_lowercase()),
        }
    }

    pub fn path_segment(&self) -> Option<String> {
        match self {
            PokemonQuery::Id(id) => Some(wrap_id(*id).to_string()),
            PokemonQuery::Name(name) => {
                let name = name.trim().to_lowercase();
                (!name.is_empty()).then_some(name)
            }
        }
    }
}

impl fmt::Display for PokemonQuery {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            PokemonQuery::Id(id) => write!(f, "#{id}"),
            PokemonQuery::Name(name) => write!(f, "{name}"),
        }
    }
}

/// IDs below 1 wrap to the last dex entry; there is no upper bound.
pub fn wrap_id(id: i64) -> i64 {
    if id < 1 {
        i64::from(MAX_POKEMON_ID)
    } else {
        id
    }
}

// ============================================================================
// Wire format
// ============================================================================

#[derive(Clone, Debug, Deserialize)]
struct NamedResource {
    name: String,
}

#[derive(Clone, Debug, Deserialize)]
struct PokemonResponse {
    id: u32,
    name: String,
    #[serde(default)]
    height: u32,
    #[serde(default)]
    weight: u32,
    #[serde(default)]
    types: Vec<PokemonTypeSlot>,
    #[serde(default)]
    stats: Vec<PokemonStatSlot>,
    #[serde(default)]
    abilities: Vec<PokemonAbilitySlot>,
    #[serde(default)]
    moves: Vec<PokemonMoveSlot>,
    #[serde(default)]
    sprites: serde_json::Value,
    cries: Option<PokemonCries>,
}

#[derive(Clone, Debug, Deserialize)]
struct PokemonTypeSlot {
    #[serde(rename = "type")]
    type_info: NamedResource,
}

#[derive(Clone, Debug, Deserialize)]
struct PokemonStatSlot {
    base_stat: u32,
    stat: NamedResource,
}

#[derive(Clone, Debug, Deserialize)]
struct PokemonAbilitySlot {
    ability: NamedResource,
}

#[derive(Clone, Debug, Deserialize)]
struct PokemonMoveSlot {
    #[serde(rename = "move")]
    move_info: NamedResource,
}

#[derive(Clone, Debug, Deserialize)]
struct PokemonCries {
    latest: Option<String>,
    legacy: Option<String>,
}

impl From<PokemonResponse> for PokemonRecord {
    fn from(response: PokemonResponse) -> Self {
        let sprite_url = pointer_string(&response.sprites, "/front_default");
        let cry_url = response
            .cries
            .and_then(|cries| non_empty(cries.latest).or(non_empty(cries.legacy)));
        PokemonRecord {
            id: response.id,
            name: response.name,
            height: response.height,
            weight: response.weight,
            sprite_url,
            cry_url,
            types: response
                .types
                .into_iter()
                .map(|slot| slot.type_info.name)
                .collect(),
            abilities: response
                .abilities
                .into_iter()
                .map(|slot| slot.ability.name)
                .collect(),
            stats: response
                .stats
                .into_iter()
                .map(|slot| PokemonStat {
                    name: slot.stat.name,
                    value: slot.base_stat,
                })
                .collect(),
            moves: response
                .moves
                .into_iter()
                .map(|slot| slot.move_info.name)
                .collect(),
        }
    }
}

fn pointer_string(value: &serde_json::Value, pointer: &str) -> Option<String> {
    value
        .pointer(pointer)
        .and_then(|val| val.as_str())
        .filter(|s| !s.is_empty())
        .map(|s| s.to_string())
}

fn non_empty(value: Option<String>) -> Option<String> {
    value.filter(|s| !s.is_empty())
}

/// Decode a `/pokemon/{id}` body into a record. Unknown fields are ignored.
pub fn parse_record(bytes: &[u8]) -> Result<PokemonRecord, serde_json::Error> {
    serde_json::from_slice::<PokemonResponse>(bytes).map(PokemonRecord::from)
}

// ============================================================================
// Client
// ============================================================================

#[derive(Clone, Debug)]
pub struct ClientConfig {
    pub base_url: String,
    pub timeout: Duration,
}

impl Default for ClientConfig {
    fn default() -> Self {
        Self {
            base_url: API_BASE.to_string(),
            timeout: DEFAULT_TIMEOUT,
        }
    }
}

#[derive(Clone, Debug)]
pub struct PokeClient {
    base_url: Arc<str>,
    http: reqwest::Client,
}

impl PokeClient {
    pub fn new(config: ClientConfig) -> Result<Self, reqwest::Error> {
        let http = reqwest::Client::builder()
            .timeout(config.timeout)
            .user_agent(concat!("pokedex/", env!("CARGO_PKG_VERSION")))
            .build()?;
        Ok(Self {
            base_url: Arc::from(config.base_url.trim_end_matches('/')),
            http,
        })
    }

    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    pub async fn fetch_by_id(&self, id: i64) -> Result<PokemonRecord, NotFoundError> {
        self.fetch(&PokemonQuery::Id(id)).await
    }

    pub async fn fetch_by_name(&self, name: &str) -> Result<PokemonRecord, NotFoundError> {
        self.fetch(&PokemonQuery::parse(name)).await
    }

    pub async fn fetch(&self, query: &PokemonQuery) -> Result<PokemonRecord, NotFoundError> {
        let Some(segment) = query.path_segment() else {
            return Err(NotFoundError::new(query, FetchFailure::EmptyQuery));
        };
        let url = format!("{}/{segment}", self.base_url);
        tracing::debug!(%url, "looking up pokemon");

        let result = match self.fetch_bytes(&url).await {
            Ok(bytes) => parse_record(&bytes).map_err(FetchFailure::Decode),
            Err(cause) => Err(cause),
        };
        result.map_err(|cause| {
            tracing::warn!(%query, error = %cause, "pokemon lookup failed");
            NotFoundError::new(query, cause)
        })
    }

    /// GET a raw payload, treating any non-2xx status as a failure.
    pub async fn fetch_bytes(&self, url: &str) -> Result<Vec<u8>, FetchFailure> {
        let response = self
            .http
            .get(url)
            .send()
            .await
            .map_err(FetchFailure::Transport)?;
        let status = response.status();
        if !status.is_success() {
            return Err(FetchFailure::Status(status));
        }
        let bytes = response.bytes().await.map_err(FetchFailure::Transport)?;
        Ok(bytes.to_vec())
    }
}
