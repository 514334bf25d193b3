//! Effect handling - turns reducer effects into tasks that report back with actions

use tui_dispatch::{EffectContext, TaskKey};

use crate::action::Action;
use crate::api::{PokeClient, PokemonQuery};
use crate::audio::{AudioOutput, Playback, PlaybackOutcome, RodioOutput};
use crate::effect::Effect;
use crate::sprite;

/// Everything the effect handler needs to reach the outside world.
pub struct Services<O: AudioOutput = RodioOutput> {
    client: PokeClient,
    playback: Playback<O>,
}

impl<O: AudioOutput> Services<O> {
    pub fn new(client: PokeClient, output: O) -> Self {
        let playback = Playback::new(client.clone(), output);
        Self { client, playback }
    }

    pub fn handle(&self, effect: Effect, ctx: &mut EffectContext<Action>) {
        match effect {
            Effect::LoadPokemon { query } => {
                let client = self.client.clone();
                // One key for all lookups: the newest request wins.
                ctx.tasks().spawn(TaskKey::new("pokemon"), async move {
                    lookup_action(&client, &query).await
                });
            }
            Effect::LoadSprite { id, url } => {
                let client = self.client.clone();
                ctx.tasks().spawn(TaskKey::new("sprite"), async move {
                    sprite_action(&client, id, &url).await
                });
            }
            Effect::PlayCry { request, url } => {
                let playback = self.playback.clone();
                // Distinct keys so a second request cannot abort the one playing.
                let key = format!("cry_{request}");
                ctx.tasks().spawn(TaskKey::new(key), async move {
                    cry_action(&playback, &url).await
                });
            }
        }
    }
}

pub async fn lookup_action(client: &PokeClient, query: &PokemonQuery) -> Action {
    match client.fetch(query).await {
        Ok(record) => {
            tracing::info!(id = record.id, name = %record.name, "pokemon loaded");
            Action::PokemonDidLoad(record)
        }
        Err(error) => Action::PokemonDidError {
            query: error.query.clone(),
            error: error.cause.to_string(),
        },
    }
}

pub async fn sprite_action(client: &PokeClient, id: u32, url: &str) -> Action {
    let decoded = match client.fetch_bytes(url).await {
        Ok(bytes) => sprite::decode_sprite(&bytes),
        Err(error) => Err(error.to_string()),
    };
    match decoded {
        Ok(sprite) => Action::SpriteDidLoad { id, sprite },
        Err(error) => {
            tracing::warn!(id, %url, %error, "sprite unavailable");
            Action::SpriteDidError { id, error }
        }
    }
}

pub async fn cry_action<O: AudioOutput>(playback: &Playback<O>, url: &str) -> Action {
    match playback.play_cry(url).await {
        Ok(PlaybackOutcome::Played) => Action::CryDidPlay,
        Ok(PlaybackOutcome::Skipped) => Action::CryDidSkip,
        Err(error) => {
            tracing::warn!(%url, %error, "error playing cry");
            Action::CryDidError(error.to_string())
        }
    }
}
